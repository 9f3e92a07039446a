use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo", about = concat!("todo v", env!("CARGO_PKG_VERSION"), " - numbered task lists"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Look for the store starting from this directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create an empty store in the current directory
    Init,
    /// Show all projects, one project, or one section
    Show(ShowArgs),
    /// Create a project
    Create(ProjectArg),
    /// Delete a project and all its tasks
    Delete(ProjectArg),
    /// Rename a project
    Rename(RenameArgs),
    /// Remove checked tasks and renumber the rest
    Archive(ArchiveArgs),
    /// Append a task
    Add(AddArgs),
    /// Insert a task at a position, shifting later tasks down
    Insert(InsertArgs),
    /// Delete tasks by number
    Rm(RmArgs),
    /// Mark tasks done
    Check(TasksArgs),
    /// Mark tasks not done
    Uncheck(TasksArgs),
    /// Move a task to the end of a project or section
    Mv(MvArgs),
    /// Section management
    Section(SectionCmd),
    /// Take tasks out of their section
    Unsection(TasksArgs),
    /// Validate the store
    Verify,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Project to show (default: all)
    pub project: Option<String>,
    /// Only this section of the project
    pub section: Option<String>,
}

// ---------------------------------------------------------------------------
// Project command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectArg {
    /// Project name
    pub name: String,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Current project name
    pub project: String,
    /// New project name
    pub new_name: String,
}

#[derive(Args)]
pub struct ArchiveArgs {
    /// Project to archive (default: every project)
    pub project: Option<String>,
    /// Only archive checked tasks in this section
    pub section: Option<String>,
}

// ---------------------------------------------------------------------------
// Task command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Project to add the task to
    pub project: String,
    /// Task label
    pub label: String,
    /// Also append the task to this section
    #[arg(short, long)]
    pub section: Option<String>,
}

#[derive(Args)]
pub struct InsertArgs {
    /// Project to insert into
    pub project: String,
    /// Number the new task takes (1 = top)
    pub position: u32,
    /// Task label
    pub label: String,
    /// Also append the task to this section
    #[arg(short, long)]
    pub section: Option<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Project to delete from
    pub project: String,
    /// Task numbers or labels
    #[arg(required = true)]
    pub tasks: Vec<String>,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Project the tasks belong to
    pub project: String,
    /// Task labels or numbers
    #[arg(required = true)]
    pub tasks: Vec<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Project the task is in
    pub project: String,
    /// Task label or number
    pub task: String,
    /// Destination project
    pub dest_project: String,
    /// Destination section
    pub dest_section: Option<String>,
}

// ---------------------------------------------------------------------------
// Section command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SectionCmd {
    #[command(subcommand)]
    pub action: SectionAction,
}

#[derive(Subcommand)]
pub enum SectionAction {
    /// Create an empty section
    Add(SectionArgs),
    /// Delete a section and every task in it
    Delete(SectionArgs),
    /// Rename a section
    Rename(SectionRenameArgs),
    /// Put tasks into a section, taking them out of any other
    Put(SectionPutArgs),
}

#[derive(Args)]
pub struct SectionArgs {
    pub project: String,
    pub section: String,
}

#[derive(Args)]
pub struct SectionRenameArgs {
    pub project: String,
    pub section: String,
    pub new_name: String,
}

#[derive(Args)]
pub struct SectionPutArgs {
    pub project: String,
    pub section: String,
    /// Task labels or numbers
    #[arg(required = true)]
    pub tasks: Vec<String>,
}
