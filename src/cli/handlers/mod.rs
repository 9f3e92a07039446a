mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::load_config;
use crate::io::lock::StoreLock;
use crate::io::recovery::{RecoveryCategory, log_task_removal};
use crate::io::store_io::{self, StoreError};
use crate::model::config::TodoConfig;
use crate::model::project::Project;
use crate::model::store::Store;
use crate::model::task::{TaskId, TaskRef};
use crate::model::view::{project_view, store_view};
use crate::ops::archive::{archive_all, archive_project};
use crate::ops::check_ops::{check_many, uncheck_many};
use crate::ops::integrity::check_store;
use crate::ops::project_ops::{create_project, delete_project, edit_project, move_task, rename_project};
use crate::ops::section_ops::{add_section, append_to_section, delete_section, rename_section, unsection};
use crate::ops::task_ops::{add_task, delete_tasks, insert_task, require_section, resolve_task};
use crate::ops::OpError;

/// Anything a command can fail with
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Op(#[from] OpError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot resolve -C path '{path}': {source}")]
    Dir {
        path: String,
        source: std::io::Error,
    },
}

impl CliError {
    /// Process exit status: the operation's own code, 1 for store and I/O
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Op(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Where the store lives and how to treat it, resolved once per invocation
struct Context {
    root: PathBuf,
    config: TodoConfig,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), CliError> {
    let start = match cli.dir {
        Some(ref dir) => std::fs::canonicalize(dir).map_err(|e| CliError::Dir {
            path: dir.clone(),
            source: e,
        })?,
        None => std::env::current_dir().map_err(StoreError::Io)?,
    };

    // Init runs before discovery
    if let Commands::Init = cli.command {
        return cmd_init(&start, cli.json);
    }

    let root = store_io::discover_store(&start)?;
    let ctx = Context {
        config: load_config(&root)?,
        root,
        json: cli.json,
    };

    match cli.command {
        // handled before discovery
        Commands::Init => Ok(()),

        // Read commands
        Commands::Show(args) => cmd_show(&ctx, args),
        Commands::Verify => cmd_verify(&ctx),

        // Projects
        Commands::Create(args) => cmd_create(&ctx, args),
        Commands::Delete(args) => cmd_delete(&ctx, args),
        Commands::Rename(args) => cmd_rename(&ctx, args),
        Commands::Archive(args) => cmd_archive(&ctx, args),

        // Tasks
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Insert(args) => cmd_insert(&ctx, args),
        Commands::Rm(args) => cmd_rm(&ctx, args),
        Commands::Check(args) => cmd_check(&ctx, args, true),
        Commands::Uncheck(args) => cmd_check(&ctx, args, false),
        Commands::Mv(args) => cmd_mv(&ctx, args),

        // Sections
        Commands::Section(cmd) => match cmd.action {
            SectionAction::Add(args) => cmd_section_add(&ctx, args),
            SectionAction::Delete(args) => cmd_section_delete(&ctx, args),
            SectionAction::Rename(args) => cmd_section_rename(&ctx, args),
            SectionAction::Put(args) => cmd_section_put(&ctx, args),
        },
        Commands::Unsection(args) => cmd_unsection(&ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run one read-modify-write cycle under the store lock. Nothing is saved
/// unless `edit` succeeds.
fn mutate<T>(
    ctx: &Context,
    edit: impl FnOnce(&mut Store) -> Result<T, OpError>,
) -> Result<T, CliError> {
    let _lock = StoreLock::acquire(&ctx.root, ctx.config.lock.timeout()).map_err(StoreError::from)?;
    let mut store = store_io::load_store(&ctx.root)?;
    let out = edit(&mut store)?;
    store_io::save_store(&ctx.root, &store)?;
    Ok(out)
}

fn log_removed(ctx: &Context, category: RecoveryCategory, project: &str, section: Option<&str>, labels: &[String]) {
    if ctx.config.recovery.log_deletions {
        log_task_removal(&ctx.root, category, project, section, labels);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Interpret each argument as a task of `project`.
fn task_refs(project: &Project, args: &[String]) -> Vec<TaskRef> {
    args.iter()
        .map(|arg| TaskRef::from_arg(arg, &project.tasks))
        .collect()
}

fn resolve_all(project: &Project, args: &[String]) -> Result<Vec<TaskId>, OpError> {
    task_refs(project, args)
        .iter()
        .map(|r| resolve_task(project, r))
        .collect()
}

fn format_ids(ids: &[TaskId]) -> String {
    ids.iter().map(|id| format!("#{}", id)).collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &Context, args: ShowArgs) -> Result<(), CliError> {
    let store = store_io::load_store(&ctx.root)?;
    let hide = ctx.config.display.hide_checked;

    let views = match args.project {
        None => store_view(&store, hide),
        Some(ref name) => {
            let project = store
                .get(name)
                .ok_or_else(|| OpError::ProjectNotFound(name.clone()))?;
            if let Some(ref sect) = args.section {
                require_section(project, name, sect)?;
            }
            vec![project_view(name, project, args.section.as_deref(), hide)]
        }
    };

    if ctx.json {
        if args.project.is_some() {
            print_json(&views[0])?;
        } else {
            print_json(&views)?;
        }
    } else {
        print_lines(&format_store(&views));
    }
    Ok(())
}

fn cmd_verify(ctx: &Context) -> Result<(), CliError> {
    let store = store_io::load_store_unvalidated(&ctx.root)?;
    let report = check_store(&store);
    if ctx.json {
        print_json(&report)?;
    } else {
        print_lines(&format_integrity(&report));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project command handlers
// ---------------------------------------------------------------------------

fn cmd_create(ctx: &Context, args: ProjectArg) -> Result<(), CliError> {
    mutate(ctx, |store| create_project(store, &args.name))?;
    if ctx.json {
        print_json(&ProjectJson { project: args.name })?;
    } else {
        println!("created project \"{}\"", args.name);
    }
    Ok(())
}

fn cmd_delete(ctx: &Context, args: ProjectArg) -> Result<(), CliError> {
    let removed = mutate(ctx, |store| delete_project(store, &args.name))?;
    let labels: Vec<String> = removed.tasks.into_values().collect();
    log_removed(ctx, RecoveryCategory::Delete, &args.name, None, &labels);

    if ctx.json {
        print_json(&RemovedJson {
            project: args.name,
            section: None,
            removed: labels,
        })?;
    } else {
        println!("deleted project \"{}\"", args.name);
    }
    Ok(())
}

fn cmd_rename(ctx: &Context, args: RenameArgs) -> Result<(), CliError> {
    mutate(ctx, |store| rename_project(store, &args.project, &args.new_name))?;
    if ctx.json {
        print_json(&RenamedJson {
            project: None,
            from: args.project,
            to: args.new_name,
        })?;
    } else {
        println!("renamed \"{}\" to \"{}\"", args.project, args.new_name);
    }
    Ok(())
}

fn cmd_archive(ctx: &Context, args: ArchiveArgs) -> Result<(), CliError> {
    let section = args.section.as_deref();
    let reports = mutate(ctx, |store| match args.project {
        None => archive_all(store),
        Some(ref name) => {
            edit_project(store, name, |p| archive_project(p, name, section)).map(|r| vec![r])
        }
    })?;

    for report in &reports {
        log_removed(ctx, RecoveryCategory::Archive, &report.project, section, &report.removed);
    }

    if ctx.json {
        let out: Vec<RemovedJson> = reports.iter().map(|r| archive_to_json(r, section)).collect();
        print_json(&out)?;
    } else {
        print_lines(&format_archive(&reports));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task command handlers
// ---------------------------------------------------------------------------

fn print_task_id(ctx: &Context, project: &str, id: TaskId, label: &str) -> Result<(), CliError> {
    if ctx.json {
        print_json(&TaskIdJson {
            project: project.to_string(),
            id: id.get(),
            label: label.to_string(),
        })
    } else {
        println!("{}", id);
        Ok(())
    }
}

fn cmd_add(ctx: &Context, args: AddArgs) -> Result<(), CliError> {
    let id = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            add_task(p, &args.project, &args.label, args.section.as_deref())
        })
    })?;
    print_task_id(ctx, &args.project, id, &args.label)
}

fn cmd_insert(ctx: &Context, args: InsertArgs) -> Result<(), CliError> {
    let id = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            insert_task(p, &args.project, &args.label, args.position, args.section.as_deref())
        })
    })?;
    print_task_id(ctx, &args.project, id, &args.label)
}

fn cmd_rm(ctx: &Context, args: RmArgs) -> Result<(), CliError> {
    let removed = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            // Labels resolve to their number; bare numbers are validated by
            // the delete itself.
            let mut numbers = Vec::with_capacity(args.tasks.len());
            for task in task_refs(p, &args.tasks) {
                match task {
                    TaskRef::Id(n) => numbers.push(n),
                    label @ TaskRef::Label(_) => numbers.push(resolve_task(p, &label)?.get()),
                }
            }
            delete_tasks(p, &numbers)
        })
    })?;
    log_removed(ctx, RecoveryCategory::Delete, &args.project, None, &removed);

    if ctx.json {
        print_json(&RemovedJson {
            project: args.project,
            section: None,
            removed,
        })?;
    } else {
        for label in &removed {
            println!("deleted \"{}\"", label);
        }
    }
    Ok(())
}

fn cmd_check(ctx: &Context, args: TasksArgs, checked: bool) -> Result<(), CliError> {
    let ids = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            let refs = task_refs(p, &args.tasks);
            if checked {
                check_many(p, &refs)
            } else {
                uncheck_many(p, &refs)
            }
        })
    })?;

    if ctx.json {
        print_json(&CheckedJson {
            project: args.project,
            ids: ids.iter().map(|id| id.get()).collect(),
        })?;
    } else {
        let verb = if checked { "checked" } else { "unchecked" };
        println!("{} {}", verb, format_ids(&ids));
    }
    Ok(())
}

fn cmd_mv(ctx: &Context, args: MvArgs) -> Result<(), CliError> {
    let moved = mutate(ctx, |store| {
        let source = store
            .get(&args.project)
            .ok_or_else(|| OpError::ProjectNotFound(args.project.clone()))?;
        let task = TaskRef::from_arg(&args.task, &source.tasks);
        move_task(
            store,
            &args.project,
            &task,
            &args.dest_project,
            args.dest_section.as_deref(),
        )
    })?;

    if ctx.json {
        print_json(&moved_to_json(&moved, &args.project, &args.dest_project))?;
    } else {
        println!(
            "moved \"{}\" from {} #{} to {} #{}",
            moved.label, args.project, moved.from, args.dest_project, moved.to
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Section command handlers
// ---------------------------------------------------------------------------

fn cmd_section_add(ctx: &Context, args: SectionArgs) -> Result<(), CliError> {
    mutate(ctx, |store| {
        edit_project(store, &args.project, |p| add_section(p, &args.project, &args.section))
    })?;
    if ctx.json {
        print_json(&SectionJson {
            project: args.project,
            section: args.section,
        })?;
    } else {
        println!("created section \"{}\" in \"{}\"", args.section, args.project);
    }
    Ok(())
}

fn cmd_section_delete(ctx: &Context, args: SectionArgs) -> Result<(), CliError> {
    let removed = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| delete_section(p, &args.project, &args.section))
    })?;
    log_removed(
        ctx,
        RecoveryCategory::Delete,
        &args.project,
        Some(&args.section),
        &removed,
    );

    if ctx.json {
        print_json(&RemovedJson {
            project: args.project,
            section: Some(args.section),
            removed,
        })?;
    } else {
        let noun = if removed.len() == 1 { "task" } else { "tasks" };
        println!(
            "deleted section \"{}\" and {} {}",
            args.section,
            removed.len(),
            noun
        );
    }
    Ok(())
}

fn cmd_section_rename(ctx: &Context, args: SectionRenameArgs) -> Result<(), CliError> {
    mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            rename_section(p, &args.project, &args.section, &args.new_name)
        })
    })?;
    if ctx.json {
        print_json(&RenamedJson {
            project: Some(args.project),
            from: args.section,
            to: args.new_name,
        })?;
    } else {
        println!("renamed section \"{}\" to \"{}\"", args.section, args.new_name);
    }
    Ok(())
}

fn cmd_section_put(ctx: &Context, args: SectionPutArgs) -> Result<(), CliError> {
    let ids = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            let ids = resolve_all(p, &args.tasks)?;
            for id in &ids {
                append_to_section(p, &args.project, &args.section, *id)?;
            }
            Ok(ids)
        })
    })?;
    if ctx.json {
        print_json(&SectionedJson {
            project: args.project,
            section: Some(args.section),
            ids: ids.iter().map(|id| id.get()).collect(),
        })?;
    } else {
        println!("put {} in \"{}\"", format_ids(&ids), args.section);
    }
    Ok(())
}

fn cmd_unsection(ctx: &Context, args: TasksArgs) -> Result<(), CliError> {
    let ids = mutate(ctx, |store| {
        edit_project(store, &args.project, |p| {
            let ids = resolve_all(p, &args.tasks)?;
            unsection(p, &ids)?;
            Ok(ids)
        })
    })?;
    if ctx.json {
        print_json(&SectionedJson {
            project: args.project,
            section: None,
            ids: ids.iter().map(|id| id.get()).collect(),
        })?;
    } else {
        println!("unsectioned {}", format_ids(&ids));
    }
    Ok(())
}
