pub mod archive;
pub mod check_ops;
pub mod integrity;
pub mod numbering;
pub mod project_ops;
pub mod section_ops;
pub mod task_ops;

/// Error type for every mutating operation.
///
/// Validation runs before any structural change, so an `Err` always leaves
/// the project exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OpError {
    #[error("project \"{0}\" does not exist")]
    ProjectNotFound(String),
    #[error("project \"{0}\" already exists")]
    ProjectExists(String),
    #[error("invalid project name \"{name}\": {reason}")]
    InvalidProjectName { name: String, reason: &'static str },
    #[error("section \"{section}\" does not exist in project \"{project}\"")]
    SectionNotFound { project: String, section: String },
    #[error("section \"{section}\" already exists in project \"{project}\"")]
    SectionExists { project: String, section: String },
    #[error("section name must not be empty")]
    InvalidSectionName,
    #[error("task label must not be empty")]
    EmptyLabel,
    #[error("task {0} does not exist")]
    TaskNotFound(String),
    #[error("task \"{label}\" already exists in project \"{project}\"")]
    DuplicateTask { project: String, label: String },
    #[error("{0} is an invalid task number")]
    InvalidTaskId(u32),
    #[error("cannot insert at position {position}: valid positions are 1 to {max}")]
    InvalidPosition { position: u32, max: u32 },
    #[error("task {0} is already checked")]
    AlreadyChecked(String),
    #[error("task {0} is not checked")]
    NotChecked(String),
    #[error("task {0} is not in any section")]
    NotInSection(String),
    #[error("no completed tasks in {0}")]
    NoCompletedTasks(ArchiveScopeLabel),
}

impl OpError {
    /// Process exit status for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            OpError::InvalidProjectName { .. }
            | OpError::InvalidSectionName
            | OpError::EmptyLabel
            | OpError::InvalidTaskId(_)
            | OpError::InvalidPosition { .. } => 2,
            OpError::ProjectNotFound(_)
            | OpError::SectionNotFound { .. }
            | OpError::TaskNotFound(_)
            | OpError::NotInSection(_) => 3,
            OpError::ProjectExists(_)
            | OpError::SectionExists { .. }
            | OpError::DuplicateTask { .. }
            | OpError::AlreadyChecked(_)
            | OpError::NotChecked(_) => 4,
            OpError::NoCompletedTasks(_) => 5,
        }
    }
}

/// What an archive looked at, for the `NoCompletedTasks` message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveScopeLabel {
    AllProjects,
    Project(String),
    Section { project: String, section: String },
}

impl std::fmt::Display for ArchiveScopeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveScopeLabel::AllProjects => write!(f, "any project"),
            ArchiveScopeLabel::Project(p) => write!(f, "project \"{}\"", p),
            ArchiveScopeLabel::Section { project, section } => {
                write!(f, "section \"{}\" of project \"{}\"", section, project)
            }
        }
    }
}
