use super::OpError;
use super::numbering::shift_delete_one;
use super::task_ops::{add_task, require_section, resolve_task};
use crate::model::project::Project;
use crate::model::store::Store;
use crate::model::task::{TaskId, TaskRef};

/// Longest accepted project name, in characters
pub const MAX_PROJECT_NAME_LEN: usize = 45;

/// Names that would collide with subcommands
pub const RESERVED_NAMES: &[&str] = &[
    "init", "create", "delete", "archive", "show", "add", "insert", "rm", "check", "uncheck",
    "mv", "section", "unsection", "rename", "verify", "help",
];

// ---------------------------------------------------------------------------
// Name policy
// ---------------------------------------------------------------------------

/// Check a name for a new or renamed project: alphanumeric, not reserved,
/// not taken, and at most `MAX_PROJECT_NAME_LEN` characters.
pub fn validate_project_name(store: &Store, name: &str) -> Result<(), OpError> {
    let invalid = |reason| OpError::InvalidProjectName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() || !name.chars().all(char::is_alphanumeric) {
        return Err(invalid("only letters and digits are allowed"));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(invalid("the name is reserved"));
    }
    if store.contains(name) {
        return Err(OpError::ProjectExists(name.to_string()));
    }
    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        return Err(invalid("the name is too long"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project lifecycle
// ---------------------------------------------------------------------------

pub fn create_project(store: &mut Store, name: &str) -> Result<(), OpError> {
    validate_project_name(store, name)?;
    store.commit(name, Project::new());
    Ok(())
}

/// Remove a project and everything in it. Returns the removed project.
pub fn delete_project(store: &mut Store, name: &str) -> Result<Project, OpError> {
    store
        .remove(name)
        .ok_or_else(|| OpError::ProjectNotFound(name.to_string()))
}

pub fn rename_project(store: &mut Store, name: &str, new_name: &str) -> Result<(), OpError> {
    if !store.contains(name) {
        return Err(OpError::ProjectNotFound(name.to_string()));
    }
    validate_project_name(store, new_name)?;
    store.rename(name, new_name);
    Ok(())
}

/// Run `edit` on a copy of the named project and commit the copy only if
/// `edit` succeeds.
pub fn edit_project<T>(
    store: &mut Store,
    name: &str,
    edit: impl FnOnce(&mut Project) -> Result<T, OpError>,
) -> Result<T, OpError> {
    let mut project = store
        .checkout(name)
        .ok_or_else(|| OpError::ProjectNotFound(name.to_string()))?;
    let out = edit(&mut project)?;
    store.commit(name, project);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Moving tasks
// ---------------------------------------------------------------------------

/// Where a task went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedTask {
    pub label: String,
    pub from: TaskId,
    pub to: TaskId,
}

/// Move a task to the end of another project, or to the end of a section.
///
/// The task is removed from its old position (and section) and appended to
/// the destination unchecked. Both projects are committed together.
pub fn move_task(
    store: &mut Store,
    project_name: &str,
    task: &TaskRef,
    dest_project: &str,
    dest_section: Option<&str>,
) -> Result<MovedTask, OpError> {
    let mut source = store
        .checkout(project_name)
        .ok_or_else(|| OpError::ProjectNotFound(project_name.to_string()))?;
    let from = resolve_task(&source, task)?;

    let same_project = project_name == dest_project;
    let mut dest = if same_project {
        None
    } else {
        Some(
            store
                .checkout(dest_project)
                .ok_or_else(|| OpError::ProjectNotFound(dest_project.to_string()))?,
        )
    };
    if let Some(sect) = dest_section {
        require_section(dest.as_ref().unwrap_or(&source), dest_project, sect)?;
    }

    let label = shift_delete_one(&mut source, from.get())?;
    let to = match dest.as_mut() {
        Some(other) => add_task(other, dest_project, &label, dest_section)?,
        None => add_task(&mut source, dest_project, &label, dest_section)?,
    };

    store.commit(project_name, source);
    if let Some(other) = dest {
        store.commit(dest_project, other);
    }
    Ok(MovedTask { label, from, to })
}
