use super::OpError;
use super::numbering::{shift_delete_many, shift_insert};
use crate::model::project::Project;
use crate::model::task::{TaskId, TaskRef};

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve a task reference to the task's current id.
pub fn resolve_task(project: &Project, task: &TaskRef) -> Result<TaskId, OpError> {
    match task {
        TaskRef::Id(0) => Err(OpError::InvalidTaskId(0)),
        TaskRef::Id(n) => {
            let id = TaskId(*n);
            if project.tasks.contains_key(&id) {
                Ok(id)
            } else {
                Err(OpError::TaskNotFound(task.to_string()))
            }
        }
        TaskRef::Label(label) => project
            .id_of(label)
            .ok_or_else(|| OpError::TaskNotFound(task.to_string())),
    }
}

/// Fail unless `section` exists in the project
pub fn require_section(project: &Project, project_name: &str, section: &str) -> Result<(), OpError> {
    if project.sections.contains_key(section) {
        Ok(())
    } else {
        Err(OpError::SectionNotFound {
            project: project_name.to_string(),
            section: section.to_string(),
        })
    }
}

/// Fail if `label` is empty or already used in the project
pub fn validate_new_label(project: &Project, project_name: &str, label: &str) -> Result<(), OpError> {
    if label.is_empty() {
        return Err(OpError::EmptyLabel);
    }
    if project.has_label(label) {
        return Err(OpError::DuplicateTask {
            project: project_name.to_string(),
            label: label.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Add / insert / delete
// ---------------------------------------------------------------------------

/// Append a task at the end of the project, optionally also at the end of
/// a section. Returns the new id.
pub fn add_task(
    project: &mut Project,
    project_name: &str,
    label: &str,
    section: Option<&str>,
) -> Result<TaskId, OpError> {
    validate_new_label(project, project_name, label)?;
    if let Some(sect) = section {
        require_section(project, project_name, sect)?;
    }

    let id = project.next_id();
    project.tasks.insert(id, label.to_string());
    if let Some(sect) = section
        && let Some(ids) = project.sections.get_mut(sect)
    {
        ids.push(id);
    }
    Ok(id)
}

/// Insert a task at `position`, pushing every later task down by one.
/// With a section, the new id is appended to that section.
pub fn insert_task(
    project: &mut Project,
    project_name: &str,
    label: &str,
    position: u32,
    section: Option<&str>,
) -> Result<TaskId, OpError> {
    validate_new_label(project, project_name, label)?;
    if let Some(sect) = section {
        require_section(project, project_name, sect)?;
    }

    let id = shift_insert(project, position)?;
    project.tasks.insert(id, label.to_string());
    if let Some(sect) = section
        && let Some(ids) = project.sections.get_mut(sect)
    {
        ids.push(id);
    }
    Ok(id)
}

/// Delete tasks by id. Returns the removed labels.
pub fn delete_tasks(project: &mut Project, ids: &[u32]) -> Result<Vec<String>, OpError> {
    shift_delete_many(project, ids)
}
