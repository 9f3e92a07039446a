use super::OpError;
use super::numbering::shift_delete_many;
use super::task_ops::require_section;
use crate::model::project::Project;
use crate::model::task::TaskId;

/// Create an empty section at the end of the section list.
pub fn add_section(project: &mut Project, project_name: &str, section: &str) -> Result<(), OpError> {
    if section.is_empty() {
        return Err(OpError::InvalidSectionName);
    }
    if project.sections.contains_key(section) {
        return Err(OpError::SectionExists {
            project: project_name.to_string(),
            section: section.to_string(),
        });
    }
    project.sections.insert(section.to_string(), Vec::new());
    Ok(())
}

/// Delete a section together with every task it owns.
///
/// The owned tasks are removed from the project, not just detached, and the
/// remaining sections and checked set are renumbered. Returns the labels of
/// the deleted tasks.
pub fn delete_section(
    project: &mut Project,
    project_name: &str,
    section: &str,
) -> Result<Vec<String>, OpError> {
    require_section(project, project_name, section)?;

    let owned: Vec<u32> = project.sections[section].iter().map(|id| id.get()).collect();
    let mut staged = project.clone();
    staged.sections.shift_remove(section);
    let removed = shift_delete_many(&mut staged, &owned)?;

    *project = staged;
    Ok(removed)
}

/// Rename a section keeping its place in the section order.
pub fn rename_section(
    project: &mut Project,
    project_name: &str,
    section: &str,
    new_name: &str,
) -> Result<(), OpError> {
    require_section(project, project_name, section)?;
    if new_name.is_empty() {
        return Err(OpError::InvalidSectionName);
    }
    if project.sections.contains_key(new_name) {
        return Err(OpError::SectionExists {
            project: project_name.to_string(),
            section: new_name.to_string(),
        });
    }

    if let Some((index, _, ids)) = project.sections.shift_remove_full(section) {
        project.sections.shift_insert(index, new_name.to_string(), ids);
    }
    Ok(())
}

/// Put a task at the end of a section.
///
/// A task sits in at most one section through this call: it is detached from
/// any other section first. Already being a member is a no-op.
pub fn append_to_section(
    project: &mut Project,
    project_name: &str,
    section: &str,
    id: TaskId,
) -> Result<(), OpError> {
    require_section(project, project_name, section)?;
    if !project.tasks.contains_key(&id) {
        return Err(OpError::TaskNotFound(format!("#{}", id)));
    }

    for (name, ids) in project.sections.iter_mut() {
        if name != section {
            ids.retain(|other| *other != id);
        }
    }
    if let Some(ids) = project.sections.get_mut(section)
        && !ids.contains(&id)
    {
        ids.push(id);
    }
    Ok(())
}

/// Detach tasks from whatever section holds them. The tasks stay in the
/// project. All ids are checked before anything changes.
pub fn unsection(project: &mut Project, ids: &[TaskId]) -> Result<(), OpError> {
    for id in ids {
        if !project.tasks.contains_key(id) {
            return Err(OpError::TaskNotFound(format!("#{}", id)));
        }
        if project.section_of(*id).is_none() {
            return Err(OpError::NotInSection(format!("#{}", id)));
        }
    }

    for members in project.sections.values_mut() {
        members.retain(|id| !ids.contains(id));
    }
    Ok(())
}
