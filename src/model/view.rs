use serde::Serialize;

use super::project::Project;
use super::store::Store;
use super::task::TaskId;

/// Read-only snapshot handed to whatever paints the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub name: String,
    pub sections: Vec<SectionView>,
    /// Tasks that belong to no section
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub name: String,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: u32,
    pub label: String,
    pub checked: bool,
}

/// Build the view of one project. With `section`, only that section is
/// included and the unsectioned list is left empty.
pub fn project_view(
    name: &str,
    project: &Project,
    section: Option<&str>,
    hide_checked: bool,
) -> ProjectView {
    let task_views = |ids: &[TaskId]| -> Vec<TaskView> {
        ids.iter()
            .filter_map(|id| {
                let label = project.label(*id)?;
                let checked = project.is_checked(*id);
                if hide_checked && checked {
                    return None;
                }
                Some(TaskView {
                    id: id.get(),
                    label: label.to_string(),
                    checked,
                })
            })
            .collect()
    };

    let sections = project
        .sections
        .iter()
        .filter(|(sect, _)| section.is_none_or(|wanted| wanted == sect.as_str()))
        .map(|(sect, ids)| SectionView {
            name: sect.clone(),
            tasks: task_views(ids),
        })
        .collect();

    let tasks = if section.is_some() {
        Vec::new()
    } else {
        task_views(&project.unsectioned())
    };

    ProjectView {
        name: name.to_string(),
        sections,
        tasks,
    }
}

/// Views of every project in store order
pub fn store_view(store: &Store, hide_checked: bool) -> Vec<ProjectView> {
    store
        .iter()
        .map(|(name, project)| project_view(name, project, None, hide_checked))
        .collect()
}
