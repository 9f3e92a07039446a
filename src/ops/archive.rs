//! Removing checked tasks.
//!
//! Archiving deletes an arbitrary, non-contiguous set of ids at once, so
//! instead of chaining single-id shifts the surviving tasks are renumbered
//! from scratch and every reference is translated through its label.

use std::collections::BTreeSet;

use super::numbering::remap_by_label;
use super::task_ops::require_section;
use super::{ArchiveScopeLabel, OpError};
use crate::model::project::Project;
use crate::model::store::Store;
use crate::model::task::{TaskId, TaskTable};

/// Labels removed from one project by an archive run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub project: String,
    pub removed: Vec<String>,
}

/// Archive checked tasks of one project, or only those inside `section`.
///
/// Section lists come out sorted by id. A whole-project archive leaves the
/// checked set empty; a section archive keeps the other checked tasks under
/// their new ids.
pub fn archive_project(
    project: &mut Project,
    project_name: &str,
    section: Option<&str>,
) -> Result<ArchiveReport, OpError> {
    // 1. select
    let targets: BTreeSet<TaskId> = match section {
        Some(sect) => {
            require_section(project, project_name, sect)?;
            project.sections[sect]
                .iter()
                .filter(|id| project.checked.contains(*id))
                .copied()
                .collect()
        }
        None => project.checked.clone(),
    };
    if targets.is_empty() {
        return Err(OpError::NoCompletedTasks(match section {
            Some(sect) => ArchiveScopeLabel::Section {
                project: project_name.to_string(),
                section: sect.to_string(),
            },
            None => ArchiveScopeLabel::Project(project_name.to_string()),
        }));
    }

    // 2. compact tasks
    let old_tasks = std::mem::take(&mut project.tasks);
    let new_tasks = compact(&old_tasks, &targets);

    // 3. remap sections
    for ids in project.sections.values_mut() {
        let survivors: Vec<TaskId> = ids.iter().filter(|id| !targets.contains(*id)).copied().collect();
        let mut remapped = remap_by_label(&old_tasks, &new_tasks, &survivors);
        remapped.sort();
        *ids = remapped;
    }

    // 4. remap what is still checked
    let still_checked: Vec<TaskId> = project.checked.difference(&targets).copied().collect();
    project.checked = remap_by_label(&old_tasks, &new_tasks, &still_checked)
        .into_iter()
        .collect();

    // 5. commit
    project.tasks = new_tasks;

    let removed = targets
        .iter()
        .filter_map(|id| old_tasks.get(id).cloned())
        .collect();
    Ok(ArchiveReport {
        project: project_name.to_string(),
        removed,
    })
}

/// Archive every project that has checked tasks.
///
/// Fails only when no project has any; projects without checked tasks are
/// skipped.
pub fn archive_all(store: &mut Store) -> Result<Vec<ArchiveReport>, OpError> {
    let names: Vec<String> = store
        .iter()
        .filter(|(_, p)| !p.checked.is_empty())
        .map(|(name, _)| name.to_string())
        .collect();
    if names.is_empty() {
        return Err(OpError::NoCompletedTasks(ArchiveScopeLabel::AllProjects));
    }

    let mut staged = Vec::with_capacity(names.len());
    for name in &names {
        let Some(mut project) = store.checkout(name) else {
            continue;
        };
        let report = archive_project(&mut project, name, None)?;
        staged.push((project, report));
    }

    let mut reports = Vec::with_capacity(staged.len());
    for (project, report) in staged {
        store.commit(&report.project, project);
        reports.push(report);
    }
    Ok(reports)
}

/// Drop `removed` from the table and renumber the rest densely from 1,
/// keeping their relative order.
fn compact(tasks: &TaskTable, removed: &BTreeSet<TaskId>) -> TaskTable {
    tasks
        .iter()
        .filter(|(id, _)| !removed.contains(*id))
        .enumerate()
        .map(|(i, (_, label))| (TaskId(i as u32 + 1), label.clone()))
        .collect()
}
