//! Renumbering primitives shared by every structural operation.
//!
//! A task's id is its position, so inserting or removing one task shifts the
//! ids of all tasks after it. These functions apply that shift to the task
//! table, every section list and the checked set in one step, which keeps the
//! three consistent with each other.

use std::collections::{BTreeSet, HashMap};

use super::OpError;
use crate::model::project::Project;
use crate::model::task::{TaskId, TaskTable};

/// Open a slot at `at` by moving every id `>= at` up by one.
///
/// Returns the reserved id; the caller must fill `tasks[at]` before the
/// project is used again.
pub fn shift_insert(project: &mut Project, at: u32) -> Result<TaskId, OpError> {
    let max = project.len() as u32 + 1;
    if at < 1 || at > max {
        return Err(OpError::InvalidPosition { position: at, max });
    }
    let at = TaskId(at);
    renumber(project, |id| Some(if id >= at { id.next() } else { id }));
    Ok(at)
}

/// Remove task `id` and close the gap it leaves.
///
/// The id is also dropped from every section and from the checked set.
/// Returns the removed label.
pub fn shift_delete_one(project: &mut Project, id: u32) -> Result<String, OpError> {
    validate_existing(project.len(), id)?;
    let target = TaskId(id);
    let label = project
        .tasks
        .get(&target)
        .cloned()
        .ok_or_else(|| OpError::TaskNotFound(format!("#{}", id)))?;
    renumber(project, |other| match other.cmp(&target) {
        std::cmp::Ordering::Less => Some(other),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(other.back(1)),
    });
    Ok(label)
}

/// Remove a batch of tasks given by their ids before the batch started.
///
/// Every id is checked against the original `1..=N` first, so nothing changes
/// if any of them is bad. Repeated ids count once. Removed labels come back in
/// ascending original-id order.
pub fn shift_delete_many(project: &mut Project, ids: &[u32]) -> Result<Vec<String>, OpError> {
    let n = project.len();
    for &id in ids {
        validate_existing(n, id)?;
    }
    let sorted: BTreeSet<u32> = ids.iter().copied().collect();

    let mut removed = Vec::with_capacity(sorted.len());
    for (i, id) in sorted.into_iter().enumerate() {
        // each smaller id already deleted has pulled this one down by one
        removed.push(shift_delete_one(project, id - i as u32)?);
    }
    Ok(removed)
}

/// Translate ids of `old_tasks` into ids of `new_tasks` by matching labels.
///
/// Order follows `old_ids`. Ids whose label no longer exists are dropped.
pub fn remap_by_label(old_tasks: &TaskTable, new_tasks: &TaskTable, old_ids: &[TaskId]) -> Vec<TaskId> {
    let by_label: HashMap<&str, TaskId> = new_tasks
        .iter()
        .map(|(id, label)| (label.as_str(), *id))
        .collect();
    old_ids
        .iter()
        .filter_map(|id| old_tasks.get(id))
        .filter_map(|label| by_label.get(label.as_str()).copied())
        .collect()
}

fn validate_existing(n: usize, id: u32) -> Result<(), OpError> {
    if id == 0 {
        return Err(OpError::InvalidTaskId(id));
    }
    if id as usize > n {
        return Err(OpError::TaskNotFound(format!("#{}", id)));
    }
    Ok(())
}

/// Apply an id mapping to the task table, all sections and the checked set.
/// `None` drops the id everywhere.
fn renumber(project: &mut Project, map: impl Fn(TaskId) -> Option<TaskId>) {
    let tasks = std::mem::take(&mut project.tasks);
    project.tasks = tasks
        .into_iter()
        .filter_map(|(id, label)| map(id).map(|new| (new, label)))
        .collect();

    for ids in project.sections.values_mut() {
        *ids = ids.iter().filter_map(|id| map(*id)).collect();
    }

    project.checked = project.checked.iter().filter_map(|id| map(*id)).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(labels: &[&str]) -> Project {
        let mut p = Project::new();
        for (i, l) in labels.iter().enumerate() {
            p.tasks.insert(TaskId(i as u32 + 1), l.to_string());
        }
        p
    }

    fn ids(raw: &[u32]) -> Vec<TaskId> {
        raw.iter().map(|n| TaskId(*n)).collect()
    }

    fn labels(p: &Project) -> Vec<&str> {
        p.tasks.values().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_shift_insert_moves_later_ids() {
        let mut p = project(&["a", "b", "c"]);
        p.sections.insert("s".into(), ids(&[1, 3]));
        p.checked.insert(TaskId(2));

        let slot = shift_insert(&mut p, 2).unwrap();
        assert_eq!(slot, TaskId(2));
        assert!(!p.tasks.contains_key(&TaskId(2)));
        p.tasks.insert(slot, "new".into());

        assert_eq!(labels(&p), vec!["a", "new", "b", "c"]);
        assert_eq!(p.sections["s"], ids(&[1, 4]));
        assert!(p.checked.contains(&TaskId(3)));
    }

    #[test]
    fn test_shift_insert_bounds() {
        let mut p = project(&["a"]);
        assert_eq!(
            shift_insert(&mut p, 0),
            Err(OpError::InvalidPosition { position: 0, max: 2 })
        );
        assert!(shift_insert(&mut p, 3).is_err());
        assert_eq!(shift_insert(&mut p, 2), Ok(TaskId(2)));
    }

    #[test]
    fn test_shift_delete_one_updates_sections_and_check() {
        // task1(sect1) task2(sect2) task3(sect1) task4(sect1)
        let mut p = project(&["task1", "task2", "task3", "task4"]);
        p.sections.insert("sect1".into(), ids(&[1, 3, 4]));
        p.sections.insert("sect2".into(), ids(&[2]));
        p.checked = ids(&[2, 4]).into_iter().collect();

        let removed = shift_delete_one(&mut p, 2).unwrap();
        assert_eq!(removed, "task2");
        assert_eq!(labels(&p), vec!["task1", "task3", "task4"]);
        assert_eq!(p.sections["sect1"], ids(&[1, 2, 3]));
        assert_eq!(p.sections["sect2"], ids(&[]));
        assert_eq!(p.checked, ids(&[3]).into_iter().collect());
    }

    #[test]
    fn test_shift_delete_one_rejects_bad_ids() {
        let mut p = project(&["a", "b"]);
        assert_eq!(shift_delete_one(&mut p, 0), Err(OpError::InvalidTaskId(0)));
        assert_eq!(
            shift_delete_one(&mut p, 3),
            Err(OpError::TaskNotFound("#3".into()))
        );
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_shift_delete_many_compensates_offsets() {
        let mut p = project(&["a", "b", "c", "d", "e", "f"]);
        p.sections.insert("s".into(), ids(&[6, 1, 4, 2]));
        p.checked = ids(&[3, 5, 6]).into_iter().collect();

        let removed = shift_delete_many(&mut p, &[5, 2, 4]).unwrap();
        assert_eq!(removed, vec!["b", "d", "e"]);
        assert_eq!(labels(&p), vec!["a", "c", "f"]);
        assert_eq!(p.sections["s"], ids(&[3, 1]));
        assert_eq!(p.checked, ids(&[2, 3]).into_iter().collect());
    }

    #[test]
    fn test_shift_delete_many_validates_before_mutating() {
        let mut p = project(&["a", "b", "c"]);
        let before = p.clone();
        assert_eq!(
            shift_delete_many(&mut p, &[1, 4]),
            Err(OpError::TaskNotFound("#4".into()))
        );
        assert_eq!(shift_delete_many(&mut p, &[2, 0]), Err(OpError::InvalidTaskId(0)));
        assert_eq!(p, before);
    }

    #[test]
    fn test_shift_delete_many_uses_original_range() {
        // 3 is valid before the batch even though only one task survives
        let mut p = project(&["a", "b", "c"]);
        shift_delete_many(&mut p, &[3, 1]).unwrap();
        assert_eq!(labels(&p), vec!["b"]);
    }

    #[test]
    fn test_shift_delete_many_collapses_repeats() {
        let mut p = project(&["a", "b", "c"]);
        let removed = shift_delete_many(&mut p, &[2, 2]).unwrap();
        assert_eq!(removed, vec!["b"]);
        assert_eq!(labels(&p), vec!["a", "c"]);
    }

    #[test]
    fn test_insert_then_delete_restores_project() {
        let mut p = project(&["a", "b", "c"]);
        p.sections.insert("s".into(), ids(&[3, 1]));
        p.checked = ids(&[2]).into_iter().collect();
        let before = p.clone();

        let slot = shift_insert(&mut p, 1).unwrap();
        p.tasks.insert(slot, "z".into());
        shift_delete_one(&mut p, slot.get()).unwrap();
        assert_eq!(p, before);
    }

    #[test]
    fn test_remap_by_label() {
        let old = project(&["a", "b", "c", "d"]).tasks;
        let new = project(&["a", "c", "d"]).tasks;
        assert_eq!(remap_by_label(&old, &new, &ids(&[4, 2, 1])), ids(&[3, 1]));
        assert_eq!(remap_by_label(&old, &new, &ids(&[3])), ids(&[2]));
    }
}
