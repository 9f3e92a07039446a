use std::collections::BTreeSet;

use super::OpError;
use super::task_ops::resolve_task;
use crate::model::project::Project;
use crate::model::task::{TaskId, TaskRef};

/// Mark one task as done.
pub fn check(project: &mut Project, task: &TaskRef) -> Result<TaskId, OpError> {
    check_many(project, std::slice::from_ref(task)).map(|ids| ids[0])
}

/// Clear one task's done mark.
pub fn uncheck(project: &mut Project, task: &TaskRef) -> Result<TaskId, OpError> {
    uncheck_many(project, std::slice::from_ref(task)).map(|ids| ids[0])
}

/// Mark several tasks as done.
///
/// Tasks are validated in the order given and the first bad one fails the
/// whole batch before anything is marked. Naming the same task twice counts
/// as checking it twice.
pub fn check_many(project: &mut Project, tasks: &[TaskRef]) -> Result<Vec<TaskId>, OpError> {
    let ids = validate_batch(project, tasks, true)?;
    project.checked.extend(ids.iter().copied());
    Ok(ids)
}

/// Clear several tasks' done marks, all or nothing like `check_many`.
pub fn uncheck_many(project: &mut Project, tasks: &[TaskRef]) -> Result<Vec<TaskId>, OpError> {
    let ids = validate_batch(project, tasks, false)?;
    for id in &ids {
        project.checked.remove(id);
    }
    Ok(ids)
}

fn validate_batch(project: &Project, tasks: &[TaskRef], checking: bool) -> Result<Vec<TaskId>, OpError> {
    let mut seen = BTreeSet::new();
    let mut ids = Vec::with_capacity(tasks.len());
    for task in tasks {
        let id = resolve_task(project, task)?;
        let already = project.is_checked(id);
        let repeated = !seen.insert(id);
        if checking && (already || repeated) {
            return Err(OpError::AlreadyChecked(task.to_string()));
        }
        if !checking && (!already || repeated) {
            return Err(OpError::NotChecked(task.to_string()));
        }
        ids.push(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label(s: &str) -> TaskRef {
        TaskRef::Label(s.to_string())
    }

    fn project(labels: &[&str]) -> Project {
        let mut p = Project::new();
        for (i, l) in labels.iter().enumerate() {
            p.tasks.insert(TaskId(i as u32 + 1), l.to_string());
        }
        p
    }

    #[test]
    fn test_check_then_uncheck() {
        let mut p = project(&["task1"]);

        check(&mut p, &label("task1")).unwrap();
        assert_eq!(p.checked, [TaskId(1)].into_iter().collect());

        assert_eq!(
            check(&mut p, &label("task1")),
            Err(OpError::AlreadyChecked("\"task1\"".into()))
        );

        uncheck(&mut p, &label("task1")).unwrap();
        assert!(p.checked.is_empty());

        assert_eq!(
            uncheck(&mut p, &label("task1")),
            Err(OpError::NotChecked("\"task1\"".into()))
        );
    }

    #[test]
    fn test_check_unknown_task() {
        let mut p = project(&["task1"]);
        assert_eq!(
            check(&mut p, &label("notarealtask")),
            Err(OpError::TaskNotFound("\"notarealtask\"".into()))
        );
        assert_eq!(
            uncheck(&mut p, &TaskRef::Id(0)),
            Err(OpError::InvalidTaskId(0))
        );
    }

    #[test]
    fn test_uncheck_first_keeps_second() {
        let mut p = project(&["task1", "task2"]);
        check(&mut p, &label("task1")).unwrap();
        check(&mut p, &label("task2")).unwrap();

        uncheck(&mut p, &label("task1")).unwrap();
        assert_eq!(p.checked, [TaskId(2)].into_iter().collect());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut p = project(&["a", "b", "c"]);
        check(&mut p, &label("c")).unwrap();

        assert_eq!(
            check_many(&mut p, &[label("a"), label("c"), label("zzz")]),
            Err(OpError::AlreadyChecked("\"c\"".into()))
        );
        assert_eq!(p.checked, [TaskId(3)].into_iter().collect());

        let ids = check_many(&mut p, &[label("b"), TaskRef::Id(1)]).unwrap();
        assert_eq!(ids, vec![TaskId(2), TaskId(1)]);
        assert_eq!(p.checked.len(), 3);

        assert_eq!(
            uncheck_many(&mut p, &[label("a"), label("a")]),
            Err(OpError::NotChecked("\"a\"".into()))
        );
        assert_eq!(p.checked.len(), 3);
    }
}
