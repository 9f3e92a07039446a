use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A task's 1-based position inside its project.
///
/// There is no identity beyond the position: inserting or removing a task
/// renumbers every task after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl TaskId {
    /// Build an id from a raw number, rejecting zero
    pub fn new(n: u32) -> Option<TaskId> {
        if n == 0 { None } else { Some(TaskId(n)) }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id one position later
    pub fn next(self) -> TaskId {
        TaskId(self.0 + 1)
    }

    /// The id `n` positions earlier. Callers guarantee the result stays >= 1.
    pub fn back(self, n: u32) -> TaskId {
        TaskId(self.0 - n)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task id → label. Keys are dense `1..=N` at rest.
pub type TaskTable = BTreeMap<TaskId, String>;

/// How a command names a task: by its current number or by its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    Id(u32),
    Label(String),
}

impl TaskRef {
    /// Interpret a command-line argument against a project's labels.
    ///
    /// An exact label match wins; otherwise a decimal number is an id.
    pub fn from_arg(arg: &str, tasks: &TaskTable) -> TaskRef {
        if tasks.values().any(|label| label == arg) {
            return TaskRef::Label(arg.to_string());
        }
        match arg.parse::<u32>() {
            Ok(n) => TaskRef::Id(n),
            Err(_) => TaskRef::Label(arg.to_string()),
        }
    }
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Id(n) => write!(f, "#{}", n),
            TaskRef::Label(label) => write!(f, "\"{}\"", label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(labels: &[&str]) -> TaskTable {
        labels
            .iter()
            .enumerate()
            .map(|(i, l)| (TaskId(i as u32 + 1), l.to_string()))
            .collect()
    }

    #[test]
    fn test_task_id_rejects_zero() {
        assert_eq!(TaskId::new(0), None);
        assert_eq!(TaskId::new(3), Some(TaskId(3)));
    }

    #[test]
    fn test_task_ref_label_wins_over_number() {
        let tasks = table(&["buy milk", "2"]);
        assert_eq!(TaskRef::from_arg("2", &tasks), TaskRef::Label("2".into()));
        assert_eq!(TaskRef::from_arg("1", &tasks), TaskRef::Id(1));
        assert_eq!(
            TaskRef::from_arg("buy milk", &tasks),
            TaskRef::Label("buy milk".into())
        );
        assert_eq!(
            TaskRef::from_arg("nope", &tasks),
            TaskRef::Label("nope".into())
        );
    }

    #[test]
    fn test_task_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&vec![TaskId(1), TaskId(4)]).unwrap();
        assert_eq!(json, "[1,4]");
    }
}
