use indexmap::IndexMap;
use std::collections::BTreeSet;

use super::task::{TaskId, TaskTable};

/// Section name → member task ids, in section order
pub type Sections = IndexMap<String, Vec<TaskId>>;

/// One project: its tasks, named sections over those tasks, and the set of
/// tasks marked done.
///
/// Every id in `sections` and `checked` must be a key of `tasks`, and the keys
/// of `tasks` are always `1..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub tasks: TaskTable,
    pub sections: Sections,
    pub checked: BTreeSet<TaskId>,
}

impl Project {
    pub fn new() -> Self {
        Project::default()
    }

    /// Number of tasks (`N`)
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Label of the task at `id`
    pub fn label(&self, id: TaskId) -> Option<&str> {
        self.tasks.get(&id).map(|s| s.as_str())
    }

    /// Id of the task with exactly this label
    pub fn id_of(&self, label: &str) -> Option<TaskId> {
        self.tasks
            .iter()
            .find(|(_, l)| l.as_str() == label)
            .map(|(id, _)| *id)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.id_of(label).is_some()
    }

    pub fn is_checked(&self, id: TaskId) -> bool {
        self.checked.contains(&id)
    }

    /// Name of the first section holding `id`
    pub fn section_of(&self, id: TaskId) -> Option<&str> {
        self.sections
            .iter()
            .find(|(_, ids)| ids.contains(&id))
            .map(|(name, _)| name.as_str())
    }

    /// Tasks that belong to no section, in id order
    pub fn unsectioned(&self) -> Vec<TaskId> {
        self.tasks
            .keys()
            .copied()
            .filter(|id| !self.sections.values().any(|ids| ids.contains(id)))
            .collect()
    }

    /// The id the next appended task will get
    pub fn next_id(&self) -> TaskId {
        TaskId(self.tasks.len() as u32 + 1)
    }
}
