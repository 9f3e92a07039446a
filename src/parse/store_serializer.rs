use indexmap::IndexMap;
use serde::Serialize;

use crate::model::project::Project;
use crate::model::store::Store;
use crate::model::task::{TaskId, TaskTable};

#[derive(Serialize)]
struct DiskProject<'a> {
    sections: IndexMap<&'a str, &'a [TaskId]>,
    tasks: &'a TaskTable,
    check: Vec<TaskId>,
}

impl<'a> From<&'a Project> for DiskProject<'a> {
    fn from(project: &'a Project) -> Self {
        DiskProject {
            sections: project
                .sections
                .iter()
                .map(|(name, ids)| (name.as_str(), ids.as_slice()))
                .collect(),
            tasks: &project.tasks,
            check: project.checked.iter().copied().collect(),
        }
    }
}

/// Serialize the whole store as the JSON document written to disk.
///
/// Task ids become decimal string keys; section and check lists stay numeric.
pub fn serialize_store(store: &Store) -> Result<String, serde_json::Error> {
    let doc: IndexMap<&str, DiskProject> = store
        .iter()
        .map(|(name, project)| (name, DiskProject::from(project)))
        .collect();
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::store_parser::parse_store;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_reference_shape() {
        let mut p = Project::new();
        p.tasks.insert(TaskId(1), "task1".into());
        p.tasks.insert(TaskId(2), "task2".into());
        p.sections.insert("sect1".into(), vec![TaskId(2), TaskId(1)]);
        p.checked.insert(TaskId(2));
        let mut store = Store::new();
        store.commit("test", p);

        let text = serialize_store(&store).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "test": {
                    "sections": {"sect1": [2, 1]},
                    "tasks": {"1": "task1", "2": "task2"},
                    "check": [2]
                }
            })
        );
    }

    #[test]
    fn test_numeric_key_order_survives_reload() {
        let mut p = Project::new();
        for i in 1..=12u32 {
            p.tasks.insert(TaskId(i), format!("t{}", i));
        }
        let mut store = Store::new();
        store.commit("big", p);

        let text = serialize_store(&store).unwrap();
        assert!(text.find("\"2\"").unwrap() < text.find("\"10\"").unwrap());
        assert_eq!(parse_store(&text).unwrap(), store);
    }
}
