use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::project::{Project, Sections};
use crate::model::store::Store;
use crate::model::task::{TaskId, TaskTable};
use crate::ops::integrity::check_project;

/// Error type for documents that are not a valid store
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("malformed store document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("project \"{project}\": {reason}")]
    Invalid { project: String, reason: String },
}

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    tasks: IndexMap<String, String>,
    #[serde(default)]
    sections: RawSections,
    #[serde(default)]
    check: Vec<i64>,
}

/// `{"name": [ids]}`, or the older `[{"name": …, "tasks": [ids]}]`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSections {
    Map(IndexMap<String, Vec<i64>>),
    List(Vec<RawSection>),
}

impl Default for RawSections {
    fn default() -> Self {
        RawSections::Map(IndexMap::new())
    }
}

#[derive(Deserialize)]
struct RawSection {
    name: String,
    #[serde(default)]
    tasks: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a store document and validate every project.
///
/// Any project that breaks id density, references a missing task, or repeats
/// a label fails the whole document.
pub fn parse_store(text: &str) -> Result<Store, SchemaError> {
    let store = parse_store_unvalidated(text)?;
    for (name, project) in store.iter() {
        let report = check_project(name, project);
        if let Some(violation) = report.errors.first() {
            return Err(invalid(name, violation.to_string()));
        }
    }
    Ok(store)
}

/// Parse a store document checking only its shape, for `verify` to report on.
pub fn parse_store_unvalidated(text: &str) -> Result<Store, SchemaError> {
    let raw: IndexMap<String, RawProject> = serde_json::from_str(text)?;

    let mut projects = IndexMap::with_capacity(raw.len());
    for (name, raw_project) in raw {
        let project = convert_project(&name, raw_project)?;
        projects.insert(name, project);
    }
    Ok(Store::from_projects(projects))
}

fn convert_project(name: &str, raw: RawProject) -> Result<Project, SchemaError> {
    let mut tasks = TaskTable::new();
    for (key, label) in raw.tasks {
        let id = key
            .parse::<u32>()
            .ok()
            .and_then(TaskId::new)
            .ok_or_else(|| invalid(name, format!("task key \"{}\" is not a positive integer", key)))?;
        if tasks.insert(id, label).is_some() {
            return Err(invalid(name, format!("task #{} appears twice", id)));
        }
    }

    let mut sections = Sections::new();
    let entries: Vec<(String, Vec<i64>)> = match raw.sections {
        RawSections::Map(map) => map.into_iter().collect(),
        RawSections::List(list) => list.into_iter().map(|s| (s.name, s.tasks)).collect(),
    };
    for (section, ids) in entries {
        let ids = ids
            .into_iter()
            .map(|n| convert_id(name, n))
            .collect::<Result<Vec<_>, _>>()?;
        if sections.insert(section.clone(), ids).is_some() {
            return Err(invalid(name, format!("section \"{}\" appears twice", section)));
        }
    }

    let checked = raw
        .check
        .into_iter()
        .map(|n| convert_id(name, n))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(Project {
        tasks,
        sections,
        checked,
    })
}

fn convert_id(project: &str, n: i64) -> Result<TaskId, SchemaError> {
    u32::try_from(n)
        .ok()
        .and_then(TaskId::new)
        .ok_or_else(|| invalid(project, format!("{} is not a valid task number", n)))
}

fn invalid(project: &str, reason: String) -> SchemaError {
    SchemaError::Invalid {
        project: project.to_string(),
        reason,
    }
}
