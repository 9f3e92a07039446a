use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::project_ops::{MAX_PROJECT_NAME_LEN, RESERVED_NAMES};
use crate::model::project::Project;
use crate::model::store::Store;

/// Structured result from `todo verify`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub valid: bool,
    pub errors: Vec<Violation>,
    pub warnings: Vec<Warning>,
}

/// A broken invariant. A store containing any of these is refused at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Violation {
    /// Task ids are not exactly `1..=N`
    #[serde(rename = "id_gap")]
    IdGap { project: String, expected: u32, found: u32 },
    /// A section names a task id that does not exist
    #[serde(rename = "dangling_section_ref")]
    DanglingSectionRef {
        project: String,
        section: String,
        task_id: u32,
    },
    /// The checked set names a task id that does not exist
    #[serde(rename = "dangling_check")]
    DanglingCheck { project: String, task_id: u32 },
    /// Two tasks share a label
    #[serde(rename = "duplicate_label")]
    DuplicateLabel {
        project: String,
        label: String,
        task_ids: Vec<u32>,
    },
    #[serde(rename = "empty_label")]
    EmptyLabel { project: String, task_id: u32 },
    /// The same id appears twice in one section
    #[serde(rename = "repeated_in_section")]
    RepeatedInSection {
        project: String,
        section: String,
        task_id: u32,
    },
}

/// Something unusual that the operations still handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// A task is listed in more than one section
    #[serde(rename = "multiple_sections")]
    MultipleSections {
        project: String,
        task_id: u32,
        sections: Vec<String>,
    },
    /// A project name that `create`/`rename` would refuse
    #[serde(rename = "project_name")]
    ProjectName { project: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::IdGap { expected, found, .. } => {
                write!(f, "expected task #{} but found #{}", expected, found)
            }
            Violation::DanglingSectionRef { section, task_id, .. } => {
                write!(f, "section \"{}\" refers to missing task #{}", section, task_id)
            }
            Violation::DanglingCheck { task_id, .. } => {
                write!(f, "checked list refers to missing task #{}", task_id)
            }
            Violation::DuplicateLabel { label, task_ids, .. } => {
                let ids: Vec<String> = task_ids.iter().map(|i| format!("#{}", i)).collect();
                write!(f, "label \"{}\" is used by {}", label, ids.join(", "))
            }
            Violation::EmptyLabel { task_id, .. } => write!(f, "task #{} has an empty label", task_id),
            Violation::RepeatedInSection { section, task_id, .. } => {
                write!(f, "section \"{}\" lists task #{} more than once", section, task_id)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate every project in the store. Read-only.
pub fn check_store(store: &Store) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    for (name, project) in store.iter() {
        check_project_into(name, project, &mut report);
    }
    report.valid = report.errors.is_empty();
    report
}

/// Validate one project. Read-only.
pub fn check_project(name: &str, project: &Project) -> IntegrityReport {
    let mut report = IntegrityReport::default();
    check_project_into(name, project, &mut report);
    report.valid = report.errors.is_empty();
    report
}

fn check_project_into(name: &str, project: &Project, report: &mut IntegrityReport) {
    let owned = || name.to_string();

    if name.is_empty()
        || !name.chars().all(char::is_alphanumeric)
        || RESERVED_NAMES.contains(&name)
        || name.chars().count() > MAX_PROJECT_NAME_LEN
    {
        report.warnings.push(Warning::ProjectName { project: owned() });
    }

    // dense ids
    for (i, id) in project.tasks.keys().enumerate() {
        let expected = i as u32 + 1;
        if id.get() != expected {
            report.errors.push(Violation::IdGap {
                project: owned(),
                expected,
                found: id.get(),
            });
            break;
        }
    }

    // labels
    let mut by_label: HashMap<&str, Vec<u32>> = HashMap::new();
    for (id, label) in &project.tasks {
        if label.is_empty() {
            report.errors.push(Violation::EmptyLabel {
                project: owned(),
                task_id: id.get(),
            });
        }
        by_label.entry(label.as_str()).or_default().push(id.get());
    }
    let mut duplicates: Vec<(&str, Vec<u32>)> = by_label
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .collect();
    duplicates.sort();
    for (label, task_ids) in duplicates {
        report.errors.push(Violation::DuplicateLabel {
            project: owned(),
            label: label.to_string(),
            task_ids,
        });
    }

    // references
    let mut memberships: HashMap<u32, Vec<String>> = HashMap::new();
    for (section, ids) in &project.sections {
        let mut seen = Vec::with_capacity(ids.len());
        for id in ids {
            if !project.tasks.contains_key(id) {
                report.errors.push(Violation::DanglingSectionRef {
                    project: owned(),
                    section: section.clone(),
                    task_id: id.get(),
                });
            }
            if seen.contains(id) {
                report.errors.push(Violation::RepeatedInSection {
                    project: owned(),
                    section: section.clone(),
                    task_id: id.get(),
                });
                continue;
            }
            seen.push(*id);
            memberships.entry(id.get()).or_default().push(section.clone());
        }
    }
    for id in &project.checked {
        if !project.tasks.contains_key(id) {
            report.errors.push(Violation::DanglingCheck {
                project: owned(),
                task_id: id.get(),
            });
        }
    }

    let mut shared: Vec<(u32, Vec<String>)> = memberships
        .into_iter()
        .filter(|(_, sections)| sections.len() > 1)
        .collect();
    shared.sort();
    for (task_id, sections) in shared {
        report.warnings.push(Warning::MultipleSections {
            project: owned(),
            task_id,
            sections,
        });
    }
}
