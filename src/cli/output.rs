use serde::Serialize;

use crate::model::view::{ProjectView, TaskView};
use crate::ops::archive::ArchiveReport;
use crate::ops::integrity::{IntegrityReport, Violation, Warning};
use crate::ops::project_ops::MovedTask;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskIdJson {
    pub project: String,
    pub id: u32,
    pub label: String,
}

#[derive(Serialize)]
pub struct RemovedJson {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub removed: Vec<String>,
}

#[derive(Serialize)]
pub struct MovedJson {
    pub label: String,
    pub from_project: String,
    pub from_id: u32,
    pub to_project: String,
    pub to_id: u32,
}

#[derive(Serialize)]
pub struct CheckedJson {
    pub project: String,
    pub ids: Vec<u32>,
}

#[derive(Serialize)]
pub struct ProjectJson {
    pub project: String,
}

#[derive(Serialize)]
pub struct SectionJson {
    pub project: String,
    pub section: String,
}

/// Old and new name of a renamed project, or of a section when `project` is set.
#[derive(Serialize)]
pub struct RenamedJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub from: String,
    pub to: String,
}

/// Tasks placed into a section, or taken out of all sections when `section` is null.
#[derive(Serialize)]
pub struct SectionedJson {
    pub project: String,
    pub section: Option<String>,
    pub ids: Vec<u32>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn archive_to_json(report: &ArchiveReport, section: Option<&str>) -> RemovedJson {
    RemovedJson {
        project: report.project.clone(),
        section: section.map(str::to_string),
        removed: report.removed.clone(),
    }
}

pub fn moved_to_json(moved: &MovedTask, from_project: &str, to_project: &str) -> MovedJson {
    MovedJson {
        label: moved.label.clone(),
        from_project: from_project.to_string(),
        from_id: moved.from.get(),
        to_project: to_project.to_string(),
        to_id: moved.to.get(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn format_task(task: &TaskView, indent: &str) -> String {
    let mark = if task.checked { "x" } else { " " };
    format!("{}{}. [{}] {}", indent, task.id, mark, task.label)
}

/// Render one project: unsectioned tasks first, then each section under a
/// `# name` heading.
pub fn format_project(view: &ProjectView) -> Vec<String> {
    let mut lines = vec![view.name.clone()];
    for task in &view.tasks {
        lines.push(format_task(task, "  "));
    }
    for section in &view.sections {
        lines.push(format!("  # {}", section.name));
        for task in &section.tasks {
            lines.push(format_task(task, "    "));
        }
    }
    if lines.len() == 1 {
        lines.push("  (no tasks)".to_string());
    }
    lines
}

/// Render every project, separated by blank lines.
pub fn format_store(views: &[ProjectView]) -> Vec<String> {
    if views.is_empty() {
        return vec!["no projects".to_string()];
    }
    let mut lines = Vec::new();
    for (i, view) in views.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(format_project(view));
    }
    lines
}

pub fn format_archive(reports: &[ArchiveReport]) -> Vec<String> {
    reports
        .iter()
        .map(|r| {
            let noun = if r.removed.len() == 1 { "task" } else { "tasks" };
            format!("{}: archived {} {}", r.project, r.removed.len(), noun)
        })
        .collect()
}

pub fn format_integrity(report: &IntegrityReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.errors.is_empty() {
        lines.push("Errors:".to_string());
        for err in &report.errors {
            lines.push(format!("  [{}] {}", violation_project(err), err));
        }
    }
    if !report.warnings.is_empty() {
        if !report.errors.is_empty() {
            lines.push(String::new());
        }
        lines.push("Warnings:".to_string());
        for warn in &report.warnings {
            match warn {
                Warning::MultipleSections {
                    project,
                    task_id,
                    sections,
                } => lines.push(format!(
                    "  [{}] task #{} is in sections: {}",
                    project,
                    task_id,
                    sections.join(", ")
                )),
                Warning::ProjectName { project } => lines.push(format!(
                    "  [{}] project name would be refused by create",
                    project
                )),
            }
        }
    }
    if report.valid {
        lines.push("store is valid".to_string());
    } else {
        lines.push("store has errors".to_string());
    }
    lines
}

fn violation_project(v: &Violation) -> &str {
    match v {
        Violation::IdGap { project, .. }
        | Violation::DanglingSectionRef { project, .. }
        | Violation::DanglingCheck { project, .. }
        | Violation::DuplicateLabel { project, .. }
        | Violation::EmptyLabel { project, .. }
        | Violation::RepeatedInSection { project, .. } => project,
    }
}
