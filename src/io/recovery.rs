use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// File name of the recovery log, kept next to the store.
pub const RECOVERY_LOG: &str = ".todo.recovery.log";

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- todo recovery log: append-only
     Tasks removed by rm, section delete and archive are copied here,
     as is any store content that could not be written.
     Safe to delete. -->

---
";

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    Write,
    Delete,
    Archive,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Write => write!(f, "write"),
            RecoveryCategory::Delete => write!(f, "delete"),
            RecoveryCategory::Archive => write!(f, "archive"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(root: &Path) -> PathBuf {
    root.join(RECOVERY_LOG)
}

// ---------------------------------------------------------------------------
// Atomic file write
// ---------------------------------------------------------------------------

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry formatting
// ---------------------------------------------------------------------------

impl RecoveryEntry {
    pub fn new(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "## {} [{}] {}\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        ));
        out.push('\n');

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push('\n');
            out.push_str("```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push('\n');
        out.push_str("---\n");
        out
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append a recovery entry to the log. Errors are swallowed and printed to stderr.
pub fn log_recovery(root: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(root, entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn log_recovery_inner(root: &Path, entry: RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(root);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

/// Log tasks removed from a project, one label per body line.
pub fn log_task_removal(
    root: &Path,
    category: RecoveryCategory,
    project: &str,
    section: Option<&str>,
    labels: &[String],
) {
    if labels.is_empty() {
        return;
    }
    let noun = if labels.len() == 1 { "task" } else { "tasks" };
    let mut entry = RecoveryEntry::new(category, format!("{} {} removed", labels.len(), noun))
        .field("Project", project);
    if let Some(sect) = section {
        entry = entry.field("Section", sect);
    }
    log_recovery(root, entry.body(labels.join("\n")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_formatting() {
        let entry = RecoveryEntry::new(RecoveryCategory::Delete, "2 tasks removed")
            .field("Project", "home")
            .body("milk\neggs");
        let md = entry.to_markdown();
        assert!(md.starts_with("## "));
        assert!(md.contains("[delete] 2 tasks removed\n"));
        assert!(md.contains("Project: home\n"));
        assert!(md.contains("```text\nmilk\neggs\n```\n"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_log_writes_header_once() {
        let tmp = TempDir::new().unwrap();
        log_task_removal(
            tmp.path(),
            RecoveryCategory::Archive,
            "home",
            None,
            &["a".to_string()],
        );
        log_task_removal(
            tmp.path(),
            RecoveryCategory::Delete,
            "home",
            Some("s1"),
            &["b".to_string(), "c".to_string()],
        );

        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert_eq!(content.matches("<!-- todo recovery log").count(), 1);
        assert!(content.contains("[archive] 1 task removed"));
        assert!(content.contains("[delete] 2 tasks removed"));
        assert!(content.contains("Section: s1\n"));
    }

    #[test]
    fn test_nothing_removed_logs_nothing() {
        let tmp = TempDir::new().unwrap();
        log_task_removal(tmp.path(), RecoveryCategory::Delete, "home", None, &[]);
        assert!(!recovery_log_path(tmp.path()).exists());
    }

    #[test]
    fn test_atomic_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        atomic_write(&path, b"{}\n").unwrap();
        atomic_write(&path, b"{\"a\": {}}\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\": {}}\n");
    }
}
