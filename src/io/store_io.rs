use std::fs;
use std::path::{Path, PathBuf};

use crate::io::lock::LockError;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::store::Store;
use crate::parse::{SchemaError, parse_store, parse_store_unvalidated, serialize_store};

/// File name of the store document.
pub const STORE_FILE: &str = ".todo";

/// Error type for store I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not a todo directory: no .todo file found here or in any parent")]
    NotARepository,
    #[error("a store already exists at {0}")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source} (contents saved to the recovery log)")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid store: {0}")]
    Schema(#[from] SchemaError),
    #[error("could not serialize store: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not parse .todo.toml: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Find the store by walking up from `start` to the first directory holding
/// a `.todo` file. Returns that directory.
pub fn discover_store(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(STORE_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotARepository);
        }
    }
}

/// Create an empty store in `root`.
pub fn init_store(root: &Path) -> Result<PathBuf, StoreError> {
    let path = root.join(STORE_FILE);
    if path.exists() {
        return Err(StoreError::AlreadyInitialized(path));
    }
    fs::write(&path, "{}\n").map_err(|e| StoreError::Write {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Read and validate the store in `root`.
pub fn load_store(root: &Path) -> Result<Store, StoreError> {
    let text = read_store_text(root)?;
    Ok(parse_store(&text)?)
}

/// Read the store in `root` without checking the numbering invariants.
pub fn load_store_unvalidated(root: &Path) -> Result<Store, StoreError> {
    let text = read_store_text(root)?;
    Ok(parse_store_unvalidated(&text)?)
}

fn read_store_text(root: &Path) -> Result<String, StoreError> {
    let path = root.join(STORE_FILE);
    fs::read_to_string(&path).map_err(|e| StoreError::Read { path, source: e })
}

/// Write the store back atomically. If the write fails, the document that
/// could not be written goes to the recovery log.
pub fn save_store(root: &Path, store: &Store) -> Result<(), StoreError> {
    let path = root.join(STORE_FILE);
    let text = serialize_store(store)?;
    if let Err(e) = atomic_write(&path, text.as_bytes()) {
        log_recovery(
            root,
            RecoveryEntry::new(RecoveryCategory::Write, "store write failed")
                .field("Path", path.display().to_string())
                .field("Error", e.to_string())
                .body(text),
        );
        return Err(StoreError::Write { path, source: e });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::Project;
    use crate::model::task::TaskId;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_load_empty() {
        let tmp = TempDir::new().unwrap();
        init_store(tmp.path()).unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join(STORE_FILE)).unwrap(), "{}\n");
        assert!(load_store(tmp.path()).unwrap().is_empty());

        assert!(matches!(
            init_store(tmp.path()),
            Err(StoreError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn test_discover_walks_up() {
        let tmp = TempDir::new().unwrap();
        init_store(tmp.path()).unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let root = discover_store(&nested).unwrap();
        assert_eq!(root, tmp.path());
    }

    #[test]
    fn test_discover_without_store() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("x");
        fs::create_dir_all(&nested).unwrap();
        // A parent of the temp dir could hold a .todo; only check the
        // error kind when the walk really finds nothing.
        if let Err(e) = discover_store(&nested) {
            assert!(matches!(e, StoreError::NotARepository));
        }
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        init_store(tmp.path()).unwrap();

        let mut project = Project::new();
        project.tasks.insert(TaskId(1), "milk".into());
        project.sections.insert("shop".into(), vec![TaskId(1)]);
        let mut store = Store::new();
        store.commit("home", project);

        save_store(tmp.path(), &store).unwrap();
        assert_eq!(load_store(tmp.path()).unwrap(), store);
    }

    #[test]
    fn test_load_rejects_broken_store() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(STORE_FILE),
            r#"{"home": {"tasks": {"2": "milk"}}}"#,
        )
        .unwrap();
        assert!(matches!(load_store(tmp.path()), Err(StoreError::Schema(_))));
        assert_eq!(load_store_unvalidated(tmp.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_save_reports_write_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("gone");
        let mut store = Store::new();
        store.commit("home", Project::new());

        // The recovery log lands in `missing` too, so it cannot be written;
        // the save still reports the original failure.
        let err = save_store(&missing, &store).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }
}
