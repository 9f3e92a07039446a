use std::fs;
use std::path::Path;

use crate::io::store_io::StoreError;
use crate::model::config::TodoConfig;

/// File name of the optional config, kept next to the store.
pub const CONFIG_FILE: &str = ".todo.toml";

/// Read `.todo.toml` from the store directory. A missing file is the default
/// config.
pub fn load_config(root: &Path) -> Result<TodoConfig, StoreError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(TodoConfig::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| StoreError::Read {
        path: path.clone(),
        source: e,
    })?;
    Ok(toml::from_str(&text)?)
}
