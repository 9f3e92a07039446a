use std::fs;
use std::path::Path;

use super::CliError;
use crate::io::config_io::CONFIG_FILE;
use crate::io::store_io::{self, StoreError};

const CONFIG_TEMPLATE: &str = r##"# todo configuration. Every key is optional; the values shown are the defaults.

[display]
# leave checked tasks out of `todo show`
# hide_checked = false

[recovery]
# copy deleted and archived tasks to .todo.recovery.log
# log_deletions = true

[lock]
# how long a command waits for another todo process to finish writing
# timeout_ms = 5000
"##;

/// Create `.todo` (and a commented `.todo.toml` if none exists) in `root`.
pub fn cmd_init(root: &Path, json: bool) -> Result<(), CliError> {
    let store_path = store_io::init_store(root)?;

    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        fs::write(&config_path, CONFIG_TEMPLATE).map_err(|e| StoreError::Write {
            path: config_path.clone(),
            source: e,
        })?;
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "store": store_path.display().to_string(),
            }))?
        );
    } else {
        println!("initialized empty store in {}", store_path.display());
    }
    Ok(())
}
