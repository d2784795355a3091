use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pressroom_config::{CONFIG_FILE_NAME, PressroomConfig};

/// Load `pressroom.json` from the current directory.
pub fn load_config() -> Result<PressroomConfig> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if !path.exists() {
        anyhow::bail!("{} not found. Run 'pressroom init' first.", CONFIG_FILE_NAME);
    }
    read_config(&path)
}

/// Load config from a specific path.
pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<PressroomConfig> {
    let path = path.as_ref();
    if !path.exists() {
        anyhow::bail!("{} not found at: {}", CONFIG_FILE_NAME, path.display());
    }
    read_config(path)
}

/// Load config from the project root (or the current directory), falling
/// back to defaults when there is no config file.
pub fn load_config_or_default(project_root: Option<&Path>) -> Result<PressroomConfig> {
    let path = match project_root {
        Some(root) => root.join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    };

    if path.exists() {
        read_config(&path)
    } else {
        Ok(PressroomConfig::default())
    }
}

fn read_config(path: &Path) -> Result<PressroomConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}
