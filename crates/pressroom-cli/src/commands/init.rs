use std::{fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use pressroom_config::{CONFIG_FILE_NAME, PressroomConfig};

pub fn cmd_init() -> Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }

    let config = PressroomConfig::default();
    let json = serde_json::to_string_pretty(&config).context("serialize default config")?;
    fs::write(&path, json).with_context(|| format!("write {}", CONFIG_FILE_NAME))?;
    tracing::debug!(path = %path.display(), "wrote default config");

    println!(
        "{} {}",
        "Created config:".bright_green().bold(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::CwdGuard;
    use tempfile::tempdir;

    #[test]
    #[serial_test::serial]
    fn cmd_init_creates_config() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init().unwrap();

        let text = fs::read_to_string(CONFIG_FILE_NAME).unwrap();
        let parsed: PressroomConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, PressroomConfig::default());
        assert!(text.contains("modelsDir"));
    }

    #[test]
    #[serial_test::serial]
    fn cmd_init_fails_when_exists() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        cmd_init().unwrap();
        let err = cmd_init().unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
