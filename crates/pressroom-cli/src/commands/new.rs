use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use pressroom_config::FileFormat;
use pressroom_core::TableDef;
use pressroom_loader::load_config;
use serde_json::Value;

/// Overrides where the `$schema` of new model files points to.
const SCHEMA_BASE_URL_ENV: &str = "PRESSROOM_SCHEMA_BASE_URL";
const DEFAULT_SCHEMA_BASE_URL: &str =
    "https://raw.githubusercontent.com/pressroom-dev/pressroom/refs/heads/main/schemas";

pub fn cmd_new(name: String, format: Option<FileFormat>) -> Result<()> {
    let config = load_config()?;
    let format = format.unwrap_or_else(|| config.model_format());
    let dir = config.models_dir();
    if !dir.exists() {
        fs::create_dir_all(dir).context("create models directory")?;
    }

    let path = dir.join(format!("{name}.{}", format.extension()));
    if path.exists() {
        bail!("model file already exists: {}", path.display());
    }

    let table = TableDef::new(name, Vec::new());
    let schema_url = schema_url();
    if format.is_yaml() {
        write_yaml(&path, &table, &schema_url)?;
    } else {
        write_json_with_schema(&path, &table, &schema_url)?;
    }

    println!(
        "{} {}",
        "Created model template:".bright_green().bold(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

fn schema_url() -> String {
    let base = std::env::var(SCHEMA_BASE_URL_ENV).ok();
    let base = base.as_deref().unwrap_or(DEFAULT_SCHEMA_BASE_URL);
    format!("{}/model.schema.json", base.trim_end_matches('/'))
}

fn write_json_with_schema(path: &Path, table: &TableDef, schema_url: &str) -> Result<()> {
    let mut value = serde_json::to_value(table).context("serialize table to json")?;
    if let Value::Object(ref mut map) = value {
        map.insert("$schema".to_string(), Value::String(schema_url.to_string()));
    }
    let text = serde_json::to_string_pretty(&value).context("stringify json with schema")?;
    fs::write(path, text).with_context(|| format!("write file: {}", path.display()))?;
    Ok(())
}

fn write_yaml(path: &Path, table: &TableDef, schema_url: &str) -> Result<()> {
    let mut value = serde_yaml::to_value(table).context("serialize table to yaml value")?;
    if let serde_yaml::Value::Mapping(ref mut map) = value {
        map.insert(
            serde_yaml::Value::String("$schema".to_string()),
            serde_yaml::Value::String(schema_url.to_string()),
        );
    }
    let text = serde_yaml::to_string(&value).context("serialize yaml with schema")?;
    fs::write(path, text).with_context(|| format!("write file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{CwdGuard, write_config};
    use pressroom_config::PressroomConfig;
    use pressroom_loader::parse_model;
    use rstest::rstest;
    use tempfile::tempdir;

    fn config_with(model_format: FileFormat) -> PressroomConfig {
        PressroomConfig {
            model_format,
            ..PressroomConfig::default()
        }
    }

    #[test]
    #[serial_test::serial]
    fn cmd_new_creates_json_with_schema() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&config_with(FileFormat::Json));

        cmd_new("tag".into(), None).unwrap();

        let path = PressroomConfig::default().models_dir().join("tag.json");
        let text = fs::read_to_string(path).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.get("$schema"), Some(&Value::String(schema_url())));
        assert_eq!(value.get("name"), Some(&Value::String("tag".into())));

        let table = parse_model(&text, FileFormat::Json).unwrap();
        assert!(table.columns.is_empty());
    }

    #[rstest]
    #[case(FileFormat::Yaml)]
    #[case(FileFormat::Yml)]
    #[serial_test::serial]
    fn cmd_new_uses_config_yaml_format(#[case] format: FileFormat) {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&config_with(format));

        cmd_new("tag".into(), None).unwrap();

        let path = PressroomConfig::default()
            .models_dir()
            .join(format!("tag.{}", format.extension()));
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("$schema"));
        let table = parse_model(&text, format).unwrap();
        assert_eq!(table.name, "tag");
    }

    #[test]
    #[serial_test::serial]
    fn explicit_format_wins_over_config() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&config_with(FileFormat::Json));

        cmd_new("tag".into(), Some(FileFormat::Yaml)).unwrap();

        assert!(Path::new("models/tag.yaml").exists());
        assert!(!Path::new("models/tag.json").exists());
    }

    #[test]
    #[serial_test::serial]
    fn cmd_new_refuses_to_overwrite() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&PressroomConfig::default());

        cmd_new("tag".into(), None).unwrap();
        let err = cmd_new("tag".into(), None).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    #[serial_test::serial]
    fn cmd_new_requires_config() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());

        let err = cmd_new("tag".into(), None).unwrap_err();
        assert!(err.to_string().contains("pressroom init"));
    }
}
