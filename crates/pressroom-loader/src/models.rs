use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pressroom_config::{FileFormat, PressroomConfig};
use pressroom_core::{TableDef, validate_schema};

/// Load, normalize and validate every model under the configured models
/// directory. A missing directory yields no models.
pub fn load_models(config: &PressroomConfig) -> Result<Vec<TableDef>> {
    load_models_from_dir(config.models_dir())
}

/// Load, normalize and validate every `.json` / `.yaml` / `.yml` model file
/// below `dir`, sorted by table name.
pub fn load_models_from_dir(dir: &Path) -> Result<Vec<TableDef>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut tables = Vec::new();
    load_models_recursive(dir, &mut tables)?;

    let mut normalized = tables
        .iter()
        .map(|t| {
            t.normalize()
                .with_context(|| format!("normalize table '{}'", t.name))
        })
        .collect::<Result<Vec<_>>>()?;
    normalized.sort_by(|a, b| a.name.cmp(&b.name));

    validate_schema(&normalized).context("schema validation failed")?;
    Ok(normalized)
}

/// Parse one model document. `$schema` and other unknown keys are ignored.
pub fn parse_model(content: &str, format: FileFormat) -> Result<TableDef> {
    if format.is_yaml() {
        serde_yaml::from_str(content).context("parse YAML model")
    } else {
        serde_json::from_str(content).context("parse JSON model")
    }
}

fn load_models_recursive(dir: &Path, tables: &mut Vec<TableDef>) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read models directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry.context("read directory entry")?;
        let path = entry.path();

        if path.is_dir() {
            load_models_recursive(&path, tables)?;
            continue;
        }

        let format = path
            .extension()
            .and_then(|s| s.to_str())
            .and_then(FileFormat::from_extension);
        let Some(format) = format else {
            continue;
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("read model file: {}", path.display()))?;
        let table = parse_model(&content, format)
            .with_context(|| format!("load model file: {}", path.display()))?;
        tables.push(table);
    }

    Ok(())
}
