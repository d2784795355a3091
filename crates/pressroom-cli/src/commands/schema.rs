use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use pressroom_config::PressroomConfig;
use pressroom_core::TableDef;
use schemars::{Schema, schema_for};

/// Write `model.schema.json` (model files) and `config.schema.json`
/// (`pressroom.json`) into `out`.
pub fn cmd_schema(out: PathBuf) -> Result<()> {
    if !out.exists() {
        fs::create_dir_all(&out).with_context(|| format!("create dir {}", out.display()))?;
    }

    let model_path = out.join("model.schema.json");
    let config_path = out.join("config.schema.json");
    write_schema(&model_path, &schema_for!(TableDef)).context("model schema")?;
    write_schema(&config_path, &schema_for!(PressroomConfig)).context("config schema")?;

    println!("{}", "Wrote schemas:".bright_green().bold());
    println!("  {}", model_path.display().to_string().bright_white());
    println!("  {}", config_path.display().to_string().bright_white());
    Ok(())
}

fn write_schema(path: &Path, schema: &Schema) -> Result<()> {
    let text = serde_json::to_string_pretty(schema).context("serialize schema")?;
    fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
