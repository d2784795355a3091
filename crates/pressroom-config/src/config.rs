use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{backend::SqlBackend, file_format::FileFormat};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pressroom.json";

/// SeaORM-specific export configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct SeaOrmConfig {
    /// Additional derive macros added to generated enum types.
    #[serde(default)]
    pub extra_enum_derives: Vec<String>,
    /// Additional derive macros added to generated `Model` structs.
    #[serde(default)]
    pub extra_model_derives: Vec<String>,
}

impl SeaOrmConfig {
    pub fn extra_enum_derives(&self) -> &[String] {
        &self.extra_enum_derives
    }

    pub fn extra_model_derives(&self) -> &[String] {
        &self.extra_model_derives
    }
}

/// Top-level pressroom configuration (`pressroom.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PressroomConfig {
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
    #[serde(default)]
    pub model_format: FileFormat,
    /// Output directory for generated ORM models.
    #[serde(default = "default_model_export_dir")]
    pub model_export_dir: PathBuf,
    /// Dialect used by `pressroom sql` when none is given.
    #[serde(default)]
    pub backend: SqlBackend,
    #[serde(default)]
    pub seaorm: SeaOrmConfig,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_model_export_dir() -> PathBuf {
    PathBuf::from("src/models")
}

impl Default for PressroomConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            model_format: FileFormat::default(),
            model_export_dir: default_model_export_dir(),
            backend: SqlBackend::default(),
            seaorm: SeaOrmConfig::default(),
        }
    }
}

impl PressroomConfig {
    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn model_format(&self) -> FileFormat {
        self.model_format
    }

    pub fn model_export_dir(&self) -> &Path {
        &self.model_export_dir
    }

    pub fn backend(&self) -> SqlBackend {
        self.backend
    }

    pub fn seaorm(&self) -> &SeaOrmConfig {
        &self.seaorm
    }
}
