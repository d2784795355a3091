use serde::{Deserialize, Serialize};

/// SQL dialect the generated DDL targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum SqlBackend {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

impl SqlBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            SqlBackend::Postgres => "postgres",
            SqlBackend::Mysql => "mysql",
            SqlBackend::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for SqlBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
