use crate::sql::helpers::build_schema_statement;

/// Database backend for SQL generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    MySql,
    Sqlite,
}

/// A statement that renders to SQL for any backend.
#[derive(Debug, Clone)]
pub enum BuiltQuery {
    CreateTable(Box<sea_query::TableCreateStatement>),
    CreateIndex(Box<sea_query::IndexCreateStatement>),
    Raw(RawSql),
}

/// Raw SQL with a variant per backend. An empty variant means the
/// statement does not apply to that backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSql {
    pub postgres: String,
    pub mysql: String,
    pub sqlite: String,
}

impl RawSql {
    /// Same SQL for all backends
    pub fn uniform(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            postgres: sql.clone(),
            mysql: sql.clone(),
            sqlite: sql,
        }
    }

    pub fn per_backend(
        postgres: impl Into<String>,
        mysql: impl Into<String>,
        sqlite: impl Into<String>,
    ) -> Self {
        Self {
            postgres: postgres.into(),
            mysql: mysql.into(),
            sqlite: sqlite.into(),
        }
    }

    pub fn postgres_only(sql: impl Into<String>) -> Self {
        Self::per_backend(sql, String::new(), String::new())
    }

    fn for_backend(&self, backend: DatabaseBackend) -> &str {
        match backend {
            DatabaseBackend::Postgres => &self.postgres,
            DatabaseBackend::MySql => &self.mysql,
            DatabaseBackend::Sqlite => &self.sqlite,
        }
    }
}

impl BuiltQuery {
    /// Build SQL string for the specified database backend
    pub fn build(&self, backend: DatabaseBackend) -> String {
        match self {
            BuiltQuery::CreateTable(stmt) => build_schema_statement(stmt.as_ref(), backend),
            BuiltQuery::CreateIndex(stmt) => build_schema_statement(stmt.as_ref(), backend),
            BuiltQuery::Raw(raw) => raw.for_backend(backend).to_string(),
        }
    }

    /// Whether the statement produces any SQL on `backend`.
    pub fn applies_to(&self, backend: DatabaseBackend) -> bool {
        match self {
            BuiltQuery::Raw(raw) => !raw.for_backend(backend).is_empty(),
            _ => true,
        }
    }
}
