use pressroom_core::TableDef;
use pressroom_query::{DatabaseBackend, QueryError, build_schema_sql};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Statement, TransactionTrait};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("failed to execute `{sql}`: {source}")]
    Execute {
        sql: String,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// DDL dialect for a SeaORM backend. Backends without a dialect of their
/// own get PostgreSQL syntax.
#[allow(unreachable_patterns)]
pub fn query_backend(backend: sea_orm::DatabaseBackend) -> DatabaseBackend {
    match backend {
        sea_orm::DatabaseBackend::Postgres => DatabaseBackend::Postgres,
        sea_orm::DatabaseBackend::MySql => DatabaseBackend::MySql,
        sea_orm::DatabaseBackend::Sqlite => DatabaseBackend::Sqlite,
        _ => DatabaseBackend::Postgres,
    }
}

/// Create every table of `tables` (with its enum types and indexes) on `db`.
///
/// Tables are created in foreign key order inside one transaction. On
/// backends with transactional DDL a failing statement leaves nothing
/// behind; MySQL commits each statement on its own.
pub async fn install_schema(db: &DatabaseConnection, tables: &[TableDef]) -> Result<(), InstallError> {
    let backend = db.get_database_backend();
    let statements = build_schema_sql(query_backend(backend), tables)?;

    let txn = db.begin().await?;
    for sql in &statements {
        tracing::debug!(%sql, "executing schema statement");
        txn.execute_raw(Statement::from_string(backend, sql.clone()))
            .await
            .map_err(|source| InstallError::Execute {
                sql: sql.clone(),
                source,
            })?;
    }
    txn.commit().await?;

    tracing::info!(
        tables = tables.len(),
        statements = statements.len(),
        "schema installed"
    );
    Ok(())
}

/// Install the pressroom data model.
pub async fn install_models(db: &DatabaseConnection) -> Result<(), InstallError> {
    install_schema(db, &pressroom_models::tables()).await
}
