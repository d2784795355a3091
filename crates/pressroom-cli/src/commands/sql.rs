use anyhow::{Context, Result};
use colored::Colorize;
use pressroom_config::SqlBackend;
use pressroom_core::TableDef;
use pressroom_loader::{load_config, load_models};
use pressroom_query::{DatabaseBackend, build_schema_sql};

pub fn cmd_sql(backend: Option<SqlBackend>) -> Result<()> {
    let config = load_config()?;
    let backend = backend.unwrap_or_else(|| config.backend());
    let models = load_models(&config)?;

    let statements = render_sql(backend, &models)?;
    emit_sql(backend, &statements);
    Ok(())
}

pub(crate) fn to_database_backend(backend: SqlBackend) -> DatabaseBackend {
    match backend {
        SqlBackend::Postgres => DatabaseBackend::Postgres,
        SqlBackend::Mysql => DatabaseBackend::MySql,
        SqlBackend::Sqlite => DatabaseBackend::Sqlite,
    }
}

fn render_sql(backend: SqlBackend, models: &[TableDef]) -> Result<Vec<String>> {
    build_schema_sql(to_database_backend(backend), models)
        .with_context(|| format!("build {} DDL", backend))
}

fn emit_sql(backend: SqlBackend, statements: &[String]) {
    if statements.is_empty() {
        println!("{}", "No models found; no SQL to emit.".bright_yellow());
        return;
    }

    println!(
        "{} {}",
        "Backend:".bright_cyan().bold(),
        backend.to_string().bright_magenta()
    );
    println!(
        "{} {}",
        "SQL statements:".bright_cyan().bold(),
        statements.len().to_string().bright_yellow().bold()
    );
    println!();

    for (i, sql) in statements.iter().enumerate() {
        println!(
            "{}. {};",
            (i + 1).to_string().bright_magenta().bold(),
            sql.trim().bright_white()
        );
    }
}
