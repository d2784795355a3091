use sea_query::{Alias, ForeignKey, Index, Table, TableCreateStatement};

use pressroom_core::{TableConstraint, TableDef};
use pressroom_naming::build_foreign_key_name;

use super::add_index::build_add_index;
use super::helpers::{
    build_create_enum_type_sql, build_schema_statement, build_sea_column_def, to_sea_fk_action,
};
use super::types::{BuiltQuery, DatabaseBackend, RawSql};
use crate::error::QueryError;

fn build_create_table_for_backend(backend: DatabaseBackend, table: &TableDef) -> TableCreateStatement {
    let mut stmt = Table::create().table(Alias::new(&table.name)).to_owned();

    // A single auto-increment key column is declared inline so every backend
    // attaches its serial/AUTOINCREMENT behaviour to it.
    let inline_pk = table.constraints.iter().find_map(|c| match c {
        TableConstraint::PrimaryKey {
            auto_increment: true,
            columns,
        } if columns.len() == 1 => Some(columns[0].as_str()),
        _ => None,
    });

    for column in &table.columns {
        let mut col = build_sea_column_def(backend, &table.name, column);
        if inline_pk == Some(column.name.as_str()) {
            col.primary_key().auto_increment();
        }
        stmt.col(col);
    }

    for constraint in &table.constraints {
        match constraint {
            TableConstraint::PrimaryKey { columns, .. } => {
                if inline_pk.is_some() {
                    continue;
                }
                let mut pk_idx = Index::create();
                for c in columns {
                    pk_idx.col(Alias::new(c));
                }
                stmt.primary_key(&mut pk_idx);
            }
            TableConstraint::ForeignKey {
                name,
                columns,
                ref_table,
                ref_columns,
                on_delete,
                on_update,
            } => {
                let mut fk = ForeignKey::create();
                fk.name(build_foreign_key_name(&table.name, columns, name.as_deref()))
                    .from_tbl(Alias::new(&table.name))
                    .to_tbl(Alias::new(ref_table));
                for col in columns {
                    fk.from_col(Alias::new(col));
                }
                for col in ref_columns {
                    fk.to_col(Alias::new(col));
                }
                if let Some(action) = on_delete {
                    fk.on_delete(to_sea_fk_action(*action));
                }
                if let Some(action) = on_update {
                    fk.on_update(to_sea_fk_action(*action));
                }
                stmt.foreign_key(&mut fk);
            }
            // Unique/index become CREATE INDEX statements, checks are
            // spliced into the rendered SQL by `build_create_table`.
            TableConstraint::Check { .. }
            | TableConstraint::Unique { .. }
            | TableConstraint::Index { .. } => {}
        }
    }

    stmt
}

/// Insert extra table constraints before the closing parenthesis of a
/// rendered `CREATE TABLE`.
fn append_table_constraints(sql: String, constraints: &[String]) -> String {
    match sql.rfind(')') {
        Some(pos) => format!(
            "{}, {} {}",
            sql[..pos].trim_end(),
            constraints.join(", "),
            &sql[pos..]
        ),
        None => sql,
    }
}

/// DDL for one table: PostgreSQL enum types, `CREATE TABLE`, then one
/// `CREATE UNIQUE INDEX` per unique constraint and one `CREATE INDEX` per
/// index constraint.
///
/// The table is normalized first, so inline shorthands are honoured.
/// Statements that do not apply to `backend` are left out.
pub fn build_create_table(
    backend: DatabaseBackend,
    table: &TableDef,
) -> Result<Vec<BuiltQuery>, QueryError> {
    let table = table.normalize()?;
    let mut queries = Vec::new();

    if backend == DatabaseBackend::Postgres {
        for column in &table.columns {
            if let Some(raw) = build_create_enum_type_sql(&table.name, &column.r#type) {
                queries.push(BuiltQuery::Raw(raw));
            }
        }
    }

    let stmt = build_create_table_for_backend(backend, &table);
    let checks: Vec<String> = table
        .constraints
        .iter()
        .filter_map(|c| match c {
            TableConstraint::Check { name, expr } => {
                Some(format!("CONSTRAINT \"{}\" CHECK ({})", name, expr))
            }
            _ => None,
        })
        .collect();
    if checks.is_empty() {
        queries.push(BuiltQuery::CreateTable(Box::new(stmt)));
    } else {
        let splice = |b| append_table_constraints(build_schema_statement(&stmt, b), &checks);
        queries.push(BuiltQuery::Raw(RawSql::per_backend(
            splice(DatabaseBackend::Postgres),
            splice(DatabaseBackend::MySql),
            splice(DatabaseBackend::Sqlite),
        )));
    }

    for constraint in &table.constraints {
        match constraint {
            TableConstraint::Unique { name, columns } => {
                queries.push(build_add_index(&table.name, name.as_deref(), columns, true));
            }
            TableConstraint::Index { name, columns } => {
                queries.push(build_add_index(&table.name, name.as_deref(), columns, false));
            }
            _ => {}
        }
    }

    Ok(queries)
}
