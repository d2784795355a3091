use std::collections::HashSet;

use pressroom_core::TableDef;

use crate::error::QueryError;
use crate::sql::{BuiltQuery, DatabaseBackend, build_create_table};

/// Order tables so every table comes after the tables its foreign keys
/// reference. Ties keep the input order; self-references are ignored.
pub fn sort_by_dependencies(tables: &[TableDef]) -> Result<Vec<TableDef>, QueryError> {
    let normalized = tables
        .iter()
        .map(TableDef::normalize)
        .collect::<Result<Vec<_>, _>>()?;

    let known: HashSet<&str> = normalized.iter().map(|t| t.name.as_str()).collect();
    let mut deps: Vec<Vec<&str>> = Vec::with_capacity(normalized.len());
    for table in &normalized {
        let mut table_deps = Vec::new();
        for fk in table.foreign_keys() {
            if fk.ref_table == table.name {
                continue;
            }
            if !known.contains(fk.ref_table) {
                return Err(QueryError::UnknownReferencedTable {
                    table: table.name.clone(),
                    ref_table: fk.ref_table.to_string(),
                });
            }
            table_deps.push(fk.ref_table);
        }
        deps.push(table_deps);
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut order: Vec<usize> = Vec::with_capacity(normalized.len());
    while order.len() < normalized.len() {
        let next = (0..normalized.len()).find(|&i| {
            !emitted.contains(normalized[i].name.as_str())
                && deps[i].iter().all(|d| emitted.contains(d))
        });
        match next {
            Some(i) => {
                emitted.insert(normalized[i].name.as_str());
                order.push(i);
            }
            None => {
                let tables = normalized
                    .iter()
                    .filter(|t| !emitted.contains(t.name.as_str()))
                    .map(|t| t.name.clone())
                    .collect();
                return Err(QueryError::CyclicDependency { tables });
            }
        }
    }

    Ok(order.into_iter().map(|i| normalized[i].clone()).collect())
}

/// DDL for a whole schema, tables in dependency order.
pub fn build_schema_queries(
    backend: DatabaseBackend,
    tables: &[TableDef],
) -> Result<Vec<BuiltQuery>, QueryError> {
    let mut queries = Vec::new();
    for table in sort_by_dependencies(tables)? {
        queries.extend(
            build_create_table(backend, &table)?
                .into_iter()
                .filter(|q| q.applies_to(backend)),
        );
    }
    Ok(queries)
}

/// Rendered statements of [`build_schema_queries`], without trailing `;`.
pub fn build_schema_sql(
    backend: DatabaseBackend,
    tables: &[TableDef],
) -> Result<Vec<String>, QueryError> {
    Ok(build_schema_queries(backend, tables)?
        .iter()
        .map(|q| q.build(backend))
        .collect())
}
