use sea_query::{Alias, Index};

use pressroom_core::ColumnName;
use pressroom_naming::{build_index_name, build_unique_constraint_name};

use super::types::BuiltQuery;

/// `CREATE [UNIQUE] INDEX` on `table`. Unique indexes are named `uq_...`,
/// plain ones `ix_...`; a given `name` replaces the column list in the name.
pub fn build_add_index(
    table: &str,
    name: Option<&str>,
    columns: &[ColumnName],
    unique: bool,
) -> BuiltQuery {
    let index_name = if unique {
        build_unique_constraint_name(table, columns, name)
    } else {
        build_index_name(table, columns, name)
    };

    let mut stmt = Index::create()
        .name(index_name)
        .table(Alias::new(table))
        .to_owned();

    for col in columns {
        stmt.col(Alias::new(col));
    }

    if unique {
        stmt.unique();
    }

    BuiltQuery::CreateIndex(Box::new(stmt))
}
