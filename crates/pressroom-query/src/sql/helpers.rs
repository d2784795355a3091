use sea_query::{
    Alias, ColumnDef as SeaColumnDef, ForeignKeyAction, MysqlQueryBuilder, PostgresQueryBuilder,
    SchemaStatementBuilder, SimpleExpr, SqliteQueryBuilder,
};

use pressroom_core::{
    ColumnDef, ColumnType, ComplexColumnType, DefaultValue, ReferenceAction, SimpleColumnType,
};
use pressroom_naming::{build_check_constraint_name, build_enum_type_name};

use super::types::{DatabaseBackend, RawSql};

/// Render a schema statement for a specific backend
pub fn build_schema_statement<T: SchemaStatementBuilder>(
    stmt: &T,
    backend: DatabaseBackend,
) -> String {
    match backend {
        DatabaseBackend::Postgres => stmt.to_string(PostgresQueryBuilder),
        DatabaseBackend::MySql => stmt.to_string(MysqlQueryBuilder),
        DatabaseBackend::Sqlite => stmt.to_string(SqliteQueryBuilder),
    }
}

/// Apply a pressroom column type to a sea_query column.
///
/// Enum columns need the owning table: PostgreSQL refers to the
/// table-prefixed type created by [`build_create_enum_type_sql`], MySQL
/// declares the literals inline and SQLite stores text (see
/// [`build_sqlite_enum_check`]).
pub fn apply_column_type(
    col: &mut SeaColumnDef,
    ty: &ColumnType,
    backend: DatabaseBackend,
    table: &str,
) {
    match ty {
        ColumnType::Simple(simple) => match simple {
            SimpleColumnType::SmallInt => {
                col.small_integer();
            }
            SimpleColumnType::Integer => {
                col.integer();
            }
            SimpleColumnType::BigInt => {
                col.big_integer();
            }
            SimpleColumnType::Real => {
                col.float();
            }
            SimpleColumnType::DoublePrecision => {
                col.double();
            }
            SimpleColumnType::Text => {
                col.text();
            }
            SimpleColumnType::Boolean => {
                col.boolean();
            }
            SimpleColumnType::Date => {
                col.date();
            }
            SimpleColumnType::Time => {
                col.time();
            }
            SimpleColumnType::Timestamp => {
                col.timestamp();
            }
            SimpleColumnType::Timestamptz => {
                col.timestamp_with_time_zone();
            }
            SimpleColumnType::Bytea => {
                col.binary();
            }
            SimpleColumnType::Uuid => {
                col.uuid();
            }
            SimpleColumnType::Json => {
                col.json();
            }
        },
        ColumnType::Complex(complex) => match complex {
            ComplexColumnType::Varchar { length } => {
                col.string_len(*length);
            }
            ComplexColumnType::Numeric { precision, scale } => {
                col.decimal_len(*precision, *scale);
            }
            ComplexColumnType::Char { length } => {
                col.char_len(*length);
            }
            ComplexColumnType::Custom { custom_type } => {
                col.custom(Alias::new(custom_type));
            }
            ComplexColumnType::Enum { name, values } => match backend {
                DatabaseBackend::Sqlite => {
                    col.text();
                }
                DatabaseBackend::Postgres | DatabaseBackend::MySql => {
                    col.enumeration(
                        Alias::new(build_enum_type_name(table, name)),
                        values.iter().map(Alias::new).collect::<Vec<Alias>>(),
                    );
                }
            },
        },
    }
}

/// Convert a pressroom ReferenceAction to sea_query ForeignKeyAction
pub fn to_sea_fk_action(action: ReferenceAction) -> ForeignKeyAction {
    match action {
        ReferenceAction::Cascade => ForeignKeyAction::Cascade,
        ReferenceAction::Restrict => ForeignKeyAction::Restrict,
        ReferenceAction::SetNull => ForeignKeyAction::SetNull,
        ReferenceAction::SetDefault => ForeignKeyAction::SetDefault,
        ReferenceAction::NoAction => ForeignKeyAction::NoAction,
    }
}

/// Translate a default expression into the backend's spelling.
pub fn convert_default_for_backend(default: &str, backend: DatabaseBackend) -> String {
    match default.trim() {
        "gen_random_uuid()" => match backend {
            DatabaseBackend::Postgres => "gen_random_uuid()".to_string(),
            DatabaseBackend::MySql => "(UUID())".to_string(),
            DatabaseBackend::Sqlite => "(lower(hex(randomblob(16))))".to_string(),
        },
        "current_timestamp()" | "now()" | "CURRENT_TIMESTAMP" => "CURRENT_TIMESTAMP".to_string(),
        other => other.to_string(),
    }
}

fn default_sql(default: &DefaultValue, backend: DatabaseBackend) -> String {
    match default {
        DefaultValue::Str(s) => convert_default_for_backend(s, backend),
        other => other.to_sql(),
    }
}

/// Build a sea_query column (type, `NOT NULL`, default) for `table`.
pub fn build_sea_column_def(
    backend: DatabaseBackend,
    table: &str,
    column: &ColumnDef,
) -> SeaColumnDef {
    let mut col = SeaColumnDef::new(Alias::new(&column.name));
    apply_column_type(&mut col, &column.r#type, backend, table);

    if !column.nullable {
        col.not_null();
    }

    if let Some(default) = &column.default {
        let converted = default_sql(default, backend);
        col.default(Into::<SimpleExpr>::into(sea_query::Expr::cust(converted)));
    }

    if backend == DatabaseBackend::Sqlite {
        if let Some(check) = build_sqlite_enum_check(table, column) {
            col.extra(check);
        }
    }

    col
}

fn quote_literals(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CREATE TYPE ... AS ENUM` for an enum column. PostgreSQL only; the other
/// variants are empty.
pub fn build_create_enum_type_sql(table: &str, column_type: &ColumnType) -> Option<RawSql> {
    let ColumnType::Complex(ComplexColumnType::Enum { name, values }) = column_type else {
        return None;
    };
    Some(RawSql::postgres_only(format!(
        "CREATE TYPE \"{}\" AS ENUM ({})",
        build_enum_type_name(table, name),
        quote_literals(values)
    )))
}

/// Inline column constraint restricting an enum column to its literals on
/// SQLite: `CONSTRAINT "chk_{table}__{col}" CHECK ("col" IN (...))`.
pub fn build_sqlite_enum_check(table: &str, column: &ColumnDef) -> Option<String> {
    let values = column.r#type.enum_values()?;
    Some(format!(
        "CONSTRAINT \"{}\" CHECK (\"{}\" IN ({}))",
        build_check_constraint_name(table, &column.name),
        column.name,
        quote_literals(values)
    ))
}
