use thiserror::Error;

use crate::schema::TableValidationError;

/// Problems found by [`validate_schema`](crate::validate_schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate table `{0}`")]
    DuplicateTable(String),
    #[error("table `{table}`: duplicate column `{column}`")]
    DuplicateColumn { table: String, column: String },
    #[error("table `{0}` has no primary key")]
    MissingPrimaryKey(String),
    #[error("table `{0}` declares more than one primary key")]
    MultiplePrimaryKeys(String),
    #[error("table `{table}`: primary key column `{column}` is nullable")]
    NullablePrimaryKey { table: String, column: String },
    #[error("table `{table}`: {constraint} constraint has no columns")]
    EmptyConstraintColumns {
        table: String,
        constraint: &'static str,
    },
    #[error("table `{table}`: {constraint} constraint references unknown column `{column}`")]
    UnknownConstraintColumn {
        table: String,
        constraint: &'static str,
        column: String,
    },
    #[error("table `{table}`: foreign key references unknown table `{ref_table}`")]
    UnknownReferencedTable { table: String, ref_table: String },
    #[error("table `{table}`: foreign key references unknown column `{ref_table}.{column}`")]
    UnknownReferencedColumn {
        table: String,
        ref_table: String,
        column: String,
    },
    #[error(
        "table `{table}`: foreign key has {columns} column(s) but references {ref_columns} column(s)"
    )]
    ForeignKeyColumnCountMismatch {
        table: String,
        columns: usize,
        ref_columns: usize,
    },
    #[error(
        "table `{table}`: foreign key target `{ref_table}({ref_columns})` is neither the primary key nor a unique key"
    )]
    ForeignKeyTargetNotUnique {
        table: String,
        ref_table: String,
        ref_columns: String,
    },
    #[error("table `{table}`: enum column `{column}` has no values")]
    EmptyEnum { table: String, column: String },
    #[error("table `{table}`: enum column `{column}` repeats value `{value}`")]
    DuplicateEnumValue {
        table: String,
        column: String,
        value: String,
    },
    #[error("table `{table}`: default `{value}` of enum column `{column}` is not one of its values")]
    InvalidEnumDefault {
        table: String,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Table(#[from] TableValidationError),
}
