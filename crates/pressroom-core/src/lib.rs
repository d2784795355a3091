//! Schema description types for pressroom.
//!
//! A [`TableDef`] is plain data: it can be declared in Rust, read from a JSON
//! or YAML model file, normalized into table-level constraints and checked
//! with [`validate_schema`]. Nothing in this crate talks to a database.

pub mod error;
pub mod schema;
pub mod validate;

pub use error::SchemaError;
pub use schema::{
    ColumnDef, ColumnName, ColumnType, ComplexColumnType, DefaultKind, DefaultValue,
    ForeignKeyDef, ForeignKeyRef, ForeignKeySyntax, IndexRef, InlinePrimaryKey, PrimaryKeySyntax,
    ReferenceAction, SimpleColumnType, StrOrBoolOrArray, TableConstraint, TableDef, TableName,
    TableValidationError,
};
pub use validate::validate_schema;
