pub mod builder;
pub mod error;
pub mod sql;

pub use builder::{build_schema_queries, build_schema_sql, sort_by_dependencies};
pub use error::QueryError;
pub use sql::{BuiltQuery, DatabaseBackend, RawSql, build_add_index, build_create_table};
