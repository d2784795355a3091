use pressroom_core::TableValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Table(#[from] TableValidationError),
    #[error("table `{table}` references unknown table `{ref_table}`")]
    UnknownReferencedTable { table: String, ref_table: String },
    #[error("foreign keys form a cycle between tables: {}", .tables.join(", "))]
    CyclicDependency { tables: Vec<String> },
}
