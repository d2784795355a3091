use pressroom_core::TableValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Table(#[from] TableValidationError),
    #[error("table `{table}` has no columns")]
    EmptyTable { table: String },
    #[error("table `{table}` references unknown table `{ref_table}`")]
    UnknownReferencedTable { table: String, ref_table: String },
}
