pub mod add_index;
pub mod create_table;
pub mod helpers;
pub mod types;

pub use add_index::build_add_index;
pub use create_table::build_create_table;
pub use types::{BuiltQuery, DatabaseBackend, RawSql};
