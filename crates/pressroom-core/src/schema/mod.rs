pub mod column;
pub mod constraint;
pub mod default;
pub mod foreign_key;
pub mod names;
pub mod primary_key;
pub mod reference;
pub mod str_or_bool;
pub mod table;

pub use column::{ColumnDef, ColumnType, ComplexColumnType, SimpleColumnType};
pub use constraint::TableConstraint;
pub use default::{DefaultKind, DefaultValue};
pub use foreign_key::{ForeignKeyDef, ForeignKeySyntax};
pub use names::{ColumnName, TableName};
pub use primary_key::{InlinePrimaryKey, PrimaryKeySyntax};
pub use reference::ReferenceAction;
pub use str_or_bool::StrOrBoolOrArray;
pub use table::{ForeignKeyRef, IndexRef, TableDef, TableValidationError};
