use serde::{Deserialize, Serialize};

use crate::schema::{
    names::{ColumnName, TableName},
    reference::ReferenceAction,
    table::TableValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct ForeignKeyDef {
    pub ref_table: TableName,
    pub ref_columns: Vec<ColumnName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferenceAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferenceAction>,
}

/// Inline `foreign_key` on a column: either the `"table.column"` shorthand
/// or a full [`ForeignKeyDef`] object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum ForeignKeySyntax {
    Reference(String),
    Object(ForeignKeyDef),
}

impl ForeignKeySyntax {
    pub fn resolve(&self, column: &str) -> Result<ForeignKeyDef, TableValidationError> {
        match self {
            ForeignKeySyntax::Object(def) => Ok(def.clone()),
            ForeignKeySyntax::Reference(reference) => {
                let malformed = || TableValidationError::InvalidForeignKeyReference {
                    column: column.to_string(),
                    reference: reference.clone(),
                };
                let (table, ref_column) = reference.split_once('.').ok_or_else(malformed)?;
                if table.is_empty() || ref_column.is_empty() || ref_column.contains('.') {
                    return Err(malformed());
                }
                Ok(ForeignKeyDef {
                    ref_table: table.to_string(),
                    ref_columns: vec![ref_column.to_string()],
                    on_delete: None,
                    on_update: None,
                })
            }
        }
    }
}
