use serde::{Deserialize, Serialize};

use crate::schema::{
    names::{ColumnName, TableName},
    reference::ReferenceAction,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TableConstraint {
    PrimaryKey {
        #[serde(default)]
        auto_increment: bool,
        columns: Vec<ColumnName>,
    },
    Unique {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        columns: Vec<ColumnName>,
    },
    ForeignKey {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        columns: Vec<ColumnName>,
        ref_table: TableName,
        ref_columns: Vec<ColumnName>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_delete: Option<ReferenceAction>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        on_update: Option<ReferenceAction>,
    },
    Check {
        name: String,
        expr: String,
    },
    Index {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        columns: Vec<ColumnName>,
    },
}

impl TableConstraint {
    /// Columns the constraint covers on its own table. Empty for `check`.
    pub fn columns(&self) -> &[ColumnName] {
        match self {
            TableConstraint::PrimaryKey { columns, .. }
            | TableConstraint::Unique { columns, .. }
            | TableConstraint::ForeignKey { columns, .. }
            | TableConstraint::Index { columns, .. } => columns,
            TableConstraint::Check { .. } => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TableConstraint::PrimaryKey { .. } => "primary_key",
            TableConstraint::Unique { .. } => "unique",
            TableConstraint::ForeignKey { .. } => "foreign_key",
            TableConstraint::Check { .. } => "check",
            TableConstraint::Index { .. } => "index",
        }
    }
}
