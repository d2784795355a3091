use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct InlinePrimaryKey {
    #[serde(default)]
    pub auto_increment: bool,
}

/// Inline `primary_key` on a column: `true` or `{ "auto_increment": true }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum PrimaryKeySyntax {
    Bool(bool),
    Object(InlinePrimaryKey),
}

impl PrimaryKeySyntax {
    pub fn is_primary_key(&self) -> bool {
        !matches!(self, PrimaryKeySyntax::Bool(false))
    }

    pub fn auto_increment(&self) -> bool {
        matches!(self, PrimaryKeySyntax::Object(pk) if pk.auto_increment)
    }
}
