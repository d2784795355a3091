use serde::{Deserialize, Serialize};

/// Inline `unique` / `index` shorthand on a column.
///
/// `true` creates a single-column constraint, a string names it, and an
/// array makes the column part of every named (possibly composite) one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum StrOrBoolOrArray {
    Str(String),
    Array(Vec<String>),
    Bool(bool),
}
