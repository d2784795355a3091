use serde::{Deserialize, Serialize};

/// Column default as written in a model file.
///
/// String defaults are SQL text: `"'draft'"` is a quoted literal while
/// `"now()"` or `"gen_random_uuid()"` is an expression the server evaluates
/// at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Str(String),
}

/// Where a default value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKind {
    /// A constant the application could equally have supplied.
    Literal,
    /// Generated by the storage engine when the row is inserted.
    ServerGenerated,
}

const SERVER_KEYWORDS: &[&str] = &["CURRENT_TIMESTAMP", "CURRENT_DATE", "CURRENT_TIME"];

impl DefaultValue {
    /// SQL text of the default.
    pub fn to_sql(&self) -> String {
        match self {
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Integer(n) => n.to_string(),
            DefaultValue::Str(s) => s.clone(),
        }
    }

    pub fn kind(&self) -> DefaultKind {
        match self {
            DefaultValue::Str(s) => {
                let s = s.trim();
                let is_call = !s.starts_with('\'') && s.contains('(') && s.ends_with(')');
                let is_keyword = SERVER_KEYWORDS.iter().any(|k| s.eq_ignore_ascii_case(k));
                if is_call || is_keyword {
                    DefaultKind::ServerGenerated
                } else {
                    DefaultKind::Literal
                }
            }
            DefaultValue::Bool(_) | DefaultValue::Integer(_) => DefaultKind::Literal,
        }
    }

    pub fn is_server_generated(&self) -> bool {
        self.kind() == DefaultKind::ServerGenerated
    }

    /// Literal value with SQL quoting removed (`'draft'` -> `draft`).
    /// `None` for server-generated expressions.
    pub fn literal_str(&self) -> Option<String> {
        if self.is_server_generated() {
            return None;
        }
        let sql = self.to_sql();
        let trimmed = sql.trim();
        let unquoted = trimmed
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
            .map(|inner| inner.replace("''", "'"));
        Some(unquoted.unwrap_or_else(|| trimmed.to_string()))
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Str(value.to_string())
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Integer(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DefaultValue::from("now()"), DefaultKind::ServerGenerated)]
    #[case(DefaultValue::from("gen_random_uuid()"), DefaultKind::ServerGenerated)]
    #[case(DefaultValue::from("current_timestamp"), DefaultKind::ServerGenerated)]
    #[case(DefaultValue::from("'draft'"), DefaultKind::Literal)]
    #[case(DefaultValue::from("'a(b)'"), DefaultKind::Literal)]
    #[case(DefaultValue::Integer(1), DefaultKind::Literal)]
    #[case(DefaultValue::Bool(false), DefaultKind::Literal)]
    fn classifies_default_source(#[case] value: DefaultValue, #[case] expected: DefaultKind) {
        assert_eq!(value.kind(), expected);
    }

    #[rstest]
    #[case(DefaultValue::from("'draft'"), Some("draft"))]
    #[case(DefaultValue::from("'it''s'"), Some("it's"))]
    #[case(DefaultValue::from("contributor"), Some("contributor"))]
    #[case(DefaultValue::Integer(1), Some("1"))]
    #[case(DefaultValue::Bool(true), Some("true"))]
    #[case(DefaultValue::from("now()"), None)]
    fn literal_text(#[case] value: DefaultValue, #[case] expected: Option<&str>) {
        assert_eq!(value.literal_str().as_deref(), expected);
    }

    #[test]
    fn untagged_json_forms() {
        let values: Vec<DefaultValue> = serde_json::from_str(r#"[1, true, "now()"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                DefaultValue::Integer(1),
                DefaultValue::Bool(true),
                DefaultValue::Str("now()".into()),
            ]
        );
        assert_eq!(values[0].to_sql(), "1");
        assert_eq!(values[1].to_sql(), "true");
    }
}
