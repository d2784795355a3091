use serde::{Deserialize, Serialize};

/// File formats accepted for model definitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Json,
    Yaml,
    Yml,
}

impl FileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Yml => "yml",
        }
    }

    /// Format for a file extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "yaml" => Some(FileFormat::Yaml),
            "yml" => Some(FileFormat::Yml),
            _ => None,
        }
    }

    pub fn is_yaml(self) -> bool {
        matches!(self, FileFormat::Yaml | FileFormat::Yml)
    }
}

#[cfg(test)]
mod tests {
    use super::FileFormat;
    use rstest::rstest;

    #[test]
    fn default_is_json() {
        assert_eq!(FileFormat::default(), FileFormat::Json);
    }

    #[rstest]
    #[case("json", Some(FileFormat::Json))]
    #[case("YAML", Some(FileFormat::Yaml))]
    #[case("yml", Some(FileFormat::Yml))]
    #[case("toml", None)]
    fn from_extension(#[case] ext: &str, #[case] expected: Option<FileFormat>) {
        assert_eq!(FileFormat::from_extension(ext), expected);
    }
}
