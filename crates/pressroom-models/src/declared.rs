use pressroom_core::TableDef;
use thiserror::Error;

/// Model files compiled into the crate, in foreign-key dependency order.
const MODEL_FILES: &[(&str, &str)] = &[
    ("user.json", include_str!("../models/user.json")),
    ("media.json", include_str!("../models/media.json")),
    ("article.json", include_str!("../models/article.json")),
    ("article_user.json", include_str!("../models/article_user.json")),
    ("user_media_role.json", include_str!("../models/user_media_role.json")),
];

#[derive(Debug, Error)]
pub enum ModelsError {
    #[error("model file {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The JSON model files, parsed but not normalized.
pub fn declared_models() -> Result<Vec<TableDef>, ModelsError> {
    MODEL_FILES
        .iter()
        .map(|&(file, content)| {
            serde_json::from_str(content).map_err(|source| ModelsError::Parse { file, source })
        })
        .collect()
}
