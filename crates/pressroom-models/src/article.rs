use chrono::{DateTime, Utc};
use pressroom_core::{ColumnDef, ColumnType, SimpleColumnType, TableDef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::Entity, enums::string_enum};

string_enum! {
    /// Editorial state of an article. Any transition is allowed.
    #[derive(Default)]
    pub enum ArticleStatus {
        #[default]
        Draft => "draft",
        Review => "review",
        Published => "published",
        Archived => "archived",
    }
}

/// Keyed by `(media_id, id)`; `id` is assigned by the caller and counts
/// within one media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub media_id: Uuid,
    pub id: i64,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub thumbnail: Option<String>,
    pub status: ArticleStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Article {
    const TABLE: &'static str = "article";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::new("media_id", SimpleColumnType::Uuid)
                    .primary_key()
                    .foreign_key("media.id"),
                ColumnDef::new("id", SimpleColumnType::BigInt).primary_key(),
                ColumnDef::new("title", ColumnType::varchar(500)),
                ColumnDef::new("content", SimpleColumnType::Text),
                ColumnDef::new("summary", SimpleColumnType::Text).nullable(),
                ColumnDef::new("thumbnail", SimpleColumnType::Text).nullable(),
                ColumnDef::new(
                    "status",
                    ColumnType::enumeration("status", ArticleStatus::VALUES.iter().copied()),
                )
                .default("'draft'")
                .index(),
                ColumnDef::new("published_at", SimpleColumnType::Timestamptz)
                    .nullable()
                    .index(),
                ColumnDef::new("created_at", SimpleColumnType::Timestamptz).default("now()"),
                ColumnDef::new("updated_at", SimpleColumnType::Timestamptz).nullable(),
            ],
        )
        .with_description("An article published in a media. Ids are numbered per media by the caller.")
    }
}
