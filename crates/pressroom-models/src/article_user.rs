use chrono::{DateTime, Utc};
use pressroom_core::{ColumnDef, ColumnType, SimpleColumnType, TableDef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::Entity, enums::string_enum};

string_enum! {
    /// Part a user plays in writing an article.
    #[derive(Default)]
    pub enum ArticleUserRole {
        Lead => "lead",
        #[default]
        Contributor => "contributor",
    }
}

/// Authorship link between an [`Article`](crate::Article) and a
/// [`User`](crate::User). Only `user_id` is a foreign key; `media_id` and
/// `article_id` identify the article without a database constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUser {
    pub media_id: Uuid,
    pub article_id: i64,
    pub user_id: Uuid,
    /// Position in the byline, starting at 1.
    pub author_order: i32,
    pub role: ArticleUserRole,
    pub created_at: DateTime<Utc>,
}

impl Entity for ArticleUser {
    const TABLE: &'static str = "article_user";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::new("media_id", SimpleColumnType::Uuid).primary_key(),
                ColumnDef::new("article_id", SimpleColumnType::BigInt).primary_key(),
                ColumnDef::new("user_id", SimpleColumnType::Uuid)
                    .primary_key()
                    .index()
                    .foreign_key("user.id"),
                ColumnDef::new("author_order", SimpleColumnType::Integer).default(1_i64),
                ColumnDef::new(
                    "role",
                    ColumnType::enumeration("role", ArticleUserRole::VALUES.iter().copied()),
                )
                .default("'contributor'"),
                ColumnDef::new("created_at", SimpleColumnType::Timestamptz).default("now()"),
            ],
        )
        .with_description("Authorship of an article by a user.")
    }
}
