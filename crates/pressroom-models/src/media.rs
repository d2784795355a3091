use chrono::{DateTime, Utc};
use pressroom_core::{ColumnDef, ColumnType, SimpleColumnType, TableDef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    /// The owning [`User`](crate::User).
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Media {
    const TABLE: &'static str = "media";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::new("id", SimpleColumnType::Uuid)
                    .primary_key()
                    .default("gen_random_uuid()"),
                ColumnDef::new("name", ColumnType::varchar(100)),
                ColumnDef::new("description", SimpleColumnType::Text).nullable(),
                ColumnDef::new("logo", SimpleColumnType::Text).nullable(),
                ColumnDef::new("owner_id", SimpleColumnType::Uuid)
                    .index()
                    .foreign_key("user.id"),
                ColumnDef::new("created_at", SimpleColumnType::Timestamptz).default("now()"),
                ColumnDef::new("updated_at", SimpleColumnType::Timestamptz).nullable(),
            ],
        )
        .with_description("A publication owned by a single user.")
    }
}
