use chrono::{DateTime, Utc};
use pressroom_core::{ColumnDef, ColumnType, SimpleColumnType, TableDef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique across all users.
    pub email: String,
    pub password: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for User {
    const TABLE: &'static str = "user";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::new("id", SimpleColumnType::Uuid)
                    .primary_key()
                    .default("gen_random_uuid()"),
                ColumnDef::new("email", ColumnType::varchar(255))
                    .unique()
                    .index(),
                ColumnDef::new("password", ColumnType::varchar(255))
                    .comment("Opaque password hash."),
                ColumnDef::new("name", ColumnType::varchar(100)),
                ColumnDef::new("profile_image", SimpleColumnType::Text).nullable(),
                ColumnDef::new("created_at", SimpleColumnType::Timestamptz).default("now()"),
                ColumnDef::new("updated_at", SimpleColumnType::Timestamptz).nullable(),
            ],
        )
        .with_description("A person who signs in, owns media and writes articles.")
    }
}
