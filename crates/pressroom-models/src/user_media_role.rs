use chrono::{DateTime, Utc};
use pressroom_core::{ColumnDef, ColumnType, SimpleColumnType, TableDef};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{entity::Entity, enums::string_enum};

string_enum! {
    /// Role of a user within a media. Has no default: every membership
    /// states its role explicitly.
    pub enum MediaRole {
        Owner => "owner",
        Editor => "editor",
        Reporter => "reporter",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMediaRole {
    pub user_id: Uuid,
    pub media_id: Uuid,
    pub role: MediaRole,
    pub created_at: DateTime<Utc>,
}

impl Entity for UserMediaRole {
    const TABLE: &'static str = "user_media_role";

    fn table_def() -> TableDef {
        TableDef::new(
            Self::TABLE,
            vec![
                ColumnDef::new("user_id", SimpleColumnType::Uuid)
                    .primary_key()
                    .index()
                    .foreign_key("user.id"),
                ColumnDef::new("media_id", SimpleColumnType::Uuid)
                    .primary_key()
                    .index()
                    .foreign_key("media.id"),
                ColumnDef::new(
                    "role",
                    ColumnType::enumeration("role", MediaRole::VALUES.iter().copied()),
                )
                .index(),
                ColumnDef::new("created_at", SimpleColumnType::Timestamptz).default("now()"),
            ],
        )
        .with_description("Membership of a user in a media.")
    }
}
