//! Pressroom: the storage schema of a multi-tenant publishing platform.
//!
//! Users own media, media publish articles, articles have ordered authors
//! and users hold roles inside media. This crate re-exports the schema
//! types, the declared models and the DDL builder, and can install the
//! schema on a live SeaORM connection.

mod install;

pub use pressroom_core as schema;
pub use pressroom_models as models;
pub use pressroom_query as query;

pub use install::{InstallError, install_models, install_schema, query_backend};
pub use pressroom_core::{ColumnDef, ColumnType, SchemaError, TableDef, validate_schema};
pub use pressroom_models::{
    Article, ArticleStatus, ArticleUser, ArticleUserRole, Entity, Media, MediaRole, User,
    UserMediaRole, tables,
};
