//! The pressroom data model.
//!
//! Every table is declared twice: as a JSON model file under `models/`
//! (loaded by [`declared_models`]) and as a Rust record type implementing
//! [`Entity`]. Both describe the same storage schema.

pub mod article;
pub mod article_user;
pub mod declared;
pub mod entity;
pub mod enums;
pub mod media;
pub mod user;
pub mod user_media_role;

pub use article::{Article, ArticleStatus};
pub use article_user::{ArticleUser, ArticleUserRole};
pub use declared::{ModelsError, declared_models};
pub use entity::{Entity, tables};
pub use enums::ParseEnumError;
pub use media::Media;
pub use user::User;
pub use user_media_role::{MediaRole, UserMediaRole};
