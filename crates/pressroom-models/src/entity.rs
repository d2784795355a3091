use pressroom_core::TableDef;

use crate::{Article, ArticleUser, Media, User, UserMediaRole};

/// A record type with a static description of the table it is stored in.
pub trait Entity {
    const TABLE: &'static str;

    /// Table definition in declaration form (inline shorthands not yet
    /// folded). Call [`TableDef::normalize`] for the table-level view.
    fn table_def() -> TableDef;
}

/// All pressroom tables, each after the tables it references.
pub fn tables() -> Vec<TableDef> {
    vec![
        User::table_def(),
        Media::table_def(),
        Article::table_def(),
        ArticleUser::table_def(),
        UserMediaRole::table_def(),
    ]
}
