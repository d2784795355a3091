//! Naming rules shared by the pressroom crates.
//!
//! Every generated database object (index, unique constraint, foreign key,
//! check constraint, enum type) gets its name from here so that the DDL
//! builder and the ORM exporters always agree. The crate has no runtime dependencies.

/// Name of a secondary index: `ix_{table}__{key}` when a key is given,
/// otherwise `ix_{table}__{col1}_{col2}...`.
///
/// ```
/// use pressroom_naming::build_index_name;
///
/// assert_eq!(build_index_name("user", &["email".into()], None), "ix_user__email");
/// assert_eq!(build_index_name("user", &["email".into()], Some("by_mail")), "ix_user__by_mail");
/// ```
pub fn build_index_name(table: &str, columns: &[String], key: Option<&str>) -> String {
    prefixed_name("ix", table, columns, key)
}

/// Name of a unique constraint: `uq_{table}__{key}` or `uq_{table}__{cols}`.
pub fn build_unique_constraint_name(table: &str, columns: &[String], key: Option<&str>) -> String {
    prefixed_name("uq", table, columns, key)
}

/// Name of a foreign key constraint: `fk_{table}__{key}` or `fk_{table}__{cols}`.
pub fn build_foreign_key_name(table: &str, columns: &[String], key: Option<&str>) -> String {
    prefixed_name("fk", table, columns, key)
}

/// Name of the CHECK constraint that stands in for an enum type on backends
/// without native enums: `chk_{table}__{column}`.
pub fn build_check_constraint_name(table: &str, column: &str) -> String {
    format!("chk_{}__{}", table, column)
}

/// Database enum type name, always prefixed with the owning table so two
/// tables can both declare a `role` enum with different literals.
///
/// ```
/// use pressroom_naming::build_enum_type_name;
///
/// assert_eq!(build_enum_type_name("article", "status"), "article_status");
/// assert_eq!(build_enum_type_name("user_media_role", "role"), "user_media_role_role");
/// ```
pub fn build_enum_type_name(table: &str, enum_name: &str) -> String {
    format!("{}_{}", table, enum_name)
}

fn prefixed_name(prefix: &str, table: &str, columns: &[String], key: Option<&str>) -> String {
    match key {
        Some(k) => format!("{}_{}__{}", prefix, table, k),
        None => format!("{}_{}__{}", prefix, table, columns.join("_")),
    }
}

/// Role a foreign key column plays relative to the table it points at.
///
/// Returns an empty string for the "plain" reference (`user_id` -> `user`),
/// the leading qualifier for prefixed references (`created_by_user_id` ->
/// `created_by`) and the bare column stem otherwise (`owner_id` -> `owner`).
///
/// ```
/// use pressroom_naming::extract_relation_prefix;
///
/// assert_eq!(extract_relation_prefix("user_id", "user", "id"), "");
/// assert_eq!(extract_relation_prefix("created_by_user_id", "user", "id"), "created_by");
/// assert_eq!(extract_relation_prefix("owner_id", "user", "id"), "owner");
/// ```
pub fn extract_relation_prefix(fk_column: &str, target_table: &str, ref_column: &str) -> String {
    let stem = fk_column
        .strip_suffix(&format!("_{}", ref_column))
        .unwrap_or(fk_column);

    let stem_lower = stem.to_lowercase();
    let target_lower = target_table.to_lowercase();
    if stem_lower == target_lower {
        return String::new();
    }

    let table_suffix = format!("_{}", target_lower);
    if stem_lower.ends_with(&table_suffix) {
        return stem[..stem.len() - table_suffix.len()].to_string();
    }

    stem.to_string()
}

/// Field name for the reverse side of a foreign key (`has_many` / `has_one`).
///
/// The source table name is pluralized for one-to-many relations. When the
/// source table holds several foreign keys into the same target, the role
/// prefix of the first column is prepended to keep field names distinct.
pub fn build_reverse_relation_field_name(
    fk_columns: &[String],
    target_table: &str,
    source_table: &str,
    ref_column: &str,
    has_multiple_fks: bool,
    is_one_to_one: bool,
) -> String {
    let base = if is_one_to_one {
        source_table.to_string()
    } else {
        pluralize(source_table)
    };

    let Some(first) = fk_columns.first() else {
        return base;
    };
    if !has_multiple_fks {
        return base;
    }

    let prefix = extract_relation_prefix(first, target_table, ref_column);
    if prefix.is_empty() {
        base
    } else {
        format!("{}_{}", prefix, base)
    }
}

/// `snake_case` / `kebab-case` to `PascalCase`.
///
/// ```
/// use pressroom_naming::to_pascal_case;
///
/// assert_eq!(to_pascal_case("article_user"), "ArticleUser");
/// assert_eq!(to_pascal_case("media"), "Media");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Naive English plural used for relation field names.
///
/// ```
/// use pressroom_naming::pluralize;
///
/// assert_eq!(pluralize("article"), "articles");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("status"), "status");
/// ```
pub fn pluralize(name: &str) -> String {
    if name.ends_with('s') {
        return name.to_string();
    }
    let vowel_y = ["ay", "ey", "oy", "uy"].iter().any(|end| name.ends_with(end));
    match name.strip_suffix('y') {
        Some(stem) if !vowel_y => format!("{}ies", stem),
        _ => format!("{}s", name),
    }
}
