use std::collections::{HashMap, HashSet};

use pressroom_config::SeaOrmConfig;
use pressroom_core::{
    ColumnDef, ColumnType, DefaultValue, ForeignKeyRef, ReferenceAction, SimpleColumnType,
    TableConstraint, TableDef,
};
use pressroom_naming::{
    build_enum_type_name, build_index_name, build_reverse_relation_field_name,
    build_unique_constraint_name, extract_relation_prefix, to_pascal_case,
};

use crate::{
    error::ExportError,
    orm::{OrmExporter, prepare},
};

const ENUM_DERIVES: &[&str] = &[
    "Debug",
    "Clone",
    "PartialEq",
    "Eq",
    "EnumIter",
    "DeriveActiveEnum",
];

pub struct SeaOrmExporter;

impl OrmExporter for SeaOrmExporter {
    fn render_entity_with_schema(
        &self,
        table: &TableDef,
        schema: &[TableDef],
    ) -> Result<String, ExportError> {
        render_entity_with_config(table, schema, &SeaOrmConfig::default())
    }
}

/// SeaORM exporter carrying the `seaorm` section of the project config.
pub struct SeaOrmExporterWithConfig<'a> {
    config: &'a SeaOrmConfig,
}

impl<'a> SeaOrmExporterWithConfig<'a> {
    pub fn new(config: &'a SeaOrmConfig) -> Self {
        Self { config }
    }
}

impl OrmExporter for SeaOrmExporterWithConfig<'_> {
    fn render_entity_with_schema(
        &self,
        table: &TableDef,
        schema: &[TableDef],
    ) -> Result<String, ExportError> {
        render_entity_with_config(table, schema, self.config)
    }
}

/// Render a single table into SeaORM entity code.
///
/// Follows the official entity format:
/// <https://www.sea-ql.org/SeaORM/docs/generate-entity/entity-format/>
pub fn render_entity(table: &TableDef) -> Result<String, ExportError> {
    render_entity_with_config(table, &[], &SeaOrmConfig::default())
}

pub fn render_entity_with_config(
    table: &TableDef,
    schema: &[TableDef],
    config: &SeaOrmConfig,
) -> Result<String, ExportError> {
    let (table, schema) = prepare(table, schema)?;
    let table = &table;

    let mut lines: Vec<String> = Vec::new();
    lines.push("use sea_orm::entity::prelude::*;".into());
    lines.push(String::new());

    let mut rendered_enums = HashSet::new();
    for column in &table.columns {
        if let (Some(name), Some(values)) = (column.r#type.enum_name(), column.r#type.enum_values())
            && rendered_enums.insert(name)
        {
            render_enum(&mut lines, &table.name, name, values, config);
        }
    }

    if let Some(desc) = &table.description {
        for line in desc.lines() {
            lines.push(format!("/// {}", line.trim_end()));
        }
    }
    lines.push("#[sea_orm::model]".into());
    lines.push(format!(
        "#[derive({})]",
        derive_list(&model_derives(table), config.extra_model_derives())
    ));
    lines.push(format!("#[sea_orm(table_name = \"{}\")]", table.name));
    lines.push("pub struct Model {".into());

    let primary_keys = table.primary_key_columns();
    let auto_increment = table.constraints.iter().any(|c| {
        matches!(c, TableConstraint::PrimaryKey { auto_increment: true, columns } if columns.len() == 1)
    });
    for column in &table.columns {
        render_column(&mut lines, table, column, &primary_keys, auto_increment);
    }

    let mut used: HashSet<String> = table
        .columns
        .iter()
        .map(|c| sanitize_field_name(&c.name))
        .collect();
    lines.extend(belongs_to_fields(table, &mut used));
    lines.extend(reverse_relation_fields(table, &schema, &mut used));

    lines.push("}".into());

    render_indexes(&mut lines, table);

    lines.push(String::new());
    lines.push("impl ActiveModelBehavior for ActiveModel {}".into());
    lines.push(String::new());

    Ok(lines.join("\n"))
}

fn model_derives(table: &TableDef) -> Vec<&'static str> {
    let has_float = table.columns.iter().any(|c| {
        matches!(
            c.r#type,
            ColumnType::Simple(SimpleColumnType::Real | SimpleColumnType::DoublePrecision)
        )
    });
    let mut derives = vec!["Clone", "Debug", "PartialEq"];
    if !has_float {
        derives.push("Eq");
    }
    derives.push("DeriveEntityModel");
    derives
}

fn derive_list(base: &[&str], extra: &[String]) -> String {
    let mut all: Vec<&str> = base.to_vec();
    for derive in extra {
        if !all.contains(&derive.as_str()) {
            all.push(derive);
        }
    }
    all.join(", ")
}

fn render_enum(
    lines: &mut Vec<String>,
    table_name: &str,
    name: &str,
    values: &[String],
    config: &SeaOrmConfig,
) {
    lines.push(format!(
        "#[derive({})]",
        derive_list(ENUM_DERIVES, config.extra_enum_derives())
    ));
    lines.push(format!(
        "#[sea_orm(rs_type = \"String\", db_type = \"Enum\", enum_name = \"{}\")]",
        build_enum_type_name(table_name, name)
    ));
    lines.push(format!("pub enum {} {{", to_pascal_case(name)));
    for value in values {
        lines.push(format!("    #[sea_orm(string_value = \"{}\")]", value));
        lines.push(format!("    {},", enum_variant_name(value)));
    }
    lines.push("}".into());
    lines.push(String::new());
}

fn render_column(
    lines: &mut Vec<String>,
    table: &TableDef,
    column: &ColumnDef,
    primary_keys: &[&str],
    auto_increment: bool,
) {
    let is_pk = primary_keys.contains(&column.name.as_str());
    let is_unique = table.is_unique_column(&column.name);
    let is_indexed = table.is_indexed_column(&column.name);

    let mut attrs: Vec<String> = Vec::new();
    if is_pk {
        attrs.push("primary_key".into());
        if !(auto_increment && column.r#type.supports_auto_increment()) {
            attrs.push("auto_increment = false".into());
        }
    }
    // unique and indexed are implied by a primary key, indexed by unique
    if is_unique && !is_pk {
        attrs.push("unique".into());
    }
    if is_indexed && !is_pk && !is_unique {
        attrs.push("indexed".into());
    }
    if let Some(default) = &column.default {
        attrs.push(format_default(default, &column.r#type));
    }

    if let Some(comment) = &column.comment {
        for line in comment.lines() {
            lines.push(format!("    /// {}", line.trim_end()));
        }
    }
    if !attrs.is_empty() {
        lines.push(format!("    #[sea_orm({})]", attrs.join(", ")));
    }

    let ty = match column.r#type.enum_name() {
        Some(name) if column.nullable => format!("Option<{}>", to_pascal_case(name)),
        Some(name) => to_pascal_case(name),
        None => column.r#type.to_rust_type(column.nullable),
    };
    lines.push(format!("    pub {}: {},", sanitize_field_name(&column.name), ty));
}

/// `default_value = ...` for literals, `default_expr = ...` for values the
/// database computes on insert.
fn format_default(value: &DefaultValue, column_type: &ColumnType) -> String {
    if value.is_server_generated() {
        let sql = value.to_sql();
        let expr = match sql.trim().to_ascii_lowercase().as_str() {
            "now()" | "current_timestamp" => "Expr::current_timestamp()".to_string(),
            _ => format!("Expr::cust(\\\"{}\\\")", sql.trim()),
        };
        return format!("default_expr = \"{}\"", expr);
    }

    let literal = value.literal_str().unwrap_or_default();
    match (value, column_type) {
        (DefaultValue::Bool(b), _) => format!("default_value = {}", b),
        (DefaultValue::Integer(n), _) => format!("default_value = {}", n),
        (
            DefaultValue::Str(_),
            ColumnType::Simple(
                SimpleColumnType::SmallInt
                | SimpleColumnType::Integer
                | SimpleColumnType::BigInt
                | SimpleColumnType::Real
                | SimpleColumnType::DoublePrecision
                | SimpleColumnType::Boolean,
            ),
        ) => format!("default_value = {}", literal),
        (DefaultValue::Str(_), _) => format!("default_value = \"{}\"", literal),
    }
}

fn belongs_to_fields(table: &TableDef, used: &mut HashSet<String>) -> Vec<String> {
    let foreign_keys = table.foreign_keys();
    let mut per_target: HashMap<&str, usize> = HashMap::new();
    for fk in &foreign_keys {
        *per_target.entry(fk.ref_table).or_insert(0) += 1;
    }

    let mut out = Vec::new();
    for fk in &foreign_keys {
        let base = match (fk.columns, fk.ref_columns) {
            ([column], [ref_column]) => {
                let prefix = extract_relation_prefix(column, fk.ref_table, ref_column);
                if prefix.is_empty() {
                    sanitize_field_name(fk.ref_table)
                } else {
                    sanitize_field_name(&prefix)
                }
            }
            _ => sanitize_field_name(fk.ref_table),
        };
        let field_name = unique_name(&base, used);

        let mut attrs = vec!["belongs_to".to_string()];
        if per_target.get(fk.ref_table).copied().unwrap_or(0) > 1 {
            attrs.push(format!("relation_enum = \"{}\"", to_pascal_case(&field_name)));
        }
        attrs.push(format!("from = \"{}\"", fk_attr_value(fk.columns)));
        attrs.push(format!("to = \"{}\"", fk_attr_value(fk.ref_columns)));
        if let Some(action) = fk.on_delete {
            attrs.push(format!("on_delete = \"{}\"", action_name(action)));
        }
        if let Some(action) = fk.on_update {
            attrs.push(format!("on_update = \"{}\"", action_name(action)));
        }

        out.push(format!("    #[sea_orm({})]", attrs.join(", ")));
        out.push(format!(
            "    pub {}: HasOne<super::{}::Entity>,",
            field_name, fk.ref_table
        ));
    }
    out
}

/// `has_one` / `has_many` fields for every table of `schema` pointing at
/// `table`, and `has_many, via` fields through join tables.
fn reverse_relation_fields(
    table: &TableDef,
    schema: &[TableDef],
    used: &mut HashSet<String>,
) -> Vec<String> {
    let mut out = Vec::new();

    for other in schema {
        if other.name == table.name {
            continue;
        }
        if let Some(fields) = many_to_many_fields(table, other, schema, used) {
            out.extend(fields);
            continue;
        }

        let incoming: Vec<ForeignKeyRef<'_>> = other
            .foreign_keys()
            .into_iter()
            .filter(|fk| fk.ref_table == table.name)
            .collect();
        let has_multiple = incoming.len() > 1;
        let other_pk = other.primary_key_columns();

        for fk in &incoming {
            let is_one_to_one = match fk.columns {
                [column] => {
                    (other_pk.len() == 1 && other_pk[0] == column.as_str())
                        || other.is_unique_column(column)
                }
                columns => {
                    columns.len() == other_pk.len()
                        && columns.iter().all(|c| other_pk.contains(&c.as_str()))
                }
            };

            let ref_column = fk.ref_columns.first().map(String::as_str).unwrap_or("id");
            let role_named = fk
                .columns
                .first()
                .is_some_and(|c| !extract_relation_prefix(c, &table.name, ref_column).is_empty());
            let base = build_reverse_relation_field_name(
                fk.columns,
                &table.name,
                &sanitize_field_name(&other.name),
                ref_column,
                has_multiple || role_named,
                is_one_to_one,
            );
            let field_name = unique_name(&base, used);

            let (relation, rust_type) = if is_one_to_one {
                ("has_one", "HasOne")
            } else {
                ("has_many", "HasMany")
            };
            if has_multiple {
                let relation_enum = to_pascal_case(&field_name);
                out.push(format!(
                    "    #[sea_orm({relation}, relation_enum = \"{relation_enum}\", via_rel = \"{relation_enum}\")]"
                ));
            } else {
                out.push(format!("    #[sea_orm({relation})]"));
            }
            out.push(format!(
                "    pub {}: {}<super::{}::Entity>,",
                field_name, rust_type, other.name
            ));
        }
    }
    out
}

/// A join table has a composite primary key made of at least two foreign
/// keys. Returns `None` when `junction` is not a join table for `current`.
fn many_to_many_fields(
    current: &TableDef,
    junction: &TableDef,
    schema: &[TableDef],
    used: &mut HashSet<String>,
) -> Option<Vec<String>> {
    let junction_pk = junction.primary_key_columns();
    if junction_pk.len() < 2 {
        return None;
    }
    let fks = junction.foreign_keys();
    if fks.len() < 2 {
        return None;
    }
    let all_in_pk = fks
        .iter()
        .all(|fk| fk.columns.iter().all(|c| junction_pk.contains(&c.as_str())));
    if !all_in_pk || !fks.iter().any(|fk| fk.ref_table == current.name) {
        return None;
    }

    let mut out = Vec::new();
    let junction_field = unique_name(
        &pressroom_naming::pluralize(&sanitize_field_name(&junction.name)),
        used,
    );
    out.push("    #[sea_orm(has_many)]".to_string());
    out.push(format!(
        "    pub {}: HasMany<super::{}::Entity>,",
        junction_field, junction.name
    ));

    for fk in &fks {
        if fk.ref_table == current.name || !schema.iter().any(|t| t.name == fk.ref_table) {
            continue;
        }
        let field_name = unique_name(
            &pressroom_naming::pluralize(&sanitize_field_name(fk.ref_table)),
            used,
        );
        out.push(format!(
            "    #[sea_orm(has_many, via = \"{}\")]",
            junction.name
        ));
        out.push(format!(
            "    pub {}: HasMany<super::{}::Entity>,",
            field_name, fk.ref_table
        ));
    }
    Some(out)
}

fn fk_attr_value(cols: &[String]) -> String {
    if cols.len() == 1 {
        cols[0].clone()
    } else {
        format!("({})", cols.join(", "))
    }
}

fn action_name(action: ReferenceAction) -> &'static str {
    match action {
        ReferenceAction::Cascade => "Cascade",
        ReferenceAction::Restrict => "Restrict",
        ReferenceAction::SetNull => "SetNull",
        ReferenceAction::SetDefault => "SetDefault",
        ReferenceAction::NoAction => "NoAction",
    }
}

fn render_indexes(lines: &mut Vec<String>, table: &TableDef) {
    let mut entries = Vec::new();
    for constraint in &table.constraints {
        match constraint {
            TableConstraint::Unique { name, columns } => entries.push(format!(
                "// {} on [{}] unique",
                build_unique_constraint_name(&table.name, columns, name.as_deref()),
                columns.join(", ")
            )),
            TableConstraint::Index { name, columns } => entries.push(format!(
                "// {} on [{}]",
                build_index_name(&table.name, columns, name.as_deref()),
                columns.join(", ")
            )),
            _ => {}
        }
    }
    if entries.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("// Index definitions (created by the schema DDL, not by SeaORM)".into());
    lines.extend(entries);
}

/// Rust enum variant for a database literal.
fn enum_variant_name(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let pascal = to_pascal_case(&cleaned);
    if pascal.is_empty() {
        return "Value".to_string();
    }
    if pascal.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("N{}", pascal);
    }
    pascal
}

fn sanitize_field_name(name: &str) -> String {
    let mut result = String::new();

    for (idx, ch) in name.chars().enumerate() {
        if (ch.is_ascii_alphanumeric() && (idx > 0 || ch.is_ascii_alphabetic())) || ch == '_' {
            result.push(ch);
        } else if idx == 0 && ch.is_ascii_digit() {
            result.push('_');
            result.push(ch);
        } else {
            result.push('_');
        }
    }

    if result.is_empty() {
        "_col".into()
    } else {
        result
    }
}

fn unique_name(base: &str, used: &mut HashSet<String>) -> String {
    let mut name = base.to_string();
    let mut i = 1;
    while used.contains(&name) {
        name = format!("{base}_{i}");
        i += 1;
    }
    used.insert(name.clone());
    name
}


#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::ColumnDef;

    fn schema() -> Vec<TableDef> {
        pressroom_models::tables()
    }

    fn table(name: &str) -> TableDef {
        schema()
            .into_iter()
            .find(|t| t.name == name)
            .unwrap_or_else(|| panic!("no table {name}"))
    }

    fn render(name: &str) -> String {
        render_entity_with_config(&table(name), &schema(), &SeaOrmConfig::default()).unwrap()
    }

    #[test]
    fn article_entity() {
        let code = render("article");
        assert!(code.contains("enum_name = \"article_status\""));
        assert!(code.contains("pub enum Status {"));
        assert!(code.contains("    #[sea_orm(string_value = \"published\")]\n    Published,"));
        assert!(code.contains("#[sea_orm(table_name = \"article\")]"));
        assert!(code.contains("    #[sea_orm(primary_key, auto_increment = false)]\n    pub media_id: Uuid,"));
        assert!(code.contains("    #[sea_orm(primary_key, auto_increment = false)]\n    pub id: i64,"));
        assert!(code.contains("    #[sea_orm(indexed, default_value = \"draft\")]\n    pub status: Status,"));
        assert!(code.contains("    pub summary: Option<String>,"));
        assert!(code.contains("    #[sea_orm(indexed)]\n    pub published_at: Option<DateTimeWithTimeZone>,"));
        assert!(code.contains(
            "    #[sea_orm(belongs_to, from = \"media_id\", to = \"id\")]\n    pub media: HasOne<super::media::Entity>,"
        ));
        assert!(!code.contains("article_user"));
        assert!(code.contains("impl ActiveModelBehavior for ActiveModel {}"));
    }

    #[test]
    fn article_user_belongs_to_user_only() {
        let code = render("article_user");
        assert!(code.contains(
            "    #[sea_orm(belongs_to, from = \"user_id\", to = \"id\")]\n    pub user: HasOne<super::user::Entity>,"
        ));
        assert!(!code.contains("super::article::Entity"));
        assert!(code.contains("enum_name = \"article_user_role\""));
        assert!(code.contains("#[sea_orm(default_value = \"contributor\")]\n    pub role: Role,"));
        assert!(code.contains("#[sea_orm(default_value = 1)]\n    pub author_order: i32,"));
        assert!(code.contains("// ix_article_user__user_id on [user_id]"));
    }

    #[test]
    fn user_entity_relations() {
        let code = render("user");
        assert!(code.contains("#[sea_orm(unique)]\n    pub email: String,"));
        assert!(code.contains("    /// Opaque password hash.\n    pub password: String,"));
        assert!(code.contains("#[sea_orm(primary_key, auto_increment = false, default_expr = \"Expr::cust(\\\"gen_random_uuid()\\\")\")]"));
        assert!(code.contains("    #[sea_orm(has_many)]\n    pub article_users: HasMany<super::article_user::Entity>,"));
        assert!(!code.contains("via = \"article_user\""));
        assert!(code.contains("pub owner_medias: HasMany<super::media::Entity>,"));
        assert!(code.contains("#[sea_orm(has_many, via = \"user_media_role\")]\n    pub medias: HasMany<super::media::Entity>,"));
        assert!(code.contains("// uq_user__email on [email] unique"));
        assert!(code.contains("/// A person who signs in, owns media and writes articles."));
    }

    #[test]
    fn media_owner_relation_uses_role_name() {
        let code = render("media");
        assert!(code.contains("#[sea_orm(belongs_to, from = \"owner_id\", to = \"id\")]\n    pub owner: HasOne<super::user::Entity>,"));
        assert!(code.contains("pub articles: HasMany<super::article::Entity>,"));
        assert!(code.contains("pub user_media_roles: HasMany<super::user_media_role::Entity>,"));
    }

    #[test]
    fn user_media_role_without_default() {
        let code = render("user_media_role");
        assert!(code.contains("#[sea_orm(indexed)]\n    pub role: Role,"));
        assert!(code.contains("#[sea_orm(string_value = \"reporter\")]"));
        assert!(code.contains("enum_name = \"user_media_role_role\""));
    }

    #[test]
    fn single_integer_auto_increment_key() {
        let mut id = ColumnDef::new("id", SimpleColumnType::Integer);
        id.primary_key = Some(pressroom_core::PrimaryKeySyntax::Object(
            pressroom_core::InlinePrimaryKey {
                auto_increment: true,
            },
        ));
        let table = TableDef::new("counter", vec![id, ColumnDef::new("ratio", SimpleColumnType::Real)]);
        let code = render_entity(&table).unwrap();
        assert!(code.contains("    #[sea_orm(primary_key)]\n    pub id: i32,"));
        assert!(code.contains("#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]"));
    }

    #[test]
    fn config_adds_extra_derives() {
        let config = SeaOrmConfig {
            extra_enum_derives: vec!["Serialize".into()],
            extra_model_derives: vec!["Serialize".into(), "Deserialize".into()],
        };
        let code = SeaOrmExporterWithConfig::new(&config)
            .render_entity(&table("article"))
            .unwrap();
        assert!(code.contains("#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]"));
        assert!(code.contains("#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]"));
    }

    #[test]
    fn composite_foreign_key_belongs_to() {
        let edition = TableDef::new(
            "edition",
            vec![
                ColumnDef::new("media_id", SimpleColumnType::Uuid).primary_key(),
                ColumnDef::new("id", SimpleColumnType::BigInt).primary_key(),
            ],
        );
        let piece = TableDef::new(
            "piece",
            vec![
                ColumnDef::new("id", SimpleColumnType::Integer).primary_key(),
                ColumnDef::new("media_id", SimpleColumnType::Uuid),
                ColumnDef::new("edition_id", SimpleColumnType::BigInt),
            ],
        )
        .with_constraint(TableConstraint::ForeignKey {
            name: None,
            columns: vec!["media_id".into(), "edition_id".into()],
            ref_table: "edition".into(),
            ref_columns: vec!["media_id".into(), "id".into()],
            on_delete: None,
            on_update: None,
        });
        let schema = [edition.clone(), piece.clone()];

        let code = render_entity_with_config(&piece, &schema, &SeaOrmConfig::default()).unwrap();
        assert!(code.contains(
            "    #[sea_orm(belongs_to, from = \"(media_id, edition_id)\", to = \"(media_id, id)\")]\n    pub edition: HasOne<super::edition::Entity>,"
        ));

        let code = render_entity_with_config(&edition, &schema, &SeaOrmConfig::default()).unwrap();
        assert!(code.contains("    #[sea_orm(has_many)]\n    pub pieces: HasMany<super::piece::Entity>,"));
    }

    #[test]
    fn on_delete_is_rendered() {
        let parent = TableDef::new(
            "parent",
            vec![ColumnDef::new("id", SimpleColumnType::Integer).primary_key()],
        );
        let child = TableDef::new(
            "child",
            vec![
                ColumnDef::new("id", SimpleColumnType::Integer).primary_key(),
                ColumnDef::new("parent_id", SimpleColumnType::Integer),
            ],
        )
        .with_constraint(TableConstraint::ForeignKey {
            name: None,
            columns: vec!["parent_id".into()],
            ref_table: "parent".into(),
            ref_columns: vec!["id".into()],
            on_delete: Some(ReferenceAction::Cascade),
            on_update: None,
        });
        let code = render_entity_with_config(&child, &[parent.clone(), child.clone()], &SeaOrmConfig::default()).unwrap();
        assert!(code.contains("#[sea_orm(belongs_to, from = \"parent_id\", to = \"id\", on_delete = \"Cascade\")]"));

        let code = render_entity_with_config(&parent, &[parent.clone(), child], &SeaOrmConfig::default()).unwrap();
        assert!(code.contains("    #[sea_orm(has_many)]\n    pub childs: HasMany<super::child::Entity>,"));
    }
}
