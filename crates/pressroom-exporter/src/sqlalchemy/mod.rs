use std::collections::{BTreeSet, HashSet};

use pressroom_core::{
    ColumnDef, ColumnType, ComplexColumnType, DefaultValue, ForeignKeyRef, SimpleColumnType,
    TableConstraint, TableDef,
};
use pressroom_naming::{
    build_enum_type_name, build_foreign_key_name, build_index_name, build_unique_constraint_name,
    to_pascal_case,
};

use crate::{
    error::ExportError,
    orm::{OrmExporter, prepare, py_str, to_screaming_snake_case},
};

/// Module every generated SQLAlchemy model imports its `Base` from.
pub const BASE_MODULE: &str = "base";

/// Track which types are actually used to generate minimal imports
#[derive(Default)]
struct UsedTypes<'a> {
    sa_types: BTreeSet<&'a str>,
    datetime_types: BTreeSet<&'a str>,
    needs_optional: bool,
    needs_uuid: bool,
    needs_decimal: bool,
}

impl<'a> UsedTypes<'a> {
    fn add_column_type(&mut self, col_type: &ColumnType, nullable: bool) {
        if nullable {
            self.needs_optional = true;
        }

        match col_type {
            ColumnType::Simple(ty) => match ty {
                SimpleColumnType::SmallInt => {
                    self.sa_types.insert("SmallInteger");
                }
                SimpleColumnType::Integer => {
                    self.sa_types.insert("Integer");
                }
                SimpleColumnType::BigInt => {
                    self.sa_types.insert("BigInteger");
                }
                SimpleColumnType::Real | SimpleColumnType::DoublePrecision => {
                    self.sa_types.insert("Float");
                }
                SimpleColumnType::Text => {
                    self.sa_types.insert("Text");
                }
                SimpleColumnType::Boolean => {
                    self.sa_types.insert("Boolean");
                }
                SimpleColumnType::Date => {
                    self.sa_types.insert("Date");
                    self.datetime_types.insert("date");
                }
                SimpleColumnType::Time => {
                    self.sa_types.insert("Time");
                    self.datetime_types.insert("time");
                }
                SimpleColumnType::Timestamp | SimpleColumnType::Timestamptz => {
                    self.sa_types.insert("DateTime");
                    self.datetime_types.insert("datetime");
                }
                SimpleColumnType::Bytea => {
                    self.sa_types.insert("LargeBinary");
                }
                SimpleColumnType::Uuid => {
                    self.sa_types.insert("Uuid");
                    self.needs_uuid = true;
                }
                SimpleColumnType::Json => {
                    self.sa_types.insert("JSON");
                }
            },
            ColumnType::Complex(ty) => match ty {
                ComplexColumnType::Varchar { .. } | ComplexColumnType::Char { .. } => {
                    self.sa_types.insert("String");
                }
                ComplexColumnType::Numeric { .. } => {
                    self.sa_types.insert("Numeric");
                    self.needs_decimal = true;
                }
                ComplexColumnType::Custom { .. } => {}
                ComplexColumnType::Enum { .. } => {
                    self.sa_types.insert("Enum");
                }
            },
        }
    }
}

pub struct SqlAlchemyExporter;

impl OrmExporter for SqlAlchemyExporter {
    fn render_entity_with_schema(
        &self,
        table: &TableDef,
        schema: &[TableDef],
    ) -> Result<String, ExportError> {
        let (table, _) = prepare(table, schema)?;
        Ok(render_entity(&table))
    }
}

/// The shared declarative base, written once next to the models.
pub fn render_base() -> String {
    [
        "from sqlalchemy.orm import DeclarativeBase",
        "",
        "",
        "class Base(DeclarativeBase):",
        "    pass",
        "",
    ]
    .join("\n")
}

/// Render a SQLAlchemy model for a normalized table definition.
pub fn render_entity(table: &TableDef) -> String {
    let mut lines: Vec<String> = Vec::new();

    let mut seen = HashSet::new();
    let enums: Vec<(&str, &[String])> = table
        .columns
        .iter()
        .filter_map(|col| Some((col.r#type.enum_name()?, col.r#type.enum_values()?)))
        .filter(|(name, _)| seen.insert(*name))
        .collect();

    let mut used_types = UsedTypes::default();
    for col in &table.columns {
        used_types.add_column_type(&col.r#type, col.nullable);
    }

    let foreign_keys = table.foreign_keys();
    if foreign_keys.iter().any(|fk| fk.columns.len() == 1) {
        used_types.sa_types.insert("ForeignKey");
    }
    if foreign_keys.iter().any(|fk| fk.columns.len() > 1) {
        used_types.sa_types.insert("ForeignKeyConstraint");
    }
    if !table.indexes().is_empty() {
        used_types.sa_types.insert("Index");
    }
    if table.unique_column_sets().iter().any(|cols| cols.len() > 1) {
        used_types.sa_types.insert("UniqueConstraint");
    }
    if table
        .columns
        .iter()
        .any(|c| c.default.as_ref().is_some_and(needs_text))
    {
        used_types.sa_types.insert("text");
    }

    lines.push("from __future__ import annotations".into());
    lines.push(String::new());
    if !enums.is_empty() {
        lines.push("import enum".into());
    }
    if !used_types.datetime_types.is_empty() {
        let datetime_imports: Vec<&str> = used_types.datetime_types.iter().copied().collect();
        lines.push(format!(
            "from datetime import {}",
            datetime_imports.join(", ")
        ));
    }
    if used_types.needs_decimal {
        lines.push("from decimal import Decimal".into());
    }
    if used_types.needs_optional {
        lines.push("from typing import Optional".into());
    }
    if used_types.needs_uuid {
        lines.push("from uuid import UUID".into());
    }
    lines.push(String::new());

    let sa_imports: Vec<&str> = used_types.sa_types.iter().copied().collect();
    if !sa_imports.is_empty() {
        lines.push(format!("from sqlalchemy import {}", sa_imports.join(", ")));
    }
    lines.push("from sqlalchemy.orm import Mapped, mapped_column".into());
    lines.push(String::new());
    lines.push(format!("from .{} import Base", BASE_MODULE));
    lines.push(String::new());
    lines.push(String::new());

    for (enum_name, values) in &enums {
        render_enum(&mut lines, enum_name, values);
        lines.push(String::new());
        lines.push(String::new());
    }

    lines.push(format!("class {}(Base):", to_pascal_case(&table.name)));
    if let Some(desc) = &table.description {
        lines.push(format!("    \"\"\"{}\"\"\"", desc.replace('\n', " ")));
        lines.push(String::new());
    }
    lines.push(format!("    __tablename__ = \"{}\"", table.name));
    lines.push(String::new());

    let pk_columns = table.primary_key_columns();
    for col in &table.columns {
        let single_fk = foreign_keys
            .iter()
            .find(|fk| fk.columns.len() == 1 && fk.columns[0] == col.name);
        render_column(
            &mut lines,
            table,
            col,
            pk_columns.contains(&col.name.as_str()),
            table.is_unique_column(&col.name),
            single_fk,
        );
    }

    render_table_args(&mut lines, table, &foreign_keys);
    lines.push(String::new());

    lines.join("\n")
}

fn render_enum(lines: &mut Vec<String>, name: &str, values: &[String]) {
    lines.push(format!("class {}(str, enum.Enum):", to_pascal_case(name)));
    for val in values {
        lines.push(format!(
            "    {} = {}",
            to_screaming_snake_case(val),
            py_str(val)
        ));
    }
}

fn render_column(
    lines: &mut Vec<String>,
    table: &TableDef,
    col: &ColumnDef,
    is_pk: bool,
    is_unique: bool,
    fk: Option<&ForeignKeyRef<'_>>,
) {
    if let Some(comment) = &col.comment {
        lines.push(format!("    # {}", comment.replace('\n', " ")));
    }

    let mut attrs: Vec<String> = vec![column_type_to_sqlalchemy(&table.name, &col.r#type)];

    if let Some(fk) = fk {
        let mut args = vec![py_str(&format!("{}.{}", fk.ref_table, fk.ref_columns[0]))];
        if let Some(action) = fk.on_delete {
            args.push(format!("ondelete={}", py_str(action.as_sql())));
        }
        if let Some(action) = fk.on_update {
            args.push(format!("onupdate={}", py_str(action.as_sql())));
        }
        attrs.push(format!("ForeignKey({})", args.join(", ")));
    }

    if is_pk {
        attrs.push("primary_key=True".into());
    } else {
        attrs.push(format!(
            "nullable={}",
            if col.nullable { "True" } else { "False" }
        ));
    }

    if is_unique && !is_pk {
        attrs.push("unique=True".into());
    }

    if let Some(default) = &col.default {
        attrs.push(format!("server_default={}", server_default(default)));
    }

    lines.push(format!(
        "    {}: Mapped[{}] = mapped_column({})",
        col.name,
        column_type_to_python(&col.r#type, col.nullable),
        attrs.join(", ")
    ));
}

fn needs_text(default: &DefaultValue) -> bool {
    default.is_server_generated() || matches!(default, DefaultValue::Bool(_))
}

/// Expressions and booleans go through `text()`, every other literal is
/// passed as a plain string for SQLAlchemy to quote.
fn server_default(default: &DefaultValue) -> String {
    if default.is_server_generated() {
        return format!("text({})", py_str(default.to_sql().trim()));
    }
    match default {
        DefaultValue::Bool(b) => format!("text({})", py_str(&b.to_string())),
        _ => py_str(&default.literal_str().unwrap_or_default()),
    }
}

fn render_table_args(lines: &mut Vec<String>, table: &TableDef, foreign_keys: &[ForeignKeyRef<'_>]) {
    let mut args: Vec<String> = Vec::new();

    for fk in foreign_keys.iter().filter(|fk| fk.columns.len() > 1) {
        let local = quoted_list(fk.columns.iter().map(String::as_str));
        let targets: Vec<String> = fk
            .ref_columns
            .iter()
            .map(|c| format!("{}.{}", fk.ref_table, c))
            .collect();
        let remote = quoted_list(targets.iter().map(String::as_str));
        let name = build_foreign_key_name(&table.name, fk.columns, fk.name);
        args.push(format!(
            "        ForeignKeyConstraint([{}], [{}], name={}),",
            local,
            remote,
            py_str(&name)
        ));
    }

    for constraint in &table.constraints {
        if let TableConstraint::Unique { name, columns } = constraint
            && columns.len() > 1
        {
            let uq_name = build_unique_constraint_name(&table.name, columns, name.as_deref());
            args.push(format!(
                "        UniqueConstraint({}, name={}),",
                quoted_list(columns.iter().map(String::as_str)),
                py_str(&uq_name)
            ));
        }
    }

    for index in table.indexes() {
        let ix_name = build_index_name(&table.name, index.columns, index.name);
        args.push(format!(
            "        Index({}, {}),",
            py_str(&ix_name),
            quoted_list(index.columns.iter().map(String::as_str))
        ));
    }

    if args.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("    __table_args__ = (".into());
    lines.extend(args);
    lines.push("    )".into());
}

fn quoted_list<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.map(py_str).collect::<Vec<_>>().join(", ")
}

fn column_type_to_python(col_type: &ColumnType, nullable: bool) -> String {
    let base = match col_type {
        ColumnType::Simple(ty) => match ty {
            SimpleColumnType::SmallInt | SimpleColumnType::Integer | SimpleColumnType::BigInt => {
                "int".to_string()
            }
            SimpleColumnType::Real | SimpleColumnType::DoublePrecision => "float".to_string(),
            SimpleColumnType::Text => "str".to_string(),
            SimpleColumnType::Boolean => "bool".to_string(),
            SimpleColumnType::Date => "date".to_string(),
            SimpleColumnType::Time => "time".to_string(),
            SimpleColumnType::Timestamp | SimpleColumnType::Timestamptz => "datetime".to_string(),
            SimpleColumnType::Bytea => "bytes".to_string(),
            SimpleColumnType::Uuid => "UUID".to_string(),
            SimpleColumnType::Json => "dict".to_string(),
        },
        ColumnType::Complex(ty) => match ty {
            ComplexColumnType::Varchar { .. }
            | ComplexColumnType::Char { .. }
            | ComplexColumnType::Custom { .. } => "str".to_string(),
            ComplexColumnType::Numeric { .. } => "Decimal".to_string(),
            ComplexColumnType::Enum { name, .. } => to_pascal_case(name),
        },
    };

    if nullable {
        format!("Optional[{}]", base)
    } else {
        base
    }
}

fn column_type_to_sqlalchemy(table: &str, col_type: &ColumnType) -> String {
    match col_type {
        ColumnType::Simple(ty) => match ty {
            SimpleColumnType::SmallInt => "SmallInteger".into(),
            SimpleColumnType::Integer => "Integer".into(),
            SimpleColumnType::BigInt => "BigInteger".into(),
            SimpleColumnType::Real | SimpleColumnType::DoublePrecision => "Float".into(),
            SimpleColumnType::Text => "Text".into(),
            SimpleColumnType::Boolean => "Boolean".into(),
            SimpleColumnType::Date => "Date".into(),
            SimpleColumnType::Time => "Time".into(),
            SimpleColumnType::Timestamp => "DateTime".into(),
            SimpleColumnType::Timestamptz => "DateTime(timezone=True)".into(),
            SimpleColumnType::Bytea => "LargeBinary".into(),
            SimpleColumnType::Uuid => "Uuid".into(),
            SimpleColumnType::Json => "JSON".into(),
        },
        ColumnType::Complex(ty) => match ty {
            ComplexColumnType::Varchar { length } | ComplexColumnType::Char { length } => {
                format!("String({})", length)
            }
            ComplexColumnType::Numeric { precision, scale } => {
                format!("Numeric({}, {})", precision, scale)
            }
            ComplexColumnType::Custom { custom_type } => py_str(custom_type),
            ComplexColumnType::Enum { name, .. } => format!(
                "Enum({}, name={}, values_callable=lambda e: [m.value for m in e])",
                to_pascal_case(name),
                py_str(&build_enum_type_name(table, name))
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::{ColumnDef, ReferenceAction};
    use rstest::rstest;

    fn model(name: &str) -> String {
        let schema = pressroom_models::tables();
        let table = schema
            .iter()
            .find(|t| t.name == name)
            .unwrap_or_else(|| panic!("no table {name}"));
        SqlAlchemyExporter
            .render_entity_with_schema(table, &schema)
            .unwrap()
    }

    #[test]
    fn user_model() {
        let code = model("user");
        assert!(code.contains("from datetime import datetime"));
        assert!(code.contains("from typing import Optional"));
        assert!(code.contains("from uuid import UUID"));
        assert!(code.contains(
            "from sqlalchemy import DateTime, Index, String, Text, Uuid, text"
        ));
        assert!(code.contains("from .base import Base"));
        assert!(code.contains("class User(Base):"));
        assert!(code.contains("    \"\"\"A person who signs in, owns media and writes articles.\"\"\""));
        assert!(code.contains("    __tablename__ = \"user\""));
        assert!(code.contains(
            "    id: Mapped[UUID] = mapped_column(Uuid, primary_key=True, server_default=text(\"gen_random_uuid()\"))"
        ));
        assert!(code.contains(
            "    email: Mapped[str] = mapped_column(String(255), nullable=False, unique=True)"
        ));
        assert!(code.contains("    # Opaque password hash.\n    password: Mapped[str]"));
        assert!(code.contains(
            "    profile_image: Mapped[Optional[str]] = mapped_column(Text, nullable=True)"
        ));
        assert!(code.contains(
            "    created_at: Mapped[datetime] = mapped_column(DateTime(timezone=True), nullable=False, server_default=text(\"now()\"))"
        ));
        assert!(code.contains("        Index(\"ix_user__email\", \"email\"),"));
    }

    #[test]
    fn article_model_enum_and_literal_default() {
        let code = model("article");
        assert!(code.contains("import enum"));
        assert!(code.contains("class Status(str, enum.Enum):\n    DRAFT = \"draft\"\n    REVIEW = \"review\""));
        assert!(code.contains(
            "    status: Mapped[Status] = mapped_column(Enum(Status, name=\"article_status\", values_callable=lambda e: [m.value for m in e]), nullable=False, server_default=\"draft\")"
        ));
        assert!(code.contains(
            "    media_id: Mapped[UUID] = mapped_column(Uuid, ForeignKey(\"media.id\"), primary_key=True)"
        ));
        assert!(code.contains("    id: Mapped[int] = mapped_column(BigInteger, primary_key=True)"));
        assert!(code.contains("        Index(\"ix_article__status\", \"status\"),"));
        assert!(code.contains("        Index(\"ix_article__published_at\", \"published_at\"),"));
    }

    #[test]
    fn article_user_references_only_user() {
        let code = model("article_user");
        assert!(!code.contains("ForeignKeyConstraint"));
        assert!(code.contains(
            "    article_id: Mapped[int] = mapped_column(BigInteger, primary_key=True)"
        ));
        assert!(code.contains(
            "    user_id: Mapped[UUID] = mapped_column(Uuid, ForeignKey(\"user.id\"), primary_key=True)"
        ));
        assert!(code.contains(
            "    author_order: Mapped[int] = mapped_column(Integer, nullable=False, server_default=\"1\")"
        ));
        assert!(code.contains("server_default=\"contributor\""));
    }

    #[test]
    fn composite_foreign_key_constraint() {
        let table = TableDef::new(
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
        let code = SqlAlchemyExporter.render_entity(&table).unwrap();
        assert!(code.contains(
            "        ForeignKeyConstraint([\"media_id\", \"edition_id\"], [\"edition.media_id\", \"edition.id\"], name=\"fk_piece__media_id_edition_id\"),"
        ));
        assert!(code.contains(
            "    edition_id: Mapped[int] = mapped_column(BigInteger, nullable=False)"
        ));
    }

    #[test]
    fn foreign_key_actions() {
        let table = TableDef::new(
            "child",
            vec![
                ColumnDef::new("id", SimpleColumnType::Integer).primary_key(),
                ColumnDef::new("parent_id", SimpleColumnType::Integer).nullable(),
            ],
        )
        .with_constraint(TableConstraint::ForeignKey {
            name: None,
            columns: vec!["parent_id".into()],
            ref_table: "parent".into(),
            ref_columns: vec!["id".into()],
            on_delete: Some(ReferenceAction::SetNull),
            on_update: None,
        });
        let code = SqlAlchemyExporter.render_entity(&table).unwrap();
        assert!(code.contains(
            "mapped_column(Integer, ForeignKey(\"parent.id\", ondelete=\"SET NULL\"), nullable=True)"
        ));
    }

    #[test]
    fn composite_unique_and_bool_default() {
        let table = TableDef::new(
            "flag",
            vec![
                ColumnDef::new("a", SimpleColumnType::Integer).primary_key(),
                ColumnDef::new("b", SimpleColumnType::Integer),
                ColumnDef::new("on", SimpleColumnType::Boolean).default(true),
            ],
        )
        .with_constraint(TableConstraint::Unique {
            name: None,
            columns: vec!["a".into(), "b".into()],
        });
        let code = render_entity(&table.normalize().unwrap());
        assert!(code.contains("        UniqueConstraint(\"a\", \"b\", name=\"uq_flag__a_b\"),"));
        assert!(code.contains("server_default=text(\"true\")"));
    }

    #[rstest]
    #[case(SimpleColumnType::SmallInt.into(), "SmallInteger")]
    #[case(SimpleColumnType::Json.into(), "JSON")]
    #[case(ColumnType::varchar(20), "String(20)")]
    #[case(ComplexColumnType::Numeric { precision: 10, scale: 2 }.into(), "Numeric(10, 2)")]
    fn sqlalchemy_types(#[case] ty: ColumnType, #[case] expected: &str) {
        assert_eq!(column_type_to_sqlalchemy("t", &ty), expected);
    }

    #[test]
    fn base_module() {
        assert!(render_base().contains("class Base(DeclarativeBase):"));
    }
}
