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

/// Track which types are actually used to generate minimal imports
#[derive(Default)]
struct UsedTypes<'a> {
    datetime_types: BTreeSet<&'a str>,
    sa_imports: BTreeSet<&'a str>,
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
                SimpleColumnType::Date => {
                    self.datetime_types.insert("date");
                }
                SimpleColumnType::Time => {
                    self.datetime_types.insert("time");
                }
                SimpleColumnType::Timestamp | SimpleColumnType::Timestamptz => {
                    self.datetime_types.insert("datetime");
                }
                SimpleColumnType::Uuid => {
                    self.needs_uuid = true;
                }
                _ => {}
            },
            ColumnType::Complex(ComplexColumnType::Numeric { .. }) => {
                self.needs_decimal = true;
            }
            ColumnType::Complex(_) => {}
        }
    }
}

pub struct SqlModelExporter;

impl OrmExporter for SqlModelExporter {
    fn render_entity_with_schema(
        &self,
        table: &TableDef,
        schema: &[TableDef],
    ) -> Result<String, ExportError> {
        let (table, _) = prepare(table, schema)?;
        Ok(render_entity(&table))
    }
}

/// Render a SQLModel model for a normalized table definition.
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
    if foreign_keys.iter().any(|fk| fk.columns.len() > 1) {
        used_types.sa_imports.insert("ForeignKeyConstraint");
    }
    if table.indexes().iter().any(|ix| ix.columns.len() > 1) {
        used_types.sa_imports.insert("Index");
    }
    if table.unique_column_sets().iter().any(|cols| cols.len() > 1) {
        used_types.sa_imports.insert("UniqueConstraint");
    }
    if table
        .columns
        .iter()
        .any(|c| c.default.as_ref().is_some_and(DefaultValue::is_server_generated))
    {
        used_types.sa_imports.insert("text");
    }
    if !enums.is_empty() {
        used_types.sa_imports.insert("Enum");
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

    lines.push("from sqlmodel import Field, SQLModel".into());
    if !used_types.sa_imports.is_empty() {
        let sa_imports: Vec<&str> = used_types.sa_imports.iter().copied().collect();
        lines.push(format!("from sqlalchemy import {}", sa_imports.join(", ")));
    }
    lines.push(String::new());
    lines.push(String::new());

    for (enum_name, values) in &enums {
        render_enum(&mut lines, enum_name, values);
        lines.push(String::new());
        lines.push(String::new());
    }

    lines.push(format!(
        "class {}(SQLModel, table=True):",
        to_pascal_case(&table.name)
    ));
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
    fk: Option<&ForeignKeyRef<'_>>,
) {
    if let Some(comment) = &col.comment {
        lines.push(format!("    # {}", comment.replace('\n', " ")));
    }

    let mut field_args: Vec<String> = Vec::new();

    match &col.default {
        Some(default) if default.is_server_generated() => {
            field_args.push(format!(
                "sa_column_kwargs={{\"server_default\": text({})}}",
                py_str(default.to_sql().trim())
            ));
        }
        Some(default) => field_args.push(format!("default={}", python_literal(default, &col.r#type))),
        None if col.nullable => field_args.push("default=None".into()),
        None => {}
    }

    if is_pk {
        field_args.push("primary_key=True".into());
    }

    if let Some(fk) = fk {
        field_args.push(format!(
            "foreign_key={}",
            py_str(&format!("{}.{}", fk.ref_table, fk.ref_columns[0]))
        ));
        if let Some(action) = fk.on_delete {
            field_args.push(format!("ondelete={}", py_str(action.as_sql())));
        }
    }

    let is_unique = table.is_unique_column(&col.name);
    if is_unique && !is_pk {
        field_args.push("unique=True".into());
    }

    if table.is_indexed_column(&col.name) && !is_pk && !is_unique {
        field_args.push("index=True".into());
    }

    // SQLModel infers a plain VARCHAR from `str`; enums need an explicit column type
    if let Some(name) = col.r#type.enum_name() {
        field_args.push(format!(
            "sa_type=Enum({}, name={}, values_callable=lambda e: [m.value for m in e])",
            to_pascal_case(name),
            py_str(&build_enum_type_name(&table.name, name))
        ));
    } else if let ColumnType::Complex(ComplexColumnType::Varchar { length }) = &col.r#type {
        field_args.push(format!("max_length={}", length));
    }

    let field_str = if field_args.is_empty() {
        "Field()".to_string()
    } else {
        format!("Field({})", field_args.join(", "))
    };

    lines.push(format!(
        "    {}: {} = {}",
        col.name,
        column_type_to_python(&col.r#type, col.nullable),
        field_str
    ));
}

/// Application-side default as a Python literal. Enum defaults reference
/// the enum member.
fn python_literal(default: &DefaultValue, col_type: &ColumnType) -> String {
    match default {
        DefaultValue::Bool(true) => "True".into(),
        DefaultValue::Bool(false) => "False".into(),
        DefaultValue::Integer(n) => n.to_string(),
        DefaultValue::Str(_) => {
            let literal = default.literal_str().unwrap_or_default();
            match col_type {
                ColumnType::Complex(ComplexColumnType::Enum { name, .. }) => {
                    format!("{}.{}", to_pascal_case(name), to_screaming_snake_case(&literal))
                }
                ColumnType::Simple(
                    SimpleColumnType::SmallInt
                    | SimpleColumnType::Integer
                    | SimpleColumnType::BigInt
                    | SimpleColumnType::Real
                    | SimpleColumnType::DoublePrecision,
                ) if literal.parse::<f64>().is_ok() => literal,
                ColumnType::Simple(SimpleColumnType::Boolean) => {
                    if literal.eq_ignore_ascii_case("true") {
                        "True".into()
                    } else {
                        "False".into()
                    }
                }
                _ => py_str(&literal),
            }
        }
    }
}

fn render_table_args(lines: &mut Vec<String>, table: &TableDef, foreign_keys: &[ForeignKeyRef<'_>]) {
    let mut args: Vec<String> = Vec::new();

    for fk in foreign_keys.iter().filter(|fk| fk.columns.len() > 1) {
        let local: Vec<String> = fk.columns.iter().map(|c| py_str(c)).collect();
        let remote: Vec<String> = fk
            .ref_columns
            .iter()
            .map(|c| py_str(&format!("{}.{}", fk.ref_table, c)))
            .collect();
        args.push(format!(
            "        ForeignKeyConstraint([{}], [{}], name={}),",
            local.join(", "),
            remote.join(", "),
            py_str(&build_foreign_key_name(&table.name, fk.columns, fk.name))
        ));
    }

    for constraint in &table.constraints {
        match constraint {
            TableConstraint::Unique { name, columns } if columns.len() > 1 => {
                let cols: Vec<String> = columns.iter().map(|c| py_str(c)).collect();
                args.push(format!(
                    "        UniqueConstraint({}, name={}),",
                    cols.join(", "),
                    py_str(&build_unique_constraint_name(&table.name, columns, name.as_deref()))
                ));
            }
            TableConstraint::Index { name, columns } if columns.len() > 1 => {
                let cols: Vec<String> = columns.iter().map(|c| py_str(c)).collect();
                args.push(format!(
                    "        Index({}, {}),",
                    py_str(&build_index_name(&table.name, columns, name.as_deref())),
                    cols.join(", ")
                ));
            }
            _ => {}
        }
    }

    if args.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("    __table_args__ = (".into());
    lines.extend(args);
    lines.push("    )".into());
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
