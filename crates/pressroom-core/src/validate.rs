use std::collections::{HashMap, HashSet};

use crate::{
    error::SchemaError,
    schema::{TableConstraint, TableDef},
};

/// Checks a set of normalized tables for internal consistency.
///
/// Stops at the first problem. Tables are expected to have gone through
/// [`TableDef::normalize`]; inline shorthands are not looked at.
pub fn validate_schema(tables: &[TableDef]) -> Result<(), SchemaError> {
    let mut by_name: HashMap<&str, &TableDef> = HashMap::new();
    for table in tables {
        if by_name.insert(table.name.as_str(), table).is_some() {
            return Err(SchemaError::DuplicateTable(table.name.clone()));
        }
    }

    for table in tables {
        validate_columns(table)?;
        validate_primary_key(table)?;
        validate_constraint_columns(table)?;
        validate_enums(table)?;
    }

    for table in tables {
        validate_foreign_keys(table, &by_name)?;
    }

    Ok(())
}

fn validate_columns(table: &TableDef) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for col in &table.columns {
        if !seen.insert(col.name.as_str()) {
            return Err(SchemaError::DuplicateColumn {
                table: table.name.clone(),
                column: col.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_primary_key(table: &TableDef) -> Result<(), SchemaError> {
    let pk_count = table
        .constraints
        .iter()
        .filter(|c| matches!(c, TableConstraint::PrimaryKey { .. }))
        .count();
    match pk_count {
        0 => return Err(SchemaError::MissingPrimaryKey(table.name.clone())),
        1 => {}
        _ => return Err(SchemaError::MultiplePrimaryKeys(table.name.clone())),
    }

    for name in table.primary_key_columns() {
        if table.column(name).is_some_and(|c| c.nullable) {
            return Err(SchemaError::NullablePrimaryKey {
                table: table.name.clone(),
                column: name.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_constraint_columns(table: &TableDef) -> Result<(), SchemaError> {
    for constraint in &table.constraints {
        if matches!(constraint, TableConstraint::Check { .. }) {
            continue;
        }
        let columns = constraint.columns();
        if columns.is_empty() {
            return Err(SchemaError::EmptyConstraintColumns {
                table: table.name.clone(),
                constraint: constraint.kind(),
            });
        }
        if let Some(unknown) = columns.iter().find(|c| table.column(c).is_none()) {
            return Err(SchemaError::UnknownConstraintColumn {
                table: table.name.clone(),
                constraint: constraint.kind(),
                column: unknown.clone(),
            });
        }
    }
    Ok(())
}

fn validate_enums(table: &TableDef) -> Result<(), SchemaError> {
    for col in &table.columns {
        let Some(values) = col.r#type.enum_values() else {
            continue;
        };
        if values.is_empty() {
            return Err(SchemaError::EmptyEnum {
                table: table.name.clone(),
                column: col.name.clone(),
            });
        }
        let mut seen = HashSet::new();
        if let Some(dup) = values.iter().find(|v| !seen.insert(v.as_str())) {
            return Err(SchemaError::DuplicateEnumValue {
                table: table.name.clone(),
                column: col.name.clone(),
                value: dup.clone(),
            });
        }
        let invalid_default = col
            .default
            .as_ref()
            .and_then(|d| d.literal_str())
            .filter(|literal| !col.r#type.accepts(literal));
        if let Some(value) = invalid_default {
            return Err(SchemaError::InvalidEnumDefault {
                table: table.name.clone(),
                column: col.name.clone(),
                value,
            });
        }
    }
    Ok(())
}

fn validate_foreign_keys(
    table: &TableDef,
    by_name: &HashMap<&str, &TableDef>,
) -> Result<(), SchemaError> {
    for fk in table.foreign_keys() {
        let Some(target) = by_name.get(fk.ref_table) else {
            return Err(SchemaError::UnknownReferencedTable {
                table: table.name.clone(),
                ref_table: fk.ref_table.to_string(),
            });
        };
        if let Some(missing) = fk.ref_columns.iter().find(|c| target.column(c).is_none()) {
            return Err(SchemaError::UnknownReferencedColumn {
                table: table.name.clone(),
                ref_table: fk.ref_table.to_string(),
                column: missing.clone(),
            });
        }
        if fk.columns.len() != fk.ref_columns.len() {
            return Err(SchemaError::ForeignKeyColumnCountMismatch {
                table: table.name.clone(),
                columns: fk.columns.len(),
                ref_columns: fk.ref_columns.len(),
            });
        }

        let ref_columns: Vec<&str> = fk.ref_columns.iter().map(String::as_str).collect();
        let targets_pk = target.primary_key_columns() == ref_columns;
        let targets_unique = target
            .unique_column_sets()
            .iter()
            .any(|cols| cols.iter().map(String::as_str).eq(ref_columns.iter().copied()));
        if !targets_pk && !targets_unique {
            return Err(SchemaError::ForeignKeyTargetNotUnique {
                table: table.name.clone(),
                ref_table: fk.ref_table.to_string(),
                ref_columns: ref_columns.join(", "),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDef, ColumnType, SimpleColumnType};
    use rstest::rstest;

    fn user() -> TableDef {
        TableDef::new(
            "user",
            vec![
                ColumnDef::new("id", SimpleColumnType::Uuid).primary_key(),
                ColumnDef::new("email", ColumnType::varchar(255)).unique(),
            ],
        )
        .normalize()
        .unwrap()
    }

    fn media(reference: &str) -> TableDef {
        TableDef::new(
            "media",
            vec![
                ColumnDef::new("id", SimpleColumnType::Uuid).primary_key(),
                ColumnDef::new("owner_id", SimpleColumnType::Uuid).foreign_key(reference),
            ],
        )
        .normalize()
        .unwrap()
    }

    #[test]
    fn consistent_schema_passes() {
        assert_eq!(validate_schema(&[user(), media("user.id")]), Ok(()));
    }

    #[test]
    fn foreign_key_may_target_unique_column() {
        let mut media = media("user.email");
        media.columns[1].r#type = ColumnType::varchar(255);
        assert_eq!(validate_schema(&[user(), media]), Ok(()));
    }

    #[rstest]
    #[case("account.id")]
    #[case("user.uid")]
    fn dangling_foreign_key_fails(#[case] reference: &str) {
        let err = validate_schema(&[user(), media(reference)]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownReferencedTable { .. } | SchemaError::UnknownReferencedColumn { .. }
        ));
    }

    #[test]
    fn foreign_key_to_plain_column_fails() {
        let mut user = user();
        user.columns.push(ColumnDef::new("name", ColumnType::varchar(100)));
        let err = validate_schema(&[user, media("user.name")]).unwrap_err();
        assert!(matches!(err, SchemaError::ForeignKeyTargetNotUnique { .. }));
    }

    #[test]
    fn partial_composite_key_target_fails() {
        let article = TableDef::new(
            "article",
            vec![
                ColumnDef::new("media_id", SimpleColumnType::Uuid).primary_key(),
                ColumnDef::new("id", SimpleColumnType::BigInt).primary_key(),
            ],
        )
        .normalize()
        .unwrap();
        let link = TableDef::new(
            "link",
            vec![ColumnDef::new("article_id", SimpleColumnType::BigInt)
                .primary_key()
                .foreign_key("article.id")],
        )
        .normalize()
        .unwrap();
        let err = validate_schema(&[article, link]).unwrap_err();
        assert!(matches!(err, SchemaError::ForeignKeyTargetNotUnique { .. }));
    }

    #[test]
    fn column_count_mismatch_fails() {
        let mut media = media("user.id");
        media.constraints.push(TableConstraint::ForeignKey {
            name: None,
            columns: vec!["owner_id".into(), "id".into()],
            ref_table: "user".into(),
            ref_columns: vec!["id".into()],
            on_delete: None,
            on_update: None,
        });
        let err = validate_schema(&[user(), media]).unwrap_err();
        assert!(matches!(err, SchemaError::ForeignKeyColumnCountMismatch { columns: 2, ref_columns: 1, .. }));
    }

    #[test]
    fn duplicate_table_fails() {
        assert_eq!(
            validate_schema(&[user(), user()]),
            Err(SchemaError::DuplicateTable("user".into()))
        );
    }

    #[test]
    fn duplicate_column_fails() {
        let mut user = user();
        user.columns.push(ColumnDef::new("email", SimpleColumnType::Text));
        assert!(matches!(
            validate_schema(&[user]),
            Err(SchemaError::DuplicateColumn { ref column, .. }) if column == "email"
        ));
    }

    #[test]
    fn missing_and_nullable_primary_key_fail() {
        let no_pk = TableDef::new("log", vec![ColumnDef::new("line", SimpleColumnType::Text)]);
        assert_eq!(
            validate_schema(&[no_pk]),
            Err(SchemaError::MissingPrimaryKey("log".into()))
        );

        let nullable = TableDef::new(
            "log",
            vec![ColumnDef::new("id", SimpleColumnType::Uuid).primary_key().nullable()],
        )
        .normalize()
        .unwrap();
        assert!(matches!(
            validate_schema(&[nullable]),
            Err(SchemaError::NullablePrimaryKey { .. })
        ));
    }

    #[test]
    fn unknown_and_empty_constraint_columns_fail() {
        let mut user = user();
        user.constraints.push(TableConstraint::Index {
            name: None,
            columns: vec!["nickname".into()],
        });
        assert!(matches!(
            validate_schema(&[user]),
            Err(SchemaError::UnknownConstraintColumn { constraint: "index", .. })
        ));

        let mut user = self::user();
        user.constraints.push(TableConstraint::Unique {
            name: None,
            columns: vec![],
        });
        assert!(matches!(
            validate_schema(&[user]),
            Err(SchemaError::EmptyConstraintColumns { constraint: "unique", .. })
        ));
    }

    fn with_enum(values: &[&str], default: Option<&str>) -> TableDef {
        let mut status = ColumnDef::new("status", ColumnType::enumeration("status", values.iter().copied()));
        if let Some(default) = default {
            status = status.default(default);
        }
        TableDef::new(
            "article",
            vec![ColumnDef::new("id", SimpleColumnType::BigInt).primary_key(), status],
        )
        .normalize()
        .unwrap()
    }

    #[test]
    fn enum_checks() {
        assert_eq!(validate_schema(&[with_enum(&["draft", "review"], Some("'draft'"))]), Ok(()));
        assert!(matches!(
            validate_schema(&[with_enum(&[], None)]),
            Err(SchemaError::EmptyEnum { .. })
        ));
        assert!(matches!(
            validate_schema(&[with_enum(&["draft", "draft"], None)]),
            Err(SchemaError::DuplicateEnumValue { ref value, .. }) if value == "draft"
        ));
        assert!(matches!(
            validate_schema(&[with_enum(&["draft", "review"], Some("'deleted'"))]),
            Err(SchemaError::InvalidEnumDefault { ref value, .. }) if value == "deleted"
        ));
    }
}
