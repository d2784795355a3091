use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::{
    column::ColumnDef,
    constraint::TableConstraint,
    names::{ColumnName, TableName},
    reference::ReferenceAction,
    str_or_bool::StrOrBoolOrArray,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub struct TableDef {
    pub name: TableName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub columns: Vec<ColumnDef>,
    #[serde(default)]
    pub constraints: Vec<TableConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableValidationError {
    #[error("column `{column}`: foreign key reference `{reference}` is not of the form `table.column`")]
    InvalidForeignKeyReference { column: String, reference: String },
    #[error(
        "table `{table}`: inline primary key {inline:?} conflicts with declared primary key {declared:?}"
    )]
    ConflictingPrimaryKey {
        table: String,
        inline: Vec<ColumnName>,
        declared: Vec<ColumnName>,
    },
}

/// Borrowed view of a table-level foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRef<'a> {
    pub name: Option<&'a str>,
    pub columns: &'a [ColumnName],
    pub ref_table: &'a str,
    pub ref_columns: &'a [ColumnName],
    pub on_delete: Option<ReferenceAction>,
    pub on_update: Option<ReferenceAction>,
}

/// Borrowed view of a table-level secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRef<'a> {
    pub name: Option<&'a str>,
    pub columns: &'a [ColumnName],
}

impl TableDef {
    pub fn new(name: impl Into<TableName>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            description: None,
            columns,
            constraints: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key columns in key order.
    ///
    /// Uses the table-level constraint when present, otherwise the columns
    /// flagged inline, so it works on both raw and normalized tables.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        let declared = self.constraints.iter().find_map(|c| match c {
            TableConstraint::PrimaryKey { columns, .. } => Some(columns),
            _ => None,
        });
        match declared {
            Some(columns) => columns.iter().map(String::as_str).collect(),
            None => self
                .columns
                .iter()
                .filter(|c| c.is_primary_key())
                .map(|c| c.name.as_str())
                .collect(),
        }
    }

    pub fn foreign_keys(&self) -> Vec<ForeignKeyRef<'_>> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                TableConstraint::ForeignKey {
                    name,
                    columns,
                    ref_table,
                    ref_columns,
                    on_delete,
                    on_update,
                } => Some(ForeignKeyRef {
                    name: name.as_deref(),
                    columns,
                    ref_table,
                    ref_columns,
                    on_delete: *on_delete,
                    on_update: *on_update,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn indexes(&self) -> Vec<IndexRef<'_>> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                TableConstraint::Index { name, columns } => Some(IndexRef {
                    name: name.as_deref(),
                    columns,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn unique_column_sets(&self) -> Vec<&[ColumnName]> {
        self.constraints
            .iter()
            .filter_map(|c| match c {
                TableConstraint::Unique { columns, .. } => Some(columns.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Whether `column` alone is covered by a single-column unique constraint.
    pub fn is_unique_column(&self, column: &str) -> bool {
        self.unique_column_sets()
            .iter()
            .any(|cols| cols.len() == 1 && cols[0] == column)
    }

    /// Whether `column` alone carries a single-column index.
    pub fn is_indexed_column(&self, column: &str) -> bool {
        self.indexes()
            .iter()
            .any(|ix| ix.columns.len() == 1 && ix.columns[0] == column)
    }

    /// Folds inline column shorthands (`primary_key`, `unique`, `index`,
    /// `foreign_key`) into table-level constraints.
    ///
    /// The result carries no inline shorthands, so normalizing twice yields
    /// the same table. Constraint order is: primary key, declared
    /// constraints, then inline unique, foreign key and index constraints in
    /// column order.
    pub fn normalize(&self) -> Result<TableDef, TableValidationError> {
        let mut constraints = self.constraints.clone();

        let inline_pk: Vec<ColumnName> = self
            .columns
            .iter()
            .filter(|c| c.is_primary_key())
            .map(|c| c.name.clone())
            .collect();
        let auto_increment = self.columns.iter().any(|c| {
            c.primary_key
                .as_ref()
                .is_some_and(|pk| pk.auto_increment())
        });

        let declared_pk = constraints.iter().find_map(|c| match c {
            TableConstraint::PrimaryKey { columns, .. } => Some(columns.clone()),
            _ => None,
        });
        match declared_pk {
            Some(declared) if !inline_pk.is_empty() && declared != inline_pk => {
                return Err(TableValidationError::ConflictingPrimaryKey {
                    table: self.name.clone(),
                    inline: inline_pk,
                    declared,
                });
            }
            Some(_) => {}
            None if !inline_pk.is_empty() => {
                constraints.insert(
                    0,
                    TableConstraint::PrimaryKey {
                        auto_increment,
                        columns: inline_pk,
                    },
                );
            }
            None => {}
        }

        let mut uniques = ConstraintGroups::default();
        let mut indexes = ConstraintGroups::default();
        let mut foreign_keys = Vec::new();

        for col in &self.columns {
            if let Some(unique) = &col.unique {
                uniques.add(unique, &col.name);
            }
            if let Some(fk) = &col.foreign_key {
                let def = fk.resolve(&col.name)?;
                let exists = constraints.iter().any(|c| {
                    matches!(c, TableConstraint::ForeignKey { columns, .. }
                        if columns.len() == 1 && columns[0] == col.name)
                });
                if !exists {
                    foreign_keys.push(TableConstraint::ForeignKey {
                        name: None,
                        columns: vec![col.name.clone()],
                        ref_table: def.ref_table,
                        ref_columns: def.ref_columns,
                        on_delete: def.on_delete,
                        on_update: def.on_update,
                    });
                }
            }
            if let Some(index) = &col.index {
                indexes.add(index, &col.name);
            }
        }

        for (name, columns) in uniques.groups {
            let exists = constraints.iter().any(|c| {
                matches!(c, TableConstraint::Unique { name: n, columns: cols }
                    if *n == name && *cols == columns)
            });
            if !exists {
                constraints.push(TableConstraint::Unique { name, columns });
            }
        }
        constraints.extend(foreign_keys);
        for (name, columns) in indexes.groups {
            let exists = constraints.iter().any(|c| {
                matches!(c, TableConstraint::Index { name: n, columns: cols }
                    if *n == name && *cols == columns)
            });
            if !exists {
                constraints.push(TableConstraint::Index { name, columns });
            }
        }

        let columns = self
            .columns
            .iter()
            .map(|c| ColumnDef {
                primary_key: None,
                unique: None,
                index: None,
                foreign_key: None,
                ..c.clone()
            })
            .collect();

        Ok(TableDef {
            name: self.name.clone(),
            description: self.description.clone(),
            columns,
            constraints,
        })
    }
}

/// Inline unique/index shorthands grouped into constraints, in order of
/// first appearance. Unnamed entries always stay single-column.
#[derive(Default)]
struct ConstraintGroups {
    groups: Vec<(Option<String>, Vec<ColumnName>)>,
}

impl ConstraintGroups {
    fn add(&mut self, shorthand: &StrOrBoolOrArray, column: &str) {
        match shorthand {
            StrOrBoolOrArray::Bool(false) => {}
            StrOrBoolOrArray::Bool(true) => self.groups.push((None, vec![column.to_string()])),
            StrOrBoolOrArray::Str(name) => self.add_named(name, column),
            StrOrBoolOrArray::Array(names) => {
                for name in names {
                    self.add_named(name, column);
                }
            }
        }
    }

    fn add_named(&mut self, name: &str, column: &str) {
        let existing = self
            .groups
            .iter_mut()
            .find(|(n, _)| n.as_deref() == Some(name));
        match existing {
            Some((_, columns)) => {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
            None => self
                .groups
                .push((Some(name.to_string()), vec![column.to_string()])),
        }
    }
}
