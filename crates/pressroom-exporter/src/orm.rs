use pressroom_core::TableDef;

use crate::{
    error::ExportError, seaorm::SeaOrmExporter, sqlalchemy::SqlAlchemyExporter,
    sqlmodel::SqlModelExporter,
};

/// Supported ORM targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orm {
    SeaOrm,
    SqlAlchemy,
    SqlModel,
}

impl Orm {
    /// Extension of the generated source files.
    pub fn file_extension(self) -> &'static str {
        match self {
            Orm::SeaOrm => "rs",
            Orm::SqlAlchemy | Orm::SqlModel => "py",
        }
    }
}

/// Standardized exporter interface for all supported ORMs.
pub trait OrmExporter {
    /// Render `table` on its own. Relations pointing back at it are unknown.
    fn render_entity(&self, table: &TableDef) -> Result<String, ExportError> {
        self.render_entity_with_schema(table, &[])
    }

    /// Render `table` with the whole schema in view, so reverse and
    /// many-to-many relations can be emitted.
    fn render_entity_with_schema(
        &self,
        table: &TableDef,
        schema: &[TableDef],
    ) -> Result<String, ExportError>;
}

/// Render a single table definition for the selected ORM.
pub fn render_entity(orm: Orm, table: &TableDef) -> Result<String, ExportError> {
    render_entity_with_schema(orm, table, &[])
}

/// Render a table definition for the selected ORM with schema context.
pub fn render_entity_with_schema(
    orm: Orm,
    table: &TableDef,
    schema: &[TableDef],
) -> Result<String, ExportError> {
    match orm {
        Orm::SeaOrm => SeaOrmExporter.render_entity_with_schema(table, schema),
        Orm::SqlAlchemy => SqlAlchemyExporter.render_entity_with_schema(table, schema),
        Orm::SqlModel => SqlModelExporter.render_entity_with_schema(table, schema),
    }
}

/// Normalizes `table` and every table of `schema`.
///
/// When a schema is given, each foreign key of `table` must point into it.
pub(crate) fn prepare(
    table: &TableDef,
    schema: &[TableDef],
) -> Result<(TableDef, Vec<TableDef>), ExportError> {
    if table.columns.is_empty() {
        return Err(ExportError::EmptyTable {
            table: table.name.clone(),
        });
    }
    let table = table.normalize()?;
    let schema = schema
        .iter()
        .map(TableDef::normalize)
        .collect::<Result<Vec<_>, _>>()?;

    if !schema.is_empty() {
        for fk in table.foreign_keys() {
            if !schema.iter().any(|t| t.name == fk.ref_table) {
                return Err(ExportError::UnknownReferencedTable {
                    table: table.name.clone(),
                    ref_table: fk.ref_table.to_string(),
                });
            }
        }
    }
    Ok((table, schema))
}

/// Python-style quoted string.
pub(crate) fn py_str(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// `SCREAMING_SNAKE_CASE` name for a Python enum member.
pub(crate) fn to_screaming_snake_case(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::{ColumnDef, SimpleColumnType};
    use rstest::rstest;

    fn user() -> TableDef {
        TableDef::new(
            "user",
            vec![ColumnDef::new("id", SimpleColumnType::Uuid).primary_key()],
        )
    }

    fn post() -> TableDef {
        TableDef::new(
            "post",
            vec![
                ColumnDef::new("id", SimpleColumnType::Integer).primary_key(),
                ColumnDef::new("author_id", SimpleColumnType::Uuid).foreign_key("user.id"),
            ],
        )
    }

    #[rstest]
    #[case(Orm::SeaOrm, "pub struct Model")]
    #[case(Orm::SqlAlchemy, "class Post(Base):")]
    #[case(Orm::SqlModel, "class Post(SQLModel, table=True):")]
    fn dispatches_to_each_exporter(#[case] orm: Orm, #[case] expected: &str) {
        let code = render_entity(orm, &post()).unwrap();
        assert!(code.contains(expected), "{code}");
    }

    #[test]
    fn rejects_table_without_columns() {
        let err = render_entity(Orm::SeaOrm, &TableDef::new("empty", vec![])).unwrap_err();
        assert!(matches!(err, ExportError::EmptyTable { .. }));
    }

    #[test]
    fn rejects_reference_outside_schema() {
        let err = render_entity_with_schema(Orm::SqlModel, &post(), &[post()]).unwrap_err();
        assert!(matches!(
            err,
            ExportError::UnknownReferencedTable { ref_table, .. } if ref_table == "user"
        ));
        assert!(render_entity_with_schema(Orm::SqlModel, &post(), &[user(), post()]).is_ok());
    }

    #[rstest]
    #[case("draft", "DRAFT")]
    #[case("in-review", "IN_REVIEW")]
    #[case("1st", "_1ST")]
    fn screaming_snake_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_screaming_snake_case(input), expected);
    }

    #[test]
    fn file_extensions() {
        assert_eq!(Orm::SeaOrm.file_extension(), "rs");
        assert_eq!(Orm::SqlAlchemy.file_extension(), "py");
    }
}
