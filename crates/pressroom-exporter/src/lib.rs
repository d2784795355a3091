//! Helpers to convert `TableDef` models into ORM-specific representations
//! such as SeaORM, SQLAlchemy, and SQLModel.

pub mod error;
pub mod orm;
pub mod seaorm;
pub mod sqlalchemy;
pub mod sqlmodel;

pub use error::ExportError;
pub use orm::{Orm, OrmExporter, render_entity, render_entity_with_schema};
pub use seaorm::{SeaOrmExporter, SeaOrmExporterWithConfig};
pub use sqlalchemy::SqlAlchemyExporter;
pub use sqlmodel::SqlModelExporter;
