pub mod check;
pub mod export;
pub mod init;
pub mod new;
pub mod schema;
pub mod sql;

pub use check::cmd_check;
pub use export::cmd_export;
pub use init::cmd_init;
pub use new::cmd_new;
pub use schema::cmd_schema;
pub use sql::cmd_sql;
