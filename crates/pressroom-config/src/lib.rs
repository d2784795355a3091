pub mod backend;
pub mod config;
pub mod file_format;

pub use backend::SqlBackend;
pub use config::{CONFIG_FILE_NAME, PressroomConfig, SeaOrmConfig};
pub use file_format::FileFormat;
