pub mod config;
pub mod models;

pub use config::{load_config, load_config_from_path, load_config_or_default};
pub use models::{load_models, load_models_from_dir, parse_model};
