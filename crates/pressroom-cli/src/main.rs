use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
use crate::commands::export::OrmArg;
use commands::{cmd_check, cmd_export, cmd_init, cmd_new, cmd_schema, cmd_sql};
use pressroom_config::{FileFormat, SqlBackend};

/// Environment variable holding the log filter (`tracing` directives).
const LOG_ENV: &str = "PRESSROOM_LOG";

/// pressroom command-line interface.
#[derive(Parser, Debug)]
#[command(name = "pressroom", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize pressroom.json with defaults.
    Init,
    /// Create a new model file from template.
    New {
        /// Model name (table name).
        name: String,
        /// Output format: json|yaml|yml (default: config modelFormat or json).
        #[arg(short = 'f', long = "format", value_enum)]
        format: Option<FileFormat>,
    },
    /// Load and validate all models, then print a summary per table.
    Check,
    /// Show the CREATE statements for all models.
    Sql {
        /// Database backend for SQL generation (default: config backend).
        #[arg(short = 'b', long = "backend", value_enum)]
        backend: Option<SqlBackend>,
    },
    /// Export models into ORM-specific code.
    Export {
        /// Target ORM for export.
        #[arg(short = 'o', long = "orm", value_enum, default_value = "seaorm")]
        orm: OrmArg,
        /// Output directory (defaults to config modelExportDir).
        #[arg(short = 'd', long = "export-dir")]
        export_dir: Option<PathBuf>,
    },
    /// Write JSON Schemas for model files and pressroom.json.
    Schema {
        /// Output directory for schema files.
        #[arg(short = 'o', long = "out", default_value = "schemas")]
        out: PathBuf,
    },
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Init) => cmd_init(),
        Some(Commands::New { name, format }) => cmd_new(name, format),
        Some(Commands::Check) => cmd_check(),
        Some(Commands::Sql { backend }) => cmd_sql(backend),
        Some(Commands::Export { orm, export_dir }) => cmd_export(orm, export_dir).await,
        Some(Commands::Schema { out }) => cmd_schema(out),
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
