use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use futures::future::try_join_all;
use pressroom_config::SeaOrmConfig;
use pressroom_core::TableDef;
use pressroom_exporter::{
    Orm, OrmExporter, SeaOrmExporterWithConfig, render_entity_with_schema, sqlalchemy,
};
use pressroom_loader::{load_config, load_models};
use tokio::fs;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OrmArg {
    Seaorm,
    Sqlalchemy,
    Sqlmodel,
}

impl From<OrmArg> for Orm {
    fn from(value: OrmArg) -> Self {
        match value {
            OrmArg::Seaorm => Orm::SeaOrm,
            OrmArg::Sqlalchemy => Orm::SqlAlchemy,
            OrmArg::Sqlmodel => Orm::SqlModel,
        }
    }
}

/// A generated file, relative to the export directory.
#[derive(Debug)]
struct GeneratedFile {
    name: String,
    code: String,
}

pub async fn cmd_export(orm: OrmArg, export_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let models = load_models(&config)?;
    let target_root = export_dir.unwrap_or_else(|| config.model_export_dir().to_path_buf());
    let orm: Orm = orm.into();

    // Render everything before the export dir is touched.
    let files = render_files(orm, &models, config.seaorm())?;

    clean_export_dir(&target_root, orm).await?;
    fs::create_dir_all(&target_root)
        .await
        .with_context(|| format!("create export dir {}", target_root.display()))?;

    let write_futures: Vec<_> = files
        .iter()
        .map(|file| {
            let out_path = target_root.join(&file.name);
            async move {
                fs::write(&out_path, &file.code)
                    .await
                    .with_context(|| format!("write {}", out_path.display()))?;
                tracing::debug!(path = %out_path.display(), bytes = file.code.len(), "exported");
                println!(
                    "{} {}",
                    "Exported".bright_green(),
                    out_path.display().to_string().bright_white()
                );
                Ok::<(), anyhow::Error>(())
            }
        })
        .collect();

    try_join_all(write_futures).await?;
    tracing::info!(count = files.len(), dir = %target_root.display(), "export finished");
    Ok(())
}

fn render_files(orm: Orm, models: &[TableDef], seaorm: &SeaOrmConfig) -> Result<Vec<GeneratedFile>> {
    let seaorm_exporter = SeaOrmExporterWithConfig::new(seaorm);
    let ext = orm.file_extension();

    let mut files = models
        .iter()
        .map(|table| {
            let code = match orm {
                Orm::SeaOrm => seaorm_exporter.render_entity_with_schema(table, models),
                _ => render_entity_with_schema(orm, table, models),
            }
            .with_context(|| format!("render table '{}'", table.name))?;
            Ok(GeneratedFile {
                name: format!("{}.{}", module_name(&table.name), ext),
                code,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match orm {
        Orm::SeaOrm => files.push(GeneratedFile {
            name: "mod.rs".into(),
            code: render_mod_rs(models),
        }),
        Orm::SqlAlchemy => files.push(GeneratedFile {
            name: format!("{}.py", sqlalchemy::BASE_MODULE),
            code: sqlalchemy::render_base(),
        }),
        Orm::SqlModel => {}
    }

    Ok(files)
}

fn render_mod_rs(models: &[TableDef]) -> String {
    let mut modules: Vec<String> = models.iter().map(|t| module_name(&t.name)).collect();
    modules.sort();
    modules
        .iter()
        .map(|m| format!("pub mod {};\n", m))
        .collect()
}

fn module_name(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Remove previously generated files of `orm` below `root` so no stale model
/// survives a rename, then drop the directories that end up empty. `root`
/// itself is kept.
async fn clean_export_dir(root: &Path, orm: Orm) -> Result<()> {
    if !root.is_dir() {
        return Ok(());
    }
    let ext = orm.file_extension();

    let mut pending = vec![root.to_path_buf()];
    let mut visited: Vec<PathBuf> = Vec::new();
    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("read dir {}", dir.display()))?;
        let mut stale = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|e| e == ext) {
                stale.push(path);
            }
        }

        try_join_all(stale.iter().map(|path| async move {
            fs::remove_file(path)
                .await
                .with_context(|| format!("remove file {}", path.display()))
        }))
        .await?;
        if !stale.is_empty() {
            tracing::debug!(dir = %dir.display(), removed = stale.len(), "removed stale exports");
        }
        visited.push(dir);
    }

    // a directory is always visited after its parent
    for dir in visited[1..].iter().rev() {
        let mut entries = fs::read_dir(dir).await?;
        if entries.next_entry().await?.is_none() {
            fs::remove_dir(dir)
                .await
                .with_context(|| format!("remove empty dir {}", dir.display()))?;
        }
    }

    Ok(())
}
