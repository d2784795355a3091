use anyhow::Result;
use colored::Colorize;
use pressroom_core::{ColumnDef, ColumnType, ComplexColumnType, SimpleColumnType, TableDef};
use pressroom_loader::{load_config, load_models};

/// Load, normalize and validate every model, then print what each table
/// ends up with.
pub fn cmd_check() -> Result<()> {
    let config = load_config()?;
    let models = load_models(&config)?;

    if models.is_empty() {
        println!(
            "{} {}",
            "No models found in".bright_yellow(),
            config.models_dir().display().to_string().bright_white()
        );
        return Ok(());
    }

    for table in &models {
        println!("{}", table.name.bright_cyan().bold());
        for line in describe_table(table) {
            println!("  {}", line);
        }
        println!();
    }

    println!(
        "{} {}",
        "Schema OK:".bright_green().bold(),
        format!("{} tables", models.len()).bright_white()
    );
    Ok(())
}

fn describe_table(table: &TableDef) -> Vec<String> {
    let mut lines: Vec<String> = table.columns.iter().map(describe_column).collect();

    lines.push(format!("primary key ({})", table.primary_key_columns().join(", ")));

    for fk in table.foreign_keys() {
        let mut line = format!(
            "foreign key ({}) -> {}({})",
            fk.columns.join(", "),
            fk.ref_table,
            fk.ref_columns.join(", ")
        );
        if let Some(action) = fk.on_delete {
            line.push_str(&format!(" on delete {}", action.as_sql()));
        }
        if let Some(action) = fk.on_update {
            line.push_str(&format!(" on update {}", action.as_sql()));
        }
        lines.push(line);
    }

    for columns in table.unique_column_sets() {
        lines.push(format!("unique ({})", columns.join(", ")));
    }

    for index in table.indexes() {
        lines.push(format!("index ({})", index.columns.join(", ")));
    }

    lines
}

fn describe_column(column: &ColumnDef) -> String {
    let mut line = format!("{}: {}", column.name, describe_type(&column.r#type));
    if column.nullable {
        line.push_str(" null");
    }
    if let Some(default) = &column.default {
        line.push_str(&format!(" default {}", default.to_sql()));
    }
    line
}

fn describe_type(ty: &ColumnType) -> String {
    match ty {
        ColumnType::Simple(simple) => match simple {
            SimpleColumnType::SmallInt => "smallint",
            SimpleColumnType::Integer => "integer",
            SimpleColumnType::BigInt => "bigint",
            SimpleColumnType::Real => "real",
            SimpleColumnType::DoublePrecision => "double precision",
            SimpleColumnType::Text => "text",
            SimpleColumnType::Boolean => "boolean",
            SimpleColumnType::Date => "date",
            SimpleColumnType::Time => "time",
            SimpleColumnType::Timestamp => "timestamp",
            SimpleColumnType::Timestamptz => "timestamptz",
            SimpleColumnType::Bytea => "bytea",
            SimpleColumnType::Uuid => "uuid",
            SimpleColumnType::Json => "json",
        }
        .to_string(),
        ColumnType::Complex(complex) => match complex {
            ComplexColumnType::Varchar { length } => format!("varchar({})", length),
            ComplexColumnType::Char { length } => format!("char({})", length),
            ComplexColumnType::Numeric { precision, scale } => {
                format!("numeric({}, {})", precision, scale)
            }
            ComplexColumnType::Custom { custom_type } => custom_type.clone(),
            ComplexColumnType::Enum { name, values } => {
                format!("enum {} [{}]", name, values.join(", "))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{CwdGuard, write_config, write_sample_models};
    use pressroom_config::PressroomConfig;
    use rstest::rstest;
    use serial_test::serial;
    use tempfile::tempdir;

    #[rstest]
    #[case(ColumnType::Simple(SimpleColumnType::Timestamptz), "timestamptz")]
    #[case(ColumnType::varchar(255), "varchar(255)")]
    #[case(
        ColumnType::Complex(ComplexColumnType::Numeric { precision: 10, scale: 2 }),
        "numeric(10, 2)"
    )]
    #[case(ColumnType::enumeration("role", ["lead", "contributor"]), "enum role [lead, contributor]")]
    fn type_descriptions(#[case] ty: ColumnType, #[case] expected: &str) {
        assert_eq!(describe_type(&ty), expected);
    }

    #[test]
    #[serial]
    fn describes_normalized_constraints() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        let config = PressroomConfig::default();
        write_sample_models(config.models_dir());

        let models = load_models(&config).unwrap();
        let post = models.iter().find(|t| t.name == "post").unwrap();
        let lines = describe_table(post);

        assert!(lines.contains(&"id: bigint".to_string()));
        assert!(lines.contains(&"status: enum status [draft, published] default 'draft'".to_string()));
        assert!(lines.contains(&"primary key (id)".to_string()));
        assert!(lines.contains(&"foreign key (author_id) -> author(id)".to_string()));
        assert!(lines.contains(&"index (author_id)".to_string()));

        let author = models.iter().find(|t| t.name == "author").unwrap();
        let lines = describe_table(author);
        assert!(lines.contains(&"unique (email)".to_string()));
        assert!(lines.contains(&"created_at: timestamptz default now()".to_string()));
    }

    #[test]
    #[serial]
    fn cmd_check_accepts_valid_models() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        let config = PressroomConfig::default();
        write_config(&config);
        write_sample_models(config.models_dir());

        cmd_check().unwrap();
    }

    #[test]
    #[serial]
    fn cmd_check_reports_dangling_foreign_key() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        let config = PressroomConfig::default();
        write_config(&config);
        std::fs::create_dir_all(config.models_dir()).unwrap();
        std::fs::write(
            config.models_dir().join("post.json"),
            r#"{
  "name": "post",
  "columns": [
    { "name": "id", "type": "big_int", "primary_key": true },
    { "name": "author_id", "type": "uuid", "foreign_key": "author.id" }
  ]
}"#,
        )
        .unwrap();

        let err = cmd_check().unwrap_err();
        assert!(format!("{:#}", err).contains("author"));
    }

    #[test]
    #[serial]
    fn cmd_check_with_empty_models_dir() {
        let tmp = tempdir().unwrap();
        let _guard = CwdGuard::new(tmp.path());
        write_config(&PressroomConfig::default());

        cmd_check().unwrap();
    }
}
