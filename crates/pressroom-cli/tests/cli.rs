use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::tempdir;

fn pressroom(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("pressroom"));
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("PRESSROOM_LOG");
    cmd
}

fn write_models(dir: &Path) {
    let models = dir.join("models");
    fs::create_dir_all(&models).unwrap();
    fs::write(
        models.join("tag.json"),
        r#"{
  "name": "tag",
  "columns": [
    { "name": "id", "type": "integer", "primary_key": { "auto_increment": true } },
    { "name": "label", "type": { "kind": "varchar", "length": 50 }, "unique": true }
  ]
}"#,
    )
    .unwrap();
}

#[test]
fn no_args_shows_help() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_commands() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("check"))
                .and(predicate::str::contains("export"))
                .and(predicate::str::contains("schema")),
        );
}

#[test]
fn commands_need_a_config() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pressroom init"));
}

#[test]
fn init_then_new_then_check() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path()).arg("init").assert().success();
    assert!(tmp.path().join("pressroom.json").exists());

    pressroom(tmp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    pressroom(tmp.path())
        .args(["new", "draft", "-f", "yaml"])
        .assert()
        .success();
    assert!(tmp.path().join("models/draft.yaml").exists());

    // an empty template has no primary key yet
    pressroom(tmp.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no primary key"));
}

#[test]
fn sql_prints_ddl_for_requested_backend() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path()).arg("init").assert().success();
    write_models(tmp.path());

    pressroom(tmp.path())
        .args(["sql", "--backend", "sqlite"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#"CREATE TABLE "tag""#)
                .and(predicate::str::contains("CREATE UNIQUE INDEX")),
        );
}

#[test]
fn export_writes_one_file_per_model() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path()).arg("init").assert().success();
    write_models(tmp.path());

    pressroom(tmp.path())
        .args(["export", "--orm", "sqlmodel", "--export-dir", "out"])
        .assert()
        .success();

    let code = fs::read_to_string(tmp.path().join("out/tag.py")).unwrap();
    assert!(code.contains("class Tag(SQLModel, table=True):"));
}

#[test]
fn schema_writes_both_files() {
    let tmp = tempdir().unwrap();
    pressroom(tmp.path())
        .args(["schema", "--out", "schemas"])
        .assert()
        .success();

    assert!(tmp.path().join("schemas/model.schema.json").exists());
    assert!(tmp.path().join("schemas/config.schema.json").exists());
}
