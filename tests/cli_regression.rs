// Regression tests for the infrascript binary.
// Requires: assert_cmd, predicates, tempfile in [dev-dependencies]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::TempDir;

const SCENARIO: &str = "vpcid = create vpc cidr=10.0.0.0/16\ncreate subnet vpc=$vpcid cidr=10.0.0.1/24\n";

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path.display().to_string()
}

fn infrascript(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("infrascript").unwrap();
    cmd.current_dir(dir.path()).arg("--color").arg("never");
    cmd
}

#[test]
fn check_reports_ok_for_valid_templates() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "main.aws", SCENARIO);

    infrascript(&dir)
        .arg("check")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("ok").and(contains("main.aws")));
}

#[test]
fn check_renders_a_snippet_and_fails() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "bad.aws", "create unknownentity\n");

    infrascript(&dir)
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stderr(
            contains("parse error near Entity (line 1 symbol 8 - line 1 symbol 9)")
                .and(contains("1 | create unknownentity"))
                .and(contains("^ err")),
        );
}

#[test]
fn check_walks_directories_by_extension() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "stack/a.aws", "create vpc\n");
    write(dir.path(), "stack/nested/b.tpl", "delete vpc id=vpc-1\n");
    write(dir.path(), "stack/readme.md", "not a template at all");

    infrascript(&dir)
        .arg("check")
        .arg("stack")
        .assert()
        .success()
        .stdout(contains("a.aws").and(contains("b.tpl")).and(contains("readme.md").not()));
}

#[test]
fn config_extensions_change_the_walk() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "infrascript.yaml", "extensions: [txt]\n");
    write(dir.path(), "stack/a.txt", "create unknownentity\n");
    write(dir.path(), "stack/b.aws", "create vpc\n");

    infrascript(&dir)
        .arg("check")
        .arg("stack")
        .assert()
        .failure()
        .stderr(contains("a.txt"))
        .stdout(contains("b.aws").not());
}

#[test]
fn invalid_config_is_reported_through_miette() {
    let dir = TempDir::new().unwrap();
    let config = write(dir.path(), "broken.yaml", "initial_token_capacity: lots\n");
    let file = write(dir.path(), "main.aws", SCENARIO);

    infrascript(&dir)
        .arg("--config")
        .arg(&config)
        .arg("check")
        .arg(&file)
        .assert()
        .failure()
        .stderr(contains("infrascript::config"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    infrascript(&dir)
        .arg("tree")
        .arg("nowhere.aws")
        .assert()
        .failure()
        .stderr(contains("cannot read nowhere.aws"));
}

#[test]
fn tokens_lists_records_in_completion_order() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "one.aws", "create vpc");

    infrascript(&dir)
        .arg("tokens")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Action 0 6\nText 0 6\nActionName 6 6\n").and(contains("Script 0 10\n")));
}

#[test]
fn tree_prints_nested_rules() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "one.aws", "create vpc");

    infrascript(&dir)
        .arg("tree")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Script \"create vpc\"\n Statement \"create vpc\"\n  Expr \"create vpc\"\n"));
}

#[test]
fn ast_prints_template_text_and_json() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "main.aws", SCENARIO);

    infrascript(&dir)
        .arg("ast")
        .arg(&file)
        .assert()
        .success()
        .stdout(SCENARIO);

    infrascript(&dir)
        .arg("ast")
        .arg("--json")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("\"identifier\": \"vpcid\"").and(contains("\"type\": \"ref\"")));
}
