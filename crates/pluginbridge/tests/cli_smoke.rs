use assert_cmd::Command;
use predicates::prelude::*;

fn pluginbridge() -> Command {
    let mut cmd = Command::cargo_bin("pluginbridge").expect("binary exists");
    cmd.env("PLUGINBRIDGE_LOG", "warn");
    cmd
}

#[test]
fn help_displays_usage() {
    pluginbridge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn catalog_lists_article_messages() {
    pluginbridge()
        .args(["catalog", "--format", "plain", "--facade", "article"])
        .assert()
        .success()
        .stdout(predicate::str::contains("article-published-get"))
        .stdout(predicate::str::contains("editor-insert-element").not());
}

#[test]
fn catalog_writes_output_file() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("messages.json");
    pluginbridge()
        .args(["catalog", "--format", "json", "--output"])
        .arg(&output)
        .assert()
        .success();
    let written = std::fs::read_to_string(output).unwrap();
    assert!(written.contains("\"update-embedded-asset\""));
}

#[test]
fn completions_are_generated() {
    pluginbridge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pluginbridge"));
}
