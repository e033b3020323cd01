use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use ir::test_utils::*;
use ir::Program;
use predicates::prelude::*;
use tempfile::tempdir;

const APP: &str = "example.com/app";

fn write_graph(dir: &Path, annotation: &str, handler: &str) -> PathBuf {
    let program = Program::new(
        APP,
        vec![package(
            APP,
            "app",
            unit(
                "app.go",
                vec![doc(1, annotation)],
                vec![type_decl(Some(0), spec(handler, 2, func(vec![field(&["n"], universe("int"))], vec![])))],
            ),
        )],
    );
    let graph = dir.join("graph.json");
    program.to_file(&graph).expect("graph written");
    graph
}

fn evon() -> Command { Command::new(assert_cmd::cargo::cargo_bin!("evon")) }

#[test]
fn generates_next_to_graph() {
    let tmp = tempdir().expect("temp dir");
    let graph = write_graph(tmp.path(), "@evon(spawn, wait)", "TickHandler");

    evon().arg(&graph).assert().success().stdout(predicate::str::contains("Generated"));

    let generated = fs::read_to_string(tmp.path().join("evon_gen.go")).expect("file written");
    assert!(generated.contains("type TickEvent struct {"));
    assert!(generated.contains("\twg.Wait()\n"));
}

#[test]
fn show_lists_without_writing() {
    let tmp = tempdir().expect("temp dir");
    let graph = write_graph(tmp.path(), "@evon(lock)", "TickHandler");

    evon()
        .arg("--show")
        .arg(&graph)
        .assert()
        .success()
        .stdout(predicate::str::contains("F TickHandler (lock) app.go:2:6"));
    assert!(!tmp.path().join("evon_gen.go").exists());
}

#[test]
fn diagnostics_fail_the_run() {
    let tmp = tempdir().expect("temp dir");
    let graph = write_graph(tmp.path(), "@evon(wait)", "TickHandler");

    evon()
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "[evon] app.go:1:4: Flag \"wait\" can only be used together with \"spawn\" or \"queue\"",
        ));
    assert!(!tmp.path().join("evon_gen.go").exists());
}

#[test]
fn custom_suffixes() {
    let tmp = tempdir().expect("temp dir");
    let graph = write_graph(tmp.path(), "@evon()", "ClickListener");

    evon().arg(&graph).assert().failure().stderr(predicate::str::contains("must have suffix \"Handler\""));

    evon()
        .args(["--handler-suffix", "Listener", "--event-suffix", "Signal", "--out", "signals_gen.go"])
        .arg(&graph)
        .assert()
        .success();
    let generated = fs::read_to_string(tmp.path().join("signals_gen.go")).expect("file written");
    assert!(generated.contains("func NewClickSignal() *ClickSignal {"));
}

#[test]
fn config_file_next_to_graph() {
    let tmp = tempdir().expect("temp dir");
    let graph = write_graph(tmp.path(), "@evon()", "TickHandler");
    fs::write(tmp.path().join("evon.toml"), "[output]\nfile = \"custom_gen.go\"\n").expect("config");

    evon().arg(&graph).assert().success();
    assert!(tmp.path().join("custom_gen.go").exists());

    evon().args(["--out", "flag_gen.go"]).arg(&graph).assert().success();
    assert!(tmp.path().join("flag_gen.go").exists());
}

#[test]
fn invalid_config_is_fatal() {
    let tmp = tempdir().expect("temp dir");
    let graph = write_graph(tmp.path(), "@evon()", "TickHandler");
    let config = tmp.path().join("bad.toml");
    fs::write(&config, "[logging]\nlevel = \"loud\"\n").expect("config");

    evon()
        .arg("--config")
        .arg(&config)
        .arg(&graph)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Fatal: Invalid config value for `logging.level`"));
}

#[test]
fn missing_graph_is_fatal() {
    let tmp = tempdir().expect("temp dir");
    evon()
        .arg(tmp.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Fatal: Failed to access program graph"));
}
