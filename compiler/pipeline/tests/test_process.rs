use std::fs;
use std::path::Path;

use codegen::HEADER;
use ir::test_utils::*;
use ir::{CommentGroup, Decl, LoaderError, Program};
use pipeline::{output_path, process, run, JsonGraphLoader, Options, Outcome, NO_HANDLERS};

const APP: &str = "example.com/app";

fn program_in(dir: &Path, comments: Vec<CommentGroup>, decls: Vec<Decl>) -> Program {
    let mut pkg = package(APP, "app", unit("app.go", comments, decls));
    pkg.dir = dir.to_path_buf();
    Program::new(APP, vec![pkg])
}

fn login(dir: &Path, annotation: &str) -> Program {
    program_in(
        dir,
        vec![doc(1, annotation)],
        vec![type_decl(Some(0), spec("LoginHandler", 2, func(vec![field(&["uid"], universe("int"))], vec![])))],
    )
}

struct Run {
    outcome: Outcome,
    out: String,
    err: String,
}

fn run_process(program: &Program, path: &Path, options: &Options) -> Run {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = process(program, path, options, &mut out, &mut err).expect("pipeline runs");
    Run {
        outcome,
        out: String::from_utf8(out).expect("utf-8 output"),
        err: String::from_utf8(err).expect("utf-8 errors"),
    }
}

#[test]
fn test_generates_file() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let program = login(dir.path(), "@evon(lock)");
    let path = output_path(&program, Path::new("."), "evon_gen.go").expect("root exists");
    assert_eq!(path, dir.path().join("evon_gen.go"));

    let result = run_process(&program, &path, &Options::default());
    assert_eq!(result.outcome, Outcome::Generated(path.clone()));
    assert!(result.outcome.is_success());
    assert_eq!(result.out, format!("Generated {}\n", path.display()));
    assert!(result.err.is_empty());

    let contents = fs::read_to_string(&path).expect("file written");
    assert!(contents.starts_with(HEADER));
    assert!(contents.contains("func NewLoginEvent() *LoginEvent {"));

    // Identical input, identical bytes
    run_process(&program, &path, &Options::default());
    assert_eq!(fs::read_to_string(&path).expect("file written"), contents);
}

#[test]
fn test_no_handlers_removes_stale_output() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("evon_gen.go");
    let program = program_in(dir.path(), vec![], vec![func_decl("main", 1, None)]);

    fs::write(&path, "stale").expect("write stale file");
    let shown = run_process(&program, &path, &Options::default().show(true));
    assert_eq!(shown.outcome, Outcome::NoHandlers);
    assert_eq!(shown.out, format!("{}\n", NO_HANDLERS));
    assert!(path.exists(), "show mode leaves files alone");

    let result = run_process(&program, &path, &Options::default());
    assert_eq!(result.outcome, Outcome::NoHandlers);
    assert!(result.outcome.is_success());
    assert!(!path.exists());
}

#[test]
fn test_diagnostics_suppress_output() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("evon_gen.go");
    let program = login(dir.path(), "@evon(lock, loud)");

    let result = run_process(&program, &path, &Options::default());
    assert_eq!(result.outcome, Outcome::Rejected(1));
    assert!(!result.outcome.is_success());
    assert_eq!(result.err, "[evon] app.go:1:4: Invalid flag \"loud\"\n");
    assert!(result.out.is_empty());
    assert!(!path.exists());
}

#[test]
fn test_loader_errors_in_output_file_are_filtered() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("evon_gen.go");
    let mut program = login(dir.path(), "@evon()");
    program.packages[0].errors = vec![
        LoaderError { pos: format!("{}:12:2", path.display()), message: "undefined: sync".into() },
        LoaderError { pos: "app.go:9:2".into(), message: "undefined: x".into() },
        LoaderError { pos: String::new(), message: "no Go files".into() },
    ];

    let result = run_process(&program, &path, &Options::default());
    assert_eq!(result.err, "[go] app.go:9:2: undefined: x\n[go] no Go files\n");
    assert!(matches!(result.outcome, Outcome::Generated(_)));
}

#[test]
fn test_show_summary() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("evon_gen.go");
    let program = program_in(
        dir.path(),
        vec![doc(1, "@evon()"), doc(3, "@evon(lock, pause)")],
        vec![
            type_decl(Some(0), spec("LoginHandler", 2, func(vec![], vec![]))),
            type_decl(Some(1), spec("会话Handler", 4, interface(vec![method("Open", vec![], vec![])]))),
        ],
    );

    let result = run_process(&program, &path, &Options::default().show(true));
    assert_eq!(result.outcome, Outcome::Shown(2));
    let lines: Vec<&str> = result.out.lines().collect();
    assert_eq!(lines[0], format!("F LoginHandler (){} app.go:2:6", " ".repeat(11)));
    assert_eq!(lines[1], "I 会话Handler  (lock, pause) app.go:4:6");
    assert!(!path.exists());
}

#[test]
fn test_run_from_graph_file() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let graph = dir.path().join("graph.json");
    let mut program = login(Path::new("pkg"), "@evon(spawn)");
    program.tags = vec!["linux".into()];
    program.to_file(&graph).expect("graph written");
    fs::create_dir(dir.path().join("pkg")).expect("package dir");

    let loader = JsonGraphLoader::new(&graph).with_tags(vec!["linux".into()]);
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let outcome = run(&loader, dir.path(), &Options::default(), &mut out, &mut err).expect("runs");

    let expected = dir.path().join("pkg").join("evon_gen.go");
    assert_eq!(outcome, Outcome::Generated(expected.clone()));
    assert!(fs::read_to_string(expected).expect("written").contains("go s.h(uid)"));
}

#[test]
fn test_missing_graph_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let loader = JsonGraphLoader::new(dir.path().join("missing.json"));
    let (mut out, mut err) = (Vec::new(), Vec::new());
    assert!(run(&loader, dir.path(), &Options::default(), &mut out, &mut err).is_err());
}
