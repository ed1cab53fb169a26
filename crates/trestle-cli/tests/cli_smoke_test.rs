//! End-to-end tests running the CLI pipeline over the grammar fixtures.

use std::{fs, path::PathBuf};

use tempfile::TempDir;

use trestle::TrestleError;
use trestle_cli::{Args, error_adapter::to_reportables, run};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("config.toml"), config).expect("Failed to write config");
        Self { dir }
    }

    fn args(&self, input: &str, imports: Option<String>) -> Args {
        Args {
            input: fixture(input),
            output: self.path("out.html"),
            config: Some(self.path("config.toml")),
            imports,
            log_level: "off".to_string(),
        }
    }

    fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    fn output(&self) -> String {
        fs::read_to_string(self.path("out.html")).expect("Output should be written")
    }
}

#[test]
fn test_every_fixture_grammar_renders() {
    for name in ["calc.lark", "json.lark", "lib/common.lark"] {
        let workspace = Workspace::new("");
        run(&workspace.args(name, None)).unwrap_or_else(|err| panic!("{name}: {err}"));

        let html = workspace.output();
        assert!(html.starts_with("<!doctype html>"), "{name}");
        assert!(html.contains("<svg"), "{name}");
    }
}

#[test]
fn test_json_page() {
    let workspace = Workspace::new("[links]\nregex = \"regex101\"\n");
    run(&workspace.args("json.lark", None)).expect("json.lark should render");

    let html = workspace.output();
    assert!(html.contains("<title>Grammar railroad diagram for 'json.lark'</title>"));
    for id in ["start", "value", "array", "object", "pair", "string", "SIGNED_NUMBER", "HEX", "WS"] {
        assert!(html.contains(&format!("<div id='{id}'>")), "missing section {id}");
    }
    assert!(html.contains("href=\"#pair\""));
    assert!(html.contains("https://regex101.com/?regex="));
    assert!(html.contains("1..4"));
}

#[test]
fn test_imports_are_suppressed_by_default() {
    let workspace = Workspace::new("");
    run(&workspace.args("calc.lark", None)).expect("calc.lark should render");

    let html = workspace.output();
    assert!(html.contains("<div id='sum'>"));
    assert!(!html.contains("<div id='NAME'>"));
    assert!(!html.contains("<div id='WS_INLINE'>"));
}

#[test]
fn test_imports_resolved_from_directory() {
    let workspace = Workspace::new("");
    let imports = fixture("");
    run(&workspace.args("calc.lark", Some(imports))).expect("calc.lark should render");

    let html = workspace.output();
    assert!(html.contains("<div id='NAME'>"));
    assert!(html.contains("<div id='NUMBER'>"));
    assert!(html.contains("lib/common.html#CNAME"));
    assert!(html.contains("import CNAME from lib.common"));
}

#[test]
fn test_cross_references_disabled() {
    let workspace = Workspace::new("[links]\ncross_reference = false\n");
    run(&workspace.args("calc.lark", None)).expect("calc.lark should render");
    assert!(!workspace.output().contains("href="));
}

#[test]
fn test_template_grammar_fails() {
    let workspace = Workspace::new("");
    let err = run(&workspace.args("template.lark", None)).unwrap_err();

    assert!(matches!(err, TrestleError::Transform { .. }));
    let reportables = to_reportables(&err);
    assert_eq!(reportables.len(), 1);
    assert_eq!(reportables[0].to_string(), "template usage is not supported");
    assert!(!PathBuf::from(workspace.path("out.html")).exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let workspace = Workspace::new("");
    let err = run(&workspace.args("missing.lark", None)).unwrap_err();
    assert!(matches!(err, TrestleError::Io(_)));
}
