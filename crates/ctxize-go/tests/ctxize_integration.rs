//! Integration tests for the ctxize rewrite over a GOPATH fixture tree.
//!
//! Packages live under `tests/fixtures/gopath/src`:
//! - `foo`: the function being rewritten, with an internal test calling it
//! - `bar`: a plain caller
//! - `baz`: an unrelated method that happens to be called `foo.F`
//! - `go-qux`/`go-quux`: a custom variable type and a package using it
//! - `stub`: a `ctx := context.TODO()` stand-in and callers with contexts
//! - `ext`: a function called only from an external `ext_test` package

use std::fs;
use std::path::{Path, PathBuf};

use ctxize_go::{App, FuncSpec, LoadConfig, RewriteError, VarSpec};
use walkdir::WalkDir;

fn gopath() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/gopath")
}

fn fixture_app() -> App {
    App::new(LoadConfig::new(gopath()).with_gopath(gopath()))
}

/// Rendered contents of every modified file, keyed by file name.
fn outputs(app: &App) -> Vec<(String, String)> {
    app.rendered()
        .expect("render")
        .into_iter()
        .map(|f| {
            let name = f.path.file_name().unwrap().to_string_lossy().into_owned();
            (name, f.content)
        })
        .collect()
}

fn output<'a>(outputs: &'a [(String, String)], name: &str) -> &'a str {
    outputs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, content)| content.as_str())
        .unwrap_or_else(|| panic!("{} was not modified", name))
}

// ============================================================================
// Default context.Context variable
// ============================================================================

#[test]
fn test_rewrite_threads_context_through_callers() {
    let mut app = fixture_app();
    app.load(&["foo", "bar", "baz"]).unwrap();
    app.rewrite(&FuncSpec::func("foo", "F")).unwrap();

    let out = outputs(&app);
    assert_eq!(
        output(&out, "foo.go"),
        "package foo\n\nimport \"context\"\n\nfunc F(ctx context.Context) {}\n"
    );
    assert_eq!(
        output(&out, "bar.go"),
        "package bar

import (
	\"context\"
	\"foo\"
)

func bar() {
	ctx := context.TODO()
	foo.F(ctx)
}
"
    );
    let test = output(&out, "foo_test.go");
    assert!(test.contains("\tctx := context.TODO()\n\tF(ctx)\n"), "{}", test);
    assert!(test.contains("import (\n\t\"context\"\n\t\"testing\"\n)"), "{}", test);
    assert!(out.iter().all(|(name, _)| name != "baz.go"));
    assert_eq!(app.modified_files().len(), 3);
}

#[test]
fn test_rewrite_accepts_parsed_spec() {
    let mut app = fixture_app();
    app.load(&["foo"]).unwrap();
    app.rewrite(&FuncSpec::parse("foo.F").unwrap()).unwrap();
    let out = outputs(&app);
    assert!(output(&out, "foo.go").contains("func F(ctx context.Context)"));
}

#[test]
fn test_stub_is_pruned_and_contexts_are_reused() {
    let mut app = fixture_app();
    app.load(&["stub"]).unwrap();
    app.rewrite(&FuncSpec::func("stub", "Fetch")).unwrap();

    let out = outputs(&app);
    let stub = output(&out, "stub.go");
    assert!(
        stub.contains(
            "// Fetch looks up key.\nfunc Fetch(ctx context.Context, key string) string {\n\treturn lookup(ctx, key)\n}\n"
        ),
        "{}",
        stub
    );
    assert!(stub.contains("\treturn Fetch(ctx, \"a\")\n"), "{}", stub);
    assert!(
        stub.contains("func Batch(keys []string) []string {\n\tctx := context.TODO()\n\tvar out []string\n"),
        "{}",
        stub
    );
    assert!(stub.contains("out = append(out, Fetch(ctx, k))"), "{}", stub);
    assert_eq!(stub.matches("context.TODO()").count(), 1, "{}", stub);
}

#[test]
fn test_declaration_and_callers_separately() {
    let mut app = fixture_app();
    app.load(&["foo", "bar"]).unwrap();
    let spec = FuncSpec::func("foo", "F");
    app.rewrite_func_decl(&spec).unwrap();
    assert_eq!(app.modified_files().len(), 1);
    // foo_test.go and bar.go
    assert_eq!(app.rewrite_callers(&spec).unwrap(), 2);
    assert_eq!(app.modified_files().len(), 3);
}

#[test]
fn test_external_test_package_callers() {
    let mut app = fixture_app();
    app.load(&["ext"]).unwrap();
    app.rewrite(&FuncSpec::func("ext", "Open")).unwrap();

    let out = outputs(&app);
    assert!(
        output(&out, "ext.go").contains("func Open(ctx context.Context, name string) string"),
        "{}",
        output(&out, "ext.go")
    );
    let test = output(&out, "ext_test.go");
    assert!(test.starts_with("package ext_test\n"), "{}", test);
    assert!(
        test.contains("\tctx := context.TODO()\n\tif got := ext.Open(ctx, \"a\"); got != \"a\" {"),
        "{}",
        test
    );
    assert!(test.contains("\t\"context\"\n"), "{}", test);
    assert_eq!(app.modified_files().len(), 2);
}

#[test]
fn test_unknown_function() {
    let mut app = fixture_app();
    app.load(&["foo"]).unwrap();
    let err = app.rewrite(&FuncSpec::func("foo", "G")).unwrap_err();
    assert!(matches!(err, RewriteError::FunctionNotFound { .. }), "{}", err);
    assert_eq!(err.to_string(), "function foo.G not found");
}

// ============================================================================
// Custom variable
// ============================================================================

#[test]
fn test_rewrite_with_custom_var_spec() {
    let mut app = fixture_app().with_var_spec(VarSpec::parse("t go-qux.T = 0").unwrap());
    app.load(&["go-quux"]).unwrap();
    app.rewrite(&FuncSpec::func("go-quux", "F")).unwrap();

    let out = outputs(&app);
    assert_eq!(
        output(&out, "quux.go"),
        "package quux

import \"go-qux\"

func F(t qux.T, n int) {}

func G(n int) {
	t := 0
	F(t, n)
}
"
    );
}

// ============================================================================
// Writing back
// ============================================================================

fn copy_tree(from: &Path, to: &Path) {
    for entry in WalkDir::new(from) {
        let entry = entry.unwrap();
        let dest = to.join(entry.path().strip_prefix(from).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).unwrap();
        } else {
            fs::copy(entry.path(), &dest).unwrap();
        }
    }
}

#[test]
fn test_written_output_loads_again() {
    let tmp = tempfile::tempdir().unwrap();
    copy_tree(&gopath(), tmp.path());

    let config = LoadConfig::new(tmp.path()).with_gopath(tmp.path());
    let mut app = App::new(config.clone());
    app.load(&["foo", "bar"]).unwrap();
    app.rewrite(&FuncSpec::func("foo", "F")).unwrap();
    let mut written = Vec::new();
    app.each(|path, content| {
        written.push(path.to_path_buf());
        fs::write(path, content)
    })
    .unwrap();
    assert_eq!(written.len(), 3);
    assert!(written.iter().all(|p| p.starts_with(tmp.path())));

    let bar = fs::read_to_string(tmp.path().join("src/bar/bar.go")).unwrap();
    assert!(bar.contains("foo.F(ctx)"));

    // The rewritten tree type-checks, and F now takes the context.
    let program = ctxize_go::load(&config, &["foo", "bar"]).unwrap();
    let foo = program.resolve_package("foo").unwrap();
    let scope = program.store.package(foo).scope;
    let f = program.store.lookup(scope, "F").unwrap();
    assert_eq!(
        program.store.type_string(program.store.object(f).ty),
        "func(context.Context)"
    );
}
