//! CLI end-to-end tests.
//!
//! These tests spawn the actual `ctxize` binary against copies of the GOPATH
//! fixture tree in `crates/ctxize-go/tests/fixtures` and validate
//! stdout, files on disk and exit codes.
//!
//! Exit code expectations:
//! - 0: Success
//! - 2: Invalid arguments (malformed spec)
//! - 3: Resolution error (function not found)

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;
use walkdir::WalkDir;

fn fixture_gopath() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("crates/ctxize-go/tests/fixtures/gopath")
}

/// A writable copy of the fixture GOPATH.
fn gopath_copy() -> TempDir {
    let tmp = TempDir::new().expect("temp dir");
    let from = fixture_gopath();
    for entry in WalkDir::new(&from) {
        let entry = entry.expect("walk fixtures");
        let dest = tmp.path().join(entry.path().strip_prefix(&from).unwrap());
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).unwrap();
        } else {
            fs::copy(entry.path(), &dest).unwrap();
        }
    }
    tmp
}

/// Run ctxize in `gopath` with given arguments and return
/// (stdout, stderr, exit_code).
fn run_ctxize(gopath: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_ctxize"))
        .arg("--gopath")
        .arg(gopath)
        .args(args)
        .current_dir(gopath)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute ctxize");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn rewrite_writes_files_and_reports_json() {
    let gopath = gopath_copy();
    let (stdout, stderr, exit_code) =
        run_ctxize(gopath.path(), &["--format", "json", "foo.F", "bar", "baz"]);
    assert_eq!(exit_code, 0, "stderr: {}", stderr);

    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "ok");
    assert_eq!(json["function"], "foo.F");
    assert_eq!(json["applied"], true);
    let paths: Vec<&str> = json["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["src/foo/foo.go", "src/foo/foo_test.go", "src/bar/bar.go"]
    );

    let bar = fs::read_to_string(gopath.path().join("src/bar/bar.go")).unwrap();
    assert!(bar.contains("ctx := context.TODO()\n\tfoo.F(ctx)"), "{}", bar);
    let baz = fs::read_to_string(gopath.path().join("src/baz/baz.go")).unwrap();
    assert!(baz.contains("foo.F(x)"));
}

#[test]
fn dry_run_prints_diff_and_leaves_files() {
    let gopath = gopath_copy();
    let before = fs::read_to_string(gopath.path().join("src/go-quux/quux.go")).unwrap();
    let (stdout, stderr, exit_code) = run_ctxize(
        gopath.path(),
        &["--dry-run", "--var", "t go-qux.T = 0", "go-quux.F"],
    );
    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("--- a/src/go-quux/quux.go"), "{}", stdout);
    assert!(stdout.contains("+func F(t qux.T, n int) {}"), "{}", stdout);
    assert!(stdout.contains("+\tt := 0"), "{}", stdout);
    assert_eq!(
        fs::read_to_string(gopath.path().join("src/go-quux/quux.go")).unwrap(),
        before
    );
}

#[test]
fn malformed_spec_returns_exit_2() {
    let gopath = gopath_copy();
    let (stdout, _stderr, exit_code) = run_ctxize(gopath.path(), &["--format", "json", "F"]);
    assert_eq!(exit_code, 2);
    let json: Value = serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 2);
}

#[test]
fn unknown_function_returns_exit_3() {
    let gopath = gopath_copy();
    let (stdout, stderr, exit_code) = run_ctxize(gopath.path(), &["foo.Missing"]);
    assert_eq!(exit_code, 3);
    assert!(stdout.is_empty());
    assert!(stderr.contains("function not found: foo.Missing"), "{}", stderr);
}

#[test]
fn json_format_logs_json_lines() {
    let gopath = gopath_copy();
    let (stdout, stderr, exit_code) = run_ctxize(
        gopath.path(),
        &["--format", "json", "--debug", "--dry-run", "foo.F", "bar"],
    );
    assert_eq!(exit_code, 0, "stderr: {}", stderr);
    serde_json::from_str::<Value>(&stdout).expect("stdout should be valid JSON");

    let records: Vec<Value> = stderr
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("each log line should be JSON"))
        .collect();
    assert!(!records.is_empty(), "--debug should log call sites");
    assert!(records.iter().all(|r| r["level"].is_string()));
}
