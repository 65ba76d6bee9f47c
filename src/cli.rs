//! CLI front door for the ctxize rewrite.
//!
//! [`run_ctxize`] parses the specs, loads the packages, rewrites the target
//! function and its callers, and either writes the modified files back or
//! renders their diffs. `main.rs` owns flag parsing and output.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, CtxizeError>`; front-end errors convert
//! through the `From` bridges in `ctxize-go`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ctxize_core::diff::generate_unified_diff;
use ctxize_core::error::CtxizeError;
use ctxize_core::hash::ContentHash;
use ctxize_core::output::{FileChange, RewriteResponse};
use ctxize_go::loader::LoadConfig;
use ctxize_go::ops::App;
use ctxize_go::spec::{FuncSpec, VarSpec};
use tracing::{debug, info};

/// Options for one rewrite run.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Working directory; relative package patterns resolve against it.
    pub dir: PathBuf,
    /// GOPATH entries, searched in order.
    pub gopath: Vec<PathBuf>,
    /// Variable spec; `None` for `ctx context.Context = context.TODO()`.
    pub var: Option<String>,
    /// Load `_test.go` files of the requested packages.
    pub tests: bool,
    /// Render diffs instead of writing files.
    pub dry_run: bool,
    /// Log every declaration and call site rewritten.
    pub debug: bool,
}

impl RewriteOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        RewriteOptions {
            dir: dir.into(),
            gopath: default_gopath(),
            var: None,
            tests: true,
            dry_run: false,
            debug: false,
        }
    }
}

/// GOPATH entries from `$GOPATH`, else `$HOME/go`.
pub fn default_gopath() -> Vec<PathBuf> {
    match env::var_os("GOPATH") {
        Some(value) if !value.is_empty() => env::split_paths(&value).collect(),
        _ => env::var_os("HOME")
            .map(|home| vec![Path::new(&home).join("go")])
            .unwrap_or_default(),
    }
}

/// Thread the variable through `func` and its callers in `packages`.
///
/// Without `dry_run`, each modified file is overwritten after checking that
/// it still has the contents that were loaded. Nothing is written if any
/// file changed on disk.
pub fn run_ctxize(
    options: &RewriteOptions,
    func: &str,
    packages: &[String],
) -> Result<RewriteResponse, CtxizeError> {
    let var_spec = match &options.var {
        Some(var) => VarSpec::parse(var)?,
        None => VarSpec::default(),
    };
    let func_spec = FuncSpec::parse(func)?;

    let mut config = LoadConfig::new(&options.dir).with_tests(options.tests);
    for entry in &options.gopath {
        config = config.with_gopath(entry);
    }
    let mut app = App::new(config)
        .with_var_spec(var_spec.clone())
        .with_debug(options.debug);

    // The function's own package is always loaded.
    let mut patterns: Vec<&str> = vec![func_spec.pkg_path.as_str()];
    patterns.extend(packages.iter().map(String::as_str));
    app.load(&patterns)?;
    app.rewrite(&func_spec)?;

    let rendered = app.rendered()?;
    let mut files = Vec::with_capacity(rendered.len());
    for file in &rendered {
        let after_hash = ContentHash::compute(file.content.as_bytes());
        debug!(
            "{}: {} -> {}",
            file.name,
            file.before_hash.short(),
            after_hash.short()
        );
        let diff = if options.dry_run {
            let before = fs::read_to_string(&file.path)
                .map_err(|e| CtxizeError::apply(e.to_string(), Some(file.name.clone())))?;
            Some(generate_unified_diff(&file.name, &before, &file.content))
        } else {
            None
        };
        files.push(FileChange {
            path: file.name.clone(),
            before_hash: file.before_hash.clone(),
            after_hash,
            diff,
        });
    }

    if !options.dry_run {
        for file in &rendered {
            verify_unchanged(&file.path, &file.name, &file.before_hash)?;
        }
        app.each(|path, content| {
            debug!("writing {}", path.display());
            fs::write(path, content)
        })?;
        info!("rewrote {} files", rendered.len());
    }

    Ok(RewriteResponse::new(
        func,
        var_spec.to_string(),
        !options.dry_run,
        files,
    ))
}

/// Fail if the file at `path` no longer hashes to `expected`.
fn verify_unchanged(path: &Path, name: &str, expected: &ContentHash) -> Result<(), CtxizeError> {
    let current = fs::read(path).map_err(|e| CtxizeError::apply(e.to_string(), Some(name.to_string())))?;
    if ContentHash::compute(&current) != *expected {
        return Err(CtxizeError::apply(
            format!("{} changed on disk since it was loaded", name),
            Some(name.to_string()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxize_core::error::OutputErrorCode;
    use tempfile::TempDir;

    fn module(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("go.mod"), "module example.com/m\n").unwrap();
        for (path, content) in files {
            let path = tmp.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        tmp
    }

    fn options(dir: &Path) -> RewriteOptions {
        RewriteOptions {
            gopath: Vec::new(),
            ..RewriteOptions::new(dir)
        }
    }

    const STORE: &str = "package store\n\nfunc Get(key string) string { return key }\n";
    const SERVER: &str = "package server

import \"example.com/m/store\"

func Handle() string {
	return store.Get(\"k\")
}
";

    #[test]
    fn dry_run_renders_diffs_without_writing() {
        let tmp = module(&[("store/store.go", STORE), ("server/server.go", SERVER)]);
        let opts = RewriteOptions {
            dry_run: true,
            ..options(tmp.path())
        };
        let response = run_ctxize(&opts, "example.com/m/store.Get", &["./server".to_string()]).unwrap();
        assert!(!response.applied);
        assert_eq!(response.files.len(), 2);
        let server = response
            .files
            .iter()
            .find(|f| f.path == "server/server.go")
            .unwrap();
        let diff = server.diff.as_deref().unwrap();
        assert!(diff.contains("+\tctx := context.TODO()"), "{}", diff);
        assert!(diff.contains("-\treturn store.Get(\"k\")"), "{}", diff);
        assert_eq!(
            fs::read_to_string(tmp.path().join("server/server.go")).unwrap(),
            SERVER
        );
    }

    #[test]
    fn apply_writes_files() {
        let tmp = module(&[("store/store.go", STORE), ("server/server.go", SERVER)]);
        let response = run_ctxize(
            &options(tmp.path()),
            "example.com/m/store.Get",
            &["./server".to_string()],
        )
        .unwrap();
        assert!(response.applied);
        assert_eq!(response.variable, "ctx context.Context = context.TODO()");
        let store = fs::read_to_string(tmp.path().join("store/store.go")).unwrap();
        assert!(store.contains("func Get(ctx context.Context, key string) string"));
        let server = fs::read_to_string(tmp.path().join("server/server.go")).unwrap();
        assert!(server.contains("return store.Get(ctx, \"k\")"));
        let change = &response.files[0];
        assert_eq!(change.after_hash, ContentHash::compute(store.as_bytes()));
    }

    #[test]
    fn changed_file_is_not_overwritten() {
        let tmp = module(&[("store/store.go", STORE)]);
        let path = tmp.path().join("store/store.go");
        assert!(verify_unchanged(&path, "store/store.go", &ContentHash::compute(STORE.as_bytes())).is_ok());
        let err = verify_unchanged(&path, "store/store.go", &ContentHash::compute(b"package x\n"))
            .unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::ApplyError);
    }

    #[test]
    fn malformed_specs_are_invalid_arguments() {
        let tmp = module(&[("store/store.go", STORE)]);
        let err = run_ctxize(&options(tmp.path()), "Get", &[]).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);

        let opts = RewriteOptions {
            var: Some("ctx".to_string()),
            ..options(tmp.path())
        };
        let err = run_ctxize(&opts, "example.com/m/store.Get", &[]).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::InvalidArguments);
    }

    #[test]
    fn missing_function_is_a_resolution_error() {
        let tmp = module(&[("store/store.go", STORE)]);
        let err = run_ctxize(&options(tmp.path()), "example.com/m/store.Put", &[]).unwrap_err();
        assert_eq!(err.error_code(), OutputErrorCode::ResolutionError);
    }
}
