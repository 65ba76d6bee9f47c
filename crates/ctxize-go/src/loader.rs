//! Package loading.
//!
//! Maps import paths to directories, parses each package's files once, and
//! checks packages in dependency order into one [`Program`]. Requested
//! packages are loaded with their `_test.go` files; files declaring
//! `<name>_test` form a separate external test package.
//!
//! Import paths resolve, in order, as:
//!
//! - relative paths (`./x`, `../x`) against the importing directory,
//! - paths below the module declared by the nearest `go.mod`,
//! - `<gopath entry>/src/<path>`,
//! - embedded standard-library declarations.
//!
//! An import that resolves nowhere becomes an opaque package whose members
//! check as unknown. A requested package that resolves nowhere is an error.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use ctxize_go_syntax::{parse_file, prettify_error, File};
use thiserror::Error;
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::checker::{check_package, Import};
use crate::program::{FileId, PackageKind, Program};
use crate::stdlib;
use crate::types::PackageId;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from loading and checking packages.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The rendered message carries a source snippet.
    #[error("{message}")]
    Syntax { path: String, message: String },

    #[error("{position}: {message}")]
    TypeCheck { position: String, message: String },

    #[error("cannot find package {path:?}")]
    PackageNotFound { path: String },

    #[error("import cycle not allowed: {}", cycle.join(" -> "))]
    ImportCycle { cycle: Vec<String> },

    #[error("no Go files in {dir}")]
    NoGoFiles { dir: String },

    #[error("found packages {first} and {second} in {dir}")]
    MultiplePackages {
        dir: String,
        first: String,
        second: String,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Where and how to load packages.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Working directory. Relative patterns resolve against it and output
    /// paths are shown relative to it.
    pub dir: PathBuf,
    /// Entries searched as `<entry>/src/<import path>`.
    pub gopath: Vec<PathBuf>,
    /// Load `_test.go` files of the requested packages.
    pub tests: bool,
    /// In-memory file contents shadowing or adding to the file system.
    pub overlay: BTreeMap<PathBuf, String>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig::new(".")
    }
}

impl LoadConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LoadConfig {
            dir: dir.into(),
            gopath: Vec::new(),
            tests: true,
            overlay: BTreeMap::new(),
        }
    }

    pub fn with_gopath(mut self, entry: impl Into<PathBuf>) -> Self {
        self.gopath.push(entry.into());
        self
    }

    pub fn with_tests(mut self, tests: bool) -> Self {
        self.tests = tests;
        self
    }

    /// Add an in-memory file. Relative paths are relative to `dir`.
    pub fn with_overlay_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.overlay.insert(path.into(), content.into());
        self
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        clean(&self.dir.join(path))
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Load the packages named by `patterns` and everything they import.
///
/// A pattern is an import path, a relative directory (`./foo`), or either
/// followed by `/...` to match every package below it.
pub fn load(config: &LoadConfig, patterns: &[&str]) -> Result<Program, LoadError> {
    let mut loader = Loader::new(config);
    let mut requests = Vec::new();
    for pattern in patterns {
        requests.extend(loader.expand(pattern)?);
    }
    loader.requested = requests.iter().map(|(path, _)| path.clone()).collect();
    for (path, location) in requests {
        let (id, xtest) = loader.load_package(&path, location)?;
        for root in std::iter::once(id).chain(xtest) {
            if !loader.program.roots.contains(&root) {
                loader.program.roots.push(root);
            }
        }
    }
    debug!(
        "loaded {} packages, {} files",
        loader.program.packages().len(),
        loader.program.files().len()
    );
    Ok(loader.program)
}

/// The import path `path` names when resolved against `config`, e.g.
/// `example.com/m/foo` for `./foo` inside module `example.com/m`.
pub fn canonical_import_path(config: &LoadConfig, path: &str) -> Option<String> {
    Loader::new(config)
        .locate(path, &config.absolute(Path::new(".")))
        .map(|(canonical, _)| canonical)
}

// ============================================================================
// Loader
// ============================================================================

#[derive(Debug, Clone)]
enum Location {
    Dir(PathBuf),
    Embedded(&'static [stdlib::EmbeddedFile]),
}

struct ParsedFile {
    path: PathBuf,
    ast: File,
    base: u32,
    content: String,
    is_test: bool,
}

struct Loader<'c> {
    config: &'c LoadConfig,
    program: Program,
    overlay: BTreeMap<PathBuf, &'c str>,
    module: Option<(String, PathBuf)>,
    by_path: HashMap<String, PackageId>,
    stack: Vec<String>,
    requested: HashSet<String>,
}

impl<'c> Loader<'c> {
    fn new(config: &'c LoadConfig) -> Self {
        let overlay: BTreeMap<PathBuf, &str> = config
            .overlay
            .iter()
            .map(|(path, content)| (config.absolute(path), content.as_str()))
            .collect();
        let mut loader = Loader {
            config,
            program: Program::new(config.absolute(Path::new("."))),
            overlay,
            module: None,
            by_path: HashMap::new(),
            stack: Vec::new(),
            requested: HashSet::new(),
        };
        loader.module = loader.find_module();
        loader
    }

    /// The module path and root of the nearest enclosing `go.mod`.
    fn find_module(&self) -> Option<(String, PathBuf)> {
        let start = self.config.absolute(Path::new("."));
        for dir in start.ancestors() {
            let Ok(content) = self.read(&dir.join("go.mod")) else {
                continue;
            };
            let module = content.lines().find_map(|line| {
                let rest = line.trim().strip_prefix("module")?;
                let rest = rest.split("//").next().unwrap_or(rest).trim();
                Some(rest.trim_matches('"').to_string())
            })?;
            trace!("module {} at {}", module, dir.display());
            return Some((module, dir.to_path_buf()));
        }
        None
    }

    // ------------------------------------------------------------------------
    // File system with overlay
    // ------------------------------------------------------------------------

    fn read(&self, path: &Path) -> io::Result<String> {
        match self.overlay.get(path) {
            Some(content) => Ok(content.to_string()),
            None => fs::read_to_string(path),
        }
    }

    /// Go source files directly in `dir`, sorted by name.
    fn go_files(&self, dir: &Path) -> BTreeSet<PathBuf> {
        let mut files: BTreeSet<PathBuf> = self
            .overlay
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                if entry.file_type().is_ok_and(|t| t.is_file()) {
                    files.insert(entry.path());
                }
            }
        }
        files.retain(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".go") && !n.starts_with('_') && !n.starts_with('.'))
        });
        files
    }

    fn is_package_dir(&self, dir: &Path) -> bool {
        !self.go_files(dir).is_empty()
    }

    // ------------------------------------------------------------------------
    // Import path resolution
    // ------------------------------------------------------------------------

    /// Resolve `path` as imported from `from`, giving its canonical import
    /// path and where its files are.
    fn locate(&self, path: &str, from: &Path) -> Option<(String, Location)> {
        if is_relative(path) {
            let dir = clean(&from.join(path));
            if !self.is_package_dir(&dir) {
                return None;
            }
            return Some((self.import_path_of(&dir, path), Location::Dir(dir)));
        }
        if let Some((module, root)) = &self.module {
            let rest = if path == module {
                Some("")
            } else {
                path.strip_prefix(module.as_str())
                    .and_then(|r| r.strip_prefix('/'))
            };
            if let Some(rest) = rest {
                let dir = clean(&root.join(rest));
                if self.is_package_dir(&dir) {
                    return Some((path.to_string(), Location::Dir(dir)));
                }
            }
        }
        for entry in &self.config.gopath {
            let dir = self.config.absolute(&entry.join("src").join(path));
            if self.is_package_dir(&dir) {
                return Some((path.to_string(), Location::Dir(dir)));
            }
        }
        stdlib::files(path).map(|files| (path.to_string(), Location::Embedded(files)))
    }

    /// The import path of a directory reached through a relative path.
    fn import_path_of(&self, dir: &Path, fallback: &str) -> String {
        if let Some((module, root)) = &self.module {
            if let Ok(rel) = dir.strip_prefix(root) {
                return join_import_path(module, rel);
            }
        }
        for entry in &self.config.gopath {
            let src = self.config.absolute(&entry.join("src"));
            if let Ok(rel) = dir.strip_prefix(&src) {
                return join_import_path("", rel);
            }
        }
        fallback.trim_start_matches("./").to_string()
    }

    /// Expand one pattern into the packages it names.
    fn expand(&self, pattern: &str) -> Result<Vec<(String, Location)>, LoadError> {
        let base = self.config.absolute(Path::new("."));
        let Some(prefix) = pattern.strip_suffix("/...") else {
            return self
                .locate(pattern, &base)
                .map(|found| vec![found])
                .ok_or_else(|| LoadError::PackageNotFound {
                    path: pattern.to_string(),
                });
        };
        let (canonical, root) = self.locate_dir(prefix, &base).ok_or_else(|| {
            LoadError::PackageNotFound {
                path: pattern.to_string(),
            }
        })?;
        let mut found = Vec::new();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_name().to_str().is_some_and(|n| {
                        n.starts_with('.') || n.starts_with('_') || n == "testdata" || n == "vendor"
                    })
            });
        for entry in walker.flatten() {
            if !entry.file_type().is_dir() || !self.is_package_dir(entry.path()) {
                continue;
            }
            let rel = entry.path().strip_prefix(&root).unwrap_or(Path::new(""));
            found.push((
                join_import_path(&canonical, rel),
                Location::Dir(clean(entry.path())),
            ));
        }
        if found.is_empty() {
            return Err(LoadError::PackageNotFound {
                path: pattern.to_string(),
            });
        }
        Ok(found)
    }

    /// Like [`Loader::locate`] for a directory that need not hold Go files
    /// itself.
    fn locate_dir(&self, path: &str, from: &Path) -> Option<(String, PathBuf)> {
        if is_relative(path) {
            let dir = clean(&from.join(path));
            return dir
                .is_dir()
                .then(|| (self.import_path_of(&dir, path), dir));
        }
        if let Some((module, root)) = &self.module {
            let rest = if path == module {
                Some("")
            } else {
                path.strip_prefix(module.as_str())
                    .and_then(|r| r.strip_prefix('/'))
            };
            if let Some(rest) = rest {
                let dir = clean(&root.join(rest));
                if dir.is_dir() {
                    return Some((path.to_string(), dir));
                }
            }
        }
        self.config.gopath.iter().find_map(|entry| {
            let dir = self.config.absolute(&entry.join("src").join(path));
            dir.is_dir().then(|| (path.to_string(), dir))
        })
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    /// Load a package and, for requested packages, its external test
    /// package.
    fn load_package(
        &mut self,
        path: &str,
        location: Location,
    ) -> Result<(PackageId, Option<PackageId>), LoadError> {
        if let Some(&id) = self.by_path.get(path) {
            let xtest = self.by_path.get(&format!("{}_test", path)).copied();
            return Ok((id, xtest));
        }
        if let Some(start) = self.stack.iter().position(|p| p == path) {
            let mut cycle = self.stack[start..].to_vec();
            cycle.push(path.to_string());
            return Err(LoadError::ImportCycle { cycle });
        }
        self.stack.push(path.to_string());
        let result = match location {
            Location::Embedded(files) => self.load_embedded(path, files).map(|id| (id, None)),
            Location::Dir(dir) => self.load_dir(path, &dir),
        };
        self.stack.pop();
        result
    }

    fn load_embedded(
        &mut self,
        path: &str,
        files: &'static [stdlib::EmbeddedFile],
    ) -> Result<PackageId, LoadError> {
        let mut parsed = Vec::new();
        for file in files {
            let file_path = PathBuf::from(format!("$GOROOT/src/{}/{}", path, file.name));
            parsed.push(self.parse(file_path, file.source.to_string(), false)?);
        }
        let name = parsed
            .first()
            .map(|f| f.ast.package.name.clone())
            .unwrap_or_else(|| guess_name(path));
        self.check(path, &name, PackageKind::Embedded, None, parsed, None)
    }

    fn load_dir(
        &mut self,
        path: &str,
        dir: &Path,
    ) -> Result<(PackageId, Option<PackageId>), LoadError> {
        let with_tests = self.config.tests && self.requested.contains(path);
        let mut parsed = Vec::new();
        for file_path in self.go_files(dir) {
            let is_test = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("_test.go"));
            if is_test && !with_tests {
                continue;
            }
            let content = self.read(&file_path).map_err(|source| LoadError::Io {
                path: self.program.display_path(&file_path),
                source,
            })?;
            if build_ignored(&content) {
                trace!("skipping {}", file_path.display());
                continue;
            }
            parsed.push(self.parse(file_path, content, is_test)?);
        }

        let display_dir = self.program.display_path(dir);
        let name = match parsed.iter().find(|f| !f.is_test) {
            Some(f) => f.ast.package.name.clone(),
            None => match parsed.first() {
                Some(f) => {
                    let name = &f.ast.package.name;
                    name.strip_suffix("_test").unwrap_or(name).to_string()
                }
                None => return Err(LoadError::NoGoFiles { dir: display_dir }),
            },
        };
        let xtest_name = format!("{}_test", name);
        let (xtest, internal): (Vec<ParsedFile>, Vec<ParsedFile>) = parsed
            .into_iter()
            .partition(|f| f.is_test && f.ast.package.name == xtest_name);
        if let Some(other) = internal.iter().find(|f| f.ast.package.name != name) {
            return Err(LoadError::MultiplePackages {
                dir: display_dir,
                first: name,
                second: other.ast.package.name.clone(),
            });
        }

        let id = self.check(path, &name, PackageKind::Source, Some(dir), internal, None)?;
        if xtest.is_empty() {
            return Ok((id, None));
        }
        let xtest_path = format!("{}_test", path);
        let xtest_id = self.check(
            &xtest_path,
            &xtest_name,
            PackageKind::Source,
            Some(dir),
            xtest,
            Some(id),
        )?;
        self.program.package_mut(xtest_id).tests = Some(id);
        Ok((id, Some(xtest_id)))
    }

    fn parse(&mut self, path: PathBuf, content: String, is_test: bool) -> Result<ParsedFile, LoadError> {
        let name = self.program.display_path(&path);
        let base = self.program.fset.add_file(name.clone(), &content);
        let ast = parse_file(&content, base).map_err(|e| LoadError::Syntax {
            message: prettify_error(&e, &content, &name),
            path: name,
        })?;
        Ok(ParsedFile {
            path,
            ast,
            base,
            content,
            is_test,
        })
    }

    /// Load the imports of `files`, then add and check the package.
    fn check(
        &mut self,
        path: &str,
        name: &str,
        kind: PackageKind,
        dir: Option<&Path>,
        files: Vec<ParsedFile>,
        under_test: Option<PackageId>,
    ) -> Result<PackageId, LoadError> {
        let from = dir.map_or_else(|| self.config.absolute(Path::new(".")), Path::to_path_buf);
        let mut imports: HashMap<String, Import> = HashMap::new();
        for file in &files {
            for spec in file.ast.imports() {
                let import_path = spec.path_value();
                if imports.contains_key(&import_path) {
                    continue;
                }
                let id = match under_test {
                    Some(id) if path.strip_suffix("_test") == Some(import_path.as_str()) => id,
                    _ => self.load_import(&import_path, &from)?,
                };
                let kind = self.program.package(id).kind;
                imports.insert(import_path, Import { id, kind });
            }
        }

        let id = self
            .program
            .add_package(path, name, kind, dir.map(Path::to_path_buf));
        let mut deps: Vec<PackageId> = imports.values().map(|i| i.id).collect();
        deps.sort();
        deps.dedup();
        self.program.package_mut(id).imports = deps;
        self.by_path.insert(path.to_string(), id);

        let mut ids = Vec::new();
        for file in files {
            let file_id = self.program.add_file(
                file.path,
                file.ast,
                file.base,
                &file.content,
                id,
                file.is_test,
            );
            ids.push(file_id);
        }

        let program = &mut self.program;
        let asts: Vec<(FileId, &File)> = ids
            .iter()
            .map(|&fid| (fid, &program.files[fid.index()].ast))
            .collect();
        let (info, errors) = check_package(&mut program.store, id, &asts, &imports);

        if let Some(first) = errors.first() {
            if kind == PackageKind::Source {
                return Err(LoadError::TypeCheck {
                    position: self.program.describe(first.pos),
                    message: first.message.clone(),
                });
            }
            debug!("{} errors in embedded package {}", errors.len(), path);
        }

        let package = self.program.package_mut(id);
        package.defs = info.defs;
        package.uses = info.uses;
        package.func_scopes = info.func_scopes;
        debug!("checked package {} ({} files)", path, ids.len());
        Ok(id)
    }

    fn load_import(&mut self, import_path: &str, from: &Path) -> Result<PackageId, LoadError> {
        if import_path == "C" || import_path == "unsafe" {
            return Ok(self.opaque(import_path));
        }
        match self.locate(import_path, from) {
            Some((canonical, location)) => {
                Ok(self.load_package(&canonical, location)?.0)
            }
            None => Ok(self.opaque(import_path)),
        }
    }

    fn opaque(&mut self, import_path: &str) -> PackageId {
        if let Some(&id) = self.by_path.get(import_path) {
            return id;
        }
        debug!("import {:?} not found, treating it as opaque", import_path);
        let id = self.program.add_package(
            import_path,
            &guess_name(import_path),
            PackageKind::Opaque,
            None,
        );
        self.by_path.insert(import_path.to_string(), id);
        id
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn is_relative(path: &str) -> bool {
    path == "." || path == ".." || path.starts_with("./") || path.starts_with("../")
}

/// Lexically normalize a path, resolving `.` and `..` components.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn join_import_path(prefix: &str, rel: &Path) -> String {
    let rel: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    match (prefix.is_empty(), rel.is_empty()) {
        (_, true) => prefix.to_string(),
        (true, false) => rel.join("/"),
        (false, false) => format!("{}/{}", prefix, rel.join("/")),
    }
}

/// The package name an import path most likely declares: the last element,
/// without a `go-` prefix, a `.suffix` or a major version element.
fn guess_name(import_path: &str) -> String {
    let mut elems = import_path.rsplit('/');
    let mut last = elems.next().unwrap_or(import_path);
    let is_version = last.len() > 1
        && last.starts_with('v')
        && last[1..].chars().all(|c| c.is_ascii_digit());
    if is_version {
        last = elems.next().unwrap_or(last);
    }
    let last = last.split('.').next().unwrap_or(last);
    let last = last.strip_prefix("go-").unwrap_or(last);
    last.replace('-', "_")
}

/// True for files constrained out of every build by `//go:build ignore`.
fn build_ignored(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .take_while(|l| !l.starts_with("package "))
        .any(|l| {
            let constraint = l
                .strip_prefix("//go:build")
                .or_else(|| l.strip_prefix("// +build"));
            constraint.is_some_and(|c| c.split_whitespace().any(|t| t == "ignore"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_resolves_dot_components() {
        assert_eq!(clean(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean(Path::new("./x")), PathBuf::from("x"));
        assert_eq!(clean(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn guessed_names() {
        assert_eq!(guess_name("github.com/x/go-qux"), "qux");
        assert_eq!(guess_name("gopkg.in/yaml.v2"), "yaml");
        assert_eq!(guess_name("example.com/m/v3"), "m");
        assert_eq!(guess_name("net/http"), "http");
        assert_eq!(guess_name("my-lib"), "my_lib");
    }

    #[test]
    fn ignore_constraint() {
        assert!(build_ignored("//go:build ignore\n\npackage main\n"));
        assert!(build_ignored("// +build ignore\n\npackage main\n"));
        assert!(!build_ignored("//go:build linux\n\npackage p\n"));
        assert!(!build_ignored("package p\n\n//go:build ignore\n"));
    }

    #[test]
    fn overlay_package_with_module() {
        let config = LoadConfig::new("/virtual/m")
            .with_overlay_file("go.mod", "module example.com/m\n\ngo 1.21\n")
            .with_overlay_file("a/a.go", "package a\n\nfunc A() int { return 1 }\n")
            .with_overlay_file(
                "b/b.go",
                "package b\n\nimport \"example.com/m/a\"\n\nvar X = a.A()\n",
            );
        let program = load(&config, &["./b"]).expect("load");
        let b = program.resolve_package("example.com/m/b").expect("b");
        let a = program.resolve_package("example.com/m/a").expect("a");
        assert_eq!(program.roots(), &[b]);
        assert_eq!(program.package(b).imports, vec![a]);
        assert_eq!(program.file(program.package(b).files[0]).name, "b/b.go");
        assert_eq!(
            canonical_import_path(&config, "./a").as_deref(),
            Some("example.com/m/a")
        );
    }

    #[test]
    fn undefined_names_fail_the_load() {
        let config = LoadConfig::new("/virtual")
            .with_overlay_file("p/p.go", "package p\n\nfunc F() {\n\tmissing()\n}\n");
        let err = load(&config, &["./p"]).expect_err("undefined name");
        match err {
            LoadError::TypeCheck { position, message } => {
                assert_eq!(position, "p/p.go:4:2");
                assert_eq!(message, "undefined: missing");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn import_cycles_are_reported() {
        let config = LoadConfig::new("/virtual")
            .with_overlay_file("go.mod", "module m\n")
            .with_overlay_file("a/a.go", "package a\n\nimport _ \"m/b\"\n")
            .with_overlay_file("b/b.go", "package b\n\nimport _ \"m/a\"\n");
        match load(&config, &["m/a"]) {
            Err(LoadError::ImportCycle { cycle }) => assert_eq!(cycle, ["m/a", "m/b", "m/a"]),
            other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unknown_imports_are_opaque() {
        let config = LoadConfig::new("/virtual").with_overlay_file(
            "p/p.go",
            "package p\n\nimport \"github.com/x/widget\"\n\nfunc F() { widget.Make().Run() }\n",
        );
        let program = load(&config, &["./p"]).expect("load");
        let widget = program
            .packages()
            .iter()
            .find(|p| p.path == "github.com/x/widget")
            .expect("opaque package");
        assert_eq!(widget.kind, PackageKind::Opaque);
        assert!(program.resolve_package("github.com/x/widget").is_none());
        assert!(matches!(
            load(&config, &["github.com/x/widget"]),
            Err(LoadError::PackageNotFound { .. })
        ));
    }
}
