//! The loaded program: source files, packages and the shared type store.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use ctxize_core::hash::ContentHash;
use ctxize_go_syntax::{File, FileSet, NodeId, Pos, Position};

use crate::types::{ObjectId, PackageId, ScopeId, TypeStore};

/// Identity of a loaded source file. Two files with the same path are still
/// distinct files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(u32);

impl FileId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Where a package's declarations came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Parsed from files on disk or in the overlay.
    Source,
    /// Built-in declarations of a standard-library package.
    Embedded,
    /// An import that could not be found; its members check as unknown.
    Opaque,
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    /// Path the file was read from.
    pub path: PathBuf,
    /// Path for messages and output, relative to the load directory when
    /// the file lies below it.
    pub name: String,
    pub package: PackageId,
    /// A `_test.go` file.
    pub is_test: bool,
    pub ast: File,
    pub base: u32,
    pub size: u32,
    /// SHA-256 of the bytes that were parsed.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// True if `pos` falls within this file's position range.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.is_valid() && pos.0 >= self.base && pos.0 <= self.base + self.size
    }
}

/// A loaded and type-checked package.
#[derive(Debug, Clone)]
pub struct Package {
    pub id: PackageId,
    pub path: String,
    pub name: String,
    pub dir: Option<PathBuf>,
    pub kind: PackageKind,
    pub files: Vec<FileId>,
    pub imports: Vec<PackageId>,
    /// Declaring identifier position to the object it declares.
    pub defs: BTreeMap<Pos, ObjectId>,
    /// Referring identifier position to the object it denotes.
    pub uses: BTreeMap<Pos, ObjectId>,
    /// Scopes of function declarations and literals.
    pub func_scopes: BTreeMap<(FileId, NodeId), ScopeId>,
    /// For an external test package `p_test`, the package under test.
    pub tests: Option<PackageId>,
}

/// Every loaded package, sharing one position space and one type store.
#[derive(Debug, Clone)]
pub struct Program {
    pub fset: FileSet,
    pub store: TypeStore,
    pub(crate) files: Vec<SourceFile>,
    pub(crate) packages: Vec<Package>,
    pub(crate) roots: Vec<PackageId>,
    dir: PathBuf,
}

impl Program {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Program {
            fset: FileSet::new(),
            store: TypeStore::new(),
            files: Vec::new(),
            packages: Vec::new(),
            roots: Vec::new(),
            dir: dir.into(),
        }
    }

    /// The directory output paths are relative to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn add_package(
        &mut self,
        path: &str,
        name: &str,
        kind: PackageKind,
        dir: Option<PathBuf>,
    ) -> PackageId {
        let id = self.store.add_package(path, name);
        debug_assert_eq!(id.index(), self.packages.len());
        self.packages.push(Package {
            id,
            path: path.to_string(),
            name: name.to_string(),
            dir,
            kind,
            files: Vec::new(),
            imports: Vec::new(),
            defs: BTreeMap::new(),
            uses: BTreeMap::new(),
            func_scopes: BTreeMap::new(),
            tests: None,
        });
        id
    }

    /// Register a parsed file. Its position range must already be reserved
    /// in [`Program::fset`] at `base`.
    pub(crate) fn add_file(
        &mut self,
        path: PathBuf,
        ast: File,
        base: u32,
        content: &str,
        package: PackageId,
        is_test: bool,
    ) -> FileId {
        let id = FileId(self.files.len() as u32);
        let name = self.display_path(&path);
        self.files.push(SourceFile {
            id,
            path,
            name,
            package,
            is_test,
            ast,
            base,
            size: content.len() as u32,
            content_hash: ContentHash::compute(content.as_bytes()),
        });
        self.packages[package.index()].files.push(id);
        id
    }

    /// `path` relative to the load directory, when it lies below it.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    pub(crate) fn package_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.index()]
    }

    /// Packages in the order they finished loading: dependencies first.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// The requested packages and their external test packages, in request
    /// order.
    pub fn roots(&self) -> &[PackageId] {
        &self.roots
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.index()]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut SourceFile {
        &mut self.files[id.index()]
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// The already-loaded package with import path `path`.
    pub fn resolve_package(&self, path: &str) -> Option<PackageId> {
        self.packages
            .iter()
            .find(|p| p.path == path && p.kind != PackageKind::Opaque)
            .map(|p| p.id)
    }

    /// The loaded file whose position range contains `pos`.
    pub fn file_at(&self, pos: Pos) -> Option<FileId> {
        self.files.iter().find(|f| f.contains(pos)).map(|f| f.id)
    }

    /// File, line and column of a position, for diagnostics.
    pub fn position(&self, pos: Pos) -> Option<Position> {
        self.fset.position(pos)
    }

    /// `file:line:col`, or a placeholder for positions outside every file.
    pub fn describe(&self, pos: Pos) -> String {
        self.position(pos)
            .map(|p| p.to_string())
            .unwrap_or_else(|| "<unknown position>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxize_go_syntax::parse_file;

    fn add(program: &mut Program, pkg: PackageId, path: &str, src: &str) -> FileId {
        let path = program.dir().join(path);
        let name = program.display_path(&path);
        let base = program.fset.add_file(name, src);
        let ast = parse_file(src, base).expect("parse error");
        program.add_file(path, ast, base, src, pkg, false)
    }

    #[test]
    fn files_are_found_by_position() {
        let mut program = Program::new("/work");
        let pkg = program.add_package("p", "p", PackageKind::Source, None);
        let a = add(&mut program, pkg, "a.go", "package p\n");
        let b = add(&mut program, pkg, "b.go", "package p\n\nvar x = 1\n");

        let start_b = Pos(program.file(b).base);
        assert_eq!(program.file_at(start_b), Some(b));
        assert_eq!(program.file_at(Pos(program.file(a).base + 3)), Some(a));
        assert_eq!(program.file_at(Pos::NONE), None);
        assert_eq!(program.file(a).name, "a.go");
        assert_eq!(program.describe(start_b.add(11)), "b.go:3:1");
        assert_eq!(program.package(pkg).files, vec![a, b]);
    }

    #[test]
    fn resolve_package_skips_opaque() {
        let mut program = Program::new(".");
        program.add_package("net/http", "http", PackageKind::Opaque, None);
        assert_eq!(program.resolve_package("net/http"), None);
        let ctx = program.add_package("context", "context", PackageKind::Embedded, None);
        assert_eq!(program.resolve_package("context"), Some(ctx));
        assert_eq!(program.store.package(ctx).path, "context");
    }
}
