//! The ctxize operation: thread a new leading parameter through a function
//! and everything that calls it.
//!
//! 1. Load the variable's package and the requested packages, with tests
//! 2. Resolve the variable's type
//! 3. Prepend the parameter to the one matching declaration, pruning a
//!    `ctx := context.TODO()` stand-in it supersedes
//! 4. At every call, pass a compatible variable already in scope, or declare
//!    `<name> := <init>` at the top of the enclosing function and pass that
//! 5. Print every modified file through [`App::each`]
//!
//! The syntax trees and the scope table are edited together: parameters and
//! variables the rewrite introduces are entered into the function scopes,
//! so later call sites in the same function see them.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

use ctxize_core::hash::ContentHash;
use ctxize_go_syntax::visitor::{
    callee_name_pos, edit_call, enclosing_func_decl, innermost_call, path_enclosing, PathNode,
};
use ctxize_go_syntax::{
    parse_expr, parse_file, prettify_error, print_expr, print_file, AssignOp, Expr, Field,
    FuncDecl, Ident, NodeId, Pos, Stmt, StmtKind,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::imports::add_import;
use crate::loader::{canonical_import_path, load, LoadConfig, LoadError};
use crate::program::{FileId, Program};
use crate::spec::{FuncSpec, SpecError, VarSpec};
use crate::types::{ObjectId, ObjectKind, PackageId, ScopeId, TypeId, TypeStore};

/// The stand-in initializer that a new `context.Context` parameter replaces.
const CONTEXT_STUB: &str = "context.TODO()";

// ============================================================================
// Error Types
// ============================================================================

/// Errors from loading, matching and rewriting.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("package {path:?} is not loaded")]
    PackageNotFound { path: String },

    #[error("type {name} not found in package {path:?}")]
    TypeNotFound { path: String, name: String },

    #[error("function {spec} not found")]
    FunctionNotFound { spec: String },

    #[error("function {spec} matches {} declarations: {}", positions.len(), positions.join(", "))]
    AmbiguousFunction {
        spec: String,
        positions: Vec<String>,
    },

    /// The source has a shape the rewrite cannot handle, such as a matched
    /// function used as a value rather than called.
    #[error("{0}")]
    Invariant(String),

    #[error("invalid initializer expression {expr:?}: {message}")]
    InitExpr { expr: String, message: String },

    #[error("rewritten {path} does not parse:\n{message}")]
    Format { path: String, message: String },

    #[error("cannot emit {path}: {source}")]
    Emit {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("no program loaded")]
    NotLoaded,
}

// ============================================================================
// App
// ============================================================================

/// One rewrite run: configuration, the loaded program and the set of files
/// the rewrite modified.
///
/// # Example
///
/// ```no_run
/// use ctxize_go::loader::LoadConfig;
/// use ctxize_go::ops::App;
/// use ctxize_go::spec::FuncSpec;
///
/// let mut app = App::new(LoadConfig::new("/src/project"));
/// app.load(&["./store", "./server"])?;
/// app.rewrite(&FuncSpec::parse("example.com/project/store.DB.Get")?)?;
/// app.each(|path, content| std::fs::write(path, content))?;
/// # Ok::<(), ctxize_go::ops::RewriteError>(())
/// ```
#[derive(Debug)]
pub struct App {
    config: LoadConfig,
    var_spec: VarSpec,
    debug: bool,
    state: Option<Loaded>,
}

/// A modified file as it would be written.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub id: FileId,
    /// Where the file was read from and should be written back.
    pub path: PathBuf,
    /// The path relative to the load directory when the file lies below it.
    pub name: String,
    /// Hash of the contents that were loaded.
    pub before_hash: ContentHash,
    pub content: String,
}

#[derive(Debug)]
struct Loaded {
    program: Program,
    var: TargetVar,
    modified: BTreeSet<FileId>,
}

/// The resolved type of the variable being threaded.
#[derive(Debug, Clone)]
struct TargetVar {
    pkg: PackageId,
    path: String,
    pkg_name: String,
    ty: TypeId,
}

/// A matched use, located before any tree is edited.
#[derive(Debug)]
struct CallSite {
    pos: Pos,
    file: FileId,
    package: PackageId,
    call: NodeId,
    decl: NodeId,
    decl_scope: ScopeId,
    /// Scopes of the function literals between the call and the
    /// declaration, innermost first.
    lit_scopes: Vec<ScopeId>,
}

impl App {
    pub fn new(config: LoadConfig) -> Self {
        App {
            config,
            var_spec: VarSpec::default(),
            debug: false,
            state: None,
        }
    }

    pub fn with_var_spec(mut self, var_spec: VarSpec) -> Self {
        self.var_spec = var_spec;
        self
    }

    /// Log each declaration and call site as it is rewritten.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    pub fn var_spec(&self) -> &VarSpec {
        &self.var_spec
    }

    pub fn program(&self) -> Option<&Program> {
        self.state.as_ref().map(|s| &s.program)
    }

    /// Load the variable's package and `patterns`, and resolve the
    /// variable's type. Replaces any previously loaded program.
    pub fn load(&mut self, patterns: &[&str]) -> Result<(), RewriteError> {
        let mut all = vec![self.var_spec.pkg_path.as_str()];
        for p in patterns {
            if !all.contains(p) {
                all.push(*p);
            }
        }
        let program = load(&self.config, &all)?;
        let var = resolve_var(&self.config, &program, &self.var_spec)?;
        debug!(
            "variable {} resolves to {}",
            self.var_spec,
            program.store.type_string(var.ty)
        );
        self.state = Some(Loaded {
            program,
            var,
            modified: BTreeSet::new(),
        });
        Ok(())
    }

    /// Rewrite the declaration of `spec` and every call to it.
    ///
    /// A spec like `example.com.F` is retried as function `F` of package
    /// `example.com` when no package `example` is loaded.
    pub fn rewrite(&mut self, spec: &FuncSpec) -> Result<(), RewriteError> {
        if self.state.is_none() {
            return Err(RewriteError::NotLoaded);
        }
        let spec = spec
            .alternatives()
            .into_iter()
            .find(|alt| self.resolve_target(alt).is_ok())
            .ok_or_else(|| RewriteError::PackageNotFound {
                path: spec.pkg_path.clone(),
            })?;
        self.rewrite_func_decl(&spec)?;
        let sites = self.rewrite_callers(&spec)?;
        debug!("rewrote {} and {} call sites", spec, sites);
        Ok(())
    }

    /// Prepend the parameter to the declaration `spec` names.
    pub fn rewrite_func_decl(&mut self, spec: &FuncSpec) -> Result<(), RewriteError> {
        let (pkg, path) = self.resolve_target(spec)?;
        let state = self.state.as_mut().ok_or(RewriteError::NotLoaded)?;
        state.rewrite_func_decl(spec, pkg, &path, &self.var_spec, self.debug)
    }

    /// Pass the variable to every call of `spec` in the root packages.
    /// Returns the number of calls rewritten.
    pub fn rewrite_callers(&mut self, spec: &FuncSpec) -> Result<usize, RewriteError> {
        let (_, path) = self.resolve_target(spec)?;
        let state = self.state.as_mut().ok_or(RewriteError::NotLoaded)?;
        let sites = state.call_sites(spec, &path)?;
        for site in &sites {
            state.rewrite_call_site(site, &self.var_spec, self.debug)?;
        }
        Ok(sites.len())
    }

    /// Record the file containing `pos` as modified.
    pub fn mark_modified(&mut self, pos: Pos) -> Option<FileId> {
        self.state.as_mut()?.mark_modified(pos)
    }

    /// Modified files in load order.
    pub fn modified_files(&self) -> Vec<FileId> {
        self.state
            .as_ref()
            .map(|s| s.modified.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Print every modified file and hand its path and new contents to
    /// `emit`. Stops at the first error.
    pub fn each<F>(&self, mut emit: F) -> Result<(), RewriteError>
    where
        F: FnMut(&Path, &[u8]) -> io::Result<()>,
    {
        let Some(state) = &self.state else {
            return Ok(());
        };
        for &id in &state.modified {
            let file = state.render(id)?;
            emit(&file.path, file.content.as_bytes()).map_err(|source| RewriteError::Emit {
                path: file.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Every modified file, printed.
    pub fn rendered(&self) -> Result<Vec<RenderedFile>, RewriteError> {
        let Some(state) = &self.state else {
            return Ok(Vec::new());
        };
        state.modified.iter().map(|&id| state.render(id)).collect()
    }

    /// The loaded package `spec` names, with its canonical import path.
    fn resolve_target(&self, spec: &FuncSpec) -> Result<(PackageId, String), RewriteError> {
        let program = &self.state.as_ref().ok_or(RewriteError::NotLoaded)?.program;
        resolve_package(&self.config, program, &spec.pkg_path)
            .map(|id| (id, program.package(id).path.clone()))
            .ok_or_else(|| RewriteError::PackageNotFound {
                path: spec.pkg_path.clone(),
            })
    }
}

fn resolve_package(config: &LoadConfig, program: &Program, path: &str) -> Option<PackageId> {
    program.resolve_package(path).or_else(|| {
        canonical_import_path(config, path).and_then(|canonical| program.resolve_package(&canonical))
    })
}

fn resolve_var(
    config: &LoadConfig,
    program: &Program,
    var_spec: &VarSpec,
) -> Result<TargetVar, RewriteError> {
    let pkg = resolve_package(config, program, &var_spec.pkg_path).ok_or_else(|| {
        RewriteError::PackageNotFound {
            path: var_spec.pkg_path.clone(),
        }
    })?;
    let package = program.package(pkg);
    let not_found = || RewriteError::TypeNotFound {
        path: package.path.clone(),
        name: var_spec.type_name.clone(),
    };
    let scope = program.store.package(pkg).scope;
    let obj = program
        .store
        .lookup(scope, &var_spec.type_name)
        .ok_or_else(not_found)?;
    let obj = program.store.object(obj);
    if obj.kind != ObjectKind::TypeName || obj.ty.is_invalid() {
        return Err(not_found());
    }
    Ok(TargetVar {
        pkg,
        path: package.path.clone(),
        pkg_name: package.name.clone(),
        ty: obj.ty,
    })
}

/// Index of the top-level `name := context.TODO()` statement in `decl` that
/// declares the binding `scope` holds for `name`.
fn find_stub(store: &TypeStore, scope: ScopeId, name: &str, decl: &FuncDecl) -> Option<usize> {
    let obj = store.object(store.lookup(scope, name)?);
    if !obj.is_var() || !obj.pos.is_valid() {
        return None;
    }
    decl.body.as_ref()?.stmts.iter().position(|stmt| match &stmt.kind {
        StmtKind::Assign {
            lhs,
            op: AssignOp::Define,
            rhs,
        } => {
            lhs.len() == 1
                && rhs.len() == 1
                && lhs[0].as_ident().is_some_and(|id| id.pos == obj.pos)
                && print_expr(&rhs[0]) == CONTEXT_STUB
        }
        _ => false,
    })
}

impl Loaded {
    /// How code in `file` of package `pkg` names the variable's package:
    /// the file's import name, the package name, or nothing inside the
    /// package itself or under a dot import.
    fn qualifier(&self, file: FileId, pkg: PackageId) -> Option<String> {
        if pkg == self.var.pkg {
            return None;
        }
        let ast = &self.program.file(file).ast;
        let named = ast
            .imports()
            .filter(|spec| spec.path_value() == self.var.path)
            .find_map(|spec| spec.name.as_ref().map(|n| n.name.as_str()))
            .filter(|name| *name != "_");
        match named {
            Some(".") => None,
            Some(name) => Some(name.to_string()),
            None => Some(self.var.pkg_name.clone()),
        }
    }

    fn rewrite_func_decl(
        &mut self,
        spec: &FuncSpec,
        pkg: PackageId,
        path: &str,
        var_spec: &VarSpec,
        debug: bool,
    ) -> Result<(), RewriteError> {
        let program = &self.program;
        let matches: Vec<(Pos, ObjectId)> = program
            .package(pkg)
            .defs
            .iter()
            .filter(|(_, obj)| spec.matches(&program.store, path, **obj))
            .map(|(pos, obj)| (*pos, *obj))
            .collect();
        let (pos, func) = match matches.as_slice() {
            [] => {
                return Err(RewriteError::FunctionNotFound {
                    spec: spec.to_string(),
                })
            }
            [one] => *one,
            many => {
                return Err(RewriteError::AmbiguousFunction {
                    spec: spec.to_string(),
                    positions: many.iter().map(|(p, _)| program.describe(*p)).collect(),
                })
            }
        };

        let file = program.file_at(pos).ok_or_else(|| {
            RewriteError::Invariant(format!("{} is declared outside every loaded file", spec))
        })?;
        let decl = program
            .file(file)
            .ast
            .func_decl_named_at(pos)
            .ok_or_else(|| {
                RewriteError::Invariant(format!(
                    "{}: {} has no function declaration",
                    program.describe(pos),
                    spec
                ))
            })?;
        let decl_id = decl.id;
        let scope = program
            .package(pkg)
            .func_scopes
            .get(&(file, decl_id))
            .copied()
            .ok_or_else(|| {
                RewriteError::Invariant(format!("{}: {} has no scope", program.describe(pos), spec))
            })?;
        let stub = if var_spec.is_context() {
            find_stub(&program.store, scope, &var_spec.name, decl)
        } else {
            None
        };
        let qualifier = self.qualifier(file, pkg);
        let sig = program.store.object(func).ty;
        if debug {
            debug!("{}: declaration of {}", program.describe(pos), spec);
            if stub.is_some() {
                debug!("{}: removing {} := {}", program.describe(pos), var_spec.name, CONTEXT_STUB);
            }
        }

        let ty = match &qualifier {
            Some(q) => Expr::selector(q, &var_spec.type_name),
            None => Expr::ident(&var_spec.type_name),
        };
        let ast = &mut self.program.file_mut(file).ast;
        let decl = ast.func_decl_mut(decl_id).ok_or_else(|| {
            RewriteError::Invariant(format!("declaration of {} disappeared", spec))
        })?;
        decl.ty
            .params
            .push_front(Field::new(vec![Ident::new(&var_spec.name)], ty));
        if let (Some(index), Some(body)) = (stub, decl.body.as_mut()) {
            body.stmts.remove(index);
        }
        if qualifier.is_some() {
            add_import(ast, &self.var.path);
        }

        let store = &mut self.program.store;
        let param = store.new_object(
            var_spec.name.clone(),
            ObjectKind::Var,
            self.var.ty,
            Some(pkg),
            Pos::NONE,
        );
        store.insert(scope, param);
        store.prepend_param(sig, param);
        self.mark_modified(pos);
        Ok(())
    }

    /// Every call of `spec` in the root packages, in load and position order.
    fn call_sites(&self, spec: &FuncSpec, path: &str) -> Result<Vec<CallSite>, RewriteError> {
        let program = &self.program;
        let mut sites = Vec::new();
        for &root in program.roots() {
            let package = program.package(root);
            for (&pos, &obj) in &package.uses {
                if !spec.matches(&program.store, path, obj) {
                    continue;
                }
                let file = program.file_at(pos).ok_or_else(|| {
                    RewriteError::Invariant(format!("use of {} outside every loaded file", spec))
                })?;
                let nodes = path_enclosing(&program.file(file).ast, pos);
                let call = innermost_call(&nodes)
                    .filter(|call| callee_name_pos(&call.fun) == Some(pos))
                    .ok_or_else(|| {
                        RewriteError::Invariant(format!(
                            "{}: {} is used as a value, not called",
                            program.describe(pos),
                            spec
                        ))
                    })?;
                let decl = enclosing_func_decl(&nodes).ok_or_else(|| {
                    RewriteError::Invariant(format!(
                        "{}: call to {} is not inside a function declaration",
                        program.describe(pos),
                        spec
                    ))
                })?;
                let scope_of = |id: NodeId| package.func_scopes.get(&(file, id)).copied();
                let decl_scope = scope_of(decl.id).ok_or_else(|| {
                    RewriteError::Invariant(format!(
                        "{}: enclosing function has no scope",
                        program.describe(pos)
                    ))
                })?;
                let lit_scopes = nodes
                    .iter()
                    .rev()
                    .filter_map(|node| match node {
                        PathNode::FuncLit(lit) => scope_of(lit.id),
                        _ => None,
                    })
                    .collect();
                sites.push(CallSite {
                    pos,
                    file,
                    package: root,
                    call: call.id,
                    decl: decl.id,
                    decl_scope,
                    lit_scopes,
                });
            }
        }
        Ok(sites)
    }

    /// A variable visible at the call whose type implements the variable's
    /// interface type.
    fn reusable(&self, site: &CallSite) -> Option<String> {
        let store = &self.program.store;
        if !store.is_interface(self.var.ty) {
            return None;
        }
        site.lit_scopes
            .iter()
            .chain(std::iter::once(&site.decl_scope))
            .find_map(|&scope| {
                store
                    .scope(scope)
                    .iter()
                    .find(|&(_, obj)| {
                        let o = store.object(obj);
                        o.is_var()
                            && (!o.pos.is_valid() || o.pos < site.pos)
                            && store.implements(o.ty, self.var.ty)
                    })
                    .map(|(name, _)| name.to_string())
            })
    }

    fn rewrite_call_site(
        &mut self,
        site: &CallSite,
        var_spec: &VarSpec,
        debug: bool,
    ) -> Result<(), RewriteError> {
        let reused = self.reusable(site);
        let name = reused.clone().unwrap_or_else(|| var_spec.name.clone());
        let existing = match &reused {
            Some(_) => None,
            None => self.program.store.lookup(site.decl_scope, &name),
        };
        if let Some(obj) = existing {
            let pos = self.program.store.object(obj).pos;
            // A binding declared after the call cannot be passed to it.
            if pos.is_valid() && pos >= site.pos {
                return Err(RewriteError::Invariant(format!(
                    "{}: {} is declared after the call at {}",
                    self.program.describe(pos),
                    name,
                    self.program.describe(site.pos)
                )));
            }
        }
        let declare = reused.is_none() && existing.is_none();
        let init = if declare {
            Some(
                parse_expr(&var_spec.init_expr).map_err(|e| RewriteError::InitExpr {
                    expr: var_spec.init_expr.clone(),
                    message: e.to_string(),
                })?,
            )
        } else {
            None
        };
        if debug {
            let how = match (&reused, declare) {
                (Some(_), _) => "reusing",
                (None, true) => "declaring",
                (None, false) => "passing",
            };
            debug!("{}: call site, {} {}", self.program.describe(site.pos), how, name);
        }

        let at = self.program.describe(site.pos);
        let ast = &mut self.program.file_mut(site.file).ast;
        if !edit_call(ast, site.call, |call| call.args.push_front(Expr::ident(&name))) {
            return Err(RewriteError::Invariant(format!("call at {} disappeared", at)));
        }
        if let Some(init) = init {
            let body = ast
                .func_decl_mut(site.decl)
                .and_then(|decl| decl.body.as_mut())
                .ok_or_else(|| {
                    RewriteError::Invariant(format!("{}: enclosing function has no body", at))
                })?;
            body.stmts.insert(0, Stmt::define(&name, init));
            body.multiline = true;
            add_import(ast, &self.var.path);

            let store = &mut self.program.store;
            let var = store.new_object(
                name,
                ObjectKind::Var,
                self.var.ty,
                Some(site.package),
                Pos::NONE,
            );
            store.insert(site.decl_scope, var);
        }
        self.mark_modified(site.pos);
        Ok(())
    }

    fn mark_modified(&mut self, pos: Pos) -> Option<FileId> {
        match self.program.file_at(pos) {
            Some(file) => {
                self.modified.insert(file);
                Some(file)
            }
            None => {
                warn!("position {} is outside every loaded file", pos.0);
                None
            }
        }
    }

    fn render(&self, id: FileId) -> Result<RenderedFile, RewriteError> {
        let file = self.program.file(id);
        let content = print_file(&file.ast);
        if let Err(e) = parse_file(&content, 1) {
            return Err(RewriteError::Format {
                path: file.name.clone(),
                message: prettify_error(&e, &content, &file.name),
            });
        }
        Ok(RenderedFile {
            id,
            path: file.path.clone(),
            name: file.name.clone(),
            before_hash: file.content_hash.clone(),
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(files: &[(&str, &str)]) -> App {
        let mut config = LoadConfig::new("/virtual").with_overlay_file("go.mod", "module m\n");
        for (path, content) in files {
            config = config.with_overlay_file(*path, *content);
        }
        App::new(config)
    }

    fn output(app: &App, name: &str) -> String {
        app.rendered()
            .expect("render")
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.content)
            .unwrap_or_else(|| panic!("{} was not modified", name))
    }

    #[test]
    fn reuses_context_in_scope() {
        let mut app = app(&[(
            "p/p.go",
            "package p

import \"context\"

func F() {}

func G(c context.Context) {
	F()
}
",
        )]);
        app.load(&["m/p"]).expect("load");
        app.rewrite(&FuncSpec::func("m/p", "F")).expect("rewrite");
        let out = output(&app, "p/p.go");
        assert!(out.contains("func F(ctx context.Context) {}"), "{}", out);
        assert!(out.contains("\tF(c)\n"), "{}", out);
        assert!(!out.contains("context.TODO()"), "{}", out);
    }

    #[test]
    fn later_bindings_are_not_reused() {
        let mut app = app(&[(
            "p/p.go",
            "package p

import \"context\"

func F() {}

func G() {
	F()
	later := context.Background()
	_ = later
}
",
        )]);
        app.load(&["m/p"]).expect("load");
        app.rewrite(&FuncSpec::func("m/p", "F")).expect("rewrite");
        let out = output(&app, "p/p.go");
        assert!(out.contains("\tctx := context.TODO()\n\tF(ctx)\n"), "{}", out);
    }

    #[test]
    fn same_name_declared_after_the_call_is_an_error() {
        let mut app = app(&[(
            "p/p.go",
            "package p

import \"context\"

func F() {}

func G() {
	F()
	ctx := context.Background()
	_ = ctx
}
",
        )]);
        app.load(&["m/p"]).expect("load");
        let err = app
            .rewrite_callers(&FuncSpec::func("m/p", "F"))
            .expect_err("ctx is declared after the call");
        assert!(matches!(err, RewriteError::Invariant(_)));
        assert!(err.to_string().contains("p/p.go:9:2"), "{}", err);
    }

    #[test]
    fn rewriting_callers_twice_declares_once() {
        let mut app = app(&[(
            "p/p.go",
            "package p

func F() {}

func G() {
	F()
	F()
}
",
        )]);
        app.load(&["m/p"]).expect("load");
        let spec = FuncSpec::func("m/p", "F");
        assert_eq!(app.rewrite_callers(&spec).expect("first pass"), 2);
        assert_eq!(app.rewrite_callers(&spec).expect("second pass"), 2);
        let out = output(&app, "p/p.go");
        assert_eq!(out.matches("ctx := context.TODO()").count(), 1, "{}", out);
        assert_eq!(out.matches("F(ctx, ctx)").count(), 2, "{}", out);
        assert_eq!(out.matches("\"context\"").count(), 1, "{}", out);
    }

    #[test]
    fn function_literals_share_the_declaration_variable() {
        let mut app = app(&[(
            "p/p.go",
            "package p

func F() {}

func G() {
	go func() {
		F()
	}()
	F()
}
",
        )]);
        app.load(&["m/p"]).expect("load");
        assert_eq!(app.rewrite_callers(&FuncSpec::func("m/p", "F")).expect("rewrite"), 2);
        let out = output(&app, "p/p.go");
        assert_eq!(out.matches("ctx := context.TODO()").count(), 1, "{}", out);
        assert_eq!(out.matches("F(ctx)").count(), 2, "{}", out);
        assert!(out.contains("import \"context\""), "{}", out);
    }

    #[test]
    fn methods_match_pointer_and_value_receivers() {
        let mut app = app(&[(
            "p/p.go",
            "package p

type DB struct{}

func (db *DB) Get(key string) string { return key }

func use(db *DB, v DB) {
	db.Get(\"a\")
	v.Get(\"b\")
}
",
        )]);
        app.load(&["m/p"]).expect("load");
        app.rewrite(&FuncSpec::method("m/p", "DB", "Get")).expect("rewrite");
        let out = output(&app, "p/p.go");
        assert!(
            out.contains("func (db *DB) Get(ctx context.Context, key string) string"),
            "{}",
            out
        );
        assert!(out.contains("db.Get(ctx, \"a\")"), "{}", out);
        assert!(out.contains("v.Get(ctx, \"b\")"), "{}", out);
    }

    #[test]
    fn function_values_are_invariant_errors() {
        let mut app = app(&[(
            "p/p.go",
            "package p\n\nfunc F() {}\n\nfunc G() {\n\tf := F\n\tf()\n}\n",
        )]);
        app.load(&["m/p"]).expect("load");
        let err = app
            .rewrite_callers(&FuncSpec::func("m/p", "F"))
            .expect_err("F is used as a value");
        assert!(matches!(err, RewriteError::Invariant(_)));
        assert!(err.to_string().contains("p/p.go:6:7"), "{}", err);
    }

    #[test]
    fn package_level_calls_are_invariant_errors() {
        let mut app = app(&[(
            "p/p.go",
            "package p\n\nfunc F() int { return 1 }\n\nvar x = F()\n",
        )]);
        app.load(&["m/p"]).expect("load");
        assert!(matches!(
            app.rewrite_callers(&FuncSpec::func("m/p", "F")),
            Err(RewriteError::Invariant(_))
        ));
    }

    #[test]
    fn bad_initializer_is_reported() {
        let mut app = app(&[(
            "p/p.go",
            "package p\n\nfunc F() {}\n\nfunc G() { F() }\n",
        )])
        .with_var_spec(VarSpec::parse("ctx context.Context = context.TODO(").expect("spec"));
        app.load(&["m/p"]).expect("load");
        assert!(matches!(
            app.rewrite_callers(&FuncSpec::func("m/p", "F")),
            Err(RewriteError::InitExpr { .. })
        ));
    }

    #[test]
    fn unknown_functions_and_packages() {
        let mut app = app(&[("p/p.go", "package p\n\nfunc F() {}\n")]);
        assert!(matches!(
            app.rewrite(&FuncSpec::func("m/p", "F")),
            Err(RewriteError::NotLoaded)
        ));
        app.load(&["m/p"]).expect("load");
        assert!(matches!(
            app.rewrite(&FuncSpec::func("m/p", "Missing")),
            Err(RewriteError::FunctionNotFound { .. })
        ));
        assert!(matches!(
            app.rewrite(&FuncSpec::func("m/q", "F")),
            Err(RewriteError::PackageNotFound { .. })
        ));
        assert!(app.modified_files().is_empty());
    }

    #[test]
    fn missing_variable_type() {
        let mut app = app(&[("p/p.go", "package p\n\ntype T int\n")])
            .with_var_spec(VarSpec::parse("v m/p.Missing = 0").expect("spec"));
        assert!(matches!(
            app.load(&["m/p"]),
            Err(RewriteError::TypeNotFound { .. })
        ));
    }

    #[test]
    fn emit_errors_stop_iteration() {
        let mut app = app(&[
            ("a/a.go", "package a\n\nfunc F() {}\n"),
            ("b/b.go", "package b\n\nimport \"m/a\"\n\nfunc G() { a.F() }\n"),
        ]);
        app.load(&["m/a", "m/b"]).expect("load");
        app.rewrite(&FuncSpec::func("m/a", "F")).expect("rewrite");
        assert_eq!(app.modified_files().len(), 2);
        let mut seen = Vec::new();
        let err = app
            .each(|path, _| {
                seen.push(path.to_path_buf());
                Err(io::Error::other("disk full"))
            })
            .expect_err("emit error");
        assert!(matches!(err, RewriteError::Emit { .. }));
        assert_eq!(seen, vec![PathBuf::from("/virtual/a/a.go")]);
    }
}
