//! Name resolution and typing of one package.
//!
//! The checker walks a package's files, declares every named entity in the
//! [`TypeStore`], and records which object each identifier declares (`defs`)
//! or denotes (`uses`). It also assigns each function declaration and literal
//! its scope. Expression typing goes as far as selectors need: method calls
//! through values, pointers, embedded fields and interfaces resolve to the
//! declared methods, and variables get the types the rewriter inspects.
//!
//! It is not a full Go type checker. Constant values, assignability and most
//! operator rules are not checked, and a selector that cannot be resolved is
//! left untyped rather than reported. Undefined plain identifiers are errors.

use std::collections::{BTreeMap, HashMap, HashSet};

use ctxize_go_syntax::{
    AssignOp, BinaryOp, CallExpr, CompositeLit, Decl, DeclKeyword, Expr, ExprKind, FieldList,
    File, FuncDecl, FuncType, GenDecl, Ident, LitKind, NodeId, Pos, Spec, Stmt, StmtKind,
    TypeSpec, UnaryOp, ValueSpec,
};

use crate::program::{FileId, PackageKind};
use crate::types::{
    BasicKind, Builtin, InterfaceType, ObjectId, ObjectKind, PackageId, ScopeId, ScopeKind,
    Signature, Type, TypeId, TypeStore,
};

/// A name that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckError {
    pub pos: Pos,
    pub message: String,
}

/// What the checker learned about a package.
#[derive(Debug, Default)]
pub(crate) struct Info {
    pub defs: BTreeMap<Pos, ObjectId>,
    pub uses: BTreeMap<Pos, ObjectId>,
    pub func_scopes: BTreeMap<(FileId, NodeId), ScopeId>,
}

/// A package visible to the files being checked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Import {
    pub id: PackageId,
    /// Missing members of embedded and opaque packages are unknown rather
    /// than errors.
    pub kind: PackageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Invalid,
    NoValue,
    Value,
    Type,
    Package,
    Builtin(Builtin),
}

#[derive(Debug, Clone, Copy)]
struct Operand {
    mode: Mode,
    ty: TypeId,
}

impl Operand {
    const INVALID: Operand = Operand {
        mode: Mode::Invalid,
        ty: TypeId::INVALID,
    };

    fn value(ty: TypeId) -> Self {
        Operand {
            mode: Mode::Value,
            ty,
        }
    }

    fn of_type(ty: TypeId) -> Self {
        Operand {
            mode: Mode::Type,
            ty,
        }
    }
}

struct PendingFunc<'f> {
    file: FileId,
    file_scope: ScopeId,
    decl: &'f FuncDecl,
    obj: ObjectId,
}

struct PendingValue<'f> {
    file_scope: ScopeId,
    keyword: DeclKeyword,
    spec: &'f ValueSpec,
    objs: Vec<ObjectId>,
    /// The spec repeats the previous one's type and values (`const` groups).
    implicit: Option<&'f ValueSpec>,
}

/// Check one package's files, declaring its members in the package scope.
pub(crate) fn check_package(
    store: &mut TypeStore,
    pkg: PackageId,
    files: &[(FileId, &File)],
    imports: &HashMap<String, Import>,
) -> (Info, Vec<CheckError>) {
    let mut checker = Checker {
        store,
        pkg,
        imports,
        info: Info::default(),
        errors: Vec::new(),
        guessed: HashSet::new(),
        file: files.first().map(|(id, _)| *id).unwrap_or_default(),
    };
    checker.check_files(files);
    (checker.info, checker.errors)
}

struct Checker<'a> {
    store: &'a mut TypeStore,
    pkg: PackageId,
    imports: &'a HashMap<String, Import>,
    info: Info,
    errors: Vec<CheckError>,
    /// Files importing an opaque package under its guessed name. The real
    /// name is unknown, so undefined identifiers there are not reported.
    guessed: HashSet<FileId>,
    /// The file whose declarations are being checked.
    file: FileId,
}

impl<'a> Checker<'a> {
    // ------------------------------------------------------------------------
    // Package level
    // ------------------------------------------------------------------------

    fn check_files<'f>(&mut self, files: &[(FileId, &'f File)]) {
        let pkg_scope = self.store.package(self.pkg).scope;
        let mut types: Vec<(FileId, ScopeId, &'f TypeSpec, ObjectId)> = Vec::new();
        let mut values: Vec<(FileId, PendingValue<'f>)> = Vec::new();
        let mut funcs: Vec<PendingFunc<'f>> = Vec::new();

        for &(file_id, file) in files {
            self.file = file_id;
            let file_scope = self.store.new_scope(Some(pkg_scope), ScopeKind::File);
            for decl in &file.decls {
                match decl {
                    Decl::Gen(g) => match g.keyword {
                        DeclKeyword::Import => self.import_decl(g, file_scope),
                        DeclKeyword::Type => {
                            for spec in &g.specs {
                                if let Spec::Type(ts) = spec {
                                    let obj = self.declare_type_name(ts, pkg_scope);
                                    types.push((file_id, file_scope, ts, obj));
                                }
                            }
                        }
                        DeclKeyword::Const | DeclKeyword::Var => {
                            let mut last: Option<&'f ValueSpec> = None;
                            for spec in &g.specs {
                                if let Spec::Value(vs) = spec {
                                    let objs = self.declare_values(g.keyword, vs, pkg_scope);
                                    let implicit = if g.keyword == DeclKeyword::Const
                                        && vs.ty.is_none()
                                        && vs.values.is_empty()
                                    {
                                        last
                                    } else {
                                        last = Some(vs);
                                        None
                                    };
                                    values.push((
                                        file_id,
                                        PendingValue {
                                            file_scope,
                                            keyword: g.keyword,
                                            spec: vs,
                                            objs,
                                            implicit,
                                        },
                                    ));
                                }
                            }
                        }
                    },
                    Decl::Func(f) => {
                        let obj = self.new_object(&f.name, ObjectKind::Func, TypeId::INVALID);
                        self.def(&f.name, obj);
                        if f.recv.is_none() && f.name.name != "init" {
                            self.store.insert(pkg_scope, obj);
                        }
                        funcs.push(PendingFunc {
                            file: file_id,
                            file_scope,
                            decl: f,
                            obj,
                        });
                    }
                }
            }
        }

        // Aliases first, twice, so an alias of a later alias still resolves.
        for pass in 0..2 {
            for &(file_id, file_scope, ts, obj) in &types {
                if ts.assign && (pass == 0 || self.store.object(obj).ty.is_invalid()) {
                    self.file = file_id;
                    self.resolve_type_spec(ts, obj, file_scope);
                }
            }
        }
        for &(file_id, file_scope, ts, obj) in &types {
            if !ts.assign {
                self.file = file_id;
                self.resolve_type_spec(ts, obj, file_scope);
            }
        }

        let mut bodies = Vec::new();
        for pending in &funcs {
            self.file = pending.file;
            let scope = self.func_decl_signature(pending);
            bodies.push((pending.file, scope, pending.decl));
        }

        for (file_id, pending) in &values {
            self.file = *file_id;
            self.resolve_values(pending, pending.file_scope);
        }

        for (file_id, scope, decl) in bodies {
            self.file = file_id;
            if let Some(body) = &decl.body {
                self.stmts(&body.stmts, scope);
            }
        }
    }

    fn import_decl(&mut self, g: &GenDecl, file_scope: ScopeId) {
        for spec in &g.specs {
            let Spec::Import(imp) = spec else { continue };
            let path = imp.path_value();
            let Some(import) = self.imports.get(&path).copied() else {
                continue;
            };
            let imported = self.store.package(import.id).clone();
            match imp.name.as_ref().map(|n| n.name.as_str()) {
                Some("_") => {}
                Some(".") => {
                    let members: Vec<ObjectId> = self
                        .store
                        .scope(imported.scope)
                        .iter()
                        .map(|(_, obj)| obj)
                        .collect();
                    for obj in members {
                        if self.store.object(obj).is_exported() {
                            self.store.insert(file_scope, obj);
                        }
                    }
                }
                Some(_) | None => {
                    if import.kind == PackageKind::Opaque && imp.name.is_none() {
                        self.guessed.insert(self.file);
                    }
                    let pos = imp.name.as_ref().map_or(Pos::NONE, |n| n.pos);
                    let name = imp
                        .name
                        .as_ref()
                        .map_or(imported.name.clone(), |n| n.name.clone());
                    let obj = self.store.new_object(
                        name,
                        ObjectKind::PkgName(import.id),
                        TypeId::INVALID,
                        Some(self.pkg),
                        pos,
                    );
                    if let Some(n) = &imp.name {
                        self.def(n, obj);
                    }
                    self.store.insert(file_scope, obj);
                }
            }
        }
    }

    fn declare_type_name(&mut self, ts: &TypeSpec, scope: ScopeId) -> ObjectId {
        let obj = self.new_object(&ts.name, ObjectKind::TypeName, TypeId::INVALID);
        if !ts.assign {
            self.store.new_named(obj);
        }
        self.def(&ts.name, obj);
        self.store.insert(scope, obj);
        obj
    }

    fn resolve_type_spec(&mut self, ts: &TypeSpec, obj: ObjectId, scope: ScopeId) {
        let scope = match &ts.type_params {
            Some(tparams) => {
                let inner = self.store.new_scope(Some(scope), ScopeKind::Block);
                self.declare_type_params(tparams, inner);
                inner
            }
            None => scope,
        };
        let underlying = self.resolve_type(&ts.ty, scope);
        if ts.assign {
            self.store.set_object_type(obj, underlying);
            return;
        }
        let named = self.store.object(obj).ty;
        self.store.set_underlying(named, underlying);
        // Abstract methods take the interface as their receiver.
        if let Type::Interface(iface) = self.store.ty(underlying) {
            for m in iface.methods.clone() {
                let sig = self.store.object(m).ty;
                let recv = self.store.new_object(
                    "",
                    ObjectKind::Var,
                    named,
                    Some(self.pkg),
                    Pos::NONE,
                );
                self.store.set_recv(sig, recv);
            }
        }
    }

    fn declare_type_params(&mut self, tparams: &FieldList, scope: ScopeId) {
        let mut objs = Vec::new();
        for field in &tparams.list {
            for name in &field.names {
                let obj = self.new_object(name, ObjectKind::TypeName, TypeId::INVALID);
                self.def(name, obj);
                self.store.insert(scope, obj);
                objs.push((obj, field));
            }
        }
        // Constraints may mention any of the parameters.
        for (obj, field) in objs {
            let constraint = self.resolve_type(&field.ty, scope);
            let ty = self.store.add_type(Type::TypeParam { obj, constraint });
            self.store.set_object_type(obj, ty);
        }
    }

    fn declare_values(
        &mut self,
        keyword: DeclKeyword,
        vs: &ValueSpec,
        scope: ScopeId,
    ) -> Vec<ObjectId> {
        let kind = match keyword {
            DeclKeyword::Const => ObjectKind::Const,
            _ => ObjectKind::Var,
        };
        vs.names
            .iter()
            .map(|name| {
                let obj = self.new_object(name, kind, TypeId::INVALID);
                self.def(name, obj);
                self.store.insert(scope, obj);
                obj
            })
            .collect()
    }

    fn resolve_values(&mut self, pending: &PendingValue<'_>, scope: ScopeId) {
        let source = pending.implicit.unwrap_or(pending.spec);
        let declared = source.ty.as_ref().map(|t| self.resolve_type(t, scope));
        let types = match declared {
            Some(t) => {
                for v in &source.values {
                    self.value(v, scope, Some(t));
                }
                vec![t; pending.objs.len()]
            }
            None => self.rhs_types(&source.values, pending.objs.len(), scope),
        };
        for (obj, ty) in pending.objs.iter().zip(types) {
            let ty = if pending.keyword == DeclKeyword::Var {
                self.store.default_type(ty)
            } else {
                ty
            };
            self.store.set_object_type(*obj, ty);
        }
    }

    fn func_decl_signature(&mut self, pending: &PendingFunc<'_>) -> ScopeId {
        let decl = pending.decl;
        let scope = self.store.new_scope(Some(pending.file_scope), ScopeKind::Func);
        self.info.func_scopes.insert((pending.file, decl.id), scope);

        let mut recv_obj = None;
        let mut recv_base = None;
        if let Some(recv) = &decl.recv {
            if let Some(field) = recv.list.first() {
                self.declare_receiver_type_params(&field.ty, scope);
                let ty = self.resolve_type(&field.ty, scope);
                let obj = match field.names.first() {
                    Some(name) => {
                        let obj = self.new_object(name, ObjectKind::Var, ty);
                        self.def(name, obj);
                        self.store.insert(scope, obj);
                        obj
                    }
                    None => self.store.new_object("", ObjectKind::Var, ty, Some(self.pkg), Pos::NONE),
                };
                recv_obj = Some(obj);
                let (base, _) = self.store.deref(ty);
                if let Type::Named(n) = self.store.ty(base) {
                    if self.store.object(n.obj).pkg == Some(self.pkg) {
                        recv_base = Some(base);
                    }
                }
            }
        }

        let sig = self.signature(&decl.ty, scope, Some(scope));
        if let Some(recv) = recv_obj {
            self.store.set_recv(sig, recv);
        }
        self.store.set_object_type(pending.obj, sig);
        if let Some(base) = recv_base {
            self.store.add_method(base, pending.obj);
        }
        scope
    }

    /// `func (l *List[T]) ...` declares `T` for the method.
    fn declare_receiver_type_params(&mut self, ty: &Expr, scope: ScopeId) {
        let inner = match &ty.unparen().kind {
            ExprKind::Star(x) => x.unparen(),
            _ => ty.unparen(),
        };
        if let ExprKind::Index { indices, .. } = &inner.kind {
            for index in indices {
                if let ExprKind::Ident(name) = &index.kind {
                    if name.is_blank() {
                        continue;
                    }
                    let obj = self.new_object(name, ObjectKind::TypeName, TypeId::INVALID);
                    let any = self.store.empty_interface();
                    let tp = self.store.add_type(Type::TypeParam {
                        obj,
                        constraint: any,
                    });
                    self.store.set_object_type(obj, tp);
                    self.def(name, obj);
                    self.store.insert(scope, obj);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------------

    /// A function type. With `bind`, type parameters, parameters and named
    /// results are declared in that scope.
    fn signature(&mut self, ft: &FuncType, scope: ScopeId, bind: Option<ScopeId>) -> TypeId {
        let scope = match (&ft.type_params, bind) {
            (Some(tparams), Some(b)) => {
                self.declare_type_params(tparams, b);
                b
            }
            (Some(tparams), None) => {
                let inner = self.store.new_scope(Some(scope), ScopeKind::Block);
                self.declare_type_params(tparams, inner);
                inner
            }
            (None, _) => scope,
        };
        let mut variadic = false;
        let params = self.field_vars(&ft.params, scope, bind, Some(&mut variadic));
        let results = match &ft.results {
            Some(results) => self.field_vars(results, scope, bind, None),
            None => Vec::new(),
        };
        self.store.add_type(Type::Signature(Signature {
            recv: None,
            params,
            results,
            variadic,
        }))
    }

    fn field_vars(
        &mut self,
        list: &FieldList,
        scope: ScopeId,
        bind: Option<ScopeId>,
        mut variadic: Option<&mut bool>,
    ) -> Vec<ObjectId> {
        let mut vars = Vec::new();
        let count = list.list.len();
        for (i, field) in list.list.iter().enumerate() {
            let ty = match &field.ty.kind {
                ExprKind::Ellipsis(Some(elem)) if i + 1 == count => {
                    if let Some(v) = variadic.as_deref_mut() {
                        *v = true;
                    }
                    let elem = self.resolve_type(elem, scope);
                    self.store.add_type(Type::Slice(elem))
                }
                _ => self.resolve_type(&field.ty, scope),
            };
            if field.names.is_empty() {
                vars.push(
                    self.store
                        .new_object("", ObjectKind::Var, ty, Some(self.pkg), Pos::NONE),
                );
            }
            for name in &field.names {
                let obj = self.new_object(name, ObjectKind::Var, ty);
                if let Some(b) = bind {
                    self.def(name, obj);
                    self.store.insert(b, obj);
                }
                vars.push(obj);
            }
        }
        vars
    }

    fn resolve_type(&mut self, e: &Expr, scope: ScopeId) -> TypeId {
        match &e.kind {
            ExprKind::Ident(id) => {
                let op = self.ident(id, scope);
                match op.mode {
                    Mode::Type => op.ty,
                    Mode::Invalid => TypeId::INVALID,
                    _ => {
                        self.error(id.pos, format!("{} is not a type", id.name));
                        TypeId::INVALID
                    }
                }
            }
            ExprKind::Selector { .. } => {
                let op = self.expr(e, scope, None);
                match op.mode {
                    Mode::Type => op.ty,
                    _ => TypeId::INVALID,
                }
            }
            ExprKind::Paren(x) => self.resolve_type(x, scope),
            ExprKind::Star(x) => {
                let elem = self.resolve_type(x, scope);
                self.store.new_pointer(elem)
            }
            ExprKind::ArrayType { len, elem } => {
                let elem = self.resolve_type(elem, scope);
                match len {
                    None => self.store.add_type(Type::Slice(elem)),
                    Some(len) => {
                        let n = match &len.kind {
                            ExprKind::BasicLit(lit) if lit.kind == LitKind::Int => {
                                lit.value.replace('_', "").parse().ok()
                            }
                            ExprKind::Ellipsis(None) => None,
                            _ => {
                                self.value(len, scope, None);
                                None
                            }
                        };
                        self.store.add_type(Type::Array { len: n, elem })
                    }
                }
            }
            ExprKind::MapType { key, value } => {
                let key = self.resolve_type(key, scope);
                let value = self.resolve_type(value, scope);
                self.store.add_type(Type::Map { key, value })
            }
            ExprKind::ChanType { dir, value } => {
                let elem = self.resolve_type(value, scope);
                self.store.add_type(Type::Chan { dir: *dir, elem })
            }
            ExprKind::FuncType(ft) => self.signature(ft, scope, None),
            ExprKind::StructType(fields) => self.struct_type(fields, scope),
            ExprKind::InterfaceType(elems) => self.interface_type(elems, scope),
            ExprKind::Index { x, indices } => {
                let generic = self.resolve_type(x, scope);
                for index in indices {
                    self.resolve_type(index, scope);
                }
                generic
            }
            ExprKind::Ellipsis(Some(elem)) => {
                let elem = self.resolve_type(elem, scope);
                self.store.add_type(Type::Slice(elem))
            }
            // Constraint syntax: `~int`, `A | B`.
            ExprKind::Unary {
                op: UnaryOp::Tilde,
                x,
            } => {
                self.resolve_type(x, scope);
                TypeId::INVALID
            }
            ExprKind::Binary {
                x,
                op: BinaryOp::Or,
                y,
                ..
            } => {
                self.resolve_type(x, scope);
                self.resolve_type(y, scope);
                TypeId::INVALID
            }
            _ => {
                let op = self.expr(e, scope, None);
                if op.mode == Mode::Type {
                    op.ty
                } else {
                    TypeId::INVALID
                }
            }
        }
    }

    fn struct_type(&mut self, fields: &FieldList, scope: ScopeId) -> TypeId {
        let mut objs = Vec::new();
        for field in &fields.list {
            let ty = self.resolve_type(&field.ty, scope);
            if field.names.is_empty() {
                let name = embedded_name(&field.ty).unwrap_or_default();
                objs.push(self.store.new_object(
                    name,
                    ObjectKind::Field { embedded: true },
                    ty,
                    Some(self.pkg),
                    field.ty.pos(),
                ));
                continue;
            }
            for name in &field.names {
                let obj = self.new_object(name, ObjectKind::Field { embedded: false }, ty);
                self.def(name, obj);
                objs.push(obj);
            }
        }
        self.store.add_type(Type::Struct(objs))
    }

    fn interface_type(&mut self, elems: &FieldList, scope: ScopeId) -> TypeId {
        let mut iface = InterfaceType::default();
        for field in &elems.list {
            match (&field.ty.kind, field.names.first()) {
                (ExprKind::FuncType(ft), Some(name)) => {
                    let sig = self.signature(ft, scope, None);
                    let obj = self.new_object(name, ObjectKind::Func, sig);
                    self.def(name, obj);
                    iface.methods.push(obj);
                }
                _ => {
                    let ty = self.resolve_type(&field.ty, scope);
                    if !ty.is_invalid() {
                        iface.embedded.push(ty);
                    }
                }
            }
        }
        self.store.add_type(Type::Interface(iface))
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    fn value(&mut self, e: &Expr, scope: ScopeId, hint: Option<TypeId>) -> TypeId {
        self.expr(e, scope, hint).ty
    }

    fn expr(&mut self, e: &Expr, scope: ScopeId, hint: Option<TypeId>) -> Operand {
        match &e.kind {
            ExprKind::Bad => Operand::INVALID,
            ExprKind::Ident(id) => {
                if id.is_blank() {
                    return Operand::INVALID;
                }
                self.ident(id, scope)
            }
            ExprKind::BasicLit(lit) => {
                let kind = match lit.kind {
                    LitKind::Int => BasicKind::UntypedInt,
                    LitKind::Float => BasicKind::UntypedFloat,
                    LitKind::Imag => BasicKind::Complex128,
                    LitKind::Char => BasicKind::UntypedRune,
                    LitKind::String => BasicKind::UntypedString,
                };
                Operand::value(self.store.basic(kind))
            }
            ExprKind::CompositeLit(lit) => self.composite_lit(lit, scope, hint),
            ExprKind::FuncLit(lit) => {
                let func_scope = self.store.new_scope(Some(scope), ScopeKind::Func);
                self.info.func_scopes.insert((self.file, lit.id), func_scope);
                let sig = self.signature(&lit.ty, scope, Some(func_scope));
                self.stmts(&lit.body.stmts, func_scope);
                Operand::value(sig)
            }
            ExprKind::Paren(x) => self.expr(x, scope, hint),
            ExprKind::Selector { x, sel } => self.selector(x, sel, scope),
            ExprKind::Index { x, indices } => self.index(x, indices, scope),
            ExprKind::Slice(s) => {
                let t = self.value(&s.x, scope, None);
                for part in [&s.low, &s.high, &s.max].into_iter().flatten() {
                    self.value(part, scope, None);
                }
                let u = self.store.underlying(t);
                let sliced = match self.store.ty(u).clone() {
                    Type::Array { elem, .. } => self.store.add_type(Type::Slice(elem)),
                    Type::Pointer(p) => match self.store.ty(self.store.underlying(p)).clone() {
                        Type::Array { elem, .. } => self.store.add_type(Type::Slice(elem)),
                        _ => TypeId::INVALID,
                    },
                    Type::Basic(BasicKind::UntypedString) => self.store.basic(BasicKind::String),
                    _ => t,
                };
                Operand::value(sliced)
            }
            ExprKind::TypeAssert { x, ty } => {
                self.value(x, scope, None);
                match ty {
                    Some(ty) => Operand::value(self.resolve_type(ty, scope)),
                    None => Operand::INVALID,
                }
            }
            ExprKind::Call(call) => self.call(call, scope),
            ExprKind::Star(x) => {
                let op = self.expr(x, scope, None);
                match op.mode {
                    Mode::Type => Operand::of_type(self.store.new_pointer(op.ty)),
                    Mode::Value => match self.store.ty(self.store.underlying(op.ty)) {
                        Type::Pointer(elem) => Operand::value(*elem),
                        _ => Operand::value(TypeId::INVALID),
                    },
                    _ => Operand::INVALID,
                }
            }
            ExprKind::Unary { op, x } => {
                let hint = match (op, hint) {
                    (UnaryOp::Addr, Some(h)) => Some(self.store.deref(h).0),
                    _ => None,
                };
                let t = self.value(x, scope, hint);
                let ty = match op {
                    UnaryOp::Addr => self.store.new_pointer(t),
                    UnaryOp::Arrow => match self.store.ty(self.store.underlying(t)) {
                        Type::Chan { elem, .. } => *elem,
                        _ => TypeId::INVALID,
                    },
                    UnaryOp::Tilde => TypeId::INVALID,
                    _ => t,
                };
                Operand::value(ty)
            }
            ExprKind::Binary { x, op, y, .. } => {
                let tx = self.value(x, scope, None);
                let ty = self.value(y, scope, None);
                let result = if op.is_comparison() {
                    self.store.basic(BasicKind::UntypedBool)
                } else if matches!(op, BinaryOp::Shl | BinaryOp::Shr) || !self.store.is_untyped(tx)
                {
                    tx
                } else {
                    ty
                };
                Operand::value(result)
            }
            ExprKind::KeyValue { key, value } => {
                self.value(key, scope, None);
                self.expr(value, scope, hint)
            }
            ExprKind::Ellipsis(_) => Operand::INVALID,
            ExprKind::ArrayType { .. }
            | ExprKind::StructType(_)
            | ExprKind::FuncType(_)
            | ExprKind::InterfaceType(_)
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. } => Operand::of_type(self.resolve_type(e, scope)),
        }
    }

    fn ident(&mut self, id: &Ident, scope: ScopeId) -> Operand {
        let Some(obj) = self.store.lookup_parent(scope, &id.name) else {
            if !self.guessed.contains(&self.file) {
                self.error(id.pos, format!("undefined: {}", id.name));
            }
            return Operand::INVALID;
        };
        self.use_(id, obj);
        self.operand_of(obj)
    }

    fn operand_of(&self, obj: ObjectId) -> Operand {
        let o = self.store.object(obj);
        match o.kind {
            ObjectKind::PkgName(_) => Operand {
                mode: Mode::Package,
                ty: TypeId::INVALID,
            },
            ObjectKind::TypeName => Operand::of_type(o.ty),
            ObjectKind::Builtin(b) => Operand {
                mode: Mode::Builtin(b),
                ty: TypeId::INVALID,
            },
            _ => Operand::value(o.ty),
        }
    }

    fn selector(&mut self, x: &Expr, sel: &Ident, scope: ScopeId) -> Operand {
        if let ExprKind::Ident(id) = &x.kind {
            if let Some(obj) = self.store.lookup_parent(scope, &id.name) {
                if let ObjectKind::PkgName(pkg) = self.store.object(obj).kind {
                    self.use_(id, obj);
                    return self.qualified(pkg, sel);
                }
            }
        }
        let op = self.expr(x, scope, None);
        match op.mode {
            Mode::Value | Mode::Type => {
                match self.store.lookup_field_or_method(op.ty, &sel.name) {
                    Some(found) => {
                        self.use_(sel, found.obj);
                        Operand::value(self.store.object(found.obj).ty)
                    }
                    None => {
                        if !op.ty.is_invalid() {
                            tracing::trace!(
                                "unresolved selector {} on {}",
                                sel.name,
                                self.store.type_string(op.ty)
                            );
                        }
                        Operand::value(TypeId::INVALID)
                    }
                }
            }
            _ => Operand::INVALID,
        }
    }

    fn qualified(&mut self, pkg: PackageId, sel: &Ident) -> Operand {
        let scope = self.store.package(pkg).scope;
        match self.store.lookup(scope, &sel.name) {
            Some(obj) => {
                self.use_(sel, obj);
                self.operand_of(obj)
            }
            None => {
                let lenient = self
                    .imports
                    .values()
                    .any(|i| i.id == pkg && i.kind != PackageKind::Source);
                if !lenient {
                    let path = self.store.package(pkg).path.clone();
                    self.error(sel.pos, format!("undefined: {}.{}", path, sel.name));
                }
                Operand::value(TypeId::INVALID)
            }
        }
    }

    fn index(&mut self, x: &Expr, indices: &[Expr], scope: ScopeId) -> Operand {
        let op = self.expr(x, scope, None);
        if op.mode == Mode::Type {
            for index in indices {
                self.resolve_type(index, scope);
            }
            return op;
        }
        let u = self.store.underlying(op.ty);
        let result = match self.store.ty(u).clone() {
            Type::Map { key, value } => {
                for index in indices {
                    self.value(index, scope, Some(key));
                }
                return Operand::value(value);
            }
            Type::Signature(_) => {
                for index in indices {
                    self.resolve_type(index, scope);
                }
                return op;
            }
            Type::Slice(elem) | Type::Array { elem, .. } => elem,
            Type::Pointer(p) => match self.store.ty(self.store.underlying(p)) {
                Type::Array { elem, .. } => *elem,
                _ => TypeId::INVALID,
            },
            Type::Basic(BasicKind::String | BasicKind::UntypedString) => {
                self.store.basic(BasicKind::Uint8)
            }
            _ => TypeId::INVALID,
        };
        for index in indices {
            self.value(index, scope, None);
        }
        Operand::value(result)
    }

    fn composite_lit(&mut self, lit: &CompositeLit, scope: ScopeId, hint: Option<TypeId>) -> Operand {
        let ty = match &lit.ty {
            Some(t) => self.resolve_type(t, scope),
            // Elided element types: `[]*T{{...}}` builds `&T{...}`.
            None => hint.map_or(TypeId::INVALID, |h| self.store.deref(h).0),
        };
        let u = self.store.underlying(ty);
        match self.store.ty(u).clone() {
            Type::Struct(fields) => {
                for (i, item) in lit.elts.items.iter().enumerate() {
                    match &item.expr.kind {
                        ExprKind::KeyValue { key, value } => {
                            let field_ty = match key.as_ident() {
                                Some(name) => match fields
                                    .iter()
                                    .find(|f| self.store.object(**f).name == name.name)
                                {
                                    Some(&f) => {
                                        self.use_(name, f);
                                        Some(self.store.object(f).ty)
                                    }
                                    None => None,
                                },
                                None => None,
                            };
                            self.value(value, scope, field_ty);
                        }
                        _ => {
                            let field_ty = fields.get(i).map(|f| self.store.object(*f).ty);
                            self.value(&item.expr, scope, field_ty);
                        }
                    }
                }
            }
            Type::Slice(elem) | Type::Array { elem, .. } => {
                for item in &lit.elts.items {
                    self.value(&item.expr, scope, Some(elem));
                }
            }
            Type::Map { key, value } => {
                for item in &lit.elts.items {
                    match &item.expr.kind {
                        ExprKind::KeyValue { key: k, value: v } => {
                            self.value(k, scope, Some(key));
                            self.value(v, scope, Some(value));
                        }
                        _ => {
                            self.value(&item.expr, scope, Some(value));
                        }
                    }
                }
            }
            _ => {
                // Unknown literal type: keys may be field names we cannot check.
                for item in &lit.elts.items {
                    match &item.expr.kind {
                        ExprKind::KeyValue { key, value } => {
                            if key.as_ident().is_none() {
                                self.value(key, scope, None);
                            }
                            self.value(value, scope, None);
                        }
                        _ => {
                            self.value(&item.expr, scope, None);
                        }
                    }
                }
            }
        }
        Operand::value(ty)
    }

    fn call(&mut self, call: &CallExpr, scope: ScopeId) -> Operand {
        let fun = self.expr(&call.fun, scope, None);
        match fun.mode {
            Mode::Type => {
                for arg in call.args.exprs() {
                    self.value(arg, scope, None);
                }
                Operand::value(fun.ty)
            }
            Mode::Builtin(b) => self.builtin(b, call, scope),
            Mode::Value => {
                let Some(sig) = self.store.signature(fun.ty).cloned() else {
                    for arg in call.args.exprs() {
                        self.value(arg, scope, None);
                    }
                    return Operand::value(TypeId::INVALID);
                };
                for (i, arg) in call.args.exprs().enumerate() {
                    let hint = sig.params.get(i).map(|p| self.store.object(*p).ty);
                    self.value(arg, scope, hint);
                }
                match sig.results.len() {
                    0 => Operand {
                        mode: Mode::NoValue,
                        ty: TypeId::INVALID,
                    },
                    1 => Operand::value(self.store.object(sig.results[0]).ty),
                    _ => {
                        let types = sig
                            .results
                            .iter()
                            .map(|r| self.store.object(*r).ty)
                            .collect();
                        Operand::value(self.store.add_type(Type::Tuple(types)))
                    }
                }
            }
            _ => {
                for arg in call.args.exprs() {
                    self.value(arg, scope, None);
                }
                Operand::INVALID
            }
        }
    }

    fn builtin(&mut self, b: Builtin, call: &CallExpr, scope: ScopeId) -> Operand {
        let mut args = call.args.exprs();
        let first = match (b, args.next()) {
            (Builtin::Make | Builtin::New, Some(arg)) => self.resolve_type(arg, scope),
            (_, Some(arg)) => self.value(arg, scope, None),
            (_, None) => TypeId::INVALID,
        };
        for arg in args {
            self.value(arg, scope, None);
        }
        let ty = match b {
            Builtin::Len | Builtin::Cap | Builtin::Copy => self.store.basic(BasicKind::Int),
            Builtin::Append | Builtin::Make | Builtin::Max | Builtin::Min => first,
            Builtin::New => self.store.new_pointer(first),
            Builtin::Complex => self.store.basic(BasicKind::Complex128),
            Builtin::Real | Builtin::Imag => self.store.basic(BasicKind::Float64),
            Builtin::Recover => self.store.empty_interface(),
            Builtin::Clear
            | Builtin::Close
            | Builtin::Delete
            | Builtin::Panic
            | Builtin::Print
            | Builtin::Println => {
                return Operand {
                    mode: Mode::NoValue,
                    ty: TypeId::INVALID,
                }
            }
        };
        Operand::value(ty)
    }

    /// Types of the values on the right of an `n`-name assignment,
    /// unpacking a multi-value call and the comma-ok forms.
    fn rhs_types(&mut self, rhs: &[Expr], n: usize, scope: ScopeId) -> Vec<TypeId> {
        if rhs.len() == 1 && n > 1 {
            let t = self.value(&rhs[0], scope, None);
            let mut types = match self.store.ty(t) {
                Type::Tuple(ts) => ts.clone(),
                _ if n == 2 => vec![t, self.store.basic(BasicKind::Bool)],
                _ => vec![t],
            };
            types.resize(n, TypeId::INVALID);
            return types;
        }
        let mut types: Vec<TypeId> = rhs.iter().map(|e| self.value(e, scope, None)).collect();
        types.resize(n, TypeId::INVALID);
        types
    }

    // ------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------

    fn stmts(&mut self, list: &[Stmt], scope: ScopeId) {
        for s in list {
            self.stmt(s, scope);
        }
    }

    fn block_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.store.new_scope(Some(parent), ScopeKind::Block)
    }

    fn stmt(&mut self, s: &Stmt, scope: ScopeId) {
        match &s.kind {
            StmtKind::Bad | StmtKind::Empty | StmtKind::Branch { .. } => {}
            StmtKind::Decl(g) => self.decl_stmt(g, scope),
            StmtKind::Labeled { stmt, .. } => self.stmt(stmt, scope),
            StmtKind::Expr(e) | StmtKind::Go(e) | StmtKind::Defer(e) => {
                self.expr(e, scope, None);
            }
            StmtKind::Send { chan, value } => {
                self.value(chan, scope, None);
                self.value(value, scope, None);
            }
            StmtKind::IncDec { x, .. } => {
                self.value(x, scope, None);
            }
            StmtKind::Assign { lhs, op, rhs } => self.assign(lhs, *op, rhs, scope),
            StmtKind::Return(results) => {
                for r in results {
                    self.value(r, scope, None);
                }
            }
            StmtKind::Block(b) => {
                let inner = self.block_scope(scope);
                self.stmts(&b.stmts, inner);
            }
            StmtKind::If(i) => {
                let outer = self.block_scope(scope);
                if let Some(init) = &i.init {
                    self.stmt(init, outer);
                }
                self.value(&i.cond, outer, None);
                let body = self.block_scope(outer);
                self.stmts(&i.body.stmts, body);
                if let Some(els) = &i.els {
                    self.stmt(els, outer);
                }
            }
            StmtKind::Switch(sw) => {
                let outer = self.block_scope(scope);
                if let Some(init) = &sw.init {
                    self.stmt(init, outer);
                }
                if let Some(tag) = &sw.tag {
                    self.value(tag, outer, None);
                }
                for clause in &sw.body.clauses {
                    for e in &clause.list {
                        self.value(e, outer, None);
                    }
                    let inner = self.block_scope(outer);
                    self.stmts(&clause.body, inner);
                }
            }
            StmtKind::TypeSwitch(ts) => {
                let outer = self.block_scope(scope);
                if let Some(init) = &ts.init {
                    self.stmt(init, outer);
                }
                let (binding, subject) = match &ts.assign.kind {
                    StmtKind::Assign { lhs, rhs, .. } => (lhs.first().and_then(Expr::as_ident), rhs.first()),
                    StmtKind::Expr(e) => (None, Some(e)),
                    _ => (None, None),
                };
                let subject_ty = match subject.map(|e| &e.kind) {
                    Some(ExprKind::TypeAssert { x, .. }) => self.value(x, outer, None),
                    Some(_) | None => TypeId::INVALID,
                };
                for clause in &ts.body.clauses {
                    let mut case_types = Vec::new();
                    for e in &clause.list {
                        let t = match e.as_ident() {
                            Some(id) if id.name == "nil" => self.value(e, outer, None),
                            _ => self.resolve_type(e, outer),
                        };
                        case_types.push(t);
                    }
                    let inner = self.block_scope(outer);
                    if let Some(name) = binding.filter(|b| !b.is_blank()) {
                        let ty = match case_types.as_slice() {
                            [t] if !self.store.is_untyped(*t) => *t,
                            _ => subject_ty,
                        };
                        let obj = self.new_object(name, ObjectKind::Var, ty);
                        self.store.insert(inner, obj);
                    }
                    self.stmts(&clause.body, inner);
                }
            }
            StmtKind::Select(sel) => {
                for clause in &sel.clauses {
                    let inner = self.block_scope(scope);
                    if let Some(comm) = &clause.comm {
                        self.stmt(comm, inner);
                    }
                    self.stmts(&clause.body, inner);
                }
            }
            StmtKind::For(f) => {
                let outer = self.block_scope(scope);
                if let Some(init) = &f.init {
                    self.stmt(init, outer);
                }
                if let Some(cond) = &f.cond {
                    self.value(cond, outer, None);
                }
                if let Some(post) = &f.post {
                    self.stmt(post, outer);
                }
                let body = self.block_scope(outer);
                self.stmts(&f.body.stmts, body);
            }
            StmtKind::Range(r) => {
                let outer = self.block_scope(scope);
                let t = self.value(&r.x, scope, None);
                let (key_ty, value_ty) = self.range_types(t);
                let vars = [(&r.key, key_ty), (&r.value, value_ty)];
                if r.tok == Some(AssignOp::Define) {
                    for (var, ty) in vars {
                        if let Some(id) = var.as_ref().and_then(Expr::as_ident) {
                            if !id.is_blank() {
                                let obj = self.new_object(id, ObjectKind::Var, ty);
                                self.def(id, obj);
                                self.store.insert(outer, obj);
                            }
                        }
                    }
                } else {
                    for (var, _) in vars {
                        if let Some(e) = var {
                            self.value(e, scope, None);
                        }
                    }
                }
                let body = self.block_scope(outer);
                self.stmts(&r.body.stmts, body);
            }
        }
    }

    fn range_types(&mut self, t: TypeId) -> (TypeId, TypeId) {
        let int = self.store.basic(BasicKind::Int);
        let u = self.store.underlying(t);
        match self.store.ty(u).clone() {
            Type::Slice(elem) | Type::Array { elem, .. } => (int, elem),
            Type::Pointer(p) => match self.store.ty(self.store.underlying(p)) {
                Type::Array { elem, .. } => (int, *elem),
                _ => (TypeId::INVALID, TypeId::INVALID),
            },
            Type::Basic(BasicKind::String | BasicKind::UntypedString) => {
                (int, self.store.basic(BasicKind::Int32))
            }
            Type::Basic(_) => (self.store.default_type(t), TypeId::INVALID),
            Type::Map { key, value } => (key, value),
            Type::Chan { elem, .. } => (elem, TypeId::INVALID),
            _ => (TypeId::INVALID, TypeId::INVALID),
        }
    }

    fn assign(&mut self, lhs: &[Expr], op: AssignOp, rhs: &[Expr], scope: ScopeId) {
        if op != AssignOp::Define {
            for e in lhs {
                if !e.as_ident().is_some_and(Ident::is_blank) {
                    self.value(e, scope, None);
                }
            }
            for e in rhs {
                self.value(e, scope, None);
            }
            return;
        }
        let types = self.rhs_types(rhs, lhs.len(), scope);
        for (e, ty) in lhs.iter().zip(types) {
            let Some(id) = e.as_ident() else {
                self.value(e, scope, None);
                continue;
            };
            if id.is_blank() {
                continue;
            }
            match self.store.lookup(scope, &id.name) {
                // `a, err := ...` with `err` already declared here.
                Some(existing) => self.use_(id, existing),
                None => {
                    let ty = self.store.default_type(ty);
                    let obj = self.new_object(id, ObjectKind::Var, ty);
                    self.def(id, obj);
                    self.store.insert(scope, obj);
                }
            }
        }
    }

    fn decl_stmt(&mut self, g: &GenDecl, scope: ScopeId) {
        let mut last: Option<&ValueSpec> = None;
        for spec in &g.specs {
            match spec {
                Spec::Type(ts) => {
                    let obj = self.declare_type_name(ts, scope);
                    self.resolve_type_spec(ts, obj, scope);
                }
                Spec::Value(vs) => {
                    let implicit = if g.keyword == DeclKeyword::Const
                        && vs.ty.is_none()
                        && vs.values.is_empty()
                    {
                        last
                    } else {
                        last = Some(vs);
                        None
                    };
                    // Names are in scope only after the whole spec.
                    let kind = match g.keyword {
                        DeclKeyword::Const => ObjectKind::Const,
                        _ => ObjectKind::Var,
                    };
                    let objs: Vec<ObjectId> = vs
                        .names
                        .iter()
                        .map(|n| self.new_object(n, kind, TypeId::INVALID))
                        .collect();
                    let pending = PendingValue {
                        file_scope: scope,
                        keyword: g.keyword,
                        spec: vs,
                        objs: objs.clone(),
                        implicit,
                    };
                    self.resolve_values(&pending, scope);
                    for (name, obj) in vs.names.iter().zip(objs) {
                        self.def(name, obj);
                        self.store.insert(scope, obj);
                    }
                }
                Spec::Import(_) => {}
            }
        }
    }

    // ------------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------------

    fn new_object(&mut self, name: &Ident, kind: ObjectKind, ty: TypeId) -> ObjectId {
        self.store
            .new_object(name.name.clone(), kind, ty, Some(self.pkg), name.pos)
    }

    fn def(&mut self, id: &Ident, obj: ObjectId) {
        if id.pos.is_valid() {
            self.info.defs.insert(id.pos, obj);
        }
    }

    fn use_(&mut self, id: &Ident, obj: ObjectId) {
        if id.pos.is_valid() {
            self.info.uses.insert(id.pos, obj);
        }
    }

    fn error(&mut self, pos: Pos, message: String) {
        self.errors.push(CheckError { pos, message });
    }
}

/// The implicit field name of an embedded field: `T` for `T`, `*T`,
/// `pkg.T` and `T[A]`.
fn embedded_name(ty: &Expr) -> Option<String> {
    match &ty.unparen().kind {
        ExprKind::Ident(id) => Some(id.name.clone()),
        ExprKind::Star(x) => embedded_name(x),
        ExprKind::Selector { sel, .. } => Some(sel.name.clone()),
        ExprKind::Index { x, .. } => embedded_name(x),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxize_go_syntax::{parse_file, visitor::path_enclosing};

    struct Checked {
        store: TypeStore,
        file: File,
        src: &'static str,
        info: Info,
        errors: Vec<CheckError>,
    }

    impl Checked {
        fn pos(&self, needle: &str) -> Pos {
            Pos(1 + self.src.find(needle).expect("needle") as u32)
        }

        fn use_at(&self, needle: &str) -> Option<&crate::types::Object> {
            self.info.uses.get(&self.pos(needle)).map(|o| self.store.object(*o))
        }

        fn def_type(&self, needle: &str) -> String {
            let obj = self.info.defs[&self.pos(needle)];
            self.store.type_string(self.store.object(obj).ty)
        }
    }

    fn check(src: &'static str) -> Checked {
        let file = parse_file(src, 1).expect("parse error");
        let mut store = TypeStore::new();
        let pkg = store.add_package("example.com/p", "p");
        let (info, errors) =
            check_package(&mut store, pkg, &[(FileId::default(), &file)], &HashMap::new());
        Checked {
            store,
            file,
            src,
            info,
            errors,
        }
    }

    const METHODS: &str = "package p

type Inner struct{}

func (i *Inner) Close() error { return nil }

type Outer struct {
	*Inner
	name string
}

func (o Outer) Name() string { return o.name }

func use(o Outer, p *Outer) {
	o.Close()
	p.Name()
	var ifc interface{ Name() string } = o
	ifc.Name()
}
";

    #[test]
    fn methods_resolve_through_values_pointers_and_embedding() {
        let c = check(METHODS);
        assert!(c.errors.is_empty(), "{:?}", c.errors);

        let close = c.use_at("Close()\n\tp").expect("Close use");
        let (name, is_method) = c.store.func_full_name(c.info.uses[&c.pos("Close()\n\tp")]).unwrap();
        assert_eq!(close.name, "Close");
        assert_eq!(name, "example.com/p.Inner.Close");
        assert!(is_method);

        let name_use = c.info.uses[&c.pos("Name()\n\tvar")];
        assert_eq!(
            c.store.func_full_name(name_use).unwrap().0,
            "example.com/p.Outer.Name"
        );
        // Interface method calls resolve to the abstract method.
        let iface_call = c.use_at("Name()\n}").expect("interface call");
        assert!(iface_call.is_func());
        assert_eq!(c.def_type("ifc"), "interface{Name() string}");
    }

    #[test]
    fn short_variable_declarations_take_result_types() {
        let c = check(
            "package p

type T struct{}

func New() (*T, error) { return nil, nil }

func f() {
	t, err := New()
	m := map[string]int{}
	v, ok := m[\"x\"]
	n := 1
	s := []T{{}}
	_, _, _, _, _ = t, err, v, ok, s
	_ = n
}
",
        );
        assert!(c.errors.is_empty(), "{:?}", c.errors);
        assert_eq!(c.def_type("t, err"), "*example.com/p.T");
        assert_eq!(c.def_type("err :="), "error");
        assert_eq!(c.def_type("v, ok"), "int");
        assert_eq!(c.def_type("ok :="), "bool");
        assert_eq!(c.def_type("n :="), "int");
        assert_eq!(c.def_type("s :="), "[]example.com/p.T");
    }

    #[test]
    fn undefined_names_are_reported() {
        let c = check("package p\n\nfunc f() {\n\tg()\n\tx := y + 1\n\t_ = x\n}\n");
        let messages: Vec<&str> = c.errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["undefined: g", "undefined: y"]);
        assert_eq!(c.errors[0].pos, c.pos("g()"));
    }

    #[test]
    fn struct_keys_and_labels_are_not_variables() {
        let c = check(
            "package p

type Config struct{ Name string }

func f() Config {
loop:
	for {
		break loop
	}
	return Config{Name: \"x\"}
}
",
        );
        assert!(c.errors.is_empty(), "{:?}", c.errors);
        let field = c.use_at("Name: ").expect("field use");
        assert!(matches!(field.kind, ObjectKind::Field { embedded: false }));
    }

    #[test]
    fn function_scopes_hold_params_and_top_level_locals() {
        let c = check(
            "package p

func f(a int) {
	b := a
	if true {
		inner := b
		_ = inner
	}
	g := func(c string) { _ = c }
	_ = g
}
",
        );
        assert!(c.errors.is_empty(), "{:?}", c.errors);
        let path = path_enclosing(&c.file, c.pos("_ = c"));
        let decl = ctxize_go_syntax::visitor::enclosing_func_decl(&path).expect("decl");
        let scope = c.info.func_scopes[&(FileId::default(), decl.id)];
        let names: Vec<&str> = c.store.scope(scope).iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b", "g"]);

        let lit = path
            .iter()
            .find_map(|n| match n {
                ctxize_go_syntax::visitor::PathNode::FuncLit(l) => Some(l.id),
                _ => None,
            })
            .expect("func lit");
        let lit_scope = c.info.func_scopes[&(FileId::default(), lit)];
        let names: Vec<&str> = c.store.scope(lit_scope).iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn generics_and_type_switches_check() {
        let c = check(
            "package p

type List[T any] struct {
	items []T
}

func (l *List[T]) Push(v T) { l.items = append(l.items, v) }

func Map[T, U any](xs []T, f func(T) U) []U {
	var out []U
	for _, x := range xs {
		out = append(out, f(x))
	}
	return out
}

func describe(v interface{}) string {
	switch x := v.(type) {
	case string:
		return x
	case nil:
		return \"nil\"
	}
	var l List[int]
	l.Push(1)
	return \"\"
}
",
        );
        assert!(c.errors.is_empty(), "{:?}", c.errors);
        let push = c.info.uses[&c.pos("Push(1)")];
        assert_eq!(
            c.store.func_full_name(push).unwrap().0,
            "example.com/p.List.Push"
        );
    }
}
