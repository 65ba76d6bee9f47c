//! Objects, types and scopes.
//!
//! The [`TypeStore`] is an arena shared by every package of a program. The
//! checker fills it; the rewriter reads it to match functions and decide
//! whether an in-scope variable can stand in for the new argument, and adds
//! to it when it introduces variables so scopes stay in step with the trees.

use std::collections::{BTreeMap, HashSet};

use ctxize_go_syntax::{ChanDir, Pos};

// ============================================================================
// Ids
// ============================================================================

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }

            fn from_index(i: usize) -> Self {
                $name(i as u32)
            }
        }
    };
}

arena_id!(
    /// A declared entity: package name, constant, type, variable, function.
    ObjectId
);
arena_id!(
    /// A type in the store.
    TypeId
);
arena_id!(
    /// A lexical scope.
    ScopeId
);
arena_id!(
    /// A loaded package, shared with the program's package arena.
    PackageId
);

impl TypeId {
    /// The type of expressions the checker could not type.
    pub const INVALID: TypeId = TypeId(0);

    pub fn is_invalid(self) -> bool {
        self == TypeId::INVALID
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

const BASIC_KINDS: [BasicKind; 24] = [
    BasicKind::Bool,
    BasicKind::Int,
    BasicKind::Int8,
    BasicKind::Int16,
    BasicKind::Int32,
    BasicKind::Int64,
    BasicKind::Uint,
    BasicKind::Uint8,
    BasicKind::Uint16,
    BasicKind::Uint32,
    BasicKind::Uint64,
    BasicKind::Uintptr,
    BasicKind::Float32,
    BasicKind::Float64,
    BasicKind::Complex64,
    BasicKind::Complex128,
    BasicKind::String,
    BasicKind::UnsafePointer,
    BasicKind::UntypedBool,
    BasicKind::UntypedInt,
    BasicKind::UntypedRune,
    BasicKind::UntypedFloat,
    BasicKind::UntypedString,
    BasicKind::UntypedNil,
];

impl BasicKind {
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    /// The type an untyped constant of this kind takes in a declaration.
    pub fn default_kind(self) -> BasicKind {
        match self {
            BasicKind::UntypedBool => BasicKind::Bool,
            BasicKind::UntypedInt => BasicKind::Int,
            BasicKind::UntypedRune => BasicKind::Int32,
            BasicKind::UntypedFloat => BasicKind::Float64,
            BasicKind::UntypedString => BasicKind::String,
            other => other,
        }
    }

    fn index(self) -> usize {
        // Basic types occupy the slots right after INVALID.
        BASIC_KINDS.iter().position(|k| *k == self).unwrap_or(0) + 1
    }
}

/// A defined type: its type name, underlying type and declared methods.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub obj: ObjectId,
    /// May itself be a named type until the chain is resolved by
    /// [`TypeStore::underlying`].
    pub underlying: TypeId,
    pub methods: Vec<ObjectId>,
}

#[derive(Debug, Clone, Default)]
pub struct InterfaceType {
    pub methods: Vec<ObjectId>,
    pub embedded: Vec<TypeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Signature {
    pub recv: Option<ObjectId>,
    pub params: Vec<ObjectId>,
    pub results: Vec<ObjectId>,
    pub variadic: bool,
}

#[derive(Debug, Clone)]
pub enum Type {
    Invalid,
    Basic(BasicKind),
    Named(NamedType),
    Pointer(TypeId),
    Slice(TypeId),
    Array { len: Option<u64>, elem: TypeId },
    Map { key: TypeId, value: TypeId },
    Chan { dir: ChanDir, elem: TypeId },
    /// Field objects in declaration order.
    Struct(Vec<ObjectId>),
    Interface(InterfaceType),
    Signature(Signature),
    /// Results of a call with more than one value.
    Tuple(Vec<TypeId>),
    TypeParam { obj: ObjectId, constraint: TypeId },
}

// ============================================================================
// Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Append,
    Cap,
    Clear,
    Close,
    Complex,
    Copy,
    Delete,
    Imag,
    Len,
    Make,
    Max,
    Min,
    New,
    Panic,
    Print,
    Println,
    Real,
    Recover,
}

const BUILTINS: [(&str, Builtin); 18] = [
    ("append", Builtin::Append),
    ("cap", Builtin::Cap),
    ("clear", Builtin::Clear),
    ("close", Builtin::Close),
    ("complex", Builtin::Complex),
    ("copy", Builtin::Copy),
    ("delete", Builtin::Delete),
    ("imag", Builtin::Imag),
    ("len", Builtin::Len),
    ("make", Builtin::Make),
    ("max", Builtin::Max),
    ("min", Builtin::Min),
    ("new", Builtin::New),
    ("panic", Builtin::Panic),
    ("print", Builtin::Print),
    ("println", Builtin::Println),
    ("real", Builtin::Real),
    ("recover", Builtin::Recover),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// An imported package name in a file scope.
    PkgName(PackageId),
    Const,
    TypeName,
    Var,
    Field {
        embedded: bool,
    },
    Func,
    Builtin(Builtin),
    Nil,
}

#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub kind: ObjectKind,
    pub ty: TypeId,
    /// `None` for universe objects.
    pub pkg: Option<PackageId>,
    /// Position of the declaring identifier; [`Pos::NONE`] for synthesized
    /// and universe objects.
    pub pos: Pos,
}

impl Object {
    pub fn is_func(&self) -> bool {
        self.kind == ObjectKind::Func
    }

    pub fn is_var(&self) -> bool {
        self.kind == ObjectKind::Var
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

// ============================================================================
// Scopes and packages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Universe,
    Package,
    File,
    /// Parameters, results and the top-level statements of a body.
    Func,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    names: BTreeMap<String, ObjectId>,
}

impl Scope {
    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ObjectId)> {
        self.names.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// The type-level view of a package.
#[derive(Debug, Clone)]
pub struct PackageInfo {
    pub path: String,
    pub name: String,
    pub scope: ScopeId,
}

/// The result of looking up a field or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub obj: ObjectId,
    /// A pointer was dereferenced on the way, so pointer-receiver methods
    /// are in the method set.
    pub indirect: bool,
}

// ============================================================================
// TypeStore
// ============================================================================

#[derive(Debug, Clone)]
pub struct TypeStore {
    objects: Vec<Object>,
    types: Vec<Type>,
    scopes: Vec<Scope>,
    packages: Vec<PackageInfo>,
    universe: ScopeId,
    error_type: TypeId,
    empty_interface: TypeId,
}

impl Default for TypeStore {
    fn default() -> Self {
        TypeStore::new()
    }
}

impl TypeStore {
    /// A store holding the universe scope and nothing else.
    pub fn new() -> Self {
        let mut store = TypeStore {
            objects: Vec::new(),
            types: vec![Type::Invalid],
            scopes: Vec::new(),
            packages: Vec::new(),
            universe: ScopeId(0),
            error_type: TypeId::INVALID,
            empty_interface: TypeId::INVALID,
        };
        store.universe = store.new_scope(None, ScopeKind::Universe);
        for kind in BASIC_KINDS {
            store.add_type(Type::Basic(kind));
        }
        store.init_universe();
        store
    }

    fn declare_universe(&mut self, name: &str, kind: ObjectKind, ty: TypeId) -> ObjectId {
        let obj = self.new_object(name, kind, ty, None, Pos::NONE);
        self.insert(self.universe, obj);
        obj
    }

    fn init_universe(&mut self) {
        for kind in &BASIC_KINDS[..BasicKind::UnsafePointer.index() - 1] {
            let ty = self.basic(*kind);
            self.declare_universe(kind.name(), ObjectKind::TypeName, ty);
        }
        let uint8 = self.basic(BasicKind::Uint8);
        self.declare_universe("byte", ObjectKind::TypeName, uint8);
        let int32 = self.basic(BasicKind::Int32);
        self.declare_universe("rune", ObjectKind::TypeName, int32);

        self.empty_interface = self.add_type(Type::Interface(InterfaceType::default()));
        self.declare_universe("any", ObjectKind::TypeName, self.empty_interface);

        // type error interface { Error() string }
        let error_obj = self.declare_universe("error", ObjectKind::TypeName, TypeId::INVALID);
        let error_type = self.new_named(error_obj);
        let string = self.basic(BasicKind::String);
        let result = self.new_object("", ObjectKind::Var, string, None, Pos::NONE);
        let recv = self.new_object("", ObjectKind::Var, error_type, None, Pos::NONE);
        let sig = self.add_type(Type::Signature(Signature {
            recv: Some(recv),
            params: Vec::new(),
            results: vec![result],
            variadic: false,
        }));
        let method = self.new_object("Error", ObjectKind::Func, sig, None, Pos::NONE);
        let iface = self.add_type(Type::Interface(InterfaceType {
            methods: vec![method],
            embedded: Vec::new(),
        }));
        self.set_underlying(error_type, iface);
        self.error_type = error_type;

        let comparable = self.declare_universe("comparable", ObjectKind::TypeName, TypeId::INVALID);
        let comparable_type = self.new_named(comparable);
        let empty = self.add_type(Type::Interface(InterfaceType::default()));
        self.set_underlying(comparable_type, empty);

        let untyped_bool = self.basic(BasicKind::UntypedBool);
        self.declare_universe("true", ObjectKind::Const, untyped_bool);
        self.declare_universe("false", ObjectKind::Const, untyped_bool);
        let untyped_int = self.basic(BasicKind::UntypedInt);
        self.declare_universe("iota", ObjectKind::Const, untyped_int);
        let untyped_nil = self.basic(BasicKind::UntypedNil);
        self.declare_universe("nil", ObjectKind::Nil, untyped_nil);
        for (name, builtin) in BUILTINS {
            self.declare_universe(name, ObjectKind::Builtin(builtin), TypeId::INVALID);
        }
    }

    // ------------------------------------------------------------------------
    // Arenas
    // ------------------------------------------------------------------------

    pub fn new_object(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        ty: TypeId,
        pkg: Option<PackageId>,
        pos: Pos,
    ) -> ObjectId {
        self.objects.push(Object {
            name: name.into(),
            kind,
            ty,
            pkg,
            pos,
        });
        ObjectId::from_index(self.objects.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    pub fn set_object_type(&mut self, id: ObjectId, ty: TypeId) {
        self.objects[id.index()].ty = ty;
    }

    pub fn add_type(&mut self, ty: Type) -> TypeId {
        self.types.push(ty);
        TypeId::from_index(self.types.len() - 1)
    }

    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn basic(&self, kind: BasicKind) -> TypeId {
        TypeId::from_index(kind.index())
    }

    pub fn error_type(&self) -> TypeId {
        self.error_type
    }

    pub fn empty_interface(&self) -> TypeId {
        self.empty_interface
    }

    pub fn new_pointer(&mut self, elem: TypeId) -> TypeId {
        self.add_type(Type::Pointer(elem))
    }

    /// A fresh named type for `obj`, with its underlying type still to be
    /// set. The object's type is updated to point at it.
    pub fn new_named(&mut self, obj: ObjectId) -> TypeId {
        let ty = self.add_type(Type::Named(NamedType {
            obj,
            underlying: TypeId::INVALID,
            methods: Vec::new(),
        }));
        self.set_object_type(obj, ty);
        ty
    }

    pub fn set_underlying(&mut self, named: TypeId, underlying: TypeId) {
        if let Type::Named(n) = &mut self.types[named.index()] {
            n.underlying = underlying;
        }
    }

    pub fn add_method(&mut self, named: TypeId, method: ObjectId) {
        if let Type::Named(n) = &mut self.types[named.index()] {
            n.methods.push(method);
        }
    }

    /// Set the receiver of a signature type.
    pub fn set_recv(&mut self, sig: TypeId, recv: ObjectId) {
        if let Type::Signature(s) = &mut self.types[sig.index()] {
            s.recv = Some(recv);
        }
    }

    /// Insert `param` as the first parameter of a signature type.
    pub fn prepend_param(&mut self, sig: TypeId, param: ObjectId) {
        if let Type::Signature(s) = &mut self.types[sig.index()] {
            s.params.insert(0, param);
        }
    }

    pub fn new_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        self.scopes.push(Scope {
            parent,
            kind,
            names: BTreeMap::new(),
        });
        ScopeId::from_index(self.scopes.len() - 1)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn universe(&self) -> ScopeId {
        self.universe
    }

    /// Bind an object in a scope under its name, replacing any previous
    /// binding. Blank names are never bound.
    pub fn insert(&mut self, scope: ScopeId, obj: ObjectId) -> Option<ObjectId> {
        let name = self.objects[obj.index()].name.clone();
        if name.is_empty() || name == "_" {
            return None;
        }
        self.scopes[scope.index()].names.insert(name, obj)
    }

    pub fn remove(&mut self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        self.scopes[scope.index()].names.remove(name)
    }

    /// Look a name up in one scope only.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        self.scopes[scope.index()].names.get(name).copied()
    }

    /// Look a name up in a scope and its parents.
    pub fn lookup_parent(&self, scope: ScopeId, name: &str) -> Option<ObjectId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(obj) = self.lookup(s, name) {
                return Some(obj);
            }
            current = self.scopes[s.index()].parent;
        }
        None
    }

    pub fn add_package(&mut self, path: impl Into<String>, name: impl Into<String>) -> PackageId {
        let scope = self.new_scope(Some(self.universe), ScopeKind::Package);
        self.packages.push(PackageInfo {
            path: path.into(),
            name: name.into(),
            scope,
        });
        PackageId::from_index(self.packages.len() - 1)
    }

    pub fn package(&self, id: PackageId) -> &PackageInfo {
        &self.packages[id.index()]
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// The underlying type: named types resolved through their chain, type
    /// parameters through their constraint.
    pub fn underlying(&self, mut t: TypeId) -> TypeId {
        for _ in 0..64 {
            match self.ty(t) {
                Type::Named(n) => t = n.underlying,
                Type::TypeParam { constraint, .. } => t = *constraint,
                _ => return t,
            }
        }
        TypeId::INVALID
    }

    /// Strip one pointer level, reporting whether there was one.
    pub fn deref(&self, t: TypeId) -> (TypeId, bool) {
        match self.ty(t) {
            Type::Pointer(elem) => (*elem, true),
            _ => (t, false),
        }
    }

    pub fn is_interface(&self, t: TypeId) -> bool {
        matches!(self.ty(self.underlying(t)), Type::Interface(_)) && !self.is_type_param(t)
    }

    pub fn is_type_param(&self, t: TypeId) -> bool {
        matches!(self.ty(t), Type::TypeParam { .. })
    }

    /// The signature of a function-typed value.
    pub fn signature(&self, t: TypeId) -> Option<&Signature> {
        match self.ty(self.underlying(t)) {
            Type::Signature(s) => Some(s),
            _ => None,
        }
    }

    /// The declared type of an untyped constant kind, or `t` itself.
    pub fn default_type(&self, t: TypeId) -> TypeId {
        match self.ty(t) {
            Type::Basic(BasicKind::UntypedNil) => TypeId::INVALID,
            Type::Basic(k) => self.basic(k.default_kind()),
            _ => t,
        }
    }

    pub fn is_untyped(&self, t: TypeId) -> bool {
        matches!(
            self.ty(t),
            Type::Basic(
                BasicKind::UntypedBool
                    | BasicKind::UntypedInt
                    | BasicKind::UntypedRune
                    | BasicKind::UntypedFloat
                    | BasicKind::UntypedString
                    | BasicKind::UntypedNil
            )
        )
    }

    /// The type name object of a named type.
    pub fn type_name(&self, t: TypeId) -> Option<ObjectId> {
        match self.ty(t) {
            Type::Named(n) => Some(n.obj),
            Type::TypeParam { obj, .. } => Some(*obj),
            _ => None,
        }
    }

    /// All methods of an interface type, embedded interfaces included.
    pub fn interface_methods(&self, t: TypeId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        self.collect_interface_methods(t, &mut out, &mut seen);
        out
    }

    fn collect_interface_methods(
        &self,
        t: TypeId,
        out: &mut Vec<ObjectId>,
        seen: &mut HashSet<TypeId>,
    ) {
        let u = self.underlying(t);
        if !seen.insert(u) {
            return;
        }
        if let Type::Interface(iface) = self.ty(u) {
            for &m in &iface.methods {
                let name = &self.object(m).name;
                if !out.iter().any(|o| &self.object(*o).name == name) {
                    out.push(m);
                }
            }
            for &e in &iface.embedded {
                self.collect_interface_methods(e, out, seen);
            }
        }
    }

    /// Find a field or method by name, searching embedded fields breadth
    /// first the way selectors resolve.
    pub fn lookup_field_or_method(&self, t: TypeId, name: &str) -> Option<Selection> {
        if name == "_" {
            return None;
        }
        let (start, indirect) = self.deref(t);
        let mut current = vec![(start, indirect)];
        let mut seen = HashSet::new();
        while !current.is_empty() {
            let mut next = Vec::new();
            for (typ, indirect) in current {
                if let Type::Named(n) = self.ty(typ) {
                    if !seen.insert(typ) {
                        continue;
                    }
                    if let Some(&m) = n.methods.iter().find(|m| self.object(**m).name == name) {
                        return Some(Selection { obj: m, indirect });
                    }
                }
                match self.ty(self.underlying(typ)) {
                    Type::Struct(fields) => {
                        for &f in fields {
                            let field = self.object(f);
                            if field.name == name {
                                return Some(Selection { obj: f, indirect });
                            }
                            if let ObjectKind::Field { embedded: true } = field.kind {
                                let (ft, ptr) = self.deref(field.ty);
                                next.push((ft, indirect || ptr));
                            }
                        }
                    }
                    Type::Interface(_) => {
                        if let Some(m) = self
                            .interface_methods(typ)
                            .into_iter()
                            .find(|m| self.object(*m).name == name)
                        {
                            return Some(Selection { obj: m, indirect });
                        }
                    }
                    _ => {}
                }
            }
            current = next;
        }
        None
    }

    fn has_pointer_recv(&self, method: ObjectId) -> bool {
        self.signature(self.object(method).ty)
            .and_then(|s| s.recv)
            .is_some_and(|r| matches!(self.ty(self.object(r).ty), Type::Pointer(_)))
    }

    /// True if values of type `t` satisfy interface `iface`.
    ///
    /// Pointer-receiver methods count only when `t` is a pointer or the
    /// method is promoted through an embedded pointer.
    pub fn implements(&self, t: TypeId, iface: TypeId) -> bool {
        if t.is_invalid() || !self.is_interface(iface) {
            return false;
        }
        let wanted = self.interface_methods(iface);
        if self.is_interface(t) {
            let have = self.interface_methods(t);
            return wanted.iter().all(|w| {
                let w = self.object(*w);
                have.iter().any(|h| {
                    let h = self.object(*h);
                    h.name == w.name && self.identical(h.ty, w.ty)
                })
            });
        }
        wanted.iter().all(|w| {
            let want = self.object(*w);
            match self.lookup_field_or_method(t, &want.name) {
                Some(sel) => {
                    let found = self.object(sel.obj);
                    found.is_func()
                        && (sel.indirect || !self.has_pointer_recv(sel.obj))
                        && self.identical(found.ty, want.ty)
                }
                None => false,
            }
        })
    }

    /// Type identity. Named types are identical only to themselves;
    /// signatures compare without their receivers.
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.ty(a), self.ty(b)) {
            (Type::Basic(x), Type::Basic(y)) => x == y,
            (Type::Pointer(x), Type::Pointer(y)) | (Type::Slice(x), Type::Slice(y)) => {
                self.identical(*x, *y)
            }
            (Type::Array { len: l1, elem: e1 }, Type::Array { len: l2, elem: e2 }) => {
                l1 == l2 && self.identical(*e1, *e2)
            }
            (Type::Map { key: k1, value: v1 }, Type::Map { key: k2, value: v2 }) => {
                self.identical(*k1, *k2) && self.identical(*v1, *v2)
            }
            (Type::Chan { dir: d1, elem: e1 }, Type::Chan { dir: d2, elem: e2 }) => {
                d1 == d2 && self.identical(*e1, *e2)
            }
            (Type::Struct(f1), Type::Struct(f2)) => {
                f1.len() == f2.len()
                    && f1.iter().zip(f2).all(|(x, y)| {
                        let (x, y) = (self.object(*x), self.object(*y));
                        x.name == y.name && x.kind == y.kind && self.identical(x.ty, y.ty)
                    })
            }
            (Type::Signature(s1), Type::Signature(s2)) => {
                s1.variadic == s2.variadic
                    && self.identical_vars(&s1.params, &s2.params)
                    && self.identical_vars(&s1.results, &s2.results)
            }
            (Type::Interface(_), Type::Interface(_)) => {
                let (m1, m2) = (self.interface_methods(a), self.interface_methods(b));
                m1.len() == m2.len()
                    && m1.iter().all(|x| {
                        let x = self.object(*x);
                        m2.iter().any(|y| {
                            let y = self.object(*y);
                            x.name == y.name && self.identical(x.ty, y.ty)
                        })
                    })
            }
            (Type::Tuple(t1), Type::Tuple(t2)) => {
                t1.len() == t2.len() && t1.iter().zip(t2).all(|(x, y)| self.identical(*x, *y))
            }
            _ => false,
        }
    }

    fn identical_vars(&self, a: &[ObjectId], b: &[ObjectId]) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(x, y)| self.identical(self.object(*x).ty, self.object(*y).ty))
    }

    /// The canonical name of a function object: `<pkg path>.<name>` for a
    /// free function, `<receiver type>.<name>` for a method with any `*`
    /// dropped from the receiver. The flag is true for methods.
    pub fn func_full_name(&self, func: ObjectId) -> Option<(String, bool)> {
        let obj = self.object(func);
        if !obj.is_func() {
            return None;
        }
        match self.signature(obj.ty).and_then(|s| s.recv) {
            Some(recv) => {
                let recv_type = self.type_string(self.object(recv).ty);
                Some((
                    format!("{}.{}", recv_type.trim_start_matches('*'), obj.name),
                    true,
                ))
            }
            None => {
                let pkg = obj.pkg.map(|p| self.package(p).path.as_str()).unwrap_or("");
                Some((format!("{}.{}", pkg, obj.name), false))
            }
        }
    }

    /// A type written out with full package paths, e.g. `*example.com/db.Conn`.
    pub fn type_string(&self, t: TypeId) -> String {
        let mut out = String::new();
        self.write_type(t, &mut out, 0);
        out
    }

    fn write_type(&self, t: TypeId, out: &mut String, depth: usize) {
        if depth > 32 {
            out.push_str("...");
            return;
        }
        let d = depth + 1;
        match self.ty(t) {
            Type::Invalid => out.push_str("invalid type"),
            Type::Basic(k) => out.push_str(k.name()),
            Type::Named(n) => {
                let obj = self.object(n.obj);
                if let Some(p) = obj.pkg {
                    out.push_str(&self.package(p).path);
                    out.push('.');
                }
                out.push_str(&obj.name);
            }
            Type::TypeParam { obj, .. } => out.push_str(&self.object(*obj).name),
            Type::Pointer(e) => {
                out.push('*');
                self.write_type(*e, out, d);
            }
            Type::Slice(e) => {
                out.push_str("[]");
                self.write_type(*e, out, d);
            }
            Type::Array { len, elem } => {
                match len {
                    Some(n) => out.push_str(&format!("[{}]", n)),
                    None => out.push_str("[?]"),
                }
                self.write_type(*elem, out, d);
            }
            Type::Map { key, value } => {
                out.push_str("map[");
                self.write_type(*key, out, d);
                out.push(']');
                self.write_type(*value, out, d);
            }
            Type::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(*elem, out, d);
            }
            Type::Struct(fields) => {
                out.push_str("struct{");
                for (i, f) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let field = self.object(*f);
                    if !matches!(field.kind, ObjectKind::Field { embedded: true }) {
                        out.push_str(&field.name);
                        out.push(' ');
                    }
                    self.write_type(field.ty, out, d);
                }
                out.push('}');
            }
            Type::Interface(_) => {
                out.push_str("interface{");
                for (i, m) in self.interface_methods(t).iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let m = self.object(*m);
                    out.push_str(&m.name);
                    self.write_signature(m.ty, out, d);
                }
                out.push('}');
            }
            Type::Signature(_) => {
                out.push_str("func");
                self.write_signature(t, out, d);
            }
            Type::Tuple(ts) => {
                out.push('(');
                for (i, x) in ts.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(*x, out, d);
                }
                out.push(')');
            }
        }
    }

    fn write_signature(&self, t: TypeId, out: &mut String, depth: usize) {
        let Type::Signature(sig) = self.ty(t) else {
            return;
        };
        out.push('(');
        for (i, p) in sig.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let p = self.object(*p);
            if sig.variadic && i + 1 == sig.params.len() {
                out.push_str("...");
                if let Type::Slice(e) = self.ty(p.ty) {
                    self.write_type(*e, out, depth);
                    continue;
                }
            }
            self.write_type(p.ty, out, depth);
        }
        out.push(')');
        match sig.results.len() {
            0 => {}
            1 => {
                out.push(' ');
                self.write_type(self.object(sig.results[0]).ty, out, depth);
            }
            _ => {
                out.push_str(" (");
                for (i, r) in sig.results.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(self.object(*r).ty, out, depth);
                }
                out.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(store: &mut TypeStore, recv_ty: TypeId, name: &str, results: Vec<TypeId>) -> ObjectId {
        let recv = store.new_object("r", ObjectKind::Var, recv_ty, None, Pos::NONE);
        let results = results
            .into_iter()
            .map(|t| store.new_object("", ObjectKind::Var, t, None, Pos::NONE))
            .collect();
        let sig = store.add_type(Type::Signature(Signature {
            recv: Some(recv),
            params: Vec::new(),
            results,
            variadic: false,
        }));
        store.new_object(name, ObjectKind::Func, sig, None, Pos::NONE)
    }

    fn named(store: &mut TypeStore, pkg: PackageId, name: &str, underlying: TypeId) -> TypeId {
        let obj = store.new_object(name, ObjectKind::TypeName, TypeId::INVALID, Some(pkg), Pos(1));
        let t = store.new_named(obj);
        store.set_underlying(t, underlying);
        t
    }

    #[test]
    fn universe_lookup() {
        let store = TypeStore::new();
        let u = store.universe();
        let int = store.lookup(u, "int").expect("int");
        assert_eq!(store.type_string(store.object(int).ty), "int");
        let byte = store.lookup(u, "byte").expect("byte");
        assert_eq!(store.object(byte).ty, store.basic(BasicKind::Uint8));
        assert!(store.is_interface(store.error_type()));
        assert!(matches!(
            store.object(store.lookup(u, "len").expect("len")).kind,
            ObjectKind::Builtin(Builtin::Len)
        ));
        assert!(store.lookup(u, "unsafe.Pointer").is_none());
    }

    #[test]
    fn pointer_receiver_method_sets() {
        let mut store = TypeStore::new();
        let pkg = store.add_package("example.com/p", "p");
        let string = store.basic(BasicKind::String);
        let empty_struct = store.add_type(Type::Struct(Vec::new()));
        let t = named(&mut store, pkg, "T", empty_struct);
        let ptr_t = store.new_pointer(t);
        let m = method(&mut store, ptr_t, "String", vec![string]);
        store.add_method(t, m);

        let iface_method = method(&mut store, TypeId::INVALID, "String", vec![string]);
        let iface = store.add_type(Type::Interface(InterfaceType {
            methods: vec![iface_method],
            embedded: Vec::new(),
        }));

        assert!(store.implements(ptr_t, iface));
        assert!(!store.implements(t, iface));
        assert!(!store.implements(store.basic(BasicKind::Int), iface));
        assert_eq!(
            store.func_full_name(m),
            Some(("example.com/p.T.String".to_string(), true))
        );
    }

    #[test]
    fn embedded_fields_promote_methods() {
        let mut store = TypeStore::new();
        let pkg = store.add_package("p", "p");
        let empty_struct = store.add_type(Type::Struct(Vec::new()));
        let inner = named(&mut store, pkg, "Inner", empty_struct);
        let ptr_inner = store.new_pointer(inner);
        let close = method(&mut store, ptr_inner, "Close", Vec::new());
        store.add_method(inner, close);

        let field = store.new_object("Inner", ObjectKind::Field { embedded: true }, ptr_inner, Some(pkg), Pos(2));
        let outer_struct = store.add_type(Type::Struct(vec![field]));
        let outer = named(&mut store, pkg, "Outer", outer_struct);

        let sel = store.lookup_field_or_method(outer, "Close").expect("promoted");
        assert_eq!(sel.obj, close);
        assert!(sel.indirect);
        assert!(store.lookup_field_or_method(outer, "Open").is_none());

        let iface_method = method(&mut store, TypeId::INVALID, "Close", Vec::new());
        let closer = store.add_type(Type::Interface(InterfaceType {
            methods: vec![iface_method],
            embedded: Vec::new(),
        }));
        assert!(store.implements(outer, closer));
    }

    #[test]
    fn interfaces_implement_by_method_set() {
        let mut store = TypeStore::new();
        let pkg = store.add_package("context", "context");
        let err = store.error_type();
        let err_method = method(&mut store, TypeId::INVALID, "Err", vec![err]);
        let small = store.add_type(Type::Interface(InterfaceType {
            methods: vec![err_method],
            embedded: Vec::new(),
        }));
        let done = method(&mut store, TypeId::INVALID, "Done", Vec::new());
        let big_iface = store.add_type(Type::Interface(InterfaceType {
            methods: vec![done],
            embedded: vec![small],
        }));
        let ctx = named(&mut store, pkg, "Context", big_iface);

        assert_eq!(store.interface_methods(ctx).len(), 2);
        assert!(store.implements(ctx, small));
        assert!(!store.implements(small, ctx));
        assert!(store.implements(ctx, store.empty_interface()));
        assert!(!store.implements(TypeId::INVALID, ctx));
        assert_eq!(store.type_string(ctx), "context.Context");
        let ptr = store.new_pointer(ctx);
        assert_eq!(store.type_string(ptr), "*context.Context");
    }

    #[test]
    fn scopes_chain_to_parents() {
        let mut store = TypeStore::new();
        let pkg = store.add_package("p", "p");
        let pkg_scope = store.package(pkg).scope;
        let func = store.new_scope(Some(pkg_scope), ScopeKind::Func);
        let int = store.basic(BasicKind::Int);
        let x = store.new_object("x", ObjectKind::Var, int, Some(pkg), Pos(5));
        store.insert(func, x);
        let blank = store.new_object("_", ObjectKind::Var, int, Some(pkg), Pos(9));
        assert_eq!(store.insert(func, blank), None);

        assert_eq!(store.lookup(func, "x"), Some(x));
        assert_eq!(store.lookup(pkg_scope, "x"), None);
        assert!(store.lookup_parent(func, "string").is_some());
        assert_eq!(store.scope(func).len(), 1);
        assert_eq!(store.remove(func, "x"), Some(x));
        assert!(store.scope(func).is_empty());
    }
}
