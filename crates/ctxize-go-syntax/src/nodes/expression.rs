// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression and type nodes.
//!
//! Types are expressions, as in the Go grammar: `*T`, `[]T`, `map[K]V`,
//! `func(...)`, `struct{...}` and friends are all [`ExprKind`] variants.

use crate::nodes::statement::Block;
use crate::nodes::traits::{Comments, NodeId};
use crate::position::{Pos, Span};

// ============================================================================
// Identifiers and literals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

impl Ident {
    /// A synthesized identifier with no source position.
    pub fn new(name: impl Into<String>) -> Self {
        Ident {
            name: name.into(),
            pos: Pos::NONE,
        }
    }

    pub fn end(&self) -> Pos {
        self.pos.add(self.name.len())
    }

    pub fn span(&self) -> Span {
        Span::new(self.pos, self.end())
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

/// A literal, kept exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
    pub pos: Pos,
}

impl BasicLit {
    pub fn string(value: &str) -> Self {
        BasicLit {
            kind: LitKind::String,
            value: format!("{:?}", value),
            pos: Pos::NONE,
        }
    }

    /// The contents of a string literal without quotes. Escapes other than
    /// `\"` and `\\` are left as written, which is enough for import paths.
    pub fn unquoted(&self) -> String {
        let v = self.value.as_str();
        if let Some(raw) = v.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
            return raw.to_string();
        }
        let inner = v
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(v);
        inner.replace("\\\"", "\"").replace("\\\\", "\\")
    }
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    Xor,
    Addr,
    Arrow,
    Tilde,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
            UnaryOp::Addr => "&",
            UnaryOp::Arrow => "<-",
            UnaryOp::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    LOr,
    LAnd,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    /// Go operator precedence, 1 (lowest) to 5 (highest).
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::LOr => 1,
            BinaryOp::LAnd => 2,
            BinaryOp::Eql
            | BinaryOp::Neq
            | BinaryOp::Lss
            | BinaryOp::Leq
            | BinaryOp::Gtr
            | BinaryOp::Geq => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Mul
            | BinaryOp::Quo
            | BinaryOp::Rem
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 3
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::LOr => "||",
            BinaryOp::LAnd => "&&",
            BinaryOp::Eql => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lss => "<",
            BinaryOp::Leq => "<=",
            BinaryOp::Gtr => ">",
            BinaryOp::Geq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Mul => "*",
            BinaryOp::Quo => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&",
            BinaryOp::AndNot => "&^",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

// ============================================================================
// Lists with layout
// ============================================================================

/// An element of a call argument list or composite literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub expr: Expr,
    /// The element started on a new line in the source.
    pub line_break: bool,
    /// A blank line preceded the element.
    pub blank_before: bool,
    pub comments: Comments,
}

impl ListItem {
    pub fn new(expr: Expr) -> Self {
        ListItem {
            expr,
            line_break: false,
            blank_before: false,
            comments: Comments::default(),
        }
    }
}

/// A comma-separated expression list that remembers its line breaks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExprList {
    pub items: Vec<ListItem>,
    /// The closing delimiter was on its own line.
    pub break_before_close: bool,
    /// Comments after the last element.
    pub end_comments: Vec<crate::nodes::traits::CommentGroup>,
}

impl ExprList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn exprs(&self) -> impl Iterator<Item = &Expr> {
        self.items.iter().map(|i| &i.expr)
    }

    /// Insert `expr` as the first element, taking over the old first
    /// element's line placement.
    pub fn push_front(&mut self, expr: Expr) {
        let mut item = ListItem::new(expr);
        if let Some(first) = self.items.first() {
            item.line_break = first.line_break;
        }
        self.items.insert(0, item);
    }

    pub fn is_multiline(&self) -> bool {
        self.break_before_close || self.items.iter().any(|i| i.line_break)
    }
}

// ============================================================================
// Fields and signatures
// ============================================================================

/// A parameter, result, struct field, or interface element.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
    pub span: Span,
    pub comments: Comments,
    pub line_break: bool,
    pub blank_before: bool,
}

impl Field {
    pub fn new(names: Vec<Ident>, ty: Expr) -> Self {
        Field {
            names,
            ty,
            tag: None,
            span: Span::NONE,
            comments: Comments::default(),
            line_break: false,
            blank_before: false,
        }
    }
}

/// Parameters, results, type parameters, struct fields or interface
/// elements, with the positions of the enclosing delimiters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub open: Pos,
    pub list: Vec<Field>,
    pub close: Pos,
    pub break_before_close: bool,
    /// Comments between the last field and the closing delimiter.
    pub end_comments: Vec<crate::nodes::traits::CommentGroup>,
}

impl FieldList {
    /// Number of names declared, counting an unnamed field as one.
    pub fn num_fields(&self) -> usize {
        self.list.iter().map(|f| f.names.len().max(1)).sum()
    }

    /// Insert `field` as the first entry, taking over the old first entry's
    /// line placement.
    pub fn push_front(&mut self, mut field: Field) {
        if let Some(first) = self.list.first() {
            field.line_break = first.line_break;
        }
        self.list.insert(0, field);
    }

    pub fn is_multiline(&self) -> bool {
        self.break_before_close || self.list.iter().any(|f| f.line_break)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncType {
    pub type_params: Option<FieldList>,
    pub params: FieldList,
    pub results: Option<FieldList>,
    pub span: Span,
}

// ============================================================================
// Compound expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub id: NodeId,
    pub fun: Box<Expr>,
    pub args: ExprList,
    /// `f(xs...)`
    pub ellipsis: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub ty: Option<Box<Expr>>,
    pub elts: ExprList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub id: NodeId,
    pub ty: FuncType,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliceExpr {
    pub x: Box<Expr>,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    pub slice3: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Bad,
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(CompositeLit),
    FuncLit(FuncLit),
    Paren(Box<Expr>),
    Selector {
        x: Box<Expr>,
        sel: Ident,
    },
    /// `x[i]`, or a generic instantiation `T[A, B]`.
    Index {
        x: Box<Expr>,
        indices: Vec<Expr>,
    },
    Slice(SliceExpr),
    /// `x.(T)`; `ty` is `None` for `x.(type)`.
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
    },
    Call(CallExpr),
    Star(Box<Expr>),
    Unary {
        op: UnaryOp,
        x: Box<Expr>,
    },
    Binary {
        x: Box<Expr>,
        op: BinaryOp,
        y: Box<Expr>,
        /// The right operand started on a new line.
        line_break: bool,
    },
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    /// `...T` in a variadic parameter, or `[...]T` array length.
    Ellipsis(Option<Box<Expr>>),
    /// `[N]T`, or `[]T` when `len` is `None`.
    ArrayType {
        len: Option<Box<Expr>>,
        elem: Box<Expr>,
    },
    StructType(FieldList),
    FuncType(FuncType),
    InterfaceType(FieldList),
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType {
        dir: ChanDir,
        value: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// A synthesized expression with no source position.
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::NONE,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Ident(Ident::new(name)))
    }

    /// `x.sel`, synthesized.
    pub fn selector(x: impl Into<String>, sel: impl Into<String>) -> Self {
        Expr::synthetic(ExprKind::Selector {
            x: Box::new(Expr::ident(x)),
            sel: Ident::new(sel),
        })
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(id) => Some(id),
            _ => None,
        }
    }

    /// The expression with any enclosing parentheses removed.
    pub fn unparen(&self) -> &Expr {
        let mut e = self;
        while let ExprKind::Paren(inner) = &e.kind {
            e = inner;
        }
        e
    }

    pub fn pos(&self) -> Pos {
        self.span.start
    }
}
