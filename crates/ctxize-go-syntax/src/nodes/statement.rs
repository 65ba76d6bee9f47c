// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes.

use crate::nodes::decl::GenDecl;
use crate::nodes::expression::{Expr, Ident};
use crate::nodes::traits::{CommentGroup, Comments};
use crate::position::{Pos, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Quo => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

/// A braced statement list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub lbrace: Pos,
    /// A comment on the line of `{`.
    pub open_comment: Option<CommentGroup>,
    pub stmts: Vec<Stmt>,
    pub rbrace: Pos,
    /// Comments after the last statement.
    pub end_comments: Vec<CommentGroup>,
    /// The braces were on different lines.
    pub multiline: bool,
}

impl Block {
    pub fn span(&self) -> Span {
        Span::new(self.lbrace, self.rbrace.add(1))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub body: Block,
    /// Either another `if` or a block.
    pub els: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    /// Empty for `default`.
    pub list: Vec<Expr>,
    pub is_default: bool,
    pub body: Vec<Stmt>,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

/// The braced clause list of a switch statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaseBody {
    pub lbrace: Pos,
    pub clauses: Vec<CaseClause>,
    pub rbrace: Pos,
    pub end_comments: Vec<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub body: CaseBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// `x := y.(type)` or `y.(type)`.
    pub assign: Box<Stmt>,
    pub body: CaseBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    /// `None` for `default`.
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub lbrace: Pos,
    pub clauses: Vec<CommClause>,
    pub rbrace: Pos,
    pub end_comments: Vec<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    /// `:=` or `=`; `None` for `for range x`.
    pub tok: Option<AssignOp>,
    pub x: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Bad,
    Decl(GenDecl),
    Empty,
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Expr(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    IncDec {
        x: Expr,
        inc: bool,
    },
    Assign {
        lhs: Vec<Expr>,
        op: AssignOp,
        rhs: Vec<Expr>,
    },
    Go(Expr),
    Defer(Expr),
    Return(Vec<Expr>),
    Branch {
        kind: BranchKind,
        label: Option<Ident>,
    },
    Block(Block),
    If(IfStmt),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    Select(SelectStmt),
    For(ForStmt),
    Range(RangeStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt {
            kind,
            span,
            comments: Comments::default(),
            blank_before: false,
        }
    }

    /// A synthesized statement with no source position.
    pub fn synthetic(kind: StmtKind) -> Self {
        Stmt::new(kind, Span::NONE)
    }

    /// `name := value`, synthesized.
    pub fn define(name: impl Into<String>, value: Expr) -> Self {
        Stmt::synthetic(StmtKind::Assign {
            lhs: vec![Expr::ident(name)],
            op: AssignOp::Define,
            rhs: vec![value],
        })
    }
}
