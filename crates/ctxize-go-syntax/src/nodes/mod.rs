// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

pub mod decl;
pub mod expression;
pub mod statement;
pub mod traits;

pub use decl::{DeclKeyword, Decl, File, FuncDecl, GenDecl, ImportSpec, Spec, TypeSpec, ValueSpec};
pub use expression::{
    BasicLit, BinaryOp, CallExpr, ChanDir, CompositeLit, Expr, ExprKind, ExprList, Field,
    FieldList, FuncLit, FuncType, Ident, ListItem, LitKind, SliceExpr, UnaryOp,
};
pub use statement::{
    AssignOp, Block, BranchKind, CaseBody, CaseClause, CommClause, ForStmt, IfStmt, RangeStmt,
    SelectStmt, Stmt, StmtKind, SwitchStmt, TypeSwitchStmt,
};
pub use traits::{Comment, CommentGroup, Comments, NodeId};
