// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions driving [`Visitor`] and [`VisitorMut`] over the tree.
//!
//! Each `walk_*` function calls the node's visit hook, descends into the
//! children unless told to skip them, and calls the leave hook. A `Stop`
//! from any hook unwinds the whole walk and is returned to the caller.

use super::traits::{VisitResult, Visitor, VisitorMut};
use crate::nodes::{
    Block, CallExpr, Decl, Expr, ExprKind, ExprList, Field, FieldList, File, FuncDecl, FuncLit,
    FuncType, GenDecl, Ident, Spec, Stmt, StmtKind,
};

macro_rules! try_walk {
    ($e:expr) => {
        if $e == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

macro_rules! node {
    ($v:ident, $visit:ident, $leave:ident, $node:ident, $children:block) => {{
        match $v.$visit($node) {
            VisitResult::Stop => return VisitResult::Stop,
            VisitResult::SkipChildren => {}
            VisitResult::Continue => $children,
        }
        $v.$leave($node);
        VisitResult::Continue
    }};
}

macro_rules! node_mut {
    ($v:ident, $visit:ident, $node:ident, $children:block) => {{
        match $v.$visit($node) {
            VisitResult::Stop => return VisitResult::Stop,
            VisitResult::SkipChildren => {}
            VisitResult::Continue => $children,
        }
        VisitResult::Continue
    }};
}

// ============================================================================
// Immutable walk
// ============================================================================

pub fn walk_file<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, file: &'ast File) -> VisitResult {
    node!(v, visit_file, leave_file, file, {
        for d in &file.decls {
            try_walk!(walk_decl(v, d));
        }
    })
}

pub fn walk_decl<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, decl: &'ast Decl) -> VisitResult {
    node!(v, visit_decl, leave_decl, decl, {
        match decl {
            Decl::Gen(g) => try_walk!(walk_gen_decl(v, g)),
            Decl::Func(f) => try_walk!(walk_func_decl(v, f)),
        }
    })
}

pub fn walk_gen_decl<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    decl: &'ast GenDecl,
) -> VisitResult {
    node!(v, visit_gen_decl, leave_gen_decl, decl, {
        for s in &decl.specs {
            try_walk!(walk_spec(v, s));
        }
    })
}

pub fn walk_spec<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, spec: &'ast Spec) -> VisitResult {
    node!(v, visit_spec, leave_spec, spec, {
        match spec {
            Spec::Import(_) => {}
            Spec::Value(vs) => {
                for name in &vs.names {
                    try_walk!(walk_ident(v, name));
                }
                if let Some(ty) = &vs.ty {
                    try_walk!(walk_expr(v, ty));
                }
                for value in &vs.values {
                    try_walk!(walk_expr(v, value));
                }
            }
            Spec::Type(ts) => {
                try_walk!(walk_ident(v, &ts.name));
                if let Some(tparams) = &ts.type_params {
                    try_walk!(walk_field_list(v, tparams));
                }
                try_walk!(walk_expr(v, &ts.ty));
            }
        }
    })
}

pub fn walk_func_decl<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    func: &'ast FuncDecl,
) -> VisitResult {
    node!(v, visit_func_decl, leave_func_decl, func, {
        if let Some(recv) = &func.recv {
            try_walk!(walk_field_list(v, recv));
        }
        try_walk!(walk_ident(v, &func.name));
        try_walk!(walk_func_type(v, &func.ty));
        if let Some(body) = &func.body {
            try_walk!(walk_block(v, body));
        }
    })
}

fn walk_func_type<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ty: &'ast FuncType) -> VisitResult {
    if let Some(tparams) = &ty.type_params {
        try_walk!(walk_field_list(v, tparams));
    }
    try_walk!(walk_field_list(v, &ty.params));
    if let Some(results) = &ty.results {
        try_walk!(walk_field_list(v, results));
    }
    VisitResult::Continue
}

fn walk_field_list<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    fields: &'ast FieldList,
) -> VisitResult {
    for f in &fields.list {
        try_walk!(walk_field(v, f));
    }
    VisitResult::Continue
}

pub fn walk_field<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, field: &'ast Field) -> VisitResult {
    node!(v, visit_field, leave_field, field, {
        for name in &field.names {
            try_walk!(walk_ident(v, name));
        }
        try_walk!(walk_expr(v, &field.ty));
    })
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, block: &'ast Block) -> VisitResult {
    node!(v, visit_block, leave_block, block, {
        for s in &block.stmts {
            try_walk!(walk_stmt(v, s));
        }
    })
}

fn walk_stmts<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmts: &'ast [Stmt]) -> VisitResult {
    for s in stmts {
        try_walk!(walk_stmt(v, s));
    }
    VisitResult::Continue
}

fn walk_exprs<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, exprs: &'ast [Expr]) -> VisitResult {
    for x in exprs {
        try_walk!(walk_expr(v, x));
    }
    VisitResult::Continue
}

fn walk_expr_list<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    list: &'ast ExprList,
) -> VisitResult {
    for item in &list.items {
        try_walk!(walk_expr(v, &item.expr));
    }
    VisitResult::Continue
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) -> VisitResult {
    node!(v, visit_stmt, leave_stmt, stmt, {
        match &stmt.kind {
            StmtKind::Bad | StmtKind::Empty => {}
            StmtKind::Decl(g) => try_walk!(walk_gen_decl(v, g)),
            StmtKind::Labeled { label, stmt } => {
                try_walk!(walk_ident(v, label));
                try_walk!(walk_stmt(v, stmt));
            }
            StmtKind::Expr(x) | StmtKind::Go(x) | StmtKind::Defer(x) => {
                try_walk!(walk_expr(v, x))
            }
            StmtKind::IncDec { x, .. } => try_walk!(walk_expr(v, x)),
            StmtKind::Send { chan, value } => {
                try_walk!(walk_expr(v, chan));
                try_walk!(walk_expr(v, value));
            }
            StmtKind::Assign { lhs, rhs, .. } => {
                try_walk!(walk_exprs(v, lhs));
                try_walk!(walk_exprs(v, rhs));
            }
            StmtKind::Return(results) => try_walk!(walk_exprs(v, results)),
            StmtKind::Branch { label, .. } => {
                if let Some(label) = label {
                    try_walk!(walk_ident(v, label));
                }
            }
            StmtKind::Block(b) => try_walk!(walk_block(v, b)),
            StmtKind::If(s) => {
                if let Some(init) = &s.init {
                    try_walk!(walk_stmt(v, init));
                }
                try_walk!(walk_expr(v, &s.cond));
                try_walk!(walk_block(v, &s.body));
                if let Some(els) = &s.els {
                    try_walk!(walk_stmt(v, els));
                }
            }
            StmtKind::Switch(s) => {
                if let Some(init) = &s.init {
                    try_walk!(walk_stmt(v, init));
                }
                if let Some(tag) = &s.tag {
                    try_walk!(walk_expr(v, tag));
                }
                for clause in &s.body.clauses {
                    try_walk!(walk_exprs(v, &clause.list));
                    try_walk!(walk_stmts(v, &clause.body));
                }
            }
            StmtKind::TypeSwitch(s) => {
                if let Some(init) = &s.init {
                    try_walk!(walk_stmt(v, init));
                }
                try_walk!(walk_stmt(v, &s.assign));
                for clause in &s.body.clauses {
                    try_walk!(walk_exprs(v, &clause.list));
                    try_walk!(walk_stmts(v, &clause.body));
                }
            }
            StmtKind::Select(s) => {
                for clause in &s.clauses {
                    if let Some(comm) = &clause.comm {
                        try_walk!(walk_stmt(v, comm));
                    }
                    try_walk!(walk_stmts(v, &clause.body));
                }
            }
            StmtKind::For(s) => {
                if let Some(init) = &s.init {
                    try_walk!(walk_stmt(v, init));
                }
                if let Some(cond) = &s.cond {
                    try_walk!(walk_expr(v, cond));
                }
                if let Some(post) = &s.post {
                    try_walk!(walk_stmt(v, post));
                }
                try_walk!(walk_block(v, &s.body));
            }
            StmtKind::Range(s) => {
                if let Some(key) = &s.key {
                    try_walk!(walk_expr(v, key));
                }
                if let Some(value) = &s.value {
                    try_walk!(walk_expr(v, value));
                }
                try_walk!(walk_expr(v, &s.x));
                try_walk!(walk_block(v, &s.body));
            }
        }
    })
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) -> VisitResult {
    node!(v, visit_expr, leave_expr, expr, {
        match &expr.kind {
            ExprKind::Bad | ExprKind::BasicLit(_) => {}
            ExprKind::Ident(id) => try_walk!(walk_ident(v, id)),
            ExprKind::CompositeLit(lit) => {
                if let Some(ty) = &lit.ty {
                    try_walk!(walk_expr(v, ty));
                }
                try_walk!(walk_expr_list(v, &lit.elts));
            }
            ExprKind::FuncLit(lit) => try_walk!(walk_func_lit(v, lit)),
            ExprKind::Paren(x) | ExprKind::Star(x) | ExprKind::Unary { x, .. } => {
                try_walk!(walk_expr(v, x))
            }
            ExprKind::Selector { x, sel } => {
                try_walk!(walk_expr(v, x));
                try_walk!(walk_ident(v, sel));
            }
            ExprKind::Index { x, indices } => {
                try_walk!(walk_expr(v, x));
                try_walk!(walk_exprs(v, indices));
            }
            ExprKind::Slice(s) => {
                try_walk!(walk_expr(v, &s.x));
                for bound in [&s.low, &s.high, &s.max].into_iter().flatten() {
                    try_walk!(walk_expr(v, bound));
                }
            }
            ExprKind::TypeAssert { x, ty } => {
                try_walk!(walk_expr(v, x));
                if let Some(ty) = ty {
                    try_walk!(walk_expr(v, ty));
                }
            }
            ExprKind::Call(call) => try_walk!(walk_call(v, call)),
            ExprKind::Binary { x, y, .. } => {
                try_walk!(walk_expr(v, x));
                try_walk!(walk_expr(v, y));
            }
            ExprKind::KeyValue { key, value } => {
                try_walk!(walk_expr(v, key));
                try_walk!(walk_expr(v, value));
            }
            ExprKind::Ellipsis(elt) => {
                if let Some(elt) = elt {
                    try_walk!(walk_expr(v, elt));
                }
            }
            ExprKind::ArrayType { len, elem } => {
                if let Some(len) = len {
                    try_walk!(walk_expr(v, len));
                }
                try_walk!(walk_expr(v, elem));
            }
            ExprKind::StructType(fields) | ExprKind::InterfaceType(fields) => {
                try_walk!(walk_field_list(v, fields))
            }
            ExprKind::FuncType(ty) => try_walk!(walk_func_type(v, ty)),
            ExprKind::MapType { key, value } => {
                try_walk!(walk_expr(v, key));
                try_walk!(walk_expr(v, value));
            }
            ExprKind::ChanType { value, .. } => try_walk!(walk_expr(v, value)),
        }
    })
}

pub fn walk_call<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, call: &'ast CallExpr) -> VisitResult {
    node!(v, visit_call, leave_call, call, {
        try_walk!(walk_expr(v, &call.fun));
        try_walk!(walk_expr_list(v, &call.args));
    })
}

pub fn walk_func_lit<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    lit: &'ast FuncLit,
) -> VisitResult {
    node!(v, visit_func_lit, leave_func_lit, lit, {
        try_walk!(walk_func_type(v, &lit.ty));
        try_walk!(walk_block(v, &lit.body));
    })
}

pub fn walk_ident<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ident: &'ast Ident) -> VisitResult {
    node!(v, visit_ident, leave_ident, ident, {})
}

// ============================================================================
// Mutable walk
// ============================================================================
//
// Types (field lists, signatures) never contain statements or calls that an
// edit would target, so the mutable walk does not descend into them.

pub fn walk_file_mut<V: VisitorMut + ?Sized>(v: &mut V, file: &mut File) -> VisitResult {
    node_mut!(v, visit_file_mut, file, {
        for d in &mut file.decls {
            try_walk!(walk_decl_mut(v, d));
        }
    })
}

pub fn walk_decl_mut<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut Decl) -> VisitResult {
    node_mut!(v, visit_decl_mut, decl, {
        match decl {
            Decl::Gen(g) => try_walk!(walk_gen_decl_mut(v, g)),
            Decl::Func(f) => try_walk!(walk_func_decl_mut(v, f)),
        }
    })
}

fn walk_gen_decl_mut<V: VisitorMut + ?Sized>(v: &mut V, decl: &mut GenDecl) -> VisitResult {
    for spec in &mut decl.specs {
        if let Spec::Value(vs) = spec {
            try_walk!(walk_exprs_mut(v, &mut vs.values));
        }
    }
    VisitResult::Continue
}

pub fn walk_func_decl_mut<V: VisitorMut + ?Sized>(v: &mut V, func: &mut FuncDecl) -> VisitResult {
    node_mut!(v, visit_func_decl_mut, func, {
        if let Some(body) = &mut func.body {
            try_walk!(walk_block_mut(v, body));
        }
    })
}

pub fn walk_block_mut<V: VisitorMut + ?Sized>(v: &mut V, block: &mut Block) -> VisitResult {
    node_mut!(v, visit_block_mut, block, {
        try_walk!(walk_stmts_mut(v, &mut block.stmts));
    })
}

fn walk_stmts_mut<V: VisitorMut + ?Sized>(v: &mut V, stmts: &mut [Stmt]) -> VisitResult {
    for s in stmts {
        try_walk!(walk_stmt_mut(v, s));
    }
    VisitResult::Continue
}

fn walk_exprs_mut<V: VisitorMut + ?Sized>(v: &mut V, exprs: &mut [Expr]) -> VisitResult {
    for x in exprs {
        try_walk!(walk_expr_mut(v, x));
    }
    VisitResult::Continue
}

fn walk_expr_list_mut<V: VisitorMut + ?Sized>(v: &mut V, list: &mut ExprList) -> VisitResult {
    for item in &mut list.items {
        try_walk!(walk_expr_mut(v, &mut item.expr));
    }
    VisitResult::Continue
}

fn walk_opt_stmt_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Option<Box<Stmt>>) -> VisitResult {
    match stmt {
        Some(s) => walk_stmt_mut(v, s),
        None => VisitResult::Continue,
    }
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Stmt) -> VisitResult {
    node_mut!(v, visit_stmt_mut, stmt, {
        match &mut stmt.kind {
            StmtKind::Bad | StmtKind::Empty | StmtKind::Branch { .. } => {}
            StmtKind::Decl(g) => try_walk!(walk_gen_decl_mut(v, g)),
            StmtKind::Labeled { stmt, .. } => try_walk!(walk_stmt_mut(v, stmt)),
            StmtKind::Expr(x) | StmtKind::Go(x) | StmtKind::Defer(x) => {
                try_walk!(walk_expr_mut(v, x))
            }
            StmtKind::IncDec { x, .. } => try_walk!(walk_expr_mut(v, x)),
            StmtKind::Send { chan, value } => {
                try_walk!(walk_expr_mut(v, chan));
                try_walk!(walk_expr_mut(v, value));
            }
            StmtKind::Assign { lhs, rhs, .. } => {
                try_walk!(walk_exprs_mut(v, lhs));
                try_walk!(walk_exprs_mut(v, rhs));
            }
            StmtKind::Return(results) => try_walk!(walk_exprs_mut(v, results)),
            StmtKind::Block(b) => try_walk!(walk_block_mut(v, b)),
            StmtKind::If(s) => {
                try_walk!(walk_opt_stmt_mut(v, &mut s.init));
                try_walk!(walk_expr_mut(v, &mut s.cond));
                try_walk!(walk_block_mut(v, &mut s.body));
                try_walk!(walk_opt_stmt_mut(v, &mut s.els));
            }
            StmtKind::Switch(s) => {
                try_walk!(walk_opt_stmt_mut(v, &mut s.init));
                if let Some(tag) = &mut s.tag {
                    try_walk!(walk_expr_mut(v, tag));
                }
                for clause in &mut s.body.clauses {
                    try_walk!(walk_exprs_mut(v, &mut clause.list));
                    try_walk!(walk_stmts_mut(v, &mut clause.body));
                }
            }
            StmtKind::TypeSwitch(s) => {
                try_walk!(walk_opt_stmt_mut(v, &mut s.init));
                try_walk!(walk_stmt_mut(v, &mut s.assign));
                for clause in &mut s.body.clauses {
                    try_walk!(walk_stmts_mut(v, &mut clause.body));
                }
            }
            StmtKind::Select(s) => {
                for clause in &mut s.clauses {
                    try_walk!(walk_opt_stmt_mut(v, &mut clause.comm));
                    try_walk!(walk_stmts_mut(v, &mut clause.body));
                }
            }
            StmtKind::For(s) => {
                try_walk!(walk_opt_stmt_mut(v, &mut s.init));
                if let Some(cond) = &mut s.cond {
                    try_walk!(walk_expr_mut(v, cond));
                }
                try_walk!(walk_opt_stmt_mut(v, &mut s.post));
                try_walk!(walk_block_mut(v, &mut s.body));
            }
            StmtKind::Range(s) => {
                try_walk!(walk_expr_mut(v, &mut s.x));
                try_walk!(walk_block_mut(v, &mut s.body));
            }
        }
    })
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(v: &mut V, expr: &mut Expr) -> VisitResult {
    node_mut!(v, visit_expr_mut, expr, {
        match &mut expr.kind {
            ExprKind::Bad
            | ExprKind::Ident(_)
            | ExprKind::BasicLit(_)
            | ExprKind::Ellipsis(_)
            | ExprKind::ArrayType { .. }
            | ExprKind::StructType(_)
            | ExprKind::FuncType(_)
            | ExprKind::InterfaceType(_)
            | ExprKind::MapType { .. }
            | ExprKind::ChanType { .. } => {}
            ExprKind::CompositeLit(lit) => try_walk!(walk_expr_list_mut(v, &mut lit.elts)),
            ExprKind::FuncLit(lit) => try_walk!(walk_func_lit_mut(v, lit)),
            ExprKind::Paren(x)
            | ExprKind::Star(x)
            | ExprKind::Unary { x, .. }
            | ExprKind::Selector { x, .. }
            | ExprKind::TypeAssert { x, .. } => try_walk!(walk_expr_mut(v, x)),
            ExprKind::Index { x, indices } => {
                try_walk!(walk_expr_mut(v, x));
                try_walk!(walk_exprs_mut(v, indices));
            }
            ExprKind::Slice(s) => {
                try_walk!(walk_expr_mut(v, &mut s.x));
                for bound in [&mut s.low, &mut s.high, &mut s.max].into_iter().flatten() {
                    try_walk!(walk_expr_mut(v, bound));
                }
            }
            ExprKind::Call(call) => try_walk!(walk_call_mut(v, call)),
            ExprKind::Binary { x, y, .. } => {
                try_walk!(walk_expr_mut(v, x));
                try_walk!(walk_expr_mut(v, y));
            }
            ExprKind::KeyValue { key, value } => {
                try_walk!(walk_expr_mut(v, key));
                try_walk!(walk_expr_mut(v, value));
            }
        }
    })
}

pub fn walk_call_mut<V: VisitorMut + ?Sized>(v: &mut V, call: &mut CallExpr) -> VisitResult {
    node_mut!(v, visit_call_mut, call, {
        try_walk!(walk_expr_mut(v, &mut call.fun));
        try_walk!(walk_expr_list_mut(v, &mut call.args));
    })
}

pub fn walk_func_lit_mut<V: VisitorMut + ?Sized>(v: &mut V, lit: &mut FuncLit) -> VisitResult {
    node_mut!(v, visit_func_lit_mut, lit, {
        try_walk!(walk_block_mut(v, &mut lit.body));
    })
}
