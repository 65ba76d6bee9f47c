// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Position lookups: the chain of nodes enclosing a position, and in-place
//! edits addressed by [`NodeId`].

use super::dispatch::{walk_file, walk_file_mut};
use super::traits::{VisitResult, Visitor, VisitorMut};
use crate::nodes::{
    Block, CallExpr, Expr, ExprKind, File, FuncDecl, FuncLit, GenDecl, NodeId, Stmt,
};
use crate::position::Pos;

/// A node on the path from a file's root down to a position.
#[derive(Debug, Clone, Copy)]
pub enum PathNode<'ast> {
    FuncDecl(&'ast FuncDecl),
    FuncLit(&'ast FuncLit),
    Block(&'ast Block),
    Stmt(&'ast Stmt),
    Expr(&'ast Expr),
}

struct PathCollector<'ast> {
    pos: Pos,
    path: Vec<PathNode<'ast>>,
}

impl<'ast> PathCollector<'ast> {
    fn enter(&mut self, contains: bool, node: PathNode<'ast>) -> VisitResult {
        if contains {
            self.path.push(node);
            VisitResult::Continue
        } else {
            VisitResult::SkipChildren
        }
    }
}

impl<'ast> Visitor<'ast> for PathCollector<'ast> {
    fn visit_gen_decl(&mut self, node: &'ast GenDecl) -> VisitResult {
        if node.span.contains(self.pos) {
            VisitResult::Continue
        } else {
            VisitResult::SkipChildren
        }
    }

    fn visit_func_decl(&mut self, node: &'ast FuncDecl) -> VisitResult {
        self.enter(node.span.contains(self.pos), PathNode::FuncDecl(node))
    }

    fn visit_block(&mut self, node: &'ast Block) -> VisitResult {
        self.enter(node.span().contains(self.pos), PathNode::Block(node))
    }

    fn visit_stmt(&mut self, node: &'ast Stmt) -> VisitResult {
        self.enter(node.span.contains(self.pos), PathNode::Stmt(node))
    }

    fn visit_expr(&mut self, node: &'ast Expr) -> VisitResult {
        self.enter(node.span.contains(self.pos), PathNode::Expr(node))
    }

    fn visit_func_lit(&mut self, node: &'ast FuncLit) -> VisitResult {
        // Only reached through an enclosing expression that contains `pos`.
        self.path.push(PathNode::FuncLit(node));
        VisitResult::Continue
    }
}

/// The nodes enclosing `pos`, outermost first.
pub fn path_enclosing(file: &File, pos: Pos) -> Vec<PathNode<'_>> {
    let mut collector = PathCollector {
        pos,
        path: Vec::new(),
    };
    walk_file(&mut collector, file);
    collector.path
}

/// Position of the name a call invokes: the identifier in `f(...)`, the
/// selected name in `x.f(...)`, looking through parentheses and explicit
/// instantiation.
pub fn callee_name_pos(fun: &Expr) -> Option<Pos> {
    match &fun.unparen().kind {
        ExprKind::Ident(id) => Some(id.pos),
        ExprKind::Selector { sel, .. } => Some(sel.pos),
        ExprKind::Index { x, .. } => callee_name_pos(x),
        _ => None,
    }
}

/// The innermost call on `path`.
pub fn innermost_call<'ast>(path: &[PathNode<'ast>]) -> Option<&'ast CallExpr> {
    path.iter().rev().find_map(|node| match *node {
        PathNode::Expr(expr) => match &expr.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        },
        _ => None,
    })
}

/// The innermost function declaration on `path`.
pub fn enclosing_func_decl<'ast>(path: &[PathNode<'ast>]) -> Option<&'ast FuncDecl> {
    path.iter().rev().find_map(|node| match *node {
        PathNode::FuncDecl(f) => Some(f),
        _ => None,
    })
}

struct CallEditor<F> {
    id: NodeId,
    edit: Option<F>,
}

impl<F: FnOnce(&mut CallExpr)> VisitorMut for CallEditor<F> {
    fn visit_call_mut(&mut self, node: &mut CallExpr) -> VisitResult {
        if node.id != self.id {
            return VisitResult::Continue;
        }
        if let Some(edit) = self.edit.take() {
            edit(node);
        }
        VisitResult::Stop
    }
}

/// Apply `edit` to the call with the given id. Returns false if there is no
/// such call in `file`.
pub fn edit_call(file: &mut File, id: NodeId, edit: impl FnOnce(&mut CallExpr)) -> bool {
    let mut editor = CallEditor {
        id,
        edit: Some(edit),
    };
    walk_file_mut(&mut editor, file);
    editor.edit.is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_file, print_file};

    const SRC: &str = "package p\n\nfunc F() {\n\tg(func() {\n\t\th(1)\n\t})\n}\n";

    fn pos_of(needle: &str) -> Pos {
        Pos(1 + SRC.find(needle).expect("needle") as u32)
    }

    #[test]
    fn path_reaches_nested_call() {
        let file = parse_file(SRC, 1).expect("parse error");
        let pos = pos_of("h(1)");
        let path = path_enclosing(&file, pos);
        assert!(matches!(path.first(), Some(PathNode::FuncDecl(f)) if f.name.name == "F"));
        assert!(path.iter().any(|n| matches!(n, PathNode::FuncLit(_))));
        let call = innermost_call(&path).expect("call");
        assert_eq!(callee_name_pos(&call.fun), Some(pos));
        assert_eq!(enclosing_func_decl(&path).map(|f| f.name.name.as_str()), Some("F"));
    }

    #[test]
    fn outer_call_when_name_is_argument() {
        let file = parse_file(SRC, 1).expect("parse error");
        let path = path_enclosing(&file, pos_of("g("));
        let call = innermost_call(&path).expect("call");
        assert_eq!(callee_name_pos(&call.fun), Some(pos_of("g(")));
    }

    #[test]
    fn edit_call_by_id() {
        let mut file = parse_file(SRC, 1).expect("parse error");
        let id = {
            let path = path_enclosing(&file, pos_of("h(1)"));
            innermost_call(&path).expect("call").id
        };
        let found = edit_call(&mut file, id, |call| call.args.push_front(Expr::ident("ctx")));
        assert!(found);
        assert!(print_file(&file).contains("h(ctx, 1)"));
        assert!(!edit_call(&mut file, NodeId::new(999), |_| {}));
    }
}
