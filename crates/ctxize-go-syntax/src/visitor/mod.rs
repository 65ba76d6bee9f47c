// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor infrastructure for syntax tree traversal.
//!
//! Trait method signatures are macro-generated; the walk functions in
//! [`dispatch`] spell out the children of every node.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order
//!
//! # Visitor Pattern
//!
//! ```ignore
//! use ctxize_go_syntax::visitor::{walk_file, Visitor, VisitResult};
//!
//! struct CallCounter {
//!     count: usize,
//! }
//!
//! impl<'ast> Visitor<'ast> for CallCounter {
//!     fn visit_call(&mut self, _node: &'ast CallExpr) -> VisitResult {
//!         self.count += 1;
//!         VisitResult::Continue
//!     }
//! }
//! ```
//!
//! [`VisitorMut`] walks the statements and expressions of a tree mutably,
//! for edits addressed by node identity (see [`edit_call`]).

pub mod dispatch;
pub mod path;
pub mod traits;

pub use dispatch::{
    walk_block, walk_call, walk_decl, walk_expr, walk_file, walk_file_mut, walk_func_decl,
    walk_func_lit, walk_stmt,
};
pub use path::{
    callee_name_pos, edit_call, enclosing_func_decl, innermost_call, path_enclosing, PathNode,
};
pub use traits::{VisitResult, Visitor, VisitorMut};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{CallExpr, Ident};
    use crate::parse_file;

    #[derive(Default)]
    struct Recorder {
        calls: usize,
        idents: Vec<String>,
        stop_at: Option<&'static str>,
    }

    impl<'ast> Visitor<'ast> for Recorder {
        fn visit_call(&mut self, _node: &'ast CallExpr) -> VisitResult {
            self.calls += 1;
            VisitResult::Continue
        }

        fn visit_ident(&mut self, node: &'ast Ident) -> VisitResult {
            self.idents.push(node.name.clone());
            if self.stop_at == Some(node.name.as_str()) {
                VisitResult::Stop
            } else {
                VisitResult::Continue
            }
        }
    }

    const SRC: &str = "package p\n\nfunc F(a int) {\n\tif b := g(a); b {\n\t\th(b)\n\t}\n}\n";

    #[test]
    fn visits_in_source_order() {
        let file = parse_file(SRC, 1).expect("parse error");
        let mut rec = Recorder::default();
        assert_eq!(walk_file(&mut rec, &file), VisitResult::Continue);
        assert_eq!(rec.calls, 2);
        assert_eq!(rec.idents, ["F", "a", "int", "b", "g", "a", "b", "h", "b"]);
    }

    #[test]
    fn stop_unwinds_walk() {
        let file = parse_file(SRC, 1).expect("parse error");
        let mut rec = Recorder {
            stop_at: Some("g"),
            ..Recorder::default()
        };
        assert_eq!(walk_file(&mut rec, &file), VisitResult::Stop);
        assert_eq!(rec.idents.last().map(String::as_str), Some("g"));
        assert_eq!(rec.calls, 1);
    }
}
