// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor trait definitions for syntax tree traversal.

use crate::nodes::{
    Block, CallExpr, Decl, Expr, Field, File, FuncDecl, FuncLit, GenDecl, Ident, Spec, Stmt,
};

/// Result of visiting a node - controls traversal behavior.
///
/// When a visitor method returns a `VisitResult`, it controls how the walker
/// proceeds with traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called. The walk
    /// function will return immediately.
    Stop,
}

/// Generates `visit_*`/`leave_*` pairs for [`Visitor`].
///
/// ```ignore
/// visitor_methods! {
///     'ast;
///     // Generates visit_call and leave_call for &'ast CallExpr
///     call: CallExpr,
/// }
/// ```
macro_rules! visitor_methods {
    (
        $lt:lifetime;
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$lt $node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$lt $node_type) {}
            )*
        }
    };
}

/// Generates `visit_*_mut` methods for [`VisitorMut`].
macro_rules! visitor_mut_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node mutably.")]
                #[doc = ""]
                #[doc = "Called before descending into children, which see any edits made here."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name _mut>](&mut self, node: &mut $node_type) -> VisitResult {
                    VisitResult::Continue
                }
            )*
        }
    };
}

/// Immutable visitor over a syntax tree.
///
/// Every hook has a default that continues traversal, so implementors only
/// override the node types they care about. Visits happen in pre-order and
/// leaves in post-order. An [`Expr`] that is a call, function literal or
/// identifier gets `visit_expr` first and then the more specific hook.
///
/// The `'ast` lifetime lets a visitor keep references to the nodes it sees.
pub trait Visitor<'ast> {
    visitor_methods! {
        'ast;
        file: File,
        decl: Decl,
        gen_decl: GenDecl,
        spec: Spec,
        func_decl: FuncDecl,
        field: Field,
        block: Block,
        stmt: Stmt,
        expr: Expr,
        call: CallExpr,
        func_lit: FuncLit,
        ident: Ident,
    }
}

/// Mutable visitor over a syntax tree, for in-place edits.
pub trait VisitorMut {
    visitor_mut_methods! {
        file: File,
        decl: Decl,
        func_decl: FuncDecl,
        block: Block,
        stmt: Stmt,
        expr: Expr,
        call: CallExpr,
        func_lit: FuncLit,
    }
}
