// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration nodes and the file root.

use crate::nodes::expression::{BasicLit, Expr, FieldList, FuncType, Ident};
use crate::nodes::statement::Block;
use crate::nodes::traits::{CommentGroup, Comments, NodeId};
use crate::position::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
    Var,
}

impl DeclKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKeyword::Import => "import",
            DeclKeyword::Const => "const",
            DeclKeyword::Type => "type",
            DeclKeyword::Var => "var",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    /// Local name, `_`, or `.`.
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

impl ImportSpec {
    /// A synthesized import of `path`.
    pub fn new(path: &str) -> Self {
        ImportSpec {
            name: None,
            path: BasicLit::string(path),
            span: Span::NONE,
            comments: Comments::default(),
            blank_before: false,
        }
    }

    /// The import path without quotes.
    pub fn path_value(&self) -> String {
        self.path.unquoted()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub type_params: Option<FieldList>,
    /// `type A = B`
    pub assign: bool,
    pub ty: Expr,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub fn comments(&self) -> &Comments {
        match self {
            Spec::Import(s) => &s.comments,
            Spec::Value(s) => &s.comments,
            Spec::Type(s) => &s.comments,
        }
    }

    pub fn blank_before(&self) -> bool {
        match self {
            Spec::Import(s) => s.blank_before,
            Spec::Value(s) => s.blank_before,
            Spec::Type(s) => s.blank_before,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Spec::Import(s) => s.span,
            Spec::Value(s) => s.span,
            Spec::Type(s) => s.span,
        }
    }
}

/// `import`, `const`, `type` or `var`, grouped or not.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub keyword: DeclKeyword,
    pub specs: Vec<Spec>,
    /// The specs are wrapped in parentheses.
    pub grouped: bool,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
    pub end_comments: Vec<CommentGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub id: NodeId,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    /// `None` for declarations without a body.
    pub body: Option<Block>,
    pub span: Span,
    pub comments: Comments,
    pub blank_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

impl Decl {
    pub fn span(&self) -> Span {
        match self {
            Decl::Gen(d) => d.span,
            Decl::Func(d) => d.span,
        }
    }

    pub fn comments(&self) -> &Comments {
        match self {
            Decl::Gen(d) => &d.comments,
            Decl::Func(d) => &d.comments,
        }
    }

    pub fn blank_before(&self) -> bool {
        match self {
            Decl::Gen(d) => d.blank_before,
            Decl::Func(d) => d.blank_before,
        }
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub package: Ident,
    /// Comments above the package clause, and any on its line.
    pub comments: Comments,
    pub decls: Vec<Decl>,
    pub end_comments: Vec<CommentGroup>,
    pub span: Span,
}

impl File {
    /// All import specs, in source order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .filter_map(|d| match d {
                Decl::Gen(g) if g.keyword == DeclKeyword::Import => Some(g),
                _ => None,
            })
            .flat_map(|g| g.specs.iter())
            .filter_map(|s| match s {
                Spec::Import(i) => Some(i),
                _ => None,
            })
    }

    /// The function declaration whose name is at `name`'s position.
    pub fn func_decl_named_at(&self, pos: crate::position::Pos) -> Option<&FuncDecl> {
        self.decls.iter().find_map(|d| match d {
            Decl::Func(f) if f.name.pos == pos => Some(f),
            _ => None,
        })
    }

    pub fn func_decl_mut(&mut self, id: NodeId) -> Option<&mut FuncDecl> {
        self.decls.iter_mut().find_map(|d| match d {
            Decl::Func(f) if f.id == id => Some(f),
            _ => None,
        })
    }
}
