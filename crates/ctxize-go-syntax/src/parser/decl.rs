// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarations and the file root.

use super::expr::is_type_start;
use super::{Parser, Result};
use crate::nodes::{
    BasicLit, Comments, Decl, DeclKeyword, File, FuncDecl, FuncType, GenDecl, ImportSpec, LitKind,
    Spec, TypeSpec, ValueSpec,
};
use crate::position::Span;
use crate::tokenizer::TokenKind as K;

impl<'a> Parser<'a> {
    pub(super) fn file(&mut self) -> Result<File> {
        let start = self.pos_at(0);
        let (mut comments, _) = self.leading_comments();
        self.expect(K::Package)?;
        let package = self.ident()?;
        comments.trailing = self.take_trailing();
        self.expect_semi()?;

        let mut decls = Vec::new();
        loop {
            let (leading, blank_before) = self.take_leading();
            if self.kind() == K::Eof {
                return Ok(File {
                    package,
                    comments,
                    decls,
                    end_comments: leading,
                    span: Span::new(start, self.pos()),
                });
            }
            let mut decl = match self.kind() {
                K::Import | K::Const | K::Type | K::Var => Decl::Gen(self.gen_decl()?),
                K::Func => Decl::Func(self.func_decl()?),
                _ => return Err(self.unexpected("declaration")),
            };
            let trailing = self.take_trailing();
            let (decl_comments, decl_blank) = match &mut decl {
                Decl::Gen(g) => (&mut g.comments, &mut g.blank_before),
                Decl::Func(f) => (&mut f.comments, &mut f.blank_before),
            };
            decl_comments.leading = leading;
            decl_comments.trailing = trailing;
            *decl_blank = blank_before;
            self.expect_semi()?;
            decls.push(decl);
        }
    }

    /// `import`, `const`, `type` or `var`, grouped or single.
    pub(super) fn gen_decl(&mut self) -> Result<GenDecl> {
        let start = self.pos();
        let keyword = match self.advance().kind {
            K::Import => DeclKeyword::Import,
            K::Const => DeclKeyword::Const,
            K::Type => DeclKeyword::Type,
            _ => DeclKeyword::Var,
        };
        if !self.got(K::LParen) {
            let spec = self.spec(keyword, Comments::default(), false)?;
            return Ok(GenDecl {
                keyword,
                specs: vec![spec],
                grouped: false,
                span: self.span_from(start),
                comments: Comments::default(),
                blank_before: false,
                end_comments: Vec::new(),
            });
        }
        let mut specs = Vec::new();
        while self.kind() != K::RParen && self.kind() != K::Eof {
            let (comments, blank_before) = self.leading_comments();
            let mut spec = self.spec(keyword, comments, blank_before && !specs.is_empty())?;
            let trailing = self.take_trailing();
            match &mut spec {
                Spec::Import(s) => s.comments.trailing = trailing,
                Spec::Value(s) => s.comments.trailing = trailing,
                Spec::Type(s) => s.comments.trailing = trailing,
            }
            self.expect_semi()?;
            specs.push(spec);
        }
        let end_comments = self.end_comments();
        self.expect(K::RParen)?;
        Ok(GenDecl {
            keyword,
            specs,
            grouped: true,
            span: self.span_from(start),
            comments: Comments::default(),
            blank_before: false,
            end_comments,
        })
    }

    fn spec(&mut self, keyword: DeclKeyword, comments: Comments, blank_before: bool) -> Result<Spec> {
        let start = self.pos();
        match keyword {
            DeclKeyword::Import => {
                let name = match self.kind() {
                    K::Ident => Some(self.ident()?),
                    K::Period => {
                        let tok = self.advance();
                        Some(crate::nodes::Ident {
                            name: ".".to_string(),
                            pos: self.pos_at(tok.offset),
                        })
                    }
                    _ => None,
                };
                let tok = self.expect(K::String)?;
                let path = BasicLit {
                    kind: LitKind::String,
                    value: tok.text.to_string(),
                    pos: self.pos_at(tok.offset),
                };
                Ok(Spec::Import(ImportSpec {
                    name,
                    path,
                    span: self.span_from(start),
                    comments,
                    blank_before,
                }))
            }
            DeclKeyword::Const | DeclKeyword::Var => {
                let mut names = vec![self.ident()?];
                while self.got(K::Comma) {
                    names.push(self.ident()?);
                }
                let ty = if is_type_start(self.kind()) || self.kind() == K::LParen {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                let values = if self.got(K::Assign) {
                    self.expr_list()?
                } else {
                    Vec::new()
                };
                if keyword == DeclKeyword::Var && ty.is_none() && values.is_empty() {
                    return Err(self.unexpected("type"));
                }
                Ok(Spec::Value(ValueSpec {
                    names,
                    ty,
                    values,
                    span: self.span_from(start),
                    comments,
                    blank_before,
                }))
            }
            DeclKeyword::Type => {
                let name = self.ident()?;
                let type_params = if self.kind() == K::LBrack && self.type_params_follow() {
                    Some(self.parameters(K::LBrack, K::RBrack)?)
                } else {
                    None
                };
                let assign = self.got(K::Assign);
                let ty = self.parse_type()?;
                Ok(Spec::Type(TypeSpec {
                    name,
                    type_params,
                    assign,
                    ty,
                    span: self.span_from(start),
                    comments,
                    blank_before,
                }))
            }
        }
    }

    /// At `[` after a type name: does a type parameter list follow, rather
    /// than an array length?
    fn type_params_follow(&self) -> bool {
        self.peek_kind(1) == K::Ident
            && matches!(
                self.peek_kind(2),
                K::Ident
                    | K::Comma
                    | K::Interface
                    | K::Tilde
                    | K::LBrack
                    | K::Func
                    | K::Map
                    | K::Chan
                    | K::Struct
                    | K::Mul
            )
    }

    fn func_decl(&mut self) -> Result<FuncDecl> {
        let start = self.pos();
        let id = self.node_id();
        self.expect(K::Func)?;
        let recv = if self.kind() == K::LParen {
            Some(self.parameters(K::LParen, K::RParen)?)
        } else {
            None
        };
        let name = self.ident()?;
        let sig_start = self.pos();
        let type_params = if self.kind() == K::LBrack {
            Some(self.parameters(K::LBrack, K::RBrack)?)
        } else {
            None
        };
        let (params, results) = self.signature()?;
        let ty = FuncType {
            type_params,
            params,
            results,
            span: self.span_from(sig_start),
        };
        let body = if self.kind() == K::LBrace {
            Some(self.block()?)
        } else {
            None
        };
        Ok(FuncDecl {
            id,
            recv,
            name,
            ty,
            body,
            span: self.span_from(start),
            comments: Comments::default(),
            blank_before: false,
        })
    }
}
