// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expressions, types, and parameter lists.

use super::{Parser, Result};
use crate::nodes::{
    BasicLit, BinaryOp, CallExpr, ChanDir, Comments, CompositeLit, Expr, ExprKind, ExprList, Field,
    FieldList, FuncLit, FuncType, Ident, ListItem, LitKind, SliceExpr, UnaryOp,
};
use crate::position::{Pos, Span};
use crate::tokenizer::TokenKind as K;

/// One entry of a parameter list before names are grouped with types.
struct ParamEntry {
    name: Option<Ident>,
    ty: Option<Expr>,
    start: Pos,
    line_break: bool,
    blank_before: bool,
    comments: Comments,
}

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    pub(super) fn ident(&mut self) -> Result<Ident> {
        let tok = self.expect(K::Ident)?;
        Ok(Ident {
            name: tok.text.to_string(),
            pos: self.pos_at(tok.offset),
        })
    }

    /// Parse an expression. Types are accepted wherever Go allows a type in
    /// expression position (conversions, `make`, `new`, type arguments).
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.binary_expr(1)
    }

    pub(super) fn parse_type_or_expr(&mut self) -> Result<Expr> {
        self.parse_expr()
    }

    pub(super) fn expr_list(&mut self) -> Result<Vec<Expr>> {
        let mut list = vec![self.parse_expr()?];
        while self.got(K::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn binary_expr(&mut self, prec1: u8) -> Result<Expr> {
        let mut x = self.unary_expr()?;
        while let Some(op) = binary_op(self.kind()) {
            if op.precedence() < prec1 {
                break;
            }
            self.advance();
            let line_break = self.on_new_line();
            let y = self.binary_expr(op.precedence() + 1)?;
            let span = Span::new(x.span.start, y.span.end);
            x = Expr::new(
                ExprKind::Binary {
                    x: Box::new(x),
                    op,
                    y: Box::new(y),
                    line_break,
                },
                span,
            );
        }
        Ok(x)
    }

    fn unary_expr(&mut self) -> Result<Expr> {
        let start = self.pos();
        let op = match self.kind() {
            K::Add => Some(UnaryOp::Pos),
            K::Sub => Some(UnaryOp::Neg),
            K::Not => Some(UnaryOp::Not),
            K::Xor => Some(UnaryOp::Xor),
            K::And => Some(UnaryOp::Addr),
            K::Tilde => Some(UnaryOp::Tilde),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let x = self.unary_expr()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op,
                    x: Box::new(x),
                },
                self.span_from(start),
            ));
        }
        match self.kind() {
            K::Arrow => {
                self.advance();
                if self.got(K::Chan) {
                    let value = self.parse_type()?;
                    return Ok(Expr::new(
                        ExprKind::ChanType {
                            dir: ChanDir::Recv,
                            value: Box::new(value),
                        },
                        self.span_from(start),
                    ));
                }
                let x = self.unary_expr()?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: UnaryOp::Arrow,
                        x: Box::new(x),
                    },
                    self.span_from(start),
                ))
            }
            K::Mul => {
                self.advance();
                let x = self.unary_expr()?;
                Ok(Expr::new(ExprKind::Star(Box::new(x)), self.span_from(start)))
            }
            _ => self.primary_expr(),
        }
    }

    fn primary_expr(&mut self) -> Result<Expr> {
        let mut x = self.operand()?;
        loop {
            match self.kind() {
                K::Period => {
                    self.advance();
                    let start = x.span.start;
                    match self.kind() {
                        K::Ident => {
                            let sel = self.ident()?;
                            x = Expr::new(
                                ExprKind::Selector {
                                    x: Box::new(x),
                                    sel,
                                },
                                self.span_from(start),
                            );
                        }
                        K::LParen => {
                            self.advance();
                            let ty = if self.got(K::Type) {
                                None
                            } else {
                                Some(Box::new(self.parse_type()?))
                            };
                            self.expect(K::RParen)?;
                            x = Expr::new(
                                ExprKind::TypeAssert { x: Box::new(x), ty },
                                self.span_from(start),
                            );
                        }
                        _ => return Err(self.unexpected("selector or type assertion")),
                    }
                }
                K::LBrack => x = self.index_or_slice(x)?,
                K::LParen => x = self.call(x)?,
                K::LBrace => {
                    let literal = match &x.unparen().kind {
                        ExprKind::Bad
                        | ExprKind::Ident(_)
                        | ExprKind::Selector { .. }
                        | ExprKind::Index { .. } => self.expr_lev >= 0,
                        ExprKind::ArrayType { .. }
                        | ExprKind::StructType(_)
                        | ExprKind::MapType { .. } => true,
                        _ => false,
                    };
                    if !literal {
                        break;
                    }
                    x = self.composite_lit(Some(x))?;
                }
                _ => break,
            }
        }
        Ok(x)
    }

    fn operand(&mut self) -> Result<Expr> {
        let start = self.pos();
        match self.kind() {
            K::Ident => {
                let id = self.ident()?;
                Ok(ident_expr(id))
            }
            K::Int | K::Float | K::Imag | K::Char | K::String => {
                let tok = self.advance();
                let kind = match tok.kind {
                    K::Int => LitKind::Int,
                    K::Float => LitKind::Float,
                    K::Imag => LitKind::Imag,
                    K::Char => LitKind::Char,
                    _ => LitKind::String,
                };
                Ok(Expr::new(
                    ExprKind::BasicLit(BasicLit {
                        kind,
                        value: tok.text.to_string(),
                        pos: start,
                    }),
                    self.span_from(start),
                ))
            }
            K::LParen => {
                self.advance();
                self.expr_lev += 1;
                let x = self.parse_type_or_expr()?;
                self.expr_lev -= 1;
                self.expect(K::RParen)?;
                Ok(Expr::new(ExprKind::Paren(Box::new(x)), self.span_from(start)))
            }
            K::Func => {
                let id = self.node_id();
                let ty = self.func_type()?;
                if self.kind() != K::LBrace {
                    return Ok(Expr::new(ExprKind::FuncType(ty), self.span_from(start)));
                }
                self.expr_lev += 1;
                let body = self.block()?;
                self.expr_lev -= 1;
                Ok(Expr::new(
                    ExprKind::FuncLit(FuncLit { id, ty, body }),
                    self.span_from(start),
                ))
            }
            K::LBrack | K::Struct | K::Map | K::Chan | K::Interface => self.parse_type(),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn index_or_slice(&mut self, x: Expr) -> Result<Expr> {
        let start = x.span.start;
        self.expect(K::LBrack)?;
        self.expr_lev += 1;
        let mut index: [Option<Expr>; 3] = [None, None, None];
        if self.kind() != K::Colon {
            index[0] = Some(self.parse_type_or_expr()?);
        }
        if self.kind() == K::Comma {
            let mut indices: Vec<Expr> = index[0].take().into_iter().collect();
            while self.got(K::Comma) {
                if self.kind() == K::RBrack {
                    break;
                }
                indices.push(self.parse_type()?);
            }
            self.expr_lev -= 1;
            self.expect(K::RBrack)?;
            return Ok(Expr::new(
                ExprKind::Index {
                    x: Box::new(x),
                    indices,
                },
                self.span_from(start),
            ));
        }
        let mut colons = 0;
        while self.kind() == K::Colon && colons < 2 {
            self.advance();
            colons += 1;
            if !matches!(self.kind(), K::Colon | K::RBrack) {
                index[colons] = Some(self.parse_expr()?);
            }
        }
        self.expr_lev -= 1;
        self.expect(K::RBrack)?;
        let [low, high, max] = index;
        let kind = if colons > 0 {
            ExprKind::Slice(SliceExpr {
                x: Box::new(x),
                low: low.map(Box::new),
                high: high.map(Box::new),
                max: max.map(Box::new),
                slice3: colons == 2,
            })
        } else {
            let Some(index) = low else {
                return Err(self.error_here("expected operand"));
            };
            ExprKind::Index {
                x: Box::new(x),
                indices: vec![index],
            }
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    fn call(&mut self, fun: Expr) -> Result<Expr> {
        let start = fun.span.start;
        let id = self.node_id();
        self.expect(K::LParen)?;
        self.expr_lev += 1;
        let (args, ellipsis) = self.element_list(K::RParen, true, |p| p.parse_type_or_expr())?;
        self.expr_lev -= 1;
        self.expect(K::RParen)?;
        Ok(Expr::new(
            ExprKind::Call(CallExpr {
                id,
                fun: Box::new(fun),
                args,
                ellipsis,
            }),
            self.span_from(start),
        ))
    }

    fn composite_lit(&mut self, ty: Option<Expr>) -> Result<Expr> {
        let start = ty.as_ref().map(|t| t.span.start).unwrap_or_else(|| self.pos());
        self.expect(K::LBrace)?;
        self.expr_lev += 1;
        let (elts, _) = self.element_list(K::RBrace, false, |p| {
            let key = p.element()?;
            if !p.got(K::Colon) {
                return Ok(key);
            }
            let value = p.element()?;
            let span = Span::new(key.span.start, value.span.end);
            Ok(Expr::new(
                ExprKind::KeyValue {
                    key: Box::new(key),
                    value: Box::new(value),
                },
                span,
            ))
        })?;
        self.expr_lev -= 1;
        self.expect(K::RBrace)?;
        Ok(Expr::new(
            ExprKind::CompositeLit(CompositeLit {
                ty: ty.map(Box::new),
                elts,
            }),
            self.span_from(start),
        ))
    }

    fn element(&mut self) -> Result<Expr> {
        if self.kind() == K::LBrace {
            self.composite_lit(None)
        } else {
            self.parse_expr()
        }
    }

    /// Comma-separated elements up to (not including) `close`, recording
    /// line breaks and comments per element.
    fn element_list(
        &mut self,
        close: K,
        allow_ellipsis: bool,
        mut elem: impl FnMut(&mut Self) -> Result<Expr>,
    ) -> Result<(ExprList, bool)> {
        let mut list = ExprList::default();
        let mut ellipsis = false;
        while self.kind() != close && self.kind() != K::Eof {
            let (comments, blank_before) = self.leading_comments();
            let line_break = self.on_new_line();
            let expr = elem(self)?;
            if allow_ellipsis && self.got(K::Ellipsis) {
                ellipsis = true;
            }
            let mut item = ListItem {
                expr,
                line_break,
                blank_before: blank_before && line_break,
                comments,
            };
            let more = self.got(K::Comma);
            item.comments.trailing = self.take_trailing();
            list.items.push(item);
            if !more {
                break;
            }
        }
        list.end_comments = self.end_comments();
        list.break_before_close = !list.items.is_empty() && self.on_new_line();
        Ok((list, ellipsis))
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    pub(super) fn parse_type(&mut self) -> Result<Expr> {
        let start = self.pos();
        match self.kind() {
            K::Ident => self.type_name(),
            K::LBrack => {
                self.advance();
                if self.got(K::RBrack) {
                    let elem = self.parse_type()?;
                    return Ok(Expr::new(
                        ExprKind::ArrayType {
                            len: None,
                            elem: Box::new(elem),
                        },
                        self.span_from(start),
                    ));
                }
                self.expr_lev += 1;
                let len = if self.kind() == K::Ellipsis {
                    let pos = self.pos();
                    self.advance();
                    Expr::new(ExprKind::Ellipsis(None), self.span_from(pos))
                } else {
                    self.parse_expr()?
                };
                self.expr_lev -= 1;
                self.expect(K::RBrack)?;
                let elem = self.parse_type()?;
                Ok(Expr::new(
                    ExprKind::ArrayType {
                        len: Some(Box::new(len)),
                        elem: Box::new(elem),
                    },
                    self.span_from(start),
                ))
            }
            K::Struct => self.struct_type(),
            K::Interface => self.interface_type(),
            K::Mul => {
                self.advance();
                let elem = self.parse_type()?;
                Ok(Expr::new(ExprKind::Star(Box::new(elem)), self.span_from(start)))
            }
            K::Func => {
                let ty = self.func_type()?;
                Ok(Expr::new(ExprKind::FuncType(ty), self.span_from(start)))
            }
            K::Map => {
                self.advance();
                self.expect(K::LBrack)?;
                let key = self.parse_type()?;
                self.expect(K::RBrack)?;
                let value = self.parse_type()?;
                Ok(Expr::new(
                    ExprKind::MapType {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                    self.span_from(start),
                ))
            }
            K::Chan => {
                self.advance();
                let dir = if self.got(K::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let value = self.parse_type()?;
                Ok(Expr::new(
                    ExprKind::ChanType {
                        dir,
                        value: Box::new(value),
                    },
                    self.span_from(start),
                ))
            }
            K::Arrow => {
                self.advance();
                self.expect(K::Chan)?;
                let value = self.parse_type()?;
                Ok(Expr::new(
                    ExprKind::ChanType {
                        dir: ChanDir::Recv,
                        value: Box::new(value),
                    },
                    self.span_from(start),
                ))
            }
            K::LParen => {
                self.advance();
                let ty = self.parse_type()?;
                self.expect(K::RParen)?;
                Ok(Expr::new(ExprKind::Paren(Box::new(ty)), self.span_from(start)))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    /// `T`, `pkg.T`, optionally instantiated: `T[A, B]`.
    fn type_name(&mut self) -> Result<Expr> {
        let start = self.pos();
        let id = self.ident()?;
        let mut x = ident_expr(id);
        if self.got(K::Period) {
            let sel = self.ident()?;
            x = Expr::new(
                ExprKind::Selector {
                    x: Box::new(x),
                    sel,
                },
                self.span_from(start),
            );
        }
        if self.kind() == K::LBrack {
            x = self.type_args(x)?;
        }
        Ok(x)
    }

    fn type_args(&mut self, x: Expr) -> Result<Expr> {
        let start = x.span.start;
        self.expect(K::LBrack)?;
        self.expr_lev += 1;
        let mut indices = vec![self.parse_type()?];
        while self.got(K::Comma) {
            if self.kind() == K::RBrack {
                break;
            }
            indices.push(self.parse_type()?);
        }
        self.expr_lev -= 1;
        self.expect(K::RBrack)?;
        Ok(Expr::new(
            ExprKind::Index {
                x: Box::new(x),
                indices,
            },
            self.span_from(start),
        ))
    }

    /// `func` followed by a signature.
    pub(super) fn func_type(&mut self) -> Result<FuncType> {
        let start = self.pos();
        self.expect(K::Func)?;
        let (params, results) = self.signature()?;
        Ok(FuncType {
            type_params: None,
            params,
            results,
            span: self.span_from(start),
        })
    }

    pub(super) fn signature(&mut self) -> Result<(FieldList, Option<FieldList>)> {
        let params = self.parameters(K::LParen, K::RParen)?;
        let results = match self.kind() {
            K::LParen => Some(self.parameters(K::LParen, K::RParen)?),
            k if is_type_start(k) => {
                let ty = self.parse_type()?;
                let span = ty.span;
                let mut field = Field::new(Vec::new(), ty);
                field.span = span;
                Some(FieldList {
                    list: vec![field],
                    ..FieldList::default()
                })
            }
            _ => None,
        };
        Ok((params, results))
    }

    /// A parenthesized parameter list, or a bracketed type parameter list.
    pub(super) fn parameters(&mut self, open: K, close: K) -> Result<FieldList> {
        let open_tok = self.expect(open)?;
        let mut entries = Vec::new();
        while self.kind() != close && self.kind() != K::Eof {
            let (comments, blank_before) = self.leading_comments();
            let line_break = self.on_new_line();
            let start = self.pos();
            let (name, ty) = self.param_entry(close)?;
            let mut entry = ParamEntry {
                name,
                ty,
                start,
                line_break,
                blank_before,
                comments,
            };
            let more = self.got(K::Comma);
            entry.comments.trailing = self.take_trailing();
            entries.push(entry);
            if !more {
                break;
            }
        }
        let end_comments = self.end_comments();
        let break_before_close = !entries.is_empty() && self.on_new_line();
        let close_tok = self.expect(close)?;
        let list = self.group_params(entries)?;
        Ok(FieldList {
            open: self.pos_at(open_tok.offset),
            list,
            close: self.pos_at(close_tok.offset),
            break_before_close,
            end_comments,
        })
    }

    fn param_entry(&mut self, close: K) -> Result<(Option<Ident>, Option<Expr>)> {
        let constraint = close == K::RBrack;
        match self.kind() {
            K::Ident => {
                let start = self.pos();
                let id = self.ident()?;
                match self.kind() {
                    K::Period => {
                        self.advance();
                        let sel = self.ident()?;
                        let mut x = Expr::new(
                            ExprKind::Selector {
                                x: Box::new(ident_expr(id)),
                                sel,
                            },
                            self.span_from(start),
                        );
                        if self.kind() == K::LBrack {
                            x = self.type_args(x)?;
                        }
                        Ok((None, Some(x)))
                    }
                    K::LBrack => self.array_or_type_args(id, start),
                    K::Ellipsis => Ok((Some(id), Some(self.variadic()?))),
                    K::Comma | K::RParen | K::RBrack => Ok((Some(id), None)),
                    _ if constraint => Ok((Some(id), Some(self.constraint()?))),
                    _ => Ok((Some(id), Some(self.parse_type()?))),
                }
            }
            K::Ellipsis => Ok((None, Some(self.variadic()?))),
            _ if constraint => Ok((None, Some(self.constraint()?))),
            _ => Ok((None, Some(self.parse_type()?))),
        }
    }

    /// After `name [`: either a named array or slice type (`a [N]T`) or an
    /// instantiated type (`T[A]`) with no name.
    fn array_or_type_args(
        &mut self,
        id: Ident,
        start: Pos,
    ) -> Result<(Option<Ident>, Option<Expr>)> {
        let lbrack = self.pos();
        self.expect(K::LBrack)?;
        if self.got(K::RBrack) {
            let elem = self.parse_type()?;
            let ty = Expr::new(
                ExprKind::ArrayType {
                    len: None,
                    elem: Box::new(elem),
                },
                self.span_from(lbrack),
            );
            return Ok((Some(id), Some(ty)));
        }
        if self.kind() == K::Ellipsis && self.peek_kind(1) == K::RBrack {
            let pos = self.pos();
            self.advance();
            let len = Expr::new(ExprKind::Ellipsis(None), self.span_from(pos));
            self.advance();
            let elem = self.parse_type()?;
            let ty = Expr::new(
                ExprKind::ArrayType {
                    len: Some(Box::new(len)),
                    elem: Box::new(elem),
                },
                self.span_from(lbrack),
            );
            return Ok((Some(id), Some(ty)));
        }
        self.expr_lev += 1;
        let mut args = vec![self.parse_type_or_expr()?];
        while self.got(K::Comma) {
            if self.kind() == K::RBrack {
                break;
            }
            args.push(self.parse_type()?);
        }
        self.expr_lev -= 1;
        self.expect(K::RBrack)?;
        if args.len() == 1 && is_type_start(self.kind()) {
            let elem = self.parse_type()?;
            let len = args.pop().map(Box::new);
            let ty = Expr::new(
                ExprKind::ArrayType {
                    len,
                    elem: Box::new(elem),
                },
                self.span_from(lbrack),
            );
            return Ok((Some(id), Some(ty)));
        }
        let x = ident_expr(id);
        let ty = Expr::new(
            ExprKind::Index {
                x: Box::new(x),
                indices: args,
            },
            self.span_from(start),
        );
        Ok((None, Some(ty)))
    }

    fn variadic(&mut self) -> Result<Expr> {
        let start = self.pos();
        self.expect(K::Ellipsis)?;
        let elem = self.parse_type()?;
        Ok(Expr::new(
            ExprKind::Ellipsis(Some(Box::new(elem))),
            self.span_from(start),
        ))
    }

    /// A type constraint: `~T | U | ...`.
    fn constraint(&mut self) -> Result<Expr> {
        let mut x = self.constraint_term()?;
        while self.got(K::Or) {
            let line_break = self.on_new_line();
            let y = self.constraint_term()?;
            let span = Span::new(x.span.start, y.span.end);
            x = Expr::new(
                ExprKind::Binary {
                    x: Box::new(x),
                    op: BinaryOp::Or,
                    y: Box::new(y),
                    line_break,
                },
                span,
            );
        }
        Ok(x)
    }

    fn constraint_term(&mut self) -> Result<Expr> {
        let start = self.pos();
        if self.got(K::Tilde) {
            let ty = self.parse_type()?;
            return Ok(Expr::new(
                ExprKind::Unary {
                    op: UnaryOp::Tilde,
                    x: Box::new(ty),
                },
                self.span_from(start),
            ));
        }
        self.parse_type()
    }

    fn group_params(&self, entries: Vec<ParamEntry>) -> Result<Vec<Field>> {
        let named = entries.iter().any(|e| e.name.is_some() && e.ty.is_some());
        if !named {
            return Ok(entries
                .into_iter()
                .filter_map(|e| {
                    let ty = match (e.ty, e.name) {
                        (Some(ty), _) => ty,
                        (None, Some(name)) => ident_expr(name),
                        (None, None) => return None,
                    };
                    let span = Span::new(e.start, ty.span.end);
                    Some(Field {
                        names: Vec::new(),
                        ty,
                        tag: None,
                        span,
                        comments: e.comments,
                        line_break: e.line_break,
                        blank_before: e.blank_before,
                    })
                })
                .collect());
        }

        let mut fields = Vec::new();
        let mut pending: Vec<ParamEntry> = Vec::new();
        for mut entry in entries {
            let Some(name) = entry.name.take() else {
                return Err(self.error_here("mixed named and unnamed parameters"));
            };
            match entry.ty.take() {
                None => {
                    entry.name = Some(name);
                    pending.push(entry);
                }
                Some(ty) => {
                    let first = pending.first();
                    let start = first.map(|p| p.start).unwrap_or(entry.start);
                    let line_break = first.map(|p| p.line_break).unwrap_or(entry.line_break);
                    let blank_before = first
                        .map(|p| p.blank_before)
                        .unwrap_or(entry.blank_before);
                    let mut comments = Comments::default();
                    let mut names = Vec::new();
                    for p in pending.drain(..) {
                        comments.leading.extend(p.comments.leading);
                        names.extend(p.name);
                    }
                    comments.leading.extend(entry.comments.leading);
                    comments.trailing = entry.comments.trailing;
                    names.push(name);
                    fields.push(Field {
                        names,
                        span: Span::new(start, ty.span.end),
                        ty,
                        tag: None,
                        comments,
                        line_break,
                        blank_before,
                    });
                }
            }
        }
        if !pending.is_empty() {
            return Err(self.error_here("mixed named and unnamed parameters"));
        }
        Ok(fields)
    }

    fn struct_type(&mut self) -> Result<Expr> {
        let start = self.pos();
        self.expect(K::Struct)?;
        let open = self.expect(K::LBrace)?;
        let mut list = Vec::new();
        while self.kind() != K::RBrace && self.kind() != K::Eof {
            let (mut comments, blank_before) = self.leading_comments();
            let line_break = self.on_new_line();
            let field_start = self.pos();
            let (names, ty) = self.field_decl()?;
            let tag = if self.kind() == K::String {
                let tok = self.advance();
                Some(BasicLit {
                    kind: LitKind::String,
                    value: tok.text.to_string(),
                    pos: self.pos_at(tok.offset),
                })
            } else {
                None
            };
            let span = self.span_from(field_start);
            comments.trailing = self.take_trailing();
            self.expect_semi()?;
            list.push(Field {
                names,
                ty,
                tag,
                span,
                comments,
                line_break,
                blank_before,
            });
        }
        let end_comments = self.end_comments();
        let break_before_close = self.on_new_line();
        let close = self.expect(K::RBrace)?;
        Ok(Expr::new(
            ExprKind::StructType(FieldList {
                open: self.pos_at(open.offset),
                list,
                close: self.pos_at(close.offset),
                break_before_close,
                end_comments,
            }),
            self.span_from(start),
        ))
    }

    fn field_decl(&mut self) -> Result<(Vec<Ident>, Expr)> {
        match self.kind() {
            K::Mul => {
                let start = self.pos();
                self.advance();
                let ty = self.type_name()?;
                Ok((
                    Vec::new(),
                    Expr::new(ExprKind::Star(Box::new(ty)), self.span_from(start)),
                ))
            }
            K::Ident => {
                let start = self.pos();
                let id = self.ident()?;
                match self.kind() {
                    K::Period => {
                        self.advance();
                        let sel = self.ident()?;
                        let mut x = Expr::new(
                            ExprKind::Selector {
                                x: Box::new(ident_expr(id)),
                                sel,
                            },
                            self.span_from(start),
                        );
                        if self.kind() == K::LBrack {
                            x = self.type_args(x)?;
                        }
                        Ok((Vec::new(), x))
                    }
                    K::LBrack => match self.array_or_type_args(id, start)? {
                        (name, Some(ty)) => Ok((name.into_iter().collect(), ty)),
                        (_, None) => Err(self.unexpected("type")),
                    },
                    K::Semicolon | K::RBrace | K::String => Ok((Vec::new(), ident_expr(id))),
                    K::Comma => {
                        let mut names = vec![id];
                        while self.got(K::Comma) {
                            names.push(self.ident()?);
                        }
                        let ty = self.parse_type()?;
                        Ok((names, ty))
                    }
                    _ => {
                        let ty = self.parse_type()?;
                        Ok((vec![id], ty))
                    }
                }
            }
            _ => Err(self.unexpected("field name or embedded type")),
        }
    }

    fn interface_type(&mut self) -> Result<Expr> {
        let start = self.pos();
        self.expect(K::Interface)?;
        let open = self.expect(K::LBrace)?;
        let mut list = Vec::new();
        while self.kind() != K::RBrace && self.kind() != K::Eof {
            let (mut comments, blank_before) = self.leading_comments();
            let line_break = self.on_new_line();
            let field_start = self.pos();
            let (names, ty) = if self.kind() == K::Ident && self.peek_kind(1) == K::LParen {
                let name = self.ident()?;
                let sig_start = self.pos();
                let (params, results) = self.signature()?;
                let span = self.span_from(sig_start);
                let ty = FuncType {
                    type_params: None,
                    params,
                    results,
                    span,
                };
                (vec![name], Expr::new(ExprKind::FuncType(ty), span))
            } else {
                (Vec::new(), self.constraint()?)
            };
            let span = self.span_from(field_start);
            comments.trailing = self.take_trailing();
            self.expect_semi()?;
            list.push(Field {
                names,
                ty,
                tag: None,
                span,
                comments,
                line_break,
                blank_before,
            });
        }
        let end_comments = self.end_comments();
        let break_before_close = self.on_new_line();
        let close = self.expect(K::RBrace)?;
        Ok(Expr::new(
            ExprKind::InterfaceType(FieldList {
                open: self.pos_at(open.offset),
                list,
                close: self.pos_at(close.offset),
                break_before_close,
                end_comments,
            }),
            self.span_from(start),
        ))
    }
}

pub(super) fn ident_expr(id: Ident) -> Expr {
    let span = id.span();
    Expr::new(ExprKind::Ident(id), span)
}

fn binary_op(kind: K) -> Option<BinaryOp> {
    Some(match kind {
        K::LOr => BinaryOp::LOr,
        K::LAnd => BinaryOp::LAnd,
        K::Eql => BinaryOp::Eql,
        K::Neq => BinaryOp::Neq,
        K::Lss => BinaryOp::Lss,
        K::Leq => BinaryOp::Leq,
        K::Gtr => BinaryOp::Gtr,
        K::Geq => BinaryOp::Geq,
        K::Add => BinaryOp::Add,
        K::Sub => BinaryOp::Sub,
        K::Or => BinaryOp::Or,
        K::Xor => BinaryOp::Xor,
        K::Mul => BinaryOp::Mul,
        K::Quo => BinaryOp::Quo,
        K::Rem => BinaryOp::Rem,
        K::Shl => BinaryOp::Shl,
        K::Shr => BinaryOp::Shr,
        K::And => BinaryOp::And,
        K::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

/// Tokens that can begin a type.
pub(super) fn is_type_start(kind: K) -> bool {
    matches!(
        kind,
        K::Ident
            | K::LBrack
            | K::Struct
            | K::Mul
            | K::Func
            | K::Interface
            | K::Map
            | K::Chan
            | K::Arrow
    )
}
