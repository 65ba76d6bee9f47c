// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statements and blocks.

use super::{Parser, Result};
use crate::nodes::{
    AssignOp, Block, BranchKind, CaseBody, CaseClause, CommClause, Expr, ExprKind, ForStmt,
    IfStmt, RangeStmt, SelectStmt, Stmt, StmtKind, SwitchStmt, TypeSwitchStmt,
};
use crate::position::Span;
use crate::tokenizer::TokenKind as K;

/// What a simple statement may turn into besides the plain forms.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SimpleMode {
    Basic,
    LabelOk,
    RangeOk,
}

impl<'a> Parser<'a> {
    pub(super) fn block(&mut self) -> Result<Block> {
        let lbrace = self.expect(K::LBrace)?;
        let open_comment = self.take_trailing();
        let stmts = self.stmt_list()?;
        let end_comments = self.end_comments();
        let rbrace = self.expect(K::RBrace)?;
        Ok(Block {
            lbrace: self.pos_at(lbrace.offset),
            open_comment,
            stmts,
            rbrace: self.pos_at(rbrace.offset),
            end_comments,
            multiline: rbrace.line > lbrace.line,
        })
    }

    /// Statements up to `}`, `case` or `default`.
    fn stmt_list(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        loop {
            while self.kind() == K::Semicolon && !self.tok().is_auto_semicolon() {
                self.advance();
            }
            if matches!(self.kind(), K::RBrace | K::Case | K::Default | K::Eof) {
                break;
            }
            let (comments, blank_before) = self.leading_comments();
            let mut stmt = self.stmt()?;
            stmt.comments.leading = comments.leading;
            stmt.blank_before = blank_before && !stmts.is_empty();
            stmt.comments.trailing = self.take_trailing();
            self.expect_semi()?;
            stmts.push(stmt);
        }
        Ok(stmts)
    }

    pub(super) fn stmt(&mut self) -> Result<Stmt> {
        let start = self.pos();
        match self.kind() {
            K::Const | K::Type | K::Var => {
                let decl = self.gen_decl()?;
                Ok(Stmt::new(StmtKind::Decl(decl), self.span_from(start)))
            }
            K::Go | K::Defer => {
                let go = self.advance().kind == K::Go;
                let call = self.parse_expr()?;
                if !matches!(call.unparen().kind, ExprKind::Call(_)) {
                    return Err(self.error_here(format!(
                        "expression in {} must be function call",
                        if go { "go" } else { "defer" }
                    )));
                }
                let kind = if go {
                    StmtKind::Go(call)
                } else {
                    StmtKind::Defer(call)
                };
                Ok(Stmt::new(kind, self.span_from(start)))
            }
            K::Return => {
                self.advance();
                let results = if matches!(self.kind(), K::Semicolon | K::RBrace) {
                    Vec::new()
                } else {
                    self.expr_list()?
                };
                Ok(Stmt::new(StmtKind::Return(results), self.span_from(start)))
            }
            K::Break | K::Continue | K::Goto | K::Fallthrough => {
                let kind = match self.advance().kind {
                    K::Break => BranchKind::Break,
                    K::Continue => BranchKind::Continue,
                    K::Goto => BranchKind::Goto,
                    _ => BranchKind::Fallthrough,
                };
                let label = if kind != BranchKind::Fallthrough && self.kind() == K::Ident {
                    Some(self.ident()?)
                } else {
                    None
                };
                Ok(Stmt::new(
                    StmtKind::Branch { kind, label },
                    self.span_from(start),
                ))
            }
            K::LBrace => {
                let block = self.block()?;
                Ok(Stmt::new(StmtKind::Block(block), self.span_from(start)))
            }
            K::If => self.if_stmt(),
            K::Switch => self.switch_stmt(),
            K::Select => self.select_stmt(),
            K::For => self.for_stmt(),
            K::Semicolon | K::RBrace => Ok(Stmt::new(StmtKind::Empty, Span::new(start, start))),
            _ => self.simple_stmt(SimpleMode::LabelOk),
        }
    }

    fn simple_stmt(&mut self, mode: SimpleMode) -> Result<Stmt> {
        let start = self.pos();
        let lhs = self.expr_list()?;

        if let Some(op) = assign_op(self.kind()) {
            self.advance();
            if mode == SimpleMode::RangeOk
                && self.kind() == K::Range
                && matches!(op, AssignOp::Assign | AssignOp::Define)
            {
                self.advance();
                let x = self.parse_expr()?;
                let mut lhs = lhs.into_iter();
                let key = lhs.next();
                let value = lhs.next();
                return Ok(Stmt::new(
                    StmtKind::Range(RangeStmt {
                        key,
                        value,
                        tok: Some(op),
                        x,
                        body: Block::default(),
                    }),
                    self.span_from(start),
                ));
            }
            let rhs = self.expr_list()?;
            return Ok(Stmt::new(
                StmtKind::Assign { lhs, op, rhs },
                self.span_from(start),
            ));
        }

        if lhs.len() > 1 {
            return Err(self.unexpected("':=', '=' or ','"));
        }
        let Some(x) = lhs.into_iter().next() else {
            return Err(self.unexpected("expression"));
        };

        match self.kind() {
            K::Colon if mode == SimpleMode::LabelOk => {
                let ExprKind::Ident(label) = x.kind else {
                    return Err(self.unexpected("';' or newline"));
                };
                self.advance();
                let inner = if self.kind() == K::RBrace {
                    let pos = self.pos();
                    Stmt::new(StmtKind::Empty, Span::new(pos, pos))
                } else {
                    self.stmt()?
                };
                Ok(Stmt::new(
                    StmtKind::Labeled {
                        label,
                        stmt: Box::new(inner),
                    },
                    self.span_from(start),
                ))
            }
            K::Arrow => {
                self.advance();
                let value = self.parse_expr()?;
                Ok(Stmt::new(
                    StmtKind::Send { chan: x, value },
                    self.span_from(start),
                ))
            }
            K::Inc | K::Dec => {
                let inc = self.advance().kind == K::Inc;
                Ok(Stmt::new(StmtKind::IncDec { x, inc }, self.span_from(start)))
            }
            _ => Ok(Stmt::new(StmtKind::Expr(x), self.span_from(start))),
        }
    }

    /// Parse a control clause header with composite literals disabled.
    fn with_control_clause<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let prev = self.expr_lev;
        self.expr_lev = -1;
        let result = f(self);
        self.expr_lev = prev;
        result
    }

    fn if_stmt(&mut self) -> Result<Stmt> {
        let start = self.pos();
        self.expect(K::If)?;
        let (init, cond) = self.with_control_clause(|p| {
            if p.kind() == K::LBrace {
                return Err(p.error_here("missing condition in if statement"));
            }
            let mut init = None;
            if p.kind() != K::Semicolon {
                init = Some(p.simple_stmt(SimpleMode::Basic)?);
            }
            let cond = if p.got(K::Semicolon) {
                if p.kind() == K::LBrace {
                    return Err(p.error_here("missing condition in if statement"));
                }
                let s = p.simple_stmt(SimpleMode::Basic)?;
                Some(s)
            } else {
                init.take()
            };
            let cond = match cond.map(|s| s.kind) {
                Some(StmtKind::Expr(x)) => x,
                _ => return Err(p.error_here("cond must be a boolean expression")),
            };
            Ok((init, cond))
        })?;
        let body = self.block()?;
        let els = if self.got(K::Else) {
            match self.kind() {
                K::If => Some(Box::new(self.if_stmt()?)),
                K::LBrace => {
                    let bstart = self.pos();
                    let block = self.block()?;
                    Some(Box::new(Stmt::new(
                        StmtKind::Block(block),
                        self.span_from(bstart),
                    )))
                }
                _ => return Err(self.unexpected("if statement or block")),
            }
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If(IfStmt {
                init: init.map(Box::new),
                cond,
                body,
                els,
            }),
            self.span_from(start),
        ))
    }

    fn switch_stmt(&mut self) -> Result<Stmt> {
        let start = self.pos();
        self.expect(K::Switch)?;
        let (init, tag) = self.with_control_clause(|p| {
            let mut s1 = None;
            let mut s2 = None;
            if p.kind() != K::LBrace {
                if p.kind() != K::Semicolon {
                    s2 = Some(p.simple_stmt(SimpleMode::Basic)?);
                }
                if p.got(K::Semicolon) {
                    s1 = s2.take();
                    if p.kind() != K::LBrace {
                        s2 = Some(p.simple_stmt(SimpleMode::Basic)?);
                    }
                }
            }
            Ok((s1, s2))
        })?;

        let type_switch = tag.as_ref().is_some_and(is_type_switch_guard);
        let body = self.case_body(type_switch)?;
        let init = init.map(Box::new);
        let kind = match tag {
            Some(assign) if type_switch => StmtKind::TypeSwitch(TypeSwitchStmt {
                init,
                assign: Box::new(assign),
                body,
            }),
            Some(Stmt {
                kind: StmtKind::Expr(x),
                ..
            }) => StmtKind::Switch(SwitchStmt {
                init,
                tag: Some(x),
                body,
            }),
            None => StmtKind::Switch(SwitchStmt {
                init,
                tag: None,
                body,
            }),
            Some(_) => return Err(self.error_here("switch expression must be an expression")),
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn case_body(&mut self, type_switch: bool) -> Result<CaseBody> {
        let lbrace = self.expect(K::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), K::Case | K::Default) {
            let (comments, blank_before) = self.leading_comments();
            let start = self.pos();
            let (list, is_default) = if self.got(K::Case) {
                let list = if type_switch {
                    let mut list = vec![self.parse_type_or_expr()?];
                    while self.got(K::Comma) {
                        list.push(self.parse_type_or_expr()?);
                    }
                    list
                } else {
                    self.expr_list()?
                };
                (list, false)
            } else {
                self.advance();
                (Vec::new(), true)
            };
            self.expect(K::Colon)?;
            let mut comments = comments;
            comments.trailing = self.take_trailing();
            let body = self.stmt_list()?;
            clauses.push(CaseClause {
                list,
                is_default,
                body,
                span: self.span_from(start),
                comments,
                blank_before: blank_before && !clauses.is_empty(),
            });
        }
        let end_comments = self.end_comments();
        let rbrace = self.expect(K::RBrace)?;
        Ok(CaseBody {
            lbrace: self.pos_at(lbrace.offset),
            clauses,
            rbrace: self.pos_at(rbrace.offset),
            end_comments,
        })
    }

    fn select_stmt(&mut self) -> Result<Stmt> {
        let start = self.pos();
        self.expect(K::Select)?;
        let lbrace = self.expect(K::LBrace)?;
        let mut clauses = Vec::new();
        while matches!(self.kind(), K::Case | K::Default) {
            let (mut comments, blank_before) = self.leading_comments();
            let cstart = self.pos();
            let comm = if self.got(K::Case) {
                Some(Box::new(self.simple_stmt(SimpleMode::Basic)?))
            } else {
                self.advance();
                None
            };
            self.expect(K::Colon)?;
            comments.trailing = self.take_trailing();
            let body = self.stmt_list()?;
            clauses.push(CommClause {
                comm,
                body,
                span: self.span_from(cstart),
                comments,
                blank_before: blank_before && !clauses.is_empty(),
            });
        }
        let end_comments = self.end_comments();
        let rbrace = self.expect(K::RBrace)?;
        Ok(Stmt::new(
            StmtKind::Select(SelectStmt {
                lbrace: self.pos_at(lbrace.offset),
                clauses,
                rbrace: self.pos_at(rbrace.offset),
                end_comments,
            }),
            self.span_from(start),
        ))
    }

    fn for_stmt(&mut self) -> Result<Stmt> {
        let start = self.pos();
        self.expect(K::For)?;
        let header = self.with_control_clause(|p| {
            let mut s1 = None;
            let mut s2 = None;
            let mut s3 = None;
            if p.kind() == K::LBrace {
                return Ok((s1, s2, s3, false));
            }
            if p.kind() == K::Range {
                let rstart = p.pos();
                p.advance();
                let x = p.parse_expr()?;
                let range = Stmt::new(
                    StmtKind::Range(RangeStmt {
                        key: None,
                        value: None,
                        tok: None,
                        x,
                        body: Block::default(),
                    }),
                    p.span_from(rstart),
                );
                return Ok((None, Some(range), None, false));
            }
            if p.kind() != K::Semicolon {
                s2 = Some(p.simple_stmt(SimpleMode::RangeOk)?);
            }
            let is_range = matches!(
                s2.as_ref().map(|s| &s.kind),
                Some(StmtKind::Range(_))
            );
            if !is_range && p.kind() == K::Semicolon {
                p.advance();
                s1 = s2.take();
                if p.kind() != K::Semicolon {
                    s2 = Some(p.simple_stmt(SimpleMode::Basic)?);
                }
                p.expect(K::Semicolon)?;
                if p.kind() != K::LBrace {
                    s3 = Some(p.simple_stmt(SimpleMode::Basic)?);
                }
                return Ok((s1, s2, s3, true));
            }
            Ok((s1, s2, s3, false))
        })?;
        let body = self.block()?;

        let (init, cond, post, three_clause) = header;
        let kind = match cond {
            Some(Stmt {
                kind: StmtKind::Range(mut range),
                ..
            }) => {
                range.body = body;
                StmtKind::Range(range)
            }
            cond => {
                let cond = match cond.map(|s| s.kind) {
                    Some(StmtKind::Expr(x)) => Some(x),
                    None => None,
                    Some(_) => return Err(self.error_here("expected for loop condition")),
                };
                StmtKind::For(ForStmt {
                    init: init.map(Box::new),
                    cond,
                    post: if three_clause { post.map(Box::new) } else { None },
                    body,
                })
            }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }
}

fn assign_op(kind: K) -> Option<AssignOp> {
    Some(match kind {
        K::Assign => AssignOp::Assign,
        K::Define => AssignOp::Define,
        K::AddAssign => AssignOp::Add,
        K::SubAssign => AssignOp::Sub,
        K::MulAssign => AssignOp::Mul,
        K::QuoAssign => AssignOp::Quo,
        K::RemAssign => AssignOp::Rem,
        K::AndAssign => AssignOp::And,
        K::OrAssign => AssignOp::Or,
        K::XorAssign => AssignOp::Xor,
        K::ShlAssign => AssignOp::Shl,
        K::ShrAssign => AssignOp::Shr,
        K::AndNotAssign => AssignOp::AndNot,
        _ => return None,
    })
}

/// `x := y.(type)` or `y.(type)`.
fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let is_guard = |e: &Expr| matches!(e.kind, ExprKind::TypeAssert { ty: None, .. });
    match &stmt.kind {
        StmtKind::Expr(x) => is_guard(x),
        StmtKind::Assign {
            lhs,
            op: AssignOp::Define,
            rhs,
        } => lhs.len() == 1 && rhs.len() == 1 && is_guard(&rhs[0]),
        _ => false,
    }
}
