// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statements, blocks and function bodies.

use super::decl::gen_decl;
use super::expr::{expr, expr0, plain_list, strip_parens};
use super::{end_comments, leading_comments, single_line_size, trailing_comment, CodegenState};
use crate::nodes::{Block, CaseBody, Expr, SelectStmt, Stmt, StmtKind};

/// What separates a function header from a one-line body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodySep {
    Blank,
    /// Aligns the bodies of consecutive one-line function declarations.
    Vtab,
}

/// Longest function (header plus body) printed on a single line.
const MAX_ONE_LINE: usize = 100;

/// Print a function body, on one line if it was on one line in the source
/// and is short enough.
pub(crate) fn func_body(header: usize, sep: BodySep, body: &Block, state: &mut CodegenState) {
    if let Some(size) = one_line_body_size(body) {
        if header + size <= MAX_ONE_LINE {
            match sep {
                BodySep::Blank => state.add_blank(),
                BodySep::Vtab => state.add_vtab(),
            }
            state.add_token("{");
            let stmts: Vec<&Stmt> = body
                .stmts
                .iter()
                .filter(|s| !matches!(s.kind, StmtKind::Empty))
                .collect();
            if !stmts.is_empty() {
                state.add_blank();
                for (i, s) in stmts.iter().enumerate() {
                    if i > 0 {
                        state.add_token(";");
                        state.add_blank();
                    }
                    stmt(s, state);
                }
                state.add_blank();
            }
            state.add_token("}");
            return;
        }
    }
    state.add_blank();
    block(body, 1, state);
}

fn one_line_body_size(body: &Block) -> Option<usize> {
    if body.multiline
        || body.stmts.len() > 5
        || body.open_comment.is_some()
        || !body.end_comments.is_empty()
        || body.stmts.iter().any(|s| !s.comments.is_empty())
    {
        return None;
    }
    let mut size = 0;
    for (i, s) in body.stmts.iter().enumerate() {
        if size > MAX_ONE_LINE {
            break;
        }
        if i > 0 {
            size += 2;
        }
        size += single_line_size(|state| stmt(s, state))?;
    }
    Some(size)
}

pub(crate) fn block(b: &Block, nindent: usize, state: &mut CodegenState) {
    state.add_token("{");
    trailing_comment(b.open_comment.as_ref(), false, state);
    stmt_list(&b.stmts, nindent, state);
    if !b.end_comments.is_empty() {
        if nindent > 0 {
            state.add_indent();
        }
        end_comments(&b.end_comments, state);
        if nindent > 0 {
            state.dec_indent();
        }
    }
    if !state.at_line_start() {
        state.formfeed();
    }
    state.add_token("}");
}

fn label_depth(mut s: &Stmt) -> usize {
    let mut n = 0;
    while let StmtKind::Labeled { stmt, .. } = &s.kind {
        n += 1;
        s = stmt;
    }
    n
}

/// One statement per line. A statement that spans several lines ends the
/// alignment section, so trailing comments above and below it do not line
/// up with each other.
fn stmt_list(list: &[Stmt], nindent: usize, state: &mut CodegenState) {
    for _ in 0..nindent {
        state.add_indent();
    }
    let mut prev_multi = true;
    for s in list.iter().filter(|s| !matches!(s.kind, StmtKind::Empty)) {
        if prev_multi || nindent == 0 {
            state.formfeed();
        } else {
            state.newline();
        }
        if s.blank_before {
            state.newline();
        }
        leading_comments(&s.comments.leading, state);
        let start = state.line_count();
        stmt(s, state);
        trailing_comment(s.comments.trailing.as_ref(), false, state);
        prev_multi = state.line_count() - start > label_depth(s);
    }
    for _ in 0..nindent {
        state.dec_indent();
    }
}

pub(crate) fn stmt(s: &Stmt, state: &mut CodegenState) {
    match &s.kind {
        StmtKind::Bad => state.add_token("BadStmt"),
        StmtKind::Decl(decl) => gen_decl(decl, state),
        StmtKind::Empty => {}
        StmtKind::Labeled { label, stmt: inner } => {
            state.dec_indent();
            state.add_token(&label.name);
            state.add_token(":");
            state.add_indent();
            if !matches!(inner.kind, StmtKind::Empty) {
                state.formfeed();
                stmt(inner, state);
            }
        }
        StmtKind::Expr(x) => expr0(x, 1, state),
        StmtKind::Send { chan, value } => {
            expr0(chan, 1, state);
            state.add_blank();
            state.add_token("<-");
            state.add_blank();
            expr0(value, 1, state);
        }
        StmtKind::IncDec { x, inc } => {
            expr0(x, 2, state);
            state.add_token(if *inc { "++" } else { "--" });
        }
        StmtKind::Assign { lhs, op, rhs } => {
            let depth = if lhs.len() > 1 && rhs.len() > 1 { 2 } else { 1 };
            plain_list(lhs, depth, state);
            state.add_blank();
            state.add_token(op.as_str());
            state.add_blank();
            plain_list(rhs, depth, state);
        }
        StmtKind::Go(call) => {
            state.add_token("go");
            state.add_blank();
            expr(call, state);
        }
        StmtKind::Defer(call) => {
            state.add_token("defer");
            state.add_blank();
            expr(call, state);
        }
        StmtKind::Return(results) => {
            state.add_token("return");
            if !results.is_empty() {
                state.add_blank();
                plain_list(results, 1, state);
            }
        }
        StmtKind::Branch { kind, label } => {
            state.add_token(kind.as_str());
            if let Some(label) = label {
                state.add_blank();
                state.add_token(&label.name);
            }
        }
        StmtKind::Block(b) => block(b, 1, state),
        StmtKind::If(s) => {
            state.add_token("if");
            control_clause(false, s.init.as_deref(), Some(&s.cond), None, state);
            block(&s.body, 1, state);
            if let Some(els) = &s.els {
                state.add_blank();
                state.add_token("else");
                state.add_blank();
                stmt(els, state);
            }
        }
        StmtKind::Switch(s) => {
            state.add_token("switch");
            control_clause(false, s.init.as_deref(), s.tag.as_ref(), None, state);
            case_body(&s.body, state);
        }
        StmtKind::TypeSwitch(s) => {
            state.add_token("switch");
            if let Some(init) = &s.init {
                state.add_blank();
                stmt(init, state);
                state.add_token(";");
            }
            state.add_blank();
            stmt(&s.assign, state);
            state.add_blank();
            case_body(&s.body, state);
        }
        StmtKind::Select(s) => {
            state.add_token("select");
            state.add_blank();
            select_body(s, state);
        }
        StmtKind::For(s) => {
            state.add_token("for");
            control_clause(
                true,
                s.init.as_deref(),
                s.cond.as_ref(),
                s.post.as_deref(),
                state,
            );
            block(&s.body, 1, state);
        }
        StmtKind::Range(s) => {
            state.add_token("for");
            state.add_blank();
            if let Some(key) = &s.key {
                expr(key, state);
                if let Some(value) = &s.value {
                    state.add_token(",");
                    state.add_blank();
                    expr(value, state);
                }
                if let Some(tok) = s.tok {
                    state.add_blank();
                    state.add_token(tok.as_str());
                    state.add_blank();
                }
            }
            state.add_token("range");
            state.add_blank();
            expr(strip_parens(&s.x), state);
            state.add_blank();
            block(&s.body, 1, state);
        }
    }
}

/// The header of `if`, `switch` and `for`, including the blank before the
/// opening brace.
fn control_clause(
    is_for: bool,
    init: Option<&Stmt>,
    cond: Option<&Expr>,
    post: Option<&Stmt>,
    state: &mut CodegenState,
) {
    state.add_blank();
    let mut needs_blank = false;
    if init.is_none() && post.is_none() {
        if let Some(x) = cond {
            expr(strip_parens(x), state);
            needs_blank = true;
        }
    } else {
        if let Some(init) = init {
            stmt(init, state);
        }
        state.add_token(";");
        state.add_blank();
        if let Some(x) = cond {
            expr(strip_parens(x), state);
            needs_blank = true;
        }
        if is_for {
            state.add_token(";");
            state.add_blank();
            needs_blank = false;
            if let Some(post) = post {
                stmt(post, state);
                needs_blank = true;
            }
        }
    }
    if needs_blank {
        state.add_blank();
    }
}

fn case_body(body: &CaseBody, state: &mut CodegenState) {
    state.add_token("{");
    for clause in &body.clauses {
        state.formfeed();
        if clause.blank_before {
            state.newline();
        }
        leading_comments(&clause.comments.leading, state);
        if clause.is_default {
            state.add_token("default");
        } else {
            state.add_token("case");
            state.add_blank();
            plain_list(&clause.list, 1, state);
        }
        state.add_token(":");
        trailing_comment(clause.comments.trailing.as_ref(), false, state);
        stmt_list(&clause.body, 1, state);
    }
    end_comments(&body.end_comments, state);
    if !state.at_line_start() {
        state.formfeed();
    }
    state.add_token("}");
}

fn select_body(s: &SelectStmt, state: &mut CodegenState) {
    if s.clauses.is_empty() && s.end_comments.is_empty() {
        state.add_token("{");
        state.add_token("}");
        return;
    }
    state.add_token("{");
    for clause in &s.clauses {
        state.formfeed();
        if clause.blank_before {
            state.newline();
        }
        leading_comments(&clause.comments.leading, state);
        match &clause.comm {
            Some(comm) => {
                state.add_token("case");
                state.add_blank();
                stmt(comm, state);
            }
            None => state.add_token("default"),
        }
        state.add_token(":");
        trailing_comment(clause.comments.trailing.as_ref(), false, state);
        stmt_list(&clause.body, 1, state);
    }
    end_comments(&s.end_comments, state);
    if !state.at_line_start() {
        state.formfeed();
    }
    state.add_token("}");
}
