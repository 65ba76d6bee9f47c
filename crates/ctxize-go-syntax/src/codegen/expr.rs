// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expressions, types, field lists and signatures.
//!
//! Spacing around binary operators depends on nesting: at the top level
//! every operator gets blanks, inside call arguments and deeper only the
//! lowest-precedence ones do (`a + b*c`, `f(x, y+1)`). `depth` tracks this.

use super::stmt::{func_body, BodySep};
use super::{
    end_comments, ends_line, leading_comments, single_line_size, trailing_comment, CodegenState,
};
use crate::nodes::{
    BinaryOp, ChanDir, Expr, ExprKind, ExprList, Field, FieldList, FuncType, Ident, UnaryOp,
};

const UNARY_PREC: u8 = 6;
const HIGHEST_PREC: u8 = 7;

/// Print an expression at the top level.
pub(crate) fn expr(x: &Expr, state: &mut CodegenState) {
    expr1(x, 0, 1, state);
}

pub(crate) fn expr0(x: &Expr, depth: usize, state: &mut CodegenState) {
    expr1(x, 0, depth, state);
}

fn expr1(x: &Expr, prec1: u8, depth: usize, state: &mut CodegenState) {
    match &x.kind {
        ExprKind::Bad => state.add_token("BadExpr"),
        ExprKind::Ident(id) => state.add_token(&id.name),
        ExprKind::BasicLit(lit) => state.add_token(&lit.value),
        ExprKind::Binary { .. } => {
            let cutoff = cutoff(x, depth.max(1));
            binary_expr(x, prec1, cutoff, depth.max(1), state);
        }
        ExprKind::KeyValue { key, value } => {
            expr(key, state);
            state.add_token(":");
            state.add_blank();
            expr(value, state);
        }
        ExprKind::Star(inner) => {
            if UNARY_PREC < prec1 {
                state.add_token("(");
                state.add_token("*");
                expr(inner, state);
                state.add_token(")");
            } else {
                state.add_token("*");
                expr(inner, state);
            }
        }
        ExprKind::Unary { op, x: operand } => {
            if UNARY_PREC < prec1 {
                state.add_token("(");
                expr(x, state);
                state.add_token(")");
            } else {
                state.add_token(op.as_str());
                expr1(operand, UNARY_PREC, depth, state);
            }
        }
        ExprKind::FuncLit(lit) => {
            let start = state.column();
            state.add_token("func");
            signature(&lit.ty, state);
            let header = state.column().saturating_sub(start);
            func_body(header, BodySep::Blank, &lit.body, state);
        }
        ExprKind::Paren(inner) => {
            if matches!(inner.kind, ExprKind::Paren(_)) {
                expr0(inner, depth, state);
            } else {
                state.add_token("(");
                expr0(inner, reduce_depth(depth), state);
                state.add_token(")");
            }
        }
        ExprKind::Selector { x: operand, sel } => {
            expr1(operand, HIGHEST_PREC, depth, state);
            state.add_token(".");
            state.add_token(&sel.name);
        }
        ExprKind::TypeAssert { x: operand, ty } => {
            expr1(operand, HIGHEST_PREC, depth, state);
            state.add_token(".");
            state.add_token("(");
            match ty {
                Some(ty) => expr(ty, state),
                None => state.add_token("type"),
            }
            state.add_token(")");
        }
        ExprKind::Index { x: operand, indices } => {
            expr1(operand, HIGHEST_PREC, 1, state);
            state.add_token("[");
            for (i, index) in indices.iter().enumerate() {
                if i > 0 {
                    state.add_token(",");
                    state.add_blank();
                }
                expr0(index, depth + 1, state);
            }
            state.add_token("]");
        }
        ExprKind::Slice(slice) => {
            expr1(&slice.x, HIGHEST_PREC, 1, state);
            state.add_token("[");
            let mut indices = vec![slice.low.as_deref(), slice.high.as_deref()];
            if slice.slice3 {
                indices.push(slice.max.as_deref());
            }
            let needs_blanks = depth <= 1
                && indices.iter().flatten().count() > 1
                && indices
                    .iter()
                    .flatten()
                    .any(|e| matches!(e.kind, ExprKind::Binary { .. }));
            for (i, index) in indices.iter().enumerate() {
                if i > 0 {
                    if indices[i - 1].is_some() && needs_blanks {
                        state.add_blank();
                    }
                    state.add_token(":");
                    if index.is_some() && needs_blanks {
                        state.add_blank();
                    }
                }
                if let Some(index) = index {
                    expr0(index, depth + 1, state);
                }
            }
            state.add_token("]");
        }
        ExprKind::Call(call) => {
            let depth = if call.args.len() > 1 { depth + 1 } else { depth };
            let paren = match &call.fun.kind {
                ExprKind::FuncType(_) => true,
                ExprKind::ChanType { dir, .. } => *dir == ChanDir::Recv,
                _ => false,
            };
            if paren {
                state.add_token("(");
            }
            expr1(&call.fun, HIGHEST_PREC, depth, state);
            if paren {
                state.add_token(")");
            }
            state.add_token("(");
            expr_list(&call.args, depth, call.ellipsis, state);
            state.add_token(")");
        }
        ExprKind::CompositeLit(lit) => {
            if let Some(ty) = &lit.ty {
                expr1(ty, HIGHEST_PREC, depth, state);
            }
            state.add_token("{");
            expr_list(&lit.elts, 1, false, state);
            state.add_token("}");
        }
        ExprKind::Ellipsis(elem) => {
            state.add_token("...");
            if let Some(elem) = elem {
                expr(elem, state);
            }
        }
        ExprKind::ArrayType { len, elem } => {
            state.add_token("[");
            if let Some(len) = len {
                expr(len, state);
            }
            state.add_token("]");
            expr(elem, state);
        }
        ExprKind::StructType(fields) => {
            state.add_token("struct");
            field_list(fields, true, state);
        }
        ExprKind::FuncType(ty) => {
            state.add_token("func");
            signature(ty, state);
        }
        ExprKind::InterfaceType(fields) => {
            state.add_token("interface");
            field_list(fields, false, state);
        }
        ExprKind::MapType { key, value } => {
            state.add_token("map");
            state.add_token("[");
            expr(key, state);
            state.add_token("]");
            expr(value, state);
        }
        ExprKind::ChanType { dir, value } => {
            match dir {
                ChanDir::Both => state.add_token("chan"),
                ChanDir::Recv => {
                    state.add_token("<-");
                    state.add_token("chan");
                }
                ChanDir::Send => {
                    state.add_token("chan");
                    state.add_token("<-");
                }
            }
            state.add_blank();
            expr(value, state);
        }
    }
}

// ============================================================================
// Binary expressions
// ============================================================================

fn binary_expr(e: &Expr, prec1: u8, cutoff: u8, depth: usize, state: &mut CodegenState) {
    let ExprKind::Binary {
        x,
        op,
        y,
        line_break,
    } = &e.kind
    else {
        return;
    };
    let prec = op.precedence();
    if prec < prec1 {
        state.add_token("(");
        expr0(e, reduce_depth(depth), state);
        state.add_token(")");
        return;
    }

    let mut print_blank = prec < cutoff;
    expr1(x, prec, depth + diff_prec(x, prec), state);
    if print_blank {
        state.add_blank();
    }
    state.add_token(op.as_str());
    let mut indented = false;
    if *line_break {
        state.add_indent();
        indented = true;
        state.formfeed();
        print_blank = false;
    }
    if print_blank {
        state.add_blank();
    }
    expr1(y, prec + 1, depth + 1, state);
    if indented {
        state.dec_indent();
    }
}

/// Operators with precedence below the cutoff are surrounded by blanks.
fn cutoff(e: &Expr, depth: usize) -> u8 {
    let (has4, has5, max_problem) = walk_binary(e);
    if max_problem > 0 {
        return max_problem + 1;
    }
    if has4 && has5 {
        if depth == 1 {
            return 5;
        }
        return 4;
    }
    if depth == 1 {
        return 6;
    }
    4
}

/// Which precedence levels occur in a chain of binary operators, and the
/// highest level whose operator would fuse with a following unary one
/// (`x/ *p`, `a& ^b`) if printed without blanks.
fn walk_binary(e: &Expr) -> (bool, bool, u8) {
    let ExprKind::Binary { x, op, y, .. } = &e.kind else {
        return (false, false, 0);
    };
    let prec = op.precedence();
    let mut has4 = prec == 4;
    let mut has5 = prec == 5;
    let mut max_problem = 0;

    if let ExprKind::Binary { op: l_op, .. } = &x.kind {
        if l_op.precedence() >= prec {
            let (h4, h5, mp) = walk_binary(x);
            has4 |= h4;
            has5 |= h5;
            max_problem = max_problem.max(mp);
        }
    }

    match &y.kind {
        ExprKind::Binary { op: r_op, .. } => {
            if r_op.precedence() > prec {
                let (h4, h5, mp) = walk_binary(y);
                has4 |= h4;
                has5 |= h5;
                max_problem = max_problem.max(mp);
            }
        }
        ExprKind::Star(_) => {
            if *op == BinaryOp::Quo {
                max_problem = 5;
            }
        }
        ExprKind::Unary { op: u_op, .. } => {
            match (op, u_op) {
                (BinaryOp::And, UnaryOp::Addr | UnaryOp::Xor) => max_problem = 5,
                (BinaryOp::Add, UnaryOp::Pos) | (BinaryOp::Sub, UnaryOp::Neg) => {
                    max_problem = max_problem.max(4)
                }
                _ => {}
            }
        }
        _ => {}
    }
    (has4, has5, max_problem)
}

fn diff_prec(x: &Expr, prec: u8) -> usize {
    match &x.kind {
        ExprKind::Binary { op, .. } if op.precedence() == prec => 0,
        _ => 1,
    }
}

fn reduce_depth(depth: usize) -> usize {
    depth.saturating_sub(1).max(1)
}

// ============================================================================
// Lists
// ============================================================================

/// A comma-separated list without layout information, on one line.
pub(crate) fn plain_list(list: &[Expr], depth: usize, state: &mut CodegenState) {
    for (i, x) in list.iter().enumerate() {
        if i > 0 {
            state.add_token(",");
            state.add_blank();
        }
        expr0(x, depth, state);
    }
}

/// Call arguments or composite literal elements, between delimiters the
/// caller prints. Source line breaks are kept; a list whose closing
/// delimiter was on its own line gets a trailing comma.
pub(crate) fn expr_list(list: &ExprList, depth: usize, ellipsis: bool, state: &mut CodegenState) {
    let last = list.items.len().saturating_sub(1);
    let needs_lines = list.is_multiline()
        || !list.end_comments.is_empty()
        || list.items.iter().any(|i| !i.comments.leading.is_empty())
        || list
            .items
            .iter()
            .any(|i| ends_line(i.comments.trailing.as_ref()));

    if !needs_lines {
        for (i, item) in list.items.iter().enumerate() {
            expr0(&item.expr, depth, state);
            if i == last && ellipsis {
                state.add_token("...");
            }
            if i < last {
                state.add_token(",");
            }
            if let Some(group) = &item.comments.trailing {
                state.add_blank();
                trailing_inline(group, state);
            }
            if i < last {
                state.add_blank();
            }
        }
        return;
    }

    let mut indented = false;
    let mut prev_break: Option<usize> = None;
    let mut size = 0usize;
    let mut ln_sum = 0.0f64;
    let mut count = 0usize;

    for (i, item) in list.items.iter().enumerate() {
        let prev_size = size;
        let pair = match &item.expr.kind {
            ExprKind::KeyValue { key, .. } => Some(key.as_ref()),
            _ => None,
        };
        size = match single_line_size(|s| expr0(&item.expr, depth, s)) {
            Some(whole) => match pair {
                Some(key) => single_line_size(|s| expr(key, s)).unwrap_or(0),
                None => whole,
            },
            None => 0,
        };

        let mut use_ff = true;
        if prev_size > 0 && size > 0 {
            const SMALL_SIZE: usize = 40;
            if count == 0 || (prev_size <= SMALL_SIZE && size <= SMALL_SIZE) {
                use_ff = false;
            } else {
                const R: f64 = 2.5;
                let geomean = (ln_sum / count as f64).exp();
                let ratio = size as f64 / geomean;
                use_ff = R * ratio <= 1.0 || R <= ratio;
            }
        }

        let breaks = item.line_break || !item.comments.leading.is_empty();
        if i > 0 {
            state.add_token(",");
            if let Some(prev) = list.items[i - 1].comments.trailing.as_ref() {
                if breaks {
                    trailing_comment(Some(prev), false, state);
                } else {
                    state.add_blank();
                    trailing_inline(prev, state);
                }
            }
        }
        if breaks {
            if !indented {
                state.add_indent();
                indented = true;
            }
            let several_on_line = prev_break.map_or(i > 0, |p| p + 1 < i);
            if i == 0 || use_ff || several_on_line {
                state.formfeed();
            } else {
                state.newline();
            }
            if item.blank_before {
                state.newline();
                ln_sum = 0.0;
                count = 0;
            }
            prev_break = Some(i);
            leading_comments(&item.comments.leading, state);
        } else if i > 0 {
            state.add_blank();
        }

        match &item.expr.kind {
            ExprKind::KeyValue { key, value } if list.len() > 1 && size > 0 && breaks => {
                expr(key, state);
                state.add_token(":");
                state.add_vtab();
                expr(value, state);
            }
            _ => expr0(&item.expr, depth, state),
        }
        if i == last && ellipsis {
            state.add_token("...");
        }

        if size > 0 {
            ln_sum += (size as f64).ln();
            count += 1;
        }
    }

    let last_trailing = list.items.last().and_then(|i| i.comments.trailing.as_ref());
    if list.break_before_close || !list.end_comments.is_empty() {
        if !list.items.is_empty() {
            state.add_token(",");
        }
        trailing_comment(last_trailing, false, state);
        if !list.end_comments.is_empty() && !indented {
            state.add_indent();
            indented = true;
        }
        end_comments(&list.end_comments, state);
        if indented {
            state.dec_indent();
        }
        if !state.at_line_start() {
            state.formfeed();
        }
    } else {
        if let Some(group) = last_trailing {
            state.add_blank();
            trailing_inline(group, state);
        }
        if indented {
            state.dec_indent();
        }
    }
}

/// A comment printed between tokens on one line.
fn trailing_inline(group: &crate::nodes::CommentGroup, state: &mut CodegenState) {
    for (i, c) in group.list.iter().enumerate() {
        if i > 0 {
            state.add_blank();
        }
        state.add_token(c.text.trim_end());
    }
}

pub(crate) fn ident_list(names: &[Ident], state: &mut CodegenState) {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            state.add_token(",");
            state.add_blank();
        }
        state.add_token(&name.name);
    }
}

// ============================================================================
// Signatures and field lists
// ============================================================================

pub(crate) fn signature(ty: &FuncType, state: &mut CodegenState) {
    if let Some(tparams) = &ty.type_params {
        parameters(tparams, true, state);
    }
    parameters(&ty.params, false, state);
    if let Some(results) = &ty.results {
        if results.num_fields() > 0 {
            state.add_blank();
            match results.list.as_slice() {
                [only] if only.names.is_empty() && results.end_comments.is_empty() => {
                    expr(strip_parens_always(&only.ty), state);
                }
                _ => parameters(results, false, state),
            }
        }
    }
}

/// `(a, b int, c string)` or `[K comparable, V any]`.
pub(crate) fn parameters(fields: &FieldList, brackets: bool, state: &mut CodegenState) {
    let (open, close) = if brackets { ("[", "]") } else { ("(", ")") };
    state.add_token(open);
    let mut indented = false;
    for (i, field) in fields.list.iter().enumerate() {
        if i > 0 {
            state.add_token(",");
            trailing_comment(fields.list[i - 1].comments.trailing.as_ref(), false, state);
        }
        if field.line_break || !field.comments.leading.is_empty() {
            if !indented {
                state.add_indent();
                indented = true;
            }
            state.formfeed();
            if field.blank_before && i > 0 {
                state.newline();
            }
            leading_comments(&field.comments.leading, state);
        } else if i > 0 {
            state.add_blank();
        }
        if !field.names.is_empty() {
            ident_list(&field.names, state);
            state.add_blank();
        }
        expr(strip_parens_always(&field.ty), state);
    }
    let last_trailing = fields.list.last().and_then(|f| f.comments.trailing.as_ref());
    if !fields.list.is_empty() && (fields.break_before_close || !fields.end_comments.is_empty()) {
        state.add_token(",");
        trailing_comment(last_trailing, false, state);
        end_comments(&fields.end_comments, state);
        if !state.at_line_start() {
            state.formfeed();
        }
    } else if let Some(group) = last_trailing {
        state.add_blank();
        trailing_inline(group, state);
    }
    if indented {
        state.dec_indent();
    }
    state.add_token(close);
}

fn has_comments(fields: &FieldList) -> bool {
    !fields.end_comments.is_empty() || fields.list.iter().any(|f| !f.comments.is_empty())
}

fn is_one_line_field_list(fields: &FieldList) -> bool {
    let [field] = fields.list.as_slice() else {
        return false;
    };
    if field.tag.is_some() || !field.comments.is_empty() {
        return false;
    }
    const MAX_SIZE: usize = 30;
    let names_size = usize::from(!field.names.is_empty());
    let type_size = single_line_size(|s| expr(&field.ty, s)).unwrap_or(MAX_SIZE + 1);
    names_size + type_size <= MAX_SIZE
}

/// Method or embedded element of an interface.
fn interface_elem(field: &Field, state: &mut CodegenState) {
    match (field.names.first(), &field.ty.kind) {
        (Some(name), ExprKind::FuncType(sig)) => {
            state.add_token(&name.name);
            signature(sig, state);
        }
        _ => expr(&field.ty, state),
    }
}

fn field_list(fields: &FieldList, is_struct: bool, state: &mut CodegenState) {
    let comments = has_comments(fields);
    if !comments && !fields.is_multiline() {
        if fields.list.is_empty() {
            state.add_token("{");
            state.add_token("}");
            return;
        }
        if is_one_line_field_list(fields) {
            state.add_token("{");
            state.add_blank();
            let field = &fields.list[0];
            if is_struct {
                ident_list(&field.names, state);
                if !field.names.is_empty() {
                    state.add_blank();
                }
                expr(&field.ty, state);
            } else {
                interface_elem(field, state);
            }
            state.add_blank();
            state.add_token("}");
            return;
        }
    }

    state.add_blank();
    state.add_token("{");
    state.add_indent();
    if comments || !fields.list.is_empty() {
        state.formfeed();
    }

    let vtab = is_struct && fields.list.len() > 1;
    let sep = |state: &mut CodegenState| {
        if vtab {
            state.add_vtab();
        } else {
            state.add_blank();
        }
    };
    let mut prev_multi = false;
    for (i, field) in fields.list.iter().enumerate() {
        if i > 0 {
            if prev_multi {
                state.formfeed();
            } else {
                state.newline();
            }
            if field.blank_before {
                state.newline();
            }
        }
        leading_comments(&field.comments.leading, state);
        let start_line = state.line_count();
        if is_struct {
            let mut extra_tabs;
            if !field.names.is_empty() {
                ident_list(&field.names, state);
                sep(state);
                expr(&field.ty, state);
                extra_tabs = 1;
            } else {
                expr(&field.ty, state);
                extra_tabs = 2;
            }
            if let Some(tag) = &field.tag {
                if !field.names.is_empty() && vtab {
                    sep(state);
                }
                sep(state);
                state.add_token(&tag.value);
                extra_tabs = 0;
            }
            if field.comments.trailing.is_some() && vtab {
                for _ in 0..extra_tabs {
                    state.add_vtab();
                }
            }
            let tabbed = vtab && extra_tabs > 0;
            trailing_comment(field.comments.trailing.as_ref(), tabbed, state);
        } else {
            interface_elem(field, state);
            trailing_comment(field.comments.trailing.as_ref(), false, state);
        }
        prev_multi = state.line_count() > start_line;
    }
    end_comments(&fields.end_comments, state);
    state.dec_indent();
    if !state.at_line_start() {
        state.formfeed();
    }
    state.add_token("}");
}

// ============================================================================
// Parentheses
// ============================================================================

fn strip_parens_always(x: &Expr) -> &Expr {
    x.unparen()
}

/// Drop parentheses around a control clause expression unless they protect
/// a composite literal whose braces would otherwise open the block.
pub(crate) fn strip_parens(x: &Expr) -> &Expr {
    if let ExprKind::Paren(inner) = &x.kind {
        if !has_bare_type_literal(inner) {
            return strip_parens(inner);
        }
    }
    x
}

fn is_type_name(x: &Expr) -> bool {
    match &x.kind {
        ExprKind::Ident(_) => true,
        ExprKind::Selector { x, .. } => matches!(x.kind, ExprKind::Ident(_)),
        _ => false,
    }
}

fn has_bare_type_literal(x: &Expr) -> bool {
    match &x.kind {
        ExprKind::CompositeLit(lit) => lit.ty.as_deref().is_some_and(is_type_name),
        ExprKind::Binary { x, y, .. } => has_bare_type_literal(x) || has_bare_type_literal(y),
        ExprKind::Unary { x, .. } | ExprKind::Star(x) => has_bare_type_literal(x),
        ExprKind::Selector { x, .. } | ExprKind::TypeAssert { x, .. } => has_bare_type_literal(x),
        ExprKind::Index { x, indices } => {
            has_bare_type_literal(x) || indices.iter().any(has_bare_type_literal)
        }
        ExprKind::Slice(s) => has_bare_type_literal(&s.x),
        ExprKind::Call(call) => {
            has_bare_type_literal(&call.fun) || call.args.exprs().any(has_bare_type_literal)
        }
        ExprKind::KeyValue { key, value } => {
            has_bare_type_literal(key) || has_bare_type_literal(value)
        }
        _ => false,
    }
}
