// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Go parser and canonical printer.
//!
//! This crate parses Go source files into syntax trees that keep the
//! comments and layout facts needed to print them back in gofmt style.
//!
//! # Overview
//!
//! - **Parsing**: [`parse_file`] parses a whole file at a base position in a
//!   [`position::FileSet`]; [`parse_expr`] parses a detached expression.
//! - **Printing**: [`print_file`] and [`print_expr`] render trees through the
//!   [`Codegen`] trait.
//! - **Traversal**: [`visitor`] walks trees, finds the nodes enclosing a
//!   position and edits calls in place.
//!
//! # Quick Start
//!
//! ```
//! use ctxize_go_syntax::{parse_file, print_file};
//!
//! let source = "package p\nfunc F( ) { g( 1,2 ) }\n";
//! let file = parse_file(source, 1).expect("parse error");
//! assert_eq!(print_file(&file), "package p\n\nfunc F() { g(1, 2) }\n");
//! ```

use std::cmp::{max, min};

pub mod codegen;
pub mod nodes;
mod parser;
pub mod position;
pub mod tokenizer;
pub mod visitor;

pub use codegen::{Codegen, CodegenState};
pub use nodes::*;
pub use parser::ParserError;
pub use position::{FileInfo, FileSet, Pos, Position, Span};

use parser::Parser;

/// Parse a Go source file whose first byte is at position `base`.
///
/// Positions of all nodes are `base + offset`, so files registered in one
/// [`FileSet`] get disjoint positions.
pub fn parse_file(source: &str, base: u32) -> Result<File, ParserError> {
    Parser::new(source, Some(base))?.parse_file()
}

/// Parse a single expression with no source position, for synthesized code.
///
/// # Example
///
/// ```
/// use ctxize_go_syntax::{parse_expr, print_expr};
///
/// let x = parse_expr("context.TODO()").expect("parse error");
/// assert_eq!(print_expr(&x), "context.TODO()");
/// ```
pub fn parse_expr(source: &str) -> Result<Expr, ParserError> {
    Parser::new(source, None)?.parse_expr_input()
}

/// Print a file in canonical form.
pub fn print_file(file: &File) -> String {
    let mut state = CodegenState::default();
    file.codegen(&mut state);
    state.to_string()
}

/// Print an expression in canonical form, without a trailing newline.
pub fn print_expr(expr: &Expr) -> String {
    let mut state = CodegenState::default();
    expr.codegen(&mut state);
    state.to_string().trim_end_matches('\n').to_string()
}

fn bol_offset(source: &str, n: i64) -> usize {
    if n <= 1 {
        return 0;
    }
    source
        .match_indices('\n')
        .nth((n - 2) as usize)
        .map(|(index, _)| index + 1)
        .unwrap_or(source.len())
}

/// Render a parse error as an annotated snippet of `source`.
///
/// # Example
///
/// ```
/// use ctxize_go_syntax::{parse_file, prettify_error};
///
/// let source = "package p\nfunc (\n";
/// if let Err(e) = parse_file(source, 1) {
///     let formatted = prettify_error(&e, source, "example.go");
///     assert!(formatted.contains("example.go"));
/// }
/// ```
pub fn prettify_error(err: &ParserError, source: &str, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let context = 1;
    let line = i64::from(err.line());
    let line_start = max(1, line - context) as usize;
    let start_offset = bol_offset(source, line - context);
    let end_offset = bol_offset(source, line + context + 1);
    let snippet = &source[start_offset..end_offset];
    let start = err.offset().min(source.len()).saturating_sub(start_offset);
    let end = min(start + 1, snippet.len().max(start));
    let title = format!("{}: {}", label, err);
    let message = err.message();
    let rendered = Renderer::plain()
        .render(
            Level::Error.title(&title).snippet(
                Snippet::source(snippet)
                    .line_start(line_start)
                    .origin(label)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label(&message)]),
            ),
        )
        .to_string();
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_position() {
        let err = parse_file("package p\n\nfunc F( {\n}\n", 1).expect_err("should fail");
        assert_eq!(err.line(), 3);
        let pretty = prettify_error(&err, "package p\n\nfunc F( {\n}\n", "f.go");
        assert!(pretty.contains("f.go"));
        assert!(pretty.contains("func F( {"));
    }

    #[test]
    fn detached_expressions_have_no_ids() {
        let x = parse_expr("f(x)").expect("parse error");
        match &x.kind {
            ExprKind::Call(call) => assert!(call.id.is_none()),
            other => panic!("expected call, got {:?}", other),
        }
        assert!(!x.span.is_valid());
    }

    #[test]
    fn file_positions_start_at_base() {
        let file = parse_file("package p\n", 100).expect("parse error");
        assert_eq!(file.package.pos, Pos(108));
    }
}
