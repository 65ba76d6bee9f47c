// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Canonical (gofmt-style) printing of syntax trees.
//!
//! Printing happens in two stages. Nodes emit tokens, blanks, line breaks
//! and alignment cells into a [`CodegenState`]; rendering the state then
//! aligns cells column by column the way an elastic tabwriter does:
//! consecutive lines with a cell in the same column form a block, and every
//! cell in the block is padded to the widest one plus one space. Indentation
//! is always written as tabs.

mod decl;
mod expr;
mod stmt;

use std::fmt;

use crate::nodes::{CommentGroup, Expr, File};

pub(crate) use decl::file;
pub(crate) use expr::expr;

/// Minimum spacing between aligned cells.
const PADDING: usize = 1;

/// Something that can print itself in canonical form.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);
}

impl Codegen for File {
    fn codegen(&self, state: &mut CodegenState) {
        file(self, state);
    }
}

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState) {
        expr(self, state);
    }
}

// ============================================================================
// CodegenState
// ============================================================================

#[derive(Debug, Clone)]
struct Cell {
    text: String,
    /// Terminated by a hard tab (before a trailing comment) rather than an
    /// alignment tab. Empty columns made only of alignment tabs collapse.
    htab: bool,
}

#[derive(Debug, Clone, Default)]
struct Line {
    indent: usize,
    cells: Vec<Cell>,
    text: String,
    started: bool,
    /// Alignment blocks do not continue across this line's start.
    section_break: bool,
}

/// Output buffer for [`Codegen`].
#[derive(Debug, Clone, Default)]
pub struct CodegenState {
    lines: Vec<Line>,
    current: Line,
    indent: usize,
}

impl CodegenState {
    pub fn new() -> Self {
        CodegenState::default()
    }

    fn start_line(&mut self) {
        if !self.current.started {
            self.current.started = true;
            self.current.indent = self.indent;
        }
    }

    /// Append a token, separating it from the previous one if the two would
    /// otherwise read as a different token (`- -x`, `a< -b`).
    pub fn add_token(&mut self, tok: &str) {
        if tok.is_empty() {
            return;
        }
        self.start_line();
        if let (Some(prev), Some(next)) = (self.current.text.chars().last(), tok.chars().next()) {
            if may_combine(prev, next) {
                self.current.text.push(' ');
            }
        }
        self.current.text.push_str(tok);
    }

    pub fn add_blank(&mut self) {
        self.start_line();
        self.current.text.push(' ');
    }

    /// End the current alignment cell.
    pub fn add_vtab(&mut self) {
        self.end_cell(false);
    }

    /// End the current cell before a trailing comment.
    pub fn add_htab(&mut self) {
        self.end_cell(true);
    }

    fn end_cell(&mut self, htab: bool) {
        self.start_line();
        let text = std::mem::take(&mut self.current.text);
        self.current.cells.push(Cell { text, htab });
    }

    /// End the current line. On an empty line this produces a blank line.
    pub fn newline(&mut self) {
        self.end_line(false);
    }

    /// End the current line and start a new alignment section.
    pub fn formfeed(&mut self) {
        self.end_line(true);
    }

    fn end_line(&mut self, section: bool) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
        self.current.section_break = section;
    }

    pub fn add_indent(&mut self) {
        self.indent += 1;
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Number of completed lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// True if nothing has been written on the current line.
    pub fn at_line_start(&self) -> bool {
        !self.current.started
    }

    /// Approximate width of the current line, ignoring indentation.
    pub fn column(&self) -> usize {
        let cells: usize = self
            .current
            .cells
            .iter()
            .map(|c| width(&c.text) + PADDING)
            .sum();
        cells + width(&self.current.text)
    }

    /// Render the buffer, aligning cells.
    pub fn to_source(&self) -> String {
        let mut lines: Vec<&Line> = self.lines.iter().collect();
        if self.current.started {
            lines.push(&self.current);
        }
        let mut out = String::new();
        let mut start = 0;
        for i in 1..=lines.len() {
            let boundary = i == lines.len()
                || lines[i].section_break
                || lines[i].indent != lines[i - 1].indent;
            if boundary {
                format_section(&lines[start..i], &mut out);
                start = i;
            }
        }
        out
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn may_combine(prev: char, next: char) -> bool {
    matches!(
        (prev, next),
        ('+', '+') | ('-', '-') | ('/', '*') | ('<', '-') | ('<', '<') | ('&', '&') | ('&', '^')
    )
}

struct Row<'a> {
    indent: usize,
    /// Terminated cells followed by the final, unterminated text.
    cells: Vec<(&'a str, bool)>,
}

fn format_section(lines: &[&Line], out: &mut String) {
    let rows: Vec<Row<'_>> = lines
        .iter()
        .map(|line| {
            let mut cells: Vec<(&str, bool)> = line
                .cells
                .iter()
                .map(|c| (c.text.as_str(), c.htab))
                .collect();
            cells.push((line.text.as_str(), false));
            Row {
                indent: if line.started { line.indent } else { 0 },
                cells,
            }
        })
        .collect();
    let mut widths = Vec::new();
    format_block(&rows, &mut widths, 0, rows.len(), out);
}

/// Align column `widths.len()` across rows `line0..line1`, recursing into
/// the next column for every block of rows that has a cell there.
fn format_block(rows: &[Row<'_>], widths: &mut Vec<usize>, line0: usize, line1: usize, out: &mut String) {
    let column = widths.len();
    let mut line0 = line0;
    let mut this = line0;
    while this < line1 {
        if column + 1 >= rows[this].cells.len() {
            this += 1;
            continue;
        }
        write_rows(rows, widths, line0, this, out);
        line0 = this;

        let mut cell_width = 0;
        let mut discardable = true;
        while this < line1 {
            let cells = &rows[this].cells;
            if column + 1 >= cells.len() {
                break;
            }
            let (text, htab) = cells[column];
            cell_width = cell_width.max(width(text) + PADDING);
            if !text.is_empty() || htab {
                discardable = false;
            }
            this += 1;
        }
        if discardable {
            cell_width = 0;
        }
        widths.push(cell_width);
        format_block(rows, widths, line0, this, out);
        widths.pop();
        line0 = this;
    }
    write_rows(rows, widths, line0, line1, out);
}

fn write_rows(rows: &[Row<'_>], widths: &[usize], line0: usize, line1: usize, out: &mut String) {
    for row in &rows[line0..line1] {
        let mut line = String::new();
        let has_text = row.cells.iter().any(|(t, _)| !t.is_empty());
        if has_text {
            for _ in 0..row.indent {
                line.push('\t');
            }
        }
        for (j, (text, _)) in row.cells.iter().enumerate() {
            line.push_str(text);
            if let Some(&w) = widths.get(j) {
                if j + 1 < row.cells.len() {
                    for _ in width(text)..w {
                        line.push(' ');
                    }
                }
            }
        }
        out.push_str(line.trim_end_matches([' ', '\t']));
        out.push('\n');
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Width of `f`'s output if it fits on one line, else `None`.
pub(crate) fn single_line_size(f: impl FnOnce(&mut CodegenState)) -> Option<usize> {
    let mut state = CodegenState::new();
    f(&mut state);
    if state.line_count() > 0 {
        return None;
    }
    let rendered = state.to_source();
    let text = rendered.trim_end_matches('\n');
    if text.contains('\n') {
        None
    } else {
        Some(width(text.trim_start_matches('\t')))
    }
}

/// Comment groups on their own lines, keeping blank lines between groups.
/// Expects to start on an empty line; leaves the state on an empty line.
pub(crate) fn leading_comments(groups: &[CommentGroup], state: &mut CodegenState) {
    for group in groups {
        for comment in &group.list {
            state.add_token(comment.text.trim_end());
            state.newline();
        }
        if group.blank_after {
            state.newline();
        }
    }
}

/// Comments between the last element of a list or block and its closing
/// delimiter, at the current indentation.
pub(crate) fn end_comments(groups: &[CommentGroup], state: &mut CodegenState) {
    if groups.is_empty() {
        return;
    }
    if !state.at_line_start() {
        state.formfeed();
    }
    for group in groups {
        if group.blank_before {
            state.newline();
        }
        for comment in &group.list {
            state.add_token(comment.text.trim_end());
            state.newline();
        }
    }
}

/// A comment following code on the same line. `tabbed` says whether an
/// alignment cell was already ended before it.
pub(crate) fn trailing_comment(group: Option<&CommentGroup>, tabbed: bool, state: &mut CodegenState) {
    let Some(group) = group else {
        return;
    };
    if !tabbed {
        state.add_htab();
    }
    for (i, comment) in group.list.iter().enumerate() {
        if i > 0 {
            state.add_blank();
        }
        state.add_token(comment.text.trim_end());
    }
}

/// True if the group ends with a `//` comment, which must end its line.
pub(crate) fn ends_line(group: Option<&CommentGroup>) -> bool {
    group
        .and_then(|g| g.list.last())
        .is_some_and(|c| c.text.starts_with("//"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligns_consecutive_cells() {
        let mut state = CodegenState::new();
        for (a, b) in [("a", "= 1"), ("bbb", "= 2")] {
            state.add_token(a);
            state.add_vtab();
            state.add_token(b);
            state.newline();
        }
        assert_eq!(state.to_source(), "a   = 1\nbbb = 2\n");
    }

    #[test]
    fn blank_line_breaks_alignment() {
        let mut state = CodegenState::new();
        state.add_token("a");
        state.add_vtab();
        state.add_token("x");
        state.newline();
        state.newline();
        state.add_token("bbbb");
        state.add_vtab();
        state.add_token("y");
        state.newline();
        assert_eq!(state.to_source(), "a x\n\nbbbb y\n");
    }

    #[test]
    fn empty_soft_columns_collapse() {
        let mut state = CodegenState::new();
        state.add_token("a");
        state.add_vtab();
        state.add_vtab();
        state.add_token("// c");
        state.newline();
        assert_eq!(state.to_source(), "a // c\n");
    }

    #[test]
    fn indentation_uses_tabs() {
        let mut state = CodegenState::new();
        state.add_token("{");
        state.add_indent();
        state.formfeed();
        state.add_token("x");
        state.dec_indent();
        state.formfeed();
        state.add_token("}");
        assert_eq!(state.to_source(), "{\n\tx\n}\n");
    }

    #[test]
    fn separates_combining_tokens() {
        let mut state = CodegenState::new();
        state.add_token("-");
        state.add_token("-x");
        assert_eq!(state.to_source(), "- -x\n");
    }

    #[test]
    fn no_trailing_whitespace() {
        let mut state = CodegenState::new();
        state.add_token("a");
        state.add_vtab();
        state.newline();
        state.add_token("bb");
        state.add_vtab();
        state.add_token("c");
        state.newline();
        assert_eq!(state.to_source(), "a\nbb c\n");
    }
}
