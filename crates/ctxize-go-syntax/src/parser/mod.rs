// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Recursive-descent parser for Go source files.
//!
//! The parser works on a fully tokenized input. Comments are kept out of the
//! token stream and attached to declarations, statements, fields and list
//! elements as they are parsed: groups above a node become its leading
//! comments, a comment on the node's last line becomes its trailing comment.
//!
//! Layout facts the printer needs (whether list elements started on new
//! lines, whether a block spanned lines, where blank lines were) are recorded
//! on the nodes, so printing never has to look at positions.

mod decl;
mod errors;
mod expr;
mod stmt;

pub use errors::{ParserError, Result};

use crate::nodes::{Comment, CommentGroup, Comments, Expr, File, NodeId};
use crate::position::{Pos, Span};
use crate::tokenizer::{tokenize, RawComment, Token, TokenKind};

pub(crate) struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token<'a>>,
    idx: usize,
    comments: Vec<RawComment>,
    next_comment: usize,
    /// Position of byte 0; `None` when parsing detached from any file.
    base: Option<u32>,
    next_id: u32,
    /// Nesting level of parentheses and brackets; negative inside control
    /// clauses, where `{` starts a block rather than a composite literal.
    expr_lev: i32,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str, base: Option<u32>) -> Result<Self> {
        let stream = tokenize(src).map_err(|e| ParserError::tokenizer(e, src))?;
        Ok(Parser {
            src,
            tokens: stream.tokens,
            idx: 0,
            comments: stream.comments,
            next_comment: 0,
            base,
            next_id: 1,
            expr_lev: 0,
        })
    }

    /// Parse a whole file.
    pub(crate) fn parse_file(mut self) -> Result<File> {
        self.file()
    }

    /// Parse a single expression filling the whole input.
    pub(crate) fn parse_expr_input(mut self) -> Result<Expr> {
        let x = self.parse_type_or_expr()?;
        while self.kind() == TokenKind::Semicolon && self.tok().is_auto_semicolon() {
            self.advance();
        }
        if self.kind() != TokenKind::Eof {
            return Err(self.unexpected("end of expression"));
        }
        Ok(x)
    }

    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    fn tok(&self) -> Token<'a> {
        self.tokens[self.idx.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.tok().kind
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.idx + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Token<'a> {
        let tok = self.tok();
        if tok.kind != TokenKind::Eof {
            self.idx += 1;
        }
        tok
    }

    fn got(&mut self, kind: TokenKind) -> bool {
        if self.kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token<'a>> {
        if self.kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{}'", kind)))
        }
    }

    /// Accept `;` before a closing `)` or `}`, where Go allows it to be
    /// omitted.
    fn expect_semi(&mut self) -> Result<()> {
        match self.kind() {
            TokenKind::Semicolon => {
                self.advance();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';' or newline")),
        }
    }

    fn unexpected(&self, wanted: &str) -> ParserError {
        let tok = self.tok();
        let found = match tok.kind {
            TokenKind::Semicolon if tok.is_auto_semicolon() => "newline".to_string(),
            TokenKind::Ident | TokenKind::Int | TokenKind::Float | TokenKind::String => {
                format!("{} {}", tok.kind, tok.text)
            }
            k => format!("'{}'", k),
        };
        ParserError::syntax(
            format!("expected {}, found {}", wanted, found),
            self.src,
            tok.offset as usize,
        )
    }

    fn error_here(&self, message: impl Into<String>) -> ParserError {
        ParserError::syntax(message, self.src, self.tok().offset as usize)
    }

    // ------------------------------------------------------------------
    // Positions and identity
    // ------------------------------------------------------------------

    fn pos_at(&self, offset: u32) -> Pos {
        match self.base {
            Some(base) => Pos(base + offset),
            None => Pos::NONE,
        }
    }

    fn pos(&self) -> Pos {
        self.pos_at(self.tok().offset)
    }

    /// End position of the last consumed token.
    fn prev_end(&self) -> Pos {
        match self.idx.checked_sub(1) {
            Some(i) => self.pos_at(self.tokens[i].end),
            None => self.pos_at(0),
        }
    }

    fn span_from(&self, start: Pos) -> Span {
        Span::new(start, self.prev_end())
    }

    /// Line on which the last consumed token ended.
    fn prev_line(&self) -> u32 {
        match self.idx.checked_sub(1) {
            Some(i) => self.tokens[i].end_line,
            None => 0,
        }
    }

    fn line(&self) -> u32 {
        self.tok().line
    }

    /// The current token starts a new line relative to the last one.
    fn on_new_line(&self) -> bool {
        self.idx > 0 && self.line() > self.prev_line()
    }

    fn node_id(&mut self) -> NodeId {
        if self.base.is_none() {
            return NodeId::NONE;
        }
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    fn make_comment(&self, raw: &RawComment) -> Comment {
        Comment {
            text: raw.text.clone(),
            pos: self.pos_at(raw.offset),
            line: raw.line,
        }
    }

    /// Take all pending comments before the current token, grouped by
    /// adjacency. Returns the groups and whether a blank line precedes the
    /// first of them (or the current token, if there are none).
    fn take_leading(&mut self) -> (Vec<CommentGroup>, bool) {
        let limit = self.tok().offset;
        let prev_line = self.prev_line();
        let mut groups: Vec<CommentGroup> = Vec::new();
        let mut last_end_line = prev_line;
        while let Some(raw) = self.comments.get(self.next_comment) {
            if raw.offset >= limit {
                break;
            }
            let comment = self.make_comment(raw);
            let (line, end_line) = (raw.line, raw.end_line);
            self.next_comment += 1;
            let adjacent = line <= last_end_line + 1 && !groups.is_empty();
            if adjacent {
                if let Some(g) = groups.last_mut() {
                    g.list.push(comment);
                }
            } else {
                if let Some(g) = groups.last_mut() {
                    g.blank_after = true;
                }
                groups.push(CommentGroup {
                    list: vec![comment],
                    blank_before: self.idx > 0 && line > last_end_line + 1,
                    blank_after: false,
                });
            }
            last_end_line = end_line;
        }
        let tok_line = self.line();
        if let Some(g) = groups.last_mut() {
            g.blank_after = tok_line > last_end_line + 1;
        }
        let blank_before = match groups.first() {
            Some(g) => g.blank_before,
            None => self.idx > 0 && tok_line > prev_line + 1,
        };
        (groups, blank_before)
    }

    /// Take a comment that starts on the line where the last consumed token
    /// ended, if it comes before the current token.
    fn take_trailing(&mut self) -> Option<CommentGroup> {
        let line = self.prev_line();
        let limit = self.tok().offset;
        let mut group: Option<CommentGroup> = None;
        while let Some(raw) = self.comments.get(self.next_comment) {
            if raw.offset >= limit || raw.line != line {
                break;
            }
            let comment = self.make_comment(raw);
            self.next_comment += 1;
            group
                .get_or_insert_with(CommentGroup::default)
                .list
                .push(comment);
        }
        group
    }

    /// Leading comments for the next node, as a [`Comments`] value.
    fn leading_comments(&mut self) -> (Comments, bool) {
        let (leading, blank_before) = self.take_leading();
        (
            Comments {
                leading,
                trailing: None,
            },
            blank_before,
        )
    }

    /// Comments between the last node of a list and its closing token.
    fn end_comments(&mut self) -> Vec<CommentGroup> {
        self.take_leading().0
    }
}

#[cfg(test)]
mod tests;
