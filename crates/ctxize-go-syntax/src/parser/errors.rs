// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

use crate::tokenizer::TokError;

/// A failure to tokenize or parse Go source.
///
/// Errors own their data so they can outlive the source text; use
/// [`crate::prettify_error`] with the source to render a snippet.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("{line}:{col}: tokenizer error: {error}")]
    TokenizerError { error: TokError, line: u32, col: u32 },
    #[error("{line}:{col}: {message}")]
    SyntaxError {
        message: String,
        offset: usize,
        line: u32,
        col: u32,
    },
}

impl ParserError {
    pub(crate) fn tokenizer(error: TokError, src: &str) -> Self {
        let (line, col) = line_col(src, error.offset());
        ParserError::TokenizerError { error, line, col }
    }

    pub(crate) fn syntax(message: impl Into<String>, src: &str, offset: usize) -> Self {
        let (line, col) = line_col(src, offset);
        ParserError::SyntaxError {
            message: message.into(),
            offset,
            line,
            col,
        }
    }

    /// Byte offset of the error in the source.
    pub fn offset(&self) -> usize {
        match self {
            ParserError::TokenizerError { error, .. } => error.offset(),
            ParserError::SyntaxError { offset, .. } => *offset,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            ParserError::TokenizerError { line, .. } | ParserError::SyntaxError { line, .. } => {
                *line
            }
        }
    }

    pub fn col(&self) -> u32 {
        match self {
            ParserError::TokenizerError { col, .. } | ParserError::SyntaxError { col, .. } => *col,
        }
    }

    /// The message without the position prefix.
    pub fn message(&self) -> String {
        match self {
            ParserError::TokenizerError { error, .. } => error.to_string(),
            ParserError::SyntaxError { message, .. } => message.clone(),
        }
    }
}

fn line_col(src: &str, offset: usize) -> (u32, u32) {
    let offset = offset.min(src.len());
    let before = &src.as_bytes()[..offset];
    let line = memchr::memchr_iter(b'\n', before).count() as u32 + 1;
    let line_start = memchr::memrchr(b'\n', before).map(|i| i + 1).unwrap_or(0);
    (line, (offset - line_start) as u32 + 1)
}

pub type Result<T> = std::result::Result<T, ParserError>;
