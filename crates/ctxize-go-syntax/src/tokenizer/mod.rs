// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for Go source code.
//!
//! Produces the token stream of the Go specification, including the
//! automatic semicolons inserted at line ends. Comments are not part of the
//! token stream; they are collected on the side with their positions so the
//! parser can attach them to nodes.

use std::fmt;

use thiserror::Error;

#[cfg(test)]
mod tests;

/// Kind of a Go token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,

    // Operators and delimiters
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    AddAssign,
    SubAssign,
    MulAssign,
    QuoAssign,
    RemAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    LAnd,
    LOr,
    Arrow,
    Inc,
    Dec,
    Eql,
    Lss,
    Gtr,
    Assign,
    Not,
    Neq,
    Leq,
    Geq,
    Define,
    Ellipsis,
    LParen,
    LBrack,
    LBrace,
    Comma,
    Period,
    RParen,
    RBrack,
    RBrace,
    Semicolon,
    Colon,
    Tilde,

    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl TokenKind {
    /// Keyword lookup.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "chan" => TokenKind::Chan,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "default" => TokenKind::Default,
            "defer" => TokenKind::Defer,
            "else" => TokenKind::Else,
            "fallthrough" => TokenKind::Fallthrough,
            "for" => TokenKind::For,
            "func" => TokenKind::Func,
            "go" => TokenKind::Go,
            "goto" => TokenKind::Goto,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "interface" => TokenKind::Interface,
            "map" => TokenKind::Map,
            "package" => TokenKind::Package,
            "range" => TokenKind::Range,
            "return" => TokenKind::Return,
            "select" => TokenKind::Select,
            "struct" => TokenKind::Struct,
            "switch" => TokenKind::Switch,
            "type" => TokenKind::Type,
            "var" => TokenKind::Var,
            _ => return None,
        })
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Float | TokenKind::Imag | TokenKind::Char | TokenKind::String
        )
    }

    /// Tokens after which a newline ends the statement.
    fn triggers_semicolon(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                TokenKind::Ident
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Fallthrough
                    | TokenKind::Return
                    | TokenKind::Inc
                    | TokenKind::Dec
                    | TokenKind::RParen
                    | TokenKind::RBrack
                    | TokenKind::RBrace
            )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "identifier",
            TokenKind::Int | TokenKind::Float | TokenKind::Imag => "number",
            TokenKind::Char => "rune literal",
            TokenKind::String => "string literal",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Quo => "/",
            TokenKind::Rem => "%",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Xor => "^",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::AndNot => "&^",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::QuoAssign => "/=",
            TokenKind::RemAssign => "%=",
            TokenKind::AndAssign => "&=",
            TokenKind::OrAssign => "|=",
            TokenKind::XorAssign => "^=",
            TokenKind::ShlAssign => "<<=",
            TokenKind::ShrAssign => ">>=",
            TokenKind::AndNotAssign => "&^=",
            TokenKind::LAnd => "&&",
            TokenKind::LOr => "||",
            TokenKind::Arrow => "<-",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Eql => "==",
            TokenKind::Lss => "<",
            TokenKind::Gtr => ">",
            TokenKind::Assign => "=",
            TokenKind::Not => "!",
            TokenKind::Neq => "!=",
            TokenKind::Leq => "<=",
            TokenKind::Geq => ">=",
            TokenKind::Define => ":=",
            TokenKind::Ellipsis => "...",
            TokenKind::LParen => "(",
            TokenKind::LBrack => "[",
            TokenKind::LBrace => "{",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::RParen => ")",
            TokenKind::RBrack => "]",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Tilde => "~",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Chan => "chan",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Default => "default",
            TokenKind::Defer => "defer",
            TokenKind::Else => "else",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::For => "for",
            TokenKind::Func => "func",
            TokenKind::Go => "go",
            TokenKind::Goto => "goto",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::Interface => "interface",
            TokenKind::Map => "map",
            TokenKind::Package => "package",
            TokenKind::Range => "range",
            TokenKind::Return => "return",
            TokenKind::Select => "select",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::Type => "type",
            TokenKind::Var => "var",
        };
        f.write_str(s)
    }
}

/// A token with its byte range and line numbers.
///
/// Automatic semicolons have the text `"\n"` (or `""` at end of input).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: u32,
    pub end: u32,
    pub line: u32,
    pub end_line: u32,
}

impl Token<'_> {
    /// True for semicolons inserted at a newline or end of input.
    pub fn is_auto_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon && self.text != ";"
    }
}

/// A `//` or `/* */` comment with its byte range and lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub text: String,
    pub offset: u32,
    pub end: u32,
    pub line: u32,
    pub end_line: u32,
}

/// Tokenizer errors, carrying the byte offset where they occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokError {
    #[error("string literal not terminated")]
    UnterminatedString(usize),
    #[error("raw string literal not terminated")]
    UnterminatedRawString(usize),
    #[error("rune literal not terminated")]
    UnterminatedChar(usize),
    #[error("comment not terminated")]
    UnterminatedComment(usize),
    #[error("invalid character {0:?}")]
    BadChar(char, usize),
    #[error("invalid number literal")]
    BadNumber(usize),
}

impl TokError {
    pub fn offset(&self) -> usize {
        match self {
            TokError::UnterminatedString(o)
            | TokError::UnterminatedRawString(o)
            | TokError::UnterminatedChar(o)
            | TokError::UnterminatedComment(o)
            | TokError::BadChar(_, o)
            | TokError::BadNumber(o) => *o,
        }
    }
}

/// Output of tokenizing a whole source text.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    pub tokens: Vec<Token<'a>>,
    pub comments: Vec<RawComment>,
}

/// Tokenize a whole source text. The last token is always `Eof`.
pub fn tokenize(src: &str) -> Result<TokenStream<'_>, TokError> {
    let mut state = TokState::new(src);
    let mut tokens = Vec::new();
    loop {
        let tok = state.next_token()?;
        let done = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if done {
            break;
        }
    }
    Ok(TokenStream {
        tokens,
        comments: state.comments,
    })
}

struct TokState<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    insert_semi: bool,
    comments: Vec<RawComment>,
}

impl<'a> TokState<'a> {
    fn new(src: &'a str) -> Self {
        TokState {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            insert_semi: false,
            comments: Vec::new(),
        }
    }

    fn peek_byte(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn make(&self, kind: TokenKind, start: usize, line: u32) -> Token<'a> {
        Token {
            kind,
            text: &self.src[start..self.pos],
            offset: start as u32,
            end: self.pos as u32,
            line,
            end_line: self.line,
        }
    }

    fn auto_semicolon(&mut self, text: &'static str) -> Token<'a> {
        self.insert_semi = false;
        Token {
            kind: TokenKind::Semicolon,
            text,
            offset: self.pos as u32,
            end: self.pos as u32,
            line: self.line,
            end_line: self.line,
        }
    }

    fn next_token(&mut self) -> Result<Token<'a>, TokError> {
        loop {
            match self.peek_byte(0) {
                None => {
                    if self.insert_semi {
                        return Ok(self.auto_semicolon(""));
                    }
                    return Ok(Token {
                        kind: TokenKind::Eof,
                        text: "",
                        offset: self.pos as u32,
                        end: self.pos as u32,
                        line: self.line,
                        end_line: self.line,
                    });
                }
                Some(b'\n') => {
                    if self.insert_semi {
                        let tok = self.auto_semicolon("\n");
                        self.pos += 1;
                        self.line += 1;
                        return Ok(tok);
                    }
                    self.pos += 1;
                    self.line += 1;
                }
                Some(b' ' | b'\t' | b'\r') => self.pos += 1,
                Some(b'/') if self.peek_byte(1) == Some(b'/') => {
                    self.line_comment();
                }
                Some(b'/') if self.peek_byte(1) == Some(b'*') => {
                    let start_line = self.line;
                    self.block_comment()?;
                    if self.insert_semi && self.line != start_line {
                        // A multi-line comment acts like a newline.
                        let mut tok = self.auto_semicolon("\n");
                        tok.line = start_line;
                        tok.end_line = start_line;
                        return Ok(tok);
                    }
                }
                Some(_) => break,
            }
        }

        let start = self.pos;
        let line = self.line;
        let kind = self.scan_token()?;
        self.insert_semi = kind.triggers_semicolon();
        Ok(self.make(kind, start, line))
    }

    fn line_comment(&mut self) {
        let start = self.pos;
        let end = memchr::memchr(b'\n', &self.bytes[start..])
            .map(|i| start + i)
            .unwrap_or(self.bytes.len());
        let text = self.src[start..end].trim_end_matches('\r').to_string();
        self.comments.push(RawComment {
            text,
            offset: start as u32,
            end: end as u32,
            line: self.line,
            end_line: self.line,
        });
        self.pos = end;
    }

    fn block_comment(&mut self) -> Result<(), TokError> {
        let start = self.pos;
        let start_line = self.line;
        let close = memchr::memmem::find(&self.bytes[start + 2..], b"*/")
            .ok_or(TokError::UnterminatedComment(start))?;
        let end = start + 2 + close + 2;
        let text = &self.src[start..end];
        self.line += memchr::memchr_iter(b'\n', text.as_bytes()).count() as u32;
        self.comments.push(RawComment {
            text: text.to_string(),
            offset: start as u32,
            end: end as u32,
            line: start_line,
            end_line: self.line,
        });
        self.pos = end;
        Ok(())
    }

    fn scan_token(&mut self) -> Result<TokenKind, TokError> {
        let start = self.pos;
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(TokenKind::Eof),
        };

        if c == '_' || c.is_alphabetic() {
            while let Some(c) = self.peek_char() {
                if c == '_' || c.is_alphanumeric() {
                    self.pos += c.len_utf8();
                } else {
                    break;
                }
            }
            let ident = &self.src[start..self.pos];
            return Ok(TokenKind::keyword(ident).unwrap_or(TokenKind::Ident));
        }

        if c.is_ascii_digit()
            || (c == '.' && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit()))
        {
            return self.number();
        }

        match c {
            '"' => self.string(),
            '`' => self.raw_string(),
            '\'' => self.rune(),
            _ => self.operator(),
        }
    }

    fn number(&mut self) -> Result<TokenKind, TokError> {
        let start = self.pos;
        let mut kind = TokenKind::Int;
        let mut hex = false;

        if self.peek_byte(0) == Some(b'0') {
            match self.peek_byte(1) {
                Some(b'x' | b'X') => {
                    hex = true;
                    self.pos += 2;
                }
                Some(b'b' | b'B' | b'o' | b'O') => self.pos += 2,
                _ => {}
            }
        }

        let digit = |b: u8, hex: bool| b == b'_' || b.is_ascii_digit() || (hex && b.is_ascii_hexdigit());

        while self.peek_byte(0).is_some_and(|b| digit(b, hex)) {
            self.pos += 1;
        }
        if self.peek_byte(0) == Some(b'.') {
            kind = TokenKind::Float;
            self.pos += 1;
            while self.peek_byte(0).is_some_and(|b| digit(b, hex)) {
                self.pos += 1;
            }
        }
        let exponent = if hex {
            matches!(self.peek_byte(0), Some(b'p' | b'P'))
        } else {
            matches!(self.peek_byte(0), Some(b'e' | b'E'))
        };
        if exponent {
            kind = TokenKind::Float;
            self.pos += 1;
            if matches!(self.peek_byte(0), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !self.peek_byte(0).is_some_and(|b| b.is_ascii_digit()) {
                return Err(TokError::BadNumber(start));
            }
            while self.peek_byte(0).is_some_and(|b| b == b'_' || b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if self.peek_byte(0) == Some(b'i') {
            kind = TokenKind::Imag;
            self.pos += 1;
        }
        if self.pos == start || self.src[start..self.pos].ends_with('_') {
            return Err(TokError::BadNumber(start));
        }
        Ok(kind)
    }

    fn string(&mut self) -> Result<TokenKind, TokError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek_byte(0) {
                None | Some(b'\n') => return Err(TokError::UnterminatedString(start)),
                Some(b'\\') => self.pos += 2,
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(TokenKind::String);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn raw_string(&mut self) -> Result<TokenKind, TokError> {
        let start = self.pos;
        let close = memchr::memchr(b'`', &self.bytes[start + 1..])
            .ok_or(TokError::UnterminatedRawString(start))?;
        let end = start + 1 + close + 1;
        self.line += memchr::memchr_iter(b'\n', &self.bytes[start..end]).count() as u32;
        self.pos = end;
        Ok(TokenKind::String)
    }

    fn rune(&mut self) -> Result<TokenKind, TokError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek_byte(0) {
                None | Some(b'\n') => return Err(TokError::UnterminatedChar(start)),
                Some(b'\\') => self.pos += 2,
                Some(b'\'') => {
                    self.pos += 1;
                    return Ok(TokenKind::Char);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    fn operator(&mut self) -> Result<TokenKind, TokError> {
        use TokenKind::*;

        // Longest match first.
        const OPERATORS: &[(&str, TokenKind)] = &[
            ("<<=", ShlAssign),
            (">>=", ShrAssign),
            ("&^=", AndNotAssign),
            ("...", Ellipsis),
            ("&&", LAnd),
            ("||", LOr),
            ("<-", Arrow),
            ("++", Inc),
            ("--", Dec),
            ("==", Eql),
            ("!=", Neq),
            ("<=", Leq),
            (">=", Geq),
            (":=", Define),
            ("<<", Shl),
            (">>", Shr),
            ("&^", AndNot),
            ("+=", AddAssign),
            ("-=", SubAssign),
            ("*=", MulAssign),
            ("/=", QuoAssign),
            ("%=", RemAssign),
            ("&=", AndAssign),
            ("|=", OrAssign),
            ("^=", XorAssign),
            ("+", Add),
            ("-", Sub),
            ("*", Mul),
            ("/", Quo),
            ("%", Rem),
            ("&", And),
            ("|", Or),
            ("^", Xor),
            ("<", Lss),
            (">", Gtr),
            ("=", Assign),
            ("!", Not),
            ("(", LParen),
            ("[", LBrack),
            ("{", LBrace),
            (",", Comma),
            (".", Period),
            (")", RParen),
            ("]", RBrack),
            ("}", RBrace),
            (";", Semicolon),
            (":", Colon),
            ("~", Tilde),
        ];

        let rest = &self.src[self.pos..];
        for (text, kind) in OPERATORS {
            if rest.starts_with(text) {
                self.pos += text.len();
                return Ok(*kind);
            }
        }
        let c = self.peek_char().unwrap_or('\0');
        Err(TokError::BadChar(c, self.pos))
    }
}
