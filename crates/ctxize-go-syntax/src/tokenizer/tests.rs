// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{tokenize, TokError, TokenKind};

fn kinds(src: &str) -> Vec<(TokenKind, &str)> {
    let stream = tokenize(src).expect("tokenize error");
    stream
        .tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| (t.kind, t.text))
        .collect()
}

#[test]
fn test_identifiers_and_keywords() {
    assert_eq!(
        kinds("package foo"),
        vec![
            (TokenKind::Package, "package"),
            (TokenKind::Ident, "foo"),
            (TokenKind::Semicolon, ""),
        ]
    );
    assert_eq!(
        kinds("_x αβ"),
        vec![
            (TokenKind::Ident, "_x"),
            (TokenKind::Ident, "αβ"),
            (TokenKind::Semicolon, ""),
        ]
    );
}

#[test]
fn test_semicolon_insertion_after_line_end() {
    let toks = kinds("x := f()\nreturn\n}\n");
    assert_eq!(
        toks,
        vec![
            (TokenKind::Ident, "x"),
            (TokenKind::Define, ":="),
            (TokenKind::Ident, "f"),
            (TokenKind::LParen, "("),
            (TokenKind::RParen, ")"),
            (TokenKind::Semicolon, "\n"),
            (TokenKind::Return, "return"),
            (TokenKind::Semicolon, "\n"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Semicolon, "\n"),
        ]
    );
}

#[test]
fn test_no_semicolon_after_operator() {
    let toks = kinds("a +\nb");
    assert_eq!(
        toks,
        vec![
            (TokenKind::Ident, "a"),
            (TokenKind::Add, "+"),
            (TokenKind::Ident, "b"),
            (TokenKind::Semicolon, ""),
        ]
    );
}

#[test]
fn test_comments_are_collected_separately() {
    let stream = tokenize("// doc\nfunc F() {} // trailing\n/* block */").unwrap();
    let texts: Vec<_> = stream.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["// doc", "// trailing", "/* block */"]);
    assert_eq!(stream.comments[1].line, 2);
    assert!(stream.tokens.iter().all(|t| !t.text.starts_with("//")));
}

#[test]
fn test_line_comment_still_ends_statement() {
    let toks = kinds("x++ // bump\ny--");
    assert_eq!(toks[2], (TokenKind::Semicolon, "\n"));
    assert_eq!(toks[3], (TokenKind::Ident, "y"));
}

#[test]
fn test_multiline_block_comment_acts_as_newline() {
    let toks = kinds("x /*\n*/ y");
    assert_eq!(toks[1].0, TokenKind::Semicolon);
    assert_eq!(toks[2], (TokenKind::Ident, "y"));
}

#[test]
fn test_operators_longest_match() {
    let toks: Vec<TokenKind> = kinds("<<= &^ &^= ... <- := != &&")
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        toks,
        vec![
            TokenKind::ShlAssign,
            TokenKind::AndNot,
            TokenKind::AndNotAssign,
            TokenKind::Ellipsis,
            TokenKind::Arrow,
            TokenKind::Define,
            TokenKind::Neq,
            TokenKind::LAnd,
        ]
    );
}

#[test]
fn test_numbers() {
    let toks = kinds("1 0x1F 1_000 3.14 .5 1e9 0x1p-2 2i 0o17");
    let kinds_only: Vec<TokenKind> = toks.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds_only,
        vec![
            TokenKind::Int,
            TokenKind::Int,
            TokenKind::Int,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Float,
            TokenKind::Imag,
            TokenKind::Int,
            TokenKind::Semicolon,
        ]
    );
    assert_eq!(toks[6].1, "0x1p-2");
}

#[test]
fn test_strings_and_runes() {
    let toks = kinds(r#""a\"b" `raw
text` '\n'"#);
    assert_eq!(toks[0], (TokenKind::String, r#""a\"b""#));
    assert_eq!(toks[1], (TokenKind::String, "`raw\ntext`"));
    assert_eq!(toks[2], (TokenKind::Char, r"'\n'"));
}

#[test]
fn test_raw_string_tracks_lines() {
    let stream = tokenize("x := `a\nb`\ny").unwrap();
    let y = stream.tokens.iter().find(|t| t.text == "y").unwrap();
    assert_eq!(y.line, 3);
}

#[test]
fn test_errors() {
    assert_eq!(tokenize("\"abc").unwrap_err(), TokError::UnterminatedString(0));
    assert_eq!(tokenize("x /* y").unwrap_err(), TokError::UnterminatedComment(2));
    assert_eq!(tokenize("a $ b").unwrap_err(), TokError::BadChar('$', 2));
    assert!(matches!(tokenize("1e"), Err(TokError::BadNumber(0))));
}
