// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the Go parser and printer.
//!
//! Source that is already in canonical (gofmt) form must print back
//! unchanged: `print_file(parse_file(code)) == code`. The rewriter relies on
//! this to leave untouched parts of a file exactly as they were.
//!
//! # Test Organization
//!
//! - Fixture-based tests: One test per fixture file in `tests/fixtures/`
//! - Inline tests: Individual cases for specific constructs
//! - Formatting tests: Non-canonical input and its canonical form

use ctxize_go_syntax::{parse_file, prettify_error, print_file};
use difference::assert_diff;
use itertools::Itertools;
use std::path::PathBuf;

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").replace('\t', "→").lines().join("↩\n")
}

fn format(input: &str, label: &str) -> String {
    match parse_file(input, 1) {
        Ok(file) => print_file(&file),
        Err(e) => panic!("{}", prettify_error(&e, input, label)),
    }
}

fn assert_formats_to(input: &str, expected: &str, label: &str) {
    let generated = format(input, label);
    if generated != expected {
        let got = visualize(&generated);
        let expected = visualize(expected);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn assert_roundtrip(input: &str, label: &str) {
    assert_formats_to(input, input, label);
}

fn assert_roundtrip_fixture(fixture_name: &str) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(fixture_name);

    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", fixture_name, e));

    assert_roundtrip(&contents, fixture_name);
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_fixture_inventory() {
    assert_roundtrip_fixture("inventory.go");
}

#[test]
fn roundtrip_fixture_shapes() {
    assert_roundtrip_fixture("shapes.go");
}

#[test]
fn roundtrip_fixture_server() {
    assert_roundtrip_fixture("server.go");
}

// =============================================================================
// Inline round-trip tests
// =============================================================================

#[test]
fn roundtrip_binary_spacing() {
    assert_roundtrip(
        "package p\n\nfunc F(a, b, c int) int {\n\tx := a*b + c\n\ty := f(a+b, c)\n\tz := (a + b) * c\n\treturn x<<2 | y&z\n}\n",
        "binary",
    );
}

#[test]
fn roundtrip_composite_key_alignment() {
    assert_roundtrip(
        "package p\n\nvar cfg = Config{\n\tName:    \"ctx\",\n\tPkgPath: \"context\",\n}\n",
        "keys",
    );
}

#[test]
fn roundtrip_nested_literals() {
    assert_roundtrip(
        "package p\n\nvar tests = []struct {\n\tspec string\n\tok   bool\n}{\n\t{spec: \"a\", ok: true},\n\t{\n\t\tspec: \"b\",\n\t},\n}\n",
        "nested",
    );
}

#[test]
fn roundtrip_comments_in_blocks() {
    assert_roundtrip(
        "package p\n\nfunc F() {\n\t// leading\n\tx := 1 // trailing\n\n\t// separated\n\t_ = x\n\t// last\n}\n",
        "comments",
    );
}

#[test]
fn roundtrip_labels_and_branches() {
    assert_roundtrip(
        "package p\n\nfunc F(xs [][]int) {\nouter:\n\tfor _, row := range xs {\n\t\tfor _, x := range row {\n\t\t\tif x < 0 {\n\t\t\t\tcontinue outer\n\t\t\t}\n\t\t}\n\t}\n}\n",
        "labels",
    );
}

#[test]
fn roundtrip_generics() {
    assert_roundtrip(
        "package p\n\ntype List[T any] struct {\n\thead *node[T]\n}\n\nfunc Map[T, U any](xs []T, f func(T) U) []U {\n\treturn nil\n}\n",
        "generics",
    );
}

#[test]
fn roundtrip_channels_and_select() {
    assert_roundtrip(
        "package p\n\nfunc F(in <-chan int, out chan<- int) {\n\tfor {\n\t\tselect {\n\t\tcase v, ok := <-in:\n\t\t\tif !ok {\n\t\t\t\treturn\n\t\t\t}\n\t\t\tout <- v\n\t\t}\n\t}\n}\n",
        "channels",
    );
}

#[test]
fn roundtrip_empty_bodies() {
    assert_roundtrip(
        "package p\n\ntype T struct{}\n\ntype I interface{}\n\nfunc F() {}\n\nfunc G() {\n\tselect {}\n}\n",
        "empty",
    );
}

// =============================================================================
// Formatting tests
// =============================================================================

#[test]
fn format_normalizes_spacing() {
    assert_formats_to(
        "package p\nfunc F(a int,b int)(int){return a+b}\n",
        "package p\n\nfunc F(a int, b int) int { return a + b }\n",
        "spacing",
    );
}

#[test]
fn format_reindents_with_tabs() {
    assert_formats_to(
        "package p\n\nfunc F() {\n    if true {\n        g()\n    }\n}\n",
        "package p\n\nfunc F() {\n\tif true {\n\t\tg()\n\t}\n}\n",
        "indent",
    );
}

#[test]
fn format_strips_control_clause_parens() {
    assert_formats_to(
        "package p\n\nfunc F(x int) {\n\tif (x > 0) {\n\t\tg()\n\t}\n}\n",
        "package p\n\nfunc F(x int) {\n\tif x > 0 {\n\t\tg()\n\t}\n}\n",
        "parens",
    );
}

#[test]
fn format_collapses_blank_lines() {
    assert_formats_to(
        "package p\n\n\n\nvar x = 1\n\n\n\nvar y = 2\n",
        "package p\n\nvar x = 1\n\nvar y = 2\n",
        "blanks",
    );
}

#[test]
fn format_keeps_closing_brace_placement() {
    assert_formats_to(
        "package p\n\nvar xs = []int{\n\t1,\n\t2}\n",
        "package p\n\nvar xs = []int{\n\t1,\n\t2}\n",
        "comma",
    );
    assert_formats_to(
        "package p\n\nvar xs = []int{\n\t1,\n\t2,\n}\n",
        "package p\n\nvar xs = []int{\n\t1,\n\t2,\n}\n",
        "comma",
    );
}
