// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declarations and whole files.

use super::expr::{expr, ident_list, parameters, plain_list, signature};
use super::stmt::{func_body, BodySep};
use super::{end_comments, leading_comments, single_line_size, trailing_comment, CodegenState};
use crate::nodes::{
    Decl, DeclKeyword, File, FuncDecl, GenDecl, ImportSpec, Spec, TypeSpec, ValueSpec,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclToken {
    Gen(DeclKeyword),
    Func,
}

fn decl_token(d: &Decl) -> DeclToken {
    match d {
        Decl::Gen(g) => DeclToken::Gen(g.keyword),
        Decl::Func(_) => DeclToken::Func,
    }
}

/// The declaration has a doc comment: a comment group directly above it.
fn has_doc(d: &Decl) -> bool {
    d.comments()
        .leading
        .last()
        .is_some_and(|g| !g.blank_after)
}

pub(crate) fn file(f: &File, state: &mut CodegenState) {
    leading_comments(&f.comments.leading, state);
    state.add_token("package");
    state.add_blank();
    state.add_token(&f.package.name);
    trailing_comment(f.comments.trailing.as_ref(), false, state);

    let mut prev = None;
    for d in &f.decls {
        let tok = decl_token(d);
        let blank = prev != Some(tok) || has_doc(d) || d.blank_before();
        let multi_line_func = match d {
            Decl::Func(func) => !func_is_one_line(func),
            Decl::Gen(_) => false,
        };
        if multi_line_func {
            state.formfeed();
        } else {
            state.newline();
        }
        if blank {
            state.newline();
        }
        leading_comments(&d.comments().leading, state);
        match d {
            Decl::Gen(g) => gen_decl(g, state),
            Decl::Func(func) => func_decl(func, state),
        }
        trailing_comment(d.comments().trailing.as_ref(), false, state);
        prev = Some(tok);
    }
    end_comments(&f.end_comments, state);
}

fn func_is_one_line(f: &FuncDecl) -> bool {
    if f.body.as_ref().is_some_and(|b| b.multiline) {
        return false;
    }
    single_line_size(|state| func_decl(f, state)).is_some()
}

pub(crate) fn func_decl(f: &FuncDecl, state: &mut CodegenState) {
    let start = state.column();
    state.add_token("func");
    state.add_blank();
    if let Some(recv) = &f.recv {
        parameters(recv, false, state);
        state.add_blank();
    }
    state.add_token(&f.name.name);
    signature(&f.ty, state);
    let header = state.column().saturating_sub(start);
    if let Some(body) = &f.body {
        func_body(header, BodySep::Vtab, body, state);
    }
}

pub(crate) fn gen_decl(d: &GenDecl, state: &mut CodegenState) {
    state.add_token(d.keyword.as_str());
    state.add_blank();

    if !d.grouped && d.specs.len() == 1 {
        spec(&d.specs[0], 1, state);
        return;
    }

    state.add_token("(");
    let n = d.specs.len();
    if n > 0 || !d.end_comments.is_empty() {
        state.add_indent();
        state.formfeed();
        let order = match d.keyword {
            DeclKeyword::Import => import_order(&d.specs),
            _ => d
                .specs
                .iter()
                .enumerate()
                .map(|(i, s)| (i, s.blank_before()))
                .collect(),
        };
        let keep_type = match d.keyword {
            DeclKeyword::Const | DeclKeyword::Var if n > 1 => Some(keep_type_column(&d.specs)),
            _ => None,
        };
        let mut prev_multi = false;
        for (k, &(i, blank_before)) in order.iter().enumerate() {
            if k > 0 {
                if prev_multi {
                    state.formfeed();
                } else {
                    state.newline();
                }
                if blank_before {
                    state.newline();
                }
            }
            let s = &d.specs[i];
            leading_comments(&s.comments().leading, state);
            let start = state.line_count();
            match (s, &keep_type) {
                (Spec::Value(v), Some(keep)) => value_spec(v, keep[i], state),
                _ => spec(s, n, state),
            }
            prev_multi = state.line_count() > start;
        }
        end_comments(&d.end_comments, state);
        state.dec_indent();
        if !state.at_line_start() {
            state.formfeed();
        }
    }
    state.add_token(")");
}

fn spec(s: &Spec, n: usize, state: &mut CodegenState) {
    match s {
        Spec::Import(i) => import_spec(i, state),
        Spec::Value(v) => {
            ident_list(&v.names, state);
            if let Some(ty) = &v.ty {
                state.add_blank();
                expr(ty, state);
            }
            if !v.values.is_empty() {
                state.add_blank();
                state.add_token("=");
                state.add_blank();
                plain_list(&v.values, 1, state);
            }
            trailing_comment(v.comments.trailing.as_ref(), false, state);
        }
        Spec::Type(t) => type_spec(t, n, state),
    }
}

fn import_spec(i: &ImportSpec, state: &mut CodegenState) {
    if let Some(name) = &i.name {
        state.add_token(&name.name);
        state.add_blank();
    }
    state.add_token(&i.path.value);
    trailing_comment(i.comments.trailing.as_ref(), false, state);
}

fn type_spec(t: &TypeSpec, n: usize, state: &mut CodegenState) {
    state.add_token(&t.name.name);
    if let Some(tparams) = &t.type_params {
        parameters(tparams, true, state);
    }
    if n == 1 {
        state.add_blank();
    } else {
        state.add_vtab();
    }
    if t.assign {
        state.add_token("=");
        state.add_blank();
    }
    expr(&t.ty, state);
    trailing_comment(t.comments.trailing.as_ref(), false, state);
}

/// A spec in a group of two or more constants or variables: names, type,
/// values and comment each get a column.
fn value_spec(v: &ValueSpec, keep_type: bool, state: &mut CodegenState) {
    ident_list(&v.names, state);
    let mut extra_tabs = 3;
    if v.ty.is_some() || keep_type {
        state.add_vtab();
        extra_tabs -= 1;
    }
    if let Some(ty) = &v.ty {
        expr(ty, state);
    }
    if !v.values.is_empty() {
        state.add_vtab();
        state.add_token("=");
        state.add_blank();
        plain_list(&v.values, 1, state);
        extra_tabs -= 1;
    }
    if v.comments.trailing.is_some() {
        for _ in 0..extra_tabs {
            state.add_vtab();
        }
        trailing_comment(v.comments.trailing.as_ref(), true, state);
    }
}

/// For each spec, whether to keep an (empty) type column. Within a run of
/// specs with values, the column is kept for all of them if any has a type.
fn keep_type_column(specs: &[Spec]) -> Vec<bool> {
    let mut keep = vec![false; specs.len()];
    let mut run_start: Option<usize> = None;
    let mut keep_type = false;
    for (i, s) in specs.iter().enumerate() {
        let Spec::Value(v) = s else {
            continue;
        };
        if !v.values.is_empty() {
            if run_start.is_none() {
                run_start = Some(i);
                keep_type = false;
            }
        } else if let Some(start) = run_start.take() {
            if keep_type {
                keep[start..i].iter_mut().for_each(|k| *k = true);
            }
        }
        if v.ty.is_some() {
            keep_type = true;
        }
    }
    if let Some(start) = run_start {
        if keep_type {
            keep[start..].iter_mut().for_each(|k| *k = true);
        }
    }
    keep
}

/// Print order for a group of imports: sorted by path (then local name)
/// within each run of specs not separated by a blank line, with exact
/// duplicates dropped. Each entry carries whether a blank line precedes it.
fn import_order(specs: &[Spec]) -> Vec<(usize, bool)> {
    let mut runs: Vec<Vec<usize>> = Vec::new();
    for (i, s) in specs.iter().enumerate() {
        if i == 0 || s.blank_before() {
            runs.push(Vec::new());
        }
        if let Some(run) = runs.last_mut() {
            run.push(i);
        }
    }

    let key = |i: usize| -> (String, Option<String>) {
        match &specs[i] {
            Spec::Import(imp) => (imp.path_value(), imp.name.as_ref().map(|n| n.name.clone())),
            _ => (String::new(), None),
        }
    };

    let mut order = Vec::new();
    for run in runs {
        let mut sorted = run;
        sorted.sort_by_key(|&i| key(i));
        let mut prev: Option<(String, Option<String>)> = None;
        let mut first = true;
        for i in sorted {
            let k = key(i);
            let bare = specs[i].comments().is_empty();
            if bare && prev.as_ref() == Some(&k) {
                continue;
            }
            order.push((i, first && !order.is_empty()));
            first = false;
            prev = Some(k);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use crate::{parse_file, print_file};

    fn fmt(src: &str) -> String {
        let file = parse_file(src, 1).expect("parse error");
        print_file(&file)
    }

    #[test]
    fn sorts_imports_within_runs() {
        let src = "package p\n\nimport (\n\t\"os\"\n\t\"fmt\"\n\n\t\"b/z\"\n\t\"a/y\"\n)\n";
        assert_eq!(
            fmt(src),
            "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n\n\t\"a/y\"\n\t\"b/z\"\n)\n"
        );
    }

    #[test]
    fn drops_duplicate_imports() {
        let src = "package p\n\nimport (\n\t\"fmt\"\n\t\"fmt\"\n)\n";
        assert_eq!(fmt(src), "package p\n\nimport (\n\t\"fmt\"\n)\n");
    }

    #[test]
    fn aligns_grouped_values() {
        let src = "package p\n\nvar (\n\ta = 1\n\tlonger = 2\n)\n";
        assert_eq!(
            fmt(src),
            "package p\n\nvar (\n\ta      = 1\n\tlonger = 2\n)\n"
        );
    }

    #[test]
    fn keeps_type_column_in_runs() {
        let src = "package p\n\nconst (\n\ta int = 1\n\tbb = 2\n)\n";
        assert_eq!(
            fmt(src),
            "package p\n\nconst (\n\ta  int = 1\n\tbb     = 2\n)\n"
        );
    }

    #[test]
    fn iota_run_without_values() {
        let src = "package p\n\nconst (\n\tA = iota\n\tB\n\tC\n)\n";
        assert_eq!(fmt(src), src);
    }

    #[test]
    fn blank_line_between_decl_kinds() {
        let src = "package p\nimport \"fmt\"\nvar x = fmt.Sprint()\nvar y = 2\nfunc F() {}\n";
        assert_eq!(
            fmt(src),
            "package p\n\nimport \"fmt\"\n\nvar x = fmt.Sprint()\nvar y = 2\n\nfunc F() {}\n"
        );
    }

    #[test]
    fn aligns_one_line_func_bodies() {
        let src = "package p\n\nfunc (t T) A() int { return 1 }\nfunc (t T) Long() int { return 2 }\n";
        assert_eq!(
            fmt(src),
            "package p\n\nfunc (t T) A() int    { return 1 }\nfunc (t T) Long() int { return 2 }\n"
        );
    }

    #[test]
    fn grouped_types_align() {
        let src = "package p\n\ntype (\n\tA int\n\tLonger string\n)\n";
        assert_eq!(
            fmt(src),
            "package p\n\ntype (\n\tA      int\n\tLonger string\n)\n"
        );
    }
}
