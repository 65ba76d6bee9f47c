// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use crate::nodes::{
    Decl, DeclKeyword, ExprKind, File, FuncDecl, NodeId, Spec, Stmt, StmtKind,
};
use crate::visitor::{walk_file, VisitResult, Visitor};
use crate::{parse_expr, parse_file, ParserError};

fn parse(src: &str) -> File {
    parse_file(src, 1).unwrap_or_else(|e| panic!("{}", crate::prettify_error(&e, src, "test.go")))
}

fn func<'a>(file: &'a File, name: &str) -> &'a FuncDecl {
    file.decls
        .iter()
        .find_map(|d| match d {
            Decl::Func(f) if f.name.name == name => Some(f),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no func {}", name))
}

fn body<'a>(f: &'a FuncDecl) -> &'a [Stmt] {
    &f.body.as_ref().expect("body").stmts
}

#[test]
fn test_func_signature() {
    let file = parse(
        "package p\n\nfunc (r *T) M(a, b int, s ...string) (n int, err error) {\n\treturn 0, nil\n}\n",
    );
    let m = func(&file, "M");
    let recv = m.recv.as_ref().expect("receiver");
    assert_eq!(recv.list[0].names[0].name, "r");
    assert!(matches!(recv.list[0].ty.kind, ExprKind::Star(_)));
    assert_eq!(m.ty.params.list.len(), 2);
    assert_eq!(m.ty.params.num_fields(), 3);
    assert!(matches!(
        m.ty.params.list[1].ty.kind,
        ExprKind::Ellipsis(Some(_))
    ));
    assert_eq!(m.ty.results.as_ref().map(|r| r.num_fields()), Some(2));
}

#[test]
fn test_generic_func() {
    let file = parse("package p\n\nfunc Map[T, U any](xs []T, f func(T) U) []U { return nil }\n");
    let f = func(&file, "Map");
    assert_eq!(f.ty.type_params.as_ref().map(|t| t.num_fields()), Some(2));
    assert_eq!(f.ty.params.num_fields(), 2);
}

#[test]
fn test_imports() {
    let file = parse("package p\n\nimport (\n\t\"fmt\"\n\tctx \"context\"\n)\n");
    let imports: Vec<_> = file
        .imports()
        .map(|i| (i.name.as_ref().map(|n| n.name.clone()), i.path_value()))
        .collect();
    assert_eq!(
        imports,
        vec![
            (None, "fmt".to_string()),
            (Some("ctx".to_string()), "context".to_string()),
        ]
    );
    match &file.decls[0] {
        Decl::Gen(g) => {
            assert_eq!(g.keyword, DeclKeyword::Import);
            assert!(g.grouped);
        }
        other => panic!("expected import decl, got {:?}", other),
    }
}

#[derive(Default)]
struct Ids(Vec<NodeId>);

impl<'ast> Visitor<'ast> for Ids {
    fn visit_func_decl(&mut self, node: &'ast FuncDecl) -> VisitResult {
        self.0.push(node.id);
        VisitResult::Continue
    }

    fn visit_call(&mut self, node: &'ast crate::nodes::CallExpr) -> VisitResult {
        self.0.push(node.id);
        VisitResult::Continue
    }

    fn visit_func_lit(&mut self, node: &'ast crate::nodes::FuncLit) -> VisitResult {
        self.0.push(node.id);
        VisitResult::Continue
    }
}

#[test]
fn test_node_ids_are_unique() {
    let file = parse("package p\n\nfunc F() {\n\tg(func() { h() })\n}\n\nfunc G() { F() }\n");
    let mut ids = Ids::default();
    walk_file(&mut ids, &file);
    assert_eq!(ids.0.len(), 6);
    assert!(ids.0.iter().all(|id| !id.is_none()));
    let mut sorted = ids.0.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.0.len());
}

#[test]
fn test_doc_and_trailing_comments() {
    let file = parse(
        "package p\n\n// F does things.\nfunc F() {\n\tx := 1 // one\n\t_ = x\n}\n",
    );
    let f = func(&file, "F");
    assert_eq!(f.comments.leading.len(), 1);
    assert_eq!(f.comments.leading[0].text(), "F does things.");
    let stmts = body(f);
    let trailing = stmts[0].comments.trailing.as_ref().expect("trailing comment");
    assert_eq!(trailing.list[0].text, "// one");
    assert!(stmts[1].comments.is_empty());
}

#[test]
fn test_blank_lines_recorded() {
    let file = parse("package p\n\nfunc F() {\n\ta()\n\n\tb()\n\tc()\n}\n");
    let stmts = body(func(&file, "F"));
    let blanks: Vec<bool> = stmts.iter().map(|s| s.blank_before).collect();
    assert_eq!(blanks, vec![false, true, false]);
}

#[test]
fn test_call_line_breaks() {
    let file = parse("package p\n\nfunc F() {\n\tg(1,\n\t\t2,\n\t)\n}\n");
    let StmtKind::Expr(x) = &body(func(&file, "F"))[0].kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Call(call) = &x.kind else {
        panic!("expected call");
    };
    let breaks: Vec<bool> = call.args.items.iter().map(|i| i.line_break).collect();
    assert_eq!(breaks, vec![false, true]);
    assert!(call.args.break_before_close);
    assert!(call.args.is_multiline());
}

#[test]
fn test_composite_literal_in_control_clause() {
    let file = parse(
        "package p\n\nfunc F() {\n\tfor _, v := range []int{1, 2} {\n\t\tif v == (T{}) {\n\t\t}\n\t}\n}\n",
    );
    let stmts = body(func(&file, "F"));
    let StmtKind::Range(r) = &stmts[0].kind else {
        panic!("expected range statement");
    };
    assert!(matches!(r.x.kind, ExprKind::CompositeLit(_)));
    assert!(matches!(r.body.stmts[0].kind, StmtKind::If(_)));
}

#[test]
fn test_type_switch_and_select() {
    let file = parse(
        "package p\n\nfunc F(x interface{}, c chan int) {\n\tswitch v := x.(type) {\n\tcase int, string:\n\t\t_ = v\n\tdefault:\n\t}\n\tselect {\n\tcase n := <-c:\n\t\t_ = n\n\tcase c <- 1:\n\t}\n}\n",
    );
    let stmts = body(func(&file, "F"));
    let StmtKind::TypeSwitch(ts) = &stmts[0].kind else {
        panic!("expected type switch");
    };
    assert_eq!(ts.body.clauses.len(), 2);
    assert_eq!(ts.body.clauses[0].list.len(), 2);
    assert!(ts.body.clauses[1].is_default);
    let StmtKind::Select(sel) = &stmts[1].kind else {
        panic!("expected select");
    };
    assert_eq!(sel.clauses.len(), 2);
    assert!(matches!(
        sel.clauses[1].comm.as_deref().map(|s| &s.kind),
        Some(StmtKind::Send { .. })
    ));
}

#[test]
fn test_labeled_statement() {
    let file = parse("package p\n\nfunc F() {\nouter:\n\tfor {\n\t\tbreak outer\n\t}\n}\n");
    let stmts = body(func(&file, "F"));
    let StmtKind::Labeled { label, stmt } = &stmts[0].kind else {
        panic!("expected labeled statement");
    };
    assert_eq!(label.name, "outer");
    assert!(matches!(stmt.kind, StmtKind::For(_)));
}

#[test]
fn test_grouped_values() {
    let file = parse("package p\n\nconst (\n\tA = iota\n\tB\n)\n\nvar x, y int = 1, 2\n");
    let Decl::Gen(consts) = &file.decls[0] else {
        panic!("expected const decl");
    };
    assert_eq!(consts.specs.len(), 2);
    let Decl::Gen(vars) = &file.decls[1] else {
        panic!("expected var decl");
    };
    let Spec::Value(v) = &vars.specs[0] else {
        panic!("expected value spec");
    };
    assert_eq!(v.names.len(), 2);
    assert!(v.ty.is_some());
    assert_eq!(v.values.len(), 2);
}

#[test]
fn test_block_layout() {
    let file = parse("package p\n\nfunc A() { return }\n\nfunc B() {\n\treturn\n}\n");
    assert!(!func(&file, "A").body.as_ref().expect("body").multiline);
    assert!(func(&file, "B").body.as_ref().expect("body").multiline);
}

#[test]
fn test_parse_expr_detached() {
    let x = parse_expr("context.TODO()").expect("parse error");
    let ExprKind::Call(call) = &x.kind else {
        panic!("expected call");
    };
    assert!(call.id.is_none());
    assert!(matches!(call.fun.kind, ExprKind::Selector { .. }));
}

#[test]
fn test_parse_expr_rejects_trailing_tokens() {
    assert!(parse_expr("a b").is_err());
}

#[test]
fn test_syntax_error() {
    let err = parse_file("package p\n\nfunc F() {\n\tx :=\n}\n", 1).expect_err("should fail");
    assert!(matches!(err, ParserError::SyntaxError { .. }));
    assert_eq!(err.line(), 5);
}

#[test]
fn test_missing_package_clause() {
    let err = parse_file("func F() {}\n", 1).expect_err("should fail");
    assert_eq!(err.line(), 1);
    assert!(err.message().contains("package"));
}
