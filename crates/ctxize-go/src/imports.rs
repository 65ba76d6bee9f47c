//! Import editing.

use ctxize_go_syntax::{Comments, Decl, DeclKeyword, File, GenDecl, ImportSpec, Span, Spec};

use crate::stdlib;

/// Number of path separators in the longest common prefix of `a` and `b`.
fn match_len(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .filter(|(x, _)| *x == b'/')
        .count()
}

fn imports_c(decl: &GenDecl) -> bool {
    decl.specs
        .iter()
        .any(|s| matches!(s, Spec::Import(i) if i.path_value() == "C"))
}

/// Add `import "<path>"` to `file` unless the path is already imported.
/// Returns true if the file changed.
///
/// The new spec joins the import group sharing the longest path prefix
/// with `path`. Standard-library paths with no shared prefix go after the
/// first import; others after the first third-party import. A file without
/// imports gets a new declaration after the package clause.
pub fn add_import(file: &mut File, path: &str) -> bool {
    let present = file.imports().any(|spec| {
        spec.path_value() == path
            && !matches!(spec.name.as_ref().map(|n| n.name.as_str()), Some("_" | "."))
    });
    if present {
        return false;
    }

    let third_party = !stdlib::is_standard(path);
    let mut best: Option<(usize, usize)> = None;
    let mut best_len: Option<usize> = None;
    let mut empty_decl = None;
    let mut last_import = None;
    for (d, decl) in file.decls.iter().enumerate() {
        let Decl::Gen(gen) = decl else { continue };
        if gen.keyword != DeclKeyword::Import {
            continue;
        }
        last_import = Some(d);
        if imports_c(gen) {
            continue;
        }
        if gen.specs.is_empty() && best.is_none() {
            empty_decl = Some(d);
        }
        let mut seen_third_party = false;
        for (s, spec) in gen.specs.iter().enumerate() {
            let Spec::Import(imp) = spec else { continue };
            let existing = imp.path_value();
            let n = match_len(&existing, path);
            let better = best_len.is_none_or(|b| n > b)
                || (best_len == Some(0) && !seen_third_party && third_party);
            if better {
                best_len = Some(n);
                best = Some((d, s));
            }
            seen_third_party |= !stdlib::is_standard(&existing);
        }
    }

    match (best, empty_decl) {
        (Some((d, s)), _) => {
            if let Decl::Gen(gen) = &mut file.decls[d] {
                gen.specs.insert(s + 1, Spec::Import(ImportSpec::new(path)));
                gen.grouped = gen.grouped || gen.specs.len() > 1;
            }
        }
        (None, Some(d)) => {
            if let Decl::Gen(gen) = &mut file.decls[d] {
                gen.specs.push(Spec::Import(ImportSpec::new(path)));
            }
        }
        (None, None) => {
            let decl = Decl::Gen(GenDecl {
                keyword: DeclKeyword::Import,
                specs: vec![Spec::Import(ImportSpec::new(path))],
                grouped: false,
                span: Span::NONE,
                comments: Comments::default(),
                blank_before: false,
                end_comments: Vec::new(),
            });
            let at = last_import.map_or(0, |i| i + 1);
            file.decls.insert(at, decl);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxize_go_syntax::{parse_file, print_file};

    fn add(src: &str, path: &str) -> (bool, String) {
        let mut file = parse_file(src, 1).expect("parse error");
        let changed = add_import(&mut file, path);
        (changed, print_file(&file))
    }

    #[test]
    fn creates_declaration_after_package_clause() {
        let (changed, out) = add("package p\n\nfunc F() {}\n", "context");
        assert!(changed);
        assert_eq!(out, "package p\n\nimport \"context\"\n\nfunc F() {}\n");
    }

    #[test]
    fn groups_single_import() {
        let (_, out) = add("package p\n\nimport \"fmt\"\n\nvar _ = fmt.Sprint\n", "context");
        assert_eq!(
            out,
            "package p\n\nimport (\n\t\"context\"\n\t\"fmt\"\n)\n\nvar _ = fmt.Sprint\n"
        );
    }

    #[test]
    fn already_imported_is_a_no_op() {
        let src = "package p\n\nimport stdctx \"context\"\n\nvar _ stdctx.Context\n";
        let (changed, out) = add(src, "context");
        assert!(!changed);
        assert_eq!(out, src);
    }

    #[test]
    fn blank_import_does_not_count() {
        let (changed, out) = add("package p\n\nimport _ \"context\"\n", "context");
        assert!(changed);
        assert!(out.contains("\t\"context\"\n"));
        assert!(out.contains("\t_ \"context\"\n"));
    }

    #[test]
    fn joins_the_group_with_the_longest_prefix() {
        let src = "package p\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/a/b\"\n\t\"other.org/z\"\n)\n";
        let (_, out) = add(src, "example.com/a/c");
        assert_eq!(
            out,
            "package p\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/a/b\"\n\t\"example.com/a/c\"\n\t\"other.org/z\"\n)\n"
        );
        let (_, out) = add(src, "context");
        assert_eq!(
            out,
            "package p\n\nimport (\n\t\"context\"\n\t\"fmt\"\n\n\t\"example.com/a/b\"\n\t\"other.org/z\"\n)\n"
        );
    }

    #[test]
    fn prefix_counts_whole_elements() {
        assert_eq!(match_len("example.com/a/b", "example.com/a/c"), 2);
        assert_eq!(match_len("fmt", "context"), 0);
        assert_eq!(match_len("go-qux", "go-quux"), 0);
    }
}
