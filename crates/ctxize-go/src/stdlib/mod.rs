//! Embedded declarations for the standard-library packages the rewriter
//! reasons about.
//!
//! These are declaration-only Go sources: enough for the checker to know the
//! method sets of `context.Context`, `*testing.T` and friends without a Go
//! installation. They are loaded like any other package but never rewritten.

/// One embedded source file.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedFile {
    pub name: &'static str,
    pub source: &'static str,
}

const CONTEXT: &[EmbeddedFile] = &[EmbeddedFile {
    name: "context.go",
    source: include_str!("context.go"),
}];

const ERRORS: &[EmbeddedFile] = &[EmbeddedFile {
    name: "errors.go",
    source: include_str!("errors.go"),
}];

const FMT: &[EmbeddedFile] = &[EmbeddedFile {
    name: "fmt.go",
    source: include_str!("fmt.go"),
}];

const TESTING: &[EmbeddedFile] = &[EmbeddedFile {
    name: "testing.go",
    source: include_str!("testing.go"),
}];

const TIME: &[EmbeddedFile] = &[EmbeddedFile {
    name: "time.go",
    source: include_str!("time.go"),
}];

/// The embedded files of a standard package, if there are any.
pub fn files(import_path: &str) -> Option<&'static [EmbeddedFile]> {
    match import_path {
        "context" => Some(CONTEXT),
        "errors" => Some(ERRORS),
        "fmt" => Some(FMT),
        "testing" => Some(TESTING),
        "time" => Some(TIME),
        _ => None,
    }
}

/// True for paths that look like standard-library packages: no dot in the
/// first path element.
pub fn is_standard(import_path: &str) -> bool {
    let first = import_path.split('/').next().unwrap_or(import_path);
    !first.contains('.') && !import_path.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctxize_go_syntax::parse_file;

    #[test]
    fn embedded_sources_parse() {
        for path in ["context", "errors", "fmt", "testing", "time"] {
            for file in files(path).expect("embedded package") {
                let ast = parse_file(file.source, 1)
                    .unwrap_or_else(|e| panic!("{}/{}: {}", path, file.name, e));
                assert_eq!(ast.package.name, path);
            }
        }
        assert!(files("net/http").is_none());
    }

    #[test]
    fn standard_paths() {
        assert!(is_standard("context"));
        assert!(is_standard("net/http"));
        assert!(!is_standard("github.com/x/y"));
        assert!(!is_standard("./foo"));
    }
}
