//! Variable and function specifications.
//!
//! A [`VarSpec`] names the parameter to thread through a call graph, and a
//! [`FuncSpec`] names the function or method that receives it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{ObjectId, TypeStore};

// ============================================================================
// Error Types
// ============================================================================

/// A specification string that does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("invalid variable spec {input:?}: expected \"<name> <path>.<type> = <expr>\"")]
    InvalidVarSpec { input: String },

    #[error("invalid function spec {input:?}: expected \"<pkg>[.<type>].<name>\"")]
    InvalidFuncSpec { input: String },
}

static VAR_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\p{L}_][\p{L}\p{N}_]*) +(\S+?)\.([\p{L}_][\p{L}\p{N}_]*) *= *(.+)$")
        .expect("variable spec pattern")
});

static FUNC_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)(?:\.([\p{L}_][\p{L}\p{N}_]*))?\.([\p{L}_][\p{L}\p{N}_]*)$")
        .expect("function spec pattern")
});

// ============================================================================
// VarSpec
// ============================================================================

/// The variable prepended to parameter and argument lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    /// Name of the parameter and of synthesized variables, e.g. `ctx`.
    pub name: String,
    /// Import path of the package declaring the type, e.g. `context`.
    pub pkg_path: String,
    /// Name of the type within that package, e.g. `Context`.
    pub type_name: String,
    /// Expression initializing synthesized variables at call sites.
    pub init_expr: String,
}

impl Default for VarSpec {
    fn default() -> Self {
        VarSpec {
            name: "ctx".to_string(),
            pkg_path: "context".to_string(),
            type_name: "Context".to_string(),
            init_expr: "context.TODO()".to_string(),
        }
    }
}

impl VarSpec {
    /// Parse `<name> <path>.<type> = <expr>`.
    ///
    /// The type name is whatever follows the last `.` before the `=`, so the
    /// package path may itself contain dots and slashes.
    ///
    /// # Example
    ///
    /// ```
    /// use ctxize_go::spec::VarSpec;
    ///
    /// let spec = VarSpec::parse("v path/to/pkg.T = f()").unwrap();
    /// assert_eq!(spec.pkg_path, "path/to/pkg");
    /// assert_eq!(spec.type_name, "T");
    /// ```
    pub fn parse(s: &str) -> Result<VarSpec, SpecError> {
        let caps = VAR_SPEC
            .captures(s.trim())
            .ok_or_else(|| SpecError::InvalidVarSpec {
                input: s.to_string(),
            })?;
        Ok(VarSpec {
            name: caps[1].to_string(),
            pkg_path: caps[2].to_string(),
            type_name: caps[3].to_string(),
            init_expr: caps[4].trim_end().to_string(),
        })
    }

    /// True for the standard `context.Context` type, the one case where a
    /// leftover `ctx := context.TODO()` stub is pruned.
    pub fn is_context(&self) -> bool {
        self.pkg_path == "context" && self.type_name == "Context"
    }
}

impl fmt::Display for VarSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{} = {}",
            self.name, self.pkg_path, self.type_name, self.init_expr
        )
    }
}

// ============================================================================
// FuncSpec
// ============================================================================

/// A fully qualified function, or a method of a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncSpec {
    pub pkg_path: String,
    /// Receiver type name; empty for a free function.
    pub type_name: String,
    pub func_name: String,
}

impl FuncSpec {
    /// A free function `pkg_path.func_name`.
    pub fn func(pkg_path: impl Into<String>, func_name: impl Into<String>) -> Self {
        FuncSpec {
            pkg_path: pkg_path.into(),
            type_name: String::new(),
            func_name: func_name.into(),
        }
    }

    /// A method `pkg_path.type_name.func_name`.
    pub fn method(
        pkg_path: impl Into<String>,
        type_name: impl Into<String>,
        func_name: impl Into<String>,
    ) -> Self {
        FuncSpec {
            pkg_path: pkg_path.into(),
            type_name: type_name.into(),
            func_name: func_name.into(),
        }
    }

    /// Parse `<pkg>[.<type>].<name>`.
    ///
    /// # Example
    ///
    /// ```
    /// use ctxize_go::spec::FuncSpec;
    ///
    /// let spec = FuncSpec::parse("example.com/store.DB.Get").unwrap();
    /// assert_eq!(spec.pkg_path, "example.com/store");
    /// assert_eq!(spec.type_name, "DB");
    /// assert_eq!(spec.func_name, "Get");
    /// ```
    pub fn parse(s: &str) -> Result<FuncSpec, SpecError> {
        let caps = FUNC_SPEC
            .captures(s.trim())
            .ok_or_else(|| SpecError::InvalidFuncSpec {
                input: s.to_string(),
            })?;
        Ok(FuncSpec {
            pkg_path: caps[1].to_string(),
            type_name: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            func_name: caps[3].to_string(),
        })
    }

    pub fn is_method(&self) -> bool {
        !self.type_name.is_empty()
    }

    /// Readings of this spec to try in order. `example.com.F` parses as
    /// method `com.F` of package `example`; the second reading folds the
    /// receiver back into the package path.
    pub fn alternatives(&self) -> Vec<FuncSpec> {
        let mut specs = vec![self.clone()];
        if self.is_method() {
            specs.push(FuncSpec::func(
                format!("{}.{}", self.pkg_path, self.type_name),
                self.func_name.clone(),
            ));
        }
        specs
    }

    /// The canonical name against which candidate functions are compared,
    /// with the package path as resolved by the loader.
    pub fn canonical(&self, pkg_path: &str) -> String {
        if self.is_method() {
            format!("{}.{}.{}", pkg_path, self.type_name, self.func_name)
        } else {
            format!("{}.{}", pkg_path, self.func_name)
        }
    }

    /// True if `func` is the function or method this spec names.
    ///
    /// Methods compare as `<receiver type>.<name>` with any pointer marker
    /// dropped, so `pkg.T.M` matches both `func (T) M()` and
    /// `func (*T) M()`. A method spec never matches a free function and
    /// vice versa.
    pub fn matches(&self, store: &TypeStore, pkg_path: &str, func: ObjectId) -> bool {
        store
            .func_full_name(func)
            .is_some_and(|(name, is_method)| {
                is_method == self.is_method() && name == self.canonical(pkg_path)
            })
    }
}

impl fmt::Display for FuncSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical(&self.pkg_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_var_spec() {
        let spec = VarSpec::parse("ctx context.Context = context.TODO()").unwrap();
        assert_eq!(spec, VarSpec::default());
        assert!(spec.is_context());
    }

    #[test]
    fn parse_var_spec_with_path() {
        let spec = VarSpec::parse("v path/to/pkg.T = f()").unwrap();
        assert_eq!(
            spec,
            VarSpec {
                name: "v".to_string(),
                pkg_path: "path/to/pkg".to_string(),
                type_name: "T".to_string(),
                init_expr: "f()".to_string(),
            }
        );
        assert!(!spec.is_context());
    }

    #[test]
    fn parse_var_spec_dotted_path_and_spacing() {
        let spec = VarSpec::parse("  t example.com/x.y.T=New(1, 2)  ").unwrap();
        assert_eq!(spec.name, "t");
        assert_eq!(spec.pkg_path, "example.com/x.y");
        assert_eq!(spec.type_name, "T");
        assert_eq!(spec.init_expr, "New(1, 2)");
    }

    #[test]
    fn parse_var_spec_rejects_malformed() {
        for input in ["ctx context.Context", "ctx Context = x", "1x a.T = 0", ""] {
            assert!(
                matches!(VarSpec::parse(input), Err(SpecError::InvalidVarSpec { .. })),
                "{:?} should not parse",
                input
            );
        }
    }

    #[test]
    fn var_spec_display_round_trips() {
        let spec = VarSpec::parse("t go-qux.T = 0").unwrap();
        assert_eq!(spec.to_string(), "t go-qux.T = 0");
        assert_eq!(VarSpec::parse(&spec.to_string()).unwrap(), spec);
    }

    #[test]
    fn parse_func_spec() {
        assert_eq!(FuncSpec::parse("foo.F").unwrap(), FuncSpec::func("foo", "F"));
        assert_eq!(
            FuncSpec::parse("foo.T.M").unwrap(),
            FuncSpec::method("foo", "T", "M")
        );
        assert_eq!(
            FuncSpec::parse("github.com/a/b.F").unwrap(),
            FuncSpec::func("github.com/a/b", "F")
        );
        assert_eq!(
            FuncSpec::parse("github.com/a/b.T.M").unwrap(),
            FuncSpec::method("github.com/a/b", "T", "M")
        );
    }

    #[test]
    fn parse_func_spec_rejects_single_segment() {
        assert!(matches!(
            FuncSpec::parse("F"),
            Err(SpecError::InvalidFuncSpec { .. })
        ));
        assert!(FuncSpec::parse("foo.").is_err());
    }

    #[test]
    fn func_spec_alternatives_fold_receiver() {
        let spec = FuncSpec::parse("example.com.F").unwrap();
        assert_eq!(spec, FuncSpec::method("example", "com", "F"));
        assert_eq!(
            spec.alternatives(),
            vec![spec.clone(), FuncSpec::func("example.com", "F")]
        );
        assert_eq!(FuncSpec::func("foo", "F").alternatives().len(), 1);
    }

    #[test]
    fn func_spec_display() {
        assert_eq!(FuncSpec::func("foo", "F").to_string(), "foo.F");
        assert_eq!(FuncSpec::method("a/b", "T", "M").to_string(), "a/b.T.M");
        assert_eq!(FuncSpec::func("./foo", "F").canonical("m/foo"), "m/foo.F");
    }
}
