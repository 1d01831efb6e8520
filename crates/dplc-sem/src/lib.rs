//! dplc-sem - Static validation for DPL scripts.
//!
//! Runs after parsing and before generation: checks namespace and
//! function-name character classes, and rejects duplicates. Any error
//! reported here aborts generation.
//!
//! # Examples
//!
//! ```
//! use dplc_sem::validate;
//! use dplc_util::Handler;
//!
//! let handler = Handler::new();
//! let tokens = dplc_lex::lex("pack \"p\" namespace n { }", &handler);
//! let script = dplc_par::parse(tokens, &handler).unwrap();
//!
//! validate(&script, &handler);
//! assert!(!handler.has_errors());
//! ```

mod symbols;

pub use symbols::{build_symbol_index, PackSymbols, SymbolIndex};

use std::collections::HashSet;

use dplc_par::Script;
use dplc_util::Handler;

/// True when `namespace` matches `[a-z0-9_.-]+`.
pub fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'))
}

/// True when `name` matches `[a-z0-9_/.+-]+`.
pub fn is_valid_function_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '/' | '.' | '+' | '-')
        })
}

/// Validate a parsed script, reporting through `handler`.
pub fn validate(script: &Script, handler: &Handler) {
    let mut seen_namespaces: HashSet<&str> = HashSet::new();

    for pack in script {
        if !is_valid_namespace(&pack.namespace) {
            handler.error(
                format!(
                    "invalid namespace '{}': only [a-z0-9_.-] are allowed",
                    pack.namespace
                ),
                pack.span,
            );
        }
        if !seen_namespaces.insert(pack.namespace.as_str()) {
            handler.error(
                format!("duplicate namespace '{}'", pack.namespace),
                pack.span,
            );
        }

        let mut seen_functions: HashSet<&str> = HashSet::new();
        for function in &pack.functions {
            if !is_valid_function_name(&function.name) {
                handler.error(
                    format!(
                        "invalid function name '{}': only [a-z0-9_/.+-] are allowed",
                        function.raw_name
                    ),
                    function.span,
                );
            }
            if !seen_functions.insert(function.name.as_str()) {
                handler.error(
                    format!(
                        "duplicate function '{}' in namespace '{}'",
                        function.name, pack.namespace
                    ),
                    function.span,
                );
            }
        }

        let mut seen_globals: HashSet<&str> = HashSet::new();
        for global in &pack.globals {
            if !seen_globals.insert(global.name.as_str()) {
                handler.error(
                    format!(
                        "duplicate global '{}' in namespace '{}'",
                        global.name, pack.namespace
                    ),
                    global.span,
                );
            }
        }

        let mut seen_items: HashSet<&str> = HashSet::new();
        for item in &pack.items {
            if !seen_items.insert(item.name.as_str()) {
                handler.error(
                    format!(
                        "duplicate item '{}' in namespace '{}'",
                        item.name, pack.namespace
                    ),
                    item.span,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str) -> Handler {
        let handler = Handler::new();
        let tokens = dplc_lex::lex(source, &handler);
        let script = dplc_par::parse(tokens, &handler).unwrap();
        validate(&script, &handler);
        handler
    }

    #[test]
    fn test_valid_namespace_charset() {
        assert!(is_valid_namespace("my_pack.v2-x"));
        assert!(!is_valid_namespace("MyPack"));
        assert!(!is_valid_namespace(""));
        assert!(!is_valid_namespace("spaced out"));
    }

    #[test]
    fn test_valid_function_charset() {
        assert!(is_valid_function_name("load"));
        assert!(is_valid_function_name("sub/dir.fn+x-y"));
        assert!(!is_valid_function_name("Upper"));
    }

    #[test]
    fn test_clean_script_passes() {
        let handler = check("pack \"p\" namespace n { func Load() { } }");
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_duplicate_namespace_rejected() {
        let handler = check(
            "pack \"a\" namespace same { } pack \"b\" namespace same { }",
        );
        assert_eq!(handler.error_count(), 1);
    }

    #[test]
    fn test_duplicate_function_rejected() {
        // Lowercasing makes Load and LOAD collide.
        let handler = check(
            "pack \"p\" namespace n { func Load() { } func LOAD() { } }",
        );
        assert!(handler.has_errors());
    }

    #[test]
    fn test_namespace_charset_violation_rejected() {
        // The parser lowercases namespaces, so a charset violation needs
        // a character outside [a-z0-9_.-] that survives lowercasing; a
        // colon lexes into the identifier and does exactly that.
        let handler = check("pack \"p\" namespace bad:ns { }");
        assert!(handler.has_errors());
    }

    #[test]
    fn test_duplicate_global_rejected() {
        let handler = check("pack \"p\" namespace n { int x = 1 int x = 2 }");
        assert!(handler.has_errors());
    }
}
