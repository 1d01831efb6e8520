//! dplc-drv - Compiler driver for DPL.
//!
//! Orchestrates the pipeline: lex → parse → validate → generate. Each
//! stage owns its diagnostic buffer; the driver concatenates them in
//! stage order. Fatal short-circuits:
//!
//! - any lexical error stops the compilation,
//! - a parse with no AST stops it,
//! - validation errors skip generation.
//!
//! The compiler itself is a pure in-memory transformation; writing the
//! generated tree to disk is a separate concern used by the CLI.
//!
//! # Examples
//!
//! ```
//! let output = dplc_drv::compile(
//!     "pack \"demo\" namespace demo { func Load() { Say(\"Hi\") } }",
//! );
//!
//! assert!(output.diagnostics.is_empty());
//! assert!(output
//!     .files
//!     .iter()
//!     .any(|f| f.path == "data/demo/function/load.mcfunction"));
//! ```

mod error;

pub use error::WriteError;

pub use dplc_gen::GeneratedFile;
pub use dplc_sem::{PackSymbols, SymbolIndex};
pub use dplc_util::{Diagnostic, Severity};

use std::fs;
use std::path::Path;

use dplc_util::Handler;
use tracing::debug;

/// Everything one compilation produces.
#[derive(Debug, Default)]
pub struct CompileOutput {
    /// Generated files; empty when a fatal stage failed.
    pub files: Vec<GeneratedFile>,
    /// All diagnostics, concatenated in stage order.
    pub diagnostics: Vec<Diagnostic>,
    /// Exported symbols per namespace; empty when no AST was produced.
    pub symbols: SymbolIndex,
}

impl CompileOutput {
    /// True when any diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Compile DPL source into a datapack file set.
pub fn compile(source: &str) -> CompileOutput {
    let mut output = CompileOutput::default();

    let lex_handler = Handler::new();
    let tokens = dplc_lex::lex(source, &lex_handler);
    let lex_failed = lex_handler.has_errors();
    output.diagnostics.extend(lex_handler.take());
    debug!(tokens = tokens.len(), failed = lex_failed, "lexed");
    if lex_failed {
        return output;
    }

    let parse_handler = Handler::new();
    let script = dplc_par::parse(tokens, &parse_handler);
    output.diagnostics.extend(parse_handler.take());
    let Some(script) = script else {
        debug!("parse produced no AST");
        return output;
    };
    debug!(packs = script.len(), "parsed");

    let sem_handler = Handler::new();
    dplc_sem::validate(&script, &sem_handler);
    let validation_failed = sem_handler.has_errors();
    output.diagnostics.extend(sem_handler.take());
    output.symbols = dplc_sem::build_symbol_index(&script);
    if validation_failed {
        debug!("validation failed");
        return output;
    }

    let gen_handler = Handler::new();
    output.files = dplc_gen::generate(&script, &gen_handler);
    output.diagnostics.extend(gen_handler.take());
    debug!(files = output.files.len(), "generated");

    output
}

/// Write a generated file set under `root`, creating directories as
/// needed.
pub fn write_files(files: &[GeneratedFile], root: &Path) -> Result<(), WriteError> {
    for file in files {
        let path = root.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| WriteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.contents).map_err(|source| WriteError::Io {
            path: path.clone(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_is_fatal() {
        let output = compile("pack \"p\" namespace n { # }");
        assert!(output.has_errors());
        assert!(output.files.is_empty());
        assert!(output.symbols.is_empty());
    }

    #[test]
    fn test_no_ast_is_fatal() {
        let output = compile("not a pack at all");
        assert!(output.has_errors());
        assert!(output.files.is_empty());
    }

    #[test]
    fn test_validation_error_skips_generation() {
        let output = compile(
            "pack \"a\" namespace same { } pack \"b\" namespace same { }",
        );
        assert!(output.has_errors());
        assert!(output.files.is_empty());
        // the symbol index still reflects the parsed AST
        assert!(output.symbols.contains_key("same"));
    }

    #[test]
    fn test_generation_errors_keep_files() {
        // unknown variable: generation reports but still emits files
        let output = compile(
            "pack \"p\" namespace n { func F() { ghost += 1; } }",
        );
        assert!(output.has_errors());
        assert!(!output.files.is_empty());
    }

    #[test]
    fn test_diagnostics_in_stage_order() {
        let output = compile(
            "pack \"p\" namespace n { Item x { base_id = \"m:a\"; odd = 1; } func F() { ghost = 1; } }",
        );
        // parser warning precedes generator error
        let warn_pos = output
            .diagnostics
            .iter()
            .position(|d| d.severity == Severity::Warning)
            .unwrap();
        let err_pos = output
            .diagnostics
            .iter()
            .position(|d| d.severity == Severity::Error)
            .unwrap();
        assert!(warn_pos < err_pos);
    }

    #[test]
    fn test_clean_compile_roundtrip() {
        let output = compile(
            "pack \"demo\" namespace demo { global int score = 0 func Load() { score += 1; } }",
        );
        assert!(!output.has_errors());
        assert!(output.symbols["demo"].variables.contains("score"));
        assert!(output.symbols["demo"].functions.contains("load"));
    }
}
