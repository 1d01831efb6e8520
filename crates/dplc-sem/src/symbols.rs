//! Symbol index construction.
//!
//! The index is part of the compiler's public output: per namespace, the
//! pack title and the sets of variable, function, and item names. Editor
//! tooling consumes it for completion.

use indexmap::{IndexMap, IndexSet};

use dplc_par::Script;

/// Symbols exported by one pack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSymbols {
    pub title: String,
    pub variables: IndexSet<String>,
    pub functions: IndexSet<String>,
    pub items: IndexSet<String>,
}

/// Namespace to exported symbols, in pack order.
pub type SymbolIndex = IndexMap<String, PackSymbols>;

/// Build the symbol index for a parsed script.
pub fn build_symbol_index(script: &Script) -> SymbolIndex {
    let mut index = SymbolIndex::new();

    for pack in script {
        let entry = index
            .entry(pack.namespace.clone())
            .or_insert_with(PackSymbols::default);
        entry.title = pack.title.clone();

        for global in &pack.globals {
            entry.variables.insert(global.name.clone());
        }
        for function in &pack.functions {
            entry.functions.insert(function.name.clone());
        }
        for item in &pack.items {
            entry.items.insert(item.name.clone());
        }
    }

    index
}
