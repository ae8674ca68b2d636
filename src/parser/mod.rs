// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symbol extraction from source text.
//!
//! Two strategies sit behind the same interface: tree-driven extraction via
//! tree-sitter for languages with a grammar crate, and regex pattern
//! extraction for the rest. Strategy selection is a capability lookup on the
//! language, not conditionals inside the traversal.

pub mod languages;
pub mod patterns;
pub mod symbols;

use std::collections::HashMap;

use anyhow::Result;
use tree_sitter::Parser;

use languages::{Language, PatternFlavor, Strategy};
use symbols::Symbol;

/// Per-file extraction result: symbols plus raw import/export statement text.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

/// Extract `(symbols, imports, exports)` from one file's content.
///
/// `parsers` caches tree-sitter parser instances per language across calls
/// within one indexing run. Errors here mean the single file failed to
/// parse; callers skip the file and keep indexing.
pub fn extract_file(
    content: &str,
    language: Language,
    path: &str,
    parsers: &mut HashMap<Language, Parser>,
) -> Result<Extraction> {
    match language.strategy() {
        Strategy::Tree => {
            use std::collections::hash_map::Entry;
            let parser = match parsers.entry(language) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => entry.insert(Parser::new()),
            };
            symbols::extract_tree(content, language, path, parser)
        }
        Strategy::Pattern(PatternFlavor::Basic) => Ok(patterns::extract_basic(content, path)),
        Strategy::Pattern(PatternFlavor::Markup) => Ok(patterns::extract_markup(content, path)),
    }
}
