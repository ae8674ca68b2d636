// SPDX-License-Identifier: MIT OR Apache-2.0

//! Symbol name search with tiered heuristic scoring.

use serde::Serialize;

use crate::indexer::build::ProjectIndex;
use crate::parser::symbols::{Symbol, SymbolKind};
use crate::tokenize::tokenize;

const SCORE_EXACT: f64 = 10.0;
const SCORE_PREFIX: f64 = 7.0;
const SCORE_SUBSTRING: f64 = 5.0;
const SCORE_OVERLAP_WEIGHT: f64 = 3.0;

#[derive(Debug, Clone, Serialize)]
pub struct SymbolMatch {
    #[serde(flatten)]
    pub symbol: Symbol,
    pub score: f64,
}

/// Rank symbols by name against a query, optionally restricted to one kind.
///
/// The first rule that applies wins: exact case-insensitive match (10), name
/// starts with the query (7), name contains the query (5), otherwise token
/// overlap scaled to 3. Non-matching symbols are excluded.
pub fn search_symbols(
    index: &ProjectIndex,
    query: &str,
    kind: Option<SymbolKind>,
    max_results: usize,
) -> Vec<SymbolMatch> {
    let query_lower = query.to_lowercase();
    let query_tokens = tokenize(query);

    let mut matches: Vec<SymbolMatch> = index
        .files
        .values()
        .flat_map(|file| file.symbols.iter())
        .filter(|symbol| kind.map_or(true, |wanted| symbol.kind == wanted))
        .filter_map(|symbol| {
            let score = score_name(&symbol.name, &query_lower, &query_tokens)?;
            Some(SymbolMatch {
                symbol: symbol.clone(),
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(max_results);
    matches
}

fn score_name(name: &str, query_lower: &str, query_tokens: &[String]) -> Option<f64> {
    if query_lower.is_empty() {
        return None;
    }
    let name_lower = name.to_lowercase();

    if name_lower == *query_lower {
        return Some(SCORE_EXACT);
    }
    if name_lower.starts_with(query_lower) {
        return Some(SCORE_PREFIX);
    }
    if name_lower.contains(query_lower) {
        return Some(SCORE_SUBSTRING);
    }

    if query_tokens.is_empty() {
        return None;
    }
    let name_tokens = tokenize(name);
    let overlap = query_tokens
        .iter()
        .filter(|q| {
            name_tokens
                .iter()
                .any(|n| n.contains(q.as_str()) || q.contains(n.as_str()))
        })
        .count();
    if overlap == 0 {
        return None;
    }
    Some(overlap as f64 / query_tokens.len() as f64 * SCORE_OVERLAP_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::indexer::build::IndexedFile;
    use crate::parser::languages::Language;

    fn symbol(name: &str, kind: SymbolKind) -> Symbol {
        Symbol {
            name: name.to_string(),
            kind,
            path: "lib.rs".to_string(),
            start_line: 1,
            end_line: 1,
            signature: format!("fn {name}()"),
            parent: None,
            doc_comment: None,
            preview: String::new(),
        }
    }

    fn index_with(symbols: Vec<Symbol>) -> ProjectIndex {
        let symbol_count = symbols.len();
        let file = IndexedFile {
            language: Language::Rust,
            hash: "0".repeat(16),
            size: 0,
            symbols,
            imports: Vec::new(),
            exports: Vec::new(),
        };
        let mut files = BTreeMap::new();
        files.insert("lib.rs".to_string(), file);
        ProjectIndex {
            root: PathBuf::from("/proj"),
            indexed_at: 0,
            file_count: 1,
            symbol_count,
            files,
            vocabulary: BTreeMap::new(),
        }
    }

    #[test]
    fn test_tier_ordering() {
        let index = index_with(vec![
            symbol("barFoo", SymbolKind::Function),
            symbol("fooBar", SymbolKind::Function),
            symbol("foo", SymbolKind::Function),
        ]);

        let results = search_symbols(&index, "foo", None, 10);
        let scored: Vec<(&str, f64)> = results
            .iter()
            .map(|m| (m.symbol.name.as_str(), m.score))
            .collect();
        assert_eq!(scored, vec![("foo", 10.0), ("fooBar", 7.0), ("barFoo", 5.0)]);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let index = index_with(vec![symbol("ConfigParser", SymbolKind::Class)]);
        let results = search_symbols(&index, "configparser", None, 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].score, 10.0);
    }

    #[test]
    fn test_token_overlap_scoring() {
        let index = index_with(vec![symbol("load_user_profile", SymbolKind::Function)]);
        // "user" and "profile" overlap, "cache" does not: 2/3 * 3 = 2.
        let results = search_symbols(&index, "user profile cache", None, 10);
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_overlap_excluded() {
        let index = index_with(vec![symbol("renderer", SymbolKind::Struct)]);
        assert!(search_symbols(&index, "database", None, 10).is_empty());
    }

    #[test]
    fn test_kind_filter_is_exact() {
        let index = index_with(vec![
            symbol("parse", SymbolKind::Function),
            symbol("parse", SymbolKind::Method),
        ]);
        let results = search_symbols(&index, "parse", Some(SymbolKind::Method), 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol.kind, SymbolKind::Method);
    }

    #[test]
    fn test_truncation() {
        let index = index_with(
            (0..8)
                .map(|i| symbol(&format!("handler_{i}"), SymbolKind::Function))
                .collect(),
        );
        assert_eq!(search_symbols(&index, "handler", None, 3).len(), 3);
    }
}
