// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-text search with BM25 ranking over synthetic documents.
//!
//! Each file is ranked as the concatenation of its path, symbol
//! names/signatures/previews, imports, and exports. Matched lines come from
//! the file's current on-disk content, not the index.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::indexer::build::{synthetic_document, ProjectIndex};
use crate::tokenize::{tokenize, truncate_chars};

const BM25_K1: f64 = 1.2;
const BM25_B: f64 = 0.75;
const MAX_MATCHED_LINES: usize = 5;
const MAX_MATCHED_LINE_CHARS: usize = 200;

/// One line of the file's current content matching the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedLine {
    /// 1-based.
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub path: String,
    pub score: f64,
    pub matched_lines: Vec<MatchedLine>,
}

/// Rank files against a free-text query. Zero-score files are excluded;
/// results are sorted by descending score and truncated to `max_results`.
pub fn search_code(index: &ProjectIndex, query: &str, max_results: usize) -> Vec<SearchResult> {
    let terms = tokenize(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let total_docs = index.file_count as f64;
    // Cheap proxy for document length: symbol count + import count. Only
    // used for BM25 length normalization.
    let avg_len = if index.files.is_empty() {
        1.0
    } else {
        let total: usize = index
            .files
            .values()
            .map(|file| file.symbols.len() + file.imports.len())
            .sum();
        (total as f64 / index.file_count as f64).max(1.0)
    };

    let mut results: Vec<SearchResult> = Vec::new();
    for (path, file) in &index.files {
        let document = synthetic_document(path, file);
        let doc_tokens = tokenize(&document);
        let doc_len = doc_tokens.len() as f64;

        let mut frequencies: HashMap<&str, u32> = HashMap::new();
        for token in &doc_tokens {
            *frequencies.entry(token.as_str()).or_insert(0) += 1;
        }

        let mut score = 0.0;
        for term in &terms {
            let tf = f64::from(*frequencies.get(term.as_str()).unwrap_or(&0));
            if tf == 0.0 {
                continue;
            }
            // A term missing from the index-wide vocabulary still gets a
            // positive idf via the +1.
            let df = f64::from(index.vocabulary.get(term).copied().unwrap_or(0));
            let idf = ((total_docs - df + 0.5) / (df + 0.5) + 1.0).ln();
            let tf_norm =
                tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * (1.0 - BM25_B + BM25_B * doc_len / avg_len));
            score += idf * tf_norm;
        }

        if score > 0.0 {
            results.push(SearchResult {
                path: path.clone(),
                score,
                matched_lines: Vec::new(),
            });
        }
    }

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(max_results);

    let query_lower = query.to_lowercase();
    for result in &mut results {
        result.matched_lines = collect_matched_lines(index, &result.path, &query_lower, &terms);
    }

    results
}

/// Up to 5 lines, in file order, containing the whole lowercased query or
/// any individual term. An unreadable file keeps an empty list rather than
/// dropping out of the results.
fn collect_matched_lines(
    index: &ProjectIndex,
    path: &str,
    query_lower: &str,
    terms: &[String],
) -> Vec<MatchedLine> {
    let absolute = index.root.join(path);
    let content = match std::fs::read_to_string(&absolute) {
        Ok(content) => content,
        Err(err) => {
            debug!(path, %err, "cannot re-read file for matched lines");
            return Vec::new();
        }
    };

    let mut matched = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let lower = line.to_lowercase();
        if lower.contains(query_lower) || terms.iter().any(|term| lower.contains(term.as_str())) {
            matched.push(MatchedLine {
                line: idx + 1,
                text: truncate_chars(line.trim_end(), MAX_MATCHED_LINE_CHARS),
            });
            if matched.len() >= MAX_MATCHED_LINES {
                break;
            }
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::indexer::{index_project, IndexStore};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    fn build(dir: &TempDir) -> ProjectIndex {
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        index_project(dir.path(), &store, &Config::default()).expect("index builds")
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "a.rs", "pub fn anything() {}\n");
        let index = build(&dir);
        assert!(search_code(&index, "", 10).is_empty());
        assert!(search_code(&index, "+-*", 10).is_empty());
    }

    #[test]
    fn test_zero_score_files_excluded() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "hit.rs", "pub fn frobnicate_widget() {}\n");
        write_file(dir.path(), "miss.rs", "pub fn unrelated() {}\n");
        let index = build(&dir);

        let results = search_code(&index, "frobnicate_widget", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "hit.rs");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_more_occurrences_of_rare_term_score_no_lower() {
        let dir = TempDir::new().expect("tempdir");
        write_file(
            dir.path(),
            "many.rs",
            "fn one(quixotic: u32) {}\nfn two(quixotic: u32) {}\nfn three(quixotic: u32) {}\n",
        );
        write_file(
            dir.path(),
            "few.rs",
            "fn solo(quixotic: u32) {}\nfn filler() {}\nfn pad() {}\n",
        );
        let index = build(&dir);

        let results = search_code(&index, "quixotic", 10);
        assert_eq!(results.len(), 2);
        let many = results.iter().find(|r| r.path == "many.rs").expect("many.rs scored");
        let few = results.iter().find(|r| r.path == "few.rs").expect("few.rs scored");
        assert!(many.score >= few.score);
    }

    #[test]
    fn test_matched_lines_come_from_disk_in_order() {
        let dir = TempDir::new().expect("tempdir");
        write_file(
            dir.path(),
            "config.rs",
            "mod config_loader {\n    fn other() {}\n    fn parse_config() {}\n}\n",
        );
        let index = build(&dir);

        let results = search_code(&index, "config", 10);
        assert_eq!(results.len(), 1);
        let lines = &results[0].matched_lines;
        assert!(!lines.is_empty());
        assert!(lines.len() <= 5);
        assert_eq!(lines[0].line, 1);
        assert!(lines.windows(2).all(|pair| pair[0].line < pair[1].line));
    }

    #[test]
    fn test_deleted_file_still_listed_without_lines() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "gone.rs", "pub fn ephemeral_marker() {}\n");
        let index = build(&dir);
        fs::remove_file(dir.path().join("gone.rs")).expect("remove");

        let results = search_code(&index, "ephemeral_marker", 10);
        assert_eq!(results.len(), 1);
        assert!(results[0].matched_lines.is_empty());
    }

    #[test]
    fn test_max_results_truncation() {
        let dir = TempDir::new().expect("tempdir");
        for i in 0..6 {
            write_file(
                dir.path(),
                &format!("f{i}.rs"),
                "pub fn omnipresent_term() {}\n",
            );
        }
        let index = build(&dir);
        assert_eq!(search_code(&index, "omnipresent_term", 3).len(), 3);
    }
}
