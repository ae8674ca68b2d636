// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index construction: incremental hashing, extraction, vocabulary.
//!
//! Files whose content hash matches the prior snapshot are carried forward
//! without re-extraction; the vocabulary is rebuilt from scratch over the
//! final file set on every run so document frequencies always reflect the
//! current corpus.

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::IndexError;
use crate::indexer::scanner::FileScanner;
use crate::indexer::store::IndexStore;
use crate::parser::languages::Language;
use crate::parser::symbols::Symbol;
use crate::parser::{extract_file, Extraction};
use crate::tokenize::tokenize;

/// Content hashes are truncated to a fixed length; enough to detect change,
/// short enough to keep snapshots lean.
const CONTENT_HASH_LEN: usize = 16;

/// One source file's extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub language: Language,
    pub hash: String,
    pub size: u64,
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

/// Whole-project snapshot, one per distinct project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectIndex {
    /// Absolute, canonicalized.
    pub root: PathBuf,
    /// Unix seconds at build time.
    pub indexed_at: u64,
    pub file_count: usize,
    pub symbol_count: usize,
    /// Relative path -> extraction result; ordered for determinism.
    pub files: BTreeMap<String, IndexedFile>,
    /// Term -> number of files whose synthetic document contains it.
    pub vocabulary: BTreeMap<String, u32>,
}

pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex()[..CONTENT_HASH_LEN].to_string()
}

/// The concatenated text used as one file's unit of full-text ranking:
/// path, then `name signature preview` per symbol, then imports and exports.
pub fn synthetic_document(path: &str, file: &IndexedFile) -> String {
    let mut doc = String::with_capacity(256);
    doc.push_str(path);
    doc.push('\n');
    for symbol in &file.symbols {
        doc.push_str(&symbol.name);
        doc.push(' ');
        doc.push_str(&symbol.signature);
        doc.push(' ');
        doc.push_str(&symbol.preview);
        doc.push('\n');
    }
    for import in &file.imports {
        doc.push_str(import);
        doc.push('\n');
    }
    for export in &file.exports {
        doc.push_str(export);
        doc.push('\n');
    }
    doc
}

/// Build (and persist) the index for a project root.
///
/// Single-file failures reduce coverage silently; only root and store
/// problems are fatal.
pub fn index_project(root: &Path, store: &IndexStore, config: &Config) -> Result<ProjectIndex> {
    let root = root
        .canonicalize()
        .map_err(|_| IndexError::RootNotFound(root.to_path_buf()))?;
    if !root.is_dir() {
        return Err(IndexError::RootNotFound(root).into());
    }

    let prior = store.load(&root);
    let walked = FileScanner::new(&root)
        .with_excludes(config.exclude_patterns.clone())
        .with_max_files(config.max_files())
        .with_max_file_size(config.max_file_size_bytes())
        .walk()?;

    let mut files: BTreeMap<String, IndexedFile> = BTreeMap::new();
    let mut pending: Vec<(String, Language, String, u64, String)> = Vec::new();
    let mut carried = 0usize;

    for file in walked {
        let Some(language) = Language::from_path(&file.absolute) else {
            continue;
        };
        let bytes = match std::fs::read(&file.absolute) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(path = %file.relative, %err, "skipping unreadable file");
                continue;
            }
        };
        let hash = content_hash(&bytes);
        let Ok(content) = String::from_utf8(bytes) else {
            debug!(path = %file.relative, "skipping non-utf8 file");
            continue;
        };

        // Incremental skip: identical hash carries the prior record forward
        // without re-invoking extraction.
        if let Some(previous) = prior.as_ref().and_then(|p| p.files.get(&file.relative)) {
            if previous.hash == hash {
                files.insert(file.relative, previous.clone());
                carried += 1;
                continue;
            }
        }

        pending.push((file.relative, language, hash, file.size, content));
    }

    let extracted: Vec<(String, IndexedFile)> = pending
        .into_par_iter()
        .map_init(
            HashMap::new,
            |parsers, (relative, language, hash, size, content)| {
                let extraction = match extract_file(&content, language, &relative, parsers) {
                    Ok(extraction) => extraction,
                    Err(err) => {
                        debug!(path = %relative, %err, "skipping file that failed extraction");
                        return None;
                    }
                };
                let Extraction {
                    symbols,
                    imports,
                    exports,
                } = extraction;
                Some((
                    relative,
                    IndexedFile {
                        language,
                        hash,
                        size,
                        symbols,
                        imports,
                        exports,
                    },
                ))
            },
        )
        .flatten()
        .collect();

    let fresh = extracted.len();
    for (relative, file) in extracted {
        files.insert(relative, file);
    }

    let vocabulary = build_vocabulary(&files);
    let symbol_count = files.values().map(|file| file.symbols.len()).sum();
    let index = ProjectIndex {
        root,
        indexed_at: unix_now(),
        file_count: files.len(),
        symbol_count,
        files,
        vocabulary,
    };

    store.save(&index)?;
    info!(
        root = %index.root.display(),
        files = index.file_count,
        symbols = index.symbol_count,
        carried,
        fresh,
        "index built"
    );
    Ok(index)
}

/// Full rebuild every run; never merged incrementally, so document
/// frequencies reflect the current corpus even for carried-forward files.
fn build_vocabulary(files: &BTreeMap<String, IndexedFile>) -> BTreeMap<String, u32> {
    let mut vocabulary = BTreeMap::new();
    for (path, file) in files {
        let document = synthetic_document(path, file);
        let terms: BTreeSet<String> = tokenize(&document).into_iter().collect();
        for term in terms {
            *vocabulary.entry(term).or_insert(0) += 1;
        }
    }
    vocabulary
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(path, content).expect("write file");
    }

    fn build(dir: &TempDir, store: &IndexStore) -> ProjectIndex {
        index_project(dir.path(), store, &Config::default()).expect("index builds")
    }

    #[test]
    fn test_counts_match_contents() {
        let dir = TempDir::new().expect("tempdir");
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        write_file(dir.path(), "a.rs", "pub fn one() {}\npub fn two() {}\n");
        write_file(dir.path(), "b.py", "def three():\n    pass\n");

        let index = build(&dir, &store);
        assert_eq!(index.file_count, index.files.len());
        assert_eq!(index.file_count, 2);
        let total: usize = index.files.values().map(|f| f.symbols.len()).sum();
        assert_eq!(index.symbol_count, total);
        assert_eq!(index.symbol_count, 3);
    }

    #[test]
    fn test_vocabulary_counts_document_frequency() {
        let dir = TempDir::new().expect("tempdir");
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        // "shared" appears in both files, "solo" in one, repetition within a
        // file must not inflate document frequency.
        write_file(dir.path(), "a.rs", "fn shared_thing() {}\n");
        write_file(dir.path(), "b.rs", "fn shared_thing() {}\nfn solo_shared_thing() {}\n");

        let index = build(&dir, &store);
        assert_eq!(index.vocabulary.get("shared_thing"), Some(&2));
        assert_eq!(index.vocabulary.get("solo_shared_thing"), Some(&1));
    }

    #[test]
    fn test_reindex_is_idempotent_except_timestamp() {
        let dir = TempDir::new().expect("tempdir");
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        write_file(dir.path(), "lib.rs", "pub fn stable() {}\n");

        let first = build(&dir, &store);
        let second = build(&dir, &store);
        assert_eq!(first.files, second.files);
        assert_eq!(first.vocabulary, second.vocabulary);
        assert_eq!(first.file_count, second.file_count);
        assert_eq!(first.symbol_count, second.symbol_count);
    }

    #[test]
    fn test_only_changed_file_is_recomputed() {
        let dir = TempDir::new().expect("tempdir");
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        write_file(dir.path(), "stable.rs", "pub fn stable() {}\n");
        write_file(dir.path(), "volatile.rs", "pub fn before() {}\n");

        let first = build(&dir, &store);
        write_file(dir.path(), "volatile.rs", "pub fn after() {}\n");
        let second = build(&dir, &store);

        assert_eq!(first.files["stable.rs"], second.files["stable.rs"]);
        assert_ne!(first.files["volatile.rs"], second.files["volatile.rs"]);
        assert!(second.files["volatile.rs"]
            .symbols
            .iter()
            .any(|s| s.name == "after"));
    }

    #[test]
    fn test_unsupported_and_binary_files_skipped() {
        let dir = TempDir::new().expect("tempdir");
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        write_file(dir.path(), "code.rs", "pub fn code() {}\n");
        write_file(dir.path(), "readme.txt", "no symbols here");
        fs::write(dir.path().join("bad.rs"), [0xff, 0xfe, 0x00, 0x41]).expect("write binary");

        let index = build(&dir, &store);
        assert_eq!(index.file_count, 1);
        assert!(index.files.contains_key("code.rs"));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        let result = index_project(Path::new("/no/such/root"), &store, &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_persisted_on_build() {
        let dir = TempDir::new().expect("tempdir");
        let data = TempDir::new().expect("data dir");
        let store = IndexStore::at(data.path()).expect("store");
        write_file(dir.path(), "lib.rs", "pub fn persisted() {}\n");

        let built = build(&dir, &store);
        let loaded = store.load(&built.root).expect("snapshot saved");
        assert_eq!(loaded.files, built.files);
    }
}
