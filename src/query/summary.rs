// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-project summary projection.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::indexer::build::ProjectIndex;

const TOP_DIRECTORY_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryCount {
    pub directory: String,
    pub files: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub root: String,
    pub indexed_at: u64,
    pub file_count: usize,
    pub symbol_count: usize,
    /// Indexed-file count per language.
    pub languages: BTreeMap<String, usize>,
    /// Top-level directories by contained indexed-file count, top 15.
    pub top_directories: Vec<DirectoryCount>,
}

/// Aggregate view over the index; single pass, no I/O.
pub fn project_summary(index: &ProjectIndex) -> ProjectSummary {
    let mut languages: BTreeMap<String, usize> = BTreeMap::new();
    let mut directories: BTreeMap<&str, usize> = BTreeMap::new();

    for (path, file) in &index.files {
        *languages.entry(file.language.to_string()).or_insert(0) += 1;
        let top = match path.split_once('/') {
            Some((dir, _)) => dir,
            None => ".",
        };
        *directories.entry(top).or_insert(0) += 1;
    }

    let mut top_directories: Vec<DirectoryCount> = directories
        .into_iter()
        .map(|(directory, files)| DirectoryCount {
            directory: directory.to_string(),
            files,
        })
        .collect();
    // Count descending, name ascending on ties; BTreeMap order makes the
    // tie-break deterministic.
    top_directories.sort_by(|a, b| b.files.cmp(&a.files).then(a.directory.cmp(&b.directory)));
    top_directories.truncate(TOP_DIRECTORY_LIMIT);

    ProjectSummary {
        root: index.root.display().to_string(),
        indexed_at: index.indexed_at,
        file_count: index.file_count,
        symbol_count: index.symbol_count,
        languages,
        top_directories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::indexer::build::IndexedFile;
    use crate::parser::languages::Language;

    fn empty_file(language: Language) -> IndexedFile {
        IndexedFile {
            language,
            hash: "0".repeat(16),
            size: 0,
            symbols: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    fn index_with(paths: &[(&str, Language)]) -> ProjectIndex {
        let mut files = BTreeMap::new();
        for (path, language) in paths {
            files.insert(path.to_string(), empty_file(*language));
        }
        ProjectIndex {
            root: PathBuf::from("/proj"),
            indexed_at: 42,
            file_count: files.len(),
            symbol_count: 0,
            files,
            vocabulary: BTreeMap::new(),
        }
    }

    #[test]
    fn test_language_and_directory_counts() {
        let index = index_with(&[
            ("src/a.rs", Language::Rust),
            ("src/b.rs", Language::Rust),
            ("scripts/run.py", Language::Python),
            ("main.rs", Language::Rust),
        ]);

        let summary = project_summary(&index);
        assert_eq!(summary.languages.get("rust"), Some(&3));
        assert_eq!(summary.languages.get("python"), Some(&1));

        assert_eq!(
            summary.top_directories,
            vec![
                DirectoryCount {
                    directory: "src".to_string(),
                    files: 2
                },
                DirectoryCount {
                    directory: ".".to_string(),
                    files: 1
                },
                DirectoryCount {
                    directory: "scripts".to_string(),
                    files: 1
                },
            ]
        );
    }

    #[test]
    fn test_top_directories_truncated_to_fifteen() {
        let paths: Vec<(String, Language)> = (0..20)
            .map(|i| (format!("dir{i:02}/f.rs"), Language::Rust))
            .collect();
        let borrowed: Vec<(&str, Language)> = paths
            .iter()
            .map(|(path, language)| (path.as_str(), *language))
            .collect();
        let summary = project_summary(&index_with(&borrowed));
        assert_eq!(summary.top_directories.len(), 15);
    }
}
