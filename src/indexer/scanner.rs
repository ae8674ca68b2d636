// SPDX-License-Identifier: MIT OR Apache-2.0

//! File scanner using the ignore crate (same as ripgrep).

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use ignore::WalkBuilder;

use crate::errors::IndexError;
use crate::parser::languages::Language;

/// Hard ceilings so a walk over a pathological tree stays bounded.
pub const DEFAULT_MAX_FILES: usize = 10_000;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024;

const DEFAULT_EXCLUDED_DIRS: &[&str] = &[".git", ".hg", ".svn", "node_modules", "target"];

/// One candidate file yielded by the walk.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Forward-slash path relative to the walk root.
    pub relative: String,
    pub absolute: PathBuf,
    pub size: u64,
}

/// Walks a source tree under ignore rules and caps, yielding only files
/// whose extension resolves to a supported language.
pub struct FileScanner {
    root: PathBuf,
    exclude_patterns: Vec<String>,
    max_files: usize,
    max_file_size: u64,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude_patterns: Vec::new(),
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_excludes(mut self, excludes: Vec<String>) -> Self {
        self.exclude_patterns = excludes;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Walk the tree. Root problems are fatal; everything else filters.
    ///
    /// Results are sorted by relative path and truncated at the file cap, so
    /// a capped walk is deterministic rather than a race between walker
    /// threads.
    pub fn walk(&self) -> Result<Vec<WalkedFile>> {
        if !self.root.is_dir() {
            return Err(IndexError::RootNotFound(self.root.clone()).into());
        }
        let root = self.root.canonicalize()?;

        let (tx, rx) = mpsc::channel();

        let walker = WalkBuilder::new(&root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .filter_entry(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .map(|name| !DEFAULT_EXCLUDED_DIRS.contains(&name))
                    .unwrap_or(true)
            })
            .build_parallel();

        let exclude_patterns = self.exclude_patterns.clone();
        let max_file_size = self.max_file_size;
        let walk_root = root.clone();

        walker.run(|| {
            let tx = tx.clone();
            let exclude_patterns = exclude_patterns.clone();
            let walk_root = walk_root.clone();

            Box::new(move |entry| {
                let Ok(entry) = entry else {
                    return ignore::WalkState::Continue;
                };
                let path = entry.path();

                if !exclude_patterns.is_empty() {
                    let path_str = path.to_string_lossy();
                    for pattern in &exclude_patterns {
                        if path_str.contains(pattern.as_str()) {
                            return ignore::WalkState::Continue;
                        }
                    }
                }

                if !path.is_file() || Language::from_path(path).is_none() {
                    return ignore::WalkState::Continue;
                }

                let Ok(metadata) = path.metadata() else {
                    return ignore::WalkState::Continue;
                };
                if metadata.len() > max_file_size {
                    return ignore::WalkState::Continue;
                }

                if let Some(relative) = relative_path(&walk_root, path) {
                    let _ = tx.send(WalkedFile {
                        relative,
                        absolute: path.to_path_buf(),
                        size: metadata.len(),
                    });
                }
                ignore::WalkState::Continue
            })
        });

        drop(tx);
        let mut files: Vec<WalkedFile> = rx.into_iter().collect();
        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        files.truncate(self.max_files);
        Ok(files)
    }
}

/// Root-relative path with forward slashes, or `None` for the root itself.
pub fn relative_path(root: &Path, abs: &Path) -> Option<String> {
    let rel = abs.strip_prefix(root).ok()?;
    let path = rel.to_string_lossy().replace('\\', "/");
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
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

    #[test]
    fn test_walk_yields_supported_files_sorted() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "src/b.rs", "fn b() {}");
        write_file(dir.path(), "src/a.rs", "fn a() {}");
        write_file(dir.path(), "notes.bin", "binary");

        let files = FileScanner::new(dir.path()).walk().expect("walk");
        let relative: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(relative, vec!["src/a.rs", "src/b.rs"]);
    }

    #[test]
    fn test_walk_missing_root_is_fatal() {
        let result = FileScanner::new("/definitely/not/a/real/root").walk();
        assert!(result.is_err());
    }

    #[test]
    fn test_walk_respects_file_cap_deterministically() {
        let dir = TempDir::new().expect("tempdir");
        for i in 0..10 {
            write_file(dir.path(), &format!("f{i:02}.py"), "x = 1");
        }

        let scanner = FileScanner::new(dir.path()).with_max_files(4);
        let first = scanner.walk().expect("walk");
        assert_eq!(first.len(), 4);
        let names: Vec<&str> = first.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(names, vec!["f00.py", "f01.py", "f02.py", "f03.py"]);

        let second = scanner.walk().expect("walk again");
        let second_names: Vec<&str> = second.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(names, second_names);
    }

    #[test]
    fn test_walk_skips_oversized_and_excluded() {
        let dir = TempDir::new().expect("tempdir");
        write_file(dir.path(), "small.rs", "fn s() {}");
        write_file(dir.path(), "big.rs", &"x".repeat(200));
        write_file(dir.path(), "vendor/dep.rs", "fn d() {}");
        write_file(dir.path(), "node_modules/pkg/index.js", "var x;");

        let files = FileScanner::new(dir.path())
            .with_max_file_size(100)
            .with_excludes(vec!["vendor".to_string()])
            .walk()
            .expect("walk");
        let relative: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(relative, vec!["small.rs"]);
    }
}
