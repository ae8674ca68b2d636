// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types with actionable suggestions.
//!
//! Per-file problems (unreadable content, unsupported extension, parse
//! failure) are never surfaced through these types; they reduce index
//! coverage and indexing continues. Only structural failures and
//! query-against-missing-index conditions reach callers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(
        "index root '{}' does not exist or is not a directory\n\n\
         Check the path and re-run: symdex index <path>",
        .0.display()
    )]
    RootNotFound(PathBuf),

    #[error(
        "no index found for '{}'\n\n\
         Run 'symdex index' to build one first:\n\
         $ symdex index {}",
        .0.display(),
        .0.display()
    )]
    NotIndexed(PathBuf),

    #[error(
        "file '{0}' is not in the index\n\n\
         The path must be relative to the indexed root. If the file is new,\n\
         re-run 'symdex index' to pick it up."
    )]
    FileNotInIndex(String),

    #[error("failed to persist index snapshot to '{}': {source}", .path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
