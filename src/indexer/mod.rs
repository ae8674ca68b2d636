// SPDX-License-Identifier: MIT OR Apache-2.0

//! Indexing pipeline: directory walking, incremental hashing, extraction,
//! and snapshot persistence.

pub mod build;
pub mod scanner;
pub mod store;

pub use build::{index_project, IndexedFile, ProjectIndex};
pub use scanner::{FileScanner, WalkedFile};
pub use store::{IndexCache, IndexStore};
