// SPDX-License-Identifier: MIT OR Apache-2.0

//! symdex - Local file-backed code index library
//!
//! Extracts symbols, imports, and searchable text from a source tree into a
//! persisted per-project snapshot, then answers ranked full-text (BM25) and
//! symbol-name queries against it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod indexer;
pub mod output;
pub mod parser;
pub mod query;
pub mod tokenize;
