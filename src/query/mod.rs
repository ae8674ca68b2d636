// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only queries against a built [`ProjectIndex`](crate::indexer::ProjectIndex).

pub mod outline;
pub mod search;
pub mod summary;
pub mod symbols;

pub use outline::{file_outline, FileOutline};
pub use search::{search_code, MatchedLine, SearchResult};
pub use summary::{project_summary, ProjectSummary};
pub use symbols::{search_symbols, SymbolMatch};
