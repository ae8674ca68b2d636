// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// symdex - Local file-backed code index and search
///
/// Builds a per-project symbol index and answers ranked full-text and
/// symbol-name queries against it, with no service or database.
#[derive(Parser, Debug)]
#[command(name = "symdex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build (or rebuild) the index for a project
    Index {
        /// Project root (defaults to current directory)
        path: Option<String>,
    },

    /// Ranked full-text search over indexed files
    Search {
        /// Search query
        query: String,

        /// Project root (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Maximum number of results to return
        #[arg(short = 'm', long = "limit")]
        max_results: Option<usize>,
    },

    /// Search symbols by name or pattern
    Symbols {
        /// Symbol name or fragment
        query: String,

        /// Restrict to one symbol kind (function, class, method, ...)
        #[arg(short, long)]
        kind: Option<String>,

        /// Project root (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Maximum number of results to return
        #[arg(short = 'm', long = "limit")]
        max_results: Option<usize>,
    },

    /// Show the symbol outline of one indexed file
    Outline {
        /// File path relative to the indexed root
        file: String,

        /// Project root (defaults to current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show per-language and per-directory index statistics
    Summary {
        /// Project root (defaults to current directory)
        path: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}
