// SPDX-License-Identifier: MIT OR Apache-2.0

//! symdex - Local file-backed code index and search tool.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use symdex::cli::{Cli, Commands, OutputFormat};
use symdex::config::Config;
use symdex::errors::IndexError;
use symdex::indexer::{index_project, IndexCache, IndexStore, ProjectIndex};
use symdex::output;
use symdex::parser::symbols::SymbolKind;
use symdex::query;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let json = match cli.format {
        Some(OutputFormat::Json) => true,
        Some(OutputFormat::Text) => false,
        None => config.wants_json(),
    };

    let store = IndexStore::open_default()?;
    let cache = IndexCache::new();

    match cli.command {
        Commands::Index { path } => {
            let index = index_project(&resolve_root(path.as_deref())?, &store, &config)?;
            let index = cache.insert(index);
            output::render_index_report(&index, json)?;
        }
        Commands::Search {
            query,
            path,
            max_results,
        } => {
            let index = load_index(&cache, &store, path.as_deref())?;
            let results =
                query::search_code(&index, &query, config.merge_max_results(max_results));
            output::render_search_results(&query, &results, json)?;
        }
        Commands::Symbols {
            query,
            kind,
            path,
            max_results,
        } => {
            let kind = kind
                .as_deref()
                .map(SymbolKind::from_str)
                .transpose()
                .map_err(|err| anyhow::anyhow!(err))?;
            let index = load_index(&cache, &store, path.as_deref())?;
            let matches =
                query::search_symbols(&index, &query, kind, config.merge_max_results(max_results));
            output::render_symbol_matches(&query, &matches, json)?;
        }
        Commands::Outline { file, path } => {
            let index = load_index(&cache, &store, path.as_deref())?;
            let outline = query::file_outline(&index, &file)?;
            output::render_outline(&outline, json)?;
        }
        Commands::Summary { path } => {
            let index = load_index(&cache, &store, path.as_deref())?;
            let summary = query::project_summary(&index);
            output::render_summary(&summary, json)?;
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn resolve_root(path: Option<&str>) -> Result<PathBuf> {
    let raw = match path {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()?,
    };
    raw.canonicalize()
        .map_err(|_| IndexError::RootNotFound(raw).into())
}

fn load_index(
    cache: &IndexCache,
    store: &IndexStore,
    path: Option<&str>,
) -> Result<Arc<ProjectIndex>> {
    let root = resolve_root(path)?;
    cache
        .get_or_load(store, &root)
        .ok_or_else(|| IndexError::NotIndexed(root).into())
}
