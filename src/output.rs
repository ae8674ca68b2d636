// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result rendering for the CLI: colored text or JSON.

use anyhow::Result;
use colored::Colorize;

use crate::indexer::build::ProjectIndex;
use crate::query::{FileOutline, ProjectSummary, SearchResult, SymbolMatch};

pub fn render_index_report(index: &ProjectIndex, json: bool) -> Result<()> {
    if json {
        let report = serde_json::json!({
            "root": index.root.display().to_string(),
            "files": index.file_count,
            "symbols": index.symbol_count,
            "terms": index.vocabulary.len(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "{} Indexed {} files, {} symbols ({} terms)",
        "✓".green(),
        index.file_count.to_string().cyan(),
        index.symbol_count.to_string().cyan(),
        index.vocabulary.len()
    );
    Ok(())
}

pub fn render_search_results(query: &str, results: &[SearchResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }
    if results.is_empty() {
        println!("{} No results for: {}", "✗".red(), query.yellow());
        return Ok(());
    }
    for result in results {
        println!(
            "{}  {}",
            result.path.cyan(),
            format!("{:.3}", result.score).dimmed()
        );
        for line in &result.matched_lines {
            println!("  {}: {}", line.line.to_string().yellow(), line.text);
        }
    }
    println!(
        "\n{} {} files matched",
        "✓".green(),
        results.len().to_string().cyan()
    );
    Ok(())
}

pub fn render_symbol_matches(query: &str, matches: &[SymbolMatch], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(matches)?);
        return Ok(());
    }
    if matches.is_empty() {
        println!("{} No symbols found matching: {}", "✗".red(), query.yellow());
        return Ok(());
    }
    for entry in matches {
        let symbol = &entry.symbol;
        let kind = format!("[{}]", symbol.kind);
        let location = format!("{}:{}", symbol.path, symbol.start_line);
        match &symbol.parent {
            Some(parent) => println!(
                "  {} {}::{} {}",
                kind.blue(),
                parent.dimmed(),
                symbol.name.green(),
                location.cyan()
            ),
            None => println!("  {} {} {}", kind.blue(), symbol.name.green(), location.cyan()),
        }
    }
    println!(
        "\n{} Found {} symbols",
        "✓".green(),
        matches.len().to_string().cyan()
    );
    Ok(())
}

pub fn render_outline(outline: &FileOutline, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outline)?);
        return Ok(());
    }
    println!("{} ({})", outline.path.cyan(), outline.language);
    for import in &outline.imports {
        println!("  {} {}", "import".dimmed(), import);
    }
    for export in &outline.exports {
        println!("  {} {}", "export".dimmed(), export);
    }
    for symbol in &outline.symbols {
        let kind = format!("[{}]", symbol.kind);
        println!(
            "  {:>5} {} {}",
            symbol.start_line.to_string().yellow(),
            kind.blue(),
            symbol.name.green()
        );
    }
    Ok(())
}

pub fn render_summary(summary: &ProjectSummary, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }
    println!("{}", summary.root.cyan());
    println!(
        "  {} files, {} symbols",
        summary.file_count.to_string().cyan(),
        summary.symbol_count.to_string().cyan()
    );
    println!("\n{}", "Languages".bold());
    for (language, count) in &summary.languages {
        println!("  {language:<12} {count}");
    }
    println!("\n{}", "Top directories".bold());
    for entry in &summary.top_directories {
        println!("  {:<24} {}", entry.directory, entry.files);
    }
    Ok(())
}
