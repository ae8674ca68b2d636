// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-file outline projection.

use serde::Serialize;

use crate::errors::IndexError;
use crate::indexer::build::ProjectIndex;
use crate::parser::languages::Language;
use crate::parser::symbols::Symbol;

#[derive(Debug, Clone, Serialize)]
pub struct FileOutline {
    pub path: String,
    pub language: Language,
    pub symbols: Vec<Symbol>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

/// Symbols of one indexed file, sorted by ascending start line, plus its raw
/// import/export lists. Pure read view, no I/O.
pub fn file_outline(index: &ProjectIndex, path: &str) -> Result<FileOutline, IndexError> {
    let file = index
        .files
        .get(path)
        .ok_or_else(|| IndexError::FileNotInIndex(path.to_string()))?;

    let mut symbols = file.symbols.clone();
    symbols.sort_by_key(|symbol| symbol.start_line);

    Ok(FileOutline {
        path: path.to_string(),
        language: file.language,
        symbols,
        imports: file.imports.clone(),
        exports: file.exports.clone(),
    })
}
