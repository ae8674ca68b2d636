// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pattern-driven extraction for grammars without a tree parser.
//!
//! Two flavors: keyword-block languages (Visual Basic), scanned line by line
//! against an ordered list of per-construct regexes with an open-block
//! stack, and markup (XML/XAML), tracked with an element stack where only
//! shallow elements become symbols.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::symbols::{
    Symbol, SymbolKind, MAX_DOC_CHARS, MAX_PREVIEW_CHARS, MAX_SIGNATURE_CHARS, MAX_STATEMENT_CHARS,
};
use crate::parser::Extraction;
use crate::tokenize::truncate_chars;

const PREVIEW_LINES: usize = 3;
/// Markup elements nested deeper than this are not recorded.
const MAX_ELEMENT_DEPTH: usize = 2;

struct BasicRule {
    keyword: &'static str,
    kind: SymbolKind,
    container: bool,
    re: Regex,
}

const BASIC_MODIFIERS: &str = "(?:(?:Public|Private|Protected|Friend|Shared|Partial|Overrides|\
                               Overridable|MustOverride|NotInheritable|MustInherit|Async|Iterator|\
                               ReadOnly|WriteOnly|Default|Shadows|Overloads)\\s+)*";

/// Ordered by declaration keyword; the first rule matching a line wins.
static BASIC_RULES: Lazy<Vec<BasicRule>> = Lazy::new(|| {
    let constructs: &[(&str, SymbolKind, bool)] = &[
        ("Module", SymbolKind::Namespace, true),
        ("Class", SymbolKind::Class, true),
        ("Interface", SymbolKind::Interface, true),
        ("Structure", SymbolKind::Struct, true),
        ("Enum", SymbolKind::Enum, true),
        ("Function", SymbolKind::Function, false),
        ("Sub", SymbolKind::Function, false),
        ("Property", SymbolKind::Property, false),
        ("Event", SymbolKind::Event, false),
    ];
    constructs
        .iter()
        .map(|&(keyword, kind, container)| BasicRule {
            keyword,
            kind,
            container,
            re: Regex::new(&format!(
                r"(?i)^{BASIC_MODIFIERS}{keyword}\s+([A-Za-z_]\w*)"
            ))
            .expect("valid construct regex"),
        })
        .collect()
});

static BASIC_DELEGATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^{BASIC_MODIFIERS}Delegate\s+(?:Sub|Function)\s+([A-Za-z_]\w*)"
    ))
    .expect("valid delegate regex")
});

static BASIC_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^End\s+([A-Za-z]+)").expect("valid end regex"));

static BASIC_IMPORTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Imports\s+\S").expect("valid imports regex"));

/// Keyword-block extraction (Visual Basic).
pub(crate) fn extract_basic(source: &str, path: &str) -> Extraction {
    let lines: Vec<&str> = source.lines().collect();
    let mut extraction = Extraction::default();
    // Open container blocks: (name, keyword).
    let mut stack: Vec<(String, &'static str)> = Vec::new();

    for (idx, raw) in lines.iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('\'') {
            continue;
        }

        if let Some(caps) = BASIC_END_RE.captures(line) {
            let keyword = &caps[1];
            if let Some((_, top_keyword)) = stack.last() {
                if top_keyword.eq_ignore_ascii_case(keyword) {
                    stack.pop();
                }
            }
            continue;
        }

        if BASIC_IMPORTS_RE.is_match(line) {
            extraction
                .imports
                .push(truncate_chars(line, MAX_STATEMENT_CHARS));
            continue;
        }

        if let Some(caps) = BASIC_DELEGATE_RE.captures(line) {
            extraction.symbols.push(basic_symbol(
                caps[1].to_string(),
                SymbolKind::Delegate,
                path,
                &lines,
                idx,
                idx,
                &stack,
            ));
            continue;
        }

        for rule in BASIC_RULES.iter() {
            let Some(caps) = rule.re.captures(line) else {
                continue;
            };
            let name = caps[1].to_string();
            let end = find_basic_end(&lines, idx, rule);
            extraction.symbols.push(basic_symbol(
                name.clone(),
                rule.kind,
                path,
                &lines,
                idx,
                end,
                &stack,
            ));
            if rule.container {
                stack.push((name, rule.keyword));
            }
            break;
        }
    }

    extraction
}

fn basic_symbol(
    name: String,
    kind: SymbolKind,
    path: &str,
    lines: &[&str],
    start: usize,
    end: usize,
    stack: &[(String, &'static str)],
) -> Symbol {
    let doc_comment = start
        .checked_sub(1)
        .and_then(|prev| lines.get(prev))
        .map(|line| line.trim())
        .filter(|line| line.starts_with("'''"))
        .map(|line| truncate_chars(line.trim_start_matches('\'').trim(), MAX_DOC_CHARS));

    let preview_end = (start + PREVIEW_LINES).min(end + 1);
    let preview = truncate_chars(
        lines
            .get(start..preview_end)
            .unwrap_or_default()
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join("\n")
            .trim(),
        MAX_PREVIEW_CHARS,
    );

    Symbol {
        name,
        kind,
        path: path.to_string(),
        start_line: start + 1,
        end_line: end + 1,
        signature: truncate_chars(lines.get(start).map(|l| l.trim()).unwrap_or(""), MAX_SIGNATURE_CHARS),
        parent: stack.last().map(|(name, _)| name.clone()),
        doc_comment,
        preview,
    }
}

/// Forward scan for the construct's matching `End <Keyword>`, counting
/// nested openings of the same keyword. Constructs with no closer (auto
/// properties, declarations) end on their own line.
fn find_basic_end(lines: &[&str], start: usize, rule: &BasicRule) -> usize {
    let mut depth = 1usize;
    for (offset, raw) in lines.iter().enumerate().skip(start + 1) {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('\'') {
            continue;
        }
        if rule.re.is_match(line) {
            depth += 1;
            continue;
        }
        if let Some(caps) = BASIC_END_RE.captures(line) {
            if caps[1].eq_ignore_ascii_case(rule.keyword) {
                depth -= 1;
                if depth == 0 {
                    return offset;
                }
            }
        }
    }
    start
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][\w.:-]*)((?:"[^"]*"|'[^']*'|[^<>"'])*?)\s*(/?)>"#)
        .expect("valid tag regex")
});

static NAME_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:x:Name|Name|id)\s*=\s*["']([^"']+)["']"#).expect("valid attribute regex")
});

struct OpenElement {
    tag: String,
    display: String,
    /// Index into the symbol list to patch the end line on close.
    symbol: Option<usize>,
}

/// Markup extraction (XML/XAML): element stack, shallow elements only,
/// named `tag[attribute-value]` when a significant attribute is present.
pub(crate) fn extract_markup(source: &str, path: &str) -> Extraction {
    let lines: Vec<&str> = source.lines().collect();
    let mut extraction = Extraction::default();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut in_comment = false;

    for (idx, raw) in lines.iter().enumerate() {
        let mut rest: &str = raw;
        if in_comment {
            match rest.find("-->") {
                Some(end) => {
                    rest = &rest[end + 3..];
                    in_comment = false;
                }
                None => continue,
            }
        }
        // Strip every comment span on the line; an unterminated one
        // carries over to the following lines.
        let mut line = String::new();
        while let Some(start) = rest.find("<!--") {
            line.push_str(&rest[..start]);
            match rest[start + 4..].find("-->") {
                Some(end) => rest = &rest[start + 4 + end + 3..],
                None => {
                    in_comment = true;
                    rest = "";
                }
            }
        }
        line.push_str(rest);

        for caps in TAG_RE.captures_iter(&line) {
            let closing = !caps[1].is_empty();
            let tag = caps[2].to_string();
            let attrs = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let self_closing = !caps[4].is_empty();

            if closing {
                close_element(&mut stack, &tag, idx, &mut extraction.symbols);
                continue;
            }

            let depth = stack.len();
            let display = match NAME_ATTR_RE.captures(attrs) {
                Some(attr) => format!("{tag}[{}]", &attr[1]),
                None => tag.clone(),
            };

            let symbol = if depth <= MAX_ELEMENT_DEPTH {
                extraction.symbols.push(Symbol {
                    name: display.clone(),
                    kind: SymbolKind::Element,
                    path: path.to_string(),
                    start_line: idx + 1,
                    end_line: idx + 1,
                    signature: truncate_chars(raw.trim(), MAX_SIGNATURE_CHARS),
                    parent: stack.last().map(|open| open.display.clone()),
                    doc_comment: None,
                    preview: truncate_chars(raw.trim(), MAX_PREVIEW_CHARS),
                });
                Some(extraction.symbols.len() - 1)
            } else {
                None
            };

            if !self_closing {
                stack.push(OpenElement {
                    tag,
                    display,
                    symbol,
                });
            }
        }
    }

    extraction
}

fn close_element(stack: &mut Vec<OpenElement>, tag: &str, line_idx: usize, symbols: &mut [Symbol]) {
    let Some(open_at) = stack.iter().rposition(|open| open.tag == tag) else {
        return;
    };
    // Unclosed children above the match are popped with it.
    while stack.len() > open_at {
        let Some(open) = stack.pop() else {
            break;
        };
        if let Some(symbol_idx) = open.symbol {
            symbols[symbol_idx].end_line = line_idx + 1;
        }
    }
}
