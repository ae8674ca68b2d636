// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tree-driven symbol extraction using tree-sitter node traversal.
//!
//! The traversal is pre-order with a "current parent name" context. Nodes
//! that yield container symbols (classes, namespaces) are recursed into with
//! the new name as context; nodes that yield no symbol are recursed through
//! transparently (export wrappers, decorated definitions, bodies); leaf
//! symbols (functions, fields) end the descent so locals never surface.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tree_sitter::{Node, Parser};

use crate::parser::languages::Language;
use crate::parser::Extraction;
use crate::tokenize::truncate_chars;

pub const MAX_SIGNATURE_CHARS: usize = 200;
pub const MAX_DOC_CHARS: usize = 200;
pub const MAX_PREVIEW_CHARS: usize = 300;
pub const MAX_STATEMENT_CHARS: usize = 200;
const PREVIEW_LINES: usize = 3;

/// Symbol kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Method,
    Constructor,
    Class,
    Interface,
    Type,
    Enum,
    Struct,
    Property,
    Field,
    Delegate,
    Event,
    Namespace,
    Variable,
    Element,
    Unknown,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Type => "type",
            SymbolKind::Enum => "enum",
            SymbolKind::Struct => "struct",
            SymbolKind::Property => "property",
            SymbolKind::Field => "field",
            SymbolKind::Delegate => "delegate",
            SymbolKind::Event => "event",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Variable => "variable",
            SymbolKind::Element => "element",
            SymbolKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for SymbolKind {
    type Err = String;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "function" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            "constructor" => Ok(Self::Constructor),
            "class" => Ok(Self::Class),
            "interface" => Ok(Self::Interface),
            "type" => Ok(Self::Type),
            "enum" => Ok(Self::Enum),
            "struct" => Ok(Self::Struct),
            "property" => Ok(Self::Property),
            "field" => Ok(Self::Field),
            "delegate" => Ok(Self::Delegate),
            "event" => Ok(Self::Event),
            "namespace" => Ok(Self::Namespace),
            "variable" => Ok(Self::Variable),
            "element" => Ok(Self::Element),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown symbol kind: '{other}'")),
        }
    }
}

/// One named code entity extracted from a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub path: String,
    /// 1-based inclusive.
    pub start_line: usize,
    /// 1-based inclusive, always >= start_line.
    pub end_line: usize,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_comment: Option<String>,
    pub preview: String,
}

/// How a recognized node participates in the traversal after its symbol is
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nesting {
    /// Stop descending; members of functions/fields are not symbols.
    Leaf,
    /// Recurse with the symbol's name as the new parent context.
    Container,
    /// Recorded and recursed like a container, but may be body-less
    /// (file-scoped), in which case following siblings become children.
    Namespace,
}

struct NodeRule {
    kind: SymbolKind,
    name_field: &'static str,
    nesting: Nesting,
}

const fn rule(kind: SymbolKind, name_field: &'static str, nesting: Nesting) -> NodeRule {
    NodeRule {
        kind,
        name_field,
        nesting,
    }
}

/// Fixed node-type -> symbol-kind table per language. A `None` node kind is
/// traversed transparently.
fn symbol_rule(lang: Language, node_kind: &str) -> Option<NodeRule> {
    use Nesting::{Container, Leaf, Namespace};
    use SymbolKind as K;

    match lang {
        Language::TypeScript | Language::JavaScript => match node_kind {
            "function_declaration" | "generator_function_declaration" => {
                Some(rule(K::Function, "name", Leaf))
            }
            "class_declaration" | "abstract_class_declaration" => {
                Some(rule(K::Class, "name", Container))
            }
            "interface_declaration" => Some(rule(K::Interface, "name", Container)),
            "type_alias_declaration" => Some(rule(K::Type, "name", Leaf)),
            "enum_declaration" => Some(rule(K::Enum, "name", Leaf)),
            "method_definition" => Some(rule(K::Method, "name", Leaf)),
            "public_field_definition" => Some(rule(K::Property, "name", Leaf)),
            "variable_declarator" => Some(rule(K::Variable, "name", Leaf)),
            "internal_module" | "module" => Some(rule(K::Namespace, "name", Namespace)),
            _ => None,
        },
        Language::Python => match node_kind {
            "function_definition" => Some(rule(K::Function, "name", Leaf)),
            "class_definition" => Some(rule(K::Class, "name", Container)),
            _ => None,
        },
        Language::Rust => match node_kind {
            "function_item" => Some(rule(K::Function, "name", Leaf)),
            "struct_item" => Some(rule(K::Struct, "name", Container)),
            "enum_item" => Some(rule(K::Enum, "name", Leaf)),
            "trait_item" => Some(rule(K::Interface, "name", Container)),
            "type_item" => Some(rule(K::Type, "name", Leaf)),
            "const_item" | "static_item" => Some(rule(K::Variable, "name", Leaf)),
            "mod_item" => Some(rule(K::Namespace, "name", Namespace)),
            _ => None,
        },
        Language::Go => match node_kind {
            "function_declaration" => Some(rule(K::Function, "name", Leaf)),
            "method_declaration" => Some(rule(K::Method, "name", Leaf)),
            "type_spec" => Some(rule(K::Type, "name", Leaf)),
            _ => None,
        },
        Language::C => match node_kind {
            "function_definition" => Some(rule(K::Function, "declarator", Leaf)),
            "struct_specifier" => Some(rule(K::Struct, "name", Leaf)),
            "enum_specifier" => Some(rule(K::Enum, "name", Leaf)),
            "union_specifier" => Some(rule(K::Struct, "name", Leaf)),
            "type_definition" => Some(rule(K::Type, "declarator", Leaf)),
            _ => None,
        },
        Language::Cpp => match node_kind {
            "function_definition" => Some(rule(K::Function, "declarator", Leaf)),
            "class_specifier" => Some(rule(K::Class, "name", Container)),
            "struct_specifier" => Some(rule(K::Struct, "name", Container)),
            "enum_specifier" => Some(rule(K::Enum, "name", Leaf)),
            "union_specifier" => Some(rule(K::Struct, "name", Leaf)),
            "namespace_definition" => Some(rule(K::Namespace, "name", Namespace)),
            "type_definition" => Some(rule(K::Type, "declarator", Leaf)),
            _ => None,
        },
        Language::Java => match node_kind {
            "class_declaration" => Some(rule(K::Class, "name", Container)),
            "interface_declaration" => Some(rule(K::Interface, "name", Container)),
            "enum_declaration" => Some(rule(K::Enum, "name", Container)),
            "method_declaration" => Some(rule(K::Method, "name", Leaf)),
            "constructor_declaration" => Some(rule(K::Constructor, "name", Leaf)),
            "field_declaration" => Some(rule(K::Field, "declarator", Leaf)),
            _ => None,
        },
        Language::Ruby => match node_kind {
            "method" => Some(rule(K::Method, "name", Leaf)),
            "singleton_method" => Some(rule(K::Method, "name", Leaf)),
            "class" => Some(rule(K::Class, "name", Container)),
            "module" => Some(rule(K::Namespace, "name", Namespace)),
            _ => None,
        },
        Language::CSharp => match node_kind {
            "class_declaration" | "record_declaration" => Some(rule(K::Class, "name", Container)),
            "interface_declaration" => Some(rule(K::Interface, "name", Container)),
            "struct_declaration" => Some(rule(K::Struct, "name", Container)),
            "enum_declaration" => Some(rule(K::Enum, "name", Leaf)),
            "method_declaration" => Some(rule(K::Method, "name", Leaf)),
            "constructor_declaration" => Some(rule(K::Constructor, "name", Leaf)),
            "property_declaration" => Some(rule(K::Property, "name", Leaf)),
            "field_declaration" => Some(rule(K::Field, "declarator", Leaf)),
            "event_declaration" => Some(rule(K::Event, "name", Leaf)),
            "event_field_declaration" => Some(rule(K::Event, "declarator", Leaf)),
            "delegate_declaration" => Some(rule(K::Delegate, "name", Leaf)),
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                Some(rule(K::Namespace, "name", Namespace))
            }
            _ => None,
        },
        Language::VisualBasic | Language::Xml => None,
    }
}

/// Extract symbols and import/export statements from a tree-parsed file.
pub(crate) fn extract_tree(
    source: &str,
    language: Language,
    path: &str,
    parser: &mut Parser,
) -> Result<Extraction> {
    let grammar = language
        .grammar()
        .with_context(|| format!("no grammar configured for {language}"))?;
    parser.set_language(&grammar)?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow!("failed to parse {path}"))?;

    let source_bytes = source.as_bytes();
    let lines: Vec<&str> = source.lines().collect();
    let mut extraction = Extraction::default();

    collect_statements(tree.root_node(), source_bytes, language, &mut extraction);
    walk(
        tree.root_node(),
        source_bytes,
        &lines,
        language,
        path,
        None,
        &mut extraction.symbols,
    );

    Ok(extraction)
}

/// Shallow scan of the tree root's direct children for import/export
/// statements. Deliberately not recursive into nested scopes.
fn collect_statements(root: Node, source: &[u8], lang: Language, out: &mut Extraction) {
    let imports = lang.import_kinds();
    let exports = lang.export_kinds();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        let kind = child.kind();
        let bucket = if imports.contains(&kind) {
            &mut out.imports
        } else if exports.contains(&kind) {
            &mut out.exports
        } else {
            continue;
        };
        if let Ok(text) = child.utf8_text(source) {
            bucket.push(truncate_chars(text.trim(), MAX_STATEMENT_CHARS));
        }
    }
}

fn walk(
    node: Node,
    source: &[u8],
    lines: &[&str],
    lang: Language,
    path: &str,
    parent: Option<&str>,
    out: &mut Vec<Symbol>,
) {
    let mut cursor = node.walk();
    // A file-scoped namespace adopts the siblings that follow it.
    let mut adopted: Option<String> = None;

    for child in node.named_children(&mut cursor) {
        let current = adopted.as_deref().or(parent);

        // Rust impl blocks carry no symbol themselves but scope their
        // methods under the implemented type's name.
        if lang == Language::Rust && child.kind() == "impl_item" {
            let type_name = child
                .child_by_field_name("type")
                .and_then(|n| n.utf8_text(source).ok())
                .map(|t| t.trim().to_string());
            walk(
                child,
                source,
                lines,
                lang,
                path,
                type_name.as_deref().or(current),
                out,
            );
            continue;
        }

        let Some(rule) = symbol_rule(lang, child.kind()) else {
            walk(child, source, lines, lang, path, current, out);
            continue;
        };

        let Some(symbol) = build_symbol(child, source, lines, lang, path, current, &rule) else {
            walk(child, source, lines, lang, path, current, out);
            continue;
        };
        let name = symbol.name.clone();
        out.push(symbol);

        match rule.nesting {
            Nesting::Leaf => {}
            Nesting::Container => walk(child, source, lines, lang, path, Some(&name), out),
            Nesting::Namespace => {
                walk(child, source, lines, lang, path, Some(&name), out);
                // File-scoped namespaces have no body node; the siblings
                // that follow are their members.
                if child.kind() == "file_scoped_namespace_declaration"
                    && child.child_by_field_name("body").is_none()
                {
                    adopted = Some(name);
                }
            }
        }
    }
}

fn build_symbol(
    node: Node,
    source: &[u8],
    lines: &[&str],
    lang: Language,
    path: &str,
    parent: Option<&str>,
    rule: &NodeRule,
) -> Option<Symbol> {
    let name = extract_name(node, source, rule)?;
    let kind = effective_kind(node, lang, rule.kind);

    let start = node.start_position().row;
    let end = node.end_position().row.max(start);

    let signature = lines
        .get(start)
        .map(|line| truncate_chars(line.trim(), MAX_SIGNATURE_CHARS))
        .unwrap_or_default();

    let preview_end = (start + PREVIEW_LINES).min(end + 1);
    let preview = truncate_chars(
        lines
            .get(start..preview_end)
            .unwrap_or_default()
            .join("\n")
            .trim(),
        MAX_PREVIEW_CHARS,
    );

    let doc_comment = node
        .prev_named_sibling()
        .filter(|sibling| sibling.kind().contains("comment"))
        .and_then(|sibling| sibling.utf8_text(source).ok())
        .map(|text| truncate_chars(text.trim(), MAX_DOC_CHARS));

    Some(Symbol {
        name,
        kind,
        path: path.to_string(),
        start_line: start + 1,
        end_line: end + 1,
        signature,
        parent: parent.map(str::to_string),
        doc_comment,
        preview,
    })
}

/// A variable declarator whose initializer is a function-like expression is
/// a function in disguise.
fn effective_kind(node: Node, lang: Language, kind: SymbolKind) -> SymbolKind {
    if kind != SymbolKind::Variable {
        return kind;
    }
    if !matches!(lang, Language::TypeScript | Language::JavaScript) {
        return kind;
    }
    let function_like = node
        .child_by_field_name("value")
        .map(|value| {
            matches!(
                value.kind(),
                "arrow_function" | "function_expression" | "function" | "generator_function"
            )
        })
        .unwrap_or(false);
    if function_like {
        SymbolKind::Function
    } else {
        kind
    }
}

fn extract_name(node: Node, source: &[u8], rule: &NodeRule) -> Option<String> {
    let name_node = node
        .child_by_field_name(rule.name_field)
        .or_else(|| find_identifier_descendant(node, 4));
    let mut resolved = resolve_name_node(name_node?);
    // Declarators with initializers resolve to a subtree; take the
    // identifier inside, not the whole `name = value` text. Qualified
    // names (`App.Core`, `Vec::with_capacity`) are kept whole.
    if resolved.named_child_count() > 0 && !is_qualified_name(resolved) {
        if let Some(inner) = find_identifier_descendant(resolved, 3) {
            resolved = resolve_name_node(inner);
        }
    }
    let text = resolved.utf8_text(source).ok()?;
    let name = clean_name(text);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Descend declarator chains (`function_definition -> declarator ->
/// identifier`) plus the `name` field of variable declarators. Qualified
/// names stop the descent so `App.Core` stays intact.
fn resolve_name_node(mut node: Node) -> Node {
    for _ in 0..4 {
        if is_qualified_name(node) {
            break;
        }
        if let Some(inner) = node.child_by_field_name("declarator") {
            node = inner;
        } else if node.kind() == "variable_declarator" {
            match node.child_by_field_name("name") {
                Some(inner) => node = inner,
                None => break,
            }
        } else {
            break;
        }
    }
    node
}

fn is_qualified_name(node: Node) -> bool {
    matches!(
        node.kind(),
        "qualified_name" | "qualified_identifier" | "scoped_identifier" | "scoped_type_identifier"
    )
}

fn find_identifier_descendant(node: Node, max_depth: usize) -> Option<Node> {
    if max_depth == 0 {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    // Declarators carry the declared name; a type identifier in the same
    // scope names the type, so declarators win (`Widget gadget;` is
    // `gadget`, not `Widget`).
    for child in &children {
        if child.kind() == "variable_declarator" {
            return Some(*child);
        }
    }
    for child in &children {
        if matches!(
            child.kind(),
            "identifier" | "type_identifier" | "field_identifier"
        ) {
            return Some(*child);
        }
    }
    for child in children {
        if let Some(found) = find_identifier_descendant(child, max_depth - 1) {
            return Some(found);
        }
    }
    None
}

/// Strip parameter lists and pointer/reference sigils off C-like declarator
/// text so `*foo(int a)` names `foo`.
fn clean_name(raw: &str) -> String {
    let mut head = raw.trim();
    if let Some(paren) = head.find('(') {
        head = head[..paren].trim();
    }
    head = head.trim_matches(['*', '&', ' ']);
    head.split_whitespace().last().unwrap_or(head).to_string()
}
