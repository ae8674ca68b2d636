// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language registry: extension resolution, grammar lookup, strategy
//! selection.

use serde::{Deserialize, Serialize};

/// Supported languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Go,
    C,
    Cpp,
    Java,
    Ruby,
    CSharp,
    VisualBasic,
    Xml,
}

/// How a language's files are turned into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// tree-sitter grammar traversal.
    Tree,
    /// Line-oriented regex extraction for grammars without a tree parser.
    Pattern(PatternFlavor),
}

/// Which pattern extractor applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternFlavor {
    /// Keyword-block languages (`Class Foo` ... `End Class`).
    Basic,
    /// Markup with an element stack (`<Tag>` ... `</Tag>`).
    Markup,
}

impl Language {
    /// Resolve a language from a file extension. `None` means the file is
    /// unsupported and gets skipped, not errored.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ts" | "tsx" => Some(Self::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "py" => Some(Self::Python),
            "rs" => Some(Self::Rust),
            "go" => Some(Self::Go),
            "c" | "h" => Some(Self::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Some(Self::Cpp),
            "java" => Some(Self::Java),
            "rb" => Some(Self::Ruby),
            "cs" => Some(Self::CSharp),
            "vb" => Some(Self::VisualBasic),
            "xml" | "xaml" => Some(Self::Xml),
            _ => None,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn strategy(self) -> Strategy {
        match self {
            Self::VisualBasic => Strategy::Pattern(PatternFlavor::Basic),
            Self::Xml => Strategy::Pattern(PatternFlavor::Markup),
            _ => Strategy::Tree,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Ruby => "ruby",
            Self::CSharp => "csharp",
            Self::VisualBasic => "visualbasic",
            Self::Xml => "xml",
        }
    }

    /// Grammar for tree-driven languages; `None` for pattern-driven ones.
    pub fn grammar(self) -> Option<tree_sitter::Language> {
        match self {
            Self::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Self::JavaScript => Some(tree_sitter_javascript::LANGUAGE.into()),
            Self::Python => Some(tree_sitter_python::LANGUAGE.into()),
            Self::Rust => Some(tree_sitter_rust::LANGUAGE.into()),
            Self::Go => Some(tree_sitter_go::LANGUAGE.into()),
            Self::C => Some(tree_sitter_c::LANGUAGE.into()),
            Self::Cpp => Some(tree_sitter_cpp::LANGUAGE.into()),
            Self::Java => Some(tree_sitter_java::LANGUAGE.into()),
            Self::Ruby => Some(tree_sitter_ruby::LANGUAGE.into()),
            Self::CSharp => Some(tree_sitter_c_sharp::LANGUAGE.into()),
            Self::VisualBasic | Self::Xml => None,
        }
    }

    /// Node kinds of direct tree-root children recorded as import statements.
    pub(crate) fn import_kinds(self) -> &'static [&'static str] {
        match self {
            Self::TypeScript | Self::JavaScript => &["import_statement"],
            Self::Python => &[
                "import_statement",
                "import_from_statement",
                "future_import_statement",
            ],
            Self::Rust => &["use_declaration"],
            Self::Go => &["import_declaration"],
            Self::C | Self::Cpp => &["preproc_include"],
            Self::Java => &["import_declaration"],
            Self::CSharp => &["using_directive"],
            Self::Ruby | Self::VisualBasic | Self::Xml => &[],
        }
    }

    /// Node kinds of direct tree-root children recorded as export statements.
    pub(crate) fn export_kinds(self) -> &'static [&'static str] {
        match self {
            Self::TypeScript | Self::JavaScript => &["export_statement"],
            _ => &[],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
