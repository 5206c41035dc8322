//! Core data model shared by the loader, the analysis stages and the
//! reporters: symbol kinds, source positions, symbols and references.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Category of a declared or referenced symbol.
///
/// `Unknown` only ever shows up on resolved references whose target falls
/// outside the four declared categories (builtins, external objects); a
/// declaration always carries one of the other four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Function,
    Type,
    Variable,
    Constant,
    Unknown,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Function => "function",
            Kind::Type => "type",
            Kind::Variable => "variable",
            Kind::Constant => "constant",
            Kind::Unknown => "unknown",
        }
    }

    /// Capitalized singular, for report headings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Kind::Function => "Function",
            Kind::Type => "Type",
            Kind::Variable => "Variable",
            Kind::Constant => "Constant",
            Kind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A 1-based line:column position in a source file. Columns count bytes
/// from the start of the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A declared top-level entity: function, type, variable or constant.
#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub name: String,
    pub kind: Kind,
    pub file: PathBuf,
    pub start: Position,
    pub end: Position,
    pub exported: bool,
    pub package: String,
}

impl Symbol {
    /// The identity of this symbol in the use-graph.
    pub fn key(&self) -> String {
        symbol_key(&self.package, &self.name, self.kind)
    }
}

/// Render the `(package, name, kind)` triple as the dotted string used as
/// a vertex identity. Two symbols collide iff all three components match.
pub fn symbol_key(package: &str, name: &str, kind: Kind) -> String {
    format!("{}.{}.{}", package, name, kind.as_str())
}

/// Whether an identifier is externally visible: its first character is an
/// uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// A resolved use-site of a symbol.
#[derive(Debug, Clone)]
pub struct Reference {
    pub file: PathBuf,
    pub position: Position,
}
