//! Lexing and parsing of Go source files.

pub mod ast;
mod lexer;
mod parser;
mod token;

pub use ast::{NodeId, NodeIds, SourceFile};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::{Token, TokenType};

use crate::model::Position;
use thiserror::Error;

/// A lex or parse error inside one source file. Files are identified by
/// the loader, which attaches these to their package.
#[derive(Debug, Clone, Error)]
#[error("{position}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub position: Position,
}
