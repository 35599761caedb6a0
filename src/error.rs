//! Error type for the SQL engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// A single error kind returned from every fallible operation. The category
/// (parse, name resolution, type, constraint, ...) is conveyed by the message
/// prefix; `offset` is the byte offset of the offending token in the source
/// string, or 0 when the failing operation had no source position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Error {
    pub message: String,
    pub offset: usize,
}

impl Error {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Error {
            message: message.into(),
            offset,
        }
    }

    /// An error with no source position. Used by value-level operations;
    /// the evaluator attaches the position of the failing AST node.
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Error::new(message, 0)
    }

    /// The "Expected X, got Y" shape used by the parser.
    pub fn expected(what: impl std::fmt::Display, got: impl std::fmt::Display, offset: usize) -> Self {
        Error::new(format!("Expected {}, got '{}'", what, got), offset)
    }

    /// Attaches an offset if the error doesn't carry one yet.
    pub fn at(mut self, offset: usize) -> Self {
        if self.offset == 0 {
            self.offset = offset;
        }
        self
    }
}
