//! SQL parsing
//!
//! The lexer turns the source string into a token vector (each token keeps
//! its byte offset for diagnostics), and the parser turns tokens into the
//! statement and expression AST.

pub mod ast;
mod lexer;
mod parser;

use crate::error::Result;
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::Parser;

use ast::Statement;

/// Parses a single SQL statement, with an optional trailing semicolon.
pub fn parse_sql(sql: &str) -> Result<Statement> {
    Parser::parse(sql)
}

/// Parses a list of SQL statements, separated and terminated by semicolons.
pub fn parse_statements(sql: &str) -> Result<Vec<Statement>> {
    Parser::parse_list(sql)
}
