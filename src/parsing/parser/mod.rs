//! SQL parser
//!
//! Recursive descent over the lexed token vector, with precedence climbing
//! for expressions. Split into modules by statement family:
//! - expr_parser: expressions and operator precedence
//! - dml_parser: SELECT, INSERT, UPDATE, DELETE, IMPORT
//! - ddl_parser: CREATE, ALTER, DROP, TRUNCATE and column definitions
//!
//! The parser only checks that the syntax is well-formed; whether a table or
//! column actually exists is the executors' job.

mod ddl_parser;
mod dml_parser;
mod expr_parser;

use crate::error::{Error, Result};
use crate::parsing::ast::Statement;
use crate::parsing::lexer::{Keyword, Lexer, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Parses the input string as a single SQL statement, ending with an
    /// optional semicolon.
    pub fn parse(sql: &str) -> Result<Statement> {
        let mut parser = Parser::new(sql);
        let statement = parser.parse_statement()?;
        parser.next_is(&TokenKind::Semicolon);
        parser.expect_end()?;
        Ok(statement)
    }

    /// Parses a list of statements, each terminated by a semicolon.
    pub fn parse_list(sql: &str) -> Result<Vec<Statement>> {
        let mut parser = Parser::new(sql);
        let mut statements = Vec::new();
        while parser.peek().kind != TokenKind::Eof {
            statements.push(parser.parse_statement()?);
            if !parser.next_is(&TokenKind::Semicolon) {
                let token = parser.peek().clone();
                return Err(Error::expected(
                    "semicolon at the end of statement",
                    token.kind,
                    token.offset,
                ));
            }
        }
        Ok(statements)
    }

    fn new(sql: &str) -> Parser {
        Parser {
            tokens: Lexer::new(sql).lex(),
            pos: 0,
        }
    }

    /// Parses one statement, dispatching on the leading keyword.
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Keyword(Keyword::Select) => self.parse_select_statement(),
            TokenKind::Keyword(Keyword::Create) => self.parse_create(),
            TokenKind::Keyword(Keyword::Drop) => self.parse_drop(),
            TokenKind::Keyword(Keyword::Truncate) => self.parse_truncate(),
            TokenKind::Keyword(Keyword::Alter) => self.parse_alter(),
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert(),
            TokenKind::Keyword(Keyword::Update) => self.parse_update(),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete(),
            TokenKind::Keyword(Keyword::Import) => self.parse_import(),
            TokenKind::Keyword(Keyword::Show) => {
                self.advance();
                self.expect_keyword(Keyword::Tables)?;
                Ok(Statement::ShowTables {
                    offset: token.offset,
                })
            }
            TokenKind::Keyword(Keyword::Print) => {
                self.advance();
                let inner = self.parse_statement()?;
                Ok(Statement::Print(Box::new(inner), token.offset))
            }
            kind => Err(Error::expected("statement", kind, token.offset)),
        }
    }

    // Token helpers.

    /// Peeks the current token. The token vector always ends with Eof, so
    /// this never runs off the end.
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Peeks the token after the current one.
    pub(super) fn peek_next(&self) -> &Token {
        &self.tokens[(self.pos + 1).min(self.tokens.len() - 1)]
    }

    /// Consumes and returns the current token. Eof is never consumed.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it matches, returning whether it did.
    pub(super) fn next_is(&mut self, kind: &TokenKind) -> bool {
        if &self.peek().kind == kind {
            self.advance();
            return true;
        }
        false
    }

    pub(super) fn next_is_keyword(&mut self, keyword: Keyword) -> bool {
        self.next_is(&TokenKind::Keyword(keyword))
    }

    /// Consumes the current token if it is the given keyword; no-op otherwise.
    pub(super) fn skip_keyword(&mut self, keyword: Keyword) {
        self.next_is_keyword(keyword);
    }

    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        let token = self.peek().clone();
        if !self.next_is_keyword(keyword) {
            return Err(Error::expected(
                format!("'{}'", keyword),
                token.kind,
                token.offset,
            ));
        }
        Ok(())
    }

    pub(super) fn expect_token(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        let token = self.peek().clone();
        if !self.next_is(&kind) {
            return Err(Error::expected(what, token.kind, token.offset));
        }
        Ok(())
    }

    /// Consumes an identifier, returning its name and offset.
    pub(super) fn next_ident(&mut self, what: &str) -> Result<(String, usize)> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) => Ok((name, token.offset)),
            kind => Err(Error::expected(what, kind, token.offset)),
        }
    }

    /// True if the current identifier equals the given word, ignoring case.
    pub(super) fn next_is_ident_eq(&mut self, word: &str) -> bool {
        if let TokenKind::Ident(name) = &self.peek().kind {
            if name.eq_ignore_ascii_case(word) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn expect_end(&mut self) -> Result<()> {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            return Err(Error::expected("end of input", token.kind, token.offset));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::ast::{InsertSource, Projection, Statement};

    #[test]
    fn parse_single_statement_with_semicolon() {
        assert!(Parser::parse("SELECT 1;").is_ok());
        assert!(Parser::parse("SELECT 1").is_ok());
        assert!(Parser::parse("SELECT 1; SELECT 2").is_err());
    }

    #[test]
    fn parse_statement_list_requires_semicolons() {
        let statements = Parser::parse_list("SELECT 1; SELECT 2;").unwrap();
        assert_eq!(statements.len(), 2);
        assert!(Parser::parse_list("SELECT 1 SELECT 2;").is_err());
        assert!(Parser::parse_list("SELECT 1; SELECT 2").is_err());
    }

    #[test]
    fn parse_insert_values() {
        let statement = Parser::parse("INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y')").unwrap();
        let Statement::Insert(insert) = statement else {
            panic!("expected INSERT");
        };
        assert_eq!(insert.table, "t");
        assert_eq!(insert.columns.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        let InsertSource::Values(rows) = insert.source else {
            panic!("expected VALUES");
        };
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn parse_select_star() {
        let statement = Parser::parse("SELECT * FROM t").unwrap();
        let Statement::Select(select) = statement else {
            panic!("expected SELECT");
        };
        assert_eq!(select.columns, Projection::All);
        assert!(select.from.is_some());
    }

    #[test]
    fn parse_union() {
        let statement = Parser::parse("SELECT a FROM t UNION ALL SELECT a FROM u").unwrap();
        let Statement::Union { distinct, .. } = statement else {
            panic!("expected UNION");
        };
        assert!(!distinct);
    }

    #[test]
    fn parse_show_and_print() {
        assert!(matches!(
            Parser::parse("SHOW TABLES").unwrap(),
            Statement::ShowTables { .. }
        ));
        assert!(matches!(
            Parser::parse("PRINT SELECT 1").unwrap(),
            Statement::Print(_, _)
        ));
    }

    #[test]
    fn garbage_tokens_poison_the_parse() {
        assert!(Parser::parse("SELECT a ? b FROM t").is_err());
    }
}
