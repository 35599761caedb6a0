//! DML statement parsing: SELECT, INSERT, UPDATE, DELETE, IMPORT

use super::Parser;
use crate::error::{Error, Result};
use crate::parsing::ast::{
    ColumnRef, DeleteStatement, GroupBy, ImportStatement, InsertSource, InsertStatement, JoinKind,
    OrderExpr, OrderKey, Projection, ProjectionColumn, SelectStatement, Statement, TableExpression,
    Top, UpdateStatement,
};
use crate::parsing::lexer::{Keyword, TokenKind};

impl Parser {
    /// Parses a SELECT statement, optionally followed by a UNION of a second
    /// SELECT.
    pub(super) fn parse_select_statement(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        let lhs = self.parse_select()?;

        if self.next_is_keyword(Keyword::Union) {
            let distinct = !self.next_is_keyword(Keyword::All);
            if self.peek().kind != TokenKind::Keyword(Keyword::Select) {
                let token = self.peek().clone();
                return Err(Error::expected(
                    "'SELECT' after 'UNION'",
                    token.kind,
                    token.offset,
                ));
            }
            let rhs = self.parse_select()?;
            return Ok(Statement::Union {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                distinct,
                offset,
            });
        }
        Ok(Statement::Select(lhs))
    }

    /// Parses one SELECT query, clause by clause in grammar order.
    pub(super) fn parse_select(&mut self) -> Result<SelectStatement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Select)?;

        let distinct = self.next_is_keyword(Keyword::Distinct);
        let top = self.parse_top_clause()?;
        let columns = self.parse_projection()?;

        let mut into = None;
        if self.next_is_keyword(Keyword::Into) {
            let (table, _) = self.next_ident("table name after 'INTO'")?;
            into = Some(table);
        }

        let mut from = None;
        if self.next_is_keyword(Keyword::From) {
            from = Some(self.parse_table_expression()?);
        }

        let mut r#where = None;
        if self.next_is_keyword(Keyword::Where) {
            r#where = Some(self.parse_expression()?);
        }

        let group_by = self.parse_group_by_clause()?;

        let mut having = None;
        if self.next_is_keyword(Keyword::Having) {
            having = Some(self.parse_expression()?);
        }

        let order_by = self.parse_order_by_clause(&columns)?;

        Ok(SelectStatement {
            columns,
            distinct,
            top,
            into,
            from,
            r#where,
            group_by,
            having,
            order_by,
            offset,
        })
    }

    /// Parses `TOP n [PERC]`, if present.
    fn parse_top_clause(&mut self) -> Result<Option<Top>> {
        if !self.next_is_keyword(Keyword::Top) {
            return Ok(None);
        }
        let token = self.advance();
        let TokenKind::Int(value) = token.kind else {
            return Err(Error::expected(
                "integer for TOP value",
                token.kind,
                token.offset,
            ));
        };
        if value < 0 {
            return Err(Error::new("TOP value must be non-negative", token.offset));
        }
        let percent = self.next_is_keyword(Keyword::Perc);
        Ok(Some(Top {
            value: value as u64,
            percent,
            offset: token.offset,
        }))
    }

    /// Parses the projection: `*` or a list of expressions with optional
    /// aliases.
    fn parse_projection(&mut self) -> Result<Projection> {
        if self.next_is(&TokenKind::Asterisk) {
            return Ok(Projection::All);
        }
        let mut columns = Vec::new();
        loop {
            let expression = self.parse_expression()?;
            let mut alias = None;
            if self.next_is_keyword(Keyword::As) {
                let (name, _) = self.next_ident("identifier in alias")?;
                alias = Some(name);
            }
            columns.push(ProjectionColumn { expression, alias });
            if !self.next_is(&TokenKind::Comma) {
                break;
            }
        }
        Ok(Projection::Columns(columns))
    }

    /// Parses `GROUP BY expr, ...` or its `PARTITION BY` synonym.
    fn parse_group_by_clause(&mut self) -> Result<Option<GroupBy>> {
        let partition = if self.next_is_keyword(Keyword::Group) {
            false
        } else if self.next_is_keyword(Keyword::Partition) {
            true
        } else {
            return Ok(None);
        };
        self.expect_keyword(Keyword::By)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_expression()?);
            if !self.next_is(&TokenKind::Comma) {
                break;
            }
        }
        if !partition && self.peek().kind == TokenKind::Keyword(Keyword::Partition) {
            let token = self.peek().clone();
            return Err(Error::new(
                "'PARTITION BY' can't be used with 'GROUP BY'",
                token.offset,
            ));
        }
        Ok(Some(GroupBy { columns, partition }))
    }

    /// Parses `ORDER BY (expr|ordinal) [ASC|DESC], ...`. Ordinals are
    /// validated here: they must be positive, within the projection, and are
    /// rejected under `SELECT *`.
    fn parse_order_by_clause(&mut self, projection: &Projection) -> Result<Vec<OrderKey>> {
        if !self.next_is_keyword(Keyword::Order) {
            return Ok(Vec::new());
        }
        self.expect_keyword(Keyword::By)?;
        let mut keys = Vec::new();
        loop {
            let expr = self.parse_order_expr(projection)?;
            let descending = if self.next_is_keyword(Keyword::Desc) {
                true
            } else {
                self.skip_keyword(Keyword::Asc);
                false
            };
            keys.push(OrderKey { expr, descending });
            if !self.next_is(&TokenKind::Comma) {
                break;
            }
        }
        Ok(keys)
    }

    fn parse_order_expr(&mut self, projection: &Projection) -> Result<OrderExpr> {
        if let TokenKind::Int(ordinal) = self.peek().kind {
            let token = self.advance();
            let columns = match projection {
                Projection::All => {
                    return Err(Error::new(
                        "Ordinal is not allowed when using SELECT *",
                        token.offset,
                    ));
                }
                Projection::Columns(columns) => columns,
            };
            if ordinal < 1 {
                return Err(Error::new(
                    format!("Ordinal must be positive, {} given", ordinal),
                    token.offset,
                ));
            }
            if ordinal as usize > columns.len() {
                return Err(Error::new("Ordinal is out of range", token.offset));
            }
            return Ok(OrderExpr::Ordinal {
                index: ordinal as usize - 1,
                offset: token.offset,
            });
        }
        Ok(OrderExpr::Expression(self.parse_expression()?))
    }

    /// Parses a FROM-clause relation, folding joins left-associatively.
    fn parse_table_expression(&mut self) -> Result<TableExpression> {
        let mut lhs = self.parse_table_primary()?;
        loop {
            let offset = self.peek().offset;
            let kind = if self.next_is(&TokenKind::Comma) {
                JoinKind::Cross
            } else if self.next_is_keyword(Keyword::Cross) {
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Cross
            } else if self.next_is_keyword(Keyword::Join) {
                JoinKind::Inner
            } else if self.next_is_keyword(Keyword::Inner) {
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Inner
            } else if self.next_is_keyword(Keyword::Left) {
                self.skip_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Left
            } else if self.next_is_keyword(Keyword::Right) {
                self.skip_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Right
            } else if self.next_is_keyword(Keyword::Full) {
                self.expect_keyword(Keyword::Outer)?;
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Full
            } else {
                return Ok(lhs);
            };

            let rhs = self.parse_table_primary()?;
            let on = if kind == JoinKind::Cross {
                None
            } else {
                self.expect_keyword(Keyword::On)?;
                let on_lhs = self.parse_column_ref()?;
                self.expect_token(TokenKind::Equal, "'=' after column name")?;
                let on_rhs = self.parse_column_ref()?;
                Some((on_lhs, on_rhs))
            };
            lhs = TableExpression::Join {
                kind,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                on,
                offset,
            };
        }
    }

    /// Parses a named table or a parenthesized subquery, with an optional
    /// alias.
    fn parse_table_primary(&mut self) -> Result<TableExpression> {
        let token = self.peek().clone();
        if self.next_is(&TokenKind::OpenParen) {
            if self.peek().kind == TokenKind::Keyword(Keyword::Select) {
                let select = self.parse_select()?;
                self.expect_token(TokenKind::CloseParen, "')' to close subquery")?;
                let alias = self.parse_table_alias()?;
                return Ok(TableExpression::Subquery {
                    select: Box::new(select),
                    alias,
                    offset: token.offset,
                });
            }
            let inner = self.parse_table_expression()?;
            self.expect_token(TokenKind::CloseParen, "')' to close table expression")?;
            return Ok(inner);
        }
        let (name, offset) = self.next_ident("table name")?;
        let alias = self.parse_table_alias()?;
        Ok(TableExpression::Table {
            name,
            alias,
            offset,
        })
    }

    fn parse_table_alias(&mut self) -> Result<Option<String>> {
        if self.next_is_keyword(Keyword::As) {
            let (alias, _) = self.next_ident("alias")?;
            return Ok(Some(alias));
        }
        if let TokenKind::Ident(alias) = self.peek().kind.clone() {
            self.advance();
            return Ok(Some(alias));
        }
        Ok(None)
    }

    /// Parses a possibly qualified column reference (`c` or `t.c`).
    fn parse_column_ref(&mut self) -> Result<ColumnRef> {
        let (name, _) = self.next_ident("column name")?;
        if self.next_is(&TokenKind::Period) {
            let (field, _) = self.next_ident("column name")?;
            return Ok(ColumnRef {
                table: Some(name),
                name: field,
            });
        }
        Ok(ColumnRef { table: None, name })
    }

    /// Parses an INSERT statement.
    pub(super) fn parse_insert(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let (table, _) = self.next_ident("table name")?;

        let mut columns = None;
        if self.next_is(&TokenKind::OpenParen) {
            let mut names = Vec::new();
            loop {
                let (name, _) = self.next_ident("column name")?;
                names.push(name);
                if !self.next_is(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_token(TokenKind::CloseParen, "')' to close column list")?;
            columns = Some(names);
        }

        let source = if self.next_is_keyword(Keyword::Values) {
            let mut rows = Vec::new();
            loop {
                rows.push(self.parse_expression_list("value list")?);
                if !self.next_is(&TokenKind::Comma) {
                    break;
                }
            }
            InsertSource::Values(rows)
        } else if self.peek().kind == TokenKind::Keyword(Keyword::Select) {
            InsertSource::Select(Box::new(self.parse_select()?))
        } else {
            let token = self.peek().clone();
            return Err(Error::expected(
                "'VALUES' or 'SELECT'",
                token.kind,
                token.offset,
            ));
        };

        Ok(Statement::Insert(InsertStatement {
            table,
            columns,
            source,
            offset,
        }))
    }

    /// Parses an UPDATE statement.
    pub(super) fn parse_update(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Update)?;
        let (table, _) = self.next_ident("table name after 'UPDATE'")?;
        self.expect_keyword(Keyword::Set)?;

        let mut set: Vec<(String, crate::parsing::ast::Expression)> = Vec::new();
        loop {
            let (column, column_offset) = self.next_ident("column name")?;
            self.expect_token(TokenKind::Equal, "'='")?;
            let expr = self.parse_expression()?;
            if set.iter().any(|(name, _)| name == &column) {
                return Err(Error::new(
                    format!("Column '{}' set multiple times", column),
                    column_offset,
                ));
            }
            set.push((column, expr));
            if !self.next_is(&TokenKind::Comma) {
                break;
            }
        }

        let mut r#where = None;
        if self.next_is_keyword(Keyword::Where) {
            r#where = Some(self.parse_expression()?);
        }

        Ok(Statement::Update(UpdateStatement {
            table,
            set,
            r#where,
            offset,
        }))
    }

    /// Parses a DELETE statement.
    pub(super) fn parse_delete(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let (table, _) = self.next_ident("table name after 'FROM'")?;
        let mut r#where = None;
        if self.next_is_keyword(Keyword::Where) {
            r#where = Some(self.parse_expression()?);
        }
        Ok(Statement::Delete(DeleteStatement {
            table,
            r#where,
            offset,
        }))
    }

    /// Parses `IMPORT CSV 'file' INTO table [ENGINE ...]`.
    pub(super) fn parse_import(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Import)?;
        if !self.next_is_ident_eq("CSV") {
            let token = self.peek().clone();
            return Err(Error::expected("import mode ('CSV')", token.kind, token.offset));
        }
        let token = self.advance();
        let TokenKind::Str(filename) = token.kind else {
            return Err(Error::expected(
                "file name (string)",
                token.kind,
                token.offset,
            ));
        };
        self.expect_keyword(Keyword::Into)?;
        let (table, _) = self.next_ident("table name")?;
        let engine = self.parse_engine_clause()?;
        Ok(Statement::Import(ImportStatement {
            filename,
            table,
            engine,
            offset,
        }))
    }
}
