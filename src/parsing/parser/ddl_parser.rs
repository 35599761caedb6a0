//! DDL statement parsing: CREATE, ALTER, DROP, TRUNCATE

use super::Parser;
use crate::error::{Error, Result};
use crate::parsing::ast::{AlterTable, CreateTable, EngineSpec, Statement};
use crate::parsing::lexer::{Keyword, TokenKind};
use crate::types::{Column, DataType, TableConstraints, Value};

/// The `IF EXISTS` / `IF NOT EXISTS` prefix of a table statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Existence {
    Unspecified,
    Exists,
    NotExists,
}

impl Parser {
    pub(super) fn parse_create(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;

        let existence = self.parse_existence()?;
        if existence == Existence::Exists {
            return Err(Error::new(
                "'IF EXISTS' cannot be used with CREATE TABLE",
                self.peek().offset,
            ));
        }

        let (name, _) = self.next_ident("table name")?;

        let mut columns = Vec::new();
        let mut constraints = TableConstraints::default();
        if self.next_is(&TokenKind::OpenParen) {
            loop {
                // CHECK / CONSTRAINT entries may follow a column directly or
                // stand alone in the list.
                if !matches!(
                    self.peek().kind,
                    TokenKind::Keyword(Keyword::Check) | TokenKind::Keyword(Keyword::Constraint)
                ) {
                    columns.push(self.parse_column_def()?);
                }
                self.parse_table_checks(&mut constraints)?;
                if !self.next_is(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_token(TokenKind::CloseParen, "')' to close column list")?;
        }

        let engine = self.parse_engine_clause()?;
        Ok(Statement::CreateTable(CreateTable {
            name,
            if_not_exists: existence == Existence::NotExists,
            columns,
            constraints,
            engine,
            offset,
        }))
    }

    pub(super) fn parse_drop(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Drop)?;
        self.expect_keyword(Keyword::Table)?;
        let existence = self.parse_existence()?;
        if existence == Existence::NotExists {
            return Err(Error::new(
                "'IF NOT EXISTS' cannot be used with DROP TABLE",
                self.peek().offset,
            ));
        }
        let (name, _) = self.next_ident("table name")?;
        Ok(Statement::DropTable {
            name,
            if_exists: existence == Existence::Exists,
            offset,
        })
    }

    pub(super) fn parse_truncate(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Truncate)?;
        self.expect_keyword(Keyword::Table)?;
        let existence = self.parse_existence()?;
        if existence == Existence::NotExists {
            return Err(Error::new(
                "'IF NOT EXISTS' cannot be used with TRUNCATE TABLE",
                self.peek().offset,
            ));
        }
        let (name, _) = self.next_ident("table name")?;
        Ok(Statement::TruncateTable {
            name,
            if_exists: existence == Existence::Exists,
            offset,
        })
    }

    /// Parses ALTER TABLE with its comma-separated ADD/ALTER/DROP actions
    /// over columns, the table CHECK, and named constraints.
    pub(super) fn parse_alter(&mut self) -> Result<Statement> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let existence = self.parse_existence()?;
        if existence == Existence::NotExists {
            return Err(Error::new(
                "'IF NOT EXISTS' cannot be used with ALTER TABLE",
                self.peek().offset,
            ));
        }
        let (name, _) = self.next_ident("table name")?;

        let mut alter = AlterTable {
            name,
            if_exists: existence == Existence::Exists,
            add_columns: Vec::new(),
            alter_columns: Vec::new(),
            drop_columns: Vec::new(),
            add_check: None,
            alter_check: None,
            drop_check: false,
            add_constraints: Vec::new(),
            alter_constraints: Vec::new(),
            drop_constraints: Vec::new(),
            offset,
        };

        loop {
            if self.next_is_keyword(Keyword::Add) {
                if self.next_is_keyword(Keyword::Check) {
                    if alter.add_check.is_some() {
                        return Err(Error::new("Check already added", self.peek().offset));
                    }
                    alter.add_check = Some(self.parse_expression()?);
                } else if self.next_is_keyword(Keyword::Constraint) {
                    let (constraint, _) = self.next_ident("constraint name")?;
                    self.expect_keyword(Keyword::Check)?;
                    alter.add_constraints.push((constraint, self.parse_expression()?));
                } else {
                    self.skip_keyword(Keyword::Column);
                    alter.add_columns.push(self.parse_column_def()?);
                }
            } else if self.next_is_keyword(Keyword::Alter) {
                if self.next_is_keyword(Keyword::Check) {
                    if alter.alter_check.is_some() {
                        return Err(Error::new("Check already altered", self.peek().offset));
                    }
                    alter.alter_check = Some(self.parse_expression()?);
                } else if self.next_is_keyword(Keyword::Constraint) {
                    let (constraint, _) = self.next_ident("constraint name")?;
                    self.expect_keyword(Keyword::Check)?;
                    alter
                        .alter_constraints
                        .push((constraint, self.parse_expression()?));
                } else {
                    self.expect_keyword(Keyword::Column)?;
                    alter.alter_columns.push(self.parse_column_def()?);
                }
            } else if self.next_is_keyword(Keyword::Drop) {
                if self.next_is_keyword(Keyword::Check) {
                    if alter.drop_check {
                        return Err(Error::new("Check already dropped", self.peek().offset));
                    }
                    alter.drop_check = true;
                } else if self.next_is_keyword(Keyword::Constraint) {
                    let (constraint, _) = self.next_ident("constraint name")?;
                    alter.drop_constraints.push(constraint);
                } else {
                    self.expect_keyword(Keyword::Column)?;
                    loop {
                        let (column, _) = self.next_ident("column name")?;
                        alter.drop_columns.push(column);
                        if self.peek().kind != TokenKind::Comma
                            || !matches!(self.peek_next().kind, TokenKind::Ident(_))
                        {
                            break;
                        }
                        self.advance();
                    }
                }
            } else {
                let token = self.peek().clone();
                return Err(Error::expected(
                    "'ADD', 'ALTER' or 'DROP'",
                    token.kind,
                    token.offset,
                ));
            }
            if !self.next_is(&TokenKind::Comma) {
                break;
            }
        }

        Ok(Statement::AlterTable(alter))
    }

    /// Parses one column definition with its per-column constraints.
    fn parse_column_def(&mut self) -> Result<Column> {
        let (name, _) = self.next_ident("column name")?;
        let (type_name, type_offset) = self.next_ident("column type")?;
        let Some(datatype) = DataType::from_name(&type_name) else {
            return Err(Error::new(
                format!("Invalid type: '{}'", type_name),
                type_offset,
            ));
        };

        let mut column = Column::new(name, datatype);
        loop {
            let token = self.peek().clone();
            if self.next_is_ident_eq("AUTO_INCREMENT") {
                column.auto_increment = true;
            } else if self.next_is_keyword(Keyword::Unique) {
                if column.unique {
                    return Err(Error::new("Column is already 'UNIQUE'", token.offset));
                }
                column.unique = true;
            } else if self.next_is_keyword(Keyword::Not) {
                self.expect_keyword(Keyword::Null)?;
                if column.not_null {
                    return Err(Error::new("Column is already 'NOT NULL'", token.offset));
                }
                column.not_null = true;
            } else if self.next_is_keyword(Keyword::Default) {
                if column.default.is_some() {
                    return Err(Error::new(
                        "Column already has its default value",
                        token.offset,
                    ));
                }
                column.default = Some(self.parse_literal_value()?);
            } else if self.next_is_keyword(Keyword::Primary) {
                self.expect_keyword(Keyword::Key)?;
                if column.unique || column.not_null {
                    return Err(Error::new(
                        "Column is already 'UNIQUE' or 'NOT NULL'",
                        token.offset,
                    ));
                }
                column = column.primary_key();
            } else if self.next_is_keyword(Keyword::Foreign) {
                self.expect_keyword(Keyword::Key)?;
                self.expect_keyword(Keyword::References)?;
                let (table, _) = self.next_ident("referenced table name")?;
                self.expect_token(TokenKind::OpenParen, "'('")?;
                let (referenced, _) = self.next_ident("referenced column name")?;
                self.expect_token(TokenKind::CloseParen, "')'")?;
                column = column.foreign_key(table, referenced);
            } else {
                break;
            }
        }
        Ok(column)
    }

    /// Parses any `CHECK expr` / `CONSTRAINT name CHECK expr` entries
    /// following a column definition.
    fn parse_table_checks(&mut self, constraints: &mut TableConstraints) -> Result<()> {
        loop {
            let token = self.peek().clone();
            if self.next_is_keyword(Keyword::Check) {
                if constraints.check.is_some() {
                    return Err(Error::new("Default rule already exists", token.offset));
                }
                constraints.check = Some(self.parse_expression()?);
            } else if self.next_is_keyword(Keyword::Constraint) {
                let (name, name_offset) = self.next_ident("constraint name")?;
                if constraints.has_named(&name) {
                    return Err(Error::new(
                        format!("Constraint with name '{}' already exists", name),
                        name_offset,
                    ));
                }
                self.expect_keyword(Keyword::Check)?;
                constraints.named.push((name, self.parse_expression()?));
            } else {
                return Ok(());
            }
        }
    }

    /// Parses a literal token into a Value (for DEFAULT clauses).
    fn parse_literal_value(&mut self) -> Result<Value> {
        let token = self.advance();
        match token.kind {
            TokenKind::Int(i) => Ok(Value::Int(i)),
            TokenKind::Float(f) => Ok(Value::Float(f)),
            TokenKind::Str(s) => Ok(Value::Varchar(s)),
            TokenKind::Bool(b) => Ok(Value::Bool(b)),
            TokenKind::Date(d) => Ok(Value::from_date(d)),
            TokenKind::Keyword(Keyword::Null) => Ok(Value::Null),
            kind => Err(Error::expected("value after 'DEFAULT'", kind, token.offset)),
        }
    }

    fn parse_existence(&mut self) -> Result<Existence> {
        if !self.next_is_keyword(Keyword::If) {
            return Ok(Existence::Unspecified);
        }
        if self.next_is_keyword(Keyword::Exists) {
            return Ok(Existence::Exists);
        }
        if self.next_is_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::Exists)?;
            return Ok(Existence::NotExists);
        }
        let token = self.peek().clone();
        Err(Error::expected(
            "'EXISTS' or 'NOT EXISTS'",
            token.kind,
            token.offset,
        ))
    }

    /// Parses `ENGINE MEMORY|EDB`, if present.
    pub(super) fn parse_engine_clause(&mut self) -> Result<Option<EngineSpec>> {
        if !self.next_is_keyword(Keyword::Engine) {
            return Ok(None);
        }
        if self.next_is_ident_eq("MEMORY") {
            return Ok(Some(EngineSpec::Memory));
        }
        if self.next_is_ident_eq("EDB") {
            return Ok(Some(EngineSpec::Edb));
        }
        let token = self.peek().clone();
        Err(Error::new(
            "Invalid database engine, expected 'EDB' or 'MEMORY'",
            token.offset,
        ))
    }
}
