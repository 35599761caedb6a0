//! Expression parsing with operator precedence
//!
//! Precedence climbing over the fixed ladder below. Lower binds looser;
//! note that arithmetic sits *below* the boolean operators in this dialect.
//!
//! | precedence | operators                              |
//! |------------|----------------------------------------|
//! | 500        | IS, LIKE, MATCH, =, !=, >, <, >=, <=   |
//! | 200        | BETWEEN, IN                            |
//! | 150        | AND                                    |
//! | 100        | OR                                     |
//! | 15         | * /                                    |
//! | 10         | + -                                    |
//! | prefix 501 | unary -                                |

use super::Parser;
use crate::error::{Error, Result};
use crate::parsing::ast::{
    AggregateKind, ArithmeticOp, BinaryOp, ColumnRef, Expression, ExpressionKind, IsWhat, UnaryOp,
};
use crate::parsing::lexer::{Keyword, TokenKind};
use crate::types::Value;

/// The precedence of prefix minus; binds tighter than every infix operator.
const PREFIX_PRECEDENCE: i32 = 501;

/// Infix operators, unified across the comparison/boolean and arithmetic
/// families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InfixOp {
    Binary(BinaryOp),
    Arithmetic(ArithmeticOp),
    Between,
    In,
    Is,
}

impl InfixOp {
    fn precedence(self) -> i32 {
        match self {
            InfixOp::Binary(BinaryOp::And) => 150,
            InfixOp::Binary(BinaryOp::Or) => 100,
            InfixOp::Is | InfixOp::Binary(_) => 500,
            InfixOp::Between | InfixOp::In => 200,
            InfixOp::Arithmetic(ArithmeticOp::Multiply | ArithmeticOp::Divide) => 15,
            InfixOp::Arithmetic(_) => 10,
        }
    }
}

impl Parser {
    /// Parses an expression.
    pub(super) fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_expression_at(0)
    }

    /// Parses an expression, consuming only infix operators that bind
    /// tighter than `min_precedence`.
    fn parse_expression_at(&mut self, min_precedence: i32) -> Result<Expression> {
        let mut lhs = self.parse_atom()?;

        loop {
            let Some(op) = self.peek_infix_operator() else {
                return Ok(lhs);
            };
            let precedence = op.precedence();
            if precedence <= min_precedence {
                return Ok(lhs);
            }
            self.advance();
            let offset = lhs.offset;

            lhs = match op {
                // `BETWEEN x AND y` parses its bounds as an atomic right-hand
                // side; the embedded AND never starts a boolean operator.
                InfixOp::Between => {
                    let low = self.parse_expression_at(InfixOp::Between.precedence())?;
                    self.expect_keyword(Keyword::And)?;
                    let high = self.parse_expression_at(InfixOp::Between.precedence())?;
                    Expression::new(
                        ExpressionKind::Between {
                            expr: Box::new(lhs),
                            low: Box::new(low),
                            high: Box::new(high),
                        },
                        offset,
                    )
                }
                InfixOp::In => {
                    let list = self.parse_expression_list("IN list")?;
                    Expression::new(
                        ExpressionKind::In {
                            expr: Box::new(lhs),
                            list,
                        },
                        offset,
                    )
                }
                InfixOp::Is => {
                    let what = self.parse_is_what()?;
                    Expression::new(
                        ExpressionKind::Is {
                            expr: Box::new(lhs),
                            what,
                        },
                        offset,
                    )
                }
                InfixOp::Binary(op) => {
                    let rhs = self.parse_expression_at(precedence)?;
                    Expression::new(
                        ExpressionKind::Binary {
                            op,
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                        },
                        offset,
                    )
                }
                InfixOp::Arithmetic(op) => {
                    let rhs = self.parse_expression_at(precedence)?;
                    Expression::new(
                        ExpressionKind::Arithmetic {
                            op,
                            lhs: Box::new(lhs),
                            rhs: Box::new(rhs),
                        },
                        offset,
                    )
                }
            };
        }
    }

    fn peek_infix_operator(&self) -> Option<InfixOp> {
        Some(match &self.peek().kind {
            TokenKind::Equal => InfixOp::Binary(BinaryOp::Equal),
            TokenKind::NotEqual => InfixOp::Binary(BinaryOp::NotEqual),
            TokenKind::GreaterThan => InfixOp::Binary(BinaryOp::Greater),
            TokenKind::GreaterEqual => InfixOp::Binary(BinaryOp::GreaterEqual),
            TokenKind::LessThan => InfixOp::Binary(BinaryOp::Less),
            TokenKind::LessEqual => InfixOp::Binary(BinaryOp::LessEqual),
            TokenKind::Keyword(Keyword::And) => InfixOp::Binary(BinaryOp::And),
            TokenKind::Keyword(Keyword::Or) => InfixOp::Binary(BinaryOp::Or),
            TokenKind::Keyword(Keyword::Like) => InfixOp::Binary(BinaryOp::Like),
            TokenKind::Keyword(Keyword::Match) => InfixOp::Binary(BinaryOp::Match),
            TokenKind::Keyword(Keyword::Is) => InfixOp::Is,
            TokenKind::Keyword(Keyword::Between) => InfixOp::Between,
            TokenKind::Keyword(Keyword::In) => InfixOp::In,
            TokenKind::Plus => InfixOp::Arithmetic(ArithmeticOp::Add),
            TokenKind::Minus => InfixOp::Arithmetic(ArithmeticOp::Subtract),
            TokenKind::Asterisk => InfixOp::Arithmetic(ArithmeticOp::Multiply),
            TokenKind::Slash => InfixOp::Arithmetic(ArithmeticOp::Divide),
            _ => return None,
        })
    }

    /// Parses the fixed right-hand side of IS: NULL or NOT NULL.
    fn parse_is_what(&mut self) -> Result<IsWhat> {
        if self.next_is_keyword(Keyword::Null) {
            return Ok(IsWhat::Null);
        }
        if self.next_is_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::Null)?;
            return Ok(IsWhat::NotNull);
        }
        let token = self.peek().clone();
        Err(Error::expected(
            "'NULL' or 'NOT NULL' after 'IS'",
            token.kind,
            token.offset,
        ))
    }

    /// Parses an expression atom: a literal, identifier, function call,
    /// CASE, subquery, unary minus, or parenthesized expression.
    fn parse_atom(&mut self) -> Result<Expression> {
        let token = self.peek().clone();
        match &token.kind {
            TokenKind::Ident(_) if self.peek_next().kind == TokenKind::OpenParen => {
                self.parse_function_call()
            }
            TokenKind::Ident(_) => {
                let (name, offset) = self.next_ident("identifier")?;
                let column = if self.next_is(&TokenKind::Period) {
                    let (field, _) = self.next_ident("identifier")?;
                    ColumnRef {
                        table: Some(name),
                        name: field,
                    }
                } else {
                    ColumnRef { table: None, name }
                };
                Ok(Expression::new(ExpressionKind::Identifier(column), offset))
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expression_at(PREFIX_PRECEDENCE)?;
                Ok(Expression::new(
                    ExpressionKind::Unary {
                        op: UnaryOp::Minus,
                        expr: Box::new(operand),
                    },
                    token.offset,
                ))
            }
            TokenKind::OpenParen => {
                self.advance();
                if self.peek().kind == TokenKind::Keyword(Keyword::Select) {
                    let select = self.parse_select()?;
                    self.expect_token(TokenKind::CloseParen, "')' to close subquery")?;
                    return Ok(Expression::new(
                        ExpressionKind::Subquery(Box::new(select)),
                        token.offset,
                    ));
                }
                let inner = self.parse_expression()?;
                self.expect_token(TokenKind::CloseParen, "')' to close expression")?;
                Ok(inner)
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case(),
            _ => self.parse_literal(),
        }
    }

    /// Parses `CASE WHEN ... THEN ... [WHEN ...] [ELSE ...] END`.
    fn parse_case(&mut self) -> Result<Expression> {
        let offset = self.peek().offset;
        self.expect_keyword(Keyword::Case)?;
        let mut cases = Vec::new();
        let mut else_value = None;
        loop {
            if self.next_is_keyword(Keyword::When) {
                if else_value.is_some() {
                    let token = self.peek().clone();
                    return Err(Error::expected("'END' after 'ELSE'", token.kind, token.offset));
                }
                let guard = self.parse_expression()?;
                self.expect_keyword(Keyword::Then)?;
                let value = self.parse_expression()?;
                cases.push((guard, value));
            } else if self.next_is_keyword(Keyword::Else) {
                if else_value.is_some() {
                    let token = self.peek().clone();
                    return Err(Error::expected("'END' after 'ELSE'", token.kind, token.offset));
                }
                else_value = Some(Box::new(self.parse_expression()?));
            } else if self.next_is_keyword(Keyword::End) {
                return Ok(Expression::new(
                    ExpressionKind::Case { cases, else_value },
                    offset,
                ));
            } else {
                let token = self.peek().clone();
                return Err(Error::expected(
                    "'WHEN', 'ELSE' or 'END'",
                    token.kind,
                    token.offset,
                ));
            }
        }
    }

    /// Parses a function call: an aggregate when the name is one of the
    /// aggregate functions, a builtin call otherwise.
    fn parse_function_call(&mut self) -> Result<Expression> {
        let (name, offset) = self.next_ident("function name")?;

        if let Some(function) = AggregateKind::from_name(&name) {
            self.expect_token(TokenKind::OpenParen, "'(' to open aggregate function")?;
            let inner = if self.peek().kind == TokenKind::Asterisk {
                let star = self.advance();
                Expression::new(ExpressionKind::Star, star.offset)
            } else {
                self.parse_expression()?
            };
            self.expect_token(TokenKind::CloseParen, "')' to close aggregate function")?;
            let over = self.parse_over_clause()?;
            return Ok(Expression::new(
                ExpressionKind::Aggregate {
                    function,
                    expr: Box::new(inner),
                    over,
                },
                offset,
            ));
        }

        let args = self.parse_expression_list("argument list")?;
        Ok(Expression::new(
            ExpressionKind::Function { name, args },
            offset,
        ))
    }

    /// Parses `OVER (PARTITION BY column)`, if present.
    fn parse_over_clause(&mut self) -> Result<Option<String>> {
        if !self.next_is_keyword(Keyword::Over) {
            return Ok(None);
        }
        self.expect_token(TokenKind::OpenParen, "'(' for 'OVER' clause")?;
        self.expect_keyword(Keyword::Partition)?;
        self.expect_keyword(Keyword::By)?;
        let (column, _) = self.next_ident("identifier after 'PARTITION BY'")?;
        self.expect_token(TokenKind::CloseParen, "')' to close 'OVER' clause")?;
        Ok(Some(column))
    }

    /// Parses a parenthesized, comma-separated expression list; may be empty.
    pub(super) fn parse_expression_list(&mut self, what: &str) -> Result<Vec<Expression>> {
        self.expect_token(TokenKind::OpenParen, &format!("'(' to open {}", what))?;
        let mut list = Vec::new();
        if self.next_is(&TokenKind::CloseParen) {
            return Ok(list);
        }
        loop {
            list.push(self.parse_expression()?);
            if !self.next_is(&TokenKind::Comma) {
                break;
            }
        }
        self.expect_token(TokenKind::CloseParen, &format!("')' to close {}", what))?;
        Ok(list)
    }

    /// Parses a literal token into a literal expression.
    pub(super) fn parse_literal(&mut self) -> Result<Expression> {
        let token = self.advance();
        let value = match token.kind {
            TokenKind::Int(i) => Value::Int(i),
            TokenKind::Float(f) => Value::Float(f),
            TokenKind::Str(s) => Value::Varchar(s),
            TokenKind::Bool(b) => Value::Bool(b),
            TokenKind::Date(d) => Value::from_date(d),
            TokenKind::Keyword(Keyword::Null) => Value::Null,
            kind => return Err(Error::expected("expression", kind, token.offset)),
        };
        Ok(Expression::new(ExpressionKind::Literal(value), token.offset))
    }
}
