//! DML statements: SELECT, INSERT, UPDATE, DELETE, IMPORT

use crate::parsing::ast::expressions::{ColumnRef, Expression};
use crate::parsing::ast::EngineSpec;

/// A SELECT statement, in parse order:
/// `SELECT [DISTINCT] [TOP n [PERC]] (*|columns) [INTO t] [FROM table_expr]
/// [WHERE expr] [GROUP BY exprs | PARTITION BY exprs] [HAVING expr]
/// [ORDER BY key, ...]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectStatement {
    pub columns: Projection,
    pub distinct: bool,
    pub top: Option<Top>,
    pub into: Option<String>,
    pub from: Option<TableExpression>,
    pub r#where: Option<Expression>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Expression>,
    pub order_by: Vec<OrderKey>,
    pub offset: usize,
}

/// The projection list: `*` or explicit expressions with optional aliases.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    All,
    Columns(Vec<ProjectionColumn>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionColumn {
    pub expression: Expression,
    pub alias: Option<String>,
}

/// GROUP BY (or its PARTITION BY synonym).
#[derive(Clone, Debug, PartialEq)]
pub struct GroupBy {
    pub columns: Vec<Expression>,
    /// True when spelled PARTITION BY. The grouping semantics are the same.
    pub partition: bool,
}

/// One ORDER BY sort key.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderKey {
    pub expr: OrderExpr,
    pub descending: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OrderExpr {
    Expression(Expression),
    /// A 1-based ordinal into the projection list, stored 0-based after
    /// parse-time validation.
    Ordinal { index: usize, offset: usize },
}

/// TOP n, or TOP n PERC (percentage of the result, clamped to 100).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Top {
    pub value: u64,
    pub percent: bool,
    pub offset: usize,
}

/// A FROM-clause relation: a named table, a parenthesized subquery, or a
/// join of two relations. `a, b` is a cross join.
#[derive(Clone, Debug, PartialEq)]
pub enum TableExpression {
    Table {
        name: String,
        alias: Option<String>,
        offset: usize,
    },
    Subquery {
        select: Box<SelectStatement>,
        alias: Option<String>,
        offset: usize,
    },
    Join {
        kind: JoinKind,
        lhs: Box<TableExpression>,
        rhs: Box<TableExpression>,
        /// The `ON a.x = b.y` equality; None for cross joins.
        on: Option<(ColumnRef, ColumnRef)>,
        offset: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InsertStatement {
    pub table: String,
    /// Columns to insert into; None means the table's columns in order.
    pub columns: Option<Vec<String>>,
    pub source: InsertSource,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InsertSource {
    /// Explicit rows of value expressions.
    Values(Vec<Vec<Expression>>),
    /// Rows produced by a SELECT, mapped positionally.
    Select(Box<SelectStatement>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateStatement {
    pub table: String,
    /// `SET column = expr` pairs, applied in order.
    pub set: Vec<(String, Expression)>,
    pub r#where: Option<Expression>,
    pub offset: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteStatement {
    pub table: String,
    pub r#where: Option<Expression>,
    pub offset: usize,
}

/// `IMPORT CSV 'file' INTO table [ENGINE ...]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportStatement {
    pub filename: String,
    pub table: String,
    pub engine: Option<EngineSpec>,
    pub offset: usize,
}
