//! Abstract syntax tree for SQL statements and expressions
//!
//! The statement is the root of the tree. Every node records the byte
//! offset of the token it started at, so errors raised during execution can
//! point back into the source string.

pub mod ddl;
pub mod dml;
pub mod expressions;

pub use ddl::{AlterTable, CreateTable, EngineSpec};
pub use dml::{
    DeleteStatement, GroupBy, ImportStatement, InsertSource, InsertStatement, JoinKind, OrderExpr,
    OrderKey, Projection, ProjectionColumn, SelectStatement, TableExpression, Top, UpdateStatement,
};
pub use expressions::{
    AggregateKind, ArithmeticOp, BinaryOp, ColumnRef, Expression, ExpressionKind, IsWhat, UnaryOp,
};

/// A SQL statement. Built from raw SQL by the parser and consumed by the
/// statement executors.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    /// UNION of two SELECTs; without ALL the right side is de-duplicated
    /// against the left.
    Union {
        lhs: Box<SelectStatement>,
        rhs: Box<SelectStatement>,
        distinct: bool,
        offset: usize,
    },
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTable),
    DropTable {
        name: String,
        if_exists: bool,
        offset: usize,
    },
    TruncateTable {
        name: String,
        if_exists: bool,
        offset: usize,
    },
    AlterTable(AlterTable),
    Import(ImportStatement),
    ShowTables {
        offset: usize,
    },
    /// Executes the inner statement; rendering its result is the embedder's
    /// concern.
    Print(Box<Statement>, usize),
}
