//! Statement execution
//!
//! One module per statement family; `executor` is the top-level dispatch.
//! The SELECT executor is the centerpiece and drives all of the expression
//! machinery. Mutating statements run in two phases: evaluate everything
//! against a shared borrow of the database, then apply the computed changes
//! to the target table.

pub mod aggregator;
pub mod context;
pub mod ddl;
pub mod delete;
pub mod executor;
pub mod expression;
pub mod insert;
pub mod join;
pub mod like;
pub mod select;
pub mod update;

pub use context::{EvaluationContext, RowType, SelectColumns, SourceRelation, TupleWithSource};
pub use executor::execute_statement;
