//! DELETE execution
//!
//! Matching row indexes are collected first, then removed in reverse so the
//! remaining indexes stay valid.

use crate::error::Result;
use crate::execution::context::{EvaluationContext, SourceRelation, TupleWithSource};
use crate::execution::expression::evaluate;
use crate::parsing::ast::DeleteStatement;
use crate::storage::Database;
use crate::types::Value;

pub fn execute_delete(db: &mut Database, statement: &DeleteStatement) -> Result<Value> {
    let table = db.table(&statement.table).map_err(|e| e.at(statement.offset))?;
    let source = SourceRelation::from_table(table, None);
    let ctx = EvaluationContext::over_table(db, &source);

    let mut to_delete = Vec::new();
    for (index, row) in source.rows.iter().enumerate() {
        let matched = match &statement.r#where {
            Some(predicate) => {
                let row_ctx = TupleWithSource::from_table_row(row);
                evaluate(predicate, &ctx, &row_ctx)?
                    .to_bool()
                    .map_err(|e| e.at(predicate.offset))?
            }
            None => true,
        };
        if matched {
            to_delete.push(index);
        }
    }

    let table = db.table_mut(&statement.table)?;
    for index in to_delete.into_iter().rev() {
        table.delete_row(index);
    }
    Ok(Value::Null)
}
