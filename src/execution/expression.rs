//! Expression evaluation
//!
//! A single `evaluate` entry point walks the expression tree against an
//! explicit [`EvaluationContext`] and the current row. Aggregate nodes are
//! deliberately not evaluable per row; the SELECT executor recognizes them
//! structurally and calls into the aggregator with the group's rows.

use crate::error::{Error, Result};
use crate::execution::aggregator;
use crate::execution::context::{EvaluationContext, RowType, TupleWithSource};
use crate::execution::like::like_match;
use crate::execution::select;
use crate::functions;
use crate::parsing::ast::{
    BinaryOp, ColumnRef, Expression, ExpressionKind, IsWhat, UnaryOp,
};
use crate::types::{evaluator, Value};
use std::cmp::Ordering;

/// Evaluates an expression to a value.
pub fn evaluate(
    expr: &Expression,
    ctx: &EvaluationContext,
    row: &TupleWithSource,
) -> Result<Value> {
    match &expr.kind {
        ExpressionKind::Literal(value) => Ok(value.clone()),

        ExpressionKind::Identifier(column) => resolve_identifier(ctx, row, column, expr.offset),

        ExpressionKind::Binary { op, lhs, rhs } => {
            // Both sides are always evaluated; errors in the side a
            // short-circuiting engine would skip are still surfaced.
            let lhs_value = evaluate(lhs, ctx, row)?;
            let rhs_value = evaluate(rhs, ctx, row)?;
            let result = match op {
                BinaryOp::Equal => compare_with(&lhs_value, &rhs_value, |o| o == Ordering::Equal),
                BinaryOp::NotEqual => compare_with(&lhs_value, &rhs_value, |o| o != Ordering::Equal),
                BinaryOp::Greater => compare_with(&lhs_value, &rhs_value, |o| o == Ordering::Greater),
                BinaryOp::GreaterEqual => {
                    compare_with(&lhs_value, &rhs_value, |o| o != Ordering::Less)
                }
                BinaryOp::Less => compare_with(&lhs_value, &rhs_value, |o| o == Ordering::Less),
                BinaryOp::LessEqual => {
                    compare_with(&lhs_value, &rhs_value, |o| o != Ordering::Greater)
                }
                BinaryOp::And => Ok(lhs_value.to_bool()? && rhs_value.to_bool()?),
                BinaryOp::Or => Ok(lhs_value.to_bool()? || rhs_value.to_bool()?),
                BinaryOp::Like => like_match(&lhs_value.to_text()?, &rhs_value.to_text()?),
                BinaryOp::Match => Err(Error::unpositioned("MATCH operator is not supported")),
            };
            result.map(Value::Bool).map_err(|e| e.at(expr.offset))
        }

        ExpressionKind::Arithmetic { op, lhs, rhs } => {
            let lhs_value = evaluate(lhs, ctx, row)?;
            let rhs_value = evaluate(rhs, ctx, row)?;
            use crate::parsing::ast::ArithmeticOp;
            let result = match op {
                ArithmeticOp::Add => evaluator::add(&lhs_value, &rhs_value),
                ArithmeticOp::Subtract => evaluator::subtract(&lhs_value, &rhs_value),
                ArithmeticOp::Multiply => evaluator::multiply(&lhs_value, &rhs_value),
                ArithmeticOp::Divide => evaluator::divide(&lhs_value, &rhs_value),
            };
            result.map_err(|e| e.at(expr.offset))
        }

        ExpressionKind::Unary { op: UnaryOp::Minus, expr: operand } => {
            match evaluate(operand, ctx, row)? {
                Value::Null => Ok(Value::Null),
                Value::Int(i) => Ok(Value::Int(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(Error::new(
                    format!("No matching operator '-' for '{}' type", other.type_name()),
                    expr.offset,
                )),
            }
        }

        // Both ends inclusive, dispatched through the typed comparison.
        ExpressionKind::Between { expr: value, low, high } => {
            let value = evaluate(value, ctx, row)?;
            let low = evaluate(low, ctx, row)?;
            let high = evaluate(high, ctx, row)?;
            let in_range = evaluator::compare(&value, &low)? != Ordering::Less
                && evaluator::compare(&value, &high)? != Ordering::Greater;
            Ok(Value::Bool(in_range))
        }

        // String-coerced membership test.
        ExpressionKind::In { expr: value, list } => {
            let value = evaluate(value, ctx, row)?.to_text().map_err(|e| e.at(expr.offset))?;
            for arg in list {
                let candidate = evaluate(arg, ctx, row)?.to_text().map_err(|e| e.at(arg.offset))?;
                if value == candidate {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }

        ExpressionKind::Is { expr: value, what } => {
            let value = evaluate(value, ctx, row)?;
            Ok(Value::Bool(match what {
                IsWhat::Null => value.is_null(),
                IsWhat::NotNull => !value.is_null(),
            }))
        }

        ExpressionKind::Case { cases, else_value } => {
            for (guard, value) in cases {
                if evaluate(guard, ctx, row)?.to_bool().map_err(|e| e.at(guard.offset))? {
                    return evaluate(value, ctx, row);
                }
            }
            match else_value {
                Some(value) => evaluate(value, ctx, row),
                None => Ok(Value::Null),
            }
        }

        ExpressionKind::Function { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(evaluate(arg, ctx, row)?);
            }
            functions::execute_function(name, &values).map_err(|e| e.at(expr.offset))
        }

        ExpressionKind::Aggregate { function, expr: inner, .. } => {
            // An aggregate refuses per-row evaluation. Under FromResultSet
            // it resolves through the projection's output (HAVING, ORDER BY)
            // or recomputes over the context's current group.
            if ctx.row_type == RowType::FromResultSet {
                if let Some(columns) = ctx.columns {
                    if let Some(value) = columns.resolve_value(&row.tuple, &expr.to_string()) {
                        return Ok(value.clone());
                    }
                }
                if let Some(group_rows) = ctx.group_rows {
                    return aggregator::aggregate(*function, inner, ctx, group_rows)
                        .map_err(|e| e.at(expr.offset));
                }
            }
            Err(Error::new(
                format!("Aggregate function {} is not allowed here", function),
                expr.offset,
            ))
        }

        ExpressionKind::Subquery(query) => {
            let result = select::subquery_result(ctx.db, query)?;
            Ok(Value::ResultSet(result))
        }

        ExpressionKind::Star => Err(Error::new(
            "'*' is only valid as the argument of COUNT",
            expr.offset,
        )),
    }
}

fn compare_with(lhs: &Value, rhs: &Value, test: impl Fn(Ordering) -> bool) -> Result<bool> {
    Ok(test(evaluator::compare(lhs, rhs)?))
}

/// Resolves a column reference against the context. Under FromResultSet the
/// projection's alias map is consulted first, falling back to the source row
/// when the tuple still carries one; under FromTable the name binds directly
/// to the source relation.
fn resolve_identifier(
    ctx: &EvaluationContext,
    row: &TupleWithSource,
    column: &ColumnRef,
    offset: usize,
) -> Result<Value> {
    if ctx.row_type == RowType::FromResultSet {
        if let Some(columns) = ctx.columns {
            if let Some(value) = columns.resolve_value(&row.tuple, &column.to_string()) {
                return Ok(value.clone());
            }
        }
        if let (Some(source_row), Some(source)) = (&row.source, ctx.source) {
            if let Some(index) = source
                .find_column(column.table.as_deref(), &column.name)
                .map_err(|e| e.at(offset))?
            {
                if let Some(value) = source_row.get(index) {
                    return Ok(value.clone());
                }
            }
        }
        return Err(Error::new(
            format!("No such column: '{}'", column),
            offset,
        ));
    }

    let Some(source) = ctx.source else {
        return Err(Error::new(
            format!("No such column: '{}'", column),
            offset,
        ));
    };
    let index = source
        .column_index(column.table.as_deref(), &column.name)
        .map_err(|e| e.at(offset))?;
    row.tuple
        .get(index)
        .cloned()
        .ok_or_else(|| Error::new(format!("No such column: '{}'", column), offset))
}
