//! FROM-clause resolution and join execution
//!
//! Resolves a table expression into a [`SourceRelation`]: a named table, a
//! subquery, or a join of two relations. Joins are nested-loop over a single
//! `ON a.x = b.y` equality; outer variants pad the unmatched side with
//! nulls. A comma in FROM is a cross join.

use crate::error::{Error, Result};
use crate::execution::context::{SourceColumn, SourceRelation};
use crate::execution::select;
use crate::parsing::ast::{ColumnRef, JoinKind, TableExpression};
use crate::storage::Database;
use crate::types::{evaluator, Tuple, Value};
use std::cmp::Ordering;

/// Resolves a FROM-clause table expression into a materialized relation.
pub fn resolve_table_expression(
    db: &Database,
    expr: &TableExpression,
) -> Result<SourceRelation> {
    match expr {
        TableExpression::Table { name, alias, offset } => {
            let table = db.table(name).map_err(|e| e.at(*offset))?;
            Ok(SourceRelation::from_table(table, alias.as_deref()))
        }
        TableExpression::Subquery { select, alias, .. } => {
            let result = select::subquery_result(db, select)?;
            let columns = result
                .column_names()
                .iter()
                .map(|name| SourceColumn {
                    qualifier: alias.clone(),
                    name: name.clone(),
                })
                .collect();
            Ok(SourceRelation {
                columns,
                rows: result.into_rows(),
            })
        }
        TableExpression::Join { kind, lhs, rhs, on, offset } => {
            let left = resolve_table_expression(db, lhs)?;
            let right = resolve_table_expression(db, rhs)?;
            join(&left, &right, *kind, on.as_ref(), *offset)
        }
    }
}

fn join(
    left: &SourceRelation,
    right: &SourceRelation,
    kind: JoinKind,
    on: Option<&(ColumnRef, ColumnRef)>,
    offset: usize,
) -> Result<SourceRelation> {
    let columns: Vec<SourceColumn> = left
        .columns
        .iter()
        .chain(right.columns.iter())
        .cloned()
        .collect();

    if kind == JoinKind::Cross {
        let mut rows = Vec::new();
        for l in &left.rows {
            for r in &right.rows {
                rows.push(combine(l, r));
            }
        }
        return Ok(SourceRelation { columns, rows });
    }

    let Some((first, second)) = on else {
        return Err(Error::new("JOIN requires an ON condition", offset));
    };
    let (left_key, right_key) = resolve_join_keys(left, right, first, second, offset)?;

    let mut rows = Vec::new();
    let mut right_matched = vec![false; right.rows.len()];

    if kind != JoinKind::Right {
        for l in &left.rows {
            let mut matched = false;
            for (r_index, r) in right.rows.iter().enumerate() {
                if keys_equal(l, left_key, r, right_key)? {
                    rows.push(combine(l, r));
                    matched = true;
                    right_matched[r_index] = true;
                }
            }
            if !matched && matches!(kind, JoinKind::Left | JoinKind::Full) {
                rows.push(combine(l, &nulls(right.columns.len())));
            }
        }
    }

    match kind {
        JoinKind::Right => {
            for r in &right.rows {
                let mut matched = false;
                for l in &left.rows {
                    if keys_equal(l, left_key, r, right_key)? {
                        rows.push(combine(l, r));
                        matched = true;
                    }
                }
                if !matched {
                    rows.push(combine(&nulls(left.columns.len()), r));
                }
            }
        }
        JoinKind::Full => {
            for (r_index, r) in right.rows.iter().enumerate() {
                if !right_matched[r_index] {
                    rows.push(combine(&nulls(left.columns.len()), r));
                }
            }
        }
        _ => {}
    }

    Ok(SourceRelation { columns, rows })
}

/// Resolves the two ON references to (left column, right column), whichever
/// order they were written in.
fn resolve_join_keys(
    left: &SourceRelation,
    right: &SourceRelation,
    first: &ColumnRef,
    second: &ColumnRef,
    offset: usize,
) -> Result<(usize, usize)> {
    let first_in_left = left
        .find_column(first.table.as_deref(), &first.name)
        .map_err(|e| e.at(offset))?;
    if let Some(left_key) = first_in_left {
        let right_key = right
            .column_index(second.table.as_deref(), &second.name)
            .map_err(|e| e.at(offset))?;
        return Ok((left_key, right_key));
    }
    let left_key = left
        .column_index(second.table.as_deref(), &second.name)
        .map_err(|e| e.at(offset))?;
    let right_key = right
        .column_index(first.table.as_deref(), &first.name)
        .map_err(|e| e.at(offset))?;
    Ok((left_key, right_key))
}

fn keys_equal(l: &Tuple, left_key: usize, r: &Tuple, right_key: usize) -> Result<bool> {
    let lhs = l.get(left_key).cloned().unwrap_or(Value::Null);
    let rhs = r.get(right_key).cloned().unwrap_or(Value::Null);
    Ok(evaluator::compare(&lhs, &rhs)? == Ordering::Equal)
}

fn combine(l: &Tuple, r: &Tuple) -> Tuple {
    let mut values = l.values().to_vec();
    values.extend_from_slice(r.values());
    Tuple::new(values)
}

fn nulls(count: usize) -> Tuple {
    Tuple::new(vec![Value::Null; count])
}
