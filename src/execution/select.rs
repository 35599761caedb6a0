//! The SELECT executor
//!
//! Evaluation order (semantic, not lexical): FROM, WHERE, GROUP,
//! aggregation + projection, HAVING, DISTINCT, ORDER BY, TOP. SELECT INTO
//! is materialized by the top-level statement dispatch, since it needs to
//! mutate the catalog.

use crate::error::{Error, Result};
use crate::execution::context::{
    EvaluationContext, RowType, SelectColumns, SourceRelation, TupleWithSource,
};
use crate::execution::expression::evaluate;
use crate::execution::{aggregator, join};
use crate::parsing::ast::{
    ColumnRef, Expression, ExpressionKind, OrderExpr, Projection, ProjectionColumn,
    SelectStatement,
};
use crate::storage::Database;
use crate::types::{evaluator, ResultSet, Tuple};
use std::cmp::Ordering;

/// Runs a SELECT and returns its result set. The statement's INTO clause is
/// not applied here.
pub fn execute_select(db: &Database, select: &SelectStatement) -> Result<ResultSet> {
    let source = match &select.from {
        Some(from) => Some(join::resolve_table_expression(db, from)?),
        None => None,
    };

    let columns = expand_projection(select, source.as_ref())?;
    reject_windowed_aggregates(select, &columns)?;

    let ctx = EvaluationContext {
        db,
        columns: Some(&columns),
        source: source.as_ref(),
        row_type: RowType::FromTable,
        group_rows: None,
    };

    let mut output = match &source {
        None => {
            // Without FROM only constant projections are evaluable; column
            // references fail to resolve.
            let row = TupleWithSource::default();
            let mut values = Vec::with_capacity(columns.len());
            for column in columns.columns() {
                values.push(evaluate(&column.expression, &ctx, &row)?);
            }
            vec![TupleWithSource {
                tuple: Tuple::new(values),
                source: None,
            }]
        }
        Some(source) => {
            let input = filter_rows(select, &ctx, source)?;
            project_rows(select, &ctx, &columns, input)?
        }
    };

    // The remaining clauses see projected rows.
    let mut result_ctx = ctx;
    result_ctx.row_type = RowType::FromResultSet;

    if select.distinct {
        output = distinct(output)?;
    }

    if !select.order_by.is_empty() {
        output = order_rows(select, &result_ctx, output)?;
    }

    if let Some(top) = select.top {
        let keep = if top.percent {
            // The fractional row is truncated.
            (output.len() as f64 * (top.value.min(100) as f64 / 100.0)) as usize
        } else {
            (top.value as usize).min(output.len())
        };
        output.truncate(keep);
    }

    Ok(ResultSet::new(
        columns.output_names(),
        output.into_iter().map(|row| row.tuple).collect(),
    ))
}

/// Runs a SELECT appearing in a nested position (subquery, FROM, UNION arm,
/// INSERT source), where INTO is not allowed.
pub fn subquery_result(db: &Database, select: &SelectStatement) -> Result<ResultSet> {
    if select.into.is_some() {
        return Err(Error::new(
            "SELECT INTO is not allowed in a subquery",
            select.offset,
        ));
    }
    execute_select(db, select)
}

/// Executes `lhs UNION [ALL] rhs`. Both sides must produce identical column
/// name vectors. Without ALL, the right side's rows are filtered against the
/// left side's; duplicates within the left side are preserved.
pub fn execute_union(
    db: &Database,
    lhs: &SelectStatement,
    rhs: &SelectStatement,
    distinct: bool,
    offset: usize,
) -> Result<ResultSet> {
    let left = subquery_result(db, lhs)?;
    let right = subquery_result(db, rhs)?;

    if left.column_names().len() != right.column_names().len() {
        return Err(Error::new("Queries with different column count", offset));
    }
    if left.column_names() != right.column_names() {
        return Err(Error::new("Queries with different column set", offset));
    }

    let column_names = left.column_names().to_vec();
    let left_rows = left.into_rows();
    let mut rows = left_rows.clone();
    for row in right.into_rows() {
        if distinct {
            let mut duplicate = false;
            for existing in &left_rows {
                if row.try_eq(existing).map_err(|e| e.at(offset))? {
                    duplicate = true;
                    break;
                }
            }
            if duplicate {
                continue;
            }
        }
        rows.push(row);
    }
    Ok(ResultSet::new(column_names, rows))
}

/// Expands `*` into one identifier per source column; explicit projections
/// are taken as parsed.
fn expand_projection(
    select: &SelectStatement,
    source: Option<&SourceRelation>,
) -> Result<SelectColumns> {
    match &select.columns {
        Projection::All => {
            let Some(source) = source else {
                return Err(Error::new("You need a table to do SELECT *", select.offset));
            };
            let columns = source
                .columns
                .iter()
                .map(|column| ProjectionColumn {
                    // Qualified so join outputs with repeated names stay
                    // resolvable; the bare name is kept as the alias.
                    expression: Expression::new(
                        ExpressionKind::Identifier(ColumnRef {
                            table: column.qualifier.clone(),
                            name: column.name.clone(),
                        }),
                        select.offset,
                    ),
                    alias: Some(column.name.clone()),
                })
                .collect();
            Ok(SelectColumns::new(columns))
        }
        Projection::Columns(columns) => Ok(SelectColumns::new(columns.clone())),
    }
}

/// Windowed aggregation parses but has no execution semantics here.
fn reject_windowed_aggregates(select: &SelectStatement, columns: &SelectColumns) -> Result<()> {
    let mut windowed: Option<usize> = None;
    let mut check = |expr: &Expression| {
        expr.walk(&mut |node| {
            if let ExpressionKind::Aggregate { over: Some(_), .. } = &node.kind {
                windowed.get_or_insert(node.offset);
                return false;
            }
            true
        });
    };
    for column in columns.columns() {
        check(&column.expression);
    }
    if let Some(having) = &select.having {
        check(having);
    }
    match windowed {
        Some(offset) => Err(Error::new(
            "Windowed aggregates (OVER) are not supported",
            offset,
        )),
        None => Ok(()),
    }
}

/// Applies the WHERE clause over the source rows.
fn filter_rows(
    select: &SelectStatement,
    ctx: &EvaluationContext,
    source: &SourceRelation,
) -> Result<Vec<Tuple>> {
    let mut rows = Vec::new();
    for row in &source.rows {
        if let Some(predicate) = &select.r#where {
            let row_ctx = TupleWithSource::from_table_row(row);
            let keep = evaluate(predicate, ctx, &row_ctx)?
                .to_bool()
                .map_err(|e| e.at(predicate.offset))?;
            if !keep {
                continue;
            }
        }
        rows.push(row.clone());
    }
    Ok(rows)
}

/// Projects the filtered rows: straight per-row evaluation, or grouping +
/// aggregation + HAVING when GROUP BY or an aggregate is present.
fn project_rows(
    select: &SelectStatement,
    ctx: &EvaluationContext,
    columns: &SelectColumns,
    input: Vec<Tuple>,
) -> Result<Vec<TupleWithSource>> {
    let group_by = select.group_by.as_ref();
    let has_aggregate = columns
        .columns()
        .iter()
        .any(|column| column.expression.contains_aggregate());

    if group_by.is_none() && !has_aggregate {
        let mut output = Vec::with_capacity(input.len());
        for row in input {
            let row_ctx = TupleWithSource::from_table_row(&row);
            let mut values = Vec::with_capacity(columns.len());
            for column in columns.columns() {
                values.push(evaluate(&column.expression, ctx, &row_ctx)?);
            }
            output.push(TupleWithSource {
                tuple: Tuple::new(values),
                source: Some(row),
            });
        }
        return Ok(output);
    }

    // Partition the input into groups keyed by the GROUP BY values, in
    // first-seen order. Without GROUP BY every row lands in one group, which
    // exists even for empty input so COUNT(*) can report 0.
    let mut groups: Vec<(Tuple, Vec<Tuple>)> = Vec::new();
    for row in input {
        let mut key_values = Vec::new();
        if let Some(group_by) = group_by {
            let row_ctx = TupleWithSource::from_table_row(&row);
            for expr in &group_by.columns {
                key_values.push(evaluate(expr, ctx, &row_ctx)?);
            }
        }
        let key = Tuple::new(key_values);
        let mut found_idx = None;
        for (idx, (existing, _)) in groups.iter().enumerate() {
            if existing.try_eq(&key).map_err(|e| e.at(select.offset))? {
                found_idx = Some(idx);
                break;
            }
        }
        match found_idx {
            Some(idx) => groups[idx].1.push(row),
            None => groups.push((key, vec![row])),
        }
    }
    if groups.is_empty() && group_by.is_none() {
        groups.push((Tuple::default(), Vec::new()));
    }

    let group_names: Vec<String> = group_by
        .map(|g| g.columns.iter().map(|e| e.to_string()).collect())
        .unwrap_or_default();

    let mut output = Vec::new();
    for (_, members) in &groups {
        let mut group_ctx = *ctx;
        group_ctx.group_rows = Some(members);

        let mut values = Vec::with_capacity(columns.len());
        for column in columns.columns() {
            let expr = &column.expression;
            if let ExpressionKind::Aggregate { function, expr: inner, .. } = &expr.kind {
                let value = aggregator::aggregate(*function, inner, &group_ctx, members)
                    .map_err(|e| e.at(expr.offset))?;
                values.push(value);
            } else if occurs_in_group_by(expr, &group_names) {
                // Every member shares the group key, so the first row
                // stands in for the group. The synthetic empty group only
                // carries constant projections this far.
                let row_ctx = match members.first() {
                    Some(first) => TupleWithSource::from_table_row(first),
                    None => TupleWithSource::default(),
                };
                values.push(evaluate(expr, &group_ctx, &row_ctx)?);
            } else {
                return Err(Error::new(
                    format!(
                        "Column '{}' must be either aggregate or occur in GROUP BY clause",
                        expr
                    ),
                    expr.offset,
                ));
            }
        }
        let aggregated = TupleWithSource {
            tuple: Tuple::new(values),
            source: None,
        };

        if let Some(having) = &select.having {
            let mut having_ctx = group_ctx;
            having_ctx.row_type = RowType::FromResultSet;
            let keep = evaluate(having, &having_ctx, &aggregated)?
                .to_bool()
                .map_err(|e| e.at(having.offset))?;
            if !keep {
                continue;
            }
        }
        output.push(aggregated);
    }
    Ok(output)
}

/// A non-aggregate projection is legal in a grouped query iff it is itself
/// a grouped expression or references only grouped columns. A constant
/// references nothing and is legal in any group.
fn occurs_in_group_by(expr: &Expression, group_names: &[String]) -> bool {
    if group_names.iter().any(|name| name == &expr.to_string()) {
        return true;
    }
    expr.referenced_columns()
        .iter()
        .all(|name| group_names.contains(name))
}

/// Removes duplicate output tuples, preserving first-seen order.
fn distinct(rows: Vec<TupleWithSource>) -> Result<Vec<TupleWithSource>> {
    let mut kept: Vec<TupleWithSource> = Vec::new();
    for row in rows {
        let mut duplicate = false;
        for existing in &kept {
            if existing.tuple.try_eq(&row.tuple)? {
                duplicate = true;
                break;
            }
        }
        if !duplicate {
            kept.push(row);
        }
    }
    Ok(kept)
}

/// Stable sort by the ORDER BY keys. Keys are evaluated up front against
/// each output row; DESC inverts only that key's contribution.
fn order_rows(
    select: &SelectStatement,
    ctx: &EvaluationContext,
    rows: Vec<TupleWithSource>,
) -> Result<Vec<TupleWithSource>> {
    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows {
        let mut keys = Vec::with_capacity(select.order_by.len());
        for key in &select.order_by {
            let value = match &key.expr {
                OrderExpr::Ordinal { index, offset } => row
                    .tuple
                    .get(*index)
                    .cloned()
                    .ok_or_else(|| Error::new("Ordinal is out of range", *offset))?,
                OrderExpr::Expression(expr) => evaluate(expr, ctx, &row)?,
            };
            keys.push(value);
        }
        keyed.push((keys, row));
    }

    let mut sort_error = None;
    keyed.sort_by(|(lhs, _), (rhs, _)| {
        for ((l, r), key) in lhs.iter().zip(rhs.iter()).zip(&select.order_by) {
            match evaluator::compare(l, r) {
                Ok(Ordering::Equal) => continue,
                Ok(ordering) if key.descending => return ordering.reverse(),
                Ok(ordering) => return ordering,
                Err(error) => {
                    if sort_error.is_none() {
                        sort_error = Some(error);
                    }
                    return Ordering::Equal;
                }
            }
        }
        Ordering::Equal
    });
    if let Some(error) = sort_error {
        return Err(error);
    }
    Ok(keyed.into_iter().map(|(_, row)| row).collect())
}
