//! Aggregate evaluation over row groups
//!
//! Each aggregate accumulates the inner expression across the group's rows,
//! evaluated in table-row binding. Null inputs are skipped everywhere;
//! COUNT(*) counts rows without evaluating anything.

use crate::error::{Error, Result};
use crate::execution::context::{EvaluationContext, RowType, TupleWithSource};
use crate::execution::expression::evaluate;
use crate::parsing::ast::{AggregateKind, Expression, ExpressionKind};
use crate::types::{evaluator, Tuple, Value};
use std::cmp::Ordering;

/// Computes an aggregate of `inner` over the group's rows.
pub fn aggregate(
    function: AggregateKind,
    inner: &Expression,
    ctx: &EvaluationContext,
    rows: &[Tuple],
) -> Result<Value> {
    if let ExpressionKind::Star = inner.kind {
        if function != AggregateKind::Count {
            return Err(Error::new(
                "'*' is only valid as the argument of COUNT",
                inner.offset,
            ));
        }
        return Ok(Value::Int(rows.len() as i64));
    }

    let mut accumulator: Box<dyn Accumulator> = match function {
        AggregateKind::Count => Box::new(CountAccumulator { count: 0 }),
        AggregateKind::Sum => Box::new(SumAccumulator { sum: Value::Null }),
        AggregateKind::Min => Box::new(MinMaxAccumulator {
            keep: Ordering::Less,
            best: Value::Null,
        }),
        AggregateKind::Max => Box::new(MinMaxAccumulator {
            keep: Ordering::Greater,
            best: Value::Null,
        }),
        AggregateKind::Avg => Box::new(AvgAccumulator {
            sum: Value::Null,
            count: 0,
        }),
    };

    let mut row_ctx = *ctx;
    row_ctx.row_type = RowType::FromTable;
    for row in rows {
        let value = evaluate(inner, &row_ctx, &TupleWithSource::from_table_row(row))?;
        if let Value::ResultSet(_) = value {
            return Err(Error::new(
                "Cannot aggregate on a result set value",
                inner.offset,
            ));
        }
        accumulator.add(value)?;
    }
    accumulator.finalize()
}

trait Accumulator {
    fn add(&mut self, value: Value) -> Result<()>;
    fn finalize(self: Box<Self>) -> Result<Value>;
}

/// COUNT(expr): the number of non-null evaluations.
struct CountAccumulator {
    count: i64,
}

impl Accumulator for CountAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if !value.is_null() {
            self.count += 1;
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(Value::Int(self.count))
    }
}

/// SUM(expr): Null over an empty or all-null group.
struct SumAccumulator {
    sum: Value,
}

impl Accumulator for SumAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        self.sum = if self.sum.is_null() {
            value
        } else {
            evaluator::add(&self.sum, &value)?
        };
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(self.sum)
    }
}

/// MIN/MAX(expr), by the engine's typed comparison.
struct MinMaxAccumulator {
    keep: Ordering,
    best: Value,
}

impl Accumulator for MinMaxAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        if self.best.is_null() || evaluator::compare(&value, &self.best)? == self.keep {
            self.best = value;
        }
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        Ok(self.best)
    }
}

/// AVG(expr): always a Float; Null over an empty or all-null group.
struct AvgAccumulator {
    sum: Value,
    count: i64,
}

impl Accumulator for AvgAccumulator {
    fn add(&mut self, value: Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        self.sum = if self.sum.is_null() {
            value
        } else {
            evaluator::add(&self.sum, &value)?
        };
        self.count += 1;
        Ok(())
    }

    fn finalize(self: Box<Self>) -> Result<Value> {
        if self.count == 0 {
            return Ok(Value::Null);
        }
        Ok(Value::Float(self.sum.to_float()? / self.count as f64))
    }
}
