//! Value comparison and arithmetic
//!
//! Both dispatch on the left-hand operand's type tag, in a single decision
//! table per operation, instead of spreading the rules across operator
//! overloads. Comparing against Null coerces both sides through the
//! lhs-type's integer view (Null reads as numeric zero); this is a
//! documented engine quirk, not SQL three-valued logic.

use crate::error::{Error, Result};
use crate::types::value::Value;
use std::cmp::Ordering;

/// Compares two values, dispatching on the lhs type.
pub fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    match lhs {
        Value::Null | Value::Int(_) | Value::Time(_) => Ok(lhs.to_int()?.cmp(&rhs.to_int()?)),
        Value::Bool(_) => Ok(lhs.to_bool()?.cmp(&rhs.to_bool()?)),
        Value::Float(_) => Ok(lhs
            .to_float()?
            .partial_cmp(&rhs.to_float()?)
            .unwrap_or(Ordering::Equal)),
        Value::Varchar(_) => Ok(lhs.to_text()?.cmp(&rhs.to_text()?)),
        Value::ResultSet(_) => Err(Error::unpositioned(
            "No matching comparison for ResultSet type",
        )),
    }
}

pub fn add(lhs: &Value, rhs: &Value) -> Result<Value> {
    match lhs {
        Value::Null => Ok(Value::Null),
        Value::Int(_) => Ok(Value::Int(lhs.to_int()? + rhs.to_int()?)),
        Value::Float(_) => Ok(Value::Float(lhs.to_float()? + rhs.to_float()?)),
        Value::Bool(_) => Ok(Value::Bool(lhs.to_int()? + rhs.to_int()? != 0)),
        // Varchar '+' is concatenation.
        Value::Varchar(_) => Ok(Value::Varchar(format!(
            "{}{}",
            lhs.to_text()?,
            rhs.to_text()?
        ))),
        // Time arithmetic works in epoch seconds.
        Value::Time(_) => Value::from_epoch_seconds(lhs.to_int()? + rhs.to_int()?),
        Value::ResultSet(_) => Err(no_operator("+", lhs)),
    }
}

pub fn subtract(lhs: &Value, rhs: &Value) -> Result<Value> {
    match lhs {
        Value::Null => Ok(Value::Null),
        Value::Int(_) => Ok(Value::Int(lhs.to_int()? - rhs.to_int()?)),
        Value::Float(_) => Ok(Value::Float(lhs.to_float()? - rhs.to_float()?)),
        Value::Bool(_) => Ok(Value::Bool(lhs.to_int()? - rhs.to_int()? != 0)),
        Value::Time(_) => Value::from_epoch_seconds(lhs.to_int()? - rhs.to_int()?),
        Value::Varchar(_) | Value::ResultSet(_) => Err(no_operator("-", lhs)),
    }
}

pub fn multiply(lhs: &Value, rhs: &Value) -> Result<Value> {
    match lhs {
        Value::Null => Ok(Value::Null),
        Value::Int(_) => Ok(Value::Int(lhs.to_int()? * rhs.to_int()?)),
        Value::Float(_) => Ok(Value::Float(lhs.to_float()? * rhs.to_float()?)),
        Value::Bool(_) => Ok(Value::Bool(lhs.to_int()? * rhs.to_int()? != 0)),
        Value::Varchar(_) | Value::Time(_) | Value::ResultSet(_) => Err(no_operator("*", lhs)),
    }
}

pub fn divide(lhs: &Value, rhs: &Value) -> Result<Value> {
    match lhs {
        Value::Null => Ok(Value::Null),
        Value::Int(_) | Value::Bool(_) => {
            let divisor = rhs.to_int()?;
            if divisor == 0 {
                return Err(Error::unpositioned("Division by zero"));
            }
            let quotient = lhs.to_int()? / divisor;
            match lhs {
                Value::Bool(_) => Ok(Value::Bool(quotient != 0)),
                _ => Ok(Value::Int(quotient)),
            }
        }
        Value::Float(_) => {
            let divisor = rhs.to_float()?;
            if divisor == 0.0 {
                return Err(Error::unpositioned("Division by zero"));
            }
            Ok(Value::Float(lhs.to_float()? / divisor))
        }
        Value::Varchar(_) | Value::Time(_) | Value::ResultSet(_) => Err(no_operator("/", lhs)),
    }
}

fn no_operator(op: &str, lhs: &Value) -> Error {
    Error::unpositioned(format!(
        "No matching operator '{}' for '{}' type",
        op,
        lhs.type_name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_dispatches_on_lhs() {
        // Int lhs coerces the rhs to int.
        assert_eq!(
            compare(&Value::Int(2), &Value::Varchar("10".into())).unwrap(),
            Ordering::Less
        );
        // Varchar lhs compares lexicographically.
        assert_eq!(
            compare(&Value::Varchar("2".into()), &Value::Int(10)).unwrap(),
            Ordering::Greater
        );
        // Null reads as numeric zero on either side.
        assert_eq!(compare(&Value::Null, &Value::Int(0)).unwrap(), Ordering::Equal);
        assert_eq!(compare(&Value::Int(1), &Value::Null).unwrap(), Ordering::Greater);
    }

    #[test]
    fn varchar_add_concatenates() {
        assert_eq!(
            add(&Value::Varchar("ab".into()), &Value::Int(1)).unwrap(),
            Value::Varchar("ab1".into())
        );
        assert!(subtract(&Value::Varchar("ab".into()), &Value::Int(1)).is_err());
    }

    #[test]
    fn division_by_zero_is_an_error() {
        assert!(divide(&Value::Int(1), &Value::Int(0)).is_err());
        assert!(divide(&Value::Float(1.0), &Value::Int(0)).is_err());
        assert_eq!(
            divide(&Value::Int(7), &Value::Int(2)).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn null_lhs_propagates_through_arithmetic() {
        assert_eq!(add(&Value::Null, &Value::Int(1)).unwrap(), Value::Null);
        assert_eq!(divide(&Value::Null, &Value::Int(0)).unwrap(), Value::Null);
    }
}
