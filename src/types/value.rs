//! SQL runtime values and tuples

use crate::error::{Error, Result};
use crate::types::result::ResultSet;
use crate::types::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A runtime SQL value. The tag and payload are always consistent; coercions
/// between tags go through the `to_*` methods, which fail for undefined
/// conversions (e.g. Time to Float, or a multi-cell result set to a scalar).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Varchar(String),
    Bool(bool),
    Time(NaiveDateTime),
    ResultSet(ResultSet),
}

impl Value {
    /// Creates a Time value for midnight on the given date.
    pub fn from_date(date: NaiveDate) -> Value {
        Value::Time(date.and_time(NaiveTime::MIN))
    }

    /// Creates a Time value from seconds since the Unix epoch.
    pub fn from_epoch_seconds(seconds: i64) -> Result<Value> {
        let time = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| Error::unpositioned(format!("{} is out of range for TIME", seconds)))?;
        Ok(Value::Time(time.naive_utc()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The name of this value's type tag, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Int(_) => "INT",
            Value::Float(_) => "FLOAT",
            Value::Varchar(_) => "VARCHAR",
            Value::Bool(_) => "BOOL",
            Value::Time(_) => "TIME",
            Value::ResultSet(_) => "ResultSet",
        }
    }

    /// The declared data type this value would fit, if any.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null | Value::ResultSet(_) => None,
            Value::Int(_) => Some(DataType::Int),
            Value::Float(_) => Some(DataType::Float),
            Value::Varchar(_) => Some(DataType::Varchar),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Time(_) => Some(DataType::Time),
        }
    }

    /// Coerces the value to an integer. Null is 0, Bool is 0/1, Time is
    /// seconds since the Unix epoch, Varchar must parse.
    pub fn to_int(&self) -> Result<i64> {
        match self {
            Value::Null => Ok(0),
            Value::Int(i) => Ok(*i),
            Value::Float(f) => Ok(*f as i64),
            Value::Varchar(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::unpositioned(format!("'{}' is not a valid int", s))),
            Value::Bool(b) => Ok(*b as i64),
            Value::Time(t) => Ok(t.and_utc().timestamp()),
            Value::ResultSet(r) => r.scalar()?.to_int(),
        }
    }

    /// Coerces the value to a float. Time to Float is not defined.
    pub fn to_float(&self) -> Result<f64> {
        match self {
            Value::Null => Ok(0.0),
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            Value::Varchar(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::unpositioned(format!("'{}' is not a valid float", s))),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::Time(_) => Err(Error::unpositioned("TIME is not convertible to float")),
            Value::ResultSet(r) => r.scalar()?.to_float(),
        }
    }

    /// Coerces the value to its textual form.
    pub fn to_text(&self) -> Result<String> {
        match self {
            Value::ResultSet(r) => r.scalar()?.to_text(),
            other => Ok(other.to_string()),
        }
    }

    /// Coerces the value to a boolean: true iff the integer coercion is
    /// non-zero.
    pub fn to_bool(&self) -> Result<bool> {
        Ok(self.to_int()? != 0)
    }

    /// Returns the inner result set, or an error for any other tag.
    pub fn to_result_set(&self) -> Result<ResultSet> {
        match self {
            Value::ResultSet(r) => Ok(r.clone()),
            other => Err(Error::unpositioned(format!(
                "Value '{}' is not a result set",
                other
            ))),
        }
    }

    /// Collapses a 1x1 result set to its single cell, for storing subquery
    /// results in table cells; any other value passes through.
    pub fn into_scalar(self) -> Result<Value> {
        match self {
            Value::ResultSet(result) => Ok(result.scalar()?.clone()),
            other => Ok(other),
        }
    }

    /// Checks that this value can be stored in a slot of the given declared
    /// type. Null always fits (NOT NULL is enforced separately); an Int fits
    /// a FLOAT column by widening. Result sets are not storable.
    pub fn check_type(&self, expected: DataType) -> Result<()> {
        if let Value::ResultSet(_) = self {
            return Err(Error::unpositioned(format!(
                "Type mismatch: expected {}, got ResultSet",
                expected
            )));
        }
        match (self.data_type(), expected) {
            (None, _) => Ok(()),
            (Some(actual), expected) if actual == expected => Ok(()),
            (Some(DataType::Int), DataType::Float) => Ok(()),
            (Some(actual), expected) => Err(Error::unpositioned(format!(
                "Type mismatch: expected {}, got {}",
                expected, actual
            ))),
        }
    }

    /// Converts the value to the given declared type, for ALTER COLUMN row
    /// rewriting and similar schema-driven coercions.
    pub fn cast(&self, to: DataType) -> Result<Value> {
        if self.is_null() {
            return Ok(Value::Null);
        }
        match to {
            DataType::Int => Ok(Value::Int(self.to_int()?)),
            DataType::Float => Ok(Value::Float(self.to_float()?)),
            DataType::Varchar => Ok(Value::Varchar(self.to_text()?)),
            DataType::Bool => Ok(Value::Bool(self.to_bool()?)),
            DataType::Time => match self {
                Value::Time(_) => Ok(self.clone()),
                Value::Int(i) => Value::from_epoch_seconds(*i),
                Value::Varchar(s) => {
                    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                        Error::unpositioned(format!("'{}' is not a valid date", s))
                    })?;
                    Ok(Value::from_date(date))
                }
                other => Err(Error::unpositioned(format!(
                    "{} is not convertible to TIME",
                    other.type_name()
                ))),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Varchar(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Time(t) => {
                if t.time() == NaiveTime::MIN {
                    write!(f, "{}", t.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            Value::ResultSet(r) => write!(f, "ResultSet ({} rows)", r.rows().len()),
        }
    }
}

/// An ordered, fixed-arity sequence of values. Used both as a table row and
/// as a grouping key. Comparison is positional and lexicographic, using the
/// engine's value comparison rules.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    pub fn new(values: Vec<Value>) -> Tuple {
        Tuple(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn set(&mut self, index: usize, value: Value) {
        self.0[index] = value;
    }

    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    pub fn remove(&mut self, index: usize) {
        self.0.remove(index);
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    /// Positional comparison under the engine's comparison rules. Tuples of
    /// different arity compare by common prefix, then by length.
    pub fn try_cmp(&self, other: &Tuple) -> Result<Ordering> {
        for (lhs, rhs) in self.0.iter().zip(other.0.iter()) {
            match super::evaluator::compare(lhs, rhs)? {
                Ordering::Equal => continue,
                ordering => return Ok(ordering),
            }
        }
        Ok(self.0.len().cmp(&other.0.len()))
    }

    /// Positional equality under the engine's comparison rules.
    pub fn try_eq(&self, other: &Tuple) -> Result<bool> {
        if self.0.len() != other.0.len() {
            return Ok(false);
        }
        Ok(self.try_cmp(other)? == Ordering::Equal)
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Tuple {
        Tuple(values)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_coercions() {
        assert_eq!(Value::Null.to_int().unwrap(), 0);
        assert_eq!(Value::Bool(true).to_int().unwrap(), 1);
        assert_eq!(Value::Float(3.7).to_int().unwrap(), 3);
        assert_eq!(Value::Varchar("42".into()).to_int().unwrap(), 42);
        assert!(Value::Varchar("forty".into()).to_int().is_err());
    }

    #[test]
    fn time_coercions() {
        let date = NaiveDate::from_ymd_opt(2022, 6, 1).unwrap();
        let value = Value::from_date(date);
        assert_eq!(value.to_text().unwrap(), "2022-06-01");
        assert!(value.to_float().is_err());
        let seconds = value.to_int().unwrap();
        assert_eq!(Value::from_epoch_seconds(seconds).unwrap(), value);
    }

    #[test]
    fn result_set_scalar_coercion() {
        let scalar = ResultSet::new(
            vec!["x".into()],
            vec![Tuple::new(vec![Value::Int(7)])],
        );
        assert_eq!(Value::ResultSet(scalar).to_int().unwrap(), 7);

        let two_rows = ResultSet::new(
            vec!["x".into()],
            vec![
                Tuple::new(vec![Value::Int(1)]),
                Tuple::new(vec![Value::Int(2)]),
            ],
        );
        assert!(Value::ResultSet(two_rows).to_int().is_err());
    }

    #[test]
    fn tuple_ordering_is_lexicographic() {
        let a = Tuple::new(vec![Value::Int(1), Value::Int(2)]);
        let b = Tuple::new(vec![Value::Int(1), Value::Int(3)]);
        assert_eq!(a.try_cmp(&b).unwrap(), Ordering::Less);
        assert!(a.try_eq(&a.clone()).unwrap());
    }
}
