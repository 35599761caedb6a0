//! Query result sets
//!
//! A result set is first-class as a value so that scalar subqueries are
//! ordinary expressions: a 1x1 result set coerces to its single cell.

use crate::error::{Error, Result};
use crate::types::value::{Tuple, Value};
use serde::{Deserialize, Serialize};

/// An ordered list of column names plus an ordered list of rows whose arity
/// equals the name count. Not tied to any table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    column_names: Vec<String>,
    rows: Vec<Tuple>,
}

impl ResultSet {
    pub fn new(column_names: Vec<String>, rows: Vec<Tuple>) -> ResultSet {
        ResultSet { column_names, rows }
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn rows(&self) -> &[Tuple] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Tuple> {
        self.rows
    }

    /// The single cell of a 1x1 result set, for scalar coercion.
    pub fn scalar(&self) -> Result<&Value> {
        if self.rows.len() != 1 {
            return Err(Error::unpositioned(format!(
                "Result set must have exactly 1 row to be convertible to a scalar, got {}",
                self.rows.len()
            )));
        }
        if self.rows[0].len() != 1 {
            return Err(Error::unpositioned(format!(
                "Result set must have exactly 1 column to be convertible to a scalar, got {}",
                self.rows[0].len()
            )));
        }
        Ok(&self.rows[0].values()[0])
    }
}
