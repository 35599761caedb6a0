//! Declared column data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The data types a column can be declared with. This is the declared type of
/// a storage slot; runtime values additionally have Null and ResultSet tags
/// (see [`crate::types::Value`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Float,
    Varchar,
    Bool,
    Time,
}

impl DataType {
    /// Parses a type name as it appears in column declarations.
    /// Matching is case-insensitive.
    pub fn from_name(name: &str) -> Option<DataType> {
        match name.to_uppercase().as_str() {
            "INT" => Some(DataType::Int),
            "FLOAT" => Some(DataType::Float),
            "VARCHAR" => Some(DataType::Varchar),
            "BOOL" => Some(DataType::Bool),
            "TIME" => Some(DataType::Time),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Varchar => "VARCHAR",
            DataType::Bool => "BOOL",
            DataType::Time => "TIME",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_are_case_insensitive() {
        assert_eq!(DataType::from_name("int"), Some(DataType::Int));
        assert_eq!(DataType::from_name("Varchar"), Some(DataType::Varchar));
        assert_eq!(DataType::from_name("TIME"), Some(DataType::Time));
        assert_eq!(DataType::from_name("TEXT"), None);
    }
}
