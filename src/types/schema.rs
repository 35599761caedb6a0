//! Table schema types

use crate::parsing::ast::Expression;
use crate::types::value::Value;
use crate::types::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The key role of a column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum KeyRole {
    None,
    Primary,
    Foreign {
        referenced_table: String,
        referenced_column: String,
    },
}

/// A table column: name, declared type, and constraint flags. Column names
/// are unique within a table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub datatype: DataType,
    pub auto_increment: bool,
    pub unique: bool,
    pub not_null: bool,
    pub default: Option<Value>,
    pub key: KeyRole,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: DataType) -> Column {
        Column {
            name: name.into(),
            datatype,
            auto_increment: false,
            unique: false,
            not_null: false,
            default: None,
            key: KeyRole::None,
        }
    }

    pub fn auto_increment(mut self) -> Column {
        self.auto_increment = true;
        self
    }

    pub fn unique(mut self) -> Column {
        self.unique = true;
        self
    }

    pub fn not_null(mut self) -> Column {
        self.not_null = true;
        self
    }

    pub fn default(mut self, value: Value) -> Column {
        self.default = Some(value);
        self
    }

    /// Marks this column as the primary key, which implies UNIQUE and
    /// NOT NULL.
    pub fn primary_key(mut self) -> Column {
        self.key = KeyRole::Primary;
        self.unique = true;
        self.not_null = true;
        self
    }

    pub fn foreign_key(
        mut self,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Column {
        self.key = KeyRole::Foreign {
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        };
        self
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.datatype)?;
        if self.key == KeyRole::Primary {
            write!(f, " PRIMARY KEY")?;
        } else {
            if self.not_null {
                write!(f, " NOT NULL")?;
            }
            if self.unique {
                write!(f, " UNIQUE")?;
            }
        }
        if self.auto_increment {
            write!(f, " AUTO_INCREMENT")?;
        }
        if let Some(default) = &self.default {
            write!(f, " DEFAULT {}", default)?;
        }
        if let KeyRole::Foreign {
            referenced_table,
            referenced_column,
        } = &self.key
        {
            write!(
                f,
                " FOREIGN KEY REFERENCES {}({})",
                referenced_table, referenced_column
            )?;
        }
        Ok(())
    }
}

/// The CHECK rules attached to a table: one optional anonymous top-level
/// check plus any number of named constraints. Each rule must evaluate to
/// true for every stored row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableConstraints {
    pub check: Option<Expression>,
    pub named: Vec<(String, Expression)>,
}

impl TableConstraints {
    pub fn is_empty(&self) -> bool {
        self.check.is_none() && self.named.is_empty()
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.named.iter().any(|(n, _)| n == name)
    }
}
