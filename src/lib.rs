//! An embeddable in-memory SQL database engine
//!
//! The engine parses SQL text, builds an abstract syntax tree, evaluates
//! statements against in-memory tables, and returns tabular result sets or
//! scalar values. Supported surface: schema definition (CREATE / ALTER /
//! DROP / TRUNCATE), data manipulation (INSERT / UPDATE / DELETE), and a
//! non-trivial SELECT subset (projection, filtering, grouping and
//! aggregation, HAVING, DISTINCT, ORDER BY, TOP, UNION, subqueries, joins),
//! plus CSV ingestion.
//!
//! ```
//! use hearthdb::{Database, Value};
//!
//! let mut db = Database::new();
//! db.execute("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR)").unwrap();
//! db.execute("INSERT INTO t (id, name) VALUES (1, 'a'), (2, 'b')").unwrap();
//! let result = db.execute("SELECT name FROM t WHERE id = 2").unwrap();
//! let rows = result.to_result_set().unwrap();
//! assert_eq!(rows.rows()[0].values(), &[Value::Varchar("b".into())]);
//! ```
//!
//! The engine is single-threaded and synchronous: one execution call drives
//! a statement to completion. Callers serialize access to a [`Database`].

mod error;
mod execution;
mod functions;
mod parsing;
mod storage;
mod types;

pub use error::{Error, Result};
pub use parsing::ast::Statement;
pub use parsing::{parse_sql, parse_statements};
pub use storage::{Database, Table};
pub use types::{Column, DataType, KeyRole, ResultSet, Tuple, Value};
