//! Runtime value and schema types

pub mod data_type;
pub mod evaluator;
pub mod result;
pub mod schema;
pub mod value;

pub use data_type::DataType;
pub use result::ResultSet;
pub use schema::{Column, KeyRole, TableConstraints};
pub use value::{Tuple, Value};
