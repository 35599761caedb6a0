//! Top-level statement dispatch

use crate::error::Result;
use crate::execution::{ddl, delete, insert, select, update};
use crate::parsing::ast::Statement;
use crate::storage::Database;
use crate::types::Value;
use log::debug;

/// Executes one statement against the database, returning its result value.
/// SELECT and UNION return a ResultSet value; everything else returns Null.
pub fn execute_statement(db: &mut Database, statement: &Statement) -> Result<Value> {
    match statement {
        Statement::Select(query) => {
            debug!("executing SELECT{}", if query.into.is_some() { " INTO" } else { "" });
            let result = select::execute_select(db, query)?;
            if let Some(into) = &query.into {
                ddl::materialize_into(db, into, &result, query.offset)?;
            }
            Ok(Value::ResultSet(result))
        }
        Statement::Union { lhs, rhs, distinct, offset } => {
            debug!("executing UNION (distinct: {})", distinct);
            let result = select::execute_union(db, lhs, rhs, *distinct, *offset)?;
            Ok(Value::ResultSet(result))
        }
        Statement::Insert(statement) => {
            debug!("executing INSERT INTO {}", statement.table);
            insert::execute_insert(db, statement)
        }
        Statement::Update(statement) => {
            debug!("executing UPDATE {}", statement.table);
            update::execute_update(db, statement)
        }
        Statement::Delete(statement) => {
            debug!("executing DELETE FROM {}", statement.table);
            delete::execute_delete(db, statement)
        }
        Statement::CreateTable(statement) => {
            debug!("executing CREATE TABLE {}", statement.name);
            ddl::execute_create_table(db, statement)
        }
        Statement::DropTable { name, if_exists, offset } => {
            debug!("executing DROP TABLE {}", name);
            ddl::execute_drop_table(db, name, *if_exists, *offset)
        }
        Statement::TruncateTable { name, if_exists, offset } => {
            debug!("executing TRUNCATE TABLE {}", name);
            ddl::execute_truncate_table(db, name, *if_exists, *offset)
        }
        Statement::AlterTable(statement) => {
            debug!("executing ALTER TABLE {}", statement.name);
            ddl::execute_alter_table(db, statement)
        }
        Statement::Import(statement) => {
            debug!(
                "executing IMPORT CSV '{}' INTO {}",
                statement.filename, statement.table
            );
            ddl::execute_import(db, statement)
        }
        Statement::ShowTables { .. } => ddl::execute_show_tables(db),
        Statement::Print(inner, _) => execute_statement(db, inner),
    }
}
