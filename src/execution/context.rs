//! The environment an expression evaluates in

use crate::error::{Error, Result};
use crate::parsing::ast::ProjectionColumn;
use crate::storage::{Database, Table};
use crate::types::{Tuple, Value};
use std::collections::HashMap;

/// Tells identifier resolution where names bind: to the columns of the
/// source table (FROM/WHERE/GROUP phases) or to the already-projected output
/// columns (HAVING/ORDER BY phases).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowType {
    FromTable,
    FromResultSet,
}

/// A possibly-derived tuple paired with the originating table row, when
/// known. Aggregate-producing paths have no source row; scalar row paths
/// keep it so post-projection expressions can still reach unselected
/// columns.
#[derive(Clone, Debug, Default)]
pub struct TupleWithSource {
    pub tuple: Tuple,
    pub source: Option<Tuple>,
}

impl TupleWithSource {
    /// A row straight out of a table: the tuple is its own source.
    pub fn from_table_row(row: &Tuple) -> TupleWithSource {
        TupleWithSource {
            tuple: row.clone(),
            source: Some(row.clone()),
        }
    }
}

/// One column of a resolved FROM relation. The qualifier is the table name
/// or alias it came from; columns of subquery sources keep the subquery's
/// alias.
#[derive(Clone, Debug)]
pub struct SourceColumn {
    pub qualifier: Option<String>,
    pub name: String,
}

/// A resolved FROM-clause relation: named columns plus materialized rows.
/// Joins concatenate the column lists of their sides.
#[derive(Clone, Debug, Default)]
pub struct SourceRelation {
    pub columns: Vec<SourceColumn>,
    pub rows: Vec<Tuple>,
}

impl SourceRelation {
    pub fn from_table(table: &Table, alias: Option<&str>) -> SourceRelation {
        let qualifier = alias.unwrap_or(table.name()).to_string();
        SourceRelation {
            columns: table
                .columns()
                .iter()
                .map(|column| SourceColumn {
                    qualifier: Some(qualifier.clone()),
                    name: column.name.clone(),
                })
                .collect(),
            rows: table.rows().to_vec(),
        }
    }

    /// A rowless relation over a table's columns, for evaluating CHECK
    /// expressions against candidate rows.
    pub fn schema_of(table: &Table) -> SourceRelation {
        let mut relation = SourceRelation::from_table(table, None);
        relation.rows.clear();
        relation
    }

    /// Finds the column matching a possibly-qualified name. Returns Ok(None)
    /// when nothing matches and an error when the bare name is ambiguous.
    pub fn find_column(&self, qualifier: Option<&str>, name: &str) -> Result<Option<usize>> {
        let mut found = None;
        for (index, column) in self.columns.iter().enumerate() {
            if column.name != name {
                continue;
            }
            if let Some(qualifier) = qualifier {
                if column.qualifier.as_deref() != Some(qualifier) {
                    continue;
                }
            }
            if found.is_some() {
                return Err(Error::unpositioned(format!(
                    "Ambiguous column name: '{}'",
                    name
                )));
            }
            found = Some(index);
        }
        Ok(found)
    }

    /// Like [`find_column`], but missing columns are an error.
    pub fn column_index(&self, qualifier: Option<&str>, name: &str) -> Result<usize> {
        self.find_column(qualifier, name)?.ok_or_else(|| {
            Error::unpositioned(format!("No such column: '{}'", name))
        })
    }
}

/// The projection list of a SELECT, with a name-to-ordinal map built at
/// construction so later clauses (HAVING, ORDER BY) can resolve aliases and
/// default column names consistently. The map stores ordinals rather than
/// expression references, so it stays valid however the list moves.
#[derive(Clone, Debug, Default)]
pub struct SelectColumns {
    columns: Vec<ProjectionColumn>,
    names: HashMap<String, usize>,
}

impl SelectColumns {
    pub fn new(columns: Vec<ProjectionColumn>) -> SelectColumns {
        let mut names = HashMap::new();
        for (ordinal, column) in columns.iter().enumerate() {
            if let Some(alias) = &column.alias {
                names.entry(alias.clone()).or_insert(ordinal);
            }
            names
                .entry(column.expression.to_string())
                .or_insert(ordinal);
        }
        SelectColumns { columns, names }
    }

    pub fn columns(&self) -> &[ProjectionColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Resolves an output-column name (alias or default printable form) to
    /// its projection ordinal.
    pub fn resolve_ordinal(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Resolves a name against an already-projected tuple, by ordinal.
    pub fn resolve_value<'a>(&self, tuple: &'a Tuple, name: &str) -> Option<&'a Value> {
        self.resolve_ordinal(name).and_then(|i| tuple.get(i))
    }

    /// The result-set column headers: the alias when given, the printable
    /// expression form otherwise.
    pub fn output_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| {
                column
                    .alias
                    .clone()
                    .unwrap_or_else(|| column.expression.to_string())
            })
            .collect()
    }
}

/// The transient environment an expression evaluates in. Threaded explicitly
/// through every evaluate call; nested subqueries rebind it without side
/// effects.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub db: &'a Database,
    /// The current projection, for alias lookups. None outside SELECT.
    pub columns: Option<&'a SelectColumns>,
    /// The resolved FROM relation, for bare column references.
    pub source: Option<&'a SourceRelation>,
    pub row_type: RowType,
    /// The current group's rows, set while aggregating.
    pub group_rows: Option<&'a [Tuple]>,
}

impl<'a> EvaluationContext<'a> {
    /// A bare table-row context, as used by DML executors and constraint
    /// checks.
    pub fn over_table(db: &'a Database, source: &'a SourceRelation) -> EvaluationContext<'a> {
        EvaluationContext {
            db,
            columns: None,
            source: Some(source),
            row_type: RowType::FromTable,
            group_rows: None,
        }
    }

    /// A context with no row bindings at all; identifiers fail to resolve.
    pub fn constant(db: &'a Database) -> EvaluationContext<'a> {
        EvaluationContext {
            db,
            columns: None,
            source: None,
            row_type: RowType::FromTable,
            group_rows: None,
        }
    }
}
