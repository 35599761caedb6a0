//! IMPORT CSV through the SQL surface

mod common;

use common::{column_values, int, varchar, TestContext};
use hearthdb::Value;
use std::io::Write;

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn import_creates_a_queryable_table() {
    let mut ctx = TestContext::new();
    let file = write_csv("id, name\n1, alice\n2, bob\n");

    ctx.exec(&format!(
        "IMPORT CSV '{}' INTO people",
        file.path().display()
    ));
    let result = ctx.query("SELECT name FROM people WHERE id = 2");
    assert_eq!(column_values(&result, "name"), vec![varchar("bob")]);
}

#[test]
fn import_infers_types_per_column() {
    let mut ctx = TestContext::new();
    let file = write_csv("a, b\n1, x\n2, 3\n");

    ctx.exec(&format!("IMPORT CSV '{}' INTO t", file.path().display()));
    let result = ctx.query("SELECT a, b FROM t");
    assert_eq!(column_values(&result, "a"), vec![int(1), int(2)]);
    // A single non-numeric cell turns the whole column into VARCHAR.
    assert_eq!(
        column_values(&result, "b"),
        vec![varchar("x"), varchar("3")]
    );
}

#[test]
fn import_reads_null_literals() {
    let mut ctx = TestContext::new();
    let file = write_csv("x\n1\nnull\n");

    ctx.exec(&format!("IMPORT CSV '{}' INTO t", file.path().display()));
    let result = ctx.query("SELECT x FROM t");
    assert_eq!(column_values(&result, "x"), vec![int(1), Value::Null]);
}

#[test]
fn missing_file_is_an_error() {
    let mut ctx = TestContext::new();
    let error = ctx.error("IMPORT CSV '/no/such/file.csv' INTO t");
    assert!(error.message.contains("Failed to open CSV file"));
}

#[test]
fn export_then_import_round_trips() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (id INT, name VARCHAR)");
    ctx.exec("INSERT INTO t VALUES (1, 'a'), (2, 'b')");

    let out = tempfile::NamedTempFile::new().unwrap();
    ctx.db.export_csv("t", out.path()).unwrap();

    ctx.exec(&format!("IMPORT CSV '{}' INTO copy", out.path().display()));
    let original = ctx.query("SELECT * FROM t");
    let copied = ctx.query("SELECT * FROM copy");
    assert_eq!(original.rows(), copied.rows());
}

#[test]
fn ragged_csv_is_an_error() {
    let mut ctx = TestContext::new();
    let file = write_csv("a, b\n1\n");
    let error = ctx.error(&format!("IMPORT CSV '{}' INTO t", file.path().display()));
    assert!(error.message.contains("Not enough columns"));
}
