//! CREATE, DROP, TRUNCATE, ALTER, SHOW TABLES

mod common;

use common::{column_values, int, varchar, TableBuilder, TestContext};
use hearthdb::Value;

#[test]
fn create_insert_select_round_trip() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (id INT, name VARCHAR)");
    ctx.exec("INSERT INTO t VALUES (1, 'a'), (2, 'b')");

    let result = ctx.query("SELECT * FROM t");
    assert_eq!(result.rows().len(), 2);
    assert_eq!(result.rows()[0].values(), &[int(1), varchar("a")]);
    assert_eq!(result.rows()[1].values(), &[int(2), varchar("b")]);
}

#[test]
fn create_duplicate_table_is_an_error() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (id INT)");
    let error = ctx.error("CREATE TABLE t (id INT)");
    assert!(error.message.contains("already exists"));
}

#[test]
fn if_not_exists_makes_create_idempotent() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (id INT)");
    ctx.exec("INSERT INTO t VALUES (1)");
    ctx.exec("CREATE TABLE IF NOT EXISTS t (id INT)");
    // The existing table is untouched.
    assert_eq!(ctx.query("SELECT * FROM t").rows().len(), 1);
}

#[test]
fn drop_table_removes_it() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (id INT)");
    ctx.exec("DROP TABLE t");
    let error = ctx.error("SELECT * FROM t");
    assert!(error.message.contains("does not exist"));
}

#[test]
fn if_exists_makes_drop_and_truncate_idempotent() {
    let mut ctx = TestContext::new();
    ctx.exec("DROP TABLE IF EXISTS missing");
    ctx.exec("TRUNCATE TABLE IF EXISTS missing");
    let error = ctx.error("DROP TABLE missing");
    assert!(error.message.contains("does not exist"));
}

#[test]
fn truncate_preserves_the_schema() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("id INT, name VARCHAR")
        .insert_values("(1, 'a')");

    ctx.exec("TRUNCATE TABLE t");
    let result = ctx.query("SELECT * FROM t");
    assert_eq!(result.rows().len(), 0);
    assert_eq!(result.column_names(), &["id".to_string(), "name".to_string()]);
}

#[test]
fn alter_add_column_extends_existing_rows() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("id INT")
        .insert_values("(1), (2)");

    ctx.exec("ALTER TABLE t ADD score INT DEFAULT 5");
    let result = ctx.query("SELECT score FROM t");
    assert_eq!(column_values(&result, "score"), vec![int(5), int(5)]);
}

#[test]
fn alter_column_rewrites_rows_to_the_new_type() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("id INT")
        .insert_values("(1), (2)");

    ctx.exec("ALTER TABLE t ALTER COLUMN id VARCHAR");
    let result = ctx.query("SELECT id FROM t");
    assert_eq!(
        column_values(&result, "id"),
        vec![varchar("1"), varchar("2")]
    );
}

#[test]
fn alter_drop_column_shrinks_rows() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("id INT, name VARCHAR")
        .insert_values("(1, 'a')");

    ctx.exec("ALTER TABLE t DROP COLUMN name");
    let result = ctx.query("SELECT * FROM t");
    assert_eq!(result.column_names(), &["id".to_string()]);
    assert_eq!(result.rows()[0].values(), &[int(1)]);
}

#[test]
fn alter_applies_add_then_alter_then_drop() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("a INT")
        .insert_values("(7)");

    ctx.exec("ALTER TABLE t DROP COLUMN a, ADD b INT, ALTER COLUMN b VARCHAR");
    let result = ctx.query("SELECT * FROM t");
    assert_eq!(result.column_names(), &["b".to_string()]);
    assert_eq!(result.rows()[0].values(), &[Value::Null]);
}

#[test]
fn alter_manages_check_constraints() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (x INT)");
    ctx.exec("ALTER TABLE t ADD CONSTRAINT positive CHECK x > 0");

    let error = ctx.error("INSERT INTO t (x) VALUES (-1)");
    assert!(error.message.contains("positive"));

    ctx.exec("ALTER TABLE t DROP CONSTRAINT positive");
    ctx.exec("INSERT INTO t (x) VALUES (-1)");
}

#[test]
fn show_tables_lists_the_catalog() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE alpha (x INT)");
    ctx.exec("CREATE TABLE beta (x INT)");

    let result = ctx.query("SHOW TABLES");
    assert_eq!(result.column_names(), &["name".to_string()]);
    assert_eq!(
        column_values(&result, "name"),
        vec![varchar("alpha"), varchar("beta")]
    );
}

#[test]
fn print_passes_the_inner_result_through() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1)");

    let result = ctx.query("PRINT SELECT x FROM t");
    assert_eq!(result.rows().len(), 1);
}

#[test]
fn edb_engine_is_rejected() {
    let mut ctx = TestContext::new();
    let error = ctx.error("CREATE TABLE t (x INT) ENGINE EDB");
    assert!(error.message.contains("EDB"));
    ctx.exec("CREATE TABLE t (x INT) ENGINE MEMORY");
}

#[test]
fn statement_lists_execute_in_order() {
    let mut ctx = TestContext::new();
    let results = ctx
        .db
        .execute_all("CREATE TABLE t (x INT); INSERT INTO t VALUES (1); SELECT * FROM t;")
        .unwrap();
    assert_eq!(results.len(), 3);
    let Value::ResultSet(result) = &results[2] else {
        panic!("expected a result set");
    };
    assert_eq!(result.rows().len(), 1);
}
