//! Subqueries as expressions and as FROM sources

mod common;

use common::{column_values, int, varchar, TableBuilder, TestContext};

#[test]
fn scalar_subquery_coerces_to_a_single_cell() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3)");

    let result = ctx.query("SELECT x FROM t WHERE x = (SELECT MAX(x) FROM t)");
    assert_eq!(column_values(&result, "x"), vec![int(3)]);
}

#[test]
fn scalar_subquery_in_the_projection() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(5), (7)");

    let result = ctx.query("SELECT x + (SELECT MIN(x) FROM t) AS shifted FROM t");
    assert_eq!(column_values(&result, "shifted"), vec![int(10), int(12)]);
}

#[test]
fn multi_row_subquery_does_not_coerce() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2)");

    let error = ctx.error("SELECT x FROM t WHERE x = (SELECT x FROM t)");
    assert!(error.message.contains("exactly 1 row"));
}

#[test]
fn from_subquery_with_alias() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3)");

    let result = ctx.query("SELECT x FROM (SELECT x FROM t WHERE x > 1) AS filtered");
    assert_eq!(column_values(&result, "x"), vec![int(2), int(3)]);
}

#[test]
fn from_subquery_keeps_derived_columns() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR, x INT")
        .insert_values("('a', 1), ('a', 2), ('b', 5)");

    let result = ctx.query(
        "SELECT c FROM (SELECT g, COUNT(*) AS c FROM t GROUP BY g) AS counts WHERE g = 'a'",
    );
    assert_eq!(column_values(&result, "c"), vec![int(2)]);
}

#[test]
fn insert_accepts_a_scalar_subquery_value() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "src")
        .create_simple("x INT")
        .insert_values("(41)");
    ctx.exec("CREATE TABLE dst (x INT)");

    ctx.exec("INSERT INTO dst (x) VALUES (1 + (SELECT MAX(x) FROM src))");
    let result = ctx.query("SELECT x FROM dst");
    assert_eq!(column_values(&result, "x"), vec![int(42)]);
}

#[test]
fn select_into_is_rejected_in_subqueries() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1)");

    let error = ctx.error("SELECT x FROM (SELECT x INTO t2 FROM t) AS s");
    assert!(error.message.contains("not allowed in a subquery"));
}

#[test]
fn union_feeds_distinct_results() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "a")
        .create_simple("x INT")
        .insert_values("(1)");
    TableBuilder::new(&mut ctx, "b")
        .create_simple("x INT")
        .insert_values("(2)");

    let result = ctx.query("SELECT 'x' AS tag, x FROM a UNION SELECT 'x' AS tag, x FROM b");
    assert_eq!(
        result.rows()[0].values(),
        &[varchar("x"), int(1)]
    );
    assert_eq!(result.rows().len(), 2);
}
