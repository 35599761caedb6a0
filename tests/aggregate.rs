//! Grouping and aggregation

mod common;

use common::{cell, column_values, int, varchar, TableBuilder, TestContext};
use hearthdb::Value;

#[test]
fn count_star_counts_all_rows() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3)");

    let result = ctx.query("SELECT COUNT(*) FROM t");
    assert_eq!(result.rows().len(), 1);
    assert_eq!(cell(&result, 0, "COUNT(*)"), &int(3));
}

#[test]
fn count_star_on_an_empty_table_is_zero() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "empty").create_simple("x INT");

    let result = ctx.query("SELECT COUNT(*) FROM empty");
    assert_eq!(result.rows().len(), 1);
    assert_eq!(cell(&result, 0, "COUNT(*)"), &int(0));
}

#[test]
fn empty_table_aggregates_yield_one_row() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "empty").create_simple("x INT");

    let result = ctx.query("SELECT COUNT(x), SUM(x), AVG(x) FROM empty");
    assert_eq!(result.rows().len(), 1);
    assert_eq!(
        result.rows()[0].values(),
        &[int(0), Value::Null, Value::Null]
    );
}

#[test]
fn count_skips_nulls_but_count_star_does_not() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (null), (3)");

    let result = ctx.query("SELECT COUNT(x), COUNT(*) FROM t");
    assert_eq!(result.rows()[0].values(), &[int(2), int(3)]);
}

#[test]
fn sum_min_max_avg() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(10), (20), (30)");

    let result = ctx.query("SELECT SUM(x), MIN(x), MAX(x), AVG(x) FROM t");
    assert_eq!(
        result.rows()[0].values(),
        &[int(60), int(10), int(30), Value::Float(20.0)]
    );
}

#[test]
fn group_by_partitions_by_key() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR, x INT")
        .insert_values("('a', 1), ('b', 2), ('a', 3), ('b', 4), ('a', 5)");

    let result = ctx.query("SELECT g, COUNT(*), SUM(x) FROM t GROUP BY g");
    assert_eq!(result.rows().len(), 2);
    // Groups appear in first-seen order.
    assert_eq!(result.rows()[0].values(), &[varchar("a"), int(3), int(9)]);
    assert_eq!(result.rows()[1].values(), &[varchar("b"), int(2), int(6)]);
}

#[test]
fn group_by_with_having_and_order() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR")
        .insert_values("('x'), ('x'), ('y'), ('z'), ('z'), ('z')");

    let result =
        ctx.query("SELECT g, COUNT(*) AS c FROM t GROUP BY g HAVING COUNT(*) > 1 ORDER BY c DESC");
    assert_eq!(result.rows().len(), 2);
    assert_eq!(result.rows()[0].values(), &[varchar("z"), int(3)]);
    assert_eq!(result.rows()[1].values(), &[varchar("x"), int(2)]);
}

#[test]
fn having_can_use_an_unprojected_aggregate() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR, x INT")
        .insert_values("('a', 1), ('a', 2), ('b', 10)");

    let result = ctx.query("SELECT g FROM t GROUP BY g HAVING SUM(x) > 5");
    assert_eq!(column_values(&result, "g"), vec![varchar("b")]);
}

#[test]
fn partition_by_behaves_like_group_by() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR")
        .insert_values("('a'), ('a'), ('b')");

    let result = ctx.query("SELECT g, COUNT(*) FROM t PARTITION BY g");
    assert_eq!(result.rows().len(), 2);
}

#[test]
fn non_aggregate_projection_outside_group_by_is_an_error() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR, x INT")
        .insert_values("('a', 1)");

    let error = ctx.error("SELECT x, COUNT(*) FROM t GROUP BY g");
    assert!(error
        .message
        .contains("must be either aggregate or occur in GROUP BY clause"));
}

#[test]
fn aggregate_in_where_is_an_error() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1)");

    let error = ctx.error("SELECT x FROM t WHERE COUNT(*) > 0");
    assert!(error.message.contains("not allowed here"));
}

#[test]
fn where_filters_before_grouping() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR, x INT")
        .insert_values("('a', 1), ('a', 100), ('b', 2)");

    let result = ctx.query("SELECT g, COUNT(*) FROM t WHERE x < 50 GROUP BY g");
    assert_eq!(result.rows().len(), 2);
    assert_eq!(cell(&result, 0, "COUNT(*)"), &int(1));
}

#[test]
fn aggregate_over_an_expression() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3)");

    let result = ctx.query("SELECT SUM(x * 2) FROM t");
    assert_eq!(result.rows()[0].values(), &[int(12)]);
}

#[test]
fn group_by_expression_key() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3), (4)");

    // Group by parity of x.
    let result = ctx.query("SELECT COUNT(*) FROM t GROUP BY x - x / 2 * 2");
    assert_eq!(result.rows().len(), 2);
}

#[test]
fn windowed_aggregates_are_rejected() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("g VARCHAR, x INT")
        .insert_values("('a', 1)");

    let error = ctx.error("SELECT SUM(x) OVER (PARTITION BY g) FROM t");
    assert!(error.message.contains("OVER"));
}
