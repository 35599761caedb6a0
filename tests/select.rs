//! SELECT basics: projection, WHERE, aliases, SELECT INTO

mod common;

use common::{cell, column_values, int, varchar, TableBuilder, TestContext};
use hearthdb::Value;

#[test]
fn projection_and_where() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (id INT PRIMARY KEY, name VARCHAR)");
    ctx.exec("INSERT INTO t (id, name) VALUES (1, 'a'), (2, 'b')");

    let result = ctx.query("SELECT name FROM t WHERE id = 2");
    assert_eq!(result.column_names(), &["name".to_string()]);
    assert_eq!(result.rows().len(), 1);
    assert_eq!(cell(&result, 0, "name"), &varchar("b"));
}

#[test]
fn select_star_preserves_insertion_order() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("id INT, name VARCHAR")
        .insert_values("(2, 'b'), (1, 'a'), (3, 'c')");

    let result = ctx.query("SELECT * FROM t");
    assert_eq!(result.column_names(), &["id".to_string(), "name".to_string()]);
    assert_eq!(column_values(&result, "id"), vec![int(2), int(1), int(3)]);
}

#[test]
fn where_preserves_row_count_without_reshaping() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3), (4)");

    let result = ctx.query("SELECT x FROM t WHERE x > 2");
    assert_eq!(result.rows().len(), 2);
}

#[test]
fn expressions_and_aliases_in_projection() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(3)");

    let result = ctx.query("SELECT x * 2 AS double, x + 1 FROM t");
    assert_eq!(
        result.column_names(),
        &["double".to_string(), "x + 1".to_string()]
    );
    assert_eq!(cell(&result, 0, "double"), &int(6));
    assert_eq!(cell(&result, 0, "x + 1"), &int(4));
}

#[test]
fn constant_select_needs_no_table() {
    let mut ctx = TestContext::new();
    let result = ctx.query("SELECT 1 + 1, 'x'");
    assert_eq!(result.rows().len(), 1);
    assert_eq!(result.rows()[0].values(), &[int(2), varchar("x")]);
}

#[test]
fn select_star_requires_a_table() {
    let mut ctx = TestContext::new();
    let error = ctx.error("SELECT *");
    assert!(error.message.contains("You need a table to do SELECT *"));
}

#[test]
fn column_references_fail_without_a_table() {
    let mut ctx = TestContext::new();
    let error = ctx.error("SELECT x");
    assert!(error.message.contains("No such column"));
}

#[test]
fn select_into_round_trips() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t1")
        .create_simple("id INT, name VARCHAR")
        .insert_values("(1, 'a'), (2, 'b')");

    ctx.exec("SELECT * INTO t2 FROM t1");
    let original = ctx.query("SELECT * FROM t1");
    let copied = ctx.query("SELECT * FROM t2");
    assert_eq!(original.column_names(), copied.column_names());
    assert_eq!(original.rows(), copied.rows());
}

#[test]
fn select_into_drops_an_existing_target() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t1")
        .create_simple("id INT")
        .insert_values("(1)");
    TableBuilder::new(&mut ctx, "t2")
        .create_simple("other VARCHAR")
        .insert_values("('old')");

    ctx.exec("SELECT * INTO t2 FROM t1");
    let result = ctx.query("SELECT * FROM t2");
    assert_eq!(result.column_names(), &["id".to_string()]);
    assert_eq!(column_values(&result, "id"), vec![int(1)]);
}

#[test]
fn case_expression_selects_first_true_branch() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (5), (10)");

    let result = ctx.query(
        "SELECT CASE WHEN x < 3 THEN 'small' WHEN x < 8 THEN 'medium' END AS size FROM t",
    );
    assert_eq!(
        column_values(&result, "size"),
        vec![varchar("small"), varchar("medium"), Value::Null]
    );
}

#[test]
fn between_and_in_filters() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (2), (3), (4), (5)");

    let result = ctx.query("SELECT x FROM t WHERE x BETWEEN 2 AND 4");
    assert_eq!(column_values(&result, "x"), vec![int(2), int(3), int(4)]);

    let result = ctx.query("SELECT x FROM t WHERE x IN (1, 4, 9)");
    assert_eq!(column_values(&result, "x"), vec![int(1), int(4)]);
}

#[test]
fn between_compares_strings_by_type() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("s VARCHAR")
        .insert_values("('apple'), ('banana'), ('cherry')");

    let result = ctx.query("SELECT s FROM t WHERE s BETWEEN 'b' AND 'c'");
    assert_eq!(column_values(&result, "s"), vec![varchar("banana")]);
}

#[test]
fn is_null_and_is_not_null() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1), (null), (3)");

    let result = ctx.query("SELECT x FROM t WHERE x IS NULL");
    assert_eq!(result.rows().len(), 1);
    let result = ctx.query("SELECT x FROM t WHERE x IS NOT NULL");
    assert_eq!(result.rows().len(), 2);
}

#[test]
fn qualified_column_names_resolve_through_alias() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("id INT")
        .insert_values("(7)");

    let result = ctx.query("SELECT u.id FROM t AS u");
    assert_eq!(result.rows()[0].values(), &[int(7)]);
}

#[test]
fn date_literals_compare() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("day TIME, label VARCHAR")
        .insert_values("(#2022-06-01#, 'early'), (#2022-06-15#, 'late')");

    let result = ctx.query("SELECT label FROM t WHERE day > #2022-06-07#");
    assert_eq!(column_values(&result, "label"), vec![varchar("late")]);
}
