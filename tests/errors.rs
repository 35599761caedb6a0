//! Error reporting: messages and source offsets

mod common;

use common::{TableBuilder, TestContext};

#[test]
fn parse_errors_follow_the_expected_got_shape() {
    let mut ctx = TestContext::new();
    let error = ctx.error("SELECT FROM t");
    assert!(error.message.starts_with("Expected"), "{}", error.message);

    let error = ctx.error("INSERT t VALUES (1)");
    assert!(error.message.contains("'INTO'"));
}

#[test]
fn parse_errors_carry_the_token_offset() {
    let mut ctx = TestContext::new();
    //             0123456789
    let error = ctx.error("SELECT a b c FROM t");
    assert_eq!(error.offset, 9);
}

#[test]
fn unknown_table_and_column() {
    let mut ctx = TestContext::new();
    let error = ctx.error("SELECT * FROM missing");
    assert!(error.message.contains("Table 'missing' does not exist"));

    TableBuilder::new(&mut ctx, "t")
        .create_simple("x INT")
        .insert_values("(1)");
    let error = ctx.error("SELECT missing FROM t");
    assert!(error.message.contains("No such column"));
    assert_eq!(error.offset, 7);
}

#[test]
fn type_errors_from_operators() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("s VARCHAR")
        .insert_values("('abc')");

    let error = ctx.error("SELECT s - 1 FROM t");
    assert!(error.message.contains("No matching operator '-'"));

    let error = ctx.error("SELECT s * 2 FROM t");
    assert!(error.message.contains("No matching operator '*'"));
}

#[test]
fn coercion_failures_name_the_value() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("s VARCHAR")
        .insert_values("('abc')");

    // Comparison dispatches on the lhs type: an Int lhs coerces the rhs
    // through its integer view, which fails for 'abc'.
    let error = ctx.error("SELECT s FROM t WHERE 5 > s");
    assert!(error.message.contains("not a valid int"));

    // A Varchar lhs compares textually instead, so the flipped form works.
    let result = ctx.query("SELECT s FROM t WHERE s > 5");
    assert_eq!(result.rows().len(), 1);
}

#[test]
fn declared_type_mismatch_on_insert() {
    let mut ctx = TestContext::new();
    ctx.exec("CREATE TABLE t (x INT)");
    let error = ctx.error("INSERT INTO t (x) VALUES ('abc')");
    assert!(error.message.contains("Type mismatch"));
}

#[test]
fn match_operator_is_unsupported() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("s VARCHAR")
        .insert_values("('a')");

    let error = ctx.error("SELECT s FROM t WHERE s MATCH 'a'");
    assert!(error.message.contains("MATCH"));
}

#[test]
fn garbage_characters_fail_the_parse() {
    let mut ctx = TestContext::new();
    let error = ctx.error("SELECT @ FROM t");
    assert!(error.message.starts_with("Expected"));
    assert_eq!(error.offset, 7);
}
