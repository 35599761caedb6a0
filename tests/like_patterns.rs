//! LIKE wildcard matching through the SQL surface

mod common;

use common::{column_values, varchar, TableBuilder, TestContext};

fn names(ctx: &mut TestContext, pattern: &str) -> Vec<hearthdb::Value> {
    let sql = format!("SELECT name FROM t WHERE name LIKE '{}'", pattern);
    let result = ctx.query(&sql);
    column_values(&result, "name")
}

#[test]
fn anchored_patterns() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("name VARCHAR")
        .insert_values("('abc'), ('aXcZZ'), ('ac'), ('abcd')");

    // Without a trailing *, the pattern must consume the whole string.
    assert_eq!(names(&mut ctx, "a?c"), vec![varchar("abc")]);

    // With a trailing *, any suffix matches.
    assert_eq!(
        names(&mut ctx, "a?c*"),
        vec![varchar("abc"), varchar("aXcZZ"), varchar("abcd")]
    );
}

#[test]
fn digit_and_class_wildcards() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("name VARCHAR")
        .insert_values("('a1'), ('a2'), ('ax'), ('b1')");

    assert_eq!(names(&mut ctx, "a#"), vec![varchar("a1"), varchar("a2")]);
    assert_eq!(
        names(&mut ctx, "[ab]1"),
        vec![varchar("a1"), varchar("b1")]
    );
    assert_eq!(names(&mut ctx, "[!b]1"), vec![varchar("a1")]);
}

#[test]
fn ranges_in_classes() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("name VARCHAR")
        .insert_values("('dog'), ('Dog'), ('fog'), ('zog')");

    assert_eq!(
        names(&mut ctx, "[a-f]og"),
        vec![varchar("dog"), varchar("fog")]
    );
}

#[test]
fn star_in_the_middle() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("name VARCHAR")
        .insert_values("('a.b.c'), ('ac'), ('abc'), ('xac')");

    assert_eq!(
        names(&mut ctx, "a*c"),
        vec![varchar("a.b.c"), varchar("ac"), varchar("abc")]
    );
}

#[test]
fn malformed_pattern_is_an_error() {
    let mut ctx = TestContext::new();
    TableBuilder::new(&mut ctx, "t")
        .create_simple("name VARCHAR")
        .insert_values("('abc')");

    let error = ctx.error("SELECT name FROM t WHERE name LIKE '[abc'");
    assert!(error.message.contains("Unclosed character class"));
}
