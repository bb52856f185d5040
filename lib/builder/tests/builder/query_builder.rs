use querykit_builder::expr::{eq, lt};
use querykit_builder::{QueryBuilder, QueryBuilderError, QueryBuilderResult};
use querykit_model::vocab::xsd;
use querykit_model::{Literal, NamedNode};

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{local}"))
}

#[test]
fn test_union_with_trailing_optional() -> QueryBuilderResult<()> {
    let query = QueryBuilder::select()
        .add_projection_var(["x", "y"])
        .group()
        .union()
        .left()
        .pattern("x", ex("p"), "y")
        .close_group()
        .right()
        .pattern("x", ex("q"), "y")
        .close_group()
        .close_union()?
        .optional()
        .pattern("x", ex("r"), "z")
        .close_group()
        .close_group()
        .build()?;

    insta::assert_snapshot!(query.tuple_expr(), @r"
    Projection: ?x, ?y
      LeftJoin
        Union
          StatementPattern (?x <http://example.com/p> ?y)
          StatementPattern (?x <http://example.com/q> ?y)
        StatementPattern (?x <http://example.com/r> ?z)
    ");
    Ok(())
}

#[test]
fn test_union_without_right_branch_fails() {
    let result = QueryBuilder::select()
        .group()
        .union()
        .left()
        .pattern("x", ex("p"), "y")
        .close_group()
        .close_union();

    assert!(matches!(result, Err(QueryBuilderError::UnsupportedShape(_))));
}

#[test]
fn test_union_with_left_branch_built_twice_fails() {
    let result = QueryBuilder::select()
        .group()
        .union()
        .left()
        .pattern("x", ex("p"), "y")
        .close_group()
        .left()
        .pattern("x", ex("q"), "y")
        .close_group()
        .right()
        .pattern("x", ex("r"), "y")
        .close_group()
        .close_union();

    assert!(matches!(
        result,
        Err(QueryBuilderError::UnsupportedShape(message)) if message.contains("left")
    ));
}

#[test]
fn test_group_filters_are_combined() -> QueryBuilderResult<()> {
    let query = QueryBuilder::select()
        .add_projection_var(["x"])
        .group()
        .pattern("x", ex("age"), "age")
        .filter()
        .gt("age", Literal::new_typed_literal("10", xsd::INTEGER))
        .filter_expr(lt("age", Literal::new_typed_literal("300", xsd::INTEGER)))
        .filter_expr(eq("x", ex("alice")))
        .close_group()
        .build()?;

    insta::assert_snapshot!(query.tuple_expr(), @r#"
    Projection: ?x
      Filter: ((?age > "10"^^<http://www.w3.org/2001/XMLSchema#integer> && ?age < "300"^^<http://www.w3.org/2001/XMLSchema#integer>) && ?x = <http://example.com/alice>)
        StatementPattern (?x <http://example.com/age> ?age)
    "#);
    Ok(())
}

#[test]
fn test_default_projection_has_no_duplicates() -> QueryBuilderResult<()> {
    let query = QueryBuilder::select()
        .group()
        .pattern("x", ex("knows"), "y")
        .pattern("y", ex("knows"), "x")
        .pattern("x", "p", ex("bob"))
        .close_group()
        .build()?;

    insta::assert_snapshot!(query.tuple_expr(), @r"
    Projection: ?x, ?y, ?p
      Join
        Join
          StatementPattern (?x <http://example.com/knows> ?y)
          StatementPattern (?y <http://example.com/knows> ?x)
        StatementPattern (?x ?p <http://example.com/bob>)
    ");
    Ok(())
}

#[test]
fn test_reset_restores_fresh_builder() -> QueryBuilderResult<()> {
    let mut builder = QueryBuilder::select()
        .add_projection_var(["x"])
        .group()
        .pattern("x", ex("p"), "y")
        .close_group()
        .distinct()
        .limit(5);
    builder.reset();

    assert!(matches!(
        builder.build(),
        Err(QueryBuilderError::MalformedQuery(_))
    ));

    let reused = builder
        .group()
        .pattern("a", ex("q"), "b")
        .close_group()
        .build()?;
    let fresh = QueryBuilder::select()
        .group()
        .pattern("a", ex("q"), "b")
        .close_group()
        .build()?;
    assert_eq!(reused, fresh);
    Ok(())
}

#[test]
fn test_ask_query() -> QueryBuilderResult<()> {
    let query = QueryBuilder::ask()
        .group()
        .pattern("x", ex("p"), ex("o"))
        .close_group()
        .build()?;

    insta::assert_snapshot!(query.tuple_expr(), @"StatementPattern (?x <http://example.com/p> <http://example.com/o>)");
    Ok(())
}
