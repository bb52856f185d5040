use querykit::algebra::ParsedQuery;
use querykit::builder::QueryBuilder;
use querykit::model::vocab::xsd;
use querykit::model::{Literal, NamedNode};
use querykit::sparql::{parse, render, ParseOptions};
use std::error::Error;

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{local}"))
}

/// Checks that the built query equals the parsed one and survives rendering.
fn assert_same_tree(built: &ParsedQuery, query: &str) -> Result<(), Box<dyn Error>> {
    let options = ParseOptions::default();
    assert_eq!(built, &parse(query, &options)?);
    assert_eq!(&parse(&render(built)?, &options)?, built);
    Ok(())
}

#[test]
fn test_two_patterns() -> Result<(), Box<dyn Error>> {
    let built = QueryBuilder::select()
        .add_projection_var(["x", "y"])
        .group()
        .pattern("x", ex("p"), "y")
        .pattern("y", ex("q"), "z")
        .close_group()
        .build()?;

    assert_same_tree(
        &built,
        "SELECT ?x ?y WHERE { ?x <http://example.com/p> ?y . ?y <http://example.com/q> ?z }",
    )
}

#[test]
fn test_distinct_optional_with_limit() -> Result<(), Box<dyn Error>> {
    let built = QueryBuilder::select()
        .add_projection_var(["x", "y", "z", "w"])
        .group()
        .pattern("x", ex("p"), "y")
        .optional()
        .pattern("y", ex("q"), "z")
        .pattern("z", ex("r"), "w")
        .close_group()
        .close_group()
        .distinct()
        .limit(100)
        .build()?;

    assert_same_tree(
        &built,
        "SELECT DISTINCT ?x ?y ?z ?w WHERE {
            ?x <http://example.com/p> ?y
            OPTIONAL { ?y <http://example.com/q> ?z . ?z <http://example.com/r> ?w }
        } LIMIT 100",
    )
}

#[test]
fn test_filters_with_filtered_optional() -> Result<(), Box<dyn Error>> {
    let built = QueryBuilder::select()
        .add_projection_var(["x", "n"])
        .group()
        .pattern("x", ex("name"), "n")
        .pattern("x", ex("age"), "a")
        .filter()
        .gt("a", Literal::new_typed_literal("18", xsd::INTEGER))
        .filter()
        .ne("n", Literal::new_simple_literal("bob"))
        .optional()
        .pattern("x", ex("mbox"), "m")
        .filter()
        .bound("m")
        .close_group()
        .close_group()
        .build()?;

    assert_same_tree(
        &built,
        r#"SELECT ?x ?n WHERE {
            ?x <http://example.com/name> ?n .
            ?x <http://example.com/age> ?a
            FILTER(?a > 18)
            FILTER(?n != "bob")
            OPTIONAL { ?x <http://example.com/mbox> ?m FILTER(bound(?m)) }
        }"#,
    )
}

#[test]
fn test_union_with_trailing_optional() -> Result<(), Box<dyn Error>> {
    let built = QueryBuilder::select()
        .add_projection_var(["x", "y", "z"])
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

    assert_same_tree(
        &built,
        "SELECT ?x ?y ?z WHERE {
            { ?x <http://example.com/p> ?y } UNION { ?x <http://example.com/q> ?y }
            OPTIONAL { ?x <http://example.com/r> ?z }
        }",
    )
}

#[test]
fn test_order_and_offset() -> Result<(), Box<dyn Error>> {
    let built = QueryBuilder::select()
        .add_projection_var(["x"])
        .group()
        .pattern("x", ex("p"), "y")
        .close_group()
        .order_by("y", false)
        .limit(10)
        .offset(5)
        .build()?;

    assert_same_tree(
        &built,
        "SELECT ?x WHERE { ?x <http://example.com/p> ?y } ORDER BY DESC(?y) LIMIT 10 OFFSET 5",
    )
}
