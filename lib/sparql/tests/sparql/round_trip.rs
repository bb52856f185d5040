use querykit_sparql::{parse, render, ParseOptions};
use std::error::Error;

const TWO_PATTERNS: &str = "
SELECT ?x ?y WHERE {
    ?x <http://example.com/p> ?y .
    ?y <http://example.com/q> ?z .
}";

const DISTINCT_OPTIONAL: &str = "
SELECT DISTINCT ?x ?y ?z ?w WHERE {
    ?x <http://example.com/p> ?y
    OPTIONAL { ?y <http://example.com/q> ?z . ?z <http://example.com/r> ?w }
}
LIMIT 100";

const FILTERS: &str = r#"
SELECT ?x ?n WHERE {
    ?x <http://example.com/name> ?n .
    ?x <http://example.com/age> ?a
    FILTER(?a > 18)
    FILTER(?n != "bob")
    OPTIONAL { ?x <http://example.com/mbox> ?m FILTER(bound(?m)) }
}"#;

const UNION_OPTIONAL: &str = "
SELECT ?x ?y ?z WHERE {
    { ?x <http://example.com/p> ?y } UNION { ?x <http://example.com/q> ?y }
    OPTIONAL { ?x <http://example.com/r> ?z }
}";

fn assert_round_trip(query: &str) -> Result<(), Box<dyn Error>> {
    let options = ParseOptions::default();
    let parsed = parse(query, &options)?;
    let rendered = render(&parsed)?;
    assert_eq!(parse(&rendered, &options)?, parsed, "{rendered}");
    Ok(())
}

#[test]
fn test_two_patterns() -> Result<(), Box<dyn Error>> {
    let parsed = parse(TWO_PATTERNS, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed, @r"
    SELECT
      Projection: ?x, ?y
        Join
          StatementPattern (?x <http://example.com/p> ?y)
          StatementPattern (?y <http://example.com/q> ?z)
    ");
    assert_round_trip(TWO_PATTERNS)
}

#[test]
fn test_distinct_optional() -> Result<(), Box<dyn Error>> {
    let parsed = parse(DISTINCT_OPTIONAL, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed, @r"
    SELECT
      Slice limit=100
        Distinct
          Projection: ?x, ?y, ?z, ?w
            LeftJoin
              StatementPattern (?x <http://example.com/p> ?y)
              Join
                StatementPattern (?y <http://example.com/q> ?z)
                StatementPattern (?z <http://example.com/r> ?w)
    ");
    assert_round_trip(DISTINCT_OPTIONAL)
}

#[test]
fn test_filters_and_optional_filter() -> Result<(), Box<dyn Error>> {
    let parsed = parse(FILTERS, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed, @r#"
    SELECT
      Projection: ?x, ?n
        Filter: (?a > "18"^^<http://www.w3.org/2001/XMLSchema#integer> && ?n != "bob")
          LeftJoin: bound(?m)
            Join
              StatementPattern (?x <http://example.com/name> ?n)
              StatementPattern (?x <http://example.com/age> ?a)
            StatementPattern (?x <http://example.com/mbox> ?m)
    "#);
    assert_round_trip(FILTERS)
}

#[test]
fn test_union_with_trailing_optional() -> Result<(), Box<dyn Error>> {
    let parsed = parse(UNION_OPTIONAL, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed, @r"
    SELECT
      Projection: ?x, ?y, ?z
        LeftJoin
          Union
            StatementPattern (?x <http://example.com/p> ?y)
            StatementPattern (?x <http://example.com/q> ?y)
          StatementPattern (?x <http://example.com/r> ?z)
    ");
    assert_round_trip(UNION_OPTIONAL)
}

#[test]
fn test_order_and_slice() -> Result<(), Box<dyn Error>> {
    let query = "
    SELECT ?x WHERE { ?x <http://example.com/p> ?y }
    ORDER BY DESC(?y) ?x
    LIMIT 10 OFFSET 5";
    let parsed = parse(query, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed, @r"
    SELECT
      Slice limit=10 offset=5
        Projection: ?x
          Order: DESC(?y), ASC(?x)
            StatementPattern (?x <http://example.com/p> ?y)
    ");
    assert_round_trip(query)
}

#[test]
fn test_named_graph() -> Result<(), Box<dyn Error>> {
    let query = "
    SELECT ?s WHERE {
        GRAPH ?g { ?s <http://example.com/p> ?o . ?o <http://example.com/q> ?z }
    }";
    let parsed = parse(query, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed.tuple_expr(), @r"
    Projection: ?s
      Join
        StatementPattern (?s <http://example.com/p> ?o) GRAPH ?g
        StatementPattern (?o <http://example.com/q> ?z) GRAPH ?g
    ");
    assert_round_trip(query)
}

#[test]
fn test_dataset_and_base_are_kept() -> Result<(), Box<dyn Error>> {
    let query = "
    BASE <http://example.com/>
    SELECT ?s
    FROM <http://example.com/g1>
    FROM NAMED <http://example.com/g2>
    WHERE { ?s <p> ?o }";
    let options = ParseOptions::default();
    let parsed = parse(query, &options)?;
    assert_eq!(parsed.base_iri(), Some("http://example.com/"));
    assert!(parsed.dataset().is_some());

    let rendered = render(&parsed)?;
    assert!(rendered.contains("<http://example.com/g1>"), "{rendered}");
    assert!(rendered.contains("<http://example.com/g2>"), "{rendered}");

    let reparsed = parse(&rendered, &options)?;
    assert_eq!(reparsed.dataset(), parsed.dataset());
    assert_eq!(reparsed.base_iri(), parsed.base_iri());
    Ok(())
}

#[test]
fn test_blank_nodes_stay_blank() -> Result<(), Box<dyn Error>> {
    let query = "SELECT ?x WHERE { ?x <http://example.com/p> _:b . _:b <http://example.com/q> ?y }";
    let parsed = parse(query, &ParseOptions::default())?;
    let rendered = render(&parsed)?;
    assert!(!rendered.contains("?_anon_"), "{rendered}");
    assert_round_trip(query)
}
