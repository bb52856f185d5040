use querykit::algebra::{QueryForm, TupleExpr};
use querykit::builder::QueryBuilder;
use querykit::model::vocab::{rdf, rdfs};
use querykit::query_utils::{
    escape, get_projection, is_describe, rewrite_describe, set_limit, set_limit_and_offset,
    set_offset,
};
use querykit::sparql::{parse, render, ParseOptions};
use std::collections::BTreeSet;
use std::error::Error;

const DESCRIBE: &str = "DESCRIBE ?x WHERE { ?x <http://example.com/p> ?y }";

#[test]
fn test_set_limit_wraps_root_once() -> Result<(), Box<dyn Error>> {
    let mut query = parse("SELECT ?s WHERE { ?s ?p ?o }", &ParseOptions::default())?;

    assert!(!set_limit(&mut query, 10));
    assert!(set_offset(&mut query, 5));
    insta::assert_snapshot!(query.tuple_expr(), @r"
    Slice limit=10 offset=5
      Projection: ?s
        StatementPattern (?s ?p ?o)
    ");
    Ok(())
}

#[test]
fn test_set_limit_renders_a_single_limit() -> Result<(), Box<dyn Error>> {
    let queries = [
        "SELECT ?s WHERE { ?s ?p ?o }",
        "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }",
        DESCRIBE,
    ];
    for text in queries {
        let mut query = parse(text, &ParseOptions::default())?;
        let form = query.form();
        assert!(!set_limit(&mut query, 10));

        let rendered = render(&query)?;
        assert_eq!(rendered.matches("LIMIT").count(), 1, "{rendered}");
        assert!(rendered.contains("LIMIT 10"), "{rendered}");
        assert_eq!(parse(&rendered, &ParseOptions::default())?.form(), form);
    }
    Ok(())
}

#[test]
fn test_built_construct_renders_constants() -> Result<(), Box<dyn Error>> {
    let query = QueryBuilder::construct()
        .add_projection_statement("s", rdf::TYPE, rdfs::RESOURCE)
        .group()
        .pattern("s", rdf::TYPE, "type")
        .close_group()
        .build()?;

    let rendered = render(&query)?;
    assert!(
        rendered.contains(
            "?s <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2000/01/rdf-schema#Resource>"
        ),
        "{rendered}"
    );

    let reparsed = parse(&rendered, &ParseOptions::default())?;
    assert!(matches!(
        (query.tuple_expr(), reparsed.tuple_expr()),
        (TupleExpr::MultiProjection(built), TupleExpr::MultiProjection(parsed))
            if built.projections == parsed.projections
    ));
    Ok(())
}

#[test]
fn test_set_limit_and_offset_updates_existing_slice() -> Result<(), Box<dyn Error>> {
    let mut query = parse(
        "SELECT ?s WHERE { ?s ?p ?o } LIMIT 100",
        &ParseOptions::default(),
    )?;

    assert!(set_limit_and_offset(&mut query, 0, 20));
    insta::assert_snapshot!(query.tuple_expr(), @r"
    Slice limit=0 offset=20
      Projection: ?s
        StatementPattern (?s ?p ?o)
    ");
    Ok(())
}

#[test]
fn test_rewrite_describe() -> Result<(), Box<dyn Error>> {
    let mut query = parse(DESCRIBE, &ParseOptions::default())?;
    assert!(is_describe(&query));

    assert!(rewrite_describe(&mut query, false));
    assert_eq!(query.form(), QueryForm::Select);
    insta::assert_snapshot!(query.tuple_expr(), @r"
    Projection: ?_descr_subj AS ?subject, ?_descr_pred AS ?predicate, ?_descr_obj AS ?object
      Filter: ?_descr_subj = ?x
        Join
          Projection: ?x
            StatementPattern (?x <http://example.com/p> ?y)
          StatementPattern (?_descr_subj ?_descr_pred ?_descr_obj)
    ");

    let rendered = render(&query)?;
    assert!(rendered.starts_with("SELECT"), "{rendered}");
    Ok(())
}

#[test]
fn test_rewrite_describe_with_named_graphs() -> Result<(), Box<dyn Error>> {
    let mut query = parse(DESCRIBE, &ParseOptions::default())?;

    assert!(rewrite_describe(&mut query, true));
    insta::assert_snapshot!(query.tuple_expr(), @r"
    Projection: ?_descr_subj AS ?subject, ?_descr_pred AS ?predicate, ?_descr_obj AS ?object, ?_descr_ctx AS ?context
      Filter: ?_descr_subj = ?x
        Join
          Projection: ?x
            StatementPattern (?x <http://example.com/p> ?y)
          StatementPattern (?_descr_subj ?_descr_pred ?_descr_obj) GRAPH ?_descr_ctx
    ");
    Ok(())
}

#[test]
fn test_rewrite_select_is_noop() -> Result<(), Box<dyn Error>> {
    let mut query = parse("SELECT ?s WHERE { ?s ?p ?o }", &ParseOptions::default())?;
    let original = query.clone();

    assert!(!is_describe(&query));
    assert!(!rewrite_describe(&mut query, false));
    assert_eq!(query, original);
    Ok(())
}

#[test]
fn test_rewrite_construct_is_noop() -> Result<(), Box<dyn Error>> {
    let mut query = parse(
        "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o }",
        &ParseOptions::default(),
    )?;
    let original = query.clone();

    assert!(!rewrite_describe(&mut query, false));
    assert_eq!(query, original);
    Ok(())
}

#[test]
fn test_get_projection() -> Result<(), Box<dyn Error>> {
    let query = parse(DESCRIBE, &ParseOptions::default())?;
    let names = get_projection(query.tuple_expr());

    let expected = [
        "_descr_obj",
        "_descr_pred",
        "_descr_subj",
        "object",
        "predicate",
        "subject",
        "x",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect::<BTreeSet<_>>();
    assert_eq!(names, expected);
    Ok(())
}

#[test]
fn test_escape_is_reexported() {
    assert_eq!(escape(r"\t"), r"\t");
    assert_eq!(escape(r#"a "b""#), r#"a \"b\""#);
}
