use querykit_algebra::describe::{is_describe, match_describe_scaffold, DescribedResource};
use querykit_algebra::{MultiProjection, QueryForm, TupleExpr};
use querykit_model::NamedNode;
use querykit_sparql::{parse, render, ParseOptions};
use std::error::Error;

fn projections(expr: &TupleExpr) -> Option<&[Vec<querykit_algebra::ProjectionElem>]> {
    match expr {
        TupleExpr::MultiProjection(MultiProjection { projections, .. }) => {
            Some(projections.as_slice())
        }
        _ => None,
    }
}

#[test]
fn test_construct_with_constant_slot() -> Result<(), Box<dyn Error>> {
    let query = "
    CONSTRUCT {
        ?x <http://example.com/knows> ?y .
        ?x <http://example.com/type> <http://example.com/Person>
    }
    WHERE { ?x <http://example.com/friend> ?y }";
    let options = ParseOptions::default();
    let parsed = parse(query, &options)?;
    assert_eq!(parsed.form(), QueryForm::Construct);

    let rendered = render(&parsed)?;
    assert!(rendered.starts_with("CONSTRUCT"), "{rendered}");
    assert!(
        rendered.contains("<http://example.com/Person>"),
        "{rendered}"
    );

    let reparsed = parse(&rendered, &options)?;
    let template = projections(parsed.tuple_expr());
    assert!(template.is_some_and(|template| template.len() == 2));
    assert_eq!(projections(reparsed.tuple_expr()), template);
    Ok(())
}

#[test]
fn test_construct_keeps_slice_on_top() -> Result<(), Box<dyn Error>> {
    let query = "CONSTRUCT { ?s ?p ?o } WHERE { ?s ?p ?o } LIMIT 3";
    let parsed = parse(query, &ParseOptions::default())?;
    insta::assert_snapshot!(parsed.tuple_expr(), @r"
    Slice limit=3
      MultiProjection: [?s AS ?subject, ?p AS ?predicate, ?o AS ?object]
        StatementPattern (?s ?p ?o)
    ");

    let rendered = render(&parsed)?;
    assert!(rendered.contains("LIMIT 3"), "{rendered}");
    Ok(())
}

#[test]
fn test_describe_var() -> Result<(), Box<dyn Error>> {
    let query = "DESCRIBE ?x WHERE { ?x <http://example.com/p> ?y }";
    let parsed = parse(query, &ParseOptions::default())?;
    assert_eq!(parsed.form(), QueryForm::Describe);
    assert!(is_describe(parsed.tuple_expr()));

    insta::assert_snapshot!(parsed.tuple_expr(), @r"
    MultiProjection: [?_descr_subj AS ?subject, ?_descr_pred AS ?predicate, ?_descr_obj AS ?object]
      Filter: ?_descr_subj = ?x
        Join
          Projection: ?x
            StatementPattern (?x <http://example.com/p> ?y)
          StatementPattern (?_descr_subj ?_descr_pred ?_descr_obj)
    ");
    Ok(())
}

#[test]
fn test_describe_constant() -> Result<(), Box<dyn Error>> {
    let resource = NamedNode::new("http://example.com/r")?;
    let query = format!("DESCRIBE {resource}");
    let parsed = parse(&query, &ParseOptions::default())?;

    let scaffold = match_describe_scaffold(parsed.tuple_expr());
    assert_eq!(
        scaffold.map(|scaffold| scaffold.resources),
        Some(vec![DescribedResource::Constant(resource.clone().into())])
    );

    let rendered = render(&parsed)?;
    assert!(rendered.starts_with("DESCRIBE"), "{rendered}");
    assert!(rendered.contains(resource.as_str()), "{rendered}");
    Ok(())
}

#[test]
fn test_describe_with_named_graphs() -> Result<(), Box<dyn Error>> {
    let options = ParseOptions::default().with_describe_named_graphs(true);
    let parsed = parse("DESCRIBE ?x WHERE { ?x ?p ?o }", &options)?;

    let scaffold = match_describe_scaffold(parsed.tuple_expr());
    assert!(scaffold.is_some_and(|scaffold| scaffold.with_named_graphs));
    Ok(())
}

#[test]
fn test_describe_constant_does_not_shadow_vars() -> Result<(), Box<dyn Error>> {
    let query = "
    DESCRIBE ?describe_1 ?_descr_const_0 <http://example.com/a>
    WHERE { ?describe_1 ?p ?_descr_const_0 }";
    let options = ParseOptions::default();
    let parsed = parse(query, &options)?;

    let rendered = render(&parsed)?;
    assert!(rendered.contains("<http://example.com/a>"), "{rendered}");
    let reparsed = parse(&rendered, &options)?;
    assert_eq!(reparsed.form(), QueryForm::Describe);
    Ok(())
}
