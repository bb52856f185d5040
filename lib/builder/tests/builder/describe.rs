use querykit_algebra::describe::is_describe;
use querykit_algebra::QueryForm;
use querykit_builder::{QueryBuilder, QueryBuilderResult};
use querykit_model::NamedNode;

#[test]
fn test_describe_builder_produces_scaffold() -> QueryBuilderResult<()> {
    let alice = NamedNode::new_unchecked("http://example.com/alice");
    let query = QueryBuilder::describe(["friend"], [alice.clone().into()])
        .group()
        .pattern(alice, NamedNode::new_unchecked("http://example.com/knows"), "friend")
        .close_group()
        .build()?;

    assert_eq!(query.form(), QueryForm::Describe);
    assert!(is_describe(query.tuple_expr()));
    insta::assert_snapshot!(query.tuple_expr(), @r"
    MultiProjection: [?_descr_subj AS ?subject, ?_descr_pred AS ?predicate, ?_descr_obj AS ?object]
      Filter: (?_descr_subj = ?friend || ?_descr_subj = ?_descr_const_0)
        Join
          Projection: ?friend, ?_descr_const_0
            Extension: ?_descr_const_0 := <http://example.com/alice>
              StatementPattern (<http://example.com/alice> <http://example.com/knows> ?friend)
          StatementPattern (?_descr_subj ?_descr_pred ?_descr_obj)
    ");
    Ok(())
}
