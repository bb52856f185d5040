use querykit_algebra::visitor::{walk_join, TupleExprVisitor, TupleExprVisitorMut};
use querykit_algebra::{
    CompareOp, Join, SliceMutator, StatementPattern, TupleExpr, ValueExpr, Var,
};
use querykit_model::NamedNode;
use std::convert::Infallible;

fn pattern(s: &str, o: &str) -> TupleExpr {
    TupleExpr::statement_pattern(
        Var::new(s),
        Var::constant(NamedNode::new_unchecked("http://example.com/p")),
        Var::new(o),
    )
}

#[derive(Default)]
struct JoinDepth {
    current: usize,
    max: usize,
}

impl TupleExprVisitor for JoinDepth {
    type Error = Infallible;

    fn visit_join(&mut self, join: &Join) -> Result<(), Self::Error> {
        self.current += 1;
        self.max = self.max.max(self.current);
        walk_join(self, join)?;
        self.current -= 1;
        Ok(())
    }
}

#[test]
fn test_visitor_descends_through_all_nodes() {
    let tree = TupleExpr::distinct(TupleExpr::filter(
        TupleExpr::join(
            TupleExpr::join(pattern("a", "b"), pattern("b", "c")),
            TupleExpr::union(pattern("c", "d"), TupleExpr::join(pattern("d", "e"), pattern("e", "f"))),
        ),
        ValueExpr::compare(CompareOp::Lt, ValueExpr::var("a"), ValueExpr::var("f")),
    ));

    let mut visitor = JoinDepth::default();
    visitor
        .visit_tuple_expr(&tree)
        .unwrap_or_else(|never| match never {});
    assert_eq!(visitor.max, 2);
    assert_eq!(visitor.current, 0);
}

struct RenameObjects;

impl TupleExprVisitorMut for RenameObjects {
    type Error = Infallible;

    fn visit_statement_pattern(
        &mut self,
        pattern: &mut StatementPattern,
    ) -> Result<(), Self::Error> {
        pattern.object = Var::new(format!("{}_renamed", pattern.object.name()));
        Ok(())
    }
}

#[test]
fn test_mutable_visitor_reaches_nested_patterns() {
    let mut tree = TupleExpr::slice(
        TupleExpr::left_join(pattern("a", "b"), pattern("b", "c"), None),
        Some(5),
        None,
    );
    RenameObjects
        .visit_tuple_expr(&mut tree)
        .unwrap_or_else(|never| match never {});

    insta::assert_snapshot!(tree, @r"
    Slice limit=5
      LeftJoin
        StatementPattern (?a <http://example.com/p> ?b_renamed)
        StatementPattern (?b <http://example.com/p> ?c_renamed)
    ");
}

#[test]
fn test_slice_mutator_updates_every_slice() {
    let mut tree = TupleExpr::union(
        TupleExpr::slice(pattern("a", "b"), Some(1), None),
        TupleExpr::slice(pattern("c", "d"), None, Some(7)),
    );
    let mut mutator = SliceMutator::change_limit_and_offset(10, 0);
    mutator
        .visit_tuple_expr(&mut tree)
        .unwrap_or_else(|never| match never {});

    assert!(mutator.limit_was_set());
    assert!(mutator.offset_was_set());
    insta::assert_snapshot!(tree, @r"
    Union
      Slice limit=10 offset=0
        StatementPattern (?a <http://example.com/p> ?b)
      Slice limit=10 offset=0
        StatementPattern (?c <http://example.com/p> ?d)
    ");
}
