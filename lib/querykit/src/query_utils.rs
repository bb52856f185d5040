//! Best-effort utilities that inspect or modify a [ParsedQuery] in place.
//!
//! None of them fail. They report whether they changed something instead.

use querykit_algebra::describe;
use querykit_algebra::visitor::TupleExprVisitorMut;
use querykit_algebra::{ParsedQuery, ProjectionNameCollector, QueryForm, SliceMutator, TupleExpr};
use std::collections::BTreeSet;
use std::mem;

pub use querykit_model::{
    arq_sparql_query_string, escape, render_value, serql_query_string, sparql_query_string,
    ValueDialect,
};

/// Sets the limit of every slice in the query.
///
/// Returns false if the query had no slice. In this case the root is wrapped in a new slice.
pub fn set_limit(query: &mut ParsedQuery, limit: usize) -> bool {
    apply_slice_mutator(query, &mut SliceMutator::change_limit(limit))
}

/// Sets the offset of every slice in the query. See [set_limit].
pub fn set_offset(query: &mut ParsedQuery, offset: usize) -> bool {
    apply_slice_mutator(query, &mut SliceMutator::change_offset(offset))
}

/// Sets the limit and the offset of every slice in the query. See [set_limit].
pub fn set_limit_and_offset(query: &mut ParsedQuery, limit: usize, offset: usize) -> bool {
    apply_slice_mutator(
        query,
        &mut SliceMutator::change_limit_and_offset(limit, offset),
    )
}

fn apply_slice_mutator(query: &mut ParsedQuery, mutator: &mut SliceMutator) -> bool {
    mutator
        .visit_tuple_expr(query.tuple_expr_mut())
        .unwrap_or_else(|never| match never {});
    if mutator.limit_was_set() || mutator.offset_was_set() {
        return true;
    }

    let root = mem::take(query.tuple_expr_mut());
    query.set_tuple_expr(TupleExpr::slice(root, mutator.limit(), mutator.offset()));
    false
}

/// Returns true if the query looks like a describe query.
///
/// The check only looks at the names of vars and projections. See [describe::is_describe].
pub fn is_describe(query: &ParsedQuery) -> bool {
    describe::is_describe(query.tuple_expr())
}

/// Replaces the statement projection of a describe query with a projection of the described
/// statements. The query becomes a select query with the columns `subject`, `predicate` and
/// `object`, plus `context` if `with_named_graphs` is set.
///
/// Returns false and leaves the query untouched if the tree cannot be simplified.
pub fn rewrite_describe(query: &mut ParsedQuery, with_named_graphs: bool) -> bool {
    match describe::rewrite_describe(query.tuple_expr(), with_named_graphs) {
        Ok(rewritten) => {
            query.set_tuple_expr(rewritten);
            query.set_form(QueryForm::Select);
            true
        }
        Err(error) => {
            tracing::warn!("Could not simplify describe query: {error}");
            false
        }
    }
}

/// Returns the source and target names of all projection elements in `expr`.
pub fn get_projection(expr: &TupleExpr) -> BTreeSet<String> {
    ProjectionNameCollector::collect(expr)
}
