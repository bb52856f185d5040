//! Describe queries.
//!
//! A describe query is represented by a fixed scaffold around the pattern that selects the
//! described resources:
//!
//! ```text
//! MultiProjection: [?_descr_subj AS ?subject, ?_descr_pred AS ?predicate, ?_descr_obj AS ?object]
//!   Filter: (?_descr_subj = ?d1 || ?_descr_subj = ?_descr_const_0)
//!     Join
//!       Projection: ?d1, ?_descr_const_0
//!         Extension: ?_descr_const_0 := <http://example.com/r>
//!           <pattern>
//!       StatementPattern (?_descr_subj ?_descr_pred ?_descr_obj)
//! ```
//!
//! All vars introduced by the scaffold share the [DESCRIBE_PREFIX], which is how describe
//! queries are recognized.

use crate::visitor::{walk_tuple_expr_mut, TupleExprVisitor, TupleExprVisitorMut};
use crate::{
    CompareOp, Extension, ExtensionElem, Filter, Join, MultiProjection, Projection,
    ProjectionElem, StatementPattern, TupleExpr, ValueExpr, Var,
};
use querykit_model::Term;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::mem;

pub const DESCRIBE_PREFIX: &str = "_descr_";
pub const DESCRIBE_SUBJECT: &str = "_descr_subj";
pub const DESCRIBE_PREDICATE: &str = "_descr_pred";
pub const DESCRIBE_OBJECT: &str = "_descr_obj";
pub const DESCRIBE_CONTEXT: &str = "_descr_ctx";
const DESCRIBE_CONSTANT_PREFIX: &str = "_descr_const_";

/// A resource that should be described.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DescribedResource {
    /// All values bound to the var by the pattern.
    Var(String),
    /// A fixed resource.
    Constant(Term),
}

/// An error that prevents the simplification of a describe query.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DescribeRewriteError {
    #[error("The tree does not contain a describe projection")]
    MissingDescribeProjection,
    #[error("Unexpected projection in a describe query: {0}")]
    UnexpectedProjection(String),
}

/// Returns the projection of the statements of a describe query.
pub fn describe_projection(with_named_graphs: bool) -> Vec<ProjectionElem> {
    let mut elements = vec![
        ProjectionElem::renamed(DESCRIBE_SUBJECT, "subject"),
        ProjectionElem::renamed(DESCRIBE_PREDICATE, "predicate"),
        ProjectionElem::renamed(DESCRIBE_OBJECT, "object"),
    ];
    if with_named_graphs {
        elements.push(ProjectionElem::renamed(DESCRIBE_CONTEXT, "context"));
    }
    elements
}

/// Hands out names for the vars that bind constant resources.
///
/// The names use the `_descr_const_` prefix and skip every name that is already used by a var,
/// an extension or a projection of the pattern, or by a described var.
#[derive(Debug)]
pub struct DescribeConstantNames {
    used: BTreeSet<String>,
    next: usize,
}

impl DescribeConstantNames {
    pub fn new(pattern: &TupleExpr, resources: &[DescribedResource]) -> Self {
        let mut collector = UsedNameCollector::default();
        collector
            .visit_tuple_expr(pattern)
            .unwrap_or_else(|never| match never {});

        let mut used = collector.names;
        for resource in resources {
            if let DescribedResource::Var(name) = resource {
                used.insert(name.clone());
            }
        }
        Self { used, next: 0 }
    }

    /// Returns the next unused name. The name counts as used afterwards.
    pub fn fresh(&mut self) -> String {
        loop {
            let name = format!("{DESCRIBE_CONSTANT_PREFIX}{}", self.next);
            self.next += 1;
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }
}

#[derive(Default)]
struct UsedNameCollector {
    names: BTreeSet<String>,
}

impl TupleExprVisitor for UsedNameCollector {
    type Error = Infallible;

    fn visit_var(&mut self, var: &Var) -> Result<(), Self::Error> {
        self.names.insert(var.name().to_owned());
        Ok(())
    }

    fn visit_projection_elem(&mut self, elem: &ProjectionElem) -> Result<(), Self::Error> {
        self.names.insert(elem.source.clone());
        self.names.insert(elem.target.clone());
        Ok(())
    }

    fn visit_extension_elem(&mut self, elem: &ExtensionElem) -> Result<(), Self::Error> {
        self.names.insert(elem.name.clone());
        self.visit_value_expr(&elem.expr)
    }
}

/// Wraps `pattern` in the describe scaffold for `resources`.
pub fn describe_scaffold(
    pattern: TupleExpr,
    resources: &[DescribedResource],
    with_named_graphs: bool,
) -> TupleExpr {
    let mut constant_names = DescribeConstantNames::new(&pattern, resources);
    let mut names = Vec::with_capacity(resources.len());
    let mut constants = Vec::new();
    for resource in resources {
        match resource {
            DescribedResource::Var(name) => names.push(name.clone()),
            DescribedResource::Constant(value) => {
                let name = constant_names.fresh();
                constants.push(ExtensionElem::new(
                    name.clone(),
                    ValueExpr::Constant(value.clone()),
                ));
                names.push(name);
            }
        }
    }

    let pattern = if constants.is_empty() {
        pattern
    } else {
        TupleExpr::extension(pattern, constants)
    };
    let described = TupleExpr::projection(
        pattern,
        names.iter().map(ProjectionElem::new).collect(),
    );

    let mut statement = StatementPattern::new(
        Var::new(DESCRIBE_SUBJECT),
        Var::new(DESCRIBE_PREDICATE),
        Var::new(DESCRIBE_OBJECT),
    );
    if with_named_graphs {
        statement = statement.with_context(Var::new(DESCRIBE_CONTEXT));
    }

    let joined = TupleExpr::join(described, TupleExpr::StatementPattern(statement));
    let condition = ValueExpr::disjunction(names.iter().map(|name| {
        ValueExpr::compare(
            CompareOp::Eq,
            ValueExpr::var(DESCRIBE_SUBJECT),
            ValueExpr::var(name.as_str()),
        )
    }));
    let filtered = match condition {
        Some(condition) => TupleExpr::filter(joined, condition),
        None => joined,
    };

    TupleExpr::multi_projection(filtered, vec![describe_projection(with_named_graphs)])
}

/// The parts of a describe scaffold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DescribeScaffold<'a> {
    pub pattern: &'a TupleExpr,
    pub resources: Vec<DescribedResource>,
    pub with_named_graphs: bool,
}

/// Matches `expr` against the describe scaffold created by [describe_scaffold].
pub fn match_describe_scaffold(expr: &TupleExpr) -> Option<DescribeScaffold<'_>> {
    let TupleExpr::MultiProjection(MultiProjection { arg, projections }) = expr else {
        return None;
    };
    let with_named_graphs = match projections.as_slice() {
        [projection] if *projection == describe_projection(false) => false,
        [projection] if *projection == describe_projection(true) => true,
        _ => return None,
    };

    let joined = match arg.as_ref() {
        TupleExpr::Filter(Filter { arg, .. }) => arg.as_ref(),
        other => other,
    };
    let TupleExpr::Join(Join { left, right }) = joined else {
        return None;
    };
    let TupleExpr::StatementPattern(statement) = right.as_ref() else {
        return None;
    };
    if statement.subject.name() != DESCRIBE_SUBJECT {
        return None;
    }
    let TupleExpr::Projection(Projection { arg, elements }) = left.as_ref() else {
        return None;
    };

    let no_constants: &[ExtensionElem] = &[];
    let (pattern, constants) = match arg.as_ref() {
        TupleExpr::Extension(Extension { arg, elements })
            if elements
                .iter()
                .all(|elem| elem.name.starts_with(DESCRIBE_CONSTANT_PREFIX)) =>
        {
            (arg.as_ref(), elements.as_slice())
        }
        other => (other, no_constants),
    };

    let mut resources = Vec::with_capacity(elements.len());
    for element in elements {
        let constant = constants
            .iter()
            .find(|elem| elem.name == element.source)
            .map(|elem| &elem.expr);
        resources.push(match constant {
            Some(ValueExpr::Constant(value)) => DescribedResource::Constant(value.clone()),
            Some(_) => return None,
            None => DescribedResource::Var(element.source.clone()),
        });
    }

    Some(DescribeScaffold {
        pattern,
        resources,
        with_named_graphs,
    })
}

/// Returns true if any var, projection element or extension element of `expr` uses the
/// [DESCRIBE_PREFIX].
pub fn is_describe(expr: &TupleExpr) -> bool {
    DescribeDetector.visit_tuple_expr(expr).is_err()
}

/// Aborts the walk as soon as a describe name has been found.
struct DescribeDetector;

struct DescribeNameFound;

impl TupleExprVisitor for DescribeDetector {
    type Error = DescribeNameFound;

    fn visit_var(&mut self, var: &Var) -> Result<(), Self::Error> {
        check_describe_name(var.name())
    }

    fn visit_projection_elem(&mut self, elem: &ProjectionElem) -> Result<(), Self::Error> {
        check_describe_name(&elem.source)?;
        check_describe_name(&elem.target)
    }

    fn visit_extension_elem(&mut self, elem: &ExtensionElem) -> Result<(), Self::Error> {
        check_describe_name(&elem.name)?;
        self.visit_value_expr(&elem.expr)
    }
}

fn check_describe_name(name: &str) -> Result<(), DescribeNameFound> {
    if name.starts_with(DESCRIBE_PREFIX) {
        Err(DescribeNameFound)
    } else {
        Ok(())
    }
}

/// Replaces the statement projection of a describe query with a plain projection of the
/// describe statement.
///
/// The result is a tuple-shaped tree with the columns `subject`, `predicate` and `object`, plus
/// `context` if named graphs should be included. The input is left untouched.
pub fn rewrite_describe(
    expr: &TupleExpr,
    with_named_graphs: bool,
) -> Result<TupleExpr, DescribeRewriteError> {
    let mut rewritten = expr.clone();
    let mut rewriter = DescribeRewriter {
        with_named_graphs,
        replaced: false,
    };
    rewriter.visit_tuple_expr(&mut rewritten)?;
    if !rewriter.replaced {
        tracing::debug!("No describe projection to rewrite");
        return Err(DescribeRewriteError::MissingDescribeProjection);
    }

    rewritten.transform_up(&mut clean);
    tracing::debug!(with_named_graphs, "Rewrote describe projection into a tuple projection");
    Ok(rewritten)
}

struct DescribeRewriter {
    with_named_graphs: bool,
    replaced: bool,
}

impl TupleExprVisitorMut for DescribeRewriter {
    type Error = DescribeRewriteError;

    fn visit_tuple_expr(&mut self, expr: &mut TupleExpr) -> Result<(), Self::Error> {
        if let TupleExpr::MultiProjection(MultiProjection { arg, projections }) = expr {
            let is_describe_projection = matches!(
                projections.as_slice(),
                [projection] if *projection == describe_projection(false)
                    || *projection == describe_projection(true)
            );
            if !is_describe_projection {
                let shown = projections
                    .iter()
                    .flatten()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(DescribeRewriteError::UnexpectedProjection(shown));
            }

            let arg = mem::take(arg);
            *expr = TupleExpr::projection(*arg, describe_projection(self.with_named_graphs));
            self.replaced = true;
        }
        walk_tuple_expr_mut(self, expr)
    }

    fn visit_statement_pattern(
        &mut self,
        pattern: &mut StatementPattern,
    ) -> Result<(), Self::Error> {
        if pattern.subject.name() != DESCRIBE_SUBJECT {
            return Ok(());
        }
        if self.with_named_graphs {
            if pattern.context.is_none() {
                pattern.context = Some(Var::new(DESCRIBE_CONTEXT));
            }
        } else {
            pattern.context = None;
        }
        Ok(())
    }
}

/// Drops empty extensions and joins with the singleton set.
fn clean(expr: TupleExpr) -> TupleExpr {
    match expr {
        TupleExpr::Extension(Extension { arg, elements }) if elements.is_empty() => *arg,
        TupleExpr::Join(Join { left, right }) if left.is_singleton_set() => *right,
        TupleExpr::Join(Join { left, right }) if right.is_singleton_set() => *left,
        expr => expr,
    }
}
