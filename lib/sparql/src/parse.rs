use crate::{ParseOptions, SparqlError, SparqlResult};
use querykit_algebra::describe::{describe_scaffold, DescribedResource};
use querykit_algebra::{
    CompareOp, ExtensionElem, OrderElem, ParsedQuery, ProjectionElem, QueryForm,
    StatementPattern, TupleExpr, ValueExpr, Var, VarNameCollector,
};
use querykit_model::{Iri, Term};
use spargebra::algebra::{Expression, GraphPattern, OrderExpression};
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};
use spargebra::Query;

/// Parses a SPARQL query into a query tree.
pub fn parse(query: &str, options: &ParseOptions) -> SparqlResult<ParsedQuery> {
    // The parser reports an invalid base IRI as a syntax error.
    if let Some(base_iri) = &options.base_iri {
        Iri::parse(base_iri.as_str())?;
    }
    let query = Query::parse(query, options.base_iri.as_deref())?;
    tracing::debug!("Parsed query: {query}");

    let (form, tuple_expr, dataset, base_iri) = match query {
        Query::Select {
            dataset,
            pattern,
            base_iri,
        } => (QueryForm::Select, lower(&pattern, None)?, dataset, base_iri),
        Query::Construct {
            template,
            dataset,
            pattern,
            base_iri,
        } => (
            QueryForm::Construct,
            lower_construct(&template, &pattern)?,
            dataset,
            base_iri,
        ),
        Query::Describe {
            dataset,
            pattern,
            base_iri,
        } => (
            QueryForm::Describe,
            lower_describe(&pattern, options.describe_named_graphs)?,
            dataset,
            base_iri,
        ),
        Query::Ask {
            dataset,
            pattern,
            base_iri,
        } => (QueryForm::Ask, lower(&pattern, None)?, dataset, base_iri),
    };

    Ok(ParsedQuery::new(form, tuple_expr)
        .with_dataset(dataset)
        .with_base_iri(base_iri.map(Iri::into_inner)))
}

/// Splits off a top-level slice so that it can be placed on top of the projection.
fn split_slice(pattern: &GraphPattern) -> (&GraphPattern, Option<(usize, Option<usize>)>) {
    match pattern {
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => (inner.as_ref(), Some((*start, *length))),
        pattern => (pattern, None),
    }
}

fn apply_slice(expr: TupleExpr, slice: Option<(usize, Option<usize>)>) -> TupleExpr {
    match slice {
        Some((start, length)) if start > 0 || length.is_some() => {
            TupleExpr::slice(expr, length, (start > 0).then_some(start))
        }
        _ => expr,
    }
}

fn lower_construct(template: &[TriplePattern], pattern: &GraphPattern) -> SparqlResult<TupleExpr> {
    let (pattern, slice) = split_slice(pattern);
    let inner = lower(pattern, None)?;

    let mut constants: Vec<ExtensionElem> = Vec::new();
    let mut projections = Vec::with_capacity(template.len());
    for triple in template {
        let subject = lower_term_pattern(&triple.subject)?;
        let predicate = lower_named_node_pattern(&triple.predicate);
        let object = lower_term_pattern(&triple.object)?;

        for var in [&subject, &predicate, &object] {
            if let Some(value) = var.value() {
                if !constants.iter().any(|elem| elem.name == var.name()) {
                    constants.push(ExtensionElem::new(
                        var.name(),
                        ValueExpr::Constant(value.clone()),
                    ));
                }
            }
        }
        projections.push(vec![
            ProjectionElem::renamed(subject.name(), "subject"),
            ProjectionElem::renamed(predicate.name(), "predicate"),
            ProjectionElem::renamed(object.name(), "object"),
        ]);
    }

    let inner = if constants.is_empty() {
        inner
    } else {
        TupleExpr::extension(inner, constants)
    };
    Ok(apply_slice(
        TupleExpr::multi_projection(inner, projections),
        slice,
    ))
}

fn lower_describe(pattern: &GraphPattern, with_named_graphs: bool) -> SparqlResult<TupleExpr> {
    let (pattern, slice) = split_slice(pattern);

    let (resources, inner) = match pattern {
        GraphPattern::Project { inner, variables } => {
            // Described IRIs are bound to fresh variables right below the projection.
            let mut constants = Vec::new();
            let mut inner = inner.as_ref();
            while let GraphPattern::Extend {
                inner: extended,
                variable,
                expression: Expression::NamedNode(node),
            } = inner
            {
                if !variables.contains(variable) {
                    break;
                }
                constants.push((variable, node));
                inner = extended.as_ref();
            }

            let resources = variables
                .iter()
                .map(|variable| {
                    match constants.iter().find(|(constant, _)| *constant == variable) {
                        Some((_, node)) => DescribedResource::Constant(Term::from((*node).clone())),
                        None => DescribedResource::Var(variable.as_str().to_owned()),
                    }
                })
                .collect::<Vec<_>>();
            (resources, lower(inner, None)?)
        }
        pattern => {
            let inner = lower(pattern, None)?;
            let resources = VarNameCollector::collect(&inner)
                .into_iter()
                .map(DescribedResource::Var)
                .collect();
            (resources, inner)
        }
    };

    Ok(apply_slice(
        describe_scaffold(inner, &resources, with_named_graphs),
        slice,
    ))
}

/// Lowers a graph pattern. `context` is the graph name of an enclosing `GRAPH` block.
fn lower(pattern: &GraphPattern, context: Option<&Var>) -> SparqlResult<TupleExpr> {
    Ok(match pattern {
        GraphPattern::Bgp { patterns } => {
            let mut result: Option<TupleExpr> = None;
            for triple in patterns {
                let pattern = lower_triple_pattern(triple, context)?;
                result = Some(match result {
                    Some(left) => TupleExpr::join(left, pattern),
                    None => pattern,
                });
            }
            result.unwrap_or_default()
        }
        GraphPattern::Join { left, right } => {
            TupleExpr::join(lower(left, context)?, lower(right, context)?)
        }
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => TupleExpr::left_join(
            lower(left, context)?,
            lower(right, context)?,
            expression.as_ref().map(lower_expression).transpose()?,
        ),
        GraphPattern::Union { left, right } => {
            TupleExpr::union(lower(left, context)?, lower(right, context)?)
        }
        GraphPattern::Filter { expr, inner } => {
            TupleExpr::filter(lower(inner, context)?, lower_expression(expr)?)
        }
        GraphPattern::Graph { name, inner } => {
            let context = lower_named_node_pattern(name);
            lower(inner, Some(&context))?
        }
        GraphPattern::Extend { .. } => {
            // Consecutive binds end up in a single extension.
            let mut elements = Vec::new();
            let mut current = pattern;
            while let GraphPattern::Extend {
                inner,
                variable,
                expression,
            } = current
            {
                elements.push(ExtensionElem::new(
                    variable.as_str(),
                    lower_expression(expression)?,
                ));
                current = inner.as_ref();
            }
            elements.reverse();
            TupleExpr::extension(lower(current, context)?, elements)
        }
        GraphPattern::OrderBy { inner, expression } => TupleExpr::order(
            lower(inner, context)?,
            expression
                .iter()
                .map(lower_order_expression)
                .collect::<SparqlResult<Vec<_>>>()?,
        ),
        GraphPattern::Project { inner, variables } => TupleExpr::projection(
            lower(inner, context)?,
            variables
                .iter()
                .map(|variable| ProjectionElem::new(variable.as_str()))
                .collect(),
        ),
        GraphPattern::Distinct { inner } => TupleExpr::distinct(lower(inner, context)?),
        GraphPattern::Reduced { inner } => TupleExpr::reduced(lower(inner, context)?),
        GraphPattern::Slice {
            inner,
            start,
            length,
        } => apply_slice(lower(inner, context)?, Some((*start, *length))),
        pattern => {
            return SparqlError::unsupported(format!("graph pattern {pattern}"));
        }
    })
}

fn lower_triple_pattern(triple: &TriplePattern, context: Option<&Var>) -> SparqlResult<TupleExpr> {
    let mut pattern = StatementPattern::new(
        lower_term_pattern(&triple.subject)?,
        lower_named_node_pattern(&triple.predicate),
        lower_term_pattern(&triple.object)?,
    );
    if let Some(context) = context {
        pattern = pattern.with_context(context.clone());
    }
    Ok(TupleExpr::StatementPattern(pattern))
}

fn lower_term_pattern(term: &TermPattern) -> SparqlResult<Var> {
    // Matched one variant at a time, triple terms only exist with spargebra's rdf-star feature.
    if let TermPattern::Variable(variable) = term {
        return Ok(Var::new(variable.as_str()));
    }
    if let TermPattern::BlankNode(node) = term {
        return Ok(Var::blank(node.as_str()));
    }
    if let TermPattern::NamedNode(node) = term {
        return Ok(Var::constant(node.clone()));
    }
    if let TermPattern::Literal(literal) = term {
        return Ok(Var::constant(literal.clone()));
    }
    SparqlError::unsupported(format!("term {term}"))
}

fn lower_named_node_pattern(pattern: &NamedNodePattern) -> Var {
    match pattern {
        NamedNodePattern::Variable(variable) => Var::new(variable.as_str()),
        NamedNodePattern::NamedNode(node) => Var::constant(node.clone()),
    }
}

fn lower_order_expression(expression: &OrderExpression) -> SparqlResult<OrderElem> {
    Ok(match expression {
        OrderExpression::Asc(expr) => OrderElem {
            expr: lower_expression(expr)?,
            ascending: true,
        },
        OrderExpression::Desc(expr) => OrderElem {
            expr: lower_expression(expr)?,
            ascending: false,
        },
    })
}

fn lower_expression(expression: &Expression) -> SparqlResult<ValueExpr> {
    let compare = |op, left: &Expression, right: &Expression| {
        Ok::<_, SparqlError>(ValueExpr::compare(
            op,
            lower_expression(left)?,
            lower_expression(right)?,
        ))
    };

    match expression {
        Expression::Variable(variable) => Ok(ValueExpr::var(variable.as_str())),
        Expression::NamedNode(node) => Ok(ValueExpr::constant(node.clone())),
        Expression::Literal(literal) => Ok(ValueExpr::constant(literal.clone())),
        Expression::Equal(left, right) => compare(CompareOp::Eq, left, right),
        // `a != b` is parsed as `!(a = b)`.
        Expression::Not(inner) => match inner.as_ref() {
            Expression::Equal(left, right) => compare(CompareOp::Ne, left, right),
            inner => Ok(lower_expression(inner)?.not()),
        },
        Expression::Less(left, right) => compare(CompareOp::Lt, left, right),
        Expression::LessOrEqual(left, right) => compare(CompareOp::Le, left, right),
        Expression::Greater(left, right) => compare(CompareOp::Gt, left, right),
        Expression::GreaterOrEqual(left, right) => compare(CompareOp::Ge, left, right),
        Expression::And(left, right) => {
            Ok(lower_expression(left)?.and(lower_expression(right)?))
        }
        Expression::Or(left, right) => Ok(lower_expression(left)?.or(lower_expression(right)?)),
        Expression::Bound(variable) => Ok(ValueExpr::bound(variable.as_str())),
        expression => SparqlError::unsupported(format!("expression {expression}")),
    }
}
