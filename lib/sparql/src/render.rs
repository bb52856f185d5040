use crate::{SparqlError, SparqlResult};
use querykit_algebra::describe::{
    match_describe_scaffold, DescribeConstantNames, DescribedResource,
};
use querykit_algebra::{
    CompareOp, Extension, ExtensionElem, Filter, Join, LeftJoin, MultiProjection, Order,
    ParsedQuery, Projection, ProjectionElem, QueryForm, Slice, StatementPattern, TupleExpr,
    Union, ValueExpr, Var, ANONYMOUS_VAR_PREFIX, CONSTANT_VAR_PREFIX,
};
use querykit_model::{BlankNode, Iri, Term, Variable};
use spargebra::algebra::{Expression, GraphPattern, OrderExpression};
use spargebra::term::{NamedNodePattern, TermPattern, TriplePattern};
use spargebra::Query;

/// Renders a query tree as a SPARQL query string.
///
/// The tree is translated into spargebra's algebra, whose serializer produces the string.
/// Parsing the result yields the same tree for the shapes produced by [parse](crate::parse).
pub fn render(query: &ParsedQuery) -> SparqlResult<String> {
    let base_iri = query
        .base_iri()
        .map(|iri| Iri::parse(iri.to_owned()))
        .transpose()?;
    let dataset = query.dataset().cloned();
    let tuple_expr = query.tuple_expr();

    let query = match query.form() {
        QueryForm::Select => Query::Select {
            dataset,
            pattern: raise(tuple_expr)?,
            base_iri,
        },
        QueryForm::Ask => Query::Ask {
            dataset,
            pattern: raise(tuple_expr)?,
            base_iri,
        },
        QueryForm::Construct => {
            let (template, pattern) = raise_construct(tuple_expr)?;
            Query::Construct {
                template,
                dataset,
                pattern,
                base_iri,
            }
        }
        QueryForm::Describe => match raise_describe(tuple_expr)? {
            Some(pattern) => Query::Describe {
                dataset,
                pattern,
                base_iri,
            },
            None => {
                // A simplified describe query only projects tuples.
                tracing::debug!("Rendering simplified describe query as select query");
                Query::Select {
                    dataset,
                    pattern: raise(tuple_expr)?,
                    base_iri,
                }
            }
        },
    };

    let rendered = query.to_string();
    tracing::debug!("Rendered query: {rendered}");
    Ok(rendered)
}

/// Splits off a slice on top of a statement projection.
fn split_slice(expr: &TupleExpr) -> (&TupleExpr, Option<&Slice>) {
    match expr {
        TupleExpr::Slice(slice) => (slice.arg.as_ref(), Some(slice)),
        expr => (expr, None),
    }
}

fn apply_slice(pattern: GraphPattern, slice: Option<&Slice>) -> GraphPattern {
    match slice {
        Some(slice) => GraphPattern::Slice {
            inner: Box::new(pattern),
            start: slice.offset.unwrap_or(0),
            length: slice.limit,
        },
        None => pattern,
    }
}

fn raise_construct(expr: &TupleExpr) -> SparqlResult<(Vec<TriplePattern>, GraphPattern)> {
    let (expr, slice) = split_slice(expr);
    let TupleExpr::MultiProjection(MultiProjection { arg, projections }) = expr else {
        return SparqlError::unsupported("a graph query requires a statement projection");
    };

    let no_constants: &[ExtensionElem] = &[];
    let (constants, pattern) = match arg.as_ref() {
        TupleExpr::Extension(Extension { arg, elements })
            if elements.iter().all(|elem| {
                elem.name.starts_with(CONSTANT_VAR_PREFIX)
                    && matches!(elem.expr, ValueExpr::Constant(_))
            }) =>
        {
            (elements.as_slice(), arg.as_ref())
        }
        pattern => (no_constants, pattern),
    };

    let template = projections
        .iter()
        .map(|projection| {
            Ok(TriplePattern {
                subject: template_term(projection, "subject", constants)?,
                predicate: template_named_node(projection, "predicate", constants)?,
                object: template_term(projection, "object", constants)?,
            })
        })
        .collect::<SparqlResult<Vec<_>>>()?;

    Ok((template, apply_slice(raise(pattern)?, slice)))
}

fn template_source<'a>(projection: &'a [ProjectionElem], target: &str) -> SparqlResult<&'a str> {
    match projection.iter().find(|elem| elem.target == target) {
        Some(elem) => Ok(&elem.source),
        None => SparqlError::unsupported(format!("statement projection without {target}")),
    }
}

fn template_constant<'a>(source: &str, constants: &'a [ExtensionElem]) -> Option<&'a Term> {
    constants
        .iter()
        .find(|elem| elem.name == source)
        .and_then(|elem| match &elem.expr {
            ValueExpr::Constant(value) => Some(value),
            _ => None,
        })
}

fn template_term(
    projection: &[ProjectionElem],
    target: &str,
    constants: &[ExtensionElem],
) -> SparqlResult<TermPattern> {
    let source = template_source(projection, target)?;
    match template_constant(source, constants) {
        Some(value) => raise_term(value),
        None => match source.strip_prefix(ANONYMOUS_VAR_PREFIX) {
            Some(id) => Ok(BlankNode::new_unchecked(id).into()),
            None => Ok(raise_variable(source)?.into()),
        },
    }
}

fn template_named_node(
    projection: &[ProjectionElem],
    target: &str,
    constants: &[ExtensionElem],
) -> SparqlResult<NamedNodePattern> {
    let source = template_source(projection, target)?;
    match template_constant(source, constants) {
        Some(Term::NamedNode(node)) => Ok(node.clone().into()),
        Some(value) => SparqlError::unsupported(format!("{value} as predicate")),
        None => Ok(raise_variable(source)?.into()),
    }
}

/// Returns [None] if the tree is not a describe scaffold anymore.
fn raise_describe(expr: &TupleExpr) -> SparqlResult<Option<GraphPattern>> {
    let (expr, slice) = split_slice(expr);
    let Some(scaffold) = match_describe_scaffold(expr) else {
        return Ok(None);
    };

    let mut constant_names = DescribeConstantNames::new(scaffold.pattern, &scaffold.resources);
    let mut pattern = raise(scaffold.pattern)?;
    let mut variables = Vec::with_capacity(scaffold.resources.len());
    for resource in &scaffold.resources {
        match resource {
            DescribedResource::Var(name) => variables.push(raise_variable(name)?),
            DescribedResource::Constant(value) => {
                let variable = raise_variable(&constant_names.fresh())?;
                pattern = GraphPattern::Extend {
                    inner: Box::new(pattern),
                    variable: variable.clone(),
                    expression: raise_constant(value)?,
                };
                variables.push(variable);
            }
        }
    }

    let pattern = GraphPattern::Project {
        inner: Box::new(pattern),
        variables,
    };
    Ok(Some(apply_slice(pattern, slice)))
}

fn raise(expr: &TupleExpr) -> SparqlResult<GraphPattern> {
    Ok(match expr {
        TupleExpr::StatementPattern(pattern) => raise_statement_pattern(pattern)?,
        TupleExpr::Join(Join { left, right }) => join(raise(left)?, raise(right)?),
        TupleExpr::LeftJoin(LeftJoin {
            left,
            right,
            condition,
        }) => GraphPattern::LeftJoin {
            left: Box::new(raise(left)?),
            right: Box::new(raise(right)?),
            expression: condition.as_ref().map(raise_expression).transpose()?,
        },
        TupleExpr::Union(Union { left, right }) => GraphPattern::Union {
            left: Box::new(raise(left)?),
            right: Box::new(raise(right)?),
        },
        TupleExpr::Filter(Filter { arg, condition }) => GraphPattern::Filter {
            expr: raise_expression(condition)?,
            inner: Box::new(raise(arg)?),
        },
        TupleExpr::Extension(Extension { arg, elements }) => {
            let mut pattern = raise(arg)?;
            for element in elements {
                pattern = GraphPattern::Extend {
                    inner: Box::new(pattern),
                    variable: raise_variable(&element.name)?,
                    expression: raise_expression(&element.expr)?,
                };
            }
            pattern
        }
        TupleExpr::Projection(Projection { arg, elements }) => {
            // Renamed vars are bound to their new name first.
            let mut inner = raise(arg)?;
            for element in elements.iter().filter(|element| element.is_renaming()) {
                inner = GraphPattern::Extend {
                    inner: Box::new(inner),
                    variable: raise_variable(&element.target)?,
                    expression: Expression::Variable(raise_variable(&element.source)?),
                };
            }
            GraphPattern::Project {
                inner: Box::new(inner),
                variables: elements
                    .iter()
                    .map(|element| raise_variable(&element.target))
                    .collect::<SparqlResult<Vec<_>>>()?,
            }
        }
        TupleExpr::MultiProjection(_) => {
            return SparqlError::unsupported(
                "statement projections are only supported at the root of graph queries",
            );
        }
        TupleExpr::Distinct(inner) => GraphPattern::Distinct {
            inner: Box::new(raise(inner)?),
        },
        TupleExpr::Reduced(inner) => GraphPattern::Reduced {
            inner: Box::new(raise(inner)?),
        },
        TupleExpr::Order(Order { arg, elements }) => GraphPattern::OrderBy {
            inner: Box::new(raise(arg)?),
            expression: elements
                .iter()
                .map(|element| {
                    let expr = raise_expression(&element.expr)?;
                    Ok(if element.ascending {
                        OrderExpression::Asc(expr)
                    } else {
                        OrderExpression::Desc(expr)
                    })
                })
                .collect::<SparqlResult<Vec<_>>>()?,
        },
        TupleExpr::Slice(slice) => apply_slice(raise(&slice.arg)?, Some(slice)),
        TupleExpr::SingletonSet => GraphPattern::Bgp {
            patterns: Vec::new(),
        },
    })
}

/// Joins two patterns. Basic graph patterns are merged, as the SPARQL parser does.
fn join(left: GraphPattern, right: GraphPattern) -> GraphPattern {
    match (left, right) {
        (GraphPattern::Bgp { patterns: left }, right) if left.is_empty() => right,
        (left, GraphPattern::Bgp { patterns: right }) if right.is_empty() => left,
        (GraphPattern::Bgp { patterns: mut left }, GraphPattern::Bgp { patterns: right }) => {
            left.extend(right);
            GraphPattern::Bgp { patterns: left }
        }
        (
            GraphPattern::Graph {
                name: left_name,
                inner: left_inner,
            },
            GraphPattern::Graph {
                name: right_name,
                inner: right_inner,
            },
        ) if left_name == right_name => GraphPattern::Graph {
            name: left_name,
            inner: Box::new(join(*left_inner, *right_inner)),
        },
        (left, right) => GraphPattern::Join {
            left: Box::new(left),
            right: Box::new(right),
        },
    }
}

fn raise_statement_pattern(pattern: &StatementPattern) -> SparqlResult<GraphPattern> {
    let triple = TriplePattern {
        subject: raise_term_pattern(&pattern.subject)?,
        predicate: raise_named_node_pattern(&pattern.predicate)?,
        object: raise_term_pattern(&pattern.object)?,
    };
    let bgp = GraphPattern::Bgp {
        patterns: vec![triple],
    };
    Ok(match &pattern.context {
        Some(context) => GraphPattern::Graph {
            name: raise_named_node_pattern(context)?,
            inner: Box::new(bgp),
        },
        None => bgp,
    })
}

fn raise_term_pattern(var: &Var) -> SparqlResult<TermPattern> {
    match var.value() {
        Some(value) => raise_term(value),
        None if var.is_anonymous() => {
            let id = var
                .name()
                .strip_prefix(ANONYMOUS_VAR_PREFIX)
                .unwrap_or(var.name());
            Ok(BlankNode::new_unchecked(id).into())
        }
        None => Ok(raise_variable(var.name())?.into()),
    }
}

fn raise_term(value: &Term) -> SparqlResult<TermPattern> {
    // Matched one variant at a time, triple terms only exist with oxrdf's rdf-star feature.
    if let Term::NamedNode(node) = value {
        return Ok(node.clone().into());
    }
    if let Term::BlankNode(node) = value {
        return Ok(node.clone().into());
    }
    if let Term::Literal(literal) = value {
        return Ok(literal.clone().into());
    }
    SparqlError::unsupported(format!("term {value}"))
}

fn raise_named_node_pattern(var: &Var) -> SparqlResult<NamedNodePattern> {
    match var.value() {
        Some(Term::NamedNode(node)) => Ok(node.clone().into()),
        Some(value) => SparqlError::unsupported(format!("{value} in predicate position")),
        None => Ok(raise_variable(var.name())?.into()),
    }
}

fn raise_variable(name: &str) -> SparqlResult<Variable> {
    Variable::new(name)
        .or_else(|_| SparqlError::unsupported(format!("{name} is not a valid variable name")))
}

fn raise_constant(value: &Term) -> SparqlResult<Expression> {
    match value {
        Term::NamedNode(node) => Ok(Expression::NamedNode(node.clone())),
        Term::Literal(literal) => Ok(Expression::Literal(literal.clone())),
        value => SparqlError::unsupported(format!("{value} in an expression")),
    }
}

fn raise_expression(expr: &ValueExpr) -> SparqlResult<Expression> {
    let binary = |left: &ValueExpr, right: &ValueExpr| {
        Ok::<_, SparqlError>((
            Box::new(raise_expression(left)?),
            Box::new(raise_expression(right)?),
        ))
    };

    Ok(match expr {
        ValueExpr::Var(var) => match var.value() {
            Some(value) => raise_constant(value)?,
            None => Expression::Variable(raise_variable(var.name())?),
        },
        ValueExpr::Constant(value) => raise_constant(value)?,
        ValueExpr::Compare { op, left, right } => {
            let (left, right) = binary(left, right)?;
            match op {
                CompareOp::Eq => Expression::Equal(left, right),
                CompareOp::Ne => Expression::Not(Box::new(Expression::Equal(left, right))),
                CompareOp::Lt => Expression::Less(left, right),
                CompareOp::Le => Expression::LessOrEqual(left, right),
                CompareOp::Gt => Expression::Greater(left, right),
                CompareOp::Ge => Expression::GreaterOrEqual(left, right),
            }
        }
        ValueExpr::And(left, right) => {
            let (left, right) = binary(left, right)?;
            Expression::And(left, right)
        }
        ValueExpr::Or(left, right) => {
            let (left, right) = binary(left, right)?;
            Expression::Or(left, right)
        }
        ValueExpr::Not(inner) => Expression::Not(Box::new(raise_expression(inner)?)),
        ValueExpr::Bound(var) => Expression::Bound(raise_variable(var.name())?),
    })
}
