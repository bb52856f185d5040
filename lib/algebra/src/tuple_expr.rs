use crate::{ValueExpr, Var};
use std::mem;

/// A node of the compiled query tree.
///
/// The enum is closed. Every visitor in this crate handles each node kind explicitly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TupleExpr {
    StatementPattern(StatementPattern),
    Join(Join),
    LeftJoin(LeftJoin),
    Union(Union),
    Filter(Filter),
    Extension(Extension),
    Projection(Projection),
    MultiProjection(MultiProjection),
    Distinct(Box<TupleExpr>),
    Reduced(Box<TupleExpr>),
    Order(Order),
    Slice(Slice),
    /// Produces a single, empty solution. This is the neutral element of joins.
    #[default]
    SingletonSet,
}

/// A (subject, predicate, object) pattern with an optional named graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatementPattern {
    pub subject: Var,
    pub predicate: Var,
    pub object: Var,
    pub context: Option<Var>,
}

impl StatementPattern {
    pub fn new(subject: Var, predicate: Var, object: Var) -> Self {
        Self {
            subject,
            predicate,
            object,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Var) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns the vars of this pattern in subject, predicate, object, context order.
    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .chain(self.context.as_ref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Join {
    pub left: Box<TupleExpr>,
    pub right: Box<TupleExpr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LeftJoin {
    pub left: Box<TupleExpr>,
    pub right: Box<TupleExpr>,
    pub condition: Option<ValueExpr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Union {
    pub left: Box<TupleExpr>,
    pub right: Box<TupleExpr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Filter {
    pub arg: Box<TupleExpr>,
    pub condition: ValueExpr,
}

/// Binds the result of an expression to a new var.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtensionElem {
    pub name: String,
    pub expr: ValueExpr,
}

impl ExtensionElem {
    pub fn new(name: impl Into<String>, expr: ValueExpr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extension {
    pub arg: Box<TupleExpr>,
    pub elements: Vec<ExtensionElem>,
}

/// Projects the var `source` and makes it available as `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectionElem {
    pub source: String,
    pub target: String,
}

impl ProjectionElem {
    /// Creates an element that keeps the name of the var.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            target: name.clone(),
            source: name,
        }
    }

    pub fn renamed(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn is_renaming(&self) -> bool {
        self.source != self.target
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Projection {
    pub arg: Box<TupleExpr>,
    pub elements: Vec<ProjectionElem>,
}

/// Produces one output solution per projection and input solution. Used for graph-shaped
/// results, where each projection describes one statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultiProjection {
    pub arg: Box<TupleExpr>,
    pub projections: Vec<Vec<ProjectionElem>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderElem {
    pub expr: ValueExpr,
    pub ascending: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Order {
    pub arg: Box<TupleExpr>,
    pub elements: Vec<OrderElem>,
}

/// Restricts the number of solutions. A [None] limit or offset means "not set".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    pub arg: Box<TupleExpr>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl TupleExpr {
    pub fn statement_pattern(subject: Var, predicate: Var, object: Var) -> Self {
        TupleExpr::StatementPattern(StatementPattern::new(subject, predicate, object))
    }

    pub fn join(left: TupleExpr, right: TupleExpr) -> Self {
        TupleExpr::Join(Join {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn left_join(left: TupleExpr, right: TupleExpr, condition: Option<ValueExpr>) -> Self {
        TupleExpr::LeftJoin(LeftJoin {
            left: Box::new(left),
            right: Box::new(right),
            condition,
        })
    }

    pub fn union(left: TupleExpr, right: TupleExpr) -> Self {
        TupleExpr::Union(Union {
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn filter(arg: TupleExpr, condition: ValueExpr) -> Self {
        TupleExpr::Filter(Filter {
            arg: Box::new(arg),
            condition,
        })
    }

    pub fn extension(arg: TupleExpr, elements: Vec<ExtensionElem>) -> Self {
        TupleExpr::Extension(Extension {
            arg: Box::new(arg),
            elements,
        })
    }

    pub fn projection(arg: TupleExpr, elements: Vec<ProjectionElem>) -> Self {
        TupleExpr::Projection(Projection {
            arg: Box::new(arg),
            elements,
        })
    }

    pub fn multi_projection(arg: TupleExpr, projections: Vec<Vec<ProjectionElem>>) -> Self {
        TupleExpr::MultiProjection(MultiProjection {
            arg: Box::new(arg),
            projections,
        })
    }

    pub fn distinct(arg: TupleExpr) -> Self {
        TupleExpr::Distinct(Box::new(arg))
    }

    pub fn reduced(arg: TupleExpr) -> Self {
        TupleExpr::Reduced(Box::new(arg))
    }

    pub fn order(arg: TupleExpr, elements: Vec<OrderElem>) -> Self {
        TupleExpr::Order(Order {
            arg: Box::new(arg),
            elements,
        })
    }

    pub fn slice(arg: TupleExpr, limit: Option<usize>, offset: Option<usize>) -> Self {
        TupleExpr::Slice(Slice {
            arg: Box::new(arg),
            limit,
            offset,
        })
    }

    /// Returns the direct children of this node from left to right.
    pub fn children(&self) -> Vec<&TupleExpr> {
        match self {
            TupleExpr::StatementPattern(_) | TupleExpr::SingletonSet => Vec::new(),
            TupleExpr::Join(Join { left, right })
            | TupleExpr::LeftJoin(LeftJoin { left, right, .. })
            | TupleExpr::Union(Union { left, right }) => vec![left.as_ref(), right.as_ref()],
            TupleExpr::Filter(Filter { arg, .. })
            | TupleExpr::Extension(Extension { arg, .. })
            | TupleExpr::Projection(Projection { arg, .. })
            | TupleExpr::MultiProjection(MultiProjection { arg, .. })
            | TupleExpr::Distinct(arg)
            | TupleExpr::Reduced(arg)
            | TupleExpr::Order(Order { arg, .. })
            | TupleExpr::Slice(Slice { arg, .. }) => vec![arg.as_ref()],
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut TupleExpr> {
        match self {
            TupleExpr::StatementPattern(_) | TupleExpr::SingletonSet => Vec::new(),
            TupleExpr::Join(Join { left, right })
            | TupleExpr::LeftJoin(LeftJoin { left, right, .. })
            | TupleExpr::Union(Union { left, right }) => vec![left.as_mut(), right.as_mut()],
            TupleExpr::Filter(Filter { arg, .. })
            | TupleExpr::Extension(Extension { arg, .. })
            | TupleExpr::Projection(Projection { arg, .. })
            | TupleExpr::MultiProjection(MultiProjection { arg, .. })
            | TupleExpr::Distinct(arg)
            | TupleExpr::Reduced(arg)
            | TupleExpr::Order(Order { arg, .. })
            | TupleExpr::Slice(Slice { arg, .. }) => vec![arg.as_mut()],
        }
    }

    /// Rewrites the tree bottom-up. `f` receives every node after its children have been
    /// rewritten and returns the replacement for that node.
    pub fn transform_up(&mut self, f: &mut impl FnMut(TupleExpr) -> TupleExpr) {
        for child in self.children_mut() {
            child.transform_up(f);
        }
        let node = mem::take(self);
        *self = f(node);
    }

    pub fn is_singleton_set(&self) -> bool {
        matches!(self, TupleExpr::SingletonSet)
    }
}
