use crate::{QueryBuilderError, QueryBuilderResult};
use querykit_algebra::{Filter, StatementPattern, TupleExpr, ValueExpr};

/// Something that groups can be attached to.
pub trait SupportsGroups {
    /// Appends `group` as the last child.
    fn add_group(&mut self, group: Group);

    /// Removes the first child that equals `group`. Returns false if there is none.
    fn remove_group(&mut self, group: &Group) -> bool;
}

/// A group of graph patterns, i.e., the `{ ... }` of a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    optional: bool,
    kind: GroupKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// Patterns, nested groups and filters in declaration order.
    Basic(Vec<GroupElement>),
    /// The union of exactly two groups.
    Union { left: Box<Group>, right: Box<Group> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupElement {
    Pattern(StatementPattern),
    Group(Group),
    Filter(ValueExpr),
}

impl Group {
    pub fn new(optional: bool) -> Self {
        Self {
            optional,
            kind: GroupKind::Basic(Vec::new()),
        }
    }

    pub(crate) fn basic(optional: bool, elements: Vec<GroupElement>) -> Self {
        Self {
            optional,
            kind: GroupKind::Basic(elements),
        }
    }

    pub fn union(left: Group, right: Group, optional: bool) -> Self {
        Self {
            optional,
            kind: GroupKind::Union {
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn kind(&self) -> &GroupKind {
        &self.kind
    }

    /// Appends `element`. A union has no direct children.
    pub fn push(&mut self, element: GroupElement) -> QueryBuilderResult<()> {
        match &mut self.kind {
            GroupKind::Basic(elements) => {
                elements.push(element);
                Ok(())
            }
            GroupKind::Union { .. } => Err(QueryBuilderError::UnsupportedShape(
                "a union group only has its two branches as children".to_owned(),
            )),
        }
    }

    /// Compiles the group into a tuple expression.
    ///
    /// Children are folded in declaration order. Patterns and required groups are joined, an
    /// optional group is left-joined to everything before it. The filters of the group are
    /// combined with `&&` and applied once on top.
    pub fn expr(&self) -> TupleExpr {
        let elements = match &self.kind {
            GroupKind::Basic(elements) => elements,
            GroupKind::Union { left, right } => {
                return TupleExpr::union(left.expr(), right.expr());
            }
        };

        let mut result: Option<TupleExpr> = None;
        let mut filters = Vec::new();
        for element in elements {
            match element {
                GroupElement::Pattern(pattern) => {
                    let pattern = TupleExpr::StatementPattern(pattern.clone());
                    result = Some(match result {
                        Some(left) => TupleExpr::join(left, pattern),
                        None => pattern,
                    });
                }
                GroupElement::Group(group) => {
                    let (child, condition) = group.left_join_operand();
                    if child.is_singleton_set() && condition.is_none() {
                        continue;
                    }
                    result = Some(match result {
                        Some(left) if group.is_optional() => {
                            TupleExpr::left_join(left, child, condition)
                        }
                        Some(left) => TupleExpr::join(left, child),
                        // A leading optional group has nothing to be left-joined to.
                        None => apply_condition(child, condition),
                    });
                }
                GroupElement::Filter(filter) => filters.push(filter.clone()),
            }
        }

        let result = result.unwrap_or_default();
        match ValueExpr::conjunction(filters) {
            Some(condition) => TupleExpr::filter(result, condition),
            None => result,
        }
    }

    /// Compiles the group as the right side of a left join. For optional groups, a filter at
    /// the top is returned separately so that it can become the left join condition.
    pub(crate) fn left_join_operand(&self) -> (TupleExpr, Option<ValueExpr>) {
        let expr = self.expr();
        if !self.optional {
            return (expr, None);
        }
        match expr {
            TupleExpr::Filter(Filter { arg, condition }) => (*arg, Some(condition)),
            expr => (expr, None),
        }
    }
}

pub(crate) fn apply_condition(expr: TupleExpr, condition: Option<ValueExpr>) -> TupleExpr {
    match condition {
        Some(condition) => TupleExpr::filter(expr, condition),
        None => expr,
    }
}

impl Group {
    /// Appends `group` as a nested child. A union has no direct children.
    pub fn add_group(&mut self, group: Group) -> QueryBuilderResult<()> {
        self.push(GroupElement::Group(group))
    }

    /// Removes the first nested child that equals `group`. Returns false if there is none.
    pub fn remove_group(&mut self, group: &Group) -> bool {
        match &mut self.kind {
            GroupKind::Basic(elements) => remove_child_group(elements, group),
            GroupKind::Union { .. } => false,
        }
    }
}

pub(crate) fn remove_child_group(elements: &mut Vec<GroupElement>, group: &Group) -> bool {
    let position = elements
        .iter()
        .position(|element| matches!(element, GroupElement::Group(g) if g == group));
    match position {
        Some(position) => {
            elements.remove(position);
            true
        }
        None => false,
    }
}
