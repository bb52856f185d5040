use crate::expr::{self, Operand};
use crate::group::remove_child_group;
use crate::{Group, GroupElement, QueryBuilderError, QueryBuilderResult, SupportsGroups};
use querykit_algebra::{CompareOp, StatementPattern, ValueExpr};
use std::fmt;

/// Builds a [Group] and hands it to its parent once [GroupBuilder::close_group] is called.
///
/// The builder owns its parent, so that closing a group gives control back to the enclosing
/// builder.
#[must_use]
#[derive(Debug)]
pub struct GroupBuilder<P: SupportsGroups> {
    parent: P,
    optional: bool,
    elements: Vec<GroupElement>,
}

impl<P: SupportsGroups> GroupBuilder<P> {
    pub(crate) fn new(parent: P, optional: bool) -> Self {
        Self {
            parent,
            optional,
            elements: Vec::new(),
        }
    }

    /// Adds the statement pattern `(subject predicate object)`.
    ///
    /// Terms become vars that are bound to the term.
    pub fn pattern(
        mut self,
        subject: impl Into<Operand>,
        predicate: impl Into<Operand>,
        object: impl Into<Operand>,
    ) -> Self {
        let pattern = StatementPattern::new(
            subject.into().into_var(),
            predicate.into().into_var(),
            object.into().into_var(),
        );
        self.elements.push(GroupElement::Pattern(pattern));
        self
    }

    /// Opens a nested group.
    pub fn group(self) -> GroupBuilder<Self> {
        GroupBuilder::new(self, false)
    }

    /// Opens a nested optional group.
    pub fn optional(self) -> GroupBuilder<Self> {
        GroupBuilder::new(self, true)
    }

    /// Opens a union of two groups.
    pub fn union(self) -> UnionBuilder<Self> {
        UnionBuilder::new(self, false)
    }

    /// Starts a filter. The methods of the returned builder add the filter and return this
    /// builder.
    pub fn filter(self) -> FilterBuilder<P> {
        FilterBuilder { group: self }
    }

    /// Adds the filter `var op operand`.
    pub fn filter_on(self, var: &str, op: CompareOp, operand: impl Into<Operand>) -> Self {
        self.filter_expr(expr::compare(var, op, operand))
    }

    /// Adds an arbitrary filter.
    pub fn filter_expr(mut self, condition: ValueExpr) -> Self {
        self.elements.push(GroupElement::Filter(condition));
        self
    }

    /// Appends the group to the parent and returns the parent.
    pub fn close_group(mut self) -> P {
        self.parent.add_group(Group::basic(self.optional, self.elements));
        self.parent
    }
}

impl<P: SupportsGroups> SupportsGroups for GroupBuilder<P> {
    fn add_group(&mut self, group: Group) {
        self.elements.push(GroupElement::Group(group));
    }

    fn remove_group(&mut self, group: &Group) -> bool {
        remove_child_group(&mut self.elements, group)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    Left,
    Right,
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Left => f.write_str("left"),
            Branch::Right => f.write_str("right"),
        }
    }
}

/// Builds a union of two groups.
#[must_use]
#[derive(Debug)]
pub struct UnionBuilder<P: SupportsGroups> {
    parent: P,
    optional: bool,
    branch: Branch,
    left: Option<Group>,
    right: Option<Group>,
    rebuilt: Option<Branch>,
}

impl<P: SupportsGroups> UnionBuilder<P> {
    pub(crate) fn new(parent: P, optional: bool) -> Self {
        Self {
            parent,
            optional,
            branch: Branch::Left,
            left: None,
            right: None,
            rebuilt: None,
        }
    }

    /// Opens the left branch. Closing it returns to this builder.
    pub fn left(mut self) -> GroupBuilder<Self> {
        self.branch = Branch::Left;
        GroupBuilder::new(self, false)
    }

    /// Opens the right branch. Closing it returns to this builder.
    pub fn right(mut self) -> GroupBuilder<Self> {
        self.branch = Branch::Right;
        GroupBuilder::new(self, false)
    }

    /// Appends the union to the parent and returns the parent.
    ///
    /// Fails if one of the branches has not been built, or if a branch has been built twice.
    pub fn close_union(mut self) -> QueryBuilderResult<P> {
        if let Some(branch) = self.rebuilt {
            return Err(QueryBuilderError::UnsupportedShape(format!(
                "the {branch} branch of a union is built more than once"
            )));
        }
        let (Some(left), Some(right)) = (self.left, self.right) else {
            return Err(QueryBuilderError::UnsupportedShape(
                "a union requires a left and a right branch".to_owned(),
            ));
        };
        self.parent.add_group(Group::union(left, right, self.optional));
        Ok(self.parent)
    }
}

impl<P: SupportsGroups> SupportsGroups for UnionBuilder<P> {
    fn add_group(&mut self, group: Group) {
        let slot = match self.branch {
            Branch::Left => &mut self.left,
            Branch::Right => &mut self.right,
        };
        if slot.is_some() {
            self.rebuilt = Some(self.branch);
        } else {
            *slot = Some(group);
        }
    }

    fn remove_group(&mut self, group: &Group) -> bool {
        if self.left.as_ref() == Some(group) {
            self.left = None;
            true
        } else if self.right.as_ref() == Some(group) {
            self.right = None;
            true
        } else {
            false
        }
    }
}

/// Adds a single filter to a [GroupBuilder].
#[must_use]
#[derive(Debug)]
pub struct FilterBuilder<P: SupportsGroups> {
    group: GroupBuilder<P>,
}

impl<P: SupportsGroups> FilterBuilder<P> {
    pub fn eq(self, left: impl Into<Operand>, right: impl Into<Operand>) -> GroupBuilder<P> {
        self.expr(expr::eq(left, right))
    }

    pub fn ne(self, left: impl Into<Operand>, right: impl Into<Operand>) -> GroupBuilder<P> {
        self.expr(expr::ne(left, right))
    }

    pub fn lt(self, left: impl Into<Operand>, right: impl Into<Operand>) -> GroupBuilder<P> {
        self.expr(expr::lt(left, right))
    }

    pub fn le(self, left: impl Into<Operand>, right: impl Into<Operand>) -> GroupBuilder<P> {
        self.expr(expr::le(left, right))
    }

    pub fn gt(self, left: impl Into<Operand>, right: impl Into<Operand>) -> GroupBuilder<P> {
        self.expr(expr::gt(left, right))
    }

    pub fn ge(self, left: impl Into<Operand>, right: impl Into<Operand>) -> GroupBuilder<P> {
        self.expr(expr::ge(left, right))
    }

    pub fn and(self, left: ValueExpr, right: ValueExpr) -> GroupBuilder<P> {
        self.expr(expr::and(left, right))
    }

    pub fn or(self, left: ValueExpr, right: ValueExpr) -> GroupBuilder<P> {
        self.expr(expr::or(left, right))
    }

    pub fn not(self, inner: ValueExpr) -> GroupBuilder<P> {
        self.expr(expr::not(inner))
    }

    pub fn bound(self, var: &str) -> GroupBuilder<P> {
        self.expr(expr::bound(var))
    }

    pub fn expr(self, condition: ValueExpr) -> GroupBuilder<P> {
        self.group.filter_expr(condition)
    }
}
