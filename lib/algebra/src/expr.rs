use crate::Var;
use querykit_model::Term;
use std::fmt;

/// The comparison operators supported in filter conditions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value expression, used as filter condition, left-join condition, extension value and
/// ordering key.
///
/// The tree mirrors the order in which it was built. No normalization takes place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueExpr {
    /// A reference to a var.
    Var(Var),
    /// A constant term.
    Constant(Term),
    /// A binary comparison.
    Compare {
        op: CompareOp,
        left: Box<ValueExpr>,
        right: Box<ValueExpr>,
    },
    And(Box<ValueExpr>, Box<ValueExpr>),
    Or(Box<ValueExpr>, Box<ValueExpr>),
    Not(Box<ValueExpr>),
    /// Whether the var is bound in the current solution.
    Bound(Var),
}

impl ValueExpr {
    /// Creates a reference to the var `name`.
    pub fn var(name: impl Into<String>) -> Self {
        ValueExpr::Var(Var::new(name))
    }

    pub fn constant(value: impl Into<Term>) -> Self {
        ValueExpr::Constant(value.into())
    }

    pub fn compare(op: CompareOp, left: ValueExpr, right: ValueExpr) -> Self {
        ValueExpr::Compare {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn and(self, other: ValueExpr) -> Self {
        ValueExpr::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: ValueExpr) -> Self {
        ValueExpr::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn not(self) -> Self {
        ValueExpr::Not(Box::new(self))
    }

    pub fn bound(name: impl Into<String>) -> Self {
        ValueExpr::Bound(Var::new(name))
    }

    /// Combines `conditions` with `&&`, associating to the left.
    ///
    /// Returns [None] if `conditions` is empty.
    pub fn conjunction(conditions: impl IntoIterator<Item = ValueExpr>) -> Option<Self> {
        conditions.into_iter().reduce(ValueExpr::and)
    }

    /// Combines `conditions` with `||`, associating to the left.
    pub fn disjunction(conditions: impl IntoIterator<Item = ValueExpr>) -> Option<Self> {
        conditions.into_iter().reduce(ValueExpr::or)
    }
}

impl fmt::Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::Var(var) => write!(f, "{var}"),
            ValueExpr::Constant(value) => write!(f, "{value}"),
            ValueExpr::Compare { op, left, right } => write!(f, "{left} {op} {right}"),
            ValueExpr::And(left, right) => write!(f, "({left} && {right})"),
            ValueExpr::Or(left, right) => write!(f, "({left} || {right})"),
            ValueExpr::Not(inner) => write!(f, "!{inner}"),
            ValueExpr::Bound(var) => write!(f, "bound({var})"),
        }
    }
}
