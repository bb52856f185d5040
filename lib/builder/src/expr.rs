//! Factory functions for [ValueExpr] trees.
//!
//! Operands are either var names (`&str` and [String]) or constants (any term). The
//! expressions mirror the calls exactly. Nothing is simplified and vars are not checked
//! against the patterns of the query.

use querykit_algebra::{CompareOp, ValueExpr, Var};
use querykit_model::{BlankNode, Literal, NamedNode, NamedNodeRef, Term};

/// A var name or a constant term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Var(String),
    Constant(Term),
}

impl Operand {
    /// Turns the operand into a pattern slot. Constants become bound vars.
    pub fn into_var(self) -> Var {
        match self {
            Operand::Var(name) => Var::new(name),
            Operand::Constant(value) => Var::constant(value),
        }
    }

    pub fn into_value_expr(self) -> ValueExpr {
        match self {
            Operand::Var(name) => ValueExpr::Var(Var::new(name)),
            Operand::Constant(value) => ValueExpr::Constant(value),
        }
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Operand::Var(name.to_owned())
    }
}

impl From<String> for Operand {
    fn from(name: String) -> Self {
        Operand::Var(name)
    }
}

impl From<Term> for Operand {
    fn from(value: Term) -> Self {
        Operand::Constant(value)
    }
}

impl From<NamedNode> for Operand {
    fn from(value: NamedNode) -> Self {
        Operand::Constant(value.into())
    }
}

impl From<NamedNodeRef<'_>> for Operand {
    fn from(value: NamedNodeRef<'_>) -> Self {
        Operand::Constant(value.into_owned().into())
    }
}

impl From<BlankNode> for Operand {
    fn from(value: BlankNode) -> Self {
        Operand::Constant(value.into())
    }
}

impl From<Literal> for Operand {
    fn from(value: Literal) -> Self {
        Operand::Constant(value.into())
    }
}

/// Creates `left op right`.
pub fn compare(left: impl Into<Operand>, op: CompareOp, right: impl Into<Operand>) -> ValueExpr {
    ValueExpr::compare(
        op,
        left.into().into_value_expr(),
        right.into().into_value_expr(),
    )
}

pub fn eq(left: impl Into<Operand>, right: impl Into<Operand>) -> ValueExpr {
    compare(left, CompareOp::Eq, right)
}

pub fn ne(left: impl Into<Operand>, right: impl Into<Operand>) -> ValueExpr {
    compare(left, CompareOp::Ne, right)
}

pub fn lt(left: impl Into<Operand>, right: impl Into<Operand>) -> ValueExpr {
    compare(left, CompareOp::Lt, right)
}

pub fn le(left: impl Into<Operand>, right: impl Into<Operand>) -> ValueExpr {
    compare(left, CompareOp::Le, right)
}

pub fn gt(left: impl Into<Operand>, right: impl Into<Operand>) -> ValueExpr {
    compare(left, CompareOp::Gt, right)
}

pub fn ge(left: impl Into<Operand>, right: impl Into<Operand>) -> ValueExpr {
    compare(left, CompareOp::Ge, right)
}

pub fn and(left: ValueExpr, right: ValueExpr) -> ValueExpr {
    left.and(right)
}

pub fn or(left: ValueExpr, right: ValueExpr) -> ValueExpr {
    left.or(right)
}

pub fn not(expr: ValueExpr) -> ValueExpr {
    expr.not()
}

/// Creates `bound(?var)`.
pub fn bound(var: &str) -> ValueExpr {
    ValueExpr::bound(var)
}
