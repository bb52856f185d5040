//! Visitors over [TupleExpr] trees.
//!
//! Each trait has one method per node kind. The default implementations descend into the
//! children through the `walk_*` functions, so implementors only override the node kinds they
//! are interested in and call the matching `walk_*` function to keep descending.

use crate::{
    Extension, ExtensionElem, Filter, Join, LeftJoin, MultiProjection, Order, Projection,
    ProjectionElem, Slice, StatementPattern, TupleExpr, Union, ValueExpr, Var,
};

/// Visits a tree without modifying it.
pub trait TupleExprVisitor {
    type Error;

    fn visit_tuple_expr(&mut self, expr: &TupleExpr) -> Result<(), Self::Error> {
        walk_tuple_expr(self, expr)
    }

    fn visit_statement_pattern(&mut self, pattern: &StatementPattern) -> Result<(), Self::Error> {
        walk_statement_pattern(self, pattern)
    }

    fn visit_join(&mut self, join: &Join) -> Result<(), Self::Error> {
        walk_join(self, join)
    }

    fn visit_left_join(&mut self, left_join: &LeftJoin) -> Result<(), Self::Error> {
        walk_left_join(self, left_join)
    }

    fn visit_union(&mut self, union: &Union) -> Result<(), Self::Error> {
        walk_union(self, union)
    }

    fn visit_filter(&mut self, filter: &Filter) -> Result<(), Self::Error> {
        walk_filter(self, filter)
    }

    fn visit_extension(&mut self, extension: &Extension) -> Result<(), Self::Error> {
        walk_extension(self, extension)
    }

    fn visit_projection(&mut self, projection: &Projection) -> Result<(), Self::Error> {
        walk_projection(self, projection)
    }

    fn visit_multi_projection(
        &mut self,
        projection: &MultiProjection,
    ) -> Result<(), Self::Error> {
        walk_multi_projection(self, projection)
    }

    fn visit_distinct(&mut self, inner: &TupleExpr) -> Result<(), Self::Error> {
        self.visit_tuple_expr(inner)
    }

    fn visit_reduced(&mut self, inner: &TupleExpr) -> Result<(), Self::Error> {
        self.visit_tuple_expr(inner)
    }

    fn visit_order(&mut self, order: &Order) -> Result<(), Self::Error> {
        walk_order(self, order)
    }

    fn visit_slice(&mut self, slice: &Slice) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&slice.arg)
    }

    fn visit_singleton_set(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_var(&mut self, _var: &Var) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_value_expr(&mut self, expr: &ValueExpr) -> Result<(), Self::Error> {
        walk_value_expr(self, expr)
    }

    fn visit_projection_elem(&mut self, _elem: &ProjectionElem) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_extension_elem(&mut self, elem: &ExtensionElem) -> Result<(), Self::Error> {
        self.visit_value_expr(&elem.expr)
    }
}

pub fn walk_tuple_expr<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    expr: &TupleExpr,
) -> Result<(), V::Error> {
    match expr {
        TupleExpr::StatementPattern(pattern) => visitor.visit_statement_pattern(pattern),
        TupleExpr::Join(join) => visitor.visit_join(join),
        TupleExpr::LeftJoin(left_join) => visitor.visit_left_join(left_join),
        TupleExpr::Union(union) => visitor.visit_union(union),
        TupleExpr::Filter(filter) => visitor.visit_filter(filter),
        TupleExpr::Extension(extension) => visitor.visit_extension(extension),
        TupleExpr::Projection(projection) => visitor.visit_projection(projection),
        TupleExpr::MultiProjection(projection) => visitor.visit_multi_projection(projection),
        TupleExpr::Distinct(inner) => visitor.visit_distinct(inner),
        TupleExpr::Reduced(inner) => visitor.visit_reduced(inner),
        TupleExpr::Order(order) => visitor.visit_order(order),
        TupleExpr::Slice(slice) => visitor.visit_slice(slice),
        TupleExpr::SingletonSet => visitor.visit_singleton_set(),
    }
}

pub fn walk_statement_pattern<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    pattern: &StatementPattern,
) -> Result<(), V::Error> {
    for var in pattern.vars() {
        visitor.visit_var(var)?;
    }
    Ok(())
}

pub fn walk_join<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    join: &Join,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&join.left)?;
    visitor.visit_tuple_expr(&join.right)
}

pub fn walk_left_join<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    left_join: &LeftJoin,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&left_join.left)?;
    visitor.visit_tuple_expr(&left_join.right)?;
    if let Some(condition) = &left_join.condition {
        visitor.visit_value_expr(condition)?;
    }
    Ok(())
}

pub fn walk_union<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    union: &Union,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&union.left)?;
    visitor.visit_tuple_expr(&union.right)
}

pub fn walk_filter<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    filter: &Filter,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&filter.arg)?;
    visitor.visit_value_expr(&filter.condition)
}

pub fn walk_extension<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    extension: &Extension,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&extension.arg)?;
    for elem in &extension.elements {
        visitor.visit_extension_elem(elem)?;
    }
    Ok(())
}

pub fn walk_projection<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    projection: &Projection,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&projection.arg)?;
    for elem in &projection.elements {
        visitor.visit_projection_elem(elem)?;
    }
    Ok(())
}

pub fn walk_multi_projection<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    projection: &MultiProjection,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&projection.arg)?;
    for elem in projection.projections.iter().flatten() {
        visitor.visit_projection_elem(elem)?;
    }
    Ok(())
}

pub fn walk_order<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    order: &Order,
) -> Result<(), V::Error> {
    visitor.visit_tuple_expr(&order.arg)?;
    for elem in &order.elements {
        visitor.visit_value_expr(&elem.expr)?;
    }
    Ok(())
}

pub fn walk_value_expr<V: TupleExprVisitor + ?Sized>(
    visitor: &mut V,
    expr: &ValueExpr,
) -> Result<(), V::Error> {
    match expr {
        ValueExpr::Var(var) | ValueExpr::Bound(var) => visitor.visit_var(var),
        ValueExpr::Constant(_) => Ok(()),
        ValueExpr::Compare { left, right, .. }
        | ValueExpr::And(left, right)
        | ValueExpr::Or(left, right) => {
            visitor.visit_value_expr(left)?;
            visitor.visit_value_expr(right)
        }
        ValueExpr::Not(inner) => visitor.visit_value_expr(inner),
    }
}

/// Visits a tree and may modify it in place.
///
/// Replacing whole nodes is done in [TupleExprVisitorMut::visit_tuple_expr]. The per-kind
/// methods only see the node's payload.
pub trait TupleExprVisitorMut {
    type Error;

    fn visit_tuple_expr(&mut self, expr: &mut TupleExpr) -> Result<(), Self::Error> {
        walk_tuple_expr_mut(self, expr)
    }

    fn visit_statement_pattern(
        &mut self,
        _pattern: &mut StatementPattern,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn visit_join(&mut self, join: &mut Join) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut join.left)?;
        self.visit_tuple_expr(&mut join.right)
    }

    fn visit_left_join(&mut self, left_join: &mut LeftJoin) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut left_join.left)?;
        self.visit_tuple_expr(&mut left_join.right)
    }

    fn visit_union(&mut self, union: &mut Union) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut union.left)?;
        self.visit_tuple_expr(&mut union.right)
    }

    fn visit_filter(&mut self, filter: &mut Filter) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut filter.arg)
    }

    fn visit_extension(&mut self, extension: &mut Extension) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut extension.arg)
    }

    fn visit_projection(&mut self, projection: &mut Projection) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut projection.arg)
    }

    fn visit_multi_projection(
        &mut self,
        projection: &mut MultiProjection,
    ) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut projection.arg)
    }

    fn visit_distinct(&mut self, inner: &mut TupleExpr) -> Result<(), Self::Error> {
        self.visit_tuple_expr(inner)
    }

    fn visit_reduced(&mut self, inner: &mut TupleExpr) -> Result<(), Self::Error> {
        self.visit_tuple_expr(inner)
    }

    fn visit_order(&mut self, order: &mut Order) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut order.arg)
    }

    fn visit_slice(&mut self, slice: &mut Slice) -> Result<(), Self::Error> {
        self.visit_tuple_expr(&mut slice.arg)
    }
}

pub fn walk_tuple_expr_mut<V: TupleExprVisitorMut + ?Sized>(
    visitor: &mut V,
    expr: &mut TupleExpr,
) -> Result<(), V::Error> {
    match expr {
        TupleExpr::StatementPattern(pattern) => visitor.visit_statement_pattern(pattern),
        TupleExpr::Join(join) => visitor.visit_join(join),
        TupleExpr::LeftJoin(left_join) => visitor.visit_left_join(left_join),
        TupleExpr::Union(union) => visitor.visit_union(union),
        TupleExpr::Filter(filter) => visitor.visit_filter(filter),
        TupleExpr::Extension(extension) => visitor.visit_extension(extension),
        TupleExpr::Projection(projection) => visitor.visit_projection(projection),
        TupleExpr::MultiProjection(projection) => visitor.visit_multi_projection(projection),
        TupleExpr::Distinct(inner) => visitor.visit_distinct(inner),
        TupleExpr::Reduced(inner) => visitor.visit_reduced(inner),
        TupleExpr::Order(order) => visitor.visit_order(order),
        TupleExpr::Slice(slice) => visitor.visit_slice(slice),
        TupleExpr::SingletonSet => Ok(()),
    }
}
