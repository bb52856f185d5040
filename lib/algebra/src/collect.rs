use crate::visitor::{walk_statement_pattern, TupleExprVisitor};
use crate::{ProjectionElem, StatementPattern, TupleExpr, Var};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::convert::Infallible;

/// Collects the names of all free vars in first-seen order.
///
/// Vars bound to a constant and anonymous vars are skipped.
#[derive(Debug, Default)]
pub struct VarNameCollector {
    seen: FxHashSet<String>,
    names: Vec<String>,
}

impl VarNameCollector {
    pub fn collect(expr: &TupleExpr) -> Vec<String> {
        let mut collector = Self::default();
        collector
            .visit_tuple_expr(expr)
            .unwrap_or_else(|never| match never {});
        collector.names
    }
}

impl TupleExprVisitor for VarNameCollector {
    type Error = Infallible;

    fn visit_var(&mut self, var: &Var) -> Result<(), Self::Error> {
        if var.is_free() && self.seen.insert(var.name().to_owned()) {
            self.names.push(var.name().to_owned());
        }
        Ok(())
    }
}

/// Collects all statement patterns in the order they appear in the tree.
#[derive(Debug, Default)]
pub struct StatementPatternCollector {
    patterns: Vec<StatementPattern>,
}

impl StatementPatternCollector {
    pub fn collect(expr: &TupleExpr) -> Vec<StatementPattern> {
        let mut collector = Self::default();
        collector
            .visit_tuple_expr(expr)
            .unwrap_or_else(|never| match never {});
        collector.patterns
    }
}

impl TupleExprVisitor for StatementPatternCollector {
    type Error = Infallible;

    fn visit_statement_pattern(&mut self, pattern: &StatementPattern) -> Result<(), Self::Error> {
        self.patterns.push(pattern.clone());
        walk_statement_pattern(self, pattern)
    }
}

/// Collects the source and target names of every projection element.
#[derive(Debug, Default)]
pub struct ProjectionNameCollector {
    names: BTreeSet<String>,
}

impl ProjectionNameCollector {
    pub fn collect(expr: &TupleExpr) -> BTreeSet<String> {
        let mut collector = Self::default();
        collector
            .visit_tuple_expr(expr)
            .unwrap_or_else(|never| match never {});
        collector.names
    }
}

impl TupleExprVisitor for ProjectionNameCollector {
    type Error = Infallible;

    fn visit_projection_elem(&mut self, elem: &ProjectionElem) -> Result<(), Self::Error> {
        self.names.insert(elem.source.clone());
        self.names.insert(elem.target.clone());
        Ok(())
    }
}
