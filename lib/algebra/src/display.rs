use crate::{
    Extension, ExtensionElem, Filter, LeftJoin, MultiProjection, Order, OrderElem, Projection,
    ProjectionElem, Slice, StatementPattern, TupleExpr,
};
use std::fmt;

impl TupleExpr {
    /// Writes the tree with one node per line. Children are indented by two spaces per level.
    pub(crate) fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}", "", indent = depth * 2)?;
        self.fmt_node(f)?;
        for child in self.children() {
            writeln!(f)?;
            child.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TupleExpr::StatementPattern(pattern) => write!(f, "{pattern}"),
            TupleExpr::Join(_) => write!(f, "Join"),
            TupleExpr::LeftJoin(LeftJoin { condition, .. }) => match condition {
                Some(condition) => write!(f, "LeftJoin: {condition}"),
                None => write!(f, "LeftJoin"),
            },
            TupleExpr::Union(_) => write!(f, "Union"),
            TupleExpr::Filter(Filter { condition, .. }) => write!(f, "Filter: {condition}"),
            TupleExpr::Extension(Extension { elements, .. }) => {
                write!(f, "Extension: ")?;
                write_separated(f, elements, ", ")
            }
            TupleExpr::Projection(Projection { elements, .. }) => {
                write!(f, "Projection: ")?;
                write_separated(f, elements, ", ")
            }
            TupleExpr::MultiProjection(MultiProjection { projections, .. }) => {
                write!(f, "MultiProjection: ")?;
                for (i, projection) in projections.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    write_separated(f, projection, ", ")?;
                    write!(f, "]")?;
                }
                Ok(())
            }
            TupleExpr::Distinct(_) => write!(f, "Distinct"),
            TupleExpr::Reduced(_) => write!(f, "Reduced"),
            TupleExpr::Order(Order { elements, .. }) => {
                write!(f, "Order: ")?;
                write_separated(f, elements, ", ")
            }
            TupleExpr::Slice(Slice { limit, offset, .. }) => {
                write!(f, "Slice")?;
                if let Some(limit) = limit {
                    write!(f, " limit={limit}")?;
                }
                if let Some(offset) = offset {
                    write!(f, " offset={offset}")?;
                }
                Ok(())
            }
            TupleExpr::SingletonSet => write!(f, "SingletonSet"),
        }
    }
}

fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for TupleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl fmt::Display for StatementPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatementPattern ({} {} {})",
            self.subject, self.predicate, self.object
        )?;
        if let Some(context) = &self.context {
            write!(f, " GRAPH {context}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ExtensionElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{} := {}", self.name, self.expr)
    }
}

impl fmt::Display for ProjectionElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_renaming() {
            write!(f, "?{} AS ?{}", self.source, self.target)
        } else {
            write!(f, "?{}", self.target)
        }
    }
}

impl fmt::Display for OrderElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ascending {
            write!(f, "ASC({})", self.expr)
        } else {
            write!(f, "DESC({})", self.expr)
        }
    }
}
