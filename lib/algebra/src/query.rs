use crate::TupleExpr;
use querykit_model::QueryDataset;
use std::fmt;

/// The result shape of a query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum QueryForm {
    #[default]
    Select,
    Construct,
    Describe,
    Ask,
}

impl QueryForm {
    /// Returns true if the query produces statements rather than solutions.
    pub fn is_graph_query(self) -> bool {
        matches!(self, QueryForm::Construct | QueryForm::Describe)
    }
}

impl fmt::Display for QueryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryForm::Select => "SELECT",
            QueryForm::Construct => "CONSTRUCT",
            QueryForm::Describe => "DESCRIBE",
            QueryForm::Ask => "ASK",
        })
    }
}

/// A query tree together with everything that is needed to turn it back into a query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    form: QueryForm,
    tuple_expr: TupleExpr,
    dataset: Option<QueryDataset>,
    base_iri: Option<String>,
}

impl ParsedQuery {
    pub fn new(form: QueryForm, tuple_expr: TupleExpr) -> Self {
        Self {
            form,
            tuple_expr,
            dataset: None,
            base_iri: None,
        }
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: Option<QueryDataset>) -> Self {
        self.dataset = dataset;
        self
    }

    #[must_use]
    pub fn with_base_iri(mut self, base_iri: Option<String>) -> Self {
        self.base_iri = base_iri;
        self
    }

    pub fn form(&self) -> QueryForm {
        self.form
    }

    pub fn set_form(&mut self, form: QueryForm) {
        self.form = form;
    }

    pub fn tuple_expr(&self) -> &TupleExpr {
        &self.tuple_expr
    }

    pub fn tuple_expr_mut(&mut self) -> &mut TupleExpr {
        &mut self.tuple_expr
    }

    pub fn set_tuple_expr(&mut self, tuple_expr: TupleExpr) {
        self.tuple_expr = tuple_expr;
    }

    pub fn into_tuple_expr(self) -> TupleExpr {
        self.tuple_expr
    }

    pub fn dataset(&self) -> Option<&QueryDataset> {
        self.dataset.as_ref()
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_deref()
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.form)?;
        self.tuple_expr.fmt_indented(f, 1)
    }
}
