use crate::expr::Operand;
use crate::group::apply_condition;
use crate::group_builder::{GroupBuilder, UnionBuilder};
use crate::{Group, QueryBuilderError, QueryBuilderResult, SupportsGroups};
use itertools::Itertools;
use querykit_algebra::describe::{describe_scaffold, DescribedResource};
use querykit_algebra::{
    ExtensionElem, OrderElem, ParsedQuery, ProjectionElem, QueryForm, StatementPattern,
    StatementPatternCollector, TupleExpr, ValueExpr, VarNameCollector,
};
use querykit_model::Term;

/// Assembles a query from groups and compiles it into a [ParsedQuery].
///
/// ```
/// # use querykit_builder::QueryBuilder;
/// # use querykit_model::NamedNode;
/// let knows = NamedNode::new_unchecked("http://xmlns.com/foaf/0.1/knows");
/// let query = QueryBuilder::select()
///     .add_projection_var(["a", "b"])
///     .group()
///     .pattern("a", knows, "b")
///     .close_group()
///     .limit(10)
///     .build()?;
/// # Ok::<_, querykit_builder::QueryBuilderError>(())
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    form: QueryForm,
    state: BuilderState,
}

/// Everything that [QueryBuilder::reset] discards.
#[derive(Debug, Clone, Default)]
struct BuilderState {
    groups: Vec<Group>,
    projection_vars: Vec<String>,
    projection_statements: Vec<StatementPattern>,
    describe_resources: Vec<DescribedResource>,
    order: Vec<OrderElem>,
    limit: Option<usize>,
    offset: Option<usize>,
    distinct: bool,
    reduced: bool,
}

impl QueryBuilder {
    fn new(form: QueryForm) -> Self {
        Self {
            form,
            state: BuilderState::default(),
        }
    }

    /// Creates a builder for a tuple query.
    pub fn select() -> Self {
        Self::new(QueryForm::Select)
    }

    /// Creates a builder for a graph query.
    pub fn construct() -> Self {
        Self::new(QueryForm::Construct)
    }

    pub fn ask() -> Self {
        Self::new(QueryForm::Ask)
    }

    /// Creates a builder for a query describing the values of `vars` and the fixed
    /// `resources`.
    pub fn describe<V: Into<String>>(
        vars: impl IntoIterator<Item = V>,
        resources: impl IntoIterator<Item = Term>,
    ) -> Self {
        let mut builder = Self::new(QueryForm::Describe);
        builder.state.describe_resources = vars
            .into_iter()
            .map(|var| DescribedResource::Var(var.into()))
            .chain(resources.into_iter().map(DescribedResource::Constant))
            .collect();
        builder
    }

    pub fn form(&self) -> QueryForm {
        self.form
    }

    /// Adds vars to the projection of a tuple query.
    pub fn add_projection_var<V: Into<String>>(mut self, vars: impl IntoIterator<Item = V>) -> Self {
        self.state
            .projection_vars
            .extend(vars.into_iter().map(Into::into));
        self
    }

    /// Adds a statement to the projection of a graph query.
    pub fn add_projection_statement(
        mut self,
        subject: impl Into<Operand>,
        predicate: impl Into<Operand>,
        object: impl Into<Operand>,
    ) -> Self {
        self.state.projection_statements.push(StatementPattern::new(
            subject.into().into_var(),
            predicate.into().into_var(),
            object.into().into_var(),
        ));
        self
    }

    /// Opens a top-level group.
    pub fn group(self) -> GroupBuilder<Self> {
        GroupBuilder::new(self, false)
    }

    /// Opens a top-level optional group.
    pub fn optional(self) -> GroupBuilder<Self> {
        GroupBuilder::new(self, true)
    }

    /// Opens a top-level union.
    pub fn union(self) -> UnionBuilder<Self> {
        UnionBuilder::new(self, false)
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.state.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.state.offset = Some(offset);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.state.distinct = true;
        self.state.reduced = false;
        self
    }

    pub fn reduced(mut self) -> Self {
        self.state.reduced = true;
        self.state.distinct = false;
        self
    }

    /// Orders the solutions by `var`. Later calls order by additional keys.
    pub fn order_by(mut self, var: &str, ascending: bool) -> Self {
        self.state.order.push(OrderElem {
            expr: ValueExpr::var(var),
            ascending,
        });
        self
    }

    /// Discards everything but the query form.
    pub fn reset(&mut self) {
        self.state = BuilderState::default();
    }

    /// Compiles the query.
    ///
    /// The compiled tree is nested as `Slice(Distinct|Reduced(Projection(Order(join))))`, with
    /// each wrapper only present when it is needed.
    pub fn build(&self) -> QueryBuilderResult<ParsedQuery> {
        tracing::debug!(
            form = %self.form,
            groups = self.state.groups.len(),
            "Compiling query"
        );

        let join = self.join()?;
        let projection = match self.form {
            QueryForm::Select if self.state.projection_vars.is_empty() => {
                Projected::Vars(VarNameCollector::collect(&join))
            }
            QueryForm::Select => Projected::Vars(self.state.projection_vars.clone()),
            QueryForm::Construct if self.state.projection_statements.is_empty() => {
                Projected::Statements(StatementPatternCollector::collect(&join))
            }
            QueryForm::Construct => {
                Projected::Statements(self.state.projection_statements.clone())
            }
            QueryForm::Describe => Projected::Describe(&self.state.describe_resources),
            QueryForm::Ask => Projected::Nothing,
        };

        let ordered = if self.state.order.is_empty() {
            join
        } else {
            TupleExpr::order(join, self.state.order.clone())
        };

        let projected = match projection {
            Projected::Vars(vars) => {
                TupleExpr::projection(ordered, vars.into_iter().map(ProjectionElem::new).collect())
            }
            Projected::Statements(statements) => graph_projection(ordered, &statements),
            Projected::Describe(resources) => describe_scaffold(ordered, resources, false),
            Projected::Nothing => ordered,
        };

        let modified = if self.state.distinct {
            TupleExpr::distinct(projected)
        } else if self.state.reduced {
            TupleExpr::reduced(projected)
        } else {
            projected
        };

        let sliced = if self.state.limit.is_some() || self.state.offset.is_some() {
            TupleExpr::slice(modified, self.state.limit, self.state.offset)
        } else {
            modified
        };

        Ok(ParsedQuery::new(self.form, sliced))
    }

    /// Composes the top-level groups.
    fn join(&self) -> QueryBuilderResult<TupleExpr> {
        match self.state.groups.as_slice() {
            [] => Err(QueryBuilderError::MalformedQuery(
                "cannot build from no groups".to_owned(),
            )),
            [group] => Ok(group.expr()),
            groups => {
                let mut join = JoinAccumulator::default();
                for group in groups {
                    if group.is_optional() {
                        let (right, condition) = group.left_join_operand();
                        join = match join.join_or_single() {
                            Some(left) => JoinAccumulator::from(TupleExpr::left_join(
                                left, right, condition,
                            )),
                            // A leading optional group has nothing to be left-joined to.
                            None => JoinAccumulator::from(apply_condition(right, condition)),
                        };
                    } else {
                        join.push(group.expr());
                    }
                }
                join.join_or_single().ok_or_else(|| {
                    QueryBuilderError::MalformedQuery("the groups produce no join".to_owned())
                })
            }
        }
    }
}

impl SupportsGroups for QueryBuilder {
    fn add_group(&mut self, group: Group) {
        self.state.groups.push(group);
    }

    fn remove_group(&mut self, group: &Group) -> bool {
        match self.state.groups.iter().position(|g| g == group) {
            Some(position) => {
                self.state.groups.remove(position);
                true
            }
            None => false,
        }
    }
}

/// What a query form projects from the join.
enum Projected<'a> {
    Vars(Vec<String>),
    Statements(Vec<StatementPattern>),
    Describe(&'a [DescribedResource]),
    Nothing,
}

/// The two sides of the join that is being composed.
#[derive(Default)]
struct JoinAccumulator {
    left: Option<TupleExpr>,
    right: Option<TupleExpr>,
}

impl From<TupleExpr> for JoinAccumulator {
    fn from(left: TupleExpr) -> Self {
        Self {
            left: Some(left),
            right: None,
        }
    }
}

impl JoinAccumulator {
    fn push(&mut self, expr: TupleExpr) {
        match (self.left.take(), self.right.take()) {
            (None, right) => {
                self.left = Some(expr);
                self.right = right;
            }
            (Some(left), None) => {
                self.left = Some(left);
                self.right = Some(expr);
            }
            (Some(left), Some(right)) => {
                self.left = Some(TupleExpr::join(left, right));
                self.right = Some(expr);
            }
        }
    }

    /// Returns the join of both sides, or the only side that is set.
    fn join_or_single(self) -> Option<TupleExpr> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some(TupleExpr::join(left, right)),
            (Some(single), None) | (None, Some(single)) => Some(single),
            (None, None) => None,
        }
    }
}

/// Projects `statements` from `arg`. Constants in the statements are bound by an extension.
fn graph_projection(arg: TupleExpr, statements: &[StatementPattern]) -> TupleExpr {
    let constants = statements
        .iter()
        .flat_map(|statement| [&statement.subject, &statement.predicate, &statement.object])
        .filter_map(|var| {
            var.value()
                .map(|value| ExtensionElem::new(var.name(), ValueExpr::Constant(value.clone())))
        })
        .unique()
        .collect::<Vec<_>>();

    let projections = statements
        .iter()
        .map(|statement| {
            vec![
                ProjectionElem::renamed(statement.subject.name(), "subject"),
                ProjectionElem::renamed(statement.predicate.name(), "predicate"),
                ProjectionElem::renamed(statement.object.name(), "object"),
            ]
        })
        .collect();

    let arg = if constants.is_empty() {
        arg
    } else {
        TupleExpr::extension(arg, constants)
    };
    TupleExpr::multi_projection(arg, projections)
}
