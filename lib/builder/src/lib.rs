mod error;
pub mod expr;
mod group;
mod group_builder;
mod query_builder;

pub use error::{QueryBuilderError, QueryBuilderResult};
pub use group::{Group, GroupElement, GroupKind, SupportsGroups};
pub use group_builder::{FilterBuilder, GroupBuilder, UnionBuilder};
pub use query_builder::QueryBuilder;
