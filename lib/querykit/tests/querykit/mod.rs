mod builder_equivalence;
mod query_utils;
