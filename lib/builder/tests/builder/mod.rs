mod describe;
mod query_builder;
