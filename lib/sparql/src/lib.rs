//! A bridge between SPARQL query strings and Querykit query trees.
//!
//! Parsing and serialization are done by [spargebra]. This crate only translates between
//! spargebra's algebra and [TupleExpr](querykit_algebra::TupleExpr).

mod error;
mod options;
mod parse;
mod render;

pub use error::{SparqlError, SparqlResult};
pub use options::ParseOptions;
pub use parse::parse;
pub use render::render;
pub use spargebra::SparqlSyntaxError;
