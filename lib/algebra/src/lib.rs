mod collect;
pub mod describe;
mod display;
mod expr;
mod query;
mod slice;
mod tuple_expr;
mod var;
pub mod visitor;

pub use collect::*;
pub use expr::*;
pub use query::*;
pub use slice::*;
pub use tuple_expr::*;
pub use var::*;
