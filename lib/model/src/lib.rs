mod render;

pub use render::*;

// Re-export some oxrdf types.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef, Variable,
    VariableNameParseError, VariableRef,
};

// Re-export the spargebra types that survive a round trip through the query algebra untouched.
pub use spargebra::algebra::QueryDataset;
