use querykit_model::IriParseError;
use spargebra::SparqlSyntaxError;

/// An error while translating between SPARQL and query trees.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SparqlError {
    /// The query string is not valid SPARQL.
    #[error(transparent)]
    Syntax(#[from] SparqlSyntaxError),
    /// The configured base IRI is not a valid IRI.
    #[error("Invalid base IRI: {0}")]
    InvalidBaseIri(#[from] IriParseError),
    /// The query uses a construct that has no counterpart on the other side.
    #[error("Unsupported query shape: {0}")]
    UnsupportedShape(String),
}

impl SparqlError {
    pub(crate) fn unsupported<T>(cause: impl Into<String>) -> SparqlResult<T> {
        Err(SparqlError::UnsupportedShape(cause.into()))
    }
}

pub type SparqlResult<T> = Result<T, SparqlError>;
