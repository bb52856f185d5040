/// An error while compiling a query from a builder.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryBuilderError {
    /// The builder state cannot be turned into a query tree.
    #[error("Malformed query: {0}")]
    MalformedQuery(String),
    /// The requested shape is not supported, e.g., a union with a missing branch.
    #[error("Unsupported query shape: {0}")]
    UnsupportedShape(String),
}

pub type QueryBuilderResult<T> = Result<T, QueryBuilderError>;
