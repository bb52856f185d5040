/// Options for [parse](crate::parse).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// The IRI that relative IRIs in the query are resolved against.
    pub base_iri: Option<String>,
    /// Whether describe queries should also return the named graph of each statement.
    pub describe_named_graphs: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    #[must_use]
    pub fn with_describe_named_graphs(mut self, describe_named_graphs: bool) -> Self {
        self.describe_named_graphs = describe_named_graphs;
        self
    }
}
