use oxrdf::TermRef;
use std::fmt::Write;

/// The query-language flavours a single [TermRef] can be rendered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueDialect {
    /// SPARQL as understood by ARQ. Blank nodes are written as `<_:id>`.
    ArqSparql,
    /// Standard SPARQL.
    #[default]
    Sparql,
    /// SeRQL. Literals use short quotes.
    Serql,
}

impl ValueDialect {
    fn literal_quotes(self) -> &'static str {
        match self {
            ValueDialect::ArqSparql | ValueDialect::Sparql => "\"\"\"",
            ValueDialect::Serql => "\"",
        }
    }
}

/// Renders `term` in its query string representation for the given `dialect`.
///
/// Literal labels are passed through [escape] exactly once.
pub fn render_value<'a>(term: impl Into<TermRef<'a>>, dialect: ValueDialect) -> String {
    let mut buffer = String::new();
    match term.into() {
        TermRef::NamedNode(node) => {
            let _ = write!(buffer, "<{}>", node.as_str());
        }
        TermRef::BlankNode(node) => {
            let _ = match dialect {
                ValueDialect::ArqSparql => write!(buffer, "<_:{}>", node.as_str()),
                ValueDialect::Sparql | ValueDialect::Serql => write!(buffer, "_:{}", node.as_str()),
            };
        }
        TermRef::Literal(literal) => {
            let quotes = dialect.literal_quotes();
            buffer.push_str(quotes);
            buffer.push_str(&escape(literal.value()));
            buffer.push_str(quotes);

            // Language and datatype are mutually exclusive. Simple literals carry the implicit
            // xsd:string datatype which is not written out.
            if let Some(language) = literal.language() {
                let _ = write!(buffer, "@{language}");
            } else if !literal.is_plain() {
                let _ = write!(buffer, "^^<{}>", literal.datatype().as_str());
            }
        }
    }
    buffer
}

/// Renders `term` for ARQ's flavour of SPARQL.
pub fn arq_sparql_query_string<'a>(term: impl Into<TermRef<'a>>) -> String {
    render_value(term, ValueDialect::ArqSparql)
}

/// Renders `term` for SPARQL.
pub fn sparql_query_string<'a>(term: impl Into<TermRef<'a>>) -> String {
    render_value(term, ValueDialect::Sparql)
}

/// Renders `term` for SeRQL.
pub fn serql_query_string<'a>(term: impl Into<TermRef<'a>>) -> String {
    render_value(term, ValueDialect::Serql)
}

/// Escapes the special characters of a literal label so that a query parser reads back the
/// original text.
///
/// Double quotes that are not already preceded by a backslash become `\"`. Afterwards, every
/// backslash that does not start one of the escape sequences `\t`, `\n`, `\r`, `\b`, `\f`, `\"`,
/// `\'` or `\\` is doubled.
///
/// The function is not idempotent. Escaping an already escaped label escapes it again.
pub fn escape(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '"' && previous != Some('\\') {
            quoted.push('\\');
        }
        quoted.push(c);
        previous = Some(c);
    }

    let mut escaped = String::with_capacity(quoted.len());
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        escaped.push(c);
        if c == '\\' && !chars.peek().is_some_and(|next| is_escape_char(*next)) {
            escaped.push('\\');
        }
    }
    escaped
}

fn is_escape_char(c: char) -> bool {
    matches!(c, 't' | 'n' | 'r' | 'b' | 'f' | '"' | '\'' | '\\')
}
