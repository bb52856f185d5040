use querykit_model::Term;
use std::fmt;
use std::fmt::Write;

/// The prefix of the names generated for vars that are bound to a constant.
pub const CONSTANT_VAR_PREFIX: &str = "_const_";
/// The prefix of the names of anonymous vars that stand in for a blank node.
pub const ANONYMOUS_VAR_PREFIX: &str = "_anon_";

/// A named slot in a [StatementPattern](crate::StatementPattern).
///
/// A var is either free, bound to a constant [Term], or anonymous. Anonymous vars stand in for
/// blank nodes of the query text and can never be projected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Var {
    name: String,
    value: Option<Term>,
    anonymous: bool,
}

impl Var {
    /// Creates a free var.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            anonymous: false,
        }
    }

    /// Creates an anonymous var.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            anonymous: true,
        }
    }

    /// Creates the anonymous var that stands in for the blank node `id`.
    pub fn blank(id: &str) -> Self {
        Self::anonymous(format!("{ANONYMOUS_VAR_PREFIX}{id}"))
    }

    /// Creates a var bound to `value`.
    ///
    /// The name is derived from the value, so two vars bound to equal terms are equal.
    pub fn constant(value: impl Into<Term>) -> Self {
        let value = value.into();
        Self {
            name: constant_var_name(&value),
            value: Some(value),
            anonymous: true,
        }
    }

    /// Creates a var with an explicit name that is bound to `value`.
    pub fn with_value(name: impl Into<String>, value: impl Into<Term>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            anonymous: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&Term> {
        self.value.as_ref()
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// Returns true if the var is neither bound nor anonymous, i.e., it may be projected.
    pub fn is_free(&self) -> bool {
        self.value.is_none() && !self.anonymous
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value}"),
            None if self.anonymous => write!(f, "_:{}", self.name),
            None => write!(f, "?{}", self.name),
        }
    }
}

/// Generates the name of a var that is bound to `value`.
///
/// The name is the hex encoding of the serialized term, so distinct terms never share a name
/// and the name stays a valid SPARQL variable name.
pub fn constant_var_name(value: &Term) -> String {
    let serialized = value.to_string();
    let mut name = String::with_capacity(CONSTANT_VAR_PREFIX.len() + 2 * serialized.len());
    name.push_str(CONSTANT_VAR_PREFIX);
    for byte in serialized.bytes() {
        let _ = write!(name, "{byte:02x}");
    }
    name
}
