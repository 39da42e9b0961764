use thiserror::Error;

/// Errors produced by the interpolation engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterpError {
    /// Parse-time failure: unbalanced `${`, unterminated bracket, empty
    /// reference, or an invalid character inside a path segment. Always
    /// fatal to the enclosing specification field.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    /// Resolve-time failure: the reference names an unknown key, or a
    /// namespace that is not available in the current evaluation phase.
    /// Resolution never substitutes empty text for an unknown reference.
    #[error("unresolved reference: {namespace}[{key}]")]
    UnresolvedReference { namespace: String, key: String },
}

impl InterpError {
    pub(crate) fn unresolved(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        InterpError::UnresolvedReference {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InterpError>;
