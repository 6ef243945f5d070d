//! onda-error - Shared error types for the Onda IR toolkit
//!
//! The IR distinguishes exactly two failure classes: contract violations
//! (a bug in the caller — these panic) and recoverable conditions, which are
//! reported through [`IrError`] or an `Option`. Anything that reaches this
//! crate is recoverable by design.

use thiserror::Error;

/// Default Result type for fallible IR operations
pub type Result<T> = std::result::Result<T, IrError>;

/// Recoverable errors produced by the IR core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    /// The expression kind is a placeholder whose typing rules are not
    /// implemented yet (typed-aggregate / RTT operations). Callers should
    /// reject the containing module instead of crashing.
    #[error("unimplemented expression kind: {0}")]
    Unimplemented(&'static str),

    /// An entity was added to a module registry under a name that is
    /// already taken for that entity kind.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// Entity kind ("function", "global", "event", "export")
        kind: &'static str,
        /// The colliding name
        name: String,
    },
}

impl IrError {
    pub fn duplicate(kind: &'static str, name: impl Into<String>) -> Self {
        IrError::DuplicateName {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IrError::Unimplemented("struct.new");
        assert_eq!(err.to_string(), "unimplemented expression kind: struct.new");

        let err = IrError::duplicate("function", "main");
        assert_eq!(err.to_string(), "duplicate function name: main");
    }
}
