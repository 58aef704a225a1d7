//! Error types for identity resolution.

use thiserror::Error;

/// Errors surfaced by the resolver and its collaborators.
///
/// A subject that simply has no answer (no canonical UUID, no label) is not
/// an error; those operations return empty results instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A string could not be coerced into a resource.
    #[error("invalid URI {input:?}: {reason}")]
    InvalidUri {
        /// The offending input.
        input: String,
        /// What went wrong.
        reason: String,
    },

    /// A literal was given where an IRI or blank node is required.
    #[error("not a resource: {0}")]
    NotAResource(String),

    /// A label or fragment policy is malformed.
    #[error("policy error: {0}")]
    Policy(String),

    /// Graph data could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The graph backend failed.
    #[error("graph backend error: {0}")]
    Backend(String),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds an [`Error::InvalidUri`].
    pub fn invalid_uri(input: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::InvalidUri {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Builds an [`Error::Policy`].
    pub fn policy(msg: impl Into<String>) -> Self {
        Error::Policy(msg.into())
    }

    /// Builds an [`Error::Backend`].
    pub fn backend(msg: impl Into<String>) -> Self {
        Error::Backend(msg.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Policy(e.to_string())
    }
}
