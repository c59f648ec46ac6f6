use alloc::string::String;

use jv_reflect::AccessError;
use thiserror::Error;

// -----------------------------------------------------------------------------
// ConfigError

/// An error in the rules or serializers handed to the engine.
///
/// Reported when the rules are attached, before anything is written.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("type `{0}` is not registered")]
    UnknownType(String),
    #[error("a rule set is already attached to `{0}`")]
    DuplicateRules(&'static str),
    #[error("transform `{path}` is defined on both `{first}` and `{second}`")]
    TransformCollision {
        path: String,
        first: &'static str,
        second: &'static str,
    },
    #[error("a custom serializer is already registered for `{0}`")]
    DuplicateSerializer(&'static str),
}

// -----------------------------------------------------------------------------
// WriteError

/// A failure while writing a view.
///
/// Passed to the output format through `serde::ser::Error::custom`, so the
/// format's own error carries this message.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteError {
    #[error("cannot read `{path}`: {source}")]
    Access {
        path: String,
        #[source]
        source: AccessError,
    },
    #[error("transform of `{path}` failed: {source}")]
    Transform {
        path: String,
        #[source]
        source: AccessError,
    },
    #[error("custom serializer of `{path}` failed: {source}")]
    Serializer {
        path: String,
        #[source]
        source: AccessError,
    },
    #[error("maximum depth of {limit} exceeded at `{path}`")]
    DepthExceeded { path: String, limit: usize },
}
