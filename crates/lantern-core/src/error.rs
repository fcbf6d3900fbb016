use thiserror::Error;

use crate::models::ModelNamespace;

/// Error type shared by the codec, the model registry and the fragment builder.
///
/// Every variant is a caller-input or configuration error detected before any
/// SQL reaches the database. Adapters wrap it next to their backend error
/// type instead of flattening it into a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanternError {
    #[error("unknown {namespace} model key: {key}")]
    UnknownModel {
        namespace: ModelNamespace,
        key: String,
    },
    #[error("missing value: {0} must not be empty")]
    MissingValue(&'static str),
    #[error("malformed vector literal '{input}': {reason}")]
    MalformedVector { input: String, reason: String },
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("config error: {0}")]
    Config(String),
}
