//! Client and contract error types.

use thiserror::Error;

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection refused, timeout, DNS failure, or a body that could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured base URL cannot be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A request payload could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A response that does not satisfy the endpoint's contract.
///
/// Each variant corresponds to one failure category a scenario reports:
/// transport, wrong status, failed envelope, missing key, missing entity
/// fields, or an entity that does not decode into its schema.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error(transparent)]
    Transport(#[from] ClientError),

    #[error("HTTP {status} (expected {expected}): {body}")]
    UnexpectedStatus {
        expected: String,
        status: u16,
        body: String,
    },

    #[error("response reported failure: {reason}")]
    NotSuccessful { reason: String },

    #[error("response is missing '{key}' (observed keys: {observed})")]
    MissingKey { key: String, observed: String },

    #[error("{entity} is missing required fields {fields:?} (observed keys: {observed})")]
    MissingFields {
        entity: String,
        fields: Vec<String>,
        observed: String,
    },

    #[error("could not decode '{key}': {reason}")]
    Decode { key: String, reason: String },
}

impl ContractError {
    /// True when the server was never reached (or never answered).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Status code of the offending response, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
