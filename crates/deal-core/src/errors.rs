//! Cross-cutting error types for dealprobe.
//!
//! Transport and response-contract errors live in `deal-client`; configuration
//! errors live in `deal-config`. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors raised while interpreting observed CRM values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A wire value did not match any known variant of an enum.
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
