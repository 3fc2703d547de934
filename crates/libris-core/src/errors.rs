//! Cross-cutting error types for Libris.
//!
//! Lifecycle errors are defined here; store errors live in `libris-db`.
//! Everything converges into `anyhow` at the CLI boundary.

use thiserror::Error;

/// Errors raised by the request lifecycle engine.
///
/// All variants are recoverable: a failed action leaves the record exactly
/// as it was.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// An action was attempted that the current status does not allow.
    #[error("Invalid transition: {kind} {id} in status '{from}' does not accept '{action}'")]
    InvalidTransition {
        kind: String,
        id: String,
        from: String,
        action: String,
    },

    /// An action was submitted without a parameter it requires.
    #[error("Missing required parameter '{param}' for action '{action}'")]
    MissingParameter { action: String, param: String },

    /// Data failed validation (format, range, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
