//! Error types for parsing and line-audit operations.
//!
//! Command-output parsing itself never surfaces an error: the tiered engine
//! degrades to a fallback result instead. The variants here cover the few
//! operations that are genuinely fallible, such as explicit address parsing,
//! report encoding, and structured-catalog construction.

use thiserror::Error;

/// Errors that can occur while building parsers or assembling audit reports.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A line address string does not satisfy the `slot/subslot/channel`
    /// grammar (slot and subslot in `{0,1}`, channel in `0..=22`).
    ///
    /// Discovery drops and logs such candidates instead of returning this;
    /// it is only surfaced by explicit parsing via `FromStr`.
    #[error("invalid line address '{0}'")]
    InvalidLineAddress(String),

    /// A structured-parser template failed to compile or register.
    #[error("invalid template for '{command}': {reason}")]
    InvalidTemplate {
        /// Command the template was registered for.
        command: String,
        /// Compiler message.
        reason: String,
    },

    /// Failed to encode a report or schema as JSON.
    #[error("json encode error: {0}")]
    JsonEncodeError(#[from] serde_json::Error),

    /// An internal invariant was violated (e.g. a poisoned accumulator lock).
    #[error("internal error: {0}")]
    InternalError(String),
}
