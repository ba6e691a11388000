//! Error types for the JSON-RPC client

use thiserror::Error;

/// Errors that can occur during JSON-RPC communication
#[derive(Debug, Error)]
pub enum RpcError {
    /// Network or transport-level error
    #[error("Network error: {0}")]
    Network(String),

    /// Unexpected HTTP status returned by the server
    #[error("Unexpected HTTP status {0}")]
    Http(u16),

    /// Error reported by the device in the response body
    #[error("Device error {code}: {message}")]
    Device {
        /// Raw error code from the `error` member of the response
        code: i32,
        /// Message accompanying the error code, if any
        message: String,
    },

    /// Response could not be decoded or had an unexpected shape
    #[error("Malformed response: {0}")]
    Malformed(String),
}
