//! Error types for IPC operations.

/// Errors raised while decoding or encoding host messages.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Malformed JSON, or a value that does not match the protocol
    #[error("Malformed host message JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid message format: {0}")]
    InvalidFormat(String),
}
