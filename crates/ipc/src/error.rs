//! Errors raised while encoding or decoding protocol messages.

/// Errors that can occur during IPC operations.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Message text was not valid JSON for the expected message type
    #[error("Malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// Host delivered a blank payload
    #[error("Received an empty message")]
    EmptyMessage,
}
