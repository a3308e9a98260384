//! IPC message protocol for minipaint
//!
//! Defines all message types exchanged between the painting engine and the
//! UI host, serialized as JSON with `{"type": ..., "data": ...}` tagging.

mod commands;
mod error;
mod input;
mod messages;
mod types;

pub use commands::*;
pub use error::*;
pub use input::*;
pub use messages::*;
pub use types::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serialize a message to JSON
pub fn to_json<T: Serialize>(message: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(message)?)
}

/// Parse a message from JSON
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, IpcError> {
    if json.trim().is_empty() {
        return Err(IpcError::EmptyMessage);
    }
    Ok(serde_json::from_str(json)?)
}
