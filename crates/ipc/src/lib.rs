//! IPC message protocol for Scrawl
//!
//! Defines the messages a host page bridge (content script, webview shim)
//! exchanges with the annotation engine, plus the layout readings the
//! engine asks the host for when sizing its surfaces.

mod error;
mod input;
mod layout;
mod messages;

pub use error::IpcError;
pub use input::{KeyOutcome, KeyboardEvent, PointerEvent};
pub use layout::DocumentMetrics;
pub use messages::HostMessage;

/// Decode a host message from JSON.
pub fn parse_host_message(json: &str) -> Result<HostMessage, IpcError> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Err(IpcError::InvalidFormat("empty message".to_string()));
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Encode any protocol value to JSON.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, IpcError> {
    Ok(serde_json::to_string(value)?)
}
