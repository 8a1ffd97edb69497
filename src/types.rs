//! Common types used throughout pagefeed
//!
//! This module contains shared type definitions, type aliases,
//! and the network state model observed by listing consumers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

/// Response headers: lower-cased name to every value received for it
pub type HeaderValues = HashMap<String, Vec<String>>;

/// Ordered query parameters
pub type QueryParams = Vec<(String, String)>;

// ============================================================================
// Network State
// ============================================================================

/// Message reported for every failed page fetch, whatever the cause
pub const NETWORK_ERROR_MESSAGE: &str = "network error";

/// Outcome of the most recent fetch as seen by consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NetworkState {
    /// A fetch is in flight
    Loading,
    /// The last fetch succeeded
    Loaded,
    /// The last fetch failed
    Error {
        /// Human-readable failure description
        message: String,
    },
}

impl NetworkState {
    /// Create an error state
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The error state every failed fetch collapses into
    pub fn network_error() -> Self {
        Self::error(NETWORK_ERROR_MESSAGE)
    }

    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Check if the last fetch succeeded
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Check if the last fetch failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Error message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for NetworkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Loaded => write!(f, "loaded"),
            Self::Error { message } => write!(f, "error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_state_equality_is_structural() {
        assert_eq!(NetworkState::error("network error"), NetworkState::network_error());
        assert_ne!(NetworkState::error("timeout"), NetworkState::network_error());
        assert_ne!(NetworkState::Loading, NetworkState::Loaded);
    }

    #[test]
    fn test_network_state_predicates() {
        assert!(NetworkState::Loading.is_loading());
        assert!(NetworkState::Loaded.is_loaded());
        assert!(NetworkState::network_error().is_error());
        assert_eq!(NetworkState::network_error().message(), Some("network error"));
        assert_eq!(NetworkState::Loaded.message(), None);
    }

    #[test]
    fn test_network_state_serialization() {
        let json = serde_json::to_value(NetworkState::network_error()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "network error"})
        );

        let state: NetworkState = serde_json::from_str(r#"{"status":"loaded"}"#).unwrap();
        assert_eq!(state, NetworkState::Loaded);
    }

    #[test]
    fn test_network_state_display() {
        assert_eq!(NetworkState::Loading.to_string(), "loading");
        assert_eq!(
            NetworkState::network_error().to_string(),
            "error: network error"
        );
    }
}
