//! Decoder types and traits

use crate::error::Result;
use crate::model::Item;
use serde::{Deserialize, Serialize};

/// Configuration for decoding page bodies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Dot path to the record array inside an envelope, e.g. `results`
    /// for search endpoints. `None` means the body itself is the array.
    #[serde(default)]
    pub record_path: Option<String>,
}

impl DecoderConfig {
    /// Body is a bare JSON array
    pub fn json() -> Self {
        Self::default()
    }

    /// Records live under `path`
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }
}

/// Trait for decoding a page body into items
pub trait ItemDecoder: Send + Sync {
    /// Decode the body into an ordered list of items, failing the whole page
    /// if any record is malformed
    fn decode(&self, body: &str) -> Result<Vec<Item>>;
}
