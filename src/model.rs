//! Item records
//!
//! Records are produced only by a decoder and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single fetched entity (a photo post)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier
    pub id: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Dominant display color, e.g. `#8CCEE8`
    pub color: String,
    /// Optional free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Named URL variants
    pub urls: ItemUrls,
    /// Creation timestamp, when the API reports one
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp, when the API reports one
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// URL variants of an item, from largest to smallest
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUrls {
    /// Original upload
    pub raw: String,
    pub full: String,
    pub regular: String,
    pub small: String,
    /// Smallest rendition
    pub thumb: String,
}

impl Item {
    /// Width divided by height, or `None` for a degenerate zero height
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0 {
            None
        } else {
            Some(f64::from(self.width) / f64::from(self.height))
        }
    }

    /// Description, falling back to the identifier
    pub fn label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.id)
    }
}
