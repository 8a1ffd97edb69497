//! JSON item decoder

use super::types::{DecoderConfig, ItemDecoder};
use crate::error::{Error, Result};
use crate::model::Item;
use serde_json::Value;

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonItemDecoder {
    /// Dot path to the record array
    record_path: Option<String>,
}

impl JsonItemDecoder {
    /// Create a decoder for bare array bodies
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder that reads records from `path`
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Create a decoder from config
    pub fn from_config(config: &DecoderConfig) -> Self {
        Self {
            record_path: config.record_path.clone(),
        }
    }

    fn extract_records(&self, value: Value) -> Result<Vec<Value>> {
        let records = match &self.record_path {
            Some(path) => extract_simple_path(value, path)
                .ok_or_else(|| Error::decode(format!("No records at path '{path}'")))?,
            None => value,
        };

        match records {
            Value::Array(arr) => Ok(arr),
            other => Err(Error::decode(format!(
                "Expected an array of records, found {}",
                json_kind(&other)
            ))),
        }
    }
}

impl ItemDecoder for JsonItemDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Item>> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;

        self.extract_records(value)?
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                serde_json::from_value(record).map_err(|e| Error::Decode {
                    message: format!("Invalid record at index {index}: {e}"),
                })
            })
            .collect()
    }
}

/// Follow a dot-separated path (`$.` prefix allowed) through nested objects
fn extract_simple_path(value: Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        match current {
            Value::Object(mut map) => current = map.remove(part)?,
            _ => return None,
        }
    }
    Some(current)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
