//! Volume records
//!
//! A `Volume` is one catalogued unit of removable media. The barcode is
//! the primary key and never changes; every other field is replaced
//! wholesale on update.

use crate::common::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tape, disk or similar medium tracked by the catalog.
///
/// Every field is required on input and unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Volume {
    pub barcode: String,
    pub media_type: String,
    /// Bytes the medium can hold
    pub capacity: u64,
    /// Bytes written so far, never above `capacity`
    pub used: u64,
    #[serde(rename = "blocksize", alias = "block_size")]
    pub block_size: u32,
    pub priority: i32,
    pub label_time: DateTime<Utc>,
    pub modify_time: DateTime<Utc>,
    pub mount_time: DateTime<Utc>,
    pub needs_attention: bool,
    pub in_use: bool,
    pub labeled: bool,
    pub media_bad: bool,
    pub cleaning_media: bool,
    pub write_protect: bool,
    #[serde(rename = "readonly", alias = "read_only")]
    pub read_only: bool,
    pub draining: bool,
    pub unavailable: bool,
    pub full: bool,
}

impl Volume {
    /// Decode a request payload. Any decoding failure is a validation error.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        serde_json::from_slice(payload)
            .map_err(|e| Error::Validation(format!("malformed volume payload: {}", e)))
    }

    /// Check the rules storage does not enforce on its own.
    pub fn validate(&self) -> Result<()> {
        validate_barcode(&self.barcode)?;
        if self.used > self.capacity {
            return Err(Error::Validation(format!(
                "used ({}) exceeds capacity ({}) for volume {}",
                self.used, self.capacity, self.barcode
            )));
        }
        Ok(())
    }

    /// Bytes still available on the medium
    pub fn free_bytes(&self) -> u64 {
        self.capacity.saturating_sub(self.used)
    }
}

/// A barcode has to be usable as the `{barcode}` path segment.
pub fn validate_barcode(barcode: &str) -> Result<()> {
    if barcode.is_empty() {
        return Err(Error::Validation("barcode must not be empty".into()));
    }
    if barcode.trim() != barcode {
        return Err(Error::Validation(format!(
            "barcode {:?} has surrounding whitespace",
            barcode
        )));
    }
    if barcode.chars().any(|c| c == '/' || c.is_control()) {
        return Err(Error::Validation(format!(
            "barcode {:?} contains '/' or control characters",
            barcode
        )));
    }
    Ok(())
}
