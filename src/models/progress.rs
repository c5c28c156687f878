// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Batch progress record.
//!
//! One record lives in each output directory and points at the last image
//! that was completed or skipped, so an interrupted batch can resume.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Persisted pointer to the last processed image of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(rename = "last_annotated")]
    pub last_annotated_path: String,
    /// Informational only; an unreadable value loads as `None`.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<NaiveDateTime>,
}

impl ProgressRecord {
    pub fn new(last_annotated_path: String, timestamp: NaiveDateTime) -> Self {
        Self {
            last_annotated_path,
            timestamp: Some(timestamp),
        }
    }
}

/// Accept naive ISO timestamps, RFC 3339 with an offset, or anything else as `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(text) = value.as_ref().and_then(|v| v.as_str()) else {
        return Ok(None);
    };
    let parsed = text
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|t| t.naive_local()));
    if parsed.is_none() {
        log::debug!("Ignoring unreadable progress timestamp: {}", text);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(json: &str) -> ProgressRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).and_then(|d| d.and_hms_opt(9, 30, 0));

        let naive = record(r#"{"last_annotated": "a.png", "timestamp": "2025-03-14T09:30:00"}"#);
        assert_eq!(naive.timestamp, expected);

        let offset = record(r#"{"last_annotated": "a.png", "timestamp": "2025-03-14T09:30:00+01:00"}"#);
        assert_eq!(offset.timestamp, expected);

        let fractional = record(r#"{"last_annotated": "a.png", "timestamp": "2025-03-14T09:30:00.123456"}"#);
        assert!(fractional.timestamp.is_some());
    }

    #[test]
    fn test_missing_or_odd_timestamp_keeps_record() {
        let missing = record(r#"{"last_annotated": "images/b.png"}"#);
        assert_eq!(missing.last_annotated_path, "images/b.png");
        assert_eq!(missing.timestamp, None);

        assert_eq!(record(r#"{"last_annotated": "b.png", "timestamp": "yesterday"}"#).timestamp, None);
        assert_eq!(record(r#"{"last_annotated": "b.png", "timestamp": 1710408600}"#).timestamp, None);
        assert_eq!(record(r#"{"last_annotated": "b.png", "timestamp": null}"#).timestamp, None);
    }
}
