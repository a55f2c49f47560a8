//! Token record and aggregate statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored access token awaiting pickup by the bot.
///
/// `id` is assigned once at creation and never changes. `used_at` is set
/// exactly when `used` flips to `true`; the two fields move together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Unique record id, assigned by the service at creation.
    pub id: String,

    /// Opaque credential value. Required, non-empty.
    pub token: String,

    /// Channel the token was captured for.
    pub channel: String,

    /// Creation time (ISO-8601 on the wire).
    pub timestamp: DateTime<Utc>,

    /// Whether the bot has consumed this token.
    pub used: bool,

    /// When the token was consumed, if it has been.
    pub used_at: Option<DateTime<Utc>>,
}

impl TokenRecord {
    /// Create a fresh, unused record stamped with the current time.
    #[must_use]
    pub fn new(id: impl Into<String>, token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            token: token.into(),
            channel: channel.into(),
            timestamp: Utc::now(),
            used: false,
            used_at: None,
        }
    }

    /// Transition to used at the given instant.
    ///
    /// Calling this on an already-used record is a normal transition; the
    /// source of truth for "used" is the latest write.
    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        self.used = true;
        self.used_at = Some(at);
    }
}

/// Aggregate counts over the store, computed by full scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenStats {
    /// All records.
    pub total: usize,

    /// Records the bot has consumed.
    pub used: usize,

    /// Records still awaiting pickup (`total - used`).
    pub new: usize,
}

impl TokenStats {
    /// Compute stats from a slice of records.
    #[must_use]
    pub fn from_records(records: &[TokenRecord]) -> Self {
        let total = records.len();
        let used = records.iter().filter(|r| r.used).count();
        Self { total, used, new: total - used }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_unused() {
        let record = TokenRecord::new("1", "oauth:abc", "somechannel");
        assert!(!record.used);
        assert!(record.used_at.is_none());
        assert_eq!(record.channel, "somechannel");
    }

    #[test]
    fn test_mark_used_sets_both_fields() {
        let mut record = TokenRecord::new("1", "oauth:abc", "somechannel");
        let at = Utc::now();
        record.mark_used(at);
        assert!(record.used);
        assert_eq!(record.used_at, Some(at));
        assert!(at >= record.timestamp);
    }

    #[test]
    fn test_stats_from_records() {
        let mut a = TokenRecord::new("1", "t1", "c");
        let b = TokenRecord::new("2", "t2", "c");
        a.mark_used(Utc::now());

        let stats = TokenStats::from_records(&[a, b]);
        assert_eq!(stats, TokenStats { total: 2, used: 1, new: 1 });
    }

    #[test]
    fn test_record_serializes_iso8601() {
        let record = TokenRecord::new("1", "oauth:abc", "somechannel");
        let value = serde_json::to_value(&record).unwrap();
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'), "expected ISO-8601 timestamp, got {ts}");
        assert!(value["used_at"].is_null());
    }
}
