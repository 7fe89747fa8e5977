//! Request metadata recorded alongside a contact submission.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::domain::normalize::field;

/// Where and when a submission came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactMetadata {
    pub ip: String,
    pub user_agent: String,
    /// ISO-8601 timestamp, e.g. `2026-10-16T09:23:00.123Z`.
    pub sent_at: String,
}

impl ContactMetadata {
    /// Metadata stamped with the current time.
    pub fn now(ip: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            user_agent: user_agent.into(),
            sent_at: timestamp(Utc::now()),
        }
    }

    /// Reads `ip`, `userAgent` and `sentAt` from a forwarded payload.
    /// A blank `sentAt` is replaced with the current time.
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        let sent_at = field(fields, "sentAt");
        Self {
            ip: field(fields, "ip"),
            user_agent: field(fields, "userAgent"),
            sent_at: if sent_at.is_empty() {
                timestamp(Utc::now())
            } else {
                sent_at
            },
        }
    }
}

/// Millisecond-precision UTC timestamp with a `Z` suffix.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
