//! Pending verification records and the policy used to issue them
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::generate_code;

/// A single pending proof binding an email to a one-time code.
///
/// At most one record exists per email. A record is invalid once `now > expires_at`; expired
/// records are removed lazily by the read that observes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    pub fn new(email: impl Into<String>, code: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Length and lifetime of issued codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    pub code_length: usize,
    pub ttl: Duration,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl: Duration::hours(3),
        }
    }
}

impl VerificationPolicy {
    pub fn new(code_length: usize, ttl: Duration) -> Self {
        Self { code_length, ttl }
    }

    /// Generate a fresh code and its expiry relative to `now`.
    pub fn issue(&self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        (generate_code(self.code_length), now + self.ttl)
    }

    /// Whole hours until an issued code expires, for user-facing messages.
    pub fn ttl_hours(&self) -> u32 {
        u32::try_from(self.ttl.num_hours()).unwrap_or(u32::MAX)
    }
}
