//! Claim history - the append-only filing log used for temporal analysis

use crate::ApplicantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a history row, based on UUIDv7
///
/// UUIDv7 keeps ids sortable by creation time without any coordination
/// between concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new time-ordered id
    ///
    /// # Examples
    ///
    /// ```
    /// use claimwise_domain::RecordId;
    ///
    /// let id = RecordId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Rebuild an id from its raw value (storage deserialization)
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an id from its hyphenated string form
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// One filing, logged the moment a claim is analyzed
///
/// Records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimHistoryRecord {
    /// Row identifier
    #[serde(with = "record_id_string")]
    pub id: RecordId,

    /// Applicant the filing belongs to
    pub ssn_last4: ApplicantId,

    /// Employer named on the filing
    pub employer: String,

    /// Filing time, seconds since the Unix epoch
    pub filed_at: u64,

    /// Contextual embedding computed at filing time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

impl ClaimHistoryRecord {
    /// Create a record with a fresh id
    pub fn new(
        ssn_last4: ApplicantId,
        employer: impl Into<String>,
        filed_at: u64,
        embedding: Vec<f32>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            ssn_last4,
            employer: employer.into(),
            filed_at,
            embedding,
        }
    }
}

mod record_id_string {
    use super::RecordId;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &RecordId, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<RecordId, D::Error> {
        let raw = String::deserialize(d)?;
        RecordId::from_string(&raw).map_err(serde::de::Error::custom)
    }
}
