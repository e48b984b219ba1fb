//! Claimwise Storage Layer
//!
//! SQLite-backed implementation of the claim history store, the fraud
//! pattern catalog and the dynamic rule store.
//!
//! # Architecture
//!
//! - SQLite for history rows, patterns and rules
//! - Embeddings stored as JSON arrays next to the row they belong to
//! - Pattern similarity is a linear scan with in-process cosine similarity
//!
//! # Examples
//!
//! ```no_run
//! use claimwise_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:", 384).unwrap();
//! // Store is now ready for history, pattern and rule operations
//! ```

#![warn(missing_docs)]

pub mod embedding;

use claimwise_domain::traits::{ClaimHistoryStore, PatternCatalog, RuleStore, Storage};
use claimwise_domain::{
    ApplicantId, ClaimHistoryRecord, FraudPattern, NewFraudPattern, PatternId, PatternMatch,
    RecordId, RuleDefinition, Severity,
};
use embedding::cosine_similarity;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

pub use embedding::MockEmbeddingModel;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Embedding length differs from the configured dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Configured dimension
        expected: usize,
        /// Dimension provided
        actual: usize,
    },

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Connection mutex was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// SQLite-based store for history, patterns and rules
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one `SqliteStore` can be shared
/// through an `Arc` by concurrent decisioning calls. Each operation is a
/// single statement; history appends are plain `INSERT`s.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    dimension: usize,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    /// `dimension` is the embedding length every stored vector must have.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use claimwise_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("claimwise.db", 768).unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P, dimension: usize) -> Result<Self, StoreError> {
        if dimension == 0 {
            return Err(StoreError::InvalidData(
                "Embedding dimension must be greater than 0".to_string(),
            ));
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;

        Ok(Self {
            conn: Mutex::new(conn),
            dimension,
        })
    }

    /// Configured embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn check_dimension(&self, embedding: &[f32]) -> Result<(), StoreError> {
        if embedding.len() != self.dimension {
            return Err(StoreError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }

    /// Convert RecordId to bytes for storage
    fn record_id_to_bytes(id: RecordId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    /// Convert bytes to RecordId
    fn bytes_to_record_id(bytes: &[u8]) -> Result<RecordId, StoreError> {
        if bytes.len() != 16 {
            return Err(StoreError::InvalidData(format!(
                "Expected 16 bytes for RecordId, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 16];
        arr.copy_from_slice(bytes);
        Ok(RecordId::from_value(u128::from_be_bytes(arr)))
    }

    fn encode_embedding(embedding: &[f32]) -> Result<String, StoreError> {
        serde_json::to_string(embedding)
            .map_err(|e| StoreError::InvalidData(format!("Failed to encode embedding: {}", e)))
    }

    fn decode_embedding(text: &str) -> Result<Vec<f32>, StoreError> {
        serde_json::from_str(text)
            .map_err(|e| StoreError::InvalidData(format!("Failed to decode embedding: {}", e)))
    }

    /// Wrap a store error so it can leave a rusqlite row-mapping closure
    fn conversion_error(column: usize, e: StoreError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    }
}

impl Storage for SqliteStore {
    type Error = StoreError;
}

impl ClaimHistoryStore for SqliteStore {
    fn append_history(&self, record: &ClaimHistoryRecord) -> Result<(), Self::Error> {
        self.check_dimension(&record.embedding)?;

        let embedding = Self::encode_embedding(&record.embedding)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO claim_history (id, ssn_last4, employer, filed_at, embedding)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                Self::record_id_to_bytes(record.id),
                record.ssn_last4.as_str(),
                &record.employer,
                record.filed_at as i64,
                embedding,
            ],
        )?;

        Ok(())
    }

    fn count_filed_since(&self, applicant: &ApplicantId, since: u64) -> Result<usize, Self::Error> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM claim_history WHERE ssn_last4 = ?1 AND filed_at > ?2",
            params![applicant.as_str(), since as i64],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    fn history_for(&self, applicant: &ApplicantId) -> Result<Vec<ClaimHistoryRecord>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, ssn_last4, employer, filed_at, embedding
             FROM claim_history WHERE ssn_last4 = ?1
             ORDER BY filed_at DESC, id DESC",
        )?;

        let records = stmt
            .query_map(params![applicant.as_str()], |row| {
                let id_bytes: Vec<u8> = row.get(0)?;
                let id = Self::bytes_to_record_id(&id_bytes)
                    .map_err(|e| Self::conversion_error(0, e))?;

                let ssn: String = row.get(1)?;
                let ssn_last4 = ApplicantId::parse(&ssn).map_err(|e| {
                    Self::conversion_error(1, StoreError::InvalidData(e.to_string()))
                })?;

                let embedding_text: String = row.get(4)?;
                let embedding = Self::decode_embedding(&embedding_text)
                    .map_err(|e| Self::conversion_error(4, e))?;

                Ok(ClaimHistoryRecord {
                    id,
                    ssn_last4,
                    employer: row.get(2)?,
                    filed_at: row.get::<_, i64>(3)? as u64,
                    embedding,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

impl PatternCatalog for SqliteStore {
    fn add_pattern(&self, pattern: &NewFraudPattern) -> Result<PatternId, Self::Error> {
        self.check_dimension(&pattern.embedding)?;

        let embedding = Self::encode_embedding(&pattern.embedding)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO fraud_patterns (description, embedding, severity) VALUES (?1, ?2, ?3)",
            params![&pattern.description, embedding, i64::from(pattern.severity)],
        )?;

        let id = PatternId(conn.last_insert_rowid());
        tracing::debug!("Added fraud pattern {} (severity {})", id, pattern.severity.value());
        Ok(id)
    }

    fn list_patterns(&self) -> Result<Vec<FraudPattern>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, description, embedding, severity FROM fraud_patterns ORDER BY id",
        )?;

        let patterns = stmt
            .query_map([], |row| {
                let embedding_text: String = row.get(2)?;
                let embedding = Self::decode_embedding(&embedding_text)
                    .map_err(|e| Self::conversion_error(2, e))?;

                let severity = Severity::new(row.get(3)?).map_err(|e| {
                    Self::conversion_error(3, StoreError::InvalidData(e.to_string()))
                })?;

                Ok(FraudPattern {
                    id: PatternId(row.get(0)?),
                    description: row.get(1)?,
                    embedding,
                    severity,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(patterns)
    }

    fn similar_patterns(
        &self,
        query: &[f32],
        threshold: f32,
    ) -> Result<Vec<PatternMatch>, Self::Error> {
        self.check_dimension(query)?;

        let mut matches = Vec::new();
        for pattern in self.list_patterns()? {
            if pattern.embedding.len() != query.len() {
                return Err(StoreError::DimensionMismatch {
                    expected: query.len(),
                    actual: pattern.embedding.len(),
                });
            }

            let similarity = cosine_similarity(query, &pattern.embedding);
            if similarity > threshold {
                matches.push(PatternMatch { pattern, similarity });
            }
        }

        matches.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.pattern.id.cmp(&b.pattern.id))
        });

        Ok(matches)
    }
}

impl RuleStore for SqliteStore {
    fn add_rule(&self, rule: &RuleDefinition) -> Result<(), Self::Error> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO eligibility_rules (rule_name, condition, message) VALUES (?1, ?2, ?3)",
            params![&rule.name, &rule.expression, &rule.message],
        )?;
        Ok(())
    }

    fn list_rules(&self) -> Result<Vec<RuleDefinition>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT rule_name, condition, message FROM eligibility_rules ORDER BY id")?;

        let rules = stmt
            .query_map([], |row| {
                Ok(RuleDefinition {
                    name: row.get(0)?,
                    expression: row.get(1)?,
                    message: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rules)
    }
}
