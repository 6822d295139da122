//! Typed errors for the registry and orchestrator.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Every conflict or
//! not-approved variant carries the offending record's summary so a
//! caller can act without a follow-up lookup.

use thiserror::Error;
use uuid::Uuid;

use crate::types::classification::Classification;
use crate::types::schema::{SchemaStatus, SchemaSummary};

/// Which uniqueness rule a registration collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// An approved schema already serves this key.
    AlreadyActive,

    /// A schema for this key is already awaiting approval.
    AlreadyInReview,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "active"),
            Self::AlreadyInReview => write!(f, "in-review"),
        }
    }
}

/// Errors raised by the schema registry state machine.
///
/// None of these leave partially-applied registry state.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration would violate per-key uniqueness.
    #[error("an {kind} schema already exists for {}/{}", .existing.document_type, .existing.country)]
    Conflict {
        kind: ConflictKind,
        existing: SchemaSummary,
    },

    /// Unknown record id.
    #[error("schema not found: {id}")]
    NotFound { id: Uuid },

    /// Operation illegal for the record's current status.
    #[error("schema {id} is {status}: {reason}")]
    InvalidState {
        id: Uuid,
        status: SchemaStatus,
        reason: String,
    },

    /// Field definitions rejected at the registry boundary.
    #[error("invalid field definitions: {reason}")]
    InvalidFields { reason: String },

    /// A modification that would mint an identical version.
    #[error("modification produced no changes to schema {id}")]
    NoChanges { id: Uuid },

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Errors from a [`SchemaStore`](crate::traits::store::SchemaStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend (pool, connection, query) failure.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A storage-level uniqueness constraint rejected the write.
    ///
    /// Raised by backends that enforce the one-active/one-in-review
    /// rule transactionally (partial unique indexes in Postgres).
    #[error("uniqueness violated for {document_type}/{country} ({status})")]
    UniqueViolation {
        document_type: String,
        country: String,
        status: SchemaStatus,
    },
}

/// Errors from the external classification/extraction/generation adapters.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The document bytes could not be understood upstream.
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    /// Upstream service or model failure.
    #[error("upstream error: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The adapter call did not complete in time.
    #[error("adapter timed out")]
    Timeout,
}

/// Errors raised by the orchestrator's entry operations.
///
/// Adapter failures are never retried here and never mutate registry
/// state; callers may retry themselves.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// The classification adapter failed outright.
    #[error("classification failed: {0}")]
    ClassificationFailed(#[source] AdapterError),

    /// Classification succeeded but fell below the acceptance
    /// threshold; the registry was not consulted.
    #[error("classification confidence {:.2} is below threshold {threshold:.2}", .classification.confidence)]
    ClassificationBelowThreshold {
        classification: Classification,
        threshold: f64,
    },

    /// No schema exists at all for the classified key.
    #[error("no schema registered for {}/{}", .classification.document_type, .classification.country)]
    SchemaNotFound { classification: Classification },

    /// A schema exists but is still awaiting approval.
    #[error("schema {} (v{}) for {}/{} is awaiting approval", .pending.id, .pending.version, .pending.document_type, .pending.country)]
    SchemaNotApproved {
        pending: SchemaSummary,
        classification: Classification,
    },

    /// The extraction adapter failed during field inference.
    #[error("field extraction failed: {0}")]
    ExtractionFailed(#[source] AdapterError),

    /// The schema-generation adapter failed.
    #[error("schema generation failed: {0}")]
    SchemaGenerationFailed(#[source] AdapterError),

    /// A registry operation failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for adapter calls.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Result type alias for orchestrator operations.
pub type OrchestrationResult<T> = std::result::Result<T, OrchestrationError>;
