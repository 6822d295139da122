//! Storage trait for schema records.
//!
//! Purely mechanical persistence. Uniqueness and lifecycle rules live
//! in the registry, not here; a backend may additionally enforce the
//! per-key uniqueness constraints (see the Postgres store) but must
//! never implement business validation or retries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::types::config::ListFilter;
use crate::types::schema::{SchemaKey, SchemaRecord, SchemaStatus};

/// Keyed storage for schema records and their version history.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Fetch a record by id.
    async fn get(&self, id: Uuid) -> StoreResult<Option<SchemaRecord>>;

    /// Fetch all records for a key, optionally narrowed to one status,
    /// ordered by ascending version.
    async fn find_by_key(
        &self,
        key: &SchemaKey,
        status: Option<SchemaStatus>,
    ) -> StoreResult<Vec<SchemaRecord>>;

    /// Insert or replace a record by id.
    async fn put(&self, record: &SchemaRecord) -> StoreResult<()>;

    /// Remove a record by id. Returns whether a record existed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Enumerate records matching the filter.
    async fn list_all(&self, filter: &ListFilter) -> StoreResult<Vec<SchemaRecord>>;
}
