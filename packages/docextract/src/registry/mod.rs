//! The schema registry - identity, approval and versioning state machine.
//!
//! For every (document_type, country) key the registry guarantees:
//!
//! - at most one ACTIVE and at most one IN_REVIEW record at a time
//! - versions never decrease across a lineage
//! - record ids are never reused (deprecated history keeps its ids)
//! - a schema leaves review for ACTIVE only with a non-empty field map
//!
//! Every check-then-act sequence runs under a per-key async mutex, so
//! two concurrent registrations for the same key cannot both succeed.
//! The registry never calls the document AI adapters; orchestration
//! re-enters it only after adapter work completes, so no lock is held
//! across network latency.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::{ConflictKind, RegistryError, RegistryResult};
use crate::traits::store::SchemaStore;
use crate::types::config::ListFilter;
use crate::types::schema::{FieldMap, FieldPatch, FieldType, SchemaKey, SchemaRecord, SchemaStatus, SchemaSummary};

pub mod changes;

use changes::{diff_fields, summarize_changes, SchemaChange};

/// Both lifecycle heads of a key, for callers that need to distinguish
/// "no schema at all" from "schema pending approval".
#[derive(Debug, Clone, Default)]
pub struct KeyLookup {
    pub active: Option<SchemaRecord>,
    pub in_review: Option<SchemaRecord>,
}

/// Outcome of a successful `modify`: the new IN_REVIEW revision plus
/// what changed relative to its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Modification {
    pub record: SchemaRecord,
    pub changes: Vec<SchemaChange>,
    pub change_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Sole writer of schema status and version.
///
/// Generic over the storage backend; the store itself carries no
/// business logic.
pub struct SchemaRegistry<S: SchemaStore> {
    store: S,
    locks: Mutex<HashMap<SchemaKey, Arc<Mutex<()>>>>,
}

impl<S: SchemaStore> SchemaRegistry<S> {
    /// Create a registry over a storage backend.
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Get a reference to the underlying store (for read-only fan-out
    /// such as exports).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new IN_REVIEW record for a key with no active or
    /// pending schema.
    ///
    /// Fails with a conflict carrying the existing record's summary if
    /// either uniqueness rule would be violated.
    pub async fn register(
        &self,
        document_type: &str,
        country: &str,
        fields: FieldMap,
        confidence: Option<f64>,
    ) -> RegistryResult<SchemaRecord> {
        validate_fields(&fields)?;
        if fields.is_empty() {
            return Err(RegistryError::InvalidFields {
                reason: "a schema needs at least one field".to_string(),
            });
        }

        let key = SchemaKey::new(document_type, country);
        let lock = self.key_lock(&key).await;
        let _guard = lock.lock_owned().await;

        if let Some(active) = self.find_one(&key, SchemaStatus::Active).await? {
            return Err(RegistryError::Conflict {
                kind: ConflictKind::AlreadyActive,
                existing: active.summary(),
            });
        }
        if let Some(pending) = self.find_one(&key, SchemaStatus::InReview).await? {
            return Err(RegistryError::Conflict {
                kind: ConflictKind::AlreadyInReview,
                existing: pending.summary(),
            });
        }

        let record = SchemaRecord::new(key.clone(), fields, confidence);
        self.store.put(&record).await?;
        info!(%key, id = %record.id, "registered schema for review");
        Ok(record)
    }

    /// Promote an IN_REVIEW record to ACTIVE, deprecating any sibling
    /// that was active. Applied as a unit under the key lock; the old
    /// active is retired first so no reader can ever observe two
    /// actives for the key.
    pub async fn approve(&self, id: Uuid) -> RegistryResult<SchemaRecord> {
        let key = self.get_required(id).await?.key();
        let lock = self.key_lock(&key).await;
        let _guard = lock.lock_owned().await;

        // Re-read under the lock; the record may have moved since.
        let mut record = self.get_required(id).await?;
        if record.status != SchemaStatus::InReview {
            return Err(RegistryError::InvalidState {
                id,
                status: record.status,
                reason: "only schemas in review can be approved".to_string(),
            });
        }
        if record.fields.is_empty() {
            return Err(RegistryError::InvalidState {
                id,
                status: record.status,
                reason: "cannot activate a schema with no fields".to_string(),
            });
        }

        if let Some(mut superseded) = self.find_one(&key, SchemaStatus::Active).await? {
            superseded.status = SchemaStatus::Deprecated;
            superseded.touch();
            self.store.put(&superseded).await?;
            info!(
                %key,
                superseded_id = %superseded.id,
                superseded_version = superseded.version,
                "deprecated superseded schema"
            );
        }

        record.status = SchemaStatus::Active;
        record.touch();
        self.store.put(&record).await?;
        info!(%key, %id, version = record.version, "approved schema");
        Ok(record)
    }

    /// Produce a new IN_REVIEW revision of a schema.
    ///
    /// Only the lineage head (the one ACTIVE or IN_REVIEW record not
    /// superseded by a pending revision) may be modified. An ACTIVE
    /// source keeps serving extractions until the revision is approved;
    /// an IN_REVIEW source is superseded in place, keeping at most one
    /// pending revision per key.
    pub async fn modify(
        &self,
        id: Uuid,
        additions: FieldMap,
        removals: &[String],
        updates: IndexMap<String, FieldPatch>,
        description: Option<&str>,
    ) -> RegistryResult<Modification> {
        let key = self.get_required(id).await?.key();
        let lock = self.key_lock(&key).await;
        let _guard = lock.lock_owned().await;

        let source = self.get_required(id).await?;
        if source.status == SchemaStatus::Deprecated {
            return Err(RegistryError::InvalidState {
                id,
                status: source.status,
                reason: "deprecated schemas cannot be modified".to_string(),
            });
        }

        // A pending revision owns the lineage head; direct the caller
        // to act on that one instead.
        if let Some(pending) = self.find_one(&key, SchemaStatus::InReview).await? {
            if pending.id != id {
                return Err(RegistryError::InvalidState {
                    id,
                    status: source.status,
                    reason: format!(
                        "revision {} (v{}) is already awaiting approval for {}",
                        pending.id, pending.version, key
                    ),
                });
            }
        }

        let mut fields = source.fields.clone();
        for (name, def) in additions {
            fields.insert(name, def);
        }
        for name in removals {
            fields.shift_remove(name);
        }
        for (name, patch) in &updates {
            match fields.get_mut(name) {
                Some(def) => patch.apply(def),
                None => {
                    return Err(RegistryError::InvalidFields {
                        reason: format!("cannot update unknown field '{}'", name),
                    })
                }
            }
        }
        validate_fields(&fields)?;

        let changes = diff_fields(&source.fields, &fields);
        if changes.is_empty() {
            return Err(RegistryError::NoChanges { id });
        }

        let mut revision = SchemaRecord::new(key.clone(), fields, source.confidence);
        revision.version = source.version + 1;

        // An in-review source is retired in the same critical section
        // that persists its replacement; an active source stays active
        // until the revision is separately approved.
        if source.status == SchemaStatus::InReview {
            let mut retired = source.clone();
            retired.status = SchemaStatus::Deprecated;
            retired.touch();
            self.store.put(&retired).await?;
        }
        self.store.put(&revision).await?;

        let change_summary = summarize_changes(&changes);
        info!(
            %key,
            source_id = %id,
            revision_id = %revision.id,
            version = revision.version,
            summary = %change_summary,
            "modified schema"
        );

        Ok(Modification {
            record: revision,
            changes,
            change_summary,
            description: description.map(str::to_string),
        })
    }

    /// The single record authorized for extraction, if any.
    pub async fn lookup_active(
        &self,
        document_type: &str,
        country: &str,
    ) -> RegistryResult<Option<SchemaRecord>> {
        let key = SchemaKey::new(document_type, country);
        self.find_one(&key, SchemaStatus::Active).await
    }

    /// Both lifecycle heads for a key.
    pub async fn lookup_any(
        &self,
        document_type: &str,
        country: &str,
    ) -> RegistryResult<KeyLookup> {
        let key = SchemaKey::new(document_type, country);
        Ok(KeyLookup {
            active: self.find_one(&key, SchemaStatus::Active).await?,
            in_review: self.find_one(&key, SchemaStatus::InReview).await?,
        })
    }

    /// Fetch a record by id.
    pub async fn get(&self, id: Uuid) -> RegistryResult<SchemaRecord> {
        self.get_required(id).await
    }

    /// Enumerate records matching a filter.
    pub async fn list(&self, filter: &ListFilter) -> RegistryResult<Vec<SchemaRecord>> {
        Ok(self.store.list_all(filter).await?)
    }

    /// Hard removal of a single record by id. Sibling versions are
    /// untouched; no cascading.
    pub async fn delete(&self, id: Uuid) -> RegistryResult<SchemaSummary> {
        let record = self.get_required(id).await?;
        let key = record.key();
        let lock = self.key_lock(&key).await;
        let _guard = lock.lock_owned().await;

        if !self.store.delete(id).await? {
            return Err(RegistryError::NotFound { id });
        }
        info!(%key, %id, status = %record.status, "deleted schema");
        Ok(record.summary())
    }

    async fn key_lock(&self, key: &SchemaKey) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn find_one(
        &self,
        key: &SchemaKey,
        status: SchemaStatus,
    ) -> RegistryResult<Option<SchemaRecord>> {
        let mut records = self.store.find_by_key(key, Some(status)).await?;
        debug_assert!(records.len() <= 1, "duplicate {} records for {}", status, key);
        Ok(records.pop())
    }

    async fn get_required(&self, id: Uuid) -> RegistryResult<SchemaRecord> {
        self.store
            .get(id)
            .await?
            .ok_or(RegistryError::NotFound { id })
    }
}

/// Validate field definitions at the registry boundary.
///
/// Generation adapters are not trusted: unrecognized types, blank
/// descriptions and uncompilable patterns are all rejected here.
fn validate_fields(fields: &FieldMap) -> RegistryResult<()> {
    for (name, def) in fields {
        if name.trim().is_empty() {
            return Err(RegistryError::InvalidFields {
                reason: "field names cannot be blank".to_string(),
            });
        }
        if def.field_type == FieldType::Unrecognized {
            return Err(RegistryError::InvalidFields {
                reason: format!("field '{}' has an unsupported type", name),
            });
        }
        if def.description.trim().is_empty() {
            return Err(RegistryError::InvalidFields {
                reason: format!("field '{}' is missing a description", name),
            });
        }
        if let Some(pattern) = &def.pattern {
            if let Err(err) = Regex::new(pattern) {
                return Err(RegistryError::InvalidFields {
                    reason: format!("field '{}' has an invalid pattern: {}", name, err),
                });
            }
        }
    }
    Ok(())
}
