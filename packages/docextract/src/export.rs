//! Schema export for backup and migration between environments.
//!
//! An export is a portable JSON document of schema definitions keyed
//! by (document_type, country). Record ids and timestamps are carried
//! for reference but identity across environments is the key plus the
//! field definitions; each exported schema carries a checksum over
//! exactly that, so two environments can compare inventories without
//! diffing full documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::StoreResult;
use crate::traits::store::SchemaStore;
use crate::types::config::ListFilter;
use crate::types::schema::{FieldMap, SchemaRecord, SchemaStatus};

/// One schema in an export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub id: Uuid,
    pub document_type: String,
    pub country: String,
    pub version: u32,
    pub status: SchemaStatus,
    pub fields: FieldMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// SHA-256 over the key and field definitions, hex-encoded.
    /// Stable across environments regardless of id or timestamps.
    pub checksum: String,
}

impl SchemaDocument {
    pub fn from_record(record: &SchemaRecord) -> Self {
        Self {
            id: record.id,
            document_type: record.document_type.clone(),
            country: record.country.clone(),
            version: record.version,
            status: record.status,
            fields: record.fields.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            checksum: fingerprint(&record.document_type, &record.country, &record.fields),
        }
    }
}

/// Checksum over a schema's portable identity.
///
/// Field order is part of the identity, which `FieldMap` preserves.
pub fn fingerprint(document_type: &str, country: &str, fields: &FieldMap) -> String {
    let canonical = json!({
        "document_type": document_type,
        "country": country,
        "fields": fields,
    });
    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A portable bundle of schema definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaExport {
    pub exported_at: DateTime<Utc>,
    pub schemas: Vec<SchemaDocument>,
}

impl SchemaExport {
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse an export produced by [`SchemaExport::to_json`].
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Export every stored schema matching the filter.
pub async fn export_schemas<S: SchemaStore>(
    store: &S,
    filter: &ListFilter,
) -> StoreResult<SchemaExport> {
    let records = store.list_all(filter).await?;
    Ok(SchemaExport {
        exported_at: Utc::now(),
        schemas: records.iter().map(SchemaDocument::from_record).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use crate::types::schema::{FieldDef, FieldType, SchemaKey};

    fn record(document_type: &str, country: &str, status: SchemaStatus) -> SchemaRecord {
        let mut fields = FieldMap::new();
        fields.insert(
            "full_name".to_string(),
            FieldDef::new(FieldType::String, "Full name"),
        );
        let mut record = SchemaRecord::new(SchemaKey::new(document_type, country), fields, None);
        record.status = status;
        record
    }

    #[tokio::test]
    async fn test_export_round_trips_through_json() {
        let store = MemoryStore::new();
        store
            .put(&record("passport", "US", SchemaStatus::Active))
            .await
            .unwrap();
        store
            .put(&record("invoice", "GB", SchemaStatus::InReview))
            .await
            .unwrap();

        let export = export_schemas(&store, &ListFilter::new()).await.unwrap();
        assert_eq!(export.len(), 2);

        let json = export.to_json().unwrap();
        let parsed = SchemaExport::from_json(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.schemas[0].checksum, export.schemas[0].checksum);
        assert_eq!(parsed.schemas[0].fields, export.schemas[0].fields);
    }

    #[tokio::test]
    async fn test_export_honors_status_filter() {
        let store = MemoryStore::new();
        store
            .put(&record("passport", "US", SchemaStatus::Active))
            .await
            .unwrap();
        store
            .put(&record("passport", "IN", SchemaStatus::Deprecated))
            .await
            .unwrap();

        let active = export_schemas(&store, &ListFilter::new().with_status(SchemaStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active.schemas[0].country, "US");
    }

    #[test]
    fn test_checksum_ignores_identity_but_not_fields() {
        let a = record("passport", "US", SchemaStatus::Active);
        let mut b = record("passport", "US", SchemaStatus::InReview);
        b.version = 3;

        // Different ids, versions and statuses; same portable identity.
        let doc_a = SchemaDocument::from_record(&a);
        let doc_b = SchemaDocument::from_record(&b);
        assert_ne!(doc_a.id, doc_b.id);
        assert_eq!(doc_a.checksum, doc_b.checksum);

        let mut c = record("passport", "US", SchemaStatus::Active);
        c.fields.insert(
            "passport_number".to_string(),
            FieldDef::new(FieldType::String, "Passport number"),
        );
        assert_ne!(SchemaDocument::from_record(&c).checksum, doc_a.checksum);
    }
}
