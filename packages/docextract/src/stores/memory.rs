//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::traits::store::SchemaStore;
use crate::types::config::ListFilter;
use crate::types::schema::{SchemaKey, SchemaRecord, SchemaStatus};

/// In-memory schema store.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, SchemaRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored records.
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }

    /// Get the number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<SchemaRecord>> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn find_by_key(
        &self,
        key: &SchemaKey,
        status: Option<SchemaStatus>,
    ) -> StoreResult<Vec<SchemaRecord>> {
        let mut matches: Vec<_> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| r.key() == *key && status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.version);
        Ok(matches)
    }

    async fn put(&self, record: &SchemaRecord) -> StoreResult<()> {
        self.records
            .write()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.records.write().unwrap().remove(&id).is_some())
    }

    async fn list_all(&self, filter: &ListFilter) -> StoreResult<Vec<SchemaRecord>> {
        let mut matches: Vec<_> = self
            .records
            .read()
            .unwrap()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matches.sort_by(|a, b| {
            (&a.document_type, &a.country, a.version).cmp(&(&b.document_type, &b.country, b.version))
        });
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::schema::{FieldDef, FieldMap, FieldType};

    fn record(document_type: &str, country: &str, version: u32) -> SchemaRecord {
        let mut fields = FieldMap::new();
        fields.insert(
            "full_name".to_string(),
            FieldDef::new(FieldType::String, "Full name"),
        );
        let mut record = SchemaRecord::new(SchemaKey::new(document_type, country), fields, None);
        record.version = version;
        record
    }

    #[tokio::test]
    async fn test_record_crud() {
        let store = MemoryStore::new();
        let r = record("passport", "US", 0);

        store.put(&r).await.unwrap();
        assert_eq!(store.record_count(), 1);

        let fetched = store.get(r.id).await.unwrap().unwrap();
        assert_eq!(fetched.document_type, "passport");

        assert!(store.delete(r.id).await.unwrap());
        assert!(!store.delete(r.id).await.unwrap());
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_find_by_key_orders_by_version() {
        let store = MemoryStore::new();
        let mut v1 = record("passport", "US", 1);
        v1.status = SchemaStatus::InReview;
        let mut v0 = record("passport", "US", 0);
        v0.status = SchemaStatus::Active;

        store.put(&v1).await.unwrap();
        store.put(&v0).await.unwrap();
        store.put(&record("passport", "IN", 0)).await.unwrap();

        let key = SchemaKey::new("passport", "US");
        let all = store.find_by_key(&key, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].version, 0);
        assert_eq!(all[1].version, 1);

        let active = store
            .find_by_key(&key, Some(SchemaStatus::Active))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, v0.id);
    }

    #[tokio::test]
    async fn test_list_all_with_filter() {
        let store = MemoryStore::new();
        store.put(&record("passport", "US", 0)).await.unwrap();
        store.put(&record("passport", "IN", 0)).await.unwrap();
        store.put(&record("invoice", "US", 0)).await.unwrap();

        let all = store.list_all(&ListFilter::new()).await.unwrap();
        assert_eq!(all.len(), 3);

        let passports = store
            .list_all(&ListFilter::new().with_document_type("passport"))
            .await
            .unwrap();
        assert_eq!(passports.len(), 2);

        let us_invoices = store
            .list_all(
                &ListFilter::new()
                    .with_document_type("invoice")
                    .with_country("us"),
            )
            .await
            .unwrap();
        assert_eq!(us_invoices.len(), 1);
    }
}
