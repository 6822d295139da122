//! Document Schema Registry and Extraction Orchestration Library
//!
//! Maintains versioned field-extraction schemas keyed by document type
//! and issuing country, and routes uploaded documents through
//! classification, schema lookup and extraction or schema generation.
//!
//! # Design Philosophy
//!
//! **"Schemas are approved, not guessed"**
//!
//! - Every schema enters review before its first extraction
//! - One active and at most one pending schema per key, enforced
//!   under per-key locks
//! - Versions only move forward; deprecated history is kept
//! - Adapter calls (classification, extraction, generation) happen
//!   outside registry locks and never mutate registry state on failure
//! - Library handles lifecycle mechanics, the adapter handles models
//!
//! # Usage
//!
//! ```rust,ignore
//! use docextract::{MemoryStore, Orchestrator, SchemaRegistry};
//! use docextract::testing::MockDocumentAI;
//!
//! // Initialize with storage backend and a document AI adapter
//! let registry = SchemaRegistry::new(MemoryStore::new());
//! let orchestrator = Orchestrator::new(registry, MockDocumentAI::new());
//!
//! // Register a generated schema for review (never extracts)
//! let registered = orchestrator.register_only(&files).await?;
//!
//! // Approve it, then extract strictly against approved schemas
//! orchestrator.registry().approve(registered.record.id).await?;
//! let extracted = orchestrator.extract_if_approved(&files).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (DocumentAI, SchemaStore)
//! - [`types`] - Schema, classification and configuration types
//! - [`registry`] - The approval and versioning state machine
//! - [`orchestrator`] - Classification-to-extraction sequencing
//! - [`export`] - Portable schema export for backup and migration
//! - [`stores`] - Storage implementations (MemoryStore, PostgresStore)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod export;
pub mod orchestrator;
pub mod registry;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    AdapterError, ConflictKind, OrchestrationError, RegistryError, StoreError,
};
pub use traits::{ai::DocumentAI, store::SchemaStore};
pub use types::{
    classification::{
        AlternativeType, Classification, DocumentFile, ExtractedFields, GeneratedSchema,
    },
    config::{ListFilter, OrchestratorConfig, DEFAULT_MIN_CLASSIFICATION_CONFIDENCE},
    schema::{
        FieldDef, FieldMap, FieldPatch, FieldType, SchemaKey, SchemaRecord, SchemaStatus,
        SchemaSummary,
    },
};

// Re-export the registry state machine
pub use registry::{
    changes::{diff_fields, summarize_changes, ChangeKind, SchemaChange},
    KeyLookup, Modification, SchemaRegistry,
};

// Re-export orchestration
pub use orchestrator::{
    ExtractedDocument, ExtractionOutcome, Orchestrator, RegisteredSchema,
};

// Re-export export
pub use export::{export_schemas, fingerprint, SchemaDocument, SchemaExport};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresStore;

// Re-export testing utilities
pub use testing::{MockCall, MockDocumentAI};
