//! The extraction orchestrator - sequences classification, registry
//! lookup and extraction or schema generation.
//!
//! Three entry operations, each with its own policy:
//!
//! - [`Orchestrator::register_only`] - classify and park a generated
//!   schema for review; never extracts
//! - [`Orchestrator::extract_if_approved`] - extract strictly with an
//!   approved schema, or fail naming what is missing or pending
//! - [`Orchestrator::extract_or_generate`] - the permissive legacy
//!   path: extract when approved, otherwise generate a schema for
//!   review instead of failing
//!
//! All three share one entry step: classification plus the acceptance
//! threshold. Adapter calls are issued outside any registry lock, and
//! adapter failures never mutate registry state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ConflictKind, OrchestrationError, OrchestrationResult, RegistryError};
use crate::registry::SchemaRegistry;
use crate::traits::{ai::DocumentAI, store::SchemaStore};
use crate::types::classification::{Classification, DocumentFile};
use crate::types::config::OrchestratorConfig;
use crate::types::schema::{SchemaRecord, SchemaSummary};

/// Routes uploaded documents through classification and schema-driven
/// extraction.
///
/// Generic over storage and the document AI implementation to allow
/// mocking in tests:
/// - Production: `Orchestrator<PostgresStore, OpenAiDocumentAI>`
/// - Testing: `Orchestrator<MemoryStore, MockDocumentAI>`
pub struct Orchestrator<S: SchemaStore, A: DocumentAI> {
    registry: SchemaRegistry<S>,
    ai: A,
    config: OrchestratorConfig,
}

impl<S: SchemaStore, A: DocumentAI> Orchestrator<S, A> {
    /// Create an orchestrator with default configuration.
    pub fn new(registry: SchemaRegistry<S>, ai: A) -> Self {
        Self::with_config(registry, ai, OrchestratorConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(registry: SchemaRegistry<S>, ai: A, config: OrchestratorConfig) -> Self {
        Self {
            registry,
            ai,
            config,
        }
    }

    /// Get a reference to the underlying registry.
    pub fn registry(&self) -> &SchemaRegistry<S> {
        &self.registry
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Classify the documents and register a generated schema for
    /// review. Never invokes field extraction.
    ///
    /// On a conflict the error carries the existing record's summary so
    /// the caller can approve it or pick a different key.
    pub async fn register_only(
        &self,
        files: &[DocumentFile],
    ) -> OrchestrationResult<RegisteredSchema> {
        let classification = self.classify(files).await?;
        let generated = self
            .ai
            .generate_schema(
                files,
                &classification.document_type,
                &classification.country,
            )
            .await
            .map_err(OrchestrationError::SchemaGenerationFailed)?;

        let record = self
            .registry
            .register(
                &classification.document_type,
                &classification.country,
                generated.fields,
                Some(generated.confidence),
            )
            .await?;

        info!(id = %record.id, key = %record.key(), "schema registered for review");
        Ok(RegisteredSchema {
            classification,
            record,
        })
    }

    /// Classify, then extract only if an approved schema exists.
    ///
    /// Fails with `SchemaNotFound` when no record exists for the key at
    /// all, and `SchemaNotApproved` (carrying the pending record) when
    /// one is still in review.
    pub async fn extract_if_approved(
        &self,
        files: &[DocumentFile],
    ) -> OrchestrationResult<ExtractedDocument> {
        let classification = self.classify(files).await?;
        let lookup = self
            .registry
            .lookup_any(&classification.document_type, &classification.country)
            .await?;

        let active = match (lookup.active, lookup.in_review) {
            (Some(active), _) => active,
            (None, Some(pending)) => {
                return Err(OrchestrationError::SchemaNotApproved {
                    pending: pending.summary(),
                    classification,
                })
            }
            (None, None) => return Err(OrchestrationError::SchemaNotFound { classification }),
        };

        self.extract_with(files, classification, active).await
    }

    /// Legacy permissive path: extract when an approved schema exists,
    /// otherwise generate a schema and park it for review.
    ///
    /// A schema pending review is reported as an outcome, not an error;
    /// the caller already knows a schema is on its way.
    pub async fn extract_or_generate(
        &self,
        files: &[DocumentFile],
    ) -> OrchestrationResult<ExtractionOutcome> {
        let classification = self.classify(files).await?;

        if let Some(active) = self
            .registry
            .lookup_active(&classification.document_type, &classification.country)
            .await?
        {
            let extracted = self.extract_with(files, classification, active).await?;
            return Ok(ExtractionOutcome::Extracted(extracted));
        }

        let generated = self
            .ai
            .generate_schema(
                files,
                &classification.document_type,
                &classification.country,
            )
            .await
            .map_err(OrchestrationError::SchemaGenerationFailed)?;

        // Registration, not extraction: a human approves the generated
        // schema before its first use.
        match self
            .registry
            .register(
                &classification.document_type,
                &classification.country,
                generated.fields,
                Some(generated.confidence),
            )
            .await
        {
            Ok(record) => {
                info!(id = %record.id, key = %record.key(), "generated schema awaiting review");
                Ok(ExtractionOutcome::SchemaGenerated {
                    classification,
                    record,
                })
            }
            Err(RegistryError::Conflict {
                kind: ConflictKind::AlreadyInReview,
                existing,
            }) => Ok(ExtractionOutcome::PendingReview {
                classification,
                pending: existing,
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// Shared entry step: classification plus the acceptance threshold.
    /// Below-threshold classifications never reach the registry.
    async fn classify(&self, files: &[DocumentFile]) -> OrchestrationResult<Classification> {
        let classification = self
            .ai
            .classify(files)
            .await
            .map_err(OrchestrationError::ClassificationFailed)?;

        debug!(
            document_type = %classification.document_type,
            country = %classification.country,
            confidence = classification.confidence,
            "classified documents"
        );

        if classification.confidence < self.config.min_classification_confidence {
            return Err(OrchestrationError::ClassificationBelowThreshold {
                classification,
                threshold: self.config.min_classification_confidence,
            });
        }
        Ok(classification)
    }

    async fn extract_with(
        &self,
        files: &[DocumentFile],
        classification: Classification,
        schema: SchemaRecord,
    ) -> OrchestrationResult<ExtractedDocument> {
        let extracted = self
            .ai
            .extract_fields(files, &schema.fields)
            .await
            .map_err(OrchestrationError::ExtractionFailed)?;

        debug!(
            schema_id = %schema.id,
            version = schema.version,
            field_count = schema.fields.len(),
            confidence = extracted.confidence,
            "extracted document fields"
        );

        Ok(ExtractedDocument {
            data: extracted.values,
            confidence: extracted.confidence,
            classification,
            schema_used: schema,
        })
    }
}

/// Result of `register_only`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredSchema {
    pub classification: Classification,
    pub record: SchemaRecord,
}

/// A successful schema-driven extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Field name to extracted value.
    pub data: serde_json::Map<String, serde_json::Value>,

    /// Extraction confidence between 0 and 1.
    pub confidence: f64,

    pub classification: Classification,

    /// The active schema the values were extracted with.
    pub schema_used: SchemaRecord,
}

/// Result of the permissive `extract_or_generate` path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// An approved schema existed; values were extracted with it.
    Extracted(ExtractedDocument),

    /// No schema existed; one was generated and parked for review.
    /// Extraction was not performed.
    SchemaGenerated {
        classification: Classification,
        record: SchemaRecord,
    },

    /// A schema for the key was already awaiting approval.
    PendingReview {
        classification: Classification,
        pending: SchemaSummary,
    },
}
