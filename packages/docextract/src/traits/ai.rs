//! Adapter trait for the external document AI capabilities.
//!
//! The registry and orchestrator never talk to a model directly. They
//! consume three opaque operations - classify, extract, generate -
//! implemented elsewhere (OpenAI, Gemini, a test mock). Implementations
//! handle prompting, parsing and upstream specifics; this crate only
//! fixes the contract.

use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::types::classification::{Classification, DocumentFile, ExtractedFields, GeneratedSchema};
use crate::types::schema::FieldMap;

/// External document intelligence boundary.
///
/// Calls may block on network/model latency; the orchestrator issues
/// them outside any registry lock.
#[async_trait]
pub trait DocumentAI: Send + Sync {
    /// Determine document type and issuing country for a batch of
    /// related files, with a confidence score.
    ///
    /// How a multi-file batch collapses to a single classification
    /// (majority, first page) is the implementation's decision.
    async fn classify(&self, files: &[DocumentFile]) -> AdapterResult<Classification>;

    /// Infer values for the given field definitions from the documents.
    async fn extract_fields(
        &self,
        files: &[DocumentFile],
        fields: &FieldMap,
    ) -> AdapterResult<ExtractedFields>;

    /// Infer a field schema for documents of a known type and country.
    async fn generate_schema(
        &self,
        files: &[DocumentFile],
        document_type: &str,
        country: &str,
    ) -> AdapterResult<GeneratedSchema>;
}
