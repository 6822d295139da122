//! Types exchanged with the external document AI capabilities.

use serde::{Deserialize, Serialize};

use crate::types::schema::{FieldMap, SchemaKey};

/// An uploaded document handed to the adapters.
///
/// The orchestrator treats the bytes as opaque; parsing PDFs or images
/// is the adapter's problem.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Result of classifying a document (or batch of related files).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub document_type: String,

    /// ISO country code of the issuing country.
    pub country: String,

    /// Confidence between 0 and 1.
    pub confidence: f64,

    /// Runner-up document types, for callers handling a below-threshold
    /// classification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<AlternativeType>,
}

impl Classification {
    pub fn new(
        document_type: impl Into<String>,
        country: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            document_type: document_type.into(),
            country: country.into(),
            confidence,
            alternatives: Vec::new(),
        }
    }

    /// Add a runner-up type.
    pub fn with_alternative(mut self, document_type: impl Into<String>, confidence: f64) -> Self {
        self.alternatives.push(AlternativeType {
            document_type: document_type.into(),
            confidence,
        });
        self
    }

    /// The registry key this classification resolves to.
    pub fn key(&self) -> SchemaKey {
        SchemaKey::new(&self.document_type, &self.country)
    }
}

/// A runner-up document type with its confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativeType {
    pub document_type: String,
    pub confidence: f64,
}

/// Field values inferred by the extraction capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFields {
    /// Field name to extracted value.
    pub values: serde_json::Map<String, serde_json::Value>,

    /// Confidence between 0 and 1 for the extraction as a whole.
    pub confidence: f64,
}

/// Field schema inferred by the generation capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSchema {
    pub fields: FieldMap,
    pub confidence: f64,
}
