//! Mock implementations for testing.
//!
//! Provides a scriptable [`MockDocumentAI`] so orchestrator and
//! integration tests can run without network access or model calls.
//! Configure responses with the `with_*` builders, flip `fail_*` to
//! exercise error paths, and inspect [`MockDocumentAI::calls`] to
//! assert which adapter operations ran.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

use crate::error::{AdapterError, AdapterResult};
use crate::traits::ai::DocumentAI;
use crate::types::classification::{
    Classification, DocumentFile, ExtractedFields, GeneratedSchema,
};
use crate::types::schema::{FieldDef, FieldMap, FieldType};

/// A recorded call made against [`MockDocumentAI`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Classify {
        file_count: usize,
    },
    ExtractFields {
        file_count: usize,
        field_count: usize,
    },
    GenerateSchema {
        document_type: String,
        country: String,
    },
}

/// Mock document AI with configurable responses and call tracking.
pub struct MockDocumentAI {
    classification: Classification,
    generated: GeneratedSchema,
    extraction_confidence: f64,
    fail_classification: bool,
    fail_extraction: bool,
    fail_generation: bool,
    calls: Mutex<Vec<MockCall>>,
}

impl Default for MockDocumentAI {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDocumentAI {
    pub fn new() -> Self {
        let mut fields = FieldMap::new();
        fields.insert(
            "full_name".to_string(),
            FieldDef::new(FieldType::String, "Full name as printed on the document"),
        );
        fields.insert(
            "document_number".to_string(),
            FieldDef::new(FieldType::String, "Primary document number"),
        );
        Self {
            classification: Classification::new("passport", "US", 0.95),
            generated: GeneratedSchema {
                fields,
                confidence: 0.9,
            },
            extraction_confidence: 0.9,
            fail_classification: false,
            fail_extraction: false,
            fail_generation: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Set the classification returned by `classify`.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    /// Set the schema returned by `generate_schema`.
    pub fn with_generated_schema(mut self, fields: FieldMap, confidence: f64) -> Self {
        self.generated = GeneratedSchema { fields, confidence };
        self
    }

    /// Set the confidence reported by `extract_fields`.
    pub fn with_extraction_confidence(mut self, confidence: f64) -> Self {
        self.extraction_confidence = confidence;
        self
    }

    /// Make `classify` fail with an upstream error.
    pub fn fail_classification(mut self) -> Self {
        self.fail_classification = true;
        self
    }

    /// Make `extract_fields` fail with an upstream error.
    pub fn fail_extraction(mut self) -> Self {
        self.fail_extraction = true;
        self
    }

    /// Make `generate_schema` fail with an upstream error.
    pub fn fail_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn upstream(what: &str) -> AdapterError {
    AdapterError::Upstream(Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!("mock {what} failure"),
    )))
}

fn placeholder_value(field: &FieldDef) -> Value {
    match field.field_type {
        FieldType::String => json!("example"),
        FieldType::Integer => json!(0),
        FieldType::Date => json!("2024-01-01"),
        FieldType::Boolean => json!(true),
        FieldType::Unrecognized => Value::Null,
    }
}

#[async_trait]
impl DocumentAI for MockDocumentAI {
    async fn classify(&self, files: &[DocumentFile]) -> AdapterResult<Classification> {
        self.record(MockCall::Classify {
            file_count: files.len(),
        });
        if self.fail_classification {
            return Err(upstream("classification"));
        }
        Ok(self.classification.clone())
    }

    async fn extract_fields(
        &self,
        files: &[DocumentFile],
        fields: &FieldMap,
    ) -> AdapterResult<ExtractedFields> {
        self.record(MockCall::ExtractFields {
            file_count: files.len(),
            field_count: fields.len(),
        });
        if self.fail_extraction {
            return Err(upstream("extraction"));
        }
        let values = fields
            .iter()
            .map(|(name, def)| (name.clone(), placeholder_value(def)))
            .collect();
        Ok(ExtractedFields {
            values,
            confidence: self.extraction_confidence,
        })
    }

    async fn generate_schema(
        &self,
        _files: &[DocumentFile],
        document_type: &str,
        country: &str,
    ) -> AdapterResult<GeneratedSchema> {
        self.record(MockCall::GenerateSchema {
            document_type: document_type.to_string(),
            country: country.to_string(),
        });
        if self.fail_generation {
            return Err(upstream("schema generation"));
        }
        Ok(self.generated.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<DocumentFile> {
        vec![DocumentFile::new(
            "doc.pdf",
            "application/pdf",
            b"%PDF-1.7".to_vec(),
        )]
    }

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let mock = MockDocumentAI::new();
        let classification = mock.classify(&files()).await.unwrap();
        mock.generate_schema(
            &files(),
            &classification.document_type,
            &classification.country,
        )
        .await
        .unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], MockCall::Classify { file_count: 1 });
        assert_eq!(
            calls[1],
            MockCall::GenerateSchema {
                document_type: "passport".to_string(),
                country: "US".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_extraction_covers_every_schema_field() {
        let mock = MockDocumentAI::new();
        let mut fields = FieldMap::new();
        fields.insert(
            "issue_date".to_string(),
            FieldDef::new(FieldType::Date, "Date of issue"),
        );
        fields.insert(
            "page_count".to_string(),
            FieldDef::new(FieldType::Integer, "Number of pages"),
        );

        let extracted = mock.extract_fields(&files(), &fields).await.unwrap();
        assert_eq!(extracted.values.len(), 2);
        assert_eq!(extracted.values["issue_date"], json!("2024-01-01"));
        assert_eq!(extracted.values["page_count"], json!(0));
    }

    #[tokio::test]
    async fn test_configured_failures() {
        let mock = MockDocumentAI::new().fail_classification();
        assert!(mock.classify(&files()).await.is_err());

        let mock = MockDocumentAI::new().fail_generation();
        assert!(mock.generate_schema(&files(), "passport", "US").await.is_err());
    }
}
