//! Orchestrator configuration and list filters.

use crate::types::schema::{normalize_document_type, SchemaRecord, SchemaStatus};

/// Default acceptance threshold for classification confidence.
pub const DEFAULT_MIN_CLASSIFICATION_CONFIDENCE: f64 = 0.8;

/// Tuning knobs for the extraction orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Classifications below this confidence are rejected before the
    /// registry is consulted.
    pub min_classification_confidence: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            min_classification_confidence: DEFAULT_MIN_CLASSIFICATION_CONFIDENCE,
        }
    }
}

impl OrchestratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification acceptance threshold.
    pub fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_classification_confidence = threshold;
        self
    }

    /// Read overrides from the environment.
    ///
    /// Honors `MIN_CLASSIFICATION_CONFIDENCE`; anything unparsable is
    /// ignored in favor of the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("MIN_CLASSIFICATION_CONFIDENCE") {
            if let Ok(threshold) = raw.parse() {
                config.min_classification_confidence = threshold;
            }
        }
        config
    }
}

/// Filters for list and export queries.
///
/// All criteria are conjunctive; an empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<SchemaStatus>,
    pub document_type: Option<String>,
    pub country: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: SchemaStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by document type (normalized like registration input).
    pub fn with_document_type(mut self, document_type: &str) -> Self {
        self.document_type = Some(normalize_document_type(document_type));
        self
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = Some(country.trim().to_uppercase());
        self
    }

    /// Whether a record satisfies every criterion.
    pub fn matches(&self, record: &SchemaRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(document_type) = &self.document_type {
            if &record.document_type != document_type {
                return false;
            }
        }
        if let Some(country) = &self.country {
            if &record.country != country {
                return false;
            }
        }
        true
    }
}
