//! Schema records - the unit of registration.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered field-name to definition map.
///
/// Order is preserved from registration through extraction and export.
pub type FieldMap = IndexMap<String, FieldDef>;

/// Lifecycle status of a schema record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaStatus {
    /// Awaiting human approval; not usable for extraction.
    InReview,

    /// The single version authorized for extraction for its key.
    Active,

    /// Superseded or retired; retained for history only.
    Deprecated,
}

impl SchemaStatus {
    /// Get the string representation (for database storage).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InReview => "in_review",
            Self::Active => "active",
            Self::Deprecated => "deprecated",
        }
    }
}

impl std::fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SchemaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_review" => Ok(Self::InReview),
            "active" => Ok(Self::Active),
            "deprecated" => Ok(Self::Deprecated),
            _ => Err(format!("Unknown schema status: {}", s)),
        }
    }
}

/// Supported field value types.
///
/// A closed set. Anything else an adapter emits deserializes to
/// `Unrecognized` and is rejected at the registry boundary rather than
/// trusted from the generation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Date,
    Boolean,

    /// Fallback for types this registry does not support.
    #[serde(other)]
    Unrecognized,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a single extractable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Value type the extractor should produce.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// What the field means on the document.
    pub description: String,

    /// Whether extraction must produce a value for this field.
    #[serde(default = "default_required")]
    pub required: bool,

    /// Example value, as guidance for the extraction capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Optional regex the extracted value should match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

fn default_required() -> bool {
    true
}

impl FieldDef {
    /// Create a required field definition.
    pub fn new(field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            field_type,
            description: description.into(),
            required: true,
            example: None,
            pattern: None,
        }
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set an example value.
    pub fn with_example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Set a validation pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// Partial update to an existing field definition.
///
/// `None` members leave the corresponding part of the definition
/// untouched (shallow merge).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Apply the patch onto an existing definition.
    pub fn apply(&self, def: &mut FieldDef) {
        if let Some(field_type) = self.field_type {
            def.field_type = field_type;
        }
        if let Some(description) = &self.description {
            def.description = description.clone();
        }
        if let Some(required) = self.required {
            def.required = required;
        }
        if let Some(example) = &self.example {
            def.example = Some(example.clone());
        }
        if let Some(pattern) = &self.pattern {
            def.pattern = Some(pattern.clone());
        }
    }
}

/// Normalized (document_type, country) identity of a schema lineage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaKey {
    pub document_type: String,
    pub country: String,
}

impl SchemaKey {
    /// Create a key, normalizing both parts: document types are
    /// lowercased with whitespace collapsed to underscores
    /// ("US Passport" becomes "us_passport"), countries are uppercased
    /// ISO codes.
    pub fn new(document_type: &str, country: &str) -> Self {
        Self {
            document_type: normalize_document_type(document_type),
            country: country.trim().to_uppercase(),
        }
    }
}

impl std::fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.document_type, self.country)
    }
}

/// Normalize a raw document type label into its canonical form.
pub(crate) fn normalize_document_type(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// The unit of registration: one versioned field schema for one key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaRecord {
    /// Opaque unique id, assigned at creation, never reused.
    pub id: Uuid,

    pub document_type: String,

    pub country: String,

    /// Starts at 0, incremented by each modification that produces a
    /// new generation. Monotonically non-decreasing across a lineage.
    pub version: u32,

    pub status: SchemaStatus,

    /// Ordered field definitions.
    pub fields: FieldMap,

    /// Confidence reported by the generation capability, when the
    /// record was produced from documents rather than supplied by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl SchemaRecord {
    /// Create a fresh record: version 0, in review.
    pub fn new(key: SchemaKey, fields: FieldMap, confidence: Option<f64>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document_type: key.document_type,
            country: key.country,
            version: 0,
            status: SchemaStatus::InReview,
            fields,
            confidence,
            created_at: now,
            updated_at: now,
        }
    }

    /// The normalized key this record belongs to.
    pub fn key(&self) -> SchemaKey {
        SchemaKey::new(&self.document_type, &self.country)
    }

    /// Identity-and-status view for error payloads and responses.
    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            id: self.id,
            document_type: self.document_type.clone(),
            country: self.country.clone(),
            version: self.version,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Refresh `updated_at` after a state mutation.
    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Identity and status of a record, carried inside conflict and
/// not-approved errors so callers can decide the next action without a
/// follow-up lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub id: Uuid,
    pub document_type: String,
    pub country: String,
    pub version: u32,
    pub status: SchemaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
