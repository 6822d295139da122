//! Field-level change tracking for schema modifications.

use serde::{Deserialize, Serialize};

use crate::types::schema::{FieldDef, FieldMap};

/// What happened to a single field between two schema generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    FieldAdded,
    FieldUpdated,
    FieldRemoved,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldAdded => "field_added",
            Self::FieldUpdated => "field_updated",
            Self::FieldRemoved => "field_removed",
        }
    }
}

/// One field-level difference between a source schema and its revision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaChange {
    pub kind: ChangeKind,

    pub field_name: String,

    /// Previous definition (updates and removals).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<FieldDef>,

    /// New definition (additions and updates).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<FieldDef>,
}

/// Diff two field maps into an ordered change list.
///
/// Additions and updates follow the modified map's order, removals the
/// original's.
pub fn diff_fields(original: &FieldMap, modified: &FieldMap) -> Vec<SchemaChange> {
    let mut changes = Vec::new();

    for (name, def) in modified {
        match original.get(name) {
            None => changes.push(SchemaChange {
                kind: ChangeKind::FieldAdded,
                field_name: name.clone(),
                old_value: None,
                new_value: Some(def.clone()),
            }),
            Some(old) if old != def => changes.push(SchemaChange {
                kind: ChangeKind::FieldUpdated,
                field_name: name.clone(),
                old_value: Some(old.clone()),
                new_value: Some(def.clone()),
            }),
            Some(_) => {}
        }
    }

    for (name, def) in original {
        if !modified.contains_key(name) {
            changes.push(SchemaChange {
                kind: ChangeKind::FieldRemoved,
                field_name: name.clone(),
                old_value: Some(def.clone()),
                new_value: None,
            });
        }
    }

    changes
}

/// One-line human summary of a change list, e.g.
/// `"Added 2 field(s): issue_date, expiry_date; Removed 1 field(s): mrz"`.
pub fn summarize_changes(changes: &[SchemaChange]) -> String {
    if changes.is_empty() {
        return "No changes detected".to_string();
    }

    let mut parts = Vec::new();
    for (kind, verb) in [
        (ChangeKind::FieldAdded, "Added"),
        (ChangeKind::FieldUpdated, "Updated"),
        (ChangeKind::FieldRemoved, "Removed"),
    ] {
        let names: Vec<&str> = changes
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.field_name.as_str())
            .collect();
        if !names.is_empty() {
            parts.push(format!(
                "{} {} field(s): {}",
                verb,
                names.len(),
                names.join(", ")
            ));
        }
    }

    parts.join("; ")
}
