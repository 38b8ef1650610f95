//! Structured snapshot: every section, every field or row, by label.
//!
//! The on-disk form is an envelope:
//!
//! ```json
//! { "version": 1, "saved_at": "2026-10-19T09:00:00+00:00",
//!   "sections": { "Time Control": [["TMSTRT", "1.000"], ["TMEND", null]],
//!                 "Calculations": [["VBC", "ON", "OFF"]] } }
//! ```
//!
//! Scalar payloads are `[label, value|null]` pairs, `null` meaning "never
//! set". Matrix payloads are `get_data` rows, `""` meaning "never set" for
//! numbers. A bare section mapping without the envelope is also accepted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::models::{OFF, ON};
use crate::section::{MatrixRow, ScalarPair, SectionKind, SectionPayload};

/// Current envelope version.
pub const SNAPSHOT_VERSION: u32 = 1;

const SNAPSHOT_SCHEMA: &str = include_str!("../../schemas/snapshot.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default)]
    pub saved_at: Option<String>,
    pub sections: Map<String, Value>,
}

/// Payloads ready for [`Engine::restore`](crate::engine::Engine::restore),
/// plus what had to be skipped or coerced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub payloads: Vec<(String, SectionPayload)>,
    pub warnings: Vec<String>,
}

// =============================================================================
// Encode
// =============================================================================

impl Snapshot {
    /// Capture every section in document order.
    pub fn capture(document: &Document) -> Self {
        let sections = document
            .sections()
            .iter()
            .map(|section| (section.name().to_string(), payload_to_json(&section.payload())))
            .collect();
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: None,
            sections,
        }
    }

    pub fn stamped(mut self, saved_at: impl Into<String>) -> Self {
        self.saved_at = Some(saved_at.into());
        self
    }

    pub fn to_json_string(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn payload_to_json(payload: &SectionPayload) -> Value {
    match payload {
        SectionPayload::Scalar(pairs) => Value::Array(
            pairs
                .iter()
                .map(|(label, value)| {
                    Value::Array(vec![
                        Value::String(label.clone()),
                        value.clone().map_or(Value::Null, Value::String),
                    ])
                })
                .collect(),
        ),
        SectionPayload::Matrix(rows) => Value::Array(
            rows.iter()
                .map(|row| Value::Array(row.iter().cloned().map(Value::String).collect()))
                .collect(),
        ),
    }
}

// =============================================================================
// Parse
// =============================================================================

impl Snapshot {
    /// Parse and validate snapshot text.
    pub fn parse(text: &str) -> StoreResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Accept an envelope or a bare section mapping.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        let envelope = match value {
            Value::Object(map) if map.contains_key("version") && map.contains_key("sections") => {
                Value::Object(map)
            }
            Value::Object(map) => serde_json::json!({
                "version": SNAPSHOT_VERSION,
                "saved_at": null,
                "sections": map,
            }),
            other => {
                return Err(StoreError::Schema {
                    errors: vec![format!("snapshot must be a JSON object, got {}", kind_of(&other))],
                })
            }
        };

        validate_envelope(&envelope)?;
        Ok(serde_json::from_value(envelope)?)
    }

    /// Turn section payloads into typed payloads for the document's sections.
    ///
    /// Unknown sections and malformed payloads are skipped with a warning.
    /// Non-string values are coerced: numbers to their decimal text, booleans
    /// to `ON`/`OFF`, `null` to "not set".
    pub fn decode(&self, document: &Document) -> Decoded {
        let mut decoded = Decoded::default();
        for (name, value) in &self.sections {
            let Ok(section) = document.get(name) else {
                decoded
                    .warnings
                    .push(format!("unknown section '{}' ignored", name));
                continue;
            };
            let payload = match section.kind() {
                SectionKind::Scalar => scalar_payload(name, value, &mut decoded.warnings),
                SectionKind::Matrix => matrix_payload(name, value, &mut decoded.warnings),
            };
            if let Some(payload) = payload {
                decoded.payloads.push((name.clone(), payload));
            }
        }
        decoded
    }
}

fn validate_envelope(envelope: &Value) -> StoreResult<()> {
    let schema: Value = serde_json::from_str(SNAPSHOT_SCHEMA)?;
    let validator = jsonschema::draft7::new(&schema).map_err(|e| StoreError::Schema {
        errors: vec![format!("invalid snapshot schema: {}", e)],
    })?;

    let errors: Vec<String> = validator
        .iter_errors(envelope)
        .map(|e| e.to_string())
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Schema { errors })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lenient cell text. `None` for `null` and for nested structures.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some((if *b { ON } else { OFF }).to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn scalar_payload(name: &str, value: &Value, warnings: &mut Vec<String>) -> Option<SectionPayload> {
    let pairs: Vec<ScalarPair> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(label, v)| (label.clone(), value_text(v)))
            .collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item.as_array().map(Vec::as_slice) {
                Some([Value::String(label), v]) => (label.clone(), value_text(v)),
                _ => {
                    warnings.push(format!("{}: malformed field entry {}", name, item));
                    (String::new(), None)
                }
            })
            .collect(),
        other => {
            warnings.push(format!(
                "{}: expected field pairs, got {}",
                name,
                kind_of(other)
            ));
            return None;
        }
    };
    Some(SectionPayload::Scalar(pairs))
}

fn matrix_payload(name: &str, value: &Value, warnings: &mut Vec<String>) -> Option<SectionPayload> {
    let Value::Array(items) = value else {
        warnings.push(format!("{}: expected matrix rows, got {}", name, kind_of(value)));
        return None;
    };
    let rows: Vec<MatrixRow> = items
        .iter()
        .map(|item| match item.as_array() {
            Some(cells) => cells
                .iter()
                .map(|v| value_text(v).unwrap_or_default())
                .collect(),
            None => {
                warnings.push(format!("{}: malformed row {}", name, item));
                Vec::new()
            }
        })
        .collect();
    Some(SectionPayload::Matrix(rows))
}
