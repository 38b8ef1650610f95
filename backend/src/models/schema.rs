//! Field and row descriptors.

use serde::{Deserialize, Serialize};

use super::cell::CellType;

/// Default lower bound of numeric fields.
pub const DEFAULT_MIN: f64 = 0.0;
/// Default upper bound of numeric fields.
pub const DEFAULT_MAX: f64 = 999_999.0;

/// Inclusive numeric bounds. Ignored by non-numeric types.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn min_integer(&self) -> i64 {
        self.min.ceil() as i64
    }

    pub fn max_integer(&self) -> i64 {
        self.max.floor() as i64
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

/// Declarative description of a scalar field or a matrix row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Label, unique within its section.
    pub label: String,

    /// Value kind.
    #[serde(flatten)]
    pub cell_type: CellType,

    /// Numeric bounds.
    #[serde(default)]
    pub bounds: Bounds,

    /// Human description shown next to the input.
    #[serde(default)]
    pub description: String,

    /// Generated at runtime (row groups) rather than declared statically.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

/// A matrix row uses the same descriptor as a scalar field.
pub type RowSchema = FieldSchema;

impl FieldSchema {
    /// Create a schema of any type with default bounds.
    pub fn new(label: impl Into<String>, cell_type: CellType) -> Self {
        Self {
            label: label.into(),
            cell_type,
            bounds: Bounds::default(),
            description: String::new(),
            synthetic: false,
        }
    }

    pub fn text(label: impl Into<String>) -> Self {
        Self::new(label, CellType::Text)
    }

    pub fn boolean(label: impl Into<String>) -> Self {
        Self::new(label, CellType::Boolean)
    }

    pub fn integer(label: impl Into<String>) -> Self {
        Self::new(label, CellType::Integer)
    }

    pub fn decimal(label: impl Into<String>, precision: u32) -> Self {
        Self::new(label, CellType::Decimal { precision })
    }

    /// Dropdown over `options`. A blank placeholder is inserted at index 0
    /// unless the list already starts with one.
    pub fn enumerated(label: impl Into<String>, options: &[&str]) -> Self {
        let mut list: Vec<String> = Vec::with_capacity(options.len() + 1);
        if options.first().map_or(true, |first| !first.is_empty()) {
            list.push(String::new());
        }
        list.extend(options.iter().map(|o| o.to_string()));
        Self::new(label, CellType::Enumerated { options: list })
    }

    pub fn file_ref(label: impl Into<String>) -> Self {
        Self::new(label, CellType::FileRef)
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.bounds.min = min;
        self
    }

    /// Set the upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.bounds.max = max;
        self
    }

    /// Mark as a runtime-generated row.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Copy of this schema under another label.
    pub fn relabel(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enumerated_inserts_placeholder_once() {
        let schema = FieldSchema::enumerated("GRIDC", &["RECT", "TRAP"]);
        assert_eq!(
            schema.cell_type,
            CellType::Enumerated {
                options: vec!["".into(), "RECT".into(), "TRAP".into()]
            }
        );

        let schema = FieldSchema::enumerated("GRIDC", &["", "RECT"]);
        assert_eq!(
            schema.cell_type,
            CellType::Enumerated {
                options: vec!["".into(), "RECT".into()]
            }
        );
    }

    #[test]
    fn test_builder_chain() {
        let schema = FieldSchema::decimal("SLOPE", 4)
            .describe("Actual slope")
            .min(-1.0)
            .max(1.0);
        assert_eq!(schema.bounds, Bounds { min: -1.0, max: 1.0 });
        assert_eq!(schema.description, "Actual slope");
        assert!(!schema.synthetic);

        let copy = schema.relabel("SLOPEC").synthetic();
        assert_eq!(copy.label, "SLOPEC");
        assert!(copy.synthetic);
        assert_eq!(copy.bounds, schema.bounds);
    }

    #[test]
    fn test_schema_serialization() {
        let schema = FieldSchema::decimal("DLTMIN", 5).describe("Minimum timestep, sec");
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["label"], json!("DLTMIN"));
        assert_eq!(value["type"], json!("decimal"));
        assert_eq!(value["precision"], json!(5));
        assert!(value.get("synthetic").is_none());

        let parsed: FieldSchema = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, schema);
    }
}
