//! Typed cell values.
//!
//! A cell is a [`CellValue`] plus a *touched* flag. The flag separates
//! "the user entered the minimum" from "the field was never edited", which
//! both hold the same raw number.

use serde::{Deserialize, Serialize};

use crate::error::CellParseError;

use super::schema::{Bounds, FieldSchema};

/// Literal used for a checked boolean.
pub const ON: &str = "ON";
/// Literal used for an unchecked boolean.
pub const OFF: &str = "OFF";

// =============================================================================
// Cell Type
// =============================================================================

/// The closed set of value kinds a field or row may hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellType {
    /// Free text.
    Text,
    /// ON/OFF switch.
    Boolean,
    /// Whole number within the schema bounds.
    Integer,
    /// Fixed-precision number within the schema bounds.
    Decimal { precision: u32 },
    /// One of a list of options. Index 0 is the placeholder.
    Enumerated { options: Vec<String> },
    /// Path to an input file.
    FileRef,
}

impl CellType {
    /// Short name used in listings.
    pub fn name(&self) -> &'static str {
        match self {
            CellType::Text => "text",
            CellType::Boolean => "boolean",
            CellType::Integer => "integer",
            CellType::Decimal { .. } => "decimal",
            CellType::Enumerated { .. } => "enumerated",
            CellType::FileRef => "file",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CellType::Integer | CellType::Decimal { .. })
    }

    /// The value meaning "not set".
    pub fn empty_value(&self, bounds: &Bounds) -> CellValue {
        match self {
            CellType::Text => CellValue::Text(String::new()),
            CellType::Boolean => CellValue::Boolean(false),
            CellType::Integer => CellValue::Integer(bounds.min_integer()),
            CellType::Decimal { precision } => {
                CellValue::Decimal(round_to(bounds.min, *precision))
            }
            CellType::Enumerated { .. } => CellValue::Enumerated(0),
            CellType::FileRef => CellValue::FileRef(String::new()),
        }
    }

    /// Bring a raw value inside the type's domain.
    ///
    /// Returns `None` (the empty marker) when the value means "not set" or
    /// does not belong to this type at all.
    pub fn normalize(&self, raw: CellValue, bounds: &Bounds) -> Option<CellValue> {
        match (self, raw) {
            (CellType::Text, CellValue::Text(s)) => {
                (!s.is_empty()).then_some(CellValue::Text(s))
            }
            (CellType::FileRef, CellValue::FileRef(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| CellValue::FileRef(trimmed.to_string()))
            }
            (CellType::Boolean, CellValue::Boolean(b)) => Some(CellValue::Boolean(b)),
            (CellType::Integer, CellValue::Integer(i)) => Some(CellValue::Integer(
                i.clamp(bounds.min_integer(), bounds.max_integer()),
            )),
            (CellType::Decimal { precision }, CellValue::Decimal(d)) if d.is_finite() => {
                Some(CellValue::Decimal(round_to(
                    d.clamp(bounds.min, bounds.max),
                    *precision,
                )))
            }
            (CellType::Enumerated { options }, CellValue::Enumerated(index)) => {
                (index > 0 && index < options.len()).then_some(CellValue::Enumerated(index))
            }
            _ => None,
        }
    }

    /// Textual form used by both serializations.
    pub fn encode(&self, value: &CellValue) -> String {
        match (self, value) {
            (_, CellValue::Text(s)) | (_, CellValue::FileRef(s)) => s.clone(),
            (_, CellValue::Boolean(b)) => (if *b { ON } else { OFF }).to_string(),
            (_, CellValue::Integer(i)) => i.to_string(),
            (CellType::Decimal { precision }, CellValue::Decimal(d)) => {
                format!("{:.*}", *precision as usize, d)
            }
            (_, CellValue::Decimal(d)) => d.to_string(),
            (CellType::Enumerated { options }, CellValue::Enumerated(index)) => {
                options.get(*index).cloned().unwrap_or_default()
            }
            (_, CellValue::Enumerated(_)) => String::new(),
        }
    }

    /// Parse the textual form.
    ///
    /// An empty (or blank) string decodes to `Ok(None)`: the empty marker.
    /// The returned value is not yet clamped; see [`CellType::normalize`].
    pub fn decode(&self, text: &str) -> Result<Option<CellValue>, CellParseError> {
        let trimmed = text.trim();
        match self {
            CellType::Text => Ok((!text.is_empty()).then(|| CellValue::Text(text.to_string()))),
            CellType::FileRef => {
                Ok((!trimmed.is_empty()).then(|| CellValue::FileRef(trimmed.to_string())))
            }
            CellType::Boolean => Ok(Some(CellValue::Boolean(trimmed == ON))),
            CellType::Integer if trimmed.is_empty() => Ok(None),
            CellType::Integer => trimmed
                .parse::<i64>()
                .map(|i| Some(CellValue::Integer(i)))
                .map_err(|_| CellParseError::InvalidInteger(text.to_string())),
            CellType::Decimal { .. } if trimmed.is_empty() => Ok(None),
            CellType::Decimal { .. } => match trimmed.parse::<f64>() {
                Ok(d) if d.is_finite() => Ok(Some(CellValue::Decimal(d))),
                _ => Err(CellParseError::InvalidDecimal(text.to_string())),
            },
            CellType::Enumerated { options } => {
                if trimmed.is_empty() {
                    return Ok(None);
                }
                options
                    .iter()
                    .position(|o| o == trimmed)
                    .map(|index| Some(CellValue::Enumerated(index)))
                    .ok_or_else(|| CellParseError::UnknownOption {
                        text: text.to_string(),
                        options: options.iter().skip(1).cloned().collect::<Vec<_>>().join(", "),
                    })
            }
        }
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

// =============================================================================
// Cell Value
// =============================================================================

/// A raw value tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Decimal(f64),
    /// Index into the option list.
    Enumerated(usize),
    FileRef(String),
}

impl CellValue {
    /// Integer view used by the dependency engine. Anything else counts as 0.
    pub fn as_count(&self) -> i64 {
        match self {
            CellValue::Integer(i) => *i,
            CellValue::Decimal(d) => d.trunc() as i64,
            CellValue::Text(s) | CellValue::FileRef(s) => s.trim().parse().unwrap_or(0),
            CellValue::Boolean(_) | CellValue::Enumerated(_) => 0,
        }
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A value slot with its touched flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub touched: bool,
}

impl Cell {
    /// A cell at the schema's empty sentinel.
    pub fn empty(schema: &FieldSchema) -> Self {
        Self {
            value: schema.cell_type.empty_value(&schema.bounds),
            touched: false,
        }
    }

    /// Reset to the empty sentinel.
    pub fn clear(&mut self, schema: &FieldSchema) {
        *self = Cell::empty(schema);
    }

    /// Store a typed value, normalizing it first.
    ///
    /// Numbers are touched by any explicit store. Other kinds are touched
    /// only while they differ from their empty sentinel.
    pub fn set_value(&mut self, value: CellValue, schema: &FieldSchema) {
        match schema.cell_type.normalize(value, &schema.bounds) {
            Some(value) => {
                self.touched = schema.cell_type.is_numeric()
                    || value != schema.cell_type.empty_value(&schema.bounds);
                self.value = value;
            }
            None => self.clear(schema),
        }
    }

    /// Store the textual form.
    ///
    /// Malformed numbers fall back to the minimum and unknown options to the
    /// placeholder; both leave the cell untouched. The parse error is returned
    /// for callers that want to report it.
    pub fn set_text(&mut self, text: &str, schema: &FieldSchema) -> Option<CellParseError> {
        match schema.cell_type.decode(text) {
            Ok(Some(value)) => {
                self.set_value(value, schema);
                None
            }
            Ok(None) => {
                self.clear(schema);
                None
            }
            Err(err) => {
                self.clear(schema);
                Some(err)
            }
        }
    }

    /// Whether this cell holds user input worth reporting.
    pub fn is_set(&self, schema: &FieldSchema) -> bool {
        match &schema.cell_type {
            CellType::Boolean => true,
            CellType::Integer | CellType::Decimal { .. } => self.touched,
            _ => schema
                .cell_type
                .normalize(self.value.clone(), &schema.bounds)
                .is_some(),
        }
    }

    /// Scalar-section view: `None` when not set. Booleans are never `None`.
    pub fn scalar_text(&self, schema: &FieldSchema) -> Option<String> {
        self.is_set(schema)
            .then(|| schema.cell_type.encode(&self.value))
    }

    /// Matrix-section view: untouched numbers encode as `""`.
    pub fn matrix_text(&self, schema: &FieldSchema) -> String {
        if schema.cell_type.is_numeric() && !self.touched {
            return String::new();
        }
        schema.cell_type.encode(&self.value)
    }

    /// Count used by dependency rules; untouched cells count as 0.
    pub fn count(&self, schema: &FieldSchema) -> i64 {
        if self.is_set(schema) {
            self.value.as_count()
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integer() -> FieldSchema {
        FieldSchema::integer("NWB")
    }

    #[test]
    fn test_malformed_integer_falls_back_to_minimum() {
        let schema = FieldSchema::integer("KTSTR").min(2.0);
        let mut cell = Cell::empty(&schema);
        cell.set_text("7", &schema);
        assert_eq!(cell.value, CellValue::Integer(7));

        let err = cell.set_text("abc", &schema);
        assert!(matches!(err, Some(CellParseError::InvalidInteger(_))));
        assert_eq!(cell.value, CellValue::Integer(2));
        assert!(!cell.touched);
    }

    #[test]
    fn test_touched_minimum_differs_from_untouched() {
        let schema = integer();
        let mut cell = Cell::empty(&schema);
        assert_eq!(cell.scalar_text(&schema), None);
        assert_eq!(cell.matrix_text(&schema), "");

        cell.set_text("0", &schema);
        assert_eq!(cell.value, CellValue::Integer(0));
        assert_eq!(cell.scalar_text(&schema), Some("0".to_string()));
        assert_eq!(cell.matrix_text(&schema), "0");
    }

    #[test]
    fn test_numeric_values_clamp_to_bounds() {
        let schema = FieldSchema::decimal("ALBEDO", 2).max(1.0);
        let mut cell = Cell::empty(&schema);
        cell.set_text("3.456", &schema);
        assert_eq!(cell.value, CellValue::Decimal(1.0));
        assert_eq!(cell.matrix_text(&schema), "1.00");

        cell.set_text("0.256", &schema);
        assert_eq!(cell.matrix_text(&schema), "0.26");

        let schema = integer();
        cell = Cell::empty(&schema);
        cell.set_text("-4", &schema);
        assert_eq!(cell.value, CellValue::Integer(0));
        assert!(cell.touched);
    }

    #[test]
    fn test_boolean_encoding() {
        let schema = FieldSchema::boolean("CLOSEC");
        let mut cell = Cell::empty(&schema);
        assert_eq!(cell.scalar_text(&schema), Some(OFF.to_string()));
        cell.set_text("ON", &schema);
        assert_eq!(cell.scalar_text(&schema), Some(ON.to_string()));
        assert!(cell.touched);
        cell.set_text("yes", &schema);
        assert_eq!(cell.value, CellValue::Boolean(false));
        assert_eq!(cell, Cell::empty(&schema));
    }

    #[test]
    fn test_enumerated_placeholder_and_unknown_option() {
        let schema = FieldSchema::enumerated("WTYPEC", &["FRESH", "SALT"]);
        let mut cell = Cell::empty(&schema);
        assert_eq!(cell.scalar_text(&schema), None);
        assert_eq!(cell.matrix_text(&schema), "");

        cell.set_text("SALT", &schema);
        assert_eq!(cell.value, CellValue::Enumerated(2));
        assert_eq!(cell.scalar_text(&schema), Some("SALT".to_string()));

        let err = cell.set_text("BRACKISH", &schema);
        assert!(matches!(err, Some(CellParseError::UnknownOption { .. })));
        assert_eq!(cell.value, CellValue::Enumerated(0));
    }

    #[test]
    fn test_file_ref_trims_and_empties() {
        let schema = FieldSchema::file_ref("METFN");
        let mut cell = Cell::empty(&schema);
        cell.set_text("  met_br1.npt ", &schema);
        assert_eq!(cell.scalar_text(&schema), Some("met_br1.npt".to_string()));
        cell.set_text("   ", &schema);
        assert_eq!(cell.scalar_text(&schema), None);
    }

    #[test]
    fn test_normalize_rejects_foreign_variant() {
        let schema = integer();
        assert_eq!(
            schema
                .cell_type
                .normalize(CellValue::Text("5".into()), &schema.bounds),
            None
        );
    }

    #[test]
    fn test_count_ignores_untouched() {
        let schema = FieldSchema::integer("NSTR").min(3.0);
        let mut cell = Cell::empty(&schema);
        assert_eq!(cell.count(&schema), 0);
        cell.set_text("4", &schema);
        assert_eq!(cell.count(&schema), 4);
    }
}
