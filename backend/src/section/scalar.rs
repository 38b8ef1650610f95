//! Sections holding one value per declared field.

use crate::error::{CellParseError, SectionError};
use crate::models::{Cell, FieldSchema};

/// A `(label, value)` pair as read from or written to a scalar section.
pub type ScalarPair = (String, Option<String>);

/// One instance of each declared field, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSection {
    name: String,
    fields: Vec<FieldSchema>,
    values: Vec<Cell>,
}

impl ScalarSection {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        let values = fields.iter().map(Cell::empty).collect();
        Self {
            name: name.into(),
            fields,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.label == label)
    }

    pub fn field(&self, label: &str) -> Option<&FieldSchema> {
        self.position(label).map(|i| &self.fields[i])
    }

    /// Every field as `(label, value)`; `None` for fields never set.
    pub fn get_all(&self) -> Vec<ScalarPair> {
        self.fields
            .iter()
            .zip(&self.values)
            .map(|(schema, cell)| (schema.label.clone(), cell.scalar_text(schema)))
            .collect()
    }

    /// Apply a full payload positionally.
    ///
    /// A payload whose length differs from the field list clears the whole
    /// section and returns [`SectionError::ShapeMismatch`]. Otherwise a pair
    /// whose label does not match its position, or whose value is `None`,
    /// clears only that field. Returns the parse errors that were recovered.
    pub fn set_all(&mut self, pairs: &[ScalarPair]) -> Result<Vec<CellParseError>, SectionError> {
        if pairs.len() != self.fields.len() {
            self.clear();
            return Err(SectionError::ShapeMismatch {
                section: self.name.clone(),
                expected: self.fields.len(),
                actual: pairs.len(),
            });
        }

        let mut recovered = Vec::new();
        for ((schema, cell), (label, value)) in
            self.fields.iter().zip(self.values.iter_mut()).zip(pairs)
        {
            match value {
                Some(text) if *label == schema.label => {
                    if let Some(err) = cell.set_text(text, schema) {
                        recovered.push(err);
                    }
                }
                _ => cell.clear(schema),
            }
        }
        Ok(recovered)
    }

    /// Reset every field to its empty sentinel.
    pub fn clear(&mut self) {
        for (schema, cell) in self.fields.iter().zip(self.values.iter_mut()) {
            cell.clear(schema);
        }
    }

    pub fn cell(&self, label: &str) -> Option<&Cell> {
        self.position(label).map(|i| &self.values[i])
    }

    /// Encoded value of one field, `None` when not set or unknown.
    pub fn get(&self, label: &str) -> Option<String> {
        let i = self.position(label)?;
        self.values[i].scalar_text(&self.fields[i])
    }

    /// Set one field from text; `None` clears it.
    ///
    /// Returns `false` when the label is unknown.
    pub fn set(&mut self, label: &str, value: Option<&str>) -> bool {
        let Some(i) = self.position(label) else {
            return false;
        };
        let schema = &self.fields[i];
        match value {
            Some(text) => {
                self.values[i].set_text(text, schema);
            }
            None => self.values[i].clear(schema),
        }
        true
    }

    /// Integer count of a field for dependency purposes. Unset counts as 0.
    pub fn count(&self, label: &str) -> i64 {
        self.position(label)
            .map(|i| self.values[i].count(&self.fields[i]))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, FieldSchema};

    fn section() -> ScalarSection {
        ScalarSection::new(
            "Time Control",
            vec![
                FieldSchema::decimal("TMSTRT", 3),
                FieldSchema::decimal("TMEND", 3),
                FieldSchema::integer("YEAR").max(9999.0),
                FieldSchema::boolean("CLOSEC"),
                FieldSchema::enumerated("SLICE", &["ON", "OFF"]),
            ],
        )
    }

    fn pairs(values: &[(&str, Option<&str>)]) -> Vec<ScalarPair> {
        values
            .iter()
            .map(|(l, v)| (l.to_string(), v.map(|s| s.to_string())))
            .collect()
    }

    #[test]
    fn test_fresh_section_reports_nulls_except_boolean() {
        let s = section();
        assert_eq!(
            s.get_all(),
            pairs(&[
                ("TMSTRT", None),
                ("TMEND", None),
                ("YEAR", None),
                ("CLOSEC", Some("OFF")),
                ("SLICE", None),
            ])
        );
    }

    #[test]
    fn test_set_all_round_trip() {
        let mut s = section();
        let payload = pairs(&[
            ("TMSTRT", Some("1.500")),
            ("TMEND", Some("0.000")),
            ("YEAR", Some("2024")),
            ("CLOSEC", Some("ON")),
            ("SLICE", Some("OFF")),
        ]);
        let recovered = s.set_all(&payload).unwrap();
        assert!(recovered.is_empty());
        assert_eq!(s.get_all(), payload);
    }

    #[test]
    fn test_set_all_length_mismatch_clears_everything() {
        let mut s = section();
        s.set("YEAR", Some("2020"));
        s.set("CLOSEC", Some("ON"));

        let err = s
            .set_all(&pairs(&[("TMSTRT", Some("1")), ("TMEND", Some("2"))]))
            .unwrap_err();
        assert!(matches!(
            err,
            SectionError::ShapeMismatch { expected: 5, actual: 2, .. }
        ));
        assert_eq!(s, section());

        s.set("YEAR", Some("2020"));
        assert!(s.set_all(&[]).is_err());
        assert_eq!(s, section());
    }

    #[test]
    fn test_label_mismatch_clears_single_field() {
        let mut s = section();
        s.set("TMEND", Some("9"));
        let payload = pairs(&[
            ("TMSTRT", Some("1")),
            ("WRONG", Some("2")),
            ("YEAR", Some("abc")),
            ("CLOSEC", Some("ON")),
            ("SLICE", Some("MAYBE")),
        ]);
        let recovered = s.set_all(&payload).unwrap();
        assert_eq!(recovered.len(), 2);
        assert_eq!(s.get("TMSTRT"), Some("1.000".to_string()));
        assert_eq!(s.get("TMEND"), None);
        assert_eq!(s.get("YEAR"), None);
        assert_eq!(s.cell("YEAR").unwrap().value, CellValue::Integer(0));
        assert_eq!(s.get("CLOSEC"), Some("ON".to_string()));
        assert_eq!(s.get("SLICE"), None);
    }

    #[test]
    fn test_single_field_accessors() {
        let mut s = section();
        assert!(!s.set("NOPE", Some("1")));
        assert!(s.set("YEAR", Some("12")));
        assert_eq!(s.count("YEAR"), 12);
        assert!(s.set("YEAR", None));
        assert_eq!(s.count("YEAR"), 0);
        assert_eq!(s.count("NOPE"), 0);
    }
}
