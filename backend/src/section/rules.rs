//! Declarations a matrix section carries: how its headers are named, what
//! drives its width, and which repeated row groups it may grow.
//!
//! These are plain data. The engine interprets them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::RowSchema;

/// Synthetic row labels look like `KTSTR_3`.
static SYNTHETIC_LABEL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(?P<kind>[A-Za-z][A-Za-z0-9]*)_(?P<index>[1-9][0-9]*)$").ok());

// =============================================================================
// Header Rule
// =============================================================================

/// How column headers are generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum HeaderRule {
    /// `WB1, WB2, …`
    Prefixed { prefix: String },

    /// `TR1 (Name), TR2, …` where names come from a free-text row.
    /// The name row is metadata and is left out of exported data rows.
    Named { prefix: String, name_row: String },

    /// A single header for column 0, blanks for the auxiliary columns.
    Auxiliary { first: String },
}

impl Default for HeaderRule {
    fn default() -> Self {
        HeaderRule::prefixed("Col")
    }
}

impl HeaderRule {
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        HeaderRule::Prefixed {
            prefix: prefix.into(),
        }
    }

    pub fn named(prefix: impl Into<String>, name_row: impl Into<String>) -> Self {
        HeaderRule::Named {
            prefix: prefix.into(),
            name_row: name_row.into(),
        }
    }

    pub fn auxiliary(first: impl Into<String>) -> Self {
        HeaderRule::Auxiliary {
            first: first.into(),
        }
    }

    /// Label of the row whose values name the columns, if any.
    pub fn name_row(&self) -> Option<&str> {
        match self {
            HeaderRule::Named { name_row, .. } => Some(name_row),
            _ => None,
        }
    }

    /// Headers for `column_count` columns. `names` is only read by
    /// [`HeaderRule::Named`]; missing or blank names fall back to the index.
    pub fn generate(&self, column_count: usize, names: &[String]) -> Vec<String> {
        match self {
            HeaderRule::Prefixed { prefix } => {
                (1..=column_count).map(|i| format!("{}{}", prefix, i)).collect()
            }
            HeaderRule::Named { prefix, .. } => (0..column_count)
                .map(|col| {
                    let name = names.get(col).map(|n| n.trim()).unwrap_or("");
                    if name.is_empty() {
                        format!("{}{}", prefix, col + 1)
                    } else {
                        format!("{}{} ({})", prefix, col + 1, name)
                    }
                })
                .collect(),
            HeaderRule::Auxiliary { first } => (0..column_count)
                .map(|col| if col == 0 { first.clone() } else { String::new() })
                .collect(),
        }
    }
}

// =============================================================================
// Column Rule
// =============================================================================

/// What determines a matrix's column count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ColumnRule {
    /// One column, never resized by the engine.
    #[default]
    Fixed,

    /// The integer value of a scalar field in another section.
    Scalar { section: String, field: String },

    /// `1 + max(0, v - 1)` where `v` is the per-column maximum of one of the
    /// section's own rows.
    RowMax { row: String },

    /// `1 + max(0, a * b - 1)` over the per-column maxima of two own rows.
    RowProduct { left: String, right: String },
}

impl ColumnRule {
    pub fn scalar(section: impl Into<String>, field: impl Into<String>) -> Self {
        ColumnRule::Scalar {
            section: section.into(),
            field: field.into(),
        }
    }

    pub fn row_max(row: impl Into<String>) -> Self {
        ColumnRule::RowMax { row: row.into() }
    }

    pub fn row_product(left: impl Into<String>, right: impl Into<String>) -> Self {
        ColumnRule::RowProduct {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Whether the width depends on the section's own cells.
    pub fn is_derived(&self) -> bool {
        matches!(self, ColumnRule::RowMax { .. } | ColumnRule::RowProduct { .. })
    }

    /// Own rows read by a derived rule.
    pub fn driving_rows(&self) -> Vec<&str> {
        match self {
            ColumnRule::RowMax { row } => vec![row.as_str()],
            ColumnRule::RowProduct { left, right } => vec![left.as_str(), right.as_str()],
            ColumnRule::Fixed | ColumnRule::Scalar { .. } => Vec::new(),
        }
    }
}

// =============================================================================
// Row Group Rule
// =============================================================================

/// Repeated groups of synthetic rows appended after the base rows.
///
/// Group `i` (1-based) holds one row per kind, labelled `KIND_i`. The number
/// of groups is the per-column maximum of `count_row`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowGroupRule {
    /// Base row holding the per-column group count.
    pub count_row: String,
    /// One template per row kind; the template label is the kind.
    pub kinds: Vec<RowSchema>,
}

impl RowGroupRule {
    pub fn new(count_row: impl Into<String>, kinds: Vec<RowSchema>) -> Self {
        Self {
            count_row: count_row.into(),
            kinds,
        }
    }

    /// Label of the `kind` row in group `index`.
    pub fn label(kind: &str, index: usize) -> String {
        format!("{}_{}", kind, index)
    }

    /// The synthetic rows of group `index`.
    pub fn group_rows(&self, index: usize) -> Vec<RowSchema> {
        self.kinds
            .iter()
            .map(|kind| {
                let mut row = kind.relabel(Self::label(&kind.label, index)).synthetic();
                if !kind.description.is_empty() {
                    row.description = format!("{} (group {})", kind.description, index);
                }
                row
            })
            .collect()
    }

    /// Base rows followed by `groups` synthetic groups.
    pub fn build_rows(&self, base: &[RowSchema], groups: usize) -> Vec<RowSchema> {
        let mut rows = base.to_vec();
        rows.reserve(groups * self.kinds.len());
        for index in 1..=groups {
            rows.extend(self.group_rows(index));
        }
        rows
    }

    /// Highest group index present among synthetic rows of known kinds.
    pub fn groups_present(&self, rows: &[RowSchema]) -> usize {
        rows.iter()
            .filter(|row| row.synthetic)
            .filter_map(|row| SYNTHETIC_LABEL.as_ref()?.captures(&row.label))
            .filter(|caps| self.kinds.iter().any(|k| k.label == caps["kind"]))
            .filter_map(|caps| caps["index"].parse::<usize>().ok())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structures() -> RowGroupRule {
        RowGroupRule::new(
            "NSTR",
            vec![
                RowSchema::text("STRUCT").describe("Structure name"),
                RowSchema::integer("KTSTR"),
            ],
        )
    }

    #[test]
    fn test_named_headers_fall_back_to_index() {
        let rule = HeaderRule::named("X", "NAME");
        let names = vec!["Alpha".to_string(), String::new(), String::new()];
        assert_eq!(rule.generate(3, &names), vec!["X1 (Alpha)", "X2", "X3"]);
        assert_eq!(rule.generate(2, &[]), vec!["X1", "X2"]);
    }

    #[test]
    fn test_prefixed_and_auxiliary_headers() {
        assert_eq!(HeaderRule::prefixed("WB").generate(3, &[]), vec!["WB1", "WB2", "WB3"]);
        assert_eq!(HeaderRule::default().generate(2, &[]), vec!["Col1", "Col2"]);
        assert_eq!(HeaderRule::auxiliary("SNP").generate(3, &[]), vec!["SNP", "", ""]);
    }

    #[test]
    fn test_group_rows_are_synthetic_and_labelled() {
        let rows = structures().group_rows(3);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "STRUCT_3");
        assert_eq!(rows[0].description, "Structure name (group 3)");
        assert_eq!(rows[1].label, "KTSTR_3");
        assert!(rows.iter().all(|r| r.synthetic));
    }

    #[test]
    fn test_groups_present_reads_labels() {
        let rule = structures();
        let base = vec![RowSchema::integer("NSTR"), RowSchema::boolean("DYNSTRUC")];
        assert_eq!(rule.groups_present(&base), 0);

        let rows = rule.build_rows(&base, 4);
        assert_eq!(rows.len(), 2 + 8);
        assert_eq!(rule.groups_present(&rows), 4);

        // A base row that merely looks synthetic is not counted.
        let lookalike = vec![RowSchema::integer("KTSTR_9")];
        assert_eq!(rule.groups_present(&lookalike), 0);
    }

    #[test]
    fn test_column_rule_driving_rows() {
        assert!(ColumnRule::row_max("NSNP").is_derived());
        assert_eq!(
            ColumnRule::row_product("NPRF", "NIPRF").driving_rows(),
            vec!["NPRF", "NIPRF"]
        );
        assert!(!ColumnRule::scalar("Grid", "NWB").is_derived());
        assert!(ColumnRule::Fixed.driving_rows().is_empty());
    }
}
