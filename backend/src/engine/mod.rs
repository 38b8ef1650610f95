//! Dependency engine.
//!
//! Keeps every matrix's shape consistent with the values that drive it:
//!
//! - **simple** links: a scalar field in another section sets the column
//!   count ([`ColumnRule::Scalar`]);
//! - **derived** links: the section's own cells set the column count
//!   ([`ColumnRule::RowMax`], [`ColumnRule::RowProduct`]);
//! - **row groups**: the per-column maximum of a count row sets how many
//!   groups of synthetic rows follow the base rows
//!   ([`RowGroupRule`](crate::section::RowGroupRule)).
//!
//! A full pass ([`Engine::sync`]) collects every scalar dimension, then
//! resizes with capture-resize-restore. The narrow pass
//! ([`Engine::refresh_derived`]) touches one self-driven section only. Each
//! pass family has its own in-progress flag; a nested request of a running
//! family is refused and reported as skipped.
//!
//! The engine never fails on values: anything that does not count as a
//! positive integer counts as 0, so shapes degrade to one column and no
//! synthetic rows.

mod report;

pub use report::{PassReport, ShapeChange};

use crate::document::Document;
use crate::error::{DocumentError, DocumentResult, SectionError};
use crate::logs::log_warning_indent;
use crate::models::DEFAULT_MAX;
use crate::section::{ColumnRule, MatrixRow, MatrixSection, Section, SectionPayload};

/// Outcome of [`Engine::restore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreReport {
    pub pass: PassReport,
    /// Recovered problems: cleared sections, unknown names, malformed cells.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Engine {
    document: Document,
    full_pass_running: bool,
    narrow_pass_running: bool,
}

impl Engine {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            full_pass_running: false,
            narrow_pass_running: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    // =========================================================================
    // Passes
    // =========================================================================

    /// Full pass: resize every scalar-driven matrix, then refresh every
    /// self-driven one.
    pub fn sync(&mut self) -> PassReport {
        if self.full_pass_running {
            return PassReport::skipped();
        }
        self.full_pass_running = true;
        let report = self.run_full_pass();
        self.full_pass_running = false;
        report
    }

    fn run_full_pass(&mut self) -> PassReport {
        let mut report = PassReport::default();

        // Collect
        let targets: Vec<(String, usize)> = self
            .document
            .matrices()
            .filter_map(|m| match m.column_rule() {
                ColumnRule::Scalar { section, field } => Some((
                    m.name().to_string(),
                    to_width(self.document.scalar_count(section, field)),
                )),
                _ => None,
            })
            .collect();

        // Apply
        for (name, width) in targets {
            if let Ok(matrix) = self.document.matrix_mut(&name) {
                let from = matrix.column_count();
                if matrix.resize(width) {
                    report.resized.push(ShapeChange {
                        section: name,
                        from,
                        to: width,
                    });
                }
            }
        }

        let self_driven: Vec<String> = self
            .document
            .matrices()
            .filter(|m| m.column_rule().is_derived() || m.row_group_rule().is_some())
            .map(|m| m.name().to_string())
            .collect();
        for name in self_driven {
            report.merge(self.refresh_derived(&name));
        }
        report
    }

    /// Narrow pass over one section: rebuild row groups when the count row's
    /// maximum differs from the groups present, then apply a derived width.
    pub fn refresh_derived(&mut self, name: &str) -> PassReport {
        if self.narrow_pass_running {
            return PassReport::skipped();
        }
        self.narrow_pass_running = true;
        let report = self.run_narrow_pass(name);
        self.narrow_pass_running = false;
        report
    }

    fn run_narrow_pass(&mut self, name: &str) -> PassReport {
        let mut report = PassReport::default();
        let Ok(matrix) = self.document.matrix_mut(name) else {
            return report;
        };
        let groups_from = matrix.groups_present();
        let width_from = matrix.column_count();

        // A shrink can drop the column that held a maximum, so repeat until
        // the shape agrees with its own rules.
        while apply_row_groups(matrix) | apply_derived_width(matrix) {}

        if matrix.groups_present() != groups_from {
            report.regrouped.push(ShapeChange {
                section: name.to_string(),
                from: groups_from,
                to: matrix.groups_present(),
            });
        }
        if matrix.column_count() != width_from {
            report.resized.push(ShapeChange {
                section: name.to_string(),
                from: width_from,
                to: matrix.column_count(),
            });
        }
        report
    }

    // =========================================================================
    // Edits
    // =========================================================================

    /// Set a scalar field. A full pass follows when the field is a dimension.
    pub fn set_field(
        &mut self,
        section: &str,
        label: &str,
        value: Option<&str>,
    ) -> DocumentResult<PassReport> {
        let scalar = self.document.scalar_mut(section)?;
        if !scalar.set(label, value) {
            return Err(DocumentError::UnknownField {
                section: section.to_string(),
                label: label.to_string(),
            });
        }

        if self.is_dimension(section, label) {
            let report = self.sync();
            report.log("sync");
            Ok(report)
        } else {
            Ok(PassReport::default())
        }
    }

    /// Set a matrix cell. Editing a name row refreshes headers only; editing
    /// a driving or count row runs the narrow pass for that section.
    pub fn set_cell(
        &mut self,
        section: &str,
        row: &str,
        column: usize,
        text: &str,
    ) -> DocumentResult<PassReport> {
        let matrix = self.document.matrix_mut(section)?;
        if let Some(err) = matrix.set_cell(row, column, text)? {
            log_warning_indent(format!("{}.{}: {}", section, row, err), 1);
        }

        if matrix.is_name_row(row) {
            matrix.refresh_headers();
            return Ok(PassReport {
                headers_refreshed: vec![section.to_string()],
                ..PassReport::default()
            });
        }

        let drives = matrix.column_rule().driving_rows().contains(&row)
            || matrix
                .row_group_rule()
                .is_some_and(|rule| rule.count_row == row);
        if drives {
            let report = self.refresh_derived(section);
            report.log("refresh");
            Ok(report)
        } else {
            Ok(PassReport::default())
        }
    }

    /// Replace a matrix's data, then let a self-driven section adapt.
    ///
    /// A derived-width section takes the payload's full width first, so its
    /// rule reads every column written.
    pub fn set_matrix_data(
        &mut self,
        section: &str,
        rows: &[MatrixRow],
    ) -> DocumentResult<PassReport> {
        let matrix = self.document.matrix_mut(section)?;
        let width_from = matrix.column_count();
        widen_to_payload(matrix, rows);
        for err in matrix.set_data(rows) {
            log_warning_indent(format!("{}: {}", section, err), 1);
        }
        if !matrix.column_rule().is_derived() && matrix.row_group_rule().is_none() {
            return Ok(PassReport::default());
        }

        let mut report = self.refresh_derived(section);
        let width = self.document.matrix(section)?.column_count();
        report.resized.retain(|change| change.section != section);
        if width != width_from {
            report.resized.push(ShapeChange {
                section: section.to_string(),
                from: width_from,
                to: width,
            });
        }
        report.log("refresh");
        Ok(report)
    }

    /// Every section back to empty, then a full pass.
    pub fn clear_all(&mut self) -> PassReport {
        self.document.reset_all();
        self.sync()
    }

    fn is_dimension(&self, section: &str, field: &str) -> bool {
        self.document.matrices().any(|m| {
            matches!(
                m.column_rule(),
                ColumnRule::Scalar { section: s, field: f } if s == section && f == field
            )
        })
    }

    // =========================================================================
    // Restore
    // =========================================================================

    /// Replace the document with decoded section payloads.
    ///
    /// Works on a scratch copy that is swapped in at the end: scalars first,
    /// a full pass, matrix data, the self-driven passes, matrix data again
    /// so that grown rows and columns get their values, and a final pass.
    /// Derived-width sections are first widened to their payload so the
    /// width rule sees every saved column. Sections missing from `payloads`
    /// end up empty.
    pub fn restore(&mut self, payloads: &[(String, SectionPayload)]) -> RestoreReport {
        let mut scratch = Engine::new(self.document.clone());
        scratch.document.reset_all();
        let mut warnings = Vec::new();

        let mut matrices: Vec<(&str, &[MatrixRow])> = Vec::new();
        for (name, payload) in payloads {
            let Ok(section) = scratch.document.get_mut(name) else {
                warnings.push(format!("unknown section '{}' ignored", name));
                continue;
            };
            match (section, payload) {
                (Section::Scalar(scalar), SectionPayload::Scalar(pairs)) => {
                    match scalar.set_all(pairs) {
                        Ok(recovered) => warnings
                            .extend(recovered.iter().map(|e| format!("{}: {}", name, e))),
                        Err(err) => warnings.push(err.to_string()),
                    }
                }
                (Section::Matrix(_), SectionPayload::Matrix(rows)) => {
                    matrices.push((name.as_str(), rows.as_slice()));
                }
                (section, _) => warnings.push(
                    SectionError::WrongPayload {
                        section: name.clone(),
                        expected: section.kind().as_str(),
                    }
                    .to_string(),
                ),
            }
        }

        let mut pass = scratch.sync();
        for (name, rows) in &matrices {
            if let Ok(matrix) = scratch.document.matrix_mut(name) {
                widen_to_payload(matrix, rows);
            }
        }
        scratch.apply_matrix_data(&matrices, &mut warnings);
        for (name, _) in &matrices {
            pass.merge(scratch.refresh_derived(name));
        }
        // Second application only reaches cells that exist now; its parse
        // errors were already reported by the first.
        scratch.apply_matrix_data(&matrices, &mut Vec::new());
        pass.merge(scratch.sync());

        self.document = scratch.document;
        RestoreReport { pass, warnings }
    }

    fn apply_matrix_data(&mut self, matrices: &[(&str, &[MatrixRow])], warnings: &mut Vec<String>) {
        for (name, rows) in matrices {
            if let Ok(matrix) = self.document.matrix_mut(name) {
                let recovered = matrix.set_data(rows);
                warnings.extend(recovered.iter().map(|e| format!("{}: {}", name, e)));
            }
        }
    }
}

/// Rebuild row groups from the count row. Returns whether rows changed.
fn apply_row_groups(matrix: &mut MatrixSection) -> bool {
    let Some(rule) = matrix.row_group_rule().cloned() else {
        return false;
    };
    let target = to_count(matrix.row_max(&rule.count_row));
    if target == matrix.groups_present() {
        return false;
    }
    let rows = rule.build_rows(matrix.base_rows(), target);
    matrix.set_row_schemas(rows);
    true
}

/// Apply a row-max or row-product width. Returns whether the width changed.
fn apply_derived_width(matrix: &mut MatrixSection) -> bool {
    let extra = match matrix.column_rule() {
        ColumnRule::RowMax { row } => matrix.row_max(row) - 1,
        ColumnRule::RowProduct { left, right } => {
            matrix.row_max(left).saturating_mul(matrix.row_max(right)) - 1
        }
        ColumnRule::Fixed | ColumnRule::Scalar { .. } => return false,
    };
    matrix.resize(1 + to_count(extra))
}

/// Give a derived-width section as many columns as the widest payload row,
/// before the data is written. The narrow pass then settles the width.
fn widen_to_payload(matrix: &mut MatrixSection, rows: &[MatrixRow]) {
    if !matrix.column_rule().is_derived() {
        return;
    }
    let width = rows
        .iter()
        .map(|row| row.len().saturating_sub(1))
        .max()
        .unwrap_or(0);
    matrix.set_column_count(width.min(DEFAULT_MAX as usize));
}

/// Dependency count as a non-negative size.
fn to_count(value: i64) -> usize {
    value.clamp(0, DEFAULT_MAX as i64) as usize
}

/// Dependency count as a column count, never below 1.
fn to_width(value: i64) -> usize {
    to_count(value).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{w2, Catalog, MatrixDef, ScalarDef};
    use crate::models::{FieldSchema, RowSchema};
    use crate::section::{HeaderRule, RowGroupRule};

    fn row(values: &[&str]) -> MatrixRow {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn payloads_of(engine: &Engine) -> Vec<(String, SectionPayload)> {
        engine
            .document()
            .sections()
            .iter()
            .map(|s| (s.name().to_string(), s.payload()))
            .collect()
    }

    fn engine() -> Engine {
        Engine::new(Document::default())
    }

    fn small_catalog() -> Catalog {
        Catalog::new(vec![
            ScalarDef::new("Grid", vec![FieldSchema::integer("NWB")]).into(),
            MatrixDef::new("Calc", vec![RowSchema::boolean("VBC"), RowSchema::integer("N")])
                .headers(HeaderRule::prefixed("WB"))
                .columns(ColumnRule::scalar("Grid", "NWB"))
                .into(),
            MatrixDef::new("Snap", vec![RowSchema::integer("NSNP"), RowSchema::decimal("SNPD", 2)])
                .headers(HeaderRule::auxiliary("SNP"))
                .columns(ColumnRule::row_max("NSNP"))
                .into(),
            MatrixDef::new("Prf", vec![RowSchema::integer("NPRF"), RowSchema::integer("NIPRF")])
                .columns(ColumnRule::row_product("NPRF", "NIPRF"))
                .into(),
            MatrixDef::new("Struct", vec![RowSchema::integer("NSTR")])
                .headers(HeaderRule::prefixed("BR"))
                .columns(ColumnRule::scalar("Grid", "NWB"))
                .row_groups(RowGroupRule::new(
                    "NSTR",
                    vec![RowSchema::text("STRUCT"), RowSchema::integer("KTSTR")],
                ))
                .into(),
        ])
        .unwrap()
    }

    fn small() -> Engine {
        Engine::new(Document::from_catalog(&small_catalog()))
    }

    #[test]
    fn test_dimension_field_resizes_dependents() {
        let mut engine = engine();
        let report = engine.set_field(w2::GRID, "NWB", Some("3")).unwrap();
        assert!(!report.skipped);

        let doc = engine.document();
        assert_eq!(doc.matrix(w2::CALCULATIONS).unwrap().column_count(), 3);
        assert_eq!(doc.matrix(w2::ICE_COVER).unwrap().headers(), &["WB1", "WB2", "WB3"]);
        assert_eq!(doc.matrix(w2::BRANCH_GEOMETRY).unwrap().column_count(), 1);
        assert!(report.resized.iter().any(|c| c.section == w2::CALCULATIONS && c.to == 3));
    }

    #[test]
    fn test_non_dimension_field_does_not_sync() {
        let mut engine = engine();
        let report = engine.set_field(w2::GRID, "IMX", Some("40")).unwrap();
        assert!(report.is_empty());
        assert!(matches!(
            engine.set_field(w2::GRID, "NOPE", Some("1")),
            Err(DocumentError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_unset_or_zero_dimension_keeps_one_column() {
        let mut engine = engine();
        engine.set_field(w2::GRID, "NBR", Some("4")).unwrap();
        engine.set_field(w2::GRID, "NBR", Some("0")).unwrap();
        assert_eq!(engine.document().matrix(w2::INTERPOLATION).unwrap().column_count(), 1);
        engine.set_field(w2::GRID, "NBR", Some("abc")).unwrap();
        assert_eq!(engine.document().matrix(w2::INTERPOLATION).unwrap().column_count(), 1);
    }

    #[test]
    fn test_resize_keeps_entered_data() {
        let mut engine = small();
        engine.set_field("Grid", "NWB", Some("3")).unwrap();
        engine.set_cell("Calc", "N", 0, "7").unwrap();
        engine.set_cell("Calc", "N", 2, "9").unwrap();
        engine.set_cell("Calc", "VBC", 1, "ON").unwrap();

        engine.set_field("Grid", "NWB", Some("2")).unwrap();
        let calc = engine.document().matrix("Calc").unwrap();
        assert_eq!(calc.get_data(), vec![row(&["VBC", "OFF", "ON"]), row(&["N", "7", ""])]);

        engine.set_field("Grid", "NWB", Some("4")).unwrap();
        let calc = engine.document().matrix("Calc").unwrap();
        assert_eq!(calc.get_data()[1], row(&["N", "7", "", "", ""]));
    }

    #[test]
    fn test_derived_width_uses_row_maximum() {
        let mut engine = small();
        {
            let snap = engine.document.matrix_mut("Snap").unwrap();
            snap.set_column_count(3);
            snap.set_data(&[row(&["NSNP", "3", "1", "5"])]);
        }
        let report = engine.refresh_derived("Snap");
        let snap = engine.document().matrix("Snap").unwrap();
        assert_eq!(snap.column_count() - 1, 4);
        assert_eq!(snap.headers(), &["SNP", "", "", "", ""]);
        assert_eq!(report.resized[0].to, 5);
        assert_eq!(snap.row_counts("NSNP"), Some(vec![3, 1, 5, 0, 0]));
    }

    #[test]
    fn test_derived_width_follows_cell_edits() {
        let mut engine = small();
        engine.set_cell("Snap", "NSNP", 0, "3").unwrap();
        assert_eq!(engine.document().matrix("Snap").unwrap().column_count(), 3);

        engine.set_cell("Snap", "SNPD", 2, "12.5").unwrap();
        engine.set_cell("Snap", "NSNP", 0, "2").unwrap();
        let snap = engine.document().matrix("Snap").unwrap();
        assert_eq!(snap.column_count(), 2);

        engine.set_cell("Snap", "NSNP", 0, "0").unwrap();
        assert_eq!(engine.document().matrix("Snap").unwrap().column_count(), 1);
    }

    #[test]
    fn test_product_width() {
        let mut engine = small();
        engine.set_cell("Prf", "NPRF", 0, "3").unwrap();
        assert_eq!(engine.document().matrix("Prf").unwrap().column_count(), 1);
        engine.set_cell("Prf", "NIPRF", 0, "2").unwrap();
        assert_eq!(engine.document().matrix("Prf").unwrap().column_count(), 6);
    }

    #[test]
    fn test_row_groups_follow_count_maximum() {
        let mut engine = small();
        engine.set_field("Grid", "NWB", Some("2")).unwrap();
        engine.set_cell("Struct", "NSTR", 0, "2").unwrap();
        let report = engine.set_cell("Struct", "NSTR", 1, "4").unwrap();
        assert_eq!(report.regrouped.last().map(|c| c.to), Some(4));

        let structs = engine.document().matrix("Struct").unwrap();
        assert_eq!(structs.groups_present(), 4);
        assert_eq!(structs.rows().len(), 1 + 4 * 2);

        for i in 1..=4 {
            let label = format!("STRUCT_{}", i);
            engine.set_cell("Struct", &label, 0, &format!("gate {}", i)).unwrap();
            engine.set_cell("Struct", &format!("KTSTR_{}", i), 1, "3").unwrap();
        }
        let before = engine.document().matrix("Struct").unwrap().get_data();

        engine.set_cell("Struct", "NSTR", 0, "6").unwrap();
        let structs = engine.document().matrix("Struct").unwrap();
        assert_eq!(structs.groups_present(), 6);
        let after = structs.get_data();
        assert_eq!(&after[1..9], &before[1..9]);
        assert_eq!(after[9], row(&["STRUCT_5", "", ""]));
        assert_eq!(after.len(), 1 + 6 * 2);
    }

    #[test]
    fn test_guard_skips_nested_full_pass() {
        let mut engine = small();
        engine
            .document
            .scalar_mut("Grid")
            .unwrap()
            .set("NWB", Some("5"));

        engine.full_pass_running = true;
        let report = engine.sync();
        assert!(report.skipped);
        assert_eq!(engine.document().matrix("Calc").unwrap().column_count(), 1);

        engine.full_pass_running = false;
        let report = engine.sync();
        assert!(!report.skipped);
        assert_eq!(engine.document().matrix("Calc").unwrap().column_count(), 5);
    }

    #[test]
    fn test_guard_skips_nested_narrow_pass() {
        let mut engine = small();
        engine.narrow_pass_running = true;
        assert!(engine.refresh_derived("Snap").skipped);
    }

    #[test]
    fn test_name_row_refreshes_headers_only() {
        let mut engine = engine();
        engine.set_field(w2::INFLOW_OUTFLOW, "NTR", Some("3")).unwrap();
        let report = engine.set_cell(w2::TRIBUTARIES, "TRNAME", 0, "Alpha").unwrap();
        assert_eq!(report.headers_refreshed, vec![w2::TRIBUTARIES.to_string()]);
        assert!(report.resized.is_empty());
        assert_eq!(
            engine.document().matrix(w2::TRIBUTARIES).unwrap().headers(),
            &["TR1 (Alpha)", "TR2", "TR3"]
        );
    }

    #[test]
    fn test_restore_rebuilds_shapes_and_values() {
        let mut source = small();
        source.set_field("Grid", "NWB", Some("2")).unwrap();
        source.set_cell("Calc", "N", 1, "0").unwrap();
        source.set_cell("Struct", "NSTR", 1, "2").unwrap();
        source.set_cell("Struct", "STRUCT_2", 1, "spill").unwrap();
        source.set_cell("Snap", "NSNP", 0, "3").unwrap();
        source.set_cell("Snap", "SNPD", 2, "4.25").unwrap();

        let mut target = small();
        let report = target.restore(&payloads_of(&source));
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(target.document(), source.document());
    }

    #[test]
    fn test_derived_width_settles_after_shrink() {
        let mut engine = small();
        engine.set_cell("Snap", "NSNP", 0, "3").unwrap();
        engine.set_cell("Snap", "NSNP", 2, "3").unwrap();
        engine.set_cell("Snap", "NSNP", 0, "1").unwrap();
        assert_eq!(engine.document().matrix("Snap").unwrap().column_count(), 3);

        // Width 2 drops the column holding the 2, leaving a maximum of 1.
        let report = engine.set_cell("Snap", "NSNP", 2, "2").unwrap();
        assert_eq!(engine.document().matrix("Snap").unwrap().column_count(), 1);
        assert_eq!(
            report.resized,
            vec![ShapeChange {
                section: "Snap".to_string(),
                from: 3,
                to: 1,
            }]
        );
        assert!(engine.sync().is_empty());
    }

    #[test]
    fn test_sync_is_idempotent_after_edits() {
        let mut engine = small();
        let edits = [
            ("Snap", "NSNP", 0, "4"),
            ("Snap", "NSNP", 3, "2"),
            ("Snap", "NSNP", 0, "1"),
            ("Prf", "NPRF", 0, "2"),
            ("Prf", "NIPRF", 0, "3"),
            ("Prf", "NIPRF", 5, "1"),
            ("Prf", "NIPRF", 0, "1"),
            ("Struct", "NSTR", 0, "3"),
            ("Struct", "NSTR", 0, "1"),
        ];
        for (section, label, column, text) in edits {
            engine.set_cell(section, label, column, text).unwrap();
            let report = engine.sync();
            assert!(report.is_empty(), "after {}.{}: {:?}", section, label, report);
        }
    }

    #[test]
    fn test_restore_keeps_maximum_beyond_first_column() {
        let mut source = small();
        source.set_cell("Snap", "NSNP", 0, "3").unwrap();
        source.set_cell("Snap", "NSNP", 2, "5").unwrap();
        source.set_cell("Snap", "SNPD", 4, "12.5").unwrap();
        source.set_cell("Snap", "NSNP", 0, "1").unwrap();
        assert_eq!(source.document().matrix("Snap").unwrap().column_count(), 5);

        let mut target = small();
        let report = target.restore(&payloads_of(&source));
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(target.document(), source.document());
        let snap = target.document().matrix("Snap").unwrap();
        assert_eq!(snap.cell_text("SNPD", 4).unwrap(), "12.50");
    }

    #[test]
    fn test_restore_keeps_product_width() {
        let mut source = small();
        source.set_cell("Prf", "NPRF", 0, "2").unwrap();
        source.set_cell("Prf", "NIPRF", 0, "2").unwrap();
        source.set_cell("Prf", "NPRF", 3, "3").unwrap();
        source.set_cell("Prf", "NPRF", 0, "1").unwrap();
        source.set_cell("Prf", "NIPRF", 5, "1").unwrap();
        assert_eq!(source.document().matrix("Prf").unwrap().column_count(), 6);

        let mut target = small();
        target.restore(&payloads_of(&source));
        assert_eq!(target.document(), source.document());
    }

    #[test]
    fn test_set_matrix_data_runs_narrow_pass() {
        let mut engine = small();
        let report = engine
            .set_matrix_data(
                "Snap",
                &[row(&["NSNP", "3", "1", "5"]), row(&["SNPD", "", "", "", "", "7"])],
            )
            .unwrap();

        let snap = engine.document().matrix("Snap").unwrap();
        assert_eq!(snap.column_count(), 5);
        assert_eq!(snap.row_counts("NSNP"), Some(vec![3, 1, 5, 0, 0]));
        assert_eq!(snap.cell_text("SNPD", 4).unwrap(), "7.00");
        assert_eq!(
            report.resized,
            vec![ShapeChange {
                section: "Snap".to_string(),
                from: 1,
                to: 5,
            }]
        );

        // Fixed sections take the data as is.
        let report = engine
            .set_matrix_data("Calc", &[row(&["VBC", "ON"]), row(&["N", "4", "9"])])
            .unwrap();
        assert!(report.is_empty());
        let calc = engine.document().matrix("Calc").unwrap();
        assert_eq!(calc.column_count(), 1);
        assert_eq!(calc.get_data(), vec![row(&["VBC", "ON"]), row(&["N", "4"])]);
    }

    #[test]
    fn test_restore_reports_recovered_problems() {
        let mut engine = small();
        let payloads = vec![
            ("Grid".to_string(), SectionPayload::Scalar(vec![])),
            ("Ghost".to_string(), SectionPayload::Scalar(vec![])),
            ("Calc".to_string(), SectionPayload::Scalar(vec![])),
            (
                "Snap".to_string(),
                SectionPayload::Matrix(vec![row(&["NSNP", "x"]), row(&["SNPD", "1"])]),
            ),
        ];
        let report = engine.restore(&payloads);
        assert_eq!(report.warnings.len(), 4);
        assert!(report.warnings[0].contains("section cleared"));
        assert!(report.warnings[1].contains("Ghost"));
        assert!(report.warnings[2].contains("scalar") || report.warnings[2].contains("matrix"));
        assert_eq!(
            engine.document().matrix("Snap").unwrap().cell_text("SNPD", 0).unwrap(),
            "1.00"
        );
    }

    #[test]
    fn test_clear_all_returns_to_fresh_document() {
        let mut engine = engine();
        engine.set_field(w2::GRID, "NWB", Some("3")).unwrap();
        engine.set_cell(w2::CALCULATIONS, "VBC", 2, "ON").unwrap();
        engine.clear_all();
        assert_eq!(engine.document(), &Document::default());
    }
}
