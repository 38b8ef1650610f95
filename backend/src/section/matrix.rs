//! Row-per-schema, column-per-instance tables.
//!
//! The grid always has `rows.len() × column_count` cells. Every operation
//! that changes the shape builds the new grid completely before swapping it
//! in, so a reader never sees a partial resize.

use std::collections::HashMap;

use crate::error::{CellParseError, DocumentError, DocumentResult};
use crate::models::{Cell, RowSchema};

use super::rules::{ColumnRule, HeaderRule, RowGroupRule};

/// One exported row: the row label followed by encoded cells.
pub type MatrixRow = Vec<String>;

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSection {
    name: String,
    base_rows: Vec<RowSchema>,
    rows: Vec<RowSchema>,
    column_count: usize,
    cells: Vec<Vec<Cell>>,
    header_rule: HeaderRule,
    headers: Vec<String>,
    columns: ColumnRule,
    row_groups: Option<RowGroupRule>,
}

// =============================================================================
// Construction
// =============================================================================

impl MatrixSection {
    /// A one-column section over `rows` with default `Col` headers.
    pub fn new(name: impl Into<String>, rows: Vec<RowSchema>) -> Self {
        let cells = empty_grid(&rows, 1);
        let mut section = Self {
            name: name.into(),
            base_rows: rows.clone(),
            rows,
            column_count: 1,
            cells,
            header_rule: HeaderRule::default(),
            headers: Vec::new(),
            columns: ColumnRule::Fixed,
            row_groups: None,
        };
        section.refresh_headers();
        section
    }

    pub fn with_headers(mut self, rule: HeaderRule) -> Self {
        self.header_rule = rule;
        self.refresh_headers();
        self
    }

    pub fn with_columns(mut self, rule: ColumnRule) -> Self {
        self.columns = rule;
        self
    }

    pub fn with_row_groups(mut self, rule: RowGroupRule) -> Self {
        self.row_groups = Some(rule);
        self
    }
}

fn empty_grid(rows: &[RowSchema], column_count: usize) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|schema| vec![Cell::empty(schema); column_count])
        .collect()
}

// =============================================================================
// Accessors
// =============================================================================

impl MatrixSection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[RowSchema] {
        &self.rows
    }

    pub fn base_rows(&self) -> &[RowSchema] {
        &self.base_rows
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn header_rule(&self) -> &HeaderRule {
        &self.header_rule
    }

    pub fn column_rule(&self) -> &ColumnRule {
        &self.columns
    }

    pub fn row_group_rule(&self) -> Option<&RowGroupRule> {
        self.row_groups.as_ref()
    }

    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.label == label)
    }

    /// Whether `label` is the row that names the columns.
    pub fn is_name_row(&self, label: &str) -> bool {
        self.header_rule.name_row() == Some(label)
    }

    /// Number of row groups currently appended.
    pub fn groups_present(&self) -> usize {
        self.row_groups
            .as_ref()
            .map_or(0, |rule| rule.groups_present(&self.rows))
    }

    fn locate(&self, label: &str, column: usize) -> DocumentResult<usize> {
        let row = self
            .row_index(label)
            .ok_or_else(|| DocumentError::UnknownRow {
                section: self.name.clone(),
                label: label.to_string(),
            })?;
        if column >= self.column_count {
            return Err(DocumentError::ColumnOutOfRange {
                section: self.name.clone(),
                column,
                count: self.column_count,
            });
        }
        Ok(row)
    }

    pub fn cell(&self, label: &str, column: usize) -> DocumentResult<&Cell> {
        let row = self.locate(label, column)?;
        Ok(&self.cells[row][column])
    }

    /// Encoded text of one cell.
    pub fn cell_text(&self, label: &str, column: usize) -> DocumentResult<String> {
        let row = self.locate(label, column)?;
        Ok(self.cells[row][column].matrix_text(&self.rows[row]))
    }

    /// Set one cell from text. A recovered parse error is returned in `Ok`.
    ///
    /// Headers are not refreshed here; the engine decides what a cell edit
    /// triggers.
    pub fn set_cell(
        &mut self,
        label: &str,
        column: usize,
        text: &str,
    ) -> DocumentResult<Option<CellParseError>> {
        let row = self.locate(label, column)?;
        Ok(self.cells[row][column].set_text(text, &self.rows[row]))
    }

    /// Per-column dependency counts of one row; untouched cells count as 0.
    pub fn row_counts(&self, label: &str) -> Option<Vec<i64>> {
        let row = self.row_index(label)?;
        let schema = &self.rows[row];
        Some(self.cells[row].iter().map(|c| c.count(schema)).collect())
    }

    /// Maximum of [`MatrixSection::row_counts`], never below 0.
    pub fn row_max(&self, label: &str) -> i64 {
        self.row_counts(label)
            .and_then(|counts| counts.into_iter().max())
            .unwrap_or(0)
            .max(0)
    }
}

// =============================================================================
// Data
// =============================================================================

impl MatrixSection {
    /// Every row as `[label, cell_1, …, cell_n]`.
    pub fn get_data(&self) -> Vec<MatrixRow> {
        self.rows
            .iter()
            .zip(&self.cells)
            .map(|(schema, cells)| {
                let mut row = Vec::with_capacity(cells.len() + 1);
                row.push(schema.label.clone());
                row.extend(cells.iter().map(|c| c.matrix_text(schema)));
                row
            })
            .collect()
    }

    /// Apply rows positionally. The leading label of each row is skipped;
    /// rows and columns past the current shape are ignored. An empty payload
    /// clears the section.
    pub fn set_data(&mut self, data: &[MatrixRow]) -> Vec<CellParseError> {
        let mut recovered = Vec::new();
        if data.is_empty() {
            self.clear();
            return recovered;
        }

        for ((schema, cells), values) in self.rows.iter().zip(self.cells.iter_mut()).zip(data) {
            for (cell, text) in cells.iter_mut().zip(values.iter().skip(1)) {
                if let Some(err) = cell.set_text(text, schema) {
                    recovered.push(err);
                }
            }
        }
        self.refresh_headers();
        recovered
    }

    /// Every cell back to its empty sentinel, shape unchanged.
    pub fn clear(&mut self) {
        self.cells = empty_grid(&self.rows, self.column_count);
        self.refresh_headers();
    }

    /// Back to the declared rows and a single column.
    pub fn reset(&mut self) {
        self.rows = self.base_rows.clone();
        self.column_count = 1;
        self.clear();
    }
}

// =============================================================================
// Shape
// =============================================================================

impl MatrixSection {
    /// Rebuild the grid at width `n` (at least 1). All cells start empty;
    /// use [`MatrixSection::resize`] to keep data.
    pub fn set_column_count(&mut self, n: usize) {
        let n = n.max(1);
        self.cells = empty_grid(&self.rows, n);
        self.column_count = n;
        self.refresh_headers();
    }

    /// Capture, resize, restore. Returns whether the width changed.
    pub fn resize(&mut self, n: usize) -> bool {
        let n = n.max(1);
        if n == self.column_count {
            return false;
        }
        let data = self.get_data();
        self.set_column_count(n);
        self.set_data(&data);
        true
    }

    /// Replace the row list, keeping the cells of every row whose label
    /// exists before and after. New rows start empty; dropped rows are lost.
    pub fn set_row_schemas(&mut self, rows: Vec<RowSchema>) {
        let mut previous: HashMap<String, (RowSchema, Vec<Cell>)> = self
            .rows
            .drain(..)
            .zip(self.cells.drain(..))
            .map(|(schema, cells)| (schema.label.clone(), (schema, cells)))
            .collect();

        let cells = rows
            .iter()
            .map(|schema| match previous.remove(&schema.label) {
                Some((old, cells))
                    if old.cell_type == schema.cell_type && old.bounds == schema.bounds =>
                {
                    cells
                }
                Some((old, cells)) => cells
                    .iter()
                    .map(|cell| {
                        let mut moved = Cell::empty(schema);
                        moved.set_text(&cell.matrix_text(&old), schema);
                        moved
                    })
                    .collect(),
                None => vec![Cell::empty(schema); self.column_count],
            })
            .collect();

        self.rows = rows;
        self.cells = cells;
        self.refresh_headers();
    }

    /// Recompute headers from the current width and name row.
    pub fn refresh_headers(&mut self) {
        let names: Vec<String> = match self
            .header_rule
            .name_row()
            .and_then(|label| self.row_index(label))
        {
            Some(row) => self.cells[row]
                .iter()
                .map(|c| c.matrix_text(&self.rows[row]))
                .collect(),
            None => Vec::new(),
        };
        self.headers = self.header_rule.generate(self.column_count, &names);
    }
}
