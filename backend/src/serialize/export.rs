//! Flattened tabular export.
//!
//! One block per section, each followed by an empty line:
//!
//! - scalar section: a row of labels, then a row of values (`""` when unset);
//! - matrix section: a row of column headers, then one row per matrix row
//!   without its label. The row naming the columns is left out.

use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::section::Section;

const LINE_END: &[u8] = b"\r\n";

/// The rows of one section's block, separator excluded.
pub fn section_rows(section: &Section) -> Vec<Vec<String>> {
    match section {
        Section::Scalar(scalar) => {
            let pairs = scalar.get_all();
            vec![
                pairs.iter().map(|(label, _)| label.clone()).collect(),
                pairs
                    .into_iter()
                    .map(|(_, value)| value.unwrap_or_default())
                    .collect(),
            ]
        }
        Section::Matrix(matrix) => {
            let mut rows = Vec::with_capacity(matrix.rows().len() + 1);
            rows.push(matrix.headers().to_vec());
            rows.extend(
                matrix
                    .get_data()
                    .into_iter()
                    .filter(|row| !row.first().is_some_and(|label| matrix.is_name_row(label)))
                    .map(|row| row.into_iter().skip(1).collect()),
            );
            rows
        }
    }
}

/// Every block in document order; an empty row marks each separator.
pub fn export_rows(document: &Document) -> Vec<Vec<String>> {
    document
        .sections()
        .iter()
        .flat_map(|section| {
            let mut rows = section_rows(section);
            rows.push(Vec::new());
            rows
        })
        .collect()
}

/// Render the export as CSV bytes (comma separated, CRLF line ends).
pub fn render(document: &Document) -> StoreResult<Vec<u8>> {
    let mut out = Vec::new();
    for section in document.sections() {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());
        for row in section_rows(section) {
            writer.write_record(&row)?;
        }
        let block = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        out.extend_from_slice(&block);
        out.extend_from_slice(LINE_END);
    }
    Ok(out)
}

/// Write the export to `path`.
pub fn write_export(document: &Document, path: impl AsRef<Path>) -> StoreResult<()> {
    let path = path.as_ref();
    let bytes = render(document)?;
    fs::write(path, bytes).map_err(|e| StoreError::io(path, e))
}
