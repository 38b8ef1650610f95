//! What an engine pass did.

use serde::Serialize;

use crate::logs::{log_info, log_info_indent, log_warning};

/// A shape change from `from` to `to` (columns or row groups).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeChange {
    pub section: String,
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Column count changes.
    pub resized: Vec<ShapeChange>,
    /// Row group count changes.
    pub regrouped: Vec<ShapeChange>,
    /// Sections whose headers were recomputed without a resize.
    pub headers_refreshed: Vec<String>,
    /// The pass was refused by the re-entrancy guard.
    pub skipped: bool,
}

impl PassReport {
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Nothing changed and nothing was refused.
    pub fn is_empty(&self) -> bool {
        self.resized.is_empty()
            && self.regrouped.is_empty()
            && self.headers_refreshed.is_empty()
            && !self.skipped
    }

    pub fn merge(&mut self, other: PassReport) {
        self.resized.extend(other.resized);
        self.regrouped.extend(other.regrouped);
        self.headers_refreshed.extend(other.headers_refreshed);
        self.skipped |= other.skipped;
    }

    pub fn log(&self, pass: &str) {
        if self.skipped {
            log_warning(format!("{} skipped: already running", pass));
        }
        if self.resized.is_empty() && self.regrouped.is_empty() {
            return;
        }
        log_info(format!(
            "{}: {} resized, {} regrouped",
            pass,
            self.resized.len(),
            self.regrouped.len()
        ));
        for change in &self.regrouped {
            log_info_indent(
                format!("{}: {} -> {} row groups", change.section, change.from, change.to),
                1,
            );
        }
        for change in &self.resized {
            log_info_indent(
                format!("{}: {} -> {} columns", change.section, change.from, change.to),
                1,
            );
        }
    }
}
