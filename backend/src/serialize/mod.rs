//! The two serializations of a document.
//!
//! - [`snapshot`] - structured, lossless JSON used to save and reload state
//! - [`export`] - flattened CSV blocks for the control-file workflow

pub mod export;
pub mod snapshot;

pub use export::{export_rows, render, section_rows, write_export};
pub use snapshot::{Decoded, Snapshot, SNAPSHOT_VERSION};
