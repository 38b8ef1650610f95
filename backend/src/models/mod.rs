//! Domain models shared by every section.
//!
//! - [`CellType`] - the closed set of value kinds
//! - [`CellValue`] - a raw value tagged with its kind
//! - [`Cell`] - a value plus its touched flag
//! - [`FieldSchema`] / [`RowSchema`] - field and row descriptors

pub mod cell;
pub mod schema;

pub use cell::{Cell, CellType, CellValue, OFF, ON};
pub use schema::{Bounds, FieldSchema, RowSchema, DEFAULT_MAX, DEFAULT_MIN};
