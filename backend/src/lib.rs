//! # W2Con - CE-QUAL-W2 control file editor
//!
//! W2Con holds the settings of a CE-QUAL-W2 control file as a set of typed
//! sections and keeps their shapes consistent: when a count changes (number
//! of waterbodies, tributaries, structures...), every section sized by that
//! count is resized and its data preserved where it still fits.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│  Document   │◀───▶│   Engine    │────▶│    Store    │
//! │  (schemas)  │     │ (sections)  │     │ (resizing)  │     │ (JSON, CSV) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use w2con::{catalog::w2, Engine, ExportOptions, Store};
//!
//! let mut engine = Engine::default();
//! engine.set_field(w2::GRID, "NWB", Some("3"))?;
//! Store::new("app_state.json", "w2_con.csv").export(&mut engine, &ExportOptions::default())?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Cells and field schemas
//! - [`section`] - Scalar and matrix sections, header and column rules
//! - [`catalog`] - Section definitions, including the CE-QUAL-W2 catalog
//! - [`document`] - The ordered set of live sections
//! - [`engine`] - Dependency-driven resizing
//! - [`serialize`] - JSON snapshot and flattened CSV export
//! - [`store`] - Snapshot and export files
//! - [`config`] - Environment configuration
//! - [`logs`] - Leveled log broadcasting

// Core modules
pub mod error;
pub mod models;

// Sections and their definitions
pub mod catalog;
pub mod document;
pub mod section;

// Resizing
pub mod engine;

// Persistence
pub mod serialize;
pub mod store;

// Runtime
pub mod config;
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CatalogError,
    CatalogResult,
    CellParseError,
    DocumentError,
    DocumentResult,
    SectionError,
    StoreError,
    StoreResult,
    W2ConError,
    W2ConResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Bounds, Cell, CellType, CellValue, FieldSchema, RowSchema};

// =============================================================================
// Re-exports - Sections
// =============================================================================

pub use section::{
    ColumnRule,
    HeaderRule,
    MatrixRow,
    MatrixSection,
    RowGroupRule,
    ScalarPair,
    ScalarSection,
    Section,
    SectionKind,
    SectionPayload,
};

// =============================================================================
// Re-exports - Catalog and Document
// =============================================================================

pub use catalog::{Catalog, MatrixDef, ScalarDef, SectionDef, W2_CATALOG};
pub use document::Document;

// =============================================================================
// Re-exports - Engine
// =============================================================================

pub use engine::{Engine, PassReport, RestoreReport, ShapeChange};

// =============================================================================
// Re-exports - Persistence
// =============================================================================

pub use serialize::{export_rows, render, write_export, Snapshot};
pub use store::{ExportOptions, Store};

// =============================================================================
// Re-exports - Runtime
// =============================================================================

pub use config::Config;
pub use logs::{set_log_level, LogEntry, LogLevel, LOG_BROADCASTER};
