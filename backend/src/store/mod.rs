//! File persistence for the snapshot and the export.
//!
//! The snapshot is rewritten whole on every save, through a temporary file
//! in the same directory and a rename. Loading decodes into a scratch
//! document first: if reading, parsing or validation fails, the live
//! document is left as it was.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::document::Document;
use crate::engine::{Engine, RestoreReport};
use crate::error::{StoreError, StoreResult};
use crate::logs::{log_info, log_success, log_warning_indent};
use crate::serialize::{write_export, Snapshot};

/// Options for [`Store::export`].
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Target file; the store's export path when `None`.
    pub path: Option<PathBuf>,
    /// Clear every section once the export and the snapshot are written.
    pub clear_after: bool,
}

#[derive(Debug, Clone)]
pub struct Store {
    state_path: PathBuf,
    export_path: PathBuf,
}

impl Store {
    pub fn new(state_path: impl AsRef<Path>, export_path: impl AsRef<Path>) -> Self {
        Self {
            state_path: state_path.as_ref().to_path_buf(),
            export_path: export_path.as_ref().to_path_buf(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.state_file, &config.export_file)
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Load the snapshot into `engine`. `Ok(None)` when there is no file yet.
    pub fn load(&self, engine: &mut Engine) -> StoreResult<Option<RestoreReport>> {
        if !self.state_path.exists() {
            return Ok(None);
        }
        self.import(&self.state_path, engine).map(Some)
    }

    /// Restore `engine` from any snapshot file.
    pub fn import(&self, path: &Path, engine: &mut Engine) -> StoreResult<RestoreReport> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        let snapshot = Snapshot::parse(&content)?;

        let decoded = snapshot.decode(engine.document());
        let mut report = engine.restore(&decoded.payloads);
        let mut warnings = decoded.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;

        log_info(format!(
            "Loaded {} sections from {}",
            decoded.payloads.len(),
            path.display()
        ));
        for warning in &report.warnings {
            log_warning_indent(warning, 1);
        }
        Ok(report)
    }

    /// Write the snapshot of `document`, stamped with the current time.
    pub fn save(&self, document: &Document) -> StoreResult<()> {
        let content = Snapshot::capture(document)
            .stamped(chrono::Utc::now().to_rfc3339())
            .to_json_string()?;

        if let Some(parent) = self.state_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let tmp = self.state_path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.state_path).map_err(|e| StoreError::io(&self.state_path, e))?;
        Ok(())
    }

    /// Write the flattened export, then the snapshot, then optionally clear.
    ///
    /// Returns the export path.
    pub fn export(&self, engine: &mut Engine, options: &ExportOptions) -> StoreResult<PathBuf> {
        let path = options
            .path
            .clone()
            .unwrap_or_else(|| self.export_path.clone());
        write_export(engine.document(), &path)?;
        self.save(engine.document())?;
        log_success(format!("Exported to {}", path.display()));

        if options.clear_after {
            engine.clear_all();
        }
        Ok(path)
    }
}
