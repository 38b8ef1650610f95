//! Static section catalog.
//!
//! A [`Catalog`] is the ordered, immutable list of section definitions a
//! [`Document`](crate::document::Document) is built from. It is plain
//! configuration data and is serializable, so a catalog can be listed or
//! stored next to a snapshot. The built-in CE-QUAL-W2 catalog is exposed as
//! [`W2_CATALOG`].

pub mod w2;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{CellType, FieldSchema, RowSchema};
use crate::section::{ColumnRule, HeaderRule, MatrixSection, RowGroupRule, ScalarSection, Section};

/// The built-in control-file catalog, built once per process.
pub static W2_CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog::trusted(w2::sections()));

// =============================================================================
// Section Definitions
// =============================================================================

/// Definition of a scalar section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarDef {
    pub name: String,
    pub fields: Vec<FieldSchema>,
}

impl ScalarDef {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Definition of a matrix section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixDef {
    pub name: String,
    pub rows: Vec<RowSchema>,
    #[serde(default)]
    pub headers: HeaderRule,
    #[serde(default)]
    pub columns: ColumnRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_groups: Option<RowGroupRule>,
}

impl MatrixDef {
    pub fn new(name: impl Into<String>, rows: Vec<RowSchema>) -> Self {
        Self {
            name: name.into(),
            rows,
            headers: HeaderRule::default(),
            columns: ColumnRule::Fixed,
            row_groups: None,
        }
    }

    pub fn headers(mut self, rule: HeaderRule) -> Self {
        self.headers = rule;
        self
    }

    pub fn columns(mut self, rule: ColumnRule) -> Self {
        self.columns = rule;
        self
    }

    pub fn row_groups(mut self, rule: RowGroupRule) -> Self {
        self.row_groups = Some(rule);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionDef {
    Scalar(ScalarDef),
    Matrix(MatrixDef),
}

impl SectionDef {
    pub fn name(&self) -> &str {
        match self {
            SectionDef::Scalar(def) => &def.name,
            SectionDef::Matrix(def) => &def.name,
        }
    }

    /// Declared fields or base rows.
    pub fn schemas(&self) -> &[FieldSchema] {
        match self {
            SectionDef::Scalar(def) => &def.fields,
            SectionDef::Matrix(def) => &def.rows,
        }
    }

    /// A fresh live section.
    pub fn instantiate(&self) -> Section {
        match self {
            SectionDef::Scalar(def) => ScalarSection::new(&def.name, def.fields.clone()).into(),
            SectionDef::Matrix(def) => {
                let mut section = MatrixSection::new(&def.name, def.rows.clone())
                    .with_headers(def.headers.clone())
                    .with_columns(def.columns.clone());
                if let Some(groups) = &def.row_groups {
                    section = section.with_row_groups(groups.clone());
                }
                section.into()
            }
        }
    }
}

impl From<ScalarDef> for SectionDef {
    fn from(def: ScalarDef) -> Self {
        SectionDef::Scalar(def)
    }
}

impl From<MatrixDef> for SectionDef {
    fn from(def: MatrixDef) -> Self {
        SectionDef::Matrix(def)
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    sections: Vec<SectionDef>,
}

impl Catalog {
    /// Build a catalog, checking names, labels and every dependency link.
    pub fn new(sections: Vec<SectionDef>) -> CatalogResult<Self> {
        let catalog = Self { sections };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build without validation. Only for definitions covered by tests.
    pub(crate) fn trusted(sections: Vec<SectionDef>) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &[SectionDef] {
        &self.sections
    }

    pub fn get(&self, name: &str) -> Option<&SectionDef> {
        self.sections.iter().find(|s| s.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Fresh live sections in catalog order.
    pub fn instantiate(&self) -> Vec<Section> {
        self.sections.iter().map(SectionDef::instantiate).collect()
    }

    /// Whether a scalar field drives the width of some matrix.
    pub fn is_dimension(&self, section: &str, field: &str) -> bool {
        self.sections.iter().any(|def| match def {
            SectionDef::Matrix(MatrixDef {
                columns: ColumnRule::Scalar { section: s, field: f },
                ..
            }) => s == section && f == field,
            _ => false,
        })
    }

    fn validate(&self) -> CatalogResult<()> {
        let mut names = HashSet::new();
        for def in &self.sections {
            if !names.insert(def.name()) {
                return Err(CatalogError::DuplicateSection(def.name().to_string()));
            }
            if def.schemas().is_empty() {
                return Err(CatalogError::EmptySection(def.name().to_string()));
            }
            check_labels(def.name(), def.schemas())?;
        }

        for def in &self.sections {
            if let SectionDef::Matrix(matrix) = def {
                self.validate_matrix(matrix)?;
            }
        }
        Ok(())
    }

    fn validate_matrix(&self, def: &MatrixDef) -> CatalogResult<()> {
        let has_row = |row: &str| def.rows.iter().any(|r| r.label == row);
        let missing = |row: &str| CatalogError::MissingRow {
            section: def.name.clone(),
            row: row.to_string(),
        };

        if let Some(name_row) = def.headers.name_row() {
            if !has_row(name_row) {
                return Err(missing(name_row));
            }
        }

        match &def.columns {
            ColumnRule::Fixed => {}
            ColumnRule::Scalar { section, field } => {
                let target = self.get(section).ok_or_else(|| CatalogError::UnknownSection {
                    section: def.name.clone(),
                    target: section.clone(),
                })?;
                let driving = match target {
                    SectionDef::Scalar(scalar) => {
                        scalar.fields.iter().find(|f| &f.label == field)
                    }
                    SectionDef::Matrix(_) => None,
                };
                if !driving.is_some_and(|f| f.cell_type == CellType::Integer) {
                    return Err(CatalogError::UnknownField {
                        section: def.name.clone(),
                        target: section.clone(),
                        field: field.clone(),
                    });
                }
            }
            rule => {
                if let Some(row) = rule.driving_rows().into_iter().find(|r| !has_row(*r)) {
                    return Err(missing(row));
                }
            }
        }

        if let Some(groups) = &def.row_groups {
            if !has_row(groups.count_row.as_str()) {
                return Err(missing(groups.count_row.as_str()));
            }
            if groups.kinds.is_empty() {
                return Err(CatalogError::EmptySection(def.name.clone()));
            }
            check_labels(&def.name, &groups.kinds)?;
        }
        Ok(())
    }
}

fn check_labels(section: &str, schemas: &[FieldSchema]) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for schema in schemas {
        if !seen.insert(schema.label.as_str()) {
            return Err(CatalogError::DuplicateLabel {
                section: section.to_string(),
                label: schema.label.clone(),
            });
        }
    }
    Ok(())
}
