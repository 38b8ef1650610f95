//! The live document: an ordered set of sections built from a catalog.

use crate::catalog::{Catalog, W2_CATALOG};
use crate::error::{DocumentError, DocumentResult};
use crate::section::{MatrixSection, ScalarSection, Section, SectionKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    sections: Vec<Section>,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_catalog(&W2_CATALOG)
    }
}

impl Document {
    /// Fresh sections in catalog order.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            sections: catalog.instantiate(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(Section::name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sections.iter().any(|s| s.name() == name)
    }

    pub fn get(&self, name: &str) -> DocumentResult<&Section> {
        self.sections
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| DocumentError::UnknownSection(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> DocumentResult<&mut Section> {
        self.sections
            .iter_mut()
            .find(|s| s.name() == name)
            .ok_or_else(|| DocumentError::UnknownSection(name.to_string()))
    }

    pub fn scalar(&self, name: &str) -> DocumentResult<&ScalarSection> {
        self.get(name)?
            .as_scalar()
            .ok_or_else(|| wrong_kind(name, SectionKind::Scalar))
    }

    pub fn scalar_mut(&mut self, name: &str) -> DocumentResult<&mut ScalarSection> {
        self.get_mut(name)?
            .as_scalar_mut()
            .ok_or_else(|| wrong_kind(name, SectionKind::Scalar))
    }

    pub fn matrix(&self, name: &str) -> DocumentResult<&MatrixSection> {
        self.get(name)?
            .as_matrix()
            .ok_or_else(|| wrong_kind(name, SectionKind::Matrix))
    }

    pub fn matrix_mut(&mut self, name: &str) -> DocumentResult<&mut MatrixSection> {
        self.get_mut(name)?
            .as_matrix_mut()
            .ok_or_else(|| wrong_kind(name, SectionKind::Matrix))
    }

    pub fn matrices(&self) -> impl Iterator<Item = &MatrixSection> {
        self.sections.iter().filter_map(Section::as_matrix)
    }

    /// Dependency count of a scalar field; unknown or unset fields count as 0.
    pub fn scalar_count(&self, section: &str, field: &str) -> i64 {
        self.scalar(section).map_or(0, |s| s.count(field))
    }

    /// Every section back to its declared shape with empty values.
    pub fn reset_all(&mut self) {
        self.sections.iter_mut().for_each(Section::reset);
    }
}

fn wrong_kind(name: &str, expected: SectionKind) -> DocumentError {
    DocumentError::WrongKind {
        section: name.to_string(),
        expected: expected.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::w2;

    #[test]
    fn test_default_document_follows_catalog() {
        let doc = Document::default();
        let names: Vec<&str> = doc.names().collect();
        let expected: Vec<&str> = W2_CATALOG.names().collect();
        assert_eq!(names, expected);
        assert!(doc.contains(w2::ICE_COVER));
    }

    #[test]
    fn test_kind_checked_accessors() {
        let mut doc = Document::default();
        assert!(doc.scalar(w2::GRID).is_ok());
        assert!(matches!(
            doc.matrix(w2::GRID),
            Err(DocumentError::WrongKind { expected: "matrix", .. })
        ));
        assert!(matches!(
            doc.scalar_mut("Nowhere"),
            Err(DocumentError::UnknownSection(_))
        ));
    }

    #[test]
    fn test_reset_all_restores_fresh_document() {
        let mut doc = Document::default();
        doc.scalar_mut(w2::GRID).unwrap().set("NWB", Some("3"));
        doc.matrix_mut(w2::CALCULATIONS).unwrap().set_column_count(3);
        assert_eq!(doc.scalar_count(w2::GRID, "NWB"), 3);

        doc.reset_all();
        assert_eq!(doc, Document::default());
        assert_eq!(doc.scalar_count(w2::GRID, "NWB"), 0);
    }
}
