//! Document sections.
//!
//! A section is either a [`ScalarSection`] (fixed fields) or a
//! [`MatrixSection`] (dynamic table). [`rules`] holds the declarations that
//! drive a matrix's shape and headers.

pub mod matrix;
pub mod rules;
pub mod scalar;

pub use matrix::{MatrixRow, MatrixSection};
pub use rules::{ColumnRule, HeaderRule, RowGroupRule};
pub use scalar::{ScalarPair, ScalarSection};

/// Which of the two section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Scalar,
    Matrix,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Scalar => "scalar",
            SectionKind::Matrix => "matrix",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-section data as exchanged with the snapshot and the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPayload {
    Scalar(Vec<ScalarPair>),
    Matrix(Vec<MatrixRow>),
}

impl SectionPayload {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionPayload::Scalar(_) => SectionKind::Scalar,
            SectionPayload::Matrix(_) => SectionKind::Matrix,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Scalar(ScalarSection),
    Matrix(MatrixSection),
}

impl Section {
    pub fn name(&self) -> &str {
        match self {
            Section::Scalar(s) => s.name(),
            Section::Matrix(m) => m.name(),
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Scalar(_) => SectionKind::Scalar,
            Section::Matrix(_) => SectionKind::Matrix,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarSection> {
        match self {
            Section::Scalar(s) => Some(s),
            Section::Matrix(_) => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarSection> {
        match self {
            Section::Scalar(s) => Some(s),
            Section::Matrix(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&MatrixSection> {
        match self {
            Section::Matrix(m) => Some(m),
            Section::Scalar(_) => None,
        }
    }

    pub fn as_matrix_mut(&mut self) -> Option<&mut MatrixSection> {
        match self {
            Section::Matrix(m) => Some(m),
            Section::Scalar(_) => None,
        }
    }

    /// Current data: `get_all` or `get_data`.
    pub fn payload(&self) -> SectionPayload {
        match self {
            Section::Scalar(s) => SectionPayload::Scalar(s.get_all()),
            Section::Matrix(m) => SectionPayload::Matrix(m.get_data()),
        }
    }

    /// Clear values; matrices also return to their declared shape.
    pub fn reset(&mut self) {
        match self {
            Section::Scalar(s) => s.clear(),
            Section::Matrix(m) => m.reset(),
        }
    }
}

impl From<ScalarSection> for Section {
    fn from(section: ScalarSection) -> Self {
        Section::Scalar(section)
    }
}

impl From<MatrixSection> for Section {
    fn from(section: MatrixSection) -> Self {
        Section::Matrix(section)
    }
}
