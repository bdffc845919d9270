//! Error types for shape loading.

use thiserror::Error;

/// Everything that can abort a document parse. No partial shape is produced
/// when one of these is returned.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// Path data has a token that cannot be consumed at its grammar position.
    #[error("malformed path data at byte {offset}: {reason}")]
    MalformedPathSyntax { offset: usize, reason: String },

    /// A path command letter outside the supported set.
    #[error("unsupported path command '{command}' at byte {offset}")]
    UnsupportedCommand { command: char, offset: usize },

    /// A required numeric attribute is absent or not a number.
    #[error("<{element}> is missing numeric attribute '{name}'")]
    MissingAttribute { element: String, name: String },

    /// An element without a geometry mapping, rejected by policy.
    #[error("<{element}> has no outline geometry")]
    UnresolvableElement { element: String },

    /// Intersection splitting or winding normalization could not finish.
    #[error("geometry resolution failed: {0}")]
    GeometryResolutionFailed(String),

    /// No root `<svg>` element, or groups nested too deeply.
    #[error("invalid document structure: {0}")]
    DocumentStructureInvalid(String),

    /// The XML text itself could not be parsed.
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl ShapeError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        ShapeError::MalformedPathSyntax {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(element: &str, name: &str) -> Self {
        ShapeError::MissingAttribute {
            element: element.to_string(),
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShapeError>;
