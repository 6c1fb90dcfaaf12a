//! Structured error types for xlstyles.

use crate::catalog::CatalogKind;

/// All errors that can occur while loading, resolving, interning or saving a stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute list on an element.
    #[error("XML attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// General parse error (structure, bad values, truncated input).
    #[error("Parse error: {0}")]
    Parse(String),

    /// A required attribute is absent.
    #[error("<{element}> is missing required attribute `{attribute}`")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// A format record or named style points past the end of a catalog.
    #[error("{catalog} index {index} out of range (catalog holds {len} entries)")]
    IndexOutOfRange {
        catalog: CatalogKind,
        index: u32,
        len: usize,
    },

    /// A custom number format id is referenced but never defined.
    #[error("number format id {0} is not defined")]
    UnknownNumFmt(u32),

    /// Two custom number formats share one id.
    #[error("custom number format id {0} is defined more than once")]
    DuplicateCustomNumFmtId(u32),

    /// A catalog `count` attribute disagrees with its entries (strict loads only).
    #[error("<{catalog}> declares count={declared} but holds {actual} entries")]
    CountMismatch {
        catalog: CatalogKind,
        declared: u32,
        actual: usize,
    },

    /// No named cell style with the given name.
    #[error("no cell style named {0:?}")]
    UnknownStyle(String),

    /// Markup handed to a fragment is not a single well-formed element,
    /// or a patch cannot be applied to it.
    #[error("Invalid fragment: {0}")]
    Fragment(String),

    /// A catalog cannot grow past `u32::MAX` entries.
    #[error("{0} is full")]
    CatalogFull(CatalogKind),

    /// JSON serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StyleError>;

impl StyleError {
    /// True for errors raised while reading markup (the load-aborting kind).
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::Xml(_)
                | Self::Attr(_)
                | Self::Parse(_)
                | Self::MissingAttribute { .. }
                | Self::CountMismatch { .. }
        )
    }
}

impl From<std::str::Utf8Error> for StyleError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Parse(format!("invalid UTF-8: {e}"))
    }
}
