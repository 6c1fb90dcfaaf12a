//! Indexed catalogs: the ordered, append-only tables a stylesheet is made of.
//!
//! Every entry is addressed by its zero-based position. The `count` written
//! on save is always the current length, so count and entries cannot drift.

use std::fmt;
use std::slice;

use crate::error::{Result, StyleError};

/// Which catalog a value lives in. Used for error reporting and element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellStyleXfs,
    CellXfs,
    CellStyles,
    Dxfs,
    TableStyles,
}

impl CatalogKind {
    /// Element name of the catalog in styles.xml.
    pub const fn element(self) -> &'static str {
        match self {
            Self::NumFmts => "numFmts",
            Self::Fonts => "fonts",
            Self::Fills => "fills",
            Self::Borders => "borders",
            Self::CellStyleXfs => "cellStyleXfs",
            Self::CellXfs => "cellXfs",
            Self::CellStyles => "cellStyles",
            Self::Dxfs => "dxfs",
            Self::TableStyles => "tableStyles",
        }
    }

    /// Element name of a single entry.
    pub const fn entry_element(self) -> &'static str {
        match self {
            Self::NumFmts => "numFmt",
            Self::Fonts => "font",
            Self::Fills => "fill",
            Self::Borders => "border",
            Self::CellStyleXfs | Self::CellXfs => "xf",
            Self::CellStyles => "cellStyle",
            Self::Dxfs => "dxf",
            Self::TableStyles => "tableStyle",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element())
    }
}

/// An ordered collection of entries of one kind.
///
/// Entries are only ever appended; there is no removal, because other
/// records refer to entries by position.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    kind: CatalogKind,
    items: Vec<T>,
    /// Attributes on the catalog element other than `count`, kept raw (still escaped).
    pub(crate) attrs: Vec<(String, String)>,
    /// Whether the element was present in the loaded document.
    pub(crate) present: bool,
}

impl<T> Catalog<T> {
    pub fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            attrs: Vec::new(),
            present: false,
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    /// Number of entries; this is what `count` is written as.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entry at `index`, or `IndexOutOfRange`.
    pub fn get(&self, index: u32) -> Result<&T> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get(i))
            .ok_or(StyleError::IndexOutOfRange {
                catalog: self.kind,
                index,
                len: self.items.len(),
            })
    }

    pub fn get_mut(&mut self, index: u32) -> Result<&mut T> {
        let len = self.items.len();
        let kind = self.kind;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.items.get_mut(i))
            .ok_or(StyleError::IndexOutOfRange {
                catalog: kind,
                index,
                len,
            })
    }

    /// Checks that `index` addresses an existing entry.
    pub fn check(&self, index: u32) -> Result<()> {
        self.get(index).map(|_| ())
    }

    /// Append an entry and return its new index.
    pub fn push(&mut self, item: T) -> Result<u32> {
        let index =
            u32::try_from(self.items.len()).map_err(|_| StyleError::CatalogFull(self.kind))?;
        self.items.push(item);
        Ok(index)
    }

    /// Index of the first entry matching `pred` (lowest index wins).
    pub fn position<P>(&self, pred: P) -> Option<u32>
    where
        P: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .position(pred)
            .and_then(|i| u32::try_from(i).ok())
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Entries paired with their `u32` index.
    pub fn indexed(&self) -> impl Iterator<Item = (u32, &T)> {
        (0u32..).zip(self.items.iter())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_position() {
        let mut catalog = Catalog::new(CatalogKind::Fonts);
        assert_eq!(catalog.push("a").unwrap(), 0);
        assert_eq!(catalog.push("b").unwrap(), 1);
        assert_eq!(catalog.len(), 2);
        assert_eq!(*catalog.get(1).unwrap(), "b");
    }

    #[test]
    fn test_get_out_of_range() {
        let mut catalog = Catalog::new(CatalogKind::Fills);
        catalog.push(1).unwrap();
        match catalog.get(3) {
            Err(StyleError::IndexOutOfRange {
                catalog: CatalogKind::Fills,
                index: 3,
                len: 1,
            }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_position_prefers_lowest_index() {
        let mut catalog = Catalog::new(CatalogKind::Borders);
        for v in [5, 7, 7, 9] {
            catalog.push(v).unwrap();
        }
        assert_eq!(catalog.position(|v| *v == 7), Some(1));
        assert_eq!(catalog.position(|v| *v == 8), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(CatalogKind::CellStyleXfs.element(), "cellStyleXfs");
        assert_eq!(CatalogKind::CellXfs.entry_element(), "xf");
        assert_eq!(CatalogKind::NumFmts.to_string(), "numFmts");
    }
}
