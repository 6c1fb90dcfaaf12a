//! Load and save options.

/// Options for reading styles.xml.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail with `CountMismatch` when a catalog's `count` attribute
    /// disagrees with its entries. By default the entries win and a
    /// warning is logged.
    pub strict_counts: bool,
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            strict_counts: true,
        }
    }
}

/// Options for writing styles.xml.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Write the XML declaration (the loaded one, or a standard one).
    pub xml_declaration: bool,
    /// Drop every empty catalog, including ones the loaded document had.
    ///
    /// An empty catalog and an absent one mean the same thing, and with this
    /// set no empty catalog is ever written. When unset (the default), a
    /// catalog the source had is written back even when empty
    /// (`<dxfs count="0"/>`), so unedited documents come back byte for byte;
    /// empty catalogs the source did not have are still left out.
    pub omit_empty_catalogs: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            omit_empty_catalogs: false,
        }
    }
}
