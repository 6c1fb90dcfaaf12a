//! xlstyles - the SpreadsheetML stylesheet (`xl/styles.xml`)
//!
//! Loads, resolves, interns and saves the shared formatting catalogs of an
//! XLSX workbook:
//! - Indexed catalogs for number formats, fonts, fills, borders, master and
//!   cell format records, named styles, differential formats, table styles
//! - Resolution of a cell format index into a self-contained style
//! - Find-or-create interning of requested formats without duplicates
//! - Verbatim passthrough of fonts, fills and everything else not modeled
//!
//! # Usage
//!
//! ```
//! use xlstyles::{FontSpec, StyleDescriptor, StyleSheet};
//!
//! let mut sheet = StyleSheet::new();
//! let bold = StyleDescriptor::new().font(FontSpec::new("Calibri", 11.0).bold());
//! let index = sheet.intern(&bold)?;
//! assert_eq!(sheet.intern(&bold)?, index);
//! assert!(sheet.resolve(index)?.font.bold());
//!
//! let xml = sheet.save()?;
//! let reloaded = StyleSheet::load(&xml)?;
//! assert_eq!(reloaded.cell_xfs().len(), 2);
//! # Ok::<(), xlstyles::StyleError>(())
//! ```

pub mod border;
pub mod catalog;
pub mod document;
pub mod dxf;
pub mod error;
pub mod export;
pub mod fill;
pub mod font;
pub mod fragment;
mod intern;
pub mod named_styles;
pub mod numfmt;
pub mod options;
mod resolve;
pub mod shared;
pub mod styles;
pub mod types;
pub(crate) mod xml_helpers;

pub use border::Border;
pub use catalog::{Catalog, CatalogKind};
pub use document::StyleSheet;
pub use dxf::{Dxf, TableStyle};
pub use error::{Result, StyleError};
pub use export::{resolved_styles, resolved_styles_json};
pub use fill::Fill;
pub use font::Font;
pub use fragment::RawFragment;
pub use options::{LoadOptions, WriteOptions};
pub use shared::SharedStyleSheet;

pub use types::*;
