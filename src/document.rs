//! The stylesheet document: every catalog of styles.xml plus the markup
//! around them that is passed through.

use std::io::{Read, Write};

use crate::border::Border;
use crate::catalog::{Catalog, CatalogKind};
use crate::dxf::{Dxf, TableStyle};
use crate::error::{Result, StyleError};
use crate::export::write_styles;
use crate::fill::Fill;
use crate::font::Font;
use crate::fragment::RawFragment;
use crate::numfmt;
use crate::options::{LoadOptions, WriteOptions};
use crate::styles::parse_styles;
use crate::types::{CellStyle, CellXf, NumFmt};

pub(crate) const DEFAULT_PROLOG: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";
pub(crate) const DEFAULT_ROOT_TAG: &str =
    "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">";

/// An in-memory `xl/styles.xml`.
///
/// Catalogs are append-only: format records refer to entries by position,
/// so entries are never removed or reordered. Each document owns its
/// catalogs; cells refer to formats by index into [`StyleSheet::cell_xfs`].
#[derive(Debug, Clone)]
pub struct StyleSheet {
    /// Everything before the root element (declaration, whitespace)
    pub(crate) prolog: Option<String>,
    /// The root start tag exactly as loaded, with its namespace declarations
    pub(crate) root_tag: String,
    pub(crate) root_name: String,

    pub(crate) num_fmts: Catalog<NumFmt>,
    pub(crate) fonts: Catalog<Font>,
    pub(crate) fills: Catalog<Fill>,
    pub(crate) borders: Catalog<Border>,
    pub(crate) cell_style_xfs: Catalog<CellXf>,
    pub(crate) cell_xfs: Catalog<CellXf>,
    pub(crate) cell_styles: Catalog<CellStyle>,
    pub(crate) dxfs: Catalog<Dxf>,
    pub(crate) table_styles: Catalog<TableStyle>,

    /// Legacy palette (`<colors>`)
    pub(crate) colors: Option<RawFragment>,
    /// Root children this model does not know, in document order
    pub(crate) unknown: Vec<RawFragment>,
    pub(crate) ext_lst: Option<RawFragment>,
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSheet {
    /// A new stylesheet holding Excel's defaults: the Calibri 11 font, the
    /// `none` and `gray125` fills, an empty border, the Normal master record,
    /// cell format 0 and the Normal cell style.
    pub fn new() -> Self {
        let mut sheet = Self::empty();
        // Pushing into empty catalogs cannot overflow.
        let _ = sheet.ensure_defaults();
        sheet
    }

    /// A document with no catalogs at all.
    pub(crate) fn empty() -> Self {
        Self {
            prolog: Some(DEFAULT_PROLOG.to_string()),
            root_tag: DEFAULT_ROOT_TAG.to_string(),
            root_name: "styleSheet".to_string(),
            num_fmts: Catalog::new(CatalogKind::NumFmts),
            fonts: Catalog::new(CatalogKind::Fonts),
            fills: Catalog::new(CatalogKind::Fills),
            borders: Catalog::new(CatalogKind::Borders),
            cell_style_xfs: Catalog::new(CatalogKind::CellStyleXfs),
            cell_xfs: Catalog::new(CatalogKind::CellXfs),
            cell_styles: Catalog::new(CatalogKind::CellStyles),
            dxfs: Catalog::new(CatalogKind::Dxfs),
            table_styles: Catalog::new(CatalogKind::TableStyles),
            colors: None,
            unknown: Vec::new(),
            ext_lst: None,
        }
    }

    /// Parse styles.xml bytes.
    pub fn load(data: &[u8]) -> Result<Self> {
        Self::load_with(data, &LoadOptions::default())
    }

    pub fn load_with(data: &[u8], options: &LoadOptions) -> Result<Self> {
        parse_styles(data, options)
    }

    /// Read and parse styles.xml from a reader.
    pub fn load_from<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::load_with(&data, options)
    }

    /// Serialize to styles.xml bytes. Fails on dangling references.
    ///
    /// A document without cell formats is written with the Excel defaults
    /// filled in, so cell format 0 always exists in the output.
    pub fn save(&self) -> Result<Vec<u8>> {
        self.save_with(&WriteOptions::default())
    }

    pub fn save_with(&self, options: &WriteOptions) -> Result<Vec<u8>> {
        if self.cell_xfs.is_empty() {
            let mut filled = self.clone();
            filled.ensure_defaults()?;
            return filled.save_with(options);
        }
        self.check_references()?;
        Ok(write_styles(self, options)?.into_bytes())
    }

    pub fn save_to<W: Write>(&self, mut writer: W, options: &WriteOptions) -> Result<()> {
        writer.write_all(&self.save_with(options)?)?;
        Ok(())
    }

    /// Namespace prefix of the root element, if it has one.
    pub(crate) fn element_prefix(&self) -> Option<&str> {
        self.root_name.split_once(':').map(|(prefix, _)| prefix)
    }

    pub fn num_fmts(&self) -> &Catalog<NumFmt> {
        &self.num_fmts
    }

    pub fn fonts(&self) -> &Catalog<Font> {
        &self.fonts
    }

    pub fn fills(&self) -> &Catalog<Fill> {
        &self.fills
    }

    pub fn borders(&self) -> &Catalog<Border> {
        &self.borders
    }

    /// Master format records, referenced by named styles.
    pub fn cell_style_xfs(&self) -> &Catalog<CellXf> {
        &self.cell_style_xfs
    }

    /// Cell format records, referenced by cells.
    pub fn cell_xfs(&self) -> &Catalog<CellXf> {
        &self.cell_xfs
    }

    pub fn cell_styles(&self) -> &Catalog<CellStyle> {
        &self.cell_styles
    }

    pub fn dxfs(&self) -> &Catalog<Dxf> {
        &self.dxfs
    }

    pub fn table_styles(&self) -> &Catalog<TableStyle> {
        &self.table_styles
    }

    pub fn colors(&self) -> Option<&RawFragment> {
        self.colors.as_ref()
    }

    pub fn ext_lst(&self) -> Option<&RawFragment> {
        self.ext_lst.as_ref()
    }

    /// `defaultTableStyle` of the `tableStyles` element.
    pub fn default_table_style(&self) -> Option<&str> {
        catalog_attr(&self.table_styles, "defaultTableStyle")
    }

    /// `defaultPivotStyle` of the `tableStyles` element.
    pub fn default_pivot_style(&self) -> Option<&str> {
        catalog_attr(&self.table_styles, "defaultPivotStyle")
    }

    /// Edit a font in place. Every format record using it changes too.
    pub fn font_mut(&mut self, index: u32) -> Result<&mut Font> {
        self.fonts.get_mut(index)
    }

    /// Edit a fill in place. Every format record using it changes too.
    pub fn fill_mut(&mut self, index: u32) -> Result<&mut Fill> {
        self.fills.get_mut(index)
    }

    pub fn add_table_style(&mut self, style: TableStyle) -> Result<u32> {
        self.table_styles.push(style)
    }

    /// Create whichever Excel defaults are missing, so index 0 of every
    /// component catalog and of `cellXfs` exists.
    pub fn ensure_defaults(&mut self) -> Result<()> {
        if self.fonts.is_empty() {
            self.fonts.push(Font::default())?;
        }
        if self.fills.is_empty() {
            self.fills.push(Fill::default())?;
            self.fills.push(Fill::gray125())?;
        }
        if self.borders.is_empty() {
            self.borders.push(Border::default())?;
        }
        if self.cell_style_xfs.is_empty() {
            self.cell_style_xfs.push(CellXf::zeroed())?;
        }
        if self.cell_xfs.is_empty() {
            self.cell_xfs.push(CellXf {
                xf_id: Some(0),
                ..CellXf::zeroed()
            })?;
        }
        if self.cell_styles.is_empty() {
            self.cell_styles.push(CellStyle {
                builtin_id: Some(0),
                ..CellStyle::new("Normal", 0)
            })?;
        }
        Ok(())
    }

    /// Every index reference points into its catalog.
    pub(crate) fn check_references(&self) -> Result<()> {
        for xfs in [&self.cell_style_xfs, &self.cell_xfs] {
            for xf in xfs {
                self.fonts.check(xf.font())?;
                self.fills.check(xf.fill())?;
                self.borders.check(xf.border())?;
            }
        }
        for xf in &self.cell_xfs {
            if let Some(parent) = xf.xf_id {
                self.cell_style_xfs.check(parent)?;
            }
        }
        for style in &self.cell_styles {
            self.cell_style_xfs.check(style.xf_id)?;
        }
        Ok(())
    }

    /// Full integrity check: every reference, every number format id used
    /// by a record, and uniqueness of custom number format ids.
    pub fn validate(&self) -> Result<()> {
        self.check_references()?;
        for xf in self.cell_style_xfs.iter().chain(&self.cell_xfs) {
            numfmt::format_code(&self.num_fmts, xf.num_fmt())?;
        }
        match numfmt::duplicate_custom_ids(&self.num_fmts).first() {
            Some(&id) => Err(StyleError::DuplicateCustomNumFmtId(id)),
            None => Ok(()),
        }
    }
}

fn catalog_attr<'a, T>(catalog: &'a Catalog<T>, key: &str) -> Option<&'a str> {
    catalog
        .attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
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
    use crate::types::ApplyFlags;

    #[test]
    fn test_new_has_defaults() {
        let sheet = StyleSheet::new();
        assert_eq!(sheet.fonts().len(), 1);
        assert_eq!(sheet.fills().len(), 2);
        assert_eq!(sheet.borders().len(), 1);
        assert_eq!(sheet.cell_style_xfs().len(), 1);
        assert_eq!(sheet.cell_xfs().len(), 1);
        assert_eq!(sheet.cell_styles().get(0).unwrap().name, "Normal");
        assert!(sheet.num_fmts().is_empty());
        sheet.validate().unwrap();
    }

    #[test]
    fn test_dangling_font_fails_save() {
        let mut sheet = StyleSheet::new();
        sheet
            .cell_xfs
            .push(CellXf {
                font_id: Some(7),
                apply: ApplyFlags::all(),
                ..CellXf::zeroed()
            })
            .unwrap();
        match sheet.save() {
            Err(StyleError::IndexOutOfRange {
                catalog: CatalogKind::Fonts,
                index: 7,
                len: 1,
            }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_duplicate_custom_ids() {
        let mut sheet = StyleSheet::new();
        for code in ["0.0", "0.000"] {
            sheet
                .num_fmts
                .push(NumFmt {
                    id: 170,
                    format_code: code.to_string(),
                })
                .unwrap();
        }
        assert!(matches!(
            sheet.validate(),
            Err(StyleError::DuplicateCustomNumFmtId(170))
        ));
        // duplicates do not block saving
        sheet.save().unwrap();
    }

    #[test]
    fn test_validate_reports_unknown_num_fmt() {
        let mut sheet = StyleSheet::new();
        sheet
            .cell_xfs
            .push(CellXf {
                num_fmt_id: Some(300),
                ..CellXf::zeroed()
            })
            .unwrap();
        assert!(matches!(sheet.validate(), Err(StyleError::UnknownNumFmt(300))));
    }

    #[test]
    fn test_save_writes_cell_format_zero() {
        let mut sheet = StyleSheet::empty();
        sheet.fonts.push(Font::default()).unwrap();
        let text = String::from_utf8(sheet.save().unwrap()).unwrap();
        assert!(text.contains(
            r#"<cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs>"#
        ));
        assert!(text.contains(r#"<fonts count="1">"#));
        assert!(text.contains(r#"<fills count="2">"#));
        // the document itself is left as it was
        assert!(sheet.cell_xfs().is_empty());
        assert!(sheet.fills().is_empty());
    }

    #[test]
    fn test_save_to_writer() {
        let mut out = Vec::new();
        StyleSheet::new()
            .save_to(&mut out, &WriteOptions::default())
            .unwrap();
        assert!(out.starts_with(b"<?xml"));
    }
}
