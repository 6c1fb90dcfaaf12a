//! Format record resolution: cell format index -> fully resolved style.
//!
//! Walks xf -> (parent master xf) -> font/fill/border/numFmt. Read-only;
//! the result owns copies of its components.

use crate::document::StyleSheet;
use crate::error::Result;
use crate::numfmt::{format_code, is_date_format};
use crate::types::{CellXf, ResolvedStyle};

/// Built-in ids without a fixed code that are dates in every locale that
/// defines them (East Asian date/time formats).
const fn is_locale_date_id(id: u32) -> bool {
    matches!(id, 27..=36 | 50..=58)
}

/// Component id honoring the record's apply flag.
///
/// Per ECMA-376 an xf applies its own component unless the apply flag is
/// explicitly false, in which case the master style's component is used.
fn pick(own: Option<u32>, applies: bool, parent: Option<Option<u32>>) -> u32 {
    if applies {
        own.unwrap_or(0)
    } else {
        parent.flatten().or(own).unwrap_or(0)
    }
}

impl StyleSheet {
    /// Resolve the cell format at `index` in `cellXfs`.
    ///
    /// A document without any cell formats resolves index 0 to the built-in
    /// Normal style. A reference past the end of any catalog fails with
    /// `IndexOutOfRange`.
    pub fn resolve(&self, index: u32) -> Result<ResolvedStyle> {
        if index == 0 && self.cell_xfs.is_empty() {
            return Ok(ResolvedStyle::builtin_normal());
        }
        let xf = self.cell_xfs.get(index)?;
        let parent = xf
            .xf_id
            .map(|id| self.cell_style_xfs.get(id))
            .transpose()?;
        let style_name = xf.xf_id.and_then(|id| self.style_name_for(id));
        self.resolve_record(xf, parent, style_name)
    }

    /// Resolve the master record at `index` in `cellStyleXfs`.
    pub fn resolve_master(&self, index: u32) -> Result<ResolvedStyle> {
        let xf = self.cell_style_xfs.get(index)?;
        self.resolve_record(xf, None, self.style_name_for(index))
    }

    fn style_name_for(&self, master: u32) -> Option<String> {
        self.cell_styles
            .iter()
            .find(|s| s.xf_id == master)
            .map(|s| s.name.clone())
    }

    fn resolve_record(
        &self,
        xf: &CellXf,
        parent: Option<&CellXf>,
        style_name: Option<String>,
    ) -> Result<ResolvedStyle> {
        let num_fmt_id = pick(
            xf.num_fmt_id,
            xf.applies_number_format(),
            parent.map(|p| p.num_fmt_id),
        );
        let font_id = pick(xf.font_id, xf.applies_font(), parent.map(|p| p.font_id));
        let fill_id = pick(xf.fill_id, xf.applies_fill(), parent.map(|p| p.fill_id));
        let border_id = pick(xf.border_id, xf.applies_border(), parent.map(|p| p.border_id));

        let alignment = if xf.applies_alignment() {
            xf.alignment.clone()
        } else {
            parent
                .and_then(|p| p.alignment.clone())
                .or_else(|| xf.alignment.clone())
        };
        let protection = if xf.applies_protection() {
            xf.protection.clone()
        } else {
            parent
                .and_then(|p| p.protection.clone())
                .or_else(|| xf.protection.clone())
        };

        let format_code = format_code(&self.num_fmts, num_fmt_id)?;
        let is_date = match &format_code {
            Some(code) => is_date_format(code),
            None => is_locale_date_id(num_fmt_id),
        };

        Ok(ResolvedStyle {
            style_name,
            num_fmt_id,
            format_code,
            is_date,
            font_id,
            font: self.fonts.get(font_id)?.clone(),
            fill_id,
            fill: self.fills.get(fill_id)?.clone(),
            border_id,
            border: self.borders.get(border_id)?.clone(),
            alignment,
            protection,
            quote_prefix: xf.quote_prefix.unwrap_or(false),
        })
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
    use crate::catalog::CatalogKind;
    use crate::error::StyleError;
    use crate::font::Font;
    use crate::types::{ApplyFlags, FontSpec, NumFmt};

    fn sheet_with_bold_master() -> StyleSheet {
        let mut sheet = StyleSheet::new();
        let bold = sheet
            .fonts
            .push(Font::from_spec(&FontSpec::new("Calibri", 11.0).bold()))
            .unwrap();
        sheet
            .cell_style_xfs
            .push(CellXf {
                font_id: Some(bold),
                ..CellXf::zeroed()
            })
            .unwrap();
        sheet
    }

    #[test]
    fn test_empty_document_resolves_normal() {
        let sheet = StyleSheet::empty();
        let style = sheet.resolve(0).unwrap();
        assert_eq!(style, ResolvedStyle::builtin_normal());
        assert!(sheet.resolve(1).is_err());
    }

    #[test]
    fn test_resolve_default() {
        let style = StyleSheet::new().resolve(0).unwrap();
        assert_eq!(style.style_name.as_deref(), Some("Normal"));
        assert_eq!(style.format_code.as_deref(), Some("General"));
        assert_eq!(style.font.name().as_deref(), Some("Calibri"));
        assert!(!style.is_date);
    }

    #[test]
    fn test_apply_font_false_inherits_from_master() {
        let mut sheet = sheet_with_bold_master();
        sheet
            .cell_xfs
            .push(CellXf {
                xf_id: Some(1),
                apply: ApplyFlags {
                    font: Some(false),
                    ..ApplyFlags::default()
                },
                ..CellXf::zeroed()
            })
            .unwrap();
        let style = sheet.resolve(1).unwrap();
        assert_eq!(style.font_id, 1);
        assert!(style.font.bold());
    }

    #[test]
    fn test_applied_font_ignores_master() {
        let mut sheet = sheet_with_bold_master();
        sheet
            .cell_xfs
            .push(CellXf {
                xf_id: Some(1),
                ..CellXf::zeroed()
            })
            .unwrap();
        assert_eq!(sheet.resolve(1).unwrap().font_id, 0);
    }

    #[test]
    fn test_out_of_range_font() {
        let mut sheet = StyleSheet::new();
        sheet
            .cell_xfs
            .push(CellXf {
                font_id: Some(9),
                ..CellXf::zeroed()
            })
            .unwrap();
        assert!(matches!(
            sheet.resolve(1),
            Err(StyleError::IndexOutOfRange {
                catalog: CatalogKind::Fonts,
                index: 9,
                ..
            })
        ));
    }

    #[test]
    fn test_out_of_range_parent_and_index() {
        let mut sheet = StyleSheet::new();
        sheet
            .cell_xfs
            .push(CellXf {
                xf_id: Some(4),
                ..CellXf::zeroed()
            })
            .unwrap();
        assert!(matches!(
            sheet.resolve(1),
            Err(StyleError::IndexOutOfRange {
                catalog: CatalogKind::CellStyleXfs,
                ..
            })
        ));
        assert!(matches!(
            sheet.resolve(2),
            Err(StyleError::IndexOutOfRange {
                catalog: CatalogKind::CellXfs,
                ..
            })
        ));
    }

    #[test]
    fn test_custom_and_date_formats() {
        let mut sheet = StyleSheet::new();
        sheet
            .num_fmts
            .push(NumFmt {
                id: 164,
                format_code: "yyyy-mm-dd".to_string(),
            })
            .unwrap();
        for id in [164, 14, 31, 4] {
            sheet
                .cell_xfs
                .push(CellXf {
                    num_fmt_id: Some(id),
                    ..CellXf::zeroed()
                })
                .unwrap();
        }
        let custom = sheet.resolve(1).unwrap();
        assert_eq!(custom.format_code.as_deref(), Some("yyyy-mm-dd"));
        assert!(custom.is_date);
        assert!(sheet.resolve(2).unwrap().is_date);
        let locale = sheet.resolve(3).unwrap();
        assert_eq!(locale.format_code, None);
        assert!(locale.is_date);
        assert!(!sheet.resolve(4).unwrap().is_date);
    }
}
