//! Named cell styles (`cellStyles`) and their master records.
//!
//! A named style is a `cellStyle` entry pointing at a master record in
//! `cellStyleXfs`. Cell formats derive from a master through `xfId`.

use log::debug;

use crate::document::StyleSheet;
use crate::error::{Result, StyleError};
use crate::types::{ApplyFlags, CellStyle, CellXf, ResolvedStyle, StyleDescriptor};

/// Highest built-in style id.
const LAST_BUILTIN_STYLE_ID: u32 = 53;

/// Outline styles share one built-in id and are told apart by `iLevel`.
const ROW_LEVEL: u32 = 1;
const COL_LEVEL: u32 = 2;

/// Get builtin style name by ID
///
/// See ECMA-376 Part 1 Section 18.8.7. Ids 1 and 2 are the row and column
/// outline styles, whose names carry the outline level (`RowLevel_1` ...).
pub const fn builtin_style_name(builtin_id: u32) -> Option<&'static str> {
    match builtin_id {
        0 => Some("Normal"),
        1 => Some("RowLevel_"),
        2 => Some("ColLevel_"),
        3 => Some("Comma"),
        4 => Some("Currency"),
        5 => Some("Percent"),
        6 => Some("Comma [0]"),
        7 => Some("Currency [0]"),
        8 => Some("Hyperlink"),
        9 => Some("Followed Hyperlink"),
        10 => Some("Note"),
        11 => Some("Warning Text"),
        12 => Some("Emphasis 1"),
        13 => Some("Emphasis 2"),
        14 => Some("Emphasis 3"),
        15 => Some("Title"),
        16 => Some("Heading 1"),
        17 => Some("Heading 2"),
        18 => Some("Heading 3"),
        19 => Some("Heading 4"),
        20 => Some("Input"),
        21 => Some("Output"),
        22 => Some("Calculation"),
        23 => Some("Check Cell"),
        24 => Some("Linked Cell"),
        25 => Some("Total"),
        26 => Some("Good"),
        27 => Some("Bad"),
        28 => Some("Neutral"),
        29 => Some("Accent1"),
        30 => Some("20% - Accent1"),
        31 => Some("40% - Accent1"),
        32 => Some("60% - Accent1"),
        33 => Some("Accent2"),
        34 => Some("20% - Accent2"),
        35 => Some("40% - Accent2"),
        36 => Some("60% - Accent2"),
        37 => Some("Accent3"),
        38 => Some("20% - Accent3"),
        39 => Some("40% - Accent3"),
        40 => Some("60% - Accent3"),
        41 => Some("Accent4"),
        42 => Some("20% - Accent4"),
        43 => Some("40% - Accent4"),
        44 => Some("60% - Accent4"),
        45 => Some("Accent5"),
        46 => Some("20% - Accent5"),
        47 => Some("40% - Accent5"),
        48 => Some("60% - Accent5"),
        49 => Some("Accent6"),
        50 => Some("20% - Accent6"),
        51 => Some("40% - Accent6"),
        52 => Some("60% - Accent6"),
        53 => Some("Explanatory Text"),
        _ => None,
    }
}

/// Built-in style id for a style name (exact match).
///
/// `RowLevel_N` and `ColLevel_N` (N = 1..7) map to ids 1 and 2.
pub fn builtin_style_id(name: &str) -> Option<u32> {
    if let Some((id, _)) = outline_level(name) {
        return Some(id);
    }
    (0..=LAST_BUILTIN_STYLE_ID)
        .filter(|&id| id != ROW_LEVEL && id != COL_LEVEL)
        .find(|&id| builtin_style_name(id) == Some(name))
}

/// Built-in id and zero-based `iLevel` of an outline style name.
fn outline_level(name: &str) -> Option<(u32, u32)> {
    let (id, level) = if let Some(n) = name.strip_prefix("RowLevel_") {
        (ROW_LEVEL, n)
    } else {
        (COL_LEVEL, name.strip_prefix("ColLevel_")?)
    };
    match level.parse::<u32>() {
        Ok(n @ 1..=7) => Some((id, n - 1)),
        _ => None,
    }
}

impl StyleSheet {
    /// The cell style with this name. Names compare ASCII case-insensitively,
    /// as Excel does.
    pub fn named_style(&self, name: &str) -> Option<&CellStyle> {
        self.cell_styles
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Master record index of the style `name`, creating the style from
    /// `descriptor` when it does not exist yet.
    ///
    /// An existing style is returned unchanged. A new master marks the
    /// components the descriptor specifies as applied; the others are taken
    /// from the Normal master (or from `descriptor.parent_style`).
    pub fn add_named_style(&mut self, name: &str, descriptor: &StyleDescriptor) -> Result<u32> {
        if let Some(style) = self.named_style(name) {
            return Ok(style.xf_id);
        }
        self.ensure_defaults()?;

        let base_id = match &descriptor.parent_style {
            Some(parent) => {
                self.named_style(parent)
                    .ok_or_else(|| StyleError::UnknownStyle(parent.clone()))?
                    .xf_id
            }
            None => 0,
        };
        let base = self.cell_style_xfs.get(base_id)?.clone();
        let ids = self.intern_components(descriptor, &base)?;

        let master = CellXf {
            num_fmt_id: Some(ids.num_fmt),
            font_id: Some(ids.font),
            fill_id: Some(ids.fill),
            border_id: Some(ids.border),
            apply: ApplyFlags {
                number_format: Some(
                    descriptor.num_fmt.is_some() || descriptor.num_fmt_id.is_some(),
                ),
                font: Some(descriptor.font.is_some()),
                fill: Some(descriptor.fill.is_some()),
                border: Some(descriptor.border.is_some()),
                alignment: Some(descriptor.alignment.is_some()),
                protection: Some(descriptor.protection.is_some()),
            },
            alignment: descriptor.alignment.clone(),
            protection: descriptor.protection.clone(),
            ..CellXf::default()
        };
        let xf_id = self.cell_style_xfs.push(master)?;
        self.cell_styles.push(CellStyle {
            builtin_id: builtin_style_id(name),
            i_level: outline_level(name).map(|(_, level)| level),
            ..CellStyle::new(name, xf_id)
        })?;
        debug!("added cell style {name:?} with master record {xf_id}");
        Ok(xf_id)
    }

    /// Resolve the master record behind the style `name`.
    pub fn resolve_named_style(&self, name: &str) -> Result<ResolvedStyle> {
        let style = self
            .named_style(name)
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))?;
        self.resolve_master(style.xf_id)
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
    use crate::types::{Color, FillSpec, FontSpec};

    #[test]
    fn test_builtin_style_name() {
        assert_eq!(builtin_style_name(0), Some("Normal"));
        assert_eq!(builtin_style_name(16), Some("Heading 1"));
        assert_eq!(builtin_style_name(17), Some("Heading 2"));
        assert_eq!(builtin_style_name(15), Some("Title"));
        assert_eq!(builtin_style_name(26), Some("Good"));
        assert_eq!(builtin_style_name(27), Some("Bad"));
        assert_eq!(builtin_style_name(5), Some("Percent"));
        assert_eq!(builtin_style_name(54), None);
    }

    #[test]
    fn test_builtin_style_id() {
        assert_eq!(builtin_style_id("Heading 1"), Some(16));
        assert_eq!(builtin_style_id("60% - Accent6"), Some(52));
        assert_eq!(builtin_style_id("RowLevel_3"), Some(1));
        assert_eq!(builtin_style_id("ColLevel_7"), Some(2));
        assert_eq!(builtin_style_id("RowLevel_8"), None);
        assert_eq!(builtin_style_id("RowLevel_"), None);
        assert_eq!(builtin_style_id("My Style"), None);
    }

    #[test]
    fn test_outline_style_gets_level() {
        let mut sheet = StyleSheet::new();
        sheet
            .add_named_style("RowLevel_2", &StyleDescriptor::new())
            .unwrap();
        let style = sheet.named_style("RowLevel_2").unwrap();
        assert_eq!((style.builtin_id, style.i_level), (Some(1), Some(1)));
    }

    #[test]
    fn test_named_style_lookup_ignores_case() {
        let sheet = StyleSheet::new();
        assert_eq!(sheet.named_style("normal").unwrap().xf_id, 0);
        assert!(sheet.named_style("Heading 1").is_none());
    }

    #[test]
    fn test_add_named_style() {
        let mut sheet = StyleSheet::new();
        let desc = StyleDescriptor::new().font(FontSpec::new("Cambria", 15.0).bold());
        let xf_id = sheet.add_named_style("Heading 1", &desc).unwrap();
        assert_eq!(xf_id, 1);
        assert_eq!(sheet.add_named_style("heading 1", &desc).unwrap(), 1);
        assert_eq!(sheet.cell_styles().len(), 2);

        let style = sheet.named_style("Heading 1").unwrap();
        assert_eq!(style.builtin_id, Some(16));

        let master = sheet.cell_style_xfs().get(xf_id).unwrap();
        assert_eq!(master.apply.font, Some(true));
        assert_eq!(master.apply.fill, Some(false));

        let resolved = sheet.resolve_named_style("Heading 1").unwrap();
        assert_eq!(resolved.style_name.as_deref(), Some("Heading 1"));
        assert_eq!(resolved.font.name().as_deref(), Some("Cambria"));
        assert!(resolved.font.bold());
    }

    #[test]
    fn test_cells_derive_from_named_style() {
        let mut sheet = StyleSheet::new();
        let yellow = StyleDescriptor::new().fill(FillSpec::solid(Color::rgb("FFFF00")));
        let master = sheet.add_named_style("Highlight", &yellow).unwrap();
        assert_eq!(sheet.named_style("Highlight").unwrap().builtin_id, None);

        let cell = StyleDescriptor::new()
            .font(FontSpec::new("Calibri", 11.0).italic())
            .parent_style("Highlight");
        let index = sheet.intern(&cell).unwrap();
        let xf = sheet.cell_xfs().get(index).unwrap();
        assert_eq!(xf.xf_id, Some(master));
        assert_eq!(xf.fill(), sheet.cell_style_xfs().get(master).unwrap().fill());

        let resolved = sheet.resolve(index).unwrap();
        assert_eq!(resolved.style_name.as_deref(), Some("Highlight"));
        assert!(resolved.font.italic());
    }

    #[test]
    fn test_resolve_unknown_style() {
        let sheet = StyleSheet::new();
        assert!(matches!(
            sheet.resolve_named_style("Missing"),
            Err(StyleError::UnknownStyle(_))
        ));
    }
}
