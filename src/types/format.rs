use serde::{Deserialize, Serialize};

use crate::fragment::RawFragment;

use super::{HAlign, VAlign};

/// A custom number format (`<numFmt numFmtId=".." formatCode=".."/>`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumFmt {
    pub id: u32,
    pub format_code: String,
}

/// Text alignment block of an xf (`<alignment .../>`)
///
/// Every attribute is optional so an absent attribute stays absent on save.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
    /// 0-180 degrees, or 255 for vertical text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rotation: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_indent: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify_last_line: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_to_fit: Option<bool>,
    /// 0=context, 1=LTR, 2=RTL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<u32>,
}

impl Alignment {
    pub fn horizontal(h: HAlign) -> Self {
        Self {
            horizontal: Some(h),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_vertical(mut self, v: VAlign) -> Self {
        self.vertical = Some(v);
        self
    }

    #[must_use]
    pub fn wrapped(mut self) -> Self {
        self.wrap_text = Some(true);
        self
    }
}

/// Protection block of an xf (`<protection locked=".." hidden=".."/>`)
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Protection {
    /// Absent means locked (Excel default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// The `apply*` attributes of an xf.
///
/// Per ECMA-376, apply* attributes default to TRUE when absent.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyFlags {
    pub number_format: Option<bool>,
    pub font: Option<bool>,
    pub fill: Option<bool>,
    pub border: Option<bool>,
    pub alignment: Option<bool>,
    pub protection: Option<bool>,
}

impl ApplyFlags {
    /// Every component applied directly.
    pub fn all() -> Self {
        Self {
            number_format: Some(true),
            font: Some(true),
            fill: Some(true),
            border: Some(true),
            alignment: Some(true),
            protection: Some(true),
        }
    }
}

/// Format record (xf) from cellXfs or cellStyleXfs
///
/// Component ids index into the font, fill and border catalogs; `num_fmt_id`
/// is a number format *id* (built-in or custom), not a position. Absent ids
/// read as 0.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CellXf {
    pub num_fmt_id: Option<u32>,
    pub font_id: Option<u32>,
    pub fill_id: Option<u32>,
    pub border_id: Option<u32>,
    /// Reference to cellStyleXfs entry (for cellXfs only)
    pub xf_id: Option<u32>,
    pub apply: ApplyFlags,
    pub quote_prefix: Option<bool>,
    pub pivot_button: Option<bool>,
    pub alignment: Option<Alignment>,
    pub protection: Option<Protection>,
    /// `<extLst>` child, passed through untouched
    pub ext_lst: Option<RawFragment>,
}

impl CellXf {
    /// Record pointing at the first entry of every catalog.
    pub fn zeroed() -> Self {
        Self {
            num_fmt_id: Some(0),
            font_id: Some(0),
            fill_id: Some(0),
            border_id: Some(0),
            ..Self::default()
        }
    }

    pub fn num_fmt(&self) -> u32 {
        self.num_fmt_id.unwrap_or(0)
    }

    pub fn font(&self) -> u32 {
        self.font_id.unwrap_or(0)
    }

    pub fn fill(&self) -> u32 {
        self.fill_id.unwrap_or(0)
    }

    pub fn border(&self) -> u32 {
        self.border_id.unwrap_or(0)
    }

    pub fn applies_number_format(&self) -> bool {
        self.apply.number_format.unwrap_or(true)
    }

    pub fn applies_font(&self) -> bool {
        self.apply.font.unwrap_or(true)
    }

    pub fn applies_fill(&self) -> bool {
        self.apply.fill.unwrap_or(true)
    }

    pub fn applies_border(&self) -> bool {
        self.apply.border.unwrap_or(true)
    }

    pub fn applies_alignment(&self) -> bool {
        self.apply.alignment.unwrap_or(true)
    }

    pub fn applies_protection(&self) -> bool {
        self.apply.protection.unwrap_or(true)
    }
}

/// Named style metadata from cellStyles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStyle {
    pub name: String,
    /// Index into cellStyleXfs
    pub xf_id: u32,
    pub builtin_id: Option<u32>,
    pub i_level: Option<u32>,
    pub hidden: Option<bool>,
    pub custom_builtin: Option<bool>,
}

impl CellStyle {
    pub fn new(name: impl Into<String>, xf_id: u32) -> Self {
        Self {
            name: name.into(),
            xf_id,
            builtin_id: None,
            i_level: None,
            hidden: None,
            custom_builtin: None,
        }
    }
}
