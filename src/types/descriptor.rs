use serde::{Deserialize, Serialize};

use super::{
    Alignment, BorderStyle, Color, PatternType, Protection, UnderlineStyle, VertAlign,
};

/// The formatting an application asks for when it styles a cell.
///
/// Absent components are taken from the parent style (Normal by default).
/// A descriptor with nothing set is the default format, index 0.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDescriptor {
    /// Number format code, e.g. `0.00` or `yyyy-mm-dd`. Stored as a custom
    /// entry unless the catalog already has one with this code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_fmt: Option<String>,
    /// Existing number format id (a built-in or a catalog entry). Ignored
    /// when `num_fmt` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_fmt_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection: Option<Protection>,
    /// Named cell style the new format derives from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_style: Option<String>,
}

impl StyleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing is requested, i.e. the default format.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn num_fmt(mut self, code: impl Into<String>) -> Self {
        self.num_fmt = Some(code.into());
        self
    }

    #[must_use]
    pub fn num_fmt_id(mut self, id: u32) -> Self {
        self.num_fmt_id = Some(id);
        self
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = Some(font);
        self
    }

    #[must_use]
    pub fn fill(mut self, fill: FillSpec) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn border(mut self, border: BorderSpec) -> Self {
        self.border = Some(border);
        self
    }

    #[must_use]
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    #[must_use]
    pub fn protection(mut self, protection: Protection) -> Self {
        self.protection = Some(protection);
        self
    }

    #[must_use]
    pub fn parent_style(mut self, name: impl Into<String>) -> Self {
        self.parent_style = Some(name.into());
        self
    }
}

/// Typed view of the font properties the interner understands
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strike: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<UnderlineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vert_align: Option<VertAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Font family class (1=roman, 2=swiss, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<u32>,
    /// Font scheme: "minor" (body) or "major" (headings)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
}

impl FontSpec {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: Some(name.into()),
            size: Some(size),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    #[must_use]
    pub fn underline(mut self, style: UnderlineStyle) -> Self {
        self.underline = Some(style);
        self
    }

    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// Typed view of a pattern fill
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillSpec {
    #[serde(default)]
    pub pattern: PatternType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fg_color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<Color>,
}

impl FillSpec {
    /// No fill (`patternType="none"`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Solid fill in one color. Excel stores the visible color as `fgColor`.
    pub fn solid(color: Color) -> Self {
        Self {
            pattern: PatternType::Solid,
            fg_color: Some(color),
            bg_color: Some(Color::Indexed { indexed: 64 }),
        }
    }

    pub fn pattern(pattern: PatternType, fg: Option<Color>, bg: Option<Color>) -> Self {
        Self {
            pattern,
            fg_color: fg,
            bg_color: bg,
        }
    }
}

/// One edge of a border
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BorderStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl BorderLine {
    pub fn new(style: BorderStyle, color: Option<Color>) -> Self {
        Self {
            style: Some(style),
            color,
        }
    }

    /// An edge with neither style nor color draws nothing.
    pub fn is_empty(&self) -> bool {
        self.style.is_none() && self.color.is_none()
    }
}

/// Typed view of a border. Empty edges are `None`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<BorderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<BorderLine>,
    /// Line from bottom-left to top-right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal_up: Option<bool>,
    /// Line from top-left to bottom-right
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagonal_down: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<bool>,
}

impl BorderSpec {
    /// No visible edges.
    pub fn none() -> Self {
        Self::default()
    }

    /// Same line on left, right, top and bottom.
    pub fn all(style: BorderStyle, color: Option<Color>) -> Self {
        let line = BorderLine::new(style, color);
        Self {
            left: Some(line.clone()),
            right: Some(line.clone()),
            top: Some(line.clone()),
            bottom: Some(line),
            ..Self::default()
        }
    }
}
