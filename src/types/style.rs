use serde::{Deserialize, Serialize};

use crate::border::Border;
use crate::fill::Fill;
use crate::font::Font;
use crate::numfmt::is_builtin_id;

use super::{Alignment, Protection, StyleDescriptor};

/// Fully resolved formatting of one cell format record.
///
/// Self-contained: components are copied out of the catalogs, so the value
/// stays valid while the stylesheet keeps growing.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    /// Name of the master style the record derives from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,

    // Number format
    pub num_fmt_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_code: Option<String>,
    pub is_date: bool,

    // Components with the catalog index they were taken from
    pub font_id: u32,
    pub font: Font,
    pub fill_id: u32,
    pub fill: Fill,
    pub border_id: u32,
    pub border: Border,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection: Option<Protection>,
    pub quote_prefix: bool,
}

impl ResolvedStyle {
    /// The built-in Normal style, used when a document has no cell formats at all.
    pub fn builtin_normal() -> Self {
        Self {
            style_name: Some("Normal".to_string()),
            num_fmt_id: 0,
            format_code: Some("General".to_string()),
            is_date: false,
            font_id: 0,
            font: Font::default(),
            fill_id: 0,
            fill: Fill::default(),
            border_id: 0,
            border: Border::default(),
            alignment: None,
            protection: None,
            quote_prefix: false,
        }
    }

    /// Convert back into a descriptor that interns to the same formatting.
    ///
    /// Components whose markup holds more than the typed views can express are
    /// left out of the descriptor.
    pub fn to_descriptor(&self) -> StyleDescriptor {
        // Custom ids are document-local, so those travel as their code.
        let (num_fmt, num_fmt_id) = match &self.format_code {
            Some(code) if !is_builtin_id(self.num_fmt_id) => (Some(code.clone()), None),
            _ => (None, Some(self.num_fmt_id)),
        };
        StyleDescriptor {
            num_fmt,
            num_fmt_id,
            font: self.font.spec(),
            fill: self.fill.spec(),
            border: self.border.spec().cloned(),
            alignment: self.alignment.clone(),
            protection: self.protection.clone(),
            parent_style: None,
        }
    }
}

macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $keyword:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Keyword as written in styles.xml.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $keyword),+
                }
            }

            /// Parse a styles.xml keyword.
            pub fn from_keyword(s: &str) -> Option<Self> {
                match s {
                    $($keyword => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

keyword_enum! {
    /// Horizontal alignment (`alignment/@horizontal`)
    pub enum HAlign {
        General => "general",
        Left => "left",
        Center => "center",
        Right => "right",
        Fill => "fill",
        Justify => "justify",
        CenterContinuous => "centerContinuous",
        Distributed => "distributed",
    }
}

keyword_enum! {
    /// Vertical alignment (`alignment/@vertical`)
    pub enum VAlign {
        Top => "top",
        Center => "center", // Note: Excel uses "center" not "middle"
        Bottom => "bottom",
        Justify => "justify",
        Distributed => "distributed",
    }
}

keyword_enum! {
    /// Border line styles from ECMA-376 Part 1, Section 18.18.3
    pub enum BorderStyle {
        None => "none",
        Thin => "thin",
        Medium => "medium",
        Thick => "thick",
        Dashed => "dashed",
        Dotted => "dotted",
        Double => "double",
        Hair => "hair",
        MediumDashed => "mediumDashed",
        DashDot => "dashDot",
        MediumDashDot => "mediumDashDot",
        DashDotDot => "dashDotDot",
        MediumDashDotDot => "mediumDashDotDot",
        SlantDashDot => "slantDashDot",
    }
}

keyword_enum! {
    /// Pattern fill types from ECMA-376 Part 1, Section 18.18.55
    #[derive(Default)]
    pub enum PatternType {
        #[default]
        None => "none",
        Solid => "solid",
        Gray125 => "gray125",
        Gray0625 => "gray0625",
        DarkGray => "darkGray",
        MediumGray => "mediumGray",
        LightGray => "lightGray",
        DarkHorizontal => "darkHorizontal",
        DarkVertical => "darkVertical",
        DarkDown => "darkDown",
        DarkUp => "darkUp",
        DarkGrid => "darkGrid",
        DarkTrellis => "darkTrellis",
        LightHorizontal => "lightHorizontal",
        LightVertical => "lightVertical",
        LightDown => "lightDown",
        LightUp => "lightUp",
        LightGrid => "lightGrid",
        LightTrellis => "lightTrellis",
    }
}

keyword_enum! {
    /// Underline style for font formatting
    pub enum UnderlineStyle {
        Single => "single",
        Double => "double",
        SingleAccounting => "singleAccounting",
        DoubleAccounting => "doubleAccounting",
        None => "none",
    }
}

keyword_enum! {
    /// Vertical alignment for text (subscript/superscript)
    pub enum VertAlign {
        Baseline => "baseline",
        Subscript => "subscript",
        Superscript => "superscript",
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
    fn test_keywords_round_trip() {
        for style in [
            BorderStyle::Thin,
            BorderStyle::MediumDashDotDot,
            BorderStyle::SlantDashDot,
        ] {
            assert_eq!(BorderStyle::from_keyword(style.as_str()), Some(style));
        }
        assert_eq!(HAlign::from_keyword("centerContinuous"), Some(HAlign::CenterContinuous));
        assert_eq!(VAlign::from_keyword("middle"), None);
        assert_eq!(PatternType::Gray125.as_str(), "gray125");
        assert_eq!(PatternType::default(), PatternType::None);
    }

    #[test]
    fn test_serde_uses_xml_keywords() {
        let json = serde_json::to_string(&BorderStyle::MediumDashed).unwrap();
        assert_eq!(json, "\"mediumDashed\"");
        let json = serde_json::to_string(&UnderlineStyle::SingleAccounting).unwrap();
        assert_eq!(json, "\"singleAccounting\"");
    }

    #[test]
    fn test_builtin_normal() {
        let normal = ResolvedStyle::builtin_normal();
        assert_eq!(normal.style_name.as_deref(), Some("Normal"));
        assert_eq!(normal.font.name().as_deref(), Some("Calibri"));
        assert_eq!(normal.num_fmt_id, 0);
    }
}
