use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::xml_helpers::{push_attr, push_display_attr, Attrs};

/// A color reference as stored in styles.xml (`<color>`, `<fgColor>`, ...).
///
/// Exactly one addressing mode is kept. When a source element carries both
/// `rgb` and `theme`, `rgb` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Color {
    /// ARGB hex string, e.g. `FFFF0000`.
    Rgb { rgb: String },
    /// Theme palette index with optional tint in `[-1.0, 1.0]`.
    Theme { theme: u32, tint: Option<f64> },
    /// Legacy indexed palette entry.
    Indexed { indexed: u32 },
    /// System automatic color.
    Auto,
}

impl Color {
    /// RGB color. Six-digit values get an opaque alpha prefix.
    pub fn rgb(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#').to_ascii_uppercase();
        let rgb = if hex.len() == 6 { format!("FF{hex}") } else { hex };
        Self::Rgb { rgb }
    }

    pub fn theme(theme: u32) -> Self {
        Self::Theme { theme, tint: None }
    }

    pub fn theme_tint(theme: u32, tint: f64) -> Self {
        Self::Theme {
            theme,
            tint: Some(tint),
        }
    }

    /// Read a color from the attributes of a color element.
    ///
    /// Returns `None` when the element carries no addressing attribute.
    pub(crate) fn from_attrs(attrs: &Attrs, element: &str) -> Result<Option<Self>> {
        if let Some(rgb) = attrs.string("rgb") {
            return Ok(Some(Self::Rgb { rgb }));
        }
        if let Some(theme) = attrs.u32(element, "theme")? {
            return Ok(Some(Self::Theme {
                theme,
                tint: attrs.f64(element, "tint")?,
            }));
        }
        if let Some(indexed) = attrs.u32(element, "indexed")? {
            return Ok(Some(Self::Indexed { indexed }));
        }
        if attrs.bool(element, "auto")? == Some(true) {
            return Ok(Some(Self::Auto));
        }
        Ok(None)
    }

    /// Append `<element .../>` for this color.
    pub(crate) fn write(&self, out: &mut String, element: &str) {
        out.push('<');
        out.push_str(element);
        match self {
            Self::Rgb { rgb } => push_attr(out, "rgb", rgb),
            Self::Theme { theme, tint } => {
                push_display_attr(out, "theme", Some(theme));
                push_display_attr(out, "tint", tint.as_ref());
            }
            Self::Indexed { indexed } => push_display_attr(out, "indexed", Some(indexed)),
            Self::Auto => out.push_str(" auto=\"1\""),
        }
        out.push_str("/>");
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use quick_xml::events::BytesStart;

    fn attrs(content: &str) -> Attrs {
        let e = BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()));
        Attrs::from_start(&e).unwrap()
    }

    #[test]
    fn test_rgb_wins_over_theme() {
        let color = Color::from_attrs(&attrs(r#"color rgb="FF112233" theme="4""#), "color")
            .unwrap()
            .unwrap();
        assert_eq!(color, Color::rgb("FF112233"));
    }

    #[test]
    fn test_theme_with_tint() {
        let color = Color::from_attrs(&attrs(r#"color theme="4" tint="-0.25""#), "color")
            .unwrap()
            .unwrap();
        assert_eq!(color, Color::theme_tint(4, -0.25));
    }

    #[test]
    fn test_no_addressing_attribute() {
        assert_eq!(Color::from_attrs(&attrs("color"), "color").unwrap(), None);
    }

    #[test]
    fn test_rgb_constructor_adds_alpha() {
        assert_eq!(
            Color::rgb("#ff0000"),
            Color::Rgb {
                rgb: "FFFF0000".to_string()
            }
        );
    }

    #[test]
    fn test_write() {
        let mut out = String::new();
        Color::theme_tint(1, 0.5).write(&mut out, "fgColor");
        Color::Indexed { indexed: 64 }.write(&mut out, "bgColor");
        Color::Auto.write(&mut out, "color");
        assert_eq!(
            out,
            r#"<fgColor theme="1" tint="0.5"/><bgColor indexed="64"/><color auto="1"/>"#
        );
    }
}
