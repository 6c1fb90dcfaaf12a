//! Font entries of the `fonts` catalog.
//!
//! A font is kept as its raw `<font>` markup. The getters below parse only
//! the child they are asked about; the setters patch only that child.

use serde::{Serialize, Serializer};

use crate::error::{Result, StyleError};
use crate::fragment::{RawFragment, TagSpan};
use crate::types::{Color, FontSpec, UnderlineStyle, VertAlign};
use crate::xml_helpers::{push_attr, push_display_attr};

/// Canonical child order of `<font>` (CT_Font).
const CHILD_ORDER: &[&str] = &[
    "b", "i", "strike", "condense", "extend", "outline", "shadow", "u", "vertAlign", "sz",
    "color", "name", "family", "charset", "scheme",
];

const DEFAULT_FONT: &str = r#"<font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    fragment: RawFragment,
}

impl Default for Font {
    /// Calibri 11, theme text color, swiss family, minor scheme.
    fn default() -> Self {
        Self {
            fragment: RawFragment::from_captured(DEFAULT_FONT),
        }
    }
}

impl Font {
    /// Wrap `<font>` markup.
    pub fn new(markup: impl Into<String>) -> Result<Self> {
        Self::from_fragment(RawFragment::new(markup)?)
    }

    pub(crate) fn from_fragment(fragment: RawFragment) -> Result<Self> {
        let root = fragment.root_name()?;
        if root != "font" {
            return Err(StyleError::Fragment(format!("expected <font>, found <{root}>")));
        }
        Ok(Self { fragment })
    }

    /// Render a font from a spec, children in schema order.
    pub fn from_spec(spec: &FontSpec) -> Self {
        let mut out = String::from("<font>");
        if spec.bold {
            out.push_str("<b/>");
        }
        if spec.italic {
            out.push_str("<i/>");
        }
        if spec.strike {
            out.push_str("<strike/>");
        }
        match spec.underline {
            Some(UnderlineStyle::Single) => out.push_str("<u/>"),
            Some(u) => {
                out.push_str("<u");
                push_attr(&mut out, "val", u.as_str());
                out.push_str("/>");
            }
            None => {}
        }
        if let Some(v) = spec.vert_align {
            out.push_str("<vertAlign");
            push_attr(&mut out, "val", v.as_str());
            out.push_str("/>");
        }
        if let Some(sz) = spec.size {
            out.push_str("<sz");
            push_display_attr(&mut out, "val", Some(sz));
            out.push_str("/>");
        }
        if let Some(color) = &spec.color {
            color.write(&mut out, "color");
        }
        if let Some(name) = &spec.name {
            out.push_str("<name");
            push_attr(&mut out, "val", name);
            out.push_str("/>");
        }
        if let Some(family) = spec.family {
            out.push_str("<family");
            push_display_attr(&mut out, "val", Some(family));
            out.push_str("/>");
        }
        if let Some(scheme) = &spec.scheme {
            out.push_str("<scheme");
            push_attr(&mut out, "val", scheme);
            out.push_str("/>");
        }
        out.push_str("</font>");
        Self {
            fragment: RawFragment::from_captured(&out),
        }
    }

    pub fn fragment(&self) -> &RawFragment {
        &self.fragment
    }

    pub fn as_str(&self) -> &str {
        self.fragment.as_str()
    }

    pub fn name(&self) -> Option<String> {
        self.val("name")
    }

    pub fn size(&self) -> Option<f64> {
        self.val("sz").and_then(|v| v.trim().parse().ok())
    }

    pub fn bold(&self) -> bool {
        self.flag("b")
    }

    pub fn italic(&self) -> bool {
        self.flag("i")
    }

    pub fn strike(&self) -> bool {
        self.flag("strike")
    }

    /// `<u/>` without a value is a single underline.
    pub fn underline(&self) -> Option<UnderlineStyle> {
        if !self.fragment.has_child(&["u"]).unwrap_or(false) {
            return None;
        }
        match self.val("u") {
            None => Some(UnderlineStyle::Single),
            Some(v) => UnderlineStyle::from_keyword(&v),
        }
    }

    pub fn vert_align(&self) -> Option<VertAlign> {
        self.val("vertAlign").and_then(|v| VertAlign::from_keyword(&v))
    }

    pub fn color(&self) -> Result<Option<Color>> {
        let scan = self.fragment.scan()?;
        match scan.find(&["color"]) {
            Some(span) => Color::from_attrs(&span.attrs()?, "color"),
            None => Ok(None),
        }
    }

    pub fn family(&self) -> Option<u32> {
        self.val("family").and_then(|v| v.trim().parse().ok())
    }

    pub fn scheme(&self) -> Option<String> {
        self.val("scheme")
    }

    pub fn set_bold(&mut self, on: bool) -> Result<()> {
        self.set_flag("b", on)
    }

    pub fn set_italic(&mut self, on: bool) -> Result<()> {
        self.set_flag("i", on)
    }

    pub fn set_strike(&mut self, on: bool) -> Result<()> {
        self.set_flag("strike", on)
    }

    pub fn set_size(&mut self, size: f64) -> Result<()> {
        self.set_val("sz", &size.to_string())
    }

    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.set_val("name", name)
    }

    pub fn set_color(&mut self, color: &Color) -> Result<()> {
        let mut markup = String::new();
        color.write(&mut markup, "color");
        if self.fragment.has_child(&["color"])? {
            self.fragment.replace_child(&["color"], &markup)
        } else {
            self.fragment.insert_child(&[], &markup, following("color"))
        }
    }

    /// Typed view of everything the font says, ignoring children that
    /// [`FontSpec`] cannot express.
    pub fn view(&self) -> Result<FontSpec> {
        Ok(self.read()?.0)
    }

    /// Exact typed equivalent, or `None` when the markup carries more
    /// than [`FontSpec`] can express.
    pub fn spec(&self) -> Option<FontSpec> {
        match self.read() {
            Ok((spec, false)) => Some(spec),
            _ => None,
        }
    }

    fn read(&self) -> Result<(FontSpec, bool)> {
        let scan = self.fragment.scan()?;
        let mut spec = FontSpec::default();
        let mut unmodeled = false;
        for child in scan.root_children() {
            let attrs = child.attrs()?;
            match child.local.as_str() {
                "b" => spec.bold = attrs.bool("b", "val")?.unwrap_or(true),
                "i" => spec.italic = attrs.bool("i", "val")?.unwrap_or(true),
                "strike" => spec.strike = attrs.bool("strike", "val")?.unwrap_or(true),
                "u" => {
                    spec.underline = match attrs.get("val") {
                        None => Some(UnderlineStyle::Single),
                        Some(v) => Some(
                            UnderlineStyle::from_keyword(v).ok_or_else(|| bad_keyword(child, v))?,
                        ),
                    };
                }
                "vertAlign" => {
                    let v = attrs.required("vertAlign", "val")?;
                    spec.vert_align =
                        Some(VertAlign::from_keyword(v).ok_or_else(|| bad_keyword(child, v))?);
                }
                "sz" => spec.size = attrs.f64("sz", "val")?,
                "color" => {
                    spec.color = Color::from_attrs(&attrs, "color")?;
                    // rgb together with theme cannot be represented
                    unmodeled |= attrs.get("rgb").is_some() && attrs.get("theme").is_some();
                }
                "name" => spec.name = attrs.string("val"),
                "family" => spec.family = attrs.u32("family", "val")?,
                "scheme" => spec.scheme = attrs.string("val"),
                _ => unmodeled = true,
            }
        }
        Ok((spec, unmodeled))
    }

    fn val(&self, child: &str) -> Option<String> {
        self.fragment.child_attr(&[child], "val").ok().flatten()
    }

    /// Present and not explicitly turned off with `val="0"`.
    fn flag(&self, child: &str) -> bool {
        if !self.fragment.has_child(&[child]).unwrap_or(false) {
            return false;
        }
        !matches!(self.val(child).as_deref(), Some("0" | "false"))
    }

    fn set_flag(&mut self, child: &str, on: bool) -> Result<()> {
        if on {
            if self.fragment.has_child(&[child])? {
                self.fragment.replace_child(&[child], &format!("<{child}/>"))
            } else {
                self.fragment
                    .insert_child(&[], &format!("<{child}/>"), following(child))
            }
        } else {
            self.fragment.remove_child(&[child]).map(|_| ())
        }
    }

    fn set_val(&mut self, child: &str, value: &str) -> Result<()> {
        if self.fragment.has_child(&[child])? {
            self.fragment.set_attr(&[child], "val", value)
        } else {
            let mut markup = format!("<{child}");
            push_attr(&mut markup, "val", value);
            markup.push_str("/>");
            self.fragment.insert_child(&[], &markup, following(child))
        }
    }
}

/// Children that come after `child` in schema order.
fn following(child: &str) -> &'static [&'static str] {
    CHILD_ORDER
        .iter()
        .position(|c| *c == child)
        .and_then(|i| CHILD_ORDER.get(i + 1..))
        .unwrap_or(&[])
}

fn bad_keyword(child: &TagSpan, value: &str) -> StyleError {
    StyleError::Parse(format!("<{}> has unknown value {value:?}", child.qname))
}

impl Serialize for Font {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let view = self.view().map_err(serde::ser::Error::custom)?;
        view.serialize(serializer)
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

    #[test]
    fn test_default_font() {
        let font = Font::default();
        assert_eq!(font.name().as_deref(), Some("Calibri"));
        assert_eq!(font.size(), Some(11.0));
        assert_eq!(font.color().unwrap(), Some(Color::theme(1)));
        assert_eq!(font.family(), Some(2));
        assert_eq!(font.scheme().as_deref(), Some("minor"));
        assert!(!font.bold());
    }

    #[test]
    fn test_flags() {
        let font =
            Font::new(r#"<font><b/><i val="0"/><strike val="1"/><u val="double"/></font>"#).unwrap();
        assert!(font.bold());
        assert!(!font.italic());
        assert!(font.strike());
        assert_eq!(font.underline(), Some(UnderlineStyle::Double));
    }

    #[test]
    fn test_rejects_other_roots() {
        assert!(Font::new("<fill/>").is_err());
    }

    #[test]
    fn test_set_bold_inserts_in_schema_order() {
        let mut font = Font::default();
        font.set_bold(true).unwrap();
        assert!(font.as_str().starts_with("<font><b/><sz val=\"11\"/>"));
        font.set_italic(true).unwrap();
        assert!(font.as_str().starts_with("<font><b/><i/><sz"));
        font.set_bold(false).unwrap();
        assert!(font.as_str().starts_with("<font><i/><sz"));
        assert!(!font.bold());
    }

    #[test]
    fn test_set_size_keeps_other_markup() {
        let mut font = Font::new(
            r#"<font><sz val="11"/><color theme="1"/><name val="Calibri"/><charset val="134"/></font>"#,
        )
        .unwrap();
        font.set_size(14.5).unwrap();
        assert_eq!(
            font.as_str(),
            r#"<font><sz val="14.5"/><color theme="1"/><name val="Calibri"/><charset val="134"/></font>"#
        );
    }

    #[test]
    fn test_set_name_and_color() {
        let mut font = Font::new(r#"<font><sz val="10"/></font>"#).unwrap();
        font.set_name("Arial").unwrap();
        font.set_color(&Color::rgb("FF0000")).unwrap();
        assert_eq!(
            font.as_str(),
            r#"<font><sz val="10"/><color rgb="FFFF0000"/><name val="Arial"/></font>"#
        );
        font.set_color(&Color::theme(4)).unwrap();
        assert_eq!(font.color().unwrap(), Some(Color::theme(4)));
    }

    #[test]
    fn test_spec_round_trip() {
        let spec = FontSpec::new("Calibri", 12.0).bold();
        let font = Font::from_spec(&spec);
        assert_eq!(font.as_str(), r#"<font><b/><sz val="12"/><name val="Calibri"/></font>"#);
        assert_eq!(font.spec(), Some(spec));
    }

    #[test]
    fn test_spec_none_for_unmodeled_children() {
        let font = Font::new(r#"<font><sz val="11"/><charset val="1"/></font>"#).unwrap();
        assert!(font.spec().is_none());
        assert_eq!(font.view().unwrap().size, Some(11.0));
    }

    #[test]
    fn test_serialize_as_view() {
        let json =
            serde_json::to_value(Font::from_spec(&FontSpec::new("Arial", 9.0).italic())).unwrap();
        assert_eq!(json["name"], "Arial");
        assert_eq!(json["italic"], true);
        assert_eq!(json["bold"], false);
    }
}
