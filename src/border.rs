//! Border entries of the `borders` catalog.
//!
//! Borders are parsed into a [`BorderSpec`] on load; the source markup is
//! kept alongside and written back unchanged.

use serde::{Serialize, Serializer};

use crate::error::{Result, StyleError};
use crate::fragment::{RawFragment, Scan, TagSpan};
use crate::types::{BorderLine, BorderSpec, BorderStyle, Color};
use crate::xml_helpers::{push_attr, push_bool_attr};

const EMPTY_BORDER: &str = "<border><left/><right/><top/><bottom/><diagonal/></border>";

#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    fragment: RawFragment,
    spec: BorderSpec,
    /// Markup holds children or attributes `spec` does not capture
    unmodeled: bool,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            fragment: RawFragment::from_captured(EMPTY_BORDER),
            spec: BorderSpec::none(),
            unmodeled: false,
        }
    }
}

impl Border {
    pub fn new(markup: impl Into<String>) -> Result<Self> {
        Self::from_fragment(RawFragment::new(markup)?)
    }

    pub(crate) fn from_fragment(fragment: RawFragment) -> Result<Self> {
        let scan = fragment.scan()?;
        let root = scan
            .root()
            .ok_or_else(|| StyleError::Fragment("empty border".to_string()))?;
        if root.local != "border" {
            return Err(StyleError::Fragment(format!(
                "expected <border>, found <{}>",
                root.local
            )));
        }

        let attrs = root.attrs()?;
        let mut spec = BorderSpec {
            diagonal_up: attrs.bool("border", "diagonalUp")?,
            diagonal_down: attrs.bool("border", "diagonalDown")?,
            outline: attrs.bool("border", "outline")?,
            ..BorderSpec::default()
        };
        let mut unmodeled = root
            .raw_attrs
            .iter()
            .any(|(k, _)| !matches!(k.as_str(), "diagonalUp" | "diagonalDown" | "outline"));

        for edge in scan.children(root) {
            let line = parse_line(&scan, edge)?;
            let slot = match edge.local.as_str() {
                "left" => &mut spec.left,
                "right" => &mut spec.right,
                "top" => &mut spec.top,
                "bottom" => &mut spec.bottom,
                "diagonal" => &mut spec.diagonal,
                "vertical" => &mut spec.vertical,
                "horizontal" => &mut spec.horizontal,
                // start/end (bidi aliases) and extensions
                _ => {
                    unmodeled = true;
                    continue;
                }
            };
            *slot = line.filter(|l| !l.is_empty());
        }

        Ok(Self {
            fragment,
            spec,
            unmodeled,
        })
    }

    /// Render a border the way Excel writes one: the five main edges are
    /// always present, empty or not.
    pub fn from_spec(spec: &BorderSpec) -> Self {
        let mut out = String::from("<border");
        push_bool_attr(&mut out, "diagonalUp", spec.diagonal_up);
        push_bool_attr(&mut out, "diagonalDown", spec.diagonal_down);
        push_bool_attr(&mut out, "outline", spec.outline);
        out.push('>');
        write_line(&mut out, "left", spec.left.as_ref());
        write_line(&mut out, "right", spec.right.as_ref());
        write_line(&mut out, "top", spec.top.as_ref());
        write_line(&mut out, "bottom", spec.bottom.as_ref());
        write_line(&mut out, "diagonal", spec.diagonal.as_ref());
        if spec.vertical.is_some() {
            write_line(&mut out, "vertical", spec.vertical.as_ref());
        }
        if spec.horizontal.is_some() {
            write_line(&mut out, "horizontal", spec.horizontal.as_ref());
        }
        out.push_str("</border>");
        Self {
            fragment: RawFragment::from_captured(&out),
            spec: normalized(spec),
            unmodeled: false,
        }
    }

    pub fn fragment(&self) -> &RawFragment {
        &self.fragment
    }

    pub fn as_str(&self) -> &str {
        self.fragment.as_str()
    }

    /// Parsed edges, including for borders with unmodeled parts.
    pub fn view(&self) -> &BorderSpec {
        &self.spec
    }

    /// Exact typed equivalent, or `None` when the markup carries more
    /// than [`BorderSpec`] can express.
    pub fn spec(&self) -> Option<&BorderSpec> {
        (!self.unmodeled).then_some(&self.spec)
    }

    pub fn left(&self) -> Option<&BorderLine> {
        self.spec.left.as_ref()
    }

    pub fn right(&self) -> Option<&BorderLine> {
        self.spec.right.as_ref()
    }

    pub fn top(&self) -> Option<&BorderLine> {
        self.spec.top.as_ref()
    }

    pub fn bottom(&self) -> Option<&BorderLine> {
        self.spec.bottom.as_ref()
    }

    pub fn diagonal(&self) -> Option<&BorderLine> {
        self.spec.diagonal.as_ref()
    }
}

fn parse_line(scan: &Scan, edge: &TagSpan) -> Result<Option<BorderLine>> {
    let attrs = edge.attrs()?;
    let style = match attrs.get("style") {
        None => None,
        Some(v) => Some(BorderStyle::from_keyword(v).ok_or_else(|| {
            StyleError::Parse(format!("<{}> has unknown border style {v:?}", edge.qname))
        })?),
    };
    let color = match scan.children(edge).find(|c| c.local == "color") {
        Some(c) => Color::from_attrs(&c.attrs()?, "color")?,
        None => None,
    };
    Ok(Some(BorderLine { style, color }))
}

fn write_line(out: &mut String, element: &str, line: Option<&BorderLine>) {
    out.push('<');
    out.push_str(element);
    let Some(line) = line.filter(|l| !l.is_empty()) else {
        out.push_str("/>");
        return;
    };
    if let Some(style) = line.style {
        push_attr(out, "style", style.as_str());
    }
    match &line.color {
        Some(color) => {
            out.push('>');
            color.write(out, "color");
            out.push_str("</");
            out.push_str(element);
            out.push('>');
        }
        None => out.push_str("/>"),
    }
}

/// Empty edges collapse to `None`, so two specs that draw the same compare equal.
pub(crate) fn normalized(spec: &BorderSpec) -> BorderSpec {
    let keep = |line: &Option<BorderLine>| line.clone().filter(|l| !l.is_empty());
    BorderSpec {
        left: keep(&spec.left),
        right: keep(&spec.right),
        top: keep(&spec.top),
        bottom: keep(&spec.bottom),
        diagonal: keep(&spec.diagonal),
        vertical: keep(&spec.vertical),
        horizontal: keep(&spec.horizontal),
        ..spec.clone()
    }
}

impl Serialize for Border {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.spec.serialize(serializer)
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
    fn test_empty_border() {
        let border = Border::new(EMPTY_BORDER).unwrap();
        assert_eq!(border.spec(), Some(&BorderSpec::none()));
        assert_eq!(border, Border::default());
    }

    #[test]
    fn test_parse_edges() {
        let border = Border::new(
            r#"<border diagonalUp="1"><left style="thin"><color indexed="64"/></left><right/><top style="medium"><color rgb="FF00FF00"/></top><bottom style="double"/><diagonal style="hair"><color theme="3"/></diagonal></border>"#,
        )
        .unwrap();
        assert_eq!(
            border.left(),
            Some(&BorderLine::new(BorderStyle::Thin, Some(Color::Indexed { indexed: 64 })))
        );
        assert_eq!(border.right(), None);
        assert_eq!(
            border.top(),
            Some(&BorderLine::new(BorderStyle::Medium, Some(Color::rgb("FF00FF00"))))
        );
        assert_eq!(border.bottom(), Some(&BorderLine::new(BorderStyle::Double, None)));
        assert_eq!(border.diagonal().unwrap().style, Some(BorderStyle::Hair));
        assert_eq!(border.view().diagonal_up, Some(true));
        assert!(border.spec().is_some());
    }

    #[test]
    fn test_unknown_style_is_parse_error() {
        let err = Border::new(r#"<border><left style="wavy"/></border>"#).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_bidi_edges_are_unmodeled() {
        let border = Border::new(
            r#"<border><start style="thin"/><end/><top/><bottom/><diagonal/></border>"#,
        )
        .unwrap();
        assert!(border.spec().is_none());
        assert_eq!(border.view().top, None);
    }

    #[test]
    fn test_from_spec() {
        let spec = BorderSpec {
            bottom: Some(BorderLine::new(BorderStyle::Thick, Some(Color::theme(1)))),
            ..BorderSpec::none()
        };
        let border = Border::from_spec(&spec);
        assert_eq!(
            border.as_str(),
            r#"<border><left/><right/><top/><bottom style="thick"><color theme="1"/></bottom><diagonal/></border>"#
        );
        let reparsed = Border::new(border.as_str()).unwrap();
        assert_eq!(reparsed.spec(), Some(&spec));
    }

    #[test]
    fn test_from_spec_drops_empty_lines() {
        let spec = BorderSpec {
            left: Some(BorderLine::default()),
            ..BorderSpec::none()
        };
        let border = Border::from_spec(&spec);
        assert_eq!(border.as_str(), EMPTY_BORDER);
        assert_eq!(border.spec(), Some(&BorderSpec::none()));
    }
}
