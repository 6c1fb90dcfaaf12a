//! Fill entries of the `fills` catalog: pattern fills and gradient fills,
//! kept as raw `<fill>` markup.

use serde::{Serialize, Serializer};

use crate::error::{Result, StyleError};
use crate::fragment::RawFragment;
use crate::types::{Color, FillSpec, PatternType};
use crate::xml_helpers::push_attr;

const NO_FILL: &str = r#"<fill><patternFill patternType="none"/></fill>"#;
const GRAY_125: &str = r#"<fill><patternFill patternType="gray125"/></fill>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    fragment: RawFragment,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            fragment: RawFragment::from_captured(NO_FILL),
        }
    }
}

impl Fill {
    pub fn new(markup: impl Into<String>) -> Result<Self> {
        Self::from_fragment(RawFragment::new(markup)?)
    }

    pub(crate) fn from_fragment(fragment: RawFragment) -> Result<Self> {
        let root = fragment.root_name()?;
        if root != "fill" {
            return Err(StyleError::Fragment(format!("expected <fill>, found <{root}>")));
        }
        Ok(Self { fragment })
    }

    /// The `gray125` fill Excel reserves at index 1.
    pub fn gray125() -> Self {
        Self {
            fragment: RawFragment::from_captured(GRAY_125),
        }
    }

    pub fn from_spec(spec: &FillSpec) -> Self {
        let mut out = String::from("<fill><patternFill");
        push_attr(&mut out, "patternType", spec.pattern.as_str());
        if spec.fg_color.is_none() && spec.bg_color.is_none() {
            out.push_str("/>");
        } else {
            out.push('>');
            if let Some(fg) = &spec.fg_color {
                fg.write(&mut out, "fgColor");
            }
            if let Some(bg) = &spec.bg_color {
                bg.write(&mut out, "bgColor");
            }
            out.push_str("</patternFill>");
        }
        out.push_str("</fill>");
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

    pub fn is_gradient(&self) -> Result<bool> {
        self.fragment.has_child(&["gradientFill"])
    }

    /// Pattern of a pattern fill; a `patternFill` without `patternType`
    /// means `none`. `None` for gradient fills.
    pub fn pattern_type(&self) -> Result<Option<PatternType>> {
        if !self.fragment.has_child(&["patternFill"])? {
            return Ok(None);
        }
        match self.fragment.child_attr(&["patternFill"], "patternType")? {
            None => Ok(Some(PatternType::None)),
            Some(v) => PatternType::from_keyword(&v)
                .map(Some)
                .ok_or_else(|| StyleError::Parse(format!("unknown patternType {v:?}"))),
        }
    }

    pub fn fg_color(&self) -> Result<Option<Color>> {
        self.pattern_color("fgColor")
    }

    pub fn bg_color(&self) -> Result<Option<Color>> {
        self.pattern_color("bgColor")
    }

    /// Change the pattern of a pattern fill, leaving its colors alone.
    pub fn set_pattern_type(&mut self, pattern: PatternType) -> Result<()> {
        if !self.fragment.has_child(&["patternFill"])? {
            return Err(StyleError::Fragment("not a pattern fill".to_string()));
        }
        self.fragment
            .set_attr(&["patternFill"], "patternType", pattern.as_str())
    }

    /// Exact typed equivalent, or `None` for gradient fills and markup
    /// [`FillSpec`] cannot express.
    pub fn spec(&self) -> Option<FillSpec> {
        let scan = self.fragment.scan().ok()?;
        let mut children = scan.root_children();
        let pattern = children.next()?;
        if pattern.local != "patternFill" || children.next().is_some() {
            return None;
        }
        if scan
            .children(pattern)
            .any(|c| c.local != "fgColor" && c.local != "bgColor")
        {
            return None;
        }
        Some(FillSpec {
            pattern: self.pattern_type().ok()??,
            fg_color: self.fg_color().ok()?,
            bg_color: self.bg_color().ok()?,
        })
    }

    fn pattern_color(&self, element: &str) -> Result<Option<Color>> {
        let scan = self.fragment.scan()?;
        match scan.find(&["patternFill", element]) {
            Some(span) => Color::from_attrs(&span.attrs()?, element),
            None => Ok(None),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FillView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<PatternType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fg_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bg_color: Option<Color>,
    gradient: bool,
}

impl Serialize for Fill {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::Error;
        let view = FillView {
            pattern: self.pattern_type().map_err(S::Error::custom)?,
            fg_color: self.fg_color().map_err(S::Error::custom)?,
            bg_color: self.bg_color().map_err(S::Error::custom)?,
            gradient: self.is_gradient().map_err(S::Error::custom)?,
        };
        view.serialize(serializer)
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
    use test_case::test_case;

    #[test_case(r#"<fill><patternFill patternType="solid"/></fill>"#, Some(PatternType::Solid) ; "solid")]
    #[test_case(r#"<fill><patternFill/></fill>"#, Some(PatternType::None) ; "missing pattern type is none")]
    #[test_case(r#"<fill><patternFill patternType="darkTrellis"/></fill>"#, Some(PatternType::DarkTrellis) ; "dark trellis")]
    #[test_case(r#"<fill><gradientFill degree="90"><stop position="0"><color theme="0"/></stop></gradientFill></fill>"#, None ; "gradient")]
    fn test_pattern_type(markup: &str, expected: Option<PatternType>) {
        assert_eq!(Fill::new(markup).unwrap().pattern_type().unwrap(), expected);
    }

    #[test]
    fn test_colors() {
        let fill = Fill::new(
            r#"<fill><patternFill patternType="solid"><fgColor theme="4" tint="0.39997558519241921"/><bgColor indexed="64"/></patternFill></fill>"#,
        )
        .unwrap();
        match fill.fg_color().unwrap() {
            Some(Color::Theme {
                theme: 4,
                tint: Some(tint),
            }) => assert!((tint - 0.399_975_585_192_419).abs() < 1e-12),
            other => panic!("unexpected fgColor {other:?}"),
        }
        assert_eq!(fill.bg_color().unwrap(), Some(Color::Indexed { indexed: 64 }));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Fill::default().spec(), Some(FillSpec::none()));
        assert_eq!(
            Fill::gray125().pattern_type().unwrap(),
            Some(PatternType::Gray125)
        );
    }

    #[test]
    fn test_set_pattern_type_keeps_colors() {
        let mut fill = Fill::from_spec(&FillSpec::solid(Color::rgb("FFFF00")));
        fill.set_pattern_type(PatternType::LightGrid).unwrap();
        assert_eq!(
            fill.as_str(),
            r#"<fill><patternFill patternType="lightGrid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>"#
        );
    }

    #[test]
    fn test_gradient_has_no_spec() {
        let mut fill = Fill::new(
            r#"<fill><gradientFill type="path"><stop position="0"><color rgb="FFFFFFFF"/></stop></gradientFill></fill>"#,
        )
        .unwrap();
        assert!(fill.is_gradient().unwrap());
        assert!(fill.spec().is_none());
        assert!(fill.set_pattern_type(PatternType::Solid).is_err());
    }

    #[test]
    fn test_solid_spec_round_trip() {
        let spec = FillSpec::solid(Color::theme(5));
        assert_eq!(Fill::from_spec(&spec).spec(), Some(spec));
    }
}
