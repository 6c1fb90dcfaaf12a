//! Differential formats (`dxfs`) and table styles (`tableStyles`).
//!
//! Both are stored verbatim. A dxf is a partial format layered over a
//! cell's own format by conditional formatting and table styles, so only
//! the components it names matter.

use serde::Serialize;

use crate::error::{Result, StyleError};
use crate::fill::Fill;
use crate::font::Font;
use crate::fragment::RawFragment;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Dxf {
    fragment: RawFragment,
}

impl Dxf {
    pub fn new(markup: impl Into<String>) -> Result<Self> {
        Self::from_fragment(RawFragment::new(markup)?)
    }

    pub(crate) fn from_fragment(fragment: RawFragment) -> Result<Self> {
        expect_root(&fragment, "dxf")?;
        Ok(Self { fragment })
    }

    pub fn fragment(&self) -> &RawFragment {
        &self.fragment
    }

    pub fn as_str(&self) -> &str {
        self.fragment.as_str()
    }

    /// Font override, if the dxf carries one.
    pub fn font(&self) -> Result<Option<Font>> {
        self.fragment
            .child_fragment(&["font"])?
            .map(Font::from_fragment)
            .transpose()
    }

    /// Fill override, if the dxf carries one.
    pub fn fill(&self) -> Result<Option<Fill>> {
        self.fragment
            .child_fragment(&["fill"])?
            .map(Fill::from_fragment)
            .transpose()
    }

    /// Custom number format code carried by the dxf.
    pub fn num_fmt_code(&self) -> Result<Option<String>> {
        self.fragment.child_attr(&["numFmt"], "formatCode")
    }

    /// Names of the components this dxf overrides.
    pub fn components(&self) -> Result<Vec<String>> {
        self.fragment.child_names()
    }
}

/// A named table or pivot style (`<tableStyle>`), elements kept raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TableStyle {
    fragment: RawFragment,
}

impl TableStyle {
    pub fn new(markup: impl Into<String>) -> Result<Self> {
        Self::from_fragment(RawFragment::new(markup)?)
    }

    pub(crate) fn from_fragment(fragment: RawFragment) -> Result<Self> {
        expect_root(&fragment, "tableStyle")?;
        Ok(Self { fragment })
    }

    pub fn fragment(&self) -> &RawFragment {
        &self.fragment
    }

    pub fn as_str(&self) -> &str {
        self.fragment.as_str()
    }

    pub fn name(&self) -> Result<Option<String>> {
        self.fragment.child_attr(&[], "name")
    }

    /// Usable for pivot tables. Absent means true.
    pub fn pivot(&self) -> Result<bool> {
        self.flag("pivot")
    }

    /// Usable for tables. Absent means true.
    pub fn table(&self) -> Result<bool> {
        self.flag("table")
    }

    /// `(type, dxfId)` of every `tableStyleElement`.
    pub fn elements(&self) -> Result<Vec<(String, Option<u32>)>> {
        let scan = self.fragment.scan()?;
        let mut out = Vec::new();
        for child in scan.root_children().filter(|c| c.local == "tableStyleElement") {
            let attrs = child.attrs()?;
            let kind = attrs.required("tableStyleElement", "type")?.to_string();
            out.push((kind, attrs.u32("tableStyleElement", "dxfId")?));
        }
        Ok(out)
    }

    fn flag(&self, attr: &str) -> Result<bool> {
        Ok(match self.fragment.child_attr(&[], attr)? {
            None => true,
            Some(v) => crate::xml_helpers::parse_bool(&v).unwrap_or(true),
        })
    }
}

fn expect_root(fragment: &RawFragment, name: &str) -> Result<()> {
    let root = fragment.root_name()?;
    if root == name {
        Ok(())
    } else {
        Err(StyleError::Fragment(format!(
            "expected <{name}>, found <{root}>"
        )))
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
    use crate::types::{Color, PatternType};

    const BAD_DXF: &str = r#"<dxf><font><color rgb="FF9C0006"/></font><fill><patternFill><bgColor rgb="FFFFC7CE"/></patternFill></fill></dxf>"#;

    #[test]
    fn test_dxf_components() {
        let dxf = Dxf::new(BAD_DXF).unwrap();
        assert_eq!(dxf.components().unwrap(), vec!["font", "fill"]);
        assert_eq!(
            dxf.font().unwrap().unwrap().color().unwrap(),
            Some(Color::rgb("FF9C0006"))
        );
        let fill = dxf.fill().unwrap().unwrap();
        assert_eq!(fill.pattern_type().unwrap(), Some(PatternType::None));
        assert_eq!(fill.bg_color().unwrap(), Some(Color::rgb("FFFFC7CE")));
        assert_eq!(dxf.num_fmt_code().unwrap(), None);
    }

    #[test]
    fn test_dxf_round_trips_verbatim() {
        assert_eq!(Dxf::new(BAD_DXF).unwrap().as_str(), BAD_DXF);
        assert!(Dxf::new("<font/>").is_err());
    }

    #[test]
    fn test_table_style() {
        let style = TableStyle::new(
            r#"<tableStyle name="MyStyle" pivot="0" count="2"><tableStyleElement type="wholeTable" dxfId="3"/><tableStyleElement type="headerRow" dxfId="2"/></tableStyle>"#,
        )
        .unwrap();
        assert_eq!(style.name().unwrap().as_deref(), Some("MyStyle"));
        assert!(!style.pivot().unwrap());
        assert!(style.table().unwrap());
        assert_eq!(
            style.elements().unwrap(),
            vec![
                ("wholeTable".to_string(), Some(3)),
                ("headerRow".to_string(), Some(2))
            ]
        );
    }
}
