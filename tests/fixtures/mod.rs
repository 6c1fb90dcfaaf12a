//! Stylesheet fixtures and XML comparison helpers shared by the
//! integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// styles.xml as Excel writes it: CRLF after the declaration, no
/// whitespace between elements, markup-compatibility namespaces on the
/// root, extension attributes on catalogs and an `extLst` at the end.
pub const EXCEL_STYLES: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n",
    "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" ",
    "xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\" mc:Ignorable=\"x14ac x16r2\" ",
    "xmlns:x14ac=\"http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac\" ",
    "xmlns:x16r2=\"http://schemas.microsoft.com/office/spreadsheetml/2015/02/main\">",
    "<numFmts count=\"2\">",
    "<numFmt numFmtId=\"164\" formatCode=\"&quot;$&quot;#,##0.00\"/>",
    "<numFmt numFmtId=\"165\" formatCode=\"[$-409]d\\-mmm\\-yy;@\"/>",
    "</numFmts>",
    "<fonts count=\"3\" x14ac:knownFonts=\"1\">",
    "<font><sz val=\"11\"/><color theme=\"1\"/><name val=\"Calibri\"/><family val=\"2\"/><scheme val=\"minor\"/></font>",
    "<font><b/><sz val=\"11\"/><color theme=\"1\"/><name val=\"Calibri\"/><family val=\"2\"/><scheme val=\"minor\"/></font>",
    "<font><i/><u val=\"double\"/><sz val=\"9\"/><color rgb=\"FFFF0000\"/><name val=\"Meiryo UI\"/><family val=\"3\"/><charset val=\"128\"/></font>",
    "</fonts>",
    "<fills count=\"4\">",
    "<fill><patternFill patternType=\"none\"/></fill>",
    "<fill><patternFill patternType=\"gray125\"/></fill>",
    "<fill><patternFill patternType=\"solid\"><fgColor rgb=\"FFFFFF00\"/><bgColor indexed=\"64\"/></patternFill></fill>",
    "<fill><gradientFill degree=\"90\"><stop position=\"0\"><color theme=\"0\"/></stop><stop position=\"1\"><color theme=\"4\"/></stop></gradientFill></fill>",
    "</fills>",
    "<borders count=\"2\">",
    "<border><left/><right/><top/><bottom/><diagonal/></border>",
    "<border><left style=\"thin\"><color indexed=\"64\"/></left><right style=\"thin\"><color indexed=\"64\"/></right>",
    "<top style=\"thin\"><color indexed=\"64\"/></top><bottom style=\"double\"><color auto=\"1\"/></bottom><diagonal/></border>",
    "</borders>",
    "<cellStyleXfs count=\"2\">",
    "<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/>",
    "<xf numFmtId=\"0\" fontId=\"1\" fillId=\"0\" borderId=\"0\" applyNumberFormat=\"0\" applyFill=\"0\" applyBorder=\"0\" applyAlignment=\"0\" applyProtection=\"0\"/>",
    "</cellStyleXfs>",
    "<cellXfs count=\"6\">",
    "<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>",
    "<xf numFmtId=\"164\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\"/>",
    "<xf numFmtId=\"165\" fontId=\"2\" fillId=\"2\" borderId=\"1\" xfId=\"0\" applyNumberFormat=\"1\" applyFont=\"1\" applyFill=\"1\" applyBorder=\"1\"/>",
    "<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"1\" applyFont=\"0\"/>",
    "<xf numFmtId=\"49\" fontId=\"0\" fillId=\"3\" borderId=\"0\" xfId=\"0\" quotePrefix=\"1\" applyFill=\"1\" applyAlignment=\"1\" applyProtection=\"1\">",
    "<alignment horizontal=\"center\" vertical=\"center\" wrapText=\"1\"/><protection locked=\"0\"/></xf>",
    "<xf numFmtId=\"14\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\">",
    "<alignment textRotation=\"90\" indent=\"2\" shrinkToFit=\"1\" readingOrder=\"1\"/></xf>",
    "</cellXfs>",
    "<cellStyles count=\"2\">",
    "<cellStyle name=\"Heading 1\" xfId=\"1\" builtinId=\"16\"/>",
    "<cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/>",
    "</cellStyles>",
    "<dxfs count=\"2\">",
    "<dxf><font><b/><color rgb=\"FF9C0006\"/></font><fill><patternFill><bgColor rgb=\"FFFFC7CE\"/></patternFill></fill></dxf>",
    "<dxf><numFmt numFmtId=\"166\" formatCode=\"0.0%\"/><border><bottom style=\"thin\"/></border></dxf>",
    "</dxfs>",
    "<tableStyles count=\"1\" defaultTableStyle=\"TableStyleMedium2\" defaultPivotStyle=\"PivotStyleLight16\">",
    "<tableStyle name=\"Invoice\" pivot=\"0\" count=\"2\"><tableStyleElement type=\"wholeTable\" dxfId=\"1\"/><tableStyleElement type=\"headerRow\" dxfId=\"0\"/></tableStyle>",
    "</tableStyles>",
    "<colors><mruColors><color rgb=\"FF00B050\"/><color rgb=\"FF7030A0\"/></mruColors></colors>",
    "<extLst>",
    "<ext uri=\"{EB79DEF2-80B8-43e5-95BD-54CBDDF9020C}\" xmlns:x14=\"http://schemas.microsoft.com/office/spreadsheetml/2009/9/main\">",
    "<x14:slicerStyles defaultSlicerStyle=\"SlicerStyleLight1\"/></ext>",
    "</extLst>",
    "</styleSheet>",
);

/// A hand-written stylesheet: indented, stale `count` attributes, no
/// declaration, an unknown root child and an empty `dxfs`.
pub const LOOSE_STYLES: &str = r#"
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="7">
    <font>
      <sz val="10"/>
      <name val="Arial"/>
    </font>
  </fonts>
  <fills count="1">
    <fill><patternFill patternType="none"/></fill>
  </fills>
  <borders count="1">
    <border/>
  </borders>
  <cellXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellXfs>
  <dxfs count="0"/>
  <x:futureThing xmlns:x="urn:future" flag="on"><x:inner/></x:futureThing>
</styleSheet>
"#;

/// Only the root element.
pub const EMPTY_STYLES: &str =
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#;

fn canonical_start(e: &BytesStart) -> String {
    let mut attrs: Vec<String> = e
        .attributes()
        .map(|a| {
            let a = a.unwrap();
            format!(
                "{}={:?}",
                String::from_utf8_lossy(a.key.as_ref()),
                a.unescape_value().unwrap()
            )
        })
        .collect();
    attrs.sort();
    format!("<{} {}>", String::from_utf8_lossy(e.name().as_ref()), attrs.join(" "))
}

/// Element structure of an XML document, one token per line: attributes
/// sorted, self-closing tags expanded, whitespace-only text, declaration
/// and comments dropped.
pub fn canonical(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut out = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => out.push(canonical_start(&e)),
            Event::Empty(e) => {
                out.push(canonical_start(&e));
                out.push(format!("</{}>", String::from_utf8_lossy(e.name().as_ref())));
            }
            Event::End(e) => out.push(format!("</{}>", String::from_utf8_lossy(e.name().as_ref()))),
            Event::Text(t) => {
                let text = t.unescape().unwrap();
                if !text.trim().is_empty() {
                    out.push(text.trim().to_string());
                }
            }
            Event::CData(t) => out.push(String::from_utf8_lossy(&t).into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }
    out
}

/// Assert two documents have the same element structure, ignoring
/// attribute order and formatting whitespace.
pub fn assert_same_xml(actual: &str, expected: &str) {
    pretty_assertions::assert_eq!(canonical(actual), canonical(expected));
}

pub fn as_text(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).unwrap()
}
