//! Parsing of xl/styles.xml
//!
//! Catalog entries that are kept as raw markup (fonts, fills, borders, dxfs,
//! table styles) are sliced straight out of the input using the reader's
//! byte positions, so they come back out byte for byte.

use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::border::Border;
use crate::catalog::Catalog;
use crate::document::StyleSheet;
use crate::dxf::{Dxf, TableStyle};
use crate::error::{Result, StyleError};
use crate::fill::Fill;
use crate::font::Font;
use crate::fragment::{capture, tag_start, RawFragment};
use crate::options::LoadOptions;
use crate::types::{
    Alignment, ApplyFlags, CellStyle, CellXf, HAlign, NumFmt, Protection, VAlign,
};
use crate::xml_helpers::{local_name_string, raw_attrs, Attrs};

type XmlReader<'a> = Reader<&'a [u8]>;

/// Parse styles.xml content
///
/// Malformed XML, a missing required attribute or a missing `styleSheet`
/// root fail the whole load; no partial document is returned.
pub fn parse_styles(data: &[u8], options: &LoadOptions) -> Result<StyleSheet> {
    let text = std::str::from_utf8(data)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut xml = Reader::from_str(text);

    let mut stylesheet = StyleSheet::empty();
    stylesheet.prolog = None;

    loop {
        match xml.read_event()? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                let tag_end = xml.buffer_position();
                let start = tag_start(tag_end, e, is_empty)?;
                let name = local_name_string(e);
                if name != "styleSheet" {
                    return Err(StyleError::Parse(format!(
                        "expected <styleSheet> root, found <{name}>"
                    )));
                }

                let tag = text
                    .get(start..tag_end)
                    .ok_or_else(|| StyleError::Parse("bad root tag span".to_string()))?;
                stylesheet.prolog = text
                    .get(..start)
                    .filter(|p| !p.trim().is_empty())
                    .map(ToString::to_string);
                stylesheet.root_name = std::str::from_utf8(e.name().as_ref())?.to_string();
                stylesheet.root_tag = match tag.strip_suffix("/>") {
                    Some(open) => format!("{}>", open.trim_end()),
                    None => tag.to_string(),
                };

                if !is_empty {
                    parse_root_children(&mut xml, text, &mut stylesheet, options)?;
                }
                return Ok(stylesheet);
            }
            Event::Eof => {
                return Err(StyleError::Parse("missing <styleSheet> root".to_string()));
            }
            _ => {}
        }
    }
}

fn parse_root_children(
    xml: &mut XmlReader<'_>,
    text: &str,
    stylesheet: &mut StyleSheet,
    options: &LoadOptions,
) -> Result<()> {
    loop {
        match xml.read_event()? {
            ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                let is_empty = matches!(event, Event::Empty(_));
                match local_name_string(e).as_str() {
                    "numFmts" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.num_fmts,
                            options,
                            |xml, e, empty| parse_num_fmt(xml, e, empty),
                        )?;
                    }
                    "fonts" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.fonts,
                            options,
                            |xml, e, empty| {
                                Font::from_fragment(capture_element(xml, text, e, empty)?)
                            },
                        )?;
                    }
                    "fills" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.fills,
                            options,
                            |xml, e, empty| {
                                Fill::from_fragment(capture_element(xml, text, e, empty)?)
                            },
                        )?;
                    }
                    "borders" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.borders,
                            options,
                            |xml, e, empty| {
                                Border::from_fragment(capture_element(xml, text, e, empty)?)
                            },
                        )?;
                    }
                    "cellStyleXfs" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.cell_style_xfs,
                            options,
                            |xml, e, empty| parse_xf(xml, text, e, empty),
                        )?;
                    }
                    "cellXfs" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.cell_xfs,
                            options,
                            |xml, e, empty| parse_xf(xml, text, e, empty),
                        )?;
                    }
                    "cellStyles" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.cell_styles,
                            options,
                            |xml, e, empty| parse_cell_style(xml, e, empty),
                        )?;
                    }
                    "dxfs" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.dxfs,
                            options,
                            |xml, e, empty| {
                                Dxf::from_fragment(capture_element(xml, text, e, empty)?)
                            },
                        )?;
                    }
                    "tableStyles" => {
                        parse_catalog(
                            xml,
                            e,
                            is_empty,
                            &mut stylesheet.table_styles,
                            options,
                            |xml, e, empty| {
                                TableStyle::from_fragment(capture_element(xml, text, e, empty)?)
                            },
                        )?;
                    }
                    "colors" => {
                        stylesheet.colors = Some(capture_element(xml, text, e, is_empty)?);
                    }
                    "extLst" => {
                        stylesheet.ext_lst = Some(capture_element(xml, text, e, is_empty)?);
                    }
                    other => {
                        debug!("passing through unknown styleSheet child <{other}>");
                        let fragment = capture_element(xml, text, e, is_empty)?;
                        stylesheet.unknown.push(fragment);
                    }
                }
            }
            // Children consume their own end tags, so this is </styleSheet>
            Event::End(_) => return Ok(()),
            Event::Eof => return Err(truncated("styleSheet")),
            _ => {}
        }
    }
}

/// Read one catalog element and its entries.
fn parse_catalog<T, F>(
    xml: &mut XmlReader<'_>,
    start: &BytesStart,
    is_empty: bool,
    catalog: &mut Catalog<T>,
    options: &LoadOptions,
    mut parse_entry: F,
) -> Result<()>
where
    F: FnMut(&mut XmlReader<'_>, &BytesStart, bool) -> Result<T>,
{
    let kind = catalog.kind();
    let element = kind.element();
    let declared = Attrs::from_start(start)?.u32(element, "count")?;
    catalog.present = true;
    catalog.attrs = raw_attrs(start)?
        .into_iter()
        .filter(|(k, _)| k != "count")
        .collect();

    if !is_empty {
        loop {
            match xml.read_event()? {
                ref event @ (Event::Start(ref e) | Event::Empty(ref e)) => {
                    let entry_empty = matches!(event, Event::Empty(_));
                    if local_name_string(e) == kind.entry_element() {
                        let entry = parse_entry(xml, e, entry_empty)?;
                        catalog.push(entry)?;
                    } else {
                        warn!(
                            "dropping unexpected <{}> inside <{element}>",
                            local_name_string(e)
                        );
                        if !entry_empty {
                            xml.read_to_end(e.name())?;
                        }
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(truncated(element)),
                _ => {}
            }
        }
    }

    if let Some(declared) = declared {
        let actual = catalog.len();
        if usize::try_from(declared).ok() != Some(actual) {
            if options.strict_counts {
                return Err(StyleError::CountMismatch {
                    catalog: kind,
                    declared,
                    actual,
                });
            }
            warn!(
                "<{element}> declares count={declared} but holds {actual} entries; using {actual}"
            );
        }
    }
    Ok(())
}

/// Slice the element that `e` opens out of the input, consuming it.
fn capture_element(
    xml: &mut XmlReader<'_>,
    text: &str,
    e: &BytesStart,
    is_empty: bool,
) -> Result<RawFragment> {
    let tag_end = xml.buffer_position();
    let start = tag_start(tag_end, e, is_empty)?;
    if !is_empty {
        xml.read_to_end(e.name())?;
    }
    capture(text, start, xml.buffer_position())
}

fn skip_children(xml: &mut XmlReader<'_>, e: &BytesStart, is_empty: bool) -> Result<()> {
    if !is_empty {
        xml.read_to_end(e.name())?;
    }
    Ok(())
}

/// `<numFmt numFmtId="164" formatCode="0.00"/>`
fn parse_num_fmt(xml: &mut XmlReader<'_>, e: &BytesStart, is_empty: bool) -> Result<NumFmt> {
    let attrs = Attrs::from_start(e)?;
    let id = attrs
        .u32("numFmt", "numFmtId")?
        .ok_or(StyleError::MissingAttribute {
            element: "numFmt",
            attribute: "numFmtId",
        })?;
    let format_code = attrs.required("numFmt", "formatCode")?.to_string();
    skip_children(xml, e, is_empty)?;
    Ok(NumFmt { id, format_code })
}

/// An `xf` of cellXfs or cellStyleXfs, with its optional alignment,
/// protection and extLst children.
fn parse_xf(xml: &mut XmlReader<'_>, text: &str, e: &BytesStart, is_empty: bool) -> Result<CellXf> {
    let attrs = Attrs::from_start(e)?;
    let mut xf = CellXf {
        num_fmt_id: attrs.u32("xf", "numFmtId")?,
        font_id: attrs.u32("xf", "fontId")?,
        fill_id: attrs.u32("xf", "fillId")?,
        border_id: attrs.u32("xf", "borderId")?,
        xf_id: attrs.u32("xf", "xfId")?,
        apply: ApplyFlags {
            number_format: attrs.bool("xf", "applyNumberFormat")?,
            font: attrs.bool("xf", "applyFont")?,
            fill: attrs.bool("xf", "applyFill")?,
            border: attrs.bool("xf", "applyBorder")?,
            alignment: attrs.bool("xf", "applyAlignment")?,
            protection: attrs.bool("xf", "applyProtection")?,
        },
        quote_prefix: attrs.bool("xf", "quotePrefix")?,
        pivot_button: attrs.bool("xf", "pivotButton")?,
        ..CellXf::default()
    };

    if is_empty {
        return Ok(xf);
    }
    loop {
        match xml.read_event()? {
            ref event @ (Event::Start(ref c) | Event::Empty(ref c)) => {
                let child_empty = matches!(event, Event::Empty(_));
                match local_name_string(c).as_str() {
                    "alignment" => {
                        xf.alignment = Some(parse_alignment(c)?);
                        skip_children(xml, c, child_empty)?;
                    }
                    "protection" => {
                        let a = Attrs::from_start(c)?;
                        xf.protection = Some(Protection {
                            locked: a.bool("protection", "locked")?,
                            hidden: a.bool("protection", "hidden")?,
                        });
                        skip_children(xml, c, child_empty)?;
                    }
                    "extLst" => {
                        xf.ext_lst = Some(capture_element(xml, text, c, child_empty)?);
                    }
                    other => {
                        warn!("dropping unexpected <{other}> inside <xf>");
                        skip_children(xml, c, child_empty)?;
                    }
                }
            }
            Event::End(_) => return Ok(xf),
            Event::Eof => return Err(truncated("xf")),
            _ => {}
        }
    }
}

fn parse_alignment(e: &BytesStart) -> Result<Alignment> {
    let a = Attrs::from_start(e)?;
    Ok(Alignment {
        horizontal: keyword(&a, "horizontal", HAlign::from_keyword)?,
        vertical: keyword(&a, "vertical", VAlign::from_keyword)?,
        wrap_text: a.bool("alignment", "wrapText")?,
        text_rotation: a.u32("alignment", "textRotation")?,
        indent: a.u32("alignment", "indent")?,
        relative_indent: a.i32("alignment", "relativeIndent")?,
        justify_last_line: a.bool("alignment", "justifyLastLine")?,
        shrink_to_fit: a.bool("alignment", "shrinkToFit")?,
        reading_order: a.u32("alignment", "readingOrder")?,
    })
}

fn keyword<T>(attrs: &Attrs, key: &str, parse: fn(&str) -> Option<T>) -> Result<Option<T>> {
    match attrs.get(key) {
        None => Ok(None),
        Some(v) => parse(v).map(Some).ok_or_else(|| {
            StyleError::Parse(format!("<alignment> has unknown {key}=\"{v}\""))
        }),
    }
}

/// `<cellStyle name="Normal" xfId="0" builtinId="0"/>`
fn parse_cell_style(xml: &mut XmlReader<'_>, e: &BytesStart, is_empty: bool) -> Result<CellStyle> {
    let attrs = Attrs::from_start(e)?;
    let xf_id = attrs
        .u32("cellStyle", "xfId")?
        .ok_or(StyleError::MissingAttribute {
            element: "cellStyle",
            attribute: "xfId",
        })?;
    let style = CellStyle {
        name: attrs.string("name").unwrap_or_default(),
        xf_id,
        builtin_id: attrs.u32("cellStyle", "builtinId")?,
        i_level: attrs.u32("cellStyle", "iLevel")?,
        hidden: attrs.bool("cellStyle", "hidden")?,
        custom_builtin: attrs.bool("cellStyle", "customBuiltin")?,
    };
    skip_children(xml, e, is_empty)?;
    Ok(style)
}

fn truncated(element: &str) -> StyleError {
    StyleError::Parse(format!("unexpected end of input inside <{element}>"))
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
    use crate::catalog::CatalogKind;

    fn load(xml: &str) -> Result<StyleSheet> {
        parse_styles(xml.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn test_minimal_document() {
        let sheet = load(r#"<?xml version="1.0"?><styleSheet xmlns="urn:x"/>"#).unwrap();
        assert!(sheet.cell_xfs().is_empty());
        assert_eq!(sheet.root_tag, r#"<styleSheet xmlns="urn:x">"#);
        assert_eq!(sheet.prolog.as_deref(), Some(r#"<?xml version="1.0"?>"#));
    }

    #[test]
    fn test_parse_xf_children() {
        let sheet = load(
            r#"<styleSheet><cellXfs count="1"><xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1" quotePrefix="1"><alignment horizontal="center" vertical="top" wrapText="1" relativeIndent="-1"/><protection locked="0"/></xf></cellXfs></styleSheet>"#,
        )
        .unwrap();
        let xf = sheet.cell_xfs().get(0).unwrap();
        assert_eq!(xf.num_fmt_id, Some(14));
        assert_eq!(xf.apply.number_format, Some(true));
        assert_eq!(xf.apply.font, None);
        assert_eq!(xf.quote_prefix, Some(true));
        let align = xf.alignment.as_ref().unwrap();
        assert_eq!(align.horizontal, Some(HAlign::Center));
        assert_eq!(align.vertical, Some(VAlign::Top));
        assert_eq!(align.wrap_text, Some(true));
        assert_eq!(align.relative_indent, Some(-1));
        assert_eq!(xf.protection.as_ref().unwrap().locked, Some(false));
    }

    #[test]
    fn test_fragments_are_verbatim() {
        let font = r#"<font><b/><sz val="11"/><color rgb="FF000000"/><name val="Calibri"/><charset val="134"/></font>"#;
        let xml = format!(
            r#"<styleSheet><fonts count="1" x14ac:knownFonts="1">{font}</fonts></styleSheet>"#
        );
        let sheet = load(&xml).unwrap();
        assert_eq!(sheet.fonts().get(0).unwrap().as_str(), font);
        assert_eq!(
            sheet.fonts().attrs,
            vec![("x14ac:knownFonts".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn test_count_mismatch_is_lenient_by_default() {
        let xml = r#"<styleSheet><numFmts count="5"><numFmt numFmtId="164" formatCode="0.0"/></numFmts></styleSheet>"#;
        let sheet = load(xml).unwrap();
        assert_eq!(sheet.num_fmts().len(), 1);

        let err = parse_styles(xml.as_bytes(), &LoadOptions::strict()).unwrap_err();
        assert!(matches!(
            err,
            StyleError::CountMismatch {
                catalog: CatalogKind::NumFmts,
                declared: 5,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_missing_required_attributes() {
        let err = load(r#"<styleSheet><numFmts><numFmt numFmtId="164"/></numFmts></styleSheet>"#)
            .unwrap_err();
        assert!(matches!(
            err,
            StyleError::MissingAttribute {
                element: "numFmt",
                attribute: "formatCode"
            }
        ));
        let err = load(r#"<styleSheet><cellStyles><cellStyle name="X"/></cellStyles></styleSheet>"#)
            .unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_truncated_input() {
        assert!(load(r#"<styleSheet><fonts count="1"><font><b/></font>"#).is_err());
        assert!(load("").is_err());
        assert!(load("<workbook/>").is_err());
    }

    #[test]
    fn test_unknown_children_pass_through() {
        let sheet = load(
            r#"<styleSheet><mruColors><color rgb="FF00FF00"/></mruColors><extLst><ext uri="{X}"/></extLst></styleSheet>"#,
        )
        .unwrap();
        assert_eq!(sheet.unknown.len(), 1);
        assert_eq!(sheet.unknown[0].as_str(), r#"<mruColors><color rgb="FF00FF00"/></mruColors>"#);
        assert_eq!(sheet.ext_lst().unwrap().as_str(), r#"<extLst><ext uri="{X}"/></extLst>"#);
    }

    #[test]
    fn test_bom_is_skipped() {
        let xml = "\u{feff}<styleSheet><fonts count=\"1\"><font><b/></font></fonts></styleSheet>";
        let sheet = load(xml).unwrap();
        assert_eq!(sheet.fonts().get(0).unwrap().as_str(), "<font><b/></font>");
    }
}
