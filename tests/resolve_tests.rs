//! Resolution of cell format indices against a loaded stylesheet.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;

use fixtures::EXCEL_STYLES;
use xlstyles::{
    BorderStyle, CatalogKind, Color, HAlign, PatternType, StyleError, StyleSheet, UnderlineStyle,
    VAlign,
};

fn excel() -> StyleSheet {
    StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap()
}

#[test]
fn test_default_record() {
    let style = excel().resolve(0).unwrap();
    assert_eq!(style.style_name.as_deref(), Some("Normal"));
    assert_eq!(style.num_fmt_id, 0);
    assert_eq!(style.format_code.as_deref(), Some("General"));
    assert_eq!(style.font.name().as_deref(), Some("Calibri"));
    assert_eq!(style.font.size(), Some(11.0));
    assert!(!style.font.bold());
    assert_eq!(style.fill.pattern_type().unwrap(), Some(PatternType::None));
    assert!(style.border.bottom().is_none());
    assert!(!style.quote_prefix);
}

#[test]
fn test_custom_currency_format() {
    let style = excel().resolve(1).unwrap();
    assert_eq!(style.num_fmt_id, 164);
    assert_eq!(style.format_code.as_deref(), Some("\"$\"#,##0.00"));
    assert!(!style.is_date);
}

#[test]
fn test_fully_applied_record() {
    let style = excel().resolve(2).unwrap();
    assert!(style.is_date);
    assert_eq!(style.font_id, 2);
    assert!(style.font.italic());
    assert_eq!(style.font.underline(), Some(UnderlineStyle::Double));
    assert_eq!(style.font.color().unwrap(), Some(Color::rgb("FF0000")));
    assert_eq!(style.font.name().as_deref(), Some("Meiryo UI"));

    assert_eq!(style.fill.pattern_type().unwrap(), Some(PatternType::Solid));
    assert_eq!(style.fill.fg_color().unwrap(), Some(Color::rgb("FFFF00")));

    let bottom = style.border.bottom().unwrap();
    assert_eq!(bottom.style, Some(BorderStyle::Double));
    assert_eq!(bottom.color, Some(Color::Auto));
    assert_eq!(style.border.left().unwrap().color, Some(Color::Indexed { indexed: 64 }));
}

#[test]
fn test_unapplied_font_comes_from_master() {
    let sheet = excel();
    let xf = sheet.cell_xfs().get(3).unwrap();
    assert_eq!(xf.font_id, Some(0));
    assert_eq!(xf.apply.font, Some(false));

    let style = sheet.resolve(3).unwrap();
    assert_eq!(style.style_name.as_deref(), Some("Heading 1"));
    assert_eq!(style.font_id, 1);
    assert!(style.font.bold());
}

#[test]
fn test_alignment_protection_and_quote_prefix() {
    let sheet = excel();
    let style = sheet.resolve(4).unwrap();
    assert!(style.quote_prefix);
    assert_eq!(style.format_code.as_deref(), Some("@"));
    assert!(style.fill.is_gradient().unwrap());
    assert_eq!(style.fill.pattern_type().unwrap(), None);
    let alignment = style.alignment.unwrap();
    assert_eq!(alignment.horizontal, Some(HAlign::Center));
    assert_eq!(alignment.vertical, Some(VAlign::Center));
    assert_eq!(alignment.wrap_text, Some(true));
    assert_eq!(style.protection.unwrap().locked, Some(false));

    let dated = sheet.resolve(5).unwrap();
    assert!(dated.is_date);
    let alignment = dated.alignment.unwrap();
    assert_eq!(alignment.text_rotation, Some(90));
    assert_eq!(alignment.indent, Some(2));
    assert_eq!(alignment.shrink_to_fit, Some(true));
}

#[test]
fn test_index_past_end() {
    assert!(matches!(
        excel().resolve(6),
        Err(StyleError::IndexOutOfRange {
            catalog: CatalogKind::CellXfs,
            index: 6,
            len: 6
        })
    ));
}

#[test]
fn test_corrupt_component_reference() {
    let xml = EXCEL_STYLES.replace(
        r#"<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
        r#"<xf numFmtId="164" fontId="0" fillId="9" borderId="0" xfId="0" applyNumberFormat="1"/>"#,
    );
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    assert!(matches!(
        sheet.resolve(1),
        Err(StyleError::IndexOutOfRange {
            catalog: CatalogKind::Fills,
            index: 9,
            len: 4
        })
    ));
    // other records still resolve
    assert!(sheet.resolve(2).is_ok());
    assert!(sheet.validate().is_err());
}

#[test]
fn test_undefined_custom_number_format() {
    let xml = EXCEL_STYLES.replace(r#"numFmtId="165" fontId="2""#, r#"numFmtId="170" fontId="2""#);
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    assert!(matches!(sheet.resolve(2), Err(StyleError::UnknownNumFmt(170))));
}

#[test]
fn test_resolved_style_outlives_growth() {
    let mut sheet = excel();
    let before = sheet.resolve(2).unwrap();
    for i in 0..100 {
        sheet.intern_num_fmt(&format!("0.{i}E+00")).unwrap();
    }
    assert_eq!(before, sheet.resolve(2).unwrap());
}

#[test]
fn test_copy_format_between_documents() {
    let source = excel();
    let style = source.resolve(1).unwrap();
    let mut target = StyleSheet::new();
    let index = target.intern(&style.to_descriptor()).unwrap();
    let copied = target.resolve(index).unwrap();
    assert_eq!(copied.format_code, style.format_code);
    assert_eq!(copied.font.as_str(), style.font.as_str());
    assert_eq!(target.num_fmts().len(), 1);
}
