//! Raw fragment passthrough and narrow patching of fonts and fills.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod fixtures;

use fixtures::{as_text, EXCEL_STYLES};
use pretty_assertions::assert_eq;
use xlstyles::{Color, Dxf, Font, PatternType, RawFragment, StyleSheet, TableStyle};

#[test]
fn test_set_bold_touches_only_that_font() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    sheet.font_mut(2).unwrap().set_bold(true).unwrap();
    let saved = sheet.save().unwrap();
    let expected = EXCEL_STYLES.replace(
        r#"<font><i/><u val="double"/>"#,
        r#"<font><b/><i/><u val="double"/>"#,
    );
    assert_eq!(as_text(&saved), expected);
}

#[test]
fn test_set_size_rewrites_one_attribute() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    sheet.font_mut(2).unwrap().set_size(14.0).unwrap();
    let font = sheet.fonts().get(2).unwrap();
    assert_eq!(
        font.as_str(),
        r#"<font><i/><u val="double"/><sz val="14"/><color rgb="FFFF0000"/><name val="Meiryo UI"/><family val="3"/><charset val="128"/></font>"#
    );
    assert_eq!(font.size(), Some(14.0));
}

#[test]
fn test_font_edit_is_seen_by_every_record_using_it() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    sheet
        .font_mut(1)
        .unwrap()
        .set_color(&Color::rgb("0070C0"))
        .unwrap();
    // cellXfs 3 takes font 1 from its master
    let style = sheet.resolve(3).unwrap();
    assert_eq!(style.font.color().unwrap(), Some(Color::rgb("0070C0")));
    assert!(style.font.as_str().contains(r#"<color rgb="FF0070C0"/>"#));
    assert!(!style.font.as_str().contains("theme"));
}

#[test]
fn test_clear_italic_and_insert_name() {
    let mut font = Font::new(r#"<font><i/><sz val="8"/></font>"#).unwrap();
    font.set_italic(false).unwrap();
    font.set_name("Consolas").unwrap();
    assert_eq!(font.as_str(), r#"<font><sz val="8"/><name val="Consolas"/></font>"#);
}

#[test]
fn test_fill_pattern_patch_keeps_colors() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let fill = sheet.fill_mut(2).unwrap();
    fill.set_pattern_type(PatternType::DarkGrid).unwrap();
    assert_eq!(
        fill.as_str(),
        r#"<fill><patternFill patternType="darkGrid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>"#
    );
    assert!(sheet.fill_mut(3).unwrap().set_pattern_type(PatternType::Solid).is_err());
}

#[test]
fn test_child_attr_reads_narrowly() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let gradient = sheet.fills().get(3).unwrap().fragment();
    assert_eq!(
        gradient.child_attr(&["gradientFill"], "degree").unwrap().as_deref(),
        Some("90")
    );
    assert_eq!(gradient.child_attr(&["patternFill"], "patternType").unwrap(), None);
    assert_eq!(gradient.child_names().unwrap(), vec!["gradientFill".to_string()]);
}

#[test]
fn test_dxf_accessors() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let bad = sheet.dxfs().get(0).unwrap();
    let font = bad.font().unwrap().unwrap();
    assert!(font.bold());
    assert_eq!(font.color().unwrap(), Some(Color::rgb("9C0006")));
    assert_eq!(
        bad.fill().unwrap().unwrap().bg_color().unwrap(),
        Some(Color::rgb("FFC7CE"))
    );

    let pct = sheet.dxfs().get(1).unwrap();
    assert_eq!(pct.num_fmt_code().unwrap().as_deref(), Some("0.0%"));
    assert_eq!(pct.components().unwrap(), vec!["numFmt".to_string(), "border".to_string()]);
}

#[test]
fn test_table_style_accessors() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let style = sheet.table_styles().get(0).unwrap();
    assert_eq!(style.name().unwrap().as_deref(), Some("Invoice"));
    assert!(!style.pivot().unwrap());
    assert!(style.table().unwrap());
    assert_eq!(
        style.elements().unwrap(),
        vec![("wholeTable".to_string(), Some(1)), ("headerRow".to_string(), Some(0))]
    );
}

#[test]
fn test_intern_dxf_and_add_table_style() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let existing = sheet.dxfs().get(1).unwrap().clone();
    assert_eq!(sheet.intern_dxf(&existing).unwrap(), 1);

    let green = Dxf::new(r#"<dxf><fill><patternFill><bgColor rgb="FFC6EFCE"/></patternFill></fill></dxf>"#)
        .unwrap();
    assert_eq!(sheet.intern_dxf(&green).unwrap(), 2);

    let style = TableStyle::new(
        r#"<tableStyle name="Green" pivot="0" count="1"><tableStyleElement type="wholeTable" dxfId="2"/></tableStyle>"#,
    )
    .unwrap();
    assert_eq!(sheet.add_table_style(style).unwrap(), 1);

    let text = String::from_utf8(sheet.save().unwrap()).unwrap();
    assert!(text.contains(r#"<dxfs count="3">"#));
    assert!(text.contains(
        r#"<tableStyles count="2" defaultTableStyle="TableStyleMedium2" defaultPivotStyle="PivotStyleLight16">"#
    ));
}

#[test]
fn test_fragment_validation() {
    assert!(RawFragment::new("<font><b/></font>").is_ok());
    assert!(RawFragment::new("  <font/>\n").is_ok());
    assert!(RawFragment::new("<font><b></font>").is_err());
    assert!(RawFragment::new("<a/><b/>").is_err());
    assert!(RawFragment::new("text").is_err());
    assert!(Font::new("<fill/>").is_err());
    assert!(Dxf::new("<font/>").is_err());
}
