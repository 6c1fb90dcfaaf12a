//! Named styles (cellStyles) and master record inheritance.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use fixtures::{as_text, EXCEL_STYLES};
use test_case::test_case;
use xlstyles::named_styles::{builtin_style_id, builtin_style_name};
use xlstyles::{
    BorderSpec, BorderStyle, Color, FillSpec, FontSpec, StyleDescriptor, StyleError, StyleSheet,
};

// ============================================================================
// Basic Named Style Parsing Tests
// ============================================================================

#[test]
fn test_parse_named_styles() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let heading = sheet.named_style("Heading 1").unwrap();
    assert_eq!(heading.xf_id, 1);
    assert_eq!(heading.builtin_id, Some(16));
    let normal = sheet.named_style("Normal").unwrap();
    assert_eq!((normal.xf_id, normal.builtin_id), (0, Some(0)));
    assert!(sheet.named_style("Title").is_none());
}

#[test]
fn test_cell_style_optional_attributes_round_trip() {
    let xml = r#"<styleSheet><fonts count="1"><font/></fonts><fills count="1"><fill/></fills><borders count="1"><border/></borders><cellStyleXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/></cellXfs><cellStyles count="2"><cellStyle name="Normal" xfId="0" builtinId="0"/><cellStyle name="RowLevel_2" xfId="1" builtinId="1" iLevel="1" hidden="1" customBuiltin="1"/></cellStyles></styleSheet>"#;
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    let level = sheet.named_style("RowLevel_2").unwrap();
    assert_eq!(level.i_level, Some(1));
    assert_eq!(level.hidden, Some(true));
    assert_eq!(level.custom_builtin, Some(true));

    let saved = sheet
        .save_with(&xlstyles::WriteOptions {
            xml_declaration: false,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(as_text(&saved), xml);
}

// ============================================================================
// Built-in names
// ============================================================================

#[test_case(0, "Normal")]
#[test_case(3, "Comma")]
#[test_case(11, "Warning Text")]
#[test_case(20, "Input")]
#[test_case(44, "60% - Accent4")]
#[test_case(53, "Explanatory Text")]
fn test_builtin_names(id: u32, name: &str) {
    assert_eq!(builtin_style_name(id), Some(name));
    assert_eq!(builtin_style_id(name), Some(id));
}

#[test]
fn test_unknown_builtin() {
    assert_eq!(builtin_style_name(54), None);
    assert_eq!(builtin_style_id("normal"), None);
}

// ============================================================================
// Creating styles
// ============================================================================

#[test]
fn test_add_style_to_loaded_document() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let good = StyleDescriptor::new()
        .font(FontSpec::new("Calibri", 11.0).color(Color::rgb("006100")))
        .fill(FillSpec::solid(Color::rgb("C6EFCE")));
    let master = sheet.add_named_style("Good", &good).unwrap();
    assert_eq!(master, 2);
    assert_eq!(sheet.named_style("Good").unwrap().builtin_id, Some(26));

    let xf = sheet.cell_style_xfs().get(master).unwrap();
    assert_eq!(xf.apply.font, Some(true));
    assert_eq!(xf.apply.fill, Some(true));
    assert_eq!(xf.apply.border, Some(false));
    assert_eq!(xf.apply.number_format, Some(false));
    assert_eq!(xf.xf_id, None);

    let text = String::from_utf8(sheet.save().unwrap()).unwrap();
    assert!(text.contains(r#"<cellStyle name="Good" xfId="2" builtinId="26"/>"#));
    assert!(text.contains(r#"<cellStyleXfs count="3">"#));
}

#[test]
fn test_existing_style_is_not_replaced() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let other = StyleDescriptor::new().border(BorderSpec::all(BorderStyle::Thick, None));
    assert_eq!(sheet.add_named_style("HEADING 1", &other).unwrap(), 1);
    assert_eq!(sheet.cell_style_xfs().len(), 2);
    assert_eq!(sheet.borders().len(), 2);
}

#[test]
fn test_style_derived_from_style() {
    let mut sheet = StyleSheet::new();
    sheet
        .add_named_style("Base", &StyleDescriptor::new().num_fmt("0.0%"))
        .unwrap();
    let derived = StyleDescriptor::new()
        .font(FontSpec::new("Calibri", 11.0).italic())
        .parent_style("Base");
    let master = sheet.add_named_style("Derived", &derived).unwrap();
    let resolved = sheet.resolve_master(master).unwrap();
    assert_eq!(resolved.format_code.as_deref(), Some("0.0%"));
    assert!(resolved.font.italic());
    assert_eq!(resolved.style_name.as_deref(), Some("Derived"));
}

#[test]
fn test_cell_formats_inherit_unset_components() {
    let mut sheet = StyleSheet::new();
    let framed = StyleDescriptor::new().border(BorderSpec::all(BorderStyle::Thin, None));
    let master = sheet.add_named_style("Framed", &framed).unwrap();

    let cell = sheet
        .intern(&StyleDescriptor::new().num_fmt("0.00").parent_style("framed"))
        .unwrap();
    let style = sheet.resolve(cell).unwrap();
    assert_eq!(style.style_name.as_deref(), Some("Framed"));
    assert_eq!(style.border_id, sheet.cell_style_xfs().get(master).unwrap().border());
    assert_eq!(style.border.top().unwrap().style, Some(BorderStyle::Thin));

    assert!(matches!(
        sheet.intern(&StyleDescriptor::new().parent_style("Unframed")),
        Err(StyleError::UnknownStyle(_))
    ));
}
