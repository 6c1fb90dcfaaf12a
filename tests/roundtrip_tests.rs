//! Load/save round trips of whole stylesheets.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use std::io::Cursor;

use fixtures::{as_text, assert_same_xml, EMPTY_STYLES, EXCEL_STYLES, LOOSE_STYLES};
use pretty_assertions::assert_eq;
use xlstyles::{
    Alignment, CatalogKind, FontSpec, HAlign, LoadOptions, StyleDescriptor, StyleError,
    StyleSheet, WriteOptions,
};

// ============================================================================
// Unmodified documents
// ============================================================================

#[test]
fn test_excel_document_is_byte_identical() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let saved = sheet.save().unwrap();
    assert_eq!(as_text(&saved), EXCEL_STYLES);
}

#[test]
fn test_excel_document_catalog_sizes() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    assert_eq!(sheet.num_fmts().len(), 2);
    assert_eq!(sheet.fonts().len(), 3);
    assert_eq!(sheet.fills().len(), 4);
    assert_eq!(sheet.borders().len(), 2);
    assert_eq!(sheet.cell_style_xfs().len(), 2);
    assert_eq!(sheet.cell_xfs().len(), 6);
    assert_eq!(sheet.cell_styles().len(), 2);
    assert_eq!(sheet.dxfs().len(), 2);
    assert_eq!(sheet.table_styles().len(), 1);
    assert_eq!(sheet.default_table_style(), Some("TableStyleMedium2"));
    assert_eq!(sheet.default_pivot_style(), Some("PivotStyleLight16"));
    assert!(sheet.colors().is_some());
    assert!(sheet.ext_lst().unwrap().as_str().contains("x14:slicerStyles"));
    sheet.validate().unwrap();
}

#[test]
fn test_second_round_trip_is_stable() {
    let once = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap().save().unwrap();
    let twice = StyleSheet::load(&once).unwrap().save().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_loose_document_counts_are_recomputed() {
    let sheet = StyleSheet::load(LOOSE_STYLES.as_bytes()).unwrap();
    assert_eq!(sheet.fonts().len(), 1);
    let saved = sheet.save().unwrap();
    let text = as_text(&saved);

    // No declaration in the source: the standard one is written.
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
    assert!(text.contains(r#"<fonts count="1">"#));
    assert!(text.contains(r#"<dxfs count="0"/>"#));
    assert!(text.contains(r#"<x:futureThing xmlns:x="urn:future" flag="on"><x:inner/></x:futureThing>"#));
    assert!(!text.contains("cellStyleXfs"));
    assert_same_xml(text, &LOOSE_STYLES.replace(r#"count="7""#, r#"count="1""#));
}

#[test]
fn test_strict_load_rejects_stale_counts() {
    let err = StyleSheet::load_with(LOOSE_STYLES.as_bytes(), &LoadOptions::strict()).unwrap_err();
    assert!(matches!(
        err,
        StyleError::CountMismatch {
            catalog: CatalogKind::Fonts,
            declared: 7,
            actual: 1
        }
    ));
}

#[test]
fn test_omit_empty_catalogs() {
    let sheet = StyleSheet::load(LOOSE_STYLES.as_bytes()).unwrap();
    let options = WriteOptions {
        omit_empty_catalogs: true,
        ..WriteOptions::default()
    };
    let saved = sheet.save_with(&options).unwrap();
    assert!(!as_text(&saved).contains("<dxfs"));
}

#[test]
fn test_empty_root() {
    let sheet = StyleSheet::load(EMPTY_STYLES.as_bytes()).unwrap();
    assert!(sheet.fonts().is_empty());
    assert_eq!(
        sheet.resolve(0).unwrap().style_name.as_deref(),
        Some("Normal")
    );
    let options = WriteOptions {
        xml_declaration: false,
        ..WriteOptions::default()
    };
    let saved = sheet.save_with(&options).unwrap();
    let expected = concat!(
        "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
        "<fonts count=\"1\"><font><sz val=\"11\"/><color theme=\"1\"/><name val=\"Calibri\"/><family val=\"2\"/><scheme val=\"minor\"/></font></fonts>",
        "<fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill><fill><patternFill patternType=\"gray125\"/></fill></fills>",
        "<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>",
        "<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>",
        "<cellXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/></cellXfs>",
        "<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>",
        "</styleSheet>",
    );
    assert_eq!(as_text(&saved), expected);
    assert!(sheet.cell_xfs().is_empty());
}

#[test]
fn test_missing_cell_formats_are_written_on_save() {
    let xml = r#"<styleSheet xmlns="urn:x"><fonts count="1"><font/></fonts></styleSheet>"#;
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    let reloaded = StyleSheet::load(&sheet.save().unwrap()).unwrap();
    assert_eq!(reloaded.fonts().get(0).unwrap().as_str(), "<font/>");
    assert_eq!(reloaded.fonts().len(), 1);
    let xf = reloaded.cell_xfs().get(0).unwrap();
    assert_eq!((xf.num_fmt(), xf.font(), xf.xf_id), (0, 0, Some(0)));
    assert_eq!(reloaded.cell_styles().get(0).unwrap().name, "Normal");
    reloaded.validate().unwrap();
}

#[test]
fn test_load_from_reader_and_save_to_writer() {
    let sheet = StyleSheet::load_from(Cursor::new(EXCEL_STYLES.as_bytes()), &LoadOptions::default())
        .unwrap();
    let mut out = Vec::new();
    sheet.save_to(&mut out, &WriteOptions::default()).unwrap();
    assert_eq!(as_text(&out), EXCEL_STYLES);
}

#[test]
fn test_malformed_input_is_rejected() {
    for bad in [
        "",
        "<styleSheet><fonts count=\"1\"><font><b/></fonts></styleSheet>",
        "<workbook/>",
        "<styleSheet><cellXfs><xf fontId=\"x\"/></cellXfs></styleSheet>",
    ] {
        let err = StyleSheet::load(bad.as_bytes()).unwrap_err();
        assert!(err.is_parse_error(), "{bad:?} gave {err:?}");
    }
    assert!(StyleSheet::load(&[0xff, 0xfe, 0x00]).is_err());
}

// ============================================================================
// Edited documents
// ============================================================================

const PREFIXED_STYLES: &str = concat!(
    "<x:styleSheet xmlns:x=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
    "<x:numFmts count=\"1\"><x:numFmt numFmtId=\"164\" formatCode=\"0.0\"/></x:numFmts>",
    "<x:fonts count=\"1\"><x:font><x:sz val=\"11\"/><x:name val=\"Calibri\"/></x:font></x:fonts>",
    "<x:fills count=\"2\"><x:fill><x:patternFill patternType=\"none\"/></x:fill><x:fill><x:patternFill patternType=\"gray125\"/></x:fill></x:fills>",
    "<x:borders count=\"1\"><x:border/></x:borders>",
    "<x:cellStyleXfs count=\"1\"><x:xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></x:cellStyleXfs>",
    "<x:cellXfs count=\"1\"><x:xf numFmtId=\"164\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"><x:alignment horizontal=\"center\"/></x:xf></x:cellXfs>",
    "<x:cellStyles count=\"1\"><x:cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></x:cellStyles>",
    "</x:styleSheet>",
);

fn bare_options() -> WriteOptions {
    WriteOptions {
        xml_declaration: false,
        ..WriteOptions::default()
    }
}

fn all_elements_prefixed(text: &str) -> bool {
    text.match_indices('<')
        .all(|(i, _)| text[i + 1..].starts_with("x:") || text[i + 1..].starts_with("/x:"))
}

#[test]
fn test_prefixed_document_round_trips() {
    let sheet = StyleSheet::load(PREFIXED_STYLES.as_bytes()).unwrap();
    assert_eq!(sheet.num_fmts().len(), 1);
    assert_eq!(sheet.resolve(0).unwrap().format_code.as_deref(), Some("0.0"));
    let saved = sheet.save_with(&bare_options()).unwrap();
    assert_eq!(as_text(&saved), PREFIXED_STYLES);
}

#[test]
fn test_new_entries_take_the_root_prefix() {
    let mut sheet = StyleSheet::load(PREFIXED_STYLES.as_bytes()).unwrap();
    sheet.font_mut(0).unwrap().set_bold(true).unwrap();
    let desc = StyleDescriptor::new()
        .font(FontSpec::new("Aptos", 12.0).italic())
        .num_fmt("0.000")
        .alignment(Alignment::horizontal(HAlign::Right));
    let index = sheet.intern(&desc).unwrap();

    let saved = sheet.save_with(&bare_options()).unwrap();
    let text = as_text(&saved);
    assert!(all_elements_prefixed(text), "{text}");
    assert!(text.contains(r#"<x:font><x:b/><x:sz val="11"/>"#));
    assert!(text.contains(r#"<x:numFmt numFmtId="165" formatCode="0.000"/>"#));
    assert!(text.contains(r#"<x:alignment horizontal="right"/>"#));

    let reloaded = StyleSheet::load(&saved).unwrap();
    let style = reloaded.resolve(index).unwrap();
    assert!(style.font.italic());
    assert_eq!(style.font.name().as_deref(), Some("Aptos"));
    assert_eq!(style.format_code.as_deref(), Some("0.000"));
    assert!(reloaded.fonts().get(0).unwrap().bold());
}

#[test]
fn test_interned_entries_survive_reload() {
    let mut sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let desc = StyleDescriptor::new()
        .font(FontSpec::new("Aptos", 12.0).bold())
        .num_fmt("0.000");
    let index = sheet.intern(&desc).unwrap();
    assert_eq!(index, 6);

    let reloaded = StyleSheet::load(&sheet.save().unwrap()).unwrap();
    assert_eq!(reloaded.cell_xfs().len(), 7);
    assert_eq!(reloaded.fonts().len(), 4);
    assert_eq!(reloaded.num_fmts().get(2).unwrap().id, 166);

    // untouched entries keep their markup
    for i in 0..3 {
        assert_eq!(
            reloaded.fonts().get(i).unwrap().as_str(),
            sheet.fonts().get(i).unwrap().as_str()
        );
    }
    assert_eq!(reloaded.dxfs().get(0).unwrap(), sheet.dxfs().get(0).unwrap());

    let style = reloaded.resolve(index).unwrap();
    assert_eq!(style.format_code.as_deref(), Some("0.000"));
    assert_eq!(style.font.name().as_deref(), Some("Aptos"));
    assert!(style.font.bold());
    // the second intern into the reloaded document finds the same record
    let mut reloaded = reloaded;
    assert_eq!(reloaded.intern(&desc).unwrap(), index);
}

#[test]
fn test_dangling_reference_blocks_save() {
    let xml = r#"<styleSheet><fonts count="1"><font/></fonts><fills count="1"><fill/></fills><borders count="1"><border/></borders><cellXfs count="1"><xf numFmtId="0" fontId="3" fillId="0" borderId="0"/></cellXfs></styleSheet>"#;
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    assert!(matches!(
        sheet.save(),
        Err(StyleError::IndexOutOfRange {
            catalog: CatalogKind::Fonts,
            index: 3,
            len: 1
        })
    ));
}
