//! JSON export of resolved cell formats.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use fixtures::{EMPTY_STYLES, EXCEL_STYLES};
use serde_json::{json, Value};
use xlstyles::{resolved_styles, resolved_styles_json, StyleError, StyleSheet};

fn exported(xml: &str) -> Value {
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    serde_json::from_str(&resolved_styles_json(&sheet).unwrap()).unwrap()
}

#[test]
fn test_one_entry_per_cell_format() {
    let value = exported(EXCEL_STYLES);
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[0]["styleName"], "Normal");
    assert_eq!(entries[0]["numFmtId"], 0);
    assert_eq!(entries[0]["quotePrefix"], false);
}

#[test]
fn test_number_format_fields() {
    let value = exported(EXCEL_STYLES);
    assert_eq!(value[1]["formatCode"], "\"$\"#,##0.00");
    assert_eq!(value[1]["isDate"], false);
    assert_eq!(value[2]["numFmtId"], 165);
    assert_eq!(value[2]["isDate"], true);
}

#[test]
fn test_component_views() {
    let value = exported(EXCEL_STYLES);
    let font = &value[2]["font"];
    assert_eq!(font["name"], "Meiryo UI");
    assert_eq!(font["italic"], true);
    assert_eq!(font["bold"], false);
    assert_eq!(font["underline"], "double");
    assert_eq!(font["color"], json!({"kind": "rgb", "rgb": "FFFF0000"}));

    let fill = &value[2]["fill"];
    assert_eq!(fill["pattern"], "solid");
    assert_eq!(fill["bgColor"], json!({"kind": "indexed", "indexed": 64}));
    assert_eq!(value[4]["fill"]["gradient"], true);

    assert_eq!(value[2]["border"]["bottom"]["style"], "double");
    assert_eq!(value[2]["border"]["bottom"]["color"], json!({"kind": "auto"}));
}

#[test]
fn test_master_name_and_optional_blocks() {
    let value = exported(EXCEL_STYLES);
    assert_eq!(value[3]["styleName"], "Heading 1");
    assert_eq!(value[3]["font"]["bold"], true);
    assert_eq!(value[4]["alignment"]["horizontal"], "center");
    assert_eq!(value[4]["protection"]["locked"], false);
    assert!(value[1].get("alignment").is_none());
    assert!(value[1].get("protection").is_none());
}

#[test]
fn test_empty_document_exports_empty_array() {
    assert_eq!(exported(EMPTY_STYLES), json!([]));
}

#[test]
fn test_broken_record_fails_export() {
    let xml = EXCEL_STYLES.replace(r#"numFmtId="165" fontId="2""#, r#"numFmtId="170" fontId="2""#);
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    assert!(matches!(resolved_styles(&sheet), Err(StyleError::UnknownNumFmt(170))));
    assert!(resolved_styles_json(&sheet).is_err());
}
