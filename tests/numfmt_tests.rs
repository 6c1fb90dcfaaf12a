//! Number format table, date detection and id resolution.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use fixtures::EXCEL_STYLES;
use test_case::test_case;
use xlstyles::numfmt::{
    builtin_format, builtin_id_for_code, format_code, is_builtin_id, is_date_format,
    FIRST_CUSTOM_ID,
};
use xlstyles::{StyleError, StyleSheet};

// ============================================================================
// Built-in Format IDs
// ============================================================================

#[test_case(0, "General")]
#[test_case(1, "0")]
#[test_case(2, "0.00")]
#[test_case(3, "#,##0")]
#[test_case(9, "0%")]
#[test_case(14, "mm-dd-yy")]
#[test_case(22, "m/d/yy h:mm")]
#[test_case(46, "[h]:mm:ss")]
#[test_case(49, "@")]
fn test_builtin_code(id: u32, code: &str) {
    assert_eq!(builtin_format(id), Some(code));
    assert_eq!(builtin_id_for_code(code), Some(id));
}

#[test]
fn test_locale_dependent_ids_have_no_code() {
    for id in (23..=36).chain(50..=163) {
        assert_eq!(builtin_format(id), None, "id {id}");
        assert!(is_builtin_id(id));
    }
    assert!(!is_builtin_id(FIRST_CUSTOM_ID));
}

// ============================================================================
// Date Format Detection
// ============================================================================

#[test_case("yyyy-mm-dd hh:mm", true ; "date time")]
#[test_case("[$-409]mmmm d, yyyy;@", true ; "locale prefixed")]
#[test_case("[$-F800]dddd, mmmm dd, yyyy", true ; "system long date")]
#[test_case("[mm]:ss", true ; "elapsed minutes")]
#[test_case("mm:ss.0", true ; "minutes seconds")]
#[test_case("d\\-mmm", true ; "escaped separator")]
#[test_case("#,##0.00_);[Red](#,##0.00)", false ; "accounting negative red")]
#[test_case("0.0\"d\"", false ; "quoted d")]
#[test_case("#,##0 \"days\"", false ; "quoted word")]
#[test_case("[Blue]#,##0", false ; "color only")]
#[test_case("0.00E+00", false ; "exponent")]
fn test_is_date_format(code: &str, expected: bool) {
    assert_eq!(is_date_format(code), expected, "{code}");
}

// ============================================================================
// Catalog Resolution
// ============================================================================

#[test]
fn test_format_code_lookup_in_loaded_document() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    let catalog = sheet.num_fmts();
    assert_eq!(
        format_code(catalog, 164).unwrap().as_deref(),
        Some("\"$\"#,##0.00")
    );
    assert_eq!(
        format_code(catalog, 165).unwrap().as_deref(),
        Some("[$-409]d\\-mmm\\-yy;@")
    );
    assert_eq!(format_code(catalog, 4).unwrap().as_deref(), Some("#,##0.00"));
    assert_eq!(format_code(catalog, 31).unwrap(), None);
    assert!(matches!(format_code(catalog, 166), Err(StyleError::UnknownNumFmt(166))));
}

#[test]
fn test_num_fmt_id_for_prefers_catalog_entries() {
    let sheet = StyleSheet::load(EXCEL_STYLES.as_bytes()).unwrap();
    assert_eq!(sheet.num_fmt_id_for("\"$\"#,##0.00"), Some(164));
    assert_eq!(sheet.num_fmt_id_for("0%"), Some(9));
    assert_eq!(sheet.num_fmt_id_for("0.0000"), None);
}

#[test]
fn test_duplicate_custom_ids_are_reported_not_fatal() {
    let xml = EXCEL_STYLES.replace(r#"numFmtId="165" formatCode"#, r#"numFmtId="164" formatCode"#);
    let sheet = StyleSheet::load(xml.as_bytes()).unwrap();
    assert!(matches!(
        sheet.validate(),
        Err(StyleError::UnknownNumFmt(165) | StyleError::DuplicateCustomNumFmtId(164))
    ));
    // still saves; interning moves the shadowed entry to a fresh id
    sheet.save().unwrap();
    let mut sheet = sheet;
    assert_eq!(sheet.intern_num_fmt("0.0000").unwrap(), 166);
    assert_eq!(sheet.num_fmts().get(1).unwrap().id, 165);
    sheet.validate().unwrap();
}
