//! Number formats: the built-in table, date detection and custom id allocation.
//!
//! Excel predefines ids 0-163. Only some of them have a fixed code (0-22
//! and 37-49); the rest are locale-dependent and are never written with a
//! code. Custom formats live in the `numFmts` catalog with ids from 164 up.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::error::{Result, StyleError};
use crate::types::NumFmt;

/// First id available to custom number formats.
pub const FIRST_CUSTOM_ID: u32 = 164;

/// Built-in number format IDs (0-49 are predefined by Excel)
/// See: ECMA-376 Part 1, Section 18.8.30
pub const fn builtin_format(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        // Currency formats (5-8)
        5 => Some("$#,##0_);($#,##0)"),
        6 => Some("$#,##0_);[Red]($#,##0)"),
        7 => Some("$#,##0.00_);($#,##0.00)"),
        8 => Some("$#,##0.00_);[Red]($#,##0.00)"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("mm-dd-yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        // Accounting formats (41-44)
        41 => Some("_(* #,##0_);_(* (#,##0);_(* \"-\"_);_(@_)"),
        42 => Some("_($* #,##0_);_($* (#,##0);_($* \"-\"_);_(@_)"),
        43 => Some("_(* #,##0.00_);_(* (#,##0.00);_(* \"-\"??_);_(@_)"),
        44 => Some("_($* #,##0.00_);_($* (#,##0.00);_($* \"-\"??_);_(@_)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

/// Built-in id whose code is exactly `code`.
pub fn builtin_id_for_code(code: &str) -> Option<u32> {
    (0u32..=49).find(|&id| builtin_format(id) == Some(code))
}

/// Ids below 164 belong to Excel whether or not they have a fixed code.
pub const fn is_builtin_id(id: u32) -> bool {
    id < FIRST_CUSTOM_ID
}

/// Check if a format code is a date/time format
pub fn is_date_format(format_code: &str) -> bool {
    let lower = format_code.to_lowercase();

    // Skip quoted text, colors/conditions in brackets and escaped characters
    let mut in_quotes = false;
    let mut bracket: Option<String> = None;
    let mut cleaned = String::new();
    let mut chars = lower.chars();
    while let Some(c) = chars.next() {
        if let Some(inner) = bracket.as_mut() {
            if c == ']' {
                // Elapsed time ([h], [mm], [ss]) is the only bracket that counts
                if inner.chars().all(|c| matches!(c, 'h' | 'm' | 's')) {
                    cleaned.push_str(inner);
                }
                bracket = None;
            } else {
                inner.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = !in_quotes,
            _ if in_quotes => {}
            '[' => bracket = Some(String::new()),
            '\\' | '_' | '*' => {
                chars.next();
            }
            _ => cleaned.push(c),
        }
    }

    // Check for date/time tokens
    cleaned.contains('y') ||
    cleaned.contains('m') && !cleaned.contains('#') ||  // m is month if no # (number format)
    cleaned.contains('d') ||
    cleaned.contains('h') ||
    cleaned.contains('s') && cleaned.contains(':') // s is seconds if with colon
}

/// Code for a number format id: the catalog first (a catalog entry may
/// override a built-in id), then the built-in table.
///
/// Returns `Ok(None)` for the built-in ids that have no fixed code, and
/// `UnknownNumFmt` for custom ids the catalog does not define.
pub fn format_code(num_fmts: &Catalog<NumFmt>, id: u32) -> Result<Option<String>> {
    if let Some(fmt) = num_fmts.iter().find(|f| f.id == id) {
        return Ok(Some(fmt.format_code.clone()));
    }
    if let Some(code) = builtin_format(id) {
        return Ok(Some(code.to_string()));
    }
    if is_builtin_id(id) {
        return Ok(None);
    }
    Err(StyleError::UnknownNumFmt(id))
}

/// Id of the first catalog entry with exactly this code.
///
/// An entry shadowed by an earlier entry with the same id is skipped, since
/// its id resolves to that earlier entry's code.
pub fn custom_id_for_code(num_fmts: &Catalog<NumFmt>, code: &str) -> Option<u32> {
    num_fmts
        .indexed()
        .find(|(index, f)| {
            f.format_code == code && num_fmts.position(|other| other.id == f.id) == Some(*index)
        })
        .map(|(_, f)| f.id)
}

/// Indexes of entries whose custom id is already used by an earlier entry.
pub(crate) fn shadowed_entries(num_fmts: &Catalog<NumFmt>) -> Vec<u32> {
    let mut seen = HashSet::new();
    num_fmts
        .indexed()
        .filter(|(_, f)| !is_builtin_id(f.id) && !seen.insert(f.id))
        .map(|(index, _)| index)
        .collect()
}

/// Id that displays `code`: a catalog entry, else a built-in with that
/// exact code.
pub fn find_id(num_fmts: &Catalog<NumFmt>, code: &str) -> Option<u32> {
    custom_id_for_code(num_fmts, code).or_else(|| builtin_id_for_code(code))
}

/// Next free custom id: one past the highest custom id in use, never below 164.
pub fn next_custom_id(num_fmts: &Catalog<NumFmt>) -> Result<u32> {
    match num_fmts.iter().map(|f| f.id).filter(|&id| !is_builtin_id(id)).max() {
        None => Ok(FIRST_CUSTOM_ID),
        Some(max) => max
            .checked_add(1)
            .ok_or(StyleError::CatalogFull(num_fmts.kind())),
    }
}

/// Custom ids defined more than once, in first-repeat order.
pub fn duplicate_custom_ids(num_fmts: &Catalog<NumFmt>) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for fmt in num_fmts {
        if !is_builtin_id(fmt.id) && !seen.insert(fmt.id) && !dups.contains(&fmt.id) {
            dups.push(fmt.id);
        }
    }
    dups
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
    use test_case::test_case;

    fn catalog(entries: &[(u32, &str)]) -> Catalog<NumFmt> {
        let mut c = Catalog::new(CatalogKind::NumFmts);
        for (id, code) in entries {
            c.push(NumFmt {
                id: *id,
                format_code: (*code).to_string(),
            })
            .unwrap();
        }
        c
    }

    #[test_case("yyyy-mm-dd", true ; "iso date")]
    #[test_case("m/d/yy", true ; "short date")]
    #[test_case("[h]:mm:ss", true ; "elapsed hours")]
    #[test_case("h:mm AM/PM", true ; "twelve hour time")]
    #[test_case("#,##0.00", false ; "thousands")]
    #[test_case("General", false ; "general")]
    #[test_case("0.00E+00", false ; "scientific")]
    #[test_case("[Red]0.00", false ; "colored number")]
    #[test_case("\"days\" 0", false ; "quoted text")]
    #[test_case("@", false ; "text")]
    fn test_date_detection(code: &str, expected: bool) {
        assert_eq!(is_date_format(code), expected);
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin_format(2), Some("0.00"));
        assert_eq!(builtin_format(30), None);
        assert_eq!(builtin_id_for_code("0.00"), Some(2));
        assert_eq!(builtin_id_for_code("@"), Some(49));
        assert_eq!(builtin_id_for_code("0.000"), None);
    }

    #[test]
    fn test_shadowed_entry_is_not_reused() {
        let c = catalog(&[(164, "0.0"), (164, "0.000"), (165, "0.0%")]);
        assert_eq!(custom_id_for_code(&c, "0.0"), Some(164));
        assert_eq!(custom_id_for_code(&c, "0.000"), None);
        assert_eq!(find_id(&c, "0.000"), None);
        assert_eq!(shadowed_entries(&c), vec![1]);
    }

    #[test]
    fn test_format_code_resolution_order() {
        let c = catalog(&[(164, "0.000"), (2, "0.0")]);
        assert_eq!(format_code(&c, 164).unwrap().as_deref(), Some("0.000"));
        // catalog override of a built-in id
        assert_eq!(format_code(&c, 2).unwrap().as_deref(), Some("0.0"));
        assert_eq!(format_code(&c, 14).unwrap().as_deref(), Some("mm-dd-yy"));
        // locale-dependent built-in
        assert_eq!(format_code(&c, 30).unwrap(), None);
        assert!(matches!(format_code(&c, 200), Err(StyleError::UnknownNumFmt(200))));
    }

    #[test]
    fn test_next_custom_id() {
        assert_eq!(next_custom_id(&catalog(&[])).unwrap(), 164);
        assert_eq!(next_custom_id(&catalog(&[(5, "x")])).unwrap(), 164);
        assert_eq!(next_custom_id(&catalog(&[(170, "a"), (165, "b")])).unwrap(), 171);
    }

    #[test]
    fn test_find_id_prefers_catalog() {
        let c = catalog(&[(170, "0.00")]);
        assert_eq!(find_id(&c, "0.00"), Some(170));
        assert_eq!(find_id(&catalog(&[]), "0.00"), Some(2));
        assert_eq!(find_id(&c, "0.0000"), None);
        assert_eq!(custom_id_for_code(&catalog(&[]), "0.00"), None);
    }

    #[test]
    fn test_duplicate_custom_ids() {
        let c = catalog(&[(164, "a"), (165, "b"), (164, "c"), (164, "d"), (3, "e"), (3, "f")]);
        assert_eq!(duplicate_custom_ids(&c), vec![164]);
    }
}
