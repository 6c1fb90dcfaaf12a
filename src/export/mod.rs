//! styles.xml export.
//!
//! The writer regenerates catalog elements (so `count` always matches the
//! entries) and replays raw fragments byte for byte.

pub(crate) mod styles_writer;

pub(crate) use styles_writer::write_styles;

use crate::document::StyleSheet;
use crate::error::Result;
use crate::types::ResolvedStyle;

/// Resolve every cell format of a stylesheet, in index order.
pub fn resolved_styles(sheet: &StyleSheet) -> Result<Vec<ResolvedStyle>> {
    (0u32..)
        .zip(sheet.cell_xfs())
        .map(|(index, _)| sheet.resolve(index))
        .collect()
}

/// Every cell format resolved, as a JSON array indexed like `cellXfs`.
pub fn resolved_styles_json(sheet: &StyleSheet) -> Result<String> {
    Ok(serde_json::to_string(&resolved_styles(sheet)?)?)
}
