//! Generates styles.xml from a `StyleSheet`.
//!
//! Element names follow the root: when the loaded root is prefixed
//! (`<x:styleSheet>`), every regenerated element carries the same prefix.

use crate::catalog::Catalog;
use crate::document::{StyleSheet, DEFAULT_PROLOG};
use crate::error::Result;
use crate::fragment::RawFragment;
use crate::options::WriteOptions;
use crate::types::{Alignment, CellStyle, CellXf, NumFmt, Protection};
use crate::xml_helpers::{push_attr, push_bool_attr, push_display_attr, push_raw_attr};

/// Write a complete styles.xml string. References are not checked here.
pub(crate) fn write_styles(sheet: &StyleSheet, options: &WriteOptions) -> Result<String> {
    let prefix = sheet.element_prefix();
    let mut out = String::with_capacity(4096);
    if options.xml_declaration {
        out.push_str(sheet.prolog.as_deref().unwrap_or(DEFAULT_PROLOG));
    }
    out.push_str(&sheet.root_tag);

    write_catalog(&mut out, prefix, &sheet.num_fmts, options, |out, fmt| {
        write_num_fmt(out, prefix, fmt);
        Ok(())
    })?;
    write_catalog(&mut out, prefix, &sheet.fonts, options, |out, font| {
        write_fragment(out, prefix, font.fragment())
    })?;
    write_catalog(&mut out, prefix, &sheet.fills, options, |out, fill| {
        write_fragment(out, prefix, fill.fragment())
    })?;
    write_catalog(&mut out, prefix, &sheet.borders, options, |out, border| {
        write_fragment(out, prefix, border.fragment())
    })?;
    write_catalog(&mut out, prefix, &sheet.cell_style_xfs, options, |out, xf| {
        write_xf(out, prefix, xf);
        Ok(())
    })?;
    write_catalog(&mut out, prefix, &sheet.cell_xfs, options, |out, xf| {
        write_xf(out, prefix, xf);
        Ok(())
    })?;
    write_catalog(&mut out, prefix, &sheet.cell_styles, options, |out, style| {
        write_cell_style(out, prefix, style);
        Ok(())
    })?;
    write_catalog(&mut out, prefix, &sheet.dxfs, options, |out, dxf| {
        write_fragment(out, prefix, dxf.fragment())
    })?;
    write_catalog(&mut out, prefix, &sheet.table_styles, options, |out, style| {
        write_fragment(out, prefix, style.fragment())
    })?;

    if let Some(colors) = &sheet.colors {
        out.push_str(colors.as_str());
    }
    for fragment in &sheet.unknown {
        out.push_str(fragment.as_str());
    }
    if let Some(ext) = &sheet.ext_lst {
        out.push_str(ext.as_str());
    }

    out.push_str("</");
    out.push_str(&sheet.root_name);
    out.push('>');
    Ok(out)
}

fn push_name(out: &mut String, prefix: Option<&str>, name: &str) {
    if let Some(prefix) = prefix {
        out.push_str(prefix);
        out.push(':');
    }
    out.push_str(name);
}

fn open_tag(out: &mut String, prefix: Option<&str>, name: &str) {
    out.push('<');
    push_name(out, prefix, name);
}

fn close_tag(out: &mut String, prefix: Option<&str>, name: &str) {
    out.push_str("</");
    push_name(out, prefix, name);
    out.push('>');
}

/// Entry markup, with unprefixed elements moved under the root's prefix.
fn write_fragment(out: &mut String, prefix: Option<&str>, fragment: &RawFragment) -> Result<()> {
    match prefix {
        Some(prefix) => out.push_str(&fragment.with_prefix(prefix)?),
        None => out.push_str(fragment.as_str()),
    }
    Ok(())
}

/// `<name count="N" ...>entries</name>`, or nothing for an empty catalog
/// that should not be written.
fn write_catalog<T>(
    out: &mut String,
    prefix: Option<&str>,
    catalog: &Catalog<T>,
    options: &WriteOptions,
    mut write_entry: impl FnMut(&mut String, &T) -> Result<()>,
) -> Result<()> {
    if catalog.is_empty() && (options.omit_empty_catalogs || !catalog.present) {
        return Ok(());
    }
    let element = catalog.kind().element();
    open_tag(out, prefix, element);
    push_display_attr(out, "count", Some(catalog.len()));
    for (key, raw) in &catalog.attrs {
        push_raw_attr(out, key, raw);
    }
    if catalog.is_empty() {
        out.push_str("/>");
        return Ok(());
    }
    out.push('>');
    for entry in catalog {
        write_entry(out, entry)?;
    }
    close_tag(out, prefix, element);
    Ok(())
}

fn write_num_fmt(out: &mut String, prefix: Option<&str>, fmt: &NumFmt) {
    open_tag(out, prefix, "numFmt");
    push_display_attr(out, "numFmtId", Some(fmt.id));
    push_attr(out, "formatCode", &fmt.format_code);
    out.push_str("/>");
}

/// Attributes in schema order (CT_Xf).
fn write_xf(out: &mut String, prefix: Option<&str>, xf: &CellXf) {
    open_tag(out, prefix, "xf");
    push_display_attr(out, "numFmtId", xf.num_fmt_id);
    push_display_attr(out, "fontId", xf.font_id);
    push_display_attr(out, "fillId", xf.fill_id);
    push_display_attr(out, "borderId", xf.border_id);
    push_display_attr(out, "xfId", xf.xf_id);
    push_bool_attr(out, "quotePrefix", xf.quote_prefix);
    push_bool_attr(out, "pivotButton", xf.pivot_button);
    push_bool_attr(out, "applyNumberFormat", xf.apply.number_format);
    push_bool_attr(out, "applyFont", xf.apply.font);
    push_bool_attr(out, "applyFill", xf.apply.fill);
    push_bool_attr(out, "applyBorder", xf.apply.border);
    push_bool_attr(out, "applyAlignment", xf.apply.alignment);
    push_bool_attr(out, "applyProtection", xf.apply.protection);

    if xf.alignment.is_none() && xf.protection.is_none() && xf.ext_lst.is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    if let Some(alignment) = &xf.alignment {
        write_alignment(out, prefix, alignment);
    }
    if let Some(protection) = &xf.protection {
        write_protection(out, prefix, protection);
    }
    if let Some(ext) = &xf.ext_lst {
        out.push_str(ext.as_str());
    }
    close_tag(out, prefix, "xf");
}

fn write_alignment(out: &mut String, prefix: Option<&str>, a: &Alignment) {
    open_tag(out, prefix, "alignment");
    push_display_attr(out, "horizontal", a.horizontal.map(|h| h.as_str()));
    push_display_attr(out, "vertical", a.vertical.map(|v| v.as_str()));
    push_display_attr(out, "textRotation", a.text_rotation);
    push_bool_attr(out, "wrapText", a.wrap_text);
    push_display_attr(out, "indent", a.indent);
    push_display_attr(out, "relativeIndent", a.relative_indent);
    push_bool_attr(out, "justifyLastLine", a.justify_last_line);
    push_bool_attr(out, "shrinkToFit", a.shrink_to_fit);
    push_display_attr(out, "readingOrder", a.reading_order);
    out.push_str("/>");
}

fn write_protection(out: &mut String, prefix: Option<&str>, p: &Protection) {
    open_tag(out, prefix, "protection");
    push_bool_attr(out, "locked", p.locked);
    push_bool_attr(out, "hidden", p.hidden);
    out.push_str("/>");
}

fn write_cell_style(out: &mut String, prefix: Option<&str>, style: &CellStyle) {
    open_tag(out, prefix, "cellStyle");
    push_attr(out, "name", &style.name);
    push_display_attr(out, "xfId", Some(style.xf_id));
    push_display_attr(out, "builtinId", style.builtin_id);
    push_display_attr(out, "iLevel", style.i_level);
    push_bool_attr(out, "hidden", style.hidden);
    push_bool_attr(out, "customBuiltin", style.custom_builtin);
    out.push_str("/>");
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
    use crate::types::{HAlign, VAlign};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_output() {
        let xml = write_styles(&StyleSheet::new(), &WriteOptions::default()).unwrap();
        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
            "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">",
            "<fonts count=\"1\"><font><sz val=\"11\"/><color theme=\"1\"/><name val=\"Calibri\"/><family val=\"2\"/><scheme val=\"minor\"/></font></fonts>",
            "<fills count=\"2\"><fill><patternFill patternType=\"none\"/></fill><fill><patternFill patternType=\"gray125\"/></fill></fills>",
            "<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>",
            "<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>",
            "<cellXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/></cellXfs>",
            "<cellStyles count=\"1\"><cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/></cellStyles>",
            "</styleSheet>",
        );
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_write_xf_with_children() {
        let xf = CellXf {
            alignment: Some(
                Alignment::horizontal(HAlign::Center)
                    .with_vertical(VAlign::Center)
                    .wrapped(),
            ),
            protection: Some(Protection {
                locked: Some(false),
                hidden: None,
            }),
            ..CellXf::zeroed()
        };
        let mut out = String::new();
        write_xf(&mut out, None, &xf);
        assert_eq!(
            out,
            r#"<xf numFmtId="0" fontId="0" fillId="0" borderId="0"><alignment horizontal="center" vertical="center" wrapText="1"/><protection locked="0"/></xf>"#
        );
    }

    #[test]
    fn test_num_fmt_code_is_escaped() {
        let mut out = String::new();
        write_num_fmt(
            &mut out,
            None,
            &NumFmt {
                id: 164,
                format_code: "\"$\"#,##0.00".to_string(),
            },
        );
        assert_eq!(out, r#"<numFmt numFmtId="164" formatCode="&quot;$&quot;#,##0.00"/>"#);
    }

    #[test]
    fn test_empty_catalog_handling() {
        let mut sheet = StyleSheet::new();
        sheet.dxfs.present = true;
        let xml = write_styles(&sheet, &WriteOptions::default()).unwrap();
        assert!(xml.contains(r#"<dxfs count="0"/>"#));
        assert!(!xml.contains("<numFmts"));

        let options = WriteOptions {
            omit_empty_catalogs: true,
            xml_declaration: false,
        };
        let xml = write_styles(&sheet, &options).unwrap();
        assert!(!xml.contains("<dxfs"));
        assert!(xml.starts_with("<styleSheet"));
    }
}
