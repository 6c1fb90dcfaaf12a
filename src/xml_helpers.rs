//! Shared XML attribute helpers for reading and writing styles.xml.
//!
//! Reading goes through [`Attrs`], which collects an element's attributes
//! once (unescaped) and hands out typed values. Writing helpers append
//! escaped attributes to a `String` buffer.

use std::borrow::Cow;
use std::fmt::Write as _;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::BytesStart;

use crate::error::{Result, StyleError};

/// Attributes of one element, keyed by qualified name, values unescaped.
#[derive(Debug, Default, Clone)]
pub(crate) struct Attrs {
    entries: Vec<(String, String)>,
}

impl Attrs {
    /// Collect attributes from a start tag. Malformed attributes are a parse error.
    pub fn from_start(e: &BytesStart) -> Result<Self> {
        let mut entries = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let value = attr.unescape_value()?.into_owned();
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    /// Build from raw (still escaped) attribute pairs.
    pub fn from_raw(raw: &[(String, String)]) -> Result<Self> {
        let entries = raw
            .iter()
            .map(|(k, v)| Ok((k.clone(), unescape_value(v)?.into_owned())))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Extract a string attribute value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(ToString::to_string)
    }

    /// A required attribute, or `MissingAttribute`.
    pub fn required(&self, element: &'static str, key: &'static str) -> Result<&str> {
        self.get(key).ok_or(StyleError::MissingAttribute {
            element,
            attribute: key,
        })
    }

    /// Extract a `u32` attribute. Present but unparsable is an error.
    pub fn u32(&self, element: &str, key: &str) -> Result<Option<u32>> {
        self.parsed(element, key)
    }

    pub fn i32(&self, element: &str, key: &str) -> Result<Option<i32>> {
        self.parsed(element, key)
    }

    pub fn f64(&self, element: &str, key: &str) -> Result<Option<f64>> {
        self.parsed(element, key)
    }

    /// Extract a boolean attribute. Recognizes `"1"`/`"true"` and `"0"`/`"false"`.
    pub fn bool(&self, element: &str, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => parse_bool(v)
                .map(Some)
                .ok_or_else(|| bad_value(element, key, v)),
        }
    }

    fn parsed<T: std::str::FromStr>(&self, element: &str, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| bad_value(element, key, v)),
        }
    }
}

fn bad_value(element: &str, key: &str, value: &str) -> StyleError {
    StyleError::Parse(format!("<{element}> has invalid {key}=\"{value}\""))
}

/// Parse an xsd:boolean.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Attributes of a start tag with values left exactly as written (still escaped).
pub(crate) fn raw_attrs(e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        out.push((
            std::str::from_utf8(attr.key.as_ref())?.to_string(),
            std::str::from_utf8(&attr.value)?.to_string(),
        ));
    }
    Ok(out)
}

/// Unescape a raw attribute value.
pub(crate) fn unescape_value(raw: &str) -> Result<Cow<'_, str>> {
    unescape(raw).map_err(|e| StyleError::Xml(e.into()))
}

/// Get the local element name as an owned string.
///
/// Returns empty string if not valid UTF-8.
#[inline]
pub(crate) fn local_name_string(e: &BytesStart) -> String {
    let bytes = e.local_name();
    std::str::from_utf8(bytes.as_ref())
        .unwrap_or("")
        .to_string()
}

// ============================================================================
// Writing
// ============================================================================

/// Escape text for use inside an attribute value.
pub(crate) fn xml_escape(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Append ` key="value"` with the value escaped.
pub(crate) fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&xml_escape(value));
    out.push('"');
}

/// Append ` key="value"` where value is already escaped markup.
pub(crate) fn push_raw_attr(out: &mut String, key: &str, raw: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    // Single-quoted source values may carry a bare `"`.
    out.push_str(&raw.replace('"', "&quot;"));
    out.push('"');
}

/// Append a numeric or other `Display` attribute when present.
pub(crate) fn push_display_attr<T: std::fmt::Display>(
    out: &mut String,
    key: &str,
    value: Option<T>,
) {
    if let Some(v) = value {
        let _ = write!(out, " {key}=\"{v}\"");
    }
}

/// Append a boolean attribute as `1`/`0` when present.
pub(crate) fn push_bool_attr(out: &mut String, key: &str, value: Option<bool>) {
    if let Some(v) = value {
        let _ = write!(out, " {key}=\"{}\"", if v { "1" } else { "0" });
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string() {
        let e = make_start(r#"<numFmt formatCode="&quot;$&quot;#,##0" />"#);
        let attrs = Attrs::from_start(&e).unwrap();
        assert_eq!(attrs.get("formatCode"), Some("\"$\"#,##0"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn test_attr_u32() {
        let e = make_start(r#"<xf fontId="42" fillId="x" />"#);
        let attrs = Attrs::from_start(&e).unwrap();
        assert_eq!(attrs.u32("xf", "fontId").unwrap(), Some(42));
        assert_eq!(attrs.u32("xf", "borderId").unwrap(), None);
        assert!(attrs.u32("xf", "fillId").is_err());
    }

    #[test]
    fn test_attr_bool() {
        let e = make_start(r#"<foo a="1" b="0" c="true" d="false" e="yes" />"#);
        let attrs = Attrs::from_start(&e).unwrap();
        assert_eq!(attrs.bool("foo", "a").unwrap(), Some(true));
        assert_eq!(attrs.bool("foo", "b").unwrap(), Some(false));
        assert_eq!(attrs.bool("foo", "c").unwrap(), Some(true));
        assert_eq!(attrs.bool("foo", "d").unwrap(), Some(false));
        assert_eq!(attrs.bool("foo", "missing").unwrap(), None);
        assert!(attrs.bool("foo", "e").is_err());
    }

    #[test]
    fn test_required() {
        let e = make_start(r#"<cellStyle name="Normal" />"#);
        let attrs = Attrs::from_start(&e).unwrap();
        assert_eq!(attrs.required("cellStyle", "name").unwrap(), "Normal");
        assert!(matches!(
            attrs.required("cellStyle", "xfId"),
            Err(StyleError::MissingAttribute {
                element: "cellStyle",
                attribute: "xfId"
            })
        ));
    }

    #[test]
    fn test_raw_attrs_keep_escapes() {
        let e = make_start(r#"<fonts count="2" x14ac:knownFonts="1" note="a&amp;b" />"#);
        let raw = raw_attrs(&e).unwrap();
        assert_eq!(raw[1], ("x14ac:knownFonts".to_string(), "1".to_string()));
        assert_eq!(raw[2].1, "a&amp;b");
    }

    #[test]
    fn test_push_attr_escapes() {
        let mut out = String::new();
        push_attr(&mut out, "formatCode", "\"$\"#,##0;[Red]<0");
        assert_eq!(out, " formatCode=\"&quot;$&quot;#,##0;[Red]&lt;0\"");
    }

    #[test]
    fn test_push_bool_and_display() {
        let mut out = String::new();
        push_bool_attr(&mut out, "applyFont", Some(true));
        push_bool_attr(&mut out, "applyFill", None);
        push_display_attr(&mut out, "indent", Some(2u32));
        assert_eq!(out, " applyFont=\"1\" indent=\"2\"");
    }
}
