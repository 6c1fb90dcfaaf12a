//! Raw markup fragments for elements whose structure is not fully modeled.
//!
//! Fonts, fills, borders, dxfs, table styles and a few document-level
//! elements are stored as the exact markup they were loaded from. Typed
//! access is parse-on-demand: a scan records the byte span of every element
//! in the fragment, accessors read the attributes they need from it, and
//! mutations splice a rebuilt tag into the string while every other byte
//! stays as it was.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::error::{Result, StyleError};
use crate::xml_helpers::{local_name_string, push_attr, push_raw_attr, raw_attrs, Attrs};

/// The exact markup of one XML element, including its start and end tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RawFragment(String);

impl RawFragment {
    /// Wrap markup holding exactly one well-formed element.
    ///
    /// Surrounding whitespace is dropped; anything else outside the element
    /// is rejected.
    pub fn new(markup: impl Into<String>) -> Result<Self> {
        let markup = markup.into();
        let trimmed = markup.trim();
        let scan = Scan::new(trimmed)?;
        match scan.root() {
            Some(root) if root.start == 0 && root.end == trimmed.len() => {}
            Some(_) => {
                return Err(StyleError::Fragment(
                    "content outside the root element".to_string(),
                ))
            }
            None => return Err(StyleError::Fragment("no element".to_string())),
        }
        if scan.spans.iter().filter(|s| s.depth == 0).count() > 1 {
            return Err(StyleError::Fragment("more than one root element".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Markup already checked by the document reader.
    pub(crate) fn from_captured(markup: &str) -> Self {
        Self(markup.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Local name of the root element.
    pub fn root_name(&self) -> Result<String> {
        Ok(self.scan()?.root().map(|r| r.local.clone()).unwrap_or_default())
    }

    /// Read one attribute of a descendant, unescaped.
    ///
    /// `path` walks child elements by local name from the root; an empty
    /// path addresses the root itself. Returns `None` when the element or
    /// the attribute is absent.
    pub fn child_attr(&self, path: &[&str], attr: &str) -> Result<Option<String>> {
        let scan = self.scan()?;
        match scan.find(path) {
            Some(span) => Ok(span.attrs()?.string(attr)),
            None => Ok(None),
        }
    }

    /// Whether the element at `path` exists.
    pub fn has_child(&self, path: &[&str]) -> Result<bool> {
        Ok(self.scan()?.find(path).is_some())
    }

    /// Local names of the root's direct children, in document order.
    pub fn child_names(&self) -> Result<Vec<String>> {
        let scan = self.scan()?;
        Ok(match scan.root() {
            Some(root) => scan.children(root).map(|c| c.local.clone()).collect(),
            None => Vec::new(),
        })
    }

    /// The element at `path` as a fragment of its own.
    pub fn child_fragment(&self, path: &[&str]) -> Result<Option<RawFragment>> {
        let scan = self.scan()?;
        Ok(scan
            .find(path)
            .and_then(|span| self.0.get(span.start..span.end))
            .map(Self::from_captured))
    }

    pub(crate) fn scan(&self) -> Result<Scan> {
        Scan::new(&self.0)
    }

    /// Set (or add) one attribute on the start tag at `path`.
    ///
    /// Only that start tag is rewritten; its other attributes keep their
    /// order and escaping.
    pub(crate) fn set_attr(&mut self, path: &[&str], attr: &str, value: &str) -> Result<()> {
        let scan = self.scan()?;
        let span = scan.find(path).ok_or_else(|| missing(path))?;
        let mut tag = String::new();
        tag.push('<');
        tag.push_str(&span.qname);
        let mut replaced = false;
        for (key, raw) in &span.raw_attrs {
            if key == attr {
                push_attr(&mut tag, key, value);
                replaced = true;
            } else {
                push_raw_attr(&mut tag, key, raw);
            }
        }
        if !replaced {
            push_attr(&mut tag, attr, value);
        }
        tag.push_str(if span.empty { "/>" } else { ">" });
        self.splice(span.start, span.tag_end, &tag)
    }

    /// Insert `markup` as a child of the element at `parent`.
    ///
    /// The child goes before the first existing child whose local name is
    /// in `before`, or last when there is none. A self-closing parent is
    /// expanded into a start/end pair.
    pub(crate) fn insert_child(
        &mut self,
        parent: &[&str],
        markup: &str,
        before: &[&str],
    ) -> Result<()> {
        let scan = self.scan()?;
        let span = scan.find(parent).ok_or_else(|| missing(parent))?;
        if span.empty {
            let open = self
                .0
                .get(span.start..span.tag_end)
                .and_then(|t| t.strip_suffix("/>"))
                .ok_or_else(|| StyleError::Fragment(format!("bad empty tag <{}>", span.qname)))?;
            let expanded = format!("{}>{markup}</{}>", open.trim_end(), span.qname);
            return self.splice(span.start, span.tag_end, &expanded);
        }
        let next = scan
            .children(span)
            .find(|c| before.contains(&c.local.as_str()))
            .map(|c| c.start);
        let at = match next {
            Some(at) => at,
            None => self
                .0
                .get(span.start..span.end)
                .and_then(|s| s.rfind("</"))
                .map(|off| span.start + off)
                .ok_or_else(|| no_end_tag(&span.qname))?,
        };
        self.splice(at, at, markup)
    }

    /// Replace the whole element at `path` with `markup`.
    pub(crate) fn replace_child(&mut self, path: &[&str], markup: &str) -> Result<()> {
        let scan = self.scan()?;
        let span = scan.find(path).ok_or_else(|| missing(path))?;
        self.splice(span.start, span.end, markup)
    }

    /// Remove the element at `path`. Returns false when it was absent.
    pub(crate) fn remove_child(&mut self, path: &[&str]) -> Result<bool> {
        let scan = self.scan()?;
        match scan.find(path) {
            Some(span) if span.depth > 0 => {
                self.splice(span.start, span.end, "")?;
                Ok(true)
            }
            Some(_) => Err(StyleError::Fragment("cannot remove the root element".to_string())),
            None => Ok(false),
        }
    }

    /// The markup with `prefix` put on every unprefixed element name.
    ///
    /// Elements inside a default namespace declaration (`xmlns="..."`)
    /// keep their names. Markup with nothing to rename is borrowed.
    pub(crate) fn with_prefix(&self, prefix: &str) -> Result<Cow<'_, str>> {
        let scan = self.scan()?;
        let scoped: Vec<(usize, usize)> = scan
            .spans
            .iter()
            .filter(|s| s.raw_attrs.iter().any(|(k, _)| k == "xmlns"))
            .map(|s| (s.start, s.end))
            .collect();

        let mut names = Vec::new();
        for span in &scan.spans {
            let in_scope = scoped
                .iter()
                .any(|&(start, end)| span.start >= start && span.start < end);
            if in_scope || span.qname.contains(':') {
                continue;
            }
            names.push(span.start + 1);
            if !span.empty {
                let end_tag = self
                    .0
                    .get(span.start..span.end)
                    .and_then(|s| s.rfind("</"))
                    .ok_or_else(|| no_end_tag(&span.qname))?;
                names.push(span.start + end_tag + 2);
            }
        }
        if names.is_empty() {
            return Ok(Cow::Borrowed(&self.0));
        }
        names.sort_unstable();

        let mut out = String::with_capacity(self.0.len() + names.len() * (prefix.len() + 1));
        let mut last = 0;
        for at in names {
            let chunk = self
                .0
                .get(last..at)
                .ok_or_else(|| StyleError::Fragment(format!("bad span {last}..{at}")))?;
            out.push_str(chunk);
            out.push_str(prefix);
            out.push(':');
            last = at;
        }
        out.push_str(self.0.get(last..).unwrap_or_default());
        Ok(Cow::Owned(out))
    }

    fn splice(&mut self, start: usize, end: usize, with: &str) -> Result<()> {
        if start > end
            || end > self.0.len()
            || !self.0.is_char_boundary(start)
            || !self.0.is_char_boundary(end)
        {
            return Err(StyleError::Fragment(format!("bad span {start}..{end}")));
        }
        self.0.replace_range(start..end, with);
        Ok(())
    }
}

impl std::fmt::Display for RawFragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn missing(path: &[&str]) -> StyleError {
    StyleError::Fragment(format!("no element at {}", path.join("/")))
}

fn no_end_tag(qname: &str) -> StyleError {
    StyleError::Fragment(format!("no end tag for <{qname}>"))
}

/// Byte offset of the `<` that opens a start tag, given the offset just past its `>`.
pub(crate) fn tag_start(tag_end: usize, e: &BytesStart, empty: bool) -> Result<usize> {
    // `<` + content + `>`, plus the `/` of a self-closing tag
    let raw_len = e.len() + if empty { 3 } else { 2 };
    tag_end
        .checked_sub(raw_len)
        .ok_or_else(|| StyleError::Parse("tag offset underflow".to_string()))
}

/// Slice `xml[start..end]` into a fragment.
pub(crate) fn capture(xml: &str, start: usize, end: usize) -> Result<RawFragment> {
    xml.get(start..end)
        .map(RawFragment::from_captured)
        .ok_or_else(|| StyleError::Parse(format!("bad element span {start}..{end}")))
}

/// One element found in a fragment.
#[derive(Debug, Clone)]
pub(crate) struct TagSpan {
    pub local: String,
    pub qname: String,
    pub depth: usize,
    /// Offset of the opening `<`
    pub start: usize,
    /// Offset just past the start tag's `>`
    pub tag_end: usize,
    /// Offset just past the element's end tag
    pub end: usize,
    pub empty: bool,
    pub raw_attrs: Vec<(String, String)>,
}

impl TagSpan {
    pub fn attrs(&self) -> Result<Attrs> {
        Attrs::from_raw(&self.raw_attrs)
    }
}

/// Element spans of a fragment in document order.
#[derive(Debug)]
pub(crate) struct Scan {
    spans: Vec<TagSpan>,
}

impl Scan {
    fn new(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut spans: Vec<TagSpan> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let tag_end = reader.buffer_position();
                    let start = tag_start(tag_end, e, false)?;
                    open.push(spans.len());
                    spans.push(span_for(e, open.len() - 1, start, tag_end, false)?);
                }
                Event::Empty(ref e) => {
                    let tag_end = reader.buffer_position();
                    let start = tag_start(tag_end, e, true)?;
                    spans.push(span_for(e, open.len(), start, tag_end, true)?);
                }
                Event::End(_) => {
                    let idx = open
                        .pop()
                        .ok_or_else(|| StyleError::Fragment("unbalanced end tag".to_string()))?;
                    if let Some(span) = spans.get_mut(idx) {
                        span.end = reader.buffer_position();
                    }
                }
                Event::Text(ref t) if open.is_empty() => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(StyleError::Fragment(
                            "text outside the root element".to_string(),
                        ));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !open.is_empty() {
            return Err(StyleError::Fragment("unclosed element".to_string()));
        }
        Ok(Self { spans })
    }

    pub fn root(&self) -> Option<&TagSpan> {
        self.spans.first()
    }

    /// Direct children of `parent`.
    pub fn children<'a>(&'a self, parent: &'a TagSpan) -> impl Iterator<Item = &'a TagSpan> + 'a {
        self.spans.iter().filter(move |s| {
            s.depth == parent.depth + 1 && s.start >= parent.tag_end && s.end <= parent.end
        })
    }

    /// Direct children of the root.
    pub fn root_children(&self) -> impl Iterator<Item = &TagSpan> + '_ {
        self.root()
            .into_iter()
            .flat_map(move |root| self.children(root))
    }

    /// Follow `path` (local names) down from the root.
    pub fn find(&self, path: &[&str]) -> Option<&TagSpan> {
        let mut current = self.root()?;
        for name in path {
            current = self.children(current).find(|c| c.local == *name)?;
        }
        Some(current)
    }
}

fn span_for(
    e: &BytesStart,
    depth: usize,
    start: usize,
    tag_end: usize,
    empty: bool,
) -> Result<TagSpan> {
    Ok(TagSpan {
        local: local_name_string(e),
        qname: std::str::from_utf8(e.name().as_ref())?.to_string(),
        depth,
        start,
        tag_end,
        end: tag_end,
        empty,
        raw_attrs: raw_attrs(e)?,
    })
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

    const FONT: &str = r#"<font><b/><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#;

    #[test]
    fn test_new_rejects_bad_markup() {
        assert!(RawFragment::new("<font><b/>").is_err());
        assert!(RawFragment::new("<a/><b/>").is_err());
        assert!(RawFragment::new("text<a/>").is_err());
        assert!(RawFragment::new("").is_err());
        assert!(RawFragment::new("<a></b>").is_err());
    }

    #[test]
    fn test_new_trims_whitespace() {
        let frag = RawFragment::new("\n  <a x=\"1\"/>\n").unwrap();
        assert_eq!(frag.as_str(), "<a x=\"1\"/>");
    }

    #[test]
    fn test_child_attr() {
        let frag = RawFragment::new(FONT).unwrap();
        assert_eq!(frag.child_attr(&["sz"], "val").unwrap().as_deref(), Some("11"));
        assert_eq!(frag.child_attr(&["name"], "val").unwrap().as_deref(), Some("Calibri"));
        assert_eq!(frag.child_attr(&["i"], "val").unwrap(), None);
        assert!(frag.has_child(&["b"]).unwrap());
        assert_eq!(frag.root_name().unwrap(), "font");
    }

    #[test]
    fn test_nested_path() {
        let frag = RawFragment::new(
            r#"<fill><patternFill patternType="solid"><fgColor rgb="FFFF0000"/><bgColor indexed="64"/></patternFill></fill>"#,
        )
        .unwrap();
        assert_eq!(
            frag.child_attr(&["patternFill", "fgColor"], "rgb").unwrap().as_deref(),
            Some("FFFF0000")
        );
        assert_eq!(frag.child_attr(&["fgColor"], "rgb").unwrap(), None);
    }

    #[test]
    fn test_set_attr_touches_only_target() {
        let mut frag = RawFragment::new(
            r#"<font><sz val="11" x:odd='a"b'/><name val="Calibri"/></font>"#,
        )
        .unwrap();
        frag.set_attr(&["sz"], "val", "14").unwrap();
        assert_eq!(
            frag.as_str(),
            r#"<font><sz val="14" x:odd="a&quot;b"/><name val="Calibri"/></font>"#
        );
    }

    #[test]
    fn test_set_attr_appends_new_attribute() {
        let mut frag =
            RawFragment::new(r#"<patternFill><fgColor rgb="FF000000"/></patternFill>"#).unwrap();
        frag.set_attr(&[], "patternType", "solid").unwrap();
        assert_eq!(
            frag.as_str(),
            r#"<patternFill patternType="solid"><fgColor rgb="FF000000"/></patternFill>"#
        );
    }

    #[test]
    fn test_insert_child_before() {
        let mut frag = RawFragment::new(FONT).unwrap();
        frag.insert_child(&[], "<i/>", &["sz", "color", "name"]).unwrap();
        assert!(frag.as_str().starts_with("<font><b/><i/><sz"));
    }

    #[test]
    fn test_insert_child_appends_and_expands() {
        let mut frag = RawFragment::new("<font><sz val=\"9\"/></font>").unwrap();
        frag.insert_child(&[], "<name val=\"Arial\"/>", &[]).unwrap();
        assert_eq!(frag.as_str(), "<font><sz val=\"9\"/><name val=\"Arial\"/></font>");

        let mut frag = RawFragment::new("<font />").unwrap();
        frag.insert_child(&[], "<b/>", &[]).unwrap();
        assert_eq!(frag.as_str(), "<font><b/></font>");
    }

    #[test]
    fn test_remove_and_replace_child() {
        let mut frag = RawFragment::new(FONT).unwrap();
        assert!(frag.remove_child(&["b"]).unwrap());
        assert!(!frag.remove_child(&["b"]).unwrap());
        frag.replace_child(&["color"], "<color rgb=\"FF00FF00\"/>").unwrap();
        assert_eq!(
            frag.as_str(),
            r#"<font><sz val="11"/><color rgb="FF00FF00"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#
        );
        assert!(frag.remove_child(&[]).is_err());
    }

    #[test]
    fn test_child_fragment_and_names() {
        let frag = RawFragment::new(
            r#"<dxf><font><b/></font><fill><patternFill><bgColor rgb="FFFFC7CE"/></patternFill></fill></dxf>"#,
        )
        .unwrap();
        assert_eq!(frag.child_names().unwrap(), vec!["font", "fill"]);
        assert_eq!(
            frag.child_fragment(&["font"]).unwrap().unwrap().as_str(),
            "<font><b/></font>"
        );
        assert!(frag.child_fragment(&["border"]).unwrap().is_none());
    }

    #[test]
    fn test_prefixed_names() {
        let frag = RawFragment::new(
            r#"<ext uri="{X}" xmlns:x14="urn:x14"><x14:slicerStyles defaultSlicerStyle="S"/></ext>"#,
        )
        .unwrap();
        assert_eq!(
            frag.child_attr(&["slicerStyles"], "defaultSlicerStyle").unwrap().as_deref(),
            Some("S")
        );
    }

    #[test]
    fn test_with_prefix() {
        let frag =
            RawFragment::new(r#"<font><b/><sz val="11"/><x:name val="Arial"/></font>"#).unwrap();
        assert_eq!(
            frag.with_prefix("x").unwrap(),
            r#"<x:font><x:b/><x:sz val="11"/><x:name val="Arial"/></x:font>"#
        );

        let scoped = RawFragment::new(
            r#"<x:dxf><x:font><b/></x:font><extLst xmlns="urn:ext"><ext/></extLst></x:dxf>"#,
        )
        .unwrap();
        assert_eq!(
            scoped.with_prefix("x").unwrap(),
            r#"<x:dxf><x:font><x:b/></x:font><extLst xmlns="urn:ext"><ext/></extLst></x:dxf>"#
        );

        let done = RawFragment::new("<x:fill><x:patternFill/></x:fill>").unwrap();
        assert!(matches!(done.with_prefix("x").unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_serializes_as_string() {
        let frag = RawFragment::new("<b/>").unwrap();
        assert_eq!(serde_json::to_string(&frag).unwrap(), "\"<b/>\"");
    }
}
