//! Style interning: find-or-create the catalog entries for a requested
//! format and return its cell format index.
//!
//! Components are matched structurally and the lowest matching index wins,
//! so interning the same descriptor any number of times adds at most one
//! record per distinct component.

use log::{debug, trace, warn};

use crate::border::{normalized, Border};
use crate::document::StyleSheet;
use crate::dxf::Dxf;
use crate::error::{Result, StyleError};
use crate::fill::Fill;
use crate::font::Font;
use crate::numfmt;
use crate::types::{
    ApplyFlags, BorderSpec, CellXf, FillSpec, FontSpec, NumFmt, StyleDescriptor,
};

/// Component ids of a format record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ComponentIds {
    pub num_fmt: u32,
    pub font: u32,
    pub fill: u32,
    pub border: u32,
}

impl StyleSheet {
    /// Cell format index for `descriptor`, appending catalog entries only
    /// when no identical entry exists.
    ///
    /// The default descriptor is always index 0. Components the descriptor
    /// leaves out are taken from its parent style (Normal unless
    /// `parent_style` names another).
    pub fn intern(&mut self, descriptor: &StyleDescriptor) -> Result<u32> {
        self.ensure_defaults()?;
        if descriptor.is_default() {
            return Ok(0);
        }

        let parent_id = match &descriptor.parent_style {
            Some(name) => {
                self.named_style(name)
                    .ok_or_else(|| StyleError::UnknownStyle(name.clone()))?
                    .xf_id
            }
            None => self.normal_master(),
        };
        let parent = self.cell_style_xfs.get(parent_id)?.clone();
        let ids = self.intern_components(descriptor, &parent)?;

        let xf = CellXf {
            num_fmt_id: Some(ids.num_fmt),
            font_id: Some(ids.font),
            fill_id: Some(ids.fill),
            border_id: Some(ids.border),
            xf_id: Some(parent_id),
            apply: ApplyFlags::all(),
            alignment: descriptor
                .alignment
                .clone()
                .or_else(|| parent.alignment.clone()),
            protection: descriptor
                .protection
                .clone()
                .or_else(|| parent.protection.clone()),
            ..CellXf::default()
        };

        if let Some(index) = self.cell_xfs.position(|existing| *existing == xf) {
            trace!("cellXfs hit at {index}");
            return Ok(index);
        }
        let index = self.cell_xfs.push(xf)?;
        debug!("appended cellXfs entry {index}");
        Ok(index)
    }

    /// Index into `dxfs` of an entry with exactly this markup.
    pub fn intern_dxf(&mut self, dxf: &Dxf) -> Result<u32> {
        if let Some(index) = self.dxfs.position(|d| d.as_str() == dxf.as_str()) {
            trace!("dxfs hit at {index}");
            return Ok(index);
        }
        let index = self.dxfs.push(dxf.clone())?;
        debug!("appended dxfs entry {index}");
        Ok(index)
    }

    /// Number format id for `code`: the catalog entry with this code, or a
    /// newly allocated custom id. Built-in codes are stored as custom entries
    /// too; use [`StyleSheet::num_fmt_id_for`] or `num_fmt_id` to reuse a
    /// built-in.
    ///
    /// Custom formats that share an id with an earlier entry are first moved
    /// to fresh ids. Their old id always resolved to the earlier entry, so no
    /// record changes meaning.
    pub fn intern_num_fmt(&mut self, code: &str) -> Result<u32> {
        self.reassign_shadowed_num_fmts()?;
        if let Some(id) = numfmt::custom_id_for_code(&self.num_fmts, code) {
            trace!("numFmt {code:?} is id {id}");
            return Ok(id);
        }
        let id = numfmt::next_custom_id(&self.num_fmts)?;
        self.num_fmts.push(NumFmt {
            id,
            format_code: code.to_string(),
        })?;
        debug!("allocated numFmt id {id} for {code:?}");
        Ok(id)
    }

    fn reassign_shadowed_num_fmts(&mut self) -> Result<()> {
        for index in numfmt::shadowed_entries(&self.num_fmts) {
            let id = numfmt::next_custom_id(&self.num_fmts)?;
            let fmt = self.num_fmts.get_mut(index)?;
            warn!("numFmt id {} is defined twice, moving {:?} to {id}", fmt.id, fmt.format_code);
            fmt.id = id;
        }
        Ok(())
    }

    /// Id that already displays `code`, built-ins included. Read-only.
    pub fn num_fmt_id_for(&self, code: &str) -> Option<u32> {
        numfmt::find_id(&self.num_fmts, code)
    }

    pub fn intern_font(&mut self, spec: &FontSpec) -> Result<u32> {
        if let Some(index) = self.fonts.position(|f| f.spec().as_ref() == Some(spec)) {
            trace!("fonts hit at {index}");
            return Ok(index);
        }
        let index = self.fonts.push(Font::from_spec(spec))?;
        debug!("appended fonts entry {index}");
        Ok(index)
    }

    pub fn intern_fill(&mut self, spec: &FillSpec) -> Result<u32> {
        if let Some(index) = self.fills.position(|f| f.spec().as_ref() == Some(spec)) {
            trace!("fills hit at {index}");
            return Ok(index);
        }
        let index = self.fills.push(Fill::from_spec(spec))?;
        debug!("appended fills entry {index}");
        Ok(index)
    }

    pub fn intern_border(&mut self, spec: &BorderSpec) -> Result<u32> {
        let wanted = normalized(spec);
        if let Some(index) = self.borders.position(|b| b.spec() == Some(&wanted)) {
            trace!("borders hit at {index}");
            return Ok(index);
        }
        let index = self.borders.push(Border::from_spec(&wanted))?;
        debug!("appended borders entry {index}");
        Ok(index)
    }

    /// Intern every component the descriptor names; the rest come from `base`.
    pub(crate) fn intern_components(
        &mut self,
        descriptor: &StyleDescriptor,
        base: &CellXf,
    ) -> Result<ComponentIds> {
        let num_fmt = match (&descriptor.num_fmt, descriptor.num_fmt_id) {
            (Some(code), _) => self.intern_num_fmt(code)?,
            (None, Some(id)) => {
                numfmt::format_code(&self.num_fmts, id)?;
                id
            }
            (None, None) => base.num_fmt(),
        };
        let font = match &descriptor.font {
            Some(spec) => self.intern_font(spec)?,
            None => base.font(),
        };
        let fill = match &descriptor.fill {
            Some(spec) => self.intern_fill(spec)?,
            None => base.fill(),
        };
        let border = match &descriptor.border {
            Some(spec) => self.intern_border(spec)?,
            None => base.border(),
        };
        Ok(ComponentIds {
            num_fmt,
            font,
            fill,
            border,
        })
    }

    /// Master record of the Normal style, or 0.
    fn normal_master(&self) -> u32 {
        self.cell_styles
            .iter()
            .find(|s| s.builtin_id == Some(0))
            .map_or(0, |s| s.xf_id)
    }
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
    use crate::types::{Alignment, BorderLine, BorderStyle, Color, HAlign};

    #[test]
    fn test_default_descriptor_is_zero() {
        let mut sheet = StyleSheet::new();
        assert_eq!(sheet.intern(&StyleDescriptor::new()).unwrap(), 0);
        assert_eq!(sheet.cell_xfs().len(), 1);
    }

    #[test]
    fn test_default_descriptor_backfills_empty_document() {
        let mut sheet = StyleSheet::empty();
        assert_eq!(sheet.intern(&StyleDescriptor::new()).unwrap(), 0);
        assert_eq!(sheet.cell_xfs().len(), 1);
        assert_eq!(sheet.fills().len(), 2);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut sheet = StyleSheet::new();
        let desc = StyleDescriptor::new()
            .font(FontSpec::new("Calibri", 12.0).bold())
            .num_fmt("0.00%");
        let a = sheet.intern(&desc).unwrap();
        let sizes = (sheet.fonts().len(), sheet.cell_xfs().len(), sheet.num_fmts().len());
        let b = sheet.intern(&desc).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, 1);
        assert_eq!(
            sizes,
            (sheet.fonts().len(), sheet.cell_xfs().len(), sheet.num_fmts().len())
        );
        assert_eq!(sheet.num_fmts().len(), 1);
        assert_eq!(sheet.cell_xfs().get(1).unwrap().num_fmt_id, Some(164));
    }

    #[test]
    fn test_default_components_reuse_index_zero() {
        let mut sheet = StyleSheet::new();
        let desc = StyleDescriptor::new()
            .fill(FillSpec::none())
            .border(BorderSpec::none())
            .alignment(Alignment::horizontal(HAlign::Right));
        let index = sheet.intern(&desc).unwrap();
        let xf = sheet.cell_xfs().get(index).unwrap();
        assert_eq!((xf.fill(), xf.border()), (0, 0));
        assert_eq!(sheet.fills().len(), 2);
        assert_eq!(sheet.borders().len(), 1);
    }

    #[test]
    fn test_distinct_components_append() {
        let mut sheet = StyleSheet::new();
        let red = StyleDescriptor::new().fill(FillSpec::solid(Color::rgb("FF0000")));
        let blue = StyleDescriptor::new().fill(FillSpec::solid(Color::rgb("0000FF")));
        let boxed = StyleDescriptor::new().border(BorderSpec::all(BorderStyle::Thin, None));
        assert_eq!(sheet.intern(&red).unwrap(), 1);
        assert_eq!(sheet.intern(&blue).unwrap(), 2);
        assert_eq!(sheet.intern(&boxed).unwrap(), 3);
        assert_eq!(sheet.intern(&red).unwrap(), 1);
        assert_eq!(sheet.fills().len(), 4);
        assert_eq!(sheet.borders().len(), 2);
    }

    #[test]
    fn test_border_with_empty_edges_matches_normalized() {
        let mut sheet = StyleSheet::new();
        let with_empty = BorderSpec {
            top: Some(BorderLine::default()),
            bottom: Some(BorderLine::new(BorderStyle::Double, None)),
            ..BorderSpec::none()
        };
        let plain = BorderSpec {
            bottom: Some(BorderLine::new(BorderStyle::Double, None)),
            ..BorderSpec::none()
        };
        assert_eq!(
            sheet.intern_border(&with_empty).unwrap(),
            sheet.intern_border(&plain).unwrap()
        );
    }

    #[test]
    fn test_custom_ids_are_monotonic() {
        let mut sheet = StyleSheet::new();
        let ids: Vec<u32> = ["0.000", "#,##0.0", "yyyy-mm-dd", "0.0%"]
            .iter()
            .map(|code| sheet.intern_num_fmt(code).unwrap())
            .collect();
        assert_eq!(ids, vec![164, 165, 166, 167]);
        assert_eq!(sheet.intern_num_fmt("#,##0.0").unwrap(), 165);
    }

    #[test]
    fn test_shadowed_num_fmt_gets_fresh_id() {
        let mut sheet = StyleSheet::new();
        for (id, code) in [(164, "0.0"), (164, "0.000")] {
            sheet
                .num_fmts
                .push(NumFmt {
                    id,
                    format_code: code.to_string(),
                })
                .unwrap();
        }
        assert_eq!(sheet.intern_num_fmt("0.0").unwrap(), 164);
        assert_eq!(sheet.num_fmts().get(1).unwrap().id, 165);
        assert_eq!(sheet.intern_num_fmt("0.000").unwrap(), 165);
        assert_eq!(sheet.num_fmts().len(), 2);
        sheet.validate().unwrap();
    }

    #[test]
    fn test_builtin_num_fmt_by_id() {
        let mut sheet = StyleSheet::new();
        let id = sheet.num_fmt_id_for("0.00%").unwrap();
        assert_eq!(id, 10);
        let index = sheet
            .intern(&StyleDescriptor::new().num_fmt_id(id))
            .unwrap();
        assert_eq!(sheet.cell_xfs().get(index).unwrap().num_fmt_id, Some(10));
        assert!(sheet.num_fmts().is_empty());
        assert!(matches!(
            sheet.intern(&StyleDescriptor::new().num_fmt_id(500)),
            Err(StyleError::UnknownNumFmt(500))
        ));
    }

    #[test]
    fn test_unknown_parent_style() {
        let mut sheet = StyleSheet::new();
        let err = sheet
            .intern(&StyleDescriptor::new().parent_style("Nope"))
            .unwrap_err();
        assert!(matches!(err, StyleError::UnknownStyle(name) if name == "Nope"));
    }

    #[test]
    fn test_intern_dxf() {
        let mut sheet = StyleSheet::new();
        let dxf = Dxf::new("<dxf><font><b/></font></dxf>").unwrap();
        assert_eq!(sheet.intern_dxf(&dxf).unwrap(), 0);
        assert_eq!(sheet.intern_dxf(&dxf).unwrap(), 0);
        let other = Dxf::new("<dxf><font><i/></font></dxf>").unwrap();
        assert_eq!(sheet.intern_dxf(&other).unwrap(), 1);
    }
}
