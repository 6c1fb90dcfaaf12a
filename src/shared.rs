//! A stylesheet shared between threads.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::StyleSheet;
use crate::error::Result;
use crate::options::WriteOptions;
use crate::types::{ResolvedStyle, StyleDescriptor};

/// Cloneable handle to one document behind a `parking_lot` `RwLock`.
///
/// Interning holds the write lock for the whole find-or-append, so two
/// threads interning the same descriptor get the same index. Resolution and
/// saving share the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedStyleSheet {
    inner: Arc<RwLock<StyleSheet>>,
}

impl SharedStyleSheet {
    pub fn new(sheet: StyleSheet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(sheet)),
        }
    }

    pub fn intern(&self, descriptor: &StyleDescriptor) -> Result<u32> {
        self.inner.write().intern(descriptor)
    }

    pub fn resolve(&self, index: u32) -> Result<ResolvedStyle> {
        self.inner.read().resolve(index)
    }

    pub fn save(&self, options: &WriteOptions) -> Result<Vec<u8>> {
        self.inner.read().save_with(options)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, StyleSheet> {
        self.inner.read()
    }

    /// Exclusive access for edits spanning several calls.
    pub fn write(&self) -> RwLockWriteGuard<'_, StyleSheet> {
        self.inner.write()
    }
}

impl From<StyleSheet> for SharedStyleSheet {
    fn from(sheet: StyleSheet) -> Self {
        Self::new(sheet)
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
    use crate::types::FontSpec;
    use std::thread;

    #[test]
    fn test_concurrent_intern_agrees() {
        let shared = SharedStyleSheet::from(StyleSheet::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let size = if i % 2 == 0 { 12.0 } else { 14.0 };
                    let desc = StyleDescriptor::new().font(FontSpec::new("Arial", size));
                    shared.intern(&desc).unwrap()
                })
            })
            .collect();
        let mut ids: Vec<u32> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids, vec![1, 2]);

        let sheet = shared.read();
        assert_eq!(sheet.cell_xfs().len(), 3);
        assert_eq!(sheet.fonts().len(), 3);
    }

    #[test]
    fn test_resolve_and_save_through_handle() {
        let shared = SharedStyleSheet::default();
        assert_eq!(
            shared.resolve(0).unwrap().style_name.as_deref(),
            Some("Normal")
        );
        let bytes = shared.save(&WriteOptions::default()).unwrap();
        assert!(bytes.ends_with(b"</styleSheet>"));
        shared.write().add_named_style("Title", &StyleDescriptor::new()).unwrap();
        assert!(shared.read().named_style("Title").is_some());
    }
}
