//! Per-document page handle table
//!
//! Maps a stable page index to the engine's page handle. The table owns the
//! handle from the moment a page is opened until the page is replaced or the
//! document is torn down; handles never escape to callers.

use pdfium_engine::PageHandle;
use std::collections::BTreeMap;

/// Mapping from page index to the engine page handle.
///
/// Keys are exactly the indices that were explicitly opened and not yet
/// closed. Pages are document-scoped: a handle lives in at most one table.
#[derive(Debug, Default)]
pub(crate) struct PageTable {
    entries: BTreeMap<usize, PageHandle>,
}

impl PageTable {
    /// Record a freshly loaded page, returning the handle previously stored
    /// at this index (which the caller must close).
    pub fn insert(&mut self, index: usize, handle: PageHandle) -> Option<PageHandle> {
        self.entries.insert(index, handle)
    }

    /// Handle for an opened index, if any.
    pub fn get(&self, index: usize) -> Option<PageHandle> {
        self.entries.get(&index).copied()
    }

    /// Whether the index has been opened.
    pub fn contains(&self, index: usize) -> bool {
        self.entries.contains_key(&index)
    }

    /// Number of currently open pages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove and yield every entry in ascending index order.
    ///
    /// Used during document teardown; the table is empty afterwards.
    pub fn drain_ascending(&mut self) -> impl Iterator<Item = (usize, PageHandle)> {
        std::mem::take(&mut self.entries).into_iter()
    }
}
