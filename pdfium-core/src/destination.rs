//! Link and bookmark destinations
//!
//! A destination names a target page inside the current document.

use serde::Serialize;

/// A resolved destination in the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PdfDestination {
    page_index: Option<usize>,
}

impl PdfDestination {
    /// Build from the engine's raw page index; negative means unresolved.
    pub(crate) fn from_raw_index(index: i32) -> Self {
        Self {
            page_index: usize::try_from(index).ok(),
        }
    }

    /// The target page index (0-based).
    ///
    /// `None` when the engine could not resolve the destination to a page.
    pub fn page_index(&self) -> Option<usize> {
        self.page_index
    }
}
