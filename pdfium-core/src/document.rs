//! Open documents
//!
//! [`PdfDocument`] owns everything a document needs on this side of the
//! engine boundary: the engine's document handle, the file descriptor the
//! document was opened from (when it was opened from a file), and the table
//! of page handles opened so far. Dropping the document tears all of that
//! down in the required order: pages in ascending index order, then the
//! document handle, then the descriptor.
//!
//! Because teardown runs on drop and ownership moves into `close`, a
//! "second close" or "use after close" cannot be written at all.

use crate::bookmark::{self, PdfBookmark};
use crate::error::{PdfiumError, Result};
use crate::gateway::EngineGateway;
use crate::link::{self, PdfLink};
use crate::metadata::{self, PdfMetadata};
use crate::page_table::PageTable;
use log::{error, warn};
use pdfium_engine::{DocumentHandle, PageSurface, PixelBuffer};
use serde::Serialize;
use std::os::fd::OwnedFd;
use std::sync::Arc;

/// Page rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PageRotation {
    /// No rotation.
    #[default]
    None,
    /// 90 degrees clockwise.
    Deg90,
    /// 180 degrees.
    Deg180,
    /// 270 degrees clockwise.
    Deg270,
}

impl PageRotation {
    /// The engine's raw quarter-turn count.
    pub fn as_raw(self) -> i32 {
        match self {
            PageRotation::None => 0,
            PageRotation::Deg90 => 1,
            PageRotation::Deg180 => 2,
            PageRotation::Deg270 => 3,
        }
    }
}

/// A position in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PagePosition {
    /// X coordinate in page space.
    pub x: f64,
    /// Y coordinate in page space.
    pub y: f64,
}

/// An open document.
///
/// Obtained from [`Pdfium::open_document`](crate::Pdfium::open_document) or
/// [`Pdfium::open_document_from_bytes`](crate::Pdfium::open_document_from_bytes).
/// Pages are addressed by index; the engine's page handles never leave this
/// struct. Every method funnels through the gateway lock, so documents on
/// different threads still reach the engine one call at a time.
pub struct PdfDocument {
    gateway: Arc<EngineGateway>,
    handle: DocumentHandle,
    /// Kept alive for the engine's benefit; present only for documents
    /// opened from a file. Dropped last, after the engine lets go of it.
    fd: Option<OwnedFd>,
    pages: PageTable,
}

impl PdfDocument {
    pub(crate) fn new(
        gateway: Arc<EngineGateway>,
        handle: DocumentHandle,
        fd: Option<OwnedFd>,
    ) -> Self {
        Self {
            gateway,
            handle,
            fd,
            pages: PageTable::default(),
        }
    }

    /// Number of pages in the document. Delegates to the engine; no caching.
    pub fn page_count(&self) -> usize {
        self.gateway.lock().page_count(self.handle)
    }

    /// Load one page and track its handle under `index`.
    ///
    /// Re-opening an index that is already open closes the handle being
    /// replaced, so no page handle is ever orphaned.
    pub fn open_page(&mut self, index: usize) -> Result<()> {
        let mut engine = self.gateway.lock();
        let page = engine
            .load_page(self.handle, index)
            .map_err(|_| PdfiumError::PageLoadFailed { index })?;
        if let Some(replaced) = self.pages.insert(index, page) {
            engine.close_page(replaced);
        }
        Ok(())
    }

    /// Load pages `from..=to` in one engine call.
    ///
    /// Handles are tracked sequentially starting at `from`. Engines may
    /// return more handles than the range covers; the surplus is closed
    /// immediately. Returns the number of pages tracked.
    pub fn open_page_range(&mut self, from: usize, to: usize) -> Result<usize> {
        let mut engine = self.gateway.lock();
        let handles = engine
            .load_page_range(self.handle, from, to)
            .map_err(|_| PdfiumError::PageLoadFailed { index: from })?;

        let mut opened = 0;
        let mut surplus = Vec::new();
        for (offset, page) in handles.into_iter().enumerate() {
            let index = from + offset;
            if index > to {
                surplus.push(page);
                continue;
            }
            if let Some(replaced) = self.pages.insert(index, page) {
                engine.close_page(replaced);
            }
            opened += 1;
        }
        if !surplus.is_empty() {
            engine.close_pages(surplus);
        }
        Ok(opened)
    }

    /// Whether `index` is currently open.
    pub fn has_page(&self, index: usize) -> bool {
        self.pages.contains(index)
    }

    /// Number of currently open pages.
    pub fn open_page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page width in device pixels at `dpi`.
    ///
    /// Returns `0` for an index that was never opened. That is deliberate:
    /// geometry of an unopened page is defined as zero, not as an error.
    pub fn page_width(&self, index: usize, dpi: u32) -> i32 {
        match self.pages.get(index) {
            Some(page) => self.gateway.lock().page_width_pixels(page, dpi),
            None => 0,
        }
    }

    /// Page height in device pixels at `dpi`. Zero for an unopened index.
    pub fn page_height(&self, index: usize, dpi: u32) -> i32 {
        match self.pages.get(index) {
            Some(page) => self.gateway.lock().page_height_pixels(page, dpi),
            None => 0,
        }
    }

    /// Page width in PDF points. Zero for an unopened index.
    pub fn page_width_points(&self, index: usize) -> i32 {
        match self.pages.get(index) {
            Some(page) => self.gateway.lock().page_width_points(page),
            None => 0,
        }
    }

    /// Page height in PDF points. Zero for an unopened index.
    pub fn page_height_points(&self, index: usize) -> i32 {
        match self.pages.get(index) {
            Some(page) => self.gateway.lock().page_height_points(page),
            None => 0,
        }
    }

    /// Convert a device point to page coordinates.
    ///
    /// `(start_x, start_y, width, height)` describe the viewport the page is
    /// displayed in. Returns the zero position when the page is not open.
    #[allow(clippy::too_many_arguments)]
    pub fn device_to_page(
        &self,
        index: usize,
        start_x: i32,
        start_y: i32,
        width: i32,
        height: i32,
        rotation: PageRotation,
        device_x: i32,
        device_y: i32,
    ) -> PagePosition {
        let Some(page) = self.pages.get(index) else {
            return PagePosition::default();
        };
        let (x, y) = self.gateway.lock().device_to_page(
            page,
            start_x,
            start_y,
            width,
            height,
            rotation.as_raw(),
            device_x,
            device_y,
        );
        PagePosition { x, y }
    }

    /// Render a page region into a host surface.
    ///
    /// Never fails: an unopened index or an engine-side render failure is
    /// logged and the surface is left as it was.
    #[allow(clippy::too_many_arguments)]
    pub fn render_page(
        &self,
        index: usize,
        surface: &mut dyn PageSurface,
        dpi: u32,
        start_x: i32,
        start_y: i32,
        width: i32,
        height: i32,
        render_annotations: bool,
    ) {
        let Some(page) = self.pages.get(index) else {
            warn!("render requested for page {index} which was never opened");
            return;
        };
        if let Err(err) = self.gateway.lock().render_page(
            page,
            surface,
            dpi,
            start_x,
            start_y,
            width,
            height,
            render_annotations,
        ) {
            error!("engine failed to render page {index}: {err}");
        }
    }

    /// Render a page region into an owned pixel buffer.
    ///
    /// Same degradation contract as [`render_page`](Self::render_page).
    #[allow(clippy::too_many_arguments)]
    pub fn render_page_bitmap(
        &self,
        index: usize,
        buffer: &mut PixelBuffer,
        dpi: u32,
        start_x: i32,
        start_y: i32,
        width: i32,
        height: i32,
        render_annotations: bool,
    ) {
        let Some(page) = self.pages.get(index) else {
            warn!("bitmap render requested for page {index} which was never opened");
            return;
        };
        if let Err(err) = self.gateway.lock().render_page_bitmap(
            page,
            buffer,
            dpi,
            start_x,
            start_y,
            width,
            height,
            render_annotations,
        ) {
            error!("engine failed to render page {index} to bitmap: {err}");
        }
    }

    /// Read the well-known metadata fields.
    pub fn metadata(&self) -> PdfMetadata {
        let mut engine = self.gateway.lock();
        metadata::read_metadata(engine.as_mut(), self.handle)
    }

    /// Build the bookmark tree, in document order.
    ///
    /// Empty when the document has no outline. A malformed outline is
    /// truncated at the traversal safety bounds rather than looping.
    pub fn table_of_contents(&self) -> Vec<PdfBookmark> {
        let mut engine = self.gateway.lock();
        bookmark::build_table_of_contents(engine.as_mut(), self.handle)
    }

    /// Resolve the link annotation at `(x, y)` on the page at `index`.
    ///
    /// Returns `None` for an unopened index or when no link is hit. A hit
    /// link resolves to its destination when it has one, otherwise to its
    /// action; never to both.
    pub fn link_at_point(&self, index: usize, x: f64, y: f64) -> Option<PdfLink> {
        let page = self.pages.get(index)?;
        let mut engine = self.gateway.lock();
        link::resolve_link_at_point(engine.as_mut(), self.handle, page, x, y)
    }

    /// Close the document.
    ///
    /// Equivalent to dropping it; spelled out for call sites where the
    /// teardown should be visible. Consuming `self` is what makes a second
    /// close unrepresentable.
    pub fn close(self) {}
}

impl Drop for PdfDocument {
    fn drop(&mut self) {
        let mut engine = self.gateway.lock();
        for (_, page) in self.pages.drain_ascending() {
            engine.close_page(page);
        }
        engine.close_document(self.handle);
        // `self.fd` is dropped by the compiler after this body, i.e. after
        // the engine has let go of the document; descriptor close errors are
        // swallowed by OwnedFd.
    }
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("handle", &self.handle)
            .field("open_pages", &self.pages.len())
            .field("from_file", &self.fd.is_some())
            .finish()
    }
}
