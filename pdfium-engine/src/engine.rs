//! The engine call surface
//!
//! One trait method per native entry point. The engine has no internal
//! concurrency guarantees, so every method takes `&mut self`; the layer
//! above funnels all calls through a single lock and hands the exclusive
//! reference down from the guard.

use crate::handle::{
    ActionHandle, BookmarkHandle, DestinationHandle, DocumentHandle, LinkHandle, PageHandle,
};
use crate::surface::{PageSurface, PixelBuffer};
use std::os::fd::RawFd;
use thiserror::Error;

/// Failure codes reported by the engine.
///
/// Mirrors the engine's last-error convention (0 = success, then one code
/// per failure class).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Unknown engine failure.
    #[error("unknown engine error")]
    Unknown,
    /// The source file could not be opened or read.
    #[error("file access error")]
    BadFile,
    /// The data is not a well-formed document.
    #[error("data is corrupt or not a supported document format")]
    BadFormat,
    /// A password is required, or the supplied password is wrong.
    #[error("password required or incorrect password")]
    Password,
    /// The document uses an unsupported security scheme.
    #[error("unsupported security scheme")]
    Security,
    /// The requested page does not exist or could not be loaded.
    #[error("page not found or content error")]
    PageNotFound,
}

impl EngineError {
    /// Map a raw engine error code to a variant.
    ///
    /// Code `0` means success and has no variant; it maps to `Unknown` here
    /// because an engine that failed while reporting success is lying.
    pub fn from_code(code: u32) -> Self {
        match code {
            2 => EngineError::BadFile,
            3 => EngineError::BadFormat,
            4 => EngineError::Password,
            5 => EngineError::Security,
            6 => EngineError::PageNotFound,
            _ => EngineError::Unknown,
        }
    }
}

/// The operations a native document engine must provide.
///
/// Handles returned from one method are opaque tokens accepted by the
/// others; their raw values carry no meaning outside the engine. Documents
/// own their pages: a [`PageHandle`] becomes invalid once its document is
/// closed. `close_page` and `close_document` must tolerate handles that are
/// already invalid (they are best-effort teardown calls).
///
/// `Send` is required so the serialization layer can own a boxed engine
/// behind a process-wide lock.
pub trait PdfiumEngine: Send {
    /// Open a document from an OS file descriptor.
    ///
    /// The engine reads through the descriptor but does not take ownership
    /// of it; the caller keeps it alive until the document is closed.
    fn open_document(
        &mut self,
        fd: RawFd,
        password: Option<&str>,
    ) -> Result<DocumentHandle, EngineError>;

    /// Open a document from an in-memory buffer.
    ///
    /// The engine copies or finishes with the buffer before returning.
    fn open_buffer_document(
        &mut self,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<DocumentHandle, EngineError>;

    /// Close a document and release all engine-side state for it.
    fn close_document(&mut self, doc: DocumentHandle);

    /// Number of pages in the document.
    fn page_count(&mut self, doc: DocumentHandle) -> usize;

    /// Load a single page.
    fn load_page(
        &mut self,
        doc: DocumentHandle,
        index: usize,
    ) -> Result<PageHandle, EngineError>;

    /// Load the pages `from..=to` in one call.
    ///
    /// The returned handles start at `from`. Engines are allowed to return
    /// more handles than the range asked for; callers must dispose of the
    /// surplus.
    fn load_page_range(
        &mut self,
        doc: DocumentHandle,
        from: usize,
        to: usize,
    ) -> Result<Vec<PageHandle>, EngineError>;

    /// Close a loaded page. Silently ignores invalid handles.
    fn close_page(&mut self, page: PageHandle);

    /// Close several loaded pages.
    ///
    /// Equivalent to closing each handle in order; engines with a cheaper
    /// batch teardown may override it.
    fn close_pages(&mut self, pages: Vec<PageHandle>) {
        for page in pages {
            self.close_page(page);
        }
    }

    /// Page width in device pixels at the given DPI.
    fn page_width_pixels(&mut self, page: PageHandle, dpi: u32) -> i32;

    /// Page height in device pixels at the given DPI.
    fn page_height_pixels(&mut self, page: PageHandle, dpi: u32) -> i32;

    /// Page width in PDF points (1/72 inch).
    fn page_width_points(&mut self, page: PageHandle) -> i32;

    /// Page height in PDF points (1/72 inch).
    fn page_height_points(&mut self, page: PageHandle) -> i32;

    /// Rasterize a page region into a host surface.
    ///
    /// `(start_x, start_y)` is the draw origin on the surface and
    /// `(width, height)` the draw extent, both in device pixels.
    #[allow(clippy::too_many_arguments)]
    fn render_page(
        &mut self,
        page: PageHandle,
        surface: &mut dyn PageSurface,
        dpi: u32,
        start_x: i32,
        start_y: i32,
        width: i32,
        height: i32,
        render_annotations: bool,
    ) -> Result<(), EngineError>;

    /// Rasterize a page region into an owned pixel buffer.
    #[allow(clippy::too_many_arguments)]
    fn render_page_bitmap(
        &mut self,
        page: PageHandle,
        buffer: &mut PixelBuffer,
        dpi: u32,
        start_x: i32,
        start_y: i32,
        width: i32,
        height: i32,
        render_annotations: bool,
    ) -> Result<(), EngineError>;

    /// Look up a well-known metadata tag (e.g. `"Title"`, `"Author"`).
    ///
    /// Returns `None` when the document does not carry the tag.
    fn meta_text(&mut self, doc: DocumentHandle, tag: &str) -> Option<String>;

    /// First child of a bookmark, or the first top-level bookmark when
    /// `parent` is `None`.
    fn first_child_bookmark(
        &mut self,
        doc: DocumentHandle,
        parent: Option<BookmarkHandle>,
    ) -> Option<BookmarkHandle>;

    /// Next sibling of a bookmark, if any.
    fn next_sibling_bookmark(
        &mut self,
        doc: DocumentHandle,
        bookmark: BookmarkHandle,
    ) -> Option<BookmarkHandle>;

    /// Display title of a bookmark.
    fn bookmark_title(&mut self, bookmark: BookmarkHandle) -> String;

    /// Target page index of a bookmark; negative when unresolved.
    fn bookmark_target_page(&mut self, doc: DocumentHandle, bookmark: BookmarkHandle) -> i64;

    /// Link annotation at a point in page coordinates, if any.
    fn link_at_point(&mut self, page: PageHandle, x: f64, y: f64) -> Option<LinkHandle>;

    /// Destination of a link, if the link carries one.
    fn link_destination(
        &mut self,
        doc: DocumentHandle,
        link: LinkHandle,
    ) -> Option<DestinationHandle>;

    /// Target page index of a destination; negative when unresolved.
    fn destination_page_index(&mut self, doc: DocumentHandle, dest: DestinationHandle) -> i32;

    /// Action of a link, if the link carries one.
    fn link_action(&mut self, link: LinkHandle) -> Option<ActionHandle>;

    /// Raw action type tag (0 = unsupported, 1 = goto, 2 = remote goto,
    /// 3 = URI, 4 = launch).
    fn action_kind(&mut self, action: ActionHandle) -> u32;

    /// Raw byte payload of a URI action.
    ///
    /// Empty when the action carries no URI. Decoding is the caller's job.
    fn action_uri_bytes(&mut self, doc: DocumentHandle, action: ActionHandle) -> Vec<u8>;

    /// Convert a device point to page coordinates.
    ///
    /// `(start_x, start_y, width, height)` describe the viewport the page is
    /// displayed in, `rotation` is the quarter-turn count (0..=3), and
    /// `(device_x, device_y)` the point to convert.
    #[allow(clippy::too_many_arguments)]
    fn device_to_page(
        &mut self,
        page: PageHandle,
        start_x: i32,
        start_y: i32,
        width: i32,
        height: i32,
        rotation: i32,
        device_x: i32,
        device_y: i32,
    ) -> (f64, f64);
}
