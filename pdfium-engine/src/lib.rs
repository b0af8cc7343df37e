//! # pdfium-engine
//!
//! The boundary contract between a host application and a PDFium-style
//! native document engine.
//!
//! The native engine parses, lays out, and rasterizes documents, but it is
//! not safe for concurrent entry and hands out bare pointer identities. This
//! crate pins down that boundary in the type system:
//!
//! - [`PdfiumEngine`]: one trait method per engine operation. Every method
//!   takes `&mut self`: exclusive access is part of the contract, and the
//!   safe layer above hands it out from behind a single lock.
//! - Opaque handle newtypes ([`DocumentHandle`], [`PageHandle`], and friends)
//!   whose bits are meaningful only to the engine that issued them.
//! - Render targets ([`PageSurface`], [`PixelBuffer`]) the engine blits into
//!   without knowing anything about the host's presentation stack.
//!
//! Implementations of [`PdfiumEngine`] wrap the actual native library; test
//! suites substitute instrumented fakes. Callers stay independent of the FFI
//! surface either way.

mod engine;
mod handle;
mod surface;

pub use engine::{EngineError, PdfiumEngine};
pub use handle::{
    ActionHandle, BookmarkHandle, DestinationHandle, DocumentHandle, LinkHandle, PageHandle,
};
pub use surface::{PageSurface, PixelBuffer, BYTES_PER_PIXEL};
