//! # pdfium-core
//!
//! A safe handle-lifecycle and call-serialization layer over a PDFium-style
//! document engine.
//!
//! The engine behind [`pdfium_engine::PdfiumEngine`] parses and rasterizes
//! documents but is not safe for concurrent entry, hands out bare pointer
//! identities, and trusts its caller not to use a handle after release.
//! This crate is the layer that makes those contracts hold:
//!
//! - every engine call goes through one process-wide exclusive lock, owned
//!   by the gateway so it cannot be bypassed;
//! - documents own their engine handle, their source descriptor, and the
//!   table of page handles, and release all three in order on drop;
//! - pages are addressed by stable index; the engine's page handles never
//!   escape;
//! - the engine's flat bookmark and link pointer structures are resolved
//!   into owned trees and records, with traversal bounds against malformed
//!   documents.
//!
//! ## Quick start
//!
//! ```no_run
//! use pdfium_core::Pdfium;
//! # fn engine() -> Box<dyn pdfium_engine::PdfiumEngine> { unimplemented!() }
//!
//! let pdfium = Pdfium::new(engine());
//! let mut doc = pdfium.open_document_from_bytes(&std::fs::read("doc.pdf")?, None)?;
//!
//! doc.open_page_range(0, doc.page_count().saturating_sub(1))?;
//! for bookmark in doc.table_of_contents() {
//!     println!("{} -> page {:?}", bookmark.title, bookmark.page_index);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod action;
mod bookmark;
mod destination;
mod document;
mod error;
mod gateway;
mod link;
mod metadata;
mod page_table;
mod pdfium;

pub use action::{ActionType, PdfAction};
pub use bookmark::{flatten_outline, FlatBookmark, PdfBookmark};
pub use destination::PdfDestination;
pub use document::{PagePosition, PageRotation, PdfDocument};
pub use error::{PdfiumError, Result};
pub use gateway::EngineGateway;
pub use link::{LinkTarget, PdfLink};
pub use metadata::PdfMetadata;
pub use pdfium::Pdfium;

// The engine boundary types callers need to implement or mention.
pub use pdfium_engine::{PageSurface, PixelBuffer};
