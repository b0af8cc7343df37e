//! Main entry point
//!
//! [`Pdfium`] takes ownership of an engine implementation and hands out
//! [`PdfDocument`] values. All documents opened through one `Pdfium` (or a
//! clone of it) share one gateway, so their engine calls are serialized
//! against each other.

use crate::document::PdfDocument;
use crate::error::{PdfiumError, Result};
use crate::gateway::EngineGateway;
use pdfium_engine::{EngineError, PdfiumEngine};
use std::os::fd::{AsRawFd, OwnedFd};
use std::sync::Arc;

/// Entry point for driving a document engine.
///
/// # Example
///
/// ```no_run
/// use pdfium_core::Pdfium;
/// # fn engine() -> Box<dyn pdfium_engine::PdfiumEngine> { unimplemented!() }
/// # fn descriptor() -> std::os::fd::OwnedFd { unimplemented!() }
///
/// let pdfium = Pdfium::new(engine());
/// let mut doc = pdfium.open_document(descriptor(), None)?;
/// doc.open_page(0)?;
/// println!("{} x {}", doc.page_width(0, 72), doc.page_height(0, 72));
/// # Ok::<(), pdfium_core::PdfiumError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Pdfium {
    gateway: Arc<EngineGateway>,
}

impl Pdfium {
    /// Take ownership of an engine.
    ///
    /// The engine is moved behind the gateway lock; from here on every call
    /// into it is serialized.
    pub fn new(engine: Box<dyn PdfiumEngine>) -> Self {
        Self {
            gateway: Arc::new(EngineGateway::new(engine)),
        }
    }

    /// Open a document from an owned file descriptor.
    ///
    /// The descriptor stays owned by the returned document and is released
    /// only after the engine has closed the document. How the descriptor is
    /// acquired from the OS is the caller's business.
    pub fn open_document(&self, fd: OwnedFd, password: Option<&str>) -> Result<PdfDocument> {
        let handle = self
            .gateway
            .lock()
            .open_document(fd.as_raw_fd(), password)
            .map_err(open_error)?;
        Ok(PdfDocument::new(Arc::clone(&self.gateway), handle, Some(fd)))
    }

    /// Open a document from an in-memory buffer.
    ///
    /// No descriptor is involved; the engine finishes with `bytes` before
    /// this returns.
    pub fn open_document_from_bytes(
        &self,
        bytes: &[u8],
        password: Option<&str>,
    ) -> Result<PdfDocument> {
        let handle = self
            .gateway
            .lock()
            .open_buffer_document(bytes, password)
            .map_err(open_error)?;
        Ok(PdfDocument::new(Arc::clone(&self.gateway), handle, None))
    }
}

/// Map an engine-side open failure to the caller-facing taxonomy.
fn open_error(err: EngineError) -> PdfiumError {
    match err {
        EngineError::Password => PdfiumError::InvalidPassword,
        EngineError::Security => PdfiumError::UnsupportedSecurity,
        EngineError::BadFile => PdfiumError::UnreadableSource,
        EngineError::BadFormat | EngineError::PageNotFound | EngineError::Unknown => {
            PdfiumError::OpenFailed {
                reason: err.to_string(),
            }
        }
    }
}
