//! Error types for pdfium-core

use thiserror::Error;

/// Result type for pdfium-core operations
pub type Result<T> = std::result::Result<T, PdfiumError>;

/// Error types for driving the document engine
#[derive(Error, Debug)]
pub enum PdfiumError {
    /// Failed to open a document for a reason other than access or password
    #[error("failed to open document: {reason}")]
    OpenFailed { reason: String },

    /// Invalid or missing password for an encrypted document
    #[error("invalid password for encrypted document")]
    InvalidPassword,

    /// The document uses a security scheme the engine does not support
    #[error("document uses an unsupported security scheme")]
    UnsupportedSecurity,

    /// The source file or buffer could not be read
    #[error("source could not be read")]
    UnreadableSource,

    /// Failed to load a page that should exist
    #[error("failed to load page {index}")]
    PageLoadFailed { index: usize },
}
