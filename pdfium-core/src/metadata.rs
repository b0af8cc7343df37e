//! Document metadata
//!
//! Pulls the eight well-known information-dictionary fields from the engine
//! into one flat record. Each field is looked up independently; a tag the
//! document does not carry is simply absent, never an error.

use pdfium_engine::{DocumentHandle, PdfiumEngine};
use serde::Serialize;

/// Well-known document metadata fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PdfMetadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Keywords associated with the document.
    pub keywords: Option<String>,
    /// Application that created the original document.
    pub creator: Option<String>,
    /// Application that produced the PDF.
    pub producer: Option<String>,
    /// Creation date, as the raw date string from the document.
    pub creation_date: Option<String>,
    /// Modification date, as the raw date string from the document.
    pub mod_date: Option<String>,
}

impl PdfMetadata {
    /// Whether no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
            && self.creator.is_none()
            && self.producer.is_none()
            && self.creation_date.is_none()
            && self.mod_date.is_none()
    }
}

/// Read all well-known fields under one gateway acquisition.
pub(crate) fn read_metadata(engine: &mut dyn PdfiumEngine, doc: DocumentHandle) -> PdfMetadata {
    PdfMetadata {
        title: engine.meta_text(doc, "Title"),
        author: engine.meta_text(doc, "Author"),
        subject: engine.meta_text(doc, "Subject"),
        keywords: engine.meta_text(doc, "Keywords"),
        creator: engine.meta_text(doc, "Creator"),
        producer: engine.meta_text(doc, "Producer"),
        creation_date: engine.meta_text(doc, "CreationDate"),
        mod_date: engine.meta_text(doc, "ModDate"),
    }
}
