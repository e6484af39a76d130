//! Error types for the lumion-core library.

use thiserror::Error;

/// Main error type for the lumion library.
///
/// Field-level problems never show up here: a missing label or a malformed
/// number falls back to the field default inside the extractor.
#[derive(Error, Debug)]
pub enum LumionError {
    /// The invoice text could not be acquired from the document.
    #[error("failed to acquire invoice text: {0}")]
    Acquisition(#[from] PdfError),

    /// Record store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text acquisition.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF only carries scanned images; OCR is not supported.
    #[error("PDF contains only images, no extractable text")]
    ImageOnly,

    /// No document has been loaded into the processor.
    #[error("no document loaded")]
    NotLoaded,
}

/// Errors related to the invoice record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded.
    #[error("invalid record {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// No record with this id.
    #[error("invoice {0} not found")]
    NotFound(u64),
}

/// Result type for the lumion library.
pub type Result<T> = std::result::Result<T, LumionError>;
