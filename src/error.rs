//! Error types for docfocus.

use std::io;
use thiserror::Error;

use crate::encoder::EncoderError;

/// Result type alias for docfocus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting, segmenting or ranking documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The document parsed but carries no text the segmenter can use.
    #[error("No extractable text in {0}")]
    NoExtractableText(String),

    /// The semantic encoder failed; ranking cannot proceed.
    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    /// Error while serializing the report.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The collection request file is malformed.
    #[error("Invalid collection request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Whether this error only invalidates one input document.
    ///
    /// Input errors cause the document to be skipped; everything else aborts the run.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Error::Encoder(_) | Error::Render(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageOutOfRange(10, 5);
        assert_eq!(
            err.to_string(),
            "Page 10 is out of range (document has 5 pages)"
        );

        let err = Error::NoExtractableText("scan.pdf".to_string());
        assert_eq!(err.to_string(), "No extractable text in scan.pdf");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_encoder_error_is_fatal() {
        let err: Error = EncoderError::NonFinite.into();
        assert!(matches!(err, Error::Encoder(_)));
        assert!(!err.is_input_error());
    }
}
