//! Text-extractor boundary.
//!
//! Document parsing (PDF and friends) is an external collaborator. The core
//! only depends on this narrow contract: bytes in, text out, and an empty
//! string on unrecoverable failure so that callers can detect "no text" and
//! abort gracefully instead of handling extractor-specific errors.

/// Extracts plain text from raw document bytes.
pub trait TextExtractor: Send + Sync {
    /// Extract text. Returns an empty string (never an error) when the
    /// document cannot be read.
    fn extract(&self, bytes: &[u8]) -> String;
}

/// Pass-through extractor for documents that are already plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
