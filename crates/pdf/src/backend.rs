//! PDF page sources.
//!
//! A page source turns PDF bytes into one raw text string per page. Two are
//! provided: [`PdfExtractPages`] (the primary, layout-aware parser) and
//! [`LopdfPages`] (a lower-level fallback that reads content streams
//! directly).

use lopdf::Document;
use std::fmt;

/// Why a page source produced no pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSourceError {
    /// The document opened but reports zero pages. Not retryable.
    NoPages,
    /// The document could not be opened or decoded.
    Structural(String),
}

impl fmt::Display for PageSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSourceError::NoPages => f.write_str("document has no pages"),
            PageSourceError::Structural(detail) => f.write_str(detail),
        }
    }
}

/// Result type for page sources.
pub type PageResult = std::result::Result<Vec<String>, PageSourceError>;

/// A strategy for reading per-page text out of a PDF.
pub trait PageSource {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Read the raw text layer of every page, in page order.
    fn read_pages(&self, bytes: &[u8]) -> PageResult;
}

/// Primary parser backed by `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractPages;

impl PageSource for PdfExtractPages {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn read_pages(&self, bytes: &[u8]) -> PageResult {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| PageSourceError::Structural(e.to_string()))?;

        if pages.is_empty() {
            return Err(PageSourceError::NoPages);
        }
        Ok(pages)
    }
}

/// Fallback parser backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfPages;

impl PageSource for LopdfPages {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn read_pages(&self, bytes: &[u8]) -> PageResult {
        let mut document = Document::load_mem(bytes)
            .map_err(|e| PageSourceError::Structural(format!("failed to load PDF: {}", e)))?;

        // Unprotected-but-encrypted files open with the empty password
        if document.is_encrypted() && document.decrypt("").is_err() {
            return Err(PageSourceError::Structural(
                "cannot decrypt password-protected PDF".to_string(),
            ));
        }

        document.decompress();

        let pages = document.get_pages();
        if pages.is_empty() {
            return Err(PageSourceError::NoPages);
        }

        Ok(pages
            .keys()
            .map(|&number| page_text_or_empty(number, document.extract_text(&[number])))
            .collect())
    }
}

/// Text of one page, or an empty page when its content cannot be decoded.
///
/// The document itself opened, so an unreadable page is reported like a page
/// without a text layer rather than failing the whole upload.
fn page_text_or_empty(number: u32, text: Result<String, lopdf::Error>) -> String {
    text.unwrap_or_else(|e| {
        log::warn!("lopdf could not extract text from page {}: {}", number, e);
        String::new()
    })
}
