//! PDF extractor implementation.
//!
//! The primary page source is tried first. Only a structural failure (the
//! document could not be opened or decoded, or the parser panicked) moves on
//! to the fallback source. A document that opens but has empty pages is the
//! scanned case and is never retried.

use crate::backend::{LopdfPages, PageResult, PageSource, PageSourceError, PdfExtractPages};
use std::panic::{self, AssertUnwindSafe};
use textract_core::error::panic_message;
use textract_core::{Error, ExtractionResult, Extractor, FileType, Result, ResultNormalizer};

/// Extractor for `.pdf` uploads.
pub struct PdfExtractor<P = PdfExtractPages, F = LopdfPages> {
    primary: P,
    fallback: F,
}

impl PdfExtractor {
    /// Create a PDF extractor with the default primary and fallback parsers.
    pub fn new() -> Self {
        Self::with_sources(PdfExtractPages, LopdfPages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PageSource, F: PageSource> PdfExtractor<P, F> {
    /// Create a PDF extractor from explicit page sources.
    pub fn with_sources(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: PageSource, F: PageSource> Extractor for PdfExtractor<P, F> {
    fn file_type(&self) -> FileType {
        FileType::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let normalizer = ResultNormalizer::pages(self.file_type());

        match read_guarded(&self.primary, bytes) {
            Ok(pages) => return normalizer.assemble(&pages),
            Err(PageSourceError::NoPages) => return Err(normalizer.empty_document_error()),
            Err(PageSourceError::Structural(detail)) => {
                log::warn!(
                    "{} failed ({}), trying {} fallback",
                    self.primary.name(),
                    detail,
                    self.fallback.name()
                );
            }
        }

        match read_guarded(&self.fallback, bytes) {
            Ok(pages) => normalizer.assemble(&pages),
            Err(PageSourceError::NoPages) => Err(normalizer.empty_document_error()),
            Err(PageSourceError::Structural(detail)) => {
                log::error!("{} also failed: {}", self.fallback.name(), detail);
                Err(Error::CorruptOrUnsupportedPdf)
            }
        }
    }
}

/// Run a page source, turning a panic into a structural failure.
///
/// Font decoding in PDF parsers can panic on malformed input.
fn read_guarded<S: PageSource>(source: &S, bytes: &[u8]) -> PageResult {
    panic::catch_unwind(AssertUnwindSafe(|| source.read_pages(bytes))).unwrap_or_else(|payload| {
        Err(PageSourceError::Structural(format!(
            "{} panicked: {}",
            source.name(),
            panic_message(payload.as_ref())
        )))
    })
}
