//! PPT extractor implementation.

use textract_core::{Error, ExtractionResult, Extractor, FileType, Result};
use textract_pptx::{ContainerKind, PptxExtractor};

/// Extractor for legacy `.ppt` uploads.
pub struct PptExtractor {
    pptx: PptxExtractor,
}

impl PptExtractor {
    /// Create a new PPT extractor.
    pub fn new() -> Self {
        Self {
            pptx: PptxExtractor::new(),
        }
    }
}

impl Default for PptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PptExtractor {
    fn file_type(&self) -> FileType {
        FileType::Ppt
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        match self.pptx.extract(bytes) {
            Ok(result) => Ok(result.reported_as(self.file_type())),
            Err(e) => {
                // The PPTX failure detail is not actionable for a .ppt upload
                log::debug!(
                    "Legacy presentation ({:?} container) unreadable via PPTX path: {}",
                    ContainerKind::sniff(bytes),
                    e
                );
                Err(Error::LegacyFormatUnsupported)
            }
        }
    }
}
