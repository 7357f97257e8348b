//! PPTX extractor: package parsing plus result normalization.

use crate::container::ContainerKind;
use crate::parser::PptxParser;
use std::io::Cursor;
use textract_core::{Error, ExtractionResult, Extractor, FileType, Result, ResultNormalizer};

/// Extractor for `.pptx` uploads.
pub struct PptxExtractor {
    parser: PptxParser,
}

impl PptxExtractor {
    /// Create a new PPTX extractor.
    pub fn new() -> Self {
        Self {
            parser: PptxParser::new(),
        }
    }
}

impl Default for PptxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PptxExtractor {
    fn file_type(&self) -> FileType {
        FileType::Pptx
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let container = ContainerKind::sniff(bytes);
        if container.is_compound() {
            log::debug!("Presentation upload is a {:?} container", container);
            return Err(Error::InvalidPresentationPackage(
                container.describe().to_string(),
            ));
        }

        let slides = self.parser.parse(Cursor::new(bytes))?;
        ResultNormalizer::slides(self.file_type()).assemble(&slides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{build_pptx, FixtureSlide};
    use textract_core::normalize::SLIDE_SENTINEL;

    #[test]
    fn test_table_slide_block() {
        let bytes = build_pptx(&[FixtureSlide::new().table(&[&["A", "B"], &["", "C"]])]);
        let result = PptxExtractor::new().extract(&bytes).unwrap();

        assert_eq!(result.text, "Slide 1:\nA | B\nC");
        assert_eq!(result.file_type, FileType::Pptx);
        assert_eq!(result.page_count, 1);
        assert!(!result.scanned);
        assert_eq!(result.warning, "");
    }

    #[test]
    fn test_empty_slides_are_listed() {
        let bytes = build_pptx(&[
            FixtureSlide::new().text_box(&["Intro"]),
            FixtureSlide::new().picture(),
            FixtureSlide::new().text_box(&["Body", "More"]),
            FixtureSlide::new(),
        ]);
        let result = PptxExtractor::new().extract(&bytes).unwrap();

        assert_eq!(result.page_count, 4);
        assert!(!result.scanned);
        assert_eq!(result.warning, "Slides 2, 4 had no text content.");
        assert_eq!(
            result.text,
            format!(
                "Slide 1:\nIntro\n\nSlide 2:\n{0}\n\nSlide 3:\nBody\nMore\n\nSlide 4:\n{0}",
                SLIDE_SENTINEL
            )
        );
    }

    #[test]
    fn test_all_empty_slides_are_not_scanned() {
        let bytes = build_pptx(&[FixtureSlide::new().picture()]);
        let result = PptxExtractor::new().extract(&bytes).unwrap();

        assert!(!result.scanned);
        assert_eq!(result.warning, "Slide 1 had no text content.");
    }

    #[test]
    fn test_no_slides_is_empty_document() {
        let err = PptxExtractor::new().extract(&build_pptx(&[])).unwrap_err();
        assert_eq!(
            err,
            Error::EmptyDocument("This PowerPoint file has no slides.".to_string())
        );
    }

    #[test]
    fn test_garbage_is_invalid_package() {
        let err = PptxExtractor::new().extract(b"not a presentation").unwrap_err();
        assert!(matches!(err, Error::InvalidPresentationPackage(_)));
        assert!(err.to_string().contains("valid .pptx file"));
    }

    #[test]
    fn test_compound_file_names_container() {
        let mut bytes = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        bytes.extend_from_slice(&[0u8; 64]);

        let err = PptxExtractor::new().extract(&bytes).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidPresentationPackage(ContainerKind::CompoundFile.describe().to_string())
        );
    }
}
