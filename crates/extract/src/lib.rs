//! Document text extraction.
//!
//! Classifies an upload by filename, runs the matching format extractor, and
//! returns a normalized [`ExtractionResult`]:
//!
//! ```no_run
//! let bytes = std::fs::read("essay.pdf").unwrap();
//! let result = textract::extract(&bytes, "essay.pdf").unwrap();
//! println!("{} pages, scanned: {}", result.page_count, result.scanned);
//! ```

use std::panic::{self, AssertUnwindSafe};
use textract_core::error::panic_message;
use textract_pdf::PdfExtractor;
use textract_ppt::PptExtractor;
use textract_pptx::PptxExtractor;

pub use textract_core::{
    Error, ErrorClass, ExtractionResult, Extractor, FileType, Result, TextExtractor,
};

/// Upload ceiling applied by [`ExtractOptions::default`] (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Limits applied before any parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Reject uploads larger than this many bytes. `None` disables the check.
    pub max_bytes: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_bytes: Some(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

impl ExtractOptions {
    /// Options with no size ceiling.
    pub fn unbounded() -> Self {
        Self { max_bytes: None }
    }

    /// Set the size ceiling.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }
}

/// Extract text from an upload.
///
/// Fails with [`Error::EmptyInput`] for an empty buffer and
/// [`Error::UnsupportedFormat`] for an unrecognized extension, before any
/// parsing is attempted.
pub fn extract(bytes: &[u8], filename: &str) -> Result<ExtractionResult> {
    extract_with_options(bytes, filename, &ExtractOptions::unbounded())
}

/// Extract text from an upload, enforcing `options` first.
pub fn extract_with_options(
    bytes: &[u8],
    filename: &str,
    options: &ExtractOptions,
) -> Result<ExtractionResult> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if let Some(limit) = options.max_bytes {
        if bytes.len() > limit {
            return Err(Error::FileTooLarge {
                size: bytes.len(),
                limit,
            });
        }
    }

    let file_type = FileType::from_filename(filename)?;
    log::debug!(
        "Extracting {} bytes from '{}' as {}",
        bytes.len(),
        filename,
        file_type
    );

    panic::catch_unwind(AssertUnwindSafe(|| dispatch(file_type, bytes))).unwrap_or_else(
        |payload| {
            let detail = panic_message(payload.as_ref());
            log::error!("Extractor for {} panicked on '{}': {}", file_type, filename, detail);
            Err(Error::Unexpected(detail))
        },
    )
}

/// Older calling convention returning `(text, file_type)`.
///
/// A partial-extraction warning is prepended to the text as a bracketed banner.
pub fn extract_text_compat(bytes: &[u8], filename: &str) -> Result<(String, FileType)> {
    extract(bytes, filename).map(ExtractionResult::into_legacy_pair)
}

fn dispatch(file_type: FileType, bytes: &[u8]) -> Result<ExtractionResult> {
    match file_type {
        FileType::Pdf => PdfExtractor::new().extract(bytes),
        FileType::Pptx => PptxExtractor::new().extract(bytes),
        FileType::Ppt => PptExtractor::new().extract(bytes),
        FileType::Txt => TextExtractor::new().extract(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use textract_core::normalize::SCANNED_ADVISORY;
    use textract_pdf::fixtures::build_pdf;
    use textract_pptx::fixtures::{build_pptx, FixtureSlide};

    #[test]
    fn test_empty_bytes_fail_for_every_filename() {
        for name in ["a.pdf", "b.pptx", "c.ppt", "d.txt", "e.docx", "noext"] {
            assert_eq!(extract(b"", name), Err(Error::EmptyInput), "filename {}", name);
        }
    }

    #[test]
    fn test_unsupported_extension_is_named() {
        assert_eq!(
            extract(b"data", "thesis.docx"),
            Err(Error::UnsupportedFormat {
                extension: "DOCX".to_string()
            })
        );
        assert_eq!(
            extract(b"data", "Makefile"),
            Err(Error::UnsupportedFormat {
                extension: "unknown".to_string()
            })
        );
    }

    #[test]
    fn test_dispatches_by_extension_case_insensitively() {
        let result = extract(b"  An essay.  ", "ESSAY.TXT").unwrap();
        assert_eq!(result.file_type, FileType::Txt);
        assert_eq!(result.text, "An essay.");
    }

    #[test]
    fn test_pdf_upload() {
        let result = extract(&build_pdf(&["Alpha", "Beta"]), "paper.pdf").unwrap();
        assert_eq!(result.file_type, FileType::Pdf);
        assert_eq!(result.page_count, 2);
        assert!(result.text.starts_with("Page 1:\n"));
    }

    #[test]
    fn test_pptx_and_ppt_uploads() {
        let bytes = build_pptx(&[FixtureSlide::new().table(&[&["A", "B"], &["", "C"]])]);

        let pptx = extract(&bytes, "deck.pptx").unwrap();
        assert_eq!(pptx.file_type, FileType::Pptx);
        assert_eq!(pptx.text, "Slide 1:\nA | B\nC");

        let ppt = extract(&bytes, "deck.ppt").unwrap();
        assert_eq!(ppt.file_type, FileType::Ppt);
        assert_eq!(ppt.text, pptx.text);
    }

    #[test]
    fn test_wrong_content_for_extension() {
        assert_eq!(
            extract(b"plain words", "fake.pdf"),
            Err(Error::CorruptOrUnsupportedPdf)
        );
        assert!(matches!(
            extract(b"plain words", "fake.pptx"),
            Err(Error::InvalidPresentationPackage(_))
        ));
        assert_eq!(
            extract(b"plain words", "fake.ppt"),
            Err(Error::LegacyFormatUnsupported)
        );
    }

    #[test]
    fn test_size_ceiling() {
        let options = ExtractOptions::default().with_max_bytes(4);
        assert_eq!(
            extract_with_options(b"12345", "a.txt", &options),
            Err(Error::FileTooLarge { size: 5, limit: 4 })
        );
        assert!(extract_with_options(b"1234", "a.txt", &options).is_ok());
        assert_eq!(
            ExtractOptions::default().max_bytes,
            Some(DEFAULT_MAX_UPLOAD_BYTES)
        );
    }

    #[test]
    fn test_empty_input_checked_before_size_and_type() {
        let options = ExtractOptions::default().with_max_bytes(0);
        assert_eq!(
            extract_with_options(b"", "x.docx", &options),
            Err(Error::EmptyInput)
        );
    }

    #[test]
    fn test_compat_prepends_warning() {
        let bytes = build_pptx(&[
            FixtureSlide::new().text_box(&["Hello"]),
            FixtureSlide::new().picture(),
        ]);
        let (text, file_type) = extract_text_compat(&bytes, "deck.pptx").unwrap();

        assert_eq!(file_type, FileType::Pptx);
        assert!(text.starts_with("[⚠️ Slide 2 had no text content.]\n\nSlide 1:\nHello"));
    }

    #[test]
    fn test_compat_returns_scanned_advisory_verbatim() {
        let (text, file_type) = extract_text_compat(&build_pdf(&["", ""]), "scan.pdf").unwrap();
        assert_eq!(file_type, FileType::Pdf);
        assert_eq!(text, SCANNED_ADVISORY);
    }

    #[test]
    fn test_compat_clean_text_unchanged() {
        let (text, _) = extract_text_compat(b"clean", "a.txt").unwrap();
        assert_eq!(text, "clean");
    }

    #[test]
    fn test_result_serializes_with_wire_field_names() {
        let result = extract(b"hello", "a.txt").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "hello",
                "file_type": "txt",
                "page_count": 1,
                "scanned": false,
                "warning": "",
            })
        );
    }

    #[test]
    fn test_clean_document_blocks_map_to_units() {
        let bytes = build_pptx(&[
            FixtureSlide::new().text_box(&["one"]),
            FixtureSlide::new().text_box(&["two"]),
            FixtureSlide::new().text_box(&["three"]),
        ]);
        let result = extract(&bytes, "deck.pptx").unwrap();
        assert_eq!(result.warning, "");

        let blocks: Vec<&str> = result.text.split("\n\n").collect();
        assert_eq!(blocks.len(), result.page_count);
        for (idx, (block, expected)) in blocks.iter().zip(["one", "two", "three"]).enumerate() {
            assert_eq!(*block, format!("Slide {}:\n{}", idx + 1, expected));
        }
    }
}
