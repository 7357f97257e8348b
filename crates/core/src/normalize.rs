//! Assembly of per-unit text into an [`ExtractionResult`].
//!
//! Extractors hand over one string per page or slide, in order. The
//! normalizer cleans each string, labels it with its locator, substitutes a
//! sentinel for units with no text, and derives `scanned` and `warning`.

use crate::error::{Error, Result};
use crate::types::{ExtractionResult, FileType};
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex matching blank lines inside a unit, which would read as a block break.
static BLANK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Placeholder for a page whose text layer is empty.
pub const PAGE_SENTINEL: &str = "[No extractable text — this page may be an image or scan]";

/// Placeholder for a slide that carries no text.
pub const SLIDE_SENTINEL: &str = "[No text content on this slide]";

/// Replaces all page blocks when no page has a text layer.
pub const SCANNED_ADVISORY: &str = "This appears to be a scanned document. OCR not enabled.\n\n\
     Please copy and paste your text manually into the editor below, \
     or use a PDF with selectable text.";

/// Reported when a plain-text upload has no content after trimming.
pub const EMPTY_TEXT_MESSAGE: &str = "This text file appears to be empty.";

/// Separator between consecutive unit blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// The locator granularity of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A PDF page. Empty pages are treated as scanned images.
    Page,
    /// A presentation slide. Empty slides are simply reported.
    Slide,
}

impl UnitKind {
    /// Human-readable locator label.
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Page => "Page",
            UnitKind::Slide => "Slide",
        }
    }

    /// Sentinel text for a unit with no content.
    pub fn sentinel(&self) -> &'static str {
        match self {
            UnitKind::Page => PAGE_SENTINEL,
            UnitKind::Slide => SLIDE_SENTINEL,
        }
    }

    /// Whether a document whose units are all empty counts as scanned.
    pub fn detects_scans(&self) -> bool {
        matches!(self, UnitKind::Page)
    }

    /// Locator prefix for the 1-based unit `number`.
    pub fn locator(&self, number: usize) -> String {
        format!("{} {}:", self.label(), number)
    }

    /// The single warning sentence listing empty units.
    fn warning(&self, empty: &[usize]) -> String {
        let numbers = empty
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let plural = empty.len() > 1;

        match (self, plural) {
            (UnitKind::Page, true) => format!(
                "Pages {} appear to be scanned images and could not be extracted.",
                numbers
            ),
            (UnitKind::Page, false) => format!(
                "Page {} appears to be a scanned image and could not be extracted.",
                numbers
            ),
            (UnitKind::Slide, true) => format!("Slides {} had no text content.", numbers),
            (UnitKind::Slide, false) => format!("Slide {} had no text content.", numbers),
        }
    }
}

/// Clean the raw text of one unit.
///
/// - Normalizes line endings to `\n`
/// - Composes Unicode to NFC (PDF text layers often carry decomposed accents)
/// - Strips trailing whitespace on every line
/// - Removes blank lines, so a unit never contains [`BLOCK_SEPARATOR`]
/// - Trims the whole string
pub fn clean_unit_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let composed: String = unified.nfc().collect();

    let stripped = composed
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_LINE_REGEX
        .replace_all(&stripped, "\n")
        .trim()
        .to_string()
}

/// Builds [`ExtractionResult`]s from ordered per-unit text.
#[derive(Debug, Clone, Copy)]
pub struct ResultNormalizer {
    file_type: FileType,
    kind: UnitKind,
}

impl ResultNormalizer {
    /// Create a normalizer reporting `file_type` with `kind` locators.
    pub fn new(file_type: FileType, kind: UnitKind) -> Self {
        Self { file_type, kind }
    }

    /// Normalizer for PDF pages.
    pub fn pages(file_type: FileType) -> Self {
        Self::new(file_type, UnitKind::Page)
    }

    /// Normalizer for presentation slides.
    pub fn slides(file_type: FileType) -> Self {
        Self::new(file_type, UnitKind::Slide)
    }

    /// Assemble the result for `units`, where `units[i]` is unit `i + 1`.
    ///
    /// Fails with [`Error::EmptyDocument`] when there are no units at all.
    pub fn assemble<S: AsRef<str>>(&self, units: &[S]) -> Result<ExtractionResult> {
        if units.is_empty() {
            return Err(self.empty_document_error());
        }

        let total = units.len();
        let mut blocks = Vec::with_capacity(total);
        let mut empty = Vec::new();

        for (idx, raw) in units.iter().enumerate() {
            let number = idx + 1;
            let text = clean_unit_text(raw.as_ref());

            if text.is_empty() {
                empty.push(number);
                blocks.push(format!("{}\n{}", self.kind.locator(number), self.kind.sentinel()));
            } else {
                blocks.push(format!("{}\n{}", self.kind.locator(number), text));
            }
        }

        if self.kind.detects_scans() && empty.len() == total {
            log::debug!("All {} {} units are empty, classifying as scanned", total, self.file_type);
            return Ok(ExtractionResult {
                text: SCANNED_ADVISORY.to_string(),
                file_type: self.file_type,
                page_count: total,
                scanned: true,
                warning: String::new(),
            });
        }

        let warning = if empty.is_empty() {
            String::new()
        } else {
            self.kind.warning(&empty)
        };

        Ok(ExtractionResult {
            text: blocks.join(BLOCK_SEPARATOR),
            file_type: self.file_type,
            page_count: total,
            scanned: false,
            warning,
        })
    }

    /// The error for a document with no units.
    pub fn empty_document_error(&self) -> Error {
        Error::EmptyDocument(self.no_units_message())
    }

    fn no_units_message(&self) -> String {
        match self.file_type {
            FileType::Pdf => "This PDF has no pages.",
            FileType::Pptx | FileType::Ppt => "This PowerPoint file has no slides.",
            FileType::Txt => EMPTY_TEXT_MESSAGE,
        }
        .to_string()
    }
}
