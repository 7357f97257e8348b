//! Domain types shared by every extractor.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical type of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Portable Document Format.
    Pdf,
    /// Modern PowerPoint (Office Open XML package).
    Pptx,
    /// Legacy PowerPoint (OLE/CFB binary).
    Ppt,
    /// Plain text.
    Txt,
}

impl FileType {
    /// Detect the type from a bare extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Classify an upload by its filename.
    ///
    /// Only the text after the last dot is inspected, case-insensitively.
    /// Anything unrecognized is rejected with [`Error::UnsupportedFormat`],
    /// naming the extension or `unknown` when there is none.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty());

        match ext {
            Some(ext) => Self::from_extension(ext).ok_or_else(|| Error::UnsupportedFormat {
                extension: ext.to_uppercase(),
            }),
            None => Err(Error::UnsupportedFormat {
                extension: "unknown".to_string(),
            }),
        }
    }

    /// The lowercase name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Pptx => "pptx",
            Self::Ppt => "ppt",
            Self::Txt => "txt",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Locator-prefixed blocks, one per page or slide, separated by blank lines.
    pub text: String,

    /// Logical type of the source document.
    pub file_type: FileType,

    /// Number of pages or slides; 1 for plain text.
    pub page_count: usize,

    /// True only when no page yielded any text.
    pub scanned: bool,

    /// One sentence describing partial degradation, or empty.
    pub warning: String,
}

impl ExtractionResult {
    /// Build a result for a single-unit document with no degradation.
    pub fn single(text: impl Into<String>, file_type: FileType) -> Self {
        Self {
            text: text.into(),
            file_type,
            page_count: 1,
            scanned: false,
            warning: String::new(),
        }
    }

    /// Report the same extraction under a different logical type.
    ///
    /// Used when a document is read through another format's parser but
    /// must still be reported as what the user uploaded.
    pub fn reported_as(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Whether some (but not all) units could not be extracted.
    pub fn has_warning(&self) -> bool {
        !self.warning.is_empty()
    }

    /// Collapse into the older `(text, file_type)` calling convention.
    ///
    /// A warning is surfaced as a bracketed banner ahead of the text.
    pub fn into_legacy_pair(self) -> (String, FileType) {
        if self.scanned || self.warning.is_empty() {
            return (self.text, self.file_type);
        }
        let text = format!("[⚠️ {}]\n\n{}", self.warning, self.text)
            .trim()
            .to_string();
        (text, self.file_type)
    }
}

/// A format-specific text extractor.
///
/// Implementations take the raw upload and either produce a normalized
/// [`ExtractionResult`] or fail with a user-facing [`Error`].
pub trait Extractor {
    /// The logical type this extractor reports.
    fn file_type(&self) -> FileType;

    /// Extract text from the raw document bytes.
    fn extract(&self, bytes: &[u8]) -> Result<ExtractionResult>;
}
