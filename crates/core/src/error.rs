//! Error types for document text extraction.

use std::any::Any;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to users in place of the detail of an [`Error::Unexpected`].
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An unexpected error occurred while reading the file. Please try again.";

/// Errors that can occur during text extraction.
///
/// Every parser failure is mapped onto one of these variants before it
/// leaves the extractor that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The uploaded buffer has zero length.
    #[error("The uploaded file is empty. Please upload a file with content.")]
    EmptyInput,

    /// The filename extension is not one of the supported formats.
    #[error(
        "Unsupported file type: .{extension}. Please upload a PDF, PowerPoint (.pptx / .ppt), \
         or plain text file."
    )]
    UnsupportedFormat {
        /// Upper-cased extension, or `unknown` when the filename has none.
        extension: String,
    },

    /// The document has no pages or slides, or no text after trimming.
    #[error("{0}")]
    EmptyDocument(String),

    /// Both PDF parsing strategies failed.
    #[error(
        "Could not read this PDF. The file may be corrupted, password-protected, or in an \
         unsupported format. Please try a different file."
    )]
    CorruptOrUnsupportedPdf,

    /// The presentation package could not be opened or parsed.
    #[error("Could not read this PowerPoint file: {0}. Please ensure it is a valid .pptx file.")]
    InvalidPresentationPackage(String),

    /// A binary `.ppt` could not be read through the presentation path.
    #[error(
        "Old-format .ppt files are not fully supported. Please re-save your presentation as \
         .pptx (PowerPoint 2007+) and upload again."
    )]
    LegacyFormatUnsupported,

    /// The upload exceeds the configured size ceiling.
    #[error("File too large. Maximum allowed size is {} MB.", .limit / (1024 * 1024))]
    FileTooLarge { size: usize, limit: usize },

    /// Any other internal failure.
    #[error("Unexpected extraction failure: {0}")]
    Unexpected(String),
}

/// Coarse classification used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The user can fix this by uploading a different file.
    BadInput,
    /// Internal failure; report generically.
    Unexpected,
}

impl Error {
    /// Classify this error as user-correctable or internal.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Unexpected(_) => ErrorClass::Unexpected,
            _ => ErrorClass::BadInput,
        }
    }

    /// Whether the user can correct this error.
    pub fn is_bad_input(&self) -> bool {
        self.class() == ErrorClass::BadInput
    }

    /// The message safe to show an end user.
    ///
    /// Internal detail of [`Error::Unexpected`] is replaced by a generic sentence.
    pub fn user_message(&self) -> String {
        match self.class() {
            ErrorClass::BadInput => self.to_string(),
            ErrorClass::Unexpected => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Best-effort text of a panic payload, for logging contained panics.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
