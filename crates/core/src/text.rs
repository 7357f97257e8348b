//! Plain-text extraction.
//!
//! A byte-order mark selects UTF-8 or UTF-16. Without one the bytes are read
//! as UTF-8, and anything that is not valid UTF-8 is decoded as
//! windows-1252, which maps every byte and therefore cannot fail.

use crate::error::{Error, Result};
use crate::normalize::EMPTY_TEXT_MESSAGE;
use crate::types::{ExtractionResult, Extractor, FileType};
use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;

/// Extractor for `.txt` uploads.
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new plain-text extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TextExtractor {
    fn file_type(&self) -> FileType {
        FileType::Txt
    }

    fn extract(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let decoded = decode_text(bytes);
        let text = decoded.trim();

        if text.is_empty() {
            return Err(Error::EmptyDocument(EMPTY_TEXT_MESSAGE.to_string()));
        }

        Ok(ExtractionResult::single(text, FileType::Txt))
    }
}

/// Decode uploaded bytes to text without ever failing.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        log::debug!("Decoding text as {} (byte-order mark)", encoding.name());
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            log::debug!("Replaced malformed {} sequences", encoding.name());
        }
        return text;
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            log::debug!(
                "Text is not valid UTF-8 ({}), falling back to {}",
                e,
                WINDOWS_1252.name()
            );
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}
