//! Core domain types, error taxonomy, result normalization, and plain-text
//! extraction for document text extraction.

pub mod error;
pub mod normalize;
pub mod text;
pub mod types;

pub use error::{Error, ErrorClass, Result};
pub use normalize::{ResultNormalizer, UnitKind};
pub use text::TextExtractor;
pub use types::{ExtractionResult, Extractor, FileType};
