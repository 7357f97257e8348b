//! PDF extraction backend.
//!
//! Reads the text layer of every page with a primary parser, falls back to a
//! second parser when the first cannot open the document, and flags pages
//! with no text layer as scanned.

pub mod backend;
pub mod extractor;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use backend::{LopdfPages, PageSource, PageSourceError, PdfExtractPages};
pub use extractor::PdfExtractor;
