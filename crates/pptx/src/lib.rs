//! PPTX (Office Open XML) extraction backend.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! one text block per slide.

pub mod container;
pub mod extractor;
pub mod parser;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

pub use container::ContainerKind;
pub use extractor::PptxExtractor;
pub use parser::PptxParser;
