//! Legacy PPT extraction backend.
//!
//! PowerPoint 97-2003 binary files are not parsed directly. Some files
//! uploaded with a `.ppt` name are really OOXML packages, so the PPTX path is
//! tried and anything it cannot read is reported as an unsupported legacy
//! format.

pub mod extractor;

pub use extractor::PptExtractor;
