//! Container sniffing for presentation uploads.
//!
//! A `.pptx` upload that is not a zip package is usually one of a few OLE
//! compound files: a password-protected OOXML package or a legacy binary
//! presentation with the wrong extension. Naming which one gives the user
//! an actionable error.

use cfb::CompoundFile;
use std::io::Cursor;

/// Zip local file header (PK\x03\x04).
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// OLE/CFB header signature.
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Stream holding an encrypted OOXML package.
const ENCRYPTED_PACKAGE_STREAM: &str = "/EncryptedPackage";

/// Main stream of a legacy binary presentation.
const POWERPOINT_DOCUMENT_STREAM: &str = "/PowerPoint Document";

/// What kind of container the upload bytes are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// A zip archive, as every OOXML package is.
    ZipPackage,
    /// An OOXML package encrypted with a password.
    EncryptedPackage,
    /// A PowerPoint 97-2003 binary presentation.
    LegacyPresentation,
    /// Some other OLE compound file.
    CompoundFile,
    /// Anything else.
    Unknown,
}

impl ContainerKind {
    /// Classify `bytes` by magic number and, for compound files, by the streams they hold.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&ZIP_MAGIC) {
            return Self::ZipPackage;
        }
        if !bytes.starts_with(&CFB_MAGIC) {
            return Self::Unknown;
        }

        match CompoundFile::open(Cursor::new(bytes)) {
            Ok(cfb) => {
                if cfb.exists(ENCRYPTED_PACKAGE_STREAM) {
                    Self::EncryptedPackage
                } else if cfb.exists(POWERPOINT_DOCUMENT_STREAM) {
                    Self::LegacyPresentation
                } else {
                    Self::CompoundFile
                }
            }
            Err(e) => {
                log::debug!("CFB signature present but container failed to open: {}", e);
                Self::CompoundFile
            }
        }
    }

    /// Whether this container can never be read as a zip package.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Self::EncryptedPackage | Self::LegacyPresentation | Self::CompoundFile
        )
    }

    /// Short explanation suitable for an error message.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ZipPackage => "the file is a zip package",
            Self::EncryptedPackage => "the presentation is password-protected",
            Self::LegacyPresentation => {
                "the file is an old-format binary presentation, not a .pptx package"
            }
            Self::CompoundFile => "the file is an OLE compound document, not a .pptx package",
            Self::Unknown => "the file is not a zip package",
        }
    }
}
