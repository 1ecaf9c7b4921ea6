//! Error types for the archive boundary.

use std::error::Error;
use std::fmt;
use std::io;

use trellis_store::StoreError;

/// Errors from writing or reading an archived group.
#[derive(Debug)]
pub enum ArchiveError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The stream does not start with the expected `b"TRLS"` magic
    /// bytes.
    InvalidMagic,
    /// The format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the stream.
        found: u8,
    },
    /// A group record could not be decoded (truncated or corrupt
    /// data).
    MalformedGroup {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A payload type tag is not recognized.
    UnknownPayloadTag {
        /// The unrecognized tag.
        tag: u8,
    },
    /// An element-kind tag is not recognized.
    UnknownKindTag {
        /// The unrecognized tag.
        tag: u8,
    },
    /// Installing the decoded subtree into the store failed.
    Store(StoreError),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"TRLS\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::MalformedGroup { detail } => write!(f, "malformed group: {detail}"),
            Self::UnknownPayloadTag { tag } => write!(f, "unknown payload type tag {tag}"),
            Self::UnknownKindTag { tag } => write!(f, "unknown element kind tag {tag}"),
            Self::Store(e) => write!(f, "could not install group: {e}"),
        }
    }
}

impl Error for ArchiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ArchiveError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StoreError> for ArchiveError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
