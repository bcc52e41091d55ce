use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while selecting and copying candidate files.
///
/// Every variant aborts the run; nothing here is recovered locally.
#[derive(Debug, Error)]
pub enum SelectiveCopyError {
    #[error("Not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid extension pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Copied file does not match its source: {}", file.display())]
    VerificationFailed { file: PathBuf },

    #[error("Source and destination are the same directory: {}", path.display())]
    SameDirectory { path: PathBuf },

    #[error("{} and {} are the same file", file.display(), destination.display())]
    SameFile { file: PathBuf, destination: PathBuf },
}

impl SelectiveCopyError {
    /// Classify an `io::Error` against the path it happened on.
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
                source,
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// True for the missing-directory class of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotADirectory { .. })
    }
}

/// A file name that does not end in a 4-digit identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cannot parse identifier from '{file_name}': {reason}")]
pub struct ParseError {
    pub file_name: String,
    pub reason: ParseErrorReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorReason {
    /// Stem has fewer than 4 characters.
    TooShort,
    /// One of the 4 characters is not an ASCII digit.
    NonDigit,
    /// File name is not valid UTF-8.
    NotUtf8,
}

impl std::fmt::Display for ParseErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ParseErrorReason::TooShort => "name too short for a 4-digit identifier",
            ParseErrorReason::NonDigit => "expected 4 digits before the extension",
            ParseErrorReason::NotUtf8 => "file name is not valid UTF-8",
        };
        f.write_str(text)
    }
}

pub type Result<T> = std::result::Result<T, SelectiveCopyError>;
