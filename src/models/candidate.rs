use crate::error::{ParseError, ParseErrorReason};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Number of digits that make up an identifier.
pub const IDENTIFIER_WIDTH: usize = 4;

/// A file from the source directory that passed the extension filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub file_name: String,
    pub identifier: u32,
}

impl CandidateFile {
    /// Build a candidate from a listed path, parsing its identifier.
    /// `suffix` is the literal extension the listing matched, if known.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        suffix: Option<&str>,
    ) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ParseError {
                file_name: path.to_string_lossy().to_string(),
                reason: ParseErrorReason::NotUtf8,
            })?
            .to_string();

        let identifier = parse_identifier(&file_name, suffix)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            identifier,
        })
    }

    /// Inclusive upper bound check.
    pub fn is_selected(&self, threshold: u32) -> bool {
        self.identifier <= threshold
    }
}

/// Parse the identifier from a file name such as `image_0042.jpg`.
///
/// The identifier is the 4 characters immediately before the extension.
/// With a literal `suffix` (`.tar.gz`) that suffix is stripped, compared
/// ASCII case-insensitively; otherwise the final `.`-extension is (or nothing,
/// when the name has no dot). The 4 characters must all be ASCII digits;
/// leading zeros are fine. A stem shorter than 4 bytes is rejected instead of
/// being read from a shifted position.
pub fn parse_identifier(file_name: &str, suffix: Option<&str>) -> Result<u32, ParseError> {
    let stem = suffix
        .and_then(|suffix| strip_suffix_ignore_ascii_case(file_name, suffix))
        .unwrap_or_else(|| match file_name.rsplit_once('.') {
            Some((stem, _extension)) => stem,
            None => file_name,
        });

    let fail = |reason| ParseError {
        file_name: file_name.to_string(),
        reason,
    };

    let bytes = stem.as_bytes();
    if bytes.len() < IDENTIFIER_WIDTH {
        return Err(fail(ParseErrorReason::TooShort));
    }

    bytes[bytes.len() - IDENTIFIER_WIDTH..]
        .iter()
        .try_fold(0u32, |acc, &byte| {
            if byte.is_ascii_digit() {
                Ok(acc * 10 + u32::from(byte - b'0'))
            } else {
                Err(fail(ParseErrorReason::NonDigit))
            }
        })
}

fn strip_suffix_ignore_ascii_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    if !name.is_char_boundary(split) || !name[split..].eq_ignore_ascii_case(suffix) {
        return None;
    }
    Some(&name[..split])
}
