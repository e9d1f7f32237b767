//! Checkpoint: a log's committed size and root hash, in the line-oriented
//! checkpoint text format.
//!
//! ```text
//! <ecosystem/version string>
//! <decimal log size>
//! <base64 root hash>
//! <optional non-empty line of other content>...
//! ```
//!
//! Every line, including the last, is terminated by `\n`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FormatError;
use crate::note::Note;

/// A statement of a log's size and root hash.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The ecosystem/version string (first line). Must be non-empty.
    pub ecosystem: String,

    /// The number of entries in the log at this checkpoint.
    pub size: u64,

    /// The hash which commits to the contents of the entire log.
    pub hash: Vec<u8>,

    /// Additional signed lines. Each element is one line without its newline.
    pub other_content: Vec<String>,
}

impl Checkpoint {
    /// Create a checkpoint with no extension lines.
    pub fn new(ecosystem: impl Into<String>, size: u64, hash: impl Into<Vec<u8>>) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            size,
            hash: hash.into(),
            other_content: Vec::new(),
        }
    }

    /// Append an extension line.
    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.other_content.push(line.into());
        self
    }

    /// Parse checkpoint text, discarding anything after the first empty line
    /// (such as a signature block).
    pub fn parse(data: &[u8]) -> Result<Self, FormatError> {
        let segments: Vec<&[u8]> = data.split(|&b| b == b'\n').collect();
        if segments.len() < 4 {
            return Err(FormatError::TooFewLines);
        }

        let ecosystem = utf8(segments[0])?;
        if ecosystem.is_empty() {
            return Err(FormatError::EmptyEcosystem);
        }

        let size = parse_decimal(segments[1])?;

        let hash = STANDARD
            .decode(segments[2])
            .map_err(FormatError::InvalidHash)?;

        let other_content = segments[3..]
            .iter()
            .take_while(|line| !line.is_empty())
            .map(|line| utf8(line).map(str::to_owned))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ecosystem: ecosystem.to_owned(),
            size,
            hash,
            other_content,
        })
    }
}

impl Note for Checkpoint {
    fn to_text(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    fn from_text(data: &[u8]) -> Result<Self, FormatError> {
        Self::parse(data)
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.ecosystem)?;
        writeln!(f, "{}", self.size)?;
        writeln!(f, "{}", STANDARD.encode(&self.hash))?;
        for line in &self.other_content {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parse an unsigned decimal. Only ASCII digits are accepted (no sign, no
/// whitespace).
fn parse_decimal(segment: &[u8]) -> Result<u64, FormatError> {
    let invalid = || FormatError::InvalidSize(String::from_utf8_lossy(segment).into_owned());
    if segment.is_empty() || !segment.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    std::str::from_utf8(segment)
        .map_err(|_| invalid())?
        .parse()
        .map_err(|_| invalid())
}

fn utf8(segment: &[u8]) -> Result<&str, FormatError> {
    std::str::from_utf8(segment).map_err(|_| FormatError::InvalidUtf8)
}
