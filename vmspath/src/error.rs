//! Error types for filespec translation.
//!
//! Every variant collapses to the same outcome for callers that only care
//! whether a translation exists; the detail is there for logging and tests.

use std::path::PathBuf;

/// Reasons a string could not be translated into a POSIX path.
#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    /// The input does not look like a legacy filespec at all (no grammar
    /// match, or no directory delimiters).
    #[error("not an OpenVMS file specification")]
    NotFilespec,

    /// The directory was opened with one delimiter and closed with a
    /// character that does not pair with it.
    #[error("directory delimiters do not pair: '{open}' closed by '{close}'")]
    MismatchedDelimiters { open: char, close: char },

    /// Structurally recognised, but a component takes a rejected shape.
    #[error("malformed file specification: {reason}")]
    Malformed { reason: &'static str },

    /// A `^` escape is not followed by a valid escape sequence, or an
    /// escape-only character appears unescaped.
    #[error("invalid escape sequence at offset {position}")]
    InvalidEscape { position: usize },

    /// A character from the ODS-5 forbidden set appears in a component.
    #[error("forbidden character {character:?} at offset {position}")]
    ForbiddenCharacter { position: usize, character: char },

    /// An escape decoded to a control character in 0x00..=0x1F.
    #[error("escape at offset {position} decodes to control character 0x{value:02X}")]
    ControlCharacter { position: usize, value: u8 },

    /// A `^U` escape does not name a usable character.
    #[error("escape at offset {position} decodes to invalid code point 0x{value:04X}")]
    InvalidCodePoint { position: usize, value: u16 },

    /// A file version is not a decimal number in 1..=32767.
    #[error("invalid file version '{text}' at offset {position}")]
    InvalidVersion { position: usize, text: String },

    /// The current working directory could not be read or canonicalized.
    #[error("cannot resolve current directory: {0}")]
    CurrentDir(#[from] std::io::Error),

    /// The current working directory is not valid UTF-8.
    #[error("current directory is not valid UTF-8: {0:?}")]
    NonUtf8CurrentDir(PathBuf),
}

impl TranslateError {
    /// True when the input should be treated as an ordinary path rather than
    /// a broken filespec.
    pub fn is_not_filespec(&self) -> bool {
        matches!(self, TranslateError::NotFilespec)
    }
}
