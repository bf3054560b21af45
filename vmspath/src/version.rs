//! Telling file versions apart from numeric extensions.
//!
//! `foo.1.2.3` names the file `foo.1.2` at version 3, while `FILE.1` is a
//! file with extension `1`. Versions are validated and then dropped; they
//! never reach the translated path.

use crate::escape::{decode_name, Decoded};
use crate::grammar::Span;
use crate::TranslateError;

/// Highest legal file version.
pub const MAX_VERSION: u16 = 32767;

/// What the text after the last dot turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// A version number. `trim_dot` asks for the filename's trailing dot to
    /// be removed as well (`foo..1` is `foo.` at version 1).
    Version { trim_dot: bool },
    /// A decoded extension.
    Extension(String),
}

/// Parse a decimal file version in `1..=MAX_VERSION`.
pub fn parse_version(digits: &str, offset: usize) -> Result<u16, TranslateError> {
    let invalid = || TranslateError::InvalidVersion {
        position: offset,
        text: digits.to_string(),
    };

    if !is_numeric(digits) {
        return Err(invalid());
    }
    match digits.parse::<u16>() {
        Ok(v) if (1..=MAX_VERSION).contains(&v) => Ok(v),
        _ => Err(invalid()),
    }
}

/// Decide between version and extension for the text after the last dot.
///
/// `name` is the already decoded filename (empty if there is none).
/// `versioned` is set when a `;version` follows, in which case the text is
/// always an extension.
pub fn resolve_suffix(
    name: &Decoded,
    extension: Span<'_>,
    versioned: bool,
) -> Result<Suffix, TranslateError> {
    if !versioned && is_numeric(extension.text) {
        if let Some(trim_dot) = numeric_is_version(name) {
            parse_version(extension.text, extension.offset)?;
            return Ok(Suffix::Version { trim_dot });
        }
    }

    let decoded = decode_name(extension.text, extension.offset)?;
    Ok(Suffix::Extension(decoded.text))
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A numeric suffix is a version when the filename already holds a dot:
/// either with text after it, or as an unescaped trailing dot that then has
/// to go. `foo^2E.5` keeps `.5`, since its dot came from an escape.
fn numeric_is_version(name: &Decoded) -> Option<bool> {
    let dot = name.text.rfind('.')?;
    if dot + 1 < name.text.len() {
        Some(false)
    } else if name.trailing_dot {
        Some(true)
    } else {
        None
    }
}
