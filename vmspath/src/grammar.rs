//! Top-level filespec grammar.
//!
//! A filespec is `device:[directory]filename.extension;version`, every part
//! optional as far as the pattern is concerned. Two anchored grammars are
//! tried: the full form, which requires the extension dot, and a reduced
//! form with no extension or version at all.
//!
//! The extension pattern takes everything after the last dot, `;version`
//! included. The version is then split off at the last `;` that is not
//! escaped, so `TXT^;1` is an extension and `TXT;1` is not.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::charset::FORBIDDEN_CLASS;
use crate::TranslateError;

lazy_static! {
    static ref FULL: Regex = Regex::new(&anchored(&format!(
        r"(?P<name>[^{f}]+)?(?P<ext>\.(?P<ext_body>[^{f}]+)?)",
        f = FORBIDDEN_CLASS
    )))
    .unwrap();
    static ref REDUCED: Regex =
        Regex::new(&anchored(&format!(r"(?P<name>[^{f}]+)", f = FORBIDDEN_CLASS))).unwrap();
}

/// Prefix `tail` with the device and directory patterns shared by both
/// grammars and anchor the whole thing.
fn anchored(tail: &str) -> String {
    format!(
        r"^(?:(?P<device>[^\[\]{f}]+):)?(?:(?P<open>[\[<])(?P<dir>[^{f}]*)(?P<close>[\]>]))?{tail}$",
        f = FORBIDDEN_CLASS,
        tail = tail,
    )
}

/// A slice of the input and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directory<'a> {
    pub open: char,
    pub close: char,
    /// Text between the delimiters.
    pub body: Span<'a>,
}

/// The recognised parts of a filespec, still undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedComponents<'a> {
    /// Device name without its terminating colon.
    pub device: Option<Span<'a>>,
    pub directory: Directory<'a>,
    pub name: Option<Span<'a>>,
    /// Extension text after the dot, up to the version separator. `None`
    /// when the reduced grammar matched or only a version follows the dot.
    pub extension: Option<Span<'a>>,
    /// Text after the version `;`, still unvalidated. Empty for `FILE.TXT;`.
    pub version: Option<Span<'a>>,
}

/// Split `input` into its filespec components.
///
/// Fails with [`TranslateError::NotFilespec`] when neither grammar matches
/// with a directory present; any other error means the input is a filespec,
/// just a broken one.
pub fn match_filespec(input: &str) -> Result<ParsedComponents<'_>, TranslateError> {
    let caps = [&*FULL, &*REDUCED]
        .into_iter()
        .filter_map(|grammar| grammar.captures(input))
        .find(|caps| caps.name("open").is_some())
        .ok_or(TranslateError::NotFilespec)?;

    let parsed = from_captures(&caps)?;
    log::trace!("parsed {:?} as {:?}", input, parsed);
    Ok(parsed)
}

fn span<'a>(caps: &Captures<'a>, name: &str) -> Option<Span<'a>> {
    caps.name(name).map(|m| Span {
        text: m.as_str(),
        offset: m.start(),
    })
}

fn delimiter(caps: &Captures<'_>, name: &str) -> Option<char> {
    caps.name(name).and_then(|m| m.as_str().chars().next())
}

fn from_captures<'a>(caps: &Captures<'a>) -> Result<ParsedComponents<'a>, TranslateError> {
    let (open, close) = match (delimiter(caps, "open"), delimiter(caps, "close")) {
        (Some(open), Some(close)) => (open, close),
        _ => return Err(TranslateError::NotFilespec),
    };
    if !matches!((open, close), ('[', ']') | ('<', '>')) {
        return Err(TranslateError::MismatchedDelimiters { open, close });
    }

    let body = span(caps, "dir").ok_or(TranslateError::NotFilespec)?;
    if body.text == "." {
        return Err(TranslateError::Malformed {
            reason: "directory is a lone '.'",
        });
    }

    let suffix = span(caps, "ext_body");
    if caps.name("ext").is_some() && suffix.is_none() {
        return Err(TranslateError::Malformed {
            reason: "extension is a lone '.'",
        });
    }
    let (extension, version) = match suffix {
        Some(suffix) => split_version(suffix),
        None => (None, None),
    };

    Ok(ParsedComponents {
        device: span(caps, "device"),
        directory: Directory { open, close, body },
        name: span(caps, "name"),
        extension,
        version,
    })
}

/// Split `TXT;5` into the extension `TXT` and the version `5`.
///
/// A `;` behind an odd run of carets is escaped and splits nothing.
fn split_version(suffix: Span<'_>) -> (Option<Span<'_>>, Option<Span<'_>>) {
    let text = suffix.text;
    let Some(semi) = text.rfind(';') else {
        return (Some(suffix), None);
    };
    let carets = text[..semi].bytes().rev().take_while(|&b| b == b'^').count();
    if carets % 2 == 1 {
        return (Some(suffix), None);
    }

    let extension = (semi > 0).then(|| Span {
        text: &text[..semi],
        offset: suffix.offset,
    });
    let version = Span {
        text: &text[semi + 1..],
        offset: suffix.offset + semi + 1,
    };
    (extension, Some(version))
}
