//! Building the POSIX path from parsed components.
//!
//! Assembly runs a fixed list of stages over a working path that starts out
//! as the canonical current directory. Each stage handles one component and
//! the first failure ends the translation.

use crate::directory::{is_relative, translate_directory};
use crate::escape::{decode_name, Decoded};
use crate::grammar::ParsedComponents;
use crate::version::{parse_version, resolve_suffix, Suffix};
use crate::TranslateError;

struct Assembly {
    path: String,
    /// The decoded filename, kept for the version/extension decision.
    name: Decoded,
}

type Stage = fn(&mut Assembly, &ParsedComponents<'_>) -> Result<(), TranslateError>;

const STAGES: [(&str, Stage); 4] = [
    ("device", anchor_device),
    ("directory", splice_directory),
    ("filename", append_filename),
    ("extension", append_extension),
];

/// Translate `parsed` relative to `cwd`, an absolute POSIX path.
pub(crate) fn assemble(parsed: &ParsedComponents<'_>, cwd: &str) -> Result<String, TranslateError> {
    let mut assembly = Assembly {
        path: cwd.to_string(),
        name: Decoded::default(),
    };

    for (stage_name, stage) in STAGES {
        if let Err(e) = stage(&mut assembly, parsed) {
            log::debug!("{} stage rejected filespec: {}", stage_name, e);
            return Err(e);
        }
    }

    Ok(assembly.path)
}

/// Byte index just past the slash that ends the first segment of `path`.
fn first_segment_end(path: &str) -> Option<usize> {
    path.get(1..)?.find('/').map(|i| i + 2)
}

/// `DISK:` replaces the first segment of the current directory.
fn anchor_device(a: &mut Assembly, p: &ParsedComponents<'_>) -> Result<(), TranslateError> {
    if let Some(device) = p.device {
        let decoded = translate_directory(device.text, device.offset)?;
        let rest = first_segment_end(&a.path).unwrap_or(a.path.len());
        a.path = format!("/{}{}", decoded, &a.path[rest..]);
    }
    if !a.path.ends_with('/') {
        a.path.push('/');
    }
    Ok(())
}

/// `[DIR]` hangs off the first segment; `[.DIR]` and `[]` stay where we are.
fn splice_directory(a: &mut Assembly, p: &ParsedComponents<'_>) -> Result<(), TranslateError> {
    let body = p.directory.body;
    let fragment = translate_directory(body.text, body.offset)?;
    if !is_relative(body.text) {
        a.path.truncate(first_segment_end(&a.path).unwrap_or(1));
    }
    a.path.push_str(&fragment);
    Ok(())
}

fn append_filename(a: &mut Assembly, p: &ParsedComponents<'_>) -> Result<(), TranslateError> {
    if let Some(name) = p.name {
        a.name = decode_name(name.text, name.offset)?;
        a.path.push_str(&a.name.text);
    }
    Ok(())
}

fn append_extension(a: &mut Assembly, p: &ParsedComponents<'_>) -> Result<(), TranslateError> {
    if let Some(version) = p.version.filter(|v| !v.text.is_empty()) {
        parse_version(version.text, version.offset)?;
    }

    let Some(extension) = p.extension else {
        return Ok(());
    };
    match resolve_suffix(&a.name, extension, p.version.is_some())? {
        Suffix::Version { trim_dot: true } => {
            if a.name.text.len() == 1 {
                return Err(TranslateError::Malformed {
                    reason: "filename is a lone '.' before a version",
                });
            }
            a.path.pop();
        }
        Suffix::Version { trim_dot: false } => {}
        Suffix::Extension(text) => {
            a.path.push('.');
            a.path.push_str(&text);
        }
    }
    Ok(())
}
