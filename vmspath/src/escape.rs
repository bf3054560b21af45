//! Caret escape decoding.
//!
//! Decoding happens in two passes. `scan` walks the raw component once,
//! read-only, and produces a plan of tokens: runs of plain text, unescaped
//! dots, and escape sequences paired with the character they resolve to.
//! The renderers then build a fresh output buffer from that plan, so escapes
//! of different widths never shift the offsets of later ones.
//!
//! Escape shapes:
//!
//! - `^c` for `c` in the literal set (`^_` is a space)
//! - `^hh`, a byte given as two hex digits
//! - `^Uhhhh`, a 16-bit value given as four hex digits
//!
//! Hex digits are accepted in either case. Anything that decodes to
//! 0x00..=0x1F is rejected.

use std::ops::Range;

use crate::charset::{self, EscapeClass};
use crate::TranslateError;

/// One step of the decoding plan. Spans are byte offsets into the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub span: Range<usize>,
    pub kind: TokenKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// Text copied through unchanged.
    Plain,
    /// An unescaped `.`.
    Dot,
    /// An escape sequence and the character it stands for.
    Escape(char),
}

/// A decoded filename or extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// The component ended in an unescaped `.`.
    pub trailing_dot: bool,
}

/// Validate `component` and plan its decoding.
///
/// `offset` is the position of `component` within the whole filespec and is
/// only used to report error positions.
pub(crate) fn scan(component: &str, offset: usize) -> Result<Vec<Token>, TranslateError> {
    let mut tokens = Vec::new();
    let mut plain_start: Option<usize> = None;
    let mut chars = component.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '^' => {
                flush_plain(&mut tokens, &mut plain_start, i);
                let (len, resolved) = read_escape(component, i, offset)?;
                tokens.push(Token {
                    span: i..i + len,
                    kind: TokenKind::Escape(resolved),
                });
                while chars.next_if(|&(j, _)| j < i + len).is_some() {}
            }
            '.' => {
                flush_plain(&mut tokens, &mut plain_start, i);
                tokens.push(Token {
                    span: i..i + 1,
                    kind: TokenKind::Dot,
                });
            }
            c if charset::is_forbidden(c) => {
                return Err(TranslateError::ForbiddenCharacter {
                    position: offset + i,
                    character: c,
                });
            }
            c if charset::is_escape_only(c) => {
                return Err(TranslateError::InvalidEscape {
                    position: offset + i,
                });
            }
            _ => {
                plain_start.get_or_insert(i);
            }
        }
    }
    flush_plain(&mut tokens, &mut plain_start, component.len());

    Ok(tokens)
}

fn flush_plain(tokens: &mut Vec<Token>, plain_start: &mut Option<usize>, end: usize) {
    if let Some(start) = plain_start.take() {
        tokens.push(Token {
            span: start..end,
            kind: TokenKind::Plain,
        });
    }
}

/// Read the escape whose `^` sits at byte `at`. Returns its width in bytes
/// and the character it resolves to.
fn read_escape(component: &str, at: usize, offset: usize) -> Result<(usize, char), TranslateError> {
    let position = offset + at;
    let rest = &component[at + 1..];
    let lead = rest
        .chars()
        .next()
        .ok_or(TranslateError::InvalidEscape { position })?;

    match charset::escape_class(lead) {
        Some(EscapeClass::Literal) => Ok((2, if lead == '_' { ' ' } else { lead })),
        Some(EscapeClass::HexByte) => {
            let value = hex_value(rest.get(..2), position)?;
            Ok((3, byte_char(value as u8, position)?))
        }
        Some(EscapeClass::CodePoint) => {
            let value = hex_value(rest.get(1..5), position)?;
            Ok((6, code_point_char(value as u16, position)?))
        }
        None => Err(TranslateError::InvalidEscape { position }),
    }
}

fn hex_value(digits: Option<&str>, position: usize) -> Result<u32, TranslateError> {
    match digits {
        Some(d) if d.chars().all(|c| c.is_ascii_hexdigit()) => {
            u32::from_str_radix(d, 16).map_err(|_| TranslateError::InvalidEscape { position })
        }
        _ => Err(TranslateError::InvalidEscape { position }),
    }
}

/// Bytes at or above 0x80 are taken as Latin-1.
fn byte_char(value: u8, position: usize) -> Result<char, TranslateError> {
    if value < 0x20 {
        return Err(TranslateError::ControlCharacter { position, value });
    }
    Ok(char::from(value))
}

fn code_point_char(value: u16, position: usize) -> Result<char, TranslateError> {
    let [high, low] = value.to_be_bytes();
    if high == 0 {
        return byte_char(low, position);
    }

    // A two-byte UTF-8 sequence (`^Uc2bc` is U+00BC) wins over the code
    // unit reading. Either way the choice is logged.
    if let Some(c) = std::str::from_utf8(&[high, low]).ok().and_then(single_char) {
        log::debug!(
            "^U{:04X} at offset {} read as a UTF-8 pair: U+{:04X}",
            value,
            position,
            c as u32
        );
        return Ok(c);
    }

    let c = char::from_u32(u32::from(value))
        .ok_or(TranslateError::InvalidCodePoint { position, value })?;
    log::debug!("^U{:04X} at offset {} read as a code unit", value, position);
    Ok(c)
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Concatenate a token run, writing unescaped dots back as `.`.
pub(crate) fn render(component: &str, tokens: &[Token], out: &mut String) {
    for token in tokens {
        match token.kind {
            TokenKind::Plain => out.push_str(&component[token.span.clone()]),
            TokenKind::Dot => out.push('.'),
            TokenKind::Escape(c) => out.push(c),
        }
    }
}

/// Decode a filename, extension or other non-directory component.
///
/// # Examples
///
/// ```
/// use vmspath::decode_name;
///
/// assert_eq!(decode_name("FOO^20BAR", 0).unwrap().text, "FOO BAR");
/// assert_eq!(decode_name("a^_b^.c", 0).unwrap().text, "a b.c");
/// assert!(decode_name("bad^01", 0).is_err());
/// ```
pub fn decode_name(component: &str, offset: usize) -> Result<Decoded, TranslateError> {
    let tokens = scan(component, offset)?;
    let mut text = String::with_capacity(component.len());
    render(component, &tokens, &mut text);
    let trailing_dot = tokens
        .last()
        .is_some_and(|t| t.kind == TokenKind::Dot);

    Ok(Decoded { text, trailing_dot })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> Result<String, TranslateError> {
        decode_name(s, 0).map(|d| d.text)
    }

    // ==================== Literal escapes ====================

    #[test]
    fn literal_escapes_resolve_to_themselves() {
        assert_eq!(decode("a^&b").unwrap(), "a&b");
        assert_eq!(decode("a^+b^,c").unwrap(), "a+b,c");
        assert_eq!(decode("x^;1").unwrap(), "x;1");
        assert_eq!(decode("^[x^]").unwrap(), "[x]");
        assert_eq!(decode("50^%").unwrap(), "50%");
        assert_eq!(decode("c^:d").unwrap(), "c:d");
        assert_eq!(decode("^^").unwrap(), "^");
        assert_eq!(decode("a^ b").unwrap(), "a b");
    }

    #[test]
    fn underscore_escape_is_space() {
        assert_eq!(decode("FOO^_BAR").unwrap(), "FOO BAR");
        assert_eq!(decode("FOO^_BAR").unwrap(), decode("FOO^20BAR").unwrap());
        // A bare underscore stays an underscore
        assert_eq!(decode("FOO_BAR").unwrap(), "FOO_BAR");
    }

    #[test]
    fn escaped_dot_is_not_a_separator() {
        let tokens = scan("a^.b", 0).unwrap();
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Dot));
        assert_eq!(decode("a^.b").unwrap(), "a.b");
    }

    // ==================== Byte escapes ====================

    #[test]
    fn hex_byte_escapes() {
        assert_eq!(decode("^20").unwrap(), " ");
        assert_eq!(decode("^41^42").unwrap(), "AB");
        assert_eq!(decode("^7E").unwrap(), "~");
        assert_eq!(decode("^2E").unwrap(), ".");
    }

    #[test]
    fn hex_digits_are_case_insensitive() {
        assert_eq!(decode("^5a").unwrap(), decode("^5A").unwrap());
        assert_eq!(decode("^5a").unwrap(), "Z");
        assert_eq!(decode("^e9").unwrap(), "\u{e9}");
    }

    #[test]
    fn high_bytes_are_latin1() {
        assert_eq!(decode("caf^E9").unwrap(), "caf\u{e9}");
        assert_eq!(decode("^FF").unwrap(), "\u{ff}");
    }

    #[test]
    fn control_bytes_are_rejected() {
        for s in ["^00", "^0A", "^1F", "x^1fy"] {
            assert!(
                matches!(decode(s), Err(TranslateError::ControlCharacter { .. })),
                "{s} should be rejected"
            );
        }
        assert!(decode("^7F").is_ok());
    }

    #[test]
    fn malformed_hex_escapes() {
        assert!(matches!(decode("^4"), Err(TranslateError::InvalidEscape { .. })));
        assert!(matches!(decode("^4G"), Err(TranslateError::InvalidEscape { .. })));
        assert!(matches!(decode("^G4"), Err(TranslateError::InvalidEscape { .. })));
    }

    // ==================== Code-point escapes ====================

    #[test]
    fn code_point_ascii_and_latin1() {
        assert_eq!(decode("^U0041").unwrap(), "A");
        assert_eq!(decode("^U00e9").unwrap(), "\u{e9}");
        assert!(matches!(
            decode("^U001F"),
            Err(TranslateError::ControlCharacter { value: 0x1f, .. })
        ));
    }

    #[test]
    fn code_point_utf8_pair() {
        assert_eq!(decode("^Uc2bc^.foo").unwrap(), "\u{bc}.foo");
        assert_eq!(decode("^UC3A9").unwrap(), "\u{e9}");
    }

    #[test]
    fn code_point_falls_back_to_code_unit() {
        assert_eq!(decode("^U4E2D").unwrap(), "\u{4e2d}");
        assert_eq!(decode("^U20AC").unwrap(), "\u{20ac}");
        assert!(matches!(
            decode("^UD800"),
            Err(TranslateError::InvalidCodePoint { value: 0xd800, .. })
        ));
    }

    #[test]
    fn malformed_code_point_escapes() {
        assert!(decode("^U12").is_err());
        assert!(decode("^U12G4").is_err());
        assert!(decode("^u0041").is_err());
        assert!(decode("^U+123").is_err());
    }

    // ==================== Validation ====================

    #[test]
    fn caret_needs_a_valid_follower() {
        assert!(matches!(decode("a^"), Err(TranslateError::InvalidEscape { position: 1 })));
        assert!(matches!(decode("a^-b"), Err(TranslateError::InvalidEscape { .. })));
        assert!(matches!(decode("a^é"), Err(TranslateError::InvalidEscape { .. })));
    }

    #[test]
    fn escape_only_characters_must_be_escaped() {
        for s in ["a b", "a;b", "a,b", "a&b", "a]b", "c:d"] {
            assert!(
                matches!(decode(s), Err(TranslateError::InvalidEscape { .. })),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn forbidden_characters_are_rejected() {
        assert!(matches!(
            decode("a*b"),
            Err(TranslateError::ForbiddenCharacter { character: '*', position: 1 })
        ));
    }

    #[test]
    fn error_positions_include_offset() {
        assert!(matches!(
            decode_name("ab^01", 10),
            Err(TranslateError::ControlCharacter { position: 12, value: 1 })
        ));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode("").unwrap(), "");
        assert_eq!(decode("FILE-1$X").unwrap(), "FILE-1$X");
        assert_eq!(decode("名前").unwrap(), "名前");
    }

    #[test]
    fn trailing_dot_tracks_unescaped_dots_only() {
        assert!(decode_name("foo.", 0).unwrap().trailing_dot);
        assert!(!decode_name("foo^.", 0).unwrap().trailing_dot);
        assert!(!decode_name("foo^2E", 0).unwrap().trailing_dot);
        assert!(!decode_name("foo", 0).unwrap().trailing_dot);
    }

    #[test]
    fn scan_plan_spans() {
        let tokens = scan("ab^20.c", 0).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token { span: 0..2, kind: TokenKind::Plain },
                Token { span: 2..5, kind: TokenKind::Escape(' ') },
                Token { span: 5..6, kind: TokenKind::Dot },
                Token { span: 6..7, kind: TokenKind::Plain },
            ]
        );
    }
}
