//! Fixed ODS-5 character classes.

/// Characters that may never appear in an ODS-5 name, escaped or not.
pub const FORBIDDEN: &[char] = &['"', '*', '\\', '<', '>', '/', '?', '|'];

/// `FORBIDDEN` written as the body of a regex character class.
pub(crate) const FORBIDDEN_CLASS: &str = r#""*\\<>/?|"#;

/// Punctuation that is only legal immediately after a `^`.
pub const ESCAPE_ONLY: &[char] = &['+', ',', ';', '[', ']', '%', ':', '^', '&', ' '];

/// The shape of escape introduced by the character following a `^`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeClass {
    /// `^c` stands for `c` itself (`^_` stands for a space).
    Literal,
    /// `^hh`, one byte as two hex digits.
    HexByte,
    /// `^Uhhhh`, a 16-bit value as four hex digits.
    CodePoint,
}

/// Classify the character following a `^`, or `None` if it cannot start an
/// escape.
pub fn escape_class(c: char) -> Option<EscapeClass> {
    match c {
        'U' => Some(EscapeClass::CodePoint),
        '.' | '_' => Some(EscapeClass::Literal),
        c if c.is_ascii_hexdigit() => Some(EscapeClass::HexByte),
        c if ESCAPE_ONLY.contains(&c) => Some(EscapeClass::Literal),
        _ => None,
    }
}

/// True for characters that must be written with a leading `^`.
pub fn is_escape_only(c: char) -> bool {
    ESCAPE_ONLY.contains(&c)
}

pub fn is_forbidden(c: char) -> bool {
    FORBIDDEN.contains(&c)
}
