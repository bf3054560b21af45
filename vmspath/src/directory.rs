//! Directory chain translation: `DIR1.DIR2.-` becomes `DIR1/DIR2/../`.

use crate::escape::{self, TokenKind};
use crate::TranslateError;

/// A directory body is relative to the current directory when it is empty
/// or begins with an unescaped `.` (`[.SUB]`, `[]`).
pub fn is_relative(body: &str) -> bool {
    body.is_empty() || body.starts_with('.')
}

/// Translate a directory body (the text between the delimiters) into a
/// slash-terminated path fragment.
///
/// Unescaped dots separate segments and empty segments are dropped. Escaped
/// dots stay inside their segment. A `-` in front of a separator moves up a
/// level.
///
/// # Examples
///
/// ```
/// use vmspath::translate_directory;
///
/// assert_eq!(translate_directory("DIR1.DIR2", 0).unwrap(), "DIR1/DIR2/");
/// assert_eq!(translate_directory(".SUB", 0).unwrap(), "SUB/");
/// assert_eq!(translate_directory("-.LIB", 0).unwrap(), "../LIB/");
/// assert_eq!(translate_directory("V1^.2", 0).unwrap(), "V1.2/");
/// ```
pub fn translate_directory(body: &str, offset: usize) -> Result<String, TranslateError> {
    let tokens = escape::scan(body, offset)?;

    let mut fragment = String::with_capacity(body.len() + 1);
    // Escapes are paired left to right, so `^^.` is an escaped caret and
    // then a separator. Looking only at the character before the dot would
    // keep it literal.
    for segment in tokens.split(|t| t.kind == TokenKind::Dot) {
        if segment.is_empty() {
            continue;
        }
        escape::render(body, segment, &mut fragment);
        fragment.push('/');
    }

    Ok(fragment.replace("-/", "../"))
}
