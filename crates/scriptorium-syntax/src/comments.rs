//! Comment removal.

use crate::SyntaxKind;
use crate::lexer::Lexer;

/// Removes every comment from `input`.
///
/// A comment runs from an unescaped `%` to the end of its physical line. The
/// line break is kept, so line numbers of the remaining text do not move.
///
/// ```
/// use scriptorium_syntax::strip_comments;
///
/// assert_eq!(strip_comments("a % note\n50\\% b"), "a \n50\\% b");
/// ```
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (kind, text) in Lexer::new(input) {
        if kind != SyntaxKind::Comment {
            out.push_str(text);
        }
    }
    out
}
