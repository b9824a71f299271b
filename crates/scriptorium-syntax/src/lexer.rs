use crate::SyntaxKind;

/// A lexer for article markup.
///
/// ## Overview
///
/// The lexer scans the source character by character and yields
/// ([`SyntaxKind`], `&str`) pairs whose concatenation is exactly the input.
/// It recognises:
///
/// - **Commands**: `\section`, `\input`, and one-symbol escapes such as `\%`,
///   `\$` and `\\`
/// - **Delimiters**: `{`, `}`, `[`, `]`, `*` and the math shift `$`
/// - **Comments**: an unescaped `%` up to the end of the physical line; the
///   line break itself is not part of the comment
/// - **Whitespace** runs and **Text** runs
///
/// Because `\%` is lexed as a command, an escaped percent sign never starts a
/// comment. `\\%` is a line break command followed by a real comment.
///
/// ## Examples
///
/// ```
/// use scriptorium_syntax::lexer::Lexer;
/// use scriptorium_syntax::SyntaxKind;
///
/// let tokens: Vec<_> = Lexer::new(r"\section*{Hi} % note").collect();
///
/// assert_eq!(tokens[0], (SyntaxKind::Command, r"\section"));
/// assert_eq!(tokens[1], (SyntaxKind::Star, "*"));
/// assert_eq!(tokens[6], (SyntaxKind::Comment, "% note"));
/// ```
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Byte offset of the next token.
    pub fn offset(&self) -> usize {
        self.position
    }

    /// Returns the next token (kind, text), or `(SyntaxKind::Eof, "")` at the end.
    pub fn next_token(&mut self) -> (SyntaxKind, &'a str) {
        let start = self.position;
        let Some(c) = self.input[start..].chars().next() else {
            return (SyntaxKind::Eof, "");
        };
        self.position += c.len_utf8();

        let kind = match c {
            '\\' => {
                match self.peek_char() {
                    Some(next) if next.is_alphabetic() => {
                        self.eat_while(char::is_alphabetic);
                    }
                    Some(next) => {
                        // One-symbol command: \% \$ \\ \[ \]
                        self.position += next.len_utf8();
                    }
                    None => {}
                }
                SyntaxKind::Command
            }
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            '*' => SyntaxKind::Star,
            '$' => SyntaxKind::Dollar,
            '%' => {
                self.eat_while(|n| n != '\n' && n != '\r');
                SyntaxKind::Comment
            }
            c if c.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                SyntaxKind::Whitespace
            }
            _ => {
                self.eat_while(|n| {
                    !matches!(n, '\\' | '{' | '}' | '[' | ']' | '*' | '%' | '$')
                        && !n.is_whitespace()
                });
                SyntaxKind::Text
            }
        };

        (kind, &self.input[start..self.position])
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn eat_while(&mut self, mut keep: impl FnMut(char) -> bool) {
        while let Some(n) = self.peek_char() {
            if !keep(n) {
                break;
            }
            self.position += n.len_utf8();
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (SyntaxKind, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            (SyntaxKind::Eof, _) => None,
            token => Some(token),
        }
    }
}
