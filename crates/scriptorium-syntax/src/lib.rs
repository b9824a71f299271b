//! # Scriptorium Syntax
//!
//! A lossless, fault-tolerant parser for the LaTeX-like markup of scientific
//! articles. The tree keeps every byte of the input, so byte ranges taken from
//! it can be used to splice or slice the original text.
//!
//! Only the constructs the document engine cares about become nodes:
//!
//! - braced groups `{ ... }` and optional arguments `[ ... ]`
//! - environments `\begin{...} ... \end{...}`
//! - headings `\section`, `\subsection`, `\subsubsection` (optionally starred)
//! - inclusion directives `\input{...}` and `\include{...}`
//!
//! Everything else is kept as flat tokens.
//!
//! ```
//! use scriptorium_syntax::{outline, parse};
//!
//! let tree = parse(r"\section{Intro} Hello \subsection*{Details} World").syntax();
//! let headings = outline::headings(&tree);
//! assert_eq!(headings.len(), 2);
//! assert_eq!(headings[1].title, "Details");
//! assert!(headings[1].starred);
//! ```

pub mod comments;
pub mod lexer;
pub mod outline;
pub mod parser;

#[cfg(test)]
mod coverage_tests;

pub use comments::strip_comments;
pub use parser::parse;
use rowan::Language;
pub use rowan::{TextRange, TextSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    LBrace = 0,
    RBrace,
    LBracket,
    RBracket,
    Star,    // * directly after a heading command
    Dollar,  // $
    Command, // \section, \input, \\, \%
    Whitespace,
    Comment, // % ... (up to, not including, the line break)
    Text,
    Error,

    // Composite nodes
    Root,
    Group,       // { ... }
    Optional,    // [ ... ] after a heading command
    Environment, // \begin{...} ... \end{...}
    Heading,     // \section{...}, \subsection{...}, \subsubsection{...}
    Include,     // \input{...}, \include{...}

    Eof,
}

impl SyntaxKind {
    const ALL: [SyntaxKind; 18] = [
        SyntaxKind::LBrace,
        SyntaxKind::RBrace,
        SyntaxKind::LBracket,
        SyntaxKind::RBracket,
        SyntaxKind::Star,
        SyntaxKind::Dollar,
        SyntaxKind::Command,
        SyntaxKind::Whitespace,
        SyntaxKind::Comment,
        SyntaxKind::Text,
        SyntaxKind::Error,
        SyntaxKind::Root,
        SyntaxKind::Group,
        SyntaxKind::Optional,
        SyntaxKind::Environment,
        SyntaxKind::Heading,
        SyntaxKind::Include,
        SyntaxKind::Eof,
    ];
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScriptoriumLanguage {}

impl Language for ScriptoriumLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::ALL
            .get(usize::from(raw.0))
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<ScriptoriumLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<ScriptoriumLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<ScriptoriumLanguage>;
