//! Embedded math in article markup.
//!
//! A [`Formula`] is one math span found in a piece of text, classified as
//! [`FormulaKind::Inline`] (`$...$`) or [`FormulaKind::Display`] (`$$...$$`,
//! `\[...\]` and the `equation`, `align`, `gather`, `multline` and `eqnarray`
//! environments, starred or not).
//!
//! ```
//! use scriptorium_math::{FormulaKind, extract_formulas};
//!
//! let formulas = extract_formulas(r"Let $x$ satisfy $$x = 1$$.");
//! assert_eq!(formulas.len(), 2);
//! assert_eq!(formulas[0].kind, FormulaKind::Inline);
//! assert_eq!(formulas[1].content, "x = 1");
//! assert_eq!(formulas[1].position, 16);
//! ```

use serde::{Deserialize, Serialize};

pub mod extract;

pub use extract::{SplitFormulas, extract_formulas, split_formulas};

/// How a formula is typeset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaKind {
    /// Embedded in running text.
    Inline,
    /// Set on its own line or in a math environment.
    Display,
}

/// A math span extracted from text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    /// Inner text with delimiters removed and surrounding whitespace trimmed.
    pub content: String,
    pub kind: FormulaKind,
    /// Byte offset of the opening delimiter in the scanned text.
    pub position: usize,
}

/// Collapses every whitespace run to one space and trims the ends.
///
/// Two formulas are considered the same when their normalized forms are equal.
pub fn normalize_formula(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}
