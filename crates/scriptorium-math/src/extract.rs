//! Formula extraction.
//!
//! ## Algorithm
//!
//! 1. Every display pattern is matched against the original text. Candidates
//!    are ordered by start offset (longest first on ties) and accepted
//!    greedily, so accepted display spans never overlap.
//! 2. The accepted spans are cut out of a working copy of the text.
//! 3. Inline `$...$` spans are matched in the working copy, and their offsets
//!    are mapped back onto the original text.
//! 4. The result is sorted by position.
//!
//! Removing display spans before the inline scan keeps the `$` signs of a
//! `$$...$$` block from being read as two inline formulas. Unterminated
//! delimiters never match and stay in the text.
//!
//! A dollar escaped with a backslash (`\$`) is a literal dollar sign and
//! never opens or closes a formula. Matching runs on a masked copy where
//! such dollars are blanked out; contents are always sliced from the
//! unmasked text.

use crate::{Formula, FormulaKind, normalize_formula};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::ops::Range;

const DISPLAY_ENVIRONMENTS: [&str; 5] = ["equation", "align", "gather", "multline", "eqnarray"];

static DISPLAY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let mut patterns = vec![
        Regex::new(r"\$\$([^\$]+)\$\$").expect("display dollar pattern"),
        Regex::new(r"\\\[([^\]]+)\\\]").expect("display bracket pattern"),
    ];
    for env in DISPLAY_ENVIRONMENTS {
        let pattern = format!(r"(?s)\\begin\{{{env}\*?\}}(.*?)\\end\{{{env}\*?\}}");
        patterns.push(Regex::new(&pattern).expect("display environment pattern"));
    }
    patterns
});

static INLINE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$([^\$]+)\$").expect("inline dollar pattern"));

/// Replaces every backslash-escaped `$` with a space. The result has the
/// same byte length as `text`. `\\$` is an escaped backslash followed by a
/// real dollar.
fn mask_escaped_dollars(text: &str) -> Cow<'_, str> {
    if !text.contains("\\$") {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            match chars.next() {
                Some('$') => out.push(' '),
                Some(next) => out.push(next),
                None => {}
            }
        }
    }
    Cow::Owned(out)
}

/// A display match in the original text.
struct DisplaySpan {
    span: Range<usize>,
    content: String,
}

fn display_spans(text: &str) -> Vec<DisplaySpan> {
    let masked = mask_escaped_dollars(text);
    let mut candidates: Vec<DisplaySpan> = Vec::new();
    for pattern in DISPLAY_PATTERNS.iter() {
        for caps in pattern.captures_iter(&masked) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            candidates.push(DisplaySpan {
                span: whole.range(),
                content: text[inner.range()].trim().to_string(),
            });
        }
    }
    candidates.sort_by_key(|c| (c.span.start, Reverse(c.span.end)));

    let mut accepted: Vec<DisplaySpan> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if accepted
            .last()
            .is_some_and(|prev| candidate.span.start < prev.span.end)
        {
            continue;
        }
        accepted.push(candidate);
    }
    accepted
}

/// The text with display spans cut out, plus the offset bookkeeping needed to
/// map a position in it back onto the original.
struct WorkingCopy {
    text: String,
    /// `(working_start, original_start)` of each kept, non-empty segment.
    segments: Vec<(usize, usize)>,
}

impl WorkingCopy {
    fn without(original: &str, removed: &[DisplaySpan]) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut segments = Vec::with_capacity(removed.len() + 1);
        let mut cursor = 0;
        let ends = removed
            .iter()
            .map(|d| d.span.clone())
            .chain(std::iter::once(original.len()..original.len()));
        for span in ends {
            if span.start > cursor {
                segments.push((text.len(), cursor));
                text.push_str(&original[cursor..span.start]);
            }
            cursor = span.end;
        }
        Self { text, segments }
    }

    fn original_offset(&self, working: usize) -> usize {
        let idx = self.segments.partition_point(|(start, _)| *start <= working);
        match idx.checked_sub(1).and_then(|i| self.segments.get(i)) {
            Some((work_start, orig_start)) => orig_start + (working - work_start),
            None => working,
        }
    }
}

/// Extracts every formula in `text`, ordered by position.
pub fn extract_formulas(text: &str) -> Vec<Formula> {
    let display = display_spans(text);
    let working = WorkingCopy::without(text, &display);

    let mut formulas: Vec<Formula> = display
        .iter()
        .map(|d| Formula {
            content: d.content.clone(),
            kind: FormulaKind::Display,
            position: d.span.start,
        })
        .collect();

    let scan = mask_escaped_dollars(&working.text);
    for caps in INLINE_PATTERN.captures_iter(&scan) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        formulas.push(Formula {
            content: working.text[inner.range()].trim().to_string(),
            kind: FormulaKind::Inline,
            position: working.original_offset(whole.start()),
        });
    }

    formulas.sort_by_key(|f| f.position);
    formulas
}

/// Normalized formula contents of a text, split by kind, each in position order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitFormulas {
    pub inline: Vec<String>,
    pub display: Vec<String>,
}

/// Extracts the formulas of `text` and normalizes their contents with
/// [`normalize_formula`].
pub fn split_formulas(text: &str) -> SplitFormulas {
    let mut split = SplitFormulas::default();
    for formula in extract_formulas(text) {
        let normalized = normalize_formula(&formula.content);
        match formula.kind {
            FormulaKind::Inline => split.inline.push(normalized),
            FormulaKind::Display => split.display.push(normalized),
        }
    }
    split
}
