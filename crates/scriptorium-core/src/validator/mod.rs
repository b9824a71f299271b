//! Formula preservation checks between a section and its rewrite.
//!
//! Both texts are split into paragraphs on blank lines. When the paragraph
//! counts are close enough the paragraphs are compared pairwise by index;
//! otherwise the two whole texts are compared as a single paragraph.
//!
//! Inline formulas are compared as sets, so reordering them inside a
//! paragraph is allowed. Display formulas are compared as sequences.

mod diff;
mod marking;

pub use diff::formula_diff;
pub use marking::{latex_escape, mark_paragraph, mark_section};

use crate::config::ValidationConfig;
use crate::document::{Document, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use scriptorium_math::split_formulas;
use serde::Serialize;
use std::collections::BTreeSet;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern"));

/// Splits `text` on blank lines. Paragraphs are trimmed and empty ones dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// What a [`ParagraphValidation`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationScope {
    Paragraph,
    /// Paragraphs could not be aligned and the whole texts were compared.
    WholeSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParagraphValidation {
    pub paragraph_index: usize,
    pub scope: ValidationScope,
    pub source_inline: Vec<String>,
    pub target_inline: Vec<String>,
    pub source_display: Vec<String>,
    pub target_display: Vec<String>,
    pub inline_ok: bool,
    pub display_ok: bool,
    /// Present exactly when a check failed.
    pub diff: Option<String>,
}

impl ParagraphValidation {
    /// Compares the normalized formulas of two texts.
    pub fn compare(index: usize, scope: ValidationScope, source: &str, target: &str) -> Self {
        let src = split_formulas(source);
        let tgt = split_formulas(target);

        let inline_ok = src.inline.iter().collect::<BTreeSet<_>>()
            == tgt.inline.iter().collect::<BTreeSet<_>>();
        let display_ok = src.display == tgt.display;
        let diff = (!inline_ok || !display_ok)
            .then(|| formula_diff(&src.inline, &tgt.inline, &src.display, &tgt.display));

        Self {
            paragraph_index: index,
            scope,
            source_inline: src.inline,
            target_inline: tgt.inline,
            source_display: src.display,
            target_display: tgt.display,
            inline_ok,
            display_ok,
            diff,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.inline_ok && self.display_ok
    }
}

/// Problems found in one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionValidation {
    pub section_id: String,
    pub problems: Vec<ParagraphValidation>,
}

#[derive(Debug, Clone)]
pub struct FormulaValidator {
    paragraph_tolerance: usize,
}

impl Default for FormulaValidator {
    fn default() -> Self {
        Self::from_config(&ValidationConfig::default())
    }
}

impl FormulaValidator {
    /// `paragraph_tolerance` is the largest paragraph-count difference at
    /// which paragraphs are still compared pairwise.
    pub fn new(paragraph_tolerance: usize) -> Self {
        Self {
            paragraph_tolerance,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.paragraph_tolerance)
    }

    /// Returns only the failing comparisons between `source` and `target`.
    pub fn validate_texts(&self, source: &str, target: &str) -> Vec<ParagraphValidation> {
        let source_paragraphs = split_paragraphs(source);
        let target_paragraphs = split_paragraphs(target);

        if source_paragraphs.len().abs_diff(target_paragraphs.len()) > self.paragraph_tolerance {
            log::debug!(
                "Paragraph counts {} and {} diverge, comparing whole texts",
                source_paragraphs.len(),
                target_paragraphs.len()
            );
            let whole = ParagraphValidation::compare(0, ValidationScope::WholeSection, source, target);
            return if whole.is_ok() { Vec::new() } else { vec![whole] };
        }

        source_paragraphs
            .iter()
            .zip(&target_paragraphs)
            .enumerate()
            .map(|(i, (src, tgt))| ParagraphValidation::compare(i, ValidationScope::Paragraph, src, tgt))
            .filter(|v| !v.is_ok())
            .collect()
    }

    /// Validates a section against its rewrite. A section without a rewrite
    /// has nothing to check.
    pub fn validate_section(&self, section: &Section) -> Vec<ParagraphValidation> {
        match section.rewritten_content.as_deref() {
            Some(rewritten) => self.validate_texts(&section.content, rewritten),
            None => Vec::new(),
        }
    }

    /// Validates every rewritten section, keeping the sections with problems
    /// in document order.
    pub fn validate_document(&self, document: &Document) -> Vec<SectionValidation> {
        let results: Vec<SectionValidation> = document
            .sections()
            .iter()
            .filter(|s| s.rewritten_content.is_some())
            .filter_map(|section| {
                let problems = self.validate_section(section);
                (!problems.is_empty()).then(|| SectionValidation {
                    section_id: section.id.clone(),
                    problems,
                })
            })
            .collect();

        if !results.is_empty() {
            log::warn!(
                "Formula problems in {} section(s): {:?}",
                results.len(),
                results.iter().map(|r| r.section_id.as_str()).collect::<Vec<_>>()
            );
        }
        results
    }
}
