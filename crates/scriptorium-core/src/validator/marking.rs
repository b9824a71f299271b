//! Highlighting rewritten paragraphs that lost or changed formulas.

use super::{FormulaValidator, ParagraphValidation, ValidationScope, split_paragraphs};
use crate::document::Section;

/// Escapes the LaTeX special characters of plain text.
pub fn latex_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' => out.push_str("\\$"),
            '&' => out.push_str("\\&"),
            '#' => out.push_str("\\#"),
            '^' => out.push_str("\\^{}"),
            '_' => out.push_str("\\_"),
            '%' => out.push_str("\\%"),
            '~' => out.push_str("\\~{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps `paragraph` in `color` with the validation diff as a footnote.
pub fn mark_paragraph(paragraph: &str, validation: &ParagraphValidation, color: &str) -> String {
    let diff = latex_escape(validation.diff.as_deref().unwrap_or_default());
    format!("{{\\color{{{}}} {}\\footnote{{{}}}}}", color, paragraph, diff)
}

/// Marks the failing paragraphs of a section's rewrite in place and returns
/// how many were marked.
///
/// Paragraphs are re-joined with a single blank line. When the validation
/// fell back to the whole section, the whole rewrite is marked as one block.
///
/// The footnote escapes its dollars, so validating the marked rewrite again
/// reports the same problems. Marking it again wraps the paragraphs again.
pub fn mark_section(validator: &FormulaValidator, section: &mut Section, color: &str) -> usize {
    let problems = validator.validate_section(section);
    let Some(rewritten) = section.rewritten_content.as_deref() else {
        return 0;
    };
    if problems.is_empty() {
        return 0;
    }

    let marked = match problems.first() {
        Some(whole) if whole.scope == ValidationScope::WholeSection => {
            mark_paragraph(rewritten.trim(), whole, color)
        }
        _ => split_paragraphs(rewritten)
            .into_iter()
            .enumerate()
            .map(|(i, paragraph)| {
                match problems.iter().find(|p| p.paragraph_index == i) {
                    Some(problem) => mark_paragraph(paragraph, problem, color),
                    None => paragraph.to_string(),
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    };

    section.rewritten_content = Some(marked);
    problems.len()
}
