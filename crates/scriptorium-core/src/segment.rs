//! Splitting flattened content into preamble, body, postamble and sections.

use crate::document::{Document, Section};
use crate::error::FlattenError;
use crate::flatten::{FlattenReport, Flattener};
use scriptorium_syntax::{outline, parse};
use serde::Serialize;
use std::path::Path;

const BEGIN_DOCUMENT: &str = "\\begin{document}";
const END_DOCUMENT: &str = "\\end{document}";

/// Id and title of the section produced when the body has no headings.
pub const FALLBACK_SECTION_ID: &str = "main";
pub const FALLBACK_SECTION_TITLE: &str = "Main Content";

/// Borrowed views of the three parts of a flattened document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySplit<'a> {
    pub preamble: &'a str,
    pub body: &'a str,
    pub postamble: &'a str,
}

/// Splits at the first `\begin{document}` and the `\end{document}` after it.
///
/// Without a begin marker the whole content is body. Without an end marker
/// the body runs to the end of the content.
///
/// A begin marker without an end marker still splits off the preamble, so
/// the preamble never ends up in the body or the front matter and assembly
/// writes `\begin{document}` once.
pub fn split_body(content: &str) -> BodySplit<'_> {
    let Some(begin) = content.find(BEGIN_DOCUMENT) else {
        return BodySplit {
            preamble: "",
            body: content,
            postamble: "",
        };
    };
    let body_start = begin + BEGIN_DOCUMENT.len();
    let (body_end, postamble_start) = match content[body_start..].find(END_DOCUMENT) {
        Some(offset) => (
            body_start + offset,
            body_start + offset + END_DOCUMENT.len(),
        ),
        None => (content.len(), content.len()),
    };
    BodySplit {
        preamble: &content[..begin],
        body: &content[body_start..body_end],
        postamble: &content[postamble_start..],
    }
}

/// Builds a [`Document`] from flattened content.
///
/// Each heading starts a section `sec_{i}` whose content is the trimmed text
/// up to the next heading. A body without headings becomes the single
/// fallback section, untrimmed.
pub fn segment(source_path: impl AsRef<Path>, content: &str) -> Document {
    let split = split_body(content);
    let body = split.body;

    let tree = parse(body).syntax();
    let headings = outline::headings(&tree);

    let mut document = Document::new(source_path.as_ref(), body);
    document.preamble = split.preamble.to_string();
    document.postamble = split.postamble.to_string();

    let Some(first) = headings.first() else {
        log::debug!("No headings found, using a single '{}' section", FALLBACK_SECTION_ID);
        document.sections = vec![Section::new(
            FALLBACK_SECTION_ID,
            FALLBACK_SECTION_TITLE,
            body,
            0,
        )];
        return document;
    };
    document.front_matter = body[..usize::from(first.range.start())].trim().to_string();

    let mut sections = Vec::with_capacity(headings.len());
    for (i, heading) in headings.iter().enumerate() {
        let start = usize::from(heading.range.end());
        let end = headings
            .get(i + 1)
            .map_or(body.len(), |next| usize::from(next.range.start()));
        let mut section = Section::new(
            format!("sec_{}", i),
            heading.title.clone(),
            body[start..end].trim(),
            heading.level,
        );
        section.starred = heading.starred;
        section.short_title = heading.short_title.clone();
        sections.push(section);
    }
    log::debug!("Segmented body into {} section(s)", sections.len());
    document.sections = sections;
    document
}

/// A segmented document together with the report of the flattening that
/// produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedDocument {
    pub document: Document,
    pub report: FlattenReport,
}

/// Flattens the document rooted at `path` and segments the result.
pub fn parse_document(
    path: impl AsRef<Path>,
    flattener: &Flattener,
) -> Result<ParsedDocument, FlattenError> {
    let path = path.as_ref();
    let flattened = flattener.flatten(path)?;
    let document = segment(path, &flattened.content);
    Ok(ParsedDocument {
        document,
        report: flattened.report,
    })
}
