//! Queries over a parsed tree: headings and inclusion directives, in document order.

use crate::parser::HEADING_COMMANDS;
use crate::{SyntaxKind, SyntaxNode, TextRange};

/// A heading command with a well-formed `{title}` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRef {
    /// 1 for `\section`, 2 for `\subsection`, 3 for `\subsubsection`.
    pub level: u8,
    pub starred: bool,
    /// Text of the `[...]` argument, trimmed, when one is given.
    pub short_title: Option<String>,
    pub title: String,
    /// Range of the whole heading, from the backslash to the closing brace.
    pub range: TextRange,
}

/// An `\input{...}` or `\include{...}` directive with a closed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeRef {
    /// Command name without the backslash.
    pub command: String,
    /// Trimmed argument text.
    pub target: String,
    /// Range of the whole directive.
    pub range: TextRange,
}

/// Collects headings in document order.
///
/// Headings without a closed title group are skipped, and so is any heading
/// nested inside another heading's arguments.
pub fn headings(root: &SyntaxNode) -> Vec<HeadingRef> {
    let mut found: Vec<HeadingRef> = Vec::new();
    for node in root.descendants().filter(|n| n.kind() == SyntaxKind::Heading) {
        let range = node.text_range();
        if found.last().is_some_and(|prev| range.start() < prev.range.end()) {
            continue;
        }
        let Some(title) = closed_group_text(&node) else {
            continue;
        };
        let Some(command) = node.first_token() else {
            continue;
        };
        let Some(level) = HEADING_COMMANDS
            .iter()
            .find(|(name, _)| *name == command.text())
            .map(|(_, level)| *level)
        else {
            continue;
        };
        let starred = node
            .children_with_tokens()
            .any(|el| el.kind() == SyntaxKind::Star);
        let short_title = closed_optional_text(&node);
        found.push(HeadingRef {
            level,
            starred,
            short_title,
            title,
            range,
        });
    }
    found
}

/// Collects inclusion directives in document order.
pub fn includes(root: &SyntaxNode) -> Vec<IncludeRef> {
    let mut found: Vec<IncludeRef> = Vec::new();
    for node in root.descendants().filter(|n| n.kind() == SyntaxKind::Include) {
        let range = node.text_range();
        if found.last().is_some_and(|prev| range.start() < prev.range.end()) {
            continue;
        }
        let (Some(target), Some(command)) = (closed_group_text(&node), node.first_token()) else {
            continue;
        };
        found.push(IncludeRef {
            command: command.text().trim_start_matches('\\').to_string(),
            target,
            range,
        });
    }
    found
}

/// Inner text of the first direct `{...}` child, trimmed. `None` when the
/// group is missing or never closed.
pub fn closed_group_text(node: &SyntaxNode) -> Option<String> {
    let group = node.children().find(|n| n.kind() == SyntaxKind::Group)?;
    let text = group.text().to_string();
    let inner = text.strip_prefix('{')?.strip_suffix('}')?;
    Some(inner.trim().to_string())
}

fn closed_optional_text(node: &SyntaxNode) -> Option<String> {
    let optional = node.children().find(|n| n.kind() == SyntaxKind::Optional)?;
    let text = optional.text().to_string();
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.trim().to_string())
}
