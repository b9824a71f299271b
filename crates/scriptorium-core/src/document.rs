//! Document model.

use crate::error::DocumentError;
use scriptorium_math::{Formula, extract_formulas};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

/// A titled unit of the document body.
///
/// `dependencies` is filled in from outside (see [`crate::graph`]), and
/// `rewritten_content` and `rewrite_attempts` are written by the rewriting
/// stage. The engine never derives these fields itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    /// 0 for the whole-body fallback section, 1 to 3 for heading depth.
    pub level: u8,
    #[serde(default)]
    pub starred: bool,
    /// The `[...]` argument of the heading, used in the table of contents.
    #[serde(default)]
    pub short_title: Option<String>,
    pub formulas: Vec<Formula>,
    #[serde(default)]
    pub dependencies: BTreeSet<String>,
    #[serde(default)]
    pub rewritten_content: Option<String>,
    #[serde(default)]
    pub rewrite_attempts: u32,
}

impl Section {
    /// Creates a section and extracts the formulas of `content`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        level: u8,
    ) -> Self {
        let content = content.into();
        let formulas = extract_formulas(&content);
        Self {
            id: id.into(),
            title: title.into(),
            content,
            level,
            starred: false,
            short_title: None,
            formulas,
            dependencies: BTreeSet::new(),
            rewritten_content: None,
            rewrite_attempts: 0,
        }
    }

    /// Adds a dependency. A section never depends on itself, so its own id
    /// is refused and `false` is returned.
    pub fn add_dependency(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if id == self.id {
            return false;
        }
        self.dependencies.insert(id)
    }

    /// Stores a new rewrite and counts the attempt.
    pub fn record_rewrite(&mut self, text: impl Into<String>) {
        self.rewritten_content = Some(text.into());
        self.rewrite_attempts += 1;
    }

    /// The rewrite if there is one, otherwise the original content.
    pub fn effective_content(&self) -> &str {
        self.rewritten_content.as_deref().unwrap_or(&self.content)
    }

    fn heading_command(&self) -> Option<String> {
        let name = match self.level {
            0 => return None,
            2 => "subsection",
            3 => "subsubsection",
            _ => "section",
        };
        let star = if self.starred { "*" } else { "" };
        let short = match &self.short_title {
            Some(short) => format!("[{}]", short),
            None => String::new(),
        };
        Some(format!("\\{}{}{}{{{}}}", name, star, short, self.title))
    }
}

/// A segmented document. Owns its sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub source_path: PathBuf,
    /// Flattened body between the document markers.
    pub content: String,
    pub preamble: String,
    pub postamble: String,
    /// Body text before the first heading.
    pub front_matter: String,
    pub(crate) sections: Vec<Section>,
}

impl Document {
    /// Creates a document without sections.
    pub fn new(source_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            content: content.into(),
            preamble: String::new(),
            postamble: String::new(),
            front_matter: String::new(),
            sections: Vec::new(),
        }
    }

    /// Replaces the sections, refusing duplicate ids.
    pub fn with_sections(mut self, sections: Vec<Section>) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(DocumentError::DuplicateSectionId(section.id.clone()));
            }
        }
        self.sections = sections;
        Ok(self)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Mutable access for the rewriting stage. Ids must not be changed.
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Linear lookup; the first section with `id` wins.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Records one rewrite per `(section id, text)` pair and returns the ids
    /// that matched no section. Unknown ids are logged and skipped.
    pub fn record_rewrites<I>(&mut self, rewrites: I) -> Vec<String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut unknown = Vec::new();
        for (id, text) in rewrites {
            match self.section_mut(&id) {
                Some(section) => section.record_rewrite(text),
                None => {
                    log::warn!("Rewrite for unknown section '{}' ignored", id);
                    unknown.push(id);
                }
            }
        }
        unknown
    }

    /// Rewrites already produced for the dependencies of section `id`, as
    /// `(dependency id, rewritten text)` in id order. Used as context when
    /// the section itself is rewritten again.
    pub fn dependency_rewrites(&self, id: &str) -> Vec<(&str, &str)> {
        let Some(section) = self.section(id) else {
            return Vec::new();
        };
        section
            .dependencies
            .iter()
            .filter_map(|dep| self.section(dep))
            .filter_map(|dep| {
                dep.rewritten_content
                    .as_deref()
                    .map(|text| (dep.id.as_str(), text))
            })
            .collect()
    }

    /// Rebuilds a complete document from the preamble, the sections (rewritten
    /// content where present) and the postamble.
    pub fn assemble(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if !self.preamble.trim().is_empty() {
            parts.push(self.preamble.trim().to_string());
        }
        parts.push("\\begin{document}\n".to_string());
        if !self.front_matter.is_empty() {
            parts.push(self.front_matter.clone());
            parts.push(String::new());
        }
        for section in &self.sections {
            if let Some(heading) = section.heading_command() {
                parts.push(format!("{}\n", heading));
            }
            parts.push(section.effective_content().to_string());
            parts.push(String::new());
        }
        parts.push("\\end{document}".to_string());
        if !self.postamble.trim().is_empty() {
            parts.push(self.postamble.trim().to_string());
        }

        parts.join("\n")
    }
}
