//! Multi-file flattening.
//!
//! `\input{name}` and `\include{name}` are replaced by the content of
//! `name.tex` (the extension is added when missing), resolved against the
//! directory of the root document. Included files are flattened depth-first
//! before being spliced in. Comments are stripped from each file as it is
//! read, so a commented-out directive is never followed.
//!
//! A directive whose file does not exist is left verbatim and reported.
//! There is no cycle detection: a file that includes itself recurses until
//! the depth limit is reached, and the directive at that depth is left
//! verbatim.

use crate::config::LatexConfig;
use crate::error::FlattenError;
use scriptorium_syntax::{outline, parse, strip_comments};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};

/// A file that contributed to the flattened output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputFile {
    pub path: PathBuf,
    /// SHA-256 of the raw file bytes, hex encoded.
    pub fingerprint: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    NotFound,
    DepthLimit,
}

/// A directive left in the output as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedInclude {
    pub directive: String,
    pub path: PathBuf,
    pub reason: UnresolvedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenReport {
    /// Files read, in reading order (the root first).
    pub inputs: Vec<InputFile>,
    pub unresolved: Vec<UnresolvedInclude>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub content: String,
    pub report: FlattenReport,
}

/// Resolves inclusion directives into one content string.
#[derive(Debug, Clone)]
pub struct Flattener {
    strip_comments: bool,
    max_depth: usize,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::from_config(&LatexConfig::default())
    }
}

impl Flattener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LatexConfig) -> Self {
        Self {
            strip_comments: !config.preserve_comments,
            max_depth: config.max_include_depth,
        }
    }

    pub fn preserve_comments(mut self, preserve: bool) -> Self {
        self.strip_comments = !preserve;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Flattens the document rooted at `root`.
    ///
    /// Fails only when a file that exists cannot be read; the root document
    /// counts as existing.
    pub fn flatten(&self, root: impl AsRef<Path>) -> Result<Flattened, FlattenError> {
        let root = root.as_ref();
        let base_dir = root.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        let mut report = FlattenReport::default();

        let source = self
            .read_source(root, &mut report)
            .map_err(|source| FlattenError::ReadRoot {
                path: root.to_path_buf(),
                source,
            })?;
        let content = self.resolve(&source, &base_dir, 0, &mut report)?;

        log::info!(
            "Flattened {:?}: {} file(s), {} unresolved directive(s)",
            root,
            report.inputs.len(),
            report.unresolved.len()
        );
        Ok(Flattened { content, report })
    }

    fn read_source(&self, path: &Path, report: &mut FlattenReport) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        report.inputs.push(InputFile {
            path: path.to_path_buf(),
            fingerprint: hex::encode(hasher.finalize()),
        });

        let text =
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(if self.strip_comments {
            strip_comments(&text)
        } else {
            text
        })
    }

    fn resolve(
        &self,
        content: &str,
        base_dir: &Path,
        depth: usize,
        report: &mut FlattenReport,
    ) -> Result<String, FlattenError> {
        let tree = parse(content).syntax();
        let directives = outline::includes(&tree);
        if directives.is_empty() {
            return Ok(content.to_string());
        }

        let mut out = String::with_capacity(content.len());
        let mut cursor = 0;
        for include in directives {
            let start = usize::from(include.range.start());
            let end = usize::from(include.range.end());
            let directive = &content[start..end];
            out.push_str(&content[cursor..start]);
            cursor = end;

            let path = base_dir.join(with_tex_extension(&include.target));
            let unresolved = if !path.is_file() {
                log::warn!("Included file not found: {:?}", path);
                Some(UnresolvedReason::NotFound)
            } else if depth >= self.max_depth {
                log::warn!(
                    "Inclusion depth limit {} reached at {:?}; possible inclusion cycle",
                    self.max_depth,
                    path
                );
                Some(UnresolvedReason::DepthLimit)
            } else {
                None
            };

            if let Some(reason) = unresolved {
                report.unresolved.push(UnresolvedInclude {
                    directive: directive.to_string(),
                    path,
                    reason,
                });
                out.push_str(directive);
                continue;
            }

            log::debug!("Resolving {} -> {:?}", directive, path);
            let included = self
                .read_source(&path, report)
                .map_err(|source| FlattenError::ReadInclude {
                    path: path.clone(),
                    source,
                })?;
            out.push_str(&self.resolve(&included, base_dir, depth + 1, report)?);
        }
        out.push_str(&content[cursor..]);
        Ok(out)
    }
}

fn with_tex_extension(target: &str) -> String {
    if target.ends_with(".tex") {
        target.to_string()
    } else {
        format!("{}.tex", target)
    }
}
