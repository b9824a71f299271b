//! Run configuration, read from `scriptorium.toml`.
//!
//! Every key is optional:
//!
//! ```toml
//! [latex]
//! preserve_comments = false
//! max_include_depth = 32
//!
//! [validation]
//! paragraph_tolerance = 1
//!
//! [output]
//! mark_problematic = true
//! problem_color = "red"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "scriptorium.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub latex: LatexConfig,
    pub validation: ValidationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatexConfig {
    /// Keep `%` comments instead of stripping them while flattening.
    pub preserve_comments: bool,
    /// Nesting limit for `\input`/`\include`; deeper directives stay unresolved.
    pub max_include_depth: usize,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            preserve_comments: false,
            max_include_depth: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest paragraph-count difference still validated paragraph by paragraph.
    pub paragraph_tolerance: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            paragraph_tolerance: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub mark_problematic: bool,
    pub problem_color: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mark_problematic: true,
            problem_color: "red".to_string(),
        }
    }
}

impl Config {
    /// Loads `path`, or `scriptorium.toml` from the working directory when
    /// `path` is `None`. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load_from_path(default)
                } else {
                    log::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.latex.max_include_depth, 32);
        assert_eq!(config.validation.paragraph_tolerance, 1);
        assert_eq!(config.output.problem_color, "red");
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [latex]
            preserve_comments = true

            [output]
            problem_color = "blue"
            "#,
        )
        .unwrap();
        assert!(config.latex.preserve_comments);
        assert_eq!(config.latex.max_include_depth, 32);
        assert!(config.output.mark_problematic);
        assert_eq!(config.output.problem_color, "blue");
    }

    #[test]
    fn test_load_from_path_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scriptorium.toml");
        std::fs::write(&path, "[validation]\nparagraph_tolerance = 3\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.validation.paragraph_tolerance, 3);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));

        std::fs::write(&path, "[validation]\nparagraph_tolerance = \"many\"\n").unwrap();
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
