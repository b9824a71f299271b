use std::path::PathBuf;
use thiserror::Error;

/// Fatal flattening failures. Missing included files are not errors; they
/// are reported in [`FlattenReport`](crate::flatten::FlattenReport).
#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("cannot read root document {}: {source}", .path.display())]
    ReadRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read included file {}: {source}", .path.display())]
    ReadInclude {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("duplicate section id '{0}'")]
    DuplicateSectionId(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// A dependency response that is not the expected JSON object.
#[derive(Debug, Error)]
#[error("malformed dependency response: {0}")]
pub struct DependencyResponseError(#[from] serde_json::Error);
