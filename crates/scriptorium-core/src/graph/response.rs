//! Reading the dependency relation produced by the semantic-analysis step.
//!
//! The expected shape is
//!
//! ```json
//! {"dependencies": {"sec_1": ["sec_0"], "sec_2": ["sec_0", "sec_1"]}}
//! ```
//!
//! optionally wrapped in a fenced code block.

use crate::document::Document;
use crate::error::DependencyResponseError;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Section id to the ids it depends on.
pub type DependencyMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Deserialize)]
struct DependencyResponse {
    #[serde(default)]
    dependencies: BTreeMap<String, Vec<String>>,
}

fn unfence(response: &str) -> &str {
    let after = if let Some((_, rest)) = response.split_once("```json") {
        rest
    } else if let Some((_, rest)) = response.split_once("```") {
        rest
    } else {
        return response.trim();
    };
    after.split("```").next().unwrap_or(after).trim()
}

/// Parses a response, reporting malformed JSON.
pub fn try_parse_dependency_response(
    response: &str,
) -> Result<DependencyMap, DependencyResponseError> {
    let parsed: DependencyResponse = serde_json::from_str(unfence(response))?;
    Ok(parsed
        .dependencies
        .into_iter()
        .map(|(id, deps)| (id, deps.into_iter().collect()))
        .collect())
}

/// Parses a response. Malformed input gives an empty relation and a warning.
pub fn parse_dependency_response(response: &str) -> DependencyMap {
    try_parse_dependency_response(response).unwrap_or_else(|err| {
        log::warn!("{}; continuing without dependencies", err);
        DependencyMap::new()
    })
}

/// Replaces the dependencies of every section named in `map` and returns
/// the number of dependencies stored.
///
/// Entries for unknown sections, dependencies on unknown ids and self
/// references are skipped with a warning.
pub fn apply_dependencies(document: &mut Document, map: &DependencyMap) -> usize {
    let known: HashSet<String> = document.sections().iter().map(|s| s.id.clone()).collect();
    let mut stored = 0;

    for (id, deps) in map {
        let Some(section) = document.section_mut(id) else {
            log::warn!("Dependency entry for unknown section '{}'", id);
            continue;
        };
        section.dependencies.clear();
        for dep in deps {
            if !known.contains(dep) {
                log::warn!("Section '{}' depends on unknown section '{}'", id, dep);
            } else if section.add_dependency(dep.as_str()) {
                stored += 1;
            } else {
                log::warn!("Section '{}' lists itself as a dependency", id);
            }
        }
    }
    stored
}
