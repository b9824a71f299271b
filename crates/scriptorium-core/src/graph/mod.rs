//! Dependency ordering of sections.
//!
//! Sections form a directed graph with an edge `dep -> s` for every `dep` in
//! `s.dependencies`. [`topological_order`] runs Kahn's algorithm over it. The
//! initial queue and each successor list follow document order, so the
//! result is deterministic and leaves unconstrained sections where they were.
//!
//! A cycle never fails the ordering: the document order is returned instead
//! and the status names the sections that could not be placed.

mod response;
#[cfg(test)]
mod tests;

pub use response::{
    DependencyMap, apply_dependencies, parse_dependency_response, try_parse_dependency_response,
};

use crate::document::{Document, Section};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// How an order was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderStatus {
    /// Zero or one section; no graph was built.
    Trivial,
    /// No usable dependency edges.
    Unconstrained,
    /// A valid topological order.
    Sorted,
    /// The graph has a cycle; the order is the document order.
    CycleDetected { unresolved: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    UnknownId,
    SelfReference,
}

/// A dependency entry that did not become an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IgnoredDependency {
    pub section: String,
    pub dependency: String,
    pub reason: IgnoredReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOrder {
    /// Indices into [`Document::sections`].
    pub indices: Vec<usize>,
    pub ids: Vec<String>,
    pub status: OrderStatus,
    pub ignored: Vec<IgnoredDependency>,
}

impl SectionOrder {
    pub fn is_cycle_fallback(&self) -> bool {
        matches!(self.status, OrderStatus::CycleDetected { .. })
    }

    /// The sections of `document` in this order.
    pub fn sections<'a>(&self, document: &'a Document) -> Vec<&'a Section> {
        self.indices
            .iter()
            .filter_map(|&i| document.sections().get(i))
            .collect()
    }
}

/// Index-based adjacency over the sections of one document.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    ids: Vec<String>,
    successors: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    edge_count: usize,
    ignored: Vec<IgnoredDependency>,
}

impl DependencyGraph {
    /// Builds the graph. Dependencies on unknown ids and on the section
    /// itself are dropped with a warning.
    pub fn build(document: &Document) -> Self {
        let sections = document.sections();
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(sections.len());
        for (i, section) in sections.iter().enumerate() {
            index.entry(section.id.as_str()).or_insert(i);
        }

        let mut successors = vec![Vec::new(); sections.len()];
        let mut in_degree = vec![0; sections.len()];
        let mut edge_count = 0;
        let mut ignored = Vec::new();

        for (i, section) in sections.iter().enumerate() {
            for dep in &section.dependencies {
                let reason = match index.get(dep.as_str()) {
                    Some(&d) if d == i => IgnoredReason::SelfReference,
                    Some(&d) => {
                        successors[d].push(i);
                        in_degree[i] += 1;
                        edge_count += 1;
                        continue;
                    }
                    None => IgnoredReason::UnknownId,
                };
                log::warn!(
                    "Ignoring dependency '{}' of section '{}': {:?}",
                    dep,
                    section.id,
                    reason
                );
                ignored.push(IgnoredDependency {
                    section: section.id.clone(),
                    dependency: dep.clone(),
                    reason,
                });
            }
        }

        Self {
            ids: sections.iter().map(|s| s.id.clone()).collect(),
            successors,
            in_degree,
            edge_count,
            ignored,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn ignored(&self) -> &[IgnoredDependency] {
        &self.ignored
    }

    /// Kahn's algorithm. Returns the placed indices; fewer than
    /// [`len`](Self::len) means the rest sit on or behind a cycle.
    pub fn kahn(&self) -> Vec<usize> {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<usize> = (0..self.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut ordered = Vec::with_capacity(self.len());

        while let Some(current) = queue.pop_front() {
            ordered.push(current);
            for &next in &self.successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }
        ordered
    }
}

/// Orders the sections of `document` so every section follows its
/// dependencies.
pub fn topological_order(document: &Document) -> SectionOrder {
    let count = document.sections().len();
    if count <= 1 {
        return SectionOrder {
            indices: (0..count).collect(),
            ids: document.sections().iter().map(|s| s.id.clone()).collect(),
            status: OrderStatus::Trivial,
            ignored: Vec::new(),
        };
    }

    let graph = DependencyGraph::build(document);
    let ordered = graph.kahn();

    let (indices, status) = if ordered.len() < count {
        let mut placed = vec![false; count];
        for &i in &ordered {
            placed[i] = true;
        }
        let unresolved: Vec<String> = (0..count)
            .filter(|&i| !placed[i])
            .map(|i| graph.ids[i].clone())
            .collect();
        log::warn!(
            "Circular dependencies among {:?}; keeping document order",
            unresolved
        );
        ((0..count).collect(), OrderStatus::CycleDetected { unresolved })
    } else if graph.edge_count() == 0 {
        (ordered, OrderStatus::Unconstrained)
    } else {
        (ordered, OrderStatus::Sorted)
    };

    SectionOrder {
        ids: indices.iter().map(|&i| graph.ids[i].clone()).collect(),
        indices,
        status,
        ignored: graph.ignored,
    }
}
