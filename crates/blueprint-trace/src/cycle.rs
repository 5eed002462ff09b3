//! Dependency cycle detection
//!
//! The dependency relation is loaded into a petgraph [`DiGraphMap`] and
//! searched with an explicit-stack DFS (no recursion, so corpus depth cannot
//! overflow the call stack). The search stops at the first back-edge.

use crate::snapshot::Snapshot;
use blueprint_artifact::ArtifactId;
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// A closed dependency loop; the first id is repeated at the end
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCycle {
    pub path: Vec<ArtifactId>,
}

impl DependencyCycle {
    /// Artifact the search entered the loop from
    #[must_use]
    pub fn head(&self) -> Option<&ArtifactId> {
        self.path.first()
    }

    /// Distinct members of the loop
    #[must_use]
    pub fn members(&self) -> &[ArtifactId] {
        match self.path.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

impl fmt::Display for DependencyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.path.iter().map(ArtifactId::as_str).collect();
        f.write_str(&ids.join(" -> "))
    }
}

/// Dependency edges between indexed artifacts
///
/// Edges to ids outside the snapshot are dropped; those are orphans, not
/// cycle candidates. Nodes and edges go in id order so the search is
/// deterministic.
#[must_use]
pub fn dependency_graph(snapshot: &Snapshot) -> DiGraphMap<&ArtifactId, ()> {
    let mut graph = DiGraphMap::new();
    for node in snapshot.iter() {
        graph.add_node(&node.id);
    }
    for node in snapshot.iter() {
        for dep in node.dependencies() {
            if let Some(target) = snapshot.get_by_id(dep) {
                graph.add_edge(&node.id, &target.id, ());
            }
        }
    }
    graph
}

/// First dependency cycle in id order, if any
#[must_use]
pub fn find_first_cycle(snapshot: &Snapshot) -> Option<DependencyCycle> {
    let graph = dependency_graph(snapshot);
    let mut visited: BTreeSet<&ArtifactId> = BTreeSet::new();
    for start in graph.nodes() {
        if visited.contains(start) {
            continue;
        }
        if let Some(cycle) = search_from(&graph, start, &mut visited) {
            tracing::debug!(%cycle, "dependency cycle found");
            return Some(cycle);
        }
    }
    None
}

fn search_from<'a>(
    graph: &DiGraphMap<&'a ArtifactId, ()>,
    start: &'a ArtifactId,
    visited: &mut BTreeSet<&'a ArtifactId>,
) -> Option<DependencyCycle> {
    let mut on_stack = BTreeSet::new();
    let mut path = vec![start];
    let mut frames = vec![graph.neighbors(start)];
    visited.insert(start);
    on_stack.insert(start);

    while let Some(frame) = frames.last_mut() {
        match frame.next() {
            Some(next) if on_stack.contains(next) => {
                let begin = path.iter().position(|id| *id == next)?;
                let mut cycle: Vec<ArtifactId> = path[begin..].iter().map(|id| (*id).clone()).collect();
                cycle.push(next.clone());
                return Some(DependencyCycle { path: cycle });
            }
            Some(next) if visited.insert(next) => {
                on_stack.insert(next);
                path.push(next);
                frames.push(graph.neighbors(next));
            }
            Some(_) => {}
            None => {
                frames.pop();
                if let Some(done) = path.pop() {
                    on_stack.remove(done);
                }
            }
        }
    }
    None
}
