//! Read-only graph queries over a built index.
//!
//! Entry points, leaf files, and cycle detection are all derived from the
//! node/edge sets; nothing here mutates the index.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::types::ProjectIndex;

/// Aggregate statistics for an index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub total_files: usize,
    pub total_dependencies: usize,
    pub average_dependencies_per_file: f64,
    pub entry_points: Vec<String>,
    pub leaf_files: Vec<String>,
    pub circular_dependencies: Vec<Vec<String>>,
}

/// Nodes that never appear as an edge target, i.e. nothing in the project
/// imports them. Returned in node order.
pub fn entry_points(index: &ProjectIndex) -> Vec<String> {
    let targets: HashSet<&str> = index.edges.iter().map(|e| e.to.as_str()).collect();
    index
        .nodes
        .iter()
        .filter(|n| !targets.contains(n.as_str()))
        .cloned()
        .collect()
}

/// Nodes whose record depends on nothing internal. Returned in node order.
pub fn leaf_files(index: &ProjectIndex) -> Vec<String> {
    index
        .nodes
        .iter()
        .filter(|n| {
            index
                .files
                .get(*n)
                .map(|f| f.dependencies.is_empty())
                .unwrap_or(true)
        })
        .cloned()
        .collect()
}

/// Detect dependency cycles via strongly-connected components.
///
/// Each cycle is reported as a traversable node sequence: consecutive
/// entries (and the wrap-around from last to first) are real edges. The
/// sequence starts at the component's lexicographically smallest member,
/// with successors tried in sorted order, so output is canonical and
/// deterministic. Self-loops are reported as single-node cycles.
pub fn cycles(index: &ProjectIndex) -> Vec<Vec<String>> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut lookup: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &index.nodes {
        let idx = graph.add_node(node.as_str());
        lookup.insert(node.as_str(), idx);
    }
    for edge in &index.edges {
        if let (Some(&from), Some(&to)) =
            (lookup.get(edge.from.as_str()), lookup.get(edge.to.as_str()))
        {
            graph.add_edge(from, to, ());
        }
    }

    let self_loops: HashSet<&str> = index
        .edges
        .iter()
        .filter(|e| e.from == e.to)
        .map(|e| e.from.as_str())
        .collect();

    let mut out: Vec<Vec<String>> = Vec::new();

    for component in tarjan_scc(&graph) {
        if component.len() == 1 {
            let node = graph[component[0]];
            if self_loops.contains(node) {
                out.push(vec![node.to_string()]);
            }
            continue;
        }

        let members: HashSet<&str> = component.iter().map(|&idx| graph[idx]).collect();
        let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in &index.edges {
            if edge.from != edge.to
                && members.contains(edge.from.as_str())
                && members.contains(edge.to.as_str())
            {
                adjacency
                    .entry(edge.from.as_str())
                    .or_default()
                    .push(edge.to.as_str());
            }
        }
        for successors in adjacency.values_mut() {
            successors.sort();
            successors.dedup();
        }

        let Some(start) = members.iter().min().copied() else {
            continue;
        };
        if let Some(sequence) = cycle_from(start, &adjacency) {
            out.push(sequence.into_iter().map(str::to_string).collect());
        }
    }

    out.sort();
    out
}

/// Depth-first search for a closed walk from `start` back to itself. The
/// returned sequence does not repeat `start` at the end.
fn cycle_from<'a>(
    start: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
) -> Option<Vec<&'a str>> {
    let mut path = vec![start];
    let mut on_path: HashSet<&str> = HashSet::from([start]);
    if close_walk(start, start, adjacency, &mut path, &mut on_path) {
        Some(path)
    } else {
        None
    }
}

fn close_walk<'a>(
    current: &'a str,
    start: &'a str,
    adjacency: &HashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    on_path: &mut HashSet<&'a str>,
) -> bool {
    let Some(successors) = adjacency.get(current) else {
        return false;
    };
    for &next in successors {
        if next == start && path.len() >= 2 {
            return true;
        }
        if !on_path.contains(next) {
            path.push(next);
            on_path.insert(next);
            if close_walk(next, start, adjacency, path, on_path) {
                return true;
            }
            path.pop();
            on_path.remove(next);
        }
    }
    false
}

/// Compute the full statistics record for an index.
pub fn stats(index: &ProjectIndex) -> IndexStats {
    let total_files = index.nodes.len();
    let total_dependencies: usize = index
        .files
        .values()
        .map(|f| f.dependencies.len())
        .sum();
    let average = if total_files == 0 {
        0.0
    } else {
        total_dependencies as f64 / total_files as f64
    };

    IndexStats {
        total_files,
        total_dependencies,
        average_dependencies_per_file: average,
        entry_points: entry_points(index),
        leaf_files: leaf_files(index),
        circular_dependencies: cycles(index),
    }
}
