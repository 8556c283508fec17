//! Graph analytics: summary counts, degree centrality, components.
//!
//! All functions operate on a built [`TheoryGraph`] and return structured
//! results sorted by relevance (degree desc, size desc).

use petgraph::algo::kosaraju_scc;
use petgraph::visit::EdgeRef;
use serde::Serialize;

use super::index::TheoryGraph;
use super::{HAS_CONSTRUCT, NodeKind};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Headline numbers for a built graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub construct_nodes: usize,
    pub theory_nodes: usize,
    pub membership_edges: usize,
    pub relationship_edges: usize,
    pub annotated_nodes: usize,
    pub annotations: usize,
}

/// Count nodes by kind, edges by label class, and attached annotations.
pub fn summarize(graph: &TheoryGraph) -> GraphSummary {
    let mut summary = GraphSummary::default();
    for node in graph.nodes() {
        match node.kind {
            NodeKind::Construct => summary.construct_nodes += 1,
            NodeKind::Theory => summary.theory_nodes += 1,
        }
        if !node.annotations.is_empty() {
            summary.annotated_nodes += 1;
            summary.annotations += node.annotations.len();
        }
    }
    for edge in graph.graph().edge_references() {
        if edge.weight().label == HAS_CONSTRUCT {
            summary.membership_edges += 1;
        } else {
            summary.relationship_edges += 1;
        }
    }
    summary
}

// ---------------------------------------------------------------------------
// Degree centrality
// ---------------------------------------------------------------------------

/// Degree centrality metrics for a single node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DegreeCentrality {
    pub name: String,
    pub kind: NodeKind,
    pub in_degree: usize,
    pub out_degree: usize,
    /// Total degree (in + out).
    pub total: usize,
}

/// Compute degree centrality for all nodes. Sorted by total degree desc;
/// ties keep graph insertion order.
pub fn degree_centrality(graph: &TheoryGraph) -> Vec<DegreeCentrality> {
    let g = graph.graph();
    let mut in_degree = vec![0usize; g.node_count()];
    let mut out_degree = vec![0usize; g.node_count()];
    for edge in g.edge_references() {
        out_degree[edge.source().index()] += 1;
        in_degree[edge.target().index()] += 1;
    }

    let mut results: Vec<DegreeCentrality> = g
        .node_indices()
        .map(|idx| {
            let node = &g[idx];
            let (i, o) = (in_degree[idx.index()], out_degree[idx.index()]);
            DegreeCentrality {
                name: node.name.clone(),
                kind: node.kind,
                in_degree: i,
                out_degree: o,
                total: i + o,
            }
        })
        .collect();
    results.sort_by(|a, b| b.total.cmp(&a.total));
    results
}

/// Construct nodes with no edges at all.
pub fn isolated_constructs(graph: &TheoryGraph) -> Vec<&str> {
    let g = graph.graph();
    g.node_indices()
        .filter(|&idx| {
            g[idx].kind == NodeKind::Construct && g.neighbors_undirected(idx).next().is_none()
        })
        .map(|idx| g[idx].name.as_str())
        .collect()
}

// ---------------------------------------------------------------------------
// Strongly connected components
// ---------------------------------------------------------------------------

/// A strongly connected component with more than one member, i.e. a
/// feedback loop between constructs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackLoop {
    /// Member names in graph insertion order.
    pub members: Vec<String>,
}

/// Find cycles of mutual influence. Sorted by size desc.
pub fn feedback_loops(graph: &TheoryGraph) -> Vec<FeedbackLoop> {
    let g = graph.graph();
    let mut loops: Vec<FeedbackLoop> = kosaraju_scc(g)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .map(|mut scc| {
            scc.sort();
            FeedbackLoop {
                members: scc.into_iter().map(|idx| g[idx].name.clone()).collect(),
            }
        })
        .collect();
    loops.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    loops
}
