//! Name-indexed directed graph of constructs and theories.
//!
//! Uses `petgraph` for the graph structure and an `IndexMap` from node name
//! to `NodeIndex`, so nodes iterate in first-insertion order.

use indexmap::IndexMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::{EdgeData, EdgePolicy, NodeData, NodeKind};

/// Outcome of writing an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeWrite {
    /// A new edge was added.
    Added,
    /// An existing edge for the same key was relabelled; holds the old label.
    Replaced(String),
    /// An identical edge already existed.
    Unchanged,
}

/// Merged graph snapshot produced by [`GraphBuilder`](super::GraphBuilder).
///
/// Nodes are never removed, so `NodeIndex` values stay valid for the
/// lifetime of the graph.
#[derive(Clone)]
pub struct TheoryGraph {
    graph: DiGraph<NodeData, EdgeData>,
    node_index: IndexMap<String, NodeIndex>,
    policy: EdgePolicy,
}

impl TheoryGraph {
    /// Create an empty graph with the given edge policy.
    pub fn new(policy: EdgePolicy) -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: IndexMap::new(),
            policy,
        }
    }

    /// Create or overwrite a construct node with the given description.
    ///
    /// Annotations already attached to an existing node are kept.
    pub fn upsert_construct(&mut self, name: &str, description: &str) -> NodeIndex {
        self.upsert(name, NodeKind::Construct, description).0
    }

    /// Create or overwrite a theory node. Returns the kind the node had
    /// before, if it already existed.
    pub fn upsert_theory(
        &mut self,
        name: &str,
        description: &str,
    ) -> (NodeIndex, Option<NodeKind>) {
        self.upsert(name, NodeKind::Theory, description)
    }

    fn upsert(
        &mut self,
        name: &str,
        kind: NodeKind,
        description: &str,
    ) -> (NodeIndex, Option<NodeKind>) {
        if let Some(&idx) = self.node_index.get(name) {
            let node = &mut self.graph[idx];
            let previous = node.kind;
            node.kind = kind;
            node.description = description.to_string();
            return (idx, Some(previous));
        }
        let idx = self.graph.add_node(NodeData::new(name, kind, description));
        self.node_index.insert(name.to_string(), idx);
        (idx, None)
    }

    /// Return the node for `name`, creating a bare construct node if missing.
    pub fn ensure_construct(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        self.upsert(name, NodeKind::Construct, "").0
    }

    /// Write a directed labelled edge according to the graph's [`EdgePolicy`].
    pub fn write_edge(&mut self, source: NodeIndex, target: NodeIndex, label: &str) -> EdgeWrite {
        match self.policy {
            EdgePolicy::Collapse => match self.graph.find_edge(source, target) {
                Some(edge) => {
                    let weight = &mut self.graph[edge];
                    if weight.label == label {
                        EdgeWrite::Unchanged
                    } else {
                        EdgeWrite::Replaced(std::mem::replace(&mut weight.label, label.to_string()))
                    }
                }
                None => {
                    self.graph.add_edge(source, target, EdgeData { label: label.to_string() });
                    EdgeWrite::Added
                }
            },
            EdgePolicy::Multi => {
                let exists = self
                    .graph
                    .edges_connecting(source, target)
                    .any(|e| e.weight().label == label);
                if exists {
                    EdgeWrite::Unchanged
                } else {
                    self.graph.add_edge(source, target, EdgeData { label: label.to_string() });
                    EdgeWrite::Added
                }
            }
        }
    }

    /// Append a formatted annotation to an existing node.
    ///
    /// Returns `false` (and changes nothing) if no node has this name.
    pub fn annotate(&mut self, name: &str, annotation: String) -> bool {
        match self.node_index.get(name) {
            Some(&idx) => {
                self.graph[idx].annotations.push(annotation);
                true
            }
            None => false,
        }
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&NodeData> {
        self.node_index.get(name).map(|&idx| &self.graph[idx])
    }

    /// Check if a node exists.
    pub fn has_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All nodes in first-insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> {
        self.graph.node_weights()
    }

    /// All edges as `(source, target, label)`, in insertion order.
    pub fn edges(&self) -> Vec<(&str, &str, &str)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].name.as_str(),
                    self.graph[e.target()].name.as_str(),
                    e.weight().label.as_str(),
                )
            })
            .collect()
    }

    /// Labels of every edge from `source` to `target`.
    pub fn labels_between(&self, source: &str, target: &str) -> Vec<&str> {
        let (Some(&s), Some(&t)) = (self.node_index.get(source), self.node_index.get(target)) else {
            return vec![];
        };
        let mut labels: Vec<(usize, &str)> = self
            .graph
            .edges_connecting(s, t)
            .map(|e| (e.id().index(), e.weight().label.as_str()))
            .collect();
        labels.sort_by_key(|(id, _)| *id);
        labels.into_iter().map(|(_, label)| label).collect()
    }

    /// Outgoing `(label, target)` pairs of a node.
    pub fn outgoing(&self, name: &str) -> Vec<(&str, &str)> {
        self.neighbours(name, Direction::Outgoing)
    }

    /// Incoming `(label, source)` pairs of a node.
    pub fn incoming(&self, name: &str) -> Vec<(&str, &str)> {
        self.neighbours(name, Direction::Incoming)
    }

    fn neighbours(&self, name: &str, direction: Direction) -> Vec<(&str, &str)> {
        let Some(&idx) = self.node_index.get(name) else {
            return vec![];
        };
        let mut found: Vec<(usize, &str, &str)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.id().index(), e.weight().label.as_str(), self.graph[other].name.as_str())
            })
            .collect();
        found.sort_by_key(|(id, _, _)| *id);
        found.into_iter().map(|(_, label, other)| (label, other)).collect()
    }

    /// Direct access to the underlying petgraph graph.
    pub fn graph(&self) -> &DiGraph<NodeData, EdgeData> {
        &self.graph
    }
}

impl Default for TheoryGraph {
    fn default() -> Self {
        Self::new(EdgePolicy::default())
    }
}

/// Structural equality: same nodes with the same attributes in the same
/// order, same edges and labels in the same order.
impl PartialEq for TheoryGraph {
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy
            && self.nodes().eq(other.nodes())
            && self.edges() == other.edges()
    }
}

impl Eq for TheoryGraph {}

impl std::fmt::Debug for TheoryGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TheoryGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("policy", &self.policy)
            .finish()
    }
}
