//! Merged knowledge graph of constructs and theories.
//!
//! The graph is rebuilt from scratch on every build request and is a
//! read-only snapshot afterwards.
//!
//! - **Identity resolution** ([`identity`]): one description per construct name, last write wins
//! - **Graph store** ([`TheoryGraph`]): `petgraph` directed graph keyed by node name
//! - **Builder** ([`GraphBuilder`]): the two-pass merge over a theory collection
//! - **Analytics** ([`analytics`]): read-only summaries for external analysis

pub mod analytics;
pub mod builder;
pub mod identity;
pub mod index;

pub use builder::{
    BuildReport, CollisionKind, DroppedAnnotation, GraphBuilder, NameCollision, build_graph,
};
pub use identity::{ConstructIndex, ResolvedConstruct, resolve_constructs};
pub use index::TheoryGraph;

use serde::{Deserialize, Serialize};

/// Edge label linking a theory node to each construct it declares.
pub const HAS_CONSTRUCT: &str = "has_construct";

/// What a node in the merged graph represents.
///
/// Constructs and theories share one name namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Construct,
    Theory,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Construct => "construct",
            Self::Theory => "theory",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node weight stored in the petgraph graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    /// Identity key, unique across the graph.
    pub name: String,
    pub kind: NodeKind,
    /// Empty for constructs only ever referenced by a triple.
    pub description: String,
    /// Formatted annotation strings, in input order, never deduplicated.
    pub annotations: Vec<String>,
}

impl NodeData {
    fn new(name: &str, kind: NodeKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: description.to_string(),
            annotations: Vec::new(),
        }
    }
}

/// Edge weight: the predicate text, or [`HAS_CONSTRUCT`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub label: String,
}

/// How repeated `(source, target)` pairs are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// One edge per `(source, target)`; the last label written wins.
    #[default]
    Collapse,
    /// One edge per `(source, target, label)`.
    Multi,
}
