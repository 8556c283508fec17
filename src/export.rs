//! Export types for handing a built graph to an external renderer.
//!
//! These types provide a flat, serializable view of a [`TheoryGraph`]:
//! nodes in insertion order and edges as name pairs, suitable for JSON.

use serde::{Deserialize, Serialize};

use crate::graph::{NodeKind, TheoryGraph};

/// Exported node with its attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeExport {
    pub name: String,
    /// `construct` or `theory`.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub description: String,
    /// Formatted annotation strings; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,
}

/// Exported directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeExport {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Full graph snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<NodeExport>,
    pub edges: Vec<EdgeExport>,
}

impl From<&TheoryGraph> for GraphExport {
    fn from(graph: &TheoryGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|n| NodeExport {
                name: n.name.clone(),
                kind: n.kind,
                description: n.description.clone(),
                annotations: n.annotations.clone(),
            })
            .collect();
        let edges = graph
            .edges()
            .into_iter()
            .map(|(source, target, label)| EdgeExport {
                source: source.to_string(),
                target: target.to_string(),
                label: label.to_string(),
            })
            .collect();
        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_graph;
    use crate::model::{Annotation, Construct, Theory, Triple};

    #[test]
    fn snapshot_json_shape() {
        let theories = vec![
            Theory::new(1, "T")
                .with_complete(true)
                .with_construct(Construct::new("Desire", "Wanting"))
                .with_triple(Triple::new("Desire", "influences", "Action"))
                .with_annotation(Annotation::new("Desire", "MF:1", "Wanting", "1")),
        ];
        let export = GraphExport::from(&build_graph(&theories));
        let json = serde_json::to_value(&export).unwrap();

        assert_eq!(json["nodes"][0]["name"], "Desire");
        assert_eq!(json["nodes"][0]["type"], "construct");
        assert_eq!(json["nodes"][0]["annotations"][0], "MF:1: Wanting (Source: 1)");
        assert_eq!(json["nodes"][1]["type"], "theory");
        assert!(json["nodes"][1].get("annotations").is_none());
        assert_eq!(json["edges"][0]["label"], "has_construct");
        assert_eq!(json["edges"][1]["source"], "Desire");
        assert_eq!(json["edges"][1]["target"], "Action");
        assert_eq!(json["edges"][1]["label"], "influences");
    }
}
