//! Two-pass merge of a theory collection into one [`TheoryGraph`].
//!
//! 1. Resolve construct identities over all theories and materialize one
//!    construct node per name.
//! 2. For each complete theory, in input order: upsert the theory node, link
//!    it to its declared constructs, add one edge per triple (creating bare
//!    construct nodes for undeclared endpoints), then attach annotations to
//!    nodes that exist at that point.
//!
//! Incomplete theories contribute construct names and descriptions only.

use crate::model::Theory;

use super::identity::{ConstructIndex, resolve_constructs};
use super::index::{EdgeWrite, TheoryGraph};
use super::{EdgePolicy, HAS_CONSTRUCT, NodeKind};

/// An annotation whose target node did not exist when it was processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedAnnotation {
    pub theory_id: u64,
    pub construct: String,
    pub relation: String,
}

/// How two things ended up sharing one node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// A theory node overwrote a construct node of the same name.
    TheoryReplacedConstruct,
    /// Two complete theories share a name; the later one's description wins.
    TheoryReplacedTheory,
    /// A triple endpoint names an existing theory node.
    TripleReferencesTheory,
}

/// A diagnostic for the shared construct/theory namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    pub name: String,
    pub theory_id: u64,
    pub kind: CollisionKind,
}

/// Everything a build produced: the graph plus diagnostics.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub graph: TheoryGraph,
    pub constructs: ConstructIndex,
    pub dropped_annotations: Vec<DroppedAnnotation>,
    pub name_collisions: Vec<NameCollision>,
    /// Number of `(source, target)` edges whose label was overwritten.
    pub relabelled_edges: usize,
}

/// Builds the merged graph. Stateless; every call rebuilds from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    policy: EdgePolicy,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the merged graph.
    pub fn build(&self, theories: &[Theory]) -> TheoryGraph {
        self.build_with_report(theories).graph
    }

    /// Build the merged graph and collect diagnostics along the way.
    pub fn build_with_report(&self, theories: &[Theory]) -> BuildReport {
        let constructs = resolve_constructs(theories);

        let mut graph = TheoryGraph::new(self.policy);
        for construct in constructs.iter() {
            graph.upsert_construct(&construct.name, &construct.description);
        }

        let mut dropped_annotations = Vec::new();
        let mut name_collisions = Vec::new();
        let mut relabelled_edges = 0;

        for theory in theories.iter().filter(|t| t.complete) {
            let (theory_idx, previous) = graph.upsert_theory(&theory.name, &theory.description);
            if let Some(previous) = previous {
                let kind = match previous {
                    NodeKind::Construct => CollisionKind::TheoryReplacedConstruct,
                    NodeKind::Theory => CollisionKind::TheoryReplacedTheory,
                };
                tracing::warn!(
                    name = %theory.name,
                    theory_id = theory.id,
                    replaced = %previous,
                    "theory name collides with an existing node"
                );
                name_collisions.push(NameCollision {
                    name: theory.name.clone(),
                    theory_id: theory.id,
                    kind,
                });
            }

            for construct in &theory.constructs {
                let idx = graph.ensure_construct(&construct.name);
                if let EdgeWrite::Replaced(_) = graph.write_edge(theory_idx, idx, HAS_CONSTRUCT) {
                    relabelled_edges += 1;
                }
            }

            for triple in &theory.triples {
                let mut endpoints = vec![&triple.subject];
                if triple.object != triple.subject {
                    endpoints.push(&triple.object);
                }
                for endpoint in endpoints {
                    if graph.node(endpoint).is_some_and(|n| n.kind == NodeKind::Theory) {
                        tracing::warn!(
                            name = %endpoint,
                            theory_id = theory.id,
                            "triple endpoint names a theory node"
                        );
                        name_collisions.push(NameCollision {
                            name: endpoint.clone(),
                            theory_id: theory.id,
                            kind: CollisionKind::TripleReferencesTheory,
                        });
                    }
                }
                let subject = graph.ensure_construct(&triple.subject);
                let object = graph.ensure_construct(&triple.object);
                if let EdgeWrite::Replaced(old) =
                    graph.write_edge(subject, object, &triple.predicate)
                {
                    tracing::debug!(
                        subject = %triple.subject,
                        object = %triple.object,
                        old = %old,
                        new = %triple.predicate,
                        "edge label overwritten"
                    );
                    relabelled_edges += 1;
                }
            }

            for annotation in &theory.annotations {
                if !graph.annotate(&annotation.construct, annotation.label()) {
                    tracing::debug!(
                        construct = %annotation.construct,
                        theory_id = theory.id,
                        "annotation target not in graph, dropped"
                    );
                    dropped_annotations.push(DroppedAnnotation {
                        theory_id: theory.id,
                        construct: annotation.construct.clone(),
                        relation: annotation.relation.clone(),
                    });
                }
            }
        }

        tracing::info!(
            theories = theories.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped = dropped_annotations.len(),
            collisions = name_collisions.len(),
            "graph built"
        );

        BuildReport {
            graph,
            constructs,
            dropped_annotations,
            name_collisions,
            relabelled_edges,
        }
    }
}

/// Build the merged graph with the default (collapsing) edge policy.
pub fn build_graph(theories: &[Theory]) -> TheoryGraph {
    GraphBuilder::new().build(theories)
}
