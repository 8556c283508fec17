// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # theory-graph
//!
//! Merge independently authored behavioural-theory records into one
//! deduplicated knowledge graph, and export each theory as an idempotent
//! Cypher load script.
//!
//! ## Architecture
//!
//! - **Data model** (`model`): theories with constructs, triples, annotations
//! - **Validation** (`validate`): fail-fast structural checks on raw JSON records
//! - **Graph builder** (`graph`): two-pass merge into a `petgraph` graph keyed by name
//! - **Cypher exporter** (`cypher`): typed `MERGE` statements with single-point escaping
//! - **Outer shell** (`corpus`, `output`, `config`): data file, script files, TOML config
//!
//! The core (`model`, `validate`, `graph`, `cypher`) does no I/O and holds no
//! shared state; build and export calls on distinct snapshots may run
//! concurrently.
//!
//! ## Library usage
//!
//! ```
//! use theory_graph::model::{Annotation, Construct, Theory, Triple};
//! use theory_graph::graph::GraphBuilder;
//! use theory_graph::cypher;
//!
//! let theory = Theory::new(1, "T")
//!     .with_complete(true)
//!     .with_construct(Construct::new("Desire", "Wanting"))
//!     .with_triple(Triple::new("Desire", "influences", "Action"))
//!     .with_annotation(Annotation::new("Desire", "MF:0000045", "Wanting", "1"));
//!
//! let graph = GraphBuilder::new().build(std::slice::from_ref(&theory));
//! assert_eq!(graph.labels_between("Desire", "Action"), vec!["influences"]);
//!
//! let script = cypher::export(&theory).unwrap();
//! assert!(script.to_string().contains("MERGE (a)-[:INFLUENCES]->(b);"));
//! ```

pub mod config;
pub mod corpus;
pub mod cypher;
pub mod error;
pub mod export;
pub mod graph;
pub mod model;
pub mod output;
pub mod validate;
