//! Theory records: the data model shared by the graph builder and the
//! Cypher exporter.
//!
//! A [`Theory`] bundles named [`Construct`]s, subject-predicate-object
//! [`Triple`]s, and typed [`Annotation`]s. Records are owned by the caller;
//! the core only reads them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single theory record.
///
/// Fields this crate does not interpret (e.g. `picture_path`) are kept in
/// [`Theory::extra`] and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theory {
    /// Externally assigned, 1-based, unique.
    pub id: u64,
    /// Human-readable name; also the theory's node identity in the merged graph.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Set by the author once the record is considered finished.
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub constructs: Vec<Construct>,
    #[serde(default)]
    pub triples: Vec<Triple>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Unrecognized fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Theory {
    /// Create an empty, incomplete theory.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            complete: false,
            constructs: Vec::new(),
            triples: Vec::new(),
            annotations: Vec::new(),
            extra: Map::new(),
        }
    }

    /// A blank placeholder as created when seeding a fresh corpus.
    pub fn placeholder(id: u64) -> Self {
        let mut theory = Self::new(id, format!("Theory {id}"));
        theory
            .extra
            .insert("picture_path".into(), Value::String(String::new()));
        theory
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_complete(mut self, complete: bool) -> Self {
        self.complete = complete;
        self
    }

    pub fn with_construct(mut self, construct: Construct) -> Self {
        self.constructs.push(construct);
        self
    }

    pub fn with_triple(mut self, triple: Triple) -> Self {
        self.triples.push(triple);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A named construct. The name is its identity key across all theories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Construct {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Construct {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A directed relationship between two constructs, referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// A typed annotation on a construct (e.g. an ontology term with its source).
///
/// Field order is significant: it is the serialized key order of the
/// `annotations` property in exported scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub construct: String,
    pub relation: String,
    pub value: String,
    pub source: String,
}

impl Annotation {
    pub fn new(
        construct: impl Into<String>,
        relation: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            construct: construct.into(),
            relation: relation.into(),
            value: value.into(),
            source: source.into(),
        }
    }

    /// Display form attached to graph nodes: `"{relation}: {value} (Source: {source})"`.
    pub fn label(&self) -> String {
        format!("{}: {} (Source: {})", self.relation, self.value, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_label_format() {
        let ann = Annotation::new("Desire", "MF:0000045", "Wanting", "1");
        assert_eq!(ann.label(), "MF:0000045: Wanting (Source: 1)");
    }

    #[test]
    fn unknown_fields_pass_through() {
        let json = r#"{"id": 3, "name": "T", "picture_path": "img/t.png", "complete": true}"#;
        let theory: Theory = serde_json::from_str(json).unwrap();
        assert_eq!(theory.extra["picture_path"], "img/t.png");
        assert!(theory.constructs.is_empty());

        let back = serde_json::to_value(&theory).unwrap();
        assert_eq!(back["picture_path"], "img/t.png");
    }

    #[test]
    fn placeholder_matches_seed_shape() {
        let t = Theory::placeholder(5);
        assert_eq!(t.name, "Theory 5");
        assert!(!t.complete);
        assert_eq!(t.extra["picture_path"], "");
    }
}
