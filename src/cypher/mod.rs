//! Cypher export: one theory record in, one idempotent load script out.
//!
//! Every statement is a `MERGE` keyed by node name or node pair, so replaying
//! a script against a store that already holds it changes nothing. Output
//! depends only on the theory passed in and is fully determined by the
//! order of its lists.

pub mod annotations;
pub mod escape;
pub mod statement;

use std::collections::HashMap;

use crate::error::ExportError;
use crate::model::{Annotation, Theory};

pub use escape::{Literal, RelationshipType, escape_literal};
pub use statement::{CypherScript, Section, Statement};

/// Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;

pub const THEORY_SECTION: &str = "Create the main theory node";
pub const CONSTRUCT_SECTION: &str = "Create construct nodes and add properties";
pub const MEMBERSHIP_SECTION: &str = "Create relationships from the theory to its constructs";
pub const RELATIONSHIP_SECTION: &str = "Create relationships between constructs based on triples";

/// Export one theory as a Cypher load script.
///
/// Triples whose endpoints were never declared as constructs still produce a
/// relationship statement; it simply matches nothing in a store that lacks
/// those nodes.
///
/// # Errors
///
/// [`ExportError::EmptyRelationshipType`] if a triple's predicate sanitizes to
/// an empty relationship type.
pub fn export(theory: &Theory) -> ExportResult<CypherScript> {
    let mut theory_section = Section::new(THEORY_SECTION);
    theory_section.statements.push(Statement::MergeTheory {
        name: theory.name.clone(),
    });

    let by_construct = group_annotations(&theory.annotations);

    let mut construct_section = Section::new(CONSTRUCT_SECTION);
    for construct in &theory.constructs {
        let annotations = match by_construct.get(construct.name.as_str()) {
            Some(list) => Some(annotations::annotations_json(list).map_err(|e| {
                ExportError::Annotations {
                    construct: construct.name.clone(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };
        construct_section.statements.push(Statement::MergeConstruct {
            name: construct.name.clone(),
            description: construct.description.clone(),
            annotations,
        });
    }

    let mut membership_section = Section::new(MEMBERSHIP_SECTION);
    membership_section.statements.extend(theory.constructs.iter().map(|c| {
        Statement::LinkConstruct {
            theory: theory.name.clone(),
            construct: c.name.clone(),
        }
    }));

    let mut relationship_section = Section::new(RELATIONSHIP_SECTION);
    for (index, triple) in theory.triples.iter().enumerate() {
        let rel_type = RelationshipType::from_predicate(&triple.predicate).ok_or_else(|| {
            ExportError::EmptyRelationshipType {
                theory_id: theory.id,
                index,
                predicate: triple.predicate.clone(),
            }
        })?;
        relationship_section.statements.push(Statement::Relate {
            subject: triple.subject.clone(),
            rel_type,
            object: triple.object.clone(),
        });
    }

    tracing::debug!(
        theory = %theory.name,
        constructs = theory.constructs.len(),
        triples = theory.triples.len(),
        "exported theory to cypher"
    );

    Ok(CypherScript {
        title: theory.name.clone(),
        sections: vec![
            theory_section,
            construct_section,
            membership_section,
            relationship_section,
        ],
    })
}

/// Bucket annotations by the construct they name, keeping input order
/// within each bucket.
fn group_annotations(annotations: &[Annotation]) -> HashMap<&str, Vec<&Annotation>> {
    let mut groups: HashMap<&str, Vec<&Annotation>> = HashMap::new();
    for annotation in annotations {
        groups
            .entry(annotation.construct.as_str())
            .or_default()
            .push(annotation);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Construct, Triple};

    fn desire_theory() -> Theory {
        Theory::new(1, "T")
            .with_complete(true)
            .with_construct(Construct::new("Desire", "Wanting"))
            .with_triple(Triple::new("Desire", "influences", "Action"))
            .with_annotation(Annotation::new("Desire", "MF:0000045", "Wanting", "1"))
    }

    #[test]
    fn end_to_end_script() {
        let script = export(&desire_theory()).unwrap();
        let expected = "\
// Cypher script for T

// Create the main theory node
MERGE (t:Theory {name: 'T'});

// Create construct nodes and add properties
MERGE (c:Construct {name: 'Desire'})
SET c += {name: 'Desire', description: 'Wanting', annotations: '[{\"construct\": \"Desire\", \"relation\": \"MF:0000045\", \"value\": \"Wanting\", \"source\": \"1\"}]'};

// Create relationships from the theory to its constructs
MATCH (t:Theory {name: 'T'}), (c:Construct {name: 'Desire'}) MERGE (t)-[:HAS_CONSTRUCT]->(c);

// Create relationships between constructs based on triples
MATCH (a:Construct {name: 'Desire'}), (b:Construct {name: 'Action'}) MERGE (a)-[:INFLUENCES]->(b);
";
        assert_eq!(script.to_string(), expected);
    }

    #[test]
    fn undeclared_endpoint_gets_no_node_statement() {
        let script = export(&desire_theory()).unwrap();
        let merged: Vec<&str> = script
            .statements()
            .filter_map(|s| match s {
                Statement::MergeConstruct { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(merged, vec!["Desire"]);
        assert!(script.to_string().contains("(b:Construct {name: 'Action'})"));
    }

    #[test]
    fn export_is_deterministic() {
        let theory = desire_theory()
            .with_annotation(Annotation::new("Desire", "BCIO:006075", "Subjective need", "1 82"))
            .with_construct(Construct::new("Habit", ""))
            .with_annotation(Annotation::new("Habit", "r", "v", "s"));
        let a = export(&theory).unwrap().to_string();
        let b = export(&theory).unwrap().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn quotes_are_escaped_everywhere() {
        let theory = Theory::new(2, "Mind")
            .with_construct(Construct::new("O'Brien", "Brien's construct"))
            .with_triple(Triple::new("O'Brien", "is a type of", "Person's trait"))
            .with_annotation(Annotation::new("O'Brien", "r", "it's", "s"));
        let script = export(&theory).unwrap();

        for line in script.lines() {
            let bare = line.replace("\\'", "");
            assert!(!line.contains("O'Brien"), "raw name leaked in {line}");
            assert_eq!(bare.matches('\'').count() % 2, 0, "unbalanced literal quotes in {line}");
        }
        let text = script.to_string();
        assert!(text.contains("{name: 'O\\'Brien'}"));
        assert!(text.contains("[:IS_A_TYPE_OF]"));
        assert!(text.contains("\"value\": \"it\\'s\""));
        assert!(!text.contains("\\\\'"));
    }

    #[test]
    fn no_constructs_emits_theory_statement_only() {
        let script = export(&Theory::new(3, "Empty")).unwrap();
        assert_eq!(script.statements().count(), 1);
        assert_eq!(
            script.to_string(),
            "// Cypher script for Empty\n\n\
             // Create the main theory node\nMERGE (t:Theory {name: 'Empty'});\n\n\
             // Create construct nodes and add properties\n\n\
             // Create relationships from the theory to its constructs\n\n\
             // Create relationships between constructs based on triples\n"
        );
    }

    #[test]
    fn empty_predicate_is_rejected() {
        let theory = Theory::new(8, "T")
            .with_triple(Triple::new("A", "ok", "B"))
            .with_triple(Triple::new("A", "", "B"));
        match export(&theory) {
            Err(ExportError::EmptyRelationshipType {
                theory_id, index, ..
            }) => {
                assert_eq!(theory_id, 8);
                assert_eq!(index, 1);
            }
            other => panic!("expected empty relationship type error, got {other:?}"),
        }
    }

    #[test]
    fn annotations_for_undeclared_constructs_are_not_emitted() {
        let theory = Theory::new(4, "T")
            .with_construct(Construct::new("A", ""))
            .with_annotation(Annotation::new("Ghost", "r", "v", "s"));
        let text = export(&theory).unwrap().to_string();
        assert!(!text.contains("Ghost"));
        assert!(!text.contains("annotations:"));
    }

    #[test]
    fn sections_in_fixed_order() {
        let script = export(&desire_theory()).unwrap();
        let headings: Vec<&str> = script.sections.iter().map(|s| s.heading).collect();
        assert_eq!(
            headings,
            vec![THEORY_SECTION, CONSTRUCT_SECTION, MEMBERSHIP_SECTION, RELATIONSHIP_SECTION]
        );
    }
}
