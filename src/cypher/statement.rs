//! Typed Cypher statements and the script layout that holds them.
//!
//! Statements carry raw (unescaped) text; [`Literal`] escapes each value once
//! when the statement is rendered.

use super::escape::{Literal, RelationshipType, escape_literal};

/// One upsert statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `MERGE` a theory node keyed by name.
    MergeTheory { name: String },
    /// `MERGE` a construct node keyed by name and set its properties.
    MergeConstruct {
        name: String,
        description: String,
        /// Serialized annotation array, if the construct has any.
        annotations: Option<String>,
    },
    /// `MERGE` a relationship between a theory node and a construct node.
    LinkConstruct { theory: String, construct: String },
    /// `MERGE` a typed relationship between two construct nodes.
    Relate {
        subject: String,
        rel_type: RelationshipType,
        object: String,
    },
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MergeTheory { name } => {
                write!(f, "MERGE (t:Theory {{name: {}}});", Literal(name))
            }
            Self::MergeConstruct {
                name,
                description,
                annotations,
            } => {
                write!(
                    f,
                    "MERGE (c:Construct {{name: {name}}})\nSET c += {{name: {name}, description: {}",
                    Literal(description),
                    name = Literal(name),
                )?;
                if let Some(annotations) = annotations {
                    write!(f, ", annotations: {}", Literal(annotations))?;
                }
                f.write_str("};")
            }
            Self::LinkConstruct { theory, construct } => write!(
                f,
                "MATCH (t:Theory {{name: {}}}), (c:Construct {{name: {}}}) MERGE (t)-[:{}]->(c);",
                Literal(theory),
                Literal(construct),
                RelationshipType::has_construct(),
            ),
            Self::Relate {
                subject,
                rel_type,
                object,
            } => write!(
                f,
                "MATCH (a:Construct {{name: {}}}), (b:Construct {{name: {}}}) MERGE (a)-[:{rel_type}]->(b);",
                Literal(subject),
                Literal(object),
            ),
        }
    }
}

/// A commented group of statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub statements: Vec<Statement>,
}

impl Section {
    pub fn new(heading: &'static str) -> Self {
        Self {
            heading,
            statements: Vec::new(),
        }
    }
}

/// The load script for one theory.
///
/// Layout: a title comment and a blank line, then each section as a comment
/// heading followed by one statement per line, with a blank line between
/// sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherScript {
    pub title: String,
    pub sections: Vec<Section>,
}

impl CypherScript {
    /// All statements in emission order.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.sections.iter().flat_map(|s| s.statements.iter())
    }

    /// The rendered script split into text lines (without terminators).
    pub fn lines(&self) -> Vec<String> {
        self.to_string().lines().map(str::to_string).collect()
    }
}

impl std::fmt::Display for CypherScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "// Cypher script for {}", comment_text(&self.title))?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "// {}", section.heading)?;
            for statement in &section.statements {
                writeln!(f, "{statement}")?;
            }
        }
        Ok(())
    }
}

/// Comment-safe form of free text: escaped like a literal, with line breaks
/// flattened so the text cannot leave the comment.
fn comment_text(text: &str) -> String {
    escape_literal(text).replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_theory_renders() {
        let s = Statement::MergeTheory { name: "T".into() };
        assert_eq!(s.to_string(), "MERGE (t:Theory {name: 'T'});");
    }

    #[test]
    fn merge_construct_with_and_without_annotations() {
        let plain = Statement::MergeConstruct {
            name: "O'Brien".into(),
            description: "".into(),
            annotations: None,
        };
        assert_eq!(
            plain.to_string(),
            "MERGE (c:Construct {name: 'O\\'Brien'})\nSET c += {name: 'O\\'Brien', description: ''};"
        );

        let annotated = Statement::MergeConstruct {
            name: "X".into(),
            description: "d".into(),
            annotations: Some(r#"[{"value": "it's"}]"#.into()),
        };
        assert_eq!(
            annotated.to_string(),
            "MERGE (c:Construct {name: 'X'})\nSET c += {name: 'X', description: 'd', annotations: '[{\"value\": \"it\\'s\"}]'};"
        );
    }

    #[test]
    fn relationship_statements_render() {
        let link = Statement::LinkConstruct {
            theory: "T".into(),
            construct: "Desire".into(),
        };
        assert_eq!(
            link.to_string(),
            "MATCH (t:Theory {name: 'T'}), (c:Construct {name: 'Desire'}) MERGE (t)-[:HAS_CONSTRUCT]->(c);"
        );

        let relate = Statement::Relate {
            subject: "Desire".into(),
            rel_type: RelationshipType::from_predicate("influences").unwrap(),
            object: "Action".into(),
        };
        assert_eq!(
            relate.to_string(),
            "MATCH (a:Construct {name: 'Desire'}), (b:Construct {name: 'Action'}) MERGE (a)-[:INFLUENCES]->(b);"
        );
    }

    #[test]
    fn empty_sections_keep_layout() {
        let script = CypherScript {
            title: "Empty".into(),
            sections: vec![Section::new("One"), Section::new("Two")],
        };
        assert_eq!(script.to_string(), "// Cypher script for Empty\n\n// One\n\n// Two\n");
    }

    #[test]
    fn title_cannot_break_out_of_comment() {
        let script = CypherScript {
            title: "Bad\nMATCH (n) DETACH DELETE n".into(),
            sections: vec![],
        };
        assert_eq!(script.lines().len(), 1);
    }
}
