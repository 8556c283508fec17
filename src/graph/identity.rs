//! Construct identity resolution.
//!
//! Constructs are identified by name across the whole collection. Before any
//! node is created, every declaration is folded into a [`ConstructIndex`]
//! that holds exactly one resolved description per name, so the winning
//! declaration for a name is an explicit, inspectable result.
//!
//! Resolution order is input theory order, then declaration order within a
//! theory, regardless of the theory's `complete` flag. A later declaration
//! overwrites the description of an earlier one; the name keeps the position
//! of its first declaration.

use indexmap::IndexMap;

use crate::model::Theory;

/// The resolved identity of one construct name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConstruct {
    pub name: String,
    /// Description of the last declaration.
    pub description: String,
    /// Id of the theory whose declaration won.
    pub declared_in: u64,
    /// How many declarations were folded into this entry.
    pub declarations: usize,
    /// Whether any two declarations disagreed on the description.
    pub conflicting: bool,
}

/// Name-keyed, first-declaration-ordered set of resolved constructs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructIndex {
    entries: IndexMap<String, ResolvedConstruct>,
}

impl ConstructIndex {
    pub fn get(&self, name: &str) -> Option<&ResolvedConstruct> {
        self.entries.get(name)
    }

    /// Position of a name in first-declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedConstruct> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose declarations disagreed on the description.
    pub fn conflicts(&self) -> impl Iterator<Item = &ResolvedConstruct> {
        self.entries.values().filter(|c| c.conflicting)
    }
}

/// Fold every declared construct of every theory into one index.
pub fn resolve_constructs(theories: &[Theory]) -> ConstructIndex {
    let mut entries: IndexMap<String, ResolvedConstruct> = IndexMap::new();

    for theory in theories {
        for construct in &theory.constructs {
            match entries.get_mut(&construct.name) {
                Some(entry) => {
                    if entry.description != construct.description {
                        tracing::debug!(
                            construct = %construct.name,
                            theory_id = theory.id,
                            "construct description overridden by later declaration"
                        );
                        entry.conflicting = true;
                    }
                    entry.description.clone_from(&construct.description);
                    entry.declared_in = theory.id;
                    entry.declarations += 1;
                }
                None => {
                    entries.insert(
                        construct.name.clone(),
                        ResolvedConstruct {
                            name: construct.name.clone(),
                            description: construct.description.clone(),
                            declared_in: theory.id,
                            declarations: 1,
                            conflicting: false,
                        },
                    );
                }
            }
        }
    }

    ConstructIndex { entries }
}
