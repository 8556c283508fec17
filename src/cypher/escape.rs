//! Literal escaping and relationship-type sanitization.
//!
//! Escaping is not idempotent: it must be applied exactly once per literal,
//! at the point the literal is embedded in a statement. [`Literal`] is the
//! only place statements do that.

use std::sync::LazyLock;

use regex::Regex;

static NON_TYPE_CHAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_]").unwrap()
});

/// Escape text for embedding inside a single-quoted Cypher string literal.
///
/// Each `'` becomes `\'`. Nothing else is transformed.
pub fn escape_literal(text: &str) -> String {
    text.replace('\'', "\\'")
}

/// A string rendered escaped and single-quoted: `'O\'Brien'`.
#[derive(Debug, Clone, Copy)]
pub struct Literal<'a>(pub &'a str);

impl std::fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", escape_literal(self.0))
    }
}

/// A non-empty relationship-type token made of `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipType(String);

impl RelationshipType {
    /// Sanitize a free-text predicate: upper-case it, turn spaces into
    /// underscores, then replace every other character outside
    /// `[A-Za-z0-9_]` with `_`.
    ///
    /// Returns `None` when the result is empty (only for an empty predicate).
    pub fn from_predicate(predicate: &str) -> Option<Self> {
        let upper = predicate.to_uppercase().replace(' ', "_");
        let token = NON_TYPE_CHAR.replace_all(&upper, "_").into_owned();
        if token.is_empty() { None } else { Some(Self(token)) }
    }

    /// The type linking a theory node to its constructs.
    pub fn has_construct() -> Self {
        Self("HAS_CONSTRUCT".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
