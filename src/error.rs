//! Rich diagnostic error types for theory-graph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know which record is at fault
//! and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for theory-graph.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum TheoryGraphError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("theory collection must be a JSON array, found {found}")]
    #[diagnostic(
        code(theory_graph::validate::not_an_array),
        help("The data file holds a list of theory objects: `[{{\"id\": 1, \"name\": ...}}, ...]`.")
    )]
    NotAnArray { found: String },

    #[error("theory {theory_id}: missing required field `{field}`")]
    #[diagnostic(
        code(theory_graph::validate::missing_field),
        help("Add the `{field}` field to theory {theory_id}, or remove the incomplete entry.")
    )]
    MissingField { theory_id: u64, field: String },

    #[error("theory {theory_id}: field `{field}` must be {expected}")]
    #[diagnostic(
        code(theory_graph::validate::wrong_type),
        help("Fix the value of `{field}` in theory {theory_id}; it must be {expected}.")
    )]
    WrongType {
        theory_id: u64,
        field: String,
        expected: &'static str,
    },

    #[error("duplicate theory id {theory_id}")]
    #[diagnostic(
        code(theory_graph::validate::duplicate_id),
        help("Theory ids are assigned once and must be unique across the collection.")
    )]
    DuplicateId { theory_id: u64 },
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error(
        "theory {theory_id}, triple {index}: predicate \"{predicate}\" \
         yields an empty relationship type"
    )]
    #[diagnostic(
        code(theory_graph::cypher::empty_relationship_type),
        help(
            "Cypher relationship types cannot be empty. \
             Give the triple a predicate containing at least one character."
        )
    )]
    EmptyRelationshipType {
        theory_id: u64,
        index: usize,
        predicate: String,
    },

    #[error("failed to serialize annotations for construct \"{construct}\": {message}")]
    #[diagnostic(
        code(theory_graph::cypher::annotations),
        help("The annotation list could not be rendered as JSON. This is a bug; please report it.")
    )]
    Annotations { construct: String, message: String },
}

// ---------------------------------------------------------------------------
// Corpus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CorpusError {
    #[error("corpus I/O error: {message}")]
    #[diagnostic(
        code(theory_graph::corpus::io),
        help(
            "Failed to read or write the theory data file. Check that the \
             path exists and has correct permissions."
        )
    )]
    Io { message: String },

    #[error("corpus parse error in {path}: {message}")]
    #[diagnostic(
        code(theory_graph::corpus::parse),
        help("The data file is not valid JSON. Fix the syntax or restore it from a backup.")
    )]
    Parse { path: String, message: String },

    #[error("theory not found: id {id}")]
    #[diagnostic(
        code(theory_graph::corpus::not_found),
        help(
            "Theory ids are 1-based. List available theories with \
             `theory-graph incomplete` or inspect the data file."
        )
    )]
    NotFound { id: u64 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Invalid(#[from] ValidationError),
}

// ---------------------------------------------------------------------------
// Output errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OutputError {
    #[error("failed to write script {path}")]
    #[diagnostic(
        code(theory_graph::output::write),
        help(
            "Check that the export directory is writable and the disk is not full. \
             Change it with `export_dir` in the config or `--out-dir`."
        )
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render graph snapshot: {message}")]
    #[diagnostic(
        code(theory_graph::output::snapshot),
        help("The built graph could not be serialized as JSON. This is a bug; please report it.")
    )]
    Snapshot { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Export(#[from] ExportError),
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    #[diagnostic(
        code(theory_graph::config::read),
        help("Check that the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    #[diagnostic(
        code(theory_graph::config::parse),
        help(
            "The config file must be TOML. \
             Known keys: data_file, export_dir, seed_count, edge_policy."
        )
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning theory-graph results.
pub type TheoryResult<T> = std::result::Result<T, TheoryGraphError>;
