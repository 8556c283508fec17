//! Writing exported Cypher scripts to disk.
//!
//! One file per theory, named after the theory with path-hostile characters
//! removed: `{name}_cypher.cypher`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cypher;
use crate::error::OutputError;
use crate::export::GraphExport;
use crate::model::Theory;

/// Result type for script output.
pub type OutputResult<T> = std::result::Result<T, OutputError>;

const FORBIDDEN: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// File name for a theory's script.
pub fn script_file_name(theory_name: &str) -> String {
    let stem: String = theory_name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    format!("{stem}_cypher.cypher")
}

/// Export one theory and write its script into `dir`, creating the
/// directory if needed. Returns the written path.
pub fn write_script(dir: &Path, theory: &Theory) -> OutputResult<PathBuf> {
    let script = cypher::export(theory)?;

    std::fs::create_dir_all(dir).map_err(|source| OutputError::Write {
        path: dir.display().to_string(),
        source,
    })?;
    let path = dir.join(script_file_name(&theory.name));
    std::fs::write(&path, script.to_string()).map_err(|source| OutputError::Write {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(theory = %theory.name, path = %path.display(), "wrote cypher script");
    Ok(path)
}

/// Export and write every theory. Stops at the first failure.
///
/// Theories whose names reduce to the same file name overwrite each other;
/// the later one wins and a warning is logged.
pub fn write_all(dir: &Path, theories: &[Theory]) -> OutputResult<Vec<PathBuf>> {
    let mut written: HashMap<PathBuf, u64> = HashMap::with_capacity(theories.len());
    let mut paths = Vec::with_capacity(theories.len());
    for theory in theories {
        let path = write_script(dir, theory)?;
        if let Some(previous) = written.insert(path.clone(), theory.id) {
            tracing::warn!(
                path = %path.display(),
                theory_id = theory.id,
                overwritten = previous,
                "script file name already used by an earlier theory"
            );
        }
        paths.push(path);
    }
    Ok(paths)
}

/// Render a graph snapshot as pretty-printed JSON.
pub fn snapshot_json(snapshot: &GraphExport) -> OutputResult<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| OutputError::Snapshot {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Construct, Triple};

    #[test]
    fn file_name_strips_forbidden_characters() {
        assert_eq!(script_file_name("Theory 1"), "Theory 1_cypher.cypher");
        assert_eq!(
            script_file_name("COM-B: \"What/Why\"?"),
            "COM-B WhatWhy_cypher.cypher"
        );
        assert_eq!(script_file_name("a<b>|c*d\\e"), "abcde_cypher.cypher");
    }

    #[test]
    fn writes_script_into_new_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("cypher_exports");
        let theory = Theory::new(1, "T")
            .with_construct(Construct::new("Desire", "Wanting"))
            .with_triple(Triple::new("Desire", "influences", "Action"));

        let path = write_script(&out, &theory).unwrap();
        assert_eq!(path, out.join("T_cypher.cypher"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, cypher::export(&theory).unwrap().to_string());
    }

    #[test]
    fn invalid_theory_is_not_written() {
        let dir = tempfile::TempDir::new().unwrap();
        let theory = Theory::new(5, "Bad").with_triple(Triple::new("A", "", "B"));

        let err = write_script(dir.path(), &theory).unwrap_err();
        assert!(matches!(err, OutputError::Export(_)));
        assert!(!dir.path().join("Bad_cypher.cypher").exists());
    }

    #[test]
    fn colliding_file_names_keep_the_later_theory() {
        let dir = tempfile::TempDir::new().unwrap();
        let first = Theory::new(1, "A:B").with_construct(Construct::new("First", ""));
        let second = Theory::new(2, "AB").with_construct(Construct::new("Second", ""));

        let paths = write_all(dir.path(), &[first, second.clone()]).unwrap();
        assert_eq!(paths[0], paths[1]);
        assert_eq!(paths[0], dir.path().join("AB_cypher.cypher"));

        let text = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(text, cypher::export(&second).unwrap().to_string());
    }

    #[test]
    fn snapshot_json_is_pretty_printed() {
        let graph = crate::graph::build_graph(&[Theory::new(1, "T")
            .with_complete(true)
            .with_triple(Triple::new("Desire", "influences", "Action"))]);
        let json = snapshot_json(&GraphExport::from(&graph)).unwrap();
        assert!(json.starts_with("{\n  \"nodes\": ["));
        assert!(json.contains("\"label\": \"influences\""));
    }

    #[test]
    fn write_all_returns_paths_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let theories = vec![Theory::new(1, "A"), Theory::new(2, "B")];
        let paths = write_all(dir.path(), &theories).unwrap();
        assert_eq!(
            paths,
            vec![dir.path().join("A_cypher.cypher"), dir.path().join("B_cypher.cypher")]
        );
    }
}
