//! Persistent theory collection backed by a JSON file.
//!
//! The file is a JSON array of theory records, written with 4-space
//! indentation. Every load runs structural validation, so a malformed record
//! is reported with its theory id and field before anything else sees it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::CorpusError;
use crate::model::Theory;
use crate::validate;

/// Result type for corpus operations.
pub type CorpusResult<T> = std::result::Result<T, CorpusError>;

/// The caller-owned collection of theory records.
pub struct TheoryCorpus {
    path: PathBuf,
    theories: Vec<Theory>,
}

impl TheoryCorpus {
    /// Open an existing data file.
    pub fn open(path: &Path) -> CorpusResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| CorpusError::Io {
            message: format!("read {}: {e}", path.display()),
        })?;
        let theories = parse_theories(&data, path)?;
        tracing::debug!(path = %path.display(), theories = theories.len(), "opened corpus");
        Ok(Self {
            path: path.to_path_buf(),
            theories,
        })
    }

    /// Open the data file, or create it with `seed_count` blank theories
    /// (ids `1..=seed_count`) if it does not exist yet.
    pub fn open_or_seed(path: &Path, seed_count: u64) -> CorpusResult<Self> {
        if path.exists() {
            return Self::open(path);
        }
        let corpus = Self {
            path: path.to_path_buf(),
            theories: (1..=seed_count).map(Theory::placeholder).collect(),
        };
        corpus.flush()?;
        tracing::info!(path = %path.display(), seed_count, "seeded new corpus");
        Ok(corpus)
    }

    /// An in-memory corpus that will be written to `path` on the next change.
    pub fn from_theories(path: &Path, theories: Vec<Theory>) -> Self {
        Self {
            path: path.to_path_buf(),
            theories,
        }
    }

    /// Write the corpus to disk.
    pub fn flush(&self) -> CorpusResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| CorpusError::Io {
                message: format!("create dir {}: {e}", parent.display()),
            })?;
        }
        let json = to_pretty_json(&self.theories).map_err(|e| CorpusError::Io {
            message: format!("serialize corpus: {e}"),
        })?;
        std::fs::write(&self.path, json).map_err(|e| CorpusError::Io {
            message: format!("write {}: {e}", self.path.display()),
        })?;
        Ok(())
    }

    /// Look up a theory by its id.
    pub fn get(&self, id: u64) -> CorpusResult<&Theory> {
        self.theories
            .iter()
            .find(|t| t.id == id)
            .ok_or(CorpusError::NotFound { id })
    }

    /// Replace the theory with the same id and persist.
    pub fn update(&mut self, theory: Theory) -> CorpusResult<()> {
        let slot = self
            .theories
            .iter_mut()
            .find(|t| t.id == theory.id)
            .ok_or(CorpusError::NotFound { id: theory.id })?;
        *slot = theory;
        self.flush()
    }

    /// Theories not yet marked complete, in corpus order.
    pub fn incomplete(&self) -> impl Iterator<Item = &Theory> {
        self.theories.iter().filter(|t| !t.complete)
    }

    /// All theories, in corpus order.
    pub fn theories(&self) -> &[Theory] {
        &self.theories
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.theories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theories.is_empty()
    }
}

/// Parse and validate a theory collection from JSON text.
pub fn parse_theories(data: &str, path: &Path) -> CorpusResult<Vec<Theory>> {
    let value: serde_json::Value = serde_json::from_str(data).map_err(|e| CorpusError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(validate::theories_from_value(value)?)
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::model::Construct;

    #[test]
    fn seeds_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("theory_data.json");

        let corpus = TheoryCorpus::open_or_seed(&path, 3).unwrap();
        assert_eq!(corpus.len(), 3);
        assert!(path.exists());
        assert_eq!(corpus.get(2).unwrap().name, "Theory 2");
        assert_eq!(corpus.incomplete().count(), 3);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    {\n        \"id\": 1,"));
        assert!(text.contains("\"picture_path\": \"\""));
    }

    #[test]
    fn update_persists_and_keeps_unknown_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        let mut corpus = TheoryCorpus::open_or_seed(&path, 2).unwrap();

        let theory = corpus
            .get(1)
            .unwrap()
            .clone()
            .with_complete(true)
            .with_construct(Construct::new("Desire", "Wanting"));
        corpus.update(theory).unwrap();

        let reopened = TheoryCorpus::open(&path).unwrap();
        let t = reopened.get(1).unwrap();
        assert!(t.complete);
        assert_eq!(t.constructs[0].name, "Desire");
        assert_eq!(t.extra["picture_path"], "");
        assert_eq!(reopened.incomplete().map(|t| t.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut corpus = TheoryCorpus::from_theories(&dir.path().join("d.json"), vec![]);
        assert!(matches!(corpus.get(1), Err(CorpusError::NotFound { id: 1 })));
        assert!(matches!(
            corpus.update(Theory::new(9, "x")),
            Err(CorpusError::NotFound { id: 9 })
        ));
    }

    #[test]
    fn malformed_records_fail_on_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");

        std::fs::write(&path, "[{\"id\": 1}]").unwrap();
        assert!(matches!(
            TheoryCorpus::open(&path),
            Err(CorpusError::Invalid(ValidationError::MissingField { theory_id: 1, .. }))
        ));

        std::fs::write(&path, "[{\"id\": 1,").unwrap();
        assert!(matches!(TheoryCorpus::open(&path), Err(CorpusError::Parse { .. })));
    }
}
