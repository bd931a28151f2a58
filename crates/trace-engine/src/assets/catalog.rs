//! Letter catalog: the immutable letter → stroke geometry mapping.
//!
//! Loading is all-or-nothing: any letter that fails to fetch or parse fails
//! the whole catalog. Letters whose data is empty are skipped, not fatal.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use super::manifest::LetterDocument;
use crate::api::types::{LetterEntry, LetterKey};

/// Failure to obtain one letter's raw data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no data for this letter")]
    NotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

/// Failure to build the catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not fetch letter {key}: {source}")]
    Fetch {
        key: LetterKey,
        #[source]
        source: SourceError,
    },
    #[error("letter {key} data is malformed: {source}")]
    Parse {
        key: LetterKey,
        #[source]
        source: serde_json::Error,
    },
    #[error("letter data contained no traceable letters")]
    Empty,
}

/// External supplier of per-letter geometry documents.
pub trait LetterSource {
    /// Return the JSON document for `key`.
    fn fetch(&self, key: LetterKey) -> Result<String, SourceError>;
}

impl<F> LetterSource for F
where
    F: Fn(LetterKey) -> Result<String, SourceError>,
{
    fn fetch(&self, key: LetterKey) -> Result<String, SourceError> {
        self(key)
    }
}

/// Documents held in memory, keyed by letter.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<LetterKey, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, key: LetterKey, json: impl Into<String>) -> Self {
        self.insert(key, json);
        self
    }

    pub fn insert(&mut self, key: LetterKey, json: impl Into<String>) {
        self.documents.insert(key, json.into());
    }
}

impl LetterSource for MemorySource {
    fn fetch(&self, key: LetterKey) -> Result<String, SourceError> {
        self.documents.get(&key).cloned().ok_or(SourceError::NotFound)
    }
}

/// Reads `<dir>/<KEY>.json` from disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LetterSource for DirSource {
    fn fetch(&self, key: LetterKey) -> Result<String, SourceError> {
        let path = self.dir.join(format!("{key}.json"));
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SourceError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}

/// The loaded catalog. Each entry is reachable under both its uppercase and
/// lowercase character.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<char, Arc<LetterEntry>>,
    keys: Vec<LetterKey>,
}

impl Catalog {
    /// Merge parsed documents into a catalog. Later documents override
    /// earlier ones for the same letter.
    pub fn from_documents(documents: impl IntoIterator<Item = LetterDocument>) -> Result<Self, LoadError> {
        let mut merged = HashMap::new();
        for doc in documents {
            let mut names: Vec<(String, _)> = doc.letters.into_iter().collect();
            names.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, record) in names {
                let Some(key) = LetterKey::parse(&name) else {
                    log::warn!("trace: skipping letter data under invalid key {name:?}");
                    continue;
                };
                if let Some(record) = record {
                    merged.insert(key, record);
                }
            }
        }

        let mut keys: Vec<LetterKey> = merged.keys().copied().collect();
        keys.sort();

        let mut catalog = Catalog::default();
        for key in keys {
            let Some(record) = merged.remove(&key) else { continue };
            match record.into_entry() {
                Some(entry) => catalog.insert(key, entry),
                None => log::warn!("trace: letter {key} has no usable points, skipped"),
            }
        }

        if catalog.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(catalog)
    }

    fn insert(&mut self, key: LetterKey, entry: LetterEntry) {
        let entry = Arc::new(entry);
        self.entries.insert(key.as_char(), Arc::clone(&entry));
        self.entries.insert(key.lowercase(), entry);
        self.keys.push(key);
    }

    /// Entry for a key.
    pub fn get(&self, key: LetterKey) -> Option<&Arc<LetterEntry>> {
        self.entries.get(&key.as_char())
    }

    /// Case-insensitive lookup by raw character.
    pub fn lookup(&self, ch: char) -> Option<&LetterEntry> {
        self.entries.get(&ch).map(|e| e.as_ref())
    }

    pub fn contains(&self, key: LetterKey) -> bool {
        self.entries.contains_key(&key.as_char())
    }

    /// Letters in the catalog, sorted.
    pub fn keys(&self) -> &[LetterKey] {
        &self.keys
    }

    /// Number of letters (aliases are not counted).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Build a catalog from per-letter fetch results, in key order.
pub fn build_catalog<I>(fetched: I) -> Result<Catalog, LoadError>
where
    I: IntoIterator<Item = (LetterKey, Result<String, SourceError>)>,
{
    let mut documents = Vec::new();
    for (key, result) in fetched {
        let text = result.map_err(|source| LoadError::Fetch { key, source })?;
        let doc = LetterDocument::from_json(&text).map_err(|source| LoadError::Parse { key, source })?;
        documents.push(doc);
    }
    Catalog::from_documents(documents)
}

/// Fetch every key from `source` and build the catalog.
pub fn load_catalog<L: LetterSource + ?Sized>(source: &L, keys: &[LetterKey]) -> Result<Catalog, LoadError> {
    build_catalog(keys.iter().map(|&key| (key, source.fetch(key))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> LetterKey {
        LetterKey::parse(s).unwrap()
    }

    const A_JSON: &str = r#"{ "A": { "strokes": [[[10, 10], [10, 50]], [[10, 50], [50, 50]]] } }"#;
    const B_JSON: &str = r#"{ "B": { "points": [[0, 0], [5, 5]] } }"#;

    #[test]
    fn loads_and_aliases_lowercase() {
        let source = MemorySource::new()
            .with_document(key("A"), A_JSON)
            .with_document(key("B"), B_JSON);
        let catalog = load_catalog(&source, &[key("A"), key("B")]).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keys(), &[key("A"), key("B")]);
        assert_eq!(catalog.get(key("a")).unwrap().stroke_count(), 2);
        assert!(std::ptr::eq(catalog.lookup('A').unwrap(), catalog.lookup('a').unwrap()));
        assert!(catalog.lookup('Z').is_none());
    }

    #[test]
    fn one_failed_fetch_fails_everything() {
        let source = MemorySource::new().with_document(key("A"), A_JSON);
        let err = load_catalog(&source, &[key("A"), key("B")]).unwrap_err();
        assert!(matches!(err, LoadError::Fetch { key: k, source: SourceError::NotFound } if k == key("B")));
    }

    #[test]
    fn malformed_document_fails_everything() {
        let source = MemorySource::new()
            .with_document(key("A"), A_JSON)
            .with_document(key("B"), "{ broken");
        let err = load_catalog(&source, &[key("A"), key("B")]).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err.to_string().contains("letter B"));
    }

    #[test]
    fn empty_letters_are_skipped_and_empty_catalog_fails() {
        let source = |k: LetterKey| -> Result<String, SourceError> {
            Ok(format!(r#"{{ "{k}": {{ "strokes": [] }}, "?": {{ "points": [[1, 1]] }} }}"#))
        };
        let err = load_catalog(&source, &[key("A")]).unwrap_err();
        assert!(matches!(err, LoadError::Empty));
    }

    #[test]
    fn later_documents_override_earlier() {
        let docs = [
            LetterDocument::from_json(r#"{ "A": { "points": [[1, 1]] } }"#).unwrap(),
            LetterDocument::from_json(r#"{ "a": { "points": [[2, 2], [3, 3]] } }"#).unwrap(),
        ];
        let catalog = Catalog::from_documents(docs).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(key("A")).unwrap().point_count(), 2);
    }

    #[test]
    fn dir_source_reads_letter_files() {
        let dir = std::env::temp_dir().join(format!("trace-engine-dir-source-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("A.json"), A_JSON).unwrap();

        let source = DirSource::new(&dir);
        assert!(source.fetch(key("A")).is_ok());
        assert!(matches!(source.fetch(key("Q")), Err(SourceError::NotFound)));

        let catalog = load_catalog(&source, &[key("A")]).unwrap();
        assert!(catalog.contains(key("A")));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
