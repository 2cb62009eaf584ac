//! Document sources
//!
//! The extractor works on text; sources hand it documents by id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lexent_core::{LexentError, Result};

/// Trait for document providers
pub trait DocumentSource: Send + Sync {
    /// Ids of every available document, in processing order
    fn document_ids(&self) -> Result<Vec<String>>;

    /// Read the full text of one document
    fn read(&self, id: &str) -> Result<String>;
}

// ============================================================================
// Directory source
// ============================================================================

/// Plain-text files on disk
///
/// Rooted either at one file or at a directory, in which case every `*.txt`
/// file directly inside it is a document, ordered by name. Ids are paths.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(LexentError::NotFound(root.display().to_string()));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    fn document_ids(&self) -> Result<Vec<String>> {
        if self.root.is_file() {
            return Ok(vec![self.root.display().to_string()]);
        }

        let entries = std::fs::read_dir(&self.root).map_err(|e| LexentError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_text_file(path))
            .collect();
        paths.sort();

        Ok(paths.iter().map(|p| p.display().to_string()).collect())
    }

    fn read(&self, id: &str) -> Result<String> {
        let path = PathBuf::from(id);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LexentError::NotFound(id.to_string()),
            _ => LexentError::Io { path, source: e },
        })
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
}

// ============================================================================
// In-memory source
// ============================================================================

/// Documents held in memory, ordered by id
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document
    pub fn with_document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.documents.insert(id.into(), text.into());
    }
}

impl DocumentSource for MemorySource {
    fn document_ids(&self) -> Result<Vec<String>> {
        Ok(self.documents.keys().cloned().collect())
    }

    fn read(&self, id: &str) -> Result<String> {
        self.documents
            .get(id)
            .cloned()
            .ok_or_else(|| LexentError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_directory_lists_text_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "second").unwrap();
        fs::write(dir.path().join("a.TXT"), "first").unwrap();
        fs::write(dir.path().join("notes.md"), "skipped").unwrap();
        fs::create_dir(dir.path().join("nested.txt")).unwrap();

        let source = DirectorySource::new(dir.path()).unwrap();
        let ids = source.document_ids().unwrap();

        assert_eq!(ids.len(), 2);
        assert!(ids[0].ends_with("a.TXT"));
        assert_eq!(source.read(&ids[1]).unwrap(), "second");
    }

    #[test]
    fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("affidavit.txt");
        fs::write(&file, "I, Anita Verma").unwrap();

        let source = DirectorySource::new(&file).unwrap();
        let ids = source.document_ids().unwrap();
        assert_eq!(ids, vec![file.display().to_string()]);
        assert_eq!(source.read(&ids[0]).unwrap(), "I, Anita Verma");
    }

    #[test]
    fn test_missing_paths() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            DirectorySource::new(dir.path().join("absent")),
            Err(LexentError::NotFound(_))
        ));

        let source = DirectorySource::new(dir.path()).unwrap();
        assert!(source.document_ids().unwrap().is_empty());
        assert!(matches!(
            source.read(&dir.path().join("gone.txt").display().to_string()),
            Err(LexentError::NotFound(_))
        ));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new()
            .with_document("doc-2", "Tata Steel")
            .with_document("doc-1", "Anita Verma");

        assert_eq!(source.document_ids().unwrap(), vec!["doc-1", "doc-2"]);
        assert_eq!(source.read("doc-2").unwrap(), "Tata Steel");
        assert!(matches!(source.read("doc-3"), Err(LexentError::NotFound(_))));
    }
}
