//! Guideline corpus loading
//!
//! Reads the plain-text corpus directory into `Document` values.
//! Files are processed in name order so repeated ingestion runs over
//! the same corpus produce the same chunk ids.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::domain::models::Document;

/// Loads `.txt` guideline documents from a corpus directory
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    data_dir: PathBuf,
}

impl DocumentLoader {
    /// Create a loader over `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The corpus directory this loader reads from
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every `.txt` file in the corpus directory, sorted by name.
    ///
    /// Non-UTF-8 bytes are replaced rather than rejected; guideline
    /// exports occasionally carry stray encoding artifacts. An
    /// unreadable directory or file aborts the load.
    pub fn load_all(&self) -> Result<Vec<Document>> {
        let entries = fs::read_dir(&self.data_dir).with_context(|| {
            format!(
                "failed to read corpus directory {}",
                self.data_dir.display()
            )
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(anyhow!(
                "no .txt documents found in {}",
                self.data_dir.display()
            ));
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(Self::load_file(&path)?);
        }

        Ok(documents)
    }

    fn load_file(path: &Path) -> Result<Document> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read document {}", path.display()))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        let id = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| anyhow!("document has no usable file name: {}", path.display()))?;

        if content.is_empty() {
            warn!(path = %path.display(), "document is empty");
        }
        debug!(id = %id, chars = content.chars().count(), "loaded document");

        Ok(Document::new(id, path.display().to_string(), content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &[u8]) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(content).unwrap();
    }

    #[test]
    fn test_loads_txt_files_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "zika.txt", b"Zika guidance.");
        write_file(dir.path(), "cholera.txt", b"Cholera guidance.");
        write_file(dir.path(), "malaria.txt", b"Malaria guidance.");

        let loader = DocumentLoader::new(dir.path());
        let docs = loader.load_all().unwrap();

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["cholera", "malaria", "zika"]);
        assert_eq!(docs[1].content, "Malaria guidance.");
    }

    #[test]
    fn test_ignores_non_txt_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "guidance.txt", b"Text.");
        write_file(dir.path(), "guidance.pdf", b"%PDF-1.4");
        write_file(dir.path(), "notes.md", b"# Notes");

        let loader = DocumentLoader::new(dir.path());
        let docs = loader.load_all().unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "guidance");
    }

    #[test]
    fn test_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "latin1.txt", b"fi\xE8vre");

        let loader = DocumentLoader::new(dir.path());
        let docs = loader.load_all().unwrap();

        assert!(docs[0].content.contains('\u{FFFD}'));
        assert!(docs[0].content.starts_with("fi"));
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let loader = DocumentLoader::new(dir.path().join("absent"));
        assert!(loader.load_all().is_err());
    }

    #[test]
    fn test_empty_corpus_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "readme.md", b"not a corpus");

        let loader = DocumentLoader::new(dir.path());
        let err = loader.load_all().unwrap_err();
        assert!(err.to_string().contains("no .txt documents"));
    }
}
