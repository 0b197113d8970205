//! Import and export against user-supplied paths.
//!
//! Export writes the same JSON array format as `library.json`, but
//! pretty-printed so the file is pleasant to read or hand-edit. Import is
//! the mirror operation with the lenient repair pass; unlike a startup
//! load, a bad import file is reported as an error and leaves the current
//! collection untouched.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;

use crate::models::Book;

use super::error::{Result, StoreError};
use super::records::repair_imported;

/// Result of a successful import: the repaired books plus how many raw
/// entries were skipped.
#[derive(Debug)]
pub struct ImportOutcome {
    pub books: Vec<Book>,
    pub skipped: usize,
}

/// Write the full collection to `path` as pretty-printed JSON.
pub fn export_library(path: &Path, books: &[Book]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let payload = serde_json::to_string_pretty(books)?;
    fs::write(path, payload)?;
    Ok(())
}

/// Read a JSON array of book records from `path` and repair it in import
/// mode. The caller decides whether to adopt the result; nothing here
/// mutates application state.
pub fn import_library(path: &Path) -> Result<ImportOutcome> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::MissingFile(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };

    let value: Value = serde_json::from_str(&raw)?;
    let items = value
        .as_array()
        .ok_or_else(|| StoreError::InvalidFormat("root element must be an array".to_string()))?;

    let (books, skipped) = repair_imported(items);
    Ok(ImportOutcome { books, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use tempfile::TempDir;

    fn sample_books() -> Vec<Book> {
        vec![
            Book {
                title: "The Making of the Atomic Bomb".to_string(),
                author: "Richard Rhodes".to_string(),
                year: 1986,
                genre: Genre::History,
                read: true,
            },
            Book {
                title: "Pale Blue Dot".to_string(),
                author: "Carl Sagan".to_string(),
                year: 1994,
                genre: Genre::Science,
                read: false,
            },
        ]
    }

    #[test]
    fn test_export_then_import_is_identity() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        let books = sample_books();
        export_library(&path, &books).unwrap();
        let outcome = import_library(&path).unwrap();
        assert_eq!(outcome.books, books);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_import_skips_non_object_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.json");
        fs::write(
            &path,
            "[\"stray string\", {\"title\": \"Ok\", \"author\": \"A\", \
             \"year\": 2001, \"genre\": \"Biography\"}]",
        )
        .unwrap();
        let outcome = import_library(&path).unwrap();
        assert_eq!(outcome.books.len(), 1);
        assert_eq!(outcome.skipped, 1);
        assert!(!outcome.books[0].read, "missing read defaults to unread");
    }

    #[test]
    fn test_import_rejects_non_array_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.json");
        fs::write(&path, "{\"books\": []}").unwrap();
        let err = import_library(&path).unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat(_)));
    }

    #[test]
    fn test_import_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = import_library(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, StoreError::MissingFile(_)));
    }
}
