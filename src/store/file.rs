use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde_json::Value;

use crate::models::Book;

use super::error::{Result, StoreError};
use super::records::repair_loaded;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library-manager";
/// Library file name stored inside the application data directory.
const LIBRARY_FILE_NAME: &str = "library.json";

/// Recoverable conditions detected while loading the library file. Both
/// reset the collection to empty; the UI relays the message in its footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadWarning {
    /// The file exists but is not valid JSON.
    Corrupt,
    /// The file parses but the root element is not an array.
    WrongRoot,
}

impl LoadWarning {
    /// Footer text shown when the warning is surfaced.
    pub fn message(&self) -> &'static str {
        match self {
            LoadWarning::Corrupt => {
                "Corrupted library file: starting with an empty library."
            }
            LoadWarning::WrongRoot => {
                "Invalid library format: starting with an empty library."
            }
        }
    }
}

/// Everything a load produces: the surviving books, how many raw entries
/// were dropped by the repair pass, and an optional file-level warning.
pub struct LoadOutcome {
    pub books: Vec<Book>,
    pub dropped: usize,
    pub warning: Option<LoadWarning>,
}

impl LoadOutcome {
    fn reset(warning: Option<LoadWarning>) -> Self {
        Self {
            books: Vec::new(),
            dropped: 0,
            warning,
        }
    }
}

/// Resolve the absolute path of `library.json` inside the user's home.
pub fn library_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(StoreError::NoHomeDirectory)?;
    Ok(base_dirs
        .home_dir()
        .join(DATA_DIR_NAME)
        .join(LIBRARY_FILE_NAME))
}

/// Read and repair the library file.
///
/// A missing file yields an empty collection with no warning; unparseable
/// contents or a non-array root reset to empty and report the matching
/// [`LoadWarning`]. Only genuine I/O failures propagate as errors.
pub fn load_library(path: &Path) -> Result<LoadOutcome> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(LoadOutcome::reset(None));
        }
        Err(err) => return Err(err.into()),
    };

    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => return Ok(LoadOutcome::reset(Some(LoadWarning::Corrupt))),
    };

    let Some(items) = value.as_array() else {
        return Ok(LoadOutcome::reset(Some(LoadWarning::WrongRoot)));
    };

    let (books, dropped) = repair_loaded(items);
    Ok(LoadOutcome {
        books,
        dropped,
        warning: None,
    })
}

/// Serialize the full collection to the library file, overwriting it. The
/// data directory is created on demand so a fresh install can save without
/// any setup step.
pub fn save_library(path: &Path, books: &[Book]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let payload = serde_json::to_string(books)?;
    fs::write(path, payload)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;
    use tempfile::TempDir;

    fn sample_books() -> Vec<Book> {
        vec![
            Book {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1965,
                genre: Genre::Fiction,
                read: true,
            },
            Book {
                title: "Cosmos".to_string(),
                author: "Carl Sagan".to_string(),
                year: 1980,
                genre: Genre::Science,
                read: false,
            },
        ]
    }

    #[test]
    fn test_load_missing_file_yields_empty_library() {
        let dir = TempDir::new().unwrap();
        let outcome = load_library(&dir.path().join("library.json")).unwrap();
        assert!(outcome.books.is_empty());
        assert_eq!(outcome.dropped, 0);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("library.json");
        let books = sample_books();
        save_library(&path, &books).unwrap();
        let outcome = load_library(&path).unwrap();
        assert_eq!(outcome.books, books);
        assert_eq!(outcome.dropped, 0);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn test_load_corrupt_json_resets_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{ not json").unwrap();
        let outcome = load_library(&path).unwrap();
        assert!(outcome.books.is_empty());
        assert_eq!(outcome.warning, Some(LoadWarning::Corrupt));
    }

    #[test]
    fn test_load_non_array_root_resets_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(&path, "{\"title\": \"not a list\"}").unwrap();
        let outcome = load_library(&path).unwrap();
        assert!(outcome.books.is_empty());
        assert_eq!(outcome.warning, Some(LoadWarning::WrongRoot));
    }

    #[test]
    fn test_load_counts_dropped_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("library.json");
        fs::write(
            &path,
            "[{\"title\": \"Ok\", \"author\": \"A\", \"year\": 1999, \
             \"genre\": \"Other\", \"read\": false}, 17, {\"title\": \"Bad\"}]",
        )
        .unwrap();
        let outcome = load_library(&path).unwrap();
        assert_eq!(outcome.books.len(), 1);
        assert_eq!(outcome.dropped, 2);
    }
}
