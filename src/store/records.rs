//! Defensive repair of raw JSON records.
//!
//! Library files and import payloads come from outside the process, so every
//! element is inspected before it becomes a [`Book`]. Malformed entries are
//! dropped and counted, never fatal. Two modes exist because a reload of our
//! own file can afford to be stricter than an import of arbitrary JSON:
//! import mode additionally tolerates a missing or oddly-typed `read` flag,
//! which older exports and hand-edited files are known to contain.

use serde_json::Value;

use crate::models::{Book, Genre};

/// How tolerant the repair pass should be about the `read` flag.
#[derive(Clone, Copy, PartialEq, Eq)]
enum RepairMode {
    Load,
    Import,
}

/// Repair records read from the application's own `library.json`. Returns
/// the surviving books plus how many entries were dropped.
pub fn repair_loaded(values: &[Value]) -> (Vec<Book>, usize) {
    repair(values, RepairMode::Load)
}

/// Repair records from a user-supplied import file. Same contract as
/// [`repair_loaded`] with the lenient `read` handling described above.
pub fn repair_imported(values: &[Value]) -> (Vec<Book>, usize) {
    repair(values, RepairMode::Import)
}

fn repair(values: &[Value], mode: RepairMode) -> (Vec<Book>, usize) {
    let mut books = Vec::with_capacity(values.len());
    let mut dropped = 0usize;

    for value in values {
        match book_from_value(value, mode) {
            Some(book) => books.push(book),
            None => dropped += 1,
        }
    }

    (books, dropped)
}

/// Convert one raw element into a `Book`, or `None` when the entry is not an
/// object with the required keys and usable types.
fn book_from_value(value: &Value, mode: RepairMode) -> Option<Book> {
    let map = value.as_object()?;

    let title = map.get("title")?.as_str()?.to_string();
    let author = map.get("author")?.as_str()?.to_string();
    let year = map.get("year")?.as_i64()?;
    let genre = Genre::parse_lenient(map.get("genre")?.as_str()?);
    let read = read_flag(map.get("read"), mode)?;

    Some(Book {
        title,
        author,
        year,
        genre,
        read,
    })
}

/// Coerce the `read` value into a boolean.
///
/// Load mode accepts a bool or the legacy string encoding, where only a
/// case-insensitive `"true"` counts as read. Import mode defaults a missing
/// or unusable value to unread and widens the truthy strings to
/// `"true"` / `"1"` / `"yes"`.
fn read_flag(value: Option<&Value>, mode: RepairMode) -> Option<bool> {
    match (value, mode) {
        (Some(Value::Bool(flag)), _) => Some(*flag),
        (Some(Value::String(raw)), RepairMode::Load) => {
            Some(raw.eq_ignore_ascii_case("true"))
        }
        (Some(Value::String(raw)), RepairMode::Import) => Some(
            ["true", "1", "yes"]
                .iter()
                .any(|truthy| raw.eq_ignore_ascii_case(truthy)),
        ),
        (_, RepairMode::Import) => Some(false),
        (_, RepairMode::Load) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(raw: Value) -> Vec<Value> {
        raw.as_array().expect("test fixture must be an array").clone()
    }

    #[test]
    fn test_load_keeps_valid_records() {
        let raw = values(json!([
            {"title": "Dune", "author": "Frank Herbert", "year": 1965,
             "genre": "Fiction", "read": true},
            {"title": "Cosmos", "author": "Carl Sagan", "year": 1980,
             "genre": "Science", "read": false}
        ]));
        let (books, dropped) = repair_loaded(&raw);
        assert_eq!(books.len(), 2);
        assert_eq!(dropped, 0);
        assert_eq!(books[0].genre, Genre::Fiction);
        assert!(books[0].read);
    }

    #[test]
    fn test_load_coerces_legacy_read_strings() {
        let raw = values(json!([
            {"title": "A", "author": "B", "year": 2000, "genre": "Other",
             "read": "True"},
            {"title": "C", "author": "D", "year": 2001, "genre": "Other",
             "read": "nope"}
        ]));
        let (books, dropped) = repair_loaded(&raw);
        assert_eq!(dropped, 0);
        assert!(books[0].read);
        assert!(!books[1].read);
    }

    #[test]
    fn test_load_drops_malformed_entries() {
        let raw = values(json!([
            42,
            "not an object",
            {"title": "Missing fields"},
            {"title": "No read", "author": "X", "year": 1999, "genre": "Other"},
            {"title": "Bad year", "author": "X", "year": "1999",
             "genre": "Other", "read": true},
            {"title": "Ok", "author": "X", "year": 1999, "genre": "Other",
             "read": false}
        ]));
        let (books, dropped) = repair_loaded(&raw);
        assert_eq!(books.len(), 1);
        assert_eq!(dropped, 5);
        assert_eq!(books[0].title, "Ok");
    }

    #[test]
    fn test_import_defaults_missing_read_to_unread() {
        let raw = values(json!([
            {"title": "No flag", "author": "X", "year": 1990, "genre": "History"}
        ]));
        let (books, dropped) = repair_imported(&raw);
        assert_eq!(dropped, 0);
        assert!(!books[0].read);
    }

    #[test]
    fn test_import_widens_truthy_strings() {
        let raw = values(json!([
            {"title": "A", "author": "X", "year": 1990, "genre": "Other", "read": "1"},
            {"title": "B", "author": "X", "year": 1990, "genre": "Other", "read": "YES"},
            {"title": "C", "author": "X", "year": 1990, "genre": "Other", "read": "0"},
            {"title": "D", "author": "X", "year": 1990, "genre": "Other", "read": 7}
        ]));
        let (books, dropped) = repair_imported(&raw);
        assert_eq!(dropped, 0);
        assert!(books[0].read);
        assert!(books[1].read);
        assert!(!books[2].read);
        assert!(!books[3].read, "non-string, non-bool read defaults to unread");
    }

    #[test]
    fn test_unknown_genre_collapses_to_other() {
        let raw = values(json!([
            {"title": "A", "author": "X", "year": 1990, "genre": "Romance",
             "read": false}
        ]));
        let (books, _) = repair_loaded(&raw);
        assert_eq!(books[0].genre, Genre::Other);
    }
}
