//! Domain models that mirror the on-disk JSON records and get passed
//! throughout the TUI. The intent is that these types stay light-weight data
//! holders so other layers can focus on presentation and persistence logic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single catalog record. The serde shape matches the `library.json` array
/// elements produced by earlier versions of the application, so old files
/// keep loading unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Title shown on cards and matched by title search.
    pub title: String,
    /// Author field used both for display and filtering.
    pub author: String,
    /// Publication year. Kept as an integer so range checks stay numeric;
    /// the add form bounds it to [1, current year].
    pub year: i64,
    /// One of the six catalog genres.
    pub genre: Genre,
    /// Whether the user has finished the book.
    pub read: bool,
}

impl Book {
    /// Compose a `Title - Author` string that gracefully omits the hyphen if
    /// the author is blank. Search results and the remove list rely on this
    /// ready-to-use formatting.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.title, self.author)
        }
    }

    /// Short status label rendered on book cards.
    pub fn read_label(&self) -> &'static str {
        if self.read {
            "Read"
        } else {
            "Unread"
        }
    }
}

/// Closed set of catalog genres. The serde renames pin the on-disk labels to
/// the strings legacy data files already use, hyphen included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fiction,
    #[serde(rename = "Non-Fiction")]
    NonFiction,
    Science,
    History,
    Biography,
    Other,
}

impl Genre {
    /// Every variant in presentation order, used by the add form to cycle
    /// choices and by statistics to emit bars in a stable order.
    pub const ALL: [Genre; 6] = [
        Genre::Fiction,
        Genre::NonFiction,
        Genre::Science,
        Genre::History,
        Genre::Biography,
        Genre::Other,
    ];

    /// Human-facing label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::NonFiction => "Non-Fiction",
            Genre::Science => "Science",
            Genre::History => "History",
            Genre::Biography => "Biography",
            Genre::Other => "Other",
        }
    }

    /// Match a raw genre string case-insensitively against the known labels.
    /// Unrecognized labels collapse to `Other` so legacy records survive a
    /// reload instead of being discarded over a stray genre.
    pub fn parse_lenient(raw: &str) -> Genre {
        let needle = raw.trim();
        Genre::ALL
            .into_iter()
            .find(|genre| genre.label().eq_ignore_ascii_case(needle))
            .unwrap_or(Genre::Other)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_serializes_with_display_labels() {
        let json = serde_json::to_string(&Genre::NonFiction).unwrap();
        assert_eq!(json, "\"Non-Fiction\"");
        let back: Genre = serde_json::from_str("\"Non-Fiction\"").unwrap();
        assert_eq!(back, Genre::NonFiction);
    }

    #[test]
    fn test_parse_lenient_ignores_case_and_whitespace() {
        assert_eq!(Genre::parse_lenient("fiction"), Genre::Fiction);
        assert_eq!(Genre::parse_lenient(" non-fiction "), Genre::NonFiction);
        assert_eq!(Genre::parse_lenient("HISTORY"), Genre::History);
        assert_eq!(Genre::parse_lenient("Poetry"), Genre::Other);
    }

    #[test]
    fn test_display_title_omits_blank_author() {
        let mut book = Book {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            genre: Genre::Fiction,
            read: true,
        };
        assert_eq!(book.display_title(), "Dune - Frank Herbert");
        book.author = "  ".to_string();
        assert_eq!(book.display_title(), "Dune");
    }
}
