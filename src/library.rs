//! The in-memory book collection and the operations the screens drive.
//!
//! Everything here works on plain owned data; persistence is the caller's
//! concern (the UI saves after each successful mutation). Operation errors
//! are human-readable `anyhow` messages so the footer can display them
//! verbatim.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use chrono::Datelike;

use crate::models::{Book, Genre};

/// Which field a search matches against. Exactly one field per search, by
/// case-insensitive substring, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
}

impl SearchField {
    pub fn label(&self) -> &'static str {
        match self {
            SearchField::Title => "Title",
            SearchField::Author => "Author",
            SearchField::Genre => "Genre",
        }
    }

    /// Cycle to the next field (Title → Author → Genre → Title).
    pub fn next(&self) -> SearchField {
        match self {
            SearchField::Title => SearchField::Author,
            SearchField::Author => SearchField::Genre,
            SearchField::Genre => SearchField::Title,
        }
    }
}

/// Aggregate counts computed fresh from the full collection.
pub struct LibraryStats {
    pub total: usize,
    pub read: usize,
    pub unread: usize,
    /// Number of distinct genres with at least one book.
    pub distinct_genres: usize,
    /// Per-genre counts in presentation order, genres without books omitted.
    pub genre_counts: Vec<(Genre, usize)>,
}

/// The full ordered collection of books for one user. List position is the
/// only record handle, so removal works on position sets and mutation is
/// append or wholesale replacement.
#[derive(Default)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Most recently added book, shown in the overview header.
    pub fn latest(&self) -> Option<&Book> {
        self.books.last()
    }

    /// Validate and append a new book. On error nothing is mutated, so the
    /// form can stay open with the collection unchanged.
    pub fn add(&mut self, book: Book) -> Result<()> {
        if book.title.trim().is_empty() {
            return Err(anyhow!("Title is required."));
        }
        if book.author.trim().is_empty() {
            return Err(anyhow!("Author is required."));
        }
        let max_year = current_year();
        if book.year < 1 || book.year > max_year {
            return Err(anyhow!("Year must be between 1 and {max_year}."));
        }
        self.books.push(book);
        Ok(())
    }

    /// Delete the books at the given list positions. Positions outside the
    /// collection are ignored; returns how many books were removed.
    pub fn remove_positions(&mut self, positions: &HashSet<usize>) -> usize {
        let before = self.books.len();
        let mut index = 0usize;
        self.books.retain(|_| {
            let keep = !positions.contains(&index);
            index += 1;
            keep
        });
        before - self.books.len()
    }

    /// Replace the whole collection, used by import and reset.
    pub fn replace_all(&mut self, books: Vec<Book>) {
        self.books = books;
    }

    /// Linear case-insensitive substring scan over one field. An empty or
    /// whitespace term matches nothing; the search view shows its idle hint
    /// until something is typed.
    pub fn search(&self, field: SearchField, term: &str) -> Vec<Book> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.books
            .iter()
            .filter(|book| {
                let haystack = match field {
                    SearchField::Title => book.title.to_lowercase(),
                    SearchField::Author => book.author.to_lowercase(),
                    SearchField::Genre => book.genre.label().to_lowercase(),
                };
                haystack.contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Recompute every aggregate from scratch. Cheap at this scale, and it
    /// keeps the statistics view trivially consistent with the collection.
    pub fn stats(&self) -> LibraryStats {
        let total = self.books.len();
        let read = self.books.iter().filter(|book| book.read).count();

        let genre_counts: Vec<(Genre, usize)> = Genre::ALL
            .into_iter()
            .filter_map(|genre| {
                let count = self
                    .books
                    .iter()
                    .filter(|book| book.genre == genre)
                    .count();
                (count > 0).then_some((genre, count))
            })
            .collect();

        LibraryStats {
            total,
            read,
            unread: total - read,
            distinct_genres: genre_counts.len(),
            genre_counts,
        }
    }
}

/// Upper bound for the year field on the add form.
pub fn current_year() -> i64 {
    i64::from(chrono::Local::now().year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str, author: &str, year: i64, genre: Genre, read: bool) -> Book {
        Book {
            title: title.to_string(),
            author: author.to_string(),
            year,
            genre,
            read,
        }
    }

    fn sample_library() -> Library {
        Library::new(vec![
            book("Dune", "Frank Herbert", 1965, Genre::Fiction, true),
            book("Sapiens", "Yuval Noah Harari", 2011, Genre::NonFiction, true),
            book("Cosmos", "Carl Sagan", 1980, Genre::Science, false),
            book("SPQR", "Mary Beard", 2015, Genre::History, false),
        ])
    }

    #[test]
    fn test_add_rejects_empty_title_without_mutation() {
        let mut library = sample_library();
        let result = library.add(book("  ", "Somebody", 2000, Genre::Other, false));
        assert!(result.is_err());
        assert_eq!(library.len(), 4);
    }

    #[test]
    fn test_add_rejects_out_of_range_year() {
        let mut library = Library::default();
        assert!(library
            .add(book("A", "B", 0, Genre::Other, false))
            .is_err());
        assert!(library
            .add(book("A", "B", current_year() + 1, Genre::Other, false))
            .is_err());
        assert!(library.is_empty());
        assert!(library
            .add(book("A", "B", current_year(), Genre::Other, false))
            .is_ok());
    }

    #[test]
    fn test_search_genre_substring_matches_both_fiction_variants() {
        let library = sample_library();
        let results = library.search(SearchField::Genre, "fiction");
        let titles: Vec<&str> = results.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Dune", "Sapiens"]);
    }

    #[test]
    fn test_search_title_is_case_insensitive() {
        let library = sample_library();
        let results = library.search(SearchField::Title, "dUnE");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Dune");
    }

    #[test]
    fn test_search_blank_term_matches_nothing() {
        let library = sample_library();
        assert!(library.search(SearchField::Author, "   ").is_empty());
    }

    #[test]
    fn test_remove_positions_ignores_out_of_range() {
        let mut library = sample_library();
        let positions: HashSet<usize> = [0, 2, 99].into_iter().collect();
        let removed = library.remove_positions(&positions);
        assert_eq!(removed, 2);
        let titles: Vec<&str> = library.books().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Sapiens", "SPQR"]);
    }

    #[test]
    fn test_stats_counts_and_genre_distribution() {
        let stats = sample_library().stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.read, 2);
        assert_eq!(stats.unread, 2);
        assert_eq!(stats.distinct_genres, 4);
        assert_eq!(
            stats.genre_counts,
            vec![
                (Genre::Fiction, 1),
                (Genre::NonFiction, 1),
                (Genre::Science, 1),
                (Genre::History, 1),
            ]
        );
    }
}
