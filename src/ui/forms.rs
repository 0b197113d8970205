use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::library::current_year;
use crate::models::{Book, Genre};

/// Internal representation of the "add book" form fields. Text fields hold
/// raw input strings; genre and read status are picked rather than typed.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre_index: usize,
    pub(crate) read: bool,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum BookField {
    Title,
    Author,
    Year,
    Genre,
    Read,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: String::new(),
            genre_index: 0,
            read: false,
            active: BookField::Title,
            error: None,
        }
    }
}

impl BookForm {
    /// Move focus to the next field (wrapping).
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Genre,
            BookField::Genre => BookField::Read,
            BookField::Read => BookField::Title,
        };
    }

    /// Move focus to the previous field (wrapping).
    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Read,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
            BookField::Genre => BookField::Year,
            BookField::Read => BookField::Genre,
        };
    }

    /// Append a character to the active field, validating allowed input.
    /// Returns whether the keystroke was consumed.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            BookField::Title => {
                if ch.is_control() {
                    return false;
                }
                self.title.push(ch);
                true
            }
            BookField::Author => {
                if ch.is_control() {
                    return false;
                }
                self.author.push(ch);
                true
            }
            BookField::Year => {
                if ch.is_ascii_digit() {
                    self.year.push(ch);
                    true
                } else {
                    false
                }
            }
            // Space cycles the picker fields so they stay usable without
            // reaching for the arrow keys.
            BookField::Genre | BookField::Read => {
                if ch == ' ' {
                    self.cycle_choice(1)
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Genre | BookField::Read => {}
        }
    }

    /// Step the picker fields: cycles the genre selection or flips the read
    /// flag. Returns whether the active field is a picker.
    pub(crate) fn cycle_choice(&mut self, step: isize) -> bool {
        match self.active {
            BookField::Genre => {
                let len = Genre::ALL.len() as isize;
                let current = self.genre_index as isize;
                self.genre_index = (current + step).rem_euclid(len) as usize;
                true
            }
            BookField::Read => {
                self.read = !self.read;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn genre(&self) -> Genre {
        Genre::ALL[self.genre_index]
    }

    /// Validate the inputs and build the typed record ready to append. Range
    /// checking of the year belongs to `Library::add`; this only rejects
    /// inputs that cannot become a `Book` at all.
    pub(crate) fn parse_inputs(&self) -> Result<Book> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(anyhow!("Title is required."));
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(anyhow!("Author is required."));
        }
        let year_raw = self.year.trim();
        if year_raw.is_empty() {
            return Err(anyhow!("Year is required."));
        }
        let year = year_raw
            .parse::<i64>()
            .with_context(|| format!("Year must be a number between 1 and {}.", current_year()))?;

        Ok(Book {
            title: title.to_string(),
            author: author.to_string(),
            year,
            genre: self.genre(),
            read: self.read,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let is_active = self.active == field;

        let (display, is_empty) = match field {
            BookField::Title => (self.title.clone(), self.title.is_empty()),
            BookField::Author => (self.author.clone(), self.author.is_empty()),
            BookField::Year => (self.year.clone(), self.year.is_empty()),
            BookField::Genre => {
                let label = self.genre().label().to_string();
                let shown = if is_active {
                    format!("◀ {label} ▶")
                } else {
                    label
                };
                (shown, false)
            }
            BookField::Read => {
                let label = if self.read { "Read" } else { "Unread" };
                let shown = if is_active {
                    format!("◀ {label} ▶")
                } else {
                    label.to_string()
                };
                (shown, false)
            }
        };

        let display = if is_empty {
            "<required>".to_string()
        } else {
            display
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if is_empty {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count of a text field, used to place the cursor. Picker
    /// fields have no cursor.
    pub(crate) fn value_len(&self, field: BookField) -> Option<usize> {
        match field {
            BookField::Title => Some(self.title.chars().count()),
            BookField::Author => Some(self.author.chars().count()),
            BookField::Year => Some(self.year.chars().count()),
            BookField::Genre | BookField::Read => None,
        }
    }
}

/// What a path prompt will do with the path once confirmed.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum TransferPurpose {
    Export,
    Import,
}

/// Modal text input for the export/import file path.
pub(crate) struct PathPrompt {
    pub(crate) purpose: TransferPurpose,
    pub(crate) input: String,
    pub(crate) error: Option<String>,
}

impl PathPrompt {
    /// Export prompt seeded with a sensible default file name.
    pub(crate) fn for_export() -> Self {
        Self {
            purpose: TransferPurpose::Export,
            input: "library-export.json".to_string(),
            error: None,
        }
    }

    pub(crate) fn for_import() -> Self {
        Self {
            purpose: TransferPurpose::Import,
            input: String::new(),
            error: None,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.input.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    pub(crate) fn path(&self) -> &str {
        self.input.trim()
    }

    pub(crate) fn title(&self) -> &'static str {
        match self.purpose {
            TransferPurpose::Export => "Export Library",
            TransferPurpose::Import => "Import Library",
        }
    }

    pub(crate) fn hint(&self) -> &'static str {
        match self.purpose {
            TransferPurpose::Export => "File to write the JSON export to",
            TransferPurpose::Import => "JSON file to import books from",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> BookForm {
        BookForm {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: "1965".to_string(),
            genre_index: 0,
            read: true,
            active: BookField::Title,
            error: None,
        }
    }

    #[test]
    fn test_parse_inputs_builds_a_book() {
        let book = filled_form().parse_inputs().unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.year, 1965);
        assert_eq!(book.genre, Genre::Fiction);
        assert!(book.read);
    }

    #[test]
    fn test_parse_inputs_requires_title_author_year() {
        let mut form = filled_form();
        form.title = "  ".to_string();
        assert!(form.parse_inputs().is_err());

        let mut form = filled_form();
        form.author.clear();
        assert!(form.parse_inputs().is_err());

        let mut form = filled_form();
        form.year.clear();
        assert!(form.parse_inputs().is_err());
    }

    #[test]
    fn test_year_field_accepts_digits_only() {
        let mut form = BookForm::default();
        form.active = BookField::Year;
        assert!(!form.push_char('x'));
        assert!(form.push_char('1'));
        assert!(form.push_char('9'));
        assert_eq!(form.year, "19");
    }

    #[test]
    fn test_genre_cycles_through_all_variants_and_wraps() {
        let mut form = BookForm::default();
        form.active = BookField::Genre;
        for expected in Genre::ALL.into_iter().skip(1) {
            assert!(form.cycle_choice(1));
            assert_eq!(form.genre(), expected);
        }
        assert!(form.cycle_choice(1));
        assert_eq!(form.genre(), Genre::Fiction);
        assert!(form.cycle_choice(-1));
        assert_eq!(form.genre(), Genre::Other);
    }

    #[test]
    fn test_read_field_toggles_with_space() {
        let mut form = BookForm::default();
        form.active = BookField::Read;
        assert!(!form.read);
        assert!(form.push_char(' '));
        assert!(form.read);
    }
}
