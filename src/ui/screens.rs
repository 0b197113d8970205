use std::collections::HashSet;

use crate::library::{Library, SearchField};
use crate::models::Book;

/// Backing state for the search view: the target field, the live query, and
/// the current result set.
pub(crate) struct SearchScreen {
    pub(crate) field: SearchField,
    pub(crate) query: String,
    pub(crate) results: Vec<Book>,
    pub(crate) selected: usize,
}

impl SearchScreen {
    pub(crate) fn new() -> Self {
        Self {
            field: SearchField::Title,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
        }
    }

    /// Re-run the linear scan against the live collection. Called after
    /// every keystroke and after any mutation while the view is open.
    pub(crate) fn refresh(&mut self, library: &Library) {
        self.results = library.search(self.field, &self.query);
        if self.results.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.results.len() {
            self.selected = self.results.len() - 1;
        }
    }

    pub(crate) fn cycle_field(&mut self, library: &Library) {
        self.field = self.field.next();
        self.refresh(library);
    }

    pub(crate) fn push_char(&mut self, ch: char, library: &Library) {
        if !ch.is_control() {
            self.query.push(ch);
            self.refresh(library);
        }
    }

    pub(crate) fn backspace(&mut self, library: &Library) {
        self.query.pop();
        self.refresh(library);
    }

    pub(crate) fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.results.is_empty() {
            return;
        }
        let len = self.results.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.results.is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        if !self.results.is_empty() {
            self.selected = self.results.len() - 1;
        }
    }
}

/// Backing state for the remove view: a cursor plus the set of checked list
/// positions. The collection itself stays on the `App`; this screen only
/// tracks which positions the user has marked for deletion.
pub(crate) struct RemoveScreen {
    pub(crate) selected: usize,
    pub(crate) checked: HashSet<usize>,
}

impl RemoveScreen {
    pub(crate) fn new() -> Self {
        Self {
            selected: 0,
            checked: HashSet::new(),
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.selected = 0;
            return;
        }
        let len = len as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    pub(crate) fn toggle_current(&mut self, len: usize) {
        if self.selected < len && !self.checked.remove(&self.selected) {
            self.checked.insert(self.selected);
        }
    }

    pub(crate) fn is_checked(&self, index: usize) -> bool {
        self.checked.contains(&index)
    }

    pub(crate) fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub(crate) fn positions(&self) -> HashSet<usize> {
        self.checked.clone()
    }

    /// Drop stale marks and clamp the cursor after the collection shrank.
    pub(crate) fn reset_after_removal(&mut self, len: usize) {
        self.checked.clear();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Actions offered on the manage-data view.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum ManageAction {
    Export,
    Import,
    Remove,
    Reset,
}

impl ManageAction {
    pub(crate) const ALL: [ManageAction; 4] = [
        ManageAction::Export,
        ManageAction::Import,
        ManageAction::Remove,
        ManageAction::Reset,
    ];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            ManageAction::Export => "Export library",
            ManageAction::Import => "Import library",
            ManageAction::Remove => "Remove books",
            ManageAction::Reset => "Reset library",
        }
    }

    pub(crate) fn description(&self) -> &'static str {
        match self {
            ManageAction::Export => "Write the complete library to a JSON file",
            ManageAction::Import => "Replace the library with books from a JSON file",
            ManageAction::Remove => "Mark books in a list and delete them together",
            ManageAction::Reset => "Clear every book from the library",
        }
    }
}

/// Cursor over the manage-data action list.
pub(crate) struct ManageScreen {
    pub(crate) selected: usize,
}

impl ManageScreen {
    pub(crate) fn new() -> Self {
        Self { selected: 0 }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = ManageAction::ALL.len() as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn current(&self) -> ManageAction {
        ManageAction::ALL[self.selected]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Genre;

    fn library() -> Library {
        Library::new(vec![
            Book {
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1965,
                genre: Genre::Fiction,
                read: true,
            },
            Book {
                title: "Dune Messiah".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1969,
                genre: Genre::Fiction,
                read: false,
            },
        ])
    }

    #[test]
    fn test_search_screen_refilters_on_each_keystroke() {
        let library = library();
        let mut screen = SearchScreen::new();
        screen.push_char('d', &library);
        screen.push_char('u', &library);
        assert_eq!(screen.results.len(), 2);
        screen.push_char('n', &library);
        screen.push_char('e', &library);
        screen.push_char(' ', &library);
        screen.push_char('m', &library);
        assert_eq!(screen.results.len(), 1);
        assert_eq!(screen.results[0].title, "Dune Messiah");
    }

    #[test]
    fn test_search_screen_clamps_selection_when_results_shrink() {
        let library = library();
        let mut screen = SearchScreen::new();
        screen.push_char('d', &library);
        screen.select_last();
        assert_eq!(screen.selected, 1);
        screen.push_char('x', &library);
        assert!(screen.results.is_empty());
        assert_eq!(screen.selected, 0);
    }

    #[test]
    fn test_remove_screen_tracks_positions() {
        let mut screen = RemoveScreen::new();
        screen.toggle_current(3);
        screen.move_selection(2, 3);
        screen.toggle_current(3);
        assert_eq!(screen.checked_count(), 2);
        assert!(screen.is_checked(0));
        assert!(screen.is_checked(2));
        screen.toggle_current(3);
        assert_eq!(screen.checked_count(), 1);
    }

    #[test]
    fn test_remove_screen_resets_after_removal() {
        let mut screen = RemoveScreen::new();
        screen.move_selection(4, 5);
        screen.toggle_current(5);
        screen.reset_after_removal(2);
        assert_eq!(screen.checked_count(), 0);
        assert_eq!(screen.selected, 1);
    }
}
