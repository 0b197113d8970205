use std::cmp::min;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    BarChart, Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap,
};
use ratatui::Frame;

use crate::library::Library;
use crate::models::Book;
use crate::store::{export_library, import_library, LoadOutcome};

use super::forms::{BookField, BookForm, PathPrompt, TransferPurpose};
use super::helpers::{build_book_card_lines, centered_rect, surface_error};
use super::screens::{ManageAction, ManageScreen, RemoveScreen, SearchScreen};

/// Number of book cards shown in each row of the overview grid. Three
/// columns keep titles readable on common terminal widths.
const GRID_COLUMNS: usize = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per book card (four content lines plus borders).
const BOOK_CARD_HEIGHT: u16 = 6;

/// High-level navigation states, one per view of the application. Keeping
/// this explicit makes it easy to reason about which rendering path runs and
/// what keyboard shortcuts should do.
enum Screen {
    Overview,
    Search(SearchScreen),
    Stats,
    Manage(ManageScreen),
    Remove(RemoveScreen),
}

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    PromptingPath(PathPrompt),
    ConfirmRemove { count: usize },
    ConfirmReset,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Warn,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warn => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    library: Library,
    library_path: PathBuf,
    selected: usize,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build the app from the startup load, translating load warnings and
    /// dropped-entry counts into an initial footer message.
    pub fn new(library_path: PathBuf, outcome: LoadOutcome) -> Self {
        let status = if let Some(warning) = outcome.warning {
            Some(StatusMessage {
                text: warning.message().to_string(),
                kind: StatusKind::Error,
            })
        } else if outcome.dropped > 0 {
            let plural = if outcome.dropped == 1 { "y" } else { "ies" };
            Some(StatusMessage {
                text: format!(
                    "Removed {} invalid entr{plural} from the library file.",
                    outcome.dropped
                ),
                kind: StatusKind::Warn,
            })
        } else if !outcome.books.is_empty() {
            Some(StatusMessage {
                text: format!("Loaded {} books.", outcome.books.len()),
                kind: StatusKind::Info,
            })
        } else {
            None
        };

        Self {
            library: Library::new(outcome.books),
            library_path,
            selected: 0,
            screen: Screen::Overview,
            mode: Mode::Normal,
            status,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::PromptingPath(prompt) => self.handle_path_prompt(code, prompt)?,
            Mode::ConfirmRemove { count } => self.handle_confirm_remove(code, count)?,
            Mode::ConfirmReset => self.handle_confirm_reset(code)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.screen {
            Screen::Overview => {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        *exit = true;
                    }
                    KeyCode::Left => self.move_horizontal(-1),
                    KeyCode::Right => self.move_horizontal(1),
                    KeyCode::Up => self.move_vertical(-1),
                    KeyCode::Down => self.move_vertical(1),
                    KeyCode::Char('+') => {
                        self.clear_status();
                        return Ok(Mode::AddingBook(BookForm::default()));
                    }
                    KeyCode::Char('f') | KeyCode::Char('F') => {
                        self.clear_status();
                        self.open_search_view();
                    }
                    KeyCode::Char('s') | KeyCode::Char('S') => {
                        self.clear_status();
                        self.screen = Screen::Stats;
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        self.clear_status();
                        self.screen = Screen::Manage(ManageScreen::new());
                    }
                    KeyCode::Char('-') => {
                        if self.library.is_empty() {
                            self.set_status("Library is empty.", StatusKind::Warn);
                        } else {
                            self.clear_status();
                            self.screen = Screen::Remove(RemoveScreen::new());
                        }
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Search(ref mut search) => {
                match code {
                    KeyCode::Esc => {
                        self.clear_status();
                        self.screen = Screen::Overview;
                    }
                    KeyCode::Tab | KeyCode::BackTab => search.cycle_field(&self.library),
                    KeyCode::Up => search.move_selection(-1),
                    KeyCode::Down => search.move_selection(1),
                    KeyCode::PageUp => search.move_selection(-5),
                    KeyCode::PageDown => search.move_selection(5),
                    KeyCode::Home => search.select_first(),
                    KeyCode::End => search.select_last(),
                    KeyCode::Backspace => search.backspace(&self.library),
                    KeyCode::Char(ch) => search.push_char(ch, &self.library),
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Stats => {
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('S') => {
                        self.clear_status();
                        self.screen = Screen::Overview;
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
            Screen::Manage(ref mut manage) => {
                let mut chosen: Option<ManageAction> = None;
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc | KeyCode::Char('m') | KeyCode::Char('M') => {
                        self.clear_status();
                        self.screen = Screen::Overview;
                        return Ok(Mode::Normal);
                    }
                    KeyCode::Up => manage.move_selection(-1),
                    KeyCode::Down => manage.move_selection(1),
                    KeyCode::Home => manage.selected = 0,
                    KeyCode::End => manage.selected = ManageAction::ALL.len() - 1,
                    KeyCode::Enter => chosen = Some(manage.current()),
                    _ => {}
                }

                if let Some(action) = chosen {
                    return self.dispatch_manage_action(action);
                }
                Ok(Mode::Normal)
            }
            Screen::Remove(ref mut remove) => {
                let len = self.library.len();
                match code {
                    KeyCode::Char('q') => {
                        *exit = true;
                    }
                    KeyCode::Esc => {
                        self.clear_status();
                        self.screen = Screen::Manage(ManageScreen::new());
                    }
                    KeyCode::Up => remove.move_selection(-1, len),
                    KeyCode::Down => remove.move_selection(1, len),
                    KeyCode::PageUp => remove.move_selection(-5, len),
                    KeyCode::PageDown => remove.move_selection(5, len),
                    KeyCode::Home => remove.select_first(),
                    KeyCode::End => remove.select_last(len),
                    KeyCode::Char(' ') => remove.toggle_current(len),
                    KeyCode::Enter => {
                        let count = remove.checked_count();
                        if count == 0 {
                            self.set_status("No books marked for removal.", StatusKind::Warn);
                        } else {
                            self.clear_status();
                            return Ok(Mode::ConfirmRemove { count });
                        }
                    }
                    _ => {}
                }
                Ok(Mode::Normal)
            }
        }
    }

    fn dispatch_manage_action(&mut self, action: ManageAction) -> Result<Mode> {
        match action {
            ManageAction::Export => {
                if self.library.is_empty() {
                    self.set_status("No data to export.", StatusKind::Warn);
                    Ok(Mode::Normal)
                } else {
                    self.clear_status();
                    Ok(Mode::PromptingPath(PathPrompt::for_export()))
                }
            }
            ManageAction::Import => {
                self.clear_status();
                Ok(Mode::PromptingPath(PathPrompt::for_import()))
            }
            ManageAction::Remove => {
                if self.library.is_empty() {
                    self.set_status("Library is empty.", StatusKind::Warn);
                    Ok(Mode::Normal)
                } else {
                    self.clear_status();
                    self.screen = Screen::Remove(RemoveScreen::new());
                    Ok(Mode::Normal)
                }
            }
            ManageAction::Reset => {
                if self.library.is_empty() {
                    self.set_status("Library is already empty.", StatusKind::Warn);
                    Ok(Mode::Normal)
                } else {
                    self.clear_status();
                    Ok(Mode::ConfirmReset)
                }
            }
        }
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Left => {
                form.cycle_choice(-1);
            }
            KeyCode::Right => {
                form.cycle_choice(1);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(title) => {
                    keep_open = false;
                    match self.persist() {
                        Ok(()) => {
                            self.set_status(format!("Added '{title}'."), StatusKind::Info)
                        }
                        Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                    }
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_path_prompt(&mut self, code: KeyCode, mut prompt: PathPrompt) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                let message = match prompt.purpose {
                    TransferPurpose::Export => "Export cancelled.",
                    TransferPurpose::Import => "Import cancelled.",
                };
                self.set_status(message, StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Backspace => {
                prompt.backspace();
                Ok(Mode::PromptingPath(prompt))
            }
            KeyCode::Enter => {
                if prompt.path().is_empty() {
                    prompt.error = Some("File path is required.".to_string());
                    return Ok(Mode::PromptingPath(prompt));
                }
                match prompt.purpose {
                    TransferPurpose::Export => self.run_export(prompt),
                    TransferPurpose::Import => self.run_import(prompt),
                }
            }
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
                Ok(Mode::PromptingPath(prompt))
            }
            _ => Ok(Mode::PromptingPath(prompt)),
        }
    }

    fn run_export(&mut self, mut prompt: PathPrompt) -> Result<Mode> {
        let path = prompt.path().to_string();
        match export_library(Path::new(&path), self.library.books()) {
            Ok(()) => {
                self.set_status(
                    format!("Exported {} books to {path}.", self.library.len()),
                    StatusKind::Info,
                );
                Ok(Mode::Normal)
            }
            Err(err) => {
                prompt.error = Some(err.to_string());
                Ok(Mode::PromptingPath(prompt))
            }
        }
    }

    fn run_import(&mut self, mut prompt: PathPrompt) -> Result<Mode> {
        let path = prompt.path().to_string();
        let outcome = match import_library(Path::new(&path)) {
            Ok(outcome) => outcome,
            Err(err) => {
                prompt.error = Some(err.to_string());
                return Ok(Mode::PromptingPath(prompt));
            }
        };

        let imported = outcome.books.len();
        self.library.replace_all(outcome.books);
        self.selected = 0;

        if let Err(err) = self.persist() {
            self.set_status(surface_error(&err), StatusKind::Error);
            return Ok(Mode::Normal);
        }

        if outcome.skipped > 0 {
            let plural = if outcome.skipped == 1 { "y" } else { "ies" };
            self.set_status(
                format!(
                    "Imported {imported} books. Skipped {} invalid entr{plural}.",
                    outcome.skipped
                ),
                StatusKind::Warn,
            );
        } else {
            self.set_status(format!("Imported {imported} books."), StatusKind::Info);
        }
        Ok(Mode::Normal)
    }

    fn handle_confirm_remove(&mut self, code: KeyCode, count: usize) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let positions = match &self.screen {
                    Screen::Remove(remove) => remove.positions(),
                    _ => return Ok(Mode::Normal),
                };

                let removed = self.library.remove_positions(&positions);
                let len = self.library.len();
                if let Screen::Remove(ref mut remove) = self.screen {
                    remove.reset_after_removal(len);
                }
                self.clamp_selected();

                match self.persist() {
                    Ok(()) => {
                        let plural = if removed == 1 { "" } else { "s" };
                        self.set_status(
                            format!("Removed {removed} book{plural}."),
                            StatusKind::Info,
                        );
                    }
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmRemove { count }),
        }
    }

    fn handle_confirm_reset(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Reset cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.library.replace_all(Vec::new());
                self.selected = 0;
                match self.persist() {
                    Ok(()) => self.set_status("Library reset.", StatusKind::Info),
                    Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmReset),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Overview => self.draw_overview(frame, content_area),
            Screen::Search(search) => self.draw_search(frame, content_area, search),
            Screen::Stats => self.draw_stats(frame, content_area),
            Screen::Manage(manage) => self.draw_manage(frame, content_area, manage),
            Screen::Remove(remove) => self.draw_remove(frame, content_area, remove),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::PromptingPath(prompt) => self.draw_path_prompt(frame, area, prompt),
            Mode::ConfirmRemove { count } => self.draw_confirm_remove(frame, area, *count),
            Mode::ConfirmReset => self.draw_confirm_reset(frame, area),
            Mode::Normal => {}
        }
    }

    fn draw_overview(&self, frame: &mut Frame, area: Rect) {
        if self.library.is_empty() {
            let message =
                Paragraph::new("Your library is empty. Press '+' to add your first book.")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::NONE));
            frame.render_widget(message, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(1)])
            .split(area);

        let stats = self.library.stats();
        let mut header_lines = vec![Line::from(vec![
            Span::styled(
                format!("{} books", stats.total),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  •  {} read  •  {} unread",
                stats.read, stats.unread
            )),
        ])];
        if let Some(latest) = self.library.latest() {
            header_lines.push(Line::from(vec![
                Span::raw("Latest addition: "),
                Span::styled(latest.display_title(), Style::default().fg(Color::Gray)),
            ]));
        }
        let header = Paragraph::new(header_lines)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL).title("Your Library"));
        frame.render_widget(header, chunks[0]);

        self.draw_book_grid(frame, chunks[1]);
    }

    fn draw_book_grid(&self, frame: &mut Frame, area: Rect) {
        let card_height = BOOK_CARD_HEIGHT as usize;
        let visible_rows = ((area.height as usize) / card_height).max(1);
        let len = self.library.len();
        let total_rows = (len + GRID_COLUMNS - 1) / GRID_COLUMNS;

        let selected_row = self.selected / GRID_COLUMNS;
        let mut start_row = if selected_row >= visible_rows {
            selected_row + 1 - visible_rows
        } else {
            0
        };
        if start_row + visible_rows > total_rows {
            start_row = total_rows.saturating_sub(visible_rows);
        }
        let end_row = min(start_row + visible_rows, total_rows);
        let row_span = end_row.saturating_sub(start_row);
        if row_span == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..row_span)
            .map(|_| Constraint::Length(BOOK_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (row_offset, row_chunk) in rows.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Ratio(1, GRID_COLUMNS as u32);
                    GRID_COLUMNS
                ])
                .split(*row_chunk);

            for (col_idx, column_chunk) in columns.iter().enumerate() {
                let book_index = (start_row + row_offset) * GRID_COLUMNS + col_idx;
                if let Some(book) = self.library.books().get(book_index) {
                    let mut block = Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Book {:02}", book_index + 1));
                    if book_index == self.selected {
                        block = block.style(Style::default().fg(Color::Yellow));
                    }
                    let lines = build_book_card_lines(book, book_index == self.selected);
                    let card = Paragraph::new(lines)
                        .alignment(Alignment::Left)
                        .wrap(Wrap { trim: true })
                        .block(block);
                    frame.render_widget(card, *column_chunk);
                }
            }
        }
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect, search: &SearchScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let field_label = search.field.label();
        let prefix = format!("Search by [{field_label}]  •  ");
        let input = Paragraph::new(Line::from(vec![
            Span::raw("Search by "),
            Span::styled(
                format!("[{field_label}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  •  "),
            Span::raw(search.query.clone()),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Search Books"));
        frame.render_widget(input, chunks[0]);

        let inner_x = chunks[0].x + 1;
        let prefix_len = prefix.chars().count();
        let cursor_x = inner_x + prefix_len as u16 + search.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, chunks[0].y + 1));

        if !search.has_query() {
            let hint = Paragraph::new("Type a search term. Tab switches the search field.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(hint, chunks[1]);
            return;
        }

        if search.results.is_empty() {
            let message = Paragraph::new("No matching books found.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let result_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(chunks[1]);
        let count = search.results.len();
        let plural = if count == 1 { "" } else { "s" };
        let summary = Paragraph::new(Span::styled(
            format!("Found {count} result{plural}:"),
            Style::default().fg(Color::Green),
        ));
        frame.render_widget(summary, result_chunks[0]);

        self.render_book_cards(frame, result_chunks[1], &search.results, search.selected);
    }

    fn draw_stats(&self, frame: &mut Frame, area: Rect) {
        if self.library.is_empty() {
            let message = Paragraph::new("No statistics available for an empty library.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Library Statistics"),
                );
            frame.render_widget(message, area);
            return;
        }

        let stats = self.library.stats();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(5),
            ])
            .split(area);

        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[0]);

        let tile_data = [
            ("Total Books", stats.total),
            ("Read Books", stats.read),
            ("Genres", stats.distinct_genres),
        ];
        for (chunk, (title, value)) in tiles.iter().zip(tile_data) {
            let tile = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    value.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(tile, *chunk);
        }

        let ratio = stats.read as f64 / stats.total as f64;
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Reading Progress"),
            )
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(ratio)
            .label(format!(
                "{} of {} read ({:.0}%)",
                stats.read,
                stats.total,
                ratio * 100.0
            ));
        frame.render_widget(gauge, chunks[1]);

        let bars: Vec<(&str, u64)> = stats
            .genre_counts
            .iter()
            .map(|(genre, count)| (genre.label(), *count as u64))
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Books per Genre"),
            )
            .data(&bars)
            .bar_width(12)
            .bar_gap(2)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(chart, chunks[2]);
    }

    fn draw_manage(&self, frame: &mut Frame, area: Rect, manage: &ManageScreen) {
        let items: Vec<ListItem> = ManageAction::ALL
            .iter()
            .map(|action| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        action.label(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("  {}", action.description()),
                        Style::default().fg(Color::Gray),
                    )),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Manage Data"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(manage.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_remove(&self, frame: &mut Frame, area: Rect, remove: &RemoveScreen) {
        if self.library.is_empty() {
            let message = Paragraph::new("Library is empty. Nothing to remove.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Remove Books"));
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .library
            .books()
            .iter()
            .enumerate()
            .map(|(index, book)| {
                let checkbox = if remove.is_checked(index) {
                    "[x]"
                } else {
                    "[ ]"
                };
                ListItem::new(format!(
                    "{checkbox} {} ({})",
                    book.display_title(),
                    book.year
                ))
            })
            .collect();

        let marked = remove.checked_count();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Remove Books • {marked} marked")),
            )
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(remove.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.screen, &self.mode) {
            (_, Mode::AddingBook(_)) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[←→/Space]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::PromptingPath(_)) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (_, Mode::ConfirmRemove { .. }) | (_, Mode::ConfirmReset) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Confirm   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            (Screen::Search(_), _) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Search Field   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back"),
            ]),
            (Screen::Stats, _) => Line::from(vec![
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Manage(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Choose   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Remove(_), _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Move   "),
                Span::styled("[Space]", key_style),
                Span::raw(" Mark   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Delete Marked   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Screen::Overview, _) => Line::from(vec![
                Span::styled("[←↑↓→]", key_style),
                Span::raw(" Move   "),
                Span::styled("[+]", key_style),
                Span::raw(" Add   "),
                Span::styled("[-]", key_style),
                Span::raw(" Remove   "),
                Span::styled("[f]", key_style),
                Span::raw(" Search   "),
                Span::styled("[s]", key_style),
                Span::raw(" Statistics   "),
                Span::styled("[m]", key_style),
                Span::raw(" Manage Data   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("Title", BookField::Title),
            form.build_line("Author", BookField::Author),
            form.build_line("Year", BookField::Year),
            form.build_line("Genre", BookField::Genre),
            form.build_line("Read", BookField::Read),
            Line::from(""),
        ];

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor = match form.active {
            BookField::Title => form
                .value_len(BookField::Title)
                .map(|len| ("Title: ".len() + len, 0u16)),
            BookField::Author => form
                .value_len(BookField::Author)
                .map(|len| ("Author: ".len() + len, 1u16)),
            BookField::Year => form
                .value_len(BookField::Year)
                .map(|len| ("Year: ".len() + len, 2u16)),
            BookField::Genre | BookField::Read => None,
        };
        if let Some((offset, row)) = cursor {
            frame.set_cursor_position((inner.x + offset as u16, inner.y + row));
        }
    }

    fn draw_path_prompt(&self, frame: &mut Frame, area: Rect, prompt: &PathPrompt) {
        let popup_area = centered_rect(70, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(prompt.title()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(Span::styled(
                prompt.hint(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::raw("Path: "),
                Span::styled(prompt.input.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
        ];

        if let Some(error) = &prompt.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to confirm • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let cursor_x = inner.x + "Path: ".len() as u16 + prompt.input.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y + 1));
    }

    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, count: usize) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let plural = if count == 1 { "" } else { "s" };
        let lines = vec![
            Line::from(format!("Remove {count} marked book{plural}?")),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_reset(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Reset Library").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete all {} books from your library?",
                self.library.len()
            )),
            Line::from("The library file is overwritten immediately."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn render_book_cards(&self, frame: &mut Frame, area: Rect, books: &[Book], selected: usize) {
        if books.is_empty() || area.height == 0 {
            return;
        }

        let card_height = BOOK_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = books.len();
        let mut start = if selected >= capacity {
            selected + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);
        let visible_len = end.saturating_sub(start);
        if visible_len == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..visible_len)
            .map(|_| Constraint::Length(BOOK_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (idx, chunk) in rows.iter().enumerate() {
            if chunk.height == 0 {
                continue;
            }

            let book_index = start + idx;
            if book_index >= len {
                break;
            }

            let book = &books[book_index];
            let mut block = Block::default().borders(Borders::ALL);
            if book_index == selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }

            let card = Paragraph::new(build_book_card_lines(book, book_index == selected))
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left);
            frame.render_widget(card, *chunk);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Write the whole collection back to disk. Failures are surfaced in the
    /// footer by callers; the process never exits over a failed save.
    fn persist(&self) -> Result<()> {
        crate::store::save_library(&self.library_path, self.library.books())
            .context("failed to save library")
    }

    /// Validate the form and append the new book, focusing its card. Only
    /// validation can fail here; persistence happens in the caller.
    fn save_new_book(&mut self, form: &BookForm) -> Result<String> {
        let book = form.parse_inputs()?;
        let title = book.title.clone();
        self.library.add(book)?;
        self.selected = self.library.len() - 1;
        Ok(title)
    }

    fn open_search_view(&mut self) {
        self.screen = Screen::Search(SearchScreen::new());
    }

    fn clamp_selected(&mut self) {
        if self.library.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.library.len() {
            self.selected = self.library.len() - 1;
        }
    }

    fn move_horizontal(&mut self, offset: isize) {
        if matches!(self.screen, Screen::Overview) && !self.library.is_empty() {
            let new_index = self.selected as isize + offset;
            if (0..self.library.len() as isize).contains(&new_index) {
                self.selected = new_index as usize;
            }
        }
    }

    fn move_vertical(&mut self, offset: isize) {
        if matches!(self.screen, Screen::Overview) && !self.library.is_empty() {
            let cols = GRID_COLUMNS as isize;
            let new_index = self.selected as isize + offset * cols;
            if (0..self.library.len() as isize).contains(&new_index) {
                self.selected = new_index as usize;
            }
        }
    }
}
