//! Application state definitions

use std::collections::HashSet;
use std::ops::Range;

use crate::annotations::{Conversation, HighlightSet, NotesStore};
use crate::textbook::{Location, ReadingProgress, Textbook};

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Generator,
    Reader,
    Help,
}

/// Which reader panel has focus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    Toc,
    #[default]
    Content,
}

/// A single-line text field with a character-indexed cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    /// Cursor position in characters
    pub cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the value out, leaving the field empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Focusable parts of the generator form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Subject,
    GradeLevel,
    AdditionalInfo,
    Generate,
    ViewSample,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Subject,
        FormField::GradeLevel,
        FormField::AdditionalInfo,
        FormField::Generate,
        FormField::ViewSample,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Subject | FormField::GradeLevel | FormField::AdditionalInfo)
    }
}

pub const GENERATION_FAILED: &str =
    "An error occurred while generating the textbook. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct GeneratorForm {
    pub subject: TextInput,
    pub grade_level: TextInput,
    pub additional_info: TextInput,
    pub focus: FormField,
    pub loading: bool,
    pub error: Option<String>,
}

impl GeneratorForm {
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FormField::Subject => Some(&mut self.subject),
            FormField::GradeLevel => Some(&mut self.grade_level),
            FormField::AdditionalInfo => Some(&mut self.additional_info),
            FormField::Generate | FormField::ViewSample => None,
        }
    }

    /// Names of required fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.subject.is_blank() {
            missing.push("Subject");
        }
        if self.grade_level.is_blank() {
            missing.push("Grade Level");
        }
        missing
    }
}

/// One row of the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocItem {
    pub location: Location,
    pub depth: usize,
    pub expandable: bool,
    pub expanded: bool,
}

/// State for the table-of-contents tree
#[derive(Debug, Clone, Default)]
pub struct TocState {
    pub selected_index: usize,
    pub expanded_chapters: HashSet<usize>,
    pub expanded_sections: HashSet<(usize, usize)>,
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl TocState {
    /// Rows currently shown, honoring collapsed nodes
    pub fn visible_items(&self, textbook: &Textbook) -> Vec<TocItem> {
        let mut items = Vec::new();
        for (c, chapter) in textbook.chapters.iter().enumerate() {
            let expanded = self.expanded_chapters.contains(&c);
            items.push(TocItem {
                location: Location::Chapter(c),
                depth: 0,
                expandable: !chapter.sections.is_empty(),
                expanded,
            });
            if !expanded {
                continue;
            }
            for (s, section) in chapter.sections.iter().enumerate() {
                let expanded = self.expanded_sections.contains(&(c, s));
                items.push(TocItem {
                    location: Location::Section(c, s),
                    depth: 1,
                    expandable: !section.subsections.is_empty(),
                    expanded,
                });
                if expanded {
                    items.extend((0..section.subsections.len()).map(|ss| TocItem {
                        location: Location::Subsection(c, s, ss),
                        depth: 2,
                        expandable: false,
                        expanded: false,
                    }));
                }
            }
        }
        items
    }

    pub fn toggle(&mut self, location: Location) {
        match location {
            Location::Chapter(c) => {
                if !self.expanded_chapters.remove(&c) {
                    self.expanded_chapters.insert(c);
                }
            }
            Location::Section(c, s) => {
                if !self.expanded_sections.remove(&(c, s)) {
                    self.expanded_sections.insert((c, s));
                }
            }
            Location::Subsection(..) => {}
        }
    }

    /// Expand every ancestor of `location` and select it
    pub fn reveal(&mut self, textbook: &Textbook, location: Location) {
        self.expanded_chapters.insert(location.chapter());
        if let Location::Subsection(c, s, _) = location {
            self.expanded_sections.insert((c, s));
        }
        if let Some(idx) = self.visible_items(textbook).iter().position(|i| i.location == location) {
            self.selected_index = idx;
            self.ensure_selection_visible();
        }
    }

    pub fn ensure_selection_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        }
        let visible = self.visible_height.saturating_sub(2);
        if visible > 0 && self.selected_index >= self.scroll_offset + visible {
            self.scroll_offset = self.selected_index.saturating_sub(visible) + 1;
        }
    }
}

/// State for the content panel
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    /// First visible line
    pub scroll_offset: usize,
    /// Line the cursor is on
    pub cursor: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
    /// Plain text of every rendered line (updated on render)
    pub rendered_text: Vec<String>,
    pub search_query: Option<String>,
    pub search_matches: Vec<usize>,
    pub current_match: Option<usize>,
}

impl ContentState {
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height)
    }

    pub fn clamp(&mut self) {
        self.cursor = self.cursor.min(self.total_lines.saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Scroll so the cursor line is on screen
    pub fn follow_cursor(&mut self) {
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.visible_height > 0 && self.cursor >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.cursor + 1 - self.visible_height;
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Move the cursor by `delta` lines and keep it visible
    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.total_lines.saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
        self.follow_cursor();
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.cursor = 0;
        self.search_matches.clear();
        self.current_match = None;
    }

    /// Recompute match lines for the active query
    pub fn refresh_search(&mut self) {
        self.search_matches = match self.search_query.as_deref() {
            Some(query) if !query.is_empty() => {
                let needle = query.to_lowercase();
                self.rendered_text
                    .iter()
                    .enumerate()
                    .filter(|(_, line)| line.to_lowercase().contains(&needle))
                    .map(|(i, _)| i)
                    .collect()
            }
            _ => Vec::new(),
        };
        if self.current_match.is_some_and(|m| m >= self.search_matches.len()) {
            self.current_match = None;
        }
    }

    /// Jump to the next (or previous) match relative to the cursor
    pub fn jump_to_match(&mut self, forward: bool) -> bool {
        if self.search_matches.is_empty() {
            return false;
        }
        let idx = if forward {
            self.search_matches.iter().position(|&l| l > self.cursor).unwrap_or(0)
        } else {
            self.search_matches
                .iter()
                .rposition(|&l| l < self.cursor)
                .unwrap_or(self.search_matches.len() - 1)
        };
        self.current_match = Some(idx);
        self.cursor = self.search_matches[idx];
        self.follow_cursor();
        true
    }

    /// Text of the given lines, trimmed and joined with newlines
    pub fn text_of(&self, lines: Range<usize>) -> String {
        let end = lines.end.min(self.rendered_text.len());
        let start = lines.start.min(end);
        self.rendered_text[start..end]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Visual-mode line selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub cursor: usize,
}

impl Selection {
    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.cursor)..self.anchor.max(self.cursor) + 1
    }
}

pub const MENU_ITEMS: [&str; 2] = ["Ask AI", "See Notes"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMenu {
    pub location: Location,
    pub text: String,
    pub lines: Range<usize>,
    pub selected: usize,
}

#[derive(Debug, Clone)]
pub struct ChatPanel {
    pub conversation: Conversation,
    pub input: TextInput,
    /// Lines scrolled up from the bottom
    pub scroll_from_bottom: usize,
}

#[derive(Debug, Clone)]
pub struct NotesDialog {
    pub location: Location,
    pub selected_text: String,
    /// Multi-line note body
    pub input: TextInput,
}

/// Popup over the reader
#[derive(Debug, Clone, Default)]
pub enum Overlay {
    #[default]
    None,
    SelectionMenu(SelectionMenu),
    Chat(ChatPanel),
    Notes(NotesDialog),
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    #[default]
    Normal,
    Command,
    Search,
}

#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    pub mode: CommandMode,
    pub input: TextInput,
    /// Status or error shown when not typing
    pub message: Option<String>,
    pub is_error: bool,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl CommandLineState {
    const MAX_HISTORY: usize = 200;

    pub fn enter(&mut self, mode: CommandMode) {
        self.mode = mode;
        self.input.clear();
        self.message = None;
        self.history_index = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, CommandMode::Command | CommandMode::Search)
    }

    pub fn add_to_history(&mut self, cmd: String) {
        if !cmd.is_empty() && self.history.last() != Some(&cmd) {
            if self.history.len() >= Self::MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(cmd);
        }
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.history_index = Some(idx);
        self.input = TextInput::with_value(self.history[idx].clone());
    }

    pub fn history_down(&mut self) {
        if let Some(i) = self.history_index {
            if i + 1 < self.history.len() {
                self.history_index = Some(i + 1);
                self.input = TextInput::with_value(self.history[i + 1].clone());
            } else {
                self.history_index = None;
                self.input.clear();
            }
        }
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    pub screen: Screen,
    /// Screen to return to when help closes
    pub previous_screen: Screen,

    pub generator: GeneratorForm,

    pub textbook: Option<Textbook>,
    /// Page shown in the content panel
    pub location: Option<Location>,

    pub show_toc: bool,
    pub focused_panel: Panel,
    pub toc: TocState,
    pub content: ContentState,
    pub selection: Option<Selection>,
    pub overlay: Overlay,

    pub highlights: HighlightSet,
    pub notes: NotesStore,
    pub progress: ReadingProgress,

    /// Subsection whose content is being generated
    pub generating: Option<Location>,
    /// Index of the empty-state button with focus
    pub empty_state_choice: usize,

    pub command_line: CommandLineState,
}

impl AppState {
    pub fn new(notes: NotesStore) -> Self {
        Self { notes, show_toc: true, ..Self::default() }
    }

    /// Show a textbook in the reader, starting at its first page.
    /// Returns true when the notes were rebound to a different textbook.
    pub fn open_textbook(&mut self, textbook: Textbook) -> bool {
        let notes_changed = self.notes.switch_textbook(&textbook.title);
        self.toc = TocState::default();
        self.progress.reset();
        self.highlights = HighlightSet::new();
        self.selection = None;
        self.overlay = Overlay::None;
        let first = textbook.locations().first().copied();
        self.textbook = Some(textbook);
        self.location = None;
        if let Some(first) = first {
            self.go_to(first);
        }
        self.screen = Screen::Reader;
        notes_changed
    }

    /// Switch the content panel to `location`
    pub fn go_to(&mut self, location: Location) -> bool {
        let Some(textbook) = self.textbook.as_ref() else {
            return false;
        };
        if !textbook.contains(location) {
            return false;
        }
        self.location = Some(location);
        self.toc.reveal(textbook, location);
        self.content.reset();
        self.selection = None;
        true
    }

    pub fn next_page(&mut self) -> bool {
        let next = self
            .textbook
            .as_ref()
            .zip(self.location)
            .and_then(|(book, loc)| book.next_location(loc));
        next.is_some_and(|loc| self.go_to(loc))
    }

    pub fn prev_page(&mut self) -> bool {
        let prev = self
            .textbook
            .as_ref()
            .zip(self.location)
            .and_then(|(book, loc)| book.prev_location(loc));
        prev.is_some_and(|loc| self.go_to(loc))
    }

    /// Record scroll progress for the current page
    pub fn record_progress(&mut self) {
        if let Some(location) = self.location {
            let percent = crate::textbook::scroll_percent(
                self.content.scroll_offset,
                self.content.total_lines,
                self.content.visible_height,
            );
            self.progress.record(location, percent);
        }
    }

    pub fn show_help(&mut self) {
        if self.screen != Screen::Help {
            self.previous_screen = self.screen;
            self.screen = Screen::Help;
        }
    }

    pub fn close_help(&mut self) {
        self.screen = self.previous_screen;
    }

    /// Open the selection menu for the current visual selection
    pub fn open_selection_menu(&mut self) -> bool {
        let (Some(selection), Some(location)) = (self.selection, self.location) else {
            return false;
        };
        let lines = selection.range();
        let text = self.content.text_of(lines.clone());
        if text.is_empty() {
            return false;
        }
        self.overlay = Overlay::SelectionMenu(SelectionMenu { location, text, lines, selected: 0 });
        true
    }

    /// Turn the selection menu into the chat panel or the notes dialog
    pub fn choose_menu_item(&mut self, index: usize) {
        let Overlay::SelectionMenu(menu) = std::mem::take(&mut self.overlay) else {
            return;
        };
        self.selection = None;
        self.overlay = match index {
            0 => Overlay::Chat(ChatPanel {
                conversation: Conversation::new(menu.location, menu.text, menu.lines),
                input: TextInput::default(),
                scroll_from_bottom: 0,
            }),
            _ => {
                let existing = self
                    .notes
                    .get(menu.location, &menu.text)
                    .map(|n| n.content.clone())
                    .unwrap_or_default();
                Overlay::Notes(NotesDialog {
                    location: menu.location,
                    selected_text: menu.text,
                    input: TextInput::with_value(existing),
                })
            }
        };
    }

    /// Reopen the conversation of the highlight under the cursor
    pub fn open_highlight_at_cursor(&mut self) -> bool {
        let Some(location) = self.location else {
            return false;
        };
        let found = self
            .highlights
            .find_at(location, self.content.cursor, &self.content.rendered_text)
            .map(Conversation::resume);
        match found {
            Some(conversation) => {
                self.overlay = Overlay::Chat(ChatPanel {
                    conversation,
                    input: TextInput::default(),
                    scroll_from_bottom: 0,
                });
                true
            }
            None => false,
        }
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatPanel> {
        match &mut self.overlay {
            Overlay::Chat(panel) => Some(panel),
            _ => None,
        }
    }

    /// Store the chat as a highlight and close the panel
    pub fn accept_chat(&mut self) -> Option<u64> {
        let Overlay::Chat(panel) = &self.overlay else {
            return None;
        };
        if !panel.conversation.has_questions() || panel.conversation.is_waiting() {
            return None;
        }
        let id = self.highlights.accept(&panel.conversation);
        self.overlay = Overlay::None;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textbook::sample_course;
    use pretty_assertions::assert_eq;

    fn reader() -> AppState {
        let mut state = AppState::new(NotesStore::default());
        state.open_textbook(sample_course());
        state
    }

    fn with_lines(state: &mut AppState, lines: &[&str]) {
        state.content.rendered_text = lines.iter().map(|l| l.to_string()).collect();
        state.content.total_lines = lines.len();
        state.content.visible_height = 10;
    }

    #[test]
    fn text_input_edits_by_character() {
        let mut input = TextInput::with_value("héllo");
        input.left();
        input.backspace();
        assert_eq!(input.value, "hélo");
        input.home();
        input.delete();
        input.insert('y');
        assert_eq!(input.value, "yélo");
        assert_eq!(input.take(), "yélo");
        assert!(input.is_blank());
    }

    #[test]
    fn form_focus_cycles() {
        assert_eq!(FormField::Subject.prev(), FormField::ViewSample);
        assert_eq!(FormField::ViewSample.next(), FormField::Subject);
        assert!(FormField::AdditionalInfo.is_text());
        assert!(!FormField::Generate.is_text());
    }

    #[test]
    fn missing_form_fields() {
        let mut form = GeneratorForm::default();
        assert_eq!(form.missing_fields(), vec!["Subject", "Grade Level"]);
        form.subject = TextInput::with_value("Physics");
        form.grade_level = TextInput::with_value("10th");
        assert!(form.missing_fields().is_empty());
    }

    #[test]
    fn opening_textbook_lands_on_first_page() {
        let state = reader();
        assert_eq!(state.screen, Screen::Reader);
        assert_eq!(state.location, Some(Location::Chapter(0)));
        assert!(state.toc.expanded_chapters.contains(&0));
    }

    #[test]
    fn toc_tree_expands_and_collapses() {
        let mut state = reader();
        let book = state.textbook.clone().unwrap();
        // chapter 0 expanded by reveal: 3 chapters + 2 sections
        assert_eq!(state.toc.visible_items(&book).len(), 5);

        state.toc.toggle(Location::Section(0, 0));
        assert_eq!(state.toc.visible_items(&book).len(), 7);

        state.toc.toggle(Location::Chapter(0));
        assert_eq!(state.toc.visible_items(&book).len(), 3);
    }

    #[test]
    fn paging_walks_reading_order() {
        let mut state = reader();
        assert!(state.next_page());
        assert_eq!(state.location, Some(Location::Section(0, 0)));
        assert!(state.next_page());
        assert_eq!(state.location, Some(Location::Subsection(0, 0, 0)));
        assert!(state.prev_page());
        assert!(state.prev_page());
        assert!(!state.prev_page());
        assert!(!state.go_to(Location::Chapter(42)));
    }

    #[test]
    fn cursor_movement_scrolls_view() {
        let mut content = ContentState { total_lines: 30, visible_height: 10, ..Default::default() };
        content.move_cursor(15);
        assert_eq!(content.cursor, 15);
        assert_eq!(content.scroll_offset, 6);
        content.move_cursor(100);
        assert_eq!(content.cursor, 29);
        assert_eq!(content.scroll_offset, 20);
        content.move_cursor(-100);
        assert_eq!((content.cursor, content.scroll_offset), (0, 0));
    }

    #[test]
    fn search_matches_and_jumps() {
        let mut content = ContentState {
            rendered_text: vec!["Loops".into(), "x".into(), "for loops".into(), "end".into()],
            total_lines: 4,
            visible_height: 2,
            search_query: Some("LOOP".into()),
            ..Default::default()
        };
        content.refresh_search();
        assert_eq!(content.search_matches, vec![0, 2]);
        assert!(content.jump_to_match(true));
        assert_eq!(content.cursor, 2);
        assert!(content.jump_to_match(true));
        assert_eq!(content.cursor, 0);
        assert!(content.jump_to_match(false));
        assert_eq!(content.cursor, 2);
    }

    #[test]
    fn selection_menu_to_chat_and_accept() {
        let mut state = reader();
        with_lines(&mut state, &["Intro", "  list comprehension  ", "builds lists", ""]);
        state.selection = Some(Selection { anchor: 2, cursor: 1 });

        assert!(state.open_selection_menu());
        let Overlay::SelectionMenu(menu) = &state.overlay else { panic!("menu expected") };
        assert_eq!(menu.text, "list comprehension\nbuilds lists");
        assert_eq!(menu.lines, 1..3);

        state.choose_menu_item(0);
        assert!(state.selection.is_none());
        assert!(state.accept_chat().is_none(), "nothing asked yet");

        let chat = state.chat_mut().unwrap();
        chat.conversation.ask("what is it?");
        chat.conversation.append_reply("a loop in brackets");
        chat.conversation.finish_reply();
        let id = state.accept_chat().unwrap();
        assert!(matches!(state.overlay, Overlay::None));

        state.content.cursor = 2;
        assert!(state.open_highlight_at_cursor());
        let chat = state.chat_mut().unwrap();
        assert_eq!(chat.conversation.highlight_id, Some(id));
        assert_eq!(chat.conversation.turns.len(), 3);
    }

    #[test]
    fn see_notes_prefills_existing_note() {
        let mut state = reader();
        with_lines(&mut state, &["alpha", "beta"]);
        state.notes.upsert(Location::Chapter(0), "beta", "second letter");
        state.selection = Some(Selection { anchor: 1, cursor: 1 });
        state.open_selection_menu();
        state.choose_menu_item(1);

        let Overlay::Notes(dialog) = &state.overlay else { panic!("notes expected") };
        assert_eq!(dialog.selected_text, "beta");
        assert_eq!(dialog.input.value, "second letter");
    }

    #[test]
    fn empty_selection_opens_nothing() {
        let mut state = reader();
        with_lines(&mut state, &["", "  "]);
        state.selection = Some(Selection { anchor: 0, cursor: 1 });
        assert!(!state.open_selection_menu());
    }

    #[test]
    fn help_returns_to_previous_screen() {
        let mut state = reader();
        state.show_help();
        state.show_help();
        assert_eq!(state.screen, Screen::Help);
        state.close_help();
        assert_eq!(state.screen, Screen::Reader);
    }

    #[test]
    fn progress_recorded_from_scroll() {
        let mut state = reader();
        with_lines(&mut state, &["a"; 30]);
        state.content.scroll_offset = 10;
        state.record_progress();
        assert_eq!(state.progress.page(Location::Chapter(0)), 50);

        state.content.scroll_offset = 0;
        state.record_progress();
        assert_eq!(state.progress.page(Location::Chapter(0)), 0);
    }

    #[test]
    fn command_history_navigation() {
        let mut cl = CommandLineState::default();
        cl.add_to_history("help".into());
        cl.add_to_history("goto 1.1".into());
        cl.add_to_history("goto 1.1".into());
        assert_eq!(cl.history.len(), 2);

        cl.history_up();
        assert_eq!(cl.input.value, "goto 1.1");
        cl.history_up();
        cl.history_up();
        assert_eq!(cl.input.value, "help");
        cl.history_down();
        cl.history_down();
        assert!(cl.input.value.is_empty());
    }
}
