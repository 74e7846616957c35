//! Key handling, commands and background work
//!
//! Everything here runs without a terminal: the [`App`](super::App) loop
//! feeds keys in, calls [`Session::poll_background`] every tick and draws
//! [`Session::state`].

use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;

use super::command::{Command, ParseResult, parse_command, parse_search};
use super::input::{Action, key_with_modifier_to_action};
use super::state::{
    AppState, ChatPanel, CommandMode, FormField, GENERATION_FAILED, MENU_ITEMS, Overlay, Panel,
    Screen, Selection, TextInput,
};
use crate::annotations::{ChatBackend, Conversation, NotesStore, chat_request};
use crate::claude::{
    ApiKeyManager, ClaudeClient, ClaudeError, ClaudeModel, CreateMessageRequest, StreamEvent,
    TextModel,
};
use crate::config::Config;
use crate::export;
use crate::generate::{Generator, TextbookRequest};
use crate::textbook::{Location, Textbook, TextbookStore, sample, sample_course};

/// Results of background tasks
#[derive(Debug)]
pub enum AppEvent {
    TextbookGenerated(Result<Textbook, String>),
    ContentGenerated {
        /// Title of the textbook the request was made for
        title: String,
        location: Location,
        result: Result<String, String>,
    },
}

struct ChatStream {
    rx: mpsc::Receiver<StreamEvent>,
    cancel: CancellationToken,
}

/// Builds a generator for a model, or `None` without credentials
pub type Connect<M> = Box<dyn Fn(ClaudeModel) -> Option<Generator<M>> + Send>;

pub struct Session<M = ClaudeClient> {
    pub config: Config,
    pub state: AppState,
    store: TextbookStore,
    generator: Option<Generator<M>>,
    connect: Connect<M>,
    chat: ChatBackend,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    chat_stream: Option<ChatStream>,
}

impl Session<ClaudeClient> {
    /// Session talking to Claude with the configured key, if there is one
    pub fn connected(config: Config, store: TextbookStore, notes: NotesStore) -> Self {
        let chat = ChatBackend::select(&config.chat);
        tracing::info!(mock = chat.is_mock(), "chat backend selected");
        let connect: Connect<ClaudeClient> =
            Box::new(|model| match ClaudeClient::from_env_or_keyring() {
                Ok(client) => Some(Generator::new(client, model)),
                Err(err) => {
                    tracing::warn!("generation unavailable: {err}");
                    None
                }
            });
        Self::new(config, store, notes, chat, connect)
    }
}

impl<M: TextModel> Session<M> {
    pub fn new(
        config: Config,
        store: TextbookStore,
        notes: NotesStore,
        chat: ChatBackend,
        connect: Connect<M>,
    ) -> Self {
        let generator = connect(config.model);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            state: AppState::new(notes),
            store,
            generator,
            connect,
            chat,
            events_tx,
            events_rx,
            chat_stream: None,
        }
    }

    /// Load the stored textbook (if any) and show `screen`
    pub fn start(&mut self, screen: Screen) {
        match self.store.load() {
            Ok(Some(textbook)) => {
                tracing::info!(title = %textbook.title, "restored stored textbook");
                self.open(textbook);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("stored textbook unreadable: {err:#}");
                self.state.command_line.set_error(format!("{err:#}"));
            }
        }
        self.state.screen = screen;
    }

    /// Apply finished background work; never blocks
    pub fn poll_background(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
        self.poll_chat();
    }

    /// Handle a key press, returns true if should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.state.command_line.is_input_mode() {
            return self.handle_command_line_key(key);
        }
        match self.state.screen {
            Screen::Generator => self.handle_generator_key(key),
            Screen::Help => self.handle_help_key(key),
            Screen::Reader => self.handle_reader_key(key),
        }
    }

    fn handle_command_line_key(&mut self, key: KeyEvent) -> bool {
        let cl = &mut self.state.command_line;
        match key.code {
            KeyCode::Esc => cl.exit_input_mode(),
            KeyCode::Enter => {
                let mode = cl.mode;
                let input = cl.input.take();
                cl.exit_input_mode();
                let command = match mode {
                    CommandMode::Search => parse_search(input.trim()),
                    _ => {
                        cl.add_to_history(input.trim().to_string());
                        match parse_command(&input) {
                            ParseResult::Ok(command) => command,
                            ParseResult::UnknownCommand(cmd) => {
                                cl.set_error(format!("Unknown command: {cmd}"));
                                return false;
                            }
                            ParseResult::MissingArgument(cmd) => {
                                cl.set_error(format!(":{cmd} needs an argument"));
                                return false;
                            }
                        }
                    }
                };
                return self.run_command(command);
            }
            KeyCode::Backspace if cl.input.value.is_empty() => cl.exit_input_mode(),
            KeyCode::Up if cl.mode == CommandMode::Command => cl.history_up(),
            KeyCode::Down if cl.mode == CommandMode::Command => cl.history_down(),
            _ => edit_text(&mut cl.input, key),
        }
        false
    }

    fn run_command(&mut self, command: Command) -> bool {
        match self.execute_command(command) {
            Ok(quit) => quit,
            Err(err) => {
                tracing::warn!("command failed: {err:#}");
                self.state.command_line.set_error(format!("{err:#}"));
                false
            }
        }
    }

    /// Execute a parsed command, returns true if should exit
    pub fn execute_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Quit => return Ok(true),
            Command::Nop => self.state.command_line.message = None,
            Command::Help => self.state.show_help(),
            Command::Home => self.state.screen = Screen::Generator,
            Command::Sample { course } => {
                let textbook = if course { sample_course() } else { sample() };
                self.show_textbook(textbook);
            }
            Command::Load(path) => {
                let textbook = self.store.import(&path)?;
                self.state.command_line.set_message(format!("Loaded {}", textbook.title));
                self.open(textbook);
            }
            Command::Goto(number) => {
                let location = self.resolve(&number)?;
                self.state.go_to(location);
                self.state.screen = Screen::Reader;
            }
            Command::Generate(target) => self.start_content_generation(target.as_deref())?,
            Command::Ask(question) => self.ask(&question)?,
            Command::Key(key) => {
                ApiKeyManager::set_api_key(&key)?;
                self.generator = (self.connect)(self.config.model);
                self.chat = ChatBackend::select(&self.config.chat);
                self.state
                    .command_line
                    .set_message(format!("API key saved ({})", ApiKeyManager::mask_key(&key)));
            }
            Command::Model(name) => {
                let model = ClaudeModel::parse(&name)
                    .with_context(|| format!("Unknown model {name}; try haiku, sonnet or opus"))?;
                self.config.model = model;
                self.generator = (self.connect)(model);
                self.state
                    .command_line
                    .set_message(format!("Generating with {}", model.display_name()));
            }
            Command::Export(path) => {
                self.export(&path)?;
                self.state.command_line.set_message(format!("Exported to {}", path.display()));
            }
            Command::Clear => {
                self.store.clear()?;
                self.state.textbook = None;
                self.state.location = None;
                self.state.overlay = Overlay::None;
                self.state.screen = Screen::Reader;
                self.state.command_line.set_message("Stored textbook cleared");
            }
            Command::Search(query) => self.search(query),
        }
        Ok(false)
    }

    fn resolve(&self, number: &str) -> Result<Location> {
        let textbook = self.state.textbook.as_ref().context("No textbook loaded")?;
        Location::parse_number(number)
            .filter(|location| textbook.contains(*location))
            .with_context(|| format!("No page {number}"))
    }

    fn export(&self, path: &Path) -> Result<()> {
        let textbook = self.state.textbook.as_ref().context("No textbook loaded")?;
        let contents = match path.extension().and_then(|e| e.to_str()) {
            Some("html" | "htm") => export::to_html(textbook),
            _ => export::to_markdown(textbook),
        };
        std::fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
    }

    fn search(&mut self, query: String) {
        let content = &mut self.state.content;
        if query.is_empty() {
            content.search_query = None;
            content.refresh_search();
            return;
        }
        content.search_query = Some(query.clone());
        content.refresh_search();
        if !content.jump_to_match(true) {
            self.state.command_line.set_error(format!("Pattern not found: {query}"));
        }
    }

    /// Persist and show a textbook
    fn show_textbook(&mut self, textbook: Textbook) {
        if let Err(err) = self.store.save(&textbook) {
            tracing::warn!("could not store textbook: {err:#}");
            self.state.command_line.set_error(format!("{err:#}"));
        }
        self.open(textbook);
    }

    /// Show a textbook, saving the notes store if it moved to a new book
    fn open(&mut self, textbook: Textbook) {
        if self.state.open_textbook(textbook) {
            if let Err(err) = self.state.notes.save() {
                tracing::warn!("could not save notes: {err:#}");
            }
        }
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TextbookGenerated(Ok(textbook)) => {
                tracing::info!(title = %textbook.title, "textbook ready");
                self.state.generator.loading = false;
                self.show_textbook(textbook);
            }
            AppEvent::TextbookGenerated(Err(err)) => {
                tracing::error!("textbook generation failed: {err}");
                self.state.generator.loading = false;
                self.state.generator.error = Some(GENERATION_FAILED.to_string());
            }
            AppEvent::ContentGenerated { title, location, result } => {
                self.state.generating = None;
                let content = match result {
                    Ok(content) => content,
                    Err(err) => {
                        tracing::error!(%location, "content generation failed: {err}");
                        self.state.command_line.set_error(format!("Generation failed: {err}"));
                        return;
                    }
                };
                let Some(textbook) = self.state.textbook.as_mut().filter(|t| t.title == title)
                else {
                    tracing::info!(%location, "discarding content for a closed textbook");
                    return;
                };
                if !textbook.set_subsection_content(location, content) {
                    return;
                }
                let number = textbook.number_of(location);
                if let Err(err) = self.store.save(textbook) {
                    self.state.command_line.set_error(format!("{err:#}"));
                    return;
                }
                if self.state.location == Some(location) {
                    self.state.content.reset();
                }
                self.state.command_line.set_message(format!("Generated {number}"));
            }
        }
    }

    fn submit_form(&mut self) {
        let form = &mut self.state.generator;
        if form.loading {
            return;
        }
        let missing = form.missing_fields();
        if !missing.is_empty() {
            form.error = Some(format!("Please fill in {}.", missing.join(" and ")));
            return;
        }
        let Some(generator) = self.generator.clone() else {
            form.error = Some(ClaudeError::ApiKeyNotFound.to_string());
            return;
        };

        let request = TextbookRequest {
            subject: form.subject.value.trim().to_string(),
            grade_level: form.grade_level.value.trim().to_string(),
            additional_info: form.additional_info.value.trim().to_string(),
        };
        form.loading = true;
        form.error = None;

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = generator.generate_textbook(&request).await.map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::TextbookGenerated(result));
        });
    }

    fn start_content_generation(&mut self, target: Option<&str>) -> Result<()> {
        let location = match target {
            Some(number) => self.resolve(number)?,
            None => self.state.location.context("No page open")?,
        };
        if !matches!(location, Location::Subsection(..)) {
            bail!("Content is generated per subsection; :goto one first");
        }
        if let Some(busy) = self.state.generating {
            bail!("Already generating {busy}");
        }
        let generator = self.generator.clone().ok_or(ClaudeError::ApiKeyNotFound)?;
        let textbook = self.state.textbook.clone().context("No textbook loaded")?;

        self.state.generating = Some(location);
        self.state
            .command_line
            .set_message(format!("Generating {}...", textbook.number_of(location)));

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = generator
                .generate_for_location(&textbook, location)
                .await
                .map(|generated| generated.content)
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::ContentGenerated { title: textbook.title, location, result });
        });
        Ok(())
    }

    /// Ask about the selection, or the page title when nothing is selected
    fn ask(&mut self, question: &str) -> Result<()> {
        let location = self.state.location.context("No page open")?;
        if !matches!(self.state.overlay, Overlay::Chat(_)) {
            if self.state.open_selection_menu() {
                self.state.choose_menu_item(0);
            } else {
                let title = self
                    .state
                    .textbook
                    .as_ref()
                    .and_then(|t| t.title_of(location))
                    .unwrap_or_default()
                    .to_string();
                self.state.selection = None;
                self.state.overlay = Overlay::Chat(ChatPanel {
                    conversation: Conversation::new(location, title, 0..1),
                    input: TextInput::default(),
                    scroll_from_bottom: 0,
                });
            }
        }
        if let Some(panel) = self.state.chat_mut() {
            panel.input = TextInput::with_value(question);
        }
        self.send_chat();
        Ok(())
    }

    fn send_chat(&mut self) {
        let Some(panel) = self.state.chat_mut() else {
            return;
        };
        let question = panel.input.take();
        if !panel.conversation.ask(&question) {
            panel.input = TextInput::with_value(question);
            return;
        }
        panel.scroll_from_bottom = 0;

        let request = chat_request(
            self.config.chat.model,
            &self.config.chat,
            &panel.conversation.selected_text,
            panel.conversation.api_messages(),
        );
        self.start_chat_stream(request);
    }

    fn start_chat_stream(&mut self, request: CreateMessageRequest) {
        self.cancel_chat();
        let (tx, rx) = mpsc::channel(64);
        let cancel = CancellationToken::new();
        let backend = self.chat.clone();
        let token = cancel.clone();

        tokio::spawn(async move {
            if let Err(err) = backend.reply(request, tx.clone(), token).await {
                if !matches!(err, ClaudeError::Cancelled) {
                    tracing::warn!("chat reply failed: {err}");
                    let _ = tx.send(StreamEvent::Error { message: err.to_string() }).await;
                }
            }
        });
        self.chat_stream = Some(ChatStream { rx, cancel });
    }

    fn cancel_chat(&mut self) {
        if let Some(stream) = self.chat_stream.take() {
            stream.cancel.cancel();
        }
    }

    fn poll_chat(&mut self) {
        let Some(stream) = self.chat_stream.as_mut() else {
            return;
        };
        let mut events = Vec::new();
        let mut done = false;
        loop {
            match stream.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    done = true;
                    break;
                }
            }
        }

        let Some(panel) = self.state.chat_mut() else {
            self.cancel_chat();
            return;
        };
        for event in events {
            match event {
                StreamEvent::ContentBlockDelta { text } => panel.conversation.append_reply(&text),
                StreamEvent::MessageStop => done = true,
                StreamEvent::Error { message } => {
                    if panel.conversation.is_waiting() {
                        panel.conversation.fail_reply(&message);
                    }
                    done = true;
                }
                _ => {}
            }
        }
        if done {
            panel.conversation.finish_reply();
            self.chat_stream = None;
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(':') => self.state.command_line.enter(CommandMode::Command),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.state.close_help()
            }
            _ => {}
        }
        false
    }

    fn handle_generator_key(&mut self, key: KeyEvent) -> bool {
        let form = &mut self.state.generator;
        if form.loading {
            return false;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Esc => {
                if self.state.textbook.is_some() {
                    self.state.screen = Screen::Reader;
                }
            }
            KeyCode::Enter => match form.focus {
                FormField::ViewSample => self.show_textbook(sample()),
                _ => self.submit_form(),
            },
            _ if form.focus.is_text() => {
                if let Some(input) = form.focused_input() {
                    edit_text(input, key);
                }
            }
            KeyCode::Left | KeyCode::Right => {
                form.focus = match form.focus {
                    FormField::Generate => FormField::ViewSample,
                    _ => FormField::Generate,
                }
            }
            KeyCode::Char(':') => self.state.command_line.enter(CommandMode::Command),
            KeyCode::Char('?') => self.state.show_help(),
            _ => {}
        }
        false
    }

    fn handle_reader_key(&mut self, key: KeyEvent) -> bool {
        match self.state.overlay {
            Overlay::None => {}
            Overlay::SelectionMenu(_) => {
                self.handle_menu_key(key);
                return false;
            }
            Overlay::Chat(_) => {
                self.handle_chat_key(key);
                return false;
            }
            Overlay::Notes(_) => {
                self.handle_notes_key(key);
                return false;
            }
        }

        if key.code == KeyCode::Char(':') {
            self.state.command_line.enter(CommandMode::Command);
            return false;
        }
        if self.state.textbook.is_none() {
            self.handle_empty_state_key(key);
            return false;
        }
        let Some(action) = key_with_modifier_to_action(key.code, key.modifiers) else {
            return false;
        };

        match action {
            Action::Search => self.state.command_line.enter(CommandMode::Search),
            Action::Help => self.state.show_help(),
            Action::NextPage => {
                self.state.next_page();
            }
            Action::PrevPage => {
                self.state.prev_page();
            }
            Action::ToggleToc => {
                self.state.show_toc = !self.state.show_toc;
                if !self.state.show_toc {
                    self.state.focused_panel = Panel::Content;
                }
            }
            Action::SwitchPanel if self.state.show_toc => {
                self.state.focused_panel = match self.state.focused_panel {
                    Panel::Toc => Panel::Content,
                    Panel::Content => Panel::Toc,
                };
            }
            _ => match self.state.focused_panel {
                Panel::Toc => self.handle_toc_action(action),
                Panel::Content => self.handle_content_action(action),
            },
        }
        false
    }

    fn handle_empty_state_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Tab | KeyCode::BackTab
            | KeyCode::Char('j') | KeyCode::Char('k') => {
                self.state.empty_state_choice = 1 - self.state.empty_state_choice.min(1);
            }
            KeyCode::Enter => match self.state.empty_state_choice {
                0 => self.state.screen = Screen::Generator,
                _ => self.show_textbook(sample()),
            },
            KeyCode::Char('?') => self.state.show_help(),
            _ => {}
        }
    }

    fn handle_toc_action(&mut self, action: Action) {
        let Some(textbook) = self.state.textbook.as_ref() else {
            return;
        };
        let items = self.state.toc.visible_items(textbook);
        let toc = &mut self.state.toc;
        let last = items.len().saturating_sub(1);
        let current = items.get(toc.selected_index.min(last)).cloned();

        match action {
            Action::Down => toc.selected_index = (toc.selected_index + 1).min(last),
            Action::Up => toc.selected_index = toc.selected_index.saturating_sub(1),
            Action::Top => toc.selected_index = 0,
            Action::Bottom => toc.selected_index = last,
            Action::PageDown | Action::HalfPageDown => {
                toc.selected_index = (toc.selected_index + toc.visible_height / 2).min(last)
            }
            Action::PageUp | Action::HalfPageUp => {
                toc.selected_index = toc.selected_index.saturating_sub(toc.visible_height / 2)
            }
            Action::Right => {
                if let Some(item) = current.filter(|i| i.expandable && !i.expanded) {
                    toc.toggle(item.location);
                }
            }
            Action::Left => match current {
                Some(item) if item.expanded => toc.toggle(item.location),
                Some(item) => {
                    if let Some(parent) = item.location.parent() {
                        if let Some(idx) = items.iter().position(|i| i.location == parent) {
                            toc.selected_index = idx;
                        }
                    }
                }
                None => {}
            },
            Action::Select => {
                if let Some(item) = current {
                    self.state.go_to(item.location);
                    self.state.focused_panel = Panel::Content;
                }
                return;
            }
            _ => {}
        }
        self.state.toc.ensure_selection_visible();
    }

    fn handle_content_action(&mut self, action: Action) {
        let content = &mut self.state.content;
        let page = content.visible_height.max(1) as isize;
        match action {
            Action::Down => self.move_cursor(1),
            Action::Up => self.move_cursor(-1),
            Action::HalfPageDown => self.move_cursor(page / 2),
            Action::HalfPageUp => self.move_cursor(-page / 2),
            Action::PageDown => self.move_cursor(page),
            Action::PageUp => self.move_cursor(-page),
            Action::Top => self.move_cursor(isize::MIN / 2),
            Action::Bottom => self.move_cursor(isize::MAX / 2),
            Action::Left => {
                if self.state.show_toc {
                    self.state.focused_panel = Panel::Toc;
                }
            }
            Action::VisualMode => {
                let cursor = content.cursor;
                self.state.selection = match self.state.selection {
                    Some(_) => None,
                    None => Some(Selection { anchor: cursor, cursor }),
                };
            }
            Action::Select => {
                if self.state.selection.is_some() {
                    if !self.state.open_selection_menu() {
                        self.state.command_line.set_error("Selection is empty");
                    }
                } else {
                    self.state.open_highlight_at_cursor();
                }
            }
            Action::Back => {
                if self.state.selection.take().is_none() {
                    content.search_query = None;
                    content.refresh_search();
                    self.state.command_line.message = None;
                }
            }
            Action::Yank => self.yank(),
            Action::NextMatch | Action::PrevMatch => {
                if !content.jump_to_match(action == Action::NextMatch) {
                    self.state.command_line.set_error("No matches");
                }
            }
            _ => {}
        }
    }

    /// Move the content cursor, dragging the selection along
    fn move_cursor(&mut self, delta: isize) {
        self.state.content.move_cursor(delta);
        if let Some(selection) = self.state.selection.as_mut() {
            selection.cursor = self.state.content.cursor;
        }
    }

    fn yank(&mut self) {
        let Some(selection) = self.state.selection else {
            self.state.command_line.set_error("Nothing selected; press v first");
            return;
        };
        let text = self.state.content.text_of(selection.range());
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => {
                self.state.selection = None;
                self.state.command_line.set_message("Copied selection");
            }
            Err(e) => {
                let error_msg = format!("Failed to copy text to clipboard: {}", e);
                tracing::debug!("{}", error_msg);
                self.state.command_line.set_error(error_msg);
            }
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        let Overlay::SelectionMenu(menu) = &mut self.state.overlay else {
            return;
        };
        match key.code {
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                menu.selected = (menu.selected + 1) % MENU_ITEMS.len()
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                menu.selected = (menu.selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len()
            }
            KeyCode::Enter => {
                let index = menu.selected;
                self.state.choose_menu_item(index);
            }
            KeyCode::Char('a') => self.state.choose_menu_item(0),
            KeyCode::Char('n') => self.state.choose_menu_item(1),
            KeyCode::Esc => self.state.overlay = Overlay::None,
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                self.cancel_chat();
                self.state.overlay = Overlay::None;
            }
            KeyCode::Enter => self.send_chat(),
            KeyCode::Char('a') if ctrl => match self.state.accept_chat() {
                Some(_) => self.state.command_line.set_message("Highlight saved"),
                None => self.state.command_line.set_error("Ask a question and wait for the answer first"),
            },
            KeyCode::Up | KeyCode::PageUp => {
                if let Some(panel) = self.state.chat_mut() {
                    panel.scroll_from_bottom += if key.code == KeyCode::Up { 1 } else { 10 };
                }
            }
            KeyCode::Down | KeyCode::PageDown => {
                if let Some(panel) = self.state.chat_mut() {
                    let step = if key.code == KeyCode::Down { 1 } else { 10 };
                    panel.scroll_from_bottom = panel.scroll_from_bottom.saturating_sub(step);
                }
            }
            _ => {
                if let Some(panel) = self.state.chat_mut() {
                    edit_text(&mut panel.input, key);
                }
            }
        }
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.state.overlay = Overlay::None,
            KeyCode::Char('s') if ctrl => self.save_note(),
            KeyCode::Enter => {
                if let Overlay::Notes(dialog) = &mut self.state.overlay {
                    dialog.input.insert('\n');
                }
            }
            _ => {
                if let Overlay::Notes(dialog) = &mut self.state.overlay {
                    edit_text(&mut dialog.input, key);
                }
            }
        }
    }

    fn save_note(&mut self) {
        let Overlay::Notes(dialog) = std::mem::take(&mut self.state.overlay) else {
            return;
        };
        let saved =
            self.state.notes.upsert(dialog.location, &dialog.selected_text, &dialog.input.value);
        match self.state.notes.save() {
            Ok(()) => self
                .state
                .command_line
                .set_message(if saved.is_some() { "Note saved" } else { "Note removed" }),
            Err(err) => self.state.command_line.set_error(format!("{err:#}")),
        }
    }
}

/// Shared line-editing keys for every text field
fn edit_text(input: &mut TextInput, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::annotations::MOCK_RESPONSE;
    use crate::claude::testing::ScriptedModel;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const OUTLINE: &str = r#"Here you go: {"title": "Physics", "chapters": [
        {"title": "Motion", "content": "Things move."},
        {"title": "Energy", "content": "Things have energy."}
    ]}"#;

    fn session(replies: &[&str]) -> (Session<ScriptedModel>, Arc<ScriptedModel>, TempDir) {
        let dir = TempDir::new().unwrap();
        let model = Arc::new(ScriptedModel::new(replies.iter().copied()));
        let shared = Arc::clone(&model);
        let connect: Connect<ScriptedModel> =
            Box::new(move |m| Some(Generator::from_shared(Arc::clone(&shared), m)));
        let mut config = Config::default();
        config.chat.mock_responses = true;
        let store = TextbookStore::at(dir.path().join("textbook.json"));
        let notes = NotesStore::load_from(dir.path().join("notes.json")).unwrap();
        let session = Session::new(config, store, notes, ChatBackend::Mock, connect);
        (session, model, dir)
    }

    fn press(session: &mut Session<ScriptedModel>, code: KeyCode) -> bool {
        session.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(session: &mut Session<ScriptedModel>, c: char) -> bool {
        session.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(session: &mut Session<ScriptedModel>, text: &str) {
        for c in text.chars() {
            press(session, KeyCode::Char(c));
        }
    }

    fn command(session: &mut Session<ScriptedModel>, cmd: &str) -> bool {
        press(session, KeyCode::Char(':'));
        type_text(session, cmd);
        press(session, KeyCode::Enter)
    }

    fn with_lines(session: &mut Session<ScriptedModel>, lines: &[&str]) {
        let content = &mut session.state.content;
        content.rendered_text = lines.iter().map(|l| l.to_string()).collect();
        content.total_lines = lines.len();
        content.visible_height = 20;
    }

    /// Apply background results until `done` holds
    async fn settle(session: &mut Session<ScriptedModel>, done: impl Fn(&Session<ScriptedModel>) -> bool) {
        for _ in 0..500 {
            session.poll_background();
            if done(session) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background work did not finish");
    }

    #[tokio::test]
    async fn generator_form_produces_textbook() {
        let (mut session, model, _dir) = session(&[OUTLINE]);
        session.start(Screen::Generator);

        type_text(&mut session, "Physics");
        press(&mut session, KeyCode::Tab);
        type_text(&mut session, "10th grade");
        press(&mut session, KeyCode::Enter);
        assert!(session.state.generator.loading);

        settle(&mut session, |s| !s.state.generator.loading).await;
        assert_eq!(session.state.screen, Screen::Reader);
        assert_eq!(session.state.textbook.as_ref().unwrap().chapters.len(), 2);
        assert!(session.store.load().unwrap().is_some(), "textbook persisted");

        let prompt = &model.requests()[0].messages[0].content;
        assert!(prompt.contains("Physics"));
        assert!(prompt.contains("10th grade"));
    }

    #[tokio::test]
    async fn failed_generation_shows_error() {
        let (mut session, _model, _dir) = session(&["no json here"]);
        session.state.generator.subject = TextInput::with_value("Art");
        session.state.generator.grade_level = TextInput::with_value("5");
        session.state.generator.focus = FormField::Generate;
        press(&mut session, KeyCode::Enter);

        settle(&mut session, |s| !s.state.generator.loading).await;
        assert_eq!(session.state.generator.error.as_deref(), Some(GENERATION_FAILED));
        assert_eq!(session.state.screen, Screen::Generator);
    }

    #[test]
    fn form_requires_subject_and_grade() {
        let (mut session, model, _dir) = session(&[]);
        press(&mut session, KeyCode::Enter);
        assert_eq!(
            session.state.generator.error.as_deref(),
            Some("Please fill in Subject and Grade Level.")
        );
        assert!(!session.state.generator.loading);
        assert!(model.requests().is_empty());
    }

    #[test]
    fn view_sample_button_opens_reader() {
        let (mut session, _model, _dir) = session(&[]);
        press(&mut session, KeyCode::BackTab);
        assert_eq!(session.state.generator.focus, FormField::ViewSample);
        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state.screen, Screen::Reader);
        assert_eq!(session.state.location, Some(Location::Chapter(0)));
    }

    #[test]
    fn empty_reader_offers_sample() {
        let (mut session, _model, _dir) = session(&[]);
        session.start(Screen::Reader);
        assert!(session.state.textbook.is_none());

        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state.screen, Screen::Generator);

        session.state.screen = Screen::Reader;
        press(&mut session, KeyCode::Down);
        press(&mut session, KeyCode::Enter);
        assert!(session.state.textbook.is_some());
    }

    #[test]
    fn stored_textbook_restored_on_start() {
        let (mut session, _model, _dir) = session(&[]);
        session.store.save(&sample_course()).unwrap();
        session.start(Screen::Reader);
        assert_eq!(session.state.textbook, Some(sample_course()));
    }

    #[test]
    fn quit_and_unknown_commands() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        assert!(!command(&mut session, "bogus"));
        assert_eq!(session.state.command_line.message.as_deref(), Some("Unknown command: bogus"));
        assert!(session.state.command_line.is_error);
        assert!(command(&mut session, "q"));
    }

    #[test]
    fn goto_and_page_keys() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample course");
        command(&mut session, "goto 2.1");
        assert_eq!(session.state.location, Some(Location::Section(1, 0)));

        press(&mut session, KeyCode::Char('>'));
        assert_eq!(session.state.location, Some(Location::Subsection(1, 0, 0)));
        press(&mut session, KeyCode::Char('<'));
        press(&mut session, KeyCode::Char('<'));
        assert_eq!(session.state.location, Some(Location::Chapter(1)));

        command(&mut session, "goto 9");
        assert_eq!(session.state.command_line.message.as_deref(), Some("No page 9"));
    }

    #[test]
    fn toc_navigation_opens_pages() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample course");
        press(&mut session, KeyCode::Tab);
        assert_eq!(session.state.focused_panel, Panel::Toc);

        // Chapter 1, its two sections, then chapter 2
        press(&mut session, KeyCode::Char('j'));
        press(&mut session, KeyCode::Char('l'));
        press(&mut session, KeyCode::Char('j'));
        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state.location, Some(Location::Subsection(0, 0, 0)));
        assert_eq!(session.state.focused_panel, Panel::Content);
    }

    #[tokio::test]
    async fn gen_fills_missing_subsection() {
        let (mut session, model, _dir) = session(&["Body about lists."]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample course");
        let target = *sample_course().missing_content().first().unwrap();
        command(&mut session, &format!("goto {}", target.label()));
        command(&mut session, "gen");
        assert_eq!(session.state.generating, Some(target));

        settle(&mut session, |s| s.state.generating.is_none()).await;
        let book = session.state.textbook.as_ref().unwrap();
        let Location::Subsection(c, s, ss) = target else { unreachable!() };
        let content = book.subsection(c, s, ss).unwrap().content.clone().unwrap();
        assert!(content.ends_with("Body about lists."));
        assert_eq!(session.store.load().unwrap().as_ref(), Some(book));
        assert_eq!(model.requests().len(), 1);
    }

    #[test]
    fn gen_rejects_chapter_pages() {
        let (mut session, model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample course");
        command(&mut session, "gen");
        assert!(session.state.command_line.is_error);
        assert!(session.state.generating.is_none());
        assert!(model.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ask_ai_about_selection_and_accept() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        with_lines(&mut session, &["Variables", "A variable names a value.", "x = 1"]);

        press(&mut session, KeyCode::Char('j'));
        press(&mut session, KeyCode::Char('v'));
        press(&mut session, KeyCode::Char('j'));
        press(&mut session, KeyCode::Enter);
        assert!(matches!(session.state.overlay, Overlay::SelectionMenu(_)));
        press(&mut session, KeyCode::Enter);

        type_text(&mut session, "What is a value?");
        press(&mut session, KeyCode::Enter);
        assert!(session.state.chat_mut().unwrap().conversation.is_waiting());

        settle(&mut session, |s| match &s.state.overlay {
            Overlay::Chat(panel) => !panel.conversation.is_waiting(),
            _ => false,
        })
        .await;
        let turns = &session.state.chat_mut().unwrap().conversation.turns;
        assert_eq!(turns.last().unwrap().content, MOCK_RESPONSE);
        assert_eq!(turns[0].content, "Ask about \"A variable names a value.\nx = 1\"");

        ctrl(&mut session, 'a');
        assert!(matches!(session.state.overlay, Overlay::None));
        assert_eq!(session.state.highlights.len(), 1);

        session.state.content.cursor = 2;
        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state.chat_mut().unwrap().conversation.turns.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn closing_chat_cancels_reply() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        with_lines(&mut session, &["Variables"]);
        command(&mut session, "ask what is this?");
        assert!(session.chat_stream.is_some());

        press(&mut session, KeyCode::Esc);
        assert!(session.chat_stream.is_none());
        assert!(matches!(session.state.overlay, Overlay::None));
    }

    #[test]
    fn notes_dialog_saves_note() {
        let (mut session, _model, dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        with_lines(&mut session, &["Variables", "names for values"]);

        press(&mut session, KeyCode::Char('j'));
        press(&mut session, KeyCode::Char('v'));
        press(&mut session, KeyCode::Enter);
        press(&mut session, KeyCode::Char('j'));
        press(&mut session, KeyCode::Enter);
        assert!(matches!(session.state.overlay, Overlay::Notes(_)));

        type_text(&mut session, "remember");
        press(&mut session, KeyCode::Enter);
        type_text(&mut session, "this");
        ctrl(&mut session, 's');

        assert!(matches!(session.state.overlay, Overlay::None));
        let note = session.state.notes.get(Location::Chapter(0), "names for values").unwrap();
        assert_eq!(note.content, "remember\nthis");
        let reloaded = NotesStore::load_from(dir.path().join("notes.json")).unwrap();
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn notes_stay_with_their_textbook() {
        let (mut session, _model, dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        session.state.notes.upsert(Location::Chapter(0), "Introduction", "note from the sample");
        session.state.notes.save().unwrap();

        command(&mut session, "sample course");
        assert!(session.state.notes.get(Location::Chapter(0), "Introduction").is_none());
        let reloaded = NotesStore::load_from(dir.path().join("notes.json")).unwrap();
        assert!(reloaded.is_empty());

        command(&mut session, "sample course");
        session.state.notes.upsert(Location::Chapter(0), "Introduction", "course note");
        command(&mut session, "sample course");
        assert_eq!(session.state.notes.len(), 1);
    }

    #[test]
    fn search_jumps_between_matches() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        with_lines(&mut session, &["loops", "other", "while loops", "end"]);

        press(&mut session, KeyCode::Char('/'));
        type_text(&mut session, "loop");
        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state.content.search_matches, vec![0, 2]);
        assert_eq!(session.state.content.cursor, 2);

        press(&mut session, KeyCode::Char('n'));
        assert_eq!(session.state.content.cursor, 0);

        press(&mut session, KeyCode::Char('/'));
        type_text(&mut session, "absent");
        press(&mut session, KeyCode::Enter);
        assert_eq!(session.state.command_line.message.as_deref(), Some("Pattern not found: absent"));
    }

    #[test]
    fn export_and_clear() {
        let (mut session, _model, dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        let path = dir.path().join("book.md");
        command(&mut session, &format!("export {}", path.display()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# "));

        command(&mut session, "clear");
        assert!(session.state.textbook.is_none());
        assert!(session.store.load().unwrap().is_none());
    }

    #[test]
    fn help_opens_and_closes() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "sample");
        press(&mut session, KeyCode::Char('?'));
        assert_eq!(session.state.screen, Screen::Help);
        press(&mut session, KeyCode::Esc);
        assert_eq!(session.state.screen, Screen::Reader);
    }

    #[test]
    fn model_command_switches_model() {
        let (mut session, _model, _dir) = session(&[]);
        session.state.screen = Screen::Reader;
        command(&mut session, "model opus");
        assert_eq!(session.config.model, ClaudeModel::Opus45);
        command(&mut session, "model gpt");
        assert!(session.state.command_line.is_error);
    }
}
