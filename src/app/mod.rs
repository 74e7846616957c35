//! Application state and event handling

pub mod command;
pub mod input;
pub mod session;
pub mod state;

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::ui;
pub use session::{AppEvent, Session};
pub use state::{AppState, Screen};

/// The main application
pub struct App {
    session: Session,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Create a new application instance
    pub fn new(session: Session) -> Result<Self> {
        let terminal = Self::setup_terminal()?;

        Ok(Self { session, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let theme = self.session.config.active_theme();

        loop {
            self.session.poll_background();

            // Draw UI; line counts are only known after layout
            let state = &mut self.session.state;
            self.terminal.draw(|frame| ui::draw(frame, state, &theme))?;
            state.record_progress();

            // Poll without blocking the runtime; background tasks keep going
            let pending = tokio::task::block_in_place(|| {
                event::poll(std::time::Duration::from_millis(16))
            })?;
            if pending {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.session.handle_key(key) {
                        break;
                    }
                }
            }
        }

        self.restore_terminal()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
