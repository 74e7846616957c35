//! textbook - generate textbooks with Claude and read them in the terminal
//!
//! A generator form turns a subject and grade level into a textbook outline,
//! a reader shows it with a contents tree and highlighted code, and passages
//! can be selected to ask questions or attach notes. The same generation
//! entry points are served over HTTP by [`server`].

pub mod annotations;
pub mod app;
pub mod claude;
pub mod config;
pub mod export;
pub mod generate;
pub mod server;
pub mod syntax;
pub mod textbook;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
