//! Textbook content: model, converters, pages and storage
//!
//! A textbook is either an outline (chapters with prose bodies) or a course
//! (chapters, sections and subsections with markdown bodies). Both are read
//! through [`Location`]s and rendered as [`ContentBlock`]s.

pub mod content;
pub mod markdown;
pub mod markup;
pub mod model;
pub mod page;
pub mod progress;
pub mod sample;
pub mod storage;

pub use content::{Alignment, CodeBlock, ContentBlock, Table};
pub use progress::{ReadingProgress, scroll_percent};
pub use model::{Chapter, Location, Section, Subsection, Textbook, TextbookError};
pub use sample::{sample, sample_course};
pub use storage::TextbookStore;
