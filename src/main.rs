use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use textbook::annotations::NotesStore;
use textbook::app::{Screen, Session};
use textbook::claude::{ApiKeyManager, ClaudeClient, ClaudeModel};
use textbook::export;
use textbook::generate::{Generator, TextbookRequest, render_html};
use textbook::server::{self, ServerState};
use textbook::textbook::{Textbook, TextbookStore, sample, sample_course};
use textbook::{App, Config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "textbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Claude model for this run (haiku, sonnet, opus)
    #[arg(short, long, global = true, value_parser = parse_model)]
    model: Option<ClaudeModel>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the reader on the stored textbook
    Read,
    /// Generate a textbook outline and store it
    Generate {
        #[arg(short, long)]
        subject: String,
        #[arg(short, long)]
        grade: String,
        /// Additional requirements for the outline
        #[arg(short, long, default_value = "")]
        info: String,
    },
    /// Store a bundled sample textbook and open it
    Sample {
        /// The expanded course instead of the outline
        #[arg(long)]
        course: bool,
    },
    /// Store a textbook JSON file
    Load { path: PathBuf },
    /// Print a generated table of contents as JSON
    Toc { topic: String },
    /// Print generated content for one subsection
    Content {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        chapter: String,
        #[arg(long)]
        section: String,
        #[arg(long)]
        subsection: String,
        /// Render a standalone HTML page
        #[arg(long)]
        html: bool,
    },
    /// Generate a full course, caching every section on disk
    Build {
        topic: String,
        #[arg(long)]
        cache: PathBuf,
    },
    /// Write the stored textbook to a file
    Export {
        path: PathBuf,
        /// Defaults to the file extension
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },
    /// Serve the generation API over HTTP
    Serve {
        /// Bind address; defaults to the configured one
        #[arg(long)]
        addr: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Md,
    Html,
}

fn parse_model(s: &str) -> Result<ClaudeModel, String> {
    ClaudeModel::parse(s).ok_or_else(|| format!("unknown model '{s}' (haiku, sonnet, opus)"))
}

fn init_logging(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "textbook=info".into());

    if to_file {
        // The terminal belongs to the TUI
        let path = Config::log_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {:?}", parent))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {:?}", path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn generator(model: ClaudeModel) -> Result<Generator<ClaudeClient>> {
    let client = ClaudeClient::from_env_or_keyring()?;
    Ok(Generator::new(client, model))
}

async fn run_tui(config: Config, screen: Screen) -> Result<()> {
    let store = TextbookStore::open()?;
    let notes = NotesStore::load()?;
    let mut session = Session::connected(config, store, notes);
    session.start(screen);

    let mut app = App::new(session)?;
    app.run().await
}

fn store_and_report(store: &TextbookStore, textbook: &Textbook) -> Result<()> {
    store.save(textbook)?;
    println!(
        "Stored \"{}\" ({} chapters) in {}",
        textbook.title,
        textbook.chapters.len(),
        store.path().display()
    );
    Ok(())
}

fn export_format(path: &Path, format: Option<ExportFormat>) -> ExportFormat {
    format.unwrap_or_else(|| {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("html" | "htm") => ExportFormat::Html,
            _ => ExportFormat::Md,
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let tui = matches!(cli.command, None | Some(Commands::Read) | Some(Commands::Sample { .. }));
    init_logging(tui)?;

    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    match cli.command {
        None => run_tui(config, Screen::Generator).await?,
        Some(Commands::Read) => run_tui(config, Screen::Reader).await?,
        Some(Commands::Sample { course }) => {
            let textbook = if course { sample_course() } else { sample() };
            TextbookStore::open()?.save(&textbook)?;
            run_tui(config, Screen::Reader).await?;
        }
        Some(Commands::Generate { subject, grade, info }) => {
            let request = TextbookRequest { subject, grade_level: grade, additional_info: info };
            let textbook = generator(config.model)?.generate_textbook(&request).await?;
            store_and_report(&TextbookStore::open()?, &textbook)?;
        }
        Some(Commands::Load { path }) => {
            let store = TextbookStore::open()?;
            let textbook = store.import(&path)?;
            println!("Loaded \"{}\" ({} chapters)", textbook.title, textbook.chapters.len());
        }
        Some(Commands::Toc { topic }) => {
            let toc = generator(config.model)?.generate_table_of_contents(&topic).await?;
            println!("{}", serde_json::to_string_pretty(&toc)?);
        }
        Some(Commands::Content { topic, chapter, section, subsection, html }) => {
            let generated = generator(config.model)?
                .generate_subsection_content(&topic, &chapter, &section, &subsection)
                .await?;
            if html {
                println!("{}", render_html(&generated.content));
            } else {
                println!("{}", generated.content);
            }
        }
        Some(Commands::Build { topic, cache }) => {
            let textbook = generator(config.model)?.build_course(&topic, &cache).await?;
            store_and_report(&TextbookStore::open()?, &textbook)?;
        }
        Some(Commands::Export { path, format }) => {
            let Some(textbook) = TextbookStore::open()?.load()? else {
                bail!("No stored textbook; generate or load one first");
            };
            let contents = match export_format(&path, format) {
                ExportFormat::Md => export::to_markdown(&textbook),
                ExportFormat::Html => export::to_html(&textbook),
            };
            std::fs::write(&path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported \"{}\" to {}", textbook.title, path.display());
        }
        Some(Commands::Serve { addr }) => {
            if !ApiKeyManager::has_api_key() {
                bail!("The server needs an API key; set ANTHROPIC_API_KEY or store one with :key");
            }
            let generator = generator(config.model)?;
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            server::serve(&addr, ServerState { generator, chat: config.chat.clone() }).await?;
        }
    }

    Ok(())
}
