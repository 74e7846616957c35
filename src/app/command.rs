//! Command parsing for the command line

use std::path::PathBuf;

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Quit the application: :q or :quit
    Quit,
    /// Show help: :help or :h
    Help,
    /// Back to the generator form: :home
    Home,
    /// Load the bundled sample: :sample [course]
    Sample { course: bool },
    /// Import a textbook JSON file: :load <path>
    Load(PathBuf),
    /// Jump to a numbered page: :goto 1.2.3
    Goto(String),
    /// Generate the current (or given) subsection: :gen [1.2.3]
    Generate(Option<String>),
    /// Open the chat about the selection with a question: :ask <question>
    Ask(String),
    /// Store an API key in the keyring: :key <api-key>
    Key(String),
    /// Switch the generation model: :model <haiku|sonnet|opus>
    Model(String),
    /// Write the textbook to a file: :export <path>
    Export(PathBuf),
    /// Forget the stored textbook: :clear
    Clear,
    /// Search content: /pattern
    Search(String),
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug)]
pub enum ParseResult {
    Ok(Command),
    UnknownCommand(String),
    MissingArgument(String),
}

fn required(name: &str, args: &str, make: impl FnOnce(&str) -> Command) -> ParseResult {
    if args.is_empty() {
        ParseResult::MissingArgument(name.to_string())
    } else {
        ParseResult::Ok(make(args))
    }
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "quit" | "q" => ParseResult::Ok(Command::Quit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        "home" | "new" => ParseResult::Ok(Command::Home),
        "sample" => ParseResult::Ok(Command::Sample { course: args.eq_ignore_ascii_case("course") }),
        "load" | "open" | "o" => required("load", args, |a| Command::Load(PathBuf::from(a))),
        "goto" | "g" => required("goto", args, |a| Command::Goto(a.to_string())),
        "gen" | "generate" => ParseResult::Ok(Command::Generate(
            (!args.is_empty()).then(|| args.to_string()),
        )),
        "ask" => required("ask", args, |a| Command::Ask(a.to_string())),
        "key" => required("key", args, |a| Command::Key(a.to_string())),
        "model" | "m" => required("model", args, |a| Command::Model(a.to_string())),
        "export" | "w" => required("export", args, |a| Command::Export(PathBuf::from(a))),
        "clear" => ParseResult::Ok(Command::Clear),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

/// Parse a search query (without the leading /)
pub fn parse_search(input: &str) -> Command {
    Command::Search(input.to_string())
}
