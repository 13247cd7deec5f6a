//! Editor Session - terminal front end
//!
//! Entry point for the headless shell. Handles CLI argument parsing,
//! logging initialization, and drives a session from stdin lines.

use anyhow::Context;
use editor_session::config::APP_NAME;
use editor_session::message::{
    ChatMessageEvent, EditorMessage, Message, SidebarMessage, TabMessage, TreeMessage,
};
use editor_session::state::DocumentId;
use editor_session::ui::{sync_editor, BufferSurface, ChatInput, SidebarView};
use editor_session::{Redraw, Session, SessionConfig, SessionRuntime};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Command line flags
#[derive(Debug, Default)]
struct Flags {
    /// JSON configuration file
    config: Option<PathBuf>,

    /// Fixed RNG seed for the assistant
    seed: Option<u64>,
}

/// What the loop reacts to next
enum Event {
    Line(Option<String>),
    Message(Message),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    log::info!("Starting {}", APP_NAME);

    let flags = parse_args();
    let mut config = load_config(&flags)?;
    if flags.seed.is_some() {
        config.assistant.seed = flags.seed;
    }

    let mut runtime = SessionRuntime::from_config(tokio::runtime::Handle::current(), config)?;
    let mut editor = BufferSurface::default();
    let mut input = ChatInput::new();
    sync_editor(&mut editor, runtime.session().tabs());

    print_help_commands();
    render_all(runtime.session(), &editor);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line.context("reading stdin")?),
            Some(message) = runtime.recv() => Event::Message(message),
        };

        let line = match event {
            Event::Message(message) => {
                let redraw = runtime.apply(message);
                render(runtime.session(), &mut editor, redraw);
                continue;
            }
            Event::Line(None) => break,
            Event::Line(Some(line)) => line,
        };

        match parse_command(&mut input, &line) {
            Command::Quit => break,
            Command::Show => render_all(runtime.session(), &editor),
            Command::Help => print_help_commands(),
            Command::Ignore => {}
            Command::Unknown(cmd) => println!("Unknown command: {}", cmd),
            Command::Apply(message) => {
                let redraw = runtime.apply(message);
                render(runtime.session(), &mut editor, redraw);
            }
        }
    }

    log::info!("Exiting {}", APP_NAME);
    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn,editor_session=info");
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();
}

/// Parse command line arguments
fn parse_args() -> Flags {
    let args: Vec<String> = std::env::args().collect();
    let mut flags = Flags::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "-c" | "--config" => {
                if i + 1 < args.len() {
                    flags.config = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                } else {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
            }
            "-s" | "--seed" => match args.get(i + 1).and_then(|s| s.parse().ok()) {
                Some(seed) => {
                    flags.seed = Some(seed);
                    i += 1;
                }
                None => {
                    eprintln!("Error: --seed requires a number");
                    std::process::exit(1);
                }
            },
            arg => {
                eprintln!("Unknown option: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    flags
}

fn load_config(flags: &Flags) -> anyhow::Result<SessionConfig> {
    let Some(path) = &flags.config else {
        return Ok(SessionConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    match SessionConfig::from_json_str(&json) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::error!("Rejected config {}: {}", path.display(), err);
            anyhow::bail!("{}", err.user_message())
        }
    }
}

/// A parsed input line
enum Command {
    Apply(Message),
    Show,
    Help,
    Ignore,
    Quit,
    Unknown(String),
}

fn parse_command(input: &mut ChatInput, line: &str) -> Command {
    let Some(rest) = line.strip_prefix(':') else {
        input.set_text(line);
        return match input.submit() {
            Some(text) => Command::Apply(ChatMessageEvent::Send(text).into()),
            None => Command::Ignore,
        };
    };

    let (cmd, arg) = match rest.split_once(' ') {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };

    match cmd {
        "q" | "quit" => Command::Quit,
        "show" => Command::Show,
        "help" => Command::Help,
        "new" => Command::Apply(TabMessage::New.into()),
        "select" => Command::Apply(TabMessage::Select(DocumentId::new(arg)).into()),
        "close" => Command::Apply(TabMessage::Close(DocumentId::new(arg)).into()),
        "edit" => Command::Apply(
            EditorMessage::Changed(arg.replace("\\n", "\n")).into(),
        ),
        "open" | "fold" => Command::Apply(
            TreeMessage::Toggle {
                id: arg.to_string(),
                open: cmd == "open",
            }
            .into(),
        ),
        "cursor" => match parse_cursor(arg) {
            Some((line, column)) => Command::Apply(EditorMessage::CursorMoved { line, column }.into()),
            None => Command::Unknown(format!("cursor {}", arg)),
        },
        "search" => Command::Apply(SidebarMessage::SearchChanged(arg.to_string()).into()),
        "clear" => Command::Apply(ChatMessageEvent::Clear.into()),
        "view" => match parse_view(arg) {
            Some(view) => Command::Apply(SidebarMessage::SelectView(view).into()),
            None => Command::Unknown(format!("view {}", arg)),
        },
        other => Command::Unknown(other.to_string()),
    }
}

fn parse_cursor(arg: &str) -> Option<(usize, usize)> {
    let (line, column) = arg.split_once(|c: char| c == ':' || c.is_whitespace())?;
    Some((line.trim().parse().ok()?, column.trim().parse().ok()?))
}

fn parse_view(name: &str) -> Option<SidebarView> {
    match name {
        "explorer" => Some(SidebarView::Explorer),
        "search" => Some(SidebarView::Search),
        "scm" | "source-control" => Some(SidebarView::SourceControl),
        "extensions" => Some(SidebarView::Extensions),
        _ => None,
    }
}

fn render(session: &Session, editor: &mut BufferSurface, redraw: Redraw) {
    match redraw {
        Redraw::Nothing => {}
        Redraw::Editor => {
            sync_editor(editor, session.tabs());
            render_tabs(session);
            render_editor(editor);
        }
        Redraw::Tabs => {
            // Stands in for the widget, which already holds edited text
            sync_editor(editor, session.tabs());
            render_tabs(session);
        }
        Redraw::Tree | Redraw::Sidebar => render_sidebar(session),
        Redraw::Chat => render_chat(session),
        Redraw::Status => {}
    }
    render_status(session);
}

fn render_all(session: &Session, editor: &BufferSurface) {
    render_sidebar(session);
    render_tabs(session);
    render_editor(editor);
    render_chat(session);
    render_status(session);
}

fn render_sidebar(session: &Session) {
    println!("[{}]", session.sidebar_view().title());
    match session.sidebar_view() {
        SidebarView::Explorer => {
            for row in session.tree_rows() {
                println!("  {}", row.label());
            }
        }
        SidebarView::Search => println!("  Search: {}", session.search_query()),
        _ => {}
    }
}

fn render_tabs(session: &Session) {
    let tabs: Vec<String> = session
        .tab_rows()
        .iter()
        .map(|row| {
            if row.is_active {
                format!("[{}]", row.display_title())
            } else {
                format!(" {} ", row.display_title())
            }
        })
        .collect();
    println!("Tabs: {}", tabs.join("|"));
}

fn render_editor(editor: &BufferSurface) {
    match &editor.language {
        Some(language) => {
            println!("--- editor ({}) ---", language);
            println!("{}", editor.text);
            println!("-------------------");
        }
        None => println!("(no file open, :new to create one)"),
    }
}

fn render_chat(session: &Session) {
    let chat = session.chat();
    if chat.messages().is_empty() && !chat.is_typing() {
        println!("(conversation is empty)");
    }
    for message in chat.messages() {
        println!(
            "{} {}: {}",
            message.display_time(),
            message.role.display_name(),
            message.content
        );
    }
    if chat.is_typing() {
        println!("Assistant is typing...");
    }
}

fn render_status(session: &Session) {
    let status = session.status();
    println!("== {} || {}", status.left_text(), status.right_text());
}

/// Print in-session commands
fn print_help_commands() {
    println!(
        r#"Type text to ask the assistant. Commands:
  :new | :select <id> | :close <id> | :edit <text> | :cursor <line>:<col>
  :open <folder> | :fold <folder> | :view <explorer|search|scm|extensions>
  :search <text>
  :clear | :show | :help | :quit"#
    );
}

/// Print help message
fn print_help() {
    println!(
        r#"Editor Session - headless code-editor session

USAGE:
    {} [OPTIONS]

OPTIONS:
    -h, --help          Show this help message
    -v, --version       Show version information
    -c, --config PATH   Load session configuration from a JSON file
    -s, --seed N        Seed the assistant's latency and reply choice
"#,
        APP_NAME
    );
}
