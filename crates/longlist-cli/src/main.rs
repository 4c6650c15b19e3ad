#![forbid(unsafe_code)]

mod cmd;
mod output;
mod server;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use longlist_core::config::resolve_config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "longlist: a searchable, reorderable, multi-select list",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format. Defaults to pretty on a terminal, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: the user config dir's longlist/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Server",
        about = "Run the HTTP API",
        long_about = "Serve the item list, selection, order, and notes over HTTP until Ctrl-C.",
        after_help = "EXAMPLES:\n    # Serve on the configured address\n    longlist serve\n\n    # Pick a free port and a smaller list\n    longlist serve --listen 127.0.0.1:0 --universe 500"
    )]
    Serve(cmd::serve::ServeArgs),

    #[command(
        next_help_heading = "Client",
        about = "Browse the list interactively",
        long_about = "Open an infinite-scroll terminal view with search, checkboxes, notes, and drag and drop.",
        after_help = "EXAMPLES:\n    # Browse the configured server\n    longlist browse\n\n    # Browse another server and keep notes on it\n    longlist browse --server http://10.0.0.2:3000 --persist-notes"
    )]
    Browse(cmd::browse::BrowseArgs),

    #[command(
        next_help_heading = "Client",
        about = "Fetch one page of items",
        long_about = "Fetch one page of the searched, custom-ordered list.",
        after_help = "EXAMPLES:\n    # First page\n    longlist items\n\n    # Search and page\n    longlist items --search \"Item 42\" --offset 20 -n 20\n\n    # Emit machine-readable output\n    longlist items --json"
    )]
    Items(cmd::items::ItemsArgs),

    #[command(
        next_help_heading = "Client",
        about = "Show or update the shared state",
        long_about = "Show selection, custom order, and notes, or replace some of them.",
        after_help = "EXAMPLES:\n    # Show state\n    longlist state\n\n    # Put 3, 1, 2 first\n    longlist state --order 3,1,2\n\n    # Go back to ascending ids, but only if nobody else wrote since version 7\n    longlist state --clear-order --expect-version 7"
    )]
    State(cmd::state::StateArgs),

    #[command(
        next_help_heading = "Client",
        about = "Check or uncheck items",
        long_about = "Add items to, or remove them from, the selection.",
        after_help = "EXAMPLES:\n    # Select two items\n    longlist select 4 9\n\n    # Unselect one\n    longlist select 4 --off"
    )]
    Select(cmd::select::SelectArgs),

    #[command(
        next_help_heading = "Client",
        about = "Drop one item onto another",
        long_about = "Move the source item to the target item's position in the custom order.",
        after_help = "EXAMPLES:\n    # Drag item 7 onto item 2\n    longlist move 7 2"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Client",
        about = "Save a note on an item",
        long_about = "Store a note on the server for one item. An empty note clears it.",
        after_help = "EXAMPLES:\n    # Save a note\n    longlist note 12 \"call back\"\n\n    # Clear it\n    longlist note 12"
    )]
    Note(cmd::note::NoteArgs),

    #[command(
        next_help_heading = "Client",
        about = "Check that a server is up",
        after_help = "EXAMPLES:\n    longlist health --server http://127.0.0.1:3000"
    )]
    Health(cmd::health::HealthArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    longlist completions bash > ~/.local/share/bash-completion/completions/longlist"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_env("LONGLIST_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if interactive {
            // stderr shares the screen with the TUI.
            "off"
        } else if env::var("DEBUG").is_ok() {
            "longlist=debug,info"
        } else {
            "longlist=info,warn"
        })
    });

    let format = env::var("LONGLIST_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Browse(_)));

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config = match resolve_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                output,
                &CliError::from_code(longlist_core::error::ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            return Err(err);
        }
    };

    match cli.command {
        Commands::Serve(ref args) => cmd::serve::run_serve(args, &config.server, output),
        Commands::Browse(ref args) => cmd::browse::run_browse(args, &config.client),
        Commands::Items(ref args) => cmd::items::run_items(args, &config.client, output),
        Commands::State(ref args) => cmd::state::run_state(args, &config.client, output),
        Commands::Select(ref args) => cmd::select::run_select(args, &config.client, output),
        Commands::Move(ref args) => cmd::move_cmd::run_move(args, &config.client, output),
        Commands::Note(ref args) => cmd::note::run_note(args, &config.client, output),
        Commands::Health(ref args) => cmd::health::run_health(args, &config.client, output),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
