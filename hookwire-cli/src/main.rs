//! Hookwire CLI - fixture checks and local dispatch for webhook handlers.
//!
//! # Commands
//!
//! - `hookwire fixtures` - Parse every sample payload with the configured schemas
//! - `hookwire handlers` - List handlers discovered in the configured directories
//! - `hookwire test <TAG>` - Dispatch a sample payload to the configured handlers
//! - `hookwire receive` - Dispatch a payload from stdin or a file, print the report as JSON

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use hookwire_log::{Level, LogConfig};
use std::path::PathBuf;

mod commands;
mod error;
mod output;

use commands::{fixtures, handlers, receive, self_test};
use error::CliResult;

/// Hookwire CLI - webhook handler tooling
#[derive(Parser)]
#[command(name = "hookwire")]
#[command(version)]
#[command(about = "Check fixtures, list handlers and dispatch webhook payloads locally")]
#[command(propagate_version = true)]
#[command(after_help = format!(
    "{}\n  {} hookwire fixtures --dir fixtures\n  {} hookwire test ComputerCheckIn --config hookwire.toml\n  {} hookwire receive --tag PushSent < payload.json",
    "Examples:".bright_cyan().bold(),
    "$".dimmed(),
    "$".dimmed(),
    "$".dimmed(),
))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (JSON, TOML or .env)
    #[arg(short, long, global = true, env = "HOOKWIRE_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every fixture with the configured schemas
    #[command(alias = "f")]
    Fixtures(FixturesArgs),

    /// List handlers per event type
    #[command(alias = "h")]
    Handlers,

    /// Dispatch a fixture to the configured handlers
    #[command(alias = "t")]
    Test(TestArgs),

    /// Dispatch one payload from stdin or a file and print the report as JSON
    #[command(alias = "r")]
    Receive(ReceiveArgs),
}

#[derive(Args)]
struct FixturesArgs {
    /// Fixture directory (defaults to the configured one, then the embedded samples)
    #[arg(short, long)]
    dir: Option<PathBuf>,
}

#[derive(Args)]
struct TestArgs {
    /// Event type, e.g. ComputerCheckIn
    tag: String,

    /// Fixture directory (defaults to the configured one, then the embedded samples)
    #[arg(long)]
    fixture_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ReceiveArgs {
    /// Event type; read from webhook.webhookEvent when omitted
    #[arg(short, long)]
    tag: Option<String>,

    /// Payload file; stdin when omitted
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn init_logging(cli: &Cli) {
    let mut config = LogConfig::from_env();
    if cli.verbose {
        config = config.with_level(Level::Debug);
    }
    if cli.no_color {
        config = config.with_color(false);
    }
    let _ = hookwire_log::try_init_with(config);
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fixtures(args) => {
            output::print_mini_banner();
            fixtures::execute(args.dir.as_deref(), &config)
        }
        Commands::Handlers => {
            output::print_mini_banner();
            handlers::execute(&config)
        }
        Commands::Test(args) => {
            output::print_mini_banner();
            self_test::execute(&args.tag, args.fixture_dir.as_deref(), &config).await
        }
        Commands::Receive(args) => {
            receive::execute(args.tag.as_deref(), args.file.as_deref(), &config).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    init_logging(&cli);

    if let Err(e) = run(cli).await {
        eprintln!("\n  {} {}\n", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
