//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, installs logging, and runs the
//! requested command. Every path exits with status 0; failures are printed to
//! stderr.


use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::error;

use crate::core::config::ClientConfig;
use crate::core::profile::PROFILE;
use crate::ui::banner::banner_plain_text;
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "cardterm")]
#[command(version)]
#[command(about = "A terminal business card you can chat with")]
#[command(disable_help_subcommand = true)]
#[command(
    long_about = "Cardterm shows a business card in your terminal and lets you ask questions \
about its owner. Answers stream in from the chat service together with the sources they \
draw on and a few follow-up questions.\n\n\
Environment Variables:\n\
  CARDTERM_API_URL  Chat service base URL (defaults to https://api.cardterm.dev/api)\n\
  CARDTERM_LOG      Log filter used with --log (defaults to info)\n\n\
Controls:\n\
  Enter             Send the message, or ask the highlighted follow-up\n\
  Alt+Enter         Insert a new line\n\
  Up/Down           Pick a follow-up question\n\
  Esc               Cancel the answer in progress, or dismiss follow-ups\n\
  Ctrl+C            Quit (Ctrl+D also quits when the input is empty)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat service base URL
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Write diagnostic logs to the given file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Seconds to wait for the chat service before giving up
    #[arg(short = 't', long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Print the business card and exit
    Profile,
    /// Show usage, environment variables and key bindings
    Help,
}

pub fn main() {
    let Some(args) = parse_args(std::env::args_os()) else {
        return;
    };
    if let Err(err) = run(args) {
        error!(error = %err, "cardterm exited with an error");
        eprintln!("❌ {err}");
    }
}

/// Parses `argv` without exiting the process. Usage errors are printed the
/// way clap would print them (help and version text go to stdout).
fn parse_args<I, T>(argv: I) -> Option<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Args::try_parse_from(argv) {
        Ok(args) => Some(args),
        Err(err) => {
            let _ = err.print();
            None
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = ClientConfig::resolve(args.url, args.timeout, args.log);
    if let Some(path) = config.log_file.as_deref() {
        if let Err(err) = init_tracing(path) {
            eprintln!("⚠️  Logging disabled: {err}");
        }
    }

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Profile => {
            print!("{}", banner_plain_text(&PROFILE));
            Ok(())
        }
        Commands::Help => {
            Args::command().print_long_help()?;
            Ok(())
        }
        Commands::Chat => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(run_chat(config)),
    }
}
