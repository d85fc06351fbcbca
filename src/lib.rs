//! Cardterm is a terminal business card with a built-in chat about its owner.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the profile data, the interaction controller, request
//!   validation, the streaming chat client and local preferences.
//! - [`ui`] renders the card and conversation and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`utils`] holds logging setup and test helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves configuration and dispatches
//! into [`ui::chat_loop`] for interactive sessions.

pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
