//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod consumer;
pub mod helpers;

pub use args::{Cli, Commands, GlobalOpts};
pub use consumer::ArgConsumer;
