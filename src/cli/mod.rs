//! CLI module for priorit - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for adding, listing,
//! searching and editing items.

pub mod commands;

pub use commands::Cli;
