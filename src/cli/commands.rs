//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - add: put a new item on the list
//! - list / next: show items in priority order
//! - search: regex search over ids, titles, texts and categories
//! - edit / done / undone: change an existing item
//! - categories: list every category in use

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use priorit::domain::Priority;
use std::path::PathBuf;

/// Priorit - a personal priority list
#[derive(Parser, Debug)]
#[command(name = "priorit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Item directory (overrides the configured one)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new item
    Add {
        /// Item title
        title: String,

        /// Longer description
        #[arg(short, long)]
        text: Option<String>,

        /// Category (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,

        /// Priority (very-high, high, med, low, very-low or 1-5)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Use this id instead of a generated one
        #[arg(long)]
        id: Option<String>,
    },

    /// List items, most important first
    List {
        /// Include done items
        #[arg(short, long)]
        all: bool,
    },

    /// Show the most important item
    Next,

    /// Search items with a regular expression (whole-field match)
    Search {
        /// Pattern to match
        pattern: String,

        /// Match anywhere in a field instead of the whole field
        #[arg(short, long)]
        substring: bool,
    },

    /// Change fields of an existing item
    Edit {
        /// Item id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        text: Option<String>,

        /// Replace categories (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<String>,

        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Mark an item as done
    Done {
        /// Item id
        id: String,
    },

    /// Mark a done item as open again
    Undone {
        /// Item id
        id: String,
    },

    /// List all categories in use
    Categories,
}
