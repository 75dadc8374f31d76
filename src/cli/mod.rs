//! CLI command definitions for the `todo` binary.
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod tasks;

use clap::{Args, Parser, Subcommand};
use tasks::{AddArgs, ListArgs, TaskIdArgs};

/// Todo list manager: JSON-backed task CLI and SQLite-backed REST API
#[derive(Parser, Debug)]
#[command(name = "todo", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Path to the JSON task file (overrides config)
    #[arg(short, long, global = true)]
    pub tasks_file: Option<String>,

    /// Path to the SQLite database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    Add(AddArgs),

    /// List all tasks
    List(ListArgs),

    /// Mark a task as completed
    Complete(TaskIdArgs),

    /// Mark a task as incomplete
    Incomplete(TaskIdArgs),

    /// Run the REST API server
    Serve(ServeArgs),
}

/// Arguments for `todo serve`
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}
