//! Task subcommands: add, list, complete, incomplete.
//!
//! Handlers write user-facing output to the given writers and return the
//! process exit code. Validation and not-found errors are printed as
//! `Error: ...` and yield exit code 1; persistence errors propagate.

use crate::error::StoreError;
use crate::format::{OutputFormat, format_tasks};
use crate::store::TaskStore;
use anyhow::Result;
use clap::Args;
use std::io::Write;

pub const EXIT_OK: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Arguments for `todo add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Task title (required)
    pub title: String,

    /// Task description
    #[arg(long, default_value = "")]
    pub description: String,
}

/// Arguments for `todo list`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Arguments for `todo complete` and `todo incomplete`
#[derive(Args, Debug)]
pub struct TaskIdArgs {
    /// Task ID
    pub id: u64,
}

/// Print caller-facing errors; pass persistence errors up.
fn report(err: StoreError, stderr: &mut impl Write) -> Result<u8> {
    if err.is_caller_error() {
        writeln!(stderr, "Error: {}", err)?;
        Ok(EXIT_ERROR)
    } else {
        Err(err.into())
    }
}

pub fn run_add(
    store: &mut TaskStore,
    args: &AddArgs,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<u8> {
    match store.add(&args.title, &args.description) {
        Ok(task) => {
            writeln!(stdout, "Task #{} added: {}", task.id, task.title)?;
            Ok(EXIT_OK)
        }
        Err(e) => report(e, stderr),
    }
}

pub fn run_list(store: &TaskStore, args: &ListArgs, stdout: &mut impl Write) -> Result<u8> {
    let tasks = store.list();
    write!(stdout, "{}", format_tasks(&tasks, args.format)?)?;
    Ok(EXIT_OK)
}

pub fn run_complete(
    store: &mut TaskStore,
    args: &TaskIdArgs,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<u8> {
    match store.complete(args.id) {
        Ok(task) => {
            writeln!(stdout, "Task #{} marked as completed: {}", task.id, task.title)?;
            Ok(EXIT_OK)
        }
        Err(e) => report(e, stderr),
    }
}

pub fn run_incomplete(
    store: &mut TaskStore,
    args: &TaskIdArgs,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> Result<u8> {
    match store.incomplete(args.id) {
        Ok(task) => {
            writeln!(stdout, "Task #{} marked as pending: {}", task.id, task.title)?;
            Ok(EXIT_OK)
        }
        Err(e) => report(e, stderr),
    }
}
