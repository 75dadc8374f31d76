//! Integration tests for the task subcommand handlers.
//!
//! Output is captured in byte buffers instead of the real terminal.

use tempfile::TempDir;
use todo_phases::cli::tasks::{
    AddArgs, EXIT_ERROR, EXIT_OK, ListArgs, TaskIdArgs, run_add, run_complete, run_incomplete,
    run_list,
};
use todo_phases::format::OutputFormat;
use todo_phases::store::TaskStore;

struct Output {
    code: u8,
    stdout: String,
    stderr: String,
}

fn setup() -> (TempDir, TaskStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = TaskStore::open(temp.path().join("tasks.json"));
    (temp, store)
}

fn add(store: &mut TaskStore, title: &str, description: &str) -> Output {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let args = AddArgs {
        title: title.to_string(),
        description: description.to_string(),
    };
    let code = run_add(store, &args, &mut out, &mut err).unwrap();
    Output {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

fn list(store: &TaskStore, format: OutputFormat) -> String {
    let mut out = Vec::new();
    let code = run_list(store, &ListArgs { format }, &mut out).unwrap();
    assert_eq!(code, EXIT_OK);
    String::from_utf8(out).unwrap()
}

fn complete(store: &mut TaskStore, id: u64) -> Output {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run_complete(store, &TaskIdArgs { id }, &mut out, &mut err).unwrap();
    Output {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

fn incomplete(store: &mut TaskStore, id: u64) -> Output {
    let (mut out, mut err) = (Vec::new(), Vec::new());
    let code = run_incomplete(store, &TaskIdArgs { id }, &mut out, &mut err).unwrap();
    Output {
        code,
        stdout: String::from_utf8(out).unwrap(),
        stderr: String::from_utf8(err).unwrap(),
    }
}

#[test]
fn add_prints_confirmation() {
    let (_temp, mut store) = setup();

    let output = add(&mut store, "Buy milk", "");
    assert_eq!(output.code, EXIT_OK);
    assert_eq!(output.stdout, "Task #1 added: Buy milk\n");
    assert!(output.stderr.is_empty());

    let output = add(&mut store, "  Walk dog ", "around the block");
    assert_eq!(output.stdout, "Task #2 added: Walk dog\n");
}

#[test]
fn add_blank_title_reports_error() {
    let (_temp, mut store) = setup();

    let output = add(&mut store, "   ", "");
    assert_eq!(output.code, EXIT_ERROR);
    assert!(output.stdout.is_empty());
    assert_eq!(output.stderr, "Error: Title is required\n");
    assert!(store.is_empty());
}

#[test]
fn list_empty_store() {
    let (_temp, store) = setup();
    assert_eq!(list(&store, OutputFormat::Table), "No tasks found.\n");
}

#[test]
fn list_table_shows_status() {
    let (_temp, mut store) = setup();
    add(&mut store, "Buy milk", "");
    add(&mut store, "Ship release", "");
    complete(&mut store, 2);

    let out = list(&store, OutputFormat::Table);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[2].starts_with("1     Buy milk"));
    assert!(lines[2].trim_end().ends_with("pending"));
    assert!(lines[3].trim_end().ends_with("completed"));
}

#[test]
fn list_json_parses_back() {
    let (_temp, mut store) = setup();
    add(&mut store, "Buy milk", "2 litres");

    let out = list(&store, OutputFormat::Json);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["id"], 1);
    assert_eq!(value[0]["description"], "2 litres");
}

#[test]
fn complete_and_incomplete_print_confirmation() {
    let (_temp, mut store) = setup();
    add(&mut store, "Buy milk", "");

    let output = complete(&mut store, 1);
    assert_eq!(output.code, EXIT_OK);
    assert_eq!(output.stdout, "Task #1 marked as completed: Buy milk\n");

    let output = incomplete(&mut store, 1);
    assert_eq!(output.code, EXIT_OK);
    assert_eq!(output.stdout, "Task #1 marked as pending: Buy milk\n");
}

#[test]
fn unknown_id_reports_not_found() {
    let (_temp, mut store) = setup();
    add(&mut store, "Buy milk", "");

    let output = complete(&mut store, 5);
    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(output.stderr, "Error: Task #5 not found\n");

    let output = incomplete(&mut store, 5);
    assert_eq!(output.code, EXIT_ERROR);
    assert_eq!(output.stderr, "Error: Task #5 not found\n");

    assert!(!store.get_by_id(1).unwrap().completed);
}

#[test]
fn save_failure_propagates() {
    let temp = TempDir::new().unwrap();
    // A directory where the file should be makes every write fail.
    let path = temp.path().join("tasks.json");
    std::fs::create_dir(&path).unwrap();
    let mut store = TaskStore::open(&path);

    let (mut out, mut err) = (Vec::new(), Vec::new());
    let args = AddArgs {
        title: "doomed".to_string(),
        description: String::new(),
    };
    assert!(run_add(&mut store, &args, &mut out, &mut err).is_err());
    assert!(store.is_empty());
}
