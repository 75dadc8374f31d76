//! Output formatting for task lists: table, markdown and JSON.

use crate::types::Task;
use clap::ValueEnum;

/// Printed instead of an empty table.
pub const NO_TASKS_FOUND: &str = "No tasks found.";

/// Widest title shown in the table view.
const TITLE_WIDTH: usize = 30;

/// Output format for `todo list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width columns (default)
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
    /// Markdown checklist
    Markdown,
}

/// Render tasks in the requested format. The output ends with a newline.
pub fn format_tasks(tasks: &[Task], format: OutputFormat) -> serde_json::Result<String> {
    Ok(match format {
        OutputFormat::Table => format_tasks_table(tasks),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(tasks)?;
            json.push('\n');
            json
        }
        OutputFormat::Markdown => format_tasks_markdown(tasks),
    })
}

/// Fixed-width table with long titles cut at 30 characters.
pub fn format_tasks_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return format!("{}\n", NO_TASKS_FOUND);
    }

    let mut out = String::new();
    out.push_str(&format!("{:<5} {:<30} {:<15}\n", "ID", "Title", "Status"));
    out.push_str(&"-".repeat(50));
    out.push('\n');

    for task in tasks {
        let title: String = task.title.chars().take(TITLE_WIDTH).collect();
        out.push_str(&format!(
            "{:<5} {:<30} {:<15}\n",
            task.id,
            title,
            task.status_label()
        ));
    }

    out
}

/// Markdown checklist, one item per task.
pub fn format_tasks_markdown(tasks: &[Task]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Tasks ({})\n\n", tasks.len()));
    if tasks.is_empty() {
        md.push_str(&format!("_{}_\n", NO_TASKS_FOUND));
        return md;
    }

    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        md.push_str(&format!("- [{}] **#{}** {}\n", mark, task.id, task.title));
        if !task.description.is_empty() {
            md.push_str(&format!("  {}\n", task.description));
        }
    }

    md
}
