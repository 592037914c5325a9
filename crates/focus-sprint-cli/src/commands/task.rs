//! Task management commands for CLI.
//!
//! Tasks are addressed by their 1-based position in the list.

use clap::Subcommand;
use focus_sprint_core::ValidationError;
use serde::Serialize;

use crate::host::Host;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a new task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List {
        /// Leave completed tasks out
        #[arg(long)]
        hide_completed: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replace a task's text
    Edit {
        /// Task number
        number: usize,
        /// New text
        text: String,
    },
    /// Mark a task done, or not done
    Toggle {
        /// Task number
        number: usize,
    },
    /// Move a task to another position
    Move {
        /// Task number to move
        from: usize,
        /// Position to move it to
        to: usize,
    },
    /// Delete a task (asks first)
    Delete {
        /// Task number
        number: usize,
    },
    /// Delete every task (asks first)
    DeleteAll,
    /// Delete completed tasks (asks first)
    DeleteCompleted,
}

#[derive(Serialize)]
struct TaskRow<'a> {
    number: usize,
    text: &'a str,
    completed: bool,
}

/// 1-based number to list index.
fn index(number: usize, len: usize) -> Result<usize, ValidationError> {
    number.checked_sub(1).ok_or(ValidationError::OutOfBounds {
        collection: "tasks".into(),
        index: 0,
        len,
    })
}

pub async fn run(host: &Host, action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = host.controller()?;
    let len = controller.tasks().len();

    match action {
        TaskAction::Add { text } => {
            let i = controller.create_task(&text)?;
            println!("Task created: {}", i + 1);
        }
        TaskAction::List {
            hide_completed,
            json,
        } => {
            let rows: Vec<TaskRow<'_>> = controller
                .tasks()
                .visible(hide_completed)
                .into_iter()
                .map(|(i, t)| TaskRow {
                    number: i + 1,
                    text: &t.text,
                    completed: t.completed,
                })
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No tasks.");
            } else {
                for row in rows {
                    let mark = if row.completed { "x" } else { " " };
                    println!("{:>3}. [{mark}] {}", row.number, row.text);
                }
            }
        }
        TaskAction::Edit { number, text } => {
            controller.edit_task(index(number, len)?, &text)?;
            println!("Task updated: {number}");
        }
        TaskAction::Toggle { number } => {
            let done = controller.toggle_task(index(number, len)?)?;
            let state = if done { "completed" } else { "open" };
            println!("Task {number}: {state}");
        }
        TaskAction::Move { from, to } => {
            controller.reorder_tasks(index(from, len)?, index(to, len)?)?;
            println!("Task moved: {from} -> {to}");
        }
        TaskAction::Delete { number } => match controller.delete_task(index(number, len)?).await? {
            Some(task) => println!("Task deleted: {}", task.text),
            None => println!("Cancelled."),
        },
        TaskAction::DeleteAll => {
            let removed = controller.delete_all_tasks().await;
            println!("Deleted {removed} task(s).");
        }
        TaskAction::DeleteCompleted => {
            let removed = controller.delete_completed_tasks().await;
            println!("Deleted {removed} task(s).");
        }
    }
    Ok(())
}
