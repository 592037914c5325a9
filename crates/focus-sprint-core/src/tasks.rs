//! Ordered task list.
//!
//! Tasks have no ids; a task is its position. Display order and persisted
//! order are the same sequence. Every method either mutates and reports it, or
//! leaves the list untouched.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    /// Build from loaded records, dropping entries with blank text.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks
                .into_iter()
                .filter(|t| !t.text.trim().is_empty())
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Tasks to show, with their positions. Hiding completed tasks is a view
    /// concern and never touches the list.
    pub fn visible(&self, hide_completed: bool) -> Vec<(usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| !(hide_completed && t.completed))
            .collect()
    }

    /// Append a task. Text is trimmed; blank text is rejected.
    pub fn create(&mut self, text: &str) -> Result<usize, ValidationError> {
        let text = clean_text(text)?;
        self.tasks.push(Task::new(text));
        Ok(self.tasks.len() - 1)
    }

    pub fn edit(&mut self, index: usize, text: &str) -> Result<(), ValidationError> {
        let text = clean_text(text)?;
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, len))?;
        task.text = text;
        Ok(())
    }

    /// Flip the completed flag; returns the new value.
    pub fn toggle_complete(&mut self, index: usize) -> Result<bool, ValidationError> {
        let len = self.tasks.len();
        let task = self
            .tasks
            .get_mut(index)
            .ok_or_else(|| out_of_bounds(index, len))?;
        task.completed = !task.completed;
        Ok(task.completed)
    }

    pub fn delete(&mut self, index: usize) -> Result<Task, ValidationError> {
        if index >= self.tasks.len() {
            return Err(out_of_bounds(index, self.tasks.len()));
        }
        Ok(self.tasks.remove(index))
    }

    /// Remove every task; returns how many were removed.
    pub fn delete_all(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }

    /// Remove completed tasks only, keeping the order of the rest.
    pub fn delete_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    /// Move one task to `to`, shifting the tasks in between.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ValidationError> {
        let len = self.tasks.len();
        if from >= len {
            return Err(out_of_bounds(from, len));
        }
        if to >= len {
            return Err(out_of_bounds(to, len));
        }
        let task = self.tasks.remove(from);
        self.tasks.insert(to, task);
        Ok(())
    }
}

fn clean_text(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        Err(ValidationError::EmptyText)
    } else {
        Ok(text.to_string())
    }
}

fn out_of_bounds(index: usize, len: usize) -> ValidationError {
    ValidationError::OutOfBounds {
        collection: "tasks".into(),
        index,
        len,
    }
}
