//! Derived state for tasks: completion percentage and subtask-driven
//! status
//!
//! Both functions are pure and idempotent. `derive_status` must run
//! before every persist of a subtask mutation, and its result is
//! written in the same atomic update as the subtasks themselves.

use crate::models::{Subtask, TaskStatus};
use serde::Serialize;

/// Compute the completion percentage for a subtask list
///
/// With no subtasks the task is binary: 100 when completed, 0
/// otherwise. With subtasks it is the completed share rounded to the
/// nearest integer, half up.
#[must_use]
pub fn completion_percentage(subtasks: &[Subtask], status: TaskStatus) -> u8 {
    if subtasks.is_empty() {
        return if status == TaskStatus::Completed { 100 } else { 0 };
    }

    let total = subtasks.len() as u64;
    let completed = subtasks.iter().filter(|s| s.completed).count() as u64;

    // round(100 * completed / total) in integer arithmetic, half up
    ((200 * completed + total) / (2 * total)) as u8
}

/// Derive a task's status from its subtask list
///
/// An empty list leaves the status alone; the task is then driven
/// entirely by explicit toggles. A non-empty list fully determines the
/// status: all completed, some completed, or none completed.
#[must_use]
pub fn derive_status(subtasks: &[Subtask], current: TaskStatus) -> TaskStatus {
    if subtasks.is_empty() {
        return current;
    }

    let completed = subtasks.iter().filter(|s| s.completed).count();
    if completed == subtasks.len() {
        TaskStatus::Completed
    } else if completed > 0 {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    }
}

/// Warning raised when an explicitly requested status disagrees with
/// the subtask-derived one
///
/// The derived value always wins on the save path; the conflict is
/// reported to the caller instead of being silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusConflict {
    pub requested: TaskStatus,
    pub derived: TaskStatus,
}
