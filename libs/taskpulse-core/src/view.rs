//! View-layer filtering, sorting and search
//!
//! A pure pass over the fetched task list: the client holds the full
//! set in memory and recomputes the displayed slice from the current
//! selections on every render. Nothing here touches stored state.

use crate::models::{Priority, Task, TaskStatus};
use std::cmp::Ordering;

/// Sort orders for the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Due date ascending; tasks without one sort last
    DueDate,
    /// Priority descending (high first)
    Priority,
    /// Title, case-insensitive
    Alphabetical,
    /// Creation time descending (newest first)
    #[default]
    Created,
    /// Stored `order` ascending; used while drag-and-drop is active
    Manual,
}

/// Current filter/sort/search selections, passed explicitly from the
/// presentation layer
///
/// `None` filters mean "all"; an empty search term matches everything.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub search: String,
    pub sort_by: SortBy,
}

impl TaskQuery {
    /// True when the task passes every active filter
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &task.category != category {
                return false;
            }
        }
        matches_search(task, &self.search)
    }
}

fn matches_search(task: &Task, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    task.title.to_lowercase().contains(&term)
        || task.description.to_lowercase().contains(&term)
        || task.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

fn compare(a: &Task, b: &Task, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::DueDate => match (a.due_date, b.due_date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
        },
        SortBy::Priority => b.priority.weight().cmp(&a.priority.weight()),
        SortBy::Alphabetical => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortBy::Created => b.created_at.cmp(&a.created_at),
        SortBy::Manual => a.order.cmp(&b.order),
    }
}

/// Produce the displayed task list: filter, then stable-sort
#[must_use]
pub fn apply<'a>(tasks: &'a [Task], query: &TaskQuery) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|t| query.matches(t)).collect();
    visible.sort_by(|a, b| compare(a, b, query.sort_by));
    visible
}

/// Distinct categories across the task list, in first-seen order
#[must_use]
pub fn unique_categories(tasks: &[Task]) -> Vec<String> {
    let mut seen = Vec::new();
    for task in tasks {
        if !task.category.is_empty() && !seen.contains(&task.category) {
            seen.push(task.category.clone());
        }
    }
    seen
}
