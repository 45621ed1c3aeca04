//! Data models for taskpulse entities
//!
//! Wire names are camelCase and enum values are kebab-case strings,
//! matching what the web client sends and stores.

use crate::ordering::Orderable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskpulse_common::DEFAULT_CATEGORY;
use uuid::Uuid;

/// Task status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Task priority enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight: high before medium before low
    #[must_use]
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// Task difficulty enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Recurrence pattern, stored but never expanded into new tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurringPattern {
    Daily,
    Weekly,
    Monthly,
}

/// Checklist item embedded in a task
///
/// Identity is unique within the parent task only; `order` is the dense
/// zero-based position within the parent's list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub pomodoro_count: u32,
    /// Accumulated focus time, in minutes
    #[serde(default)]
    pub time_spent: u32,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Subtask {
    /// Create a new incomplete subtask at the given position
    #[must_use]
    pub fn new(title: impl Into<String>, order: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            order,
            pomodoro_count: 0,
            time_spent: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Orderable for Subtask {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// Main task entity, owned by exactly one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// Stable identifier supplied by the auth provider's session
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub notes: String,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_pattern: Option<RecurringPattern>,
    /// Estimated minutes to complete; stored, currently unused
    #[serde(default)]
    pub estimated_time: u32,
    /// Position in the owner's manually ordered list
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub pomodoro_count: u32,
    /// Accumulated focus time, in minutes
    #[serde(default)]
    pub time_spent: u32,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a new task from a creation request
    ///
    /// Fields are assumed to be validated and trimmed already; the
    /// store's `create_task` is the validating entry point.
    #[must_use]
    pub fn new(owner_id: impl Into<String>, request: CreateTaskRequest) -> Self {
        let now = Utc::now();
        let subtasks = request
            .template_subtasks
            .iter()
            .enumerate()
            .map(|(index, title)| Subtask::new(title.trim(), index as u32))
            .collect();

        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title: request.title,
            description: request.description,
            status: TaskStatus::Pending,
            priority: request.priority,
            category: request.category,
            tags: request.tags,
            difficulty: request.difficulty,
            notes: request.notes,
            due_date: request.due_date,
            is_recurring: request.is_recurring,
            // Pattern only makes sense on recurring tasks
            recurring_pattern: if request.is_recurring {
                request.recurring_pattern
            } else {
                None
            },
            estimated_time: request.estimated_time,
            order: request.order,
            pomodoro_count: 0,
            time_spent: 0,
            subtasks,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived completion percentage, never stored
    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        crate::progress::completion_percentage(&self.subtasks, self.status)
    }
}

impl Orderable for Task {
    fn order(&self) -> u32 {
        self.order
    }

    fn set_order(&mut self, order: u32) {
        self.order = order;
    }
}

/// A task joined with its derived completion percentage, as returned
/// to API clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithProgress {
    #[serde(flatten)]
    pub task: Task,
    pub completion_percentage: u8,
}

impl From<Task> for TaskWithProgress {
    fn from(task: Task) -> Self {
        let completion_percentage = task.completion_percentage();
        Self {
            task,
            completion_percentage,
        }
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Deserialize a field so that an explicit `null` comes out as
/// `Some(None)` while an absent field stays `None`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Task creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_pattern: Option<RecurringPattern>,
    #[serde(default)]
    pub estimated_time: u32,
    #[serde(default)]
    pub order: u32,
    /// Subtask titles to seed the new task with, in display order
    #[serde(default)]
    pub template_subtasks: Vec<String>,
}

impl CreateTaskRequest {
    /// Minimal request with every optional field at its default
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority: Priority::default(),
            category: default_category(),
            tags: Vec::new(),
            difficulty: Difficulty::default(),
            notes: String::new(),
            due_date: None,
            is_recurring: false,
            recurring_pattern: None,
            estimated_time: 0,
            order: 0,
            template_subtasks: Vec::new(),
        }
    }
}

/// Partial task update request; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub difficulty: Option<Difficulty>,
    pub notes: Option<String>,
    /// `Some(None)` (an explicit `null`) clears the due date; an
    /// absent field leaves it untouched
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub is_recurring: Option<bool>,
    pub recurring_pattern: Option<RecurringPattern>,
    pub estimated_time: Option<u32>,
    pub order: Option<u32>,
    /// Full replacement of the subtask list (toggle, delete, reorder)
    pub subtasks: Option<Vec<Subtask>>,
}

/// Result of an update: the persisted task, plus a warning when an
/// explicit status was overridden by the subtask-derived one
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub task: Task,
    pub status_conflict: Option<crate::progress::StatusConflict>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_serialization() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_task_status_deserialization() {
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
    }

    #[test]
    fn test_priority_defaults_and_weights() {
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Priority::High.weight(), 3);
        assert_eq!(Priority::Medium.weight(), 2);
        assert_eq!(Priority::Low.weight(), 1);
    }

    #[test]
    fn test_priority_serialization() {
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_recurring_pattern_serialization() {
        assert_eq!(
            serde_json::to_string(&RecurringPattern::Weekly).unwrap(),
            "\"weekly\""
        );
    }

    #[test]
    fn test_subtask_new() {
        let subtask = Subtask::new("Step 1", 3);

        assert_eq!(subtask.title, "Step 1");
        assert!(!subtask.completed);
        assert_eq!(subtask.order, 3);
        assert_eq!(subtask.pomodoro_count, 0);
        assert_eq!(subtask.time_spent, 0);
    }

    #[test]
    fn test_subtask_deserialization_fills_defaults() {
        // A brand-new subtask from the client carries no id or timestamps
        let subtask: Subtask = serde_json::from_str(r#"{"title": "New step"}"#).unwrap();

        assert_eq!(subtask.title, "New step");
        assert!(!subtask.completed);
        assert_eq!(subtask.order, 0);
    }

    #[test]
    fn test_task_new_defaults() {
        let task = Task::new("user-1", CreateTaskRequest::new("Buy milk", "From store"));

        assert_eq!(task.owner_id, "user-1");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, "general");
        assert_eq!(task.difficulty, Difficulty::Medium);
        assert!(task.subtasks.is_empty());
        assert_eq!(task.completion_percentage(), 0);
        assert_eq!(task.pomodoro_count, 0);
        assert_eq!(task.time_spent, 0);
    }

    #[test]
    fn test_task_new_seeds_template_subtasks() {
        let mut request = CreateTaskRequest::new("Ship release", "Cut and publish");
        request.template_subtasks = vec!["Tag".to_string(), "Build".to_string()];

        let task = Task::new("user-1", request);

        assert_eq!(task.subtasks.len(), 2);
        assert_eq!(task.subtasks[0].order, 0);
        assert_eq!(task.subtasks[1].order, 1);
        assert!(task.subtasks.iter().all(|s| !s.completed));
    }

    #[test]
    fn test_task_new_drops_pattern_when_not_recurring() {
        let mut request = CreateTaskRequest::new("Water plants", "Every few days");
        request.recurring_pattern = Some(RecurringPattern::Daily);
        request.is_recurring = false;

        let task = Task::new("user-1", request);
        assert_eq!(task.recurring_pattern, None);
    }

    #[test]
    fn test_task_serialization_round_trip() {
        let task = Task::new("user-1", CreateTaskRequest::new("Test", "Round trip"));
        let serialized = serde_json::to_string(&task).unwrap();
        let deserialized: Task = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.id, task.id);
        assert_eq!(deserialized.title, task.title);
        assert_eq!(deserialized.status, task.status);
    }

    #[test]
    fn test_task_wire_names_are_camel_case() {
        let task = Task::new("user-1", CreateTaskRequest::new("Test", "Wire format"));
        let value = serde_json::to_value(&task).unwrap();

        assert!(value.get("ownerId").is_some());
        assert!(value.get("dueDate").is_some());
        assert!(value.get("pomodoroCount").is_some());
        assert!(value.get("owner_id").is_none());
    }

    #[test]
    fn test_task_with_progress_flattens() {
        let mut request = CreateTaskRequest::new("Test", "Progress view");
        request.template_subtasks = vec!["a".to_string(), "b".to_string()];
        let mut task = Task::new("user-1", request);
        task.subtasks[0].completed = true;

        let value = serde_json::to_value(TaskWithProgress::from(task)).unwrap();

        assert_eq!(value["completionPercentage"], 50);
        assert_eq!(value["title"], "Test");
    }

    #[test]
    fn test_create_request_deserialization_defaults() {
        let request: CreateTaskRequest =
            serde_json::from_str(r#"{"title": "T", "description": "D"}"#).unwrap();

        assert_eq!(request.priority, Priority::Medium);
        assert_eq!(request.category, "general");
        assert!(request.tags.is_empty());
        assert!(request.template_subtasks.is_empty());
    }

    #[test]
    fn test_update_request_partial_deserialization() {
        let request: UpdateTaskRequest =
            serde_json::from_str(r#"{"status": "completed"}"#).unwrap();

        assert_eq!(request.status, Some(TaskStatus::Completed));
        assert!(request.title.is_none());
        assert!(request.subtasks.is_none());
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_null_due_date() {
        let absent: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.due_date, None);

        let cleared: UpdateTaskRequest =
            serde_json::from_str(r#"{"dueDate": null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateTaskRequest =
            serde_json::from_str(r#"{"dueDate": "2026-01-15T10:00:00Z"}"#).unwrap();
        assert!(matches!(set.due_date, Some(Some(_))));
    }
}
