//! Taskpulse Core - Task models, derived state and storage
//!
//! This library implements the task-tracking domain behind the taskpulse
//! API server: owner-scoped task documents with embedded subtasks,
//! derived completion state, dense display ordering, and pomodoro
//! accumulation, persisted through an async SQLite-backed document
//! store.
//!
//! # Quick Start
//!
//! ```no_run
//! use taskpulse_core::{CreateTaskRequest, TaskStore, TaskpulseError};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), TaskpulseError> {
//! let store = TaskStore::connect(Path::new("taskpulse.db")).await?;
//!
//! let task = store
//!     .create_task(
//!         "user-1",
//!         CreateTaskRequest::new("Buy milk", "From the store on 5th"),
//!     )
//!     .await?;
//! println!("created task {}", task.id);
//!
//! let tasks = store.list_tasks("user-1").await?;
//! println!("{} tasks", tasks.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Features
//!
//! - `test-utils`: Enable test utilities (for testing only)

pub mod config;
pub mod error;
pub mod models;
pub mod ordering;
pub mod pomodoro;
pub mod progress;
pub mod store;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::TaskpulseConfig;
pub use error::{Result, TaskpulseError};
pub use models::{
    CreateTaskRequest, Difficulty, Priority, RecurringPattern, Subtask, Task, TaskStatus,
    TaskWithProgress, UpdateOutcome, UpdateTaskRequest,
};
pub use ordering::{append_with_order, reindex, reindex_after_delete, reorder, Orderable};
pub use pomodoro::{PomodoroRequest, SessionKind};
pub use progress::{completion_percentage, derive_status, StatusConflict};
pub use store::TaskStore;
pub use view::{SortBy, TaskQuery};

/// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
