//! SQLite-backed document store for tasks
//!
//! One row per task: indexed id/owner/created-at columns plus the full
//! task serialized as a JSON document. Every mutation is a
//! single-document read-modify-write; concurrent edits to the same
//! task are last-writer-wins with no conflict detection.
//!
//! All operations are owner-scoped and fail closed: a task under a
//! different owner is reported as not found.

use crate::{
    error::{Result, TaskpulseError},
    models::{CreateTaskRequest, Subtask, Task, UpdateOutcome, UpdateTaskRequest},
    ordering,
    pomodoro::{self, PomodoroRequest},
    progress::{derive_status, StatusConflict},
};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Row, SqlitePool,
};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id         TEXT PRIMARY KEY,
    owner_id   TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    doc        TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_owner_created ON tasks (owner_id, created_at DESC);";

/// Async task store over a SQLite connection pool
#[derive(Debug, Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    /// Open (or create) the database file and prepare the schema
    ///
    /// # Errors
    /// Returns a database error if the file cannot be opened or the
    /// schema cannot be created
    #[instrument]
    pub async fn connect(database_path: &Path) -> Result<Self> {
        info!("Opening task database at {}", database_path.display());

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
        sqlx::query("PRAGMA synchronous = NORMAL").execute(&pool).await?;

        Self::initialize(pool).await
    }

    /// Open an in-memory database, used by tests
    ///
    /// # Errors
    /// Returns a database error if the connection fails
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| TaskpulseError::Database(e.to_string()))?;

        // A single long-lived connection: each new in-memory connection
        // would otherwise see its own empty database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::initialize(pool).await
    }

    async fn initialize(pool: SqlitePool) -> Result<Self> {
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    /// Get the underlying connection pool
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create a task for the given owner
    ///
    /// Title and description are required non-empty after trimming;
    /// `template_subtasks` seed the checklist with order = index.
    ///
    /// # Errors
    /// Returns a validation error on missing required fields, or a
    /// database error if the insert fails
    #[instrument(skip(self, request))]
    pub async fn create_task(&self, owner: &str, request: CreateTaskRequest) -> Result<Task> {
        let request = trimmed(request)?;
        let task = Task::new(owner, request);

        sqlx::query("INSERT INTO tasks (id, owner_id, created_at, doc) VALUES (?, ?, ?, ?)")
            .bind(task.id.to_string())
            .bind(owner)
            .bind(task.created_at.timestamp_millis())
            .bind(serde_json::to_string(&task)?)
            .execute(&self.pool)
            .await?;

        debug!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// List the owner's tasks, newest first
    ///
    /// # Errors
    /// Returns a database error if the query fails
    #[instrument(skip(self))]
    pub async fn list_tasks(&self, owner: &str) -> Result<Vec<Task>> {
        let rows = sqlx::query(
            "SELECT doc FROM tasks WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let doc: String = row.try_get("doc")?;
                Ok(serde_json::from_str(&doc)?)
            })
            .collect()
    }

    /// Fetch one task by id, scoped to the owner
    ///
    /// # Errors
    /// Returns `TaskNotFound` for absent tasks and for tasks owned by
    /// someone else
    #[instrument(skip(self))]
    pub async fn get_task(&self, owner: &str, id: Uuid) -> Result<Task> {
        let row = sqlx::query("SELECT doc FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| TaskpulseError::task_not_found(id))?;

        let doc: String = row.try_get("doc")?;
        Ok(serde_json::from_str(&doc)?)
    }

    /// Apply a partial update, recomputing derived state
    ///
    /// A replacement subtask list gets dense positional orders and the
    /// derived status, persisted together in one write. An explicit
    /// status that disagrees with the derived one is overridden and
    /// reported in the outcome's `status_conflict`.
    ///
    /// # Errors
    /// Returns `TaskNotFound`, a validation error for emptied required
    /// fields, or a database error
    #[instrument(skip(self, request))]
    pub async fn update_task(
        &self,
        owner: &str,
        id: Uuid,
        request: UpdateTaskRequest,
    ) -> Result<UpdateOutcome> {
        let mut task = self.get_task(owner, id).await?;
        let status_conflict = apply_update(&mut task, request)?;

        if let Some(conflict) = &status_conflict {
            warn!(
                task_id = %id,
                requested = ?conflict.requested,
                derived = ?conflict.derived,
                "explicit status overridden by subtask-derived status"
            );
        }

        self.save(&task).await?;
        Ok(UpdateOutcome {
            task,
            status_conflict,
        })
    }

    /// Delete a task; irreversible
    ///
    /// # Errors
    /// Returns `TaskNotFound` if no owned task matches
    #[instrument(skip(self))]
    pub async fn delete_task(&self, owner: &str, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskpulseError::task_not_found(id));
        }
        debug!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Append one subtask; its order is the list length before append
    ///
    /// # Errors
    /// Returns a validation error for a blank title, or `TaskNotFound`
    #[instrument(skip(self))]
    pub async fn add_subtask(&self, owner: &str, id: Uuid, title: &str) -> Result<Task> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskpulseError::validation("subtask title is required"));
        }

        let mut task = self.get_task(owner, id).await?;
        ordering::append_with_order(&mut task.subtasks, Subtask::new(title, 0));
        task.status = derive_status(&task.subtasks, task.status);
        task.updated_at = Utc::now();

        self.save(&task).await?;
        Ok(task)
    }

    /// Replace the entire subtask list (toggle, delete, reorder, bulk
    /// edit all arrive through here)
    ///
    /// # Errors
    /// Returns `TaskNotFound` or a database error
    #[instrument(skip(self, subtasks))]
    pub async fn replace_subtasks(
        &self,
        owner: &str,
        id: Uuid,
        subtasks: Vec<Subtask>,
    ) -> Result<Task> {
        let outcome = self
            .update_task(
                owner,
                id,
                UpdateTaskRequest {
                    subtasks: Some(subtasks),
                    ..UpdateTaskRequest::default()
                },
            )
            .await?;
        Ok(outcome.task)
    }

    /// Assign order = position for the given id sequence, atomically
    ///
    /// One transaction covers the whole batch; an id that is missing
    /// or not owned by the caller rolls everything back.
    ///
    /// # Errors
    /// Returns `TaskNotFound` for any unowned id, or a database error
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn reorder_tasks(&self, owner: &str, ids: &[Uuid]) -> Result<Vec<Task>> {
        let mut tx = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(ids.len());

        for (position, id) in ids.iter().enumerate() {
            let row = sqlx::query("SELECT doc FROM tasks WHERE id = ? AND owner_id = ?")
                .bind(id.to_string())
                .bind(owner)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| TaskpulseError::task_not_found(id))?;

            let doc: String = row.try_get("doc")?;
            let mut task: Task = serde_json::from_str(&doc)?;
            task.order = position as u32;
            task.updated_at = Utc::now();

            sqlx::query("UPDATE tasks SET doc = ? WHERE id = ? AND owner_id = ?")
                .bind(serde_json::to_string(&task)?)
                .bind(id.to_string())
                .bind(owner)
                .execute(&mut *tx)
                .await?;
            updated.push(task);
        }

        tx.commit().await?;
        debug!("reordered {} tasks", updated.len());
        Ok(updated)
    }

    /// Record a completed work session against a task (and optionally
    /// one of its subtasks)
    ///
    /// # Errors
    /// Returns `TaskNotFound`, `SubtaskNotFound`, or a database error
    #[instrument(skip(self, request))]
    pub async fn record_pomodoro(
        &self,
        owner: &str,
        id: Uuid,
        request: &PomodoroRequest,
    ) -> Result<Task> {
        let mut task = self.get_task(owner, id).await?;
        pomodoro::apply_session(&mut task, request)?;
        task.updated_at = Utc::now();

        self.save(&task).await?;
        Ok(task)
    }

    async fn save(&self, task: &Task) -> Result<()> {
        let result = sqlx::query("UPDATE tasks SET doc = ? WHERE id = ? AND owner_id = ?")
            .bind(serde_json::to_string(task)?)
            .bind(task.id.to_string())
            .bind(&task.owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskpulseError::task_not_found(task.id));
        }
        Ok(())
    }
}

fn trimmed(mut request: CreateTaskRequest) -> Result<CreateTaskRequest> {
    request.title = request.title.trim().to_string();
    request.description = request.description.trim().to_string();
    request.notes = request.notes.trim().to_string();
    request.tags = request
        .tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    if request.title.is_empty() {
        return Err(TaskpulseError::validation("title is required"));
    }
    if request.description.is_empty() {
        return Err(TaskpulseError::validation("description is required"));
    }
    Ok(request)
}

/// Apply a partial update in place; returns the status conflict, if
/// the explicit status lost to the derived one
fn apply_update(task: &mut Task, request: UpdateTaskRequest) -> Result<Option<StatusConflict>> {
    if let Some(title) = request.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(TaskpulseError::validation("title is required"));
        }
        task.title = title.to_string();
    }
    if let Some(description) = request.description {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskpulseError::validation("description is required"));
        }
        task.description = description.to_string();
    }
    if let Some(priority) = request.priority {
        task.priority = priority;
    }
    if let Some(category) = request.category {
        task.category = category;
    }
    if let Some(tags) = request.tags {
        task.tags = tags;
    }
    if let Some(difficulty) = request.difficulty {
        task.difficulty = difficulty;
    }
    if let Some(notes) = request.notes {
        task.notes = notes.trim().to_string();
    }
    if let Some(due_date) = request.due_date {
        task.due_date = due_date;
    }
    if let Some(is_recurring) = request.is_recurring {
        task.is_recurring = is_recurring;
        if !is_recurring {
            task.recurring_pattern = None;
        }
    }
    if let Some(pattern) = request.recurring_pattern {
        if task.is_recurring {
            task.recurring_pattern = Some(pattern);
        }
    }
    if let Some(estimated_time) = request.estimated_time {
        task.estimated_time = estimated_time;
    }
    if let Some(order) = request.order {
        task.order = order;
    }

    if let Some(mut subtasks) = request.subtasks {
        for subtask in &mut subtasks {
            subtask.title = subtask.title.trim().to_string();
        }
        ordering::reindex(&mut subtasks);
        task.subtasks = subtasks;
    }

    // Status: derived whenever subtasks exist, explicit otherwise. An
    // explicit value that loses to the derived one is reported, not
    // silently dropped.
    let mut status_conflict = None;
    if task.subtasks.is_empty() {
        if let Some(status) = request.status {
            task.status = status;
        }
    } else {
        let derived = derive_status(&task.subtasks, task.status);
        if let Some(requested) = request.status {
            if requested != derived {
                status_conflict = Some(StatusConflict { requested, derived });
            }
        }
        task.status = derived;
    }

    task.updated_at = Utc::now();
    Ok(status_conflict)
}
