//! Pomodoro session kinds and counter accumulation
//!
//! Only running totals are kept: completing a work session bumps the
//! owning task's `pomodoro_count` and `time_spent`, and the subtask's
//! when the session targeted one. No per-session history is stored.

use crate::error::{Result, TaskpulseError};
use crate::models::Task;
use serde::{Deserialize, Serialize};
use taskpulse_common::{
    LONG_BREAK_MINUTES, SESSIONS_PER_LONG_BREAK, SHORT_BREAK_MINUTES, WORK_SESSION_MINUTES,
};
use uuid::Uuid;

/// Kind of focus-timer session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionKind {
    /// Nominal duration of this session kind, in minutes
    #[must_use]
    pub fn duration_minutes(self) -> u32 {
        match self {
            SessionKind::Work => WORK_SESSION_MINUTES,
            SessionKind::ShortBreak => SHORT_BREAK_MINUTES,
            SessionKind::LongBreak => LONG_BREAK_MINUTES,
        }
    }

    /// The session that follows this one, given how many work sessions
    /// have completed so far (every fourth break is long)
    #[must_use]
    pub fn next(self, completed_work_sessions: u32) -> SessionKind {
        match self {
            SessionKind::Work => {
                if completed_work_sessions % SESSIONS_PER_LONG_BREAK == 0 {
                    SessionKind::LongBreak
                } else {
                    SessionKind::ShortBreak
                }
            }
            SessionKind::ShortBreak | SessionKind::LongBreak => SessionKind::Work,
        }
    }
}

fn default_minutes() -> u32 {
    WORK_SESSION_MINUTES
}

/// A completed work session to record against a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroRequest {
    /// Subtask the session ran against, when not the task itself
    #[serde(default)]
    pub subtask_id: Option<Uuid>,
    /// Elapsed minutes; defaults to a full work session
    #[serde(default = "default_minutes")]
    pub minutes: u32,
}

impl Default for PomodoroRequest {
    fn default() -> Self {
        Self {
            subtask_id: None,
            minutes: WORK_SESSION_MINUTES,
        }
    }
}

/// Apply a completed session to the task's running totals
///
/// The task counters always move; the named subtask's counters move as
/// well. Derived status is untouched; finishing a pomodoro does not
/// complete anything.
///
/// # Errors
/// Returns `SubtaskNotFound` if `subtask_id` names no subtask of this
/// task; the task is left unmodified in that case.
pub fn apply_session(task: &mut Task, request: &PomodoroRequest) -> Result<()> {
    if let Some(subtask_id) = request.subtask_id {
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(TaskpulseError::SubtaskNotFound {
                uuid: subtask_id.to_string(),
            })?;
        subtask.pomodoro_count = subtask.pomodoro_count.saturating_add(1);
        subtask.time_spent = subtask.time_spent.saturating_add(request.minutes);
        subtask.updated_at = chrono::Utc::now();
    }

    // Saturate rather than wrap; `minutes` comes straight from clients
    task.pomodoro_count = task.pomodoro_count.saturating_add(1);
    task.time_spent = task.time_spent.saturating_add(request.minutes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateTaskRequest, Subtask};

    #[test]
    fn test_session_durations() {
        assert_eq!(SessionKind::Work.duration_minutes(), 25);
        assert_eq!(SessionKind::ShortBreak.duration_minutes(), 5);
        assert_eq!(SessionKind::LongBreak.duration_minutes(), 15);
    }

    #[test]
    fn test_session_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&SessionKind::ShortBreak).unwrap(),
            "\"short-break\""
        );
        assert_eq!(serde_json::to_string(&SessionKind::Work).unwrap(), "\"work\"");
    }

    #[test]
    fn test_every_fourth_break_is_long() {
        assert_eq!(SessionKind::Work.next(1), SessionKind::ShortBreak);
        assert_eq!(SessionKind::Work.next(3), SessionKind::ShortBreak);
        assert_eq!(SessionKind::Work.next(4), SessionKind::LongBreak);
        assert_eq!(SessionKind::Work.next(8), SessionKind::LongBreak);
    }

    #[test]
    fn test_breaks_return_to_work() {
        assert_eq!(SessionKind::ShortBreak.next(2), SessionKind::Work);
        assert_eq!(SessionKind::LongBreak.next(4), SessionKind::Work);
    }

    #[test]
    fn test_apply_session_to_task_only() {
        let mut task = Task::new("user-1", CreateTaskRequest::new("Focus", "Deep work"));

        apply_session(&mut task, &PomodoroRequest::default()).unwrap();

        assert_eq!(task.pomodoro_count, 1);
        assert_eq!(task.time_spent, 25);
    }

    #[test]
    fn test_apply_session_accumulates() {
        let mut task = Task::new("user-1", CreateTaskRequest::new("Focus", "Deep work"));

        apply_session(&mut task, &PomodoroRequest::default()).unwrap();
        apply_session(
            &mut task,
            &PomodoroRequest {
                subtask_id: None,
                minutes: 10,
            },
        )
        .unwrap();

        assert_eq!(task.pomodoro_count, 2);
        assert_eq!(task.time_spent, 35);
    }

    #[test]
    fn test_apply_session_saturates_instead_of_overflowing() {
        let mut task = Task::new("user-1", CreateTaskRequest::new("Focus", "Deep work"));
        task.subtasks.push(Subtask::new("Step 1", 0));
        let subtask_id = task.subtasks[0].id;

        let huge = PomodoroRequest {
            subtask_id: Some(subtask_id),
            minutes: u32::MAX,
        };
        apply_session(&mut task, &huge).unwrap();
        apply_session(&mut task, &huge).unwrap();

        assert_eq!(task.time_spent, u32::MAX);
        assert_eq!(task.subtasks[0].time_spent, u32::MAX);
        assert_eq!(task.pomodoro_count, 2);
    }

    #[test]
    fn test_apply_session_to_subtask_moves_both_counters() {
        let mut task = Task::new("user-1", CreateTaskRequest::new("Focus", "Deep work"));
        task.subtasks.push(Subtask::new("Step 1", 0));
        let subtask_id = task.subtasks[0].id;

        apply_session(
            &mut task,
            &PomodoroRequest {
                subtask_id: Some(subtask_id),
                minutes: 25,
            },
        )
        .unwrap();

        assert_eq!(task.pomodoro_count, 1);
        assert_eq!(task.time_spent, 25);
        assert_eq!(task.subtasks[0].pomodoro_count, 1);
        assert_eq!(task.subtasks[0].time_spent, 25);
    }

    #[test]
    fn test_apply_session_unknown_subtask_leaves_task_untouched() {
        let mut task = Task::new("user-1", CreateTaskRequest::new("Focus", "Deep work"));

        let result = apply_session(
            &mut task,
            &PomodoroRequest {
                subtask_id: Some(Uuid::new_v4()),
                minutes: 25,
            },
        );

        assert!(matches!(
            result,
            Err(TaskpulseError::SubtaskNotFound { .. })
        ));
        assert_eq!(task.pomodoro_count, 0);
        assert_eq!(task.time_spent, 0);
    }

    #[test]
    fn test_pomodoro_request_deserialization_defaults() {
        let request: PomodoroRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.minutes, 25);
        assert!(request.subtask_id.is_none());
    }
}
