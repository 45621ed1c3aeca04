//! Constants shared across taskpulse crates

/// Category assigned to tasks created without one
pub const DEFAULT_CATEGORY: &str = "general";

/// Length of a pomodoro work session, in minutes
pub const WORK_SESSION_MINUTES: u32 = 25;

/// Length of a short break, in minutes
pub const SHORT_BREAK_MINUTES: u32 = 5;

/// Length of a long break, in minutes
pub const LONG_BREAK_MINUTES: u32 = 15;

/// Number of completed work sessions before a long break
pub const SESSIONS_PER_LONG_BREAK: u32 = 4;

/// Default port for the API server
pub const DEFAULT_SERVER_PORT: u16 = 4000;

/// Default database filename
pub const DATABASE_FILENAME: &str = "taskpulse.db";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_category() {
        assert_eq!(DEFAULT_CATEGORY, "general");
    }

    #[test]
    fn test_pomodoro_durations() {
        assert_eq!(WORK_SESSION_MINUTES, 25);
        assert_eq!(SHORT_BREAK_MINUTES, 5);
        assert_eq!(LONG_BREAK_MINUTES, 15);
        assert!(LONG_BREAK_MINUTES > SHORT_BREAK_MINUTES);
    }

    #[test]
    fn test_sessions_per_long_break() {
        assert_eq!(SESSIONS_PER_LONG_BREAK, 4);
    }

    #[test]
    fn test_server_defaults() {
        assert_eq!(DEFAULT_SERVER_PORT, 4000);
        assert_eq!(DATABASE_FILENAME, "taskpulse.db");
    }
}
