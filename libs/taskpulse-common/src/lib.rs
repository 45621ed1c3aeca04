//! Taskpulse Common - Shared constants and utilities
//!
//! This crate provides the constants and small helpers shared by the
//! taskpulse core library and the API server.
//!
//! # Examples
//!
//! ```
//! use taskpulse_common::{DEFAULT_CATEGORY, WORK_SESSION_MINUTES, format_minutes};
//!
//! assert_eq!(DEFAULT_CATEGORY, "general");
//! assert_eq!(WORK_SESSION_MINUTES, 25);
//! assert_eq!(format_minutes(95), "1h 35m");
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;
