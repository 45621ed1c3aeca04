//! Taskpulse Server - HTTP API over the taskpulse core library
//!
//! Exposes the task operations as an axum router with bearer-token
//! session authentication. Route handlers stay thin: extract the
//! session, call the store, shape the response.

pub mod api;
pub mod auth;
pub mod health;

pub use api::{router, ApiError, AppState};
pub use auth::{issue_token, Session};
