//! External service interactions
//!
//! This module contains services for talking to the workspace backend:
//! - REST client for connections, tables and icon guesses
//! - Session tokens for authenticated calls
//! - Icon suggestion with its deadline
//! - Table creation submission
//! - Background task execution

pub mod api;
pub mod icon_suggest;
pub mod session;
pub mod submit;
pub mod tasks;

#[cfg(test)]
pub mod testing;

pub use api::{HttpApi, WorkspaceApi};
pub use session::{SessionError, SessionProvider, StaticSession};
pub use tasks::{TaskMessage, TaskRunner};
