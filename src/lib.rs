//! In-memory user registry served over a small REST API.
//!
//! Users are `{id, name, age}` records held in a process-local store. Names
//! are unique on create; updates through upsert may reuse a name.
//!
//! # Routes
//!
//! ```text
//! GET    /users        list every user
//! GET    /users/{id}   fetch one user (404 when absent)
//! POST   /user         create a user (201, 400 on conflict)
//! PUT    /user/{id}    create or replace a user (200, 400)
//! DELETE /user/{id}    delete a user (204, 404)
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: The `UserStore` trait and its implementations
//! - [`api`]: HTTP handlers and router
//! - [`metrics`]: Prometheus counters and latency histograms
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
