/// Admin credentials, session tokens, bearer parsing.
pub mod auth;
/// Runtime settings resolved from flags and environment.
pub mod config;
/// Database layer: open, migrate, post and reason CRUD.
pub mod db;
pub mod error;
/// Subscriber setup for `tracing`.
pub mod logging;
/// Data types: Post, Reason and their create/update payloads.
pub mod models;
/// Axum-based web server and router.
pub mod web;

pub use error::{Error, Result};
