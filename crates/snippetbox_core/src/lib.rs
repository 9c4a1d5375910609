//! Core domain library for SnippetBox (config, storage, models, access rules).

/// Guard functions shared by mutating operations.
pub mod access;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer and transactions.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Data models for API requests and persistence.
pub mod models;
/// Access-controlled snippet, language, and tag operations.
pub mod ops;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
pub use models::UserId;
