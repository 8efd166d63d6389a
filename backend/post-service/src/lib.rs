/// Post Service Library
///
/// Stores user-authored posts with a denormalized snapshot of the
/// author's public profile so reads never join across services. Creation
/// fans out synchronously to the image and user services; a background
/// consumer repairs stale snapshots when the authoritative profile
/// changes; feeds are cursor-paginated and soft-delete-aware.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `services`: creation orchestration and feed reading
/// - `db`: post store trait and PostgreSQL implementation
/// - `clients`: remote image/user service clients
/// - `consumers`: profile-change event consumer
/// - `middleware`: caller identity and ownership guard
/// - `error`: error types and HTTP mapping
/// - `config`: environment-driven configuration
pub mod clients;
pub mod config;
pub mod consumers;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
