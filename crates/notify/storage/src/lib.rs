//! Notification Storage Layer
//!
//! Store traits for contexts, push notifications and device details, with
//! Diesel SQLite and in-memory implementations.

mod memory;
mod models;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;
pub use traits::*;

use diesel_migrations::{EmbeddedMigrations, embed_migrations};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Batch size stores declare when not configured otherwise.
pub const DEFAULT_BATCH_SIZE: i64 = 50;
