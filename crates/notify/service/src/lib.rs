//! Notification Service Layer
//!
//! Request validation, record preparation and batched persistence with
//! per-record fallback.

mod ingestor;
mod persister;
mod response;
mod traits;
mod transform;
mod validator;

#[cfg(test)]
mod testing;

pub use ingestor::Ingestor;
pub use persister::{BatchPersister, PreparedBatch, Window};
pub use response::*;
pub use traits::*;
pub use transform::*;
pub use validator::*;
