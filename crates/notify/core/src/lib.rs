//! Notification Core Types
//!
//! Request, record and outcome types shared by the ingestion layers.

mod error;
mod outcome;
mod record;
mod request;

pub use error::*;
pub use outcome::*;
pub use record::*;
pub use request::*;
