//! Notification HTTP Layer
//!
//! Axum handler for push notification submissions.

mod dto;
mod handlers;
mod middleware;

pub use dto::*;
pub use handlers::*;
pub use middleware::*;

use axum::Router;

/// Create the notification router.
pub fn notification_router<S>(service: S) -> Router
where
    S: notify_service::Ingest + Clone + 'static,
{
    use axum::routing::post;

    Router::new()
        .route("/v1/notifications", post(handlers::ingest_handler::<S>))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .with_state(service)
}
