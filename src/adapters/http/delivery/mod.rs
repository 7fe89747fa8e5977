//! HTTP adapter for the contact delivery worker.

pub mod handlers;
pub mod routes;

pub use handlers::{DeliveryApiError, DeliveryAppState};
pub use routes::delivery_router;
