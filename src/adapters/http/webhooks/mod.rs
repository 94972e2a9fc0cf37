//! Gateway webhook endpoint.

mod handlers;
mod routes;

pub use routes::routes;
