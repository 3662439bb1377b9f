//! Client for the external hotel management REST API.

mod client;
mod error;
mod resources;
pub mod schema;

pub use client::ApiClient;
pub use error::ApiError;
