pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod frontdesk;
pub mod housekeeping;
pub mod intent;
pub mod reports;
pub mod session;
pub mod telemetry;
