//! HTTP adapter for local serving
//!
//! Turns plain HTTP requests into function events and runs them through the
//! same handler the cloud function uses.

pub mod app;
pub mod routes;

pub use app::{create_app, create_app_with_keys};
