//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the currency service and the display
//! context.

pub(crate) mod handlers;
mod server;

pub use server::HttpServer;
