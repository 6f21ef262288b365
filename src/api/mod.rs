//! API Module
//!
//! HTTP handlers and routing for the chat REST API.
//!
//! # Endpoints
//! - `/users`, `/users/:id`, `/users/:id/sessions`
//! - `/sessions/:id`, `/sessions/:id/messages`
//! - `GET /stats` - Per-cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
