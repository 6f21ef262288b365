//! Request and Response models for the chat API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AddMessageRequest, CreateSessionRequest, CreateUserRequest, ListQuery, RenameSessionRequest,
    UpdateUserRequest,
};
pub use responses::{CacheStatsEntry, DeleteResponse, HealthResponse, StatsResponse};
