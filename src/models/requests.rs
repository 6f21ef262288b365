//! Request DTOs for the chat API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

use crate::store::Role;

const MAX_NAME_LEN: usize = 128;
const MAX_TITLE_LEN: usize = 256;
const MAX_CONTENT_LEN: usize = 32 * 1024;

fn check_text(field: &str, value: &str, max: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field} cannot be empty"));
    }
    if value.chars().count() > max {
        return Some(format!("{field} exceeds maximum length of {max} characters"));
    }
    None
}

fn check_email(email: &str) -> Option<String> {
    check_text("email", email, MAX_NAME_LEN).or_else(|| {
        (!email.contains('@')).then(|| "email must contain '@'".to_string())
    })
}

/// Request body for POST /users
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        check_text("name", &self.name, MAX_NAME_LEN).or_else(|| check_email(&self.email))
    }
}

/// Request body for PATCH /users/:id. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.is_none() && self.email.is_none() {
            return Some("nothing to update".to_string());
        }
        self.name
            .as_deref()
            .and_then(|name| check_text("name", name, MAX_NAME_LEN))
            .or_else(|| self.email.as_deref().and_then(check_email))
    }
}

/// Request body for POST /users/:id/sessions
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    pub title: String,
}

impl CreateSessionRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("title", &self.title, MAX_TITLE_LEN)
    }
}

/// Request body for PATCH /sessions/:id
#[derive(Debug, Clone, Deserialize)]
pub struct RenameSessionRequest {
    pub title: String,
}

impl RenameSessionRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("title", &self.title, MAX_TITLE_LEN)
    }
}

/// Request body for POST /sessions/:id/messages
#[derive(Debug, Clone, Deserialize)]
pub struct AddMessageRequest {
    #[serde(default = "default_role")]
    pub role: Role,
    pub content: String,
}

fn default_role() -> Role {
    Role::User
}

impl AddMessageRequest {
    pub fn validate(&self) -> Option<String> {
        check_text("content", &self.content, MAX_CONTENT_LEN)
    }
}

/// Query string for the list routes.
///
/// `search` is only honoured by the session listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}
