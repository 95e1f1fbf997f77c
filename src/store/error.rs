//! Error types for the relationship store

use thiserror::Error;

/// Failures surfaced by mutating store operations
///
/// Queries never fail; a missing record is `None` or an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} '{id}' does not exist")]
    DanglingReference { kind: &'static str, id: String },

    #[error("user '{user_id}' already selected a role")]
    RoleAlreadySelected { user_id: String },

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("invalid seed data: {0}")]
    Seed(String),
}

impl StoreError {
    pub fn dangling(kind: &'static str, id: impl Into<String>) -> Self {
        StoreError::DanglingReference {
            kind,
            id: id.into(),
        }
    }
}
