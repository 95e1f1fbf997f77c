//! Marketplace users

use super::role::Role;
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "uid")]
    pub id: String,
    pub email: String,

    /// `None` until the user goes through role selection
    pub role: Option<Role>,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// Input for signing a user up
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    /// Generated when omitted
    pub id: Option<String>,
    pub email: String,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
}

impl NewUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self.last_name = Some(last.into());
        self
    }

    /// Display name, falling back to "first last" and then the email
    pub fn resolved_display_name(&self) -> String {
        let explicit = self.display_name.as_deref().map(str::trim).unwrap_or("");
        if !explicit.is_empty() {
            return explicit.to_string();
        }

        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if joined.is_empty() {
            self.email.clone()
        } else {
            joined
        }
    }
}
