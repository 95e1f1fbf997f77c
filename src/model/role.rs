//! User roles

use super::opportunity::Collection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user acts under across the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Role {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "professor")]
    Professor,
    #[serde(rename = "ta")]
    TeachingAssistant,
    #[serde(rename = "organization_representative")]
    Organization,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Student,
        Role::Professor,
        Role::TeachingAssistant,
        Role::Organization,
    ];

    /// Wire name of the role
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
            Role::TeachingAssistant => "ta",
            Role::Organization => "organization_representative",
        }
    }

    /// True for roles that can receive weekly reports
    pub fn can_supervise(self) -> bool {
        match self {
            Role::Professor | Role::TeachingAssistant => true,
            Role::Student | Role::Organization => false,
        }
    }

    /// Collection holding the opportunities this role posts
    pub fn owned_collection(self) -> Collection {
        match self {
            Role::Professor | Role::TeachingAssistant => Collection::Projects,
            Role::Student => Collection::StudentProjects,
            Role::Organization => Collection::Organizations,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            "ta" | "teaching_assistant" | "teaching-assistant" => Ok(Role::TeachingAssistant),
            "organization_representative" | "organization" | "org" => Ok(Role::Organization),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_wire_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_aliases() {
        assert_eq!("TA".parse::<Role>().unwrap(), Role::TeachingAssistant);
        assert_eq!("org".parse::<Role>().unwrap(), Role::Organization);
        assert!("dean".parse::<Role>().is_err());
    }

    #[test]
    fn test_supervisors() {
        let supervisors: Vec<_> = Role::ALL.into_iter().filter(|r| r.can_supervise()).collect();
        assert_eq!(supervisors, vec![Role::Professor, Role::TeachingAssistant]);
    }

    #[test]
    fn test_role_serializes_to_wire_name() {
        let json = serde_json::to_string(&Role::Organization).unwrap();
        assert_eq!(json, "\"organization_representative\"");
    }
}
