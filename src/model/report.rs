//! Weekly progress reports

use super::links::is_drive_link;
use super::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supervisor a report is addressed to
///
/// Serialized as the `professorId` / `taId` field pair with exactly one set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(into = "RecipientFields", try_from = "RecipientFields")]
pub enum Recipient {
    Professor(String),
    TeachingAssistant(String),
}

impl Recipient {
    /// Build a recipient for a user acting under `role`
    pub fn for_role(role: Role, user_id: impl Into<String>) -> Option<Self> {
        match role {
            Role::Professor => Some(Recipient::Professor(user_id.into())),
            Role::TeachingAssistant => Some(Recipient::TeachingAssistant(user_id.into())),
            Role::Student | Role::Organization => None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Recipient::Professor(id) | Recipient::TeachingAssistant(id) => id,
        }
    }

    pub fn professor_id(&self) -> Option<&str> {
        match self {
            Recipient::Professor(id) => Some(id),
            Recipient::TeachingAssistant(_) => None,
        }
    }

    pub fn ta_id(&self) -> Option<&str> {
        match self {
            Recipient::TeachingAssistant(id) => Some(id),
            Recipient::Professor(_) => None,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Recipient::Professor(_) => Role::Professor,
            Recipient::TeachingAssistant(_) => Role::TeachingAssistant,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecipientFields {
    #[serde(default)]
    professor_id: Option<String>,
    #[serde(default)]
    ta_id: Option<String>,
}

impl From<Recipient> for RecipientFields {
    fn from(recipient: Recipient) -> Self {
        match recipient {
            Recipient::Professor(id) => Self {
                professor_id: Some(id),
                ta_id: None,
            },
            Recipient::TeachingAssistant(id) => Self {
                professor_id: None,
                ta_id: Some(id),
            },
        }
    }
}

impl TryFrom<RecipientFields> for Recipient {
    type Error = String;

    fn try_from(fields: RecipientFields) -> Result<Self, Self::Error> {
        match (fields.professor_id, fields.ta_id) {
            (Some(id), None) => Ok(Recipient::Professor(id)),
            (None, Some(id)) => Ok(Recipient::TeachingAssistant(id)),
            (Some(_), Some(_)) => Err("report has both professorId and taId".into()),
            (None, None) => Err("report needs a professorId or taId".into()),
        }
    }
}

/// A student's weekly progress report
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    pub id: String,
    pub student_id: String,
    pub student_name: String,

    #[serde(flatten)]
    pub recipient: Recipient,

    pub recipient_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub week: u32,
    pub year: i32,
    pub accomplishments: String,
    pub challenges: String,
    pub next_goals: String,
    pub support_needed: String,
    pub drive_link: String,
    pub submitted_at: DateTime<Utc>,
}

/// Input for submitting a weekly report
#[derive(Debug, Clone, PartialEq)]
pub struct NewReport {
    pub student_id: String,
    pub student_name: Option<String>,
    pub recipient: Recipient,
    pub recipient_name: Option<String>,
    pub project_id: Option<String>,
    pub week: u32,
    pub year: i32,
    pub accomplishments: String,
    pub challenges: String,
    pub next_goals: String,
    pub support_needed: String,
    pub drive_link: String,
}

impl NewReport {
    pub fn new(student_id: impl Into<String>, recipient: Recipient, week: u32, year: i32) -> Self {
        Self {
            student_id: student_id.into(),
            student_name: None,
            recipient,
            recipient_name: None,
            project_id: None,
            week,
            year,
            accomplishments: String::new(),
            challenges: String::new(),
            next_goals: String::new(),
            support_needed: String::new(),
            drive_link: String::new(),
        }
    }

    pub fn with_accomplishments(mut self, text: impl Into<String>) -> Self {
        self.accomplishments = text.into();
        self
    }

    pub fn with_drive_link(mut self, link: impl Into<String>) -> Self {
        self.drive_link = link.into();
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Whether the attached document looks like a Drive link
    pub fn has_valid_link(&self) -> bool {
        is_drive_link(&self.drive_link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_for_role() {
        assert_eq!(
            Recipient::for_role(Role::TeachingAssistant, "ta1"),
            Some(Recipient::TeachingAssistant("ta1".into()))
        );
        assert_eq!(Recipient::for_role(Role::Student, "student1"), None);
    }

    #[test]
    fn test_recipient_serializes_as_field_pair() {
        let value = serde_json::to_value(Recipient::Professor("professor_fatma".into())).unwrap();
        assert_eq!(value["professorId"], "professor_fatma");
        assert!(value["taId"].is_null());
    }

    #[test]
    fn test_recipient_rejects_both_ids() {
        let parsed: Result<Recipient, _> =
            serde_json::from_str(r#"{"professorId": "p", "taId": "t"}"#);
        assert!(parsed.is_err());

        let parsed: Result<Recipient, _> = serde_json::from_str(r#"{}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_report_flattens_recipient() {
        let report = WeeklyReport {
            id: "report_8".into(),
            student_id: "student2".into(),
            student_name: "Sarah Johnson".into(),
            recipient: Recipient::TeachingAssistant("ta1".into()),
            recipient_name: "Emily Rodriguez".into(),
            project_id: None,
            week: 15,
            year: 2024,
            accomplishments: "Refactored".into(),
            challenges: String::new(),
            next_goals: String::new(),
            support_needed: String::new(),
            drive_link: "https://drive.google.com/file/d/8h/view".into(),
            submitted_at: Utc::now(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["taId"], "ta1");
        assert!(value["professorId"].is_null());

        let back: WeeklyReport = serde_json::from_value(value).unwrap();
        assert_eq!(back.recipient, report.recipient);
    }

    #[test]
    fn test_new_report_link_check() {
        let report = NewReport::new("student1", Recipient::Professor("professor1".into()), 3, 2025)
            .with_drive_link("https://drive.google.com/file/d/x/view");
        assert!(report.has_valid_link());
    }
}
