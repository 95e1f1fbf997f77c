//! Student applications to opportunities

use super::links::is_drive_link;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Review state of an application
///
/// Any status may follow any other; reviewers move applications freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Waitlisted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Accepted,
        ApplicationStatus::Waitlisted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Waitlisted => "waitlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown application status '{}'", s))
    }
}

/// A student's application to one opportunity
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub opportunity_id: String,
    pub student_id: String,

    /// Captured at creation; later profile edits do not propagate
    pub student_name: String,

    /// Captured at creation; later opportunity edits do not propagate
    pub opportunity_title: String,

    /// Why the student is applying
    #[serde(rename = "description")]
    pub motivation: String,

    #[serde(default)]
    pub drive_links: Vec<String>,

    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for submitting an application
///
/// Names left as `None` are snapshotted from the store at creation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewApplication {
    pub opportunity_id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub opportunity_title: Option<String>,
    pub motivation: String,
    pub drive_links: Vec<String>,
}

impl NewApplication {
    pub fn new(opportunity_id: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            opportunity_id: opportunity_id.into(),
            student_id: student_id.into(),
            ..Default::default()
        }
    }

    pub fn with_motivation(mut self, motivation: impl Into<String>) -> Self {
        self.motivation = motivation.into();
        self
    }

    pub fn with_drive_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drive_links = links.into_iter().map(Into::into).collect();
        self
    }

    /// Links that do not look like Google Drive documents
    pub fn invalid_links(&self) -> Vec<&str> {
        self.drive_links
            .iter()
            .map(String::as_str)
            .filter(|link| !is_drive_link(link))
            .collect()
    }
}

/// Partial update for an application; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub status: Option<ApplicationStatus>,
    pub motivation: Option<String>,
    pub drive_links: Option<Vec<String>>,
}

impl ApplicationPatch {
    pub fn status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub(crate) fn apply_to(self, application: &mut Application) {
        if let Some(status) = self.status {
            application.status = status;
        }
        if let Some(motivation) = self.motivation {
            application.motivation = motivation;
        }
        if let Some(drive_links) = self.drive_links {
            application.drive_links = drive_links;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "Waitlisted".parse::<ApplicationStatus>().unwrap(),
            ApplicationStatus::Waitlisted
        );
        assert!("withdrawn".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_status_display_honours_width() {
        assert_eq!(format!("[{:<11}]", ApplicationStatus::Pending), "[pending    ]");
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(ApplicationStatus::default(), ApplicationStatus::Pending);
    }

    #[test]
    fn test_invalid_links() {
        let application = NewApplication::new("proj_1", "student1").with_drive_links([
            "https://drive.google.com/file/d/cv1",
            "https://example.com/cv.pdf",
        ]);

        assert_eq!(application.invalid_links(), vec!["https://example.com/cv.pdf"]);
    }

    #[test]
    fn test_motivation_uses_description_on_the_wire() {
        let now = Utc::now();
        let application = Application {
            id: "app_1".into(),
            opportunity_id: "proj_1".into(),
            student_id: "student1".into(),
            student_name: "John Student".into(),
            opportunity_title: "Machine Learning for Climate Prediction".into(),
            motivation: "I have studied ML for two years".into(),
            drive_links: vec![],
            status: ApplicationStatus::Accepted,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&application).unwrap();
        assert_eq!(value["description"], "I have studied ML for two years");
        assert_eq!(value["status"], "accepted");
        assert_eq!(value["opportunityId"], "proj_1");
    }
}
