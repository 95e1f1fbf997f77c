//! Demo data set

use super::error::StoreError;
use crate::model::{
    Application, ApplicationStatus, Collection, DocumentLinks, Opportunity, OpportunityKind,
    OrganizationCategory, Recipient, Role, User, WeeklyReport,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

const DEMO_SEED: &str = include_str!("demo_seed.toml");

/// Records to load into a fresh store
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub users: Vec<User>,
    pub opportunities: Vec<Opportunity>,
    pub applications: Vec<Application>,
    pub reports: Vec<WeeklyReport>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    opportunities: Vec<SeedOpportunity>,
    #[serde(default)]
    applications: Vec<SeedApplication>,
    #[serde(default)]
    reports: Vec<SeedReport>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedUser {
    uid: String,
    email: String,
    role: Option<Role>,
    first_name: Option<String>,
    last_name: Option<String>,
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedOpportunity {
    id: String,
    kind: Collection,
    category: Option<OrganizationCategory>,
    title: String,
    #[serde(default)]
    description: String,
    owner_id: String,
    published: bool,
    positions: Option<u32>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    timeline: String,
    cv_link: Option<String>,
    proposal_link: Option<String>,
    dataset_link: Option<String>,
    material_link: Option<String>,
    days_ago: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedApplication {
    id: String,
    opportunity_id: String,
    student_id: String,
    student_name: String,
    opportunity_title: String,
    motivation: String,
    #[serde(default)]
    drive_links: Vec<String>,
    status: ApplicationStatus,
    created_days_ago: i64,
    updated_days_ago: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedReport {
    id: String,
    student_id: String,
    student_name: String,
    professor_id: Option<String>,
    ta_id: Option<String>,
    recipient_name: String,
    project_id: Option<String>,
    week: u32,
    year: i32,
    accomplishments: String,
    challenges: String,
    next_goals: String,
    support_needed: String,
    drive_link: String,
    days_ago: i64,
}

/// `now` shifted back by `days`; `field` and `id` name the offending record on failure
fn days_before(
    now: DateTime<Utc>,
    days: i64,
    field: &str,
    id: &str,
) -> Result<DateTime<Utc>, StoreError> {
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| {
            StoreError::Seed(format!("{} of '{}' is out of range: {}", field, id, days))
        })
}

impl SeedOpportunity {
    fn into_record(self, now: DateTime<Utc>) -> Result<Opportunity, StoreError> {
        let kind = match (self.kind, self.category) {
            (Collection::Projects, None) => OpportunityKind::Project,
            (Collection::StudentProjects, None) => OpportunityKind::StudentProject,
            (Collection::Organizations, Some(category)) => OpportunityKind::Organization(category),
            (Collection::Organizations, None) => {
                return Err(StoreError::Seed(format!(
                    "organization opportunity '{}' has no category",
                    self.id
                )));
            }
            (_, Some(_)) => {
                return Err(StoreError::Seed(format!(
                    "only organization opportunities take a category ('{}')",
                    self.id
                )));
            }
        };

        let created_at = days_before(now, self.days_ago, "days_ago", &self.id)?;
        Ok(Opportunity {
            id: self.id,
            kind,
            title: self.title,
            description: self.description,
            owner_id: self.owner_id,
            published: self.published,
            skills: self.skills,
            timeline: self.timeline,
            positions: self.positions,
            links: DocumentLinks {
                cv_link: self.cv_link,
                proposal_link: self.proposal_link,
                dataset_link: self.dataset_link,
                material_link: self.material_link,
            },
            created_at,
            updated_at: created_at,
        })
    }
}

impl SeedApplication {
    fn into_record(self, now: DateTime<Utc>) -> Result<Application, StoreError> {
        let created_at = days_before(now, self.created_days_ago, "created_days_ago", &self.id)?;
        let updated_at = days_before(now, self.updated_days_ago, "updated_days_ago", &self.id)?;

        Ok(Application {
            id: self.id,
            opportunity_id: self.opportunity_id,
            student_id: self.student_id,
            student_name: self.student_name,
            opportunity_title: self.opportunity_title,
            motivation: self.motivation,
            drive_links: self.drive_links,
            status: self.status,
            created_at,
            updated_at,
        })
    }
}

impl SeedReport {
    fn into_record(self, now: DateTime<Utc>) -> Result<WeeklyReport, StoreError> {
        let recipient = match (self.professor_id, self.ta_id) {
            (Some(id), None) => Recipient::Professor(id),
            (None, Some(id)) => Recipient::TeachingAssistant(id),
            _ => {
                return Err(StoreError::Seed(format!(
                    "report '{}' needs exactly one of professor_id or ta_id",
                    self.id
                )));
            }
        };

        let submitted_at = days_before(now, self.days_ago, "days_ago", &self.id)?;

        Ok(WeeklyReport {
            id: self.id,
            student_id: self.student_id,
            student_name: self.student_name,
            recipient,
            recipient_name: self.recipient_name,
            project_id: self.project_id,
            week: self.week,
            year: self.year,
            accomplishments: self.accomplishments,
            challenges: self.challenges,
            next_goals: self.next_goals,
            support_needed: self.support_needed,
            drive_link: self.drive_link,
            submitted_at,
        })
    }
}

/// Parse a seed document, anchoring relative timestamps at `now`
pub fn parse_seed(contents: &str, now: DateTime<Utc>) -> Result<Seed, StoreError> {
    let file: SeedFile =
        toml::from_str(contents).map_err(|e| StoreError::Seed(e.to_string()))?;

    let users = file
        .users
        .into_iter()
        .map(|u| User {
            id: u.uid,
            email: u.email,
            role: u.role,
            display_name: u.display_name,
            first_name: u.first_name,
            last_name: u.last_name,
        })
        .collect();

    let opportunities = file
        .opportunities
        .into_iter()
        .map(|o| o.into_record(now))
        .collect::<Result<Vec<_>, _>>()?;

    let applications = file
        .applications
        .into_iter()
        .map(|a| a.into_record(now))
        .collect::<Result<Vec<_>, _>>()?;

    let reports = file
        .reports
        .into_iter()
        .map(|r| r.into_record(now))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Seed {
        users,
        opportunities,
        applications,
        reports,
    })
}

/// The built-in demo data set
pub fn demo_seed(now: DateTime<Utc>) -> Result<Seed, StoreError> {
    parse_seed(DEMO_SEED, now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed_parses() {
        let seed = demo_seed(Utc::now()).unwrap();
        assert_eq!(seed.users.len(), 9);
        assert_eq!(seed.opportunities.len(), 9);
        assert_eq!(seed.applications.len(), 5);
        assert_eq!(seed.reports.len(), 10);
    }

    #[test]
    fn test_demo_seed_kinds() {
        let seed = demo_seed(Utc::now()).unwrap();
        let count = |collection: Collection| {
            seed.opportunities
                .iter()
                .filter(|o| o.kind.collection() == collection)
                .count()
        };
        assert_eq!(count(Collection::Projects), 5);
        assert_eq!(count(Collection::StudentProjects), 1);
        assert_eq!(count(Collection::Organizations), 3);
    }

    #[test]
    fn test_demo_seed_relative_dates() {
        let now = Utc::now();
        let seed = demo_seed(now).unwrap();
        let proj_1 = seed.opportunities.iter().find(|o| o.id == "proj_1").unwrap();
        assert_eq!(proj_1.created_at, now - TimeDelta::days(30));
    }

    #[test]
    fn test_ta_report_uses_ta_slot() {
        let seed = demo_seed(Utc::now()).unwrap();
        let report = seed.reports.iter().find(|r| r.id == "report_8").unwrap();
        assert_eq!(report.recipient, Recipient::TeachingAssistant("ta1".into()));
    }

    #[test]
    fn test_organization_without_category_is_rejected() {
        let doc = r#"
            [[opportunities]]
            id = "opp_9"
            kind = "organizations"
            title = "Untyped"
            owner_id = "org1"
            published = true
            days_ago = 1
        "#;
        let err = parse_seed(doc, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Seed(_)));
    }

    #[test]
    fn test_report_with_both_recipients_is_rejected() {
        let doc = r#"
            [[reports]]
            id = "report_99"
            student_id = "student1"
            student_name = "John Student"
            professor_id = "professor1"
            ta_id = "ta1"
            recipient_name = "?"
            week = 1
            year = 2024
            accomplishments = ""
            challenges = ""
            next_goals = ""
            support_needed = ""
            drive_link = ""
            days_ago = 0
        "#;
        assert!(parse_seed(doc, Utc::now()).is_err());
    }

    #[test]
    fn test_days_ago_out_of_range_is_rejected() {
        let doc = r#"
            [[reports]]
            id = "report_99"
            student_id = "student1"
            student_name = "John Student"
            professor_id = "professor1"
            recipient_name = "Dr. Michael Chen"
            week = 1
            year = 2024
            accomplishments = ""
            challenges = ""
            next_goals = ""
            support_needed = ""
            drive_link = ""
            days_ago = 9223372036854775807
        "#;
        let err = parse_seed(doc, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Seed(ref msg) if msg.contains("report_99")));
    }

    #[test]
    fn test_application_days_ago_out_of_range_is_rejected() {
        let doc = r#"
            [[applications]]
            id = "app_99"
            opportunity_id = "proj_1"
            student_id = "student1"
            student_name = "John Student"
            opportunity_title = "Climate"
            motivation = ""
            status = "pending"
            created_days_ago = 1
            updated_days_ago = 9000000000
        "#;
        let err = parse_seed(doc, Utc::now()).unwrap_err();
        assert!(matches!(err, StoreError::Seed(ref msg) if msg.contains("updated_days_ago")));
    }
}
