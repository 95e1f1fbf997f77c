//! Opportunity-like records: projects, student projects, organization opportunities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collection an opportunity lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Projects,
    StudentProjects,
    Organizations,
}

impl Collection {
    /// Lookup order used when resolving an id across collections
    pub const ALL: [Collection; 3] = [
        Collection::Projects,
        Collection::StudentProjects,
        Collection::Organizations,
    ];
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "project" | "projects" => Ok(Collection::Projects),
            "student_project" | "student_projects" | "student-project" => {
                Ok(Collection::StudentProjects)
            }
            "organization" | "organizations" | "opportunity" | "org" => {
                Ok(Collection::Organizations)
            }
            other => Err(format!("unknown opportunity kind '{}'", other)),
        }
    }
}

/// What an organization is offering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationCategory {
    Course,
    Workshop,
    Competition,
    Training,
}

impl OrganizationCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            OrganizationCategory::Course => "course",
            OrganizationCategory::Workshop => "workshop",
            OrganizationCategory::Competition => "competition",
            OrganizationCategory::Training => "training",
        }
    }
}

/// Variant tag carried by every opportunity from creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum OpportunityKind {
    /// Posted by a professor or TA
    Project,
    /// Posted by a student looking for teammates
    StudentProject,
    /// Posted by an organization representative
    Organization(OrganizationCategory),
}

impl OpportunityKind {
    pub fn collection(self) -> Collection {
        match self {
            OpportunityKind::Project => Collection::Projects,
            OpportunityKind::StudentProject => Collection::StudentProjects,
            OpportunityKind::Organization(_) => Collection::Organizations,
        }
    }
}

impl fmt::Display for OpportunityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpportunityKind::Project => f.pad("project"),
            OpportunityKind::StudentProject => f.pad("student project"),
            OpportunityKind::Organization(category) => {
                f.pad(&format!("organization {}", category.as_str()))
            }
        }
    }
}

/// External documents attached to an opportunity
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_link: Option<String>,
}

impl DocumentLinks {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            &self.cv_link,
            &self.proposal_link,
            &self.dataset_link,
            &self.material_link,
        ]
        .into_iter()
        .filter_map(|link| link.as_deref())
    }
}

/// A postable position a student can apply to
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,

    #[serde(flatten)]
    pub kind: OpportunityKind,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Professor/TA, student, or organization that posted it
    pub owner_id: String,

    /// Visible to non-owners only when set
    pub published: bool,

    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub timeline: String,

    pub positions: Option<u32>,

    #[serde(default)]
    pub links: DocumentLinks,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Input for creating an opportunity
#[derive(Debug, Clone, PartialEq)]
pub struct NewOpportunity {
    pub kind: OpportunityKind,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub published: bool,
    pub skills: Vec<String>,
    pub timeline: String,
    pub positions: Option<u32>,
    pub links: DocumentLinks,
}

impl NewOpportunity {
    pub fn new(kind: OpportunityKind, owner_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind,
            owner_id: owner_id.into(),
            title: title.into(),
            description: String::new(),
            published: false,
            skills: Vec::new(),
            timeline: String::new(),
            positions: None,
            links: DocumentLinks::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeline(mut self, timeline: impl Into<String>) -> Self {
        self.timeline = timeline.into();
        self
    }

    pub fn with_positions(mut self, positions: u32) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn with_links(mut self, links: DocumentLinks) -> Self {
        self.links = links;
        self
    }
}

/// Partial update for an opportunity; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<bool>,
    pub skills: Option<Vec<String>>,
    pub timeline: Option<String>,
    pub positions: Option<Option<u32>>,
    pub links: Option<DocumentLinks>,
}

impl OpportunityPatch {
    pub fn published(published: bool) -> Self {
        Self {
            published: Some(published),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(self, opportunity: &mut Opportunity) {
        if let Some(title) = self.title {
            opportunity.title = title;
        }
        if let Some(description) = self.description {
            opportunity.description = description;
        }
        if let Some(published) = self.published {
            opportunity.published = published;
        }
        if let Some(skills) = self.skills {
            opportunity.skills = skills;
        }
        if let Some(timeline) = self.timeline {
            opportunity.timeline = timeline;
        }
        if let Some(positions) = self.positions {
            opportunity.positions = positions;
        }
        if let Some(links) = self.links {
            opportunity.links = links;
        }
    }
}
