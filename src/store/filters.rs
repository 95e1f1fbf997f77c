//! Query filters; every field is optional and an omitted field imposes no constraint

use crate::model::{Application, ApplicationStatus, Collection, Opportunity, WeeklyReport};

/// Filter for opportunity-like records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpportunityFilter {
    pub owner_id: Option<String>,
    pub published: Option<bool>,
    pub collection: Option<Collection>,
    pub limit: Option<usize>,
}

impl OpportunityFilter {
    pub fn owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    pub fn collection(mut self, collection: Collection) -> Self {
        self.collection = Some(collection);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Collections this filter searches, in lookup order
    pub(crate) fn collections(&self) -> Vec<Collection> {
        match self.collection {
            Some(collection) => vec![collection],
            None => Collection::ALL.to_vec(),
        }
    }

    /// Constraints other than ownership
    pub(crate) fn matches(&self, opportunity: &Opportunity) -> bool {
        self.published.is_none_or(|p| opportunity.published == p)
    }
}

/// Filter for applications
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub student_id: Option<String>,
    pub opportunity_id: Option<String>,
    pub status: Option<ApplicationStatus>,

    /// Restrict to applications for any of these opportunities; an empty list matches nothing
    pub opportunity_ids: Option<Vec<String>>,
}

impl ApplicationFilter {
    pub fn student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn opportunity(mut self, opportunity_id: impl Into<String>) -> Self {
        self.opportunity_id = Some(opportunity_id.into());
        self
    }

    pub fn status(mut self, status: ApplicationStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn opportunity_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opportunity_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Constraints other than the student
    pub(crate) fn matches(&self, application: &Application) -> bool {
        if let Some(ref id) = self.opportunity_id {
            if application.opportunity_id != *id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if application.status != status {
                return false;
            }
        }
        if let Some(ref ids) = self.opportunity_ids {
            if !ids.contains(&application.opportunity_id) {
                return false;
            }
        }
        true
    }
}

/// Filter for weekly reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub student_id: Option<String>,

    /// Matches either the professor or the TA slot
    pub recipient_id: Option<String>,

    pub professor_id: Option<String>,
    pub ta_id: Option<String>,
    pub project_id: Option<String>,
}

impl ReportFilter {
    pub fn student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    pub fn recipient(mut self, recipient_id: impl Into<String>) -> Self {
        self.recipient_id = Some(recipient_id.into());
        self
    }

    pub fn professor(mut self, professor_id: impl Into<String>) -> Self {
        self.professor_id = Some(professor_id.into());
        self
    }

    pub fn ta(mut self, ta_id: impl Into<String>) -> Self {
        self.ta_id = Some(ta_id.into());
        self
    }

    pub fn project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Constraints other than the student
    pub(crate) fn matches(&self, report: &WeeklyReport) -> bool {
        if let Some(ref id) = self.project_id {
            if report.project_id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(ref id) = self.professor_id {
            if report.recipient.professor_id() != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(ref id) = self.ta_id {
            if report.recipient.ta_id() != Some(id.as_str()) {
                return false;
            }
        }
        if let Some(ref id) = self.recipient_id {
            if report.recipient.id() != id {
                return false;
            }
        }
        true
    }
}
