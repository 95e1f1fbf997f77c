//! In-memory relationship store

use super::clock::{Clock, SystemClock};
use super::error::StoreError;
use super::filters::{ApplicationFilter, OpportunityFilter, ReportFilter};
use super::ids::{IdGenerator, IdKind};
use super::seed::{Seed, demo_seed};
use crate::model::{
    Application, ApplicationPatch, ApplicationStatus, Collection, NewApplication, NewOpportunity,
    NewReport, NewUser, Opportunity, OpportunityPatch, Role, User, WeeklyReport,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Behaviour switches for a store instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Fabricate results for unknown owners that have a registered demo session
    pub demo_mode: bool,

    /// How many records the demo fallback re-labels
    pub demo_fallback_size: usize,

    /// Reject applications and reports that reference unknown records
    pub strict_references: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            demo_mode: false,
            demo_fallback_size: 2,
            strict_references: false,
        }
    }
}

/// Record counts per collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub users: usize,
    pub projects: usize,
    pub student_projects: usize,
    pub organization_opportunities: usize,
    pub applications: usize,
    pub reports: usize,
}

/// Owns every collection and answers the queries the dashboards make
///
/// Collections are insertion-ordered and scanned linearly.
pub struct RelationshipStore {
    options: StoreOptions,
    clock: Box<dyn Clock>,
    ids: IdGenerator,
    users: Vec<User>,
    projects: Vec<Opportunity>,
    student_projects: Vec<Opportunity>,
    organization_opportunities: Vec<Opportunity>,
    applications: Vec<Application>,
    reports: Vec<WeeklyReport>,
    demo_sessions: HashMap<String, Role>,
}

fn newest_first<T>(records: &mut [T], key: impl Fn(&T) -> DateTime<Utc>) {
    records.sort_by(|a, b| key(b).cmp(&key(a)));
}

impl RelationshipStore {
    /// Create an empty store on the wall clock
    pub fn new(options: StoreOptions) -> Self {
        Self::with_clock(options, Box::new(SystemClock))
    }

    /// Create an empty store reading time from `clock`
    pub fn with_clock(options: StoreOptions, clock: Box<dyn Clock>) -> Self {
        Self {
            options,
            clock,
            ids: IdGenerator::new(),
            users: Vec::new(),
            projects: Vec::new(),
            student_projects: Vec::new(),
            organization_opportunities: Vec::new(),
            applications: Vec::new(),
            reports: Vec::new(),
            demo_sessions: HashMap::new(),
        }
    }

    /// Create a store preloaded with the demo data set
    pub fn seeded(options: StoreOptions, clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        let seed = demo_seed(clock.now())?;
        let mut store = Self::with_clock(options, clock);
        store.load_seed(seed);
        Ok(store)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Insert records verbatim, keeping their ids and timestamps
    pub fn load_seed(&mut self, seed: Seed) {
        let counts = (
            seed.users.len(),
            seed.opportunities.len(),
            seed.applications.len(),
            seed.reports.len(),
        );

        for user in seed.users {
            self.ids.observe(IdKind::User, &user.id);
            self.users.push(user);
        }
        for opportunity in seed.opportunities {
            let collection = opportunity.kind.collection();
            self.ids.observe(collection.into(), &opportunity.id);
            self.collection_mut(collection).push(opportunity);
        }
        for application in seed.applications {
            self.ids.observe(IdKind::Application, &application.id);
            self.applications.push(application);
        }
        for report in seed.reports {
            self.ids.observe(IdKind::Report, &report.id);
            self.reports.push(report);
        }

        info!(
            users = counts.0,
            opportunities = counts.1,
            applications = counts.2,
            reports = counts.3,
            "seeded store"
        );
    }

    pub fn stats(&self) -> StoreStats {
        StoreStats {
            users: self.users.len(),
            projects: self.projects.len(),
            student_projects: self.student_projects.len(),
            organization_opportunities: self.organization_opportunities.len(),
            applications: self.applications.len(),
            reports: self.reports.len(),
        }
    }

    fn collection(&self, collection: Collection) -> &Vec<Opportunity> {
        match collection {
            Collection::Projects => &self.projects,
            Collection::StudentProjects => &self.student_projects,
            Collection::Organizations => &self.organization_opportunities,
        }
    }

    fn collection_mut(&mut self, collection: Collection) -> &mut Vec<Opportunity> {
        match collection {
            Collection::Projects => &mut self.projects,
            Collection::StudentProjects => &mut self.student_projects,
            Collection::Organizations => &mut self.organization_opportunities,
        }
    }

    /// Timestamp for an update that must sort after `previous`
    fn later_than(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.clock.now();
        if now > previous {
            now
        } else {
            previous + TimeDelta::milliseconds(1)
        }
    }

    // Users

    pub fn get_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.clone()
    }

    /// Register a user; an explicit id must be unused
    pub fn create_user(&mut self, new: NewUser) -> Result<User, StoreError> {
        let id = match new.id.clone() {
            Some(id) => {
                if self.get_user(&id).is_some() {
                    return Err(StoreError::DuplicateUser(id));
                }
                self.ids.observe(IdKind::User, &id);
                id
            }
            None => self.ids.next_id(IdKind::User),
        };

        let user = User {
            display_name: new.resolved_display_name(),
            id,
            email: new.email,
            role: new.role,
            first_name: new.first_name,
            last_name: new.last_name,
        };

        debug!(user_id = %user.id, role = ?user.role, "created user");
        self.users.push(user.clone());
        Ok(user)
    }

    /// Set a user's role; allowed once per user
    pub fn select_role(&mut self, user_id: &str, role: Role) -> Result<User, StoreError> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))?;

        if user.role.is_some() {
            return Err(StoreError::RoleAlreadySelected {
                user_id: user_id.to_string(),
            });
        }

        user.role = Some(role);
        debug!(user_id, %role, "role selected");
        Ok(user.clone())
    }

    /// Users who can receive weekly reports: professors, then TAs
    pub fn list_report_recipients(&self) -> Vec<User> {
        let professors = self.users.iter().filter(|u| u.has_role(Role::Professor));
        let tas = self
            .users
            .iter()
            .filter(|u| u.has_role(Role::TeachingAssistant));
        professors.chain(tas).cloned().collect()
    }

    // Demo sessions

    /// Remember the role a not-yet-registered demo account signed in with
    pub fn begin_demo_session(&mut self, user_id: impl Into<String>, role: Role) {
        self.demo_sessions.insert(user_id.into(), role);
    }

    pub fn end_demo_session(&mut self, user_id: &str) {
        self.demo_sessions.remove(user_id);
    }

    /// Role to fabricate results for, when the demo fallback applies to `user_id`
    fn demo_role(&self, user_id: &str) -> Option<Role> {
        if !self.options.demo_mode || self.get_user(user_id).is_some() {
            return None;
        }
        self.demo_sessions.get(user_id).copied()
    }

    // Opportunities

    /// Records of one collection owned by `owner`, with the demo fallback applied
    fn owned_in(&self, collection: Collection, owner: &str) -> Vec<Opportunity> {
        let records = self.collection(collection);
        let owned: Vec<Opportunity> = records
            .iter()
            .filter(|o| o.is_owned_by(owner))
            .cloned()
            .collect();

        if !owned.is_empty() {
            return owned;
        }

        let fabricate = match self.demo_role(owner) {
            Some(role) => {
                role.owned_collection() == collection && collection != Collection::StudentProjects
            }
            None => false,
        };
        if !fabricate {
            return owned;
        }

        warn!(
            owner,
            ?collection,
            count = self.options.demo_fallback_size.min(records.len()),
            "demo fallback: re-labeling seed records for unknown owner"
        );
        records
            .iter()
            .take(self.options.demo_fallback_size)
            .cloned()
            .map(|mut o| {
                o.owner_id = owner.to_string();
                o
            })
            .collect()
    }

    /// Opportunities matching `filter`, newest first
    pub fn query_opportunities(&self, filter: &OpportunityFilter) -> Vec<Opportunity> {
        let mut results = Vec::new();
        for collection in filter.collections() {
            match filter.owner_id.as_deref() {
                Some(owner) => results.extend(self.owned_in(collection, owner)),
                None => results.extend(self.collection(collection).iter().cloned()),
            }
        }

        results.retain(|o| filter.matches(o));
        newest_first(&mut results, |o| o.created_at);

        if let Some(limit) = filter.limit {
            results.truncate(limit);
        }
        results
    }

    pub fn create_opportunity(&mut self, new: NewOpportunity) -> Opportunity {
        let collection = new.kind.collection();
        let now = self.clock.now();
        let opportunity = Opportunity {
            id: self.ids.next_id(collection.into()),
            kind: new.kind,
            title: new.title,
            description: new.description,
            owner_id: new.owner_id,
            published: new.published,
            skills: new.skills,
            timeline: new.timeline,
            positions: new.positions,
            links: new.links,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %opportunity.id, owner = %opportunity.owner_id, kind = %opportunity.kind, "created opportunity");
        self.collection_mut(collection).push(opportunity.clone());
        opportunity
    }

    /// Merge `patch` into an opportunity; `None` when the id is unknown
    pub fn update_opportunity(&mut self, id: &str, patch: OpportunityPatch) -> Option<Opportunity> {
        let collection = self.resolve_opportunity(id)?.kind.collection();
        let previous = self
            .collection(collection)
            .iter()
            .find(|o| o.id == id)?
            .updated_at;
        let updated_at = self.later_than(previous);

        let opportunity = self
            .collection_mut(collection)
            .iter_mut()
            .find(|o| o.id == id)?;
        patch.apply_to(opportunity);
        opportunity.updated_at = updated_at;

        debug!(id, published = opportunity.published, "updated opportunity");
        Some(opportunity.clone())
    }

    /// Every published opportunity across all three collections, newest first
    pub fn list_published_opportunities(&self) -> Vec<Opportunity> {
        let mut published: Vec<Opportunity> = Collection::ALL
            .into_iter()
            .flat_map(|c| self.collection(c).iter())
            .filter(|o| o.published)
            .cloned()
            .collect();
        newest_first(&mut published, |o| o.created_at);
        published
    }

    /// Look an id up in projects, then student projects, then organization opportunities
    pub fn resolve_opportunity(&self, id: &str) -> Option<&Opportunity> {
        Collection::ALL
            .into_iter()
            .find_map(|c| self.collection(c).iter().find(|o| o.id == id))
    }

    // Applications

    fn applications_of_student(&self, student_id: &str) -> Vec<Application> {
        let own: Vec<Application> = self
            .applications
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();

        if !own.is_empty() || self.demo_role(student_id) != Some(Role::Student) {
            return own;
        }

        warn!(student_id, "demo fallback: re-labeling seed applications");
        self.applications
            .iter()
            .take(self.options.demo_fallback_size)
            .cloned()
            .map(|mut a| {
                a.student_id = student_id.to_string();
                a
            })
            .collect()
    }

    /// Applications matching `filter`, newest first
    pub fn query_applications(&self, filter: &ApplicationFilter) -> Vec<Application> {
        let mut results = match filter.student_id.as_deref() {
            Some(student_id) => self.applications_of_student(student_id),
            None => self.applications.clone(),
        };

        results.retain(|a| filter.matches(a));
        newest_first(&mut results, |a| a.created_at);
        results
    }

    /// Applications to the opportunities `user_id` posted under `role`
    pub fn applications_for_owner(&self, user_id: &str, role: Role) -> Vec<Application> {
        let collection = role.owned_collection();
        let mut opportunity_ids: Vec<String> = self
            .collection(collection)
            .iter()
            .filter(|o| o.is_owned_by(user_id))
            .map(|o| o.id.clone())
            .collect();

        if opportunity_ids.is_empty() && self.options.demo_mode {
            let borrowed = match role {
                Role::Professor | Role::TeachingAssistant => self.options.demo_fallback_size,
                Role::Organization => 1,
                Role::Student => 0,
            };
            opportunity_ids = self
                .collection(collection)
                .iter()
                .take(borrowed)
                .map(|o| o.id.clone())
                .collect();
        }

        self.query_applications(&ApplicationFilter::default().opportunity_ids(opportunity_ids))
    }

    /// Submit an application; it always starts out pending
    pub fn create_application(&mut self, new: NewApplication) -> Result<Application, StoreError> {
        let opportunity_title = new.opportunity_title.clone().or_else(|| {
            self.resolve_opportunity(&new.opportunity_id)
                .map(|o| o.title.clone())
        });
        let student_name = new.student_name.clone().or_else(|| {
            self.get_user(&new.student_id)
                .map(|u| u.display_name.clone())
        });

        if self.options.strict_references {
            if self.resolve_opportunity(&new.opportunity_id).is_none() {
                warn!(opportunity_id = %new.opportunity_id, "rejected application for unknown opportunity");
                return Err(StoreError::dangling("opportunity", new.opportunity_id));
            }
            if self.get_user(&new.student_id).is_none() {
                warn!(student_id = %new.student_id, "rejected application from unknown student");
                return Err(StoreError::dangling("student", new.student_id));
            }
        }

        let now = self.clock.now();
        let application = Application {
            id: self.ids.next_id(IdKind::Application),
            opportunity_id: new.opportunity_id,
            student_id: new.student_id,
            student_name: student_name.unwrap_or_default(),
            opportunity_title: opportunity_title.unwrap_or_default(),
            motivation: new.motivation,
            drive_links: new.drive_links,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %application.id, opportunity_id = %application.opportunity_id, "created application");
        self.applications.push(application.clone());
        Ok(application)
    }

    /// Merge `patch` into an application and refresh `updated_at`
    pub fn update_application(&mut self, id: &str, patch: ApplicationPatch) -> Option<Application> {
        let index = self.applications.iter().position(|a| a.id == id)?;
        let updated_at = self.later_than(self.applications[index].updated_at);

        let application = &mut self.applications[index];
        patch.apply_to(application);
        application.updated_at = updated_at;

        debug!(id, status = %application.status, "updated application");
        Some(application.clone())
    }

    // Reports

    fn reports_of_student(&self, student_id: &str) -> Vec<WeeklyReport> {
        let own: Vec<WeeklyReport> = self
            .reports
            .iter()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect();

        if !own.is_empty() || self.demo_role(student_id) != Some(Role::Student) {
            return own;
        }

        warn!(student_id, "demo fallback: re-labeling seed reports");
        self.reports
            .iter()
            .take(self.options.demo_fallback_size)
            .cloned()
            .map(|mut r| {
                r.student_id = student_id.to_string();
                r
            })
            .collect()
    }

    /// Reports matching `filter`, most recently submitted first
    pub fn query_reports(&self, filter: &ReportFilter) -> Vec<WeeklyReport> {
        let mut results = match filter.student_id.as_deref() {
            Some(student_id) => self.reports_of_student(student_id),
            None => self.reports.clone(),
        };

        results.retain(|r| filter.matches(r));
        newest_first(&mut results, |r| r.submitted_at);
        results
    }

    /// Submit a weekly report
    pub fn create_report(&mut self, new: NewReport) -> Result<WeeklyReport, StoreError> {
        if self.options.strict_references {
            if self.get_user(&new.student_id).is_none() {
                warn!(student_id = %new.student_id, "rejected report from unknown student");
                return Err(StoreError::dangling("student", new.student_id));
            }
            let recipient_role = new.recipient.role();
            let known = self
                .get_user(new.recipient.id())
                .is_some_and(|u| u.has_role(recipient_role));
            if !known {
                warn!(recipient_id = %new.recipient.id(), "rejected report to unknown recipient");
                return Err(StoreError::dangling("recipient", new.recipient.id()));
            }
        }

        let student_name = new.student_name.clone().or_else(|| {
            self.get_user(&new.student_id)
                .map(|u| u.display_name.clone())
        });
        let recipient_name = new.recipient_name.clone().or_else(|| {
            self.get_user(new.recipient.id())
                .map(|u| u.display_name.clone())
        });

        let report = WeeklyReport {
            id: self.ids.next_id(IdKind::Report),
            student_id: new.student_id,
            student_name: student_name.unwrap_or_default(),
            recipient: new.recipient,
            recipient_name: recipient_name.unwrap_or_default(),
            project_id: new.project_id,
            week: new.week,
            year: new.year,
            accomplishments: new.accomplishments,
            challenges: new.challenges,
            next_goals: new.next_goals,
            support_needed: new.support_needed,
            drive_link: new.drive_link,
            submitted_at: self.clock.now(),
        };

        debug!(id = %report.id, recipient = %report.recipient.id(), "created report");
        self.reports.push(report.clone());
        Ok(report)
    }
}
