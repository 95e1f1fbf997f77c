//! Domain records held by the relationship store

mod application;
mod links;
mod opportunity;
mod report;
mod role;
mod user;

pub use application::{Application, ApplicationPatch, ApplicationStatus, NewApplication};
pub use links::{format_drive_link, is_drive_link};
pub use opportunity::{
    Collection, DocumentLinks, NewOpportunity, Opportunity, OpportunityKind, OpportunityPatch,
    OrganizationCategory,
};
pub use report::{NewReport, Recipient, WeeklyReport};
pub use role::Role;
pub use user::{NewUser, User};
