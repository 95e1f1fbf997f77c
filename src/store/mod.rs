//! Relationship store: users, opportunities, applications and weekly reports

pub mod clock;
pub mod error;
pub mod filters;
pub mod ids;
pub mod relationship;
pub mod seed;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::StoreError;
pub use filters::{ApplicationFilter, OpportunityFilter, ReportFilter};
pub use ids::{IdGenerator, IdKind};
pub use relationship::{RelationshipStore, StoreOptions, StoreStats};
pub use seed::{Seed, demo_seed, parse_seed};
