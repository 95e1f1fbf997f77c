//! In-memory relationship store for a student opportunity marketplace
//!
//! Professors, TAs, organizations and students publish opportunities,
//! students apply and file weekly reports. [`store::RelationshipStore`]
//! owns every record and answers the filtered queries the dashboards need.

pub mod cli;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;
