//! Configuration types and loading for campus-store

mod loader;

pub use loader::{CampusConfig, LoggingSection, StoreSection};
