//! CLI module for campus-store
//!
//! This module provides:
//! - Command implementations (published, opportunities, applications, ...)
//! - Output handlers (console, JSON, quiet)
//!
//! # Example
//!
//! ```ignore
//! use campus_store::cli::{commands, output};
//!
//! let handler = output::create_handler(output::OutputMode::Console);
//! let store = commands::build_store(&config)?;
//! commands::list_published(&store, &*handler);
//! ```

pub mod commands;
pub mod output;

pub use commands::{
    build_store, list_applications, list_opportunities, list_published, list_recipients,
    list_reports, resolve, status,
};
pub use output::{OutputEvent, OutputHandler, OutputMode, create_handler};
