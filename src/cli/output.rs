//! Output handlers for CLI commands
//!
//! Supports console (pretty), JSON, and quiet output modes.

use crate::model::{Application, Opportunity, User, WeeklyReport};
use crate::store::StoreStats;
use serde::Serialize;

/// Output mode for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Console,
    Json,
    Quiet,
}

impl OutputMode {
    /// Pick a mode from the global flags; `--json` wins over `--quiet`
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else if quiet {
            Self::Quiet
        } else {
            Self::Console
        }
    }
}

/// Events emitted by commands
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputEvent {
    Opportunities {
        items: Vec<Opportunity>,
    },
    Opportunity {
        item: Opportunity,
    },
    Applications {
        items: Vec<Application>,
    },
    Reports {
        items: Vec<WeeklyReport>,
    },
    Users {
        items: Vec<User>,
    },
    Status {
        stats: StoreStats,
        seeded: bool,
        demo_mode: bool,
        demo_fallback_size: usize,
        strict_references: bool,
    },
    NotFound {
        what: String,
        id: String,
    },
    Info {
        message: String,
    },
}

/// Output handler trait
pub trait OutputHandler {
    /// Emit an event
    fn emit(&self, event: OutputEvent);
}

/// Human-readable output
pub struct ConsoleHandler;

impl ConsoleHandler {
    fn opportunity_line(o: &Opportunity) -> String {
        let state = if o.published { "published" } else { "draft" };
        format!(
            "{:<16} {:<24} {:<10} {:<20} {}",
            o.id, o.kind, state, o.owner_id, o.title
        )
    }

    fn application_line(a: &Application) -> String {
        format!(
            "{:<8} {:<11} {:<16} {:<14} {}",
            a.id, a.status, a.opportunity_id, a.student_id, a.opportunity_title
        )
    }

    fn report_line(r: &WeeklyReport) -> String {
        format!(
            "{:<10} {}-W{:02} {:<14} -> {:<20} {}",
            r.id,
            r.year,
            r.week,
            r.student_id,
            r.recipient.id(),
            r.recipient_name
        )
    }

    fn user_line(u: &User) -> String {
        let role = u.role.map(|r| r.as_str()).unwrap_or("-");
        format!("{:<20} {:<28} {}", u.id, role, u.display_name)
    }

    fn print_lines(lines: Vec<String>) {
        if lines.is_empty() {
            println!("(none)");
        }
        for line in lines {
            println!("{}", line);
        }
    }
}

impl OutputHandler for ConsoleHandler {
    fn emit(&self, event: OutputEvent) {
        match event {
            OutputEvent::Opportunities { items } => {
                Self::print_lines(items.iter().map(Self::opportunity_line).collect());
            }
            OutputEvent::Opportunity { item } => {
                println!("{}", Self::opportunity_line(&item));
                if !item.description.is_empty() {
                    println!("  {}", item.description);
                }
                if !item.skills.is_empty() {
                    println!("  skills: {}", item.skills.join(", "));
                }
                for link in item.links.iter() {
                    println!("  link: {}", link);
                }
            }
            OutputEvent::Applications { items } => {
                Self::print_lines(items.iter().map(Self::application_line).collect());
            }
            OutputEvent::Reports { items } => {
                Self::print_lines(items.iter().map(Self::report_line).collect());
            }
            OutputEvent::Users { items } => {
                Self::print_lines(items.iter().map(Self::user_line).collect());
            }
            OutputEvent::Status {
                stats,
                seeded,
                demo_mode,
                demo_fallback_size,
                strict_references,
            } => {
                println!("users                       {}", stats.users);
                println!("projects                    {}", stats.projects);
                println!("student projects            {}", stats.student_projects);
                println!(
                    "organization opportunities  {}",
                    stats.organization_opportunities
                );
                println!("applications                {}", stats.applications);
                println!("reports                     {}", stats.reports);
                println!();
                println!("seeded: {}", seeded);
                println!("demo mode: {} (fallback size {})", demo_mode, demo_fallback_size);
                println!("strict references: {}", strict_references);
            }
            OutputEvent::NotFound { what, id } => {
                eprintln!("No {} with id '{}'", what, id);
            }
            OutputEvent::Info { message } => {
                eprintln!("{}", message);
            }
        }
    }
}

/// JSON output handler
pub struct JsonHandler {
    pretty: bool,
}

impl JsonHandler {
    /// Create a new JSON handler
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn print_json<T: Serialize>(&self, value: &T) {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };

        match json {
            Ok(s) => println!("{}", s),
            Err(e) => tracing::error!("failed to serialize output: {}", e),
        }
    }
}

impl OutputHandler for JsonHandler {
    fn emit(&self, event: OutputEvent) {
        self.print_json(&event);
    }
}

/// Prints bare record ids, one per line
pub struct QuietHandler;

impl OutputHandler for QuietHandler {
    fn emit(&self, event: OutputEvent) {
        let ids: Vec<&str> = match &event {
            OutputEvent::Opportunities { items } => items.iter().map(|o| o.id.as_str()).collect(),
            OutputEvent::Opportunity { item } => vec![item.id.as_str()],
            OutputEvent::Applications { items } => items.iter().map(|a| a.id.as_str()).collect(),
            OutputEvent::Reports { items } => items.iter().map(|r| r.id.as_str()).collect(),
            OutputEvent::Users { items } => items.iter().map(|u| u.id.as_str()).collect(),
            OutputEvent::Status { .. } | OutputEvent::NotFound { .. } | OutputEvent::Info { .. } => {
                Vec::new()
            }
        };
        for id in ids {
            println!("{}", id);
        }
    }
}

/// Create an output handler based on mode
pub fn create_handler(mode: OutputMode) -> Box<dyn OutputHandler> {
    match mode {
        OutputMode::Console => Box::new(ConsoleHandler),
        OutputMode::Json => Box::new(JsonHandler::new(true)),
        OutputMode::Quiet => Box::new(QuietHandler),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApplicationStatus, Recipient, Role};
    use chrono::Utc;

    #[test]
    fn test_output_mode_from_flags() {
        assert_eq!(OutputMode::from_flags(true, false), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(false, true), OutputMode::Quiet);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Console);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = OutputEvent::NotFound {
            what: "opportunity".into(),
            id: "proj_9".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "not_found");
        assert_eq!(value["id"], "proj_9");
    }

    #[test]
    fn test_application_line_shows_status() {
        let now = Utc::now();
        let app = Application {
            id: "app_1".into(),
            opportunity_id: "proj_1".into(),
            student_id: "student1".into(),
            student_name: "John Student".into(),
            opportunity_title: "Climate".into(),
            motivation: String::new(),
            drive_links: vec![],
            status: ApplicationStatus::Waitlisted,
            created_at: now,
            updated_at: now,
        };
        let line = ConsoleHandler::application_line(&app);
        assert!(line.starts_with("app_1"));
        assert!(line.contains("waitlisted  proj_1"));
    }

    #[test]
    fn test_report_line_pads_week() {
        let report = WeeklyReport {
            id: "report_8".into(),
            student_id: "student2".into(),
            student_name: "Sarah Johnson".into(),
            recipient: Recipient::TeachingAssistant("ta1".into()),
            recipient_name: "Emily Rodriguez".into(),
            project_id: None,
            week: 5,
            year: 2024,
            accomplishments: String::new(),
            challenges: String::new(),
            next_goals: String::new(),
            support_needed: String::new(),
            drive_link: String::new(),
            submitted_at: Utc::now(),
        };
        let line = ConsoleHandler::report_line(&report);
        assert!(line.contains("2024-W05"));
        assert!(line.contains("ta1"));
    }

    #[test]
    fn test_user_line_without_role() {
        let user = User {
            id: "user_1".into(),
            email: "new@example.com".into(),
            role: None,
            display_name: "new@example.com".into(),
            first_name: None,
            last_name: None,
        };
        assert!(ConsoleHandler::user_line(&user).contains(" - "));

        let ta = User {
            role: Some(Role::TeachingAssistant),
            ..user
        };
        assert!(ConsoleHandler::user_line(&ta).contains("ta"));
    }

    #[test]
    fn test_create_handler() {
        let _ = create_handler(OutputMode::Console);
        let _ = create_handler(OutputMode::Json);
        let _ = create_handler(OutputMode::Quiet);
    }
}
