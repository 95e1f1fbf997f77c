//! CLI command implementations

use super::output::{OutputEvent, OutputHandler};
use crate::config::CampusConfig;
use crate::model::Role;
use crate::store::{
    ApplicationFilter, OpportunityFilter, RelationshipStore, ReportFilter, SystemClock,
};
use anyhow::{Context, Result};
use tracing::debug;

/// Build the store described by `config`
pub fn build_store(config: &CampusConfig) -> Result<RelationshipStore> {
    let options = config.store_options();
    if config.seed_enabled() {
        RelationshipStore::seeded(options, Box::new(SystemClock)).context("loading demo data")
    } else {
        Ok(RelationshipStore::new(options))
    }
}

/// Register a demo session for `id` when a role hint was given
fn register_session(
    store: &mut RelationshipStore,
    id: Option<&str>,
    as_role: Option<Role>,
    flag: &str,
    handler: &dyn OutputHandler,
) {
    let Some(role) = as_role else {
        return;
    };
    match id {
        Some(id) => {
            debug!(user_id = id, %role, "registering demo session");
            store.begin_demo_session(id, role);
        }
        None => handler.emit(OutputEvent::Info {
            message: format!("--as-role has no effect without {}", flag),
        }),
    }
}

/// List every published opportunity
pub fn list_published(store: &RelationshipStore, handler: &dyn OutputHandler) {
    handler.emit(OutputEvent::Opportunities {
        items: store.list_published_opportunities(),
    });
}

/// Query opportunities
pub fn list_opportunities(
    store: &mut RelationshipStore,
    filter: OpportunityFilter,
    as_role: Option<Role>,
    handler: &dyn OutputHandler,
) {
    register_session(store, filter.owner_id.as_deref(), as_role, "--owner", handler);
    handler.emit(OutputEvent::Opportunities {
        items: store.query_opportunities(&filter),
    });
}

/// Query applications
pub fn list_applications(
    store: &mut RelationshipStore,
    filter: ApplicationFilter,
    as_role: Option<Role>,
    handler: &dyn OutputHandler,
) {
    register_session(store, filter.student_id.as_deref(), as_role, "--student", handler);
    handler.emit(OutputEvent::Applications {
        items: store.query_applications(&filter),
    });
}

/// Query weekly reports
pub fn list_reports(
    store: &mut RelationshipStore,
    filter: ReportFilter,
    as_role: Option<Role>,
    handler: &dyn OutputHandler,
) {
    register_session(store, filter.student_id.as_deref(), as_role, "--student", handler);
    handler.emit(OutputEvent::Reports {
        items: store.query_reports(&filter),
    });
}

/// Look an opportunity up by id; exit code 1 when it does not exist
pub fn resolve(store: &RelationshipStore, id: &str, handler: &dyn OutputHandler) -> i32 {
    match store.resolve_opportunity(id) {
        Some(opportunity) => {
            handler.emit(OutputEvent::Opportunity {
                item: opportunity.clone(),
            });
            0
        }
        None => {
            handler.emit(OutputEvent::NotFound {
                what: "opportunity".into(),
                id: id.to_string(),
            });
            1
        }
    }
}

/// List users who can receive weekly reports
pub fn list_recipients(store: &RelationshipStore, handler: &dyn OutputHandler) {
    handler.emit(OutputEvent::Users {
        items: store.list_report_recipients(),
    });
}

/// Report collection counts and the active store configuration
pub fn status(store: &RelationshipStore, config: &CampusConfig, handler: &dyn OutputHandler) {
    let options = store.options();
    handler.emit(OutputEvent::Status {
        stats: store.stats(),
        seeded: config.seed_enabled(),
        demo_mode: options.demo_mode,
        demo_fallback_size: options.demo_fallback_size,
        strict_references: options.strict_references,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApplicationStatus, Collection};
    use std::cell::RefCell;

    struct MockHandler {
        events: RefCell<Vec<OutputEvent>>,
    }

    impl MockHandler {
        fn new() -> Self {
            Self {
                events: RefCell::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<OutputEvent> {
            self.events.borrow().clone()
        }
    }

    impl OutputHandler for MockHandler {
        fn emit(&self, event: OutputEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    fn demo_store() -> RelationshipStore {
        build_store(&CampusConfig::defaults()).unwrap()
    }

    #[test]
    fn test_build_store_without_seed() {
        let mut config = CampusConfig::defaults();
        config.store.seed = Some(false);
        let store = build_store(&config).unwrap();
        assert_eq!(store.stats().users, 0);
    }

    #[test]
    fn test_list_published() {
        let store = demo_store();
        let handler = MockHandler::new();

        list_published(&store, &handler);

        match &handler.events()[..] {
            [OutputEvent::Opportunities { items }] => {
                assert_eq!(items.len(), 8);
                assert!(items.iter().all(|o| o.published));
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_as_role_enables_demo_fallback() {
        let mut store = demo_store();
        let handler = MockHandler::new();
        let filter = OpportunityFilter::default()
            .owner("user_demo")
            .collection(Collection::Organizations);

        list_opportunities(&mut store, filter, Some(Role::Organization), &handler);

        match &handler.events()[..] {
            [OutputEvent::Opportunities { items }] => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(|o| o.owner_id == "user_demo"));
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_as_role_without_owner_warns() {
        let mut store = demo_store();
        let handler = MockHandler::new();

        list_opportunities(
            &mut store,
            OpportunityFilter::default(),
            Some(Role::Professor),
            &handler,
        );

        let events = handler.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], OutputEvent::Info { .. }));
    }

    #[test]
    fn test_list_applications_by_status() {
        let mut store = demo_store();
        let handler = MockHandler::new();

        list_applications(
            &mut store,
            ApplicationFilter::default().status(ApplicationStatus::Pending),
            None,
            &handler,
        );

        match &handler.events()[..] {
            [OutputEvent::Applications { items }] => {
                let ids: Vec<_> = items.iter().map(|a| a.id.as_str()).collect();
                assert_eq!(ids, vec!["app_5", "app_2"]);
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_list_reports_for_recipient() {
        let mut store = demo_store();
        let handler = MockHandler::new();

        list_reports(
            &mut store,
            ReportFilter::default().recipient("professor_yousseri"),
            None,
            &handler,
        );

        match &handler.events()[..] {
            [OutputEvent::Reports { items }] => assert_eq!(items.len(), 2),
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_exit_codes() {
        let store = demo_store();
        let handler = MockHandler::new();

        assert_eq!(resolve(&store, "opp_3", &handler), 0);
        assert_eq!(resolve(&store, "opp_404", &handler), 1);

        let events = handler.events();
        assert!(matches!(events[0], OutputEvent::Opportunity { .. }));
        assert!(matches!(events[1], OutputEvent::NotFound { .. }));
    }

    #[test]
    fn test_recipients_and_status() {
        let store = demo_store();
        let handler = MockHandler::new();

        list_recipients(&store, &handler);
        status(&store, &CampusConfig::defaults(), &handler);

        let events = handler.events();
        match &events[0] {
            OutputEvent::Users { items } => assert_eq!(items.len(), 6),
            other => panic!("unexpected event: {:?}", other),
        }
        match &events[1] {
            OutputEvent::Status {
                stats, demo_mode, ..
            } => {
                assert_eq!(stats.reports, 10);
                assert!(*demo_mode);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
