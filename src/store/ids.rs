//! Type-prefixed, monotonically increasing identifiers

use crate::model::Collection;
use std::collections::HashMap;

/// Record family an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Project,
    StudentProject,
    Organization,
    Application,
    Report,
    User,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Project => "proj",
            IdKind::StudentProject => "student_proj",
            IdKind::Organization => "opp",
            IdKind::Application => "app",
            IdKind::Report => "report",
            IdKind::User => "user",
        }
    }
}

impl From<Collection> for IdKind {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Projects => IdKind::Project,
            Collection::StudentProjects => IdKind::StudentProject,
            Collection::Organizations => IdKind::Organization,
        }
    }
}

/// Largest suffix `observe` will move a counter to
const MAX_OBSERVED: u64 = u32::MAX as u64;

/// Per-kind counters
#[derive(Debug, Default)]
pub struct IdGenerator {
    counters: HashMap<IdKind, u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next identifier for `kind`
    pub fn next_id(&mut self, kind: IdKind) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        *counter += 1;
        format!("{}_{}", kind.prefix(), counter)
    }

    /// Record an identifier created elsewhere so generated ones never collide with it
    ///
    /// Suffixes above `MAX_OBSERVED` are ignored; counting up to them is out of reach anyway.
    pub fn observe(&mut self, kind: IdKind, id: &str) {
        let Some(number) = id
            .strip_prefix(kind.prefix())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.parse::<u64>().ok())
            .filter(|n| *n <= MAX_OBSERVED)
        else {
            return;
        };

        let counter = self.counters.entry(kind).or_insert(0);
        if number > *counter {
            *counter = number;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_is_prefixed_and_increments() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(IdKind::Project), "proj_1");
        assert_eq!(ids.next_id(IdKind::Project), "proj_2");
        assert_eq!(ids.next_id(IdKind::Application), "app_1");
    }

    #[test]
    fn test_observe_skips_past_seeded_ids() {
        let mut ids = IdGenerator::new();
        ids.observe(IdKind::Report, "report_10");
        ids.observe(IdKind::Report, "report_3");
        assert_eq!(ids.next_id(IdKind::Report), "report_11");
    }

    #[test]
    fn test_observe_ignores_foreign_ids() {
        let mut ids = IdGenerator::new();
        ids.observe(IdKind::Project, "student_proj_9");
        ids.observe(IdKind::Project, "proj_abc");
        ids.observe(IdKind::User, "student1");
        assert_eq!(ids.next_id(IdKind::Project), "proj_1");
        assert_eq!(ids.next_id(IdKind::User), "user_1");
    }

    #[test]
    fn test_observe_ignores_huge_suffixes() {
        let mut ids = IdGenerator::new();
        ids.observe(IdKind::User, "user_18446744073709551615");
        ids.observe(IdKind::User, "user_4294967296");
        assert_eq!(ids.next_id(IdKind::User), "user_1");

        ids.observe(IdKind::User, "user_4294967295");
        assert_eq!(ids.next_id(IdKind::User), "user_4294967296");
    }

    #[test]
    fn test_collection_kinds_have_distinct_prefixes() {
        let prefixes: Vec<_> = Collection::ALL
            .into_iter()
            .map(|c| IdKind::from(c).prefix())
            .collect();
        assert_eq!(prefixes, vec!["proj", "student_proj", "opp"]);
    }
}
