//! SelectionRegistry — the catalog of earnings calls and the current pick.
//!
//! The selection is stored as an index into the catalog, so it can never
//! point at a company that isn't listed.

use std::collections::HashSet;

use advisor_proto::model::EarningsCallEntry;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("earnings-call catalog is empty")]
    Empty,
    #[error("company {0:?} appears more than once in the catalog")]
    Duplicate(String),
}

pub struct SelectionRegistry {
    entries: Vec<EarningsCallEntry>,
    selected: usize,
}

impl SelectionRegistry {
    /// Build the registry. An `initial` company missing from the catalog
    /// falls back to the first entry.
    pub fn new(entries: Vec<EarningsCallEntry>, initial: &str) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.company.as_str()) {
                return Err(CatalogError::Duplicate(entry.company.clone()));
            }
        }

        let selected = match entries.iter().position(|e| e.company == initial) {
            Some(idx) => idx,
            None => {
                warn!(
                    "initial company {:?} not in catalog, using {:?}",
                    initial, entries[0].company
                );
                0
            }
        };
        Ok(Self { entries, selected })
    }

    pub fn list_entries(&self) -> &[EarningsCallEntry] {
        &self.entries
    }

    /// Returns true when the selection actually changed.
    pub fn select(&mut self, company: &str) -> bool {
        match self.position(company) {
            Some(idx) if idx == self.selected => false,
            Some(idx) => {
                debug!("selection: {:?} -> {:?}", self.selected(), company);
                self.selected = idx;
                true
            }
            None => {
                warn!("select: unknown company {:?} ignored", company);
                false
            }
        }
    }

    pub fn selected(&self) -> &str {
        &self.entries[self.selected].company
    }

    pub fn selected_entry(&self) -> &EarningsCallEntry {
        &self.entries[self.selected]
    }

    pub fn position(&self, company: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.company == company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_proto::model::{default_catalog, CallStatus};

    fn registry() -> SelectionRegistry {
        SelectionRegistry::new(default_catalog(), "Innovation Labs").unwrap()
    }

    #[test]
    fn test_initial_selection() {
        let reg = registry();
        assert_eq!(reg.selected(), "Innovation Labs");
        assert_eq!(reg.selected_entry().status, CallStatus::Past);
        assert_eq!(reg.list_entries().len(), 3);
        assert_eq!(reg.list_entries()[0].company, "Tech Corp");
    }

    #[test]
    fn test_unknown_initial_falls_back_to_first() {
        let reg = SelectionRegistry::new(default_catalog(), "Nobody").unwrap();
        assert_eq!(reg.selected(), "Tech Corp");
    }

    #[test]
    fn test_empty_and_duplicate_catalogs_rejected() {
        assert_eq!(
            SelectionRegistry::new(Vec::new(), "x").err(),
            Some(CatalogError::Empty)
        );
        let mut entries = default_catalog();
        entries.push(EarningsCallEntry::new("Tech Corp", "9:00:00 AM", CallStatus::Past));
        assert_eq!(
            SelectionRegistry::new(entries, "Tech Corp").err(),
            Some(CatalogError::Duplicate("Tech Corp".to_string()))
        );
    }

    #[test]
    fn test_select_known_company() {
        let mut reg = registry();
        assert!(reg.select("Global Industries"));
        assert_eq!(reg.selected(), "Global Industries");
        assert!(!reg.select("Global Industries"));
        assert_eq!(reg.position("Global Industries"), Some(1));
    }

    #[test]
    fn test_select_unknown_company_is_noop() {
        let mut reg = registry();
        assert!(!reg.select("Acme Widgets"));
        assert_eq!(reg.selected(), "Innovation Labs");
        assert_eq!(reg.position("Acme Widgets"), None);
    }
}
