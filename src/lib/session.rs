use chrono::NaiveDate;

use crate::lib::{
    bill::{self, Bill},
    entry::Id,
    ledger::Ledger,
    registry::Registry,
    summary::{self, Allocation},
};

/// Identification of the society, printed on bills
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Society {
    pub name: Option<String>,
    /// informative only, never used in a computation
    pub flats: Option<u64>,
}

impl Society {
    /// Name to print, with a fallback when left blank
    pub fn display_name(&self, placeholder: &'static str) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => placeholder,
        }
    }
}

/// Everything the user has entered so far
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub society: Society,
    pub ledger: Ledger,
    pub registry: Registry,
}

impl Session {
    pub fn allocate(&self) -> Allocation {
        summary::allocate(&self.ledger, &self.registry)
    }

    /// Bill of one flat type against the current state
    ///
    /// `Ok(None)` for an unknown flat type or one without a share.
    pub fn bill(&self, id: Id, date: NaiveDate) -> askama::Result<Option<Bill>> {
        match self.registry.get(id) {
            Some(flat) => bill::render(&self.society, flat, &self.allocate(), &self.ledger, date),
            None => Ok(None),
        }
    }

    /// Flat type designated by `#id`, `id` or its name
    pub fn lookup(&self, key: &str) -> Option<Id> {
        let key = key.trim();
        let numeric = key.strip_prefix('#').unwrap_or(key);
        numeric
            .parse::<u64>()
            .ok()
            .map(Id)
            .filter(|id| self.registry.get(*id).is_some())
            .or_else(|| self.registry.find(key).map(|f| f.id))
    }
}
