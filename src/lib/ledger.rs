//! Ordered list of the society's monthly expenses

use num_traits::FromPrimitive;

use crate::lib::entry::{Amount, Counter, Expense, Id, Staple};

#[derive(Debug, Clone)]
pub struct Ledger {
    items: Vec<Expense>,
    ids: Counter,
}

impl Ledger {
    /// Removal is refused once the ledger is this short
    pub const FLOOR: usize = 5;

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            ids: Counter::new(),
        }
    }

    /// Append an expense with a blank amount
    ///
    /// Refused if the name is blank.
    pub fn add<S>(&mut self, name: S) -> Option<Id>
    where
        S: AsRef<str>,
    {
        self.push(name, None)
    }

    /// Append an expense with its amount
    pub fn push<S>(&mut self, name: S, amount: Option<Amount>) -> Option<Id>
    where
        S: AsRef<str>,
    {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return None;
        }
        let id = self.ids.issue();
        self.items.push(Expense {
            id,
            name: name.to_string(),
            amount,
        });
        Some(id)
    }

    /// Overwrite the amount of an expense, `false` if there is no such expense
    pub fn set_amount(&mut self, id: Id, amount: Option<Amount>) -> bool {
        match self.items.iter_mut().find(|e| e.id == id) {
            Some(e) => {
                e.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Delete an expense
    ///
    /// No-op returning `false` if the ledger is already at its floor
    /// or the expense does not exist.
    pub fn remove(&mut self, id: Id) -> bool {
        if self.items.len() <= Self::FLOOR {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|e| e.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: Id) -> Option<&Expense> {
        self.items.iter().find(|e| e.id == id)
    }

    pub fn total(&self) -> Amount {
        self.items.iter().map(Expense::value).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.items.iter()
    }

    /// Expenses that appear on a bill, i.e. those not left blank
    pub fn itemized(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.items
            .iter()
            .filter_map(|e| e.amount.map(|a| (e.name.as_str(), a)))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Ledger {
    /// The standard expense heads, all blank
    fn default() -> Self {
        let mut ledger = Self::empty();
        for staple in (0..Staple::COUNT).filter_map(Staple::from_usize) {
            ledger.add(staple.label());
        }
        ledger
    }
}
