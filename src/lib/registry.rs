//! Ordered list of the flat categories of a society

use crate::lib::entry::{Counter, FlatType, Id};

#[derive(Debug, Clone)]
pub struct Registry {
    items: Vec<FlatType>,
    ids: Counter,
}

impl Registry {
    /// Removal is refused once the registry is this short
    pub const FLOOR: usize = 1;

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            ids: Counter::new(),
        }
    }

    /// Append a flat type with a blank unit count
    ///
    /// Refused if the name is blank or the area is missing.
    pub fn add<S>(&mut self, name: S, area: Option<u64>) -> Option<Id>
    where
        S: AsRef<str>,
    {
        self.push(name, None, area?)
    }

    /// Append a fully described flat type
    pub fn push<S>(&mut self, name: S, count: Option<u64>, area: u64) -> Option<Id>
    where
        S: AsRef<str>,
    {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return None;
        }
        let id = self.ids.issue();
        self.items.push(FlatType {
            id,
            name: name.to_string(),
            count,
            area,
        });
        Some(id)
    }

    fn get_mut(&mut self, id: Id) -> Option<&mut FlatType> {
        self.items.iter_mut().find(|f| f.id == id)
    }

    /// Rename, refused for blank names
    pub fn set_name<S>(&mut self, id: Id, name: S) -> bool
    where
        S: AsRef<str>,
    {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(f) => {
                f.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_count(&mut self, id: Id, count: Option<u64>) -> bool {
        match self.get_mut(id) {
            Some(f) => {
                f.count = count;
                true
            }
            None => false,
        }
    }

    /// Change the carpet area, a blank area is zero
    pub fn set_area(&mut self, id: Id, area: Option<u64>) -> bool {
        match self.get_mut(id) {
            Some(f) => {
                f.area = area.unwrap_or(0);
                true
            }
            None => false,
        }
    }

    /// Delete a flat type
    ///
    /// No-op returning `false` if it is the last one or does not exist.
    pub fn remove(&mut self, id: Id) -> bool {
        if self.items.len() <= Self::FLOOR {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|f| f.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: Id) -> Option<&FlatType> {
        self.items.iter().find(|f| f.id == id)
    }

    /// Case-insensitive lookup by name, first match wins
    pub fn find(&self, name: &str) -> Option<&FlatType> {
        let name = name.trim();
        self.items.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlatType> {
        self.items.iter()
    }

    /// Units of every type, whether or not they have an area
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(FlatType::units).fold(0, u64::saturating_add)
    }

    pub fn total_area(&self) -> u64 {
        self.items.iter().map(FlatType::weighted_area).fold(0, u64::saturating_add)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.add("1 BHK", Some(600));
        registry.add("2 BHK", Some(900));
        registry.add("3 BHK", Some(1200));
        registry
    }
}
