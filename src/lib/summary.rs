//! Area-proportional split of the monthly expenses
//!
//! `allocate` is recomputed from scratch on every call, there is no
//! cached state to invalidate when the ledger or registry change.

use std::collections::BTreeMap;

use crate::lib::{
    entry::{Amount, Id},
    ledger::Ledger,
    registry::Registry,
};

/// Computed charge of one flat type
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub name: String,
    pub area: u64,
    /// per-unit monthly charge, a whole number of rupees
    pub charge: Amount,
    pub count: u64,
}

impl Share {
    /// What all units of this type pay together
    pub fn collection(&self) -> Amount {
        self.charge * self.count
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    total: Amount,
    area: u64,
    units: u64,
    rate: Option<f64>,
    shares: BTreeMap<Id, Share>,
}

/// Split the ledger's total among the registry's flat types
///
/// When no area is registered at all (every count blank or zero)
/// the result has neither a rate nor any share.
pub fn allocate(ledger: &Ledger, registry: &Registry) -> Allocation {
    let total = ledger.total();
    let area = registry.total_area();
    let units = registry.total_units();
    let mut shares = BTreeMap::new();
    let rate = if area == 0 {
        None
    } else {
        let rate = total.as_f64() / area as f64;
        for flat in registry.iter() {
            let charge = (rate * flat.area as f64).round() as i64;
            shares.insert(
                flat.id,
                Share {
                    name: flat.name.clone(),
                    area: flat.area,
                    charge: Amount::from_rupees(charge),
                    count: flat.units(),
                },
            );
        }
        Some(rate)
    };
    tracing::debug!(%total, area, ?rate, flats = shares.len(), "allocated expenses");
    Allocation {
        total,
        area,
        units,
        rate,
        shares,
    }
}

impl Allocation {
    pub fn total(&self) -> Amount {
        self.total
    }

    /// Sum of units × carpet area
    pub fn area(&self) -> u64 {
        self.area
    }

    /// Rupees per square foot, if any area is registered
    pub fn rate(&self) -> Option<f64> {
        self.rate
    }

    /// Rate with two decimals, `0.00` when there is none
    pub fn rate_display(&self) -> String {
        format!("{:.2}", self.rate.unwrap_or(0.0))
    }

    pub fn get(&self, id: Id) -> Option<&Share> {
        self.shares.get(&id)
    }

    pub fn shares(&self) -> impl Iterator<Item = (Id, &Share)> {
        self.shares.iter().map(|(id, s)| (*id, s))
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of every flat's charge, which rounding may pull away from `total`
    pub fn collection(&self) -> Amount {
        self.shares.values().map(Share::collection).sum()
    }

    /// Collected minus spent
    pub fn drift(&self) -> Amount {
        self.collection() - self.total
    }

    /// Units of every flat type, including those left out of the shares
    pub fn total_units(&self) -> u64 {
        self.units
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn society(expenses: &[(&str, i64)], flats: &[(&str, Option<u64>, u64)]) -> (Ledger, Registry) {
        let mut ledger = Ledger::empty();
        for (name, rupees) in expenses {
            ledger.push(name, Some(Amount::from_rupees(*rupees)));
        }
        let mut registry = Registry::empty();
        for (name, count, area) in flats {
            registry.push(name, *count, *area);
        }
        (ledger, registry)
    }

    #[test]
    fn staff_and_water() {
        let (ledger, registry) = society(
            &[("Staff", 10000), ("Water", 2000)],
            &[("1BHK", Some(2), 600), ("2BHK", Some(1), 900)],
        );
        let alloc = allocate(&ledger, &registry);
        assert_eq!(alloc.total(), Amount::from_rupees(12000));
        assert_eq!(alloc.area(), 2100);
        assert!((alloc.rate().unwrap() - 5.714_285).abs() < 1e-5);
        assert_eq!(alloc.rate_display(), "5.71");
        let charges = alloc.shares().map(|(_, s)| s.charge).collect::<Vec<_>>();
        assert_eq!(charges, vec![Amount::from_rupees(3429), Amount::from_rupees(5143)]);
        assert_eq!(alloc.collection(), Amount::from_rupees(12001));
        assert_eq!(alloc.drift(), Amount::from_rupees(1));
        assert_eq!(alloc.total_units(), 3);
    }

    #[test]
    fn no_area_no_shares() {
        let (ledger, registry) = society(
            &[("Staff", 10000)],
            &[("1BHK", None, 600), ("2BHK", Some(0), 900)],
        );
        let alloc = allocate(&ledger, &registry);
        assert!(alloc.is_empty());
        assert_eq!(alloc.rate(), None);
        assert_eq!(alloc.rate_display(), "0.00");
        assert_eq!(alloc.collection(), Amount::ZERO);
        assert_eq!(alloc.total(), Amount::from_rupees(10000));
    }

    #[test]
    fn units_counted_without_area() {
        let (ledger, registry) = society(
            &[("Staff", 10000)],
            &[("1BHK", Some(10), 0), ("2BHK", Some(5), 0), ("3BHK", Some(2), 0)],
        );
        let alloc = allocate(&ledger, &registry);
        assert!(alloc.is_empty());
        assert_eq!(alloc.total_units(), 17);
    }

    #[test]
    fn huge_inputs_do_not_overflow() {
        let (ledger, registry) = society(
            &[("Staff", i64::MAX), ("Water", i64::MAX)],
            &[("1BHK", Some(u64::MAX), 600), ("Empty", None, u64::MAX)],
        );
        let alloc = allocate(&ledger, &registry);
        assert_eq!(alloc.total(), Amount(i64::MAX));
        assert_eq!(alloc.total_units(), u64::MAX);
        assert!(alloc.collection() >= Amount::ZERO);
        let _ = alloc.drift();
    }

    #[test]
    fn unoccupied_types_still_priced() {
        let (ledger, registry) = society(
            &[("Lift", 3000)],
            &[("1BHK", Some(5), 600), ("Penthouse", None, 2400)],
        );
        let alloc = allocate(&ledger, &registry);
        let penthouse = alloc.shares().map(|(_, s)| s).find(|s| s.name == "Penthouse").unwrap();
        assert_eq!(penthouse.count, 0);
        assert_eq!(penthouse.charge, Amount::from_rupees(2400));
        assert_eq!(penthouse.collection(), Amount::ZERO);
    }

    #[test]
    fn rate_is_recovered_from_charges() {
        let (ledger, registry) = society(
            &[("Staff", 48_500), ("Water", 7_250), ("Security", 31_000), ("Fund", 5_000)],
            &[("1BHK", Some(14), 580), ("2BHK", Some(22), 865), ("3BHK", Some(9), 1_240)],
        );
        let alloc = allocate(&ledger, &registry);
        let rate = alloc.rate().unwrap();
        let weighted = alloc
            .shares()
            .map(|(_, s)| s.charge.as_f64() * s.count as f64)
            .sum::<f64>();
        let recovered = weighted / alloc.area() as f64;
        // each unit is off by at most half a rupee
        assert!((recovered - rate).abs() <= 0.5 * alloc.total_units() as f64 / alloc.area() as f64);
    }

    #[test]
    fn allocation_is_pure() {
        let (ledger, registry) = society(
            &[("Staff", 10000), ("Water", 2000)],
            &[("1BHK", Some(2), 600), ("2BHK", Some(1), 900)],
        );
        assert_eq!(allocate(&ledger, &registry), allocate(&ledger, &registry));
    }

    #[test]
    fn fractional_expenses() {
        let mut ledger = Ledger::empty();
        ledger.push("Water", Some(Amount(100_070)));
        ledger.push("Blank", None);
        let mut registry = Registry::empty();
        registry.push("Studio", Some(1), 1000);
        let alloc = allocate(&ledger, &registry);
        assert!((alloc.rate().unwrap() - 1.0007).abs() < 1e-9);
        assert_eq!(alloc.collection(), Amount::from_rupees(1001));
    }
}
