//! Value types shared by the ledger, the registry and the allocation
//!
//! Money is kept as an integer number of paise, counts and areas as plain
//! integers. User-typed text goes through `coerce_amount`/`coerce_count`,
//! which never fail: malformed input silently becomes zero.

use num_derive::FromPrimitive;
use std::{fmt, iter, ops};

/// A monetary value in paise (1/100 of a rupee)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub i64);

/// Largest count or area accepted from user input
pub const MAX_QUANTITY: u64 = 10_000_000;

impl Amount {
    pub const ZERO: Self = Self(0);
    /// Largest amount accepted from user input, one lakh crore rupees
    pub const MAX: Self = Self(100_000_000_000_000);

    /// Whole number of rupees
    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees.saturating_mul(100))
    }

    /// Nearest paisa of a floating-point number of rupees
    pub fn from_f64(rupees: f64) -> Self {
        Self((rupees * 100.0).round() as i64)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn nonzero(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Amount {
    /// Indian digit grouping, fractional part only when nonzero
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let (whole, frac) = (abs / 100, abs % 100);
        write!(f, "{}{}", sign, super::money::group(whole))?;
        match frac {
            0 => Ok(()),
            _ if frac % 10 == 0 => write!(f, ".{}", frac / 10),
            _ => write!(f, ".{:02}", frac),
        }
    }
}

impl ops::Add for Amount {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl ops::Sub for Amount {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl ops::Mul<u64> for Amount {
    type Output = Self;
    fn mul(self, n: u64) -> Self {
        let n = i64::try_from(n).unwrap_or(i64::MAX);
        Self(self.0.saturating_mul(n))
    }
}

impl iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

/// Session-unique identifier of an expense or a flat type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(pub u64);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("#{}", self.0))
    }
}

/// Monotonic source of `Id`s
#[derive(Debug, Clone)]
pub struct Counter {
    next: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn issue(&mut self) -> Id {
        let id = Id(self.next);
        self.next += 1;
        id
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// A named monthly expense
///
/// `amount: None` is a blank field: it weighs 0 in every total
/// but is left out of the itemized bill, whereas `Some(Amount::ZERO)`
/// is listed.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Id,
    pub name: String,
    pub amount: Option<Amount>,
}

impl Expense {
    /// Contribution to the total (blank counts as zero)
    pub fn value(&self) -> Amount {
        self.amount.unwrap_or(Amount::ZERO)
    }
}

/// A category of flats sharing the same carpet area
#[derive(Debug, Clone, PartialEq)]
pub struct FlatType {
    pub id: Id,
    pub name: String,
    /// number of units, blank counts as zero
    pub count: Option<u64>,
    /// carpet area in square feet
    pub area: u64,
}

impl FlatType {
    pub fn units(&self) -> u64 {
        self.count.unwrap_or(0)
    }

    /// Weight of this category in the total area
    pub fn weighted_area(&self) -> u64 {
        self.units().saturating_mul(self.area)
    }
}

/// Expense heads every society starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Staple {
    StaffSalaries = 0,
    WaterCharges,
    Electricity,
    Security,
    Lift,
    Garden,
    Cleaning,
    Repair,
    Insurance,
    SinkingFund,
}

impl Staple {
    pub const COUNT: usize = 10;

    pub fn label(self) -> &'static str {
        use Staple::*;
        match self {
            StaffSalaries => "Staff Salaries",
            WaterCharges => "Water Charges",
            Electricity => "Electricity (Common Areas)",
            Security => "Security Services",
            Lift => "Lift Maintenance",
            Garden => "Garden Maintenance",
            Cleaning => "Cleaning Supplies",
            Repair => "Repair & Maintenance",
            Insurance => "Insurance Premium",
            SinkingFund => "Sinking Fund",
        }
    }
}

/// Longest prefix of `s` that reads as a signed decimal number,
/// with an optional exponent when `fraction` is set
fn numeric_prefix(s: &str, fraction: bool) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if fraction && end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
            let mut exp = end + 1;
            if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
                exp += 1;
            }
            let digits = bytes[exp..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 0 {
                end = exp + digits;
            }
        }
    }
    &s[..end]
}

/// Read a typed-in amount
///
/// Whitespace-only text is blank. Otherwise the leading numeric part
/// is kept (`"12.5kg"` is 12.50, `"1e5"` is 1,00,000), anything unreadable
/// or negative becomes zero and anything above `Amount::MAX` is capped.
pub fn coerce_amount(raw: &str) -> Option<Amount> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value = numeric_prefix(raw, true).parse::<f64>().unwrap_or(0.0);
    if value.is_nan() || value <= 0.0 {
        Some(Amount::ZERO)
    } else {
        Some(Amount::from_f64(value.min(Amount::MAX.as_f64())))
    }
}

/// Read a typed-in count or area, same rules as `coerce_amount`
/// but truncated to the leading integer and capped at `MAX_QUANTITY`.
pub fn coerce_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value = numeric_prefix(raw, false).parse::<f64>().unwrap_or(0.0);
    if value.is_nan() || value <= 0.0 {
        Some(0)
    } else {
        Some(value.min(MAX_QUANTITY as f64) as u64)
    }
}
