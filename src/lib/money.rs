//! Indian-locale rendering of money
//!
//! The last three digits form a group, every group above that has two
//! digits: `1,00,00,000` is one crore.

use std::fmt;

pub const SYMBOL: &str = "₹";

/// Digits of `n` with lakh/crore separators
pub fn group(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    // leading group is 1 or 2 digits long
    let lead = head.len() % 2;
    if lead > 0 {
        out.push_str(&head[..lead]);
    }
    for chunk in head.as_bytes()[lead..].chunks(2) {
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(std::str::from_utf8(chunk).unwrap_or_default());
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// Any displayable value prefixed by the rupee symbol
pub struct Rupees<T>(pub T);

impl<T: fmt::Display> fmt::Display for Rupees<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", SYMBOL, self.0)
    }
}
