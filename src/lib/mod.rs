//! Implementations that are useful accross the whole project
//!
//! Money and identifiers, the expense ledger and flat-type registry,
//! the area-proportional allocation and the bills derived from it

pub mod bill;
pub mod entry;
pub mod ledger;
pub mod money;
pub mod registry;
pub mod session;
pub mod summary;
