//! Marketplace Domain Concerns

pub mod artists;
pub mod orders;
pub mod payouts;
pub mod products;
