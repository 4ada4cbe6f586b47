//! Payouts

pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::PayoutsServiceError;
pub use service::*;
