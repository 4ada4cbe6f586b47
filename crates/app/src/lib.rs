//! Server-side domain and persistence modules for the marketplace core.

pub mod checkout;
pub mod context;
pub mod database;
pub mod domain;
pub mod gateway;

#[cfg(test)]
mod test;

mod uuids;
