//! Payment gateway client.

mod data;
mod errors;
mod http;
mod secret;

pub use data::*;
pub use errors::GatewayError;
pub use http::*;
pub use secret::*;
