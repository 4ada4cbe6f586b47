//! Backline
//!
//! Backline is the buyer-side commerce core of a print-on-demand merch marketplace: a variant-aware cart, versioned cart persistence, and the checkout line-item builder feeding the payment processor's session API.

pub mod cart;
pub mod checkout;
pub mod currency;
pub mod media;
pub mod session;
pub mod shipping;
pub mod storage;
pub mod variant;
