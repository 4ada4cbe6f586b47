//! Checkout service errors.

use backline::checkout::BuildError;
use thiserror::Error;

use crate::{domain::products::ProductsServiceError, gateway::GatewayError};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("no shipping option selected")]
    ShippingNotSelected,

    #[error("unknown shipping option {0:?}")]
    UnknownShippingOption(String),

    #[error("product {product_id:?} is no longer available")]
    ProductUnavailable { product_id: String },

    #[error("the price of product {product_id:?} changed, refresh the cart")]
    PriceChanged { product_id: String },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("catalog error")]
    Products(#[source] ProductsServiceError),

    #[error("payment gateway error")]
    Gateway(#[from] GatewayError),
}
