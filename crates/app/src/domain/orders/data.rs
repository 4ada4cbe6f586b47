//! Orders Data

use backline::currency::CurrencyCode;

use crate::domain::{
    artists::records::ArtistUuid,
    orders::records::{OrderItemUuid, OrderUuid},
    products::records::ProductUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub buyer_email: String,
    pub total_cents: u64,
    pub currency: CurrencyCode,
    pub items: Vec<NewOrderItem>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub artist_uuid: ArtistUuid,
    pub qty: u32,
    pub unit_price_cents: u64,
}
