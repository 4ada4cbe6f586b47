//! Order Records

use backline::currency::CurrencyCode;
use jiff::Timestamp;

use crate::{
    domain::{artists::records::ArtistUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
///
/// Orders are immutable once recorded; there is no update or soft-delete
/// path.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub buyer_email: String,
    pub total_cents: u64,
    pub currency: CurrencyCode,
    pub created_at: Timestamp,
    pub items: Vec<OrderItemRecord>,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
///
/// `unit_price_cents` is the buyer price snapshot at purchase time. The
/// artist's per-unit cut is not stored here; settlement reads it from the
/// product at aggregation time.
#[derive(Debug, Clone)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub artist_uuid: ArtistUuid,
    pub qty: u32,
    pub unit_price_cents: u64,
    pub cashed_out: bool,
}
