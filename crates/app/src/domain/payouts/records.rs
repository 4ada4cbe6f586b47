//! Payout Records

use std::fmt;

use jiff::Timestamp;

use crate::{
    domain::{artists::records::ArtistUuid, orders::records::OrderItemUuid},
    uuids::TypedUuid,
};

/// Cash Out UUID
pub type CashOutUuid = TypedUuid<CashOutRecord>;

/// Cash Out lifecycle state.
///
/// A cash-out is created `Pending` by the aggregator and moves to `Paid`
/// once the transfer has been made outside the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CashOutStatus {
    Pending,
    Paid,
}

impl CashOutStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for CashOutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cash Out Record
///
/// One settlement run for one artist. `total_cents` equals the sum of the
/// child items' `amount_cents`.
#[derive(Debug, Clone)]
pub struct CashOutRecord {
    pub uuid: CashOutUuid,
    pub artist_uuid: ArtistUuid,
    pub total_cents: u64,
    pub status: CashOutStatus,
    pub created_at: Timestamp,
    pub items: Vec<CashOutItemRecord>,
}

/// Cash Out Item UUID
pub type CashOutItemUuid = TypedUuid<CashOutItemRecord>;

/// Cash Out Item Record
///
/// Snapshot of one settled order item: `amount_cents` is
/// `qty * artist_cut_cents` as read at aggregation time. An order item is
/// referenced by at most one cash-out item, ever.
#[derive(Debug, Clone)]
pub struct CashOutItemRecord {
    pub uuid: CashOutItemUuid,
    pub cash_out_uuid: CashOutUuid,
    pub order_item_uuid: OrderItemUuid,
    pub artist_uuid: ArtistUuid,
    pub amount_cents: u64,
}
