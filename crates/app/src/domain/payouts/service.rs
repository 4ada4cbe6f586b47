//! Payouts service.
//!
//! Aggregates an artist's unsettled order items into a cash-out. One
//! database transaction covers selection, snapshot and settlement, opened
//! under the per-artist advisory lock so concurrent runs for the same
//! artist serialize instead of double-paying.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        artists::records::ArtistUuid,
        orders::records::OrderItemUuid,
        payouts::{
            errors::PayoutsServiceError,
            records::{CashOutRecord, CashOutUuid},
            repository::PgPayoutsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPayoutsService {
    db: Db,
    repository: PgPayoutsRepository,
}

impl PgPayoutsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPayoutsRepository::new(),
        }
    }
}

#[async_trait]
impl PayoutsService for PgPayoutsService {
    #[tracing::instrument(
        name = "payouts.service.run_cash_out",
        skip(self),
        fields(artist_uuid = %artist),
        err
    )]
    async fn run_cash_out(
        &self,
        artist: ArtistUuid,
    ) -> Result<Option<CashOutRecord>, PayoutsServiceError> {
        let mut tx = self.db.begin_artist_transaction(artist).await?;

        let unsettled = self.repository.list_unsettled_items(&mut tx, artist).await?;

        if unsettled.is_empty() {
            tx.commit().await?;

            return Ok(None);
        }

        let mut amounts: Vec<(OrderItemUuid, u64)> = Vec::with_capacity(unsettled.len());
        let mut total_cents: u64 = 0;

        for item in &unsettled {
            let amount_cents = u64::from(item.qty)
                .checked_mul(item.artist_cut_cents)
                .ok_or(PayoutsServiceError::TotalOverflow)?;

            total_cents = total_cents
                .checked_add(amount_cents)
                .ok_or(PayoutsServiceError::TotalOverflow)?;

            amounts.push((item.uuid, amount_cents));
        }

        let mut cash_out = self
            .repository
            .create_cash_out(&mut tx, CashOutUuid::generate(), artist, total_cents)
            .await?;

        for (order_item, amount_cents) in &amounts {
            let item = self
                .repository
                .create_cash_out_item(&mut tx, cash_out.uuid, *order_item, artist, *amount_cents)
                .await?;

            cash_out.items.push(item);
        }

        let order_items: Vec<OrderItemUuid> =
            amounts.iter().map(|(order_item, _)| *order_item).collect();

        let settled = self
            .repository
            .settle_order_items(&mut tx, &order_items)
            .await?;

        // Every selected row is locked, so the flip count can only diverge
        // if the selection and the update disagree; abort rather than
        // record a partial settlement.
        let expected = order_items.len() as u64;
        if settled != expected {
            return Err(PayoutsServiceError::SettlementMismatch { expected, settled });
        }

        tx.commit().await?;

        info!(
            cash_out_uuid = %cash_out.uuid,
            total_cents = cash_out.total_cents,
            items = cash_out.items.len(),
            "settled cash-out"
        );

        Ok(Some(cash_out))
    }

    async fn outstanding_balance(&self, artist: ArtistUuid) -> Result<u64, PayoutsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let balance_cents = self.repository.outstanding_balance(&mut tx, artist).await?;

        tx.commit().await?;

        Ok(balance_cents)
    }

    async fn list_cash_outs(
        &self,
        artist: ArtistUuid,
    ) -> Result<Vec<CashOutRecord>, PayoutsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let cash_outs = self.repository.list_cash_outs(&mut tx, artist).await?;

        tx.commit().await?;

        Ok(cash_outs)
    }

    async fn get_cash_out(
        &self,
        artist: ArtistUuid,
        cash_out: CashOutUuid,
    ) -> Result<CashOutRecord, PayoutsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut record = self.repository.get_cash_out(&mut tx, cash_out, artist).await?;

        record.items = self
            .repository
            .list_cash_out_items(&mut tx, record.uuid)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "payouts.service.mark_paid",
        skip(self),
        fields(artist_uuid = %artist, cash_out_uuid = %cash_out),
        err
    )]
    async fn mark_paid(
        &self,
        artist: ArtistUuid,
        cash_out: CashOutUuid,
    ) -> Result<CashOutRecord, PayoutsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut record = self
            .repository
            .mark_cash_out_paid(&mut tx, cash_out, artist)
            .await?;

        record.items = self
            .repository
            .list_cash_out_items(&mut tx, record.uuid)
            .await?;

        tx.commit().await?;

        info!(cash_out_uuid = %record.uuid, "marked cash-out paid");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait PayoutsService: Send + Sync {
    /// Settles all of the artist's unsettled order items into one new
    /// cash-out. Returns `None` when there is nothing to settle.
    async fn run_cash_out(
        &self,
        artist: ArtistUuid,
    ) -> Result<Option<CashOutRecord>, PayoutsServiceError>;

    /// Sums the artist's unsettled cuts without settling anything.
    async fn outstanding_balance(&self, artist: ArtistUuid) -> Result<u64, PayoutsServiceError>;

    /// Retrieves the artist's cash-outs, newest first, without items.
    async fn list_cash_outs(
        &self,
        artist: ArtistUuid,
    ) -> Result<Vec<CashOutRecord>, PayoutsServiceError>;

    /// Retrieve a single cash-out together with its item snapshots.
    async fn get_cash_out(
        &self,
        artist: ArtistUuid,
        cash_out: CashOutUuid,
    ) -> Result<CashOutRecord, PayoutsServiceError>;

    /// Transitions a pending cash-out to paid. A cash-out that is not
    /// pending for this artist is reported as `NotFound`.
    async fn mark_paid(
        &self,
        artist: ArtistUuid,
        cash_out: CashOutUuid,
    ) -> Result<CashOutRecord, PayoutsServiceError>;
}
