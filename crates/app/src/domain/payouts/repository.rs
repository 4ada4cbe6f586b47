//! Payouts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{try_get_cents, try_get_qty, try_into_cents},
    domain::{
        artists::records::ArtistUuid,
        orders::records::OrderItemUuid,
        payouts::records::{
            CashOutItemRecord, CashOutItemUuid, CashOutRecord, CashOutStatus, CashOutUuid,
        },
    },
};

const LIST_UNSETTLED_ITEMS_SQL: &str = include_str!("sql/list_unsettled_items.sql");
const CREATE_CASH_OUT_SQL: &str = include_str!("sql/create_cash_out.sql");
const CREATE_CASH_OUT_ITEM_SQL: &str = include_str!("sql/create_cash_out_item.sql");
const SETTLE_ORDER_ITEMS_SQL: &str = include_str!("sql/settle_order_items.sql");
const OUTSTANDING_BALANCE_SQL: &str = include_str!("sql/outstanding_balance.sql");
const LIST_CASH_OUTS_SQL: &str = include_str!("sql/list_cash_outs.sql");
const GET_CASH_OUT_SQL: &str = include_str!("sql/get_cash_out.sql");
const LIST_CASH_OUT_ITEMS_SQL: &str = include_str!("sql/list_cash_out_items.sql");
const MARK_CASH_OUT_PAID_SQL: &str = include_str!("sql/mark_cash_out_paid.sql");

/// One settleable order item, joined to the product's current per-unit cut.
#[derive(Debug, Clone)]
pub(crate) struct UnsettledItem {
    pub(crate) uuid: OrderItemUuid,
    pub(crate) qty: u32,
    pub(crate) artist_cut_cents: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPayoutsRepository;

impl PgPayoutsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Locks and returns the artist's unsettled order items.
    pub(crate) async fn list_unsettled_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        artist: ArtistUuid,
    ) -> Result<Vec<UnsettledItem>, sqlx::Error> {
        query_as::<Postgres, UnsettledItem>(LIST_UNSETTLED_ITEMS_SQL)
            .bind(artist.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_cash_out(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cash_out: CashOutUuid,
        artist: ArtistUuid,
        total_cents: u64,
    ) -> Result<CashOutRecord, sqlx::Error> {
        query_as::<Postgres, CashOutRecord>(CREATE_CASH_OUT_SQL)
            .bind(cash_out.into_uuid())
            .bind(artist.into_uuid())
            .bind(try_into_cents(total_cents, "total_cents")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_cash_out_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cash_out: CashOutUuid,
        order_item: OrderItemUuid,
        artist: ArtistUuid,
        amount_cents: u64,
    ) -> Result<CashOutItemRecord, sqlx::Error> {
        query_as::<Postgres, CashOutItemRecord>(CREATE_CASH_OUT_ITEM_SQL)
            .bind(CashOutItemUuid::generate().into_uuid())
            .bind(cash_out.into_uuid())
            .bind(order_item.into_uuid())
            .bind(artist.into_uuid())
            .bind(try_into_cents(amount_cents, "amount_cents")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Flips `cashed_out` on the given rows; returns how many actually
    /// flipped.
    pub(crate) async fn settle_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_items: &[OrderItemUuid],
    ) -> Result<u64, sqlx::Error> {
        let uuids: Vec<Uuid> = order_items.iter().map(|item| item.into_uuid()).collect();

        let rows_affected = query(SETTLE_ORDER_ITEMS_SQL)
            .bind(uuids)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn outstanding_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        artist: ArtistUuid,
    ) -> Result<u64, sqlx::Error> {
        let balance: i64 = query_scalar(OUTSTANDING_BALANCE_SQL)
            .bind(artist.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(balance).map_err(|e| sqlx::Error::ColumnDecode {
            index: "balance_cents".to_string(),
            source: Box::new(e),
        })
    }

    pub(crate) async fn list_cash_outs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        artist: ArtistUuid,
    ) -> Result<Vec<CashOutRecord>, sqlx::Error> {
        query_as::<Postgres, CashOutRecord>(LIST_CASH_OUTS_SQL)
            .bind(artist.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_cash_out(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cash_out: CashOutUuid,
        artist: ArtistUuid,
    ) -> Result<CashOutRecord, sqlx::Error> {
        query_as::<Postgres, CashOutRecord>(GET_CASH_OUT_SQL)
            .bind(cash_out.into_uuid())
            .bind(artist.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_cash_out_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cash_out: CashOutUuid,
    ) -> Result<Vec<CashOutItemRecord>, sqlx::Error> {
        query_as::<Postgres, CashOutItemRecord>(LIST_CASH_OUT_ITEMS_SQL)
            .bind(cash_out.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn mark_cash_out_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cash_out: CashOutUuid,
        artist: ArtistUuid,
    ) -> Result<CashOutRecord, sqlx::Error> {
        query_as::<Postgres, CashOutRecord>(MARK_CASH_OUT_PAID_SQL)
            .bind(cash_out.into_uuid())
            .bind(artist.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

fn try_get_status(row: &PgRow, col: &str) -> Result<CashOutStatus, sqlx::Error> {
    let status: String = row.try_get(col)?;

    match status.as_str() {
        "pending" => Ok(CashOutStatus::Pending),
        "paid" => Ok(CashOutStatus::Paid),
        other => Err(sqlx::Error::ColumnDecode {
            index: col.to_string(),
            source: format!("unknown cash-out status {other:?}").into(),
        }),
    }
}

impl<'r> FromRow<'r, PgRow> for UnsettledItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            qty: try_get_qty(row, "qty")?,
            artist_cut_cents: try_get_cents(row, "artist_cut_cents")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CashOutRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CashOutUuid::from_uuid(row.try_get("uuid")?),
            artist_uuid: ArtistUuid::from_uuid(row.try_get("artist_uuid")?),
            total_cents: try_get_cents(row, "total_cents")?,
            status: try_get_status(row, "status")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            items: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for CashOutItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CashOutItemUuid::from_uuid(row.try_get("uuid")?),
            cash_out_uuid: CashOutUuid::from_uuid(row.try_get("cash_out_uuid")?),
            order_item_uuid: OrderItemUuid::from_uuid(row.try_get("order_item_uuid")?),
            artist_uuid: ArtistUuid::from_uuid(row.try_get("artist_uuid")?),
            amount_cents: try_get_cents(row, "amount_cents")?,
        })
    }
}
