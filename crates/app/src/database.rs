//! Database connection management

use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow, query};

use crate::domain::artists::records::ArtistUuid;

/// SQL taking a transaction-scoped advisory lock; releases at commit or
/// rollback.
const ARTIST_LOCK_SQL: &str = "SELECT pg_advisory_xact_lock($1)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a plain transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction holding the per-artist advisory lock.
    ///
    /// Used by settlement-style operations that must not run concurrently
    /// for the same artist. Callers for different artists proceed in
    /// parallel; a second caller for the same artist blocks until the first
    /// transaction ends.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or taking the lock
    /// fails.
    pub async fn begin_artist_transaction(
        &self,
        artist: ArtistUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        query(ARTIST_LOCK_SQL)
            .bind(artist_lock_key(artist))
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Fold an artist uuid into the signed 64-bit key space that
/// `pg_advisory_xact_lock` accepts.
///
/// XOR of the uuid's two halves; collisions between distinct artists only
/// cost a spurious wait, never a correctness problem.
#[must_use]
pub fn artist_lock_key(artist: ArtistUuid) -> i64 {
    let bits = artist.into_uuid().as_u128();

    (((bits >> 64) as u64) ^ (bits as u64)) as i64
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Read a `BIGINT` money column into unsigned cents.
pub(crate) fn try_get_cents(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let cents: i64 = row.try_get(col)?;

    u64::try_from(cents).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert unsigned cents into the `BIGINT` bind representation.
pub(crate) fn try_into_cents(cents: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(cents).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Read an `INTEGER` quantity column into an unsigned count.
pub(crate) fn try_get_qty(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    let qty: i32 = row.try_get(col)?;

    u32::try_from(qty).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

/// Convert an unsigned count into the `INTEGER` bind representation.
pub(crate) fn try_into_qty(qty: u32, col: &str) -> Result<i32, sqlx::Error> {
    i32::try_from(qty).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn lock_key_is_stable_per_artist() {
        let artist = ArtistUuid::from_uuid(Uuid::now_v7());

        assert_eq!(artist_lock_key(artist), artist_lock_key(artist));
    }

    #[test]
    fn lock_keys_differ_between_artists() {
        let a = ArtistUuid::generate();
        let b = ArtistUuid::generate();

        assert_ne!(artist_lock_key(a), artist_lock_key(b));
    }
}
