//! Artists Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::artists::records::{ArtistRecord, ArtistUuid};

const GET_ARTIST_SQL: &str = include_str!("sql/get_artist.sql");
const CREATE_ARTIST_SQL: &str = include_str!("sql/create_artist.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgArtistsRepository;

impl PgArtistsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_artist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        artist: ArtistUuid,
    ) -> Result<ArtistRecord, sqlx::Error> {
        query_as::<Postgres, ArtistRecord>(GET_ARTIST_SQL)
            .bind(artist.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_artist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        artist: ArtistUuid,
        name: &str,
    ) -> Result<ArtistRecord, sqlx::Error> {
        query_as::<Postgres, ArtistRecord>(CREATE_ARTIST_SQL)
            .bind(artist.into_uuid())
            .bind(name)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ArtistRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ArtistUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
