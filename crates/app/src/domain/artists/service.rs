//! Artists service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::artists::{
        data::NewArtist,
        errors::ArtistsServiceError,
        records::{ArtistRecord, ArtistUuid},
        repository::PgArtistsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgArtistsService {
    db: Db,
    repository: PgArtistsRepository,
}

impl PgArtistsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgArtistsRepository::new(),
        }
    }
}

#[async_trait]
impl ArtistsService for PgArtistsService {
    async fn get_artist(&self, artist: ArtistUuid) -> Result<ArtistRecord, ArtistsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_artist(&mut tx, artist).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "artists.service.create_artist",
        skip(self, artist),
        fields(artist_uuid = %artist.uuid),
        err
    )]
    async fn create_artist(&self, artist: NewArtist) -> Result<ArtistRecord, ArtistsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self
            .repository
            .create_artist(&mut tx, artist.uuid, &artist.name)
            .await?;

        tx.commit().await?;

        info!(artist_uuid = %record.uuid, "created artist");

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait ArtistsService: Send + Sync {
    /// Retrieve a single artist.
    async fn get_artist(&self, artist: ArtistUuid) -> Result<ArtistRecord, ArtistsServiceError>;

    /// Register a new artist.
    async fn create_artist(&self, artist: NewArtist) -> Result<ArtistRecord, ArtistsServiceError>;
}
