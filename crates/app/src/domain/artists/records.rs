//! Artist Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Artist UUID
pub type ArtistUuid = TypedUuid<ArtistRecord>;

/// Artist Record
#[derive(Debug, Clone)]
pub struct ArtistRecord {
    pub uuid: ArtistUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
