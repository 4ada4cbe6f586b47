//! Artist Data

use crate::domain::artists::records::ArtistUuid;

/// New Artist Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtist {
    pub uuid: ArtistUuid,
    pub name: String,
}
