//! Product Records

use backline::currency::CurrencyCode;
use jiff::Timestamp;

use crate::{domain::artists::records::ArtistUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
///
/// `price_cents` is the buyer-facing unit price; `artist_cut_cents` is the
/// artist's per-unit revenue share, snapshotted onto cash-out items at
/// settlement time.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub artist_uuid: ArtistUuid,
    pub title: String,
    pub price_cents: u64,
    pub currency: CurrencyCode,
    pub artist_cut_cents: u64,
    pub sizes: Vec<String>,
    pub front_image_path: Option<String>,
    pub back_image_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
    pub variants: Vec<ProductVariantRecord>,
}

/// Product Variant UUID
pub type ProductVariantUuid = TypedUuid<ProductVariantRecord>;

/// Product Variant Record
///
/// One colourway of a product; sizes are a product-level list, so a variant
/// is a colour with its own imagery rather than a full size-colour matrix.
#[derive(Debug, Clone)]
pub struct ProductVariantRecord {
    pub uuid: ProductVariantUuid,
    pub product_uuid: ProductUuid,
    pub hex: String,
    pub label: String,
    pub front_image_path: Option<String>,
    pub back_image_path: Option<String>,
}
