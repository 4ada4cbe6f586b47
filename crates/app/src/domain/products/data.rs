//! Products Data

use backline::currency::CurrencyCode;

use crate::domain::{
    artists::records::ArtistUuid,
    products::records::{ProductUuid, ProductVariantUuid},
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub artist_uuid: ArtistUuid,
    pub title: String,
    pub price_cents: u64,
    pub currency: CurrencyCode,
    pub artist_cut_cents: u64,
    pub sizes: Vec<String>,
    pub front_image_path: Option<String>,
    pub back_image_path: Option<String>,
    pub variants: Vec<NewProductVariant>,
}

/// New Product Variant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductVariant {
    pub uuid: ProductVariantUuid,
    pub hex: String,
    pub label: String,
    pub front_image_path: Option<String>,
    pub back_image_path: Option<String>,
}

/// Product Pricing Update Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductPriceUpdate {
    pub price_cents: u64,
    pub artist_cut_cents: u64,
}
