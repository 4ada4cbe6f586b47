//! Products Repository

use backline::currency::CurrencyCode;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{try_get_cents, try_into_cents},
    domain::{
        artists::records::ArtistUuid,
        products::{
            data::{NewProduct, NewProductVariant},
            records::{ProductRecord, ProductUuid, ProductVariantRecord, ProductVariantUuid},
        },
    },
};

const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const CREATE_PRODUCT_VARIANT_SQL: &str = include_str!("sql/create_product_variant.sql");
const LIST_ARTIST_PRODUCTS_SQL: &str = include_str!("sql/list_artist_products.sql");
const LIST_PRODUCT_VARIANTS_SQL: &str = include_str!("sql/list_product_variants.sql");
const UPDATE_PRODUCT_PRICE_SQL: &str = include_str!("sql/update_product_price.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.artist_uuid.into_uuid())
            .bind(&product.title)
            .bind(try_into_cents(product.price_cents, "price_cents")?)
            .bind(product.currency.as_str())
            .bind(try_into_cents(product.artist_cut_cents, "artist_cut_cents")?)
            .bind(product.sizes.clone())
            .bind(product.front_image_path.as_deref())
            .bind(product.back_image_path.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: &NewProductVariant,
    ) -> Result<ProductVariantRecord, sqlx::Error> {
        query_as::<Postgres, ProductVariantRecord>(CREATE_PRODUCT_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(&variant.hex)
            .bind(&variant.label)
            .bind(variant.front_image_path.as_deref())
            .bind(variant.back_image_path.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_artist_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        artist: ArtistUuid,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_ARTIST_PRODUCTS_SQL)
            .bind(artist.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_product_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductVariantRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = products.iter().map(|product| product.into_uuid()).collect();

        query_as::<Postgres, ProductVariantRecord>(LIST_PRODUCT_VARIANTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_product_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        price_cents: u64,
        artist_cut_cents: u64,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_PRICE_SQL)
            .bind(product.into_uuid())
            .bind(try_into_cents(price_cents, "price_cents")?)
            .bind(try_into_cents(artist_cut_cents, "artist_cut_cents")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let currency: String = row.try_get("currency")?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            artist_uuid: ArtistUuid::from_uuid(row.try_get("artist_uuid")?),
            title: row.try_get("title")?,
            price_cents: try_get_cents(row, "price_cents")?,
            currency: CurrencyCode::new(&currency),
            artist_cut_cents: try_get_cents(row, "artist_cut_cents")?,
            sizes: row.try_get("sizes")?,
            front_image_path: row.try_get("front_image_path")?,
            back_image_path: row.try_get("back_image_path")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
            variants: Vec::new(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductVariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductVariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            hex: row.try_get("hex")?,
            label: row.try_get("label")?,
            front_image_path: row.try_get("front_image_path")?,
            back_image_path: row.try_get("back_image_path")?,
        })
    }
}
