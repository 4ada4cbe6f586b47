//! Products service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        artists::records::ArtistUuid,
        products::{
            data::{NewProduct, ProductPriceUpdate},
            errors::ProductsServiceError,
            records::{ProductRecord, ProductUuid, ProductVariantRecord},
            repository::PgProductsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

/// Distribute variant rows onto their parent products.
fn attach_variants(products: &mut [ProductRecord], variants: Vec<ProductVariantRecord>) {
    for variant in variants {
        if let Some(product) = products
            .iter_mut()
            .find(|product| product.uuid == variant.product_uuid)
        {
            product.variants.push(variant);
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut record = self.repository.get_product(&mut tx, product).await?;

        record.variants = self
            .repository
            .list_product_variants(&mut tx, &[record.uuid])
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_artist_products(
        &self,
        artist: ArtistUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut products = self
            .repository
            .list_artist_products(&mut tx, artist)
            .await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|product| product.uuid).collect();

        let variants = self
            .repository
            .list_product_variants(&mut tx, &uuids)
            .await?;

        tx.commit().await?;

        attach_variants(&mut products, variants);

        Ok(products)
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid, artist_uuid = %product.artist_uuid),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut created = self.repository.create_product(&mut tx, &product).await?;

        for variant in &product.variants {
            let variant = self
                .repository
                .create_product_variant(&mut tx, created.uuid, variant)
                .await?;

            created.variants.push(variant);
        }

        tx.commit().await?;

        info!(
            product_uuid = %created.uuid,
            variants = created.variants.len(),
            "created product"
        );

        Ok(created)
    }

    #[tracing::instrument(
        name = "products.service.update_product_price",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product_price(
        &self,
        product: ProductUuid,
        update: ProductPriceUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut updated = self
            .repository
            .update_product_price(&mut tx, product, update.price_cents, update.artist_cut_cents)
            .await?;

        updated.variants = self
            .repository
            .list_product_variants(&mut tx, &[updated.uuid])
            .await?;

        tx.commit().await?;

        info!(
            product_uuid = %updated.uuid,
            price_cents = updated.price_cents,
            artist_cut_cents = updated.artist_cut_cents,
            "updated product price"
        );

        Ok(updated)
    }

    #[tracing::instrument(
        name = "products.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(product_uuid = %product, "deleted product");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieve a single live product together with its colour variants.
    async fn get_product(
        &self,
        product: ProductUuid,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieves all live products belonging to an artist.
    async fn list_artist_products(
        &self,
        artist: ArtistUuid,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;

    /// Creates a product together with its colour variants.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Replaces a product's buyer price and artist cut.
    async fn update_product_price(
        &self,
        product: ProductUuid,
        update: ProductPriceUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft-deletes a product with the given UUID.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;
}
