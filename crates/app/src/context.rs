//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    checkout::CheckoutService,
    database::{self, Db},
    domain::{
        artists::{ArtistsService, PgArtistsService},
        orders::{OrdersService, PgOrdersService},
        payouts::{PayoutsService, PgPayoutsService},
        products::{PgProductsService, ProductsService},
    },
    gateway::{HttpPaymentGateway, PaymentGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub artists: Arc<dyn ArtistsService>,
    pub products: Arc<dyn ProductsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payouts: Arc<dyn PayoutsService>,
    pub checkout: CheckoutService,
}

impl AppContext {
    /// Build application context from a database URL and a gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        gateway: HttpPaymentGateway,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url).await.map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let gateway: Arc<dyn PaymentGateway> = Arc::new(gateway);

        Ok(Self {
            artists: Arc::new(PgArtistsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone())),
            payouts: Arc::new(PgPayoutsService::new(db)),
            checkout: CheckoutService::new(products.clone(), gateway),
            products,
        })
    }
}
