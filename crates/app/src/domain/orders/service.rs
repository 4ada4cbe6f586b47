//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::orders::{
        data::NewOrder,
        errors::OrdersServiceError,
        records::{OrderRecord, OrderUuid},
        repository::PgOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(order_uuid = %order.uuid),
        err
    )]
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut created = self.repository.create_order(&mut tx, &order).await?;

        for item in &order.items {
            let item = self
                .repository
                .create_order_item(&mut tx, created.uuid, item)
                .await?;

            created.items.push(item);
        }

        tx.commit().await?;

        info!(
            order_uuid = %created.uuid,
            items = created.items.len(),
            total_cents = created.total_cents,
            "recorded order"
        );

        Ok(created)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let mut record = self.repository.get_order(&mut tx, order).await?;

        record.items = self.repository.list_order_items(&mut tx, record.uuid).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Records a fulfilled order together with its line items.
    async fn create_order(&self, order: NewOrder) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order together with its line items.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;
}
