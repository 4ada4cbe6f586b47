//! Checkout session service.
//!
//! Bridges the session-side cart to the payment processor: the cart's
//! price snapshots are advisory, so every line is revalidated against the
//! catalog before anything is sent to the gateway.

use std::sync::Arc;

use backline::{
    cart::{Cart, CartLine},
    checkout::build_payload,
    session::CheckoutDraft,
    shipping::{self, ShippingOption},
};
use tracing::info;
use uuid::Uuid;

use crate::{
    checkout::errors::CheckoutServiceError,
    domain::products::{ProductsService, ProductsServiceError, records::ProductUuid},
    gateway::{CheckoutRedirect, PaymentGateway, SessionRequest},
};

#[derive(Clone)]
pub struct CheckoutService {
    products: Arc<dyn ProductsService>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsService>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { products, gateway }
    }

    /// Open a hosted checkout session for the cart.
    ///
    /// Lines whose product is missing, soft-deleted, or priced differently
    /// than at add-time reject the whole session; the buyer resubmits after
    /// refreshing the cart.
    #[tracing::instrument(
        name = "checkout.service.create_session",
        skip_all,
        fields(lines = cart.line_count()),
        err
    )]
    pub async fn create_session(
        &self,
        cart: &Cart,
        draft: &CheckoutDraft,
    ) -> Result<CheckoutRedirect, CheckoutServiceError> {
        let shipping = resolve_shipping(draft)?;

        for line in cart {
            self.revalidate_line(line).await?;
        }

        let payload = build_payload(cart, shipping, draft)?;

        let request = SessionRequest {
            payload,
            customer_email: draft.email.clone(),
        };

        let redirect = self.gateway.create_session(request).await?;

        info!(session_id = %redirect.session_id, "created checkout session");

        Ok(redirect)
    }

    async fn revalidate_line(&self, line: &CartLine) -> Result<(), CheckoutServiceError> {
        let unavailable = || CheckoutServiceError::ProductUnavailable {
            product_id: line.product_id.clone(),
        };

        let uuid = Uuid::try_parse(&line.product_id).map_err(|_| unavailable())?;

        let product = match self
            .products
            .get_product(ProductUuid::from_uuid(uuid))
            .await
        {
            Ok(product) => product,
            Err(ProductsServiceError::NotFound) => return Err(unavailable()),
            Err(error) => return Err(CheckoutServiceError::Products(error)),
        };

        if product.price_cents != line.price_cents || product.currency != line.currency {
            return Err(CheckoutServiceError::PriceChanged {
                product_id: line.product_id.clone(),
            });
        }

        Ok(())
    }
}

fn resolve_shipping(draft: &CheckoutDraft) -> Result<ShippingOption, CheckoutServiceError> {
    let Some(id) = draft.shipping_id.as_deref() else {
        return Err(CheckoutServiceError::ShippingNotSelected);
    };

    shipping::by_id(id).ok_or_else(|| CheckoutServiceError::UnknownShippingOption(id.to_string()))
}

#[cfg(test)]
mod tests {
    use backline::{checkout::BuildError, currency::CurrencyCode};
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::{
        domain::{
            artists::records::ArtistUuid,
            products::{MockProductsService, records::ProductRecord},
        },
        gateway::{GatewayError, MockPaymentGateway},
    };

    use super::*;

    fn catalog_product(uuid: ProductUuid, price_cents: u64) -> ProductRecord {
        ProductRecord {
            uuid,
            artist_uuid: ArtistUuid::generate(),
            title: "Tour Tee".to_string(),
            price_cents,
            currency: CurrencyCode::default(),
            artist_cut_cents: 12_00,
            sizes: vec!["M".to_string()],
            front_image_path: None,
            back_image_path: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
            deleted_at: None,
            variants: Vec::new(),
        }
    }

    fn draft_with_shipping(id: &str) -> CheckoutDraft {
        CheckoutDraft {
            email: Some("fan@example.com".to_string()),
            shipping_id: Some(id.to_string()),
            ..CheckoutDraft::default()
        }
    }

    fn redirect() -> CheckoutRedirect {
        CheckoutRedirect {
            session_id: "cs_123".to_string(),
            url: "https://pay.example/cs_123".to_string(),
        }
    }

    #[tokio::test]
    async fn revalidated_cart_reaches_the_gateway() -> TestResult {
        let product_uuid = ProductUuid::generate();
        let product = catalog_product(product_uuid, 39_00);

        let mut products = MockProductsService::new();
        products
            .expect_get_product()
            .returning(move |_| Ok(product.clone()));

        // 3 x 3900 plus 1000 standard shipping.
        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_session()
            .withf(|request| {
                request.payload.total_cents == 127_00
                    && request.payload.line_items.len() == 2
                    && request.customer_email.as_deref() == Some("fan@example.com")
            })
            .returning(|_| Ok(redirect()));

        let service = CheckoutService::new(Arc::new(products), Arc::new(gateway));

        let mut cart = Cart::new();
        cart.add(CartLine::new(product_uuid.to_string(), "Tour Tee", 39_00).with_qty(3));

        let response = service
            .create_session(&cart, &draft_with_shipping("standard"))
            .await?;

        assert_eq!(response.url, "https://pay.example/cs_123");

        Ok(())
    }

    #[tokio::test]
    async fn price_drift_rejects_the_session() {
        let product_uuid = ProductUuid::generate();
        let product = catalog_product(product_uuid, 45_00);

        let mut products = MockProductsService::new();
        products
            .expect_get_product()
            .returning(move |_| Ok(product.clone()));

        let service =
            CheckoutService::new(Arc::new(products), Arc::new(MockPaymentGateway::new()));

        let mut cart = Cart::new();
        cart.add(CartLine::new(product_uuid.to_string(), "Tour Tee", 39_00));

        let result = service
            .create_session(&cart, &draft_with_shipping("standard"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::PriceChanged { .. })),
            "expected PriceChanged, got {result:?}"
        );
    }

    #[tokio::test]
    async fn currency_drift_rejects_the_session() {
        let product_uuid = ProductUuid::generate();
        let product = ProductRecord {
            currency: CurrencyCode::new("usd"),
            ..catalog_product(product_uuid, 39_00)
        };

        let mut products = MockProductsService::new();
        products
            .expect_get_product()
            .returning(move |_| Ok(product.clone()));

        let service =
            CheckoutService::new(Arc::new(products), Arc::new(MockPaymentGateway::new()));

        let mut cart = Cart::new();
        cart.add(CartLine::new(product_uuid.to_string(), "Tour Tee", 39_00));

        let result = service
            .create_session(&cart, &draft_with_shipping("standard"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::PriceChanged { .. })),
            "expected PriceChanged, got {result:?}"
        );
    }

    #[tokio::test]
    async fn missing_product_rejects_the_session() {
        let mut products = MockProductsService::new();
        products
            .expect_get_product()
            .returning(|_| Err(ProductsServiceError::NotFound));

        let service =
            CheckoutService::new(Arc::new(products), Arc::new(MockPaymentGateway::new()));

        let mut cart = Cart::new();
        cart.add(CartLine::new(
            ProductUuid::generate().to_string(),
            "Tour Tee",
            39_00,
        ));

        let result = service
            .create_session(&cart, &draft_with_shipping("standard"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::ProductUnavailable { .. })),
            "expected ProductUnavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn malformed_product_reference_rejects_the_session() {
        let service = CheckoutService::new(
            Arc::new(MockProductsService::new()),
            Arc::new(MockPaymentGateway::new()),
        );

        let mut cart = Cart::new();
        cart.add(CartLine::new("tour-tee", "Tour Tee", 39_00));

        let result = service
            .create_session(&cart, &draft_with_shipping("standard"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::ProductUnavailable { .. })),
            "expected ProductUnavailable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unknown_shipping_id_rejects_the_session() {
        let service = CheckoutService::new(
            Arc::new(MockProductsService::new()),
            Arc::new(MockPaymentGateway::new()),
        );

        let mut cart = Cart::new();
        cart.add(CartLine::new("tee", "Tee", 10_00));

        let result = service
            .create_session(&cart, &draft_with_shipping("overnight"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::UnknownShippingOption(id)) if id == "overnight"),
            "expected UnknownShippingOption"
        );
    }

    #[tokio::test]
    async fn missing_shipping_selection_rejects_the_session() {
        let service = CheckoutService::new(
            Arc::new(MockProductsService::new()),
            Arc::new(MockPaymentGateway::new()),
        );

        let mut cart = Cart::new();
        cart.add(CartLine::new("tee", "Tee", 10_00));

        let result = service
            .create_session(&cart, &CheckoutDraft::default())
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::ShippingNotSelected)),
            "expected ShippingNotSelected, got {result:?}"
        );
    }

    #[tokio::test]
    async fn empty_cart_fails_before_the_gateway() {
        let mut gateway = MockPaymentGateway::new();
        gateway.expect_create_session().never();

        let service = CheckoutService::new(Arc::new(MockProductsService::new()), Arc::new(gateway));

        let result = service
            .create_session(&Cart::new(), &draft_with_shipping("standard"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::Build(BuildError::EmptyCart))),
            "expected EmptyCart, got {result:?}"
        );
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_to_the_caller() {
        let product_uuid = ProductUuid::generate();
        let product = catalog_product(product_uuid, 39_00);

        let mut products = MockProductsService::new();
        products
            .expect_get_product()
            .returning(move |_| Ok(product.clone()));

        let mut gateway = MockPaymentGateway::new();
        gateway
            .expect_create_session()
            .returning(|_| Err(GatewayError::MissingRedirectUrl));

        let service = CheckoutService::new(Arc::new(products), Arc::new(gateway));

        let mut cart = Cart::new();
        cart.add(CartLine::new(product_uuid.to_string(), "Tour Tee", 39_00));

        let result = service
            .create_session(&cart, &draft_with_shipping("standard"))
            .await;

        assert!(
            matches!(result, Err(CheckoutServiceError::Gateway(_))),
            "expected Gateway, got {result:?}"
        );
    }
}
