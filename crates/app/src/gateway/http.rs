//! HTTP client for the processor's hosted checkout-session endpoint.

use std::collections::BTreeMap;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gateway::{
    data::{CheckoutRedirect, SessionRequest},
    errors::GatewayError,
    secret::SecretKey,
};

/// Configuration for connecting to the payment processor.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Processor API address, e.g. `"https://api.processor.example"`.
    pub base_url: String,

    /// Secret API key sent as a bearer token.
    pub secret_key: SecretKey,

    /// Where the processor sends the buyer after a completed payment.
    pub success_url: String,

    /// Where the processor sends the buyer after an abandoned payment.
    pub cancel_url: String,
}

/// HTTP client for the processor's checkout-session API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    config: GatewayConfig,
    http: Client,
}

impl HttpPaymentGateway {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_session(
        &self,
        request: SessionRequest,
    ) -> Result<CheckoutRedirect, GatewayError> {
        let url = format!("{}/checkout/sessions", self.config.base_url);

        let body = serde_qs::to_string(&CreateSessionForm::new(&self.config, &request))?;

        let response = self
            .http
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.secret_key.as_str()),
            )
            .header("Idempotency-Key", Uuid::now_v7().to_string())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(GatewayError::UnexpectedResponse(format!(
                "session request failed with status {status}: {text}"
            )));
        }

        let parsed: SessionResponse = response.json().await?;

        let redirect_url = parsed.url.ok_or(GatewayError::MissingRedirectUrl)?;

        Ok(CheckoutRedirect {
            session_id: parsed.id,
            url: redirect_url,
        })
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session; returns where to send the buyer.
    ///
    /// One attempt per call. A fresh idempotency key is generated each
    /// time, so resubmission is the caller's decision.
    async fn create_session(
        &self,
        request: SessionRequest,
    ) -> Result<CheckoutRedirect, GatewayError>;
}

/// Form body in the processor's nested bracket encoding, e.g.
/// `line_items[0][price_data][unit_amount]=3900`.
#[derive(Debug, Serialize)]
struct CreateSessionForm<'a> {
    mode: &'static str,
    success_url: &'a str,
    cancel_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer_email: Option<&'a str>,
    metadata: &'a BTreeMap<String, String>,
    line_items: Vec<LineItemForm<'a>>,
}

impl<'a> CreateSessionForm<'a> {
    fn new(config: &'a GatewayConfig, request: &'a SessionRequest) -> Self {
        Self {
            mode: "payment",
            success_url: &config.success_url,
            cancel_url: &config.cancel_url,
            customer_email: request.customer_email.as_deref(),
            metadata: &request.payload.metadata,
            line_items: request
                .payload
                .line_items
                .iter()
                .map(|item| LineItemForm {
                    quantity: item.quantity,
                    price_data: PriceDataForm {
                        currency: item.currency.as_str(),
                        unit_amount: item.unit_amount_cents,
                        product_data: ProductDataForm {
                            name: &item.product_name,
                            metadata: ItemMetadataForm {
                                product_id: &item.metadata.product_id,
                                sku: &item.metadata.sku,
                                color_label: &item.metadata.color_label,
                                size: &item.metadata.size,
                            },
                        },
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LineItemForm<'a> {
    quantity: u32,
    price_data: PriceDataForm<'a>,
}

#[derive(Debug, Serialize)]
struct PriceDataForm<'a> {
    currency: &'a str,
    unit_amount: u64,
    product_data: ProductDataForm<'a>,
}

#[derive(Debug, Serialize)]
struct ProductDataForm<'a> {
    name: &'a str,
    metadata: ItemMetadataForm<'a>,
}

#[derive(Debug, Serialize)]
struct ItemMetadataForm<'a> {
    product_id: &'a str,
    sku: &'a str,
    color_label: &'a str,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}
