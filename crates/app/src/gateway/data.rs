//! Payment gateway request and response data.

use backline::checkout::CheckoutPayload;

/// One checkout-session creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    /// Line items and order metadata from the checkout builder.
    pub payload: CheckoutPayload,

    /// Buyer email to prefill on the hosted payment page.
    pub customer_email: Option<String>,
}

/// Where to send the buyer after session creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRedirect {
    /// Processor-side session identifier.
    pub session_id: String,

    /// Hosted payment page URL.
    pub url: String,
}
