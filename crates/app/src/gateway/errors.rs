//! Payment gateway errors.

use thiserror::Error;

/// Errors that can occur when communicating with the payment processor.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// An HTTP transport or deserialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The session request body could not be form-encoded.
    #[error("encode error: {0}")]
    Encode(#[from] serde_qs::Error),

    /// The processor returned a non-2xx response or unexpected body.
    #[error("unexpected response from payment processor: {0}")]
    UnexpectedResponse(String),

    /// The created session carried no redirect URL.
    #[error("payment processor returned no redirect url")]
    MissingRedirectUrl,
}
