//! Checkout line-item builder
//!
//! Turns a cart, a shipping selection and the buyer's draft into the line
//! items and metadata the payment processor's session API accepts. The
//! builder is pure; authoritative price checks and session submission live
//! server-side.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine},
    currency::CurrencyCode,
    session::CheckoutDraft,
    shipping::ShippingOption,
};

/// Longest value, in characters, the processor accepts for a metadata field.
pub const METADATA_VALUE_MAX_CHARS: usize = 500;

/// Errors from building a checkout payload.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The cart has no lines to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Two lines carry different currencies (first line's, offending line's).
    #[error("cart mixes currencies {0} and {1}")]
    MixedCurrency(CurrencyCode, CurrencyCode),
}

/// Per-line metadata forwarded to the processor.
///
/// Every field is always a present string; absent values are empty rather
/// than null, which is what the session API requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineItemMetadata {
    /// Catalog reference of the line.
    pub product_id: String,

    /// Composite sku, empty for variant-less lines.
    pub sku: String,

    /// Display colour name, empty when the line has none.
    pub color_label: String,

    /// Selected size, empty when the line has none.
    pub size: String,
}

/// One line item of a checkout session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLineItem {
    /// Units purchased.
    pub quantity: u32,

    /// Unit price in minor units.
    pub unit_amount_cents: u64,

    /// Currency of `unit_amount_cents`.
    pub currency: CurrencyCode,

    /// Name shown on the processor's checkout page.
    pub product_name: String,

    /// Line metadata.
    pub metadata: LineItemMetadata,
}

/// The complete input for a checkout session request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutPayload {
    /// One item per cart line, plus a shipping item when shipping costs
    /// anything.
    pub line_items: Vec<CheckoutLineItem>,

    /// Order-level metadata; every value is truncated to
    /// [`METADATA_VALUE_MAX_CHARS`].
    pub metadata: BTreeMap<String, String>,

    /// Subtotal plus shipping, in minor units.
    pub total_cents: u64,

    /// Currency shared by every line item.
    pub currency: CurrencyCode,
}

/// Truncates a metadata value to [`METADATA_VALUE_MAX_CHARS`] characters.
///
/// Truncation counts characters rather than bytes so multi-byte input can
/// never split mid-character.
#[must_use]
pub fn truncate_metadata_value(value: &str) -> String {
    value.chars().take(METADATA_VALUE_MAX_CHARS).collect()
}

/// Builds the processor payload for `cart` with the given shipping option
/// and buyer draft.
///
/// Shipping that costs nothing adds no line item. Order metadata carries
/// the buyer's contact and address fields plus the voucher code, each
/// truncated independently; cart lines are represented only through their
/// structured line metadata, never as serialised cart state.
///
/// # Errors
///
/// Returns [`BuildError::EmptyCart`] for an empty cart and
/// [`BuildError::MixedCurrency`] when lines disagree on currency.
pub fn build_payload(
    cart: &Cart,
    shipping: ShippingOption,
    draft: &CheckoutDraft,
) -> Result<CheckoutPayload, BuildError> {
    if cart.is_empty() {
        return Err(BuildError::EmptyCart);
    }

    let currency = cart.currency();

    for line in cart {
        if line.currency != currency {
            return Err(BuildError::MixedCurrency(currency, line.currency.clone()));
        }
    }

    let mut line_items: Vec<CheckoutLineItem> = cart.iter().map(cart_line_item).collect();

    if shipping.amount_cents > 0 {
        line_items.push(shipping_line_item(shipping, currency.clone()));
    }

    Ok(CheckoutPayload {
        line_items,
        metadata: order_metadata(draft, shipping),
        total_cents: cart.subtotal_cents().saturating_add(shipping.amount_cents),
        currency,
    })
}

fn cart_line_item(line: &CartLine) -> CheckoutLineItem {
    CheckoutLineItem {
        quantity: line.qty,
        unit_amount_cents: line.price_cents,
        currency: line.currency.clone(),
        product_name: line.title.clone(),
        metadata: LineItemMetadata {
            product_id: line.product_id.clone(),
            sku: line.sku().unwrap_or_default(),
            color_label: line.color_label.clone().unwrap_or_default(),
            size: line
                .variant
                .as_ref()
                .and_then(|variant| variant.size.clone())
                .unwrap_or_default(),
        },
    }
}

fn shipping_line_item(shipping: ShippingOption, currency: CurrencyCode) -> CheckoutLineItem {
    CheckoutLineItem {
        quantity: 1,
        unit_amount_cents: shipping.amount_cents,
        currency,
        product_name: format!("Shipping ({})", shipping.label),
        metadata: LineItemMetadata {
            product_id: "shipping".to_string(),
            sku: shipping.id.to_string(),
            color_label: String::new(),
            size: String::new(),
        },
    }
}

fn order_metadata(draft: &CheckoutDraft, shipping: ShippingOption) -> BTreeMap<String, String> {
    let field =
        |value: &Option<String>| truncate_metadata_value(value.as_deref().unwrap_or_default());

    BTreeMap::from([
        ("buyer_email".to_string(), field(&draft.email)),
        ("buyer_name".to_string(), field(&draft.name)),
        ("address_line1".to_string(), field(&draft.address_line1)),
        ("address_line2".to_string(), field(&draft.address_line2)),
        ("city".to_string(), field(&draft.city)),
        ("postal_code".to_string(), field(&draft.postal_code)),
        ("country".to_string(), field(&draft.country)),
        ("shipping".to_string(), shipping.id.to_string()),
        ("voucher".to_string(), field(&draft.voucher)),
    ])
}
