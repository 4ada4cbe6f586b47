//! Integration test for the cart-to-checkout flow.
//!
//! Walks the reference scenario end to end: a buyer adds three units of a
//! 39.00 tee variant, picks standard shipping (10.00), and the builder must
//! produce two line items totalling 127.00:
//!
//! 1. Tour Tee (M / washed black), qty 3 at 3900 minor units
//! 2. Shipping (Standard shipping), qty 1 at 1000 minor units
//!
//! The same session state must survive a storage round trip first, since a
//! real buyer reloads the page between adding and paying.

use testresult::TestResult;

use backline::{
    cart::CartLine,
    checkout::build_payload,
    session::{CartSession, CheckoutDraft},
    shipping,
    storage::MemoryStorage,
    variant::VariantKey,
};

fn washed_black_tee() -> CartLine {
    CartLine::new("tour-tee", "Tour Tee", 39_00)
        .with_variant(VariantKey::new(Some("M"), Some("#1d1d1d")))
        .with_color_label("Washed Black")
}

#[test]
fn reference_checkout_totals() -> TestResult {
    let mut session = CartSession::open(MemoryStorage::new());

    session.add(washed_black_tee().with_qty(3));
    session.update_draft(|draft| {
        draft.email = Some("fan@example.com".to_string());
        draft.shipping_id = Some("standard".to_string());
    });

    // Reload, as a browser refresh would.
    let session = CartSession::open(session.into_storage());

    let shipping_id = session.draft().shipping_id.as_deref().unwrap_or_default();
    let shipping = shipping::by_id(shipping_id).expect("unknown shipping id");

    let payload = build_payload(session.cart(), shipping, session.draft())?;

    assert_eq!(payload.line_items.len(), 2);
    assert_eq!(payload.total_cents, 127_00);

    let tee = &payload.line_items[0];

    assert_eq!(tee.quantity, 3);
    assert_eq!(tee.unit_amount_cents, 39_00);
    assert_eq!(tee.metadata.sku, "tour-tee-M-1d1d1d");

    let post = &payload.line_items[1];

    assert_eq!(post.quantity, 1);
    assert_eq!(post.unit_amount_cents, 10_00);
    assert_eq!(post.product_name, "Shipping (Standard shipping)");

    Ok(())
}

#[test]
fn completed_order_leaves_no_stale_state() -> TestResult {
    let mut session = CartSession::open(MemoryStorage::new());

    session.add(washed_black_tee());
    session.complete_order();

    // A second "tab" over the same storage sees nothing.
    let other_tab = CartSession::open(session.into_storage());

    assert!(other_tab.cart().is_empty());
    assert_eq!(other_tab.draft(), &CheckoutDraft::default());

    Ok(())
}

#[test]
fn corrupt_persisted_cart_restores_as_empty() -> TestResult {
    use backline::session::CART_STORAGE_KEY;
    use backline::storage::Storage;

    let mut storage = MemoryStorage::new();
    storage.set(CART_STORAGE_KEY, "]]]garbage[[[")?;

    let session = CartSession::open(storage);

    assert!(session.cart().is_empty());

    Ok(())
}
