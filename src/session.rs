//! Cart persistence and the session controller
//!
//! Cart contents and the in-progress checkout draft persist under versioned,
//! namespaced keys. The payload shape is versioned through the key itself:
//! a breaking change bumps the key suffix and older payloads simply restore
//! as empty, which is the same lenient path taken for corrupt data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartLine, LineLookup},
    storage::{Storage, StorageError},
};

/// Storage key for persisted cart contents.
pub const CART_STORAGE_KEY: &str = "backline.cart.v1";

/// Storage key for the persisted checkout draft.
pub const CHECKOUT_STORAGE_KEY: &str = "backline.checkout.v1";

/// Errors from persisting cart or draft state.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The storage backend failed.
    #[error("storage error")]
    Storage(#[from] StorageError),

    /// The payload could not be encoded.
    #[error("payload encoding failed")]
    Encode(#[from] serde_json::Error),
}

/// Buyer-entered checkout state that survives a page reload.
///
/// Only the shipping option id is stored; the option itself resolves through
/// [`crate::shipping::by_id`] at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDraft {
    /// Buyer email address.
    #[serde(default)]
    pub email: Option<String>,

    /// Buyer full name.
    #[serde(default)]
    pub name: Option<String>,

    /// First address line.
    #[serde(default)]
    pub address_line1: Option<String>,

    /// Second address line.
    #[serde(default)]
    pub address_line2: Option<String>,

    /// City or town.
    #[serde(default)]
    pub city: Option<String>,

    /// Postal or zip code.
    #[serde(default)]
    pub postal_code: Option<String>,

    /// Country name or code as entered.
    #[serde(default)]
    pub country: Option<String>,

    /// Selected shipping option id.
    #[serde(default)]
    pub shipping_id: Option<String>,

    /// Voucher code as entered; forwarded in order metadata, never priced
    /// locally.
    #[serde(default)]
    pub voucher: Option<String>,
}

/// Loads the persisted cart, or an empty cart when the key is absent or the
/// payload does not parse.
///
/// Restored lines replay through [`Cart::add`], so key uniqueness and
/// quantity clamping hold even when the stored payload was tampered with.
#[must_use]
pub fn load_cart<S: Storage>(storage: &S) -> Cart {
    let Ok(Some(raw)) = storage.get(CART_STORAGE_KEY) else {
        return Cart::new();
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => Cart::from_lines(cart.into_lines()),
        Err(_) => Cart::new(),
    }
}

/// Persists the cart under [`CART_STORAGE_KEY`].
///
/// # Errors
///
/// Returns a [`PersistError`] when encoding or the storage write fails.
pub fn save_cart<S: Storage>(storage: &mut S, cart: &Cart) -> Result<(), PersistError> {
    let payload = serde_json::to_string(cart)?;

    storage.set(CART_STORAGE_KEY, &payload)?;

    Ok(())
}

/// Loads the persisted checkout draft, or the default draft when absent or
/// unparseable.
#[must_use]
pub fn load_draft<S: Storage>(storage: &S) -> CheckoutDraft {
    let Ok(Some(raw)) = storage.get(CHECKOUT_STORAGE_KEY) else {
        return CheckoutDraft::default();
    };

    serde_json::from_str(&raw).unwrap_or_default()
}

/// Persists the checkout draft under [`CHECKOUT_STORAGE_KEY`].
///
/// # Errors
///
/// Returns a [`PersistError`] when encoding or the storage write fails.
pub fn save_draft<S: Storage>(storage: &mut S, draft: &CheckoutDraft) -> Result<(), PersistError> {
    let payload = serde_json::to_string(draft)?;

    storage.set(CHECKOUT_STORAGE_KEY, &payload)?;

    Ok(())
}

/// Removes both persisted keys.
///
/// Clearing storage is deliberately separate from clearing an in-memory
/// cart: after order completion every tab's stale copy must die, not just
/// the one that checked out.
///
/// # Errors
///
/// Returns a [`StorageError`] when a removal fails.
pub fn clear_storage<S: Storage>(storage: &mut S) -> Result<(), StorageError> {
    storage.remove(CART_STORAGE_KEY)?;
    storage.remove(CHECKOUT_STORAGE_KEY)?;

    Ok(())
}

/// A session-scoped cart with write-through persistence.
///
/// Every mutation persists the new state immediately. Persistence failures
/// are swallowed; the in-memory cart stays authoritative for the session
/// and the next successful write repairs the stored copy.
#[derive(Debug)]
pub struct CartSession<S: Storage> {
    storage: S,
    cart: Cart,
    draft: CheckoutDraft,
}

impl<S: Storage> CartSession<S> {
    /// Opens a session over `storage`, restoring any persisted state.
    #[must_use]
    pub fn open(storage: S) -> Self {
        let cart = load_cart(&storage);
        let draft = load_draft(&storage);

        Self {
            storage,
            cart,
            draft,
        }
    }

    /// The current cart.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current checkout draft.
    #[must_use]
    pub fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    /// Adds a line to the cart and persists.
    pub fn add(&mut self, line: CartLine) {
        self.cart.add(line);
        self.persist_cart();
    }

    /// Sets a line's quantity and persists. Returns `false` when no line
    /// matched.
    pub fn set_qty(&mut self, lookup: &LineLookup, qty: u32) -> bool {
        let matched = self.cart.set_qty(lookup, qty);

        if matched {
            self.persist_cart();
        }

        matched
    }

    /// Removes a line and persists. Returns `false` when no line matched.
    pub fn remove(&mut self, lookup: &LineLookup) -> bool {
        let matched = self.cart.remove(lookup);

        if matched {
            self.persist_cart();
        }

        matched
    }

    /// Empties the cart and persists the empty state.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist_cart();
    }

    /// Applies `update` to the checkout draft and persists it.
    pub fn update_draft(&mut self, update: impl FnOnce(&mut CheckoutDraft)) {
        update(&mut self.draft);
        save_draft(&mut self.storage, &self.draft).ok();
    }

    /// Completes the order: clears the cart and draft in memory and removes
    /// both persisted keys.
    pub fn complete_order(&mut self) {
        self.cart.clear();
        self.draft = CheckoutDraft::default();
        clear_storage(&mut self.storage).ok();
    }

    /// Consumes the session, yielding the storage backend.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist_cart(&mut self) {
        save_cart(&mut self.storage, &self.cart).ok();
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    fn tee_line() -> CartLine {
        CartLine::new("tour-tee", "Tour Tee", 39_00)
    }

    #[test]
    fn load_cart_with_no_stored_state_is_empty() {
        let storage = MemoryStorage::new();

        assert!(load_cart(&storage).is_empty());
    }

    #[test]
    fn load_cart_with_corrupt_payload_is_empty() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set(CART_STORAGE_KEY, "{not json")?;

        assert!(load_cart(&storage).is_empty());

        Ok(())
    }

    #[test]
    fn load_cart_with_wrong_shape_is_empty() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set(CART_STORAGE_KEY, "{\"lines\": 42}")?;

        assert!(load_cart(&storage).is_empty());

        Ok(())
    }

    #[test]
    fn save_and_load_round_trips_cart() -> TestResult {
        let mut storage = MemoryStorage::new();
        let mut cart = Cart::new();

        cart.add(tee_line().with_qty(3));
        save_cart(&mut storage, &cart)?;

        assert_eq!(load_cart(&storage), cart);

        Ok(())
    }

    #[test]
    fn restored_quantities_are_clamped() -> TestResult {
        let mut storage = MemoryStorage::new();

        // A stored payload claiming an out-of-range quantity.
        storage.set(
            CART_STORAGE_KEY,
            "{\"lines\":[{\"product_id\":\"tee\",\"title\":\"Tee\",\
             \"price_cents\":3900,\"qty\":500}]}",
        )?;

        let cart = load_cart(&storage);

        assert_eq!(cart.unit_count(), crate::cart::MAX_QTY);

        Ok(())
    }

    #[test]
    fn session_persists_on_every_mutation() -> TestResult {
        let mut session = CartSession::open(MemoryStorage::new());

        session.add(tee_line());

        let storage = session.into_storage();

        assert!(storage.get(CART_STORAGE_KEY)?.is_some());

        let reopened = CartSession::open(storage);

        assert_eq!(reopened.cart().unit_count(), 1);

        Ok(())
    }

    #[test]
    fn draft_round_trips_through_session() {
        let mut session = CartSession::open(MemoryStorage::new());

        session.update_draft(|draft| {
            draft.email = Some("fan@example.com".to_string());
            draft.shipping_id = Some("standard".to_string());
        });

        let reopened = CartSession::open(session.into_storage());

        assert_eq!(reopened.draft().email.as_deref(), Some("fan@example.com"));
        assert_eq!(reopened.draft().shipping_id.as_deref(), Some("standard"));
    }

    #[test]
    fn complete_order_clears_memory_and_storage() -> TestResult {
        let mut session = CartSession::open(MemoryStorage::new());

        session.add(tee_line());
        session.update_draft(|draft| draft.voucher = Some("TOUR10".to_string()));
        session.complete_order();

        assert!(session.cart().is_empty());
        assert_eq!(session.draft(), &CheckoutDraft::default());

        let storage = session.into_storage();

        assert_eq!(storage.get(CART_STORAGE_KEY)?, None);
        assert_eq!(storage.get(CHECKOUT_STORAGE_KEY)?, None);

        Ok(())
    }

    #[test]
    fn clear_storage_removes_only_session_keys() -> TestResult {
        let mut storage = MemoryStorage::new();

        storage.set(CART_STORAGE_KEY, "{}")?;
        storage.set(CHECKOUT_STORAGE_KEY, "{}")?;
        storage.set("unrelated", "kept")?;

        clear_storage(&mut storage)?;

        assert_eq!(storage.get(CART_STORAGE_KEY)?, None);
        assert_eq!(storage.get(CHECKOUT_STORAGE_KEY)?, None);
        assert_eq!(storage.get("unrelated")?.as_deref(), Some("kept"));

        Ok(())
    }
}
