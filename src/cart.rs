//! Cart model
//!
//! An in-memory cart of purchasable line configurations. Lines are keyed by
//! their variant-aware identity: two adds of the same configuration merge
//! into one line rather than appearing twice.

use serde::{Deserialize, Serialize};

use crate::{currency::CurrencyCode, variant::VariantKey};

/// Smallest quantity a line may hold.
pub const MIN_QTY: u32 = 1;

/// Largest quantity a line may hold.
pub const MAX_QTY: u32 = 99;

/// Clamps a requested quantity into the allowed range.
#[must_use]
pub fn clamp_qty(qty: u32) -> u32 {
    qty.clamp(MIN_QTY, MAX_QTY)
}

/// One purchasable unit configuration in a cart.
///
/// The title and price are snapshots taken when the line is added; cart
/// operations never mutate them afterwards. Quantity changes go through
/// [`Cart`] so clamping and identity rules always apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Opaque catalog reference.
    pub product_id: String,

    /// Variant configuration, when the product has one.
    #[serde(default)]
    pub variant: Option<VariantKey>,

    /// Display name at add-time.
    pub title: String,

    /// Unit price in minor units at add-time.
    pub price_cents: u64,

    /// Currency of `price_cents`.
    #[serde(default)]
    pub currency: CurrencyCode,

    /// Direct image URL; takes precedence over `image_path`.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Object-storage path, resolved through [`crate::media`] for display.
    #[serde(default)]
    pub image_path: Option<String>,

    /// Human-readable colour name, display only.
    #[serde(default)]
    pub color_label: Option<String>,

    /// Units of this configuration, always within `MIN_QTY..=MAX_QTY`
    /// once the line is in a cart.
    pub qty: u32,
}

impl CartLine {
    /// Creates a line with quantity 1 and the default currency.
    #[must_use]
    pub fn new(product_id: impl Into<String>, title: impl Into<String>, price_cents: u64) -> Self {
        Self {
            product_id: product_id.into(),
            variant: None,
            title: title.into(),
            price_cents,
            currency: CurrencyCode::default(),
            image_url: None,
            image_path: None,
            color_label: None,
            qty: 1,
        }
    }

    /// Sets the variant configuration.
    #[must_use]
    pub fn with_variant(mut self, variant: VariantKey) -> Self {
        self.variant = Some(variant);
        self
    }

    /// Sets the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the quantity. Values outside the allowed range are clamped when
    /// the line enters a cart.
    #[must_use]
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self
    }

    /// Sets a direct image URL.
    #[must_use]
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Sets an object-storage image path.
    #[must_use]
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Sets the display colour name.
    #[must_use]
    pub fn with_color_label(mut self, label: impl Into<String>) -> Self {
        self.color_label = Some(label.into());
        self
    }

    /// The identity of this line within a cart.
    ///
    /// Lines with a variant are keyed by the composite sku; lines without
    /// one are keyed by the bare product id.
    #[must_use]
    pub fn line_key(&self) -> String {
        match &self.variant {
            Some(variant) => variant.sku(&self.product_id),
            None => self.product_id.clone(),
        }
    }

    /// The composite sku, when this line has a variant.
    #[must_use]
    pub fn sku(&self) -> Option<String> {
        self.variant
            .as_ref()
            .map(|variant| variant.sku(&self.product_id))
    }

    /// Line total in minor units.
    #[must_use]
    pub fn total_cents(&self) -> u64 {
        self.price_cents.saturating_mul(u64::from(self.qty))
    }
}

/// Addresses a single line for quantity updates and removal.
///
/// A sku lookup only matches lines that carry a variant; a product-id lookup
/// only matches lines without one. A bare product id therefore never
/// accidentally matches one of its variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineLookup {
    /// Match a variant line by its composite sku.
    Sku(String),

    /// Match a variant-less line by its product id.
    ProductId(String),
}

impl LineLookup {
    /// Whether this lookup addresses `line`.
    #[must_use]
    pub fn matches(&self, line: &CartLine) -> bool {
        match self {
            Self::Sku(sku) => line.variant.is_some() && line.line_key() == *sku,
            Self::ProductId(id) => line.variant.is_none() && line.product_id == *id,
        }
    }
}

/// An in-memory cart.
///
/// The serialised form is versioned through its storage key (see
/// [`crate::session`]); restoring a cart replays every line through [`Cart::add`]
/// so key uniqueness and quantity clamping hold for restored state too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart by replaying `lines` through [`Cart::add`].
    ///
    /// Used when restoring persisted state: duplicate keys merge and
    /// out-of-range quantities clamp, whatever the input claimed.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines {
            cart.add(line);
        }

        cart
    }

    /// Adds a line, merging quantities into an existing line with the same
    /// key.
    ///
    /// On a merge the existing line's snapshot (title, price, images) wins;
    /// only the quantity changes. The merged quantity clamps at [`MAX_QTY`].
    pub fn add(&mut self, line: CartLine) {
        let mut line = line;
        line.qty = clamp_qty(line.qty);

        let key = line.line_key();

        if let Some(existing) = self.lines.iter_mut().find(|l| l.line_key() == key) {
            existing.qty = clamp_qty(existing.qty.saturating_add(line.qty));
        } else {
            self.lines.push(line);
        }
    }

    /// Sets the quantity of the line addressed by `lookup`, clamped to the
    /// allowed range.
    ///
    /// Returns `false` without changing anything when no line matches.
    pub fn set_qty(&mut self, lookup: &LineLookup, qty: u32) -> bool {
        match self.lines.iter_mut().find(|line| lookup.matches(line)) {
            Some(line) => {
                line.qty = clamp_qty(qty);
                true
            }
            None => false,
        }
    }

    /// Removes the line addressed by `lookup`.
    ///
    /// Returns `false` when no line matches; removing an absent line is not
    /// an error.
    pub fn remove(&mut self, lookup: &LineLookup) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| !lookup.matches(line));

        self.lines.len() < before
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The line addressed by `lookup`, if present.
    #[must_use]
    pub fn line(&self, lookup: &LineLookup) -> Option<&CartLine> {
        self.lines.iter().find(|line| lookup.matches(line))
    }

    /// All lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consumes the cart, yielding its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Iterates over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter()
    }

    /// Sum of `price_cents * qty` over all lines, in minor units.
    #[must_use]
    pub fn subtotal_cents(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.total_cents()))
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.qty))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The cart's currency: the first line's, or the default when empty.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.lines
            .first()
            .map_or_else(CurrencyCode::default, |line| line.currency.clone())
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tee_line() -> CartLine {
        CartLine::new("tour-tee", "Tour Tee", 39_00)
            .with_variant(VariantKey::new(Some("M"), Some("#1d1d1d")))
            .with_color_label("Washed Black")
    }

    #[test]
    fn add_merges_same_sku_into_one_line() {
        let mut cart = Cart::new();

        cart.add(tee_line().with_qty(2));
        cart.add(tee_line().with_qty(3));

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.unit_count(), 5);
    }

    #[test]
    fn add_keeps_first_snapshot_on_merge() {
        let mut cart = Cart::new();

        cart.add(tee_line());
        cart.add(tee_line().with_qty(1).with_color_label("Renamed"));

        let lookup = LineLookup::Sku("tour-tee-M-1d1d1d".to_string());
        let line = cart.line(&lookup).unwrap();

        assert_eq!(line.color_label.as_deref(), Some("Washed Black"));
        assert_eq!(line.qty, 2);
    }

    #[test]
    fn different_variants_are_distinct_lines() {
        let mut cart = Cart::new();

        cart.add(tee_line());
        cart.add(
            CartLine::new("tour-tee", "Tour Tee", 39_00)
                .with_variant(VariantKey::new(Some("L"), Some("#1d1d1d"))),
        );

        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn line_keys_stay_unique_under_arbitrary_adds() {
        let mut cart = Cart::new();

        for qty in [1, 4, 2, 9, 1] {
            cart.add(tee_line().with_qty(qty));
            cart.add(CartLine::new("poster", "Gig Poster", 12_00).with_qty(qty));
        }

        let mut keys: Vec<String> = cart.iter().map(CartLine::line_key).collect();
        let total = keys.len();
        keys.dedup();

        assert_eq!(keys.len(), total);
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn add_clamps_quantity_into_range() {
        let mut cart = Cart::new();

        cart.add(tee_line().with_qty(0));

        assert_eq!(cart.unit_count(), MIN_QTY);

        cart.add(tee_line().with_qty(500));

        assert_eq!(cart.unit_count(), MAX_QTY);
    }

    #[test]
    fn set_qty_clamps_and_updates() {
        let mut cart = Cart::new();
        let lookup = LineLookup::Sku("tour-tee-M-1d1d1d".to_string());

        cart.add(tee_line());

        assert!(cart.set_qty(&lookup, 0));
        assert_eq!(cart.line(&lookup).unwrap().qty, MIN_QTY);

        assert!(cart.set_qty(&lookup, 150));
        assert_eq!(cart.line(&lookup).unwrap().qty, MAX_QTY);

        assert!(cart.set_qty(&lookup, 7));
        assert_eq!(cart.line(&lookup).unwrap().qty, 7);
    }

    #[test]
    fn set_qty_on_missing_line_is_a_noop() {
        let mut cart = Cart::new();

        cart.add(tee_line());

        let matched = cart.set_qty(&LineLookup::Sku("unknown".to_string()), 5);

        assert!(!matched);
        assert_eq!(cart.unit_count(), 1);
    }

    #[test]
    fn product_id_lookup_ignores_variant_lines() {
        let mut cart = Cart::new();

        cart.add(tee_line());

        let matched = cart.set_qty(&LineLookup::ProductId("tour-tee".to_string()), 5);

        assert!(!matched, "bare product id must not address a variant line");
    }

    #[test]
    fn sku_lookup_ignores_variantless_lines() {
        let mut cart = Cart::new();

        cart.add(CartLine::new("poster", "Gig Poster", 12_00));

        let matched = cart.remove(&LineLookup::Sku("poster".to_string()));

        assert!(!matched, "sku lookup must not address a variant-less line");
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut cart = Cart::new();
        let lookup = LineLookup::Sku("tour-tee-M-1d1d1d".to_string());

        cart.add(tee_line());

        assert!(cart.remove(&lookup));
        assert!(!cart.remove(&lookup));
        assert!(cart.is_empty());
    }

    #[test]
    fn subtotal_tracks_mutations() {
        let mut cart = Cart::new();
        let tee = LineLookup::Sku("tour-tee-M-1d1d1d".to_string());
        let poster = LineLookup::ProductId("poster".to_string());

        cart.add(tee_line().with_qty(3));
        cart.add(CartLine::new("poster", "Gig Poster", 12_00).with_qty(2));

        assert_eq!(cart.subtotal_cents(), 3 * 39_00 + 2 * 12_00);

        cart.set_qty(&tee, 1);

        assert_eq!(cart.subtotal_cents(), 39_00 + 2 * 12_00);

        cart.remove(&poster);

        assert_eq!(cart.subtotal_cents(), 39_00);

        cart.clear();

        assert_eq!(cart.subtotal_cents(), 0);
    }

    #[test]
    fn from_lines_merges_duplicate_keys() {
        let restored = Cart::from_lines([tee_line().with_qty(98), tee_line().with_qty(5)]);

        assert_eq!(restored.line_count(), 1);
        assert_eq!(restored.unit_count(), MAX_QTY);
    }

    #[test]
    fn currency_comes_from_first_line() {
        let mut cart = Cart::new();

        assert_eq!(cart.currency(), CurrencyCode::default());

        cart.add(tee_line().with_currency(CurrencyCode::new("gbp")));

        assert_eq!(cart.currency(), CurrencyCode::new("gbp"));
    }
}
