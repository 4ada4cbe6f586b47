//! Variant identity

use serde::{Deserialize, Serialize};

/// The variant configuration of a cart line.
///
/// A variant is identified structurally by its size and colour; the composite
/// sku string exists only at display and metadata boundaries and is always
/// derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantKey {
    /// Selected size, e.g. `"M"` or `"XL"`.
    #[serde(default)]
    pub size: Option<String>,

    /// Selected colourway as a hex code, with or without a leading `#`.
    #[serde(default)]
    pub color_hex: Option<String>,
}

impl VariantKey {
    /// Creates a variant key from optional size and colour selections.
    #[must_use]
    pub fn new(size: Option<&str>, color_hex: Option<&str>) -> Self {
        Self {
            size: size.map(ToString::to_string),
            color_hex: color_hex.map(ToString::to_string),
        }
    }

    /// Renders the composite sku for this variant of `product_id`.
    ///
    /// Present segments are joined with `-` in `product-size-colour` order.
    /// The colour segment is lowercased with any leading `#` stripped, so
    /// `"#1D1D1D"` and `"1d1d1d"` produce the same sku.
    #[must_use]
    pub fn sku(&self, product_id: &str) -> String {
        let mut sku = product_id.to_string();

        if let Some(size) = &self.size {
            sku.push('-');
            sku.push_str(size);
        }

        if let Some(hex) = &self.color_hex {
            sku.push('-');
            sku.push_str(&hex.trim_start_matches('#').to_ascii_lowercase());
        }

        sku
    }

    /// Whether neither size nor colour is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size.is_none() && self.color_hex.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sku_joins_present_segments() {
        let variant = VariantKey::new(Some("M"), Some("#1D1D1D"));

        assert_eq!(variant.sku("tour-tee"), "tour-tee-M-1d1d1d");
    }

    #[test]
    fn sku_with_size_only() {
        let variant = VariantKey::new(Some("XL"), None);

        assert_eq!(variant.sku("tour-tee"), "tour-tee-XL");
    }

    #[test]
    fn sku_with_colour_only() {
        let variant = VariantKey::new(None, Some("ff0000"));

        assert_eq!(variant.sku("poster"), "poster-ff0000");
    }

    #[test]
    fn sku_normalises_hex_case_and_hash() {
        let with_hash = VariantKey::new(Some("S"), Some("#ABCDEF"));
        let without = VariantKey::new(Some("S"), Some("abcdef"));

        assert_eq!(with_hash.sku("hoodie"), without.sku("hoodie"));
    }

    #[test]
    fn empty_variant_sku_is_product_id() {
        let variant = VariantKey::default();

        assert!(variant.is_empty());
        assert_eq!(variant.sku("sticker"), "sticker");
    }
}
