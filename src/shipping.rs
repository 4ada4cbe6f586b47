//! Shipping options

/// A delivery method offered at checkout.
///
/// The set is static; a checkout draft persists only the option id and
/// resolves it back through [`by_id`] on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingOption {
    /// Stable identifier persisted in checkout drafts.
    pub id: &'static str,

    /// Display label, also used for the synthetic checkout line.
    pub label: &'static str,

    /// Cost in minor units; zero-cost options add no checkout line.
    pub amount_cents: u64,
}

/// Tracked postal delivery.
pub const STANDARD: ShippingOption = ShippingOption {
    id: "standard",
    label: "Standard shipping",
    amount_cents: 10_00,
};

/// Courier delivery.
pub const EXPRESS: ShippingOption = ShippingOption {
    id: "express",
    label: "Express shipping",
    amount_cents: 25_00,
};

/// Collection at the merch stand, free of charge.
pub const PICKUP: ShippingOption = ShippingOption {
    id: "pickup",
    label: "Local pickup",
    amount_cents: 0,
};

/// Every offered option, in display order.
pub const ALL: [ShippingOption; 3] = [STANDARD, EXPRESS, PICKUP];

/// Resolves a persisted option id back to its option.
#[must_use]
pub fn by_id(id: &str) -> Option<ShippingOption> {
    ALL.into_iter().find(|option| option.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_id_resolves_every_offered_option() {
        for option in ALL {
            assert_eq!(by_id(option.id), Some(option));
        }
    }

    #[test]
    fn by_id_rejects_unknown_ids() {
        assert_eq!(by_id("drone"), None);
        assert_eq!(by_id(""), None);
    }

    #[test]
    fn pickup_is_free() {
        assert_eq!(PICKUP.amount_cents, 0);
    }
}
