use serde::Serialize;

/// A discrete price tier with its display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct PriceCategory {
    pub label: &'static str,
    /// Band index, 1 (cheapest) through 6.
    pub tier: u8,
}

/// Map a price in rupiah onto its tier.
///
/// Bands follow the comparison-operator semantics (each inclusive of its
/// upper bound), not the marketing prose, which skips some boundaries.
pub fn categorize_price(price: u32) -> PriceCategory {
    let (label, tier) = if price < 8000 {
        ("Murah Ga Masuk Akal", 1)
    } else if price <= 10000 {
        ("Murah", 2)
    } else if price <= 12000 {
        ("Normal", 3)
    } else if price <= 15000 {
        ("Resto Menengah", 4)
    } else if price <= 20000 {
        ("Cukup Mahal", 5)
    } else {
        ("Mahal", 6)
    };
    PriceCategory { label, tier }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(categorize_price(7999).label, "Murah Ga Masuk Akal");
        assert_eq!(categorize_price(8000).label, "Murah");
        assert_eq!(categorize_price(10000).label, "Murah");
        assert_eq!(categorize_price(10001).label, "Normal");
        assert_eq!(categorize_price(12000).label, "Normal");
        assert_eq!(categorize_price(12001).label, "Resto Menengah");
        assert_eq!(categorize_price(15000).label, "Resto Menengah");
        assert_eq!(categorize_price(15001).label, "Cukup Mahal");
        assert_eq!(categorize_price(20000).label, "Cukup Mahal");
        assert_eq!(categorize_price(20001).label, "Mahal");
    }

    #[test]
    fn open_interval_samples() {
        assert_eq!(categorize_price(5000).tier, 1);
        assert_eq!(categorize_price(9000).tier, 2);
        assert_eq!(categorize_price(11000).tier, 3);
        assert_eq!(categorize_price(13500).tier, 4);
        assert_eq!(categorize_price(18000).tier, 5);
        assert_eq!(categorize_price(50000).tier, 6);
    }

    #[test]
    fn tiers_are_monotonic() {
        let mut last = 0;
        for price in (0..40000).step_by(250) {
            let tier = categorize_price(price).tier;
            assert!(tier >= last, "tier decreased at price {price}");
            last = tier;
        }
    }
}
