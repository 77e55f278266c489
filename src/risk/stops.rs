/// True when a price sits close enough to a support level to justify a
/// pullback entry: within half an ATR above it, or within 0.5% on a
/// relative basis. Non-positive support levels never match.
pub fn near_support(price: f64, support: f64, atr: f64) -> bool {
    if support <= 0.0 {
        return false;
    }
    price <= support + 0.5 * atr || price / support <= 1.005
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_half_atr() {
        assert!(near_support(101.0, 100.0, 2.0));
    }

    #[test]
    fn test_within_relative_band() {
        // Outside the ATR band but only 0.4% above support
        assert!(near_support(100.4, 100.0, 0.1));
    }

    #[test]
    fn test_too_far_above() {
        assert!(!near_support(106.0, 100.0, 2.0));
    }

    #[test]
    fn test_invalid_support_never_matches() {
        assert!(!near_support(100.0, 0.0, 2.0));
        assert!(!near_support(100.0, -10.0, 2.0));
    }
}
