pub mod curve;
pub mod summary;

/// One listed option contract covers 100 shares of the underlying.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Default simulated price window, as fractions of the current price.
pub const GRID_LOW: f64 = 0.8;
pub const GRID_HIGH: f64 = 1.2;

pub const DEFAULT_SAMPLES: usize = 100;

/// A short put leg: strike and premium received, both per share.
/// Values are not checked for economic sanity; the arithmetic propagates whatever it gets.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OptionLeg {
    pub strike: f64,
    pub premium: f64,
}

impl OptionLeg {
    #[inline]
    pub fn new(strike: f64, premium: f64) -> Self {
        Self { strike, premium }
    }
}

/// A leg as submitted by a client. Either field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Deserialize)]
pub struct OptionLegInput {
    #[serde(default)]
    pub strike: Option<f64>,
    #[serde(default)]
    pub premium: Option<f64>,
}

impl OptionLegInput {
    /// Complete legs only; incomplete input is dropped rather than rejected.
    #[inline]
    pub fn into_leg(self) -> Option<OptionLeg> {
        Some(OptionLeg::new(self.strike?, self.premium?))
    }
}

/// Per-leg summary at expiration, in dollars per contract except `breakeven` (per share).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PayoffResult {
    pub strike: f64,
    pub premium: f64,
    pub max_profit: f64,
    pub max_loss: f64,
    pub breakeven: f64,
    pub current_price: f64,
}

/// One sample of a payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PayoffPoint {
    pub price: f64,
    pub profit_loss: f64,
}

/// Ordered (price, P/L) samples, ascending in price.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PayoffCurve {
    pub leg: OptionLeg,
    pub points: Vec<PayoffPoint>,
}

impl PayoffCurve {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_input_becomes_leg() {
        let input = OptionLegInput { strike: Some(100.0), premium: Some(5.0) };
        assert_eq!(input.into_leg(), Some(OptionLeg::new(100.0, 5.0)));
    }

    #[test]
    fn test_missing_field_is_dropped() {
        let no_strike = OptionLegInput { strike: None, premium: Some(3.0) };
        let no_premium = OptionLegInput { strike: Some(100.0), premium: None };
        assert!(no_strike.into_leg().is_none());
        assert!(no_premium.into_leg().is_none());
    }

    #[test]
    fn test_input_deserializes_null_and_absent() {
        let legs: Vec<OptionLegInput> =
            serde_json::from_str(r#"[{"strike": null, "premium": 3}, {"premium": 2.5}]"#).unwrap();
        assert_eq!(legs[0].strike, None);
        assert_eq!(legs[0].premium, Some(3.0));
        assert_eq!(legs[1].strike, None);
    }

    #[test]
    fn test_serialized_leg_reads_back_as_input() {
        let leg = OptionLeg::new(140.0, 5.0);
        let json = serde_json::to_value(leg).unwrap();
        assert_eq!(json, serde_json::json!({"strike": 140.0, "premium": 5.0}));

        let input: OptionLegInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.into_leg(), Some(leg));
    }
}
