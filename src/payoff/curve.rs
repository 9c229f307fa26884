use super::{OptionLeg, PayoffCurve, PayoffPoint, CONTRACT_MULTIPLIER, GRID_HIGH, GRID_LOW};

/// Padding applied around the strike span when sizing a chart window.
const STRIKE_PADDING: f64 = 0.2;

/// Closed price interval to sample a payoff curve over.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    /// The default +/-20% window around the current price.
    #[inline]
    pub fn around(current_price: f64) -> Self {
        Self {
            low: current_price * GRID_LOW,
            high: current_price * GRID_HIGH,
        }
    }
}

/// Short put P/L per contract at expiration for an underlying price.
///
/// At or above the strike the put expires worthless and the writer keeps the premium.
/// Below it the writer buys at strike, offset by the premium already received.
/// Both branches agree at `price == strike`.
#[inline]
pub fn payoff_at_expiration(price: f64, leg: &OptionLeg) -> f64 {
    if price >= leg.strike {
        leg.premium * CONTRACT_MULTIPLIER
    } else {
        (leg.premium + (price - leg.strike)) * CONTRACT_MULTIPLIER
    }
}

/// `n` evenly spaced values from `start` to `end`, both included.
/// `n == 1` yields just `start`; the last sample is pinned to `end`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

/// Payoff over the default window, `[0.8, 1.2] * current_price`.
pub fn compute_payoff_curve(current_price: f64, leg: &OptionLeg, num_samples: usize) -> PayoffCurve {
    compute_payoff_curve_in(PriceRange::around(current_price), leg, num_samples)
}

pub fn compute_payoff_curve_in(range: PriceRange, leg: &OptionLeg, num_samples: usize) -> PayoffCurve {
    let points = linspace(range.low, range.high, num_samples)
        .into_iter()
        .map(|price| PayoffPoint {
            price,
            profit_loss: payoff_at_expiration(price, leg),
        })
        .collect();

    PayoffCurve { leg: *leg, points }
}

/// Chart window that keeps every strike visible.
///
/// The strike span is padded by 20% (half on each side, never below zero) and the
/// result always covers the default window around the current price. With a single
/// distinct strike the span is first stretched to include the current price.
pub fn chart_price_range(current_price: f64, legs: &[OptionLeg]) -> PriceRange {
    let default = PriceRange::around(current_price);
    if legs.is_empty() {
        return default;
    }

    let (mut min_strike, mut max_strike) = legs.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), leg| (lo.min(leg.strike), hi.max(leg.strike)),
    );
    if max_strike - min_strike == 0.0 {
        min_strike = min_strike.min(current_price);
        max_strike = max_strike.max(current_price);
    }

    let span = max_strike - min_strike;
    let padded = if span == 0.0 {
        max_strike * STRIKE_PADDING
    } else {
        span * (1.0 + STRIKE_PADDING)
    };

    let low = (min_strike - padded * 0.5).max(0.0);
    let high = max_strike + padded * 0.5;

    PriceRange {
        low: low.min(default.low),
        high: high.max(default.high),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_and_count() {
        let xs = linspace(120.0, 180.0, 100);
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], 120.0);
        assert_eq!(xs[99], 180.0);
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert_eq!(linspace(1.0, 2.0, 3), vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_continuity_at_strike() {
        let leg = OptionLeg::new(140.0, 5.0);
        assert_eq!(payoff_at_expiration(140.0, &leg), 500.0);
    }

    #[test]
    fn test_assigned_payoff_example() {
        let leg = OptionLeg::new(160.0, 8.0);
        assert_eq!(payoff_at_expiration(150.0, &leg), -200.0);
    }

    #[test]
    fn test_curve_default_window() {
        let curve = compute_payoff_curve(150.0, &OptionLeg::new(140.0, 5.0), 100);
        assert_eq!(curve.len(), 100);
        assert!((curve.points[0].price - 120.0).abs() < 1e-9);
        assert!((curve.points[99].price - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_curve_flat_above_strike_linear_below() {
        let leg = OptionLeg::new(150.0, 4.0);
        let curve = compute_payoff_curve(150.0, &leg, 100);
        for p in &curve.points {
            if p.price >= leg.strike {
                assert_eq!(p.profit_loss, 400.0);
            } else {
                let expected = 400.0 + (p.price - leg.strike) * 100.0;
                assert!((p.profit_loss - expected).abs() < 1e-6);
            }
        }

        let below: Vec<_> = curve.points.iter().filter(|p| p.price < leg.strike).collect();
        for w in below.windows(2) {
            let slope = (w[1].profit_loss - w[0].profit_loss) / (w[1].price - w[0].price);
            assert!((slope - 100.0).abs() < 1e-6, "slope={slope}");
        }
    }

    #[test]
    fn test_chart_range_without_legs_is_default() {
        assert_eq!(chart_price_range(100.0, &[]), PriceRange::around(100.0));
    }

    #[test]
    fn test_chart_range_covers_distant_strikes() {
        let legs = [OptionLeg::new(50.0, 1.0), OptionLeg::new(150.0, 2.0)];
        let range = chart_price_range(100.0, &legs);
        // span 100, padded 120, 60 on each side
        assert_eq!(range.low, 0.0);
        assert_eq!(range.high, 210.0);
    }

    #[test]
    fn test_chart_range_single_strike_includes_current() {
        let legs = [OptionLeg::new(90.0, 1.0)];
        let range = chart_price_range(100.0, &legs);
        // span 90..100, padded 12
        assert!((range.low - 80.0).abs() < 1e-9);
        assert!((range.high - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_chart_range_never_narrower_than_default() {
        let legs = [OptionLeg::new(100.0, 1.0), OptionLeg::new(101.0, 1.0)];
        let range = chart_price_range(100.0, &legs);
        assert!(range.low <= 80.0);
        assert!(range.high >= 120.0);
    }
}
