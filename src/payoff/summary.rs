use super::{OptionLeg, OptionLegInput, PayoffResult, CONTRACT_MULTIPLIER};

/// Expiration summary of a short put.
///
/// max_profit = premium * 100 (put expires worthless)
/// max_loss   = (strike - premium) * 100 (underlying goes to zero, put assigned)
/// breakeven  = strike - premium
///
/// None of these depend on `current_price`; it is carried for display.
/// If premium exceeds strike the loss figure flips sign; that is not an error.
#[inline]
pub fn compute_leg_summary(current_price: f64, leg: &OptionLeg) -> PayoffResult {
    PayoffResult {
        strike: leg.strike,
        premium: leg.premium,
        max_profit: leg.premium * CONTRACT_MULTIPLIER,
        max_loss: (leg.strike - leg.premium) * CONTRACT_MULTIPLIER,
        breakeven: leg.strike - leg.premium,
        current_price,
    }
}

/// Summaries for every complete leg, in input order. Incomplete legs are skipped.
pub fn summarize_legs(current_price: f64, legs: &[OptionLegInput]) -> Vec<PayoffResult> {
    legs.iter()
        .filter_map(|input| input.into_leg())
        .map(|leg| compute_leg_summary(current_price, &leg))
        .collect()
}
