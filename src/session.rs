use crate::errors::{SimError, SimResult};
use crate::payoff::curve::{chart_price_range, compute_payoff_curve, compute_payoff_curve_in, PriceRange};
use crate::payoff::summary::compute_leg_summary;
use crate::payoff::{OptionLeg, PayoffCurve, PayoffResult, DEFAULT_SAMPLES};

/// Which price window curves are sampled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveWindow {
    /// +/-20% around the current price.
    #[default]
    AroundPrice,
    /// Widened so every strike is visible.
    FitStrikes,
}

/// Working set of legs for one ticker in an interactive run.
///
/// Owned by whoever drives the interaction. Edits consume the session and hand
/// back the updated one, so there is no shared list to mutate behind anyone's back.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSession {
    ticker: String,
    expiration_days: u32,
    window: CurveWindow,
    legs: Vec<OptionLeg>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SessionReport {
    pub ticker: String,
    pub current_price: f64,
    pub expiration_days: u32,
    pub range: PriceRange,
    pub summaries: Vec<PayoffResult>,
    pub curves: Vec<PayoffCurve>,
}

impl SimulationSession {
    pub fn new(ticker: impl Into<String>, expiration_days: u32) -> Self {
        Self {
            ticker: ticker.into(),
            expiration_days,
            window: CurveWindow::default(),
            legs: Vec::new(),
        }
    }

    pub fn with_window(mut self, window: CurveWindow) -> Self {
        self.window = window;
        self
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn expiration_days(&self) -> u32 {
        self.expiration_days
    }

    pub fn legs(&self) -> &[OptionLeg] {
        &self.legs
    }

    pub fn add_leg(mut self, leg: OptionLeg) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn remove_leg(mut self, index: usize) -> SimResult<Self> {
        if index >= self.legs.len() {
            return Err(SimError::Validation(format!(
                "No option at position {index} ({} listed)",
                self.legs.len()
            )));
        }
        self.legs.remove(index);
        Ok(self)
    }

    /// Summaries and curves for every leg at the given price.
    pub fn simulate(&self, current_price: f64) -> SimResult<SessionReport> {
        if self.legs.is_empty() {
            return Err(SimError::Validation("Add at least one option".into()));
        }

        let range = match self.window {
            CurveWindow::AroundPrice => PriceRange::around(current_price),
            CurveWindow::FitStrikes => chart_price_range(current_price, &self.legs),
        };

        let summaries = self
            .legs
            .iter()
            .map(|leg| compute_leg_summary(current_price, leg))
            .collect();

        let curves = self
            .legs
            .iter()
            .map(|leg| match self.window {
                CurveWindow::AroundPrice => compute_payoff_curve(current_price, leg, DEFAULT_SAMPLES),
                CurveWindow::FitStrikes => compute_payoff_curve_in(range, leg, DEFAULT_SAMPLES),
            })
            .collect();

        Ok(SessionReport {
            ticker: self.ticker.clone(),
            current_price,
            expiration_days: self.expiration_days,
            range,
            summaries,
            curves,
        })
    }
}

/// Parse user-entered strike and premium text into a leg.
pub fn parse_leg(strike: &str, premium: &str) -> SimResult<OptionLeg> {
    let parse = |s: &str| s.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    match (parse(strike), parse(premium)) {
        (Some(strike), Some(premium)) => Ok(OptionLeg::new(strike, premium)),
        _ => Err(SimError::Validation(
            "Please enter valid numbers for strike price and premium".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SimulationSession {
        SimulationSession::new("AAPL", 30)
            .add_leg(OptionLeg::new(140.0, 5.0))
            .add_leg(OptionLeg::new(160.0, 8.0))
    }

    #[test]
    fn test_add_and_remove() {
        let s = session();
        assert_eq!(s.legs().len(), 2);

        let s = s.remove_leg(0).unwrap();
        assert_eq!(s.legs(), &[OptionLeg::new(160.0, 8.0)]);
        assert_eq!(s.ticker(), "AAPL");
        assert_eq!(s.expiration_days(), 30);
    }

    #[test]
    fn test_remove_out_of_range() {
        let err = session().remove_leg(2).unwrap_err();
        assert!(matches!(err, SimError::Validation(_)));
    }

    #[test]
    fn test_simulate_requires_legs() {
        let err = SimulationSession::new("AAPL", 30).simulate(150.0).unwrap_err();
        assert!(matches!(err, SimError::Validation(_)));
    }

    #[test]
    fn test_simulate_default_window() {
        let report = session().simulate(150.0).unwrap();
        assert_eq!(report.summaries.len(), 2);
        assert_eq!(report.summaries[0].max_profit, 500.0);
        assert_eq!(report.curves.len(), 2);
        assert_eq!(report.curves[1].len(), DEFAULT_SAMPLES);
        assert_eq!(report.range, PriceRange::around(150.0));
    }

    #[test]
    fn test_simulate_fit_strikes_window() {
        let report = SimulationSession::new("AAPL", 30)
            .with_window(CurveWindow::FitStrikes)
            .add_leg(OptionLeg::new(50.0, 1.0))
            .add_leg(OptionLeg::new(150.0, 2.0))
            .simulate(100.0)
            .unwrap();
        assert_eq!(report.range.low, 0.0);
        assert_eq!(report.range.high, 210.0);
        assert_eq!(report.curves[0].points[0].price, 0.0);
    }

    #[test]
    fn test_parse_leg() {
        assert_eq!(parse_leg(" 200 ", "5.5").unwrap(), OptionLeg::new(200.0, 5.5));
        assert!(parse_leg("abc", "5").is_err());
        assert!(parse_leg("200", "").is_err());
        assert!(parse_leg("NaN", "5").is_err());
    }
}
