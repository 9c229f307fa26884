use crate::errors::{SimError, SimResult};
use crate::session::{parse_leg, CurveWindow, SessionReport, SimulationSession};
use std::fmt;

/// Rows shown per curve in the terminal table.
const TABLE_ROWS: usize = 11;

pub const USAGE: &str = "usage: put_sim report <TICKER> <EXPIRATION_DAYS> <STRIKE:PREMIUM>... [--fit]";

/// Build a session from `report` arguments (everything after the subcommand).
pub fn parse_report_args(args: &[String]) -> SimResult<SimulationSession> {
    let mut positional = Vec::new();
    let mut window = CurveWindow::AroundPrice;
    for arg in args {
        match arg.as_str() {
            "--fit" => window = CurveWindow::FitStrikes,
            _ => positional.push(arg.as_str()),
        }
    }

    let (ticker, days, legs) = match positional.as_slice() {
        [ticker, days, legs @ ..] if !legs.is_empty() => (*ticker, *days, legs),
        _ => return Err(SimError::Validation(USAGE.into())),
    };

    let days = days
        .parse::<u32>()
        .map_err(|_| SimError::Validation(format!("invalid expiration days: {days}")))?;

    let mut session = SimulationSession::new(crate::feeds::normalize_ticker(ticker)?, days).with_window(window);
    for pair in legs {
        let (strike, premium) = pair
            .split_once(':')
            .ok_or_else(|| SimError::Validation(format!("expected STRIKE:PREMIUM, got {pair}")))?;
        session = session.add_leg(parse_leg(strike, premium)?);
    }
    Ok(session)
}

/// Plain-text summary plus a coarse P/L table per leg.
pub fn render(report: &SessionReport) -> String {
    ReportText(report).to_string()
}

struct ReportText<'a>(&'a SessionReport);

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Cash-secured put summary for {} (current price: ${:.2}, {} days to expiration)",
            report.ticker, report.current_price, report.expiration_days
        )?;

        for (summary, curve) in report.summaries.iter().zip(&report.curves) {
            writeln!(f)?;
            writeln!(f, "Strike: ${:.2}  Premium: ${:.2}", summary.strike, summary.premium)?;
            writeln!(f, "  Max profit: ${:.2}", summary.max_profit)?;
            writeln!(f, "  Max loss:   ${:.2}", summary.max_loss)?;
            writeln!(f, "  Breakeven:  ${:.2}", summary.breakeven)?;
            writeln!(f, "  {:>12}  {:>12}", "price", "P/L")?;

            if curve.is_empty() {
                continue;
            }
            let n = curve.len();
            let rows = TABLE_ROWS.min(n);
            for row in 0..rows {
                let idx = if rows == 1 { 0 } else { row * (n - 1) / (rows - 1) };
                let p = &curve.points[idx];
                writeln!(f, "  {:>12.2}  {:>12.2}", p.price, p.profit_loss)?;
            }
        }
        Ok(())
    }
}
