use serde::Deserialize;

// ── v8 chart ──

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<ChartIndicators>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuoteSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuoteSeries {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResult {
    /// Latest (timestamp, close) pair, skipping trailing gaps Yahoo reports as null.
    pub fn last_close(&self) -> Option<(i64, f64)> {
        let timestamps = self.timestamp.as_ref()?;
        let closes = &self.indicators.as_ref()?.quote.first()?.close;
        timestamps
            .iter()
            .zip(closes.iter())
            .rev()
            .find_map(|(ts, close)| close.filter(|c| c.is_finite()).map(|c| (*ts, c)))
    }
}

// ── v10 quoteSummary ──
// Numeric fields arrive as {"raw": 1.23, "fmt": "1.23"} or {} when absent.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResponse {
    pub quote_summary: QuoteSummaryEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteSummaryEnvelope {
    pub result: Option<Vec<QuoteSummaryResult>>,
    pub error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    pub price: Option<SummaryPrice>,
    pub summary_detail: Option<SummaryDetail>,
    pub summary_profile: Option<SummaryProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawValue {
    pub raw: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPrice {
    pub short_name: Option<String>,
    pub long_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    pub market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<RawValue>,
    pub dividend_yield: Option<RawValue>,
    pub fifty_two_week_high: Option<RawValue>,
    pub fifty_two_week_low: Option<RawValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryProfile {
    pub sector: Option<String>,
}

#[inline]
pub fn raw(v: &Option<RawValue>) -> Option<f64> {
    v.as_ref().and_then(|r| r.raw)
}
