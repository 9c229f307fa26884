use super::{quote_from_chart, PriceProvider, Quote, YahooChartClient};
use crate::errors::SimResult;
use async_trait::async_trait;

/// History-only strategy: one chart request per quote.
/// Fundamentals (sector, market cap, P/E, dividend yield) are left empty.
pub struct ChartProvider {
    chart: YahooChartClient,
}

impl ChartProvider {
    pub fn new(chart: YahooChartClient) -> Self {
        Self { chart }
    }
}

#[async_trait]
impl PriceProvider for ChartProvider {
    fn id(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_quote(&self, ticker: &str) -> SimResult<Quote> {
        let chart = self.chart.chart(ticker).await?;
        quote_from_chart(ticker, &chart)
    }

    async fn latest_price(&self, ticker: &str) -> SimResult<f64> {
        self.chart.latest_price(ticker).await
    }
}
