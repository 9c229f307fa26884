pub mod yahoo_chart;
pub mod yahoo_summary;
pub mod types;

use crate::config::AppConfig;
use crate::errors::{SimError, SimResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use types::{ChartResponse, ChartResult};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Latest price plus whatever descriptive metadata the provider could populate.
/// Built fresh for every request; nothing here is cached.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Quote {
    pub ticker: String,
    pub current_price: f64,
    pub last_updated: NaiveDate,
    pub company_name: Option<String>,
    pub sector: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    /// Percent, e.g. 0.52 for a 0.52% yield.
    pub dividend_yield: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// Source of current prices. Implementations must fail with `SimError::NotFound`
/// when the ticker has no history and a transient kind for anything else.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    fn id(&self) -> &'static str;

    async fn fetch_quote(&self, ticker: &str) -> SimResult<Quote>;

    /// Price used for simulations. Defaults to the quote's last close.
    async fn latest_price(&self, ticker: &str) -> SimResult<f64> {
        Ok(self.fetch_quote(ticker).await?.current_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Chart history only: price, name and 52-week range.
    YahooChart,
    /// Chart history plus quoteSummary fundamentals.
    YahooSummary,
}

impl std::str::FromStr for ProviderKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo_chart" | "chart" => Ok(Self::YahooChart),
            "yahoo_summary" | "summary" => Ok(Self::YahooSummary),
            other => Err(SimError::Config(format!("unknown PRICE_PROVIDER: {other}"))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::YahooChart => write!(f, "yahoo_chart"),
            Self::YahooSummary => write!(f, "yahoo_summary"),
        }
    }
}

/// Construct the configured provider behind a trait object.
pub fn build_provider(cfg: &AppConfig) -> SimResult<Arc<dyn PriceProvider>> {
    let client = Client::builder()
        .timeout(cfg.fetch_timeout)
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(4)
        .build()
        .map_err(|e| SimError::Config(format!("http client: {e}")))?;

    let chart = YahooChartClient::new(client.clone(), &cfg.yahoo_chart_url, &cfg.history_range)?;

    let provider: Arc<dyn PriceProvider> = match cfg.price_provider {
        ProviderKind::YahooChart => Arc::new(yahoo_chart::ChartProvider::new(chart)),
        ProviderKind::YahooSummary => Arc::new(yahoo_summary::SummaryProvider::new(
            chart,
            client,
            yahoo_summary::SummaryEndpoints {
                summary: &cfg.yahoo_summary_url,
                cookie: &cfg.yahoo_cookie_url,
                crumb: &cfg.yahoo_crumb_url,
            },
        )?),
    };

    tracing::info!(provider = provider.id(), kind = %cfg.price_provider, timeout = ?cfg.fetch_timeout, "price provider ready");
    Ok(provider)
}

/// Trim and reject empty symbols before they reach the network.
pub fn normalize_ticker(raw: &str) -> SimResult<String> {
    let ticker = raw.trim();
    if ticker.is_empty() {
        return Err(SimError::Validation("Ticker must not be empty".into()));
    }
    Ok(ticker.to_string())
}

/// Thin client for Yahoo's v8 chart endpoint, shared by both strategies.
#[derive(Clone)]
pub struct YahooChartClient {
    client: Client,
    base_url: Url,
    range: String,
}

impl YahooChartClient {
    pub fn new(client: Client, base_url: &str, range: &str) -> SimResult<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            range: range.to_string(),
        })
    }

    pub async fn chart(&self, ticker: &str) -> SimResult<ChartResult> {
        let url = with_segment(&self.base_url, ticker)?;

        let resp = self
            .client
            .get(url)
            .query(&[("range", self.range.as_str()), ("interval", "1d")])
            .send()
            .await?;

        let resp = check_status(resp, ticker).await?;
        let body: ChartResponse = resp.json().await?;

        if let Some(err) = body.chart.error {
            tracing::debug!(
                ticker = %ticker,
                code = ?err.code,
                description = ?err.description,
                "chart returned error object"
            );
            return Err(SimError::NotFound(ticker.to_string()));
        }

        body.chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| SimError::NotFound(ticker.to_string()))
    }

    /// Live market price when Yahoo reports one, otherwise the last daily close.
    pub async fn latest_price(&self, ticker: &str) -> SimResult<f64> {
        let chart = self.chart(ticker).await?;
        if let Some(price) = chart.meta.regular_market_price.filter(|p| p.is_finite()) {
            return Ok(price);
        }
        chart
            .last_close()
            .map(|(_, close)| close)
            .ok_or_else(|| SimError::NotFound(ticker.to_string()))
    }
}

/// Quote from chart data alone. An empty or all-null history means the ticker is unknown.
pub fn quote_from_chart(ticker: &str, chart: &ChartResult) -> SimResult<Quote> {
    let (ts, close) = chart
        .last_close()
        .ok_or_else(|| SimError::NotFound(ticker.to_string()))?;

    let last_updated = chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| SimError::Parse(format!("invalid timestamp: {ts}")))?;

    Ok(Quote {
        ticker: ticker.to_string(),
        current_price: close,
        last_updated,
        company_name: chart.meta.short_name.clone().or_else(|| chart.meta.long_name.clone()),
        sector: None,
        market_cap: None,
        pe_ratio: None,
        dividend_yield: None,
        fifty_two_week_high: chart.meta.fifty_two_week_high,
        fifty_two_week_low: chart.meta.fifty_two_week_low,
    })
}

fn parse_base_url(raw: &str) -> SimResult<Url> {
    Url::parse(raw.trim_end_matches('/')).map_err(|e| SimError::Config(format!("{raw}: {e}")))
}

/// Append one percent-encoded path segment so a ticker can never alter the path.
fn with_segment(base: &Url, segment: &str) -> SimResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SimError::Config(format!("not a base url: {base}")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

async fn check_status(resp: reqwest::Response, ticker: &str) -> SimResult<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status {
        StatusCode::NOT_FOUND => Err(SimError::NotFound(ticker.to_string())),
        StatusCode::TOO_MANY_REQUESTS => Err(SimError::RateLimited),
        _ => {
            let body = resp.text().await.unwrap_or_default();
            Err(SimError::Network(format!("HTTP {status}: {body}")))
        }
    }
}
