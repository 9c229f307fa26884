use super::types::{raw, QuoteSummaryResponse, QuoteSummaryResult};
use super::{check_status, parse_base_url, quote_from_chart, with_segment, PriceProvider, Quote, YahooChartClient};
use crate::errors::{SimError, SimResult};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode, Url};
use tokio::sync::RwLock;

const SUMMARY_MODULES: &str = "price,summaryDetail,summaryProfile";

#[derive(Debug, Clone)]
struct Crumb {
    cookie: String,
    crumb: String,
}

/// Where the quoteSummary request and its cookie/crumb handshake go.
pub struct SummaryEndpoints<'a> {
    pub summary: &'a str,
    pub cookie: &'a str,
    pub crumb: &'a str,
}

/// Chart history for the price, quoteSummary for fundamentals.
///
/// quoteSummary requires a cookie + crumb pair. It is fetched lazily, cached on
/// this instance and dropped when Yahoo rejects it. A failed fundamentals lookup
/// never fails the quote; the metadata is just left empty.
pub struct SummaryProvider {
    chart: YahooChartClient,
    client: Client,
    summary_url: Url,
    cookie_url: Url,
    crumb_url: Url,
    crumb: RwLock<Option<Crumb>>,
}

impl SummaryProvider {
    pub fn new(chart: YahooChartClient, client: Client, endpoints: SummaryEndpoints<'_>) -> SimResult<Self> {
        Ok(Self {
            chart,
            client,
            summary_url: parse_base_url(endpoints.summary)?,
            cookie_url: parse_base_url(endpoints.cookie)?,
            crumb_url: parse_base_url(endpoints.crumb)?,
            crumb: RwLock::new(None),
        })
    }

    async fn ensure_crumb(&self) -> SimResult<Crumb> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let resp = self.client.get(self.cookie_url.clone()).send().await?;
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| SimError::Parse("no cookie in Yahoo response".into()))?;

        let resp = self
            .client
            .get(self.crumb_url.clone())
            .header(header::COOKIE, &cookie)
            .send()
            .await?;
        // An error page here must never be cached as the crumb.
        match resp.status() {
            s if s.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => return Err(SimError::RateLimited),
            s => return Err(SimError::Network(format!("crumb request failed: HTTP {s}"))),
        }
        let crumb = resp.text().await?.trim().to_string();
        if crumb.is_empty() {
            return Err(SimError::Parse("empty crumb".into()));
        }

        let fresh = Crumb { cookie, crumb };
        *self.crumb.write().await = Some(fresh.clone());
        tracing::debug!("yahoo crumb refreshed");
        Ok(fresh)
    }

    async fn fetch_summary(&self, ticker: &str) -> SimResult<QuoteSummaryResult> {
        let crumb = self.ensure_crumb().await?;
        let url = with_segment(&self.summary_url, ticker)?;

        let resp = self
            .client
            .get(url)
            .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.crumb.as_str())])
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await?;

        if matches!(resp.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            *self.crumb.write().await = None;
            return Err(SimError::Network(format!("quoteSummary rejected crumb: HTTP {}", resp.status())));
        }

        let resp = check_status(resp, ticker).await?;
        let body: QuoteSummaryResponse = resp.json().await?;

        if let Some(err) = body.quote_summary.error {
            tracing::debug!(
                ticker = %ticker,
                code = ?err.code,
                description = ?err.description,
                "quoteSummary returned error object"
            );
            return Err(SimError::NotFound(ticker.to_string()));
        }

        body.quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| SimError::NotFound(ticker.to_string()))
    }
}

/// Overlay quoteSummary fields on a chart-derived quote. Summary values win where present.
pub fn merge_summary(mut quote: Quote, summary: &QuoteSummaryResult) -> Quote {
    if let Some(price) = &summary.price {
        if let Some(name) = price.short_name.clone().or_else(|| price.long_name.clone()) {
            quote.company_name = Some(name);
        }
    }

    if let Some(profile) = &summary.summary_profile {
        quote.sector = profile.sector.clone().or(quote.sector);
    }

    if let Some(detail) = &summary.summary_detail {
        quote.market_cap = raw(&detail.market_cap).or(quote.market_cap);
        quote.pe_ratio = raw(&detail.trailing_pe).or(quote.pe_ratio);
        quote.dividend_yield = raw(&detail.dividend_yield).map(|y| y * 100.0).or(quote.dividend_yield);
        quote.fifty_two_week_high = raw(&detail.fifty_two_week_high).or(quote.fifty_two_week_high);
        quote.fifty_two_week_low = raw(&detail.fifty_two_week_low).or(quote.fifty_two_week_low);
    }

    quote
}

#[async_trait]
impl PriceProvider for SummaryProvider {
    fn id(&self) -> &'static str {
        "yahoo_summary"
    }

    async fn fetch_quote(&self, ticker: &str) -> SimResult<Quote> {
        let chart = self.chart.chart(ticker).await?;
        let quote = quote_from_chart(ticker, &chart)?;

        match self.fetch_summary(ticker).await {
            Ok(summary) => Ok(merge_summary(quote, &summary)),
            Err(e) => {
                tracing::warn!(ticker = %ticker, error = %e, "fundamentals unavailable, returning price only");
                Ok(quote)
            }
        }
    }

    async fn latest_price(&self, ticker: &str) -> SimResult<f64> {
        self.chart.latest_price(ticker).await
    }
}
