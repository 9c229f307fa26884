use crate::errors::{SimError, SimResult};
use crate::feeds::ProviderKind;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub price_provider: ProviderKind,
    pub yahoo_chart_url: String,
    pub yahoo_summary_url: String,
    pub yahoo_cookie_url: String,
    pub yahoo_crumb_url: String,
    pub fetch_timeout: Duration,
    pub history_range: String,
    pub default_ticker: String,
    pub default_expiration_days: u32,
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> SimResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| SimError::Config(format!("SERVER_PORT: {e}")))?;

        let price_provider = env_var_or("PRICE_PROVIDER", "yahoo_summary").parse::<ProviderKind>()?;

        let fetch_timeout_secs = env_var_or("FETCH_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| SimError::Config(format!("FETCH_TIMEOUT_SECS: {e}")))?;
        if fetch_timeout_secs == 0 {
            return Err(SimError::Config("FETCH_TIMEOUT_SECS must be positive".into()));
        }

        let default_expiration_days = env_var_or("DEFAULT_EXPIRATION_DAYS", "30")
            .parse::<u32>()
            .map_err(|e| SimError::Config(format!("DEFAULT_EXPIRATION_DAYS: {e}")))?;

        Ok(Self {
            server_host: env_var_or("SERVER_HOST", "0.0.0.0"),
            server_port,
            price_provider,
            yahoo_chart_url: env_var_or(
                "YAHOO_CHART_URL",
                "https://query1.finance.yahoo.com/v8/finance/chart",
            ),
            yahoo_summary_url: env_var_or(
                "YAHOO_SUMMARY_URL",
                "https://query1.finance.yahoo.com/v10/finance/quoteSummary",
            ),
            yahoo_cookie_url: env_var_or("YAHOO_COOKIE_URL", "https://fc.yahoo.com"),
            yahoo_crumb_url: env_var_or(
                "YAHOO_CRUMB_URL",
                "https://query1.finance.yahoo.com/v1/test/getcrumb",
            ),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            history_range: env_var_or("HISTORY_RANGE", "1mo"),
            default_ticker: env_var_or("DEFAULT_TICKER", "AAPL"),
            default_expiration_days,
            static_dir: PathBuf::from(env_var_or("STATIC_DIR", "static")),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 5000,
            price_provider: ProviderKind::YahooSummary,
            yahoo_chart_url: "https://query1.finance.yahoo.com/v8/finance/chart".into(),
            yahoo_summary_url: "https://query1.finance.yahoo.com/v10/finance/quoteSummary".into(),
            yahoo_cookie_url: "https://fc.yahoo.com".into(),
            yahoo_crumb_url: "https://query1.finance.yahoo.com/v1/test/getcrumb".into(),
            fetch_timeout: Duration::from_secs(10),
            history_range: "1mo".into(),
            default_ticker: "AAPL".into(),
            default_expiration_days: 30,
            static_dir: PathBuf::from("static"),
        }
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_addr() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
        assert_eq!(cfg.default_ticker, "AAPL");
        assert_eq!(cfg.default_expiration_days, 30);
    }
}
