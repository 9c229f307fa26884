use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Closed set of failures the simulator can surface.
/// Every variant maps to a fixed client message; the inner text is for logs only.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("no price data for ticker: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("price provider timed out")]
    Timeout,

    #[error("price provider rate limited the request")]
    RateLimited,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

impl SimError {
    /// Failures that may succeed if the same request is repeated later.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SimError::Network(_) | SimError::Timeout | SimError::RateLimited | SimError::Parse(_)
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            SimError::NotFound(_) => StatusCode::NOT_FOUND,
            SimError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for SimError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SimError::Timeout
        } else if e.is_decode() {
            SimError::Parse(e.to_string())
        } else {
            SimError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e.to_string())
    }
}

impl IntoResponse for SimError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            SimError::NotFound(ticker) => serde_json::json!({
                "error": format!("No data found for ticker: {ticker}"),
            }),
            SimError::Validation(msg) => serde_json::json!({ "error": msg }),
            SimError::Config(_) => serde_json::json!({ "error": "Internal server error" }),
            _ => serde_json::json!({
                "error": "Error fetching data",
                "details": "If this persists, please try again in a few minutes",
            }),
        };
        (status, Json(body)).into_response()
    }
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(SimError::NotFound("XYZ".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(SimError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(SimError::Timeout.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(SimError::Config("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_transient_kinds() {
        assert!(SimError::Timeout.is_transient());
        assert!(SimError::RateLimited.is_transient());
        assert!(SimError::Parse("bad".into()).is_transient());
        assert!(!SimError::NotFound("XYZ".into()).is_transient());
        assert!(!SimError::Validation("x".into()).is_transient());
    }

    #[tokio::test]
    async fn test_transient_body_does_not_leak_internal_text() {
        let resp = SimError::Network("connection refused at 10.0.0.1".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("10.0.0.1"));
        assert!(text.contains("Error fetching data"));
    }
}
