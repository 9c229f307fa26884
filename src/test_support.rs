//! Local HTTP/1.1 responder for exercising the Yahoo clients without the network.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub enum StubResponse {
    Reply {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },
    /// Accept the request and never answer.
    Stall,
}

impl StubResponse {
    pub fn status(status: u16, body: &str) -> Self {
        Self::Reply {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    pub fn json(body: &str) -> Self {
        Self::status(200, body).with_header("content-type", "application/json")
    }

    pub fn with_header(self, name: &str, value: &str) -> Self {
        match self {
            Self::Reply { status, mut headers, body } => {
                headers.push((name.to_string(), value.to_string()));
                Self::Reply { status, headers, body }
            }
            Self::Stall => Self::Stall,
        }
    }
}

pub struct StubServer {
    pub base: String,
    /// Raw request heads (request line + headers), lowercased, in arrival order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve every connection with `handler(request_target)` until the test runtime shuts down.
pub async fn spawn<F>(handler: F) -> StubServer
where
    F: Fn(&str) -> StubResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(handler);

    let log = requests.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let handler = handler.clone();
            let log = log.clone();
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head).to_string();
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                log.lock().unwrap().push(head.to_ascii_lowercase());

                match (handler.as_ref())(&target) {
                    StubResponse::Stall => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        drop(socket);
                    }
                    StubResponse::Reply { status, headers, body } => {
                        let mut out = format!(
                            "HTTP/1.1 {status} Stub\r\ncontent-length: {}\r\nconnection: close\r\n",
                            body.len()
                        );
                        for (name, value) in headers {
                            out.push_str(&format!("{name}: {value}\r\n"));
                        }
                        out.push_str("\r\n");
                        out.push_str(&body);
                        let _ = socket.write_all(out.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                }
            });
        }
    });

    StubServer {
        base: format!("http://{addr}"),
        requests,
    }
}

/// Minimal v8 chart payload with one close and a live market price.
pub fn chart_body(price: f64) -> String {
    format!(
        r#"{{"chart": {{"result": [{{
            "meta": {{"shortName": "Stub Corp", "regularMarketPrice": {price}}},
            "timestamp": [1704205800],
            "indicators": {{"quote": [{{"close": [{price}]}}]}}
        }}], "error": null}}}}"#
    )
}

pub fn client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap()
}
