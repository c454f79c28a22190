use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ERROR_BODY_CHARS: usize = 200;

/// JSON POST seam between embedding providers and the network
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// reqwest-backed client with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Cannot build embedding HTTP client: {}", e))
            })?;

        Ok(Self { inner, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, url: &str, error: reqwest::Error) -> DomainError {
        if error.is_timeout() {
            DomainError::provider(
                "http",
                format!("POST {} timed out after {:?}", url, self.timeout),
            )
        } else {
            DomainError::provider("http", format!("POST {} failed: {}", url, error))
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let request = headers
            .into_iter()
            .fold(self.inner.post(url).timeout(self.timeout), |req, (k, v)| {
                req.header(k, v)
            });

        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let excerpt: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(DomainError::provider(
                "http",
                format!("{} returned {}: {}", url, status, excerpt),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::provider("http", format!("Invalid JSON from {}: {}", url, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_post_json_sends_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .and(header("X-Session", "s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let body = client
            .post_json(
                &format!("{}/echo", server.uri()),
                vec![("X-Session", "s1")],
                &serde_json::json!({}),
            )
            .await
            .unwrap();

        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_error_status_includes_body_excerpt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = HttpClient::new()
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("429"));
        assert!(message.contains("slow down"));
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::with_timeout(Duration::from_millis(50)).unwrap();
        let err = client
            .post_json(&server.uri(), vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }
}
