use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::observability;
use crate::types::{ChatReply, ChatRequest, SessionResponse};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// The two-endpoint interface of a chat service.
///
/// The production implementation is [`Relay`]. Front-ends are written
/// against this trait so a service can be substituted in tests without a
/// network in the way.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Obtain a fresh session identifier.
    async fn generate_session(&self) -> Result<SessionResponse>;

    /// Send one message under the given session and await the single reply.
    async fn chat(&self, session_id: &str, message: &str) -> Result<ChatReply>;
}

/// HTTP client for a chat service.
#[derive(Debug, Clone)]
pub struct Relay {
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl Relay {
    /// Create a new relay.
    ///
    /// The base URL can be provided directly or read from the
    /// PARLOR_BASE_URL environment variable, falling back to
    /// `http://127.0.0.1:8000/`.
    pub fn new(base_url: Option<String>) -> Result<Self> {
        Self::with_options(base_url, None)
    }

    /// Create a new relay with a custom request timeout.
    ///
    /// The timeout bounds how long a single exchange can stay outstanding;
    /// when it fires the request resolves as a transport failure.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => env::var("PARLOR_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        };
        let base_url = normalize_base_url(base_url)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Returns the base URL this relay talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create and return default headers for service requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Map a reqwest send failure to the transport side of the taxonomy.
    fn map_transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Convert a non-success response to an error.
    ///
    /// The body is expected to be a JSON object with a human-readable
    /// `detail` field. When the body cannot be parsed, a generic message
    /// carrying the numeric status is synthesized instead.
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        #[derive(Deserialize)]
        struct ErrorBody {
            detail: Option<String>,
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.detail);
        match detail {
            Some(detail) => Error::api(status_code, detail),
            None => Error::api(
                status_code,
                format!("status {status_code} with no parseable error detail"),
            ),
        }
    }

    async fn generate_session_inner(&self) -> Result<SessionResponse> {
        let url = format!("{}generate-session", self.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<SessionResponse>().await.map_err(|e| {
            Error::serialization(
                format!("failed to parse session response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    async fn chat_inner(&self, session_id: &str, message: &str) -> Result<ChatReply> {
        let url = format!("{}chat", self.base_url);
        let request = ChatRequest::new(session_id, message);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<ChatReply>().await.map_err(|e| {
            Error::serialization(
                format!("failed to parse chat response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl Backend for Relay {
    async fn generate_session(&self) -> Result<SessionResponse> {
        observability::SESSION_REQUESTS.click();
        let start = Instant::now();
        let result = self.generate_session_inner().await;
        observability::REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            observability::SESSION_ERRORS.click();
        }
        result
    }

    async fn chat(&self, session_id: &str, message: &str) -> Result<ChatReply> {
        observability::CHAT_REQUESTS.click();
        let start = Instant::now();
        let result = self.chat_inner(session_id, message).await;
        observability::REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            observability::CHAT_ERRORS.click();
        }
        result
    }
}

/// Validate a base URL and guarantee it ends with a single slash, so
/// endpoint paths can be appended directly.
fn normalize_base_url(base_url: String) -> Result<String> {
    url::Url::parse(&base_url)?;
    if base_url.ends_with('/') {
        Ok(base_url)
    } else {
        Ok(format!("{base_url}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_creation() {
        let relay = Relay::new(Some("http://example.com/".to_string())).unwrap();
        assert_eq!(relay.base_url(), "http://example.com/");
        assert_eq!(relay.timeout, DEFAULT_TIMEOUT);

        let relay = Relay::with_options(
            Some("http://example.com:9000/".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(relay.base_url(), "http://example.com:9000/");
        assert_eq!(relay.timeout, Duration::from_secs(30));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let relay = Relay::new(Some("http://example.com:9000".to_string())).unwrap();
        assert_eq!(relay.base_url(), "http://example.com:9000/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Relay::new(Some("not a url".to_string())).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }
}
