use async_trait::async_trait;
use gallery_api::{
    ErrorBody, GalleryError, ImageId, ImageOrder, ImageRecord, ListImagesResponse, LoginRequest,
    LoginResponse, RegisterRequest, ReorderRequest, Result,
};
use gallery_core::{AuthGateway, ImageGateway, Session};
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::GalleryConfig;

/// Longest error body quoted in an error message
const MAX_ERROR_BODY: usize = 500;

/// HTTP client for the gallery service
pub struct GalleryClient {
    base_url: String,
    client: reqwest::Client,
}

impl GalleryClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GalleryError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &GalleryConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Turn a transport-level reqwest error into a `GalleryError` with a hint
    /// about what went wrong
    fn format_reqwest_error(e: reqwest::Error, url: &str, operation: &str) -> GalleryError {
        if e.is_decode() {
            return GalleryError::Decode {
                message: format!(
                    "Failed to {} for {}: unexpected response format from server. Error: {}",
                    operation, url, e
                ),
            };
        }

        let message = if e.is_timeout() {
            format!(
                "Failed to {} for {}: timeout - request took too long (check network or increase timeout)",
                operation, url
            )
        } else if e.is_connect() {
            format!(
                "Failed to {} for {}: connection error - check network connectivity and that the server is running. Error: {}",
                operation, url, e
            )
        } else if e.is_request() {
            format!(
                "Failed to {} for {}: request error - invalid URL or malformed request. Error: {}",
                operation, url, e
            )
        } else {
            format!("Failed to {} for {}: {}. Debug details: {:?}", operation, url, e, e)
        };
        GalleryError::Network { message }
    }

    /// Map a non-2xx response to an error, preferring the service's
    /// `{ "message": ... }` body
    pub(crate) fn error_for_status(status: u16, body: &str) -> GalleryError {
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.chars().count() > MAX_ERROR_BODY => {
                let head: String = body.chars().take(MAX_ERROR_BODY).collect();
                format!("{}... (truncated)", head)
            }
            Err(_) => body.to_string(),
        };
        GalleryError::Http { status, message }
    }

    /// Current trace context as HTTP headers, for distributed tracing
    fn trace_headers() -> HeaderMap {
        use opentelemetry::global;
        use opentelemetry::Context;

        struct HeaderInjector {
            headers: HeaderMap,
        }
        impl opentelemetry::propagation::Injector for HeaderInjector {
            fn set(&mut self, key: &str, value: String) {
                if let Ok(header_name) = reqwest::header::HeaderName::from_bytes(key.as_bytes()) {
                    if let Ok(header_value) = reqwest::header::HeaderValue::from_str(&value) {
                        self.headers.insert(header_name, header_value);
                    }
                }
            }
        }

        let mut injector = HeaderInjector {
            headers: HeaderMap::new(),
        };
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&Context::current(), &mut injector);
        });
        injector.headers
    }

    /// Send a request and return the body of a successful response
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        operation: &str,
    ) -> Result<String> {
        let response = request
            .headers(Self::trace_headers())
            .send()
            .await
            .map_err(|e| {
                let err = Self::format_reqwest_error(e, url, operation);
                error!("[GalleryClient] {}", err);
                err
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GalleryError::Network {
            message: format!("Failed to read response body from {}: {}", url, e),
        })?;

        if !status.is_success() {
            let err = Self::error_for_status(status.as_u16(), &body);
            debug!("[GalleryClient] {} {} failed: {}", operation, url, err);
            return Err(err);
        }

        debug!(
            "[GalleryClient] {} {} ok, response_length={}",
            operation,
            url,
            body.len()
        );
        Ok(body)
    }
}

#[async_trait]
impl ImageGateway for GalleryClient {
    #[tracing::instrument(name = "client.list_images", skip_all)]
    async fn list_images(&self, session: &Session) -> Result<Vec<ImageRecord>> {
        let url = self.url("images");
        let request = self.client.get(&url).bearer_auth(session.token());
        let body = self.send(request, &url, "list images").await?;
        let parsed: ListImagesResponse = serde_json::from_str(&body)?;
        Ok(parsed.images)
    }

    #[tracing::instrument(name = "client.reorder_images", skip_all, fields(count = orders.len()))]
    async fn reorder_images(&self, session: &Session, orders: &[ImageOrder]) -> Result<()> {
        let url = self.url("images");
        let payload = ReorderRequest {
            images: orders.to_vec(),
        };
        let request = self
            .client
            .put(&url)
            .bearer_auth(session.token())
            .json(&payload);
        self.send(request, &url, "reorder images").await?;
        Ok(())
    }

    #[tracing::instrument(name = "client.delete_images", skip_all, fields(count = ids.len()))]
    async fn delete_images(&self, session: &Session, ids: &[ImageId]) -> Result<()> {
        let url = self.url("images");
        let request = self
            .client
            .delete(&url)
            .bearer_auth(session.token())
            .query(&delete_query(ids));
        self.send(request, &url, "delete images").await?;
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for GalleryClient {
    #[tracing::instrument(name = "client.login", skip_all)]
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let url = self.url("login");
        let body = self
            .send(self.client.post(&url).json(request), &url, "log in")
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    #[tracing::instrument(name = "client.register", skip_all)]
    async fn register(&self, request: &RegisterRequest) -> Result<()> {
        let url = self.url("register");
        self.send(self.client.post(&url).json(request), &url, "register")
            .await?;
        Ok(())
    }
}

/// `imageIds[]=a&imageIds[]=b`, the array encoding the service expects
fn delete_query(ids: &[ImageId]) -> Vec<(&'static str, &str)> {
    ids.iter().map(|id| ("imageIds[]", id.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = GalleryClient::new("http://localhost:8080/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/images"), "http://localhost:8080/api/images");
        assert_eq!(client.url("login"), "http://localhost:8080/api/login");
    }

    #[test]
    fn test_error_body_message_is_used() {
        let err = GalleryClient::error_for_status(401, r#"{"message": "Invalid password"}"#);
        assert_eq!(
            err,
            GalleryError::Http {
                status: 401,
                message: "Invalid password".into()
            }
        );
    }

    #[test]
    fn test_plain_body_is_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY + 20);
        let err = GalleryClient::error_for_status(500, &body);
        let message = err.message();
        assert!(message.ends_with("... (truncated)"));
        assert_eq!(message.len(), MAX_ERROR_BODY + "... (truncated)".len());

        let short = GalleryClient::error_for_status(502, "Bad Gateway");
        assert_eq!(short.message(), "Bad Gateway");
    }

    #[test]
    fn test_delete_query_repeats_key() {
        let ids = vec![ImageId::new("a"), ImageId::new("b")];
        assert_eq!(
            delete_query(&ids),
            vec![("imageIds[]", "a"), ("imageIds[]", "b")]
        );
    }
}
