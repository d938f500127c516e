//! Shop backend HTTP plumbing.

use reqwest::{Client, Response, StatusCode};

/// HTTP client bound to the shop backend's `/api` root.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(base_url: &str, http: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Absolute URL for an API path such as `orders/42`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Underlying HTTP client.
    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }
}

/// Status and body of a failed response, for error messages.
pub(crate) async fn failure(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    (status, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_api_root() {
        let client = ApiClient::new("http://localhost:8001/");

        assert_eq!(client.url("orders"), "http://localhost:8001/api/orders");
        assert_eq!(client.url("/products/7"), "http://localhost:8001/api/products/7");
    }
}
