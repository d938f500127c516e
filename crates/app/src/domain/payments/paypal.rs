//! PayPal Orders v2 client.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use nutricart::checkout::{PaymentCapture, PaymentRequest, ProviderOrderId};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::{
    domain::payments::{PaymentApproval, PaymentError, PaymentProvider},
    http::failure,
};

const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

/// Tokens are refreshed this long before PayPal says they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Credentials and endpoint for the PayPal REST API.
#[derive(Clone)]
pub struct PayPalConfig {
    /// REST base URL, e.g. `https://api-m.sandbox.paypal.com`.
    pub api_url: String,

    /// OAuth client id.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: Zeroizing<String>,
}

impl Debug for PayPalConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PayPalConfig")
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

struct AccessToken {
    value: Zeroizing<String>,
    expires_at: Instant,
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// HTTP client for PayPal checkout orders.
#[derive(Debug)]
pub struct PayPalClient {
    config: PayPalConfig,
    http: Client,
    token: Mutex<Option<AccessToken>>,
}

impl PayPalClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: PayPalConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create a client reusing an existing connection pool.
    #[must_use]
    pub fn with_client(config: PayPalConfig, http: Client) -> Self {
        Self {
            config: PayPalConfig {
                api_url: config.api_url.trim_end_matches('/').to_string(),
                ..config
            },
            http,
            token: Mutex::new(None),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url, path.trim_start_matches('/'))
    }

    async fn access_token(&self) -> Result<Zeroizing<String>, PaymentError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        let response = self
            .http
            .post(self.url("v1/oauth2/token"))
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.as_str()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let (_, text) = failure(response).await;

            return Err(PaymentError::Unauthorized(text));
        }

        if !status.is_success() {
            let (status, text) = failure(response).await;

            return Err(PaymentError::UnexpectedResponse(format!(
                "token request failed with status {status}: {text}"
            )));
        }

        let parsed: TokenResponse = response.json().await?;

        let lifetime = Duration::from_secs(parsed.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = Zeroizing::new(parsed.access_token);

        debug!(expires_in = parsed.expires_in, "paypal access token issued");

        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(value)
    }

    async fn fetch_order(&self, order_id: &ProviderOrderId) -> Result<OrderResponse, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.url(&format!("v2/checkout/orders/{order_id}")))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, text) = failure(response).await;

            return Err(PaymentError::UnexpectedResponse(format!(
                "get order failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl PaymentProvider for PayPalClient {
    async fn create_order(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentApproval, PaymentError> {
        let token = self.access_token().await?;
        let body = CreateOrderBody::from_request(request);

        let response = self
            .http
            .post(self.url("v2/checkout/orders"))
            .bearer_auth(token.as_str())
            .header(REQUEST_ID_HEADER, Uuid::now_v7().to_string())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, text) = failure(response).await;

            return Err(PaymentError::UnexpectedResponse(format!(
                "create order failed with status {status}: {text}"
            )));
        }

        let created: OrderResponse = response.json().await?;
        let approve_url = created
            .approve_url()
            .ok_or(PaymentError::MissingApprovalLink)?
            .to_string();

        info!(
            provider_order = %created.id,
            total = %request.total().amount(),
            "paypal order created"
        );

        Ok(PaymentApproval {
            order_id: ProviderOrderId::new(created.id),
            approve_url,
        })
    }

    async fn capture(&self, order_id: &ProviderOrderId) -> Result<PaymentCapture, PaymentError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .post(self.url(&format!("v2/checkout/orders/{order_id}/capture")))
            .bearer_auth(token.as_str())
            .header(REQUEST_ID_HEADER, format!("capture-{order_id}"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await?;

        let captured: OrderResponse = if response.status().is_success() {
            response.json().await?
        } else {
            let (status, text) = failure(response).await;

            if status == StatusCode::UNPROCESSABLE_ENTITY && text.contains("ORDER_ALREADY_CAPTURED")
            {
                warn!(provider_order = %order_id, "paypal order already captured, fetching capture");

                self.fetch_order(order_id).await?
            } else {
                return Err(PaymentError::UnexpectedResponse(format!(
                    "capture failed with status {status}: {text}"
                )));
            }
        };

        let capture = captured.into_capture(order_id)?;

        info!(
            provider_order = %capture.order_id,
            capture = capture.capture_id.as_deref().unwrap_or_default(),
            "paypal payment captured"
        );

        Ok(capture)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Serialize)]
struct CreateOrderBody {
    intent: &'static str,
    purchase_units: Vec<PurchaseUnit>,
}

impl CreateOrderBody {
    fn from_request(request: &PaymentRequest) -> Self {
        let currency_code = request.currency();
        let (item_total, shipping, total) = request.amounts();

        Self {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnit {
                amount: Amount {
                    currency_code,
                    value: total,
                    breakdown: Breakdown {
                        item_total: Money {
                            currency_code,
                            value: item_total,
                        },
                        shipping: Money {
                            currency_code,
                            value: shipping,
                        },
                    },
                },
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct PurchaseUnit {
    amount: Amount,
}

#[derive(Debug, Serialize)]
struct Amount {
    currency_code: &'static str,
    value: String,
    breakdown: Breakdown,
}

#[derive(Debug, Serialize)]
struct Breakdown {
    item_total: Money,
    shipping: Money,
}

#[derive(Debug, Serialize)]
struct Money {
    currency_code: &'static str,
    value: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,

    #[serde(default)]
    links: Vec<Link>,

    #[serde(default)]
    purchase_units: Vec<CapturedUnit>,
}

impl OrderResponse {
    fn approve_url(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.rel == "approve" || link.rel == "payer-action")
            .map(|link| link.href.as_str())
    }

    fn into_capture(self, order_id: &ProviderOrderId) -> Result<PaymentCapture, PaymentError> {
        if self.id != order_id.as_str() {
            return Err(PaymentError::UnexpectedResponse(format!(
                "capture returned order {} instead of {order_id}",
                self.id
            )));
        }

        let capture = self
            .purchase_units
            .into_iter()
            .filter_map(|unit| unit.payments)
            .flat_map(|payments| payments.captures)
            .next();

        let status = capture
            .as_ref()
            .map_or(self.status.clone(), |capture| capture.status.clone());

        if self.status != "COMPLETED" || status != "COMPLETED" {
            return Err(PaymentError::NotCompleted(status));
        }

        Ok(PaymentCapture {
            order_id: order_id.clone(),
            capture_id: capture.map(|capture| capture.id),
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct CapturedUnit {
    payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
    id: String,
    status: String,
}

#[cfg(test)]
mod tests {
    use nutricart::{
        cart::CartStore,
        checkout::{CheckoutSession, FormField, PaymentMethod},
        products::Product,
    };
    use rust_decimal::Decimal;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn paypal_request() -> TestResult<PaymentRequest> {
        let mut cart = CartStore::in_memory();

        cart.add_item(&Product {
            id: "p-1".to_string(),
            name: "Omega 3".to_string(),
            category: String::new(),
            price: Decimal::new(12_50, 2),
            image: String::new(),
            description: String::new(),
            in_stock: true,
            featured: false,
        });
        cart.update_quantity("p-1", 4);

        let mut session = CheckoutSession::default();

        for field in FormField::REQUIRED {
            session.set_field(field, "x")?;
        }

        session.select_payment_method(PaymentMethod::PayPal)?;

        Ok(session.payment_request(&cart)?)
    }

    #[test]
    fn create_body_carries_breakdown() -> TestResult {
        let body = CreateOrderBody::from_request(&paypal_request()?);

        assert_eq!(
            serde_json::to_value(&body)?,
            json!({
                "intent": "CAPTURE",
                "purchase_units": [{
                    "amount": {
                        "currency_code": "EUR",
                        "value": "67.80",
                        "breakdown": {
                            "item_total": { "currency_code": "EUR", "value": "50.00" },
                            "shipping": { "currency_code": "EUR", "value": "17.80" }
                        }
                    }
                }]
            })
        );

        Ok(())
    }

    #[test]
    fn approve_link_is_found() -> TestResult {
        let order: OrderResponse = serde_json::from_value(json!({
            "id": "5O190127TN364715T",
            "status": "CREATED",
            "links": [
                { "href": "https://api/self", "rel": "self", "method": "GET" },
                { "href": "https://paypal/approve", "rel": "approve", "method": "GET" }
            ]
        }))?;

        assert_eq!(order.approve_url(), Some("https://paypal/approve"));

        Ok(())
    }

    #[test]
    fn completed_capture_is_accepted() -> TestResult {
        let order: OrderResponse = serde_json::from_value(json!({
            "id": "ORDER-1",
            "status": "COMPLETED",
            "purchase_units": [{
                "payments": { "captures": [{ "id": "CAP-1", "status": "COMPLETED" }] }
            }]
        }))?;

        let capture = order.into_capture(&ProviderOrderId::new("ORDER-1"))?;

        assert_eq!(capture.capture_id.as_deref(), Some("CAP-1"));
        assert_eq!(capture.status, "COMPLETED");

        Ok(())
    }

    #[test]
    fn pending_capture_is_rejected() -> TestResult {
        let order: OrderResponse = serde_json::from_value(json!({
            "id": "ORDER-1",
            "status": "COMPLETED",
            "purchase_units": [{
                "payments": { "captures": [{ "id": "CAP-1", "status": "PENDING" }] }
            }]
        }))?;

        let result = order.into_capture(&ProviderOrderId::new("ORDER-1"));

        assert!(
            matches!(result, Err(PaymentError::NotCompleted(ref status)) if status == "PENDING"),
            "expected NotCompleted, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn capture_for_other_order_is_rejected() -> TestResult {
        let order: OrderResponse = serde_json::from_value(json!({
            "id": "ORDER-2",
            "status": "COMPLETED"
        }))?;

        let result = order.into_capture(&ProviderOrderId::new("ORDER-1"));

        assert!(matches!(result, Err(PaymentError::UnexpectedResponse(_))));

        Ok(())
    }

    #[test]
    fn config_debug_hides_secret() {
        let config = PayPalConfig {
            api_url: "https://api".to_string(),
            client_id: "id".to_string(),
            client_secret: Zeroizing::new("hunter2".to_string()),
        };

        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
