use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::config::PayPalSettings;

const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

#[derive(Error, Debug)]
pub enum PayPalError {
    #[error("PayPal credentials are not configured")]
    NotConfigured,
    #[error("PayPal request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("PayPal error {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: Option<String>,
    pub pending: Option<String>,
    pub failure: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub reference_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,
    pub back_urls: BackUrls,
}

/// Normalized order/preference payload shared by both providers.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderOrder {
    pub id: String,
    pub status: Option<String>,
    pub approve_url: Option<String>,
    pub raw: serde_json::Value,
}

struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

pub struct PayPalClient {
    http: reqwest::Client,
    settings: PayPalSettings,
    token_cache: Mutex<Option<CachedToken>>,
}

impl PayPalClient {
    pub fn new(settings: PayPalSettings) -> Result<Self, PayPalError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            settings,
            token_cache: Mutex::new(None),
        })
    }

    /// Client-credentials token, cached in-process and refreshed a minute
    /// before expiry.
    async fn access_token(&self) -> Result<String, PayPalError> {
        let mut cache = self.token_cache.lock().await;
        if let Some(token) = cache.as_ref() {
            if token.expires_at > Utc::now() + Duration::seconds(60) {
                return Ok(token.value.clone());
            }
        }

        if self.settings.client_id.is_empty() || self.settings.client_secret.is_empty() {
            return Err(PayPalError::NotConfigured);
        }

        let response = self
            .http
            .post(format!("{}/v1/oauth2/token", self.settings.api_base))
            .basic_auth(&self.settings.client_id, Some(&self.settings.client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PayPalError::Api { status, body });
        }

        let token: TokenResponse = response.json().await?;
        let expires_at = Utc::now() + Duration::seconds(token.expires_in.unwrap_or(600));
        *cache = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });

        Ok(token.access_token)
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
        idempotency_key: Option<&str>,
    ) -> Result<serde_json::Value, PayPalError> {
        let token = self.access_token().await?;
        let mut request = self
            .http
            .request(method, format!("{}{}", self.settings.api_base, path))
            .bearer_auth(token)
            .header("Content-Type", "application/json");

        if let Some(key) = idempotency_key {
            request = request.header("PayPal-Request-Id", key);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PayPalError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    pub async fn create_order(&self, input: CreateOrderInput) -> Result<ProviderOrder, PayPalError> {
        let description = input.description.as_deref().map(|d| {
            let end = d.char_indices().nth(127).map(|(i, _)| i).unwrap_or(d.len());
            &d[..end]
        });

        let body = serde_json::json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": input.reference_id,
                "description": description,
                "amount": {
                    "currency_code": input.currency,
                    "value": input.amount.round_dp(2).to_string(),
                },
            }],
            "application_context": {
                "return_url": input.back_urls.success,
                "cancel_url": input.back_urls.failure.clone().or(input.back_urls.pending.clone()),
            },
        });

        let idempotency_key = Uuid::new_v4().to_string();
        let data = self
            .request(
                reqwest::Method::POST,
                "/v2/checkout/orders",
                Some(body),
                Some(&idempotency_key),
            )
            .await?;

        let approve_url = data["links"]
            .as_array()
            .and_then(|links| {
                links
                    .iter()
                    .find(|link| link["rel"].as_str() == Some("approve"))
            })
            .and_then(|link| link["href"].as_str())
            .map(str::to_string);

        debug!(order_id = data["id"].as_str(), "Created PayPal order");

        Ok(ProviderOrder {
            id: data["id"].as_str().unwrap_or_default().to_string(),
            status: data["status"].as_str().map(str::to_string),
            approve_url,
            raw: data,
        })
    }

    pub async fn get_order(&self, order_id: &str) -> Result<serde_json::Value, PayPalError> {
        self.request(
            reqwest::Method::GET,
            &format!("/v2/checkout/orders/{order_id}"),
            None,
            None,
        )
        .await
    }

    pub async fn capture_order(&self, order_id: &str) -> Result<serde_json::Value, PayPalError> {
        self.request(
            reqwest::Method::POST,
            &format!("/v2/checkout/orders/{order_id}/capture"),
            Some(serde_json::json!({})),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base: &str) -> PayPalSettings {
        PayPalSettings {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            api_base: base.to_string(),
        }
    }

    fn mock_token(expires_in: i64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "test-token",
            "expires_in": expires_in,
        }))
    }

    #[tokio::test]
    async fn create_order_extracts_id_and_approve_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(mock_token(3600))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "ORDER-1",
                "status": "CREATED",
                "links": [
                    {"rel": "self", "href": "https://paypal.test/orders/ORDER-1"},
                    {"rel": "approve", "href": "https://paypal.test/approve/ORDER-1"},
                ],
            })))
            .mount(&server)
            .await;

        let client = PayPalClient::new(settings(&server.uri())).unwrap();
        let order = client
            .create_order(CreateOrderInput {
                reference_id: "pago-1".to_string(),
                amount: Decimal::new(100050, 2),
                currency: "ARS".to_string(),
                description: Some("Reservation".to_string()),
                back_urls: BackUrls::default(),
            })
            .await
            .unwrap();

        assert_eq!(order.id, "ORDER-1");
        assert_eq!(order.status.as_deref(), Some("CREATED"));
        assert_eq!(
            order.approve_url.as_deref(),
            Some("https://paypal.test/approve/ORDER-1")
        );
    }

    #[tokio::test]
    async fn access_token_is_cached_across_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(mock_token(3600))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/checkout/orders/ORDER-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "ORDER-1", "status": "CREATED"})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let client = PayPalClient::new(settings(&server.uri())).unwrap();
        client.get_order("ORDER-1").await.unwrap();
        client.get_order("ORDER-1").await.unwrap();
    }

    #[tokio::test]
    async fn api_errors_surface_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(mock_token(3600))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ORDER-9/capture"))
            .respond_with(ResponseTemplate::new(422).set_body_string("ORDER_ALREADY_CAPTURED"))
            .mount(&server)
            .await;

        let client = PayPalClient::new(settings(&server.uri())).unwrap();
        let error = client.capture_order("ORDER-9").await.unwrap_err();
        match error {
            PayPalError::Api { status, body } => {
                assert_eq!(status, 422);
                assert!(body.contains("ORDER_ALREADY_CAPTURED"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_any_request() {
        let client = PayPalClient::new(PayPalSettings {
            client_id: String::new(),
            client_secret: String::new(),
            api_base: "http://localhost:1".to_string(),
        })
        .unwrap();
        assert!(matches!(
            client.get_order("ORDER-1").await.unwrap_err(),
            PayPalError::NotConfigured
        ));
    }
}
