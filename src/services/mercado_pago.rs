use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::MercadoPagoSettings;
use crate::services::paypal::{BackUrls, ProviderOrder};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum MercadoPagoError {
    #[error("Mercado Pago access token is not configured")]
    NotConfigured,
    #[error("Mercado Pago request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Mercado Pago error {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: u32,
    pub currency_id: String,
    pub unit_price: Decimal,
}

#[derive(Debug, Clone)]
pub struct CreatePreferenceInput {
    pub external_reference: String,
    pub items: Vec<PreferenceItem>,
    pub back_urls: BackUrls,
    pub notification_url: Option<String>,
}

pub struct MercadoPagoClient {
    http: reqwest::Client,
    settings: MercadoPagoSettings,
}

impl MercadoPagoClient {
    pub fn new(settings: MercadoPagoSettings) -> Result<Self, MercadoPagoError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http, settings })
    }

    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, MercadoPagoError> {
        if self.settings.access_token.is_empty() {
            return Err(MercadoPagoError::NotConfigured);
        }

        let mut request = self
            .http
            .request(method, format!("{}{}", self.settings.api_base, path))
            .bearer_auth(&self.settings.access_token)
            .header("Content-Type", "application/json");

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MercadoPagoError::Api { status, body });
        }

        Ok(response.json().await?)
    }

    pub async fn create_preference(
        &self,
        input: CreatePreferenceInput,
    ) -> Result<ProviderOrder, MercadoPagoError> {
        let body = serde_json::json!({
            "external_reference": input.external_reference,
            "items": input.items,
            "back_urls": input.back_urls,
            "notification_url": input.notification_url.clone().or_else(|| self.settings.webhook_url.clone()),
            "auto_return": "approved",
        });

        let data = self
            .request(reqwest::Method::POST, "/checkout/preferences", Some(body))
            .await?;

        // Sandbox credentials only get the sandbox checkout link.
        let approve_url = data["init_point"]
            .as_str()
            .or_else(|| data["sandbox_init_point"].as_str())
            .map(str::to_string);

        debug!(preference_id = data["id"].as_str(), "Created Mercado Pago preference");

        Ok(ProviderOrder {
            id: data["id"].as_str().unwrap_or_default().to_string(),
            status: None,
            approve_url,
            raw: data,
        })
    }

    pub async fn get_payment(&self, payment_id: &str) -> Result<serde_json::Value, MercadoPagoError> {
        self.request(
            reqwest::Method::GET,
            &format!("/v1/payments/{payment_id}"),
            None,
        )
        .await
    }

    pub async fn get_merchant_order(
        &self,
        order_id: &str,
    ) -> Result<serde_json::Value, MercadoPagoError> {
        self.request(
            reqwest::Method::GET,
            &format!("/merchant_orders/{order_id}"),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base: &str) -> MercadoPagoSettings {
        MercadoPagoSettings {
            access_token: "mp-token".to_string(),
            api_base: base.to_string(),
            webhook_url: Some("https://example.test/api/payments/webhook".to_string()),
        }
    }

    #[tokio::test]
    async fn create_preference_sends_external_reference_and_parses_init_point() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkout/preferences"))
            .and(body_partial_json(serde_json::json!({
                "external_reference": "pago-7",
                "auto_return": "approved",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "PREF-7",
                "init_point": "https://mp.test/init/PREF-7",
            })))
            .mount(&server)
            .await;

        let client = MercadoPagoClient::new(settings(&server.uri())).unwrap();
        let preference = client
            .create_preference(CreatePreferenceInput {
                external_reference: "pago-7".to_string(),
                items: vec![PreferenceItem {
                    title: "Reservation".to_string(),
                    description: None,
                    quantity: 1,
                    currency_id: "ARS".to_string(),
                    unit_price: Decimal::new(150000, 2),
                }],
                back_urls: BackUrls::default(),
                notification_url: None,
            })
            .await
            .unwrap();

        assert_eq!(preference.id, "PREF-7");
        assert_eq!(
            preference.approve_url.as_deref(),
            Some("https://mp.test/init/PREF-7")
        );
    }

    #[tokio::test]
    async fn get_payment_requires_token() {
        let client = MercadoPagoClient::new(MercadoPagoSettings {
            access_token: String::new(),
            api_base: "http://localhost:1".to_string(),
            webhook_url: None,
        })
        .unwrap();

        assert!(matches!(
            client.get_payment("1").await.unwrap_err(),
            MercadoPagoError::NotConfigured
        ));
    }
}
