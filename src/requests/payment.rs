use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::services::paypal::BackUrls;

#[derive(Debug, Deserialize)]
pub struct CreateIntentRequest {
    pub reservation_id: Uuid,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub method: Option<String>,
    pub back_urls: Option<BackUrls>,
}

/// Same shape, used on the nested reservation route where the id comes
/// from the path.
#[derive(Debug, Deserialize)]
pub struct CreateReservationPaymentRequest {
    pub amount: Decimal,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub method: Option<String>,
    pub back_urls: Option<BackUrls>,
}

/// Mercado Pago notifications arrive as query parameters; PayPal posts a
/// JSON event body instead.
#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub topic: Option<String>,
    #[serde(rename = "data.id")]
    pub data_id: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    /// PayPal echoes the order id as `token` on return redirects.
    pub token: Option<String>,
}
