use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ReservationRequest {
    pub slot_id: Option<Uuid>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub total_price: Option<Decimal>,
    pub currency: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub total_price: Option<Decimal>,
    pub currency: Option<String>,
    pub origin: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConfirmReservationRequest {
    pub slot_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationListQuery {
    pub status: Option<String>,
}
