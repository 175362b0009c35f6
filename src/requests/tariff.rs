use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TariffRequest {
    pub name: String,
    pub currency: Option<String>,
    pub calculation_mode: String,
    pub base_price: Option<Decimal>,
    pub hourly_price: Option<Decimal>,
    pub fraction_minutes: Option<i32>,
    pub minimum_billable_minutes: Option<i32>,
    pub daily_cap: Option<Decimal>,
    pub rules: Option<serde_json::Value>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTariffRequest {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub calculation_mode: Option<String>,
    pub base_price: Option<Decimal>,
    pub hourly_price: Option<Decimal>,
    pub fraction_minutes: Option<i32>,
    pub minimum_billable_minutes: Option<i32>,
    pub daily_cap: Option<Decimal>,
    pub rules: Option<serde_json::Value>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}
