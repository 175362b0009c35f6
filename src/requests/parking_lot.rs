use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ParkingLotRequest {
    pub establishment_id: Uuid,
    pub name: String,
    pub kind: String,
    pub supports_accessible: Option<bool>,
    pub supports_motorcycles: Option<bool>,
    pub supports_electric: Option<bool>,
    pub has_chargers: Option<bool>,
    pub charger_count: Option<i32>,
    pub tariff_id: Option<Uuid>,
    pub cancellation_policy_id: Option<Uuid>,
    pub location: serde_json::Value,
    pub perimeter: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateParkingLotRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub supports_accessible: Option<bool>,
    pub supports_motorcycles: Option<bool>,
    pub supports_electric: Option<bool>,
    pub has_chargers: Option<bool>,
    pub charger_count: Option<i32>,
    pub tariff_id: Option<Uuid>,
    pub cancellation_policy_id: Option<Uuid>,
    pub status: Option<String>,
    pub location: Option<serde_json::Value>,
    pub perimeter: Option<serde_json::Value>,
}
