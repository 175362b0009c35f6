use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SlotRequest {
    pub parking_lot_id: Uuid,
    pub code: String,
    pub kind: String,
    pub width_cm: i32,
    pub length_cm: i32,
    /// WKT string, coordinate array or GeoJSON-style object.
    pub local_geometry: Option<serde_json::Value>,
    pub operational_state: Option<String>,
    pub tariff_id: Option<Uuid>,
    pub is_reservable: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSlotRequest {
    pub code: Option<String>,
    pub kind: Option<String>,
    pub width_cm: Option<i32>,
    pub length_cm: Option<i32>,
    pub local_geometry: Option<serde_json::Value>,
    pub operational_state: Option<String>,
    pub tariff_id: Option<Uuid>,
    pub is_reservable: Option<bool>,
}
