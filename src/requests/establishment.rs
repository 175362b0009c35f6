use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct EstablishmentRequest {
    pub name: String,
    pub description: Option<String>,
    pub street: String,
    pub street_number: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub postal_code: String,
    /// WKT string, coordinate array or `{latitude, longitude}` object.
    pub location: serde_json::Value,
    pub perimeter: Option<serde_json::Value>,
    pub general_schedule: Option<serde_json::Value>,
    pub theoretical_capacity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEstablishmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub location: Option<serde_json::Value>,
    pub perimeter: Option<serde_json::Value>,
    pub status: Option<String>,
    pub general_schedule: Option<serde_json::Value>,
    pub theoretical_capacity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AssignManagerRequest {
    pub user_id: Uuid,
}
