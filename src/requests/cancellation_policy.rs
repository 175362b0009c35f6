use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CancellationPolicyRequest {
    pub short_description: Option<String>,
    pub rules: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCancellationPolicyRequest {
    pub short_description: Option<String>,
    pub rules: Option<serde_json::Value>,
}
