use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct OpinionRequest {
    pub establishment_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOpinionRequest {
    pub rating: Option<i16>,
    pub comment: Option<String>,
}
