use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::exchange_cargos::ExchangeCargoDBResponse;
use crate::types::ExchangeCargoId;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExchangeCargoSaveRequest {
    pub alici_adi: String,
    pub firma: String,
    /// Volumetric weight; must be positive.
    pub desi: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeCargoResponse {
    pub id: ExchangeCargoId,
    pub alici_adi: String,
    pub firma: String,
    pub desi: f64,
    pub created_at: NaiveDateTime,
    pub kurye_name: String,
    pub kurye_username: String,
}

impl From<ExchangeCargoDBResponse> for ExchangeCargoResponse {
    fn from(c: ExchangeCargoDBResponse) -> Self {
        Self {
            id: c.id,
            alici_adi: c.alici_adi,
            firma: c.firma,
            desi: c.desi,
            created_at: c.created_at,
            kurye_name: c.kurye_name,
            kurye_username: c.kurye_username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ExchangeCargoListResponse {
    pub success: bool,
    #[serde(rename = "exchangeCargos")]
    pub exchange_cargos: Vec<ExchangeCargoResponse>,
}
