use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::types::{ExchangeCargoId, UserId};

#[derive(Debug, Clone)]
pub struct ExchangeCargoCreateDBRequest {
    pub user_id: UserId,
    pub alici_adi: String,
    pub firma: String,
    pub desi: f64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ExchangeCargoDBResponse {
    pub id: ExchangeCargoId,
    pub alici_adi: String,
    pub firma: String,
    pub desi: f64,
    pub created_at: NaiveDateTime,
    pub kurye_name: String,
    pub kurye_username: String,
}
