use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::models::transactions::TransactionDBResponse;
use crate::types::TransactionId;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveBarcodesRequest {
    /// Carrier the returned shipments belong to (e.g. "PTT").
    pub firma: String,
    pub barcodes: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveBarcodesResponse {
    pub success: bool,
    pub message: String,
    pub adet: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BarcodeCheckRequest {
    pub barcode: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarcodeCheckResponse {
    pub success: bool,
    pub exists: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TransactionListQuery {
    /// Substring match against the scanned barcodes of each batch.
    pub barcode: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionResponse {
    pub id: TransactionId,
    pub firma: String,
    pub adet: i64,
    pub created_at: NaiveDateTime,
    pub kurye_name: String,
    pub kurye_username: String,
}

impl From<TransactionDBResponse> for TransactionResponse {
    fn from(t: TransactionDBResponse) -> Self {
        Self {
            id: t.id,
            firma: t.firma,
            adet: t.adet,
            created_at: t.created_at,
            kurye_name: t.kurye_name,
            kurye_username: t.kurye_username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<TransactionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionDetailResponse {
    pub success: bool,
    pub transaction: TransactionResponse,
    pub barcodes: Vec<String>,
}
