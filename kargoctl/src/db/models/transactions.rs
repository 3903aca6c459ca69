use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::types::{TransactionId, UserId};

/// One barcode batch insert: parent row plus one child row per barcode,
/// written in a single database transaction.
#[derive(Debug, Clone)]
pub struct TransactionCreateDBRequest {
    pub user_id: UserId,
    pub firma: String,
    pub barcodes: Vec<String>,
}

/// Batch row joined with the courier who logged it.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionDBResponse {
    pub id: TransactionId,
    pub firma: String,
    pub adet: i64,
    pub created_at: NaiveDateTime,
    pub kurye_name: String,
    pub kurye_username: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Substring match on child barcodes; `None` lists everything.
    pub barcode: Option<String>,
}
