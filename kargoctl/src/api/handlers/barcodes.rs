//! Barcode batch intake: duplicate check and batch save.

use crate::api::Json;
use axum::extract::State;
use tracing::{info, instrument};

use crate::AppState;
use crate::api::models::transactions::{
    BarcodeCheckRequest, BarcodeCheckResponse, SaveBarcodesRequest, SaveBarcodesResponse,
};
use crate::auth::{CurrentUser, policy};
use crate::db::handlers::{Repository, Transactions};
use crate::db::models::transactions::TransactionCreateDBRequest;
use crate::errors::{Error, Result};

#[utoipa::path(
    post,
    path = "/barcodes/save",
    request_body = SaveBarcodesRequest,
    responses(
        (status = 200, description = "Batch saved", body = SaveBarcodesResponse),
        (status = 400, description = "Missing carrier or empty barcode list"),
        (status = 403, description = "Caller is not a courier"),
    ),
    tag = "barcodes"
)]
#[instrument(skip(state, request), fields(user_id = user.id, firma = %request.firma))]
pub async fn save_barcodes(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<SaveBarcodesRequest>,
) -> Result<Json<SaveBarcodesResponse>> {
    policy::ensure_kurye(&user)?;

    if request.firma.trim().is_empty() || request.barcodes.is_empty() {
        return Err(Error::BadRequest {
            message: "Firma ve barkod listesi gereklidir".to_string(),
        });
    }

    let mut conn = state.db.acquire().await?;
    let transaction = Transactions::new(&mut conn)
        .create(&TransactionCreateDBRequest {
            user_id: user.id,
            firma: request.firma.trim().to_string(),
            barcodes: request.barcodes,
        })
        .await?;

    info!(transaction_id = transaction.id, adet = transaction.adet, "Barcode batch saved");

    Ok(Json(SaveBarcodesResponse {
        success: true,
        message: format!("{} adet barkod başarıyla kaydedildi", transaction.adet),
        adet: transaction.adet,
    }))
}

#[utoipa::path(
    post,
    path = "/barcodes/check",
    request_body = BarcodeCheckRequest,
    responses(
        (status = 200, description = "Duplicate check result", body = BarcodeCheckResponse),
        (status = 400, description = "Missing barcode"),
        (status = 403, description = "Caller is not a courier"),
    ),
    tag = "barcodes"
)]
#[instrument(skip(state, request), fields(user_id = user.id))]
pub async fn check_barcode(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<BarcodeCheckRequest>,
) -> Result<Json<BarcodeCheckResponse>> {
    policy::ensure_kurye(&user)?;

    let barcode = request.barcode.trim();
    if barcode.is_empty() {
        return Err(Error::BadRequest {
            message: "Barkod gereklidir".to_string(),
        });
    }

    let mut conn = state.db.acquire().await?;
    let exists = Transactions::new(&mut conn).barcode_exists(barcode).await?;

    let message = if exists {
        "Bu barkod daha önce kaydedilmiş"
    } else {
        "Barkod kaydedilebilir"
    };

    Ok(Json(BarcodeCheckResponse {
        success: true,
        exists,
        message: message.to_string(),
    }))
}
