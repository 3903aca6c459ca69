//! Office review of barcode batches: listing, detail, deletion.

use crate::api::Json;
use axum::extract::{Path, Query, State};
use tracing::{info, instrument};

use crate::AppState;
use crate::api::models::MessageResponse;
use crate::api::models::transactions::{
    TransactionDetailResponse, TransactionListQuery, TransactionListResponse, TransactionResponse,
};
use crate::auth::{CurrentUser, policy};
use crate::db::handlers::{Repository, Transactions};
use crate::db::models::transactions::TransactionFilter;
use crate::errors::{Error, Result};
use crate::types::TransactionId;

#[utoipa::path(
    get,
    path = "/transactions/list",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Batches, newest first", body = TransactionListResponse),
        (status = 403, description = "Caller is not an admin"),
    ),
    tag = "transactions"
)]
#[instrument(skip(state, query), fields(user_id = user.id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>> {
    policy::ensure_admin(&user)?;

    let mut conn = state.db.acquire().await?;
    let transactions = Transactions::new(&mut conn)
        .list(&TransactionFilter {
            barcode: query.barcode,
        })
        .await?;

    Ok(Json(TransactionListResponse {
        success: true,
        transactions: transactions.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = i64, Path, description = "Batch id")),
    responses(
        (status = 200, description = "Batch with its barcodes", body = TransactionDetailResponse),
        (status = 403, description = "Caller is not office staff"),
        (status = 404, description = "No such batch"),
    ),
    tag = "transactions"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn get_transaction(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TransactionId>,
) -> Result<Json<TransactionDetailResponse>> {
    policy::ensure_admin_or_customer_service(&user)?;

    let mut conn = state.db.acquire().await?;
    let mut repo = Transactions::new(&mut conn);

    let transaction = repo.get_by_id(id).await?.ok_or_else(|| Error::NotFound {
        resource: "İşlem".to_string(),
    })?;
    let barcodes = repo.get_barcodes(id).await?;

    Ok(Json(TransactionDetailResponse {
        success: true,
        transaction: TransactionResponse::from(transaction),
        barcodes,
    }))
}

#[utoipa::path(
    delete,
    path = "/transactions/{id}/delete",
    params(("id" = i64, Path, description = "Batch id")),
    responses(
        (status = 200, description = "Batch and barcodes deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such batch"),
    ),
    tag = "transactions"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TransactionId>,
) -> Result<Json<MessageResponse>> {
    policy::ensure_admin(&user)?;

    let mut conn = state.db.acquire().await?;
    let deleted = Transactions::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "İşlem".to_string(),
        });
    }

    info!(transaction_id = id, "Batch deleted");

    Ok(Json(MessageResponse::ok("İşlem başarıyla silindi")))
}
