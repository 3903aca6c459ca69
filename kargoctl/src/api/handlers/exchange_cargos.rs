//! Exchange cargo logging and review.

use crate::api::Json;
use axum::extract::{Path, State};
use tracing::{info, instrument};

use crate::AppState;
use crate::api::models::exchange_cargos::{ExchangeCargoListResponse, ExchangeCargoSaveRequest};
use crate::api::models::MessageResponse;
use crate::auth::{CurrentUser, policy};
use crate::db::handlers::{ExchangeCargos, Repository};
use crate::db::models::exchange_cargos::ExchangeCargoCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::ExchangeCargoId;

#[utoipa::path(
    post,
    path = "/exchange-cargos/save",
    request_body = ExchangeCargoSaveRequest,
    responses(
        (status = 200, description = "Exchange cargo saved", body = MessageResponse),
        (status = 400, description = "Missing fields or non-positive desi"),
        (status = 403, description = "Caller is not a courier"),
    ),
    tag = "exchange-cargos"
)]
#[instrument(skip(state, request), fields(user_id = user.id, firma = %request.firma))]
pub async fn save_exchange_cargo(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ExchangeCargoSaveRequest>,
) -> Result<Json<MessageResponse>> {
    policy::ensure_kurye(&user)?;

    if request.alici_adi.trim().is_empty() || request.firma.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Alıcı adı, firma ve desi bilgileri gereklidir".to_string(),
        });
    }
    if !request.desi.is_finite() || request.desi <= 0.0 {
        return Err(Error::BadRequest {
            message: "Desi pozitif bir sayı olmalıdır".to_string(),
        });
    }

    let mut conn = state.db.acquire().await?;
    let cargo = ExchangeCargos::new(&mut conn)
        .create(&ExchangeCargoCreateDBRequest {
            user_id: user.id,
            alici_adi: request.alici_adi.trim().to_string(),
            firma: request.firma.trim().to_string(),
            desi: request.desi,
        })
        .await?;

    info!(exchange_cargo_id = cargo.id, "Exchange cargo saved");

    Ok(Json(MessageResponse::ok(
        "Değişim kargosu başarıyla kaydedildi",
    )))
}

#[utoipa::path(
    get,
    path = "/exchange-cargos/list",
    responses(
        (status = 200, description = "Exchange cargos, newest first", body = ExchangeCargoListResponse),
        (status = 403, description = "Caller is not office staff"),
    ),
    tag = "exchange-cargos"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn list_exchange_cargos(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ExchangeCargoListResponse>> {
    policy::ensure_admin_or_customer_service(&user)?;

    let mut conn = state.db.acquire().await?;
    let cargos = ExchangeCargos::new(&mut conn).list(&()).await?;

    Ok(Json(ExchangeCargoListResponse {
        success: true,
        exchange_cargos: cargos.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/exchange-cargos/{id}/delete",
    params(("id" = i64, Path, description = "Exchange cargo id")),
    responses(
        (status = 200, description = "Exchange cargo deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such exchange cargo"),
    ),
    tag = "exchange-cargos"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn delete_exchange_cargo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ExchangeCargoId>,
) -> Result<Json<MessageResponse>> {
    policy::ensure_admin(&user)?;

    let mut conn = state.db.acquire().await?;
    let deleted = ExchangeCargos::new(&mut conn).delete(id).await?;
    if !deleted {
        return Err(Error::NotFound {
            resource: "Değişim kargosu".to_string(),
        });
    }

    info!(exchange_cargo_id = id, "Exchange cargo deleted");

    Ok(Json(MessageResponse::ok("Değişim kargosu başarıyla silindi")))
}
