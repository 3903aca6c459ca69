//! Problem-shipment follow-up: creation, review, edits, status changes
//! and the warehouse note.

use crate::api::Json;
use axum::extract::{Path, State};
use tracing::{info, instrument};

use crate::AppState;
use crate::api::models::problem_cargos::{
    DepoGorusuRequest, ProblemCargoDetailResponse, ProblemCargoListResponse,
    ProblemCargoResponse, ProblemCargoSaveRequest, ProblemCargoSaveResponse,
    ProblemCargoUpdateRequest, StatusUpdateRequest,
};
use crate::api::models::MessageResponse;
use crate::auth::{CurrentUser, policy};
use crate::db::handlers::{ProblemCargos, Repository};
use crate::db::models::problem_cargos::{
    ProblemCargoCreateDBRequest, ProblemCargoDBResponse, ProblemCargoUpdateDBRequest,
};
use crate::errors::{Error, Result};
use crate::types::ProblemCargoId;

fn record_not_found() -> Error {
    Error::NotFound {
        resource: "Kayıt".to_string(),
    }
}

/// Edits and deletes: admins may touch any record, customer-service staff
/// only their own, everyone else nothing.
fn ensure_can_modify(
    user: &CurrentUser,
    cargo: &ProblemCargoDBResponse,
    own_records_message: &str,
) -> Result<()> {
    if user.is_admin() {
        return Ok(());
    }
    if !user.is_customer_service {
        return Err(Error::Forbidden { message: None });
    }
    if cargo.user_id != user.id {
        return Err(Error::Forbidden {
            message: Some(own_records_message.to_string()),
        });
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/sorunlu-kargolar/save",
    request_body = ProblemCargoSaveRequest,
    responses(
        (status = 200, description = "Record created", body = ProblemCargoSaveResponse),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Caller is not customer service"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state, request), fields(user_id = user.id, barkod_no = %request.barkod_no))]
pub async fn save_problem_cargo(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<ProblemCargoSaveRequest>,
) -> Result<Json<ProblemCargoSaveResponse>> {
    if !user.is_customer_service {
        return Err(Error::Forbidden {
            message: Some(
                "Sadece müşteri hizmetleri sorunlu kargo kaydı oluşturabilir".to_string(),
            ),
        });
    }

    let fields = [
        &request.barkod_no,
        &request.cikis_no,
        &request.tasiyici_firma,
        &request.gonderici_firma,
        &request.alici_adi,
        &request.aciklama,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(Error::BadRequest {
            message: "Tüm alanlar gereklidir".to_string(),
        });
    }

    let fotograflar = request
        .fotograflar
        .unwrap_or_default()
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect();

    let mut conn = state.db.acquire().await?;
    let cargo = ProblemCargos::new(&mut conn)
        .create(&ProblemCargoCreateDBRequest {
            user_id: user.id,
            barkod_no: request.barkod_no.trim().to_string(),
            cikis_no: request.cikis_no.trim().to_string(),
            tasiyici_firma: request.tasiyici_firma.trim().to_string(),
            gonderici_firma: request.gonderici_firma.trim().to_string(),
            alici_adi: request.alici_adi.trim().to_string(),
            aciklama: request.aciklama.trim().to_string(),
            fotograflar,
        })
        .await?;

    info!(sorunlu_kargo_id = cargo.id, "Problem cargo created");

    Ok(Json(ProblemCargoSaveResponse {
        success: true,
        message: "Sorunlu kargo kaydı başarıyla oluşturuldu".to_string(),
        id: cargo.id,
    }))
}

#[utoipa::path(
    get,
    path = "/sorunlu-kargolar/list",
    responses(
        (status = 200, description = "All records, newest first", body = ProblemCargoListResponse),
        (status = 403, description = "No valid session"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn list_problem_cargos(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ProblemCargoListResponse>> {
    // Any authenticated user: warehouse couriers read the list to add
    // their note, office staff to follow up.
    let mut conn = state.db.acquire().await?;
    let cargos = ProblemCargos::new(&mut conn).list(&()).await?;

    Ok(Json(ProblemCargoListResponse {
        success: true,
        sorunlu_kargolar: cargos.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/sorunlu-kargolar/{id}",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record with photos", body = ProblemCargoDetailResponse),
        (status = 403, description = "No valid session"),
        (status = 404, description = "No such record"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn get_problem_cargo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProblemCargoId>,
) -> Result<Json<ProblemCargoDetailResponse>> {
    let mut conn = state.db.acquire().await?;
    let mut repo = ProblemCargos::new(&mut conn);

    let cargo = repo.get_by_id(id).await?.ok_or_else(record_not_found)?;
    let photos = repo.get_photos(id).await?;

    Ok(Json(ProblemCargoDetailResponse {
        success: true,
        sorunlu_kargo: ProblemCargoResponse::from(cargo),
        fotograflar: photos.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    put,
    path = "/sorunlu-kargolar/{id}",
    params(("id" = i64, Path, description = "Record id")),
    request_body = ProblemCargoUpdateRequest,
    responses(
        (status = 200, description = "Record updated", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 403, description = "Not the owner, or not office staff"),
        (status = 404, description = "No such record"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state, request), fields(user_id = user.id))]
pub async fn update_problem_cargo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProblemCargoId>,
    Json(request): Json<ProblemCargoUpdateRequest>,
) -> Result<Json<MessageResponse>> {
    let fields = [
        &request.barkod_no,
        &request.cikis_no,
        &request.tasiyici_firma,
        &request.gonderici_firma,
        &request.alici_adi,
        &request.aciklama,
    ];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(Error::BadRequest {
            message: "Tüm alanlar gereklidir".to_string(),
        });
    }

    let mut conn = state.db.acquire().await?;
    let mut repo = ProblemCargos::new(&mut conn);

    let cargo = repo.get_by_id(id).await?.ok_or_else(record_not_found)?;
    ensure_can_modify(&user, &cargo, "Sadece kendi kayıtlarınızı düzenleyebilirsiniz")?;

    repo.update_fields(
        id,
        &ProblemCargoUpdateDBRequest {
            barkod_no: request.barkod_no.trim().to_string(),
            cikis_no: request.cikis_no.trim().to_string(),
            tasiyici_firma: request.tasiyici_firma.trim().to_string(),
            gonderici_firma: request.gonderici_firma.trim().to_string(),
            alici_adi: request.alici_adi.trim().to_string(),
            aciklama: request.aciklama.trim().to_string(),
        },
    )
    .await?;

    Ok(Json(MessageResponse::ok("Kayıt başarıyla güncellendi")))
}

#[utoipa::path(
    delete,
    path = "/sorunlu-kargolar/{id}",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record and photos deleted", body = MessageResponse),
        (status = 403, description = "Not the owner, or not office staff"),
        (status = 404, description = "No such record"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn delete_problem_cargo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProblemCargoId>,
) -> Result<Json<MessageResponse>> {
    let mut conn = state.db.acquire().await?;
    let mut repo = ProblemCargos::new(&mut conn);

    let cargo = repo.get_by_id(id).await?.ok_or_else(record_not_found)?;
    ensure_can_modify(&user, &cargo, "Sadece kendi kayıtlarınızı silebilirsiniz")?;

    repo.delete(id).await?;

    info!(sorunlu_kargo_id = id, "Problem cargo deleted");

    Ok(Json(MessageResponse::ok("Kayıt başarıyla silindi")))
}

#[utoipa::path(
    put,
    path = "/sorunlu-kargolar/{id}/status",
    params(("id" = i64, Path, description = "Record id")),
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Missing change reason or payment note"),
        (status = 403, description = "Caller is not office staff"),
        (status = 404, description = "No such record"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state, request), fields(user_id = user.id))]
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProblemCargoId>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<MessageResponse>> {
    policy::ensure_admin_or_customer_service(&user)?;

    // The change reason is required but intentionally not stored; it is
    // the office's confirmation prompt, not part of the record.
    let aciklama = request.aciklama.as_deref().map(str::trim).unwrap_or("");
    if aciklama.is_empty() {
        return Err(Error::BadRequest {
            message: "Durum değişikliği için açıklama gereklidir".to_string(),
        });
    }

    let odeme_aciklamasi = if request.durum.is_odendi() {
        let note = request
            .odeme_aciklamasi
            .as_deref()
            .map(str::trim)
            .unwrap_or("");
        if note.is_empty() {
            return Err(Error::BadRequest {
                message: "Ödendi durumu için ödeme açıklaması gereklidir".to_string(),
            });
        }
        Some(note.to_string())
    } else {
        None
    };

    let mut conn = state.db.acquire().await?;
    let updated = ProblemCargos::new(&mut conn)
        .update_status(id, request.durum, odeme_aciklamasi.as_deref())
        .await?;
    if !updated {
        return Err(record_not_found());
    }

    Ok(Json(MessageResponse::ok("Durum başarıyla güncellendi")))
}

#[utoipa::path(
    put,
    path = "/sorunlu-kargolar/{id}/depo-gorusu",
    params(("id" = i64, Path, description = "Record id")),
    request_body = DepoGorusuRequest,
    responses(
        (status = 200, description = "Warehouse note updated", body = MessageResponse),
        (status = 403, description = "Caller is not a warehouse courier"),
        (status = 404, description = "No such record"),
    ),
    tag = "sorunlu-kargolar"
)]
#[instrument(skip(state, request), fields(user_id = user.id))]
pub async fn update_depo_gorusu(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProblemCargoId>,
    Json(request): Json<DepoGorusuRequest>,
) -> Result<Json<MessageResponse>> {
    policy::ensure_depo(&user)?;

    let mut conn = state.db.acquire().await?;
    let updated = ProblemCargos::new(&mut conn)
        .update_depo_gorusu(id, request.depo_gorusu.trim())
        .await?;
    if !updated {
        return Err(record_not_found());
    }

    Ok(Json(MessageResponse::ok("Depo görüşü başarıyla güncellendi")))
}
