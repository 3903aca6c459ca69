use chrono::NaiveDateTime;
use sqlx::FromRow;

use crate::api::models::problem_cargos::CargoStatus;
use crate::types::{ProblemCargoId, UserId};

#[derive(Debug, Clone)]
pub struct ProblemCargoCreateDBRequest {
    pub user_id: UserId,
    pub barkod_no: String,
    pub cikis_no: String,
    pub tasiyici_firma: String,
    pub gonderici_firma: String,
    pub alici_adi: String,
    pub aciklama: String,
    pub fotograflar: Vec<String>,
}

/// Core-field edit; status, warehouse note and payment note have their own
/// update paths.
#[derive(Debug, Clone)]
pub struct ProblemCargoUpdateDBRequest {
    pub barkod_no: String,
    pub cikis_no: String,
    pub tasiyici_firma: String,
    pub gonderici_firma: String,
    pub alici_adi: String,
    pub aciklama: String,
}

/// Problem shipment joined with its creator; `foto_sayisi` is a subquery
/// count so list views can show a photo badge without fetching blobs.
#[derive(Debug, Clone, FromRow)]
pub struct ProblemCargoDBResponse {
    pub id: ProblemCargoId,
    pub user_id: UserId,
    pub barkod_no: String,
    pub cikis_no: String,
    pub tasiyici_firma: String,
    pub gonderici_firma: String,
    pub alici_adi: String,
    pub aciklama: String,
    pub durum: CargoStatus,
    pub depo_gorusu: Option<String>,
    pub odeme_aciklamasi: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub kullanici_name: String,
    pub kullanici_username: String,
    pub foto_sayisi: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct PhotoDBResponse {
    pub id: i64,
    pub foto_url: String,
    pub created_at: NaiveDateTime,
}
