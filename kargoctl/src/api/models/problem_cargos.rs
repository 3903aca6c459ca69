use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::problem_cargos::{PhotoDBResponse, ProblemCargoDBResponse};
use crate::types::ProblemCargoId;

/// Lifecycle state of a problem shipment. Stored and serialized with the
/// Turkish labels the panel displays; any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
pub enum CargoStatus {
    #[serde(rename = "Yeni Kayıt")]
    #[sqlx(rename = "Yeni Kayıt")]
    YeniKayit,
    #[serde(rename = "İşlemde")]
    #[sqlx(rename = "İşlemde")]
    Islemde,
    #[serde(rename = "Çözüldü")]
    #[sqlx(rename = "Çözüldü")]
    Cozuldu,
    #[serde(rename = "Ödendi")]
    #[sqlx(rename = "Ödendi")]
    Odendi,
    #[serde(rename = "Reddedildi")]
    #[sqlx(rename = "Reddedildi")]
    Reddedildi,
}

impl CargoStatus {
    pub fn is_odendi(self) -> bool {
        matches!(self, CargoStatus::Odendi)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProblemCargoSaveRequest {
    pub barkod_no: String,
    pub cikis_no: String,
    pub tasiyici_firma: String,
    pub gonderici_firma: String,
    pub alici_adi: String,
    pub aciklama: String,
    /// Photo URLs or inline base64 payloads captured by the office client.
    pub fotograflar: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemCargoSaveResponse {
    pub success: bool,
    pub message: String,
    pub id: ProblemCargoId,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProblemCargoUpdateRequest {
    pub barkod_no: String,
    pub cikis_no: String,
    pub tasiyici_firma: String,
    pub gonderici_firma: String,
    pub alici_adi: String,
    pub aciklama: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub durum: CargoStatus,
    /// Reason for the status change; required but not persisted.
    pub aciklama: Option<String>,
    /// Payment note; required when moving to "Ödendi".
    pub odeme_aciklamasi: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DepoGorusuRequest {
    pub depo_gorusu: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemCargoResponse {
    pub id: ProblemCargoId,
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

impl From<ProblemCargoDBResponse> for ProblemCargoResponse {
    fn from(c: ProblemCargoDBResponse) -> Self {
        Self {
            id: c.id,
            barkod_no: c.barkod_no,
            cikis_no: c.cikis_no,
            tasiyici_firma: c.tasiyici_firma,
            gonderici_firma: c.gonderici_firma,
            alici_adi: c.alici_adi,
            aciklama: c.aciklama,
            durum: c.durum,
            depo_gorusu: c.depo_gorusu,
            odeme_aciklamasi: c.odeme_aciklamasi,
            created_at: c.created_at,
            updated_at: c.updated_at,
            kullanici_name: c.kullanici_name,
            kullanici_username: c.kullanici_username,
            foto_sayisi: c.foto_sayisi,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemCargoListResponse {
    pub success: bool,
    #[serde(rename = "sorunluKargolar")]
    pub sorunlu_kargolar: Vec<ProblemCargoResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoResponse {
    pub id: i64,
    pub foto_url: String,
    pub created_at: NaiveDateTime,
}

impl From<PhotoDBResponse> for PhotoResponse {
    fn from(p: PhotoDBResponse) -> Self {
        Self {
            id: p.id,
            foto_url: p.foto_url,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProblemCargoDetailResponse {
    pub success: bool,
    #[serde(rename = "sorunluKargo")]
    pub sorunlu_kargo: ProblemCargoResponse,
    pub fotograflar: Vec<PhotoResponse>,
}
