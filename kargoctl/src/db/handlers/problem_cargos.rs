//! Database repository for problem shipments and their photos.

use sqlx::{Connection, SqliteConnection};
use tracing::instrument;

use crate::api::models::problem_cargos::CargoStatus;
use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::problem_cargos::{
        PhotoDBResponse, ProblemCargoCreateDBRequest, ProblemCargoDBResponse,
        ProblemCargoUpdateDBRequest,
    },
};
use crate::types::ProblemCargoId;

const PROBLEM_COLUMNS: &str = "sk.id, sk.user_id, sk.barkod_no, sk.cikis_no, \
     sk.tasiyici_firma, sk.gonderici_firma, sk.alici_adi, sk.aciklama, sk.durum, \
     sk.depo_gorusu, sk.odeme_aciklamasi, sk.created_at, sk.updated_at, \
     u.name AS kullanici_name, u.username AS kullanici_username, \
     (SELECT COUNT(*) FROM sorunlu_kargo_fotograflar f WHERE f.sorunlu_kargo_id = sk.id) \
         AS foto_sayisi";

pub struct ProblemCargos<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> ProblemCargos<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_photos(&mut self, id: ProblemCargoId) -> Result<Vec<PhotoDBResponse>> {
        let photos = sqlx::query_as::<_, PhotoDBResponse>(
            "SELECT id, foto_url, created_at FROM sorunlu_kargo_fotograflar \
             WHERE sorunlu_kargo_id = ? ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(photos)
    }

    /// Edit of the descriptive fields; bumps `updated_at`. Returns whether
    /// the record existed.
    #[instrument(skip(self, request), err)]
    pub async fn update_fields(
        &mut self,
        id: ProblemCargoId,
        request: &ProblemCargoUpdateDBRequest,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE sorunlu_kargolar SET \
                barkod_no = ?, cikis_no = ?, tasiyici_firma = ?, gonderici_firma = ?, \
                alici_adi = ?, aciklama = ?, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(&request.barkod_no)
        .bind(&request.cikis_no)
        .bind(&request.tasiyici_firma)
        .bind(&request.gonderici_firma)
        .bind(&request.alici_adi)
        .bind(&request.aciklama)
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Status change; the payment note is only written when one is given
    /// (the "Ödendi" path), otherwise the stored note is kept.
    #[instrument(skip(self), err)]
    pub async fn update_status(
        &mut self,
        id: ProblemCargoId,
        durum: CargoStatus,
        odeme_aciklamasi: Option<&str>,
    ) -> Result<bool> {
        let result = match odeme_aciklamasi {
            Some(note) => {
                sqlx::query(
                    "UPDATE sorunlu_kargolar SET \
                        durum = ?, odeme_aciklamasi = ?, updated_at = CURRENT_TIMESTAMP \
                     WHERE id = ?",
                )
                .bind(durum)
                .bind(note)
                .bind(id)
                .execute(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE sorunlu_kargolar SET durum = ?, updated_at = CURRENT_TIMESTAMP \
                     WHERE id = ?",
                )
                .bind(durum)
                .bind(id)
                .execute(&mut *self.db)
                .await?
            }
        };

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, depo_gorusu), err)]
    pub async fn update_depo_gorusu(
        &mut self,
        id: ProblemCargoId,
        depo_gorusu: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE sorunlu_kargolar SET depo_gorusu = ?, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?",
        )
        .bind(depo_gorusu)
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for ProblemCargos<'c> {
    type CreateRequest = ProblemCargoCreateDBRequest;
    type Response = ProblemCargoDBResponse;
    type Id = ProblemCargoId;
    type Filter = ();

    /// Inserts the record and its photos atomically.
    #[instrument(skip(self, request), fields(barkod_no = %request.barkod_no), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        let result = sqlx::query(
            "INSERT INTO sorunlu_kargolar \
                (user_id, barkod_no, cikis_no, tasiyici_firma, gonderici_firma, \
                 alici_adi, aciklama) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.user_id)
        .bind(&request.barkod_no)
        .bind(&request.cikis_no)
        .bind(&request.tasiyici_firma)
        .bind(&request.gonderici_firma)
        .bind(&request.alici_adi)
        .bind(&request.aciklama)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for foto in &request.fotograflar {
            sqlx::query(
                "INSERT INTO sorunlu_kargo_fotograflar (sorunlu_kargo_id, foto_url) \
                 VALUES (?, ?)",
            )
            .bind(id)
            .bind(foto)
            .execute(&mut *tx)
            .await?;
        }

        let cargo = sqlx::query_as::<_, ProblemCargoDBResponse>(&format!(
            "SELECT {PROBLEM_COLUMNS} \
             FROM sorunlu_kargolar sk INNER JOIN users u ON sk.user_id = u.id \
             WHERE sk.id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(cargo)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let cargo = sqlx::query_as::<_, ProblemCargoDBResponse>(&format!(
            "SELECT {PROBLEM_COLUMNS} \
             FROM sorunlu_kargolar sk INNER JOIN users u ON sk.user_id = u.id \
             WHERE sk.id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(cargo)
    }

    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let cargos = sqlx::query_as::<_, ProblemCargoDBResponse>(&format!(
            "SELECT {PROBLEM_COLUMNS} \
             FROM sorunlu_kargolar sk INNER JOIN users u ON sk.user_id = u.id \
             ORDER BY sk.created_at DESC"
        ))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(cargos)
    }

    /// Deletes the record and its photos in one transaction.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM sorunlu_kargo_fotograflar WHERE sorunlu_kargo_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM sorunlu_kargolar WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::db::handlers::Users;
    use crate::db::models::users::UserCreateDBRequest;
    use crate::types::UserId;
    use sqlx::SqlitePool;

    async fn seed_customer_service(pool: &SqlitePool) -> UserId {
        let mut conn = pool.acquire().await.unwrap();
        Users::new(&mut conn)
            .create(&UserCreateDBRequest {
                username: "müsterihizmetleri@verarkargo.com".to_string(),
                password_hash: "x".to_string(),
                role: Role::Kurye,
                name: "Müşteri Hizmetleri".to_string(),
                is_customer_service: true,
            })
            .await
            .unwrap()
            .id
    }

    fn sample_request(user_id: UserId, fotograflar: Vec<String>) -> ProblemCargoCreateDBRequest {
        ProblemCargoCreateDBRequest {
            user_id,
            barkod_no: "BRK-001".to_string(),
            cikis_no: "CKS-77".to_string(),
            tasiyici_firma: "Aras".to_string(),
            gonderici_firma: "Trendyol".to_string(),
            alici_adi: "Ayşe Yılmaz".to_string(),
            aciklama: "Paket hasarlı geldi".to_string(),
            fotograflar,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_with_photos_counts_them(pool: SqlitePool) {
        let user_id = seed_customer_service(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ProblemCargos::new(&mut conn);

        let created = repo
            .create(&sample_request(
                user_id,
                vec!["foto-1.jpg".to_string(), "foto-2.jpg".to_string()],
            ))
            .await
            .unwrap();

        assert_eq!(created.durum, CargoStatus::YeniKayit);
        assert_eq!(created.foto_sayisi, 2);
        assert_eq!(created.kullanici_name, "Müşteri Hizmetleri");

        let photos = repo.get_photos(created.id).await.unwrap();
        assert_eq!(photos.len(), 2);
        assert_eq!(photos[0].foto_url, "foto-1.jpg");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn status_update_writes_payment_note_only_when_given(pool: SqlitePool) {
        let user_id = seed_customer_service(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ProblemCargos::new(&mut conn);
        let created = repo.create(&sample_request(user_id, vec![])).await.unwrap();

        assert!(
            repo.update_status(created.id, CargoStatus::Odendi, Some("Havale ile ödendi"))
                .await
                .unwrap()
        );
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.durum, CargoStatus::Odendi);
        assert_eq!(fetched.odeme_aciklamasi.as_deref(), Some("Havale ile ödendi"));

        // Moving on without a note keeps the stored one.
        assert!(
            repo.update_status(created.id, CargoStatus::Cozuldu, None)
                .await
                .unwrap()
        );
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.durum, CargoStatus::Cozuldu);
        assert_eq!(fetched.odeme_aciklamasi.as_deref(), Some("Havale ile ödendi"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_removes_record_and_photos(pool: SqlitePool) {
        let user_id = seed_customer_service(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ProblemCargos::new(&mut conn);
        let created = repo
            .create(&sample_request(user_id, vec!["foto.jpg".to_string()]))
            .await
            .unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.get_photos(created.id).await.unwrap().is_empty());
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn depo_gorusu_update(pool: SqlitePool) {
        let user_id = seed_customer_service(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = ProblemCargos::new(&mut conn);
        let created = repo.create(&sample_request(user_id, vec![])).await.unwrap();

        assert!(
            repo.update_depo_gorusu(created.id, "Depoda bulunamadı")
                .await
                .unwrap()
        );
        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.depo_gorusu.as_deref(), Some("Depoda bulunamadı"));
    }
}
