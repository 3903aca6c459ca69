//! Database repository for exchange cargos.

use sqlx::SqliteConnection;
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::exchange_cargos::{ExchangeCargoCreateDBRequest, ExchangeCargoDBResponse},
};
use crate::types::ExchangeCargoId;

const EXCHANGE_COLUMNS: &str = "ec.id, ec.alici_adi, ec.firma, ec.desi, ec.created_at, \
     u.name AS kurye_name, u.username AS kurye_username";

pub struct ExchangeCargos<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> ExchangeCargos<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for ExchangeCargos<'c> {
    type CreateRequest = ExchangeCargoCreateDBRequest;
    type Response = ExchangeCargoDBResponse;
    type Id = ExchangeCargoId;
    type Filter = ();

    #[instrument(skip(self, request), fields(firma = %request.firma), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let result = sqlx::query(
            "INSERT INTO exchange_cargos (user_id, alici_adi, firma, desi) VALUES (?, ?, ?, ?)",
        )
        .bind(request.user_id)
        .bind(&request.alici_adi)
        .bind(&request.firma)
        .bind(request.desi)
        .execute(&mut *self.db)
        .await?;

        let cargo = sqlx::query_as::<_, ExchangeCargoDBResponse>(&format!(
            "SELECT {EXCHANGE_COLUMNS} \
             FROM exchange_cargos ec INNER JOIN users u ON ec.user_id = u.id \
             WHERE ec.id = ?"
        ))
        .bind(result.last_insert_rowid())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(cargo)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let cargo = sqlx::query_as::<_, ExchangeCargoDBResponse>(&format!(
            "SELECT {EXCHANGE_COLUMNS} \
             FROM exchange_cargos ec INNER JOIN users u ON ec.user_id = u.id \
             WHERE ec.id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(cargo)
    }

    #[instrument(skip(self, _filter), err)]
    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let cargos = sqlx::query_as::<_, ExchangeCargoDBResponse>(&format!(
            "SELECT {EXCHANGE_COLUMNS} \
             FROM exchange_cargos ec INNER JOIN users u ON ec.user_id = u.id \
             ORDER BY ec.created_at DESC"
        ))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(cargos)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM exchange_cargos WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
