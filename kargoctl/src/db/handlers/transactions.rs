//! Database repository for barcode batches (`transactions` + `barcodes`).

use sqlx::{Connection, SqliteConnection};
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::transactions::{
        TransactionCreateDBRequest, TransactionDBResponse, TransactionFilter,
    },
};
use crate::types::TransactionId;

const TRANSACTION_COLUMNS: &str = "t.id, t.firma, t.adet, t.created_at, \
     u.name AS kurye_name, u.username AS kurye_username";

pub struct Transactions<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Transactions<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Whether a barcode has been logged in any batch before.
    #[instrument(skip(self), err)]
    pub async fn barcode_exists(&mut self, barcode: &str) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM barcodes WHERE barcode = ? LIMIT 1")
                .bind(barcode)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(row.is_some())
    }

    /// Barcodes of one batch, in scan order.
    #[instrument(skip(self), err)]
    pub async fn get_barcodes(&mut self, id: TransactionId) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT barcode FROM barcodes WHERE transaction_id = ? ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(|(b,)| b).collect())
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Transactions<'c> {
    type CreateRequest = TransactionCreateDBRequest;
    type Response = TransactionDBResponse;
    type Id = TransactionId;
    type Filter = TransactionFilter;

    /// Inserts the batch row and all barcodes atomically. `adet` is derived
    /// from the barcode list so the count can never drift from the rows.
    #[instrument(skip(self, request), fields(firma = %request.firma, adet = request.barcodes.len()), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let mut tx = self.db.begin().await?;

        let result =
            sqlx::query("INSERT INTO transactions (user_id, firma, adet) VALUES (?, ?, ?)")
                .bind(request.user_id)
                .bind(&request.firma)
                .bind(request.barcodes.len() as i64)
                .execute(&mut *tx)
                .await?;
        let id = result.last_insert_rowid();

        for barcode in &request.barcodes {
            sqlx::query("INSERT INTO barcodes (transaction_id, barcode) VALUES (?, ?)")
                .bind(id)
                .bind(barcode)
                .execute(&mut *tx)
                .await?;
        }

        let transaction = sqlx::query_as::<_, TransactionDBResponse>(&format!(
            "SELECT {TRANSACTION_COLUMNS} \
             FROM transactions t INNER JOIN users u ON t.user_id = u.id \
             WHERE t.id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let transaction = sqlx::query_as::<_, TransactionDBResponse>(&format!(
            "SELECT {TRANSACTION_COLUMNS} \
             FROM transactions t INNER JOIN users u ON t.user_id = u.id \
             WHERE t.id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(transaction)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let transactions = match filter.barcode.as_deref().map(str::trim) {
            Some(search) if !search.is_empty() => {
                sqlx::query_as::<_, TransactionDBResponse>(&format!(
                    "SELECT DISTINCT {TRANSACTION_COLUMNS} \
                     FROM transactions t \
                     INNER JOIN users u ON t.user_id = u.id \
                     INNER JOIN barcodes b ON t.id = b.transaction_id \
                     WHERE b.barcode LIKE ? \
                     ORDER BY t.created_at DESC"
                ))
                .bind(format!("%{search}%"))
                .fetch_all(&mut *self.db)
                .await?
            }
            _ => {
                sqlx::query_as::<_, TransactionDBResponse>(&format!(
                    "SELECT {TRANSACTION_COLUMNS} \
                     FROM transactions t INNER JOIN users u ON t.user_id = u.id \
                     ORDER BY t.created_at DESC"
                ))
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        Ok(transactions)
    }

    /// Deletes the batch and its barcodes in one transaction.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM barcodes WHERE transaction_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
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

    async fn seed_courier(pool: &SqlitePool) -> UserId {
        let mut conn = pool.acquire().await.unwrap();
        Users::new(&mut conn)
            .create(&UserCreateDBRequest {
                username: "kurye@verarkargo.com".to_string(),
                password_hash: "x".to_string(),
                role: Role::Kurye,
                name: "Kurye Kullanıcısı".to_string(),
                is_customer_service: false,
            })
            .await
            .unwrap()
            .id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn batch_roundtrip_keeps_adet_and_order(pool: SqlitePool) {
        let user_id = seed_courier(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Transactions::new(&mut conn);

        let created = repo
            .create(&TransactionCreateDBRequest {
                user_id,
                firma: "PTT".to_string(),
                barcodes: vec!["A1".to_string(), "B2".to_string(), "C3".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(created.adet, 3);
        assert_eq!(created.firma, "PTT");
        assert_eq!(created.kurye_username, "kurye@verarkargo.com");

        let barcodes = repo.get_barcodes(created.id).await.unwrap();
        assert_eq!(barcodes, vec!["A1", "B2", "C3"]);
        assert!(repo.barcode_exists("B2").await.unwrap());
        assert!(!repo.barcode_exists("Z9").await.unwrap());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn barcode_search_matches_substrings(pool: SqlitePool) {
        let user_id = seed_courier(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Transactions::new(&mut conn);

        repo.create(&TransactionCreateDBRequest {
            user_id,
            firma: "Aras".to_string(),
            barcodes: vec!["TRK-100200".to_string()],
        })
        .await
        .unwrap();
        repo.create(&TransactionCreateDBRequest {
            user_id,
            firma: "MNG".to_string(),
            barcodes: vec!["XYZ-999".to_string()],
        })
        .await
        .unwrap();

        let hits = repo
            .list(&TransactionFilter {
                barcode: Some("0020".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].firma, "Aras");

        let all = repo.list(&TransactionFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn failed_barcode_insert_leaves_no_rows(pool: SqlitePool) {
        let user_id = seed_courier(&pool).await;
        let mut conn = pool.acquire().await.unwrap();

        // Reject a marker barcode at the schema level so the insert fails
        // after the batch row and the first barcode were written.
        sqlx::query(
            "CREATE TRIGGER reject_marker_barcode BEFORE INSERT ON barcodes \
             WHEN NEW.barcode = 'REDDET' \
             BEGIN SELECT RAISE(ABORT, 'reddedildi'); END",
        )
        .execute(&mut *conn)
        .await
        .unwrap();

        let mut repo = Transactions::new(&mut conn);
        let result = repo
            .create(&TransactionCreateDBRequest {
                user_id,
                firma: "PTT".to_string(),
                barcodes: vec!["A1".to_string(), "REDDET".to_string()],
            })
            .await;
        assert!(result.is_err());

        let (batches,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(batches, 0);
        let (barcodes,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM barcodes")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(barcodes, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_removes_batch_and_barcodes(pool: SqlitePool) {
        let user_id = seed_courier(&pool).await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Transactions::new(&mut conn);

        let created = repo
            .create(&TransactionCreateDBRequest {
                user_id,
                firma: "PTT".to_string(),
                barcodes: vec!["A1".to_string()],
            })
            .await
            .unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(!repo.barcode_exists("A1").await.unwrap());

        // Deleting again reports that nothing was removed.
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
