//! Database repository for users.

use sqlx::SqliteConnection;
use tracing::instrument;

use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse, UserFilter, UserUpdateDBRequest},
};
use crate::types::UserId;

const USER_COLUMNS: &str =
    "id, username, password_hash, role, name, is_customer_service, created_at";

pub struct Users<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_username(&mut self, username: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    /// Partial update of role and capability flags. Returns whether the
    /// user existed.
    #[instrument(skip(self, request), err)]
    pub async fn update(&mut self, id: UserId, request: &UserUpdateDBRequest) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET \
                role = COALESCE(?, role), \
                is_customer_service = COALESCE(?, is_customer_service) \
             WHERE id = ?",
        )
        .bind(request.role)
        .bind(request.is_customer_service)
        .bind(id)
        .execute(&mut *self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            "INSERT INTO users (username, password_hash, role, name, is_customer_service) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&request.username)
        .bind(&request.password_hash)
        .bind(request.role)
        .bind(&request.name)
        .bind(request.is_customer_service)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = match filter.role {
            Some(role) => {
                sqlx::query_as::<_, UserDBResponse>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE role = ? ORDER BY name ASC"
                ))
                .bind(role)
                .fetch_all(&mut *self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, UserDBResponse>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC"
                ))
                .fetch_all(&mut *self.db)
                .await?
            }
        };

        Ok(users)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::auth::password;
    use sqlx::SqlitePool;

    #[sqlx::test(migrations = "./migrations")]
    async fn create_and_fetch_user(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let created = repo
            .create(&UserCreateDBRequest {
                username: "kurye@verarkargo.com".to_string(),
                password_hash: password::hash_string("kurye123").unwrap(),
                role: Role::Kurye,
                name: "Kurye Kullanıcısı".to_string(),
                is_customer_service: false,
            })
            .await
            .unwrap();

        assert_eq!(created.role, Role::Kurye);
        assert!(!created.is_customer_service);

        let fetched = repo
            .get_by_username("kurye@verarkargo.com")
            .await
            .unwrap()
            .expect("user should exist");
        assert_eq!(fetched.id, created.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn duplicate_username_is_a_unique_violation(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let request = UserCreateDBRequest {
            username: "admin".to_string(),
            password_hash: "x".to_string(),
            role: Role::Admin,
            name: "Admin".to_string(),
            is_customer_service: false,
        };
        repo.create(&request).await.unwrap();

        let err = repo.create(&request).await.unwrap_err();
        assert!(matches!(
            err,
            crate::db::errors::DbError::UniqueViolation { .. }
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_flips_capability_without_touching_role(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let created = repo
            .create(&UserCreateDBRequest {
                username: "müsterihizmetleri@verarkargo.com".to_string(),
                password_hash: "x".to_string(),
                role: Role::Kurye,
                name: "Müşteri Hizmetleri".to_string(),
                is_customer_service: false,
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                &UserUpdateDBRequest {
                    role: None,
                    is_customer_service: Some(true),
                },
            )
            .await
            .unwrap();
        assert!(updated);

        let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, Role::Kurye);
        assert!(fetched.is_customer_service);
    }
}
