//! User lookups for office screens.

use crate::api::Json;
use axum::extract::State;
use tracing::instrument;

use crate::AppState;
use crate::api::models::users::{KuryeListResponse, KuryeResponse, Role};
use crate::auth::{CurrentUser, policy};
use crate::db::handlers::{Repository, Users};
use crate::db::models::users::UserFilter;
use crate::errors::Result;

#[utoipa::path(
    get,
    path = "/users/kurye-list",
    responses(
        (status = 200, description = "Couriers ordered by name", body = KuryeListResponse),
        (status = 403, description = "Caller is not office staff"),
    ),
    tag = "users"
)]
#[instrument(skip(state), fields(user_id = user.id))]
pub async fn kurye_list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<KuryeListResponse>> {
    policy::ensure_admin_or_customer_service(&user)?;

    let mut conn = state.db.acquire().await?;
    let couriers = Users::new(&mut conn)
        .list(&UserFilter {
            role: Some(Role::Kurye),
        })
        .await?;

    Ok(Json(KuryeListResponse {
        success: true,
        kuryeler: couriers
            .iter()
            .map(|u| KuryeResponse {
                id: u.id,
                name: u.name.clone(),
                username: u.username.clone(),
            })
            .collect(),
    }))
}
