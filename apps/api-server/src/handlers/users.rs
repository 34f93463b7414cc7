//! User endpoints. Read-only: user creation goes through registration.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cadence_core::domain::User;
use cadence_shared::dto::UserResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        created_at: user.created_at.to_rfc3339(),
    }
}

/// GET /api/users
pub async fn list(_identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.list().await?;
    let body: Vec<UserResponse> = users.iter().map(user_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/users/{id}
pub async fn get(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}
