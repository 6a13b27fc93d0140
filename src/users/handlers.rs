use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::errors::ServiceError;
use crate::state::AppState;
use crate::users::dto::{AuthResponse, PublicUser, RegisterRequest, UpdateUserRequest};
use crate::users::repo_types::{NewUser, UserUpdate};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/user", get(get_all_users))
        .route(
            "/user/:id",
            get(get_user_by_id).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ServiceError> {
    let token = state
        .users
        .register(NewUser {
            name: payload.name.trim().to_owned(),
            email: payload.email.trim().to_lowercase(),
            password: payload.password,
        })
        .await?;
    Ok(Json(AuthResponse { token }))
}

#[instrument(skip_all, fields(user_id = %id))]
async fn get_user_by_id(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ServiceError> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip_all)]
async fn get_all_users(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<Vec<PublicUser>>, ServiceError> {
    let users = state.users.get_all().await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip_all, fields(user_id = %id))]
async fn update_user(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, ServiceError> {
    state
        .users
        .update(
            id,
            UserUpdate {
                name: payload.name,
                email: payload.email.map(|e| e.trim().to_lowercase()),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip_all, fields(user_id = %id))]
async fn delete_user(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServiceError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
