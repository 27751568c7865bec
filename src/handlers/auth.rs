// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{self, ApiResponse},
    },
    config::AppState,
    models::auth::{LoginData, LoginPayload},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Connexion réussie", body = LoginData),
        (status = 401, description = "Identifiants invalides")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<(StatusCode, Json<ApiResponse<LoginData>>), AppError> {
    payload.validate()?;

    let data = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(response::ok(data, "Connexion réussie."))
}
