// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{self, ApiResponse},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{AdminOnly, RequireRole},
    },
    models::auth::{CreateUserPayload, User},
};

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses((status = 200, description = "Liste des comptes", body = [User])),
    security(("api_jwt" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<User>>>), AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(response::ok(users, "Comptes récupérés."))
}

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Compte créé", body = User),
        (status = 409, description = "E-mail déjà utilisé")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    payload.validate()?;

    let user = app_state.auth_service.create_user(&payload).await?;
    Ok(response::created(user, "Compte créé."))
}

#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID du compte")),
    responses(
        (status = 200, description = "Compte supprimé"),
        (status = 404, description = "Compte introuvable"),
        (status = 422, description = "Suppression de son propre compte")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    AuthenticatedUser(current): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AppError> {
    // Um admin não pode se trancar fora apagando o próprio acesso.
    if current.id == id {
        return Err(AppError::BusinessRule(
            "Vous ne pouvez pas supprimer votre propre compte.".to_string(),
        ));
    }
    app_state.auth_service.delete_user(id).await?;
    Ok(response::no_data("Compte supprimé."))
}
