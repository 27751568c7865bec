// src/handlers/events.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{self, ApiResponse},
    },
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::event::{EventDto, SaveEventPayload},
};

#[utoipa::path(
    get,
    path = "/api/event",
    tag = "Events",
    responses(
        (status = 200, description = "Liste des évènements", body = [EventDto])
    )
)]
pub async fn list(
    State(app_state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<EventDto>>>), AppError> {
    let events = app_state.event_service.list().await?;
    Ok(response::ok(events, "Évènements récupérés."))
}

#[utoipa::path(
    get,
    path = "/api/event/{slug}",
    tag = "Events",
    params(("slug" = String, Path, description = "Slug de l'évènement")),
    responses(
        (status = 200, description = "Détail de l'évènement", body = EventDto),
        (status = 404, description = "Évènement introuvable")
    )
)]
pub async fn get_by_slug(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>), AppError> {
    let event = app_state.event_service.get_by_slug(&slug).await?;
    Ok(response::ok(event, "Évènement récupéré."))
}

#[utoipa::path(
    post,
    path = "/api/event",
    tag = "Events",
    request_body = SaveEventPayload,
    responses(
        (status = 201, description = "Évènement créé", body = EventDto),
        (status = 422, description = "Tarifs incohérents")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Json(payload): Json<SaveEventPayload>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>), AppError> {
    payload.validate()?;

    let event = app_state.event_service.create(&payload).await?;
    Ok(response::created(event, "Évènement créé."))
}

#[utoipa::path(
    put,
    path = "/api/event/{slug}",
    tag = "Events",
    request_body = SaveEventPayload,
    params(("slug" = String, Path, description = "Slug de l'évènement")),
    responses(
        (status = 200, description = "Évènement mis à jour", body = EventDto),
        (status = 404, description = "Évènement introuvable"),
        (status = 422, description = "Tarifs incohérents")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(slug): Path<String>,
    Json(payload): Json<SaveEventPayload>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>), AppError> {
    payload.validate()?;

    let event = app_state.event_service.update(&slug, &payload).await?;
    Ok(response::ok(event, "Évènement mis à jour."))
}

#[utoipa::path(
    delete,
    path = "/api/event/{slug}",
    tag = "Events",
    params(("slug" = String, Path, description = "Slug de l'évènement")),
    responses(
        (status = 200, description = "Évènement supprimé"),
        (status = 404, description = "Évènement introuvable")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AppError> {
    app_state.event_service.delete(&slug).await?;
    Ok(response::no_data("Évènement supprimé."))
}
