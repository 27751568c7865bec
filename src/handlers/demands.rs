// src/handlers/demands.rs

use axum::{
    Json,
    extract::{Path, Query, State},
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
    models::demand::{
        CreateDemandPayload, DemandDetail, DemandFilter, DemandStatsEntry, DemandSummary,
        UpdateStatusPayload,
    },
};

// Rota pública: o convidado soumet sa demande depuis le portail.
#[utoipa::path(
    post,
    path = "/api/demand",
    tag = "Demands",
    request_body = CreateDemandPayload,
    responses(
        (status = 201, description = "Demande soumise", body = DemandDetail),
        (status = 404, description = "Évènement introuvable"),
        (status = 422, description = "Demande incohérente")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateDemandPayload>,
) -> Result<(StatusCode, Json<ApiResponse<DemandDetail>>), AppError> {
    payload.validate()?;

    let demand = app_state.demand_service.create(&payload).await?;
    Ok(response::created(demand, "Votre demande a bien été soumise."))
}

// Rota pública: página de suivi du convidado.
#[utoipa::path(
    get,
    path = "/api/demand/{slug}",
    tag = "Demands",
    params(("slug" = String, Path, description = "Slug de la demande")),
    responses(
        (status = 200, description = "Détail de la demande", body = DemandDetail),
        (status = 404, description = "Demande introuvable")
    )
)]
pub async fn get_by_slug(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<DemandDetail>>), AppError> {
    let demand = app_state.demand_service.get_by_slug(&slug).await?;
    Ok(response::ok(demand, "Demande récupérée."))
}

#[utoipa::path(
    get,
    path = "/api/demand/by-event/{slug}",
    tag = "Demands",
    params(
        ("slug" = String, Path, description = "Slug de l'évènement"),
        ("status" = Option<String>, Query, description = "Filtre par statut"),
        ("type" = Option<String>, Query, description = "Filtre par type")
    ),
    responses(
        (status = 200, description = "Demandes de l'évènement", body = [DemandSummary])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_by_event(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(slug): Path<String>,
    Query(filter): Query<DemandFilter>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<DemandSummary>>>), AppError> {
    let demands = app_state
        .demand_service
        .list_by_event(&slug, filter.status, filter.demand_type)
        .await?;
    Ok(response::ok(demands, "Demandes récupérées."))
}

#[utoipa::path(
    get,
    path = "/api/demand/stats/{slug}",
    tag = "Demands",
    params(("slug" = String, Path, description = "Slug de l'évènement")),
    responses(
        (status = 200, description = "Statistiques par statut", body = [DemandStatsEntry])
    ),
    security(("api_jwt" = []))
)]
pub async fn stats_by_event(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<DemandStatsEntry>>>), AppError> {
    let stats = app_state.demand_service.stats_by_event(&slug).await?;
    Ok(response::ok(stats, "Statistiques récupérées."))
}

#[utoipa::path(
    patch,
    path = "/api/demand/{slug}/status",
    tag = "Demands",
    request_body = UpdateStatusPayload,
    params(("slug" = String, Path, description = "Slug de la demande")),
    responses(
        (status = 200, description = "Statut mis à jour"),
        (status = 404, description = "Demande introuvable"),
        (status = 422, description = "Transition non autorisée")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AppError> {
    app_state
        .demand_service
        .update_status(&slug, payload.status)
        .await?;
    Ok(response::no_data("Statut mis à jour."))
}

#[utoipa::path(
    delete,
    path = "/api/demand/{slug}",
    tag = "Demands",
    params(("slug" = String, Path, description = "Slug de la demande")),
    responses(
        (status = 200, description = "Demande supprimée"),
        (status = 404, description = "Demande introuvable")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AppError> {
    app_state.demand_service.delete(&slug).await?;
    Ok(response::no_data("Demande supprimée."))
}
